//! Client facade over a chosen transport.
//!
//! `PanelClient` presents the same two operations — invoke a unified-API
//! function, invoke a legacy-API function — regardless of which transport
//! backs it. Transport selection happens exactly once, at construction;
//! the facade only forwards.

use serde::de::DeserializeOwned;

use panelgate_config::AppConfig;

use crate::context::CallContext;
use crate::envelope;
use crate::error::PanelError;
use crate::host::{self, HostIdentity};
use crate::transport::local::LocalTransport;
use crate::transport::remote::{RemoteOptions, RemoteTransport};
use crate::transport::{Args, Generation, Transport};

/// A panel API client bound to one transport.
///
/// Immutable after construction and safe to share across concurrent
/// callers; each call is an independent future with no shared per-call
/// state.
pub struct PanelClient {
    transport: Box<dyn Transport>,
}

impl std::fmt::Debug for PanelClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelClient")
            .field("transport", &self.transport.name())
            .finish()
    }
}

impl PanelClient {
    /// Client backed by the local panel binaries.
    pub fn local() -> Self {
        Self::with_transport(Box::new(LocalTransport::new()))
    }

    /// Client backed by the remote HTTP API.
    ///
    /// Validates origin and credentials; see [`RemoteTransport::new`].
    pub fn remote(
        origin: &str,
        username: &str,
        password: &str,
        options: RemoteOptions,
    ) -> Result<Self, PanelError> {
        Ok(Self::with_transport(Box::new(RemoteTransport::new(
            origin, username, password, options,
        )?)))
    }

    /// Client backed by an explicit transport.
    pub fn with_transport(transport: Box<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Select a transport from config and the host environment.
    ///
    /// Local when the process runs as a hosted account on the panel server
    /// (see [`host::is_panel_account`]); otherwise remote, built from the
    /// configured origin and credentials.
    pub fn from_config(config: &AppConfig, identity: &HostIdentity) -> Result<Self, PanelError> {
        if host::is_panel_account(identity) {
            Ok(Self::with_transport(Box::new(
                LocalTransport::new().with_trace_wire(config.panel.trace_wire),
            )))
        } else {
            Self::remote(
                &config.panel.url,
                &config.panel.username,
                &config.panel.password,
                RemoteOptions {
                    insecure_tls: config.panel.insecure_tls,
                    trace_wire: config.panel.trace_wire,
                },
            )
        }
    }

    /// Name of the bound transport ("local" or "remote").
    pub fn transport_name(&self) -> &str {
        self.transport.name()
    }

    /// Invoke a unified-API (UAPI) function and decode its payload.
    ///
    /// Application errors from the response envelope and transport or
    /// decoding failures all surface through the same [`PanelError`]
    /// channel; callers distinguish them by variant.
    pub async fn uapi<T: DeserializeOwned>(
        &self,
        ctx: &CallContext,
        module: &str,
        function: &str,
        args: &Args,
    ) -> Result<T, PanelError> {
        self.invoke(ctx, Generation::Uapi, module, function, args)
            .await
    }

    /// Invoke a legacy-API (API 2) function and decode its payload.
    pub async fn api2<T: DeserializeOwned>(
        &self,
        ctx: &CallContext,
        module: &str,
        function: &str,
        args: &Args,
    ) -> Result<T, PanelError> {
        self.invoke(ctx, Generation::Api2, module, function, args)
            .await
    }

    async fn invoke<T: DeserializeOwned>(
        &self,
        ctx: &CallContext,
        generation: Generation,
        module: &str,
        function: &str,
        args: &Args,
    ) -> Result<T, PanelError> {
        let raw = self
            .transport
            .call(ctx, generation, module, function, args)
            .await?;

        let inner = match generation {
            Generation::Uapi => envelope::decode_uapi(&raw)?,
            Generation::Api2 => envelope::decode_api2(&raw)?,
        };

        serde_json::from_str(inner.get()).map_err(|e| PanelError::Decode {
            context: format!("{module}:{function}"),
            source: e,
        })
    }
}
