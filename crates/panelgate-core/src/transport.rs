//! Transport abstraction for panel calls.
//!
//! A [`Transport`] turns one (generation, module, function, args) invocation
//! into normalised envelope bytes — normalised meaning the bytes a
//! [`decoder`](crate::envelope) for that generation can consume regardless
//! of which transport produced them. Two implementations exist:
//!
//! - [`LocalTransport`](local::LocalTransport) — runs the panel's own
//!   command-line binaries and captures stdout.
//! - [`RemoteTransport`](remote::RemoteTransport) — authenticated HTTP GET
//!   against a configured origin.
//!
//! Exactly one transport is bound per client, chosen at construction.

use std::collections::BTreeMap;
use std::fmt;

use crate::context::CallContext;
use crate::error::PanelError;
use crate::BoxFuture;

/// Local command execution against the panel binaries.
pub mod local;
/// Authenticated HTTP against a remote panel origin.
pub mod remote;

/// Arguments for a single panel call.
///
/// Ordered map so both transports serialize deterministically; the panel
/// itself does not depend on argument order. Values are passed as strings —
/// the panel's wire formats (query string, argv) have no richer scalars.
pub type Args = BTreeMap<String, String>;

/// The two generations of the panel's RPC surface.
///
/// Selected per call by the facade operation the caller invoked; the
/// envelope decoding rules follow the generation, never the payload shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generation {
    /// The newer unified interface.
    Uapi,
    /// The older "version 2" interface.
    Api2,
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Generation::Uapi => write!(f, "uapi"),
            Generation::Api2 => write!(f, "api2"),
        }
    }
}

/// A transport for panel calls.
///
/// Implementations must be `Send + Sync`; a client may be shared across
/// concurrent callers and holds no per-call mutable state. Uses
/// [`BoxFuture`] for object safety (allows `Box<dyn Transport>`).
pub trait Transport: Send + Sync {
    /// Transport display name (e.g. "local", "remote").
    fn name(&self) -> &str;

    /// Perform one panel call and return the normalised envelope bytes.
    ///
    /// The implementation honours `ctx`'s deadline around its blocking
    /// section and must not leak the underlying subprocess or request when
    /// the deadline expires.
    fn call<'a>(
        &'a self,
        ctx: &'a CallContext,
        generation: Generation,
        module: &'a str,
        function: &'a str,
        args: &'a Args,
    ) -> BoxFuture<'a, Result<Vec<u8>, PanelError>>;
}
