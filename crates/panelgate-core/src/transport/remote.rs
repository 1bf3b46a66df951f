//! Remote transport — authenticated HTTP against a panel origin.
//!
//! One GET per call. The unified generation addresses operations by path,
//! the legacy generation by fixed path plus identifying query parameters.
//! Construction validates the origin and credentials up front so a
//! partially-valid transport never exists.

use reqwest::header;
use tracing::debug;
use url::Url;

use crate::context::CallContext;
use crate::error::{self, PanelError};
use crate::BoxFuture;

use super::{Args, Generation, Transport};

/// Identifying user-agent sent with every request.
const USER_AGENT: &str = concat!(
    "panelgate/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/panelgate/panelgate)"
);

/// Fixed API-version marker injected into legacy-generation queries.
const API2_VERSION: &str = "2";

/// Construction options for [`RemoteTransport`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoteOptions {
    /// Skip TLS certificate verification. For panels behind self-signed
    /// hostnames only; off by default.
    pub insecure_tls: bool,
    /// Log request targets and raw response bodies at `debug` level.
    /// Off by default; fixed for the lifetime of the transport.
    pub trace_wire: bool,
}

/// Transport backed by the panel's HTTP API.
#[derive(Debug)]
pub struct RemoteTransport {
    base: Url,
    username: String,
    password: String,
    client: reqwest::Client,
    trace_wire: bool,
}

impl RemoteTransport {
    /// Create a transport for the given origin and credentials.
    ///
    /// Fails with [`PanelError::InvalidConfig`] when the origin is empty or
    /// not a URL with a host, or when either credential is empty.
    pub fn new(
        origin: &str,
        username: &str,
        password: &str,
        options: RemoteOptions,
    ) -> Result<Self, PanelError> {
        if origin.is_empty() || username.is_empty() || password.is_empty() {
            return Err(PanelError::InvalidConfig(
                "panel URL, username, and password are all required".to_owned(),
            ));
        }

        let base = Url::parse(origin)
            .ok()
            .filter(|u| u.host_str().is_some_and(|h| !h.is_empty()))
            .ok_or_else(|| PanelError::InvalidConfig(format!("{origin:?} is not a URL")))?;

        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(options.insecure_tls)
            .build()
            .map_err(|e| PanelError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base,
            username: username.to_owned(),
            password: password.to_owned(),
            client,
            trace_wire: options.trace_wire,
        })
    }

    /// Build the request URL for one call.
    ///
    /// Unified calls address the operation in the path; legacy calls use a
    /// fixed path and identify the operation (and acting user) in the query.
    fn build_url(&self, generation: Generation, module: &str, function: &str, args: &Args) -> Url {
        let mut url = self.base.clone();
        url.set_query(None);

        match generation {
            Generation::Uapi => {
                url.set_path(&format!("/execute/{module}/{function}"));
                if !args.is_empty() {
                    let mut query = url.query_pairs_mut();
                    for (key, value) in args {
                        query.append_pair(key, value);
                    }
                }
            }
            Generation::Api2 => {
                url.set_path("/json-api/cpanel");
                let mut query = url.query_pairs_mut();
                for (key, value) in args {
                    query.append_pair(key, value);
                }
                query.append_pair("cpanel_jsonapi_user", &self.username);
                query.append_pair("cpanel_jsonapi_apiversion", API2_VERSION);
                query.append_pair("cpanel_jsonapi_module", module);
                query.append_pair("cpanel_jsonapi_func", function);
            }
        }

        url
    }
}

impl Transport for RemoteTransport {
    fn name(&self) -> &str {
        "remote"
    }

    fn call<'a>(
        &'a self,
        ctx: &'a CallContext,
        generation: Generation,
        module: &'a str,
        function: &'a str,
        args: &'a Args,
    ) -> BoxFuture<'a, Result<Vec<u8>, PanelError>> {
        Box::pin(async move {
            let cancelled = || PanelError::Cancelled {
                module: module.to_owned(),
                function: function.to_owned(),
            };

            if ctx.is_expired() {
                return Err(cancelled());
            }

            let url = self.build_url(generation, module, function, args);

            if self.trace_wire {
                debug!(%generation, module, function, target = %url, "panel http request");
            }

            let request = self
                .client
                .get(url)
                .basic_auth(&self.username, Some(&self.password))
                .header(header::USER_AGENT, USER_AGENT);

            let exchange = async {
                let response = request.send().await.map_err(|e| PanelError::Request {
                    module: module.to_owned(),
                    function: function.to_owned(),
                    source: e,
                })?;
                let status = response.status();
                // Buffer the whole body before any parsing so a malformed
                // response can still be previewed.
                let body = response.bytes().await.map_err(|e| PanelError::Request {
                    module: module.to_owned(),
                    function: function.to_owned(),
                    source: e,
                })?;
                Ok::<_, PanelError>((status, body))
            };

            let (status, body) = match ctx.remaining() {
                Some(limit) => tokio::time::timeout(limit, exchange)
                    .await
                    .map_err(|_| cancelled())??,
                None => exchange.await?,
            };

            if self.trace_wire {
                debug!(
                    %generation,
                    module,
                    function,
                    response = %String::from_utf8_lossy(&body),
                    "panel http response"
                );
            }

            if !status.is_success() {
                // The status is authoritative; the body is kept only as a
                // bounded diagnostic preview.
                return Err(PanelError::Http {
                    module: module.to_owned(),
                    function: function.to_owned(),
                    status: status.to_string(),
                    preview: error::preview(&body),
                });
            }

            Ok(body.to_vec())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope;
    use panelgate_test_utils::mock_panel::MockPanel;
    use pretty_assertions::assert_eq;

    fn transport(origin: &str) -> RemoteTransport {
        RemoteTransport::new(origin, "alice", "hunter2", RemoteOptions::default()).unwrap()
    }

    #[test]
    fn test_construction_rejects_empty_username() {
        let err = RemoteTransport::new(
            "https://panel.example.com:2083",
            "",
            "hunter2",
            RemoteOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, PanelError::InvalidConfig(_)));
    }

    #[test]
    fn test_construction_rejects_empty_password_and_url() {
        for (url, user, pass) in [
            ("", "alice", "hunter2"),
            ("https://panel.example.com", "alice", ""),
        ] {
            let err = RemoteTransport::new(url, user, pass, RemoteOptions::default()).unwrap_err();
            assert!(matches!(err, PanelError::InvalidConfig(_)));
        }
    }

    #[test]
    fn test_construction_rejects_hostless_url() {
        let err = RemoteTransport::new(
            "not a url",
            "alice",
            "hunter2",
            RemoteOptions::default(),
        )
        .unwrap_err();
        match err {
            PanelError::InvalidConfig(message) => assert!(message.contains("not a URL")),
            other => panic!("expected InvalidConfig, got {other:?}"),
        }
    }

    #[test]
    fn test_uapi_url_uses_execute_path() {
        let t = transport("https://panel.example.com:2083");
        let args = Args::from([("domain".to_owned(), "example.com".to_owned())]);
        let url = t.build_url(Generation::Uapi, "DomainInfo", "domains_data", &args);
        assert_eq!(
            url.as_str(),
            "https://panel.example.com:2083/execute/DomainInfo/domains_data?domain=example.com"
        );
    }

    #[test]
    fn test_uapi_url_without_args_has_no_query() {
        let t = transport("https://panel.example.com:2083");
        let url = t.build_url(Generation::Uapi, "Features", "list_features", &Args::new());
        assert_eq!(
            url.as_str(),
            "https://panel.example.com:2083/execute/Features/list_features"
        );
    }

    #[test]
    fn test_api2_url_injects_identifying_params() {
        let t = transport("https://panel.example.com:2083");
        let args = Args::from([("path".to_owned(), "/home/alice".to_owned())]);
        let url = t.build_url(Generation::Api2, "Fileman", "mkdir", &args);

        assert_eq!(url.path(), "/json-api/cpanel");
        let query: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(query.contains(&("path".to_owned(), "/home/alice".to_owned())));
        assert!(query.contains(&("cpanel_jsonapi_user".to_owned(), "alice".to_owned())));
        assert!(query.contains(&("cpanel_jsonapi_apiversion".to_owned(), "2".to_owned())));
        assert!(query.contains(&("cpanel_jsonapi_module".to_owned(), "Fileman".to_owned())));
        assert!(query.contains(&("cpanel_jsonapi_func".to_owned(), "mkdir".to_owned())));
    }

    #[tokio::test]
    async fn test_uapi_roundtrip_sends_auth_and_user_agent() {
        let panel = MockPanel::builder()
            .uapi(
                "Features",
                "list_features",
                r#"{"status":1,"errors":null,"messages":null,"data":{"sslinstall":1}}"#,
            )
            .start()
            .await;
        let t = transport(&panel.origin());

        let raw = t
            .call(
                &CallContext::new(),
                Generation::Uapi,
                "Features",
                "list_features",
                &Args::new(),
            )
            .await
            .unwrap();
        let inner = envelope::decode_uapi(&raw).unwrap();
        assert_eq!(inner.get(), r#"{"sslinstall":1}"#);

        let requests = panel.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path, "/execute/Features/list_features");
        // Basic base64("alice:hunter2")
        assert_eq!(
            requests[0].authorization.as_deref(),
            Some("Basic YWxpY2U6aHVudGVyMg==")
        );
        let ua = requests[0].user_agent.as_deref().unwrap();
        assert!(ua.starts_with("panelgate/"));
    }

    #[tokio::test]
    async fn test_api2_roundtrip() {
        let panel = MockPanel::builder()
            .api2(
                "Fileman",
                "mkdir",
                r#"{"cpanelresult":{"event":{"result":1},"data":[{"path":"/home/alice/x"}]}}"#,
            )
            .start()
            .await;
        let t = transport(&panel.origin());
        let args = Args::from([("path".to_owned(), "/home/alice".to_owned())]);

        let raw = t
            .call(&CallContext::new(), Generation::Api2, "Fileman", "mkdir", &args)
            .await
            .unwrap();
        let inner = envelope::decode_api2(&raw).unwrap();
        assert_eq!(inner.get(), r#"[{"path":"/home/alice/x"}]"#);
    }

    #[tokio::test]
    async fn test_expired_context_makes_no_request() {
        let panel = MockPanel::builder()
            .uapi("Features", "list_features", r#"{"status":1,"data":null}"#)
            .start()
            .await;
        let t = transport(&panel.origin());
        let ctx = CallContext::with_timeout(std::time::Duration::ZERO);

        let err = t
            .call(&ctx, Generation::Uapi, "Features", "list_features", &Args::new())
            .await
            .unwrap_err();

        assert!(err.is_cancelled());
        assert_eq!(panel.hits(), 0);
    }

    #[tokio::test]
    async fn test_non_success_status_reports_http_error() {
        let panel = MockPanel::builder()
            .uapi_status(
                "SSL",
                "install_ssl",
                403,
                r#"{"status":0,"errors":["Access denied"]}"#,
            )
            .start()
            .await;
        let t = transport(&panel.origin());

        let err = t
            .call(
                &CallContext::new(),
                Generation::Uapi,
                "SSL",
                "install_ssl",
                &Args::new(),
            )
            .await
            .unwrap_err();

        match err {
            PanelError::Http {
                module,
                function,
                status,
                preview,
            } => {
                assert_eq!(module, "SSL");
                assert_eq!(function, "install_ssl");
                assert!(status.starts_with("403"));
                assert!(preview.contains("Access denied"));
            }
            other => panic!("expected Http error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_connection_failure_reports_request_error() {
        // Reserved port with nothing listening.
        let t = transport("http://127.0.0.1:9/");
        let err = t
            .call(
                &CallContext::new(),
                Generation::Uapi,
                "Features",
                "list_features",
                &Args::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, PanelError::Request { .. }));
    }
}
