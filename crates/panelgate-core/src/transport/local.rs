//! Local transport — runs the panel's own command-line binaries.
//!
//! Each generation ships as a separate executable on the panel host. The
//! transport builds an argv in the binaries' expected shape, captures
//! stdout, and normalises the output so the envelope decoders see the same
//! bytes the remote transport would produce. For the unified generation
//! that means stripping the extra `{"result": ...}` wrapper the local
//! binary adds around the envelope.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use serde::Deserialize;
use serde_json::value::RawValue;
use tokio::process::Command;
use tracing::debug;

use crate::context::CallContext;
use crate::error::PanelError;
use crate::BoxFuture;

use super::{Args, Generation, Transport};

/// Fixed path of the unified-generation binary on a panel host.
pub const UAPI_BIN: &str = "/bin/uapi";
/// Fixed path of the legacy-generation binary on a panel host.
pub const API2_BIN: &str = "/bin/cpapi2";

/// Transport backed by the panel's local binaries.
///
/// Carries no credentials — the binaries act as the invoking OS user.
pub struct LocalTransport {
    uapi_bin: PathBuf,
    api2_bin: PathBuf,
    trace_wire: bool,
}

impl LocalTransport {
    /// Create a transport using the fixed panel binary paths.
    pub fn new() -> Self {
        Self::with_binaries(UAPI_BIN, API2_BIN)
    }

    /// Create a transport with explicit binary paths.
    ///
    /// Exists so tests can substitute fixture scripts; production callers
    /// use [`LocalTransport::new`].
    pub fn with_binaries(uapi_bin: impl Into<PathBuf>, api2_bin: impl Into<PathBuf>) -> Self {
        Self {
            uapi_bin: uapi_bin.into(),
            api2_bin: api2_bin.into(),
            trace_wire: false,
        }
    }

    /// Builder: enable request/response logging at `debug` level.
    ///
    /// Off by default; set once at construction from config.
    pub fn with_trace_wire(mut self, trace_wire: bool) -> Self {
        self.trace_wire = trace_wire;
        self
    }

    fn binary(&self, generation: Generation) -> &Path {
        match generation {
            Generation::Uapi => &self.uapi_bin,
            Generation::Api2 => &self.api2_bin,
        }
    }
}

impl Default for LocalTransport {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the argv for one call: the JSON output flag, the module and
/// function names, then one `key=value` token per argument with the value
/// percent-escaped.
fn build_argv(module: &str, function: &str, args: &Args) -> Vec<String> {
    let mut argv = vec!["--output=json".to_owned(), module.to_owned(), function.to_owned()];
    for (key, value) in args {
        let escaped: String = url::form_urlencoded::byte_serialize(value.as_bytes()).collect();
        argv.push(format!("{key}={escaped}"));
    }
    argv
}

/// The local unified binary wraps the envelope one level deeper than the
/// remote endpoint does.
#[derive(Debug, Deserialize)]
struct LocalUapiWrapper {
    result: Box<RawValue>,
}

impl Transport for LocalTransport {
    fn name(&self) -> &str {
        "local"
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

            let binary = self.binary(generation);
            let argv = build_argv(module, function, args);

            if self.trace_wire {
                debug!(%generation, module, function, ?argv, "panel exec request");
            }

            // kill_on_drop reaps the child if the deadline expires or the
            // caller drops the in-flight future.
            let child = Command::new(binary)
                .args(&argv)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .spawn()
                .map_err(|e| PanelError::Spawn {
                    binary: binary.display().to_string(),
                    source: e,
                })?;

            let wait = child.wait_with_output();
            let output = match ctx.remaining() {
                Some(limit) => match tokio::time::timeout(limit, wait).await {
                    Ok(result) => result,
                    Err(_) => return Err(cancelled()),
                },
                None => wait.await,
            }
            .map_err(|e| PanelError::Spawn {
                binary: binary.display().to_string(),
                source: e,
            })?;

            if self.trace_wire {
                debug!(
                    %generation,
                    module,
                    function,
                    response = %String::from_utf8_lossy(&output.stdout),
                    "panel exec response"
                );
            }

            if !output.status.success() {
                let captured = if output.stdout.is_empty() {
                    &output.stderr
                } else {
                    &output.stdout
                };
                return Err(PanelError::Exec {
                    module: module.to_owned(),
                    function: function.to_owned(),
                    status: output.status.to_string(),
                    output: String::from_utf8_lossy(captured).trim().to_owned(),
                });
            }

            match generation {
                // Unwrap the local-only nesting so the codec stays
                // transport-agnostic.
                Generation::Uapi => {
                    let wrapper: LocalUapiWrapper = serde_json::from_slice(&output.stdout)
                        .map_err(|_| PanelError::malformed(&output.stdout))?;
                    Ok(wrapper.result.get().as_bytes().to_vec())
                }
                Generation::Api2 => Ok(output.stdout),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_argv_starts_with_output_flag_module_function() {
        let argv = build_argv("Features", "list_features", &Args::new());
        assert_eq!(argv, vec!["--output=json", "Features", "list_features"]);
    }

    #[test]
    fn test_argv_one_token_per_arg_entry() {
        let args = Args::from([
            ("name".to_owned(), "public_html".to_owned()),
            ("path".to_owned(), "/home/user".to_owned()),
            ("permissions".to_owned(), "0755".to_owned()),
        ]);
        let argv = build_argv("Fileman", "mkdir", &args);
        assert_eq!(argv.len(), 3 + args.len());
        for (key, _) in &args {
            assert_eq!(
                argv.iter().filter(|t| t.starts_with(&format!("{key}="))).count(),
                1
            );
        }
    }

    #[test]
    fn test_argv_values_are_percent_escaped() {
        let args = Args::from([("domain".to_owned(), "a b&c=d/e".to_owned())]);
        let argv = build_argv("SSL", "install_ssl", &args);
        assert_eq!(argv[3], "domain=a+b%26c%3Dd%2Fe");
    }

    #[test]
    fn test_fixed_binary_selection() {
        let transport = LocalTransport::new();
        assert_eq!(transport.binary(Generation::Uapi), Path::new(UAPI_BIN));
        assert_eq!(transport.binary(Generation::Api2), Path::new(API2_BIN));
        assert_eq!(transport.name(), "local");
    }

    #[cfg(unix)]
    mod exec {
        use super::*;
        use crate::envelope;
        use pretty_assertions::assert_eq;
        use panelgate_test_utils::fake_binary::FakeBinary;

        fn transport_for(fixture: &FakeBinary) -> LocalTransport {
            LocalTransport::with_binaries(fixture.path(), fixture.path())
        }

        #[tokio::test]
        async fn test_uapi_local_wrapper_is_stripped() {
            let fixture =
                FakeBinary::json(r#"{"result":{"status":1,"errors":[],"data":{"x":1}}}"#);
            let transport = transport_for(&fixture);

            let raw = transport
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
            assert_eq!(inner.get(), r#"{"x":1}"#);
        }

        #[tokio::test]
        async fn test_api2_output_is_passed_through() {
            let body = r#"{"cpanelresult":{"event":{"result":1},"data":[{"ok":1}]}}"#;
            let fixture = FakeBinary::json(body);
            let transport = transport_for(&fixture);

            let raw = transport
                .call(
                    &CallContext::new(),
                    Generation::Api2,
                    "Fileman",
                    "mkdir",
                    &Args::new(),
                )
                .await
                .unwrap();

            let inner = envelope::decode_api2(&raw).unwrap();
            assert_eq!(inner.get(), r#"[{"ok":1}]"#);
        }

        #[tokio::test]
        async fn test_argv_reaches_the_binary() {
            let fixture =
                FakeBinary::json(r#"{"result":{"status":1,"errors":[],"data":null}}"#);
            let transport = transport_for(&fixture);
            let args = Args::from([("path".to_owned(), "/home/user a".to_owned())]);

            transport
                .call(
                    &CallContext::new(),
                    Generation::Uapi,
                    "Fileman",
                    "mkdir",
                    &args,
                )
                .await
                .unwrap();

            let recorded = fixture.recorded_args().unwrap();
            assert_eq!(
                recorded,
                vec!["--output=json", "Fileman", "mkdir", "path=%2Fhome%2Fuser+a"]
            );
        }

        #[tokio::test]
        async fn test_nonzero_exit_reports_exec_error() {
            let fixture = FakeBinary::failing(2, r#"{"error":"no such account"}"#);
            let transport = transport_for(&fixture);

            let err = transport
                .call(
                    &CallContext::new(),
                    Generation::Uapi,
                    "Features",
                    "list_features",
                    &Args::new(),
                )
                .await
                .unwrap_err();

            match err {
                PanelError::Exec {
                    module,
                    function,
                    output,
                    ..
                } => {
                    assert_eq!(module, "Features");
                    assert_eq!(function, "list_features");
                    assert!(output.contains("no such account"));
                }
                other => panic!("expected Exec error, got {other:?}"),
            }
        }

        #[tokio::test]
        async fn test_missing_binary_reports_spawn_error() {
            let transport =
                LocalTransport::with_binaries("/nonexistent/uapi", "/nonexistent/cpapi2");

            let err = transport
                .call(
                    &CallContext::new(),
                    Generation::Uapi,
                    "Features",
                    "list_features",
                    &Args::new(),
                )
                .await
                .unwrap_err();

            assert!(matches!(err, PanelError::Spawn { .. }));
        }

        #[tokio::test]
        async fn test_deadline_kills_slow_binary() {
            let fixture = FakeBinary::sleeping(10);
            let transport = transport_for(&fixture);
            let ctx = CallContext::with_timeout(std::time::Duration::from_millis(100));

            let err = transport
                .call(&ctx, Generation::Uapi, "Features", "list_features", &Args::new())
                .await
                .unwrap_err();

            assert!(err.is_cancelled());
        }

        #[tokio::test]
        async fn test_expired_context_never_spawns() {
            let fixture = FakeBinary::json(r#"{"result":{"status":1,"data":null}}"#);
            let transport = transport_for(&fixture);
            let ctx = CallContext::with_timeout(std::time::Duration::ZERO);

            let err = transport
                .call(&ctx, Generation::Uapi, "Features", "list_features", &Args::new())
                .await
                .unwrap_err();

            assert!(err.is_cancelled());
            assert!(fixture.recorded_args().is_none());
        }

        #[tokio::test]
        async fn test_non_json_stdout_is_malformed() {
            let fixture = FakeBinary::json("Usage: uapi [options] ...");
            let transport = transport_for(&fixture);

            let err = transport
                .call(
                    &CallContext::new(),
                    Generation::Uapi,
                    "Features",
                    "list_features",
                    &Args::new(),
                )
                .await
                .unwrap_err();

            assert!(matches!(err, PanelError::MalformedResponse { .. }));
        }
    }
}
