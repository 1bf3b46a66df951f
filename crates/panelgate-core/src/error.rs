//! Error taxonomy for panel client operations.
//!
//! Transport failures, malformed payloads, and application-level errors all
//! surface through [`PanelError`]. Callers distinguish the kinds by variant,
//! not by separate return channels; nothing in the client retries or swallows
//! an error.

/// Maximum number of raw response bytes embedded in an error message.
///
/// Panel responses can be arbitrarily large; error text must stay bounded so
/// it is safe to log.
pub const PREVIEW_LIMIT: usize = 64;

/// Errors from panel client calls.
#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    /// Construction parameters were missing or invalid. Never produced by a
    /// call on an already-constructed client.
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),

    /// The local panel binary could not be started.
    #[error("failed to run {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    /// The local panel binary exited unsuccessfully. The captured output is
    /// usually a JSON error body from the panel.
    #[error("{module}:{function} failed with {status}: {output}")]
    Exec {
        module: String,
        function: String,
        status: String,
        output: String,
    },

    /// The HTTP request could not be completed.
    #[error("API request {module}:{function} failed: {source}")]
    Request {
        module: String,
        function: String,
        #[source]
        source: reqwest::Error,
    },

    /// The panel answered with a non-success HTTP status.
    #[error("API request {module}:{function} failed: HTTP {status}")]
    Http {
        module: String,
        function: String,
        status: String,
        /// Bounded preview of the response body, for diagnosis only.
        preview: String,
    },

    /// The response body was not valid JSON in the expected envelope shape.
    #[error("malformed panel response: {preview:?}")]
    MalformedResponse { preview: String },

    /// The panel processed the request and reported a failure in its
    /// response envelope.
    #[error("panel error: {message}")]
    Api { message: String },

    /// The caller's deadline expired before the call completed.
    #[error("{module}:{function} cancelled: deadline exceeded")]
    Cancelled { module: String, function: String },

    /// The envelope decoded cleanly but the inner payload did not match the
    /// expected typed shape.
    #[error("failed to decode {context} payload: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl PanelError {
    /// Build a [`PanelError::MalformedResponse`] with a bounded preview of
    /// the offending bytes. The full payload is never retained.
    pub fn malformed(raw: &[u8]) -> Self {
        Self::MalformedResponse {
            preview: preview(raw),
        }
    }

    /// Whether this error came from the panel's own response envelope, as
    /// opposed to the transport or decoding layers.
    pub fn is_application(&self) -> bool {
        matches!(self, Self::Api { .. })
    }

    /// Whether this error is a deadline expiry rather than a failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

/// Lossy UTF-8 preview of at most [`PREVIEW_LIMIT`] raw bytes.
pub(crate) fn preview(raw: &[u8]) -> String {
    let end = raw.len().min(PREVIEW_LIMIT);
    String::from_utf8_lossy(&raw[..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_short_input_kept_whole() {
        assert_eq!(preview(b"{\"status\":1}"), "{\"status\":1}");
    }

    #[test]
    fn test_preview_truncates_to_limit() {
        let long = vec![b'x'; 200];
        let p = preview(&long);
        assert_eq!(p.len(), PREVIEW_LIMIT);
        assert!(p.chars().all(|c| c == 'x'));
    }

    #[test]
    fn test_preview_handles_invalid_utf8() {
        let p = preview(&[0xff, 0xfe, b'o', b'k']);
        assert!(p.ends_with("ok"));
    }

    #[test]
    fn test_malformed_error_display_is_bounded() {
        let long = vec![b'a'; 500];
        let err = PanelError::malformed(&long);
        // variant display + 64 preview chars, nowhere near the 500-byte body
        assert!(err.to_string().len() < 128);
    }

    #[test]
    fn test_error_kind_helpers() {
        let api = PanelError::Api {
            message: "nope".to_string(),
        };
        assert!(api.is_application());
        assert!(!api.is_cancelled());

        let cancelled = PanelError::Cancelled {
            module: "Features".to_string(),
            function: "list_features".to_string(),
        };
        assert!(cancelled.is_cancelled());
        assert!(!cancelled.is_application());
    }
}
