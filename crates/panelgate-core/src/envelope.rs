//! Response envelopes for the two panel API generations.
//!
//! Both generations wrap their payload in a JSON envelope carrying a success
//! indicator and error text, but the two shapes are unrelated. The decode
//! functions here take normalised envelope bytes from a transport and return
//! the untouched inner payload, or the application error the envelope
//! reports. Which decoder applies is decided by the operation the caller
//! invoked — never inferred from the payload shape.
//!
//! Error precedence is identical for both generations: a populated top-level
//! `error` field wins over the generation-specific status fields, because
//! some panel responses set only the generic field and would otherwise read
//! as success.

use serde::Deserialize;
use serde_json::value::RawValue;

use crate::error::PanelError;

/// Success sentinel shared by both envelope generations.
const STATUS_OK: i64 = 1;

// ── Wire shapes (private) ───────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct UapiEnvelope {
    #[serde(default)]
    status: i64,
    #[serde(default)]
    errors: Option<Vec<String>>,
    #[serde(default)]
    messages: Option<Vec<String>>,
    #[serde(default = "null_raw")]
    data: Box<RawValue>,
    /// Generic error field some responses populate instead of `errors`.
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Api2Outer {
    cpanelresult: Api2Envelope,
}

#[derive(Debug, Deserialize)]
struct Api2Envelope {
    #[serde(default)]
    event: Api2Event,
    #[serde(default = "null_raw")]
    data: Box<RawValue>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Api2Event {
    #[serde(default)]
    result: i64,
    #[serde(default)]
    reason: Option<String>,
}

fn null_raw() -> Box<RawValue> {
    RawValue::from_string("null".to_owned()).expect("null is valid JSON")
}

// ── Decoding ────────────────────────────────────────────────────────────

/// Unwrap a unified-generation (UAPI) envelope.
///
/// Returns the inner `data` payload unchanged on success. A populated
/// top-level `error` field takes precedence; otherwise a status other than
/// the success sentinel turns the `errors` list into the error message.
pub fn decode_uapi(raw: &[u8]) -> Result<Box<RawValue>, PanelError> {
    let env: UapiEnvelope = serde_json::from_slice(raw).map_err(|_| PanelError::malformed(raw))?;

    if let Some(err) = env.error.as_deref().filter(|e| !e.is_empty()) {
        let mut message = format!("{err} (status {})", env.status);
        if let Some(msgs) = env.messages.as_deref().filter(|m| !m.is_empty()) {
            message.push_str("; ");
            message.push_str(&msgs.join("; "));
        }
        return Err(PanelError::Api { message });
    }

    if env.status != STATUS_OK {
        let message = match env.errors.as_deref() {
            Some(errors) if !errors.is_empty() => errors.join("\n"),
            _ => "unknown error".to_owned(),
        };
        return Err(PanelError::Api { message });
    }

    Ok(env.data)
}

/// Unwrap a legacy-generation (API 2) envelope.
///
/// The envelope sits under a `cpanelresult` key in both transports, so the
/// unwrap happens here rather than per transport. A missing `cpanelresult`
/// is a malformed response, not an application error.
pub fn decode_api2(raw: &[u8]) -> Result<Box<RawValue>, PanelError> {
    let outer: Api2Outer = serde_json::from_slice(raw).map_err(|_| PanelError::malformed(raw))?;
    let env = outer.cpanelresult;

    if let Some(err) = env.error.as_deref().filter(|e| !e.is_empty()) {
        return Err(PanelError::Api {
            message: err.to_owned(),
        });
    }

    if env.event.result != STATUS_OK {
        let message = match env.event.reason.as_deref() {
            Some(reason) if !reason.is_empty() => reason.to_owned(),
            _ => "Unknown".to_owned(),
        };
        return Err(PanelError::Api { message });
    }

    Ok(env.data)
}
