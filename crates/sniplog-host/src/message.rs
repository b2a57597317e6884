use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An inbound request from the extension.
///
/// Only `text` drives the host. Extensions ship extra context (page URL,
/// element metadata) alongside it; those fields are preserved through
/// decoding but never an error and never logged.
///
/// `text` must be a string or `null` when present. A request carrying a
/// non-string `text` fails decoding as a whole and is answered with a
/// `message` fault rather than a `logged:false` acknowledgment.
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Acknowledgment status reported back to the extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// The acknowledgment frame sent for every processed request.
///
/// Two shapes exist: a write acknowledgment carrying `logged`, and a loop
/// fault carrying `message`. Absent fields are omitted from the wire
/// document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logged: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Response {
    /// Acknowledge a write attempt: `success`/`logged:true` or
    /// `error`/`logged:false`.
    pub fn logged(ok: bool) -> Self {
        Self {
            status: if ok { Status::Success } else { Status::Error },
            logged: Some(ok),
            message: None,
        }
    }

    /// Report a fault in the loop itself (framing, decoding).
    pub fn fault(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            logged: None,
            message: Some(message.into()),
        }
    }
}

/// The payload was not valid UTF-8 or not a well-formed JSON document.
#[derive(Debug, thiserror::Error)]
#[error("invalid message payload: {0}")]
pub struct DecodeError(#[from] serde_json::Error);

/// Parse a frame payload into a [`Request`].
pub fn decode_request(payload: &[u8]) -> Result<Request, DecodeError> {
    Ok(serde_json::from_slice(payload)?)
}

/// Serialize a [`Response`] to frame payload bytes.
///
/// Cannot fail for the shapes this host produces; the signature still
/// propagates so the loop reports rather than panics if that ever changes.
pub fn encode_response(response: &Response) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_text_request() {
        let req = decode_request(br#"{"text":"hello world"}"#).unwrap();
        assert_eq!(req.text.as_deref(), Some("hello world"));
        assert!(req.extra.is_empty());
    }

    #[test]
    fn unknown_fields_are_preserved_not_rejected() {
        let req = decode_request(br#"{"text":"x","url":"https://example.com","tag":"div"}"#)
            .unwrap();
        assert_eq!(req.text.as_deref(), Some("x"));
        assert_eq!(
            req.extra.get("url").and_then(Value::as_str),
            Some("https://example.com")
        );
        assert_eq!(req.extra.get("tag").and_then(Value::as_str), Some("div"));
    }

    #[test]
    fn missing_text_decodes_as_none() {
        let req = decode_request(br#"{"url":"https://example.com"}"#).unwrap();
        assert!(req.text.is_none());
    }

    #[test]
    fn null_text_decodes_as_none() {
        let req = decode_request(br#"{"text":null}"#).unwrap();
        assert!(req.text.is_none());
    }

    #[test]
    fn truncated_document_is_a_decode_error() {
        assert!(decode_request(br#"{"text":"hel"#).is_err());
    }

    #[test]
    fn invalid_utf8_is_a_decode_error() {
        assert!(decode_request(&[0x7b, 0xff, 0xfe, 0x7d]).is_err());
    }

    #[test]
    fn non_string_text_is_a_decode_error() {
        assert!(decode_request(br#"{"text":42}"#).is_err());
        assert!(decode_request(br#"{"text":["a"]}"#).is_err());
    }

    #[test]
    fn non_object_payload_is_a_decode_error() {
        assert!(decode_request(b"42").is_err());
    }

    #[test]
    fn response_roundtrip() {
        for response in [
            Response::logged(true),
            Response::logged(false),
            Response::fault("stream closed mid-frame"),
        ] {
            let bytes = encode_response(&response).unwrap();
            let back: Response = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(back, response);
        }
    }

    #[test]
    fn logged_response_omits_message_field() {
        let bytes = encode_response(&Response::logged(true)).unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["status"], "success");
        assert_eq!(value["logged"], true);
        assert!(value.get("message").is_none());
    }

    #[test]
    fn fault_response_omits_logged_field() {
        let bytes = encode_response(&Response::fault("boom")).unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["message"], "boom");
        assert!(value.get("logged").is_none());
    }

    #[test]
    fn failed_write_is_error_with_logged_false() {
        let bytes = encode_response(&Response::logged(false)).unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["logged"], false);
    }
}
