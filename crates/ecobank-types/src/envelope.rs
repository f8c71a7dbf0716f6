//! The uniform outer wrapper around every API response body.
//!
//! With the sole exception of the token endpoint, the API wraps each payload
//! in one JSON shape:
//!
//! ```json
//! {
//!   "response_code": 200,
//!   "response_message": "success",
//!   "response_content": { ... },
//!   "response_timestamp": "2022-09-23T17:04:43.506",
//!   "errors": ["..."]
//! }
//! ```
//!
//! `response_content` multiplexes every payload type, so it is held as a raw
//! JSON value and decoded only once the caller's target type is known.
//! A populated `errors` list and a decoded payload are mutually exclusive
//! outcomes of one response.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::value::RawValue;

use crate::errors::ResponseErrors;
use crate::timestamp::Timestamp;

/// The sentinel the API sends for "no content": a JSON-encoded empty string,
/// distinct from `null` and from `{}`.
const EMPTY_CONTENT: &str = "\"\"";

/// Protocol-level metadata carried by every envelope, available whether or
/// not the payload decoded.
#[derive(Debug, Clone)]
pub struct ResponseMeta {
    /// `response_code`: the API's own status, not the HTTP status. `000` or
    /// `200` means successful submission.
    pub code: i32,
    /// `response_message` verbatim.
    pub message: String,
    /// `response_timestamp`, when the API supplied one.
    pub timestamp: Option<Timestamp>,
}

/// A deserialized response envelope with the payload still undecoded.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    pub response_code: i32,
    pub response_message: String,
    #[serde(default)]
    pub response_content: Option<Box<RawValue>>,
    #[serde(default)]
    pub response_timestamp: Option<Timestamp>,
    #[serde(default)]
    pub errors: Option<ResponseErrors>,
}

/// How an envelope can fail to yield a typed payload.
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    /// The API reported one or more errors; the content was not decoded.
    #[error("{0}")]
    Api(ResponseErrors),
    /// The content was present but did not match the expected type.
    #[error("failed to decode response content")]
    Content(#[source] serde_json::Error),
}

impl Envelope {
    /// Parses the outer envelope shape from raw response bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Extracts the protocol metadata.
    pub fn meta(&self) -> ResponseMeta {
        ResponseMeta {
            code: self.response_code,
            message: self.response_message.clone(),
            timestamp: self.response_timestamp.clone(),
        }
    }

    /// Resolves the envelope into a typed payload.
    ///
    /// A non-empty error list wins over any content. Absent content, and the
    /// empty-string sentinel, decode as `T::default()`.
    pub fn decode<T>(self) -> Result<T, EnvelopeError>
    where
        T: DeserializeOwned + Default,
    {
        if let Some(errors) = self.errors
            && !errors.is_empty()
        {
            return Err(EnvelopeError::Api(errors));
        }
        match self.response_content {
            None => Ok(T::default()),
            Some(raw) if raw.get() == EMPTY_CONTENT => Ok(T::default()),
            Some(raw) => serde_json::from_str(raw.get()).map_err(EnvelopeError::Content),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Payload {
        a: i32,
    }

    #[test]
    fn decodes_content_and_metadata() {
        let body = br#"{
            "response_code": 200,
            "response_message": "success",
            "response_content": {"a": 1},
            "response_timestamp": "2022-09-23T17:04:43.506"
        }"#;
        let envelope = Envelope::from_slice(body).unwrap();
        let meta = envelope.meta();
        assert_eq!(meta.code, 200);
        assert_eq!(meta.message, "success");
        assert_eq!(
            meta.timestamp.unwrap().to_string(),
            "2022-09-23 17:04:43"
        );
        let payload: Payload = envelope.decode().unwrap();
        assert_eq!(payload, Payload { a: 1 });
    }

    #[test]
    fn empty_string_sentinel_decodes_to_default() {
        let body = br#"{
            "response_code": 200,
            "response_message": "success",
            "response_content": "",
            "response_timestamp": "2022-09-23T17:04:43.506"
        }"#;
        let envelope = Envelope::from_slice(body).unwrap();
        let payload: Payload = envelope.decode().unwrap();
        assert_eq!(payload, Payload::default());
    }

    #[test]
    fn absent_content_decodes_to_default() {
        let body = br#"{
            "response_code": 200,
            "response_message": "success",
            "response_timestamp": "2022-09-23T17:04:43.506"
        }"#;
        let envelope = Envelope::from_slice(body).unwrap();
        let payload: Payload = envelope.decode().unwrap();
        assert_eq!(payload, Payload::default());
    }

    #[test]
    fn populated_error_list_wins_over_content() {
        let body = br#"{
            "response_code": 403,
            "response_message": "failed",
            "response_content": {"a": 1},
            "response_timestamp": "2022-09-23T17:04:43.506",
            "errors": ["Error A", "Error B"]
        }"#;
        let envelope = Envelope::from_slice(body).unwrap();
        let meta = envelope.meta();
        assert_eq!(meta.code, 403);
        let err = envelope.decode::<Payload>().unwrap_err();
        match err {
            EnvelopeError::Api(errors) => {
                assert_eq!(errors.to_string(), "Error A\nError B");
            }
            other => panic!("expected an API error, got {other:?}"),
        }
    }

    #[test]
    fn empty_error_list_is_not_a_failure() {
        let body = br#"{
            "response_code": 200,
            "response_message": "success",
            "response_content": {"a": 7},
            "response_timestamp": "2022-09-23T17:04:43.506",
            "errors": []
        }"#;
        let envelope = Envelope::from_slice(body).unwrap();
        let payload: Payload = envelope.decode().unwrap();
        assert_eq!(payload, Payload { a: 7 });
    }

    #[test]
    fn mismatched_content_is_a_terminal_decode_error() {
        let body = br#"{
            "response_code": 200,
            "response_message": "success",
            "response_content": {"a": "not a number"},
            "response_timestamp": "2022-09-23T17:04:43.506"
        }"#;
        let envelope = Envelope::from_slice(body).unwrap();
        assert!(matches!(
            envelope.decode::<Payload>(),
            Err(EnvelopeError::Content(_))
        ));
    }
}
