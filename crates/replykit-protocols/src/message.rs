//! Messages exchanged between the page side and the background side.
//!
//! Wire format (JSON):
//!
//! - request: `{ "action": "generateResponse", "context": "...", "tone": "friendly" }`
//! - response: `{ "text": "..." }` or `{ "error": "...", "code": "rate_limited" }`

use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, GenerationError};
use crate::types::ToneId;

/// A generation request created at user action time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub context: String,
    pub tone: ToneId,
}

impl GenerationRequest {
    pub fn new(context: impl Into<String>, tone: ToneId) -> Self {
        Self {
            context: context.into(),
            tone,
        }
    }

    pub fn into_wire(self) -> BrokerRequest {
        BrokerRequest::GenerateResponse {
            context: self.context,
            tone: self.tone.as_str().to_string(),
        }
    }
}

/// Request message sent to the background side.
///
/// The tone travels as a plain string: the background tolerates values it
/// does not know and falls back to the default tone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum BrokerRequest {
    GenerateResponse { context: String, tone: String },
}

/// Response message returned by the background side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GenerationResult {
    Text {
        text: String,
    },
    Error {
        error: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        code: Option<ErrorKind>,
    },
}

impl GenerationResult {
    /// Convert back into a `Result`.
    ///
    /// Responses without a `code` (older background versions) are reported
    /// as [`ErrorKind::Unknown`].
    pub fn into_result(self) -> Result<String, GenerationError> {
        match self {
            GenerationResult::Text { text } => Ok(text),
            GenerationResult::Error { error, code } => Err(GenerationError::new(
                code.unwrap_or(ErrorKind::Unknown),
                error,
            )),
        }
    }
}

impl From<Result<String, GenerationError>> for GenerationResult {
    fn from(result: Result<String, GenerationError>) -> Self {
        match result {
            Ok(text) => GenerationResult::Text { text },
            Err(err) => GenerationResult::Error {
                error: err.message,
                code: Some(err.kind),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_format() {
        let wire = GenerationRequest::new("Hello there", ToneId::Humorous).into_wire();
        let json = serde_json::to_value(&wire).unwrap();
        assert_eq!(json["action"], "generateResponse");
        assert_eq!(json["context"], "Hello there");
        assert_eq!(json["tone"], "humorous");
    }

    #[test]
    fn test_request_accepts_unknown_tone_string() {
        let json = r#"{"action":"generateResponse","context":"c","tone":"sarcastic"}"#;
        let request: BrokerRequest = serde_json::from_str(json).unwrap();
        match request {
            BrokerRequest::GenerateResponse { tone, .. } => assert_eq!(tone, "sarcastic"),
        }
    }

    #[test]
    fn test_request_rejects_unknown_action() {
        let json = r#"{"action":"openSettings"}"#;
        assert!(serde_json::from_str::<BrokerRequest>(json).is_err());
    }

    #[test]
    fn test_text_result_wire_format() {
        let result = GenerationResult::from(Ok("Merci !".to_string()));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json, serde_json::json!({ "text": "Merci !" }));
    }

    #[test]
    fn test_error_result_keeps_kind() {
        let err = GenerationError::new(ErrorKind::NotConfigured, "no key");
        let json = serde_json::to_string(&GenerationResult::from(Err(err.clone()))).unwrap();
        let parsed: GenerationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.into_result().unwrap_err(), err);
    }

    #[test]
    fn test_error_without_code_is_unknown() {
        let parsed: GenerationResult = serde_json::from_str(r#"{"error":"boom"}"#).unwrap();
        let err = parsed.into_result().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unknown);
        assert_eq!(err.message(), "boom");
    }

    #[test]
    fn test_error_with_unfamiliar_code_keeps_message() {
        let json = r#"{"error":"Quota mensuel épuisé.","code":"quota_exhausted"}"#;
        let err = serde_json::from_str::<GenerationResult>(json)
            .unwrap()
            .into_result()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unknown);
        assert_eq!(err.message(), "Quota mensuel épuisé.");
    }
}
