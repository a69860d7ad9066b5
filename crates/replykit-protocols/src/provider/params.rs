//! Sampling parameters and helpers shared by the HTTP adapters.

use serde::{Deserialize, Serialize};

/// Sampling parameters sent with every generation call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 300,
        }
    }
}

/// Extract `error.message` from a JSON error body.
///
/// All supported APIs wrap errors as `{"error": {"message": "..."}}`.
pub fn api_error_detail(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(String::from))
        .filter(|m| !m.trim().is_empty())
}
