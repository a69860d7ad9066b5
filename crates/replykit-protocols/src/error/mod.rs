//! Error types for the reply pipeline.

mod generation;
mod messages;

pub use generation::*;
pub use messages::error_template;

use thiserror::Error;

/// Returned when a string does not name a known tone, language or provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownIdError {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownIdError {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}
