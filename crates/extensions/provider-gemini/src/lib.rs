//! # ReplyKit Provider - Gemini
//!
//! Google Gemini provider for ReplyKit.

mod client;
mod factory;
mod provider;
mod types;

pub use factory::GeminiFactory;
pub use provider::GeminiProvider;
pub use types::*;
