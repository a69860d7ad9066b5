//! # ReplyKit Protocols
//!
//! Shared vocabulary of the reply pipeline. Contains only types and traits,
//! no I/O.
//!
//! ## Core items
//!
//! - [`ReplyProvider`] - one external chat-completion API
//! - [`ProviderFactory`] - builds a provider for a given API key and language
//! - [`GenerationError`] / [`ErrorKind`] - normalized error taxonomy
//! - [`BrokerRequest`] / [`GenerationResult`] - page <-> background wire messages

pub mod error;
pub mod message;
pub mod provider;
pub mod types;

pub use error::{ErrorKind, GenerationError, UnknownIdError};
pub use message::{BrokerRequest, GenerationRequest, GenerationResult};
pub use provider::{GenerationParams, ProviderFactory, ReplyProvider};
pub use types::*;
