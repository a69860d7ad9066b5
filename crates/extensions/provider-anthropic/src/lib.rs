//! Anthropic provider for ReplyKit.

mod api;
mod factory;
mod provider;

pub use factory::AnthropicFactory;
pub use provider::AnthropicProvider;
