//! OpenAI-style chat-completions providers for ReplyKit.
//!
//! OpenAI and Groq share the same request/response envelope; each gets its
//! own [`ReplyProvider`](replykit_protocols::ReplyProvider) implementation on
//! top of [`ChatClient`].

mod api;
mod client;
mod factory;
mod provider;

pub use client::ChatClient;
pub use factory::{GroqFactory, OpenAIFactory};
pub use provider::{GroqProvider, OpenAIProvider};
