//! Provider protocol definitions.
//!
//! A provider wraps one external chat-completion API behind
//! `generate(prompt) -> text`.

mod params;
mod traits;

pub use params::*;
pub use traits::*;
