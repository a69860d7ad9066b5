//! Provider adapter registry.

mod provider;

pub use provider::ProviderRegistry;
