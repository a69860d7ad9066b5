//! # ReplyKit Core
//!
//! Page pipeline and background service of the reply assistant.
//!
//! ## Components
//!
//! - [`dom`] - arena document with selectors, events and mutation observers
//! - [`ContextExtractor`] - finds the question and content near a field
//! - [`PromptBuilder`] - turns context, tone and language into a prompt
//! - [`AffordanceController`] - icons, shortcut, context menu, hover button
//! - [`ReplyModal`] - tone choice, generation state and insertion
//! - [`BackgroundService`] / [`BrokerHandle`] - the page <-> background channel
//! - [`ProviderRegistry`] - provider adapter factories

pub mod broker;
pub mod context;
pub mod controller;
pub mod dom;
pub mod error;
pub mod fields;
pub mod insert;
pub mod modal;
pub mod prompt;
pub mod registry;

pub use broker::{BackgroundService, BrokerHandle, BrokerInbox};
pub use context::{ContextExtractor, SiteProfile};
pub use controller::{
    Activation, ActivationSource, AffordanceController, ControllerConfig, ControllerHandle, PageEvent,
};
pub use dom::{Document, NodeId, SharedDocument};
pub use error::{DomError, RegistryError};
pub use fields::FieldRegistry;
pub use insert::insert_text;
pub use modal::{run_generation, ModalError, PendingGeneration, ReplyModal, ResponseState};
pub use prompt::PromptBuilder;
pub use registry::ProviderRegistry;
