//! Error types for the page pipeline and registries.

use thiserror::Error;

use replykit_protocols::ProviderId;

use crate::dom::NodeId;

/// Document manipulation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    #[error("invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("invalid page url: {0}")]
    InvalidUrl(String),

    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    #[error("node {0} is not an element")]
    NotAnElement(NodeId),

    #[error("node {0} is not a text control")]
    NotATextControl(NodeId),

    #[error("cannot insert node {child} into {parent}")]
    HierarchyRequest { parent: NodeId, child: NodeId },
}

/// Provider registry errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("provider already registered: {0}")]
    AlreadyRegistered(ProviderId),

    #[error("provider not registered: {0}")]
    NotFound(ProviderId),
}
