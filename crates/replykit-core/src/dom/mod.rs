//! In-memory page model.
//!
//! HTML is parsed with `scraper` into an arena-backed [`Document`] that the
//! page pipeline can query with CSS selectors, mutate, and observe.

use std::sync::Arc;

use parking_lot::Mutex;

mod document;
mod parse;
mod selector;
mod types;

pub use document::{Document, ElementData, MutationObserver, NodeData, EVENT_LOG_CAPACITY};
pub use selector::Selector;
pub use types::{BoundingBox, DomEvent, EventKind, MutationRecord, NodeId};

/// A document shared between the page-side components.
///
/// Locked only for short synchronous sections, never across `.await`.
pub type SharedDocument = Arc<Mutex<Document>>;
