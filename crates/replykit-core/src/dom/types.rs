//! Shared DOM types: node identity, bounding box, events and mutation records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a node in a [`Document`](super::Document).
///
/// Ids index an arena that never frees slots, so an id is never reused for a
/// different node, even after the node left the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }

    /// Parse the form written into `data-ai-for` attributes.
    pub fn from_attr(value: &str) -> Option<Self> {
        value.trim().parse().ok().map(NodeId)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bounding box for an element, in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Check if a point is inside this bounding box.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    /// Top-right corner.
    pub fn top_right(&self) -> (f64, f64) {
        (self.x + self.width, self.y)
    }
}

/// Synthetic events dispatched on elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Input,
    Change,
    Keyup,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Input => "input",
            EventKind::Change => "change",
            EventKind::Keyup => "keyup",
        }
    }
}

/// A dispatched event, kept in the document's event log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomEvent {
    pub target: NodeId,
    pub kind: EventKind,
    pub bubbles: bool,
}

/// A structural change: children added to or removed from `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    pub target: NodeId,
    pub added: Vec<NodeId>,
    pub removed: Vec<NodeId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_attr_form() {
        let id = NodeId(42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(NodeId::from_attr("42"), Some(id));
        assert_eq!(NodeId::from_attr("abc"), None);
    }

    #[test]
    fn test_bounding_box() {
        let b = BoundingBox::new(10.0, 20.0, 100.0, 40.0);
        assert!(b.contains(50.0, 30.0));
        assert!(!b.contains(5.0, 30.0));
        assert_eq!(b.top_right(), (110.0, 20.0));
    }
}
