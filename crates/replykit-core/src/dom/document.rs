//! Arena-backed document tree.

use std::collections::VecDeque;

use tokio::sync::mpsc;
use tracing::trace;
use url::Url;

use crate::error::DomError;

use super::selector::Selector;
use super::types::{BoundingBox, DomEvent, EventKind, MutationRecord, NodeId};

/// Node payload.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    Document,
    Element(ElementData),
    Text(String),
}

/// Element tag, attributes and form-control state.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementData {
    tag: String,
    attrs: Vec<(String, String)>,
    /// Current value of `input`/`textarea`, once assigned.
    value: Option<String>,
}

impl ElementData {
    /// Lowercase tag name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
    bounding_box: Option<BoundingBox>,
}

/// Most recent events kept by [`Document::events`].
pub const EVENT_LOG_CAPACITY: usize = 256;

/// An in-memory page.
///
/// Nodes are never freed: a removed subtree stays addressable but is no
/// longer [connected](Document::is_connected).
pub struct Document {
    nodes: Vec<Node>,
    url: Option<Url>,
    events: VecDeque<DomEvent>,
    observers: Vec<mpsc::UnboundedSender<MutationRecord>>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty `html > (head, body)` document.
    pub fn new() -> Self {
        let mut doc = Self::empty();
        let html = doc.create_element("html");
        let head = doc.create_element("head");
        let body = doc.create_element("body");
        doc.link(doc.root(), html);
        doc.link(html, head);
        doc.link(html, body);
        doc
    }

    /// A document holding only the root node.
    pub(crate) fn empty() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                data: NodeData::Document,
                bounding_box: None,
            }],
            url: None,
            events: VecDeque::new(),
            observers: Vec::new(),
        }
    }

    pub fn with_url(mut self, url: &str) -> Result<Self, DomError> {
        self.set_url(url)?;
        Ok(self)
    }

    pub fn set_url(&mut self, url: &str) -> Result<(), DomError> {
        let parsed = Url::parse(url).map_err(|e| DomError::InvalidUrl(format!("{url}: {e}")))?;
        self.url = Some(parsed);
        Ok(())
    }

    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    pub fn host(&self) -> Option<&str> {
        self.url.as_ref().and_then(Url::host_str)
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn body(&self) -> Option<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .find(|id| self.tag_name(*id) == Some("body"))
    }

    /// Number of nodes ever created.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, DomError> {
        self.nodes.get_mut(id.0).ok_or(DomError::NodeNotFound(id))
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut ElementData, DomError> {
        match &mut self.node_mut(id)?.data {
            NodeData::Element(element) => Ok(element),
            _ => Err(DomError::NotAnElement(id)),
        }
    }

    fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.node(id)?.data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn data(&self, id: NodeId) -> Option<&NodeData> {
        self.node(id).map(|n| &n.data)
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.element(id).is_some()
    }

    /// Lowercase tag name.
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.tag.as_str())
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?
            .attrs
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) -> Result<(), DomError> {
        let value = value.into();
        let element = self.element_mut(id)?;
        match element.attrs.iter_mut().find(|(key, _)| key.eq_ignore_ascii_case(name)) {
            Some(entry) => entry.1 = value,
            None => element.attrs.push((name.to_ascii_lowercase(), value)),
        }
        Ok(())
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> Result<(), DomError> {
        self.element_mut(id)?
            .attrs
            .retain(|(key, _)| !key.eq_ignore_ascii_case(name));
        Ok(())
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.attr(id, "class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or_default()
    }

    /// Ancestors of `id`, nearest first, excluding `id`.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |current| self.parent(*current))
    }

    /// Descendants of `scope` in document order, excluding `scope`.
    pub fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(scope).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    /// Whether `node` is `ancestor` or one of its descendants.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        node == ancestor || self.ancestors(node).any(|a| a == ancestor)
    }

    /// Whether `id` is still attached to the document root.
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.contains(self.root(), id)
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeData::Element(ElementData {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            value: None,
        }))
    }

    pub(crate) fn create_element_with_attrs(&mut self, tag: &str, attrs: Vec<(String, String)>) -> NodeId {
        self.push(NodeData::Element(ElementData {
            tag: tag.to_ascii_lowercase(),
            attrs,
            value: None,
        }))
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeData::Text(text.into()))
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            data,
            bounding_box: None,
        });
        id
    }

    /// Attach without notifying observers (document construction).
    pub(crate) fn link(&mut self, parent: NodeId, child: NodeId) {
        if let Some(node) = self.nodes.get_mut(child.0) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(parent.0) {
            node.children.push(child);
        }
    }

    fn detach(&mut self, id: NodeId) -> Option<NodeId> {
        let parent = self.nodes.get_mut(id.0)?.parent.take()?;
        if let Some(node) = self.nodes.get_mut(parent.0) {
            node.children.retain(|c| *c != id);
        }
        Some(parent)
    }

    /// Append `child` to `parent`, moving it if it is already attached.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.node_mut(parent)?;
        self.node_mut(child)?;
        if self.contains(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }

        if let Some(old_parent) = self.detach(child) {
            self.notify(MutationRecord {
                target: old_parent,
                added: Vec::new(),
                removed: vec![child],
            });
        }
        self.link(parent, child);
        self.notify(MutationRecord {
            target: parent,
            added: vec![child],
            removed: Vec::new(),
        });
        Ok(())
    }

    /// Detach `id` (and its subtree) from its parent.
    pub fn remove(&mut self, id: NodeId) -> Result<(), DomError> {
        self.node_mut(id)?;
        if let Some(parent) = self.detach(id) {
            self.notify(MutationRecord {
                target: parent,
                added: Vec::new(),
                removed: vec![id],
            });
        }
        Ok(())
    }

    /// Replace every child of `id` with `children`.
    pub fn replace_children(&mut self, id: NodeId, children: Vec<NodeId>) -> Result<(), DomError> {
        self.node_mut(id)?;
        for child in &children {
            self.node_mut(*child)?;
            if self.contains(*child, id) {
                return Err(DomError::HierarchyRequest { parent: id, child: *child });
            }
        }

        let removed = std::mem::take(&mut self.node_mut(id)?.children);
        for old in &removed {
            if let Some(node) = self.nodes.get_mut(old.0) {
                node.parent = None;
            }
        }
        for child in &children {
            self.detach(*child);
            self.link(id, *child);
        }
        self.notify(MutationRecord {
            target: id,
            added: children,
            removed,
        });
        Ok(())
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(NodeData::Text(text)) = self.data(id) {
            return text.clone();
        }
        self.descendants(id)
            .into_iter()
            .filter_map(|d| match self.data(d) {
                Some(NodeData::Text(text)) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Text content with whitespace runs collapsed to single spaces, trimmed.
    pub fn readable_text(&self, id: NodeId) -> String {
        self.text_content(id).split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// `input` or `textarea`.
    pub fn is_text_control(&self, id: NodeId) -> bool {
        matches!(self.tag_name(id), Some("input" | "textarea"))
    }

    /// Elements that accept typed text.
    pub fn is_editable(&self, id: NodeId) -> bool {
        self.is_text_control(id)
            || self.attr(id, "contenteditable").is_some_and(|v| v.is_empty() || v.eq_ignore_ascii_case("true"))
            || self.attr(id, "role") == Some("textbox")
    }

    /// Current value of a text control.
    pub fn value(&self, id: NodeId) -> Option<String> {
        let element = self.element(id)?;
        if let Some(value) = &element.value {
            return Some(value.clone());
        }
        match element.tag.as_str() {
            "input" => Some(self.attr(id, "value").unwrap_or_default().to_string()),
            "textarea" => Some(self.text_content(id)),
            _ => None,
        }
    }

    pub fn set_value(&mut self, id: NodeId, value: impl Into<String>) -> Result<(), DomError> {
        if !self.is_text_control(id) {
            return Err(DomError::NotATextControl(id));
        }
        self.element_mut(id)?.value = Some(value.into());
        Ok(())
    }

    pub fn bounding_box(&self, id: NodeId) -> BoundingBox {
        self.node(id).and_then(|n| n.bounding_box).unwrap_or_default()
    }

    pub fn set_bounding_box(&mut self, id: NodeId, bounding_box: BoundingBox) -> Result<(), DomError> {
        self.node_mut(id)?.bounding_box = Some(bounding_box);
        Ok(())
    }

    /// Dispatch a bubbling synthetic event on `target`.
    pub fn dispatch_event(&mut self, target: NodeId, kind: EventKind) {
        trace!(target = %target, event = kind.as_str(), "dispatch");
        if self.events.len() == EVENT_LOG_CAPACITY {
            self.events.pop_front();
        }
        self.events.push_back(DomEvent {
            target,
            kind,
            bubbles: true,
        });
    }

    /// Dispatched events, oldest first, bounded by [`EVENT_LOG_CAPACITY`].
    pub fn events(&self) -> &VecDeque<DomEvent> {
        &self.events
    }

    /// Take the event log, leaving it empty.
    pub fn drain_events(&mut self) -> Vec<DomEvent> {
        self.events.drain(..).collect()
    }

    pub fn events_for(&self, target: NodeId) -> Vec<EventKind> {
        self.events.iter().filter(|e| e.target == target).map(|e| e.kind).collect()
    }

    pub fn matches(&self, id: NodeId, selector: &Selector) -> bool {
        selector.matches(self, id)
    }

    /// Matching descendants of `scope`, in document order.
    pub fn query_selector_all(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|id| selector.matches(self, *id))
            .collect()
    }

    pub fn query_selector(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|id| selector.matches(self, *id))
    }

    /// Parse `selector` and match it against the whole document.
    pub fn select(&self, selector: &str) -> Result<Vec<NodeId>, DomError> {
        let selector = Selector::parse(selector)?;
        Ok(self.query_selector_all(self.root(), &selector))
    }

    /// Nearest inclusive ancestor matching `selector`.
    pub fn closest(&self, id: NodeId, selector: &Selector) -> Option<NodeId> {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find(|candidate| selector.matches(self, *candidate))
    }

    /// Subscribe to structural mutations.
    pub fn observe(&mut self) -> MutationObserver {
        let (tx, rx) = mpsc::unbounded_channel();
        self.observers.push(tx);
        MutationObserver { records: rx }
    }

    fn notify(&mut self, record: MutationRecord) {
        self.observers.retain(|tx| tx.send(record.clone()).is_ok());
    }
}

/// Receiving side of [`Document::observe`].
pub struct MutationObserver {
    records: mpsc::UnboundedReceiver<MutationRecord>,
}

impl MutationObserver {
    /// Next record; `None` once the document is dropped.
    pub async fn recv(&mut self) -> Option<MutationRecord> {
        self.records.recv().await
    }

    pub fn try_recv(&mut self) -> Option<MutationRecord> {
        self.records.try_recv().ok()
    }
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
