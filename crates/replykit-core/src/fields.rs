//! Field registry: one affordance per live editable field.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::context::SiteProfile;
use crate::dom::{Document, NodeId, Selector};
use crate::error::DomError;

pub const ICON_CLASS: &str = "ai-gen-icon";
/// Marker set on fields that received an icon.
pub const MARKER_ATTR: &str = "data-ai-icon-added";
/// Back-reference from an icon to its field.
pub const FOR_ATTR: &str = "data-ai-for";
/// Fields inside the reply modal are never decorated.
pub const MODAL_SELECTOR: &str = ".ai-modal";

const ICON_TITLE: &str = "Générer avec AI";

/// Tracks decorated fields by node identity.
///
/// Registrations of nodes that left the document are pruned on the next
/// scan, so a replacement element is always registered anew.
pub struct FieldRegistry {
    selectors: Vec<Selector>,
    modal: Selector,
    icons: HashMap<NodeId, NodeId>,
}

impl FieldRegistry {
    pub fn new(profile: &dyn SiteProfile) -> Result<Self, DomError> {
        let selectors = profile
            .field_selectors()
            .into_iter()
            .map(Selector::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            selectors,
            modal: Selector::parse(MODAL_SELECTOR)?,
            icons: HashMap::new(),
        })
    }

    /// Decorate every matching field that has no icon yet.
    ///
    /// Idempotent: returns the fields decorated by this call.
    pub fn scan(&mut self, doc: &mut Document) -> Result<Vec<NodeId>, DomError> {
        self.prune(doc)?;

        let mut attached = Vec::new();
        for field in self.candidates(doc) {
            if self.icons.contains_key(&field) || doc.closest(field, &self.modal).is_some() {
                continue;
            }
            let Some(parent) = doc.parent(field) else {
                continue;
            };

            let icon = doc.create_element("button");
            doc.set_attr(icon, "class", ICON_CLASS)?;
            doc.set_attr(icon, "type", "button")?;
            doc.set_attr(icon, "title", ICON_TITLE)?;
            doc.set_attr(icon, FOR_ATTR, field.to_string())?;
            doc.append_child(parent, icon)?;
            doc.set_attr(field, MARKER_ATTR, "true")?;

            self.icons.insert(field, icon);
            attached.push(field);
        }

        if !attached.is_empty() {
            debug!(count = attached.len(), total = self.icons.len(), "attached reply icons");
        }
        Ok(attached)
    }

    /// Candidate fields, each listed once.
    fn candidates(&self, doc: &Document) -> Vec<NodeId> {
        let mut seen = HashSet::new();
        self.selectors
            .iter()
            .flat_map(|selector| doc.query_selector_all(doc.root(), selector))
            .filter(|id| seen.insert(*id))
            .collect()
    }

    /// Drop registrations whose field or icon left the document.
    ///
    /// A live field that lost its icon is unmarked so the same scan decorates
    /// it again.
    fn prune(&mut self, doc: &mut Document) -> Result<(), DomError> {
        let stale: Vec<(NodeId, NodeId)> = self
            .icons
            .iter()
            .filter(|(field, icon)| !doc.is_connected(**field) || !doc.is_connected(**icon))
            .map(|(field, icon)| (*field, *icon))
            .collect();

        for (field, icon) in stale {
            self.icons.remove(&field);
            if doc.is_connected(icon) {
                doc.remove(icon)?;
            }
            if doc.is_connected(field) {
                debug!(field = %field, "reply icon lost, re-attaching");
                doc.remove_attr(field, MARKER_ATTR)?;
            }
        }
        Ok(())
    }

    pub fn is_registered(&self, field: NodeId) -> bool {
        self.icons.contains_key(&field)
    }

    pub fn icon_for(&self, field: NodeId) -> Option<NodeId> {
        self.icons.get(&field).copied()
    }

    /// The registered field an icon (or a node inside it) belongs to.
    pub fn field_for_icon(&self, doc: &Document, target: NodeId) -> Option<NodeId> {
        std::iter::once(target)
            .chain(doc.ancestors(target))
            .find(|id| doc.has_class(*id, ICON_CLASS))
            .and_then(|icon| doc.attr(icon, FOR_ATTR))
            .and_then(NodeId::from_attr)
            .filter(|field| self.icons.contains_key(field))
    }

    /// Registered fields, in creation order.
    pub fn fields(&self) -> Vec<NodeId> {
        let mut fields: Vec<NodeId> = self.icons.keys().copied().collect();
        fields.sort();
        fields
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

#[cfg(test)]
#[path = "fields_tests.rs"]
mod tests;
