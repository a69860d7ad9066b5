//! CSS selectors over the arena document.
//!
//! Parsing reuses `scraper`'s selector dialect (full selectors level 4 minus
//! the stateful pseudo-classes); matching runs servo's `selectors` engine
//! against [`PageElement`] handles.

use std::fmt;

use cssparser::{Parser as CssParser, ParserInput};
use scraper::error::SelectorErrorKind;
use scraper::selector::{CssLocalName, CssString, NonTSPseudoClass, Parser as SelectorParser, PseudoElement, Simple};
use selectors::attr::{AttrSelectorOperation, CaseSensitivity, NamespaceConstraint};
use selectors::matching::{
    self, ElementSelectorFlags, IgnoreNthChildForInvalidation, MatchingContext, MatchingMode, NeedsSelectorFlags,
    QuirksMode,
};
use selectors::parser::{ParseRelative, SelectorImpl, SelectorList};
use selectors::{Element, NthIndexCache, OpaqueElement};

use crate::error::DomError;

use super::document::{Document, ElementData, NodeData};
use super::types::NodeId;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// A parsed selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    list: SelectorList<Simple>,
}

impl Selector {
    pub fn parse(source: &str) -> Result<Self, DomError> {
        let mut input = ParserInput::new(source);
        let mut parser = CssParser::new(&mut input);
        let list = SelectorList::parse(&SelectorParser, &mut parser, ParseRelative::No).map_err(|e| {
            DomError::InvalidSelector {
                selector: source.to_string(),
                reason: SelectorErrorKind::from(e).to_string(),
            }
        })?;
        Ok(Self {
            source: source.to_string(),
            list,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether the element `id` matches any selector of the list.
    pub fn matches(&self, doc: &Document, id: NodeId) -> bool {
        let Some(element) = PageElement::wrap(doc, id) else {
            return false;
        };
        let mut nth_cache = NthIndexCache::default();
        let mut context = MatchingContext::new(
            MatchingMode::Normal,
            None,
            &mut nth_cache,
            QuirksMode::NoQuirks,
            NeedsSelectorFlags::No,
            IgnoreNthChildForInvalidation::No,
        );
        self.list
            .0
            .iter()
            .any(|selector| matching::matches_selector(selector, 0, None, &element, &mut context))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Borrowed view of one element, as seen by the matching engine.
#[derive(Clone, Copy)]
struct PageElement<'a> {
    doc: &'a Document,
    id: NodeId,
    data: &'a ElementData,
}

impl<'a> PageElement<'a> {
    fn wrap(doc: &'a Document, id: NodeId) -> Option<Self> {
        match doc.data(id)? {
            NodeData::Element(data) => Some(Self { doc, id, data }),
            _ => None,
        }
    }

    fn siblings(&self) -> (&'a [NodeId], usize) {
        let siblings = self.doc.parent(self.id).map(|p| self.doc.children(p)).unwrap_or_default();
        let index = siblings.iter().position(|s| *s == self.id).unwrap_or_default();
        (siblings, index)
    }

    fn first_element(&self, mut ids: impl Iterator<Item = NodeId>) -> Option<Self> {
        ids.find_map(|id| Self::wrap(self.doc, id))
    }
}

impl fmt::Debug for PageElement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} #{}>", self.data.tag(), self.id)
    }
}

impl Element for PageElement<'_> {
    type Impl = Simple;

    fn opaque(&self) -> OpaqueElement {
        OpaqueElement::new(self.data)
    }

    fn parent_element(&self) -> Option<Self> {
        self.doc.parent(self.id).and_then(|p| Self::wrap(self.doc, p))
    }

    fn parent_node_is_shadow_root(&self) -> bool {
        false
    }

    fn containing_shadow_host(&self) -> Option<Self> {
        None
    }

    fn is_pseudo_element(&self) -> bool {
        false
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        let (siblings, index) = self.siblings();
        self.first_element(siblings[..index].iter().rev().copied())
    }

    fn next_sibling_element(&self) -> Option<Self> {
        let (siblings, index) = self.siblings();
        self.first_element(siblings.iter().skip(index + 1).copied())
    }

    fn first_element_child(&self) -> Option<Self> {
        self.first_element(self.doc.children(self.id).iter().copied())
    }

    fn is_html_element_in_html_document(&self) -> bool {
        true
    }

    fn has_local_name(&self, local_name: &CssLocalName) -> bool {
        self.data.tag() == &*local_name.0
    }

    fn has_namespace(&self, ns: &<Simple as SelectorImpl>::BorrowedNamespaceUrl) -> bool {
        let ns: &str = ns;
        ns.is_empty() || ns == HTML_NAMESPACE
    }

    fn is_same_type(&self, other: &Self) -> bool {
        self.data.tag() == other.data.tag()
    }

    fn attr_matches(
        &self,
        ns: &NamespaceConstraint<&<Simple as SelectorImpl>::NamespaceUrl>,
        local_name: &CssLocalName,
        operation: &AttrSelectorOperation<&CssString>,
    ) -> bool {
        if let NamespaceConstraint::Specific(url) = ns {
            let url: &str = url;
            if !url.is_empty() {
                return false;
            }
        }
        self.data
            .attrs()
            .any(|(name, value)| name == &*local_name.0 && operation.eval_str(value))
    }

    fn match_non_ts_pseudo_class(&self, _pc: &NonTSPseudoClass, _context: &mut MatchingContext<'_, Simple>) -> bool {
        false
    }

    fn match_pseudo_element(&self, _pe: &PseudoElement, _context: &mut MatchingContext<'_, Simple>) -> bool {
        false
    }

    fn apply_selector_flags(&self, _flags: ElementSelectorFlags) {}

    fn is_link(&self) -> bool {
        matches!(self.data.tag(), "a" | "area" | "link") && self.doc.attr(self.id, "href").is_some()
    }

    fn is_html_slot_element(&self) -> bool {
        false
    }

    fn has_id(&self, id: &CssLocalName, case_sensitivity: CaseSensitivity) -> bool {
        self.doc
            .attr(self.id, "id")
            .is_some_and(|value| case_sensitivity.eq(id.0.as_bytes(), value.as_bytes()))
    }

    fn has_class(&self, name: &CssLocalName, case_sensitivity: CaseSensitivity) -> bool {
        self.doc.attr(self.id, "class").is_some_and(|classes| {
            classes
                .split_whitespace()
                .any(|class| case_sensitivity.eq(name.0.as_bytes(), class.as_bytes()))
        })
    }

    fn imported_part(&self, _name: &CssLocalName) -> Option<CssLocalName> {
        None
    }

    fn is_part(&self, _name: &CssLocalName) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        !self.doc.children(self.id).iter().any(|child| match self.doc.data(*child) {
            Some(NodeData::Element(_)) => true,
            Some(NodeData::Text(text)) => !text.is_empty(),
            _ => false,
        })
    }

    fn is_root(&self) -> bool {
        self.doc.parent(self.id) == Some(self.doc.root())
    }
}
