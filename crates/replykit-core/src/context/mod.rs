//! Context extraction: the text a generated reply should answer.

mod profile;

pub use profile::{
    profile_for_host, GenericProfile, QuoraProfile, RedditProfile, SiteProfile, FIELD_SELECTORS,
};

use std::sync::Arc;

use tracing::{debug, warn};

use crate::dom::{Document, NodeId, Selector};

/// Locates the question and the content near a field.
pub struct ContextExtractor {
    profile: Arc<dyn SiteProfile>,
}

impl ContextExtractor {
    pub fn new(profile: Arc<dyn SiteProfile>) -> Self {
        Self { profile }
    }

    /// Extractor for the profile matching the document's host.
    pub fn for_document(doc: &Document) -> Self {
        Self::new(profile_for_host(doc.host()))
    }

    pub fn profile(&self) -> &dyn SiteProfile {
        self.profile.as_ref()
    }

    /// Labelled pieces joined by a blank line, or an empty string when
    /// nothing was found.
    pub fn extract(&self, doc: &Document, field: NodeId) -> String {
        let profile = self.profile.as_ref();
        let question_selectors = compile(profile.question_selectors());
        let content_selectors = compile(profile.content_selectors());

        let mut question = None;
        let mut content = None;

        for ancestor in doc.ancestors(field).take(profile.max_levels()) {
            if question.is_none() {
                question = first_match(doc, ancestor, field, &question_selectors, None);
            }
            if content.is_none() {
                content = first_match(doc, ancestor, field, &content_selectors, question);
            }
            if question.is_some() && content.is_some() {
                break;
            }
        }

        if question.is_none() {
            let page_selectors = compile(profile.page_question_selectors());
            question = first_match(doc, doc.root(), field, &page_selectors, content);
        }

        let mut pieces = Vec::new();
        if let Some(node) = question {
            push_piece(&mut pieces, profile.question_label(), doc.readable_text(node), profile.question_budget());
        }
        if let Some(node) = content {
            push_piece(&mut pieces, profile.content_label(), doc.readable_text(node), profile.content_budget());
        }

        debug!(
            site = profile.name(),
            field = %field,
            question = question.is_some(),
            content = content.is_some(),
            "context extracted"
        );
        pieces.join("\n\n")
    }
}

fn compile(selectors: &[&str]) -> Vec<Selector> {
    selectors
        .iter()
        .filter_map(|s| match Selector::parse(s) {
            Ok(selector) => Some(selector),
            Err(e) => {
                warn!(error = %e, "skipping selector");
                None
            }
        })
        .collect()
}

/// First node under `scope` matching the prioritized `selectors` that is
/// not `exclude`, is unrelated to the field (neither an ancestor nor inside
/// it), and has readable text.
fn first_match(
    doc: &Document,
    scope: NodeId,
    field: NodeId,
    selectors: &[Selector],
    exclude: Option<NodeId>,
) -> Option<NodeId> {
    selectors.iter().find_map(|selector| {
        doc.query_selector_all(scope, selector).into_iter().find(|candidate| {
            Some(*candidate) != exclude
                && !doc.contains(*candidate, field)
                && !doc.contains(field, *candidate)
                && !doc.readable_text(*candidate).is_empty()
        })
    })
}

fn push_piece(pieces: &mut Vec<String>, label: &str, text: String, budget: usize) {
    if text.is_empty() {
        return;
    }
    pieces.push(format!("{label} {}", truncate_chars(&text, budget)));
}

/// First `max` characters of `text`.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

#[cfg(test)]
#[path = "extractor_tests.rs"]
mod tests;
