//! Site profiles: selectors, labels and budgets per site.

use std::sync::Arc;

/// Base selectors for editable fields on every site.
pub const FIELD_SELECTORS: &[&str] = &["textarea", r#"div[contenteditable="true"]"#, r#"[role="textbox"]"#];

/// Site-specific heuristics used by the field scanner and the context
/// extractor. Selector lists are tried in order; the first hit wins.
pub trait SiteProfile: Send + Sync {
    fn name(&self) -> &'static str;

    /// Selectors for editable fields, base selectors included.
    fn field_selectors(&self) -> Vec<&'static str> {
        FIELD_SELECTORS.to_vec()
    }

    /// The question/post being discussed, tried while walking up.
    fn question_selectors(&self) -> &[&'static str];

    /// The content being replied to, tried while walking up.
    fn content_selectors(&self) -> &[&'static str];

    /// Document-wide question lookup used when the walk found none.
    fn page_question_selectors(&self) -> &[&'static str];

    fn question_label(&self) -> &'static str;

    fn content_label(&self) -> &'static str;

    /// Character budget of the question piece.
    fn question_budget(&self) -> usize;

    /// Character budget of the content piece.
    fn content_budget(&self) -> usize;

    /// Maximum number of ancestors visited from the field.
    fn max_levels(&self) -> usize;
}

pub struct QuoraProfile;

impl SiteProfile for QuoraProfile {
    fn name(&self) -> &'static str {
        "quora"
    }

    fn question_selectors(&self) -> &[&'static str] {
        &[".puppeteer_test_question_title", ".q-text.qu-display--block"]
    }

    fn content_selectors(&self) -> &[&'static str] {
        &[
            ".Answer__content",
            ".Answer .q-text",
            r#"[data-post-type="answer"] .q-text"#,
        ]
    }

    fn page_question_selectors(&self) -> &[&'static str] {
        &[".q-text.qu-display--block", ".puppeteer_test_question_title", "h1"]
    }

    fn question_label(&self) -> &'static str {
        "Question:"
    }

    fn content_label(&self) -> &'static str {
        "Réponse:"
    }

    fn question_budget(&self) -> usize {
        300
    }

    fn content_budget(&self) -> usize {
        400
    }

    fn max_levels(&self) -> usize {
        15
    }
}

pub struct RedditProfile;

impl SiteProfile for RedditProfile {
    fn name(&self) -> &'static str {
        "reddit"
    }

    fn field_selectors(&self) -> Vec<&'static str> {
        let mut selectors = FIELD_SELECTORS.to_vec();
        selectors.push(".public-DraftEditor-content");
        selectors
    }

    fn question_selectors(&self) -> &[&'static str] {
        &[r#"[data-testid="post-title"]"#, "shreddit-post h1"]
    }

    fn content_selectors(&self) -> &[&'static str] {
        &[
            r#"[data-testid="comment"] .md"#,
            r#"[data-testid="comment"] p"#,
            ".Comment .md",
            ".thing .md",
            ".RichTextJSON-root",
        ]
    }

    fn page_question_selectors(&self) -> &[&'static str] {
        &[r#"[data-testid="post-title"]"#, "h1"]
    }

    fn question_label(&self) -> &'static str {
        "Post:"
    }

    fn content_label(&self) -> &'static str {
        "Commentaire:"
    }

    fn question_budget(&self) -> usize {
        300
    }

    fn content_budget(&self) -> usize {
        500
    }

    fn max_levels(&self) -> usize {
        30
    }
}

/// Fallback for sites without a dedicated profile.
pub struct GenericProfile;

impl SiteProfile for GenericProfile {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn question_selectors(&self) -> &[&'static str] {
        &[]
    }

    fn content_selectors(&self) -> &[&'static str] {
        &["blockquote", "article p", "p"]
    }

    fn page_question_selectors(&self) -> &[&'static str] {
        &["h1"]
    }

    fn question_label(&self) -> &'static str {
        "Contexte:"
    }

    fn content_label(&self) -> &'static str {
        "Contexte:"
    }

    fn question_budget(&self) -> usize {
        300
    }

    fn content_budget(&self) -> usize {
        500
    }

    fn max_levels(&self) -> usize {
        10
    }
}

/// Pick the profile for a page host.
pub fn profile_for_host(host: Option<&str>) -> Arc<dyn SiteProfile> {
    let host = host.unwrap_or_default().to_ascii_lowercase();
    if host_matches(&host, "quora.com") {
        Arc::new(QuoraProfile)
    } else if host_matches(&host, "reddit.com") {
        Arc::new(RedditProfile)
    } else {
        Arc::new(GenericProfile)
    }
}

fn host_matches(host: &str, domain: &str) -> bool {
    host == domain || host.ends_with(&format!(".{domain}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Selector;

    #[test]
    fn test_profile_for_host() {
        assert_eq!(profile_for_host(Some("www.quora.com")).name(), "quora");
        assert_eq!(profile_for_host(Some("fr.quora.com")).name(), "quora");
        assert_eq!(profile_for_host(Some("old.reddit.com")).name(), "reddit");
        assert_eq!(profile_for_host(Some("reddit.com")).name(), "reddit");
        assert_eq!(profile_for_host(Some("notreddit.com")).name(), "generic");
        assert_eq!(profile_for_host(None).name(), "generic");
    }

    #[test]
    fn test_reddit_adds_draft_editor() {
        let selectors = RedditProfile.field_selectors();
        assert!(selectors.contains(&".public-DraftEditor-content"));
        assert!(selectors.contains(&"textarea"));
        assert!(!QuoraProfile.field_selectors().contains(&".public-DraftEditor-content"));
    }

    #[test]
    fn test_all_selectors_parse() {
        let profiles: [&dyn SiteProfile; 3] = [&QuoraProfile, &RedditProfile, &GenericProfile];
        for profile in profiles {
            let all = profile
                .field_selectors()
                .into_iter()
                .chain(profile.question_selectors().iter().copied())
                .chain(profile.content_selectors().iter().copied())
                .chain(profile.page_question_selectors().iter().copied());
            for selector in all {
                assert!(Selector::parse(selector).is_ok(), "{}: {selector}", profile.name());
            }
        }
    }
}
