use super::*;

const QUORA_PAGE: &str = r#"<html><body>
    <div class="q-box">
        <div class="q-text qu-display--block puppeteer_test_question_title">
            Quelle est la meilleure façon d'apprendre Rust ?
        </div>
        <div class="Answer">
            <div class="Answer__content"><p>Lisez le livre officiel,</p> <p>puis écrivez   beaucoup de code.</p></div>
            <div class="comment-box"><textarea id="field"></textarea></div>
        </div>
    </div>
</body></html>"#;

const REDDIT_PAGE: &str = r#"<html><body>
    <shreddit-post>
        <h1 data-testid="post-title">Is the borrow checker worth it?</h1>
        <div data-testid="comment">
            <div class="md"><p>Great point about lifetimes.</p></div>
            <div class="reply">
                <div class="public-DraftEditor-content" contenteditable="true" id="field"></div>
            </div>
        </div>
    </shreddit-post>
</body></html>"#;

fn field(doc: &Document) -> NodeId {
    doc.select("#field").unwrap()[0]
}

fn extract(page: &str, url: &str) -> String {
    let doc = Document::parse(page).with_url(url).unwrap();
    ContextExtractor::for_document(&doc).extract(&doc, field(&doc))
}

#[test]
fn test_quora_question_and_answer() {
    let context = extract(QUORA_PAGE, "https://www.quora.com/q");
    assert_eq!(
        context,
        "Question: Quelle est la meilleure façon d'apprendre Rust ?\n\n\
         Réponse: Lisez le livre officiel, puis écrivez beaucoup de code."
    );
}

#[test]
fn test_reddit_post_and_comment() {
    let context = extract(REDDIT_PAGE, "https://www.reddit.com/r/rust/comments/1");
    assert_eq!(
        context,
        "Post: Is the borrow checker worth it?\n\nCommentaire: Great point about lifetimes."
    );
}

#[test]
fn test_pieces_are_truncated_to_budget() {
    let question = "q".repeat(1000);
    let answer = "mot ".repeat(300);
    let page = format!(
        r#"<div class="puppeteer_test_question_title">{question}</div>
           <div class="Answer"><div class="Answer__content">{answer}</div><textarea id="field"></textarea></div>"#
    );
    let context = extract(&page, "https://quora.com/x");
    let (q, a) = context.split_once("\n\n").unwrap();

    assert_eq!(q, format!("Question: {}", "q".repeat(300)));
    let answer_text = a.strip_prefix("Réponse: ").unwrap();
    assert_eq!(answer_text.chars().count(), 400);
    assert!(answer_text.starts_with("mot mot"));
}

#[test]
fn test_page_level_question_fallback() {
    let page = r#"<h1>Pourquoi le ciel est-il bleu ?</h1>
        <div class="Answer"><div class="Answer__content">La diffusion Rayleigh.</div>
        <textarea id="field"></textarea></div>"#;
    let context = extract(page, "https://quora.com/x");
    assert!(context.starts_with("Question: Pourquoi le ciel est-il bleu ?"));
    assert!(context.ends_with("Réponse: La diffusion Rayleigh."));
}

#[test]
fn test_nodes_containing_the_field_are_excluded() {
    let page = r#"<div class="Answer"><div class="Answer__content">Draft <textarea id="field">typed text</textarea></div></div>"#;
    let context = extract(page, "https://quora.com/x");
    assert_eq!(context, "");
}

#[test]
fn test_nodes_inside_the_field_are_excluded() {
    let page = r#"<article><p>Original post text.</p>
        <div id="field" contenteditable="true"><p>my draft</p></div></article>"#;
    let context = extract(page, "https://example.org/blog");
    assert_eq!(context, "Contexte: Original post text.");
}

#[test]
fn test_empty_when_nothing_located() {
    let context = extract("<div><textarea id='field'></textarea></div>", "https://quora.com/x");
    assert_eq!(context, "");
}

struct ShallowProfile;

impl SiteProfile for ShallowProfile {
    fn name(&self) -> &'static str {
        "shallow"
    }
    fn question_selectors(&self) -> &[&'static str] {
        &[]
    }
    fn content_selectors(&self) -> &[&'static str] {
        &["blockquote"]
    }
    fn page_question_selectors(&self) -> &[&'static str] {
        &[]
    }
    fn question_label(&self) -> &'static str {
        "Q:"
    }
    fn content_label(&self) -> &'static str {
        "C:"
    }
    fn question_budget(&self) -> usize {
        10
    }
    fn content_budget(&self) -> usize {
        10
    }
    fn max_levels(&self) -> usize {
        1
    }
}

#[test]
fn test_walk_stops_at_level_cap() {
    let page = r#"<blockquote>far away</blockquote>
        <div><div><textarea id="field"></textarea></div></div>"#;
    let doc = Document::parse(page);
    let extractor = ContextExtractor::new(Arc::new(ShallowProfile));
    assert_eq!(extractor.extract(&doc, field(&doc)), "");

    let near = Document::parse(r#"<div><blockquote>near</blockquote><textarea id="field"></textarea></div>"#);
    assert_eq!(extractor.extract(&near, field(&near)), "C: near");
}

#[test]
fn test_truncate_chars_respects_char_boundaries() {
    assert_eq!(truncate_chars("éèàù", 2), "éè");
    assert_eq!(truncate_chars("abc", 10), "abc");
    assert_eq!(truncate_chars("", 3), "");
}
