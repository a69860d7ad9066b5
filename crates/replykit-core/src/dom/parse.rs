//! HTML parsing into a [`Document`].

use scraper::{Html, Node as HtmlNode};

use super::document::Document;

impl Document {
    /// Parse a full HTML page. Parsing is lenient and never fails; malformed
    /// markup is repaired the way browsers do.
    pub fn parse(html: &str) -> Self {
        let html = Html::parse_document(html);
        let mut doc = Document::empty();

        let mut stack = vec![(html.tree.root(), doc.root())];
        while let Some((source, target)) = stack.pop() {
            let mut pending = Vec::new();
            for child in source.children() {
                let id = match child.value() {
                    HtmlNode::Element(element) => {
                        let attrs = element
                            .attrs()
                            .map(|(name, value)| (name.to_ascii_lowercase(), value.to_string()))
                            .collect();
                        doc.create_element_with_attrs(element.name(), attrs)
                    }
                    HtmlNode::Text(text) => {
                        let text: &str = text;
                        doc.create_text(text)
                    }
                    _ => continue,
                };
                doc.link(target, id);
                pending.push((child, id));
            }
            stack.extend(pending.into_iter().rev());
        }

        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_builds_tree() {
        let doc = Document::parse("<p class='a b'>Hello <b>world</b></p><!-- note -->");
        let body = doc.body().unwrap();
        let p = doc.children(body)[0];
        assert_eq!(doc.tag_name(p), Some("p"));
        assert!(doc.has_class(p, "b"));
        assert_eq!(doc.text_content(p), "Hello world");
        assert_eq!(doc.parent(p), Some(body));
    }

    #[test]
    fn test_parse_keeps_attributes_and_textarea_content() {
        let doc = Document::parse(r#"<textarea data-x="1">draft</textarea><input value="v">"#);
        let textarea = doc.select("textarea").unwrap()[0];
        let input = doc.select("input").unwrap()[0];
        assert_eq!(doc.attr(textarea, "data-x"), Some("1"));
        assert_eq!(doc.value(textarea).as_deref(), Some("draft"));
        assert_eq!(doc.value(input).as_deref(), Some("v"));
    }

    #[test]
    fn test_parse_repairs_fragments() {
        let doc = Document::parse("<div>unclosed");
        assert!(doc.body().is_some());
        assert_eq!(doc.select("div").unwrap().len(), 1);
    }
}
