//! Writing generated text back into a page field.

use tracing::debug;

use crate::dom::{Document, EventKind, NodeId};
use crate::error::DomError;

/// Put `text` into `field` and notify the host page.
///
/// Text controls get their value assigned. Rich-text fields get their
/// children replaced by the text, one `<br>` per newline. `input`, `change`
/// and `keyup` are then dispatched so page frameworks pick up the change.
pub fn insert_text(doc: &mut Document, field: NodeId, text: &str) -> Result<(), DomError> {
    if doc.is_text_control(field) {
        doc.set_value(field, text)?;
    } else if doc.is_element(field) {
        let mut children = Vec::new();
        for (index, line) in text.split('\n').enumerate() {
            if index > 0 {
                children.push(doc.create_element("br"));
            }
            let line = line.strip_suffix('\r').unwrap_or(line);
            if !line.is_empty() {
                children.push(doc.create_text(line));
            }
        }
        doc.replace_children(field, children)?;
    } else {
        return Err(DomError::NotAnElement(field));
    }

    for kind in [EventKind::Input, EventKind::Change, EventKind::Keyup] {
        doc.dispatch_event(field, kind);
    }
    debug!(field = %field, chars = text.chars().count(), "reply inserted");
    Ok(())
}
