//! Markup rendering of an annotated tree.
//!
//! Branches become labelled wrapper elements; leaves become labelled value
//! elements styled by their classification. A leaf with no value, or a
//! blank one, renders as an empty row so both views keep the same row count.

use crate::annotate::AnnotatedTree;
use crate::merge::Classification;

/// Render the children of `tree` as an HTML fragment.
///
/// The root itself has no label; only its children are emitted.
pub fn render_markup(tree: &AnnotatedTree) -> String {
    let mut out = String::new();
    for (key, child) in tree.children() {
        render_node(&mut out, key, child);
    }
    out
}

fn render_node(out: &mut String, key: &str, node: &AnnotatedTree) {
    let key = escape(key);
    match node {
        AnnotatedTree::Branch { children } => {
            out.push_str(&format!("<div class='tag'><small>&lt;{key}&gt;</small>"));
            for (child_key, child) in children {
                render_node(out, child_key, child);
            }
            out.push_str(&format!("<small>&lt;/{key}&gt;</small></div>"));
        }
        AnnotatedTree::Leaf {
            value,
            classification,
        } => {
            let class = match css_class(*classification) {
                "" => "tag".to_string(),
                c => format!("tag {c}"),
            };
            match value.as_ref().filter(|v| !v.is_blank()) {
                Some(v) => out.push_str(&format!(
                    "<div class='{class}'><small>&lt;{key}&gt;</small>{}<small>&lt;/{key}&gt;</small></div>",
                    escape(&v.as_text())
                )),
                None => out.push_str(&format!("<div class='{class}'><br></div>")),
            }
        }
    }
}

/// CSS class for a classification; unchanged lines are unstyled.
pub fn css_class(classification: Classification) -> &'static str {
    match classification {
        Classification::Unchanged => "",
        Classification::Changed => "changed",
        Classification::Added => "added",
        Classification::Deleted => "deleted",
    }
}

/// Escape markup special characters in text and attribute content.
fn escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '&' => result.push_str("&amp;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}
