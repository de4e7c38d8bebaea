//! Markup stripping for raw product descriptions

use scraper::{ElementRef, Html, Node};

/// Elements whose text never reaches the cleaned description
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Elements that separate words when rendered
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav",
    "ol", "p", "pre", "section", "table", "tbody", "td", "tfoot", "th", "thead", "tr", "ul",
];

/// Strip markup from a description and collapse whitespace
///
/// Entities are decoded by the HTML parser, block-level boundaries become
/// spaces, and every whitespace run is folded into a single space.
pub fn clean_html(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }

    let fragment = Html::parse_fragment(raw);
    let mut text = String::with_capacity(raw.len());
    push_text(fragment.root_element(), &mut text);

    collapse_whitespace(&text)
}

/// Fold whitespace runs into single spaces and trim both ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn push_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                let name = el.name();
                if SKIPPED_ELEMENTS.contains(&name) {
                    continue;
                }

                let block = BLOCK_ELEMENTS.contains(&name);
                if block {
                    out.push(' ');
                }
                if let Some(child_element) = ElementRef::wrap(child) {
                    push_text(child_element, out);
                }
                if block {
                    out.push(' ');
                }
            }
            _ => {}
        }
    }
}
