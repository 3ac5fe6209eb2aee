//! Deterministic HTML rendering of the filtered tree.
//!
//! Output is byte-for-byte deterministic for a given tree: attributes in
//! their filtered order, text and attribute values re-escaped, content
//! whitespace preserved verbatim. Void elements are emitted HTML5-style
//! with no closing tag and never recurse into children.

use crate::dom::{Document, Node};

/// Elements with no closing tag and no children, per the HTML5 void set.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

/// Render a filtered document to an HTML string.
pub fn serialize(document: &Document) -> String {
    let mut output = String::with_capacity(256);
    for node in &document.children {
        write_node(&mut output, node);
    }
    output
}

fn write_node(output: &mut String, node: &Node) {
    match node {
        Node::Text(content) => push_escaped_text(output, content),
        Node::Element {
            name,
            attrs,
            children,
        } => {
            output.push('<');
            output.push_str(name);
            for (key, value) in attrs {
                output.push(' ');
                output.push_str(key);
                output.push_str("=\"");
                push_escaped_attribute(output, value);
                output.push('"');
            }
            output.push('>');

            if is_void(name) {
                return;
            }

            for child in children {
                write_node(output, child);
            }
            output.push_str("</");
            output.push_str(name);
            output.push('>');
        }
    }
}

/// Escape `&`, `<`, `>` in character data.
fn push_escaped_text(output: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            other => output.push(other),
        }
    }
}

/// Escape `&`, `<`, `>`, `"` in a double-quoted attribute value.
fn push_escaped_attribute(output: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            other => output.push(other),
        }
    }
}
