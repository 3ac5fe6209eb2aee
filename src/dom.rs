//! Owned output tree produced by the tree walker.
//!
//! This is deliberately smaller than the parse-side DOM: comments, doctypes
//! and processing instructions have no variant here, so filtered output
//! cannot contain them by construction. Each node is owned exclusively by
//! its parent; no node is shared across trees.

/// A single node in the filtered tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// An element with its surviving attributes (insertion order preserved)
    /// and its filtered children.
    Element {
        name: String,
        attrs: Vec<(String, String)>,
        children: Vec<Node>,
    },
    /// Raw character data. Escaping happens at serialization time.
    Text(String),
}

impl Node {
    pub fn element(
        name: impl Into<String>,
        attrs: Vec<(String, String)>,
        children: Vec<Node>,
    ) -> Self {
        Node::Element {
            name: name.into(),
            attrs,
            children,
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Node::Text(content.into())
    }
}

/// A filtered fragment: an ordered sequence of top-level nodes.
///
/// Built once by the walker, consumed once by the serializer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub children: Vec<Node>,
}

impl Document {
    pub fn new(children: Vec<Node>) -> Self {
        Self { children }
    }

    /// True if sanitization left no output at all.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}
