//! Depth-first tree walker.
//!
//! Walks the parsed input tree in document order (pre-order, left to right),
//! dispatching every node through the filter and assembling a brand-new
//! output tree. The input tree is never mutated, so the same parse can be
//! reused across policies. The walker holds no state beyond its own call
//! stack; concurrent walks with different policies never interfere.
//!
//! Recursion is bounded by a configurable depth limit. Exceeding it aborts
//! the whole walk with [`SanitizeError::DepthExceeded`] - no partial output -
//! so adversarially nested input cannot exhaust the stack.

use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::dom::{Document, Node};
use crate::error::SanitizeError;
use crate::filter::{filter_element, FilterVerdict};
use crate::parser;
use crate::policy::Policy;

/// Default element-nesting limit.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Walks a parsed fragment and produces the filtered tree.
pub struct TreeWalker<'a> {
    policy: &'a Policy,
    max_depth: usize,
}

impl<'a> TreeWalker<'a> {
    /// Walker with the default depth limit.
    pub fn new(policy: &'a Policy) -> Self {
        Self {
            policy,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Walker with a custom depth limit.
    pub fn with_max_depth(policy: &'a Policy, max_depth: usize) -> Self {
        Self { policy, max_depth }
    }

    /// Filter the fragment into a new [`Document`].
    ///
    /// # Errors
    ///
    /// Returns [`SanitizeError::DepthExceeded`] if element nesting in the
    /// *input* tree exceeds the limit. Depth counts every input element,
    /// including ones that end up unwrapped: the limit guards recursion on
    /// hostile input, and unwrapped wrappers still cost stack.
    pub fn walk(&self, dom: &RcDom) -> Result<Document, SanitizeError> {
        let mut top_level = Vec::new();
        for child in parser::fragment_children(dom) {
            self.filter_into(&child, 1, &mut top_level)?;
        }
        Ok(Document::new(top_level))
    }

    /// Filter `node`, appending whatever survives to `out` in order.
    fn filter_into(
        &self,
        node: &Handle,
        depth: usize,
        out: &mut Vec<Node>,
    ) -> Result<(), SanitizeError> {
        match &node.data {
            NodeData::Text { contents } => {
                out.push(Node::Text(contents.borrow().to_string()));
                Ok(())
            }
            NodeData::Element { name, attrs, .. } => {
                if depth > self.max_depth {
                    return Err(SanitizeError::DepthExceeded {
                        depth,
                        max_depth: self.max_depth,
                    });
                }

                let element_name = name.local.as_ref();
                let attr_pairs: Vec<(String, String)> = attrs
                    .borrow()
                    .iter()
                    .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                    .collect();

                match filter_element(self.policy, element_name, &attr_pairs) {
                    FilterVerdict::Drop => Ok(()),
                    FilterVerdict::Unwrap => {
                        // Children spliced into the parent's position,
                        // re-filtered at their original input depth.
                        for child in node.children.borrow().iter() {
                            self.filter_into(child, depth + 1, out)?;
                        }
                        Ok(())
                    }
                    FilterVerdict::Keep(kept_attrs) => {
                        let mut children = Vec::new();
                        for child in node.children.borrow().iter() {
                            self.filter_into(child, depth + 1, &mut children)?;
                        }
                        out.push(Node::Element {
                            name: element_name.to_string(),
                            attrs: kept_attrs,
                            children,
                        });
                        Ok(())
                    }
                }
            }
            // Comments are never representable in output; doctypes and
            // processing instructions cannot appear in fragment content but
            // are excluded all the same.
            NodeData::Comment { .. }
            | NodeData::Doctype { .. }
            | NodeData::ProcessingInstruction { .. }
            | NodeData::Document => Ok(()),
        }
    }
}
