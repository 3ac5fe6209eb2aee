//! Fragment parsing using html5ever
//!
//! Sanitizer input is an HTML *fragment* (user-supplied text, not a full
//! document), so parsing happens in a `body` context: html5ever wraps the
//! fragment in a synthetic context element and applies the WHATWG parsing
//! algorithm, handling malformed markup the same way a browser would. The
//! engine treats the parser as an opaque collaborator; everything after this
//! module operates on the resulting tree.
//!
//! html5ever never rejects text outright - broken markup is error-corrected,
//! not refused. The one input class this adapter refuses itself is text
//! containing U+0000: the parser would substitute U+FFFD and carry on, which
//! silently rewrites exactly the kind of control-character payload a hostile
//! caller probes with. Such input fails with
//! [`SanitizeError::MalformedInput`] before parsing.

use html5ever::tendril::TendrilSink;
use html5ever::{local_name, namespace_url, ns, parse_fragment, ParseOpts, QualName};
use markup5ever_rcdom::{Handle, RcDom};

use crate::error::SanitizeError;

/// Parse an HTML fragment into a DOM tree.
///
/// Empty input is valid and parses to an empty fragment; sanitizing it
/// yields an empty string rather than an error.
///
/// # Errors
///
/// Returns [`SanitizeError::MalformedInput`] if the text contains U+0000.
pub fn parse(text: &str) -> Result<RcDom, SanitizeError> {
    if let Some(position) = text.find('\u{0000}') {
        return Err(SanitizeError::MalformedInput(format!(
            "NUL byte at position {position}"
        )));
    }

    let dom = parse_fragment(
        RcDom::default(),
        ParseOpts::default(),
        QualName::new(None, ns!(html), local_name!("body")),
        vec![],
    )
    .one(text);

    Ok(dom)
}

/// Top-level nodes of a parsed fragment, in document order.
///
/// html5ever parents all fragment content under a synthetic `html` context
/// element; this returns that element's children.
pub fn fragment_children(dom: &RcDom) -> Vec<Handle> {
    dom.document
        .children
        .borrow()
        .first()
        .map(|context| context.children.borrow().clone())
        .unwrap_or_default()
}
