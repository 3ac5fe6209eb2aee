//! Policy-driven HTML sanitization engine.
//!
//! Untrusted HTML text is parsed with html5ever, walked depth-first against
//! an immutable allowlist [`Policy`], and re-serialized deterministically:
//!
//! ```text
//! input text -> parser -> tree walker (policy via node filter) -> serializer -> output text
//! ```
//!
//! The engine is a pure transformation: one sanitize call takes one input
//! string and one policy and yields one output string, with no shared
//! mutable state. Policies are immutable after construction and safe to
//! share across concurrent calls.
//!
//! # Modules
//!
//! - `policy`: allowlist configuration, builder and the named-policy registry
//! - `parser`: html5ever fragment-parse adapter
//! - `filter`: per-node drop / unwrap / keep decisions
//! - `walker`: depth-first traversal producing the filtered tree
//! - `dom`: the owned output tree
//! - `serializer`: deterministic HTML rendering
//! - `error`: the failure taxonomy
//!
//! # Examples
//!
//! ```rust
//! use html_policy_sanitizer::sanitize_named;
//!
//! let output = sanitize_named("<a href=\"https://x.com\">hi</a>", "strict-links").unwrap();
//! assert_eq!(output, "<a href=\"https://x.com\" rel=\"nofollow\">hi</a>");
//!
//! // Disallowed wrappers are unwrapped; their allowed content survives
//! let output = sanitize_named("<div><b>bold</b></div>", "strict-links").unwrap();
//! assert_eq!(output, "bold");
//! ```

pub mod dom;
pub mod error;
pub mod filter;
pub mod parser;
pub mod policy;
pub mod serializer;
pub mod walker;

pub use dom::{Document, Node};
pub use error::SanitizeError;
pub use filter::FilterVerdict;
pub use policy::{DisallowedElementAction, Policy, PolicyBuilder};
pub use walker::{TreeWalker, DEFAULT_MAX_DEPTH};

/// Reusable sanitizer binding a policy to a depth limit.
///
/// Holds no per-call state; a single `Sanitizer` may serve any number of
/// concurrent calls.
///
/// ```rust
/// use html_policy_sanitizer::{policy, Sanitizer};
///
/// let sanitizer = Sanitizer::new(policy::named("basic-with-images").unwrap().clone());
/// let output = sanitizer.sanitize("<img src=\"/cat.png\" onerror=\"x()\">").unwrap();
/// assert_eq!(output, "<img src=\"/cat.png\">");
/// ```
pub struct Sanitizer {
    policy: Policy,
    max_depth: usize,
}

impl Sanitizer {
    /// Sanitizer with the default depth limit.
    pub fn new(policy: Policy) -> Self {
        Self {
            policy,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sanitizer with a custom depth limit.
    pub fn with_max_depth(policy: Policy, max_depth: usize) -> Self {
        Self { policy, max_depth }
    }

    /// The policy this sanitizer applies.
    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Sanitize one input text: parse, walk, serialize.
    ///
    /// Input with no allowed content yields an empty string, not an error.
    ///
    /// # Errors
    ///
    /// - [`SanitizeError::MalformedInput`] if the text cannot be handed to
    ///   the parser
    /// - [`SanitizeError::DepthExceeded`] if input nesting exceeds the limit
    pub fn sanitize(&self, text: &str) -> Result<String, SanitizeError> {
        let dom = parser::parse(text)?;
        let document = TreeWalker::with_max_depth(&self.policy, self.max_depth).walk(&dom)?;
        Ok(serializer::serialize(&document))
    }
}

/// Sanitize `text` under `policy` with the default depth limit.
pub fn sanitize(text: &str, policy: &Policy) -> Result<String, SanitizeError> {
    let dom = parser::parse(text)?;
    let document = TreeWalker::new(policy).walk(&dom)?;
    Ok(serializer::serialize(&document))
}

/// Sanitize `text` under the built-in policy registered as `policy_name`.
///
/// # Errors
///
/// Returns [`SanitizeError::UnknownPolicy`] for unregistered names, in
/// addition to the per-call failures of [`sanitize`].
pub fn sanitize_named(text: &str, policy_name: &str) -> Result<String, SanitizeError> {
    sanitize(text, policy::named(policy_name)?)
}
