//! Sanitization policies: immutable allowlists of elements, attributes and
//! URL schemes.
//!
//! A [`Policy`] is a pure value object, validated once at construction and
//! never mutated afterwards. Changing a policy means building a new one.
//! Because policies are read-only they can be shared freely across any
//! number of concurrent sanitize calls without synchronization; the built-in
//! policies live in a process-wide registry initialized on first use.
//!
//! # Examples
//!
//! ```rust
//! use html_policy_sanitizer::policy::Policy;
//!
//! let policy = Policy::builder()
//!     .allow_element("a")
//!     .allow_attributes("a", ["href"])
//!     .allow_url_scheme("https")
//!     .build()
//!     .expect("valid policy");
//!
//! assert!(policy.allows("a"));
//! assert!(!policy.allows("script"));
//! assert!(policy.is_scheme_allowed("https://example.com"));
//! assert!(!policy.is_scheme_allowed("javascript:alert(1)"));
//! ```

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use url::Url;

use crate::error::SanitizeError;

/// Attribute-map key applying to every allowed element.
pub const WILDCARD_ELEMENT: &str = "*";

/// Sentinel scheme entry permitting relative and scheme-relative references.
pub const RELATIVE_SCHEME: &str = "relative";

/// Attributes whose values are URLs and therefore subject to the scheme
/// allowlist in addition to the attribute allowlist.
pub const URL_VALUED_ATTRIBUTES: &[&str] = &["href", "src"];

/// Registered name of the anchors-only, https-only, forced-nofollow policy.
pub const STRICT_LINKS: &str = "strict-links";

/// Registered name of the broader policy including images.
pub const BASIC_WITH_IMAGES: &str = "basic-with-images";

/// What the filter does with an element whose name the policy disallows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisallowedElementAction {
    /// Remove the element but splice its children into the parent's
    /// position, recursively re-filtered. Allowed content inside a
    /// disallowed wrapper survives.
    #[default]
    Unwrap,
    /// Remove the element together with its entire subtree.
    DropSubtree,
}

/// Immutable sanitization configuration.
///
/// Construct via [`Policy::builder`]; construction validates the
/// configuration and fails with [`SanitizeError::InvalidPolicy`] rather than
/// producing a policy that silently allows nothing or references unknown
/// elements.
#[derive(Debug, Clone)]
pub struct Policy {
    allowed_elements: HashSet<String>,
    allowed_attributes: HashMap<String, HashSet<String>>,
    allowed_url_schemes: HashSet<String>,
    force_rel_nofollow: bool,
    disallowed_element_action: DisallowedElementAction,
}

impl Policy {
    /// Start building a policy. Everything is denied until allowed.
    pub fn builder() -> PolicyBuilder {
        PolicyBuilder::default()
    }

    /// True iff `element` is in the allowed-element set.
    pub fn allows(&self, element: &str) -> bool {
        self.allowed_elements.contains(element)
    }

    /// Attributes allowed on `element`: the union of the per-element entry
    /// and the `"*"` wildcard entry.
    pub fn allowed_attributes_for(&self, element: &str) -> HashSet<&str> {
        let mut allowed: HashSet<&str> = HashSet::new();
        if let Some(attrs) = self.allowed_attributes.get(element) {
            allowed.extend(attrs.iter().map(String::as_str));
        }
        if let Some(attrs) = self.allowed_attributes.get(WILDCARD_ELEMENT) {
            allowed.extend(attrs.iter().map(String::as_str));
        }
        allowed
    }

    /// Decide whether a URL-valued attribute value may be kept.
    ///
    /// Absolute URLs are allowed iff their scheme (compared
    /// case-insensitively; the `url` crate lowercases it) is in the scheme
    /// allowlist. Relative and scheme-relative references are allowed iff
    /// the allowlist contains the [`RELATIVE_SCHEME`] sentinel. Values that
    /// fail to parse as either are rejected.
    pub fn is_scheme_allowed(&self, value: &str) -> bool {
        match Url::parse(value) {
            Ok(url) => self.allowed_url_schemes.contains(url.scheme()),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                self.allowed_url_schemes.contains(RELATIVE_SCHEME)
            }
            Err(_) => false,
        }
    }

    /// True iff `attribute` carries a URL value (`href`, `src`).
    pub fn is_url_valued(attribute: &str) -> bool {
        URL_VALUED_ATTRIBUTES.contains(&attribute)
    }

    /// Whether anchors get `rel="nofollow"` forced onto them.
    pub fn force_rel_nofollow(&self) -> bool {
        self.force_rel_nofollow
    }

    /// How the filter treats disallowed elements.
    pub fn disallowed_element_action(&self) -> DisallowedElementAction {
        self.disallowed_element_action
    }
}

/// Builder for [`Policy`]. Validation happens in [`PolicyBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct PolicyBuilder {
    allowed_elements: HashSet<String>,
    allowed_attributes: HashMap<String, HashSet<String>>,
    allowed_url_schemes: HashSet<String>,
    force_rel_nofollow: bool,
    disallowed_element_action: DisallowedElementAction,
}

impl PolicyBuilder {
    /// Allow a single element name.
    pub fn allow_element(mut self, element: impl Into<String>) -> Self {
        self.allowed_elements.insert(element.into());
        self
    }

    /// Allow several element names at once.
    pub fn allow_elements<I, S>(mut self, elements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_elements
            .extend(elements.into_iter().map(Into::into));
        self
    }

    /// Allow attributes on `element`. Use [`WILDCARD_ELEMENT`] to allow an
    /// attribute on every allowed element.
    pub fn allow_attributes<I, S>(mut self, element: impl Into<String>, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_attributes
            .entry(element.into())
            .or_default()
            .extend(attributes.into_iter().map(Into::into));
        self
    }

    /// Allow a URL scheme for URL-valued attributes. Pass
    /// [`RELATIVE_SCHEME`] to also accept relative references.
    pub fn allow_url_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.allowed_url_schemes.insert(scheme.into());
        self
    }

    /// Allow several URL schemes at once.
    pub fn allow_url_schemes<I, S>(mut self, schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_url_schemes
            .extend(schemes.into_iter().map(Into::into));
        self
    }

    /// Force `rel="nofollow"` onto every surviving anchor element.
    pub fn force_rel_nofollow(mut self, force: bool) -> Self {
        self.force_rel_nofollow = force;
        self
    }

    /// Choose between unwrapping disallowed elements (default) and dropping
    /// their entire subtree.
    pub fn disallowed_element_action(mut self, action: DisallowedElementAction) -> Self {
        self.disallowed_element_action = action;
        self
    }

    /// Validate and freeze the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SanitizeError::InvalidPolicy`] if an attribute entry names
    /// an element that is not allowed (the wildcard entry is exempt), or if
    /// a URL-valued attribute is allowed while the scheme allowlist is
    /// empty, which would make every value of that attribute unkeepable.
    pub fn build(self) -> Result<Policy, SanitizeError> {
        for element in self.allowed_attributes.keys() {
            if element != WILDCARD_ELEMENT && !self.allowed_elements.contains(element) {
                return Err(SanitizeError::InvalidPolicy(format!(
                    "attributes configured for element {element:?} which is not allowed"
                )));
            }
        }

        if self.allowed_url_schemes.is_empty() {
            let url_attr = self
                .allowed_attributes
                .values()
                .flatten()
                .find(|attr| Policy::is_url_valued(attr));
            if let Some(attr) = url_attr {
                return Err(SanitizeError::InvalidPolicy(format!(
                    "URL-valued attribute {attr:?} allowed but no URL schemes are"
                )));
            }
        }

        Ok(Policy {
            allowed_elements: self.allowed_elements,
            allowed_attributes: self.allowed_attributes,
            allowed_url_schemes: self.allowed_url_schemes,
            force_rel_nofollow: self.force_rel_nofollow,
            disallowed_element_action: self.disallowed_element_action,
        })
    }
}

/// Anchors only, https only, forced nofollow.
fn strict_links() -> Policy {
    Policy::builder()
        .allow_element("a")
        .allow_attributes("a", ["href"])
        .allow_url_scheme("https")
        .force_rel_nofollow(true)
        .build()
        .expect("built-in strict-links policy must validate")
}

/// Anchors with href, images with src/alt, strong emphasis.
fn basic_with_images() -> Policy {
    Policy::builder()
        .allow_elements(["a", "img", "strong"])
        .allow_attributes("a", ["href"])
        .allow_attributes("img", ["src", "alt"])
        .allow_url_schemes(["http", "https", RELATIVE_SCHEME])
        .build()
        .expect("built-in basic-with-images policy must validate")
}

/// Process-wide read-only registry of the built-in policies. Initialized
/// once on first use; new policies are added by constructing new `Policy`
/// values, never by branching on names elsewhere in the engine.
static REGISTRY: Lazy<HashMap<&'static str, Policy>> = Lazy::new(|| {
    let mut registry = HashMap::new();
    registry.insert(STRICT_LINKS, strict_links());
    registry.insert(BASIC_WITH_IMAGES, basic_with_images());
    registry
});

/// Look up a built-in policy by name.
///
/// # Errors
///
/// Returns [`SanitizeError::UnknownPolicy`] for unregistered names. There is
/// deliberately no fallback to a default policy.
pub fn named(name: &str) -> Result<&'static Policy, SanitizeError> {
    REGISTRY
        .get(name)
        .ok_or_else(|| SanitizeError::UnknownPolicy(name.to_string()))
}

/// Names of all registered built-in policies, sorted.
pub fn names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = REGISTRY.keys().copied().collect();
    names.sort_unstable();
    names
}
