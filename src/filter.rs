//! Per-node policy decisions.
//!
//! The filter turns the policy into one explicit, auditable decision per
//! element: drop the node and its subtree, unwrap it (children survive in
//! its place), or keep it with a filtered attribute list. Text nodes are
//! always kept (escaping happens at serialization); comments are always
//! dropped and are not even representable in the output tree. The walker
//! performs that dispatch - this module owns the element decision, operating
//! on plain names and attribute pairs so it can be exercised without a DOM.

use std::collections::{BTreeSet, HashSet};

use crate::policy::{DisallowedElementAction, Policy};

/// The `rel` value forced onto anchors when the policy demands it.
const NOFOLLOW: &str = "nofollow";

/// Outcome of filtering a single element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterVerdict {
    /// Exclude the element and its entire subtree.
    Drop,
    /// Exclude the element itself; its children are spliced into the
    /// parent's position and re-filtered.
    Unwrap,
    /// Retain the element with these attributes, in input order minus
    /// removed entries. Children are filtered recursively by the walker.
    Keep(Vec<(String, String)>),
}

/// Decide what happens to an element with the given name and attributes.
///
/// Attribute handling, in order:
/// 1. duplicate keys: only the first occurrence is considered (stable dedup),
/// 2. keys outside the policy's allowlist for this element are removed,
/// 3. URL-valued keys (`href`, `src`) are additionally gated on the value's
///    scheme,
/// 4. on anchors, `rel="nofollow"` is forced when the policy says so:
///    surviving `rel` tokens are merged with `nofollow`, de-duplicated and
///    sorted so output is deterministic.
pub fn filter_element(policy: &Policy, name: &str, attrs: &[(String, String)]) -> FilterVerdict {
    if !policy.allows(name) {
        return match policy.disallowed_element_action() {
            DisallowedElementAction::Unwrap => FilterVerdict::Unwrap,
            DisallowedElementAction::DropSubtree => FilterVerdict::Drop,
        };
    }

    let allowed = policy.allowed_attributes_for(name);
    let mut seen: HashSet<&str> = HashSet::new();
    let mut kept: Vec<(String, String)> = Vec::with_capacity(attrs.len());

    for (key, value) in attrs {
        if !seen.insert(key.as_str()) {
            continue;
        }
        if !allowed.contains(key.as_str()) {
            continue;
        }
        if Policy::is_url_valued(key) && !policy.is_scheme_allowed(value) {
            continue;
        }
        kept.push((key.clone(), value.clone()));
    }

    if name == "a" && policy.force_rel_nofollow() {
        force_nofollow(&mut kept);
    }

    FilterVerdict::Keep(kept)
}

/// Merge `nofollow` into the surviving `rel` attribute, or append one.
fn force_nofollow(attrs: &mut Vec<(String, String)>) {
    let existing = attrs.iter().position(|(key, _)| key == "rel");

    let mut tokens: BTreeSet<&str> = existing
        .map(|index| attrs[index].1.split_whitespace().collect())
        .unwrap_or_default();
    tokens.insert(NOFOLLOW);
    let merged = tokens.into_iter().collect::<Vec<_>>().join(" ");

    match existing {
        Some(index) => attrs[index].1 = merged,
        None => attrs.push(("rel".to_string(), merged)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{self, Policy, BASIC_WITH_IMAGES, STRICT_LINKS};

    fn attrs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_disallowed_element_unwraps_by_default() {
        let policy = policy::named(STRICT_LINKS).unwrap();
        assert_eq!(filter_element(policy, "div", &[]), FilterVerdict::Unwrap);
        assert_eq!(filter_element(policy, "script", &[]), FilterVerdict::Unwrap);
    }

    #[test]
    fn test_disallowed_element_drops_under_drop_subtree() {
        let policy = Policy::builder()
            .allow_element("a")
            .allow_attributes("a", ["href"])
            .allow_url_scheme("https")
            .disallowed_element_action(DisallowedElementAction::DropSubtree)
            .build()
            .unwrap();
        assert_eq!(filter_element(&policy, "div", &[]), FilterVerdict::Drop);
    }

    #[test]
    fn test_allowed_element_keeps_allowed_attributes() {
        let policy = policy::named(BASIC_WITH_IMAGES).unwrap();
        let verdict = filter_element(
            policy,
            "img",
            &attrs(&[("src", "/cat.png"), ("alt", "cat"), ("onerror", "x()")]),
        );
        assert_eq!(
            verdict,
            FilterVerdict::Keep(attrs(&[("src", "/cat.png"), ("alt", "cat")]))
        );
    }

    #[test]
    fn test_url_attribute_dropped_on_disallowed_scheme() {
        let policy = policy::named(STRICT_LINKS).unwrap();
        let verdict = filter_element(policy, "a", &attrs(&[("href", "javascript:alert(1)")]));
        assert_eq!(verdict, FilterVerdict::Keep(attrs(&[("rel", "nofollow")])));
    }

    #[test]
    fn test_duplicate_attribute_first_occurrence_wins() {
        let policy = policy::named(BASIC_WITH_IMAGES).unwrap();
        let verdict = filter_element(
            policy,
            "img",
            &attrs(&[("src", "/first.png"), ("src", "/second.png")]),
        );
        assert_eq!(verdict, FilterVerdict::Keep(attrs(&[("src", "/first.png")])));
    }

    #[test]
    fn test_attribute_order_preserved() {
        let policy = policy::named(BASIC_WITH_IMAGES).unwrap();
        let verdict = filter_element(
            policy,
            "img",
            &attrs(&[("alt", "cat"), ("class", "x"), ("src", "/cat.png")]),
        );
        assert_eq!(
            verdict,
            FilterVerdict::Keep(attrs(&[("alt", "cat"), ("src", "/cat.png")]))
        );
    }

    #[test]
    fn test_nofollow_appended_when_rel_missing() {
        let policy = policy::named(STRICT_LINKS).unwrap();
        let verdict = filter_element(policy, "a", &attrs(&[("href", "https://x.com")]));
        assert_eq!(
            verdict,
            FilterVerdict::Keep(attrs(&[("href", "https://x.com"), ("rel", "nofollow")]))
        );
    }

    #[test]
    fn test_nofollow_merges_with_surviving_rel_tokens() {
        let policy = Policy::builder()
            .allow_element("a")
            .allow_attributes("a", ["href", "rel"])
            .allow_url_scheme("https")
            .force_rel_nofollow(true)
            .build()
            .unwrap();
        let verdict = filter_element(
            &policy,
            "a",
            &attrs(&[("rel", "noopener nofollow external")]),
        );
        // De-duplicated and sorted for determinism
        assert_eq!(
            verdict,
            FilterVerdict::Keep(attrs(&[("rel", "external nofollow noopener")]))
        );
    }

    #[test]
    fn test_nofollow_not_forced_when_disabled() {
        let policy = policy::named(BASIC_WITH_IMAGES).unwrap();
        let verdict = filter_element(policy, "a", &attrs(&[("href", "https://x.com")]));
        assert_eq!(verdict, FilterVerdict::Keep(attrs(&[("href", "https://x.com")])));
    }

    #[test]
    fn test_nofollow_only_applies_to_anchors() {
        let policy = Policy::builder()
            .allow_elements(["a", "strong"])
            .allow_attributes("a", ["href"])
            .allow_url_scheme("https")
            .force_rel_nofollow(true)
            .build()
            .unwrap();
        assert_eq!(
            filter_element(&policy, "strong", &[]),
            FilterVerdict::Keep(vec![])
        );
    }
}
