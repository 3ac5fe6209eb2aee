//! Error types for sanitization operations

/// Errors that can occur while constructing a policy or sanitizing input.
///
/// `InvalidPolicy` is a construction-time failure: the configuration itself
/// is broken and the caller must fix it. The remaining variants are per-call
/// failures the caller may report upstream and retry with different input.
/// A failed sanitize call never yields partial output.
#[derive(Debug, thiserror::Error)]
pub enum SanitizeError {
    /// Policy validation failed at construction time.
    #[error("invalid policy: {0}")]
    InvalidPolicy(String),

    /// The input text cannot be handed to the parser at all.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Element nesting in the input exceeded the walker's depth limit.
    #[error("nesting depth {depth} exceeds maximum allowed depth {max_depth}")]
    DepthExceeded { depth: usize, max_depth: usize },

    /// A named-policy lookup failed. There is no fallback policy.
    #[error("unknown policy name: {0:?}")]
    UnknownPolicy(String),
}

impl SanitizeError {
    /// Returns true if this failure is per-call recoverable (the caller may
    /// report it and continue), as opposed to a configuration defect.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SanitizeError::MalformedInput(_) | SanitizeError::DepthExceeded { .. }
        )
    }
}
