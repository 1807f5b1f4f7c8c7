//! Literal string step pattern.

use super::RawCapture;

/// Pattern matching a step text by literal equality.
///
/// Produces no arguments.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Exact {
    source: String,
}

impl Exact {
    /// Creates a new [`Exact`] pattern. Never fails.
    #[must_use]
    pub fn new(pattern: impl Into<String>) -> Self {
        Self { source: pattern.into() }
    }

    /// Original pattern text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Indicates whether `text` equals the pattern verbatim.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.source == text
    }

    /// Extracts arguments: always the empty set on a match.
    #[must_use]
    pub fn extract(&self, text: &str) -> Option<Vec<RawCapture>> {
        self.is_match(text).then(Vec::new)
    }

    /// No named slots.
    #[must_use]
    pub fn slot_names(&self) -> Vec<String> {
        Vec::new()
    }
}
