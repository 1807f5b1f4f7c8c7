//! Regex step pattern.

use regex::Regex;

use crate::error::BuildError;

use super::{captures_of, RawCapture};

/// Pattern matching a step text against an anchored regex.
///
/// The regex must cover the whole step text (the pattern is compiled
/// with `^(?:…)$` around it), matching the full-text semantics of the
/// other strategies. Named groups become named argument slots; unnamed
/// groups stay positional and can be named by the owning definition.
#[derive(Clone, Debug)]
pub struct RegexPattern {
    source: String,
    regex: Regex,
}

impl RegexPattern {
    /// Compiles a new [`RegexPattern`].
    ///
    /// # Errors
    ///
    /// If the pattern is not a valid regex.
    pub fn new(pattern: impl Into<String>) -> Result<Self, BuildError> {
        let source = pattern.into();
        let regex = Regex::new(&format!("^(?:{source})$")).map_err(|e| {
            BuildError::Regex { pattern: source.clone(), source: e }
        })?;
        Ok(Self { source, regex })
    }

    /// Original pattern text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Indicates whether the whole `text` matches the regex.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Extracts the regex's capture groups from `text`.
    #[must_use]
    pub fn extract(&self, text: &str) -> Option<Vec<RawCapture>> {
        captures_of(&self.regex, text)
    }

    /// Names of the regex's named capture groups, in group order.
    #[must_use]
    pub fn slot_names(&self) -> Vec<String> {
        self.regex.capture_names().flatten().map(str::to_owned).collect()
    }
}
