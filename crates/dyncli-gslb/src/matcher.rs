//! Pool label matching.

use std::fmt;

use regex::Regex;

use crate::error::GslbError;

/// Compiled, fully anchored label pattern
#[derive(Clone)]
pub struct LabelPattern {
    source: String,
    regex: Regex,
}

impl LabelPattern {
    /// Anchor `fragment` to the whole label and compile it.
    ///
    /// `eu-[0-9]+` becomes `^(?:eu-[0-9]+)$`, so alternations such as
    /// `eu-1|us-1` are anchored as a whole.
    pub fn anchored(fragment: &str) -> Result<Self, GslbError> {
        let anchored = format!("^(?:{fragment})$");
        let regex = Regex::new(&anchored).map_err(|source| GslbError::InvalidPattern {
            pattern: fragment.to_string(),
            source,
        })?;
        Ok(Self {
            source: fragment.to_string(),
            regex,
        })
    }

    /// The fragment as supplied by the caller
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

impl fmt::Debug for LabelPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LabelPattern").field(&self.regex.as_str()).finish()
    }
}

impl fmt::Display for LabelPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.regex.as_str())
    }
}

/// Whether a pool label qualifies for update.
///
/// The pattern is applied as compiled; anchoring is the job of
/// [`LabelPattern::anchored`].
pub fn matches(label: &str, pattern: &LabelPattern) -> bool {
    pattern.regex.is_match(label)
}
