//! Naming pattern for candidate discovery.
//!
//! The pattern is a regular expression matched case-insensitively and
//! anchored at the first character of the name. Under the default `prop_`,
//! `Prop_x`, `PROP_y` and `prop_z` are candidates while `myprop_x` is not.

use std::fmt;

use regex::{Regex, RegexBuilder};

use crate::error::ConfigError;

/// Default prefix that marks a member as a property.
pub const DEFAULT_PATTERN: &str = "prop_";

#[derive(Debug, Clone)]
pub struct NamePattern {
    source: String,
    regex: Regex,
}

impl NamePattern {
    /// Compile `pattern`, failing fast if it is not a well-formed expression.
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        let invalid = |err: regex::Error| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: err.to_string(),
        };
        // must stand alone, or `a)|(b` would escape the anchoring group
        Regex::new(pattern).map_err(invalid)?;
        let regex = RegexBuilder::new(&format!("^(?:{pattern})"))
            .case_insensitive(true)
            .build()
            .map_err(invalid)?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    pub fn is_match(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    /// The pattern as supplied, without the anchor.
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl Default for NamePattern {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERN).expect("default pattern compiles")
    }
}

impl fmt::Display for NamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
