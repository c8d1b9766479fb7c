//! mix.lock parser
//!
//! Hex entries look like:
//! ```text
//! "jason": {:hex, :jason, "1.4.1", "af1504e35f629ddcdd6addb3513c3853991f694921b1b9368b0bd32beb9f1b63", [:mix], [...], "hexpm", "..."},
//! ```
//! Git and path dependencies carry no Hex version and are skipped.

use regex::Regex;

use crate::parser::traits::{ParseError, Parser};
use crate::parser::types::Requirement;

/// Parser for mix.lock files
pub struct MixLockParser {
    /// Regex for `"name": {:hex, :package, "version"`
    hex_entry_re: Regex,
}

impl MixLockParser {
    pub fn new() -> Self {
        Self {
            hex_entry_re: Regex::new(r#""([^"]+)":\s*\{:hex,\s*:[^,]+,\s*"([^"]+)""#).unwrap(),
        }
    }
}

impl Default for MixLockParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for MixLockParser {
    fn parse(&self, content: &str) -> Result<Vec<Requirement>, ParseError> {
        Ok(self
            .hex_entry_re
            .captures_iter(content)
            .map(|caps| Requirement::new(&caps[1], &caps[2]))
            .collect())
    }
}
