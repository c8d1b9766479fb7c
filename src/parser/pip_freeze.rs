//! `pip freeze` / pinned requirements.txt parser
//!
//! Only exact pins are kept:
//! - `httpx==0.26.0`
//! - `uvicorn[standard]==0.27.0` (extras dropped)
//! - `pywin32==306 ; sys_platform == "win32"` (marker ignored)
//!
//! Options (`-r`, `--hash=...`), editable installs, URLs, range specifiers
//! and arbitrary-equality pins (`===`) are skipped.

use regex::Regex;

use crate::parser::traits::{ParseError, Parser};
use crate::parser::types::Requirement;

/// Parser for pip freeze output
pub struct PipFreezeParser {
    /// Regex for `name[extras]==version`
    pin_re: Regex,
}

impl PipFreezeParser {
    pub fn new() -> Self {
        Self {
            pin_re: Regex::new(r"^([A-Za-z0-9][A-Za-z0-9._-]*)\s*(?:\[[^\]]*\])?\s*==\s*([^\s=\\]+)$")
                .unwrap(),
        }
    }
}

impl Default for PipFreezeParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for PipFreezeParser {
    fn parse(&self, content: &str) -> Result<Vec<Requirement>, ParseError> {
        let mut results = Vec::new();

        for line in content.lines() {
            // Drop environment markers, inline comments and hash continuations
            let line = line.split(';').next().unwrap_or_default();
            let line = line.split(" #").next().unwrap_or_default();
            let line = line.trim().trim_end_matches('\\').trim_end();

            if line.is_empty() || line.starts_with('#') || line.starts_with('-') {
                continue;
            }

            if let Some(caps) = self.pin_re.captures(line) {
                results.push(Requirement::new(&caps[1], &caps[2]));
            }
        }

        Ok(results)
    }
}
