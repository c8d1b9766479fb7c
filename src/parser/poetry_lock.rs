//! poetry.lock parser

use serde::Deserialize;

use crate::parser::traits::{ParseError, Parser};
use crate::parser::types::Requirement;

#[derive(Debug, Deserialize)]
struct PoetryLock {
    #[serde(default)]
    package: Vec<PoetryPackage>,
}

#[derive(Debug, Deserialize)]
struct PoetryPackage {
    name: String,
    version: String,
}

/// Parser for poetry.lock files
#[derive(Default)]
pub struct PoetryLockParser;

impl Parser for PoetryLockParser {
    fn parse(&self, content: &str) -> Result<Vec<Requirement>, ParseError> {
        let lock: PoetryLock =
            toml::from_str(content).map_err(|e| ParseError::InvalidSyntax(e.to_string()))?;

        Ok(lock
            .package
            .into_iter()
            .map(|package| Requirement::new(package.name, package.version))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_extracts_packages() {
        let content = r#"
# This file is automatically @generated by Poetry 1.7.1 and should not be changed by hand.

[[package]]
name = "anyio"
version = "4.2.0"
description = "High level compatibility layer for multiple asynchronous event loop implementations"
optional = false
python-versions = ">=3.8"
files = [
    {file = "anyio-4.2.0-py3-none-any.whl", hash = "sha256:745843b39e829e108e518c489b31dc757de7d2131d53fac32bd8df268227bfee"},
]

[package.dependencies]
idna = ">=2.8"

[[package]]
name = "httpx"
version = "0.26.0"
description = "The next generation HTTP client."
optional = false
python-versions = ">=3.8"

[metadata]
lock-version = "2.0"
python-versions = "^3.11"
content-hash = "abc"
"#;

        let result = PoetryLockParser.parse(content).unwrap();

        assert_eq!(
            result,
            vec![
                Requirement::new("anyio", "4.2.0"),
                Requirement::new("httpx", "0.26.0"),
            ]
        );
    }

    #[test]
    fn parse_returns_empty_without_packages() {
        let result = PoetryLockParser
            .parse("[metadata]\nlock-version = \"2.0\"\n")
            .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn parse_rejects_invalid_toml() {
        let result = PoetryLockParser.parse("[[package]\nname = ");
        assert!(matches!(result, Err(ParseError::InvalidSyntax(_))));
    }
}
