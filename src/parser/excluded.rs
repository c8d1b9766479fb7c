//! Requirement exclusion

use std::collections::HashSet;

use crate::parser::traits::{ParseError, Parser};
use crate::parser::types::Requirement;

/// Parser decorator dropping requirements by name, case-insensitively
pub struct ExcludedReqs<P> {
    inner: P,
    excluded: HashSet<String>,
}

impl<P: Parser> ExcludedReqs<P> {
    pub fn new<I, S>(inner: P, excluded: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            inner,
            excluded: excluded
                .into_iter()
                .map(|name| name.as_ref().trim().to_lowercase())
                .filter(|name| !name.is_empty())
                .collect(),
        }
    }
}

impl<P: Parser> Parser for ExcludedReqs<P> {
    fn parse(&self, content: &str) -> Result<Vec<Requirement>, ParseError> {
        let mut requirements = self.inner.parse(content)?;
        requirements.retain(|req| !self.excluded.contains(&req.name.to_lowercase()));
        Ok(requirements)
    }
}
