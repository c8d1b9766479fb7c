//! go.sum parser
//!
//! Each module version appears up to twice:
//! ```text
//! golang.org/x/text v0.14.0 h1:ScX5w1eTa3QqT8oi6+ziP7dTV1S2+ALU0bI+0zXKWiQ=
//! golang.org/x/text v0.14.0/go.mod h1:18ZOQIKpY8NJVqYksKHtTdi31H5itFRjB5/qKTNYzSU=
//! ```
//! go.sum also keeps hashes of versions that lost minimal version selection,
//! so only the highest version per module is reported.

use std::collections::BTreeMap;

use crate::parser::traits::{ParseError, Parser};
use crate::parser::types::Requirement;
use crate::version::normalizer::Version;

/// Parser for go.sum files
#[derive(Default)]
pub struct GoSumParser;

impl Parser for GoSumParser {
    fn parse(&self, content: &str) -> Result<Vec<Requirement>, ParseError> {
        let mut highest: BTreeMap<&str, Version> = BTreeMap::new();

        for line in content.lines() {
            let mut fields = line.split_whitespace();
            let (Some(module), Some(version)) = (fields.next(), fields.next()) else {
                continue;
            };
            if version.ends_with("/go.mod") {
                continue;
            }
            let Ok(parsed) = Version::parse(version) else {
                continue;
            };

            match highest.get(module) {
                Some(current) if *current >= parsed => {}
                _ => {
                    highest.insert(module, parsed);
                }
            }
        }

        Ok(highest
            .into_iter()
            .map(|(module, version)| Requirement::new(module, version.origin()))
            .collect())
    }
}
