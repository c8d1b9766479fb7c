//! Parser trait definition

use crate::parser::types::Requirement;

/// Trait for parsing dependency manifests
pub trait Parser {
    /// Parse the content and extract the pinned requirements
    fn parse(&self, content: &str) -> Result<Vec<Requirement>, ParseError>;
}

impl<P: Parser + ?Sized> Parser for Box<P> {
    fn parse(&self, content: &str) -> Result<Vec<Requirement>, ParseError> {
        (**self).parse(content)
    }
}

/// Error type for parsing operations
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Failed to parse the file structure
    #[error("Failed to parse file: {0}")]
    ParseFailed(String),

    /// Invalid syntax in the file
    #[error("Invalid syntax: {0}")]
    InvalidSyntax(String),
}
