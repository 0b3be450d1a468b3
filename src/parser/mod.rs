//! Parser module - C++ tokenization and statement-line segmentation
//!
//! The front end turns raw source text into an ordered list of [`Line`]s,
//! each holding the tokens of one statement and the delimiter that closed
//! it. Everything downstream (classification, graph building) works on
//! this flattened representation, never on raw text.

use crate::Result;
use serde::{Deserialize, Serialize};

pub mod lexer;
pub mod segment;

/// The delimiter character that closed a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Terminator {
    /// `{` - opens a nested scope
    OpenBrace,
    /// `}` - closes the current scope
    CloseBrace,
    /// `;` - plain statement end
    Semicolon,
    /// `:` - access specifier or case label
    Colon,
    /// Trailing tokens never closed by a delimiter
    #[default]
    None,
}

/// One segmented statement: an ordered token sequence plus the delimiter
/// that terminated it. Immutable once produced by the segmenter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Line {
    pub tokens: Vec<String>,
    pub terminator: Terminator,
}

impl Line {
    pub fn new(tokens: Vec<String>, terminator: Terminator) -> Self {
        Self { tokens, terminator }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Text of the token at `index`, if present
    pub fn token(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(String::as_str)
    }

    pub fn first(&self) -> Option<&str> {
        self.token(0)
    }

    pub fn contains(&self, text: &str) -> bool {
        self.tokens.iter().any(|t| t == text)
    }
}

/// Tokenize and segment one translation unit
pub fn parse_unit(source: &str) -> Result<Vec<Line>> {
    let tokens = lexer::tokenize(source)?;
    tracing::debug!("Lexed {} tokens", tokens.len());

    let lines = segment::segment(&tokens);
    tracing::debug!("Segmented into {} lines", lines.len());

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_unit_simple() {
        let lines = parse_unit("int main ( ) { return 0 ; }").unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].terminator, Terminator::OpenBrace);
        assert_eq!(lines[1].tokens, vec!["return", "0"]);
        assert_eq!(lines[1].terminator, Terminator::Semicolon);
        assert_eq!(lines[2].terminator, Terminator::CloseBrace);
    }

    #[test]
    fn test_line_accessors() {
        let line = Line::new(
            vec!["return".to_string(), "5".to_string()],
            Terminator::Semicolon,
        );
        assert_eq!(line.first(), Some("return"));
        assert_eq!(line.token(1), Some("5"));
        assert_eq!(line.token(2), None);
        assert!(line.contains("5"));
        assert!(!line.is_empty());
    }
}
