//! C++ subset tokenizer
//!
//! Produces plain string tokens: identifiers/keywords, numeric literals,
//! string and character literals (kept as single tokens), multi-character
//! operators, and punctuation. Whitespace, comments, and preprocessor
//! directives are dropped - the downstream passes only care about
//! statement structure, not the full grammar.

use crate::error::{Error, Result};

/// Multi-character operators, longest first so maximal munch works
const OPERATORS: &[&str] = &[
    "<<=", ">>=", "->*", "...", "::", "->", "<<", ">>", "<=", ">=", "==", "!=", "&&", "||", "++",
    "--", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=",
];

/// Tokenize one translation unit
pub fn tokenize(source: &str) -> Result<Vec<String>> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        // Whitespace
        if c.is_whitespace() {
            i += 1;
            continue;
        }

        // Line comments
        if c == '/' && chars.get(i + 1) == Some(&'/') {
            while i < chars.len() && chars[i] != '\n' {
                i += 1;
            }
            continue;
        }

        // Block comments
        if c == '/' && chars.get(i + 1) == Some(&'*') {
            i += 2;
            while i + 1 < chars.len() && !(chars[i] == '*' && chars[i + 1] == '/') {
                i += 1;
            }
            if i + 1 >= chars.len() {
                return Err(Error::Lexer("unterminated block comment".to_string()));
            }
            i += 2;
            continue;
        }

        // Preprocessor directives run to end of line
        if c == '#' {
            while i < chars.len() && chars[i] != '\n' {
                i += 1;
            }
            continue;
        }

        // String and character literals are one token, quotes included
        if c == '"' || c == '\'' {
            let quote = c;
            let start = i;
            i += 1;
            while i < chars.len() && chars[i] != quote {
                if chars[i] == '\\' {
                    i += 1;
                }
                i += 1;
            }
            if i >= chars.len() {
                return Err(Error::Lexer(format!(
                    "unterminated literal starting at byte {}",
                    start
                )));
            }
            i += 1;
            tokens.push(chars[start..i].iter().collect());
            continue;
        }

        // Identifiers and keywords
        if c.is_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            tokens.push(chars[start..i].iter().collect());
            continue;
        }

        // Numeric literals (covers hex, suffixes, and simple floats)
        if c.is_ascii_digit() {
            let start = i;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '.') {
                i += 1;
            }
            tokens.push(chars[start..i].iter().collect());
            continue;
        }

        // Multi-character operators, longest match first
        if let Some(op) = OPERATORS
            .iter()
            .find(|op| chars[i..].starts_with(&op.chars().collect::<Vec<_>>()[..]))
        {
            tokens.push(op.to_string());
            i += op.len();
            continue;
        }

        // Everything else is a single-character token
        tokens.push(c.to_string());
        i += 1;
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(src: &str) -> Vec<String> {
        tokenize(src).unwrap()
    }

    #[test]
    fn test_identifiers_and_operators() {
        assert_eq!(
            lex("std::cout << x;"),
            vec!["std", "::", "cout", "<<", "x", ";"]
        );
    }

    #[test]
    fn test_string_literal_is_one_token() {
        assert_eq!(
            lex(r#"cout << "Before while" << endl;"#),
            vec!["cout", "<<", "\"Before while\"", "<<", "endl", ";"]
        );
    }

    #[test]
    fn test_comments_and_preprocessor_dropped() {
        let src = "#include <iostream>\n// comment\nint x; /* block */ int y;";
        assert_eq!(lex(src), vec!["int", "x", ";", "int", "y", ";"]);
    }

    #[test]
    fn test_compound_operators() {
        assert_eq!(lex("a != b && c->d"), vec!["a", "!=", "b", "&&", "c", "->", "d"]);
        assert_eq!(lex("i++"), vec!["i", "++"]);
    }

    #[test]
    fn test_unterminated_string_is_error() {
        assert!(tokenize("\"oops").is_err());
    }

    #[test]
    fn test_escaped_quote_inside_string() {
        assert_eq!(lex(r#""a\"b""#), vec![r#""a\"b""#]);
    }
}
