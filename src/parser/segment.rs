//! Statement-line segmentation
//!
//! Groups the flat token stream into [`Line`]s, closing a line whenever a
//! structural delimiter is reached. A handful of C++ constructs need
//! special treatment so the delimiters keep their structural meaning:
//!
//! - `for (…;…;…)` headers: the semicolons inside the parentheses do not
//!   close the line
//! - `public:` / `private:` / `protected:` close at the keyword itself
//! - `case …:` / `default:` close at the colon
//! - brace-less `if (…) stmt;` is recovered into a synthetic
//!   `if (…) { stmt; }` block so the builder sees a uniform shape

use super::{Line, Terminator};

#[derive(Default)]
struct Segmenter {
    lines: Vec<Line>,
    current: Vec<String>,
    if_statement: bool,
    for_loop: bool,
    case_condition: bool,
    open: usize,
    close: usize,
}

/// Segment a token stream into statement lines
pub fn segment(tokens: &[String]) -> Vec<Line> {
    let mut s = Segmenter::default();

    for token in tokens {
        match token.as_str() {
            "public" | "private" | "protected" => {
                s.push(token);
                s.finish(Terminator::Colon);
            }
            "case" | "default" => {
                s.case_condition = true;
                s.push(token);
            }
            "if" => {
                s.if_statement = true;
                s.push(token);
            }
            "for" => {
                s.for_loop = true;
                s.push(token);
            }
            "(" => {
                if s.for_loop {
                    s.open += 1;
                }
                s.push(token);
            }
            ")" => {
                if s.for_loop {
                    s.close += 1;
                }
                s.push(token);
            }
            "{" => {
                if s.open == s.close {
                    s.open = 0;
                    s.close = 0;
                    s.for_loop = false;
                    s.if_statement = false;
                    s.finish(Terminator::OpenBrace);
                } else {
                    s.push(token);
                }
            }
            ":" => {
                if s.case_condition {
                    s.case_condition = false;
                    s.finish(Terminator::Colon);
                }
                // Visibility colons were already closed at the keyword;
                // anything else (ctor initializer lists) stays inline
            }
            ";" => {
                if s.if_statement {
                    s.if_statement = false;
                    s.recover_braceless_if();
                } else if !s.for_loop {
                    s.finish(Terminator::Semicolon);
                }
            }
            "}" => {
                if s.for_loop {
                    s.push(token);
                } else {
                    s.finish(Terminator::CloseBrace);
                }
            }
            _ => s.push(token),
        }
    }

    if !s.current.is_empty() {
        s.finish(Terminator::None);
    }
    s.lines
}

impl Segmenter {
    fn push(&mut self, token: &str) {
        self.current.push(token.to_string());
    }

    fn finish(&mut self, terminator: Terminator) {
        let tokens = std::mem::take(&mut self.current);
        self.lines.push(Line::new(tokens, terminator));
    }

    /// Split `if (…) stmt` into an `if (…) {` line, the `stmt ;` line, and
    /// a closing `}` so a brace-less body gets a scope of its own
    fn recover_braceless_if(&mut self) {
        let split = condition_end(&self.current);
        let body = self.current.split_off(split);

        self.finish(Terminator::OpenBrace);
        self.current = body;
        self.finish(Terminator::Semicolon);
        self.finish(Terminator::CloseBrace);
    }
}

/// Index one past the parenthesis that balances the condition
fn condition_end(tokens: &[String]) -> usize {
    let mut open = 0usize;
    let mut close = 0usize;
    for (index, token) in tokens.iter().enumerate() {
        match token.as_str() {
            "(" => open += 1,
            ")" => {
                close += 1;
                if open == close {
                    return index + 1;
                }
            }
            _ => {}
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::tokenize;

    fn lines_of(src: &str) -> Vec<Line> {
        segment(&tokenize(src).unwrap())
    }

    #[test]
    fn test_basic_block() {
        let lines = lines_of("void f ( ) { x = 1; }");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].terminator, Terminator::OpenBrace);
        assert_eq!(lines[0].tokens, vec!["void", "f", "(", ")"]);
        assert_eq!(lines[1].terminator, Terminator::Semicolon);
        assert_eq!(lines[2].terminator, Terminator::CloseBrace);
    }

    #[test]
    fn test_for_header_keeps_semicolons_inline() {
        let lines = lines_of("for (int i = 0; i < 10; i++) { a(); }");
        assert_eq!(lines[0].terminator, Terminator::OpenBrace);
        assert!(lines[0].contains("for"));
        assert!(lines[0].contains("<"));
        // body statement and scope close follow
        assert_eq!(lines[1].terminator, Terminator::Semicolon);
        assert_eq!(lines[2].terminator, Terminator::CloseBrace);
    }

    #[test]
    fn test_visibility_closes_at_keyword() {
        let lines = lines_of("public: int x;");
        assert_eq!(lines[0].tokens, vec!["public"]);
        assert_eq!(lines[0].terminator, Terminator::Colon);
        assert_eq!(lines[1].tokens, vec!["int", "x"]);
    }

    #[test]
    fn test_case_closes_at_colon() {
        let lines = lines_of("case 1 : x(); break;");
        assert_eq!(lines[0].tokens, vec!["case", "1"]);
        assert_eq!(lines[0].terminator, Terminator::Colon);
        assert_eq!(lines[1].tokens, vec!["x", "(", ")"]);
        assert_eq!(lines[2].tokens, vec!["break"]);
    }

    #[test]
    fn test_braceless_if_recovery() {
        let lines = lines_of("if (x > 0) y = 1; z();");
        assert_eq!(lines[0].tokens, vec!["if", "(", "x", ">", "0", ")"]);
        assert_eq!(lines[0].terminator, Terminator::OpenBrace);
        assert_eq!(lines[1].tokens, vec!["y", "=", "1"]);
        assert_eq!(lines[1].terminator, Terminator::Semicolon);
        assert_eq!(lines[2].terminator, Terminator::CloseBrace);
        assert!(lines[2].is_empty());
        assert_eq!(lines[3].tokens, vec!["z", "(", ")"]);
    }

    #[test]
    fn test_constructor_initializer_list_stays_inline() {
        let lines = lines_of("Triangle (int a) : a_(a) { }");
        assert_eq!(lines[0].terminator, Terminator::OpenBrace);
        assert!(lines[0].contains("a_"));
        assert!(!lines[0].contains(":"));
    }

    #[test]
    fn test_do_while_tail_is_semicolon_line() {
        let lines = lines_of("do { a(); } while (x < 3);");
        let tail = lines.last().unwrap();
        assert_eq!(tail.tokens, vec!["while", "(", "x", "<", "3", ")"]);
        assert_eq!(tail.terminator, Terminator::Semicolon);
    }
}
