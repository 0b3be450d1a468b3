//! Transition events and event extraction
//!
//! Every transition carries one [`Event`]: the branch outcome of a
//! decision or loop, a silent `lambda` step, an `exception` transfer, or
//! an observable string extracted from the statement (output text, case
//! value, return value).

use crate::flow::state::sanitize;
use crate::parser::Line;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Label on a transition
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Event {
    /// Decision or loop condition held
    True,
    /// Decision or loop condition failed
    False,
    /// Silent, non-observable step
    Lambda,
    /// Control transfer raised by a throwing statement
    Exception,
    /// Observable extracted token (output text, case value, return value)
    Observable(String),
}

impl Event {
    /// Build an observable event, normalizing boolean literals to the
    /// branch events so they share the decision axis
    pub fn observable(text: impl Into<String>) -> Self {
        let text = sanitize(&text.into());
        match text.as_str() {
            "true" => Event::True,
            "false" => Event::False,
            "" => Event::Lambda,
            _ => Event::Observable(text),
        }
    }

    /// TRUE/FALSE branch outcomes share the model's boolean axis
    pub fn is_boolean(&self) -> bool {
        matches!(self, Event::True | Event::False)
    }

    /// Trivial events never enter the event domain
    pub fn is_trivial(&self) -> bool {
        matches!(self, Event::True | Event::False | Event::Lambda)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Event::True => write!(f, "TRUE"),
            Event::False => write!(f, "FALSE"),
            Event::Lambda => write!(f, "lambda"),
            Event::Exception => write!(f, "exception"),
            Event::Observable(text) => write!(f, "{}", text),
        }
    }
}

/// Extract the observable event of a plain statement: the first token
/// streamed to `cout` that is not the insertion operator
pub fn observable_event(line: &Line) -> Event {
    let mut seen_cout = false;
    for token in &line.tokens {
        if token == "cout" {
            seen_cout = true;
            continue;
        }
        if seen_cout && token != "<<" {
            return Event::observable(token.as_str());
        }
    }
    Event::Lambda
}

/// Extract the value a `return` statement carries, `lambda` for a bare
/// `return;`
pub fn return_event(line: &Line) -> Event {
    match line.token(1) {
        Some(value) => Event::observable(value),
        None => Event::Lambda,
    }
}

/// Extract the dispatch value of a `case` label
pub fn case_event(line: &Line) -> Event {
    match line.token(1) {
        Some(value) => Event::observable(value),
        None => Event::Lambda,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{Line, Terminator};

    fn line(tokens: &[&str]) -> Line {
        Line::new(
            tokens.iter().map(|t| t.to_string()).collect(),
            Terminator::Semicolon,
        )
    }

    #[test]
    fn test_observable_event_from_cout() {
        let l = line(&["std", "::", "cout", "<<", "\"Before while\"", "<<", "endl"]);
        assert_eq!(
            observable_event(&l),
            Event::Observable("Before_while".to_string())
        );
    }

    #[test]
    fn test_statement_without_output_is_silent() {
        let l = line(&["x", "=", "x", "+", "1"]);
        assert_eq!(observable_event(&l), Event::Lambda);
    }

    #[test]
    fn test_return_event() {
        assert_eq!(
            return_event(&line(&["return", "5"])),
            Event::Observable("5".to_string())
        );
        assert_eq!(return_event(&line(&["return"])), Event::Lambda);
    }

    #[test]
    fn test_boolean_literals_normalize() {
        assert_eq!(return_event(&line(&["return", "true"])), Event::True);
        assert_eq!(return_event(&line(&["return", "false"])), Event::False);
    }

    #[test]
    fn test_case_event() {
        assert_eq!(
            case_event(&line(&["case", "2"])),
            Event::Observable("2".to_string())
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Event::True.to_string(), "TRUE");
        assert_eq!(Event::Lambda.to_string(), "lambda");
        assert_eq!(Event::Exception.to_string(), "exception");
        assert_eq!(Event::Observable("x".into()).to_string(), "x");
    }
}
