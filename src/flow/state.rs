//! Control state representation

use crate::parser::Line;
use serde::{Deserialize, Serialize};

/// Sparse model identifier. Only states that participate in the synthesized
/// model carry one; everything else is control-flow connective tissue.
pub type StateId = u32;

/// The role a state plays in the extracted control flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateKind {
    Function,
    Constructor,
    Destructor,
    Operator,
    Class,
    Struct,
    Namespace,
    Decision,
    Loop,
    Exception,
    Jump,
    Attribution,
    Statement,
    Initial,
    Final,
    ScopeEnd,
}

/// Member visibility, inherited from the last access-specifier line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Visibility {
    Public,
    Private,
    #[default]
    None,
}

/// A node in the control-flow graph: one decision point, loop head,
/// statement, or structural marker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlState {
    pub kind: StateKind,
    pub label: String,
    pub visibility: Visibility,
    pub scope_depth: usize,
    /// Present only for states that appear in the model-checker domains
    pub id: Option<StateId>,
    /// The line this state was classified from
    pub line: Line,
}

impl ControlState {
    pub fn new(kind: StateKind, label: impl Into<String>, scope_depth: usize, line: Line) -> Self {
        Self {
            kind,
            label: label.into(),
            visibility: Visibility::None,
            scope_depth,
            id: None,
            line,
        }
    }

    /// Synthetic state that exists outside the source scopes
    pub fn pseudo(kind: StateKind, label: impl Into<String>) -> Self {
        Self::new(kind, label, 0, Line::default())
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_id(mut self, id: StateId) -> Self {
        self.id = Some(id);
        self
    }

    /// Token used for this state in the model's state domain
    pub fn model_name(&self) -> Option<String> {
        self.id.map(|id| format!("{}_{}", self.label, id))
    }

    /// States that can serve as entry points or inlining targets
    pub fn is_callable(&self) -> bool {
        matches!(
            self.kind,
            StateKind::Function | StateKind::Constructor | StateKind::Operator
        )
    }

    /// Decision and loop origins get the boolean guard in the model
    pub fn is_branching(&self) -> bool {
        matches!(self.kind, StateKind::Decision | StateKind::Loop)
    }
}

/// Collapse a token sequence into a `[A-Za-z0-9_]` label: runs of other
/// characters become a single underscore, trailing underscores are trimmed
pub(crate) fn sanitize(text: &str) -> String {
    let mut output = String::new();
    let mut gap = false;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if gap && !output.is_empty() {
                output.push('_');
            }
            gap = false;
            output.push(c);
        } else {
            gap = true;
        }
    }
    output
}

/// Text up to the first opening parenthesis
pub(crate) fn before_parenthesis(text: &str) -> &str {
    match text.find('(') {
        Some(position) => &text[..position],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("std :: cout << \"x\""), "std_cout_x");
        assert_eq!(sanitize("Before while"), "Before_while");
        assert_eq!(sanitize("if"), "if");
        assert_eq!(sanitize("else if"), "else_if");
        assert_eq!(sanitize("  trailing  "), "trailing");
    }

    #[test]
    fn test_before_parenthesis() {
        assert_eq!(before_parenthesis("while (x > 0)"), "while ");
        assert_eq!(before_parenthesis("else"), "else");
    }

    #[test]
    fn test_model_name() {
        let state = ControlState::pseudo(StateKind::Statement, "a").with_id(7);
        assert_eq!(state.model_name(), Some("a_7".to_string()));

        let silent = ControlState::pseudo(StateKind::ScopeEnd, "");
        assert_eq!(silent.model_name(), None);
    }

    #[test]
    fn test_callable_kinds() {
        assert!(ControlState::pseudo(StateKind::Function, "f").is_callable());
        assert!(ControlState::pseudo(StateKind::Constructor, "C").is_callable());
        assert!(!ControlState::pseudo(StateKind::Destructor, "~C").is_callable());
        assert!(!ControlState::pseudo(StateKind::Statement, "s").is_callable());
    }
}
