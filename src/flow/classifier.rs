//! Statement classifier
//!
//! One pass over the segmented lines, producing one control state per
//! scope-opening, scope-closing, statement, or label line. Tracks the
//! nesting depth, the visibility in force, and the enclosing class /
//! namespace names needed to recognize constructors. Owns the sparse id
//! counter: only states that will participate in the synthesized model
//! are numbered.

use crate::flow::state::{before_parenthesis, sanitize, ControlState, StateId, StateKind, Visibility};
use crate::parser::{Line, Terminator};

/// Keywords that open a control scope, in match priority order
const SCOPE_KINDS: &[(&str, StateKind)] = &[
    ("class", StateKind::Class),
    ("struct", StateKind::Struct),
    ("namespace", StateKind::Namespace),
    ("for", StateKind::Loop),
    ("do", StateKind::Loop),
    ("while", StateKind::Loop),
    ("switch", StateKind::Loop),
    ("if", StateKind::Decision),
    ("try", StateKind::Exception),
    ("catch", StateKind::Exception),
];

pub struct Classifier {
    depth: usize,
    visibility: Visibility,
    class_name: Option<String>,
    namespaces: Vec<String>,
    next_id: StateId,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier {
    pub fn new() -> Self {
        Self {
            depth: 0,
            visibility: Visibility::None,
            class_name: None,
            namespaces: Vec::new(),
            next_id: 0,
        }
    }

    /// Classify a full line sequence into the ordered state list
    pub fn classify(mut self, lines: &[Line]) -> Vec<ControlState> {
        let mut states = Vec::new();
        for line in lines {
            self.classify_line(line, &mut states);
        }
        tracing::debug!(
            "Classified {} lines into {} states ({} identified)",
            lines.len(),
            states.len(),
            states.iter().filter(|s| s.id.is_some()).count()
        );
        states
    }

    fn classify_line(&mut self, line: &Line, states: &mut Vec<ControlState>) {
        match line.terminator {
            Terminator::OpenBrace => states.push(self.scope_entry(line)),
            Terminator::CloseBrace => {
                self.depth = self.depth.saturating_sub(1);
                if self.depth == 0 {
                    // Back at the top level: visibility and class context end
                    self.visibility = Visibility::None;
                    self.class_name = None;
                }
                states.push(ControlState::new(
                    StateKind::ScopeEnd,
                    "",
                    self.depth,
                    line.clone(),
                ));
            }
            Terminator::Semicolon => {
                if line.is_empty() {
                    return;
                }
                states.push(self.statement(line));
            }
            Terminator::Colon => {
                if let Some(state) = self.label_line(line) {
                    states.push(state);
                }
            }
            Terminator::None => {}
        }
    }

    /// Classify a `{`-terminated line and advance the depth
    fn scope_entry(&mut self, line: &Line) -> ControlState {
        let kind = scope_kind(line);
        let label = self.scope_label(line, kind);

        let mut kind = kind;
        let mut visibility = Visibility::None;
        match kind {
            StateKind::Class | StateKind::Struct => self.class_name = Some(label.clone()),
            StateKind::Namespace => self.namespaces.push(label.clone()),
            StateKind::Function => {
                if Some(&label) == self.class_name.as_ref() || self.namespaces.contains(&label) {
                    kind = StateKind::Constructor;
                } else if line.contains("operator") {
                    kind = StateKind::Operator;
                    visibility = self.visibility;
                } else {
                    visibility = self.visibility;
                }
            }
            StateKind::Destructor => visibility = self.visibility,
            _ => {}
        }

        let mut state = ControlState::new(kind, label, self.depth, line.clone())
            .with_visibility(visibility);
        if self.takes_branch_id(&state) {
            state = state.with_id(self.bump_id());
        }
        self.depth += 1;
        state
    }

    /// Classify a `;`-terminated statement line
    fn statement(&mut self, line: &Line) -> ControlState {
        let kind = statement_kind(line);
        let label = sanitize(&line.tokens.join(" "));
        let mut state = ControlState::new(kind, label, self.depth, line.clone());

        let identified = match kind {
            // Only `return` marks an observable exit; bare break/continue
            // and default labels are structural
            StateKind::Jump => line.first() == Some("return"),
            StateKind::Decision | StateKind::Loop => true,
            StateKind::Exception => true,
            StateKind::Attribution | StateKind::Statement => true,
            _ => false,
        };
        if identified {
            state = state.with_id(self.bump_id());
        }
        state
    }

    /// Classify a `:`-terminated label line (visibility or case label)
    fn label_line(&mut self, line: &Line) -> Option<ControlState> {
        match line.first() {
            Some("public") => {
                self.visibility = Visibility::Public;
                None
            }
            Some("private") | Some("protected") => {
                self.visibility = Visibility::Private;
                None
            }
            Some("case") => {
                let value = line.token(1).map(sanitize).unwrap_or_default();
                let state = ControlState::new(
                    StateKind::Decision,
                    format!("case_{}", value),
                    self.depth,
                    line.clone(),
                )
                .with_id(self.bump_id());
                Some(state)
            }
            Some("default") => Some(ControlState::new(
                StateKind::Jump,
                "default",
                self.depth,
                line.clone(),
            )),
            _ => None,
        }
    }

    /// Decision/loop heads are numbered unless they are purely structural
    fn takes_branch_id(&self, state: &ControlState) -> bool {
        state.is_branching() && !matches!(state.label.as_str(), "do" | "switch" | "else")
    }

    fn bump_id(&mut self) -> StateId {
        self.next_id += 1;
        self.next_id
    }

    /// Label of a scope-opening line
    fn scope_label(&self, line: &Line, kind: StateKind) -> String {
        match kind {
            StateKind::Class | StateKind::Struct | StateKind::Namespace => line
                .tokens
                .iter()
                .skip_while(|t| matches!(t.as_str(), "class" | "struct" | "namespace"))
                .find(|t| is_identifier(t))
                .cloned()
                .unwrap_or_else(|| sanitize(&line.tokens.join(" "))),
            StateKind::Decision => {
                if line.first() == Some("else") {
                    "else_if".to_string()
                } else {
                    "if".to_string()
                }
            }
            StateKind::Loop => {
                for keyword in ["for", "do", "while", "switch"] {
                    if line.contains(keyword) {
                        return keyword.to_string();
                    }
                }
                sanitize(&line.tokens.join(" "))
            }
            StateKind::Exception => {
                if line.contains("catch") {
                    "catch".to_string()
                } else {
                    "try".to_string()
                }
            }
            StateKind::Jump => "else".to_string(),
            // Function-like entries: the declarator name is the last
            // identifier before the parameter list
            _ => declarator_name(line)
                .unwrap_or_else(|| sanitize(before_parenthesis(&line.tokens.join(" ")))),
        }
    }
}

/// Kind of a scope-opening line, from the first recognized keyword
fn scope_kind(line: &Line) -> StateKind {
    if line.is_empty() {
        return StateKind::ScopeEnd;
    }
    for token in &line.tokens {
        if token == "else" && line.tokens.len() == 1 {
            return StateKind::Jump;
        }
        if token == "~" {
            return StateKind::Destructor;
        }
        if let Some((_, kind)) = SCOPE_KINDS.iter().find(|(keyword, _)| keyword == token) {
            return *kind;
        }
    }
    StateKind::Function
}

/// Kind of a `;`-terminated line, from the first recognized token
fn statement_kind(line: &Line) -> StateKind {
    for token in &line.tokens {
        match token.as_str() {
            "return" | "break" | "continue" | "default" => return StateKind::Jump,
            "=" => return StateKind::Attribution,
            "while" => return StateKind::Loop,
            "case" => return StateKind::Decision,
            "throw" => return StateKind::Exception,
            _ => {}
        }
    }
    StateKind::Statement
}

fn declarator_name(line: &Line) -> Option<String> {
    let mut name = None;
    for token in &line.tokens {
        if token == "(" {
            break;
        }
        if is_identifier(token) {
            name = Some(token.clone());
        }
    }
    name
}

fn is_identifier(token: &str) -> bool {
    token
        .chars()
        .next()
        .map(|c| c.is_ascii_alphabetic() || c == '_')
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_unit;

    fn classify_source(src: &str) -> Vec<ControlState> {
        let lines = parse_unit(src).unwrap();
        Classifier::new().classify(&lines)
    }

    #[test]
    fn test_function_and_statements() {
        let states = classify_source("int f ( ) { x = 1; g(); return 0; }");
        assert_eq!(states[0].kind, StateKind::Function);
        assert_eq!(states[0].label, "f");
        assert_eq!(states[0].id, None);
        assert_eq!(states[1].kind, StateKind::Attribution);
        assert_eq!(states[2].kind, StateKind::Statement);
        assert_eq!(states[3].kind, StateKind::Jump);
        assert!(states[3].id.is_some(), "return carries an id");
        assert_eq!(states[4].kind, StateKind::ScopeEnd);
    }

    #[test]
    fn test_depth_tracking() {
        let states = classify_source("void f ( ) { if (x) { a(); } }");
        assert_eq!(states[0].scope_depth, 0); // f
        assert_eq!(states[1].scope_depth, 1); // if
        assert_eq!(states[2].scope_depth, 2); // a()
        assert_eq!(states[3].scope_depth, 1); // close if
        assert_eq!(states[4].scope_depth, 0); // close f
    }

    #[test]
    fn test_branch_id_sparsity() {
        let states = classify_source(
            "void f ( ) { if (x) { } else { } do { } while (x); switch (x) { } }",
        );
        let by_label = |label: &str| states.iter().find(|s| s.label == label).unwrap();
        assert!(by_label("if").id.is_some());
        assert!(by_label("else").id.is_none());
        assert!(by_label("do").id.is_none());
        assert!(by_label("switch").id.is_none());
        // the do-while closing test is a `;`-terminated loop state with an id
        let tail = states
            .iter()
            .find(|s| s.kind == StateKind::Loop && s.label.starts_with("while"))
            .unwrap();
        assert!(tail.id.is_some());
    }

    #[test]
    fn test_ids_are_monotonic() {
        let states = classify_source("void f ( ) { a(); if (x) { b(); } c(); }");
        let ids: Vec<_> = states.iter().filter_map(|s| s.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
        assert!(!ids.is_empty());
    }

    #[test]
    fn test_constructor_reclassification() {
        let states = classify_source(
            "class Triangle { public: Triangle (int a) { } int area ( ) { return 0; } };",
        );
        let ctor = states.iter().find(|s| s.label == "Triangle" && s.kind != StateKind::Class);
        assert_eq!(ctor.unwrap().kind, StateKind::Constructor);
        let area = states.iter().find(|s| s.label == "area").unwrap();
        assert_eq!(area.kind, StateKind::Function);
        assert_eq!(area.visibility, Visibility::Public);
    }

    #[test]
    fn test_visibility_tracking() {
        let states = classify_source(
            "class C { private: int hidden ( ) { return 0; } public: int shown ( ) { return 1; } };",
        );
        let hidden = states.iter().find(|s| s.label == "hidden").unwrap();
        assert_eq!(hidden.visibility, Visibility::Private);
        let shown = states.iter().find(|s| s.label == "shown").unwrap();
        assert_eq!(shown.visibility, Visibility::Public);
    }

    #[test]
    fn test_else_if_label() {
        let states = classify_source("void f ( ) { if (a) { } else if (b) { } else { } }");
        let labels: Vec<_> = states
            .iter()
            .filter(|s| s.kind == StateKind::Decision || s.kind == StateKind::Jump)
            .map(|s| s.label.clone())
            .collect();
        assert_eq!(labels, vec!["if", "else_if", "else"]);
    }

    #[test]
    fn test_case_and_default_labels() {
        let states =
            classify_source("void f ( ) { switch (x) { case 1 : a(); break; default : b(); } }");
        let case = states.iter().find(|s| s.label == "case_1").unwrap();
        assert_eq!(case.kind, StateKind::Decision);
        assert!(case.id.is_some());
        let default = states.iter().find(|s| s.label == "default").unwrap();
        assert_eq!(default.kind, StateKind::Jump);
        assert!(default.id.is_none());
        let brk = states.iter().find(|s| s.label == "break").unwrap();
        assert!(brk.id.is_none(), "unconditional break is structural");
    }

    #[test]
    fn test_throw_is_identified_exception() {
        let states = classify_source("void f ( ) { throw error; }");
        let throw = states.iter().find(|s| s.kind == StateKind::Exception).unwrap();
        assert!(throw.id.is_some());
    }

    #[test]
    fn test_empty_semicolon_lines_dropped() {
        let states = classify_source("void f ( ) { ; ; }");
        assert_eq!(states.len(), 2); // entry + scope end only
    }
}
