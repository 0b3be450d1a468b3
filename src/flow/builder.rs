//! Flow graph builder
//!
//! A depth-scoped recursive walk over the classified state sequence. The
//! central primitive is the pending transition: a transition whose origin
//! and event are fixed but whose destination is still open. Pendings are
//! carried forward until a concrete next state resolves them, so branch
//! joins, loop back-edges, early exits, and call inlining all fall out of
//! the same mechanism.
//!
//! Accumulators for `break`/`continue`/`return` pendings and for try-body
//! replay are stacks scoped to the enclosing loop, function, or try frame,
//! so analyzing several functions in one unit cannot cross-contaminate.

use std::collections::HashSet;

use crate::error::Result;
use crate::flow::graph::FlowGraph;
use crate::flow::state::{ControlState, StateKind, Visibility};
use crate::flow::transition::{case_event, observable_event, return_event, Event};
use crate::parser::Terminator;

/// Call inlining stops here rather than chasing recursive call chains
const MAX_INLINE_DEPTH: usize = 8;

/// A transition with a fixed origin awaiting its destination
#[derive(Debug, Clone)]
struct Pending {
    from: usize,
    event: Event,
}

/// Result of walking one nested scope
struct BlockResult {
    /// Fall-through pendings leaving the block
    pending: Vec<Pending>,
    /// First state the walk resolved into, if any (do-while back-edge target)
    first: Option<usize>,
    /// Index of the state the walk stopped at (the closing scope marker)
    next: usize,
}

/// Tracks the switch whose body is currently being walked
struct SwitchFrame {
    head: usize,
    body_depth: usize,
}

pub struct GraphBuilder {
    states: Vec<ControlState>,
    source_len: usize,
    /// Indices of function states usable as inlining targets
    functions: Vec<usize>,
    committed: Vec<(usize, usize, Event)>,
    seen: HashSet<(usize, usize, Event)>,
    return_frames: Vec<Vec<Pending>>,
    break_frames: Vec<Vec<Pending>>,
    continue_frames: Vec<Vec<Pending>>,
    try_frames: Vec<Vec<Pending>>,
    switch_frames: Vec<SwitchFrame>,
    first_frames: Vec<Option<usize>>,
    inline_stack: Vec<usize>,
    components: usize,
    initial: usize,
    terminal: usize,
}

impl GraphBuilder {
    /// Build the flow graph for one classified unit
    pub fn build(states: Vec<ControlState>, unit_name: &str) -> Result<FlowGraph> {
        let source_len = states.len();
        let mut states = states;
        states.push(ControlState::pseudo(StateKind::Initial, "initial"));
        states.push(ControlState::pseudo(StateKind::Final, "final"));

        let functions = (0..source_len)
            .filter(|&i| states[i].kind == StateKind::Function)
            .collect();

        let mut builder = Self {
            states,
            source_len,
            functions,
            committed: Vec::new(),
            seen: HashSet::new(),
            return_frames: Vec::new(),
            break_frames: Vec::new(),
            continue_frames: Vec::new(),
            try_frames: Vec::new(),
            switch_frames: Vec::new(),
            first_frames: Vec::new(),
            inline_stack: Vec::new(),
            components: 0,
            initial: source_len,
            terminal: source_len + 1,
        };

        builder.walk_unit();
        tracing::debug!(
            "Built graph for '{}': {} states, {} transitions",
            unit_name,
            builder.states.len(),
            builder.committed.len()
        );

        let Self {
            states,
            committed,
            components,
            ..
        } = builder;
        Ok(FlowGraph::from_parts(unit_name, states, committed, components))
    }

    /// Walk every exported callable, chaining leftover pendings from one
    /// into the next, then converge everything on the shared final state
    fn walk_unit(&mut self) {
        let candidates: Vec<usize> = (0..self.source_len)
            .filter(|&i| {
                self.states[i].is_callable() && self.states[i].visibility != Visibility::Private
            })
            .collect();
        if candidates.is_empty() {
            tracing::warn!("no exported callable states found; graph will be empty");
        }
        self.components = candidates.len();

        let mut pending = vec![Pending {
            from: self.initial,
            event: Event::Lambda,
        }];
        let mut returns = Vec::new();

        for &candidate in &candidates {
            let body_depth = self.states[candidate].scope_depth + 1;
            self.return_frames.push(Vec::new());
            let result = self.walk_block(candidate + 1, body_depth, pending);
            pending = result.pending;
            returns.extend(self.return_frames.pop().unwrap_or_default());
        }

        // All remaining fall-through and return pendings share one exit
        pending.extend(returns);
        let terminal = self.terminal;
        self.resolve(pending, terminal);
    }

    /// Walk states at `depth` starting from `start` until the scope closes
    fn walk_block(&mut self, start: usize, depth: usize, pending: Vec<Pending>) -> BlockResult {
        self.first_frames.push(None);
        let mut pending = pending;
        let mut idx = start;

        while idx < self.source_len {
            let state = &self.states[idx];
            if state.scope_depth < depth {
                break;
            }
            if state.scope_depth > depth {
                // Unbalanced input degrades to a truncated graph, not a crash
                tracing::warn!(
                    "state '{}' at unexpected depth {}; skipping",
                    state.label,
                    state.scope_depth
                );
                idx += 1;
                continue;
            }

            match state.kind {
                StateKind::Statement | StateKind::Attribution => {
                    self.resolve(std::mem::take(&mut pending), idx);
                    let mut out = Vec::new();
                    if let Some(target) = self.referenced_function(idx) {
                        out.extend(self.inline_call(idx, target));
                    }
                    out.push(Pending {
                        from: idx,
                        event: observable_event(&self.states[idx].line),
                    });
                    pending = out;
                    idx += 1;
                }
                StateKind::Jump => {
                    let (out, next) = self.handle_jump(idx, depth, std::mem::take(&mut pending));
                    pending = out;
                    idx = next;
                }
                StateKind::Decision => {
                    if self.states[idx].line.terminator == Terminator::OpenBrace {
                        let (out, next) =
                            self.handle_decision(idx, depth, std::mem::take(&mut pending));
                        pending = out;
                        idx = next;
                    } else {
                        // `case` label: accumulate a dispatch pending from
                        // the enclosing switch head
                        if let Some(frame) = self.switch_frames.last() {
                            if frame.body_depth == depth {
                                pending.push(Pending {
                                    from: frame.head,
                                    event: case_event(&self.states[idx].line),
                                });
                            }
                        }
                        idx += 1;
                    }
                }
                StateKind::Loop => match self.states[idx].line.terminator {
                    Terminator::OpenBrace => match self.states[idx].label.as_str() {
                        "do" => {
                            let (out, next) =
                                self.handle_do(idx, depth, std::mem::take(&mut pending));
                            pending = out;
                            idx = next;
                        }
                        "switch" => {
                            let (out, next) =
                                self.handle_switch(idx, depth, std::mem::take(&mut pending));
                            pending = out;
                            idx = next;
                        }
                        _ => {
                            let (out, next) =
                                self.handle_loop(idx, depth, std::mem::take(&mut pending));
                            pending = out;
                            idx = next;
                        }
                    },
                    _ => {
                        // `while (…);` with no preceding `do`: a loop that
                        // spins on itself until the condition fails
                        self.resolve(std::mem::take(&mut pending), idx);
                        self.commit(idx, idx, Event::True);
                        pending = vec![Pending {
                            from: idx,
                            event: Event::False,
                        }];
                        idx += 1;
                    }
                },
                StateKind::Exception => {
                    if self.states[idx].line.terminator == Terminator::Semicolon {
                        // `throw`: resolves like a statement, exits with the
                        // exception event
                        self.resolve(std::mem::take(&mut pending), idx);
                        pending = vec![Pending {
                            from: idx,
                            event: Event::Exception,
                        }];
                        idx += 1;
                    } else if self.states[idx].label == "catch" {
                        // A catch not consumed by its try (truncated input)
                        tracing::warn!("catch block without matching try; skipping");
                        idx = self.skip_scope(idx);
                    } else {
                        let (out, next) =
                            self.handle_try(idx, depth, std::mem::take(&mut pending));
                        pending = out;
                        idx = next;
                    }
                }
                StateKind::Class
                | StateKind::Struct
                | StateKind::Namespace
                | StateKind::Function
                | StateKind::Constructor
                | StateKind::Destructor
                | StateKind::Operator => {
                    // Nested declarations: bodies are walked via the
                    // candidate loop or call inlining, never inline here
                    idx = self.skip_scope(idx);
                }
                StateKind::ScopeEnd => {
                    if self.states[idx].line.terminator == Terminator::OpenBrace {
                        // bare `{ … }` block: pass pendings straight through
                        let body =
                            self.walk_block(idx + 1, depth + 1, std::mem::take(&mut pending));
                        pending = body.pending;
                        idx = self.after_scope(body.next, depth);
                    } else {
                        idx += 1;
                    }
                }
                StateKind::Initial | StateKind::Final => {
                    idx += 1;
                }
            }
        }

        let first = self.first_frames.pop().flatten();
        if let Some(parent) = self.first_frames.last_mut() {
            if parent.is_none() {
                *parent = first;
            }
        }
        BlockResult {
            pending,
            first,
            next: idx,
        }
    }

    /// `return`/`break`/`continue` divert their pendings to the owning
    /// frame and end the branch; `default` adds a switch dispatch pending
    fn handle_jump(
        &mut self,
        idx: usize,
        depth: usize,
        mut pending: Vec<Pending>,
    ) -> (Vec<Pending>, usize) {
        match self.states[idx].line.first() {
            Some("return") => {
                self.resolve(pending, idx);
                let event = return_event(&self.states[idx].line);
                match self.return_frames.last_mut() {
                    Some(frame) => frame.push(Pending { from: idx, event }),
                    None => tracing::warn!("return outside of any function; dropped"),
                }
                (Vec::new(), self.skip_dead(idx + 1, depth))
            }
            Some("break") => {
                match self.break_frames.last_mut() {
                    Some(frame) => frame.append(&mut pending),
                    None => tracing::warn!("break outside of loop or switch; pendings dropped"),
                }
                (Vec::new(), self.skip_dead(idx + 1, depth))
            }
            Some("continue") => {
                match self.continue_frames.last_mut() {
                    Some(frame) => frame.append(&mut pending),
                    None => tracing::warn!("continue outside of loop; pendings dropped"),
                }
                (Vec::new(), self.skip_dead(idx + 1, depth))
            }
            Some("default") => {
                if let Some(frame) = self.switch_frames.last() {
                    if frame.body_depth == depth {
                        pending.push(Pending {
                            from: frame.head,
                            event: Event::Lambda,
                        });
                    }
                }
                (pending, idx + 1)
            }
            _ => {
                if self.states[idx].line.terminator == Terminator::OpenBrace {
                    // An `else` outside an if-chain: pass straight through
                    let body = self.walk_block(idx + 1, depth + 1, pending);
                    let next = self.after_scope(body.next, depth);
                    (body.pending, next)
                } else {
                    (pending, idx + 1)
                }
            }
        }
    }

    /// `if`/`else if`/`else`: thread the FALSE pending down the chain
    fn handle_decision(
        &mut self,
        idx: usize,
        depth: usize,
        pending: Vec<Pending>,
    ) -> (Vec<Pending>, usize) {
        self.resolve(pending, idx);
        let mut out = Vec::new();
        let mut head = idx;

        loop {
            let body = self.walk_block(
                head + 1,
                depth + 1,
                vec![Pending {
                    from: head,
                    event: Event::True,
                }],
            );
            out.extend(body.pending);
            let next = self.after_scope(body.next, depth);

            match self.states.get(next) {
                Some(s)
                    if s.scope_depth == depth
                        && s.kind == StateKind::Decision
                        && s.label == "else_if" =>
                {
                    self.resolve(
                        vec![Pending {
                            from: head,
                            event: Event::False,
                        }],
                        next,
                    );
                    head = next;
                }
                Some(s)
                    if s.scope_depth == depth
                        && s.kind == StateKind::Jump
                        && s.label == "else"
                        && s.line.terminator == Terminator::OpenBrace =>
                {
                    // The else entry is structural: the FALSE pending flows
                    // through it into the branch body
                    let body = self.walk_block(
                        next + 1,
                        depth + 1,
                        vec![Pending {
                            from: head,
                            event: Event::False,
                        }],
                    );
                    out.extend(body.pending);
                    let after = self.after_scope(body.next, depth);
                    return (out, after);
                }
                _ => {
                    out.push(Pending {
                        from: head,
                        event: Event::False,
                    });
                    return (out, next);
                }
            }
        }
    }

    /// `for`/`while`: TRUE into the body, body exit back onto the head,
    /// FALSE and accumulated breaks onward
    fn handle_loop(
        &mut self,
        idx: usize,
        depth: usize,
        pending: Vec<Pending>,
    ) -> (Vec<Pending>, usize) {
        self.resolve(pending, idx);
        self.break_frames.push(Vec::new());
        self.continue_frames.push(Vec::new());

        let body = self.walk_block(
            idx + 1,
            depth + 1,
            vec![Pending {
                from: idx,
                event: Event::True,
            }],
        );

        let mut back = body.pending;
        back.extend(self.continue_frames.pop().unwrap_or_default());
        self.resolve(back, idx);

        let mut out = vec![Pending {
            from: idx,
            event: Event::False,
        }];
        out.extend(self.break_frames.pop().unwrap_or_default());
        (out, self.after_scope(body.next, depth))
    }

    /// `do { … } while (…);`: the body runs unconditionally, the trailing
    /// test receives its completion and branches back or forward
    fn handle_do(
        &mut self,
        idx: usize,
        depth: usize,
        pending: Vec<Pending>,
    ) -> (Vec<Pending>, usize) {
        self.break_frames.push(Vec::new());
        self.continue_frames.push(Vec::new());

        let body = self.walk_block(idx + 1, depth + 1, pending);
        let next = self.after_scope(body.next, depth);

        let mut arrived = body.pending;
        arrived.extend(self.continue_frames.pop().unwrap_or_default());
        let breaks = self.break_frames.pop().unwrap_or_default();

        match self.states.get(next) {
            Some(s)
                if s.scope_depth == depth
                    && s.kind == StateKind::Loop
                    && s.line.terminator == Terminator::Semicolon =>
            {
                let test = next;
                self.resolve(arrived, test);
                match body.first {
                    Some(first) => self.commit(test, first, Event::True),
                    None => tracing::warn!("empty do body; back-edge dropped"),
                }
                let mut out = vec![Pending {
                    from: test,
                    event: Event::False,
                }];
                out.extend(breaks);
                (out, test + 1)
            }
            _ => {
                tracing::warn!("do block without trailing while; treated as plain scope");
                arrived.extend(breaks);
                (arrived, next)
            }
        }
    }

    /// `switch`: incoming flow terminates on the head; each case label adds
    /// a dispatch pending from the head, fall-through pendings carry across
    /// case boundaries, breaks collect at the switch exit
    fn handle_switch(
        &mut self,
        idx: usize,
        depth: usize,
        pending: Vec<Pending>,
    ) -> (Vec<Pending>, usize) {
        self.resolve(pending, idx);
        self.break_frames.push(Vec::new());
        self.switch_frames.push(SwitchFrame {
            head: idx,
            body_depth: depth + 1,
        });

        let body = self.walk_block(idx + 1, depth + 1, Vec::new());

        self.switch_frames.pop();
        let mut out = body.pending;
        out.extend(self.break_frames.pop().unwrap_or_default());
        (out, self.after_scope(body.next, depth))
    }

    /// `try`/`catch`: transitions committed inside the try body are logged
    /// and replayed as incoming pendings of every catch body
    fn handle_try(
        &mut self,
        idx: usize,
        depth: usize,
        pending: Vec<Pending>,
    ) -> (Vec<Pending>, usize) {
        self.try_frames.push(Vec::new());
        let body = self.walk_block(idx + 1, depth + 1, pending);
        let log = self.try_frames.pop().unwrap_or_default();

        let mut out = body.pending;
        let mut next = self.after_scope(body.next, depth);

        loop {
            match self.states.get(next) {
                Some(s)
                    if s.scope_depth == depth
                        && s.kind == StateKind::Exception
                        && s.label == "catch"
                        && s.line.terminator == Terminator::OpenBrace =>
                {
                    let replay = log.to_vec();
                    let handler = self.walk_block(next + 1, depth + 1, replay);
                    out.extend(handler.pending);
                    next = self.after_scope(handler.next, depth);
                }
                _ => break,
            }
        }
        (out, next)
    }

    /// Inline a same-unit call: a lambda marker edge to the function entry,
    /// its body walked from the call site, returns spliced back
    fn inline_call(&mut self, call: usize, target: usize) -> Vec<Pending> {
        if self.inline_stack.contains(&target) || self.inline_stack.len() >= MAX_INLINE_DEPTH {
            tracing::warn!(
                "inlining limit reached at '{}'; call treated as a plain statement",
                self.states[target].label
            );
            return Vec::new();
        }

        self.commit(call, target, Event::Lambda);
        self.inline_stack.push(target);
        self.return_frames.push(Vec::new());

        let body_depth = self.states[target].scope_depth + 1;
        let body = self.walk_block(
            target + 1,
            body_depth,
            vec![Pending {
                from: call,
                event: Event::Lambda,
            }],
        );

        let mut out = body.pending;
        out.extend(self.return_frames.pop().unwrap_or_default());
        self.inline_stack.pop();
        out
    }

    /// First unqualified token naming a known sibling function
    fn referenced_function(&self, idx: usize) -> Option<usize> {
        let line = &self.states[idx].line;
        for (pos, token) in line.tokens.iter().enumerate() {
            if pos > 0 && matches!(line.tokens[pos - 1].as_str(), "." | "->" | "::") {
                continue;
            }
            if let Some(&function) = self
                .functions
                .iter()
                .find(|&&f| self.states[f].label == *token)
            {
                return Some(function);
            }
        }
        None
    }

    /// Fix the destination of every pending transition
    fn resolve(&mut self, pending: Vec<Pending>, target: usize) {
        if let Some(first) = self.first_frames.last_mut() {
            first.get_or_insert(target);
        }
        for p in pending {
            self.commit(p.from, target, p.event);
        }
    }

    /// Commit one transition, structurally deduplicated; transitions inside
    /// an active try body are logged for catch replay
    fn commit(&mut self, from: usize, to: usize, event: Event) {
        let key = (from, to, event.clone());
        if self.seen.insert(key) {
            if let Some(log) = self.try_frames.last_mut() {
                log.push(Pending {
                    from,
                    event: event.clone(),
                });
            }
            self.committed.push((from, to, event));
        }
    }

    /// Index just past a scope-opening state's matching close
    fn skip_scope(&self, entry: usize) -> usize {
        if self.states[entry].line.terminator != Terminator::OpenBrace {
            return entry + 1;
        }
        let body_depth = self.states[entry].scope_depth + 1;
        let mut idx = entry + 1;
        while idx < self.source_len && self.states[idx].scope_depth >= body_depth {
            idx += 1;
        }
        // consume the scope-end marker itself, if the input was balanced
        match self.states.get(idx) {
            Some(s) if s.kind == StateKind::ScopeEnd => idx + 1,
            _ => idx,
        }
    }

    /// Skip unreachable states after an early exit, stopping at the scope
    /// close or at the next dispatch label of the enclosing switch
    fn skip_dead(&self, start: usize, depth: usize) -> usize {
        let in_switch = self
            .switch_frames
            .last()
            .map(|f| f.body_depth == depth)
            .unwrap_or(false);
        let mut idx = start;
        while idx < self.source_len {
            let state = &self.states[idx];
            if state.scope_depth < depth {
                break;
            }
            if in_switch && state.scope_depth == depth && is_dispatch_label(state) {
                break;
            }
            idx += 1;
        }
        idx
    }

    /// Skip the closing marker of a nested scope if it is the next state
    fn after_scope(&self, idx: usize, depth: usize) -> usize {
        match self.states.get(idx) {
            Some(s) if s.kind == StateKind::ScopeEnd && s.scope_depth == depth => idx + 1,
            _ => idx,
        }
    }
}

/// `case` and `default` labels are switch dispatch targets
fn is_dispatch_label(state: &ControlState) -> bool {
    match state.kind {
        StateKind::Decision => state.line.terminator != Terminator::OpenBrace,
        StateKind::Jump => state.line.first() == Some("default"),
        _ => false,
    }
}
