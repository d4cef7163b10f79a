//! Lexical scope tracking.
//!
//! One [`Context`] exists per compilation unit: a persistent global
//! symbol table beneath a stack of frames, one frame per currently-open
//! rule set. The parser pushes and pops frames as it enters and leaves
//! declaration blocks; pushes and pops must balance by end of parse.

use rustc_hash::FxHashMap;
use sable_ir::{Expression, Name, SelectorPart};

/// Variable table: name to last-assigned expression, re-assignment
/// overwrites.
pub type SymbolTable = FxHashMap<Name, Expression>;

/// One open rule set's scope: its variable bindings plus its selector
/// group (used to resolve the parent selector `&` in nested rule sets).
#[derive(Clone, Debug, Default)]
pub struct ScopeFrame {
    pub symbols: SymbolTable,
    pub selectors: Vec<SelectorPart>,
}

/// The scope stack for one compilation unit.
///
/// Created at compilation start and discarded at completion; mutated
/// only by the single parsing thread.
#[derive(Debug, Default)]
pub struct Context {
    global: SymbolTable,
    stack: Vec<ScopeFrame>,
}

impl Context {
    /// Fresh context with an empty global table and no open scopes.
    pub fn new() -> Self {
        Context {
            global: SymbolTable::default(),
            stack: Vec::new(),
        }
    }

    /// Number of currently-open scopes.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Check whether any rule set scope is open.
    pub fn has_open_scope(&self) -> bool {
        !self.stack.is_empty()
    }

    /// Open a new rule set scope. Selectors are attached separately once
    /// parsed, via [`Context::set_top_selectors`].
    pub fn push_rule_set(&mut self) {
        self.stack.push(ScopeFrame::default());
    }

    /// Close the innermost rule set scope, discarding its variable table.
    ///
    /// An unbalanced pop is an internal defect, not a recoverable state.
    pub fn pop_rule_set(&mut self) {
        debug_assert!(!self.stack.is_empty(), "unbalanced rule set pop");
        self.stack.pop();
    }

    /// Attach the parsed selector group to the innermost open scope.
    pub fn set_top_selectors(&mut self, selectors: Vec<SelectorPart>) {
        if let Some(frame) = self.stack.last_mut() {
            frame.selectors = selectors;
        }
    }

    /// The innermost open scope, if any.
    pub fn top(&self) -> Option<&ScopeFrame> {
        self.stack.last()
    }

    /// Selector group of the innermost open rule set — what the parent
    /// selector `&` of an upcoming child rule set resolves to.
    pub fn parent_selectors(&self) -> Option<Vec<SelectorPart>> {
        self.stack.last().map(|frame| frame.selectors.clone())
    }

    /// Resolve a variable read: innermost scope outward, then the global
    /// table. A miss is not an error — the reference stays unresolved.
    pub fn lookup(&self, name: Name) -> Option<&Expression> {
        for frame in self.stack.iter().rev() {
            if let Some(expr) = frame.symbols.get(&name) {
                return Some(expr);
            }
        }
        self.global.get(&name)
    }

    /// Write a variable into the innermost open scope, or the global
    /// table when no scope is open.
    pub fn assign(&mut self, name: Name, value: Expression) {
        match self.stack.last_mut() {
            Some(frame) => {
                frame.symbols.insert(name, value);
            }
            None => {
                self.global.insert(name, value);
            }
        }
    }

    /// Write a variable into the global table (the `!global` flag path).
    pub fn assign_global(&mut self, name: Name, value: Expression) {
        self.global.insert(name, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sable_ir::{Number, Span};

    fn num(value: f64) -> Expression {
        Expression::Number(Number::new(value), Span::DUMMY)
    }

    #[test]
    fn global_write_when_no_scope_open() {
        let interner = sable_ir::StringInterner::new();
        let name = interner.intern("foo");
        let mut ctx = Context::new();
        ctx.assign(name, num(1.0));
        assert_eq!(ctx.lookup(name), Some(&num(1.0)));
    }

    #[test]
    fn inner_scope_shadows_outer() {
        let interner = sable_ir::StringInterner::new();
        let name = interner.intern("x");
        let mut ctx = Context::new();
        ctx.assign(name, num(1.0));
        ctx.push_rule_set();
        ctx.assign(name, num(2.0));
        assert_eq!(ctx.lookup(name), Some(&num(2.0)));
        ctx.pop_rule_set();
        assert_eq!(ctx.lookup(name), Some(&num(1.0)));
    }

    #[test]
    fn lookup_walks_outward() {
        let interner = sable_ir::StringInterner::new();
        let outer = interner.intern("outer");
        let mut ctx = Context::new();
        ctx.push_rule_set();
        ctx.assign(outer, num(1.0));
        ctx.push_rule_set();
        // Visible from the inner scope.
        assert_eq!(ctx.lookup(outer), Some(&num(1.0)));
        ctx.pop_rule_set();
        ctx.pop_rule_set();
        // Scope-local binding died with its scope.
        assert_eq!(ctx.lookup(outer), None);
    }

    #[test]
    fn global_flag_survives_scope_exit() {
        let interner = sable_ir::StringInterner::new();
        let name = interner.intern("g");
        let mut ctx = Context::new();
        ctx.push_rule_set();
        ctx.assign(name, num(3.0));
        ctx.assign_global(name, num(3.0));
        ctx.pop_rule_set();
        assert_eq!(ctx.lookup(name), Some(&num(3.0)));
    }

    #[test]
    fn reassignment_overwrites() {
        let interner = sable_ir::StringInterner::new();
        let name = interner.intern("x");
        let mut ctx = Context::new();
        ctx.assign(name, num(1.0));
        ctx.assign(name, num(2.0));
        assert_eq!(ctx.lookup(name), Some(&num(2.0)));
    }

    #[test]
    fn parent_selectors_track_top_frame() {
        let mut ctx = Context::new();
        assert_eq!(ctx.parent_selectors(), None);
        ctx.push_rule_set();
        ctx.set_top_selectors(vec![SelectorPart::Universal]);
        assert_eq!(
            ctx.parent_selectors(),
            Some(vec![SelectorPart::Universal])
        );
        ctx.pop_rule_set();
    }
}
