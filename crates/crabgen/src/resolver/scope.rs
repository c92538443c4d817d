//! Lexical scope stack.
//!
//! Grounded on `tir/scope.rs`'s `Scope`/parent-chain design, generalized
//! per the Design Notes (§9 "Scope chain"): rather than the teacher's
//! single flattened per-method scope, this crate maintains a real stack —
//! pushed on Block entry, popped on exit — so a variable declared in one
//! nested block cannot leak into a sibling block. The corrective fix is
//! deliberate (see DESIGN.md's Open Question log).

use indexmap::IndexMap;

use crate::arena::{ClassId, NamespaceId, TypeRefId};
use crate::model::context::Context;
use crate::model::symbol::Symbol;

/// One entry in the scope stack: a block's local variable table plus the
/// enclosing method/class/namespace context needed once the block-local
/// and method-local tables are exhausted.
#[derive(Debug, Clone)]
pub struct ScopeFrame {
    variables: IndexMap<String, TypeRefId>,
}

impl ScopeFrame {
    fn new() -> Self {
        Self { variables: IndexMap::new() }
    }
}

/// A lexical chain: `Block → containing method → containing class → its
/// namespace → root namespace → each using-directive namespace`
/// (invariant 6).
///
/// Holds no reference to [`Context`]: every lookup takes the context by
/// parameter instead, so a `ScopeStack` can be threaded alongside a `&mut
/// Context` without a borrow conflict while the Type Resolver writes
/// `ResolvedInfo` back into the same context.
pub struct ScopeStack {
    frames: Vec<ScopeFrame>,
    pub current_class: Option<ClassId>,
    pub current_namespace: NamespaceId,
    pub using_directives: Vec<NamespaceId>,
}

impl ScopeStack {
    pub fn new(current_class: Option<ClassId>, current_namespace: NamespaceId, using_directives: Vec<NamespaceId>) -> Self {
        Self { frames: vec![ScopeFrame::new()], current_class, current_namespace, using_directives }
    }

    /// Opens a new scope on Block entry.
    pub fn push_block(&mut self) {
        self.frames.push(ScopeFrame::new());
    }

    /// Closes the innermost scope on Block exit. Any local declared inside
    /// is no longer reachable afterward.
    pub fn pop_block(&mut self) {
        self.frames.pop();
        debug_assert!(!self.frames.is_empty(), "popped the method-level frame");
    }

    pub fn declare_local(&mut self, name: impl Into<String>, type_ref: TypeRefId) {
        self.frames.last_mut().expect("at least one frame").variables.insert(name.into(), type_ref);
    }

    /// Step (a): current block scope chain, innermost frame first.
    fn lookup_locals(&self, name: &str) -> Option<TypeRefId> {
        self.frames.iter().rev().find_map(|frame| frame.variables.get(name).copied())
    }

    /// Resolves `name` through the full chain in invariant 6's order,
    /// stopping at the first match and reporting every using-directive hit
    /// so the caller can detect ambiguity.
    pub fn lookup(&self, context: &Context, name: &str) -> LookupResult {
        if let Some(type_ref) = self.lookup_locals(name) {
            return LookupResult::Local(type_ref);
        }

        if let Some(class) = self.current_class {
            if let Some(symbol) = crate::resolver::lookup_inherited_member(context, class, name) {
                return LookupResult::Symbol(symbol);
            }
        }

        let current_namespace = context.namespace(self.current_namespace);
        if let Some(symbol) = current_namespace.lookup_own(name) {
            return LookupResult::Symbol(symbol);
        }

        let root = context.namespace(context.root_namespace);
        if root.name.is_empty() && self.current_namespace != context.root_namespace {
            if let Some(symbol) = root.lookup_own(name) {
                return LookupResult::Symbol(symbol);
            }
        }

        let hits: Vec<Symbol> = self
            .using_directives
            .iter()
            .filter_map(|namespace_id| context.namespace(*namespace_id).lookup_own(name))
            .collect();

        match hits.len() {
            0 => LookupResult::NotFound,
            1 => LookupResult::Symbol(hits[0]),
            count => LookupResult::Ambiguous(count),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum LookupResult {
    Local(TypeRefId),
    Symbol(Symbol),
    Ambiguous(usize),
    NotFound,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::ArenaId;

    #[test]
    fn block_locals_do_not_leak_to_sibling_blocks() {
        let context = Context::new();
        let mut scope = ScopeStack::new(None, context.root_namespace, Vec::new());

        scope.push_block();
        scope.declare_local("x", TypeRefId::from_index(0));
        assert!(matches!(scope.lookup(&context, "x"), LookupResult::Local(_)));
        scope.pop_block();

        scope.push_block();
        assert!(matches!(scope.lookup(&context, "x"), LookupResult::NotFound));
        scope.pop_block();
    }
}
