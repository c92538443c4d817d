//! Struct declarations.
//!
//! Grounded on the Data Model's `Struct` row: "same shape as Class minus
//! inheritance" plus a `reference_type` flag. Unlike `Class`, no base is
//! tracked and member lookup (§4.1 "Member access... Struct") never walks
//! an ancestor chain.

use indexmap::IndexMap;

use crate::arena::{FieldId, MethodId};
use crate::location::SourceSpan;
use crate::model::symbol::Symbol;

#[derive(Debug, Clone)]
pub struct StructDef {
    pub name: String,
    pub fields: IndexMap<String, FieldId>,
    pub methods: IndexMap<String, MethodId>,
    /// `true` if instances are passed by value rather than by pointer.
    pub reference_type: bool,
    pub span: SourceSpan,
}

impl StructDef {
    pub fn lookup_own(&self, name: &str) -> Option<Symbol> {
        if let Some(id) = self.fields.get(name) {
            return Some(Symbol::Field(*id));
        }
        if let Some(id) = self.methods.get(name) {
            return Some(Symbol::Method(*id));
        }
        None
    }
}
