//! Namespaces.
//!
//! Grounded on the Data Model's `Namespace` row. An empty `name` denotes
//! the global namespace (§3 "empty name = global"; see §9 on how global
//! dependencies are handled).

use indexmap::IndexMap;

use crate::arena::{ClassId, EnumId, FieldId, MethodId, NamespaceId, StructId};
use crate::model::symbol::Symbol;

#[derive(Debug, Clone)]
pub struct Namespace {
    /// Empty for the global namespace.
    pub name: String,
    pub lower_prefix: String,
    pub upper_prefix: String,
    pub classes: IndexMap<String, ClassId>,
    pub structs: IndexMap<String, StructId>,
    pub enums: IndexMap<String, EnumId>,
    pub free_methods: IndexMap<String, MethodId>,
    pub fields: IndexMap<String, FieldId>,
    /// `true` when this namespace represents an externally imported
    /// package rather than a namespace declared in the program under
    /// compilation.
    pub import: bool,
    /// The header to `#include` when `import` is set (§4.5).
    pub include_filename: Option<String>,
    pub parent: Option<NamespaceId>,
}

impl Namespace {
    pub fn is_global(&self) -> bool {
        self.name.is_empty()
    }

    pub fn lookup_own(&self, name: &str) -> Option<Symbol> {
        if let Some(id) = self.classes.get(name) {
            return Some(Symbol::Class(*id));
        }
        if let Some(id) = self.structs.get(name) {
            return Some(Symbol::Struct(*id));
        }
        if let Some(id) = self.enums.get(name) {
            return Some(Symbol::Enum(*id));
        }
        if let Some(id) = self.free_methods.get(name) {
            return Some(Symbol::Method(*id));
        }
        if let Some(id) = self.fields.get(name) {
            return Some(Symbol::Field(*id));
        }
        None
    }
}
