//! Class declarations.
//!
//! Grounded on the Data Model's `Class` row and on
//! `tir/resolver/class.rs::ClassDefinition`, whose unified fields-and-methods
//! map (both stored as entries of the same `TimuHashMap`) is generalized
//! here into the member-lookup order §4.1.1 relies on: fields, methods and
//! properties are separate collections, but [`Class::lookup_member`] walks
//! them in the same declaration-order, single-namespace fashion the teacher
//! uses for its own field/method map.

use indexmap::IndexMap;

use crate::arena::{ClassId, ConstantId, FieldId, MethodId, PropertyId};
use crate::location::SourceSpan;
use crate::model::symbol::Symbol;

#[derive(Debug, Clone)]
pub struct Class {
    pub name: String,
    /// `None` for a root class or one imported with no recorded base
    /// (matches `base Class (possibly null for root/imported)`).
    pub base: Option<ClassId>,
    pub fields: IndexMap<String, FieldId>,
    pub methods: IndexMap<String, MethodId>,
    pub properties: IndexMap<String, PropertyId>,
    pub constants: IndexMap<String, ConstantId>,
    pub span: SourceSpan,

    /// *(writable)* Set by the Declaration Emitter before the header
    /// struct is emitted, per invariant 3.
    pub has_private_fields: bool,
    /// *(writable)* The user-written `init` method, if any.
    pub init_method: Option<MethodId>,
    /// *(writable)* The user-written `class_init` method, if any.
    pub class_init_method: Option<MethodId>,
}

impl Class {
    /// Looks `name` up directly on this class only (no inheritance walk);
    /// used both by §4.1.1's per-level step and by plain same-class lookup.
    pub fn lookup_own(&self, name: &str) -> Option<Symbol> {
        if let Some(id) = self.fields.get(name) {
            return Some(Symbol::Field(*id));
        }
        if let Some(id) = self.methods.get(name) {
            return Some(Symbol::Method(*id));
        }
        if let Some(id) = self.properties.get(name) {
            return Some(Symbol::Property(*id));
        }
        if let Some(id) = self.constants.get(name) {
            return Some(Symbol::Constant(*id));
        }
        None
    }
}

/// The C identifier triple derived from a namespace-qualified class name,
/// e.g. namespace `N` class `C` yields `nslower = "n_c"`, `upper = "N_C"`,
/// `camel = "NC"`. Computed by [`crate::cname`], not stored on the entity,
/// since it is a pure function of the name and namespace prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassCNames {
    pub nslower: String,
    pub upper: String,
    pub camel: String,
}
