//! Scope symbols.
//!
//! A `Symbol` is a named entry reachable during lookup: a type declaration,
//! a member, or a local. Grounded on the Data Model's `Symbol (scope entry)`
//! row and generalized from the teacher's `TypeValue`/`AstSignatureValue`
//! tagged unions (`EnumDiscriminants`-derived) to cover locals as well as
//! declarations.

use strum_macros::{EnumDiscriminants, EnumIs};

use crate::arena::{ClassId, ConstantId, EnumId, FieldId, MethodId, NamespaceId, PropertyId, ScopeId, StructId, TypeRefId};

/// What a [`Symbol`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIs, EnumDiscriminants)]
#[strum_discriminants(name(SymbolKind), derive(Hash))]
pub enum Symbol {
    Class(ClassId),
    Struct(StructId),
    Enum(EnumId),
    EnumValue(EnumId, usize),
    Namespace(NamespaceId),
    Method(MethodId),
    Field(FieldId),
    Property(PropertyId),
    Constant(ConstantId),
    LocalVariable(TypeRefId),
    Block(ScopeId),
}

impl Symbol {
    /// The symbol's kind, a cheap discriminant comparable without owning
    /// the underlying id.
    pub fn kind(&self) -> SymbolKind {
        SymbolKind::from(self)
    }
}
