//! Compilation units.
//!
//! Grounded on the Data Model's `SourceFile` row. Named `CompilationUnit`
//! here rather than `SourceFile` to keep it distinct from
//! [`crate::location::SourceFileId`], which is the lighter-weight
//! path+text identity used purely for diagnostic rendering; a
//! `CompilationUnit` is the richer front-end entity that owns a namespace
//! tree and drives one `.c`/`.h` output pair.

use std::collections::BTreeSet;

use crate::arena::NamespaceId;
use crate::location::SourceFileId;
use crate::model::type_ref::TypeSymbol;

#[derive(Debug, Clone)]
pub struct CompilationUnit {
    /// Basename without extension, e.g. `"person"` for `person.ext`.
    pub filename: String,
    pub file: SourceFileId,
    pub root_namespace: NamespaceId,
    pub child_namespaces: Vec<NamespaceId>,
    /// Using-directive namespace names, in declaration order.
    pub using_directives: Vec<String>,
    /// Every foreign type symbol this unit's declarations reference,
    /// consumed by the Dependency Resolver (§4.5). A `BTreeSet` keeps
    /// dependency emission in a deterministic, sorted order independent of
    /// discovery order.
    pub dep_types: BTreeSet<DepType>,
}

/// A single dependency-resolver-visible reference: enough to decide
/// `#include` vs. forward declaration vs. skip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DepType {
    Class(crate::arena::ClassId),
    Struct(crate::arena::StructId),
    Enum(crate::arena::EnumId),
}

impl DepType {
    pub fn from_symbol(symbol: TypeSymbol) -> Option<Self> {
        match symbol {
            TypeSymbol::Class(id) => Some(DepType::Class(id)),
            TypeSymbol::Struct(id) => Some(DepType::Struct(id)),
            TypeSymbol::Enum(id) => Some(DepType::Enum(id)),
            TypeSymbol::Primitive(_) | TypeSymbol::Namespace(_) => None,
        }
    }
}
