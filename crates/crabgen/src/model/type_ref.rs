//! Type references.
//!
//! Grounded on the Data Model's `TypeRef` row and on `tir/object_signature.rs`'s
//! `TypeValue` discriminants, which this crate's [`TypeKind`] mirrors: every
//! type a value can have is either a primitive, a user `Class`/`Struct`/
//! `Enum`, or a `Namespace` (used only as the left operand of a member
//! access, never as a value's own type).

use strum_macros::{EnumDiscriminants, EnumIs};

use crate::arena::{ClassId, EnumId, NamespaceId, StructId};

/// Built-in primitive types registered in the root namespace.
///
/// Grounded on `tir/object_signature.rs::PrimitiveType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Int,
    Bool,
    String,
    Void,
}

impl PrimitiveType {
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveType::Int => "int",
            PrimitiveType::Bool => "bool",
            PrimitiveType::String => "string",
            PrimitiveType::Void => "void",
        }
    }

    /// The glib/C spelling emitted in generated signatures and casts.
    pub fn c_type_name(&self) -> &'static str {
        match self {
            PrimitiveType::Int => "gint",
            PrimitiveType::Bool => "gboolean",
            PrimitiveType::String => "gchar*",
            PrimitiveType::Void => "void",
        }
    }
}

/// The resolved kind backing a `static_type_symbol`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIs, EnumDiscriminants)]
#[strum_discriminants(name(TypeSymbolDiscriminant))]
pub enum TypeSymbol {
    Primitive(PrimitiveType),
    Class(ClassId),
    Struct(StructId),
    Enum(EnumId),
    Namespace(NamespaceId),
}

/// A type annotation as written by the front-end: `int`, `string[]`,
/// `var`, a user class name, and so on.
///
/// `symbol` starts unset (`None`) for a `var`-declared local until the
/// Statement Emitter resolves the initializer and back-fills it; every
/// other TypeRef arrives from the front-end with `symbol` already set,
/// matching "entities are produced by the front-end; the core only
/// augments writable fields."
#[derive(Debug, Clone)]
pub struct TypeRef {
    pub symbol: Option<TypeSymbol>,
    pub array_type: bool,
    /// The literal spelling, when the front-end recorded one (`"int"`,
    /// `"string"`, `"var"`, …); `None` once the core has synthesized a
    /// TypeRef internally (e.g. a loop variable's element type).
    pub type_name: Option<String>,
}

impl TypeRef {
    pub fn resolved(symbol: TypeSymbol, array_type: bool) -> Self {
        Self { symbol: Some(symbol), array_type, type_name: None }
    }

    pub fn inferred() -> Self {
        Self { symbol: None, array_type: false, type_name: Some("var".to_string()) }
    }

    pub fn is_var(&self) -> bool {
        self.type_name.as_deref() == Some("var")
    }
}
