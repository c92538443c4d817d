//! Field declarations.
//!
//! Grounded on the Data Model's `Field` row.

use crate::arena::TypeRefId;
use crate::location::SourceSpan;
use crate::model::expression::ExpressionId;

bitflags::bitflags! {
    /// A field's accessibility/storage modifiers.
    ///
    /// Kept as a bitflags set rather than a `Vec<Modifier>` the way a
    /// parser-facing AST might, since lowering only ever asks yes/no
    /// questions of it (`is_private()`, `is_static()`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FieldModifiers: u8 {
        const PUBLIC  = 0b0000_0001;
        const PRIVATE = 0b0000_0010;
        const STATIC  = 0b0000_0100;
    }
}

impl FieldModifiers {
    pub fn is_public(&self) -> bool {
        self.contains(FieldModifiers::PUBLIC)
    }

    pub fn is_private(&self) -> bool {
        !self.is_public()
    }

    pub fn is_static(&self) -> bool {
        self.contains(FieldModifiers::STATIC)
    }
}

#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub modifiers: FieldModifiers,
    pub type_ref: TypeRefId,
    pub initializer: Option<ExpressionId>,
    pub is_struct_field: bool,
    /// Explicit C name override. Only meaningful for namespace-level
    /// fields, which emit `cname` if present, else `nslower_name`.
    pub cname: Option<String>,
    pub span: SourceSpan,
}
