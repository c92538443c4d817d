//! Property declarations.
//!
//! Grounded on the Data Model's `Property` row. A property is always
//! instance-level and routed through the GObject get/set dispatcher (§4.4
//! step 9), unlike a field which is emitted as a direct member access.

use crate::arena::{ClassId, StatementId, TypeRefId};
use crate::location::SourceSpan;

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PropertyModifiers: u8 {
        const PUBLIC  = 0b0000_0001;
        const PRIVATE = 0b0000_0010;
    }
}

#[derive(Debug, Clone)]
pub struct Property {
    pub name: String,
    pub modifiers: PropertyModifiers,
    pub return_type: TypeRefId,
    pub owner: ClassId,
    pub getter: Option<StatementId>,
    pub setter: Option<StatementId>,
    pub span: SourceSpan,
}

impl Property {
    pub fn is_public(&self) -> bool {
        self.modifiers.contains(PropertyModifiers::PUBLIC)
    }
}
