//! Enum declarations.
//!
//! Grounded on the Data Model's `Enum` row: an ordered list of named values,
//! each carrying its own C identifier (assigned once at declaration by the
//! front-end, not by this core).

use crate::location::SourceSpan;

#[derive(Debug, Clone)]
pub struct EnumValue {
    pub name: String,
    pub cname: String,
}

#[derive(Debug, Clone)]
pub struct EnumDef {
    pub name: String,
    pub values: Vec<EnumValue>,
    pub span: SourceSpan,
}

impl EnumDef {
    pub fn value_index(&self, name: &str) -> Option<usize> {
        self.values.iter().position(|value| value.name == name)
    }
}
