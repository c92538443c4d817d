//! Method declarations.
//!
//! Grounded on the Data Model's `Method` row. `cname`, `cparameters`,
//! `cdecl1` and `virtual_super_class` are the Declaration Emitter's Pass 1
//! output; per §3.1 they live in the side table [`MethodCdecl`] rather than
//! on this struct, keyed by `MethodId`, mirroring the teacher's
//! reserve-then-publish split in `tir/signature.rs`.

use crate::arena::{ClassId, StatementId, TypeRefId};
use crate::location::SourceSpan;

bitflags::bitflags! {
    /// At most one of `ABSTRACT`, `VIRTUAL`, `OVERRIDE` may be set
    /// (invariant 2); this is enforced by [`Method::dispatch_kind`], not by
    /// the bit layout itself.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MethodModifiers: u8 {
        const PUBLIC   = 0b0000_0001;
        const PRIVATE  = 0b0000_0010;
        const STATIC   = 0b0000_0100;
        const ABSTRACT = 0b0000_1000;
        const VIRTUAL  = 0b0001_0000;
        const OVERRIDE = 0b0010_0000;
    }
}

/// The dispatch discipline a method follows, derived from its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchKind {
    Plain,
    Abstract,
    Virtual,
    Override,
}

impl MethodModifiers {
    pub fn is_public(&self) -> bool {
        self.contains(MethodModifiers::PUBLIC)
    }

    pub fn is_static(&self) -> bool {
        self.contains(MethodModifiers::STATIC)
    }

    pub fn dispatch_kind(&self) -> DispatchKind {
        if self.contains(MethodModifiers::OVERRIDE) {
            DispatchKind::Override
        } else if self.contains(MethodModifiers::VIRTUAL) {
            DispatchKind::Virtual
        } else if self.contains(MethodModifiers::ABSTRACT) {
            DispatchKind::Abstract
        } else {
            DispatchKind::Plain
        }
    }
}

#[derive(Debug, Clone)]
pub struct FormalParameter {
    pub name: String,
    pub type_ref: TypeRefId,
    pub span: SourceSpan,
}

#[derive(Debug, Clone)]
pub struct Method {
    pub name: String,
    pub modifiers: MethodModifiers,
    pub owner: Option<ClassId>,
    pub parameters: Vec<FormalParameter>,
    pub return_type: TypeRefId,
    /// `None` for an abstract method.
    pub body: Option<StatementId>,
    pub returns_modified_pointer: bool,
    pub instance_last: bool,
    pub is_struct_method: bool,
    pub span: SourceSpan,
}

/// Pass 1 output for a [`Method`], see §4.4.
///
/// Assigned exactly once per method (invariant 4, testable property "every
/// method ends Pass 1 with `cname`, `cparameters`, `cdecl1` set exactly
/// once").
#[derive(Debug, Clone)]
pub struct MethodCdecl {
    pub cname: String,
    pub cparameters: Vec<String>,
    pub cdecl1: String,
    pub virtual_super_class: Option<ClassId>,
}
