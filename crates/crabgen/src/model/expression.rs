//! Expressions.
//!
//! Grounded on the Data Model's `Expression` row and on the teacher's
//! tagged-union AST style (`FileStatementAst`, `ExpressionAst`, both
//! `EnumIs`-derived): polymorphism over expression kinds is a flat enum
//! dispatched by `match`, per the Design Notes' "avoid class-hierarchy
//! lowering" guidance.

pub use crate::arena::ExpressionId;
use crate::arena::{FieldId, PropertyId, TypeRefId};
use crate::location::SourceSpan;
use crate::model::symbol::Symbol;
use crate::model::type_ref::TypeSymbol;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    NotEq,
    Lt,
    Gt,
    Le,
    Ge,
    And,
    Or,
    BitwiseAnd,
    BitwiseOr,
}

impl BinaryOperator {
    /// The fixed infix symbol table from §4.2.
    pub fn c_symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Eq => "==",
            BinaryOperator::NotEq => "!=",
            BinaryOperator::Lt => "<",
            BinaryOperator::Gt => ">",
            BinaryOperator::Le => "<=",
            BinaryOperator::Ge => ">=",
            BinaryOperator::And => "&&",
            BinaryOperator::Or => "||",
            BinaryOperator::BitwiseAnd => "&",
            BinaryOperator::BitwiseOr => "|",
        }
    }

    /// `true` for the two operators whose type the Resolver propagates
    /// (pointer arithmetic support); see §4.1 "Operation".
    pub fn propagates_operand_type(&self) -> bool {
        matches!(self, BinaryOperator::Add | BinaryOperator::Sub)
    }
}

#[derive(Debug, Clone)]
pub enum ContainerKind {
    Array,
    List,
}

#[derive(Debug, Clone)]
pub enum Literal {
    Int(i64),
    Char(char),
    String(String),
    Bool(bool),
    Null,
}

#[derive(Debug, Clone)]
pub enum ExpressionKind {
    Literal(Literal),
    This,
    SimpleName(String),
    MemberAccess { left: ExpressionId, right: String },
    Invocation { callee: ExpressionId, arguments: Vec<ExpressionId> },
    ElementAccess { operand: ExpressionId, index: ExpressionId },
    Operation { op: BinaryOperator, left: Option<ExpressionId>, right: ExpressionId },
    Unary { negate: bool, operand: ExpressionId },
    Cast { target: TypeRefId, inner: ExpressionId },
    ObjectCreation { target: TypeRefId, named_arguments: Vec<(String, ExpressionId)> },
    Is { target: TypeRefId, inner: ExpressionId },
    Parenthesized(ExpressionId),
    Assignment { left: ExpressionId, right: ExpressionId },
    /// A use-site `ref`/`out` marker on a simple name, emitted with a
    /// leading `&` (§4.2 "Ref/out parameter markers").
    RefMarker(ExpressionId),
}

#[derive(Debug, Clone)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub span: SourceSpan,
}

/// Type Resolver output for one [`Expression`], kept in a side table keyed
/// by `ExpressionId` per §3.1, rather than mutated in place.
#[derive(Debug, Clone, Default)]
pub struct ResolvedInfo {
    pub static_type_symbol: Option<TypeSymbol>,
    pub array_type: bool,
    pub field: Option<FieldId>,
    pub property: Option<PropertyId>,
    pub static_symbol: Option<Symbol>,
}

impl ResolvedInfo {
    pub fn is_resolved(&self) -> bool {
        self.static_type_symbol.is_some()
    }
}
