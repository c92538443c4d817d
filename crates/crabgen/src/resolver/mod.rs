//! The Type Resolver (§4.1).
//!
//! Walks an already-parsed expression tree bottom-up and fills in each
//! node's [`ResolvedInfo`] side-table entry. Grounded on `tir/resolver`'s
//! `ResolveAst` trait / `GetItem` dispatch: each expression kind gets its
//! own resolution rule, matched on the tagged union rather than dispatched
//! through a trait object, mirroring the teacher's flat `match` over
//! `ExpressionAst` variants.

pub mod scope;

use crate::arena::{ClassId, ExpressionId};
use crate::error::CodegenError;
use crate::model::context::Context;
use crate::model::expression::{BinaryOperator, ExpressionKind, Literal, ResolvedInfo};
use crate::model::method::DispatchKind;
use crate::model::symbol::Symbol;
use crate::model::type_ref::{PrimitiveType, TypeSymbol};
use scope::{LookupResult, ScopeStack};

/// Walks `class`'s ancestor chain (§4.1.1) looking for `name`, skipping any
/// hit whose method carries the `override` modifier so the search keeps
/// climbing toward the declaring (virtual/abstract) ancestor instead of
/// re-finding the same override lower down the chain.
pub fn lookup_inherited_member(context: &Context, class: ClassId, name: &str) -> Option<Symbol> {
    for ancestor in context.class_chain(class) {
        let Some(symbol) = context.class(ancestor).lookup_own(name) else { continue };
        if let Symbol::Method(method_id) = symbol {
            if context.method(method_id).modifiers.dispatch_kind() == DispatchKind::Override {
                continue;
            }
        }
        return Some(symbol);
    }
    None
}

/// The explicit `left.right` form of §4.1.1: always walks the full
/// inheritance chain and turns an exhausted search into `MemberNotFound`,
/// unlike a bare name (which may instead fall through to an enclosing
/// namespace).
fn resolve_member_on_class(context: &Context, class: ClassId, name: &str, access_span: &crate::location::SourceSpan) -> Result<Symbol, CodegenError> {
    lookup_inherited_member(context, class, name).ok_or_else(|| CodegenError::member_not_found(name, access_span))
}

fn symbol_static_type(context: &Context, symbol: Symbol) -> Option<TypeSymbol> {
    match symbol {
        Symbol::Class(id) => Some(TypeSymbol::Class(id)),
        Symbol::Struct(id) => Some(TypeSymbol::Struct(id)),
        Symbol::Enum(id) => Some(TypeSymbol::Enum(id)),
        Symbol::EnumValue(id, _) => Some(TypeSymbol::Enum(id)),
        Symbol::Namespace(id) => Some(TypeSymbol::Namespace(id)),
        Symbol::Method(id) => context.type_ref(context.method(id).return_type).symbol,
        Symbol::Field(id) => context.type_ref(context.field(id).type_ref).symbol,
        Symbol::Property(id) => context.type_ref(context.property(id).return_type).symbol,
        Symbol::Constant(_) => None,
        Symbol::LocalVariable(type_ref) => context.type_ref(type_ref).symbol,
        Symbol::Block(_) => None,
    }
}

fn info_for_symbol(context: &Context, symbol: Symbol) -> ResolvedInfo {
    let array_type = match symbol {
        Symbol::Field(id) => context.type_ref(context.field(id).type_ref).array_type,
        Symbol::Property(id) => context.type_ref(context.property(id).return_type).array_type,
        Symbol::LocalVariable(type_ref) => context.type_ref(type_ref).array_type,
        _ => false,
    };
    ResolvedInfo {
        static_type_symbol: symbol_static_type(context, symbol),
        array_type,
        field: matches!(symbol, Symbol::Field(_)).then(|| match symbol {
            Symbol::Field(id) => id,
            _ => unreachable!(),
        }),
        property: matches!(symbol, Symbol::Property(_)).then(|| match symbol {
            Symbol::Property(id) => id,
            _ => unreachable!(),
        }),
        static_symbol: Some(symbol),
    }
}

fn primitive_info(context: &Context, primitive: PrimitiveType) -> ResolvedInfo {
    ResolvedInfo {
        static_type_symbol: context.primitive_symbol(primitive.name()),
        ..ResolvedInfo::default()
    }
}

/// Resolves `id` and every sub-expression it contains, writing results into
/// `context`'s side table. Safe to call more than once on the same tree:
/// [`Context::set_resolved_info`] is a no-op once an id is already resolved.
pub fn resolve_expression(context: &mut Context, scope: &mut ScopeStack, id: ExpressionId) -> Result<(), CodegenError> {
    let expression = context.expression(id).clone();
    let span = expression.span.clone();

    let info = match expression.kind {
        ExpressionKind::Literal(Literal::Int(_)) | ExpressionKind::Literal(Literal::Char(_)) => ResolvedInfo::default(),
        ExpressionKind::Literal(Literal::String(_)) => primitive_info(context, PrimitiveType::String),
        ExpressionKind::Literal(Literal::Bool(_)) | ExpressionKind::Literal(Literal::Null) => ResolvedInfo::default(),

        ExpressionKind::This => ResolvedInfo {
            static_type_symbol: scope.current_class.map(TypeSymbol::Class),
            static_symbol: scope.current_class.map(Symbol::Class),
            ..ResolvedInfo::default()
        },

        ExpressionKind::SimpleName(name) => match scope.lookup(context, &name) {
            LookupResult::Local(type_ref) => ResolvedInfo {
                static_type_symbol: context.type_ref(type_ref).symbol,
                array_type: context.type_ref(type_ref).array_type,
                static_symbol: Some(Symbol::LocalVariable(type_ref)),
                ..ResolvedInfo::default()
            },
            LookupResult::Symbol(symbol) => info_for_symbol(context, symbol),
            LookupResult::Ambiguous(count) => return Err(CodegenError::ambiguous_using(name, count, &span)),
            LookupResult::NotFound => return Err(CodegenError::unresolved_symbol(name, &span)),
        },

        ExpressionKind::MemberAccess { left, right } => {
            resolve_expression(context, scope, left)?;
            let left_info = context.resolved_info(left).cloned().unwrap_or_default();
            match left_info.static_type_symbol {
                Some(TypeSymbol::Class(class_id)) => {
                    let symbol = resolve_member_on_class(context, class_id, &right, &span)?;
                    info_for_symbol(context, symbol)
                }
                Some(TypeSymbol::Struct(struct_id)) => match context.struct_def(struct_id).lookup_own(&right) {
                    Some(symbol) => info_for_symbol(context, symbol),
                    None => return Err(CodegenError::member_not_found(right, &span)),
                },
                Some(TypeSymbol::Enum(enum_id)) => match context.enum_def(enum_id).value_index(&right) {
                    Some(index) => info_for_symbol(context, Symbol::EnumValue(enum_id, index)),
                    None => return Err(CodegenError::member_not_found(right, &span)),
                },
                Some(TypeSymbol::Namespace(namespace_id)) => match context.namespace(namespace_id).lookup_own(&right) {
                    Some(symbol) => info_for_symbol(context, symbol),
                    None => return Err(CodegenError::unresolved_symbol(right, &span)),
                },
                Some(TypeSymbol::Primitive(_)) | None => return Err(CodegenError::bad_member_access(&span)),
            }
        }

        ExpressionKind::Invocation { callee, arguments } => {
            resolve_expression(context, scope, callee)?;
            for argument in &arguments {
                resolve_expression(context, scope, *argument)?;
            }
            let callee_info = context.resolved_info(callee).cloned().unwrap_or_default();
            match callee_info.static_symbol {
                Some(Symbol::Method(method_id)) => {
                    let return_type = context.method(method_id).return_type;
                    ResolvedInfo {
                        static_type_symbol: context.type_ref(return_type).symbol,
                        array_type: context.type_ref(return_type).array_type,
                        ..ResolvedInfo::default()
                    }
                }
                _ => ResolvedInfo::default(),
            }
        }

        ExpressionKind::ElementAccess { operand, index } => {
            resolve_expression(context, scope, operand)?;
            resolve_expression(context, scope, index)?;
            let operand_info = context.resolved_info(operand).cloned().unwrap_or_default();
            if !operand_info.array_type {
                return Err(CodegenError::non_array_indexed(&span));
            }
            ResolvedInfo { static_type_symbol: operand_info.static_type_symbol, ..ResolvedInfo::default() }
        }

        ExpressionKind::Operation { op, left, right } => {
            if let Some(left) = left {
                resolve_expression(context, scope, left)?;
            }
            resolve_expression(context, scope, right)?;

            match op {
                BinaryOperator::Add | BinaryOperator::Sub => {
                    let source = left.or(Some(right)).unwrap();
                    context.resolved_info(source).cloned().unwrap_or_default()
                }
                BinaryOperator::Eq
                | BinaryOperator::NotEq
                | BinaryOperator::Lt
                | BinaryOperator::Gt
                | BinaryOperator::Le
                | BinaryOperator::Ge
                | BinaryOperator::And
                | BinaryOperator::Or => primitive_info(context, PrimitiveType::Bool),
                BinaryOperator::Mul | BinaryOperator::Div | BinaryOperator::BitwiseAnd | BinaryOperator::BitwiseOr => {
                    primitive_info(context, PrimitiveType::Int)
                }
            }
        }

        ExpressionKind::Unary { operand, .. } => {
            resolve_expression(context, scope, operand)?;
            context.resolved_info(operand).cloned().unwrap_or_default()
        }

        ExpressionKind::Cast { target, inner } => {
            resolve_expression(context, scope, inner)?;
            let type_ref = context.type_ref(target);
            ResolvedInfo { static_type_symbol: type_ref.symbol, array_type: type_ref.array_type, ..ResolvedInfo::default() }
        }

        ExpressionKind::ObjectCreation { target, named_arguments } => {
            for (_, value) in &named_arguments {
                resolve_expression(context, scope, *value)?;
            }
            let type_ref = context.type_ref(target);
            ResolvedInfo { static_type_symbol: type_ref.symbol, array_type: type_ref.array_type, ..ResolvedInfo::default() }
        }

        ExpressionKind::Is { inner, .. } => {
            resolve_expression(context, scope, inner)?;
            let inner_info = context.resolved_info(inner).cloned().unwrap_or_default();
            if !matches!(inner_info.static_type_symbol, Some(TypeSymbol::Class(_))) {
                return Err(CodegenError::is_on_non_class(&span));
            }
            primitive_info(context, PrimitiveType::Bool)
        }

        ExpressionKind::Parenthesized(inner) => {
            resolve_expression(context, scope, inner)?;
            context.resolved_info(inner).cloned().unwrap_or_default()
        }

        ExpressionKind::Assignment { left, right } => {
            resolve_expression(context, scope, left)?;
            resolve_expression(context, scope, right)?;
            ResolvedInfo::default()
        }

        ExpressionKind::RefMarker(inner) => {
            resolve_expression(context, scope, inner)?;
            context.resolved_info(inner).cloned().unwrap_or_default()
        }
    };

    context.set_resolved_info(id, info);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::{SourceFileId, SourceSpan};
    use crate::model::expression::{Expression, ExpressionKind, Literal};

    fn span() -> SourceSpan {
        SourceSpan::new(SourceFileId::new("t.lang", "x"), 0..1)
    }

    #[test]
    fn string_literal_resolves_to_root_string_primitive() {
        let mut context = Context::new();
        let id = context.push_expression(Expression { kind: ExpressionKind::Literal(Literal::String("hi".into())), span: span() });
        let mut scope = ScopeStack::new(None, context.root_namespace, Vec::new());

        resolve_expression(&mut context, &mut scope, id).unwrap();

        let info = context.resolved_info(id).unwrap();
        assert_eq!(info.static_type_symbol, context.primitive_symbol("string"));
    }

    #[test]
    fn unknown_simple_name_is_unresolved_symbol() {
        let mut context = Context::new();
        let id = context.push_expression(Expression { kind: ExpressionKind::SimpleName("missing".into()), span: span() });
        let mut scope = ScopeStack::new(None, context.root_namespace, Vec::new());

        let error = resolve_expression(&mut context, &mut scope, id).unwrap_err();
        assert!(matches!(error, CodegenError::UnresolvedSymbol(_)));
    }

    #[test]
    fn element_access_on_non_array_is_rejected() {
        let mut context = Context::new();
        let literal = context.push_expression(Expression { kind: ExpressionKind::Literal(Literal::Int(1)), span: span() });
        let index = context.push_expression(Expression { kind: ExpressionKind::Literal(Literal::Int(0)), span: span() });
        let access = context.push_expression(Expression { kind: ExpressionKind::ElementAccess { operand: literal, index }, span: span() });
        let mut scope = ScopeStack::new(None, context.root_namespace, Vec::new());

        let error = resolve_expression(&mut context, &mut scope, access).unwrap_err();
        assert!(matches!(error, CodegenError::NonArrayIndexed(_)));
    }
}
