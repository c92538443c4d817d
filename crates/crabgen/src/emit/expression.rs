//! The Expression Emitter (§4.2).
//!
//! Turns a resolved expression tree into a single C expression string.
//! Every rule here reads the `ResolvedInfo` the Type Resolver already
//! wrote for the node in question rather than re-deriving it, matching
//! §3.1's read-after-resolve discipline: this emitter runs strictly after
//! [`crate::resolver`] on a given tree.

use crate::arena::ExpressionId;
use crate::cname::{class_prefix_lower, get_class_macro, instance_cast_macro, type_macro};
use crate::emit::typename::base_type_name;
use crate::error::CodegenError;
use crate::model::context::Context;
use crate::model::expression::{ExpressionKind, Literal};
use crate::model::method::DispatchKind;
use crate::model::symbol::Symbol;
use crate::model::type_ref::TypeSymbol;

/// Emits `id`, assuming every node in its subtree already carries a
/// `ResolvedInfo` entry (an unresolved node is a core bug, not a
/// recoverable emission-time condition, so this panics rather than
/// returning `CodegenError` for that case).
pub fn emit_expression(context: &Context, id: ExpressionId) -> Result<String, CodegenError> {
    let expression = context.expression(id);
    let span = expression.span.clone();

    Ok(match &expression.kind {
        ExpressionKind::Literal(Literal::Int(value)) => value.to_string(),
        ExpressionKind::Literal(Literal::Char(value)) => format!("'{value}'"),
        ExpressionKind::Literal(Literal::String(value)) => format!("\"{}\"", escape_c_string(value)),
        ExpressionKind::Literal(Literal::Bool(true)) => "TRUE".to_string(),
        ExpressionKind::Literal(Literal::Bool(false)) => "FALSE".to_string(),
        ExpressionKind::Literal(Literal::Null) => "NULL".to_string(),

        ExpressionKind::This => "self".to_string(),

        ExpressionKind::SimpleName(name) => emit_simple_name(context, id, name)?,

        ExpressionKind::MemberAccess { left, right } => emit_member_access(context, id, *left, right)?,

        ExpressionKind::Invocation { callee, arguments } => emit_invocation(context, id, *callee, arguments)?,

        ExpressionKind::ElementAccess { operand, index } => {
            format!("{}[{}]", emit_expression(context, *operand)?, emit_expression(context, *index)?)
        }

        ExpressionKind::Operation { op, left, right } => match left {
            Some(left) => format!("({} {} {})", emit_expression(context, *left)?, op.c_symbol(), emit_expression(context, *right)?),
            None => format!("({}{})", op.c_symbol(), emit_expression(context, *right)?),
        },

        ExpressionKind::Unary { negate, operand } => {
            let symbol = if *negate { "-" } else { "!" };
            format!("({symbol}{})", emit_expression(context, *operand)?)
        }

        ExpressionKind::Cast { target, inner } => {
            let type_ref = context.type_ref(*target);
            let Some(symbol) = type_ref.symbol else { return Err(CodegenError::internal_unhandled_kind("unresolved cast target", &span)) };
            format!("(({}) {})", base_type_name(context, symbol), emit_expression(context, *inner)?)
        }

        ExpressionKind::ObjectCreation { target, named_arguments } => emit_object_creation(context, *target, named_arguments, &span)?,

        ExpressionKind::Is { inner, .. } => {
            let inner_info = context.resolved_info(*inner);
            let Some(TypeSymbol::Class(class_id)) = inner_info.and_then(|info| info.static_type_symbol) else {
                return Err(CodegenError::is_on_non_class(&span));
            };
            let upper_prefix = class_upper_prefix(context, class_id);
            format!("{}({})", crate::cname::is_instance_macro(&upper_prefix), emit_expression(context, *inner)?)
        }

        ExpressionKind::Parenthesized(inner) => format!("({})", emit_expression(context, *inner)?),

        ExpressionKind::Assignment { left, right } => emit_assignment(context, *left, *right)?,

        ExpressionKind::RefMarker(inner) => format!("&{}", emit_expression(context, *inner)?),
    })
}

fn escape_c_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn class_upper_prefix(context: &Context, class_id: crate::arena::ClassId) -> String {
    let namespace = context.namespace(context.namespace_of_class(class_id));
    crate::cname::class_prefix_upper(&namespace.upper_prefix, &context.class(class_id).name)
}

fn class_lower_prefix(context: &Context, class_id: crate::arena::ClassId) -> String {
    let namespace = context.namespace(context.namespace_of_class(class_id));
    class_prefix_lower(&namespace.lower_prefix, &context.class(class_id).name)
}

/// A bare name: field/property/method/constant/local, each with its own
/// emission shape per §4.2.
fn emit_simple_name(context: &Context, id: ExpressionId, name: &str) -> Result<String, CodegenError> {
    let span = context.expression(id).span.clone();
    let info = context.resolved_info(id).ok_or_else(|| CodegenError::internal_unhandled_kind("unresolved simple name", &span))?;

    Ok(match info.static_symbol {
        Some(Symbol::LocalVariable(_)) => name.to_string(),
        Some(Symbol::Field(field_id)) => {
            let field = context.field(field_id);
            match context.owning_class_of_field(field_id) {
                Some(class_id) => {
                    let upper_prefix = class_upper_prefix(context, class_id);
                    if field.modifiers.is_static() {
                        if field.modifiers.is_private() {
                            name.to_string()
                        } else {
                            format!("{}(self)->{name}", get_class_macro(&upper_prefix))
                        }
                    } else if field.modifiers.is_private() {
                        format!("self->priv->{name}")
                    } else {
                        format!("{}(self)->{name}", instance_cast_macro(&upper_prefix))
                    }
                }
                None => field.cname.clone().unwrap_or_else(|| name.to_string()),
            }
        }
        Some(Symbol::Property(property_id)) => {
            let property = context.property(property_id);
            let class_lower = class_lower_prefix(context, property.owner);
            format!("{class_lower}_get_{name}(self)")
        }
        Some(Symbol::Method(method_id)) => context.method_cdecl(method_id).map(|cdecl| cdecl.cname.clone()).unwrap_or_else(|| name.to_string()),
        Some(Symbol::Constant(_)) => name.to_string(),
        Some(Symbol::EnumValue(enum_id, index)) => context.enum_def(enum_id).values[index].cname.clone(),
        _ => name.to_string(),
    })
}

/// `left.right`: same shapes as a bare name, but qualified onto whatever
/// `left` evaluates to, per §4.2's member-access table.
fn emit_member_access(context: &Context, id: ExpressionId, left: ExpressionId, right: &str) -> Result<String, CodegenError> {
    let span = context.expression(id).span.clone();
    let info = context.resolved_info(id).ok_or_else(|| CodegenError::internal_unhandled_kind("unresolved member access", &span))?;
    let left_code = emit_expression(context, left)?;

    Ok(match info.static_symbol {
        Some(Symbol::Field(_)) => {
            let left_info = context.resolved_info(left);
            match left_info.and_then(|info| info.static_type_symbol) {
                Some(TypeSymbol::Class(class_id)) => {
                    let upper_prefix = class_upper_prefix(context, class_id);
                    format!("{}({left_code})->{right}", instance_cast_macro(&upper_prefix))
                }
                _ => format!("{left_code}->{right}"),
            }
        }
        Some(Symbol::Property(property_id)) => {
            let property = context.property(property_id);
            let class_lower = class_lower_prefix(context, property.owner);
            format!("{class_lower}_get_{right}({left_code})")
        }
        Some(Symbol::Method(method_id)) => context.method_cdecl(method_id).map(|cdecl| cdecl.cname.clone()).unwrap_or_else(|| right.to_string()),
        Some(Symbol::EnumValue(enum_id, index)) => context.enum_def(enum_id).values[index].cname.clone(),
        _ => format!("{left_code}->{right}"),
    })
}

/// A call expression: resolves the callee to a `Method`, then assembles
/// the C argument list, handling `instance_last` re-ordering and the
/// implicit upcast wrap when the static type of the receiver is a proper
/// subclass of the method's declaring class.
fn emit_invocation(context: &Context, id: ExpressionId, callee: ExpressionId, arguments: &[ExpressionId]) -> Result<String, CodegenError> {
    let span = context.expression(id).span.clone();
    let callee_info = context.resolved_info(callee).ok_or_else(|| CodegenError::internal_unhandled_kind("unresolved callee", &span))?;

    let Some(Symbol::Method(method_id)) = callee_info.static_symbol else {
        return Err(CodegenError::internal_unhandled_kind("invocation of a non-method symbol", &span));
    };
    let method = context.method(method_id);
    let cname = context.method_cdecl(method_id).map(|cdecl| cdecl.cname.clone()).unwrap_or_else(|| method.name.clone());

    let mut args: Vec<String> = arguments.iter().map(|argument| emit_expression(context, *argument)).collect::<Result<_, _>>()?;

    if method.modifiers.is_static() {
        return Ok(format!("{cname}({})", args.join(", ")));
    }

    // The callee is `left.method(...)` (or a bare name inside an instance
    // method, where `left` is implicitly `this`); recover the receiver.
    let receiver = match &context.expression(callee).kind {
        ExpressionKind::MemberAccess { left, .. } => emit_expression(context, *left)?,
        _ => "self".to_string(),
    };

    let receiver = match method.owner {
        Some(owner) if method.modifiers.dispatch_kind() != DispatchKind::Plain || owner_differs_from_static(context, callee, owner) => {
            let upper_prefix = class_upper_prefix(context, owner);
            format!("{}({receiver})", instance_cast_macro(&upper_prefix))
        }
        _ => receiver,
    };

    if method.instance_last {
        args.push(receiver);
    } else {
        args.insert(0, receiver);
    }

    Ok(format!("{cname}({})", args.join(", ")))
}

fn owner_differs_from_static(context: &Context, callee: ExpressionId, owner: crate::arena::ClassId) -> bool {
    let ExpressionKind::MemberAccess { left, .. } = &context.expression(callee).kind else {
        return false;
    };
    match context.resolved_info(*left).and_then(|info| info.static_type_symbol) {
        Some(TypeSymbol::Class(static_class)) => static_class != owner,
        _ => false,
    }
}

fn emit_object_creation(
    context: &Context,
    target: crate::arena::TypeRefId,
    named_arguments: &[(String, ExpressionId)],
    span: &crate::location::SourceSpan,
) -> Result<String, CodegenError> {
    let type_ref = context.type_ref(target);
    let Some(TypeSymbol::Class(class_id)) = type_ref.symbol else {
        return Err(CodegenError::internal_unhandled_kind("object creation of a non-class type", span));
    };
    let upper_prefix = class_upper_prefix(context, class_id);

    let mut parts = vec![type_macro(&upper_prefix)];
    for (name, value) in named_arguments {
        parts.push(format!("\"{name}\""));
        parts.push(emit_expression(context, *value)?);
    }
    parts.push("NULL".to_string());

    Ok(format!("g_object_new({})", parts.join(", ")))
}

/// `left = right`: a property on the left routes through `g_object_set`
/// instead of a direct store (§4.2 "assignment through a property").
fn emit_assignment(context: &Context, left: ExpressionId, right: ExpressionId) -> Result<String, CodegenError> {
    let left_info = context.resolved_info(left);
    if let Some(Symbol::Property(property_id)) = left_info.and_then(|info| info.static_symbol) {
        let property = context.property(property_id);
        let receiver = match &context.expression(left).kind {
            ExpressionKind::MemberAccess { left: inner_left, .. } => emit_expression(context, *inner_left)?,
            _ => "self".to_string(),
        };
        return Ok(format!(
            "g_object_set(G_OBJECT({receiver}), \"{}\", {}, NULL)",
            property.name,
            emit_expression(context, right)?
        ));
    }

    Ok(format!("{} = {}", emit_expression(context, left)?, emit_expression(context, right)?))
}
