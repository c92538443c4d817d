//! The Statement Emitter (§4.3).
//!
//! Unlike expressions, statement handling folds resolution and emission
//! into one pass: a `var` declaration's `TypeRef` is backfilled from its
//! initializer's resolved type right here (the Data Model calls this out
//! as a `TypeRef` field written directly rather than through a side
//! table), and the declared local is immediately pushed into the active
//! [`ScopeStack`] so later statements in the same block see it.

use crate::arena::StatementId;
use crate::emit::typename::type_ref_c_name;
use crate::emit::{expression::emit_expression, CWriter};
use crate::error::CodegenError;
use crate::model::context::Context;
use crate::model::expression::ContainerKind;
use crate::model::statement::StatementKind;
use crate::model::type_ref::TypeRef;
use crate::resolver::scope::ScopeStack;
use crate::resolver::resolve_expression;

/// Resolves every expression reachable from `id` and backfills `var`
/// locals, recursing into nested blocks with the scope stack correctly
/// pushed/popped around each one (§9 "Scope chain").
pub fn resolve_statement(context: &mut Context, scope: &mut ScopeStack, id: StatementId) -> Result<(), CodegenError> {
    let kind = context.statement(id).kind.clone();

    match kind {
        StatementKind::Block(statements) => {
            scope.push_block();
            for statement in statements {
                resolve_statement(context, scope, statement)?;
            }
            scope.pop_block();
        }

        StatementKind::ExpressionStmt(expression) => {
            resolve_expression(context, scope, expression)?;
        }

        StatementKind::VariableDeclaration { name, type_ref, initializer } => {
            if let Some(initializer) = initializer {
                resolve_expression(context, scope, initializer)?;
            }

            if context.type_ref(type_ref).is_var() {
                let Some(initializer) = initializer else {
                    return Err(CodegenError::internal_unhandled_kind("var declaration without an initializer", &context.statement(id).span));
                };
                let inferred = context.resolved_info(initializer).cloned().unwrap_or_default();
                *context.type_refs.get_mut(type_ref) = TypeRef { symbol: inferred.static_type_symbol, array_type: inferred.array_type, type_name: None };
            }

            scope.declare_local(name, type_ref);
        }

        StatementKind::While { condition, body } => {
            resolve_expression(context, scope, condition)?;
            resolve_statement(context, scope, body)?;
        }

        StatementKind::For { init, condition, step, body } => {
            scope.push_block();
            if let Some(init) = init {
                resolve_statement(context, scope, init)?;
            }
            if let Some(condition) = condition {
                resolve_expression(context, scope, condition)?;
            }
            if let Some(step) = step {
                resolve_expression(context, scope, step)?;
            }
            resolve_statement(context, scope, body)?;
            scope.pop_block();
        }

        StatementKind::Foreach { variable_name, container, element_type, body, .. } => {
            resolve_expression(context, scope, container)?;
            scope.push_block();
            scope.declare_local(variable_name, element_type);
            resolve_statement(context, scope, body)?;
            scope.pop_block();
        }

        StatementKind::If { branches, else_branch } => {
            for (condition, then_branch) in branches {
                resolve_expression(context, scope, condition)?;
                resolve_statement(context, scope, then_branch)?;
            }
            if let Some(else_branch) = else_branch {
                resolve_statement(context, scope, else_branch)?;
            }
        }

        StatementKind::Return(value) => {
            if let Some(value) = value {
                resolve_expression(context, scope, value)?;
            }
        }
    }

    Ok(())
}

/// Lowers an already-resolved statement tree to C, one statement per line
/// except for the Foreach forms, which expand to their full loop shape
/// (§8 scenario S4: array vs. list iteration).
pub fn emit_statement(context: &Context, writer: &mut CWriter, id: StatementId) -> Result<(), CodegenError> {
    match &context.statement(id).kind {
        StatementKind::Block(statements) => {
            writer.line("{");
            writer.indent();
            for statement in statements {
                emit_statement(context, writer, *statement)?;
            }
            writer.dedent();
            writer.line("}");
        }

        StatementKind::ExpressionStmt(expression) => {
            writer.line(format!("{};", emit_expression(context, *expression)?));
        }

        StatementKind::VariableDeclaration { name, type_ref, initializer } => {
            let c_type = type_ref_c_name(context, context.type_ref(*type_ref));
            match initializer {
                Some(initializer) => writer.line(format!("{c_type} {name} = {};", emit_expression(context, *initializer)?)),
                None => writer.line(format!("{c_type} {name};")),
            }
        }

        StatementKind::While { condition, body } => {
            writer.line(format!("while ({})", emit_expression(context, *condition)?));
            emit_statement(context, writer, *body)?;
        }

        StatementKind::For { init, condition, step, body } => {
            let init_text = match init {
                Some(init) => emit_inline_init(context, *init)?,
                None => String::new(),
            };
            let condition_text = match condition {
                Some(condition) => emit_expression(context, *condition)?,
                None => String::new(),
            };
            let step_text = match step {
                Some(step) => emit_expression(context, *step)?,
                None => String::new(),
            };
            writer.line(format!("for ({init_text}; {condition_text}; {step_text})"));
            emit_statement(context, writer, *body)?;
        }

        StatementKind::Foreach { variable_name, container, container_kind, element_type, body } => {
            emit_foreach(context, writer, variable_name, *container, container_kind, *element_type, *body)?;
        }

        StatementKind::If { branches, else_branch } => {
            for (index, (condition, then_branch)) in branches.iter().enumerate() {
                let keyword = if index == 0 { "if" } else { "else if" };
                writer.line(format!("{keyword} ({})", emit_expression(context, *condition)?));
                emit_statement(context, writer, *then_branch)?;
            }
            if let Some(else_branch) = else_branch {
                writer.line("else");
                emit_statement(context, writer, *else_branch)?;
            }
        }

        StatementKind::Return(value) => match value {
            Some(value) => writer.line(format!("return {};", emit_expression(context, *value)?)),
            None => writer.line("return;"),
        },
    }

    Ok(())
}

/// A `for` initializer is itself a `StatementKind::VariableDeclaration`,
/// but needs to render inline (no trailing semicolon of its own, no
/// indentation) inside the `for (...)` header.
fn emit_inline_init(context: &Context, id: StatementId) -> Result<String, CodegenError> {
    match &context.statement(id).kind {
        StatementKind::VariableDeclaration { name, type_ref, initializer } => {
            let c_type = type_ref_c_name(context, context.type_ref(*type_ref));
            Ok(match initializer {
                Some(initializer) => format!("{c_type} {name} = {}", emit_expression(context, *initializer)?),
                None => format!("{c_type} {name}"),
            })
        }
        StatementKind::ExpressionStmt(expression) => emit_expression(context, *expression),
        _ => Ok(String::new()),
    }
}

/// Array iteration lowers to a NUL-terminated pointer walk; list iteration
/// lowers to a `GList` walk, per S4's exact shapes.
fn emit_foreach(
    context: &Context,
    writer: &mut CWriter,
    variable_name: &str,
    container: crate::arena::ExpressionId,
    container_kind: &ContainerKind,
    element_type: crate::arena::TypeRefId,
    body: StatementId,
) -> Result<(), CodegenError> {
    let container_code = emit_expression(context, container)?;
    let element_c_type = type_ref_c_name(context, context.type_ref(element_type));

    match container_kind {
        ContainerKind::Array => {
            let iter_var = format!("__{variable_name}_it");
            writer.line(format!("{element_c_type} *{iter_var};"));
            writer.line(format!("for ({iter_var} = {container_code}; *{iter_var} != NULL; {iter_var}++)"));
            writer.line("{");
            writer.indent();
            writer.line(format!("{element_c_type} {variable_name} = *{iter_var};"));
            emit_statement(context, writer, body)?;
            writer.dedent();
            writer.line("}");
        }
        ContainerKind::List => {
            let node_var = format!("__{variable_name}_node");
            writer.line(format!("for (GList *{node_var} = {container_code}; {node_var} != NULL; {node_var} = {node_var}->next)"));
            writer.line("{");
            writer.indent();
            writer.line(format!("{element_c_type} {variable_name} = ({element_c_type}) {node_var}->data;"));
            emit_statement(context, writer, body)?;
            writer.dedent();
            writer.line("}");
        }
    }

    Ok(())
}
