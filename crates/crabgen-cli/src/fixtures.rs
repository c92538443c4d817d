//! Demonstration fixtures.
//!
//! With no front-end crate in this workspace (parsing is explicitly out of
//! scope), the CLI exercises the pipeline against small, hand-built
//! [`Context`] values instead of real source files — the same
//! demonstration-harness role `timuc`'s `main` plays for its own pipeline,
//! just built in Rust here rather than read off disk.

use crabgen::arena::ExpressionId;
use crabgen::location::{SourceFileId, SourceSpan};
use crabgen::model::class::Class;
use crabgen::model::compilation_unit::{CompilationUnit, DepType};
use crabgen::model::expression::{BinaryOperator, Expression, ExpressionKind, Literal};
use crabgen::model::field::{Field, FieldModifiers};
use crabgen::model::method::{FormalParameter, Method, MethodModifiers};
use crabgen::model::statement::{Statement, StatementKind};
use crabgen::model::type_ref::TypeRef;
use crabgen::Context;

fn span(file: &SourceFileId) -> SourceSpan {
    SourceSpan::new(file.clone(), 0..1)
}

/// A `Counter` class in the global namespace with one public `int` field,
/// an instance method that increments it, and a `Main` entry point that
/// exercises object creation, member access, assignment and invocation.
pub fn counter() -> Context {
    let mut context = Context::new();
    let file = SourceFileId::new("counter.lang", "class Counter { public int value; public increment() { this.value = this.value + 1; } public static Main() { var c = new Counter(); c.increment(); } }");

    let int_type = context.type_refs.push(TypeRef::resolved(context.primitive_symbol("int").unwrap(), false));
    let void_type = context.type_refs.push(TypeRef::resolved(context.primitive_symbol("void").unwrap(), false));

    let class_id = context.classes.push(Class {
        name: "Counter".to_string(),
        base: None,
        fields: Default::default(),
        methods: Default::default(),
        properties: Default::default(),
        constants: Default::default(),
        span: span(&file),
        has_private_fields: false,
        init_method: None,
        class_init_method: None,
    });

    let value_field = context.fields.push(Field {
        name: "value".to_string(),
        modifiers: FieldModifiers::PUBLIC,
        type_ref: int_type,
        initializer: None,
        is_struct_field: false,
        cname: None,
        span: span(&file),
    });
    context.class_mut(class_id).fields.insert("value".to_string(), value_field);

    // this.value = this.value + 1;
    let this_expr = push_expr(&mut context, ExpressionKind::This, &file);
    let read_value = push_expr(&mut context, ExpressionKind::MemberAccess { left: this_expr, right: "value".to_string() }, &file);
    let one = push_expr(&mut context, ExpressionKind::Literal(Literal::Int(1)), &file);
    let sum = push_expr(&mut context, ExpressionKind::Operation { op: BinaryOperator::Add, left: Some(read_value), right: one }, &file);
    let this_expr2 = push_expr(&mut context, ExpressionKind::This, &file);
    let write_value = push_expr(&mut context, ExpressionKind::MemberAccess { left: this_expr2, right: "value".to_string() }, &file);
    let assignment = push_expr(&mut context, ExpressionKind::Assignment { left: write_value, right: sum }, &file);
    let assignment_stmt = context.statements.push(Statement { kind: StatementKind::ExpressionStmt(assignment), span: span(&file) });
    let increment_body = context.statements.push(Statement { kind: StatementKind::Block(vec![assignment_stmt]), span: span(&file) });

    let increment_method = context.push_method(Method {
        name: "increment".to_string(),
        modifiers: MethodModifiers::PUBLIC,
        owner: Some(class_id),
        parameters: Vec::new(),
        return_type: void_type,
        body: Some(increment_body),
        returns_modified_pointer: false,
        instance_last: false,
        is_struct_method: false,
        span: span(&file),
    });
    context.class_mut(class_id).methods.insert("increment".to_string(), increment_method);

    // static Main() { var c = new Counter(); c.increment(); }
    let class_type_ref = context.type_refs.push(TypeRef::resolved(crabgen::model::type_ref::TypeSymbol::Class(class_id), false));
    let object_creation = push_expr(&mut context, ExpressionKind::ObjectCreation { target: class_type_ref, named_arguments: Vec::new() }, &file);
    let var_type_ref = context.type_refs.push(TypeRef::inferred());
    let declare_c = context.statements.push(Statement {
        kind: StatementKind::VariableDeclaration { name: "c".to_string(), type_ref: var_type_ref, initializer: Some(object_creation) },
        span: span(&file),
    });

    let c_name = push_expr(&mut context, ExpressionKind::SimpleName("c".to_string()), &file);
    let c_increment = push_expr(&mut context, ExpressionKind::MemberAccess { left: c_name, right: "increment".to_string() }, &file);
    let call = push_expr(&mut context, ExpressionKind::Invocation { callee: c_increment, arguments: Vec::new() }, &file);
    let call_stmt = context.statements.push(Statement { kind: StatementKind::ExpressionStmt(call), span: span(&file) });

    let main_body = context.statements.push(Statement { kind: StatementKind::Block(vec![declare_c, call_stmt]), span: span(&file) });

    let main_method = context.push_method(Method {
        name: "Main".to_string(),
        modifiers: MethodModifiers::PUBLIC | MethodModifiers::STATIC,
        owner: Some(class_id),
        parameters: Vec::<FormalParameter>::new(),
        return_type: void_type,
        body: Some(main_body),
        returns_modified_pointer: false,
        instance_last: false,
        is_struct_method: false,
        span: span(&file),
    });
    context.class_mut(class_id).methods.insert("Main".to_string(), main_method);

    let root_namespace = context.root_namespace;
    context.namespaces.get_mut(root_namespace).classes.insert("Counter".to_string(), class_id);

    let mut dep_types = std::collections::BTreeSet::new();
    dep_types.insert(DepType::Class(class_id));

    context.compilation_units.push(CompilationUnit {
        filename: "counter".to_string(),
        file: file.clone(),
        root_namespace,
        child_namespaces: Vec::new(),
        using_directives: Vec::new(),
        dep_types,
    });

    context
}

fn push_expr(context: &mut Context, kind: ExpressionKind, file: &SourceFileId) -> ExpressionId {
    context.push_expression(Expression { kind, span: span(file) })
}

/// Looks a fixture up by name. Returns `None` for an unknown name so the
/// caller can report a usage error rather than panicking.
pub fn lookup(name: &str) -> Option<fn() -> Context> {
    match name {
        "counter" => Some(counter as fn() -> Context),
        _ => None,
    }
}
