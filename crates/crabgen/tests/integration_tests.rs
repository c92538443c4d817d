//! End-to-end lowering scenarios.
//!
//! Each test builds a small `Context` by hand (this crate owns no front
//! end) and checks the generated C text for the shape a given program
//! structure is expected to produce: a plain namespaced class, virtual
//! dispatch, a property round-trip, both foreach container kinds, an
//! implicit upcast on invocation, and `main` synthesis.

use std::collections::BTreeSet;

use crabgen::model::class::Class;
use crabgen::model::compilation_unit::{CompilationUnit, DepType};
use crabgen::model::context::Context;
use crabgen::model::expression::{ContainerKind, Expression, ExpressionKind, Literal};
use crabgen::model::field::{Field, FieldModifiers};
use crabgen::model::method::{FormalParameter, Method, MethodModifiers};
use crabgen::model::namespace::Namespace;
use crabgen::model::property::{Property, PropertyModifiers};
use crabgen::model::statement::{Statement, StatementKind};
use crabgen::model::type_ref::{PrimitiveType, TypeRef, TypeSymbol};
use crabgen::location::{SourceFileId, SourceSpan};
use crabgen::Driver;

fn span(file: &SourceFileId) -> SourceSpan {
    SourceSpan::new(file.clone(), 0..1)
}

fn new_namespace(context: &mut Context, name: &str, lower: &str, upper: &str) -> crabgen::arena::NamespaceId {
    context.namespaces.push(Namespace {
        name: name.to_string(),
        lower_prefix: lower.to_string(),
        upper_prefix: upper.to_string(),
        classes: Default::default(),
        structs: Default::default(),
        enums: Default::default(),
        free_methods: Default::default(),
        fields: Default::default(),
        import: false,
        include_filename: None,
        parent: None,
    })
}

fn push_unit(context: &mut Context, filename: &str, file: &SourceFileId, namespace: crabgen::arena::NamespaceId, dep: Option<DepType>) {
    let mut dep_types = BTreeSet::new();
    if let Some(dep) = dep {
        dep_types.insert(dep);
    }
    context.compilation_units.push(CompilationUnit {
        filename: filename.to_string(),
        file: file.clone(),
        root_namespace: namespace,
        child_namespaces: Vec::new(),
        using_directives: Vec::new(),
        dep_types,
    });
}

/// S1 — a base-less class in a namespace gets the full GObject type-system
/// boilerplate wired to `G_TYPE_OBJECT`.
#[test]
fn empty_namespaced_class_defines_type_macros() {
    let mut context = Context::new();
    let file = SourceFileId::new("n.lang", "namespace N { class C {} }");
    let namespace = new_namespace(&mut context, "N", "n", "N");

    let class_id = context.classes.push(Class {
        name: "C".to_string(),
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
    context.namespaces.get_mut(namespace).classes.insert("C".to_string(), class_id);
    push_unit(&mut context, "n", &file, namespace, Some(DepType::Class(class_id)));

    let files = Driver::new().run(&mut context).expect("lowering should succeed");
    let header = &files.iter().find(|f| f.path.ends_with(".h")).unwrap().contents;
    let source = &files.iter().find(|f| f.path.ends_with(".c")).unwrap().contents;

    for macro_name in ["N_TYPE_C", "N_C", "N_C_CLASS", "N_IS_C", "N_IS_C_CLASS", "N_C_GET_CLASS"] {
        assert!(header.contains(macro_name), "missing {macro_name} in:\n{header}");
    }
    assert!(source.contains("n_c_get_type"));
    assert!(source.contains("n_c_init"));
    assert!(source.contains("n_c_class_init"));
    assert!(source.contains("g_type_register_static(G_TYPE_OBJECT, \"NC\""));
}

/// S2 — a virtual method gets a vtable slot and a dispatch trampoline in
/// its declaring class; an overriding subclass assigns its own body into
/// the inherited slot rather than emitting a trampoline of its own.
#[test]
fn virtual_method_dispatches_through_overriding_subclass() {
    let mut context = Context::new();
    let file = SourceFileId::new("v.lang", "class A { virtual int f(int value) { return value; } } class B : A { override int f(int value) { return value; } }");
    let namespace = context.root_namespace;
    let int_type = context.type_refs.push(TypeRef::resolved(context.primitive_symbol("int").unwrap(), false));

    let a_id = context.classes.push(Class {
        name: "A".to_string(),
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

    let value_param = FormalParameter { name: "value".to_string(), type_ref: int_type, span: span(&file) };
    let return_value = context.push_expression(Expression { kind: ExpressionKind::SimpleName("value".to_string()), span: span(&file) });
    let return_stmt = context.statements.push(Statement { kind: StatementKind::Return(Some(return_value)), span: span(&file) });
    let body = context.statements.push(Statement { kind: StatementKind::Block(vec![return_stmt]), span: span(&file) });

    let a_f = context.push_method(Method {
        name: "f".to_string(),
        modifiers: MethodModifiers::PUBLIC | MethodModifiers::VIRTUAL,
        owner: Some(a_id),
        parameters: vec![value_param.clone()],
        return_type: int_type,
        body: Some(body),
        returns_modified_pointer: false,
        instance_last: false,
        is_struct_method: false,
        span: span(&file),
    });
    context.class_mut(a_id).methods.insert("f".to_string(), a_f);
    context.namespaces.get_mut(namespace).classes.insert("A".to_string(), a_id);

    let b_id = context.classes.push(Class {
        name: "B".to_string(),
        base: Some(a_id),
        fields: Default::default(),
        methods: Default::default(),
        properties: Default::default(),
        constants: Default::default(),
        span: span(&file),
        has_private_fields: false,
        init_method: None,
        class_init_method: None,
    });

    let return_value_b = context.push_expression(Expression { kind: ExpressionKind::SimpleName("value".to_string()), span: span(&file) });
    let return_stmt_b = context.statements.push(Statement { kind: StatementKind::Return(Some(return_value_b)), span: span(&file) });
    let body_b = context.statements.push(Statement { kind: StatementKind::Block(vec![return_stmt_b]), span: span(&file) });

    let b_f = context.push_method(Method {
        name: "f".to_string(),
        modifiers: MethodModifiers::PUBLIC | MethodModifiers::OVERRIDE,
        owner: Some(b_id),
        parameters: vec![value_param],
        return_type: int_type,
        body: Some(body_b),
        returns_modified_pointer: false,
        instance_last: false,
        is_struct_method: false,
        span: span(&file),
    });
    context.class_mut(b_id).methods.insert("f".to_string(), b_f);
    context.namespaces.get_mut(namespace).classes.insert("B".to_string(), b_id);

    let mut deps = BTreeSet::new();
    deps.insert(DepType::Class(a_id));
    deps.insert(DepType::Class(b_id));
    push_unit(&mut context, "v", &file, namespace, None);
    context.compilation_units[0].dep_types = deps;

    let files = Driver::new().run(&mut context).expect("lowering should succeed");
    let source = &files.iter().find(|f| f.path.ends_with(".c")).unwrap().contents;
    let header = &files.iter().find(|f| f.path.ends_with(".h")).unwrap().contents;

    assert!(header.contains("(*f)"), "virtual slot missing from class struct:\n{header}");
    assert!(source.contains("klass->f = a_f_real;"), "virtual slot not wired to A's real body:\n{source}");
    assert!(source.contains("a_f_real("), "A's virtual body should be named a_f_real:\n{source}");
    assert!(source.contains("A_GET_CLASS(self)->f(self)"), "missing public dispatcher trampoline:\n{source}");
    assert!(source.contains("A_CLASS(klass)->f = b_f_real;"), "override not installed into base vtable slot:\n{source}");
    assert!(source.contains("b_f_real("), "B's override body should be named b_f_real:\n{source}");
    assert!(!source.contains("B_GET_CLASS"), "an override must not get its own public dispatcher:\n{source}");
}

/// S3 — a property with no custom accessor bodies gets generated
/// getter/setter functions, a property-id enum entry, and both halves of
/// the `GObject` get/set dispatcher.
#[test]
fn property_round_trips_through_generated_accessors() {
    let mut context = Context::new();
    let file = SourceFileId::new("p.lang", "class C { public string name { get; set; } }");
    let namespace = context.root_namespace;
    let string_type = context.type_refs.push(TypeRef::resolved(context.primitive_symbol("string").unwrap(), false));

    let class_id = context.classes.push(Class {
        name: "C".to_string(),
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

    let property_id = context.properties.push(Property {
        name: "name".to_string(),
        modifiers: PropertyModifiers::PUBLIC,
        return_type: string_type,
        owner: class_id,
        getter: None,
        setter: None,
        span: span(&file),
    });
    context.class_mut(class_id).properties.insert("name".to_string(), property_id);
    context.namespaces.get_mut(namespace).classes.insert("C".to_string(), class_id);
    push_unit(&mut context, "p", &file, namespace, Some(DepType::Class(class_id)));

    let files = Driver::new().run(&mut context).expect("lowering should succeed");
    let header = &files.iter().find(|f| f.path.ends_with(".h")).unwrap().contents;
    let source = &files.iter().find(|f| f.path.ends_with(".c")).unwrap().contents;

    assert!(header.contains("C_DUMMY_PROPERTY"));
    assert!(header.contains("C_NAME"));
    assert!(source.contains("c_get_name(C *self)"));
    assert!(source.contains("c_set_name(C *self"));
    assert!(source.contains("g_value_set_string(value, c_get_name(self));"));
    assert!(source.contains("c_set_name(self, g_value_dup_string(value));"));
    assert!(source.contains("g_param_spec_string(\"name\""));
    assert!(source.contains("gobject_class->get_property = c_get_property;"));
    assert!(source.contains("gobject_class->set_property = c_set_property;"));
}

/// S4 — `foreach` over an array lowers to a NUL-terminated pointer walk;
/// over a list it lowers to a `GList` walk. Built directly against the
/// emitter since no front end exists to parse a `foreach` statement.
#[test]
fn foreach_lowers_differently_for_array_and_list() {
    let mut context = Context::new();
    let file = SourceFileId::new("f.lang", "foreach (int i in xs) { }");
    let int_type = context.type_refs.push(TypeRef::resolved(TypeSymbol::Primitive(PrimitiveType::Int), false));
    let container = context.push_expression(Expression { kind: ExpressionKind::SimpleName("xs".to_string()), span: span(&file) });
    context.set_resolved_info(container, crabgen::model::expression::ResolvedInfo {
        static_type_symbol: Some(TypeSymbol::Primitive(PrimitiveType::Int)),
        array_type: true,
        ..Default::default()
    });
    let empty_body = context.statements.push(Statement { kind: StatementKind::Block(vec![]), span: span(&file) });

    let array_loop = context.statements.push(Statement {
        kind: StatementKind::Foreach { variable_name: "i".to_string(), container, container_kind: ContainerKind::Array, element_type: int_type, body: empty_body },
        span: span(&file),
    });

    let list_body = context.statements.push(Statement { kind: StatementKind::Block(vec![]), span: span(&file) });
    let list_loop = context.statements.push(Statement {
        kind: StatementKind::Foreach { variable_name: "i".to_string(), container, container_kind: ContainerKind::List, element_type: int_type, body: list_body },
        span: span(&file),
    });

    let mut array_out = crabgen::emit::CWriter::new();
    crabgen::emit::statement::emit_statement(&context, &mut array_out, array_loop).unwrap();
    let array_text = array_out.finish();
    assert!(array_text.contains("*__i_it;"), "array foreach should declare a pointer iterator:\n{array_text}");
    assert!(array_text.contains("*__i_it != NULL"), "array foreach should walk until a NULL terminator:\n{array_text}");
    assert!(array_text.contains("i = *__i_it;"), "array foreach should deref the iterator into the loop variable:\n{array_text}");

    let mut list_out = crabgen::emit::CWriter::new();
    crabgen::emit::statement::emit_statement(&context, &mut list_out, list_loop).unwrap();
    let list_text = list_out.finish();
    assert!(list_text.contains("GList *"), "list foreach should walk a GList:\n{list_text}");
    assert!(list_text.contains("->next"));
}

/// S5 — calling an inherited public method from a subclass instance wraps
/// the receiver in the declaring class's instance-cast macro, since the
/// static type of `this` (the subclass) differs from the method's owner.
#[test]
fn inherited_invocation_upcasts_the_receiver() {
    let mut context = Context::new();
    let file = SourceFileId::new("u.lang", "class B { public m() {} } class D : B { public caller() { this.m(); } }");
    let namespace = context.root_namespace;
    let void_type = context.type_refs.push(TypeRef::resolved(context.primitive_symbol("void").unwrap(), false));

    let b_id = context.classes.push(Class {
        name: "B".to_string(),
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
    let empty_body = context.statements.push(Statement { kind: StatementKind::Block(vec![]), span: span(&file) });
    let m_method = context.push_method(Method {
        name: "m".to_string(),
        modifiers: MethodModifiers::PUBLIC,
        owner: Some(b_id),
        parameters: Vec::new(),
        return_type: void_type,
        body: Some(empty_body),
        returns_modified_pointer: false,
        instance_last: false,
        is_struct_method: false,
        span: span(&file),
    });
    context.class_mut(b_id).methods.insert("m".to_string(), m_method);
    context.namespaces.get_mut(namespace).classes.insert("B".to_string(), b_id);

    let d_id = context.classes.push(Class {
        name: "D".to_string(),
        base: Some(b_id),
        fields: Default::default(),
        methods: Default::default(),
        properties: Default::default(),
        constants: Default::default(),
        span: span(&file),
        has_private_fields: false,
        init_method: None,
        class_init_method: None,
    });

    let this_expr = context.push_expression(Expression { kind: ExpressionKind::This, span: span(&file) });
    let call_target = context.push_expression(Expression { kind: ExpressionKind::MemberAccess { left: this_expr, right: "m".to_string() }, span: span(&file) });
    let call = context.push_expression(Expression { kind: ExpressionKind::Invocation { callee: call_target, arguments: Vec::new() }, span: span(&file) });
    let call_stmt = context.statements.push(Statement { kind: StatementKind::ExpressionStmt(call), span: span(&file) });
    let caller_body = context.statements.push(Statement { kind: StatementKind::Block(vec![call_stmt]), span: span(&file) });

    let caller_method = context.push_method(Method {
        name: "caller".to_string(),
        modifiers: MethodModifiers::PUBLIC,
        owner: Some(d_id),
        parameters: Vec::new(),
        return_type: void_type,
        body: Some(caller_body),
        returns_modified_pointer: false,
        instance_last: false,
        is_struct_method: false,
        span: span(&file),
    });
    context.class_mut(d_id).methods.insert("caller".to_string(), caller_method);
    context.namespaces.get_mut(namespace).classes.insert("D".to_string(), d_id);

    let mut deps = BTreeSet::new();
    deps.insert(DepType::Class(b_id));
    deps.insert(DepType::Class(d_id));
    push_unit(&mut context, "u", &file, namespace, None);
    context.compilation_units[0].dep_types = deps;

    let files = Driver::new().run(&mut context).expect("lowering should succeed");
    let source = &files.iter().find(|f| f.path.ends_with(".c")).unwrap().contents;
    assert!(source.contains("B(self)"), "call through an inherited method should upcast the receiver:\n{source}");
}

/// S6 — a public static parameterless `Main` method gets a generated C
/// `main` entry point that calls straight into it.
#[test]
fn main_method_synthesizes_a_c_entry_point() {
    let mut context = Context::new();
    let file = SourceFileId::new("m.lang", "class Program { public static Main() { } }");
    let namespace = context.root_namespace;
    let void_type = context.type_refs.push(TypeRef::resolved(context.primitive_symbol("void").unwrap(), false));

    let class_id = context.classes.push(Class {
        name: "Program".to_string(),
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
    let empty_body = context.statements.push(Statement { kind: StatementKind::Block(vec![]), span: span(&file) });
    let main_method = context.push_method(Method {
        name: "Main".to_string(),
        modifiers: MethodModifiers::PUBLIC | MethodModifiers::STATIC,
        owner: Some(class_id),
        parameters: Vec::new(),
        return_type: void_type,
        body: Some(empty_body),
        returns_modified_pointer: false,
        instance_last: false,
        is_struct_method: false,
        span: span(&file),
    });
    context.class_mut(class_id).methods.insert("Main".to_string(), main_method);
    context.namespaces.get_mut(namespace).classes.insert("Program".to_string(), class_id);
    push_unit(&mut context, "m", &file, namespace, Some(DepType::Class(class_id)));

    let files = Driver::new().run(&mut context).expect("lowering should succeed");
    let source = &files.iter().find(|f| f.path.ends_with(".c")).unwrap().contents;

    assert!(source.contains("main(int argc, char **argv)"));
    assert!(source.contains("g_type_init();"));
    assert!(source.contains("program_main();"));
}

/// Also covers a simple field/object-creation scenario outside S1–S6: a
/// field-only class, no inheritance, no virtual dispatch.
#[test]
fn public_field_emits_direct_member_access() {
    let mut context = Context::new();
    let file = SourceFileId::new("c.lang", "class Counter { public int value; }");
    let namespace = context.root_namespace;
    let int_type = context.type_refs.push(TypeRef::resolved(context.primitive_symbol("int").unwrap(), false));

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
    let field_id = context.fields.push(Field {
        name: "value".to_string(),
        modifiers: FieldModifiers::PUBLIC,
        type_ref: int_type,
        initializer: None,
        is_struct_field: false,
        cname: None,
        span: span(&file),
    });
    context.class_mut(class_id).fields.insert("value".to_string(), field_id);
    context.namespaces.get_mut(namespace).classes.insert("Counter".to_string(), class_id);

    let void_type = context.type_refs.push(TypeRef::resolved(context.primitive_symbol("void").unwrap(), false));
    let this_expr = context.push_expression(Expression { kind: ExpressionKind::This, span: span(&file) });
    let read_value = context.push_expression(Expression { kind: ExpressionKind::MemberAccess { left: this_expr, right: "value".to_string() }, span: span(&file) });
    let return_stmt = context.statements.push(Statement { kind: StatementKind::Return(Some(read_value)), span: span(&file) });
    let getter_body = context.statements.push(Statement { kind: StatementKind::Block(vec![return_stmt]), span: span(&file) });
    let getter_method = context.push_method(Method {
        name: "get".to_string(),
        modifiers: MethodModifiers::PUBLIC,
        owner: Some(class_id),
        parameters: Vec::new(),
        return_type: void_type,
        body: Some(getter_body),
        returns_modified_pointer: false,
        instance_last: false,
        is_struct_method: false,
        span: span(&file),
    });
    context.class_mut(class_id).methods.insert("get".to_string(), getter_method);

    push_unit(&mut context, "c", &file, namespace, Some(DepType::Class(class_id)));

    let files = Driver::new().run(&mut context).expect("lowering should succeed");
    let header = &files.iter().find(|f| f.path.ends_with(".h")).unwrap().contents;
    let source = &files.iter().find(|f| f.path.ends_with(".c")).unwrap().contents;
    assert!(!source.contains("priv"), "a class with only a public field has no private struct:\n{source}");
    assert!(header.contains("gint value;"), "the public field should be a real slot on the instance struct:\n{header}");
    assert!(source.contains("COUNTER(self)->value"), "reading a public field through this.value should go through the instance-cast macro:\n{source}");
    let _ = Literal::Int(0);
}
