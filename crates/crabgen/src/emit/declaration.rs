//! The Declaration Emitter (§4.4): GObject scaffolding.
//!
//! Two passes per the design. Pass 1 ("reserve") walks every class and
//! assigns its [`MethodCdecl`] side-table entry — C name, parameter list,
//! forward declaration — and resolves `override`'s ancestor slot, mirroring
//! the teacher's `SignatureHolder::reserve` step. Pass 2 ("publish") emits
//! the actual header/source text for the twelve numbered declarations:
//! instance struct, class struct, `_get_type`, constants, method bodies,
//! property accessors, the property-id enum, the get/set dispatcher,
//! `_init`, `_class_init`, and the `_get_type` definition.

use crate::arena::{ClassId, EnumId, MethodId, StructId};
use crate::cname::{class_cast_macro, class_prefix_lower, class_prefix_upper, get_class_macro, instance_cast_macro, is_class_macro, is_instance_macro, type_macro};
use crate::emit::expression::emit_expression;
use crate::emit::statement::emit_statement;
use crate::emit::typename::type_ref_c_name;
use crate::error::CodegenError;
use crate::model::class::ClassCNames;
use crate::model::context::Context;
use crate::model::method::{DispatchKind, Method, MethodCdecl};
use crate::model::statement::StatementKind;
use crate::emit::CWriter;

/// Computes the C-identifier triple for `class` from the namespace it
/// lives in (§4.4 Pass 1 naming step).
pub fn class_cnames(context: &Context, class: ClassId) -> ClassCNames {
    let namespace = context.namespace(context.namespace_of_class(class));
    let name = &context.class(class).name;
    ClassCNames {
        nslower: class_prefix_lower(&namespace.lower_prefix, name),
        upper: class_prefix_upper(&namespace.upper_prefix, name),
        camel: crate::emit::typename::base_type_name(context, crate::model::type_ref::TypeSymbol::Class(class)),
    }
}

fn method_c_parameters(context: &Context, method: &Method, self_type: Option<&str>) -> (Vec<String>, String) {
    let mut cparameters = Vec::new();
    if let Some(self_type) = self_type {
        cparameters.push(format!("{self_type} *self"));
    }
    for parameter in &method.parameters {
        cparameters.push(format!("{} {}", type_ref_c_name(context, context.type_ref(parameter.type_ref)), parameter.name));
    }
    if cparameters.is_empty() {
        cparameters.push("void".to_string());
    }
    let joined = cparameters.join(", ");
    (cparameters, joined)
}

/// Pass 1: assigns every method in `class` its `MethodCdecl`, resolving
/// `override` against the nearest virtual/abstract ancestor. Run this
/// before any Pass 2 emission touches the class.
pub fn reserve_class(context: &mut Context, class: ClassId) -> Result<(), CodegenError> {
    let cnames = class_cnames(context, class);

    let has_private_fields = context
        .class(class)
        .fields
        .values()
        .any(|id| context.field(*id).modifiers.is_private() && !context.field(*id).modifiers.is_static());
    context.class_mut(class).has_private_fields = has_private_fields;

    let method_ids: Vec<MethodId> = context.class(class).methods.values().copied().collect();

    for method_id in method_ids {
        let method = context.method(method_id).clone();

        let virtual_super_class = if method.modifiers.dispatch_kind() == DispatchKind::Override {
            Some(resolve_override_ancestor(context, class, &method)?)
        } else {
            None
        };

        let self_type = (!method.modifiers.is_static()).then_some(cnames.camel.as_str());
        let (cparameters, joined) = method_c_parameters(context, &method, self_type);
        let return_type = type_ref_c_name(context, context.type_ref(method.return_type));

        let cname = crate::cname::class_method_cname(&context.namespace(context.namespace_of_class(class)).lower_prefix, &cnames_class_name(context, class), &method.name);
        let cdecl1 = format!("{return_type} {cname}({joined});");

        context.set_method_cdecl(method_id, MethodCdecl { cname, cparameters, cdecl1, virtual_super_class });
    }

    Ok(())
}

fn cnames_class_name(context: &Context, class: ClassId) -> String {
    context.class(class).name.clone()
}

/// Pass 1 for a struct's own methods: no virtual dispatch, no `self`
/// upcast, just `{struct}_{method}` naming with the struct's camel name
/// as the instance parameter type.
pub fn reserve_struct(context: &mut Context, struct_id: StructId) -> Result<(), CodegenError> {
    let namespace = context.namespace(context.namespace_of_struct(struct_id)).lower_prefix.clone();
    let camel = crate::emit::typename::base_type_name(context, crate::model::type_ref::TypeSymbol::Struct(struct_id));
    let method_ids: Vec<MethodId> = context.struct_def(struct_id).methods.values().copied().collect();

    for method_id in method_ids {
        let method = context.method(method_id).clone();
        let self_type = (!method.modifiers.is_static()).then_some(camel.as_str());
        let (cparameters, joined) = method_c_parameters(context, &method, self_type);
        let return_type = type_ref_c_name(context, context.type_ref(method.return_type));
        let cname = crate::cname::class_method_cname(&namespace, &context.struct_def(struct_id).name, &method.name);
        let cdecl1 = format!("{return_type} {cname}({joined});");
        context.set_method_cdecl(method_id, MethodCdecl { cname, cparameters, cdecl1, virtual_super_class: None });
    }

    Ok(())
}

/// Pass 1 for a namespace's free (non-member) methods: plain
/// `{namespace}_{method}` naming, never an instance parameter.
pub fn reserve_free_methods(context: &mut Context, namespace: crate::arena::NamespaceId) -> Result<(), CodegenError> {
    let namespace_lower = context.namespace(namespace).lower_prefix.clone();
    let method_ids: Vec<MethodId> = context.namespace(namespace).free_methods.values().copied().collect();

    for method_id in method_ids {
        let method = context.method(method_id).clone();
        let (cparameters, joined) = method_c_parameters(context, &method, None);
        let return_type = type_ref_c_name(context, context.type_ref(method.return_type));
        let cname = crate::cname::free_method_cname(&namespace_lower, &method.name);
        let cdecl1 = format!("{return_type} {cname}({joined});");
        context.set_method_cdecl(method_id, MethodCdecl { cname, cparameters, cdecl1, virtual_super_class: None });
    }

    Ok(())
}

/// Emits every free method in `namespace` as a plain C function.
pub fn emit_free_methods(context: &Context, namespace: crate::arena::NamespaceId) -> Result<ClassEmission, CodegenError> {
    let mut header = CWriter::new();
    let mut source = CWriter::new();

    let method_ids: Vec<MethodId> = context.namespace(namespace).free_methods.values().copied().collect();
    for method_id in method_ids {
        let method = context.method(method_id);
        let Some(cdecl) = context.method_cdecl(method_id) else { continue };
        header.line(cdecl.cdecl1.clone());

        let return_type = type_ref_c_name(context, context.type_ref(method.return_type));
        source.blank();
        source.line(return_type);
        source.line(format!("{}({})", cdecl.cname, cdecl.cparameters.join(", ")));
        source.line("{");
        source.indent();
        if let Some(body) = method.body {
            emit_statement(context, &mut source, body)?;
        }
        source.dedent();
        source.line("}");
    }

    Ok(ClassEmission { header: header.finish(), source: source.finish() })
}

/// Walks `class`'s ancestors (skipping `class` itself) looking for a
/// `virtual` or `abstract` method named the same as `method`; the first
/// hit is the slot this override fills. No hit ⇒ `NoOverridableMethod`.
fn resolve_override_ancestor(context: &Context, class: ClassId, method: &Method) -> Result<ClassId, CodegenError> {
    let Some(base) = context.class(class).base else {
        return Err(CodegenError::no_overridable_method(&method.name, &method.span));
    };

    for ancestor in context.class_chain(base) {
        if let Some(ancestor_method_id) = context.class(ancestor).methods.get(&method.name) {
            let ancestor_method = context.method(*ancestor_method_id);
            if matches!(ancestor_method.modifiers.dispatch_kind(), DispatchKind::Virtual | DispatchKind::Abstract) {
                return Ok(ancestor);
            }
        }
    }

    Err(CodegenError::no_overridable_method(&method.name, &method.span))
}

/// Pass 2 output for one class: header text and source text, concatenated
/// by the Driver into the file-level buffers.
pub struct ClassEmission {
    pub header: String,
    pub source: String,
}

/// Emits all twelve numbered declarations for `class`. Must run after
/// [`reserve_class`] (every method needs its `MethodCdecl` populated
/// first).
pub fn emit_class(context: &Context, class: ClassId) -> Result<ClassEmission, CodegenError> {
    let cnames = class_cnames(context, class);
    let class_def = context.class(class);

    let mut header = CWriter::new();
    let mut source = CWriter::new();

    let (parent_instance_type, parent_class_type) = match class_def.base {
        Some(base) => {
            let base_cnames = class_cnames(context, base);
            (base_cnames.camel.clone(), format!("{}Class", base_cnames.camel))
        }
        None => ("GObject".to_string(), "GObjectClass".to_string()),
    };

    // Step 1: public instance struct (private fields live in the
    // `_Private` struct emitted alongside, never in this public shape;
    // public instance fields, by contrast, are real slots here).
    let guard = format!("_TYPE_{}", cnames.camel.to_uppercase());
    header.line(format!("#ifndef {guard}"));
    header.line(format!("#define {guard}"));
    header.line(format!("typedef struct _{0} {0};", cnames.camel));
    header.line(format!("typedef struct _{0}Class {0}Class;", cnames.camel));
    header.line("#endif");
    header.blank();
    header.line(format!("struct _{} {{", cnames.camel));
    header.indent();
    header.line(format!("{parent_instance_type} parent_instance;"));
    if class_def.has_private_fields {
        header.line(format!("{}Private *priv;", cnames.camel));
    }
    for field_id in class_def.fields.values() {
        let field = context.field(*field_id);
        if field.modifiers.is_public() && !field.modifiers.is_static() {
            header.line(format!("{} {};", type_ref_c_name(context, context.type_ref(field.type_ref)), field.name));
        }
    }
    header.dedent();
    header.line("};");
    header.blank();

    // Step 2: public class struct with public-static-field slots and
    // virtual-method slots.
    header.line(format!("struct _{}Class {{", cnames.camel));
    header.indent();
    header.line(format!("{parent_class_type} parent_class;"));
    for field_id in class_def.fields.values() {
        let field = context.field(*field_id);
        if field.modifiers.is_static() && field.modifiers.is_public() {
            header.line(format!("{} {};", type_ref_c_name(context, context.type_ref(field.type_ref)), field.name));
        }
    }
    for method_id in class_def.methods.values() {
        let method = context.method(*method_id);
        if matches!(method.modifiers.dispatch_kind(), DispatchKind::Virtual | DispatchKind::Abstract) {
            let Some(cdecl) = context.method_cdecl(*method_id) else { continue };
            let return_type = type_ref_c_name(context, context.type_ref(method.return_type));
            header.line(format!("{return_type} (*{})({});", method.name, cdecl.cparameters.join(", ")));
        }
    }
    header.dedent();
    header.line("};");
    header.blank();

    // Step 3: `_get_type()` declaration.
    header.line(format!("GType {}_get_type(void);", cnames.nslower));
    header.blank();
    header.line(format!("#define {} ({}_get_type())", type_macro(&cnames.upper), cnames.nslower));
    header.line(format!(
        "#define {}(obj) (G_TYPE_CHECK_INSTANCE_CAST((obj), {}, {}))",
        instance_cast_macro(&cnames.upper),
        type_macro(&cnames.upper),
        cnames.camel
    ));
    header.line(format!(
        "#define {}(klass) (G_TYPE_CHECK_CLASS_CAST((klass), {}, {}Class))",
        class_cast_macro(&cnames.upper),
        type_macro(&cnames.upper),
        cnames.camel
    ));
    header.line(format!(
        "#define {}(obj) (G_TYPE_INSTANCE_GET_CLASS((obj), {}, {}Class))",
        get_class_macro(&cnames.upper),
        type_macro(&cnames.upper),
        cnames.camel
    ));
    header.line(format!("#define {}(obj) (G_TYPE_CHECK_INSTANCE_TYPE((obj), {}))", is_instance_macro(&cnames.upper), type_macro(&cnames.upper)));
    header.line(format!("#define {}(klass) (G_TYPE_CHECK_CLASS_TYPE((klass), {}))", is_class_macro(&cnames.upper), type_macro(&cnames.upper)));
    header.blank();

    // Step 4: constants, as real typed `const` declarations rather than
    // value-free macros (`name` is what expression emission reads back, so
    // the declared identifier must match it exactly).
    for constant_id in class_def.constants.values() {
        let constant = context.constant(*constant_id);
        if let StatementKind::VariableDeclaration { name, type_ref, initializer } = &context.statement(constant.declaration).kind {
            let c_type = type_ref_c_name(context, context.type_ref(*type_ref));
            match initializer {
                Some(initializer) => header.line(format!("const {c_type} {name} = {};", emit_expression(context, *initializer)?)),
                None => header.line(format!("const {c_type} {name};")),
            }
        }
    }

    // Private struct + `_GET_PRIVATE` (supports step 1's opaque instance).
    if class_def.has_private_fields {
        source.line(format!("struct _{}Private {{", cnames.camel));
        source.indent();
        if class_def.fields.values().any(|id| context.field(*id).modifiers.is_private()) {
            for field_id in class_def.fields.values() {
                let field = context.field(*field_id);
                if field.modifiers.is_private() && !field.modifiers.is_static() {
                    source.line(format!("{} {};", type_ref_c_name(context, context.type_ref(field.type_ref)), field.name));
                }
            }
        } else {
            source.line("gint dummy;");
        }
        source.dedent();
        source.line("};");
        source.blank();
        source.line(format!(
            "#define {}_GET_PRIVATE(obj) (G_TYPE_INSTANCE_GET_PRIVATE((obj), {}, {}Private))",
            cnames.upper,
            type_macro(&cnames.upper),
            cnames.camel
        ));
        source.blank();
    }

    // File-static storage for private static fields (public statics get a
    // slot on the class struct instead, filled in by `_class_init`).
    for field_id in class_def.fields.values() {
        let field = context.field(*field_id);
        if field.modifiers.is_static() && field.modifiers.is_private() {
            source.line(format!("static {} {};", type_ref_c_name(context, context.type_ref(field.type_ref)), field.name));
        }
    }

    // Step 5: method bodies/thunks, including the `main` synthesis rule
    // (§8 scenario S6): a public static method literally named `Main`
    // gets a generated C `main()` that calls `g_type_init()` and forwards
    // into it, either bare (no source parameters) or with `argv` forwarded
    // into its one `string[] args` parameter.
    for method_id in class_def.methods.values() {
        emit_method_body(context, &mut source, class, *method_id)?;
    }
    if let Some(main_method_id) = class_def.methods.get("Main") {
        let main_method = context.method(*main_method_id);
        if main_method.modifiers.is_static() && main_method.parameters.len() <= 1 {
            if let Some(cdecl) = context.method_cdecl(*main_method_id) {
                source.blank();
                source.line("int");
                source.line("main(int argc, char **argv)");
                source.line("{");
                source.indent();
                source.line("g_type_init();");
                if main_method.parameters.is_empty() {
                    source.line("(void) argc;");
                    source.line("(void) argv;");
                    source.line(format!("{}();", cdecl.cname));
                    source.line("return 0;");
                } else {
                    source.line("(void) argc;");
                    source.line(format!("return {}(argv);", cdecl.cname));
                }
                source.dedent();
                source.line("}");
            }
        }
    }

    // Step 6 + 7: property accessors and the property-id enum. Prefixed
    // with the class's own upper-case name (`C_DUMMY_PROPERTY`, `C_NAME`,
    // §8 scenario S3) rather than a bare `PROP_0`/`PROP_NAME`, since plain
    // C `enum` members share one flat namespace and a second property'd
    // class in the same translation unit would otherwise redeclare them.
    if !class_def.properties.is_empty() {
        header.blank();
        header.line("enum {");
        header.indent();
        header.line(format!("{}_DUMMY_PROPERTY,", cnames.upper));
        for property_name in class_def.properties.keys() {
            header.line(format!("{}_{},", cnames.upper, property_name.to_uppercase()));
        }
        header.line(format!("{}_N_PROPERTIES", cnames.upper));
        header.dedent();
        header.line("};");
    }
    for property_id in class_def.properties.values() {
        emit_property_accessors(context, &mut header, &mut source, class, *property_id)?;
    }

    // Step 8: get/set dispatcher, mapping each property id to a `GValue`
    // accessor by its declared type kind.
    if !class_def.properties.is_empty() {
        emit_property_dispatchers(context, &mut source, &cnames, class)?;
    }

    // Step 9/10: `_init` / `_class_init`.
    source.blank();
    source.line("static void");
    source.line(format!("{}_init({} *self)", cnames.nslower, cnames.camel));
    source.line("{");
    source.indent();
    if class_def.has_private_fields {
        source.line(format!("self->priv = {}_GET_PRIVATE(self);", cnames.upper));
    }
    for field_id in class_def.fields.values() {
        let field = context.field(*field_id);
        if field.modifiers.is_static() {
            continue;
        }
        if let Some(initializer) = field.initializer {
            let value = emit_expression(context, initializer)?;
            let target = if field.modifiers.is_private() {
                format!("self->priv->{}", field.name)
            } else {
                format!("{}(self)->{}", instance_cast_macro(&cnames.upper), field.name)
            };
            source.line(format!("{target} = {value};"));
        }
    }
    if let Some(init_method_id) = class_def.init_method {
        if let Some(body) = context.method(init_method_id).body {
            emit_statement(context, &mut source, body)?;
        }
    }
    source.dedent();
    source.line("}");
    source.blank();

    source.line("static void");
    source.line(format!("{}_class_init({}Class *klass)", cnames.nslower, cnames.camel));
    source.line("{");
    source.indent();
    if class_def.has_private_fields {
        source.line(format!("g_type_class_add_private(klass, sizeof({}Private));", cnames.camel));
    }
    for field_id in class_def.fields.values() {
        let field = context.field(*field_id);
        if field.modifiers.is_static() && field.modifiers.is_public() {
            if let Some(initializer) = field.initializer {
                let value = emit_expression(context, initializer)?;
                source.line(format!("klass->{} = {value};", field.name));
            }
        }
    }
    for method_id in class_def.methods.values() {
        let method = context.method(*method_id);
        let Some(cdecl) = context.method_cdecl(*method_id) else { continue };
        match method.modifiers.dispatch_kind() {
            DispatchKind::Virtual => source.line(format!("klass->{} = {};", method.name, real_body_cname(cdecl))),
            DispatchKind::Override => {
                if let Some(super_class) = cdecl.virtual_super_class {
                    let super_cnames = class_cnames(context, super_class);
                    source.line(format!("{}({})->{} = {};", class_cast_macro(&super_cnames.upper), "klass", method.name, real_body_cname(cdecl)));
                }
            }
            _ => {}
        }
    }
    if !class_def.properties.is_empty() {
        source.line("GObjectClass *gobject_class = G_OBJECT_CLASS(klass);");
        source.line(format!("gobject_class->get_property = {}_get_property;", cnames.nslower));
        source.line(format!("gobject_class->set_property = {}_set_property;", cnames.nslower));
        for (property_name, property_id) in &class_def.properties {
            let kind = property_value_kind(context, context.property(*property_id));
            source.line(format!(
                "g_object_class_install_property(gobject_class, {}_{}, {});",
                cnames.upper,
                property_name.to_uppercase(),
                kind.param_spec_call
            ));
        }
    }
    if let Some(class_init_method_id) = class_def.class_init_method {
        if let Some(body) = context.method(class_init_method_id).body {
            emit_statement(context, &mut source, body)?;
        }
    }
    source.dedent();
    source.line("}");
    source.blank();

    // Step 11: `_get_type()` definition with the once-init guard.
    source.line("GType");
    source.line(format!("{}_get_type(void)", cnames.nslower));
    source.line("{");
    source.indent();
    source.line("static GType type = 0;");
    source.line("if (G_UNLIKELY(type == 0))");
    source.line("{");
    source.indent();
    source.line("static const GTypeInfo info = {");
    source.indent();
    source.line(format!("sizeof({}Class),", cnames.camel));
    source.line("NULL,");
    source.line("NULL,");
    source.line(format!("(GClassInitFunc) {}_class_init,", cnames.nslower));
    source.line("NULL,");
    source.line("NULL,");
    source.line(format!("sizeof({}),", cnames.camel));
    source.line("0,");
    source.line(format!("(GInstanceInitFunc) {}_init,", cnames.nslower));
    source.line("NULL");
    source.dedent();
    source.line("};");
    let parent_type = class_def.base.map(|base| format!("{}_get_type()", class_cnames(context, base).nslower)).unwrap_or_else(|| "G_TYPE_OBJECT".to_string());
    source.line(format!("type = g_type_register_static({parent_type}, \"{}\", &info, 0);", cnames.camel));
    // TODO: register implemented interfaces here once the front-end hands
    // this core an `interfaces` list on `Class`.
    source.dedent();
    source.line("}");
    source.line("return type;");
    source.dedent();
    source.line("}");

    Ok(ClassEmission { header: header.finish(), source: source.finish() })
}

/// A `virtual`/`override` method's actual body is named `{cname}_real`
/// (§8 scenario S2): the plain `cname` is reserved for the declaring
/// class's public dispatcher, which is the only name external callers
/// ever resolve to (§4.1.1 skips straight past `override` hits to the
/// declaring virtual/abstract ancestor), so an override never gets a
/// public entry point of its own.
fn real_body_cname(cdecl: &crate::model::method::MethodCdecl) -> String {
    format!("{}_real", cdecl.cname)
}

fn emit_method_body(context: &Context, source: &mut CWriter, class: ClassId, method_id: MethodId) -> Result<(), CodegenError> {
    let method = context.method(method_id);
    if method.name == "init" || method.name == "class_init" {
        // Handled separately by the dedicated `_init`/`_class_init` steps.
        return Ok(());
    }
    let Some(cdecl) = context.method_cdecl(method_id) else { return Ok(()) };

    if method.modifiers.dispatch_kind() == DispatchKind::Abstract {
        // Pure virtual: no body, only the vtable slot declared in step 2.
        return Ok(());
    }

    let dispatch_kind = method.modifiers.dispatch_kind();
    let body_name = match dispatch_kind {
        DispatchKind::Virtual | DispatchKind::Override => real_body_cname(cdecl),
        _ => cdecl.cname.clone(),
    };

    let return_type = type_ref_c_name(context, context.type_ref(method.return_type));
    source.blank();
    source.line(&return_type);
    source.line(format!("{}({})", body_name, cdecl.cparameters.join(", ")));
    source.line("{");
    source.indent();
    match method.body {
        Some(body) => emit_statement(context, source, body)?,
        None => source.line("g_return_if_reached();"),
    }
    source.dedent();
    source.line("}");

    if dispatch_kind == DispatchKind::Virtual {
        // The declaring class's public entry point, dispatching through
        // the vtable slot `_class_init` installs (its own `_real` body for
        // a plain virtual, an overriding subclass's `_real` body once one
        // is installed at runtime).
        let cnames = class_cnames(context, class);
        source.blank();
        source.line(&return_type);
        source.line(format!("{}({})", cdecl.cname, cdecl.cparameters.join(", ")));
        source.line("{");
        source.indent();
        source.line(format!("return {}({})->{}(self);", get_class_macro(&cnames.upper), "self", method.name));
        source.dedent();
        source.line("}");
    }

    Ok(())
}

fn emit_property_accessors(
    context: &Context,
    header: &mut CWriter,
    source: &mut CWriter,
    class: ClassId,
    property_id: crate::arena::PropertyId,
) -> Result<(), CodegenError> {
    let cnames = class_cnames(context, class);
    let property = context.property(property_id);
    let return_type = type_ref_c_name(context, context.type_ref(property.return_type));

    let getter_cdecl1 = format!("{return_type} {}_get_{}({} *self);", cnames.nslower, property.name, cnames.camel);
    if property.is_public() {
        header.line(getter_cdecl1);
    }

    source.blank();
    source.line(return_type.clone());
    source.line(format!("{}_get_{}({} *self)", cnames.nslower, property.name, cnames.camel));
    source.line("{");
    source.indent();
    match property.getter {
        Some(body) => emit_statement(context, source, body)?,
        None => source.line(format!("return self->priv->{};", property.name)),
    }
    source.dedent();
    source.line("}");

    if property.setter.is_some() || property.getter.is_none() {
        let setter_cdecl1 = format!("void {}_set_{}({} *self, {} value);", cnames.nslower, property.name, cnames.camel, return_type);
        if property.is_public() {
            header.line(setter_cdecl1);
        }

        source.blank();
        source.line("void");
        source.line(format!("{}_set_{}({} *self, {} value)", cnames.nslower, property.name, cnames.camel, return_type));
        source.line("{");
        source.indent();
        match property.setter {
            Some(body) => emit_statement(context, source, body)?,
            None => {
                source.line(format!("self->priv->{} = value;", property.name));
                source.line(format!("g_object_notify(G_OBJECT(self), \"{}\");", property.name));
            }
        }
        source.dedent();
        source.line("}");
    }

    Ok(())
}

/// The `GValue` accessor pair and `GParamSpec` constructor a property's
/// declared type maps to (§8 scenario S3: `string` routes through
/// `g_value_set_string`/`g_value_dup_string`/`g_param_spec_string`). Any
/// type this crate has no dedicated `GValue` transfer function for (a
/// class, struct or enum reference) falls back to the generic pointer
/// accessors.
struct PropertyValueKind {
    value_getter: &'static str,
    value_setter: &'static str,
    param_spec_call: String,
}

fn property_value_kind(context: &Context, property: &crate::model::property::Property) -> PropertyValueKind {
    let name = &property.name;
    let flags = "G_PARAM_CONSTRUCT_ONLY | G_PARAM_READWRITE";
    match context.type_ref(property.return_type).symbol {
        Some(crate::model::type_ref::TypeSymbol::Primitive(crate::model::type_ref::PrimitiveType::String)) => PropertyValueKind {
            value_getter: "g_value_set_string",
            value_setter: "g_value_dup_string",
            param_spec_call: format!("g_param_spec_string(\"{name}\", \"{name}\", \"{name}\", NULL, {flags})"),
        },
        Some(crate::model::type_ref::TypeSymbol::Primitive(crate::model::type_ref::PrimitiveType::Int)) => PropertyValueKind {
            value_getter: "g_value_set_int",
            value_setter: "g_value_get_int",
            param_spec_call: format!("g_param_spec_int(\"{name}\", \"{name}\", \"{name}\", G_MININT, G_MAXINT, 0, {flags})"),
        },
        Some(crate::model::type_ref::TypeSymbol::Primitive(crate::model::type_ref::PrimitiveType::Bool)) => PropertyValueKind {
            value_getter: "g_value_set_boolean",
            value_setter: "g_value_get_boolean",
            param_spec_call: format!("g_param_spec_boolean(\"{name}\", \"{name}\", \"{name}\", FALSE, {flags})"),
        },
        _ => PropertyValueKind {
            value_getter: "g_value_set_pointer",
            value_setter: "g_value_get_pointer",
            param_spec_call: format!("g_param_spec_pointer(\"{name}\", \"{name}\", \"{name}\", {flags})"),
        },
    }
}

fn emit_property_dispatchers(context: &Context, source: &mut CWriter, cnames: &ClassCNames, class: ClassId) -> Result<(), CodegenError> {
    let class_def = context.class(class);

    source.blank();
    source.line("static void");
    source.line(format!("{}_get_property(GObject *object, guint prop_id, GValue *value, GParamSpec *pspec)", cnames.nslower));
    source.line("{");
    source.indent();
    source.line(format!("{} *self = {}(object);", cnames.camel, instance_cast_macro(&cnames.upper)));
    source.line("switch (prop_id)");
    source.line("{");
    for (property_name, property_id) in &class_def.properties {
        let kind = property_value_kind(context, context.property(*property_id));
        source.line(format!("case {}_{}:", cnames.upper, property_name.to_uppercase()));
        source.indent();
        source.line(format!("{}(value, {}_get_{}(self));", kind.value_getter, cnames.nslower, property_name));
        source.line("break;");
        source.dedent();
    }
    source.line("default:");
    source.indent();
    source.line("G_OBJECT_WARN_INVALID_PROPERTY_ID(object, prop_id, pspec);");
    source.dedent();
    source.line("}");
    source.dedent();
    source.line("}");

    source.blank();
    source.line("static void");
    source.line(format!("{}_set_property(GObject *object, guint prop_id, const GValue *value, GParamSpec *pspec)", cnames.nslower));
    source.line("{");
    source.indent();
    source.line(format!("{} *self = {}(object);", cnames.camel, instance_cast_macro(&cnames.upper)));
    source.line("switch (prop_id)");
    source.line("{");
    for (property_name, property_id) in &class_def.properties {
        let kind = property_value_kind(context, context.property(*property_id));
        source.line(format!("case {}_{}:", cnames.upper, property_name.to_uppercase()));
        source.indent();
        source.line(format!("{}_set_{}(self, {}(value));", cnames.nslower, property_name, kind.value_setter));
        source.line("break;");
        source.dedent();
    }
    source.line("default:");
    source.indent();
    source.line("G_OBJECT_WARN_INVALID_PROPERTY_ID(object, prop_id, pspec);");
    source.dedent();
    source.line("}");
    source.dedent();
    source.line("}");

    Ok(())
}

/// The reduced Struct pass: a plain typedef'd C struct plus its methods,
/// no GObject type-system scaffolding (structs have no `_get_type`/class
/// struct of their own).
pub fn emit_struct(context: &Context, struct_id: StructId) -> Result<ClassEmission, CodegenError> {
    let struct_def = context.struct_def(struct_id);
    let camel = crate::emit::typename::base_type_name(context, crate::model::type_ref::TypeSymbol::Struct(struct_id));

    let mut header = CWriter::new();
    let mut source = CWriter::new();

    header.line(format!("typedef struct _{0} {0};", camel));
    header.line(format!("struct _{} {{", camel));
    header.indent();
    for field_id in struct_def.fields.values() {
        let field = context.field(*field_id);
        header.line(format!("{} {};", type_ref_c_name(context, context.type_ref(field.type_ref)), field.name));
    }
    header.dedent();
    header.line("};");

    for method_id in struct_def.methods.values() {
        let method = context.method(*method_id);
        let Some(cdecl) = context.method_cdecl(*method_id) else { continue };
        header.line(cdecl.cdecl1.clone());

        let return_type = type_ref_c_name(context, context.type_ref(method.return_type));
        source.blank();
        source.line(return_type);
        source.line(format!("{}({})", cdecl.cname, cdecl.cparameters.join(", ")));
        source.line("{");
        source.indent();
        if let Some(body) = method.body {
            emit_statement(context, &mut source, body)?;
        }
        source.dedent();
        source.line("}");
    }

    Ok(ClassEmission { header: header.finish(), source: source.finish() })
}

/// The reduced Enum pass: a C `enum` plus each value's already-assigned
/// `cname`.
pub fn emit_enum(context: &Context, enum_id: EnumId) -> String {
    let camel = crate::emit::typename::base_type_name(context, crate::model::type_ref::TypeSymbol::Enum(enum_id));
    let enum_def = context.enum_def(enum_id);

    let mut header = CWriter::new();
    header.line("typedef enum {");
    header.indent();
    for value in &enum_def.values {
        header.line(format!("{},", value.cname));
    }
    header.dedent();
    header.line(format!("}} {camel};"));
    header.finish()
}
