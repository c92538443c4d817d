//! The Driver (§5, §6): the single-threaded entry point that turns a
//! fully-populated [`Context`] into the program's `.h`/`.c` file pairs.
//!
//! One compilation unit at a time, synchronously: Pass 1 reserves every
//! method's C declaration, the resolver fills in every expression's
//! static type, then Pass 2 emits text and the Dependency Resolver
//! decides what to `#include`. No work is shared across units, and
//! nothing here spawns a thread — matching §5's single-threaded,
//! synchronous model.

use crate::arena::{ClassId, NamespaceId};
use crate::cname::include_guard;
use crate::emit::declaration::{emit_class, emit_enum, emit_free_methods, emit_struct, reserve_class, reserve_free_methods, reserve_struct};
use crate::emit::dependency::resolve_dependencies;
use crate::error::CodegenError;
use crate::model::context::Context;
use crate::resolver::resolve_expression;
use crate::resolver::scope::ScopeStack;

/// One generated output file, held in memory until the whole unit is
/// lowered successfully. Grounded on §5's requirement that a buffer is
/// flushed on every exit path: [`Driver::run`] returns whatever it has
/// accumulated so far even when a later unit fails, rather than losing
/// completed output to an early return.
#[derive(Debug, Clone)]
pub struct EmittedFile {
    pub path: String,
    pub contents: String,
}

#[derive(Debug, Default)]
pub struct Driver;

impl Driver {
    pub fn new() -> Self {
        Self
    }

    /// Lowers every compilation unit in `context`, returning the files
    /// produced before the first unit that fails, paired with that
    /// failure — or all files and `Ok` if every unit lowered cleanly.
    pub fn run(&self, context: &mut Context) -> Result<Vec<EmittedFile>, (CodegenError, Vec<EmittedFile>)> {
        let mut emitted = Vec::new();
        let unit_count = context.compilation_units.len();

        for unit_index in 0..unit_count {
            match self.run_unit(context, unit_index) {
                Ok(mut files) => emitted.append(&mut files),
                Err(error) => return Err((error, emitted)),
            }
        }

        Ok(emitted)
    }

    fn run_unit(&self, context: &mut Context, unit_index: usize) -> Result<Vec<EmittedFile>, CodegenError> {
        let unit = context.compilation_units[unit_index].clone();

        let mut namespaces = vec![unit.root_namespace];
        namespaces.extend(unit.child_namespaces.iter().copied());

        let using_directives = resolve_using_directives(context, &unit.using_directives);
        let mut local_classes: Vec<ClassId> = Vec::new();

        for namespace in &namespaces {
            reserve_free_methods(context, *namespace)?;

            let class_ids: Vec<_> = context.namespace(*namespace).classes.values().copied().collect();
            for class_id in class_ids {
                reserve_class(context, class_id)?;
                local_classes.push(class_id);
            }

            let struct_ids: Vec<_> = context.namespace(*namespace).structs.values().copied().collect();
            for struct_id in struct_ids {
                reserve_struct(context, struct_id)?;
            }
        }

        for namespace in &namespaces {
            let class_ids: Vec<_> = context.namespace(*namespace).classes.values().copied().collect();
            for class_id in &class_ids {
                resolve_class_bodies(context, *class_id, using_directives.clone())?;
            }

            let struct_ids: Vec<_> = context.namespace(*namespace).structs.values().copied().collect();
            for struct_id in &struct_ids {
                resolve_struct_bodies(context, *struct_id, using_directives.clone())?;
            }

            let free_method_ids: Vec<_> = context.namespace(*namespace).free_methods.values().copied().collect();
            for method_id in free_method_ids {
                if let Some(body) = context.method(method_id).body {
                    let mut scope = ScopeStack::new(None, *namespace, using_directives.clone());
                    declare_parameters(&mut scope, context.method(method_id));
                    crate::emit::statement::resolve_statement(context, &mut scope, body)?;
                }
            }

            let namespace_field_ids: Vec<_> = context.namespace(*namespace).fields.values().copied().collect();
            for field_id in namespace_field_ids {
                if let Some(initializer) = context.field(field_id).initializer {
                    let mut scope = ScopeStack::new(None, *namespace, using_directives.clone());
                    resolve_expression(context, &mut scope, initializer)?;
                }
            }
        }

        let mut header_body = String::new();
        let mut source_body = String::new();

        for namespace in &namespaces {
            let class_ids: Vec<_> = context.namespace(*namespace).classes.values().copied().collect();
            for class_id in class_ids {
                let emission = emit_class(context, class_id)?;
                header_body.push_str(&emission.header);
                header_body.push('\n');
                source_body.push_str(&emission.source);
                source_body.push('\n');
            }

            let struct_ids: Vec<_> = context.namespace(*namespace).structs.values().copied().collect();
            for struct_id in struct_ids {
                let emission = emit_struct(context, struct_id)?;
                header_body.push_str(&emission.header);
                header_body.push('\n');
                source_body.push_str(&emission.source);
                source_body.push('\n');
            }

            let enum_ids: Vec<_> = context.namespace(*namespace).enums.values().copied().collect();
            for enum_id in enum_ids {
                header_body.push_str(&emit_enum(context, enum_id));
                header_body.push('\n');
            }

            let free_emission = emit_free_methods(context, *namespace)?;
            header_body.push_str(&free_emission.header);
            header_body.push('\n');
            source_body.push_str(&free_emission.source);
            source_body.push('\n');
        }

        let resolved = resolve_dependencies(context, &unit.dep_types, &local_classes);

        let guard = include_guard(&unit.filename);
        let mut header = String::new();
        header.push_str(&format!("#ifndef {guard}\n#define {guard}\n\n"));
        header.push_str("#include <glib-object.h>\n");
        for include in &resolved.header_includes {
            header.push_str(include);
            header.push('\n');
        }
        header.push_str("\nG_BEGIN_DECLS\n\n");
        for forward in &resolved.forward_typedefs {
            header.push_str(forward);
            header.push('\n');
        }
        header.push('\n');
        header.push_str(&header_body);
        header.push_str("\nG_END_DECLS\n\n");
        header.push_str(&format!("#endif /* {guard} */\n"));

        let mut source = String::new();
        source.push_str(&format!("#include \"{}.h\"\n", unit.filename));
        for include in &resolved.source_includes {
            source.push_str(include);
            source.push('\n');
        }
        source.push('\n');
        source.push_str(&source_body);

        Ok(vec![
            EmittedFile { path: format!("{}.h", unit.filename), contents: header },
            EmittedFile { path: format!("{}.c", unit.filename), contents: source },
        ])
    }
}

fn resolve_using_directives(context: &Context, names: &[String]) -> Vec<NamespaceId> {
    names
        .iter()
        .filter_map(|name| context.namespaces.iter_with_ids().find(|(_, namespace)| &namespace.name == name).map(|(id, _)| id))
        .collect()
}

/// Declares each of `method`'s formal parameters as a local in the
/// just-opened method-level frame, so a body can refer to them by name —
/// the base link in invariant 6's "Block → containing method → …" chain.
fn declare_parameters(scope: &mut ScopeStack, method: &crate::model::method::Method) {
    for parameter in &method.parameters {
        scope.declare_local(parameter.name.clone(), parameter.type_ref);
    }
}

fn resolve_class_bodies(context: &mut Context, class_id: crate::arena::ClassId, using_directives: Vec<NamespaceId>) -> Result<(), CodegenError> {
    let namespace = context.namespace_of_class(class_id);
    let method_ids: Vec<_> = context.class(class_id).methods.values().copied().collect();
    for method_id in method_ids {
        if let Some(body) = context.method(method_id).body {
            let mut scope = ScopeStack::new(Some(class_id), namespace, using_directives.clone());
            declare_parameters(&mut scope, context.method(method_id));
            crate::emit::statement::resolve_statement(context, &mut scope, body)?;
        }
    }

    let field_ids: Vec<_> = context.class(class_id).fields.values().copied().collect();
    for field_id in field_ids {
        if let Some(initializer) = context.field(field_id).initializer {
            let mut scope = ScopeStack::new(Some(class_id), namespace, using_directives.clone());
            resolve_expression(context, &mut scope, initializer)?;
        }
    }

    let constant_ids: Vec<_> = context.class(class_id).constants.values().copied().collect();
    for constant_id in constant_ids {
        let declaration = context.constant(constant_id).declaration;
        let mut scope = ScopeStack::new(Some(class_id), namespace, using_directives.clone());
        crate::emit::statement::resolve_statement(context, &mut scope, declaration)?;
    }

    Ok(())
}

fn resolve_struct_bodies(context: &mut Context, struct_id: crate::arena::StructId, using_directives: Vec<NamespaceId>) -> Result<(), CodegenError> {
    let namespace = context.namespace_of_struct(struct_id);
    let method_ids: Vec<_> = context.struct_def(struct_id).methods.values().copied().collect();
    for method_id in method_ids {
        if let Some(body) = context.method(method_id).body {
            let mut scope = ScopeStack::new(None, namespace, using_directives.clone());
            declare_parameters(&mut scope, context.method(method_id));
            crate::emit::statement::resolve_statement(context, &mut scope, body)?;
        }
    }
    Ok(())
}
