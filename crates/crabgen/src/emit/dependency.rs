//! The Dependency Resolver (§4.5).
//!
//! Decides, for one compilation unit, what its generated header/source
//! pair needs to `#include` or forward-declare so every type it names
//! compiles without implicit declarations. Three cases per dependency:
//! the global namespace is always visible and needs nothing; an imported
//! namespace needs its recorded `#include`; anything else in the same
//! program gets a forward-declared typedef pair in the header and an
//! `#include` of that namespace's generated header in the source file.

use std::collections::BTreeSet;

use crate::arena::ClassId;
use crate::emit::declaration::class_cnames;
use crate::model::compilation_unit::DepType;
use crate::model::context::Context;

#[derive(Debug, Default)]
pub struct ResolvedDependencies {
    /// `#include` lines for the header (`.h`) output, deduplicated.
    pub header_includes: Vec<String>,
    /// `#include` lines for the source (`.c`) output, deduplicated.
    pub source_includes: Vec<String>,
    /// Forward-declared typedef pairs for same-program classes the header
    /// references only by pointer (never by value), avoiding a header
    /// cycle between mutually-referencing namespaces.
    pub forward_typedefs: Vec<String>,
}

/// `local_classes` names the classes declared in the compilation unit we're
/// resolving dependencies for, so a dependency that turns out to be one of
/// their base classes can be routed into the header (its layout is needed
/// there, not just forward-declared).
pub fn resolve_dependencies(context: &Context, dep_types: &BTreeSet<DepType>, local_classes: &[ClassId]) -> ResolvedDependencies {
    let mut resolved = ResolvedDependencies::default();
    let mut seen_header_includes = BTreeSet::new();
    let mut seen_source_includes = BTreeSet::new();
    let mut seen_forward_typedefs = BTreeSet::new();

    for dep in dep_types {
        let namespace_id = match dep {
            DepType::Class(id) => context.namespace_of_class(*id),
            DepType::Struct(id) => context.namespace_of_struct(*id),
            DepType::Enum(id) => context.namespace_of_enum(*id),
        };
        let namespace = context.namespace(namespace_id);

        if namespace.is_global() {
            continue;
        }

        if namespace.import {
            if let Some(include_filename) = &namespace.include_filename {
                let line = format!("#include <{include_filename}>");
                if seen_header_includes.insert(line.clone()) {
                    resolved.header_includes.push(line);
                }
            }
            continue;
        }

        // Same-program, non-imported: always include the defining
        // namespace's own generated header in the source file, where the
        // full definition is needed.
        let include_line = format!("#include \"{}.h\"", namespace.name.to_lowercase());
        if seen_source_includes.insert(include_line.clone()) {
            resolved.source_includes.push(include_line.clone());
        }

        // A base class of one of our own classes, or an enum (whose values
        // our own header may reference directly), also needs its
        // definition visible from the header itself.
        let is_base_dependency = matches!(dep, DepType::Class(class_id) if local_classes.iter().any(|&local| context.class(local).base == Some(*class_id)));
        if is_base_dependency || matches!(dep, DepType::Enum(_)) {
            if seen_header_includes.insert(include_line.clone()) {
                resolved.header_includes.push(include_line);
            }
        }

        if let DepType::Class(class_id) = dep {
            let cnames = class_cnames(context, *class_id);
            let guard = format!("_TYPE_{}", cnames.camel.to_uppercase());
            let forward = format!(
                "#ifndef {guard}\n#define {guard}\ntypedef struct _{0} {0};\ntypedef struct _{0}Class {0}Class;\n#endif",
                cnames.camel
            );
            if seen_forward_typedefs.insert(forward.clone()) {
                resolved.forward_typedefs.push(forward);
            }
        }
    }

    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::namespace::Namespace;

    #[test]
    fn global_namespace_dependency_is_skipped() {
        let mut context = Context::new();
        let class_id = context.classes.push(crate::model::class::Class {
            name: "Widget".to_string(),
            base: None,
            fields: Default::default(),
            methods: Default::default(),
            properties: Default::default(),
            constants: Default::default(),
            span: crate::location::SourceSpan::new(crate::location::SourceFileId::new("t", "t"), 0..1),
            has_private_fields: false,
            init_method: None,
            class_init_method: None,
        });
        let root_namespace = context.root_namespace;
        context.namespaces.get_mut(root_namespace).classes.insert("Widget".to_string(), class_id);

        let mut deps = BTreeSet::new();
        deps.insert(DepType::Class(class_id));

        let resolved = resolve_dependencies(&context, &deps, &[]);
        assert!(resolved.header_includes.is_empty());
        assert!(resolved.source_includes.is_empty());
        assert!(resolved.forward_typedefs.is_empty());
    }

    #[test]
    fn imported_namespace_dependency_includes_its_header() {
        let mut context = Context::new();
        let namespace_id = context.namespaces.push(Namespace {
            name: "Gtk".to_string(),
            lower_prefix: "gtk".to_string(),
            upper_prefix: "GTK".to_string(),
            classes: Default::default(),
            structs: Default::default(),
            enums: Default::default(),
            free_methods: Default::default(),
            fields: Default::default(),
            import: true,
            include_filename: Some("gtk/gtk.h".to_string()),
            parent: None,
        });
        let class_id = context.classes.push(crate::model::class::Class {
            name: "Widget".to_string(),
            base: None,
            fields: Default::default(),
            methods: Default::default(),
            properties: Default::default(),
            constants: Default::default(),
            span: crate::location::SourceSpan::new(crate::location::SourceFileId::new("t", "t"), 0..1),
            has_private_fields: false,
            init_method: None,
            class_init_method: None,
        });
        context.namespaces.get_mut(namespace_id).classes.insert("Widget".to_string(), class_id);

        let mut deps = BTreeSet::new();
        deps.insert(DepType::Class(class_id));

        let resolved = resolve_dependencies(&context, &deps, &[]);
        assert_eq!(resolved.header_includes, vec!["#include <gtk/gtk.h>".to_string()]);
    }
}
