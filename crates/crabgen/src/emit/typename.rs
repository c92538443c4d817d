//! Maps a resolved [`TypeSymbol`] to the C spelling emitted in signatures,
//! casts and `g_object_new` calls.

use crate::cname::class_camel;
use crate::model::context::Context;
use crate::model::type_ref::{TypeRef, TypeSymbol};

fn namespace_camel(context: &Context, of: crate::arena::NamespaceId) -> String {
    let namespace = context.namespace(of);
    // `upper_prefix` is already namespace-qualified upper-case (`N`, `N_SUB`);
    // the camel form only needs case-folding per segment.
    namespace
        .upper_prefix
        .split('_')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
                None => String::new(),
            }
        })
        .collect()
}

/// The bare type name (`NC`, `gint`, `NColor`), without pointer/array
/// decoration.
pub fn base_type_name(context: &Context, symbol: TypeSymbol) -> String {
    match symbol {
        TypeSymbol::Primitive(primitive) => primitive.c_type_name().to_string(),
        TypeSymbol::Class(id) => {
            let namespace = context.namespace_of_class(id);
            class_camel(&namespace_camel(context, namespace), &context.class(id).name)
        }
        TypeSymbol::Struct(id) => {
            let namespace = context.namespace_of_struct(id);
            class_camel(&namespace_camel(context, namespace), &context.struct_def(id).name)
        }
        TypeSymbol::Enum(id) => {
            let namespace = context.namespace_of_enum(id);
            class_camel(&namespace_camel(context, namespace), &context.enum_def(id).name)
        }
        TypeSymbol::Namespace(_) => String::new(),
    }
}

/// The full declared type (`NC*`, `gint`, `gchar**` for a string array),
/// per the convention that classes and reference-type structs are always
/// handled through a pointer.
pub fn type_ref_c_name(context: &Context, type_ref: &TypeRef) -> String {
    let Some(symbol) = type_ref.symbol else {
        return "void*".to_string();
    };

    let base = base_type_name(context, symbol);
    let pointer = match symbol {
        TypeSymbol::Class(_) => true,
        TypeSymbol::Struct(id) => context.struct_def(id).reference_type,
        _ => false,
    };

    match (pointer, type_ref.array_type) {
        (true, true) => format!("{base}**"),
        (true, false) => format!("{base}*"),
        (false, true) => format!("{base}*"),
        (false, false) => base,
    }
}
