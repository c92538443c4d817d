//! GObject C-identifier derivation.
//!
//! Pure string-shaping helpers shared by the Declaration, Expression and
//! Dependency emitters: given a namespace prefix and a class/method/
//! constant name, compute the various C spellings the GObject convention
//! requires (`nslower_lower_name`, `NS_TYPE_CLASS`, `NS_CLASS`, …).
//! Kept independent of the `Context` arena since these are pure
//! transformations of already-known strings.

/// Splits a `CamelCase` or `mixedCase` identifier into lower_snake_case
/// words, the building block for every other naming scheme here.
fn snake_words(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    for ch in name.chars() {
        if ch.is_uppercase() && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.push(ch.to_ascii_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn snake_case(name: &str) -> String {
    snake_words(name).join("_")
}

/// `nslower_lower_name`: namespace prefix + class name + member name, all
/// lower_snake, used for method `cname`s (§4.4 Pass 1).
pub fn class_method_cname(namespace_lower: &str, class_name: &str, member_name: &str) -> String {
    let mut parts = Vec::new();
    if !namespace_lower.is_empty() {
        parts.push(namespace_lower.to_string());
    }
    parts.push(snake_case(class_name));
    parts.push(snake_case(member_name));
    parts.join("_")
}

/// `nslower_name`: namespace prefix + free method name, used for free
/// namespace methods (§4.4 Pass 1, "nslower_name for free namespace
/// methods").
pub fn free_method_cname(namespace_lower: &str, member_name: &str) -> String {
    let mut parts = Vec::new();
    if !namespace_lower.is_empty() {
        parts.push(namespace_lower.to_string());
    }
    parts.push(snake_case(member_name));
    parts.join("_")
}

/// The `nslower_lower` prefix shared by every class-scoped C symbol,
/// e.g. `n_c` for namespace `N` class `C`.
pub fn class_prefix_lower(namespace_lower: &str, class_name: &str) -> String {
    let mut parts = Vec::new();
    if !namespace_lower.is_empty() {
        parts.push(namespace_lower.to_string());
    }
    parts.push(snake_case(class_name));
    parts.join("_")
}

/// The `NS_CLASS` upper-case macro prefix, e.g. `N_C`.
pub fn class_prefix_upper(namespace_upper: &str, class_name: &str) -> String {
    let mut parts = Vec::new();
    if !namespace_upper.is_empty() {
        parts.push(namespace_upper.to_string());
    }
    parts.push(snake_case(class_name).to_uppercase());
    parts.join("_")
}

/// The `NSClass` camel-case type name, e.g. `NC`.
pub fn class_camel(namespace_camel: &str, class_name: &str) -> String {
    format!("{namespace_camel}{class_name}")
}

/// `NS_TYPE_CLASS`: the namespace/class prefix with `TYPE_` spliced in
/// before the final (class-name) segment.
pub fn type_macro(upper_prefix: &str) -> String {
    match upper_prefix.rsplit_once('_') {
        Some((namespace, class)) => format!("{namespace}_TYPE_{class}"),
        None => format!("TYPE_{upper_prefix}"),
    }
}

/// `NS_CLASS(obj)` instance-cast macro name.
pub fn instance_cast_macro(upper_prefix: &str) -> String {
    upper_prefix.to_string()
}

/// `NS_CLASS_CLASS(klass)` class-cast macro name.
pub fn class_cast_macro(upper_prefix: &str) -> String {
    format!("{upper_prefix}_CLASS")
}

/// `NS_CLASS_GET_CLASS(obj)`.
pub fn get_class_macro(upper_prefix: &str) -> String {
    format!("{upper_prefix}_GET_CLASS")
}

/// `NS_IS_CLASS(obj)`: like [`type_macro`], `IS_` splices in before the
/// final (class-name) segment rather than prefixing the whole thing, so a
/// namespaced class reads `N_IS_C` and not `IS_N_C`.
pub fn is_instance_macro(upper_prefix: &str) -> String {
    match upper_prefix.rsplit_once('_') {
        Some((namespace, class)) => format!("{namespace}_IS_{class}"),
        None => format!("IS_{upper_prefix}"),
    }
}

/// `NS_IS_CLASS_CLASS(klass)`.
pub fn is_class_macro(upper_prefix: &str) -> String {
    format!("{}_CLASS", is_instance_macro(upper_prefix))
}

/// Upper-cases and sanitizes a basename for an include guard:
/// `__NAME_H__` with every non-alphanumeric character turned into `_`
/// (§6 "include-guard").
pub fn include_guard(basename: &str) -> String {
    let sanitized: String = basename
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch.to_ascii_uppercase() } else { '_' })
        .collect();
    format!("__{sanitized}_H__")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_case_splits_camel_words() {
        assert_eq!(snake_case("PersonName"), "person_name");
    }

    #[test]
    fn class_method_cname_joins_namespace_class_member() {
        assert_eq!(class_method_cname("n", "C", "getName"), "n_c_get_name");
    }

    #[test]
    fn free_method_cname_skips_class_segment() {
        assert_eq!(free_method_cname("n", "helper"), "n_helper");
    }

    #[test]
    fn include_guard_sanitizes_non_alphanumerics() {
        assert_eq!(include_guard("my-file.name"), "__MY_FILE_NAME_H__");
    }

    #[test]
    fn type_macro_splices_type_before_class_segment() {
        assert_eq!(type_macro("N_C"), "N_TYPE_C");
    }

    #[test]
    fn is_instance_macro_splices_is_before_class_segment() {
        assert_eq!(is_instance_macro("N_C"), "N_IS_C");
        assert_eq!(is_instance_macro("COUNTER"), "IS_COUNTER");
    }

    #[test]
    fn is_class_macro_appends_class_suffix() {
        assert_eq!(is_class_macro("N_C"), "N_IS_C_CLASS");
    }
}
