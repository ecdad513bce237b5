//! Attribute name inflection
//!
//! Plurals are formed by suffix only (`s`, or `es` after a trailing `s`).
//! Irregular plurals are not recognized; generated names for them read oddly
//! but stay unique.

/// `item` → `items`, `class` → `classes`
pub fn make_plural(name: &str) -> String {
    if name.ends_with('s') {
        format!("{name}es")
    } else {
        format!("{name}s")
    }
}

/// Strip a plural suffix: `items` → `item`, `classes` → `class`
pub fn make_singular(name: &str) -> String {
    if let Some(stem) = name.strip_suffix("ses") {
        return format!("{stem}s");
    }
    match name.strip_suffix('s') {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => name.to_string(),
    }
}

/// Lower the first character: `Document` → `document`
pub fn make_lower_case(name: &str) -> String {
    let mut characters = name.chars();
    match characters.next() {
        Some(first) => first.to_lowercase().chain(characters).collect(),
        None => String::new(),
    }
}
