//! Plugin name normalization.

/// Normalize a plugin module name to an identifier usable as a variable name.
///
/// Hyphens, slashes and dots become underscores:
/// `"foo/bar-baz.js"` becomes `"foo_bar_baz_js"`.
///
/// Other characters are kept, so names that are not otherwise valid
/// identifiers stay invalid.
pub fn normalize_plugin_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '-' | '/' | '.' => '_',
            other => other,
        })
        .collect()
}

/// Words that cannot be used as a `var` binding.
const RESERVED_WORDS: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
    "if", "implements", "import", "in", "instanceof", "interface", "let", "new", "null",
    "package", "private", "protected", "public", "return", "static", "super", "switch", "this",
    "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

/// Returns true if `name` can be used as a variable binding in the generated
/// script.
///
/// Starts with a letter, `_` or `$`, continues with letters, digits, `_` or
/// `$`, and is not a reserved word.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    (first.is_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        && !RESERVED_WORDS.contains(&name)
}
