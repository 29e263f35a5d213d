//! Identifier casing and TypeScript literal quoting.

/// Derive a type name from a table name.
///
/// The name is split on `_`; each word gets an upper-case first character
/// and a lower-case remainder. Empty words (from doubled or edge
/// underscores) vanish.
pub fn type_name(table: &str) -> String {
    table
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect()
}

/// File name of an entity: type name plus suffix.
pub fn entity_file_name(table: &str, suffix: &str) -> String {
    format!("{}{}", type_name(table), suffix)
}

/// Single-quoted TypeScript string literal.
pub fn single_quoted(value: &str) -> String {
    format!("'{}'", escape(value, '\''))
}

/// Double-quoted TypeScript string literal.
pub fn double_quoted(value: &str) -> String {
    format!("\"{}\"", escape(value, '"'))
}

/// Property key for a class field, quoted when it is not a plain identifier.
pub fn property_key(name: &str) -> String {
    if is_identifier(name) {
        name.to_string()
    } else {
        single_quoted(name)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn escape(value: &str, quote: char) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if c == '\\' || c == quote {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
