//! Small escaping helpers for the markup this crate emits.

/// Escape text for use between tags or inside a quoted attribute.
pub fn escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Strip everything but `A-Za-z0-9_-` from a class name.
pub fn sanitize_class(class: &str) -> String {
    class
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

/// Same as [`sanitize_class`] but for a space separated class list.
pub fn sanitize_class_list(classes: &str) -> String {
    classes
        .split_whitespace()
        .map(sanitize_class)
        .filter(|class| !class.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
