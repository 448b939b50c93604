//! Data-binding injector: wraps literal text in a merge placeholder keyed by
//! a subscriber attribute, keeping the literal as the no-data fallback.

use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::escape;
use regex::Regex;
use std::sync::OnceLock;

fn binding_name_regex() -> &'static Regex {
    static BINDING_NAME_REGEX: OnceLock<Regex> = OnceLock::new();
    BINDING_NAME_REGEX
        .get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_ .-]{0,127}$").expect("static regex"))
}

/// Whether `name` can sit inside a placeholder string literal unchanged
pub fn is_valid_name(name: &str) -> bool {
    binding_name_regex().is_match(name)
}

/// `AttributeValue("Name")` for an already validated name
pub fn attribute_value(name: &str) -> String {
    format!("AttributeValue(\"{}\")", escape::placeholder_ident(name))
}

/// `%%=v(@name)=%%` reference to a server-side variable
pub fn placeholder(variable: &str) -> String {
    let ident: String = variable
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    format!("%%=v(@{})=%%", ident)
}

/// Render `literal` (plain text, not yet escaped) with an optional binding.
///
/// Without a binding, or with an invalid one, the escaped literal is returned
/// alone; the invalid case also yields a diagnostic.
pub fn bind_text(literal: &str, binding: Option<&str>, component_id: &str) -> (String, Option<Diagnostic>) {
    let Some(name) = binding.map(str::trim).filter(|n| !n.is_empty()) else {
        return (escape::text_with_breaks(literal), None);
    };
    if !is_valid_name(name) {
        let diagnostic = Diagnostic::warning(
            DiagnosticKind::InvalidBinding,
            component_id,
            format!("data binding '{}' is not a valid attribute name; showing the literal text", name),
        );
        return (escape::text_with_breaks(literal), Some(diagnostic));
    }
    let value = attribute_value(name);
    let html = format!(
        "<span data-binding=\"{}\">%%=IIF(Empty({}), \"{}\", {})=%%</span>",
        escape::attr(name),
        value,
        escape::placeholder_literal(literal),
        value
    );
    (html, None)
}
