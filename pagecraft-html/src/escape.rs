//! Context-aware escaping.
//!
//! Every literal that reaches the output goes through exactly one of these,
//! chosen by where it lands: HTML text, an attribute value, a JS string inside
//! `<script>`, a CSS declaration value, or the fallback literal of a merge
//! placeholder.

use serde::Serialize;

/// Escape text for an HTML body context
pub fn html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape text for a double-quoted attribute value
pub fn attr(s: &str) -> String {
    html(s).replace('\n', "&#10;")
}

/// HTML text with newlines turned into `<br>`
pub fn text_with_breaks(s: &str) -> String {
    html(s).replace("\r\n", "\n").replace('\n', "<br>")
}

/// Literal text that will sit inside a `%%=...=%%` placeholder. No quote and
/// no `%` survives, so the literal cannot terminate the string or the block.
pub fn placeholder_literal(s: &str) -> String {
    text_with_breaks(s).replace('%', "&#37;")
}

/// Identifier embedded in a placeholder string literal (data extension keys,
/// field names). Quotes are doubled per the platform's string syntax and
/// delimiter characters are dropped.
pub fn placeholder_ident(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '%' | '[' | ']' | '\r' | '\n'))
        .collect::<String>()
        .replace('"', "\"\"")
}

/// Serialize a value as a JS literal that is safe inside `<script>`
pub fn js_value<T: Serialize + ?Sized>(value: &T) -> String {
    let json = serde_json::to_string(value).unwrap_or_else(|_| "null".to_string());
    harden_json(&json)
}

/// JS string literal, safe inside `<script>`
pub fn js_string(s: &str) -> String {
    js_value(s)
}

/// `%` is escaped too so the host platform never sees a `%%` token inside a
/// script literal
fn harden_json(json: &str) -> String {
    json.replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
        .replace('%', "\\u0025")
}

/// Free-form CSS declaration value. Anything that could end the declaration,
/// the rule, or the `<style>` element is refused rather than rewritten.
pub fn css_value(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    let unsafe_char = trimmed
        .chars()
        .any(|c| matches!(c, ';' | '{' | '}' | '<' | '>' | '\\' | '"'));
    let lower = trimmed.to_ascii_lowercase();
    if unsafe_char || lower.contains("/*") || lower.contains("expression(") || lower.contains("javascript:") {
        return None;
    }
    Some(trimmed.to_string())
}

/// `url("...")` for a background image
pub fn css_url(s: &str) -> Option<String> {
    let safe = url(s)?;
    Some(format!(
        "url(\"{}\")",
        safe.replace('"', "%22").replace('\\', "%5C").replace(['\n', '\r'], "")
    ))
}

/// A link target that is safe to place in `href`/`src`. Script-bearing schemes
/// are refused; merge placeholders pass through for server-side resolution.
pub fn url(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with("%%=") && trimmed.ends_with("=%%") {
        return Some(trimmed.to_string());
    }
    let compact: String = trimmed
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_ascii_control())
        .collect::<String>()
        .to_ascii_lowercase();
    match compact.split_once(':') {
        Some((scheme, _)) if !scheme.contains('/') && !scheme.contains('?') && !scheme.contains('#') => {
            if matches!(scheme, "http" | "https" | "mailto" | "tel") {
                Some(trimmed.to_string())
            } else {
                None
            }
        }
        _ => Some(trimmed.to_string()),
    }
}

/// DOM-safe identifier fragment: ASCII alphanumerics, `-` and `_`
pub fn id_part(s: &str) -> String {
    let cleaned: String = s
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
        .collect();
    if cleaned.is_empty() {
        "x".to_string()
    } else {
        cleaned
    }
}

/// DOM id for a component
pub fn dom_id(component_id: &str) -> String {
    format!("pc-{}", id_part(component_id))
}

/// Joins a component's DOM id to a derived part. [`id_part`] never emits
/// `.`, so derived ids cannot equal another component's id.
pub const DERIVED_ID_SEPARATOR: char = '.';

/// DOM id of an element owned by a component (`pc-signup.email`)
pub fn derived_id(dom_id: &str, part: &str) -> String {
    format!("{}{}{}", dom_id, DERIVED_ID_SEPARATOR, id_part(part))
}

/// Text for an HTML comment
pub fn comment(s: &str) -> String {
    s.replace("--", "- -").replace('>', "&gt;")
}

/// Custom CSS pasted by the user, made unable to close its `<style>` element
pub fn style_block(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut rest = css;
    while let Some(pos) = rest.to_ascii_lowercase().find("</style") {
        out.push_str(&rest[..pos]);
        out.push_str("<\\/style");
        rest = &rest[pos + "</style".len()..];
    }
    out.push_str(rest);
    out
}
