//! Style/layout resolver for container components.
//!
//! Turns a [`StyleBag`] and [`LayoutBag`] into CSS declarations and a wrapper
//! shape. Values are free-form CSS strings: forwarded or omitted, never
//! unit-converted.

use crate::context::PageContext;
use crate::escape;
use pagecraft_model::{value_to_string, Alignment, BackgroundType, FlexDirection, LayoutBag, StyleBag};

/// Style keys forwarded as literal declarations (camelCase as the editor
/// writes them)
pub const PASSTHROUGH_KEYS: &[&str] = &[
    "padding",
    "paddingTop",
    "paddingRight",
    "paddingBottom",
    "paddingLeft",
    "margin",
    "marginTop",
    "marginRight",
    "marginBottom",
    "marginLeft",
    "border",
    "borderTop",
    "borderBottom",
    "borderColor",
    "borderWidth",
    "borderStyle",
    "borderRadius",
    "boxShadow",
    "minHeight",
    "height",
    "color",
    "fontFamily",
    "fontSize",
    "textAlign",
    "opacity",
];

/// Keys the resolver consumes itself. They never appear as declarations.
pub const STRUCTURAL_KEYS: &[&str] = &[
    "isFullWidth",
    "backgroundType",
    "backgroundColor",
    "gradientFrom",
    "gradientTo",
    "gradientAngle",
    "backgroundImage",
    "overlayColor",
    "overlayOpacity",
];

const DEFAULT_GRADIENT_ANGLE: &str = "180deg";
const DEFAULT_OVERLAY_OPACITY: f64 = 0.5;

/// Resolved wrapper for one container
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedBox {
    /// Declarations for the outer element
    pub outer: String,
    /// Declarations for the inner constrained column; only set for full-width boxes
    pub inner: Option<String>,
    pub full_width: bool,
    /// `rgba(...)` of the image overlay layer
    pub overlay: Option<String>,
}

/// Resolve a container's style and layout bags
pub fn resolve_box(styles: &StyleBag, layout: &LayoutBag, page: &PageContext) -> ResolvedBox {
    let background = background_css(styles, page);
    let passthrough = passthrough_css(styles);
    let flex = layout_css(layout);
    let overlay = overlay_color(styles, page);

    let mut outer = String::new();
    if overlay.is_some() {
        outer.push_str("position:relative;");
    }
    outer.push_str(&background);

    if styles.is_full_width {
        outer.push_str("width:100%;");
        outer.push_str(&passthrough);
        let mut inner = format!("max-width:{};margin:0 auto;", page.max_width());
        inner.push_str(&flex);
        ResolvedBox {
            outer,
            inner: Some(inner),
            full_width: true,
            overlay,
        }
    } else {
        outer.push_str(&format!("max-width:{};margin-left:auto;margin-right:auto;", page.max_width()));
        outer.push_str(&passthrough);
        outer.push_str(&flex);
        ResolvedBox {
            outer,
            inner: None,
            full_width: false,
            overlay,
        }
    }
}

/// Render a resolved box around `content`. `attrs` is already-escaped
/// attribute text (`id="..." class="..."`).
pub fn wrap(tag: &str, attrs: &str, resolved: &ResolvedBox, content: &str) -> String {
    let overlay = resolved
        .overlay
        .as_ref()
        .map(|rgba| format!("<div class=\"pc-overlay\" style=\"background:{};\"></div>", rgba))
        .unwrap_or_default();
    match &resolved.inner {
        Some(inner) => format!(
            "<{tag} {attrs} style=\"{outer}\">{overlay}<div class=\"pc-inner\" style=\"{inner}\">{content}</div></{tag}>",
            tag = tag,
            attrs = attrs,
            outer = escape::attr(&resolved.outer),
            overlay = overlay,
            inner = escape::attr(inner),
            content = content
        ),
        None => format!(
            "<{tag} {attrs} style=\"{outer}\">{overlay}{content}</{tag}>",
            tag = tag,
            attrs = attrs,
            outer = escape::attr(&resolved.outer),
            overlay = overlay,
            content = content
        ),
    }
}

/// Background declarations for the three background modes
pub fn background_css(styles: &StyleBag, page: &PageContext) -> String {
    let mut css = String::new();
    let color = page.color(styles.background_color.as_deref());
    match styles.background_type {
        BackgroundType::Solid => {
            if let Some(color) = color {
                css.push_str(&format!("background-color:{};", color));
            }
        }
        BackgroundType::Gradient => {
            let from = page
                .color(styles.gradient_from.as_deref())
                .unwrap_or_else(|| page.theme_color());
            let to = page
                .color(styles.gradient_to.as_deref())
                .unwrap_or_else(|| from.clone());
            let angle = styles
                .gradient_angle
                .as_deref()
                .map(gradient_angle)
                .unwrap_or_else(|| DEFAULT_GRADIENT_ANGLE.to_string());
            css.push_str(&format!("background:linear-gradient({}, {}, {});", angle, from, to));
        }
        BackgroundType::Image => {
            if let Some(color) = color {
                css.push_str(&format!("background-color:{};", color));
            }
            if let Some(url) = styles.background_image.as_deref().and_then(escape::css_url) {
                css.push_str(&format!(
                    "background-image:{};background-size:cover;background-position:center;background-repeat:no-repeat;",
                    url
                ));
            }
        }
    }
    css
}

/// Bare numbers are degrees; anything else must already be a CSS angle
fn gradient_angle(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.parse::<f64>().is_ok() {
        return format!("{}deg", trimmed);
    }
    escape::css_value(trimmed).unwrap_or_else(|| DEFAULT_GRADIENT_ANGLE.to_string())
}

fn overlay_color(styles: &StyleBag, page: &PageContext) -> Option<String> {
    if styles.background_type != BackgroundType::Image {
        return None;
    }
    let color = page.color(styles.overlay_color.as_deref())?;
    let opacity = styles.overlay_opacity.unwrap_or(DEFAULT_OVERLAY_OPACITY);
    Some(rgba_from_hex(&color, opacity))
}

/// Whitelisted passthrough declarations. Unknown keys and unsafe values are
/// dropped.
pub fn passthrough_css(styles: &StyleBag) -> String {
    let mut css = String::new();
    for (key, value) in &styles.extra {
        if !PASSTHROUGH_KEYS.contains(&key.as_str()) {
            if !STRUCTURAL_KEYS.contains(&key.as_str()) {
                tracing::trace!(key = %key, "style key not forwarded");
            }
            continue;
        }
        let Some(raw) = value_to_string(value) else {
            continue;
        };
        match escape::css_value(&raw) {
            Some(safe) => css.push_str(&format!("{}:{};", kebab_case(key), safe)),
            None => tracing::debug!(key = %key, "unsafe style value omitted"),
        }
    }
    css
}

/// Flex declarations. Unset alignment centers.
pub fn layout_css(layout: &LayoutBag) -> String {
    let (direction, main, cross) = match layout.direction {
        FlexDirection::Column => ("column", layout.vertical_align, layout.horizontal_align),
        FlexDirection::Row => ("row", layout.horizontal_align, layout.vertical_align),
    };
    let mut css = format!(
        "display:flex;flex-direction:{};justify-content:{};align-items:{};",
        direction,
        justify_to_css(main.unwrap_or(Alignment::Center)),
        align_to_css(cross.unwrap_or(Alignment::Center)),
    );
    if let Some(gap) = layout.gap.as_deref().and_then(escape::css_value) {
        css.push_str(&format!("gap:{};", gap));
    }
    if layout.wrap {
        css.push_str("flex-wrap:wrap;");
    }
    css
}

fn justify_to_css(a: Alignment) -> &'static str {
    match a {
        Alignment::Start => "flex-start",
        Alignment::Center => "center",
        Alignment::End => "flex-end",
        Alignment::Between => "space-between",
        Alignment::Stretch => "stretch",
    }
}

fn align_to_css(a: Alignment) -> &'static str {
    match a {
        Alignment::Start => "flex-start",
        Alignment::Center => "center",
        Alignment::End => "flex-end",
        Alignment::Stretch | Alignment::Between => "stretch",
    }
}

/// Converts hex color + opacity to rgba() string. Opacity above 1 is read as
/// a percentage.
pub fn rgba_from_hex(hex: &str, opacity: f64) -> String {
    let opacity = if opacity > 1.0 { opacity / 100.0 } else { opacity }.clamp(0.0, 1.0);
    let hex = hex.trim().trim_start_matches('#');
    let expanded: String = if hex.len() == 3 {
        hex.chars().flat_map(|c| [c, c]).collect()
    } else {
        hex.to_string()
    };
    if expanded.len() == 6 && expanded.is_ascii() {
        if let (Ok(r), Ok(g), Ok(b)) = (
            u8::from_str_radix(&expanded[0..2], 16),
            u8::from_str_radix(&expanded[2..4], 16),
            u8::from_str_radix(&expanded[4..6], 16),
        ) {
            return format!("rgba({},{},{},{})", r, g, b, opacity);
        }
    }
    format!("rgba(0,0,0,{})", opacity)
}

/// `borderRadius` -> `border-radius`
pub fn kebab_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
