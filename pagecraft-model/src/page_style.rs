use crate::de::{lenient, string_like};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_THEME_COLOR: &str = "#2563eb";
pub const DEFAULT_TEXT_COLOR: &str = "#111827";
pub const DEFAULT_FONT_FAMILY: &str = "Inter, Helvetica, Arial, sans-serif";
pub const DEFAULT_MAX_WIDTH: &str = "1200px";

const THEME_PREFIX: &str = "$theme.";

/// Global page styles: brand colors, typography and custom CSS
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageStyles {
    #[serde(deserialize_with = "string_like")]
    pub background_color: Option<String>,
    #[serde(deserialize_with = "string_like")]
    pub background_image: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub theme_color: String,
    #[serde(deserialize_with = "string_like")]
    pub secondary_color: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub text_color: String,
    #[serde(deserialize_with = "lenient")]
    pub font_family: String,
    /// Stylesheet URL for a hosted web font
    #[serde(deserialize_with = "string_like")]
    pub font_url: Option<String>,
    #[serde(deserialize_with = "string_like")]
    pub custom_css: Option<String>,
    /// Width of the inner column inside full-width containers
    #[serde(deserialize_with = "lenient")]
    pub max_width: String,
    /// Named brand colors, addressable as `$theme.<name>`
    #[serde(deserialize_with = "lenient")]
    pub palette: BTreeMap<String, String>,
}

impl Default for PageStyles {
    fn default() -> Self {
        Self {
            background_color: None,
            background_image: None,
            theme_color: DEFAULT_THEME_COLOR.to_string(),
            secondary_color: None,
            text_color: DEFAULT_TEXT_COLOR.to_string(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_url: None,
            custom_css: None,
            max_width: DEFAULT_MAX_WIDTH.to_string(),
            palette: BTreeMap::new(),
        }
    }
}

impl PageStyles {
    /// Resolve a theme reference (e.g. `$theme.primary`, `$theme.accent`)
    pub fn resolve(&self, reference: &str) -> Option<String> {
        let key = reference.strip_prefix(THEME_PREFIX)?;
        match key {
            "primary" => Some(self.theme_color.clone()),
            "secondary" => self.secondary_color.clone(),
            "text" => Some(self.text_color.clone()),
            _ => self.palette.get(key).cloned(),
        }
    }

    /// Resolve a color prop. Literal colors pass through unchanged; theme
    /// references that do not resolve yield `None`.
    pub fn resolve_color(&self, value: &str) -> Option<String> {
        if Self::is_theme_reference(value) {
            self.resolve(value)
        } else {
            Some(value.to_string())
        }
    }

    /// Check if a string is a theme variable reference
    pub fn is_theme_reference(value: &str) -> bool {
        value.starts_with(THEME_PREFIX)
    }
}
