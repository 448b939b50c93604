use crate::de::{lenient, string_like};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Page-level metadata that ends up in `<head>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageMeta {
    #[serde(deserialize_with = "lenient")]
    pub title: String,
    #[serde(deserialize_with = "string_like")]
    pub description: Option<String>,
    #[serde(deserialize_with = "string_like")]
    pub favicon: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub keywords: Vec<String>,
    #[serde(deserialize_with = "string_like")]
    pub og_image: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub lang: String,
    /// Default data extension for form submissions
    #[serde(deserialize_with = "string_like")]
    pub data_extension_key: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub tracking: Tracking,
}

impl Default for PageMeta {
    fn default() -> Self {
        Self {
            title: "Untitled page".to_string(),
            description: None,
            favicon: None,
            keywords: Vec::new(),
            og_image: None,
            lang: "en".to_string(),
            data_extension_key: None,
            tracking: Tracking::default(),
        }
    }
}

/// Third-party tracking snippets, each gated by its own `enabled` flag
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Tracking {
    #[serde(deserialize_with = "lenient")]
    pub facebook_pixel: TrackingPixel,
    #[serde(deserialize_with = "lenient")]
    pub google_analytics: TrackingPixel,
    #[serde(deserialize_with = "lenient")]
    pub google_tag_manager: TrackingPixel,
    #[serde(deserialize_with = "lenient")]
    pub linkedin_insight: TrackingPixel,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingPixel {
    #[serde(deserialize_with = "lenient")]
    pub enabled: bool,
    #[serde(deserialize_with = "string_like")]
    pub id: Option<String>,
}

impl TrackingPixel {
    /// The pixel id, if the snippet is enabled and the id is safe to embed
    pub fn active_id(&self) -> Option<&str> {
        static PIXEL_ID_REGEX: OnceLock<Regex> = OnceLock::new();
        let re = PIXEL_ID_REGEX
            .get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]{1,64}$").expect("static regex"));

        if !self.enabled {
            return None;
        }
        self.id.as_deref().filter(|id| re.is_match(id))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerPosition {
    Top,
    #[default]
    Bottom,
}

/// Cookie consent banner rendered as a page overlay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CookieBanner {
    #[serde(deserialize_with = "lenient")]
    pub enabled: bool,
    pub text: String,
    pub accept_label: String,
    #[serde(deserialize_with = "string_like")]
    pub decline_label: Option<String>,
    #[serde(deserialize_with = "string_like")]
    pub policy_url: Option<String>,
    #[serde(deserialize_with = "string_like")]
    pub policy_label: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub position: BannerPosition,
    #[serde(deserialize_with = "string_like")]
    pub background_color: Option<String>,
    #[serde(deserialize_with = "string_like")]
    pub text_color: Option<String>,
}

impl Default for CookieBanner {
    fn default() -> Self {
        Self {
            enabled: false,
            text: "We use cookies to improve your experience on this site.".to_string(),
            accept_label: "Accept".to_string(),
            decline_label: None,
            policy_url: None,
            policy_label: None,
            position: BannerPosition::Bottom,
            background_color: None,
            text_color: None,
        }
    }
}
