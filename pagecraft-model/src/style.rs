use crate::de::{lenient, string_like};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// How a container paints its background
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundType {
    #[default]
    Solid,
    Gradient,
    Image,
}

/// Style bag accepted by every container-capable component.
///
/// The named fields are consumed structurally by the layout resolver. Any other
/// key lands in `extra` and is only forwarded as CSS if it is whitelisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleBag {
    #[serde(deserialize_with = "lenient")]
    pub is_full_width: bool,
    #[serde(deserialize_with = "lenient")]
    pub background_type: BackgroundType,
    #[serde(deserialize_with = "string_like")]
    pub background_color: Option<String>,
    #[serde(deserialize_with = "string_like")]
    pub gradient_from: Option<String>,
    #[serde(deserialize_with = "string_like")]
    pub gradient_to: Option<String>,
    #[serde(deserialize_with = "string_like")]
    pub gradient_angle: Option<String>,
    #[serde(deserialize_with = "string_like")]
    pub background_image: Option<String>,
    #[serde(deserialize_with = "string_like")]
    pub overlay_color: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub overlay_opacity: Option<f64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl StyleBag {
    /// Color-bearing slots, paired with their prop names
    pub fn color_slots(&self) -> Vec<(&'static str, &str)> {
        [
            ("backgroundColor", self.background_color.as_deref()),
            ("gradientFrom", self.gradient_from.as_deref()),
            ("gradientTo", self.gradient_to.as_deref()),
            ("overlayColor", self.overlay_color.as_deref()),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlexDirection {
    Row,
    #[default]
    Column,
}

/// Alignment along either flex axis. Editor vocabulary (top/left/middle/…)
/// is accepted as aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[serde(alias = "top", alias = "left", alias = "flex-start")]
    Start,
    #[serde(alias = "middle")]
    Center,
    #[serde(alias = "bottom", alias = "right", alias = "flex-end")]
    End,
    Stretch,
    #[serde(alias = "space-between")]
    Between,
}

/// Layout bag accepted by every container-capable component
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutBag {
    #[serde(deserialize_with = "lenient")]
    pub direction: FlexDirection,
    #[serde(deserialize_with = "lenient")]
    pub vertical_align: Option<Alignment>,
    #[serde(deserialize_with = "lenient")]
    pub horizontal_align: Option<Alignment>,
    #[serde(deserialize_with = "string_like")]
    pub gap: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub wrap: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
    Justify,
}

impl TextAlign {
    pub fn as_css(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
            TextAlign::Justify => "justify",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_style_bag_collects_extra_keys() {
        let bag: StyleBag = serde_json::from_value(json!({
            "backgroundType": "gradient",
            "gradientFrom": "#000000",
            "padding": "2rem",
            "borderRadius": 8
        }))
        .unwrap();
        assert_eq!(bag.background_type, BackgroundType::Gradient);
        assert_eq!(bag.gradient_from.as_deref(), Some("#000000"));
        assert!(bag.extra.contains_key("padding"));
        assert!(bag.extra.contains_key("borderRadius"));
        assert!(!bag.extra.contains_key("gradientFrom"));
    }

    #[test]
    fn test_unknown_background_type_falls_back_to_solid() {
        let bag: StyleBag = serde_json::from_value(json!({"backgroundType": "video"})).unwrap();
        assert_eq!(bag.background_type, BackgroundType::Solid);
    }

    #[test]
    fn test_alignment_aliases() {
        let layout: LayoutBag = serde_json::from_value(json!({
            "verticalAlign": "top",
            "horizontalAlign": "space-between"
        }))
        .unwrap();
        assert_eq!(layout.vertical_align, Some(Alignment::Start));
        assert_eq!(layout.horizontal_align, Some(Alignment::Between));
    }
}
