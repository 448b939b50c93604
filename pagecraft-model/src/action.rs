use crate::de::string_like;
use serde::{Deserialize, Serialize};

/// Where a clickable component sends the visitor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Action {
    #[serde(rename = "URL")]
    Url {
        #[serde(default, deserialize_with = "string_like")]
        url: Option<String>,
        #[serde(default, rename = "newTab")]
        new_tab: bool,
    },
    #[serde(rename = "PAGE")]
    Page {
        #[serde(default, rename = "pageId", deserialize_with = "string_like")]
        page_id: Option<String>,
    },
    /// No action, or an action of an unrecognised shape
    #[default]
    #[serde(other)]
    None,
}

impl Action {
    pub fn is_none(&self) -> bool {
        matches!(self, Action::None)
    }

    pub fn opens_new_tab(&self) -> bool {
        matches!(self, Action::Url { new_tab: true, .. })
    }
}
