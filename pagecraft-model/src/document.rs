use crate::component::Component;
use crate::error::ModelResult;
use crate::meta::{CookieBanner, PageMeta};
use crate::page_style::PageStyles;
use serde::{Deserialize, Serialize};

/// A landing page as produced by the editor: global styles, head metadata,
/// the cookie banner and a flat list of parent-pointer components.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageDocument {
    pub styles: PageStyles,
    pub meta: PageMeta,
    pub cookie_banner: CookieBanner,
    pub components: Vec<Component>,
}

impl PageDocument {
    pub fn from_json(json: &str) -> ModelResult<Self> {
        let doc: PageDocument = serde_json::from_str(json)?;
        tracing::debug!(components = doc.components.len(), "decoded page document (json)");
        Ok(doc)
    }

    pub fn from_yaml(yaml: &str) -> ModelResult<Self> {
        let doc: PageDocument = serde_yaml::from_str(yaml)?;
        tracing::debug!(components = doc.components.len(), "decoded page document (yaml)");
        Ok(doc)
    }

    pub fn with_components(components: Vec<Component>) -> Self {
        Self {
            components,
            ..Self::default()
        }
    }

    /// First component carrying `id`
    pub fn component(&self, id: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }
}
