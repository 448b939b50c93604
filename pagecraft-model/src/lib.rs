//! # pagecraft page model
//!
//! Typed representation of a landing page as the editor stores it: a flat list
//! of components with parent pointers, global brand styles, head metadata and
//! the cookie banner.
//!
//! ## Features
//! - Lenient JSON/YAML decoding (half-edited documents still decode)
//! - A closed tagged union of component props ([`ComponentProps`])
//! - Style and layout bags shared by all container components
//! - Non-fatal structural validation ([`validator::validate_document`])
//!
//! ## Example
//! ```ignore
//! use pagecraft_model::PageDocument;
//!
//! let doc = PageDocument::from_json(r#"{
//!   "meta": { "title": "Spring sale" },
//!   "components": [
//!     { "id": "t", "type": "Title", "parentId": null, "props": { "text": "Hi" } }
//!   ]
//! }"#)?;
//! let props = doc.components[0].typed_props()?;
//! ```

pub mod action;
pub mod campaign;
pub mod component;
mod de;
pub mod document;
pub mod error;
pub mod meta;
pub mod page_style;
pub mod props;
pub mod style;
pub mod validator;

pub use action::Action;
pub use campaign::{CampaignGroup, CampaignOption, UploadTarget};
pub use component::{Component, DEFAULT_AB_WEIGHT};
pub use de::value_to_string;
pub use document::PageDocument;
pub use error::{ModelError, ModelResult};
pub use meta::{BannerPosition, CookieBanner, PageMeta, Tracking, TrackingPixel};
pub use page_style::PageStyles;
pub use props::{ComponentProps, FieldCondition, FieldType, FormField, COMPONENT_TYPES};
pub use style::{Alignment, BackgroundType, FlexDirection, LayoutBag, StyleBag, TextAlign};
pub use validator::{validate_document, IssueKind, ModelIssue};

/// Decode a page document from JSON
pub fn parse_document(json: &str) -> ModelResult<PageDocument> {
    PageDocument::from_json(json)
}

/// Decode a page document from YAML
pub fn parse_document_yaml(yaml: &str) -> ModelResult<PageDocument> {
    PageDocument::from_yaml(yaml)
}
