use pagecraft_model::DEFAULT_AB_WEIGHT;
use serde::{Deserialize, Serialize};

pub const DEFAULT_UPLOAD_ENDPOINT: &str = "/api/upload/data-extension";
pub const DEFAULT_FTP_ENDPOINT: &str = "/api/upload/ftp";

/// Host-supplied compile settings. Everything is optional; the defaults
/// produce a preview build against the standard relay endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompileOptions {
    /// Brand the upload relays authenticate against
    pub brand_id: Option<String>,
    /// Page id, used to namespace A/B assignments in session storage
    pub page_id: Option<String>,
    /// Preview builds show warnings as visible blocks; publish builds hide
    /// them in HTML comments
    pub preview: bool,
    pub upload_endpoint: String,
    pub ftp_endpoint: String,
    pub upload_retries: u32,
    pub upload_timeout_ms: u64,
    /// Percentage of visitors shown variant "B" when a component sets none
    pub default_ab_weight: f64,
    /// Strip indentation and blank lines from shared scripts and styles
    pub minify: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            brand_id: None,
            page_id: None,
            preview: true,
            upload_endpoint: DEFAULT_UPLOAD_ENDPOINT.to_string(),
            ftp_endpoint: DEFAULT_FTP_ENDPOINT.to_string(),
            upload_retries: 2,
            upload_timeout_ms: 30_000,
            default_ab_weight: DEFAULT_AB_WEIGHT,
            minify: false,
        }
    }
}

impl CompileOptions {
    /// Publish build: warnings stay out of the visible page
    pub fn publish() -> Self {
        Self {
            preview: false,
            minify: true,
            ..Self::default()
        }
    }

    pub fn with_brand(mut self, brand_id: impl Into<String>) -> Self {
        self.brand_id = Some(brand_id.into());
        self
    }

    pub fn with_page(mut self, page_id: impl Into<String>) -> Self {
        self.page_id = Some(page_id.into());
        self
    }
}
