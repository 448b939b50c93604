use crate::de::{lenient, string_like, string_or_empty};
use serde::{Deserialize, Serialize};

/// Destination of an upload widget: a data extension, an FTP drop, or both
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadTarget {
    #[serde(deserialize_with = "string_like")]
    pub data_extension_key: Option<String>,
    #[serde(deserialize_with = "string_like")]
    pub ftp_path: Option<String>,
    /// Filename template; `%%Date%%` is replaced in the browser at request time
    #[serde(deserialize_with = "string_like")]
    pub filename_template: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub columns: Vec<String>,
}

impl UploadTarget {
    pub fn has_data_extension(&self) -> bool {
        self.data_extension_key.is_some()
    }

    pub fn has_ftp_path(&self) -> bool {
        self.ftp_path.is_some()
    }
}

/// One selectable destination inside a campaign group
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CampaignOption {
    #[serde(deserialize_with = "string_or_empty")]
    pub label: String,
    #[serde(deserialize_with = "lenient")]
    pub target: UploadTarget,
}

/// Named group of campaign options, rendered as an `<optgroup>`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CampaignGroup {
    #[serde(deserialize_with = "string_or_empty")]
    pub name: String,
    #[serde(deserialize_with = "lenient")]
    pub options: Vec<CampaignOption>,
}
