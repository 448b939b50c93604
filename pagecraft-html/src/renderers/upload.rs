//! Data extension and FTP upload widgets.
//!
//! Both share one multi-step markup shape (choose a destination, choose a
//! file, send) and one runtime; they differ in which destinations qualify
//! and in the request the runtime sends to the relay.

use super::{root_attrs, ComponentRenderer, Fragment};
use crate::context::{Children, NodeContext, PageContext};
use crate::diagnostics::DiagnosticKind;
use crate::escape;
use crate::scripts::{self, SharedScript};
use pagecraft_model::props::{DataExtensionUpload, FtpUpload};
use pagecraft_model::{CampaignGroup, UploadTarget};
use serde::Serialize;

const MSG_TARGET: &str = "Choose a destination first.";
const MSG_FILE: &str = "Choose a file to upload.";
const MSG_PROGRESS: &str = "Uploading...";
const MSG_FAILURE: &str = "Upload failed.";

/// One selectable destination, already filtered for the widget kind
struct Destination<'a> {
    group: Option<&'a str>,
    label: String,
    target: &'a UploadTarget,
}

/// Destinations in select order. Campaign groups win over a fixed target.
fn destinations<'a>(
    groups: &'a [CampaignGroup],
    fixed: Option<&'a UploadTarget>,
    usable: impl Fn(&UploadTarget) -> bool,
    fallback_label: impl Fn(&UploadTarget) -> String,
) -> Vec<Destination<'a>> {
    let from_groups: Vec<Destination<'a>> = groups
        .iter()
        .flat_map(|group| {
            group.options.iter().map(move |option| (group, option))
        })
        .filter(|(_, option)| usable(&option.target))
        .map(|(group, option)| Destination {
            group: Some(group.name.as_str()),
            label: if option.label.trim().is_empty() {
                fallback_label(&option.target)
            } else {
                option.label.clone()
            },
            target: &option.target,
        })
        .collect();
    if !from_groups.is_empty() {
        return from_groups;
    }
    fixed
        .filter(|target| usable(*target))
        .map(|target| Destination {
            group: None,
            label: fallback_label(target),
            target,
        })
        .into_iter()
        .collect()
}

/// The campaign select, grouped by campaign. A single fixed destination
/// needs no select.
fn target_select(cx: &NodeContext, destinations: &[Destination]) -> String {
    if destinations.iter().all(|d| d.group.is_none()) {
        return String::new();
    }
    let select_id = cx.child_id("target");
    let mut out = format!(
        "<label for=\"{0}\">Campaign</label><select id=\"{0}\" class=\"pc-upload-target\"><option value=\"\">Choose a campaign...</option>",
        select_id
    );
    let mut open_group: Option<&str> = None;
    for (index, destination) in destinations.iter().enumerate() {
        if destination.group != open_group {
            if open_group.is_some() {
                out.push_str("</optgroup>");
            }
            if let Some(name) = destination.group {
                out.push_str(&format!("<optgroup label=\"{}\">", escape::attr(name)));
            }
            open_group = destination.group;
        }
        out.push_str(&format!(
            "<option value=\"{}\">{}</option>",
            index,
            escape::html(&destination.label)
        ));
    }
    if open_group.is_some() {
        out.push_str("</optgroup>");
    }
    out.push_str("</select>");
    out
}

struct WidgetText<'a> {
    class: &'a str,
    title: Option<&'a str>,
    description: Option<&'a str>,
    accept: &'a str,
    button_label: &'a str,
    success_message: &'a str,
}

fn widget_markup(cx: &NodeContext, text: &WidgetText, destinations: &[Destination]) -> String {
    let mut html = format!(
        "<div {} data-step=\"1\" data-msg-target=\"{}\" data-msg-file=\"{}\" data-msg-progress=\"{}\" data-msg-success=\"{}\" data-msg-failure=\"{}\">",
        root_attrs(cx, text.class),
        escape::attr(MSG_TARGET),
        escape::attr(MSG_FILE),
        escape::attr(MSG_PROGRESS),
        escape::attr(text.success_message),
        escape::attr(MSG_FAILURE)
    );
    if let Some(title) = text.title {
        html.push_str(&format!("<h3 class=\"pc-upload-title\">{}</h3>", escape::html(title)));
    }
    if let Some(description) = text.description {
        html.push_str(&format!(
            "<p class=\"pc-upload-description\">{}</p>",
            escape::text_with_breaks(description)
        ));
    }
    html.push_str(&target_select(cx, destinations));
    html.push_str(&format!(
        "<input type=\"file\" id=\"{}\" class=\"pc-upload-file\" accept=\"{}\">",
        cx.child_id("file"),
        escape::attr(text.accept)
    ));
    html.push_str(&format!(
        "<button type=\"button\" class=\"pc-button pc-button-primary pc-upload-submit\">{}</button>",
        escape::html(text.button_label)
    ));
    html.push_str("<p class=\"pc-upload-status\" role=\"status\" aria-live=\"polite\"></p></div>");
    html
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeTarget<'a> {
    data_extension_key: &'a str,
    columns: &'a [String],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeUploadConfig<'a> {
    el: &'a str,
    endpoint: &'a str,
    brand_id: &'a str,
    retries: u32,
    timeout_ms: u64,
    delimiter: &'a str,
    targets: Vec<DeTarget<'a>>,
}

fn delimiter(raw: &str) -> &str {
    match raw {
        "\\t" | "tab" | "\t" => "\t",
        "" => ",",
        other => other.char_indices().nth(1).map(|(i, _)| &other[..i]).unwrap_or(other),
    }
}

impl ComponentRenderer for DataExtensionUpload {
    fn render(&self, cx: &NodeContext, _children: &Children, page: &PageContext) -> Fragment {
        let destinations = destinations(
            &self.campaign_groups,
            self.target.as_ref(),
            UploadTarget::has_data_extension,
            |t| t.data_extension_key.clone().unwrap_or_default(),
        );
        if destinations.is_empty() {
            return Fragment::warning(
                cx,
                page,
                DiagnosticKind::MissingRequired,
                "data extension upload needs a campaign option or target with a dataExtensionKey",
            );
        }

        let mut html = widget_markup(
            cx,
            &WidgetText {
                class: "pc-upload pc-de-upload",
                title: self.title.as_deref(),
                description: self.description.as_deref(),
                accept: &self.accept,
                button_label: &self.button_label,
                success_message: &self.success_message,
            },
            &destinations,
        );
        let options = page.options;
        html.push_str(&scripts::enqueue(
            "deUpload",
            &DeUploadConfig {
                el: &cx.dom_id,
                endpoint: &options.upload_endpoint,
                brand_id: page.brand_id(),
                retries: options.upload_retries,
                timeout_ms: options.upload_timeout_ms,
                delimiter: delimiter(&self.delimiter),
                targets: destinations
                    .iter()
                    .map(|d| DeTarget {
                        data_extension_key: d.target.data_extension_key.as_deref().unwrap_or(""),
                        columns: &d.target.columns,
                    })
                    .collect(),
            },
        ));
        Fragment::flow(html).require(SharedScript::Upload)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FtpTarget<'a> {
    ftp_path: &'a str,
    filename_template: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FtpUploadConfig<'a> {
    el: &'a str,
    endpoint: &'a str,
    brand_id: &'a str,
    retries: u32,
    timeout_ms: u64,
    max_size_mb: u32,
    targets: Vec<FtpTarget<'a>>,
}

impl ComponentRenderer for FtpUpload {
    fn render(&self, cx: &NodeContext, _children: &Children, page: &PageContext) -> Fragment {
        let destinations = destinations(
            &self.campaign_groups,
            self.target.as_ref(),
            UploadTarget::has_ftp_path,
            |t| t.ftp_path.clone().unwrap_or_default(),
        );
        if destinations.is_empty() {
            return Fragment::warning(
                cx,
                page,
                DiagnosticKind::MissingRequired,
                "FTP upload needs a campaign option or target with an ftpPath",
            );
        }

        let mut html = widget_markup(
            cx,
            &WidgetText {
                class: "pc-upload pc-ftp-upload",
                title: self.title.as_deref(),
                description: self.description.as_deref(),
                accept: &self.accept,
                button_label: &self.button_label,
                success_message: &self.success_message,
            },
            &destinations,
        );
        let options = page.options;
        html.push_str(&scripts::enqueue(
            "ftpUpload",
            &FtpUploadConfig {
                el: &cx.dom_id,
                endpoint: &options.ftp_endpoint,
                brand_id: page.brand_id(),
                retries: options.upload_retries,
                timeout_ms: options.upload_timeout_ms,
                max_size_mb: self.max_size_mb,
                targets: destinations
                    .iter()
                    .map(|d| FtpTarget {
                        ftp_path: d.target.ftp_path.as_deref().unwrap_or(""),
                        filename_template: d.target.filename_template.as_deref(),
                    })
                    .collect(),
            },
        ));
        Fragment::flow(html).require(SharedScript::Upload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::CompileOptions;
    use pagecraft_model::{Component, PageDocument};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn render<R: ComponentRenderer>(props: &R) -> Fragment {
        let doc = PageDocument::default();
        let options = CompileOptions::default().with_brand("acme");
        let page = PageContext::new(&doc, &options);
        let component = Component::new("up", "DataExtensionUpload");
        let cx = NodeContext::new(&component, "pc-up");
        props.render(&cx, &Children::default(), &page)
    }

    fn campaigns() -> serde_json::Value {
        json!([
            {"name": "Spring", "options": [
                {"label": "Leads", "target": {"dataExtensionKey": "DE_Leads", "columns": ["Email"]}},
                {"label": "Drop", "target": {"ftpPath": "/import/spring", "filenameTemplate": "spring_%%Date%%.csv"}}
            ]},
            {"name": "Summer", "options": [
                {"label": "", "target": {"dataExtensionKey": "DE_Summer", "ftpPath": "/import/summer"}}
            ]}
        ])
    }

    #[test]
    fn test_de_upload_lists_only_data_extension_targets() {
        let upload: DataExtensionUpload = serde_json::from_value(json!({"campaignGroups": campaigns()})).unwrap();
        let fragment = render(&upload);
        let html = &fragment.html;
        assert!(html.contains("<optgroup label=\"Spring\"><option value=\"0\">Leads</option></optgroup>"));
        assert!(html.contains("<optgroup label=\"Summer\"><option value=\"1\">DE_Summer</option></optgroup>"));
        assert!(!html.contains(">Drop<"));
        assert!(html.contains("\"endpoint\":\"/api/upload/data-extension\",\"brandId\":\"acme\",\"retries\":2,\"timeoutMs\":30000"));
        assert!(html.contains("{\"dataExtensionKey\":\"DE_Leads\",\"columns\":[\"Email\"]}"));
        assert_eq!(fragment.requires, vec![SharedScript::Upload]);
    }

    #[test]
    fn test_ftp_template_reaches_the_runtime_escaped() {
        let upload: FtpUpload = serde_json::from_value(json!({"campaignGroups": campaigns()})).unwrap();
        let html = render(&upload).html;
        assert!(html.contains("\"ftpPath\":\"/import/spring\",\"filenameTemplate\":\"spring_\\u0025\\u0025Date\\u0025\\u0025.csv\""));
        assert!(html.contains("\"endpoint\":\"/api/upload/ftp\""));
        assert!(!html.contains("%%Date%%"));
    }

    #[test]
    fn test_fixed_target_has_no_select() {
        let upload: DataExtensionUpload =
            serde_json::from_value(json!({"target": {"dataExtensionKey": "DE_Fixed"}})).unwrap();
        let html = render(&upload).html;
        assert!(!html.contains("<select"));
        assert!(html.contains("\"targets\":[{\"dataExtensionKey\":\"DE_Fixed\",\"columns\":[]}]"));
    }

    #[test]
    fn test_no_destination_warns() {
        let upload: FtpUpload =
            serde_json::from_value(json!({"target": {"dataExtensionKey": "DE_Only"}})).unwrap();
        let fragment = render(&upload);
        assert!(fragment.html.contains("pc-warning"));
        assert_eq!(fragment.diagnostics[0].kind, DiagnosticKind::MissingRequired);
    }

    #[test]
    fn test_delimiter() {
        assert_eq!(delimiter(";"), ";");
        assert_eq!(delimiter("tab"), "\t");
        assert_eq!(delimiter(""), ",");
        assert_eq!(delimiter("||"), "|");
    }
}
