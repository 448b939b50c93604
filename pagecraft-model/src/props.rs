use crate::action::Action;
use crate::campaign::{CampaignGroup, UploadTarget};
use crate::de::{lenient, string_like, string_or_empty};
use crate::style::{LayoutBag, StyleBag, TextAlign};
use serde::{Deserialize, Serialize};

/// Typed props of a component, tagged by component type.
///
/// Serialized adjacently (`{"type": "Title", "props": {...}}`) so the raw
/// `(type, props)` pair of a [`crate::Component`] lifts directly into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "props")]
pub enum ComponentProps {
    // structural
    Header(Header),
    Footer(Footer),
    Div(Div),
    Columns(Columns),
    PopUp(PopUp),
    // content
    Title(Title),
    Subtitle(Subtitle),
    Paragraph(Paragraph),
    Image(Image),
    Video(Video),
    Map(Map),
    Button(Button),
    Divider(Divider),
    Spacer(Spacer),
    SocialLinks(SocialLinks),
    FileDownload(FileDownload),
    // interactive
    Form(Form),
    Accordion(Accordion),
    Tabs(Tabs),
    Voting(Voting),
    #[serde(rename = "NPS")]
    Nps(Nps),
    Calendly(Calendly),
    #[serde(alias = "Calendar")]
    AddToCalendar(AddToCalendar),
    DataExtensionUpload(DataExtensionUpload),
    #[serde(rename = "FTPUpload")]
    FtpUpload(FtpUpload),
    FloatingButton(FloatingButton),
    Countdown(Countdown),
}

/// Every type tag the compiler knows, including aliases
pub const COMPONENT_TYPES: &[&str] = &[
    "Header",
    "Footer",
    "Div",
    "Columns",
    "PopUp",
    "Title",
    "Subtitle",
    "Paragraph",
    "Image",
    "Video",
    "Map",
    "Button",
    "Divider",
    "Spacer",
    "SocialLinks",
    "FileDownload",
    "Form",
    "Accordion",
    "Tabs",
    "Voting",
    "NPS",
    "Calendly",
    "AddToCalendar",
    "Calendar",
    "DataExtensionUpload",
    "FTPUpload",
    "FloatingButton",
    "Countdown",
];

impl ComponentProps {
    /// Whether `tag` names a known component type
    pub fn is_known_type(tag: &str) -> bool {
        COMPONENT_TYPES.contains(&tag)
    }

    /// Canonical type tag
    pub fn type_name(&self) -> &'static str {
        match self {
            ComponentProps::Header(_) => "Header",
            ComponentProps::Footer(_) => "Footer",
            ComponentProps::Div(_) => "Div",
            ComponentProps::Columns(_) => "Columns",
            ComponentProps::PopUp(_) => "PopUp",
            ComponentProps::Title(_) => "Title",
            ComponentProps::Subtitle(_) => "Subtitle",
            ComponentProps::Paragraph(_) => "Paragraph",
            ComponentProps::Image(_) => "Image",
            ComponentProps::Video(_) => "Video",
            ComponentProps::Map(_) => "Map",
            ComponentProps::Button(_) => "Button",
            ComponentProps::Divider(_) => "Divider",
            ComponentProps::Spacer(_) => "Spacer",
            ComponentProps::SocialLinks(_) => "SocialLinks",
            ComponentProps::FileDownload(_) => "FileDownload",
            ComponentProps::Form(_) => "Form",
            ComponentProps::Accordion(_) => "Accordion",
            ComponentProps::Tabs(_) => "Tabs",
            ComponentProps::Voting(_) => "Voting",
            ComponentProps::Nps(_) => "NPS",
            ComponentProps::Calendly(_) => "Calendly",
            ComponentProps::AddToCalendar(_) => "AddToCalendar",
            ComponentProps::DataExtensionUpload(_) => "DataExtensionUpload",
            ComponentProps::FtpUpload(_) => "FTPUpload",
            ComponentProps::FloatingButton(_) => "FloatingButton",
            ComponentProps::Countdown(_) => "Countdown",
        }
    }

    /// Whether the component nests children
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            ComponentProps::Header(_)
                | ComponentProps::Footer(_)
                | ComponentProps::Div(_)
                | ComponentProps::Columns(_)
                | ComponentProps::PopUp(_)
        )
    }

    /// Form field configs, for forms only
    pub fn form_fields(&self) -> Option<&[FormField]> {
        match self {
            ComponentProps::Form(form) => Some(&form.fields),
            _ => None,
        }
    }
}

// ─── Structural ──────────────────────────────────────────────────────────────

/// Navigation link shown in headers and footers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavLink {
    #[serde(deserialize_with = "string_or_empty")]
    pub label: String,
    #[serde(deserialize_with = "lenient")]
    pub action: Action,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Header {
    #[serde(deserialize_with = "string_like")]
    pub logo_url: Option<String>,
    #[serde(deserialize_with = "string_like")]
    pub logo_alt: Option<String>,
    #[serde(deserialize_with = "string_like")]
    pub logo_width: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub logo_action: Action,
    #[serde(deserialize_with = "lenient")]
    pub links: Vec<NavLink>,
    #[serde(deserialize_with = "lenient")]
    pub sticky: bool,
    #[serde(deserialize_with = "lenient")]
    pub styles: StyleBag,
    #[serde(deserialize_with = "lenient")]
    pub layout: LayoutBag,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Footer {
    #[serde(deserialize_with = "string_like")]
    pub text: Option<String>,
    #[serde(deserialize_with = "string_like")]
    pub copyright: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub links: Vec<NavLink>,
    #[serde(deserialize_with = "lenient")]
    pub styles: StyleBag,
    #[serde(deserialize_with = "lenient")]
    pub layout: LayoutBag,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Div {
    /// Optional anchor name for in-page links
    #[serde(deserialize_with = "string_like")]
    pub anchor: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub styles: StyleBag,
    #[serde(deserialize_with = "lenient")]
    pub layout: LayoutBag,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Columns {
    #[serde(deserialize_with = "lenient")]
    pub count: u8,
    /// Per-column widths (CSS lengths or fractions); missing entries share the rest
    #[serde(deserialize_with = "lenient")]
    pub widths: Vec<String>,
    #[serde(deserialize_with = "lenient")]
    pub stack_on_mobile: bool,
    #[serde(deserialize_with = "lenient")]
    pub styles: StyleBag,
    #[serde(deserialize_with = "lenient")]
    pub layout: LayoutBag,
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            count: 2,
            widths: Vec::new(),
            stack_on_mobile: true,
            styles: StyleBag::default(),
            layout: LayoutBag::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PopUpTrigger {
    #[default]
    OnLoad,
    Delay,
    ExitIntent,
    Scroll,
    Click,
}

impl PopUpTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            PopUpTrigger::OnLoad => "onLoad",
            PopUpTrigger::Delay => "delay",
            PopUpTrigger::ExitIntent => "exitIntent",
            PopUpTrigger::Scroll => "scroll",
            PopUpTrigger::Click => "click",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PopUp {
    #[serde(deserialize_with = "lenient")]
    pub trigger: PopUpTrigger,
    #[serde(deserialize_with = "lenient")]
    pub delay_seconds: u32,
    #[serde(deserialize_with = "lenient")]
    pub scroll_percent: u8,
    /// Label of the button that opens a click-triggered popup
    #[serde(deserialize_with = "string_like")]
    pub trigger_label: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub show_once: bool,
    #[serde(deserialize_with = "string_like")]
    pub width: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub styles: StyleBag,
    #[serde(deserialize_with = "lenient")]
    pub layout: LayoutBag,
}

impl Default for PopUp {
    fn default() -> Self {
        Self {
            trigger: PopUpTrigger::OnLoad,
            delay_seconds: 3,
            scroll_percent: 50,
            trigger_label: None,
            show_once: true,
            width: None,
            styles: StyleBag::default(),
            layout: LayoutBag::default(),
        }
    }
}

// ─── Content ─────────────────────────────────────────────────────────────────

/// Typography shared by the text-bearing components
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextStyle {
    #[serde(deserialize_with = "lenient")]
    pub align: TextAlign,
    #[serde(deserialize_with = "string_like")]
    pub color: Option<String>,
    #[serde(deserialize_with = "string_like")]
    pub font_size: Option<String>,
    #[serde(deserialize_with = "string_like")]
    pub font_weight: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Title {
    #[serde(deserialize_with = "string_or_empty")]
    pub text: String,
    #[serde(deserialize_with = "lenient")]
    pub level: u8,
    #[serde(deserialize_with = "string_like")]
    pub data_binding: Option<String>,
    #[serde(flatten)]
    pub text_style: TextStyle,
}

impl Default for Title {
    fn default() -> Self {
        Self {
            text: String::new(),
            level: 1,
            data_binding: None,
            text_style: TextStyle::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Subtitle {
    #[serde(deserialize_with = "string_or_empty")]
    pub text: String,
    #[serde(deserialize_with = "string_like")]
    pub data_binding: Option<String>,
    #[serde(flatten)]
    pub text_style: TextStyle,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Paragraph {
    #[serde(deserialize_with = "string_or_empty")]
    pub text: String,
    #[serde(deserialize_with = "string_like")]
    pub data_binding: Option<String>,
    #[serde(flatten)]
    pub text_style: TextStyle,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Image {
    #[serde(deserialize_with = "string_like")]
    pub src: Option<String>,
    #[serde(deserialize_with = "string_like")]
    pub alt: Option<String>,
    #[serde(deserialize_with = "string_like")]
    pub width: Option<String>,
    #[serde(deserialize_with = "string_like")]
    pub border_radius: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub align: TextAlign,
    #[serde(deserialize_with = "lenient")]
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Video {
    #[serde(deserialize_with = "string_like")]
    pub url: Option<String>,
    #[serde(deserialize_with = "string_like")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub autoplay: bool,
    #[serde(deserialize_with = "lenient")]
    pub muted: bool,
    #[serde(deserialize_with = "lenient")]
    pub controls: bool,
    pub aspect_ratio: String,
}

impl Default for Video {
    fn default() -> Self {
        Self {
            url: None,
            title: None,
            autoplay: false,
            muted: false,
            controls: true,
            aspect_ratio: "16/9".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Map {
    #[serde(deserialize_with = "string_like")]
    pub address: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub zoom: u8,
    pub height: String,
    #[serde(deserialize_with = "string_like")]
    pub title: Option<String>,
}

impl Default for Map {
    fn default() -> Self {
        Self {
            address: None,
            zoom: 14,
            height: "320px".to_string(),
            title: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonVariant {
    #[default]
    Primary,
    Secondary,
    Outline,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Button {
    #[serde(deserialize_with = "string_or_empty")]
    pub label: String,
    #[serde(deserialize_with = "lenient")]
    pub action: Action,
    #[serde(deserialize_with = "lenient")]
    pub variant: ButtonVariant,
    #[serde(deserialize_with = "lenient")]
    pub align: TextAlign,
    #[serde(deserialize_with = "lenient")]
    pub full_width: bool,
    #[serde(deserialize_with = "string_like")]
    pub color: Option<String>,
    #[serde(deserialize_with = "string_like")]
    pub text_color: Option<String>,
    #[serde(deserialize_with = "string_like")]
    pub data_binding: Option<String>,
}

impl Default for Button {
    fn default() -> Self {
        Self {
            label: "Click here".to_string(),
            action: Action::None,
            variant: ButtonVariant::Primary,
            align: TextAlign::Center,
            full_width: false,
            color: None,
            text_color: None,
            data_binding: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Divider {
    #[serde(deserialize_with = "string_like")]
    pub color: Option<String>,
    pub thickness: String,
    pub line_style: String,
    pub margin: String,
}

impl Default for Divider {
    fn default() -> Self {
        Self {
            color: None,
            thickness: "1px".to_string(),
            line_style: "solid".to_string(),
            margin: "1.5rem 0".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Spacer {
    pub height: String,
}

impl Default for Spacer {
    fn default() -> Self {
        Self {
            height: "32px".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialLink {
    #[serde(deserialize_with = "string_or_empty")]
    pub network: String,
    #[serde(deserialize_with = "string_like")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialLinks {
    #[serde(deserialize_with = "lenient")]
    pub links: Vec<SocialLink>,
    #[serde(deserialize_with = "lenient")]
    pub align: TextAlign,
    #[serde(deserialize_with = "string_like")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileDownload {
    #[serde(deserialize_with = "string_like")]
    pub file_url: Option<String>,
    #[serde(deserialize_with = "string_like")]
    pub file_name: Option<String>,
    #[serde(deserialize_with = "string_like")]
    pub description: Option<String>,
    pub label: String,
    #[serde(deserialize_with = "lenient")]
    pub align: TextAlign,
}

impl Default for FileDownload {
    fn default() -> Self {
        Self {
            file_url: None,
            file_name: None,
            description: None,
            label: "Download".to_string(),
            align: TextAlign::Center,
        }
    }
}

// ─── Forms ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Text,
    Email,
    #[serde(alias = "tel")]
    Phone,
    Number,
    Textarea,
    Select,
    Radio,
    Checkbox,
    Date,
    Hidden,
}

/// Select/radio option: either a bare string or a `{label, value}` pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldOption {
    Plain(String),
    Labeled { label: String, value: String },
}

impl FieldOption {
    pub fn label(&self) -> &str {
        match self {
            FieldOption::Plain(s) => s,
            FieldOption::Labeled { label, .. } => label,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            FieldOption::Plain(s) => s,
            FieldOption::Labeled { value, .. } => value,
        }
    }
}

/// Show this field only when `field` currently has `value`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldCondition {
    #[serde(deserialize_with = "string_or_empty")]
    pub field: String,
    #[serde(deserialize_with = "string_or_empty")]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormField {
    #[serde(deserialize_with = "string_or_empty")]
    pub id: String,
    #[serde(deserialize_with = "string_or_empty")]
    pub label: String,
    /// Submission key; defaults to the field id
    #[serde(deserialize_with = "string_like")]
    pub name: Option<String>,
    #[serde(alias = "type", deserialize_with = "lenient")]
    pub field_type: FieldType,
    #[serde(deserialize_with = "string_like")]
    pub placeholder: Option<String>,
    #[serde(deserialize_with = "string_like")]
    pub default_value: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub required: bool,
    #[serde(deserialize_with = "lenient")]
    pub options: Vec<FieldOption>,
    #[serde(deserialize_with = "lenient")]
    pub enabled: bool,
    #[serde(deserialize_with = "lenient")]
    pub conditional: Option<FieldCondition>,
}

impl Default for FormField {
    fn default() -> Self {
        Self {
            id: String::new(),
            label: String::new(),
            name: None,
            field_type: FieldType::Text,
            placeholder: None,
            default_value: None,
            required: false,
            options: Vec::new(),
            enabled: true,
            conditional: None,
        }
    }
}

impl FormField {
    pub fn submit_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// The declared conditional, ignoring blank dependency ids
    pub fn condition(&self) -> Option<&FieldCondition> {
        self.conditional.as_ref().filter(|c| !c.field.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Form {
    #[serde(deserialize_with = "string_like")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub fields: Vec<FormField>,
    pub submit_label: String,
    #[serde(deserialize_with = "string_like")]
    pub success_message: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub redirect: Action,
    /// Overrides the page's default data extension
    #[serde(deserialize_with = "string_like")]
    pub data_extension_key: Option<String>,
    #[serde(deserialize_with = "string_like")]
    pub button_color: Option<String>,
}

impl Default for Form {
    fn default() -> Self {
        Self {
            title: None,
            fields: Vec::new(),
            submit_label: "Submit".to_string(),
            success_message: None,
            redirect: Action::None,
            data_extension_key: None,
            button_color: None,
        }
    }
}

// ─── Interactive ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccordionItem {
    #[serde(deserialize_with = "string_or_empty")]
    pub title: String,
    #[serde(deserialize_with = "string_or_empty")]
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Accordion {
    #[serde(deserialize_with = "lenient")]
    pub items: Vec<AccordionItem>,
    #[serde(deserialize_with = "lenient")]
    pub allow_multiple: bool,
    #[serde(deserialize_with = "lenient")]
    pub open_first: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TabItem {
    #[serde(deserialize_with = "string_or_empty")]
    pub label: String,
    #[serde(deserialize_with = "string_or_empty")]
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Tabs {
    #[serde(deserialize_with = "lenient")]
    pub tabs: Vec<TabItem>,
    #[serde(deserialize_with = "lenient")]
    pub default_tab: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Voting {
    #[serde(deserialize_with = "string_like")]
    pub question: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub options: Vec<String>,
    #[serde(deserialize_with = "string_like")]
    pub data_extension_key: Option<String>,
    pub thank_you_message: String,
}

impl Default for Voting {
    fn default() -> Self {
        Self {
            question: None,
            options: Vec::new(),
            data_extension_key: None,
            thank_you_message: "Thanks for voting!".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Nps {
    pub question: String,
    pub low_label: String,
    pub high_label: String,
    #[serde(deserialize_with = "string_like")]
    pub data_extension_key: Option<String>,
    pub thank_you_message: String,
}

impl Default for Nps {
    fn default() -> Self {
        Self {
            question: "How likely are you to recommend us to a friend?".to_string(),
            low_label: "Not likely".to_string(),
            high_label: "Very likely".to_string(),
            data_extension_key: None,
            thank_you_message: "Thank you for your feedback!".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Calendly {
    #[serde(deserialize_with = "string_like")]
    pub url: Option<String>,
    pub height: String,
    #[serde(deserialize_with = "lenient")]
    pub hide_details: bool,
}

impl Default for Calendly {
    fn default() -> Self {
        Self {
            url: None,
            height: "700px".to_string(),
            hide_details: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarProvider {
    Google,
    Outlook,
    #[serde(alias = "ics")]
    Apple,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddToCalendar {
    #[serde(deserialize_with = "string_like")]
    pub title: Option<String>,
    #[serde(deserialize_with = "string_like")]
    pub description: Option<String>,
    #[serde(deserialize_with = "string_like")]
    pub location: Option<String>,
    /// ISO-8601 local date-time, e.g. `2025-05-01T10:00`
    #[serde(alias = "startDate", deserialize_with = "string_like")]
    pub start_time: Option<String>,
    #[serde(alias = "endDate", deserialize_with = "string_like")]
    pub end_time: Option<String>,
    #[serde(deserialize_with = "string_like")]
    pub timezone: Option<String>,
    pub label: String,
    #[serde(deserialize_with = "lenient")]
    pub providers: Vec<CalendarProvider>,
    #[serde(deserialize_with = "lenient")]
    pub align: TextAlign,
}

impl Default for AddToCalendar {
    fn default() -> Self {
        Self {
            title: None,
            description: None,
            location: None,
            start_time: None,
            end_time: None,
            timezone: None,
            label: "Add to calendar".to_string(),
            providers: vec![
                CalendarProvider::Google,
                CalendarProvider::Outlook,
                CalendarProvider::Apple,
            ],
            align: TextAlign::Center,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataExtensionUpload {
    #[serde(deserialize_with = "string_like")]
    pub title: Option<String>,
    #[serde(deserialize_with = "string_like")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub campaign_groups: Vec<CampaignGroup>,
    /// Fixed destination used when no campaign groups are configured
    #[serde(deserialize_with = "lenient")]
    pub target: Option<UploadTarget>,
    pub accept: String,
    pub delimiter: String,
    pub button_label: String,
    pub success_message: String,
}

impl Default for DataExtensionUpload {
    fn default() -> Self {
        Self {
            title: None,
            description: None,
            campaign_groups: Vec::new(),
            target: None,
            accept: ".csv".to_string(),
            delimiter: ",".to_string(),
            button_label: "Upload".to_string(),
            success_message: "Upload complete.".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FtpUpload {
    #[serde(deserialize_with = "string_like")]
    pub title: Option<String>,
    #[serde(deserialize_with = "string_like")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub campaign_groups: Vec<CampaignGroup>,
    #[serde(deserialize_with = "lenient")]
    pub target: Option<UploadTarget>,
    pub accept: String,
    #[serde(deserialize_with = "lenient")]
    pub max_size_mb: u32,
    pub button_label: String,
    pub success_message: String,
}

impl Default for FtpUpload {
    fn default() -> Self {
        Self {
            title: None,
            description: None,
            campaign_groups: Vec::new(),
            target: None,
            accept: ".csv,.txt,.zip".to_string(),
            max_size_mb: 25,
            button_label: "Upload".to_string(),
            success_message: "File sent.".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CornerPosition {
    #[default]
    BottomRight,
    BottomLeft,
    TopRight,
    TopLeft,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FloatingButton {
    pub label: String,
    #[serde(deserialize_with = "lenient")]
    pub action: Action,
    #[serde(deserialize_with = "lenient")]
    pub position: CornerPosition,
    #[serde(deserialize_with = "string_like")]
    pub color: Option<String>,
    #[serde(deserialize_with = "string_like")]
    pub text_color: Option<String>,
    /// Show the button only after scrolling this many pixels
    #[serde(deserialize_with = "lenient")]
    pub show_after_scroll: u32,
}

impl Default for FloatingButton {
    fn default() -> Self {
        Self {
            label: "Contact us".to_string(),
            action: Action::None,
            position: CornerPosition::BottomRight,
            color: None,
            text_color: None,
            show_after_scroll: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Countdown {
    /// ISO-8601 date-time the countdown runs to
    #[serde(deserialize_with = "string_like")]
    pub target_date: Option<String>,
    #[serde(deserialize_with = "string_like")]
    pub label: Option<String>,
    pub expired_message: String,
    #[serde(deserialize_with = "string_like")]
    pub color: Option<String>,
}

impl Default for Countdown {
    fn default() -> Self {
        Self {
            target_date: None,
            label: None,
            expired_message: "This offer has ended.".to_string(),
            color: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lift(value: serde_json::Value) -> ComponentProps {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_title_defaults() {
        let props = lift(json!({"type": "Title", "props": {"text": "Hi"}}));
        match props {
            ComponentProps::Title(title) => {
                assert_eq!(title.text, "Hi");
                assert_eq!(title.level, 1);
                assert_eq!(title.text_style.align, TextAlign::Center);
            }
            other => panic!("Expected Title, got {:?}", other),
        }
    }

    #[test]
    fn test_calendar_alias() {
        let props = lift(json!({"type": "Calendar", "props": {"title": "Launch"}}));
        assert_eq!(props.type_name(), "AddToCalendar");
    }

    #[test]
    fn test_renamed_tags() {
        assert_eq!(lift(json!({"type": "NPS", "props": {}})).type_name(), "NPS");
        assert_eq!(lift(json!({"type": "FTPUpload", "props": {}})).type_name(), "FTPUpload");
    }

    #[test]
    fn test_form_field_enabled_by_default() {
        let props = lift(json!({
            "type": "Form",
            "props": {"fields": [
                {"id": "email", "type": "email", "required": true},
                {"id": "company", "enabled": false}
            ]}
        }));
        let fields = props.form_fields().unwrap();
        assert!(fields[0].enabled);
        assert_eq!(fields[0].field_type, FieldType::Email);
        assert!(!fields[1].enabled);
    }

    #[test]
    fn test_field_options_accept_both_shapes() {
        let field: FormField = serde_json::from_value(json!({
            "id": "size",
            "type": "select",
            "options": ["S", {"label": "Medium", "value": "M"}]
        }))
        .unwrap();
        assert_eq!(field.options[0].value(), "S");
        assert_eq!(field.options[1].label(), "Medium");
        assert_eq!(field.options[1].value(), "M");
    }

    #[test]
    fn test_malformed_action_is_none() {
        let props = lift(json!({"type": "Button", "props": {"action": "https://x.test"}}));
        match props {
            ComponentProps::Button(button) => assert!(button.action.is_none()),
            other => panic!("Expected Button, got {:?}", other),
        }
    }

    #[test]
    fn test_every_known_type_lifts_from_empty_props() {
        for tag in COMPONENT_TYPES {
            let result: Result<ComponentProps, _> =
                serde_json::from_value(json!({"type": tag, "props": {}}));
            assert!(result.is_ok(), "{} failed: {:?}", tag, result.err());
        }
    }
}
