//! Type tag → renderer lookup.

use crate::renderers::ComponentRenderer;
use pagecraft_model::ComponentProps;

/// Every type tag with a renderer, aliases included
pub const REGISTERED_TYPES: &[&str] = pagecraft_model::COMPONENT_TYPES;

/// The renderer for a decoded props record
pub fn renderer_for(props: &ComponentProps) -> &dyn ComponentRenderer {
    match props {
        ComponentProps::Header(p) => p,
        ComponentProps::Footer(p) => p,
        ComponentProps::Div(p) => p,
        ComponentProps::Columns(p) => p,
        ComponentProps::PopUp(p) => p,
        ComponentProps::Title(p) => p,
        ComponentProps::Subtitle(p) => p,
        ComponentProps::Paragraph(p) => p,
        ComponentProps::Image(p) => p,
        ComponentProps::Video(p) => p,
        ComponentProps::Map(p) => p,
        ComponentProps::Button(p) => p,
        ComponentProps::Divider(p) => p,
        ComponentProps::Spacer(p) => p,
        ComponentProps::SocialLinks(p) => p,
        ComponentProps::FileDownload(p) => p,
        ComponentProps::Form(p) => p,
        ComponentProps::Accordion(p) => p,
        ComponentProps::Tabs(p) => p,
        ComponentProps::Voting(p) => p,
        ComponentProps::Nps(p) => p,
        ComponentProps::Calendly(p) => p,
        ComponentProps::AddToCalendar(p) => p,
        ComponentProps::DataExtensionUpload(p) => p,
        ComponentProps::FtpUpload(p) => p,
        ComponentProps::FloatingButton(p) => p,
        ComponentProps::Countdown(p) => p,
    }
}

/// Whether a type tag has a renderer
pub fn is_registered(component_type: &str) -> bool {
    REGISTERED_TYPES.contains(&component_type)
}
