use super::{link_attrs, root_attrs, ComponentRenderer, Fragment};
use crate::binding;
use crate::context::{Children, NodeContext, PageContext};
use crate::diagnostics::DiagnosticKind;
use crate::escape;
use crate::scripts::{self, SharedScript};
use pagecraft_model::props::{Button, ButtonVariant, CornerPosition, FileDownload, FloatingButton, SocialLinks};
use serde::Serialize;

const DEFAULT_BUTTON_TEXT: &str = "#ffffff";

fn button_css(button: &Button, page: &PageContext) -> String {
    let color = page.color(button.color.as_deref()).unwrap_or_else(|| page.theme_color());
    let text = page.color(button.text_color.as_deref());
    let mut css = match button.variant {
        ButtonVariant::Primary => format!(
            "background-color:{};color:{};border:2px solid {};",
            color,
            text.unwrap_or_else(|| DEFAULT_BUTTON_TEXT.to_string()),
            color
        ),
        ButtonVariant::Secondary => format!(
            "background-color:#f3f4f6;color:{};border:2px solid #f3f4f6;",
            text.unwrap_or_else(|| page.text_color())
        ),
        ButtonVariant::Outline => format!(
            "background-color:transparent;color:{};border:2px solid {};",
            text.unwrap_or_else(|| color.clone()),
            color
        ),
    };
    if button.full_width {
        css.push_str("display:block;width:100%;");
    }
    css
}

fn variant_class(variant: ButtonVariant) -> &'static str {
    match variant {
        ButtonVariant::Primary => "pc-button pc-button-primary",
        ButtonVariant::Secondary => "pc-button pc-button-secondary",
        ButtonVariant::Outline => "pc-button pc-button-outline",
    }
}

impl ComponentRenderer for Button {
    fn render(&self, cx: &NodeContext, _children: &Children, page: &PageContext) -> Fragment {
        let (label, binding_problem) = binding::bind_text(&self.label, self.data_binding.as_deref(), cx.id());
        let (href, action_problem) = link_attrs(cx, page, &self.action);
        let html = format!(
            "<div {} style=\"text-align:{};width:100%;\"><a {} class=\"{}\" style=\"{}\">{}</a></div>",
            root_attrs(cx, "pc-button-wrap"),
            self.align.as_css(),
            href,
            variant_class(self.variant),
            escape::attr(&button_css(self, page)),
            label
        );
        Fragment::flow(html)
            .with_diagnostic(binding_problem)
            .with_diagnostic(action_problem)
    }
}

fn network_label(network: &str) -> String {
    match network.trim().to_ascii_lowercase().as_str() {
        "facebook" => "Facebook".to_string(),
        "instagram" => "Instagram".to_string(),
        "twitter" | "x" => "X".to_string(),
        "linkedin" => "LinkedIn".to_string(),
        "youtube" => "YouTube".to_string(),
        "tiktok" => "TikTok".to_string(),
        "whatsapp" => "WhatsApp".to_string(),
        _ => network.trim().to_string(),
    }
}

impl ComponentRenderer for SocialLinks {
    fn render(&self, cx: &NodeContext, _children: &Children, page: &PageContext) -> Fragment {
        let color = page.color(self.color.as_deref()).unwrap_or_else(|| page.theme_color());
        let mut links = String::new();
        for link in &self.links {
            let Some(href) = link.url.as_deref().and_then(escape::url) else {
                tracing::debug!(component = cx.id(), network = %link.network, "social link without a usable url skipped");
                continue;
            };
            let label = network_label(&link.network);
            links.push_str(&format!(
                "<a class=\"pc-social-link pc-social-{}\" href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\" aria-label=\"{}\" style=\"color:{};\">{}</a>",
                escape::id_part(&link.network.trim().to_ascii_lowercase()),
                escape::attr(&href),
                escape::attr(&label),
                color,
                escape::html(&label)
            ));
        }
        Fragment::flow(format!(
            "<nav {} style=\"display:flex;gap:1rem;flex-wrap:wrap;justify-content:{};width:100%;\">{}</nav>",
            root_attrs(cx, "pc-social"),
            match self.align.as_css() {
                "left" => "flex-start",
                "right" => "flex-end",
                _ => "center",
            },
            links
        ))
    }
}

impl ComponentRenderer for FileDownload {
    fn render(&self, cx: &NodeContext, _children: &Children, page: &PageContext) -> Fragment {
        let Some(href) = self.file_url.as_deref().and_then(escape::url) else {
            return Fragment::warning(cx, page, DiagnosticKind::MissingRequired, "file download needs a fileUrl");
        };
        let download = self
            .file_name
            .as_deref()
            .map(|name| format!(" download=\"{}\"", escape::attr(name)))
            .unwrap_or_else(|| " download".to_string());
        let mut html = format!(
            "<div {} style=\"text-align:{};width:100%;\"><a class=\"pc-button pc-button-primary pc-download\" href=\"{}\"{} style=\"background-color:{};color:{};\">{}</a>",
            root_attrs(cx, "pc-file-download"),
            self.align.as_css(),
            escape::attr(&href),
            download,
            page.theme_color(),
            DEFAULT_BUTTON_TEXT,
            escape::html(&self.label)
        );
        if let Some(description) = &self.description {
            html.push_str(&format!(
                "<p class=\"pc-download-description\">{}</p>",
                escape::text_with_breaks(description)
            ));
        }
        html.push_str("</div>");
        Fragment::flow(html)
    }
}

fn corner_class(position: CornerPosition) -> &'static str {
    match position {
        CornerPosition::BottomRight => "pc-floating-bottom-right",
        CornerPosition::BottomLeft => "pc-floating-bottom-left",
        CornerPosition::TopRight => "pc-floating-top-right",
        CornerPosition::TopLeft => "pc-floating-top-left",
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FloatingConfig<'a> {
    el: &'a str,
    show_after: u32,
}

impl ComponentRenderer for FloatingButton {
    fn render(&self, cx: &NodeContext, _children: &Children, page: &PageContext) -> Fragment {
        let (href, problem) = link_attrs(cx, page, &self.action);
        let background = page.color(self.color.as_deref()).unwrap_or_else(|| page.theme_color());
        let text = page
            .color(self.text_color.as_deref())
            .unwrap_or_else(|| DEFAULT_BUTTON_TEXT.to_string());
        let mut html = format!(
            "<a {} {} style=\"background-color:{};color:{};\">{}</a>",
            root_attrs(cx, &format!("pc-floating {}", corner_class(self.position))),
            href,
            background,
            text,
            escape::html(&self.label)
        );
        if self.show_after_scroll > 0 {
            html.push_str(&scripts::enqueue(
                "floating",
                &FloatingConfig {
                    el: &cx.dom_id,
                    show_after: self.show_after_scroll,
                },
            ));
        }
        Fragment::overlay(html)
            .require(SharedScript::FloatingButton)
            .with_diagnostic(problem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::CompileOptions;
    use crate::renderers::Placement;
    use pagecraft_model::{Component, PageDocument};
    use serde_json::json;

    fn render<R: ComponentRenderer>(props: &R) -> Fragment {
        let mut doc = PageDocument::default();
        doc.styles.theme_color = "#123456".to_string();
        let options = CompileOptions::default();
        let page = PageContext::new(&doc, &options);
        let component = Component::new("a", "Button");
        let cx = NodeContext::new(&component, "pc-a");
        props.render(&cx, &Children::default(), &page)
    }

    #[test]
    fn test_primary_button_uses_theme_color() {
        let button: Button = serde_json::from_value(json!({
            "label": "Buy",
            "action": {"type": "URL", "url": "https://shop.example.com"}
        }))
        .unwrap();
        let fragment = render(&button);
        assert!(fragment.html.contains("href=\"https://shop.example.com\" class=\"pc-button pc-button-primary\""));
        assert!(fragment.html.contains("background-color:#123456;color:#ffffff;"));
        assert!(fragment.html.contains(">Buy</a>"));
        assert!(fragment.diagnostics.is_empty());
    }

    #[test]
    fn test_button_with_page_action() {
        let button: Button = serde_json::from_value(json!({
            "label": "Next",
            "variant": "outline",
            "action": {"type": "PAGE", "pageId": 88}
        }))
        .unwrap();
        let fragment = render(&button);
        assert!(fragment.html.contains("href=\"%%=RedirectTo(CloudPagesURL(88))=%%\""));
        assert!(fragment.html.contains("background-color:transparent;color:#123456;"));
    }

    #[test]
    fn test_floating_button_is_an_overlay() {
        let floating: FloatingButton = serde_json::from_value(json!({
            "label": "Chat",
            "position": "top-left",
            "showAfterScroll": 300
        }))
        .unwrap();
        let fragment = render(&floating);
        assert_eq!(fragment.placement, Placement::Overlay);
        assert!(fragment.html.contains("class=\"pc-floating pc-floating-top-left\""));
        assert!(fragment.html.contains("\"showAfter\":300"));
        assert_eq!(fragment.requires, vec![SharedScript::FloatingButton]);
    }

    #[test]
    fn test_social_links_skip_unsafe_urls() {
        let social: SocialLinks = serde_json::from_value(json!({
            "links": [
                {"network": "Instagram", "url": "https://instagram.com/acme"},
                {"network": "facebook", "url": "javascript:alert(1)"},
                {"network": "x"}
            ]
        }))
        .unwrap();
        let fragment = render(&social);
        assert!(fragment.html.contains("pc-social-instagram"));
        assert!(!fragment.html.contains("javascript"));
        assert_eq!(fragment.html.matches("pc-social-link").count(), 1);
    }

    #[test]
    fn test_download_without_file_warns() {
        let fragment = render(&FileDownload::default());
        assert_eq!(fragment.diagnostics[0].kind, DiagnosticKind::MissingRequired);
    }
}
