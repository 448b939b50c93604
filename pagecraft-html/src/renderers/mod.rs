//! Per-type component renderers.
//!
//! Every props record implements [`ComponentRenderer`]. Renderers are pure:
//! they read the node, its rendered children and the page context, and return
//! a [`Fragment`] describing markup, the shared scripts it needs, and any
//! diagnostics. They never fail; missing required props render a warning
//! block instead.

mod actions;
mod form;
mod media;
mod scheduling;
mod structure;
mod text;
mod upload;
mod widgets;

use crate::context::{Children, NodeContext, PageContext};
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::escape;
use crate::scripts::SharedScript;
use pagecraft_model::props::TextStyle;
use pagecraft_model::Action;

/// Where the assembler places a fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    /// In tree order inside the body
    #[default]
    Flow,
    /// After the body content and runtime, above everything else
    Overlay,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    pub html: String,
    pub requires: Vec<SharedScript>,
    pub diagnostics: Vec<Diagnostic>,
    pub placement: Placement,
}

impl Fragment {
    pub fn flow(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            ..Self::default()
        }
    }

    pub fn overlay(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            placement: Placement::Overlay,
            ..Self::default()
        }
    }

    /// A warning block standing in for a component that cannot render
    pub fn warning(cx: &NodeContext, page: &PageContext, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        let message = message.into();
        let html = warning_block(page, cx.id(), &cx.component.component_type, &message);
        Self {
            html,
            diagnostics: vec![Diagnostic::warning(kind, cx.id(), message)],
            ..Self::default()
        }
    }

    pub fn require(mut self, script: SharedScript) -> Self {
        if !self.requires.contains(&script) {
            self.requires.push(script);
        }
        self
    }

    pub fn with_diagnostic(mut self, diagnostic: Option<Diagnostic>) -> Self {
        self.diagnostics.extend(diagnostic);
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) -> Self {
        self.diagnostics.extend(diagnostics);
        self
    }
}

pub trait ComponentRenderer {
    fn render(&self, cx: &NodeContext, children: &Children, page: &PageContext) -> Fragment;
}

/// Visible in preview builds, an HTML comment in publish builds
pub fn warning_block(page: &PageContext, component_id: &str, component_type: &str, message: &str) -> String {
    if page.preview() {
        format!(
            "<div class=\"pc-warning\" role=\"note\" data-component=\"{}\"><strong>{}</strong> {}</div>",
            escape::attr(component_id),
            escape::html(component_type),
            escape::html(message)
        )
    } else {
        format!(
            "<!-- pagecraft: {} '{}': {} -->",
            escape::comment(component_type),
            escape::comment(component_id),
            escape::comment(message)
        )
    }
}

/// `id`, `class` and `data-component` attributes for a component's root element
pub(crate) fn root_attrs(cx: &NodeContext, class: &str) -> String {
    format!(
        "id=\"{}\" class=\"{}\" data-component=\"{}\"",
        escape::attr(&cx.dom_id),
        escape::attr(class),
        escape::attr(&cx.component.component_type)
    )
}

/// `href` (plus `target`/`rel` for new-tab links) for an action, with a
/// diagnostic when the action was unusable
pub(crate) fn link_attrs(cx: &NodeContext, page: &PageContext, action: &Action) -> (String, Option<Diagnostic>) {
    let (href, problem) = page.href(action);
    let mut attrs = format!("href=\"{}\"", escape::attr(&href));
    if action.opens_new_tab() && href != "#" {
        attrs.push_str(" target=\"_blank\" rel=\"noopener noreferrer\"");
    }
    let diagnostic = problem.map(|reason| Diagnostic::warning(DiagnosticKind::InvalidAction, cx.id(), reason));
    (attrs, diagnostic)
}

/// Typography declarations shared by text components
pub(crate) fn text_style_css(style: &TextStyle, page: &PageContext) -> String {
    let mut css = format!("text-align:{};", style.align.as_css());
    if let Some(color) = page.color(style.color.as_deref()) {
        css.push_str(&format!("color:{};", color));
    }
    if let Some(size) = style.font_size.as_deref().and_then(escape::css_value) {
        css.push_str(&format!("font-size:{};", size));
    }
    if let Some(weight) = style.font_weight.as_deref().and_then(escape::css_value) {
        css.push_str(&format!("font-weight:{};", weight));
    }
    css
}

/// Optional CSS length, falling back to `default`
pub(crate) fn length_or(value: Option<&str>, default: &str) -> String {
    value
        .and_then(escape::css_value)
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::CompileOptions;
    use pagecraft_model::{Component, PageDocument};

    #[test]
    fn test_warning_block_is_visible_in_preview() {
        let doc = PageDocument::default();
        let options = CompileOptions::default();
        let page = PageContext::new(&doc, &options);
        let html = warning_block(&page, "cal", "AddToCalendar", "title is required");
        assert!(html.starts_with("<div class=\"pc-warning\""));
        assert!(html.contains("title is required"));
    }

    #[test]
    fn test_warning_block_is_a_comment_when_publishing() {
        let doc = PageDocument::default();
        let options = CompileOptions::publish();
        let page = PageContext::new(&doc, &options);
        let html = warning_block(&page, "x", "Video", "bad --> <script>");
        assert_eq!(html, "<!-- pagecraft: Video 'x': bad - -&gt; <script&gt; -->");
    }

    #[test]
    fn test_new_tab_link() {
        let doc = PageDocument::default();
        let options = CompileOptions::default();
        let page = PageContext::new(&doc, &options);
        let component = Component::new("b", "Button");
        let cx = NodeContext::new(&component, "pc-b");
        let action = Action::Url {
            url: Some("https://example.com".to_string()),
            new_tab: true,
        };
        let (attrs, diagnostic) = link_attrs(&cx, &page, &action);
        assert_eq!(
            attrs,
            "href=\"https://example.com\" target=\"_blank\" rel=\"noopener noreferrer\""
        );
        assert!(diagnostic.is_none());
    }
}
