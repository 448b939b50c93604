use super::{root_attrs, text_style_css, ComponentRenderer, Fragment};
use crate::binding;
use crate::context::{Children, NodeContext, PageContext};
use crate::escape;
use pagecraft_model::props::{Paragraph, Subtitle, TextStyle, Title};

fn text_element(
    tag: &str,
    class: &str,
    text: &str,
    data_binding: Option<&str>,
    style: &TextStyle,
    cx: &NodeContext,
    page: &PageContext,
) -> Fragment {
    let (content, problem) = binding::bind_text(text, data_binding, cx.id());
    let html = format!(
        "<{tag} {attrs} style=\"{style}\">{content}</{tag}>",
        tag = tag,
        attrs = root_attrs(cx, class),
        style = escape::attr(&text_style_css(style, page)),
        content = content
    );
    Fragment::flow(html).with_diagnostic(problem)
}

impl ComponentRenderer for Title {
    fn render(&self, cx: &NodeContext, _children: &Children, page: &PageContext) -> Fragment {
        let tag = format!("h{}", self.level.clamp(1, 6));
        text_element(&tag, "pc-title", &self.text, self.data_binding.as_deref(), &self.text_style, cx, page)
    }
}

impl ComponentRenderer for Subtitle {
    fn render(&self, cx: &NodeContext, _children: &Children, page: &PageContext) -> Fragment {
        text_element("h2", "pc-subtitle", &self.text, self.data_binding.as_deref(), &self.text_style, cx, page)
    }
}

impl ComponentRenderer for Paragraph {
    fn render(&self, cx: &NodeContext, _children: &Children, page: &PageContext) -> Fragment {
        text_element("p", "pc-paragraph", &self.text, self.data_binding.as_deref(), &self.text_style, cx, page)
    }
}
