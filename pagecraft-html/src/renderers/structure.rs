use super::{length_or, link_attrs, root_attrs, ComponentRenderer, Fragment};
use crate::context::{Children, NodeContext, PageContext};
use crate::diagnostics::Diagnostic;
use crate::escape;
use crate::layout;
use crate::scripts::{self, SharedScript};
use pagecraft_model::props::{Columns, Div, Divider, Footer, Header, NavLink, PopUp, PopUpTrigger, Spacer};
use serde::Serialize;

const MAX_COLUMNS: u8 = 6;

fn nav_links(cx: &NodeContext, page: &PageContext, links: &[NavLink], diagnostics: &mut Vec<Diagnostic>) -> String {
    if links.is_empty() {
        return String::new();
    }
    let mut out = String::from("<nav class=\"pc-nav\">");
    for link in links {
        let (attrs, problem) = link_attrs(cx, page, &link.action);
        diagnostics.extend(problem);
        out.push_str(&format!("<a {}>{}</a>", attrs, escape::html(&link.label)));
    }
    out.push_str("</nav>");
    out
}

impl ComponentRenderer for Header {
    fn render(&self, cx: &NodeContext, children: &Children, page: &PageContext) -> Fragment {
        let mut diagnostics = Vec::new();
        let mut bar = String::from("<div class=\"pc-header-bar\">");

        if let Some(src) = self.logo_url.as_deref().and_then(escape::url) {
            let width = length_or(self.logo_width.as_deref(), "140px");
            let img = format!(
                "<img class=\"pc-logo\" src=\"{}\" alt=\"{}\" style=\"width:{};height:auto;\">",
                escape::attr(&src),
                escape::attr(self.logo_alt.as_deref().unwrap_or("")),
                escape::attr(&width)
            );
            if self.logo_action.is_none() {
                bar.push_str(&img);
            } else {
                let (attrs, problem) = link_attrs(cx, page, &self.logo_action);
                diagnostics.extend(problem);
                bar.push_str(&format!("<a class=\"pc-logo-link\" {}>{}</a>", attrs, img));
            }
        }
        bar.push_str(&nav_links(cx, page, &self.links, &mut diagnostics));
        bar.push_str("</div>");

        let class = if self.sticky { "pc-header pc-sticky" } else { "pc-header" };
        let resolved = layout::resolve_box(&self.styles, &self.layout, page);
        let content = format!("{}{}", bar, children.html());
        Fragment::flow(layout::wrap("header", &root_attrs(cx, class), &resolved, &content))
            .with_diagnostics(diagnostics)
    }
}

impl ComponentRenderer for Footer {
    fn render(&self, cx: &NodeContext, children: &Children, page: &PageContext) -> Fragment {
        let mut diagnostics = Vec::new();
        let mut content = children.html();
        if let Some(text) = &self.text {
            content.push_str(&format!("<p class=\"pc-footer-text\">{}</p>", escape::text_with_breaks(text)));
        }
        content.push_str(&nav_links(cx, page, &self.links, &mut diagnostics));
        if let Some(copyright) = &self.copyright {
            content.push_str(&format!("<small class=\"pc-copyright\">{}</small>", escape::html(copyright)));
        }
        let resolved = layout::resolve_box(&self.styles, &self.layout, page);
        Fragment::flow(layout::wrap("footer", &root_attrs(cx, "pc-footer"), &resolved, &content))
            .with_diagnostics(diagnostics)
    }
}

impl ComponentRenderer for Div {
    fn render(&self, cx: &NodeContext, children: &Children, page: &PageContext) -> Fragment {
        let resolved = layout::resolve_box(&self.styles, &self.layout, page);
        let mut html = String::new();
        if let Some(anchor) = &self.anchor {
            html.push_str(&format!("<a class=\"pc-anchor\" id=\"{}\"></a>", escape::id_part(anchor)));
        }
        html.push_str(&layout::wrap("div", &root_attrs(cx, "pc-div"), &resolved, &children.html()));
        Fragment::flow(html)
    }
}

fn column_track(width: Option<&String>) -> String {
    match width.map(|w| w.trim()) {
        Some(w) if w.parse::<f64>().is_ok() => format!("{}fr", w),
        Some(w) => escape::css_value(w).unwrap_or_else(|| "1fr".to_string()),
        None => "1fr".to_string(),
    }
}

impl ComponentRenderer for Columns {
    fn render(&self, cx: &NodeContext, children: &Children, page: &PageContext) -> Fragment {
        let count = self.count.clamp(1, MAX_COLUMNS) as i64;
        let tracks: Vec<String> = (0..count as usize).map(|i| column_track(self.widths.get(i))).collect();
        let gap = length_or(self.layout.gap.as_deref(), "1.5rem");
        let lane_css = layout::layout_css(&self.layout);

        let mut grid = format!(
            "<div class=\"pc-columns-grid{}\" style=\"display:grid;grid-template-columns:{};gap:{};width:100%;\">",
            if self.stack_on_mobile { " pc-stack" } else { "" },
            escape::attr(&tracks.join(" ")),
            escape::attr(&gap)
        );
        for column in 0..count {
            let mut lane = children.lane(column);
            // out-of-range lanes collapse into the last column
            if column == count - 1 {
                lane.push_str(&children.outside_lanes(count));
            }
            grid.push_str(&format!(
                "<div class=\"pc-column\" data-column=\"{}\" style=\"{}\">{}</div>",
                column,
                escape::attr(&lane_css),
                lane
            ));
        }
        grid.push_str("</div>");

        let resolved = layout::resolve_box(&self.styles, &Default::default(), page);
        Fragment::flow(layout::wrap("div", &root_attrs(cx, "pc-columns"), &resolved, &grid))
    }
}

#[derive(Serialize)]
struct PopUpConfig<'a> {
    el: &'a str,
    trigger: &'static str,
    delay: u32,
    scroll: u8,
    once: bool,
}

impl ComponentRenderer for PopUp {
    fn render(&self, cx: &NodeContext, children: &Children, page: &PageContext) -> Fragment {
        let mut dialog_css = format!("max-width:{};", length_or(self.width.as_deref(), "560px"));
        dialog_css.push_str(&layout::background_css(&self.styles, page));
        if !dialog_css.contains("background") {
            dialog_css.push_str("background-color:#ffffff;");
        }
        dialog_css.push_str(&layout::passthrough_css(&self.styles));
        dialog_css.push_str(&layout::layout_css(&self.layout));
        if !self.styles.extra.contains_key("padding") {
            dialog_css.push_str("padding:2rem;");
        }

        let mut html = String::new();
        if self.trigger == PopUpTrigger::Click {
            html.push_str(&format!(
                "<button type=\"button\" class=\"pc-button pc-popup-trigger\" data-pc-open=\"{}\">{}</button>",
                escape::attr(&cx.dom_id),
                escape::html(self.trigger_label.as_deref().unwrap_or("Open"))
            ));
        }
        html.push_str(&format!(
            "<div {} role=\"dialog\" aria-modal=\"true\" hidden><div class=\"pc-popup-dialog\" style=\"{}\"><button type=\"button\" class=\"pc-popup-close\" data-pc-close aria-label=\"Close\">&times;</button>{}</div></div>",
            root_attrs(cx, "pc-popup"),
            escape::attr(&dialog_css),
            children.html()
        ));
        html.push_str(&scripts::enqueue(
            "popup",
            &PopUpConfig {
                el: &cx.dom_id,
                trigger: self.trigger.as_str(),
                delay: self.delay_seconds,
                scroll: self.scroll_percent.min(100),
                once: self.show_once,
            },
        ));
        Fragment::flow(html).require(SharedScript::PopUp)
    }
}

const LINE_STYLES: &[&str] = &["solid", "dashed", "dotted", "double"];

impl ComponentRenderer for Divider {
    fn render(&self, cx: &NodeContext, _children: &Children, page: &PageContext) -> Fragment {
        let line_style = if LINE_STYLES.contains(&self.line_style.as_str()) {
            self.line_style.as_str()
        } else {
            "solid"
        };
        let color = page
            .color(self.color.as_deref())
            .unwrap_or_else(|| "#e5e7eb".to_string());
        let css = format!(
            "border:0;border-top:{} {} {};margin:{};width:100%;",
            length_or(Some(self.thickness.as_str()), "1px"),
            line_style,
            color,
            length_or(Some(self.margin.as_str()), "1.5rem 0")
        );
        Fragment::flow(format!("<hr {} style=\"{}\">", root_attrs(cx, "pc-divider"), escape::attr(&css)))
    }
}

impl ComponentRenderer for Spacer {
    fn render(&self, cx: &NodeContext, _children: &Children, _page: &PageContext) -> Fragment {
        Fragment::flow(format!(
            "<div {} style=\"height:{};\" aria-hidden=\"true\"></div>",
            root_attrs(cx, "pc-spacer"),
            escape::attr(&length_or(Some(self.height.as_str()), "32px"))
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RenderedChild;
    use crate::options::CompileOptions;
    use pagecraft_model::{Component, PageDocument};
    use serde_json::json;

    fn render<R: ComponentRenderer>(props: &R, children: Children) -> Fragment {
        let doc = PageDocument::default();
        let options = CompileOptions::default();
        let page = PageContext::new(&doc, &options);
        let component = Component::new("n", "Test");
        let cx = NodeContext::new(&component, "pc-n");
        props.render(&cx, &children, &page)
    }

    fn child(column: i64, html: &str) -> RenderedChild {
        RenderedChild {
            column,
            html: html.to_string(),
        }
    }

    #[test]
    fn test_columns_route_children_into_lanes() {
        let columns: Columns = serde_json::from_value(json!({"count": 2, "widths": ["2", "1"]})).unwrap();
        let fragment = render(
            &columns,
            Children::new(vec![child(1, "<i>right</i>"), child(0, "<i>left</i>"), child(7, "<i>stray</i>")]),
        );
        let html = fragment.html;
        assert!(html.contains("grid-template-columns:2fr 1fr;"));
        let left = html.find("<i>left</i>").unwrap();
        let right = html.find("<i>right</i>").unwrap();
        let stray = html.find("<i>stray</i>").unwrap();
        assert!(left < right && right < stray);
        assert!(html.contains("data-column=\"0\""));
        assert!(!html.contains("data-column=\"2\""));
    }

    #[test]
    fn test_div_nests_children() {
        let fragment = render(&Div::default(), Children::new(vec![child(0, "<p>inside</p>")]));
        assert!(fragment.html.starts_with("<div id=\"pc-n\" class=\"pc-div\""));
        assert!(fragment.html.contains("<p>inside</p></div>"));
    }

    #[test]
    fn test_click_popup_renders_trigger_and_queues_config() {
        let popup: PopUp = serde_json::from_value(json!({"trigger": "click", "triggerLabel": "Details"})).unwrap();
        let fragment = render(&popup, Children::default());
        assert!(fragment.html.contains("data-pc-open=\"pc-n\">Details</button>"));
        assert!(fragment.html.contains("\"trigger\":\"click\""));
        assert!(fragment.html.contains(" hidden>"));
        assert_eq!(fragment.requires, vec![SharedScript::PopUp]);
    }

    #[test]
    fn test_header_with_bad_link_flags_action() {
        let header: Header = serde_json::from_value(json!({
            "links": [{"label": "Docs", "action": {"type": "URL", "url": "javascript:void(0)"}}]
        }))
        .unwrap();
        let fragment = render(&header, Children::default());
        assert!(fragment.html.contains("<a href=\"#\">Docs</a>"));
        assert_eq!(fragment.diagnostics.len(), 1);
    }

    #[test]
    fn test_divider_rejects_unknown_line_style() {
        let divider: Divider = serde_json::from_value(json!({"lineStyle": "groove;x"})).unwrap();
        let fragment = render(&divider, Children::default());
        assert!(fragment.html.contains("border-top:1px solid #e5e7eb;"));
    }
}
