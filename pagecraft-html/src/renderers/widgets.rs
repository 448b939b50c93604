use super::{root_attrs, ComponentRenderer, Fragment};
use crate::context::{Children, NodeContext, PageContext};
use crate::datetime::EventTime;
use crate::diagnostics::DiagnosticKind;
use crate::escape;
use crate::scripts::{self, SharedScript};
use pagecraft_model::props::{Accordion, Countdown, Nps, Tabs, Voting};
use serde::Serialize;

/// Hidden input naming the submitted poll
const POLL_TOKEN_FIELD: &str = "__pc_poll";
const NPS_SCALE: std::ops::RangeInclusive<u8> = 0..=10;

#[derive(Serialize)]
struct ElementConfig<'a> {
    el: &'a str,
}

#[derive(Serialize)]
struct AccordionConfig<'a> {
    el: &'a str,
    multiple: bool,
}

impl ComponentRenderer for Accordion {
    fn render(&self, cx: &NodeContext, _children: &Children, _page: &PageContext) -> Fragment {
        let mut html = format!("<div {}>", root_attrs(cx, "pc-accordion"));
        for (i, item) in self.items.iter().enumerate() {
            let open = self.open_first && i == 0;
            let trigger = cx.child_id(&format!("trigger-{}", i));
            let panel = cx.child_id(&format!("panel-{}", i));
            html.push_str(&format!(
                "<div class=\"pc-accordion-item\"><h3 style=\"margin:0;\"><button type=\"button\" class=\"pc-accordion-trigger\" id=\"{}\" aria-expanded=\"{}\" aria-controls=\"{}\">{}</button></h3><div id=\"{}\" class=\"pc-accordion-panel\" role=\"region\" aria-labelledby=\"{}\"{}>{}</div></div>",
                trigger,
                open,
                panel,
                escape::html(&item.title),
                panel,
                trigger,
                if open { "" } else { " hidden" },
                escape::text_with_breaks(&item.content)
            ));
        }
        html.push_str("</div>");
        html.push_str(&scripts::enqueue(
            "accordion",
            &AccordionConfig {
                el: &cx.dom_id,
                multiple: self.allow_multiple,
            },
        ));
        Fragment::flow(html).require(SharedScript::Accordion)
    }
}

impl ComponentRenderer for Tabs {
    fn render(&self, cx: &NodeContext, _children: &Children, _page: &PageContext) -> Fragment {
        let active = self.default_tab.min(self.tabs.len().saturating_sub(1));
        let mut list = String::from("<div class=\"pc-tablist\" role=\"tablist\">");
        let mut panels = String::new();
        for (i, tab) in self.tabs.iter().enumerate() {
            let on = i == active;
            let tab_id = cx.child_id(&format!("tab-{}", i));
            let panel_id = cx.child_id(&format!("tabpanel-{}", i));
            list.push_str(&format!(
                "<button type=\"button\" class=\"pc-tab\" role=\"tab\" id=\"{}\" aria-controls=\"{}\" aria-selected=\"{}\" tabindex=\"{}\">{}</button>",
                tab_id,
                panel_id,
                on,
                if on { 0 } else { -1 },
                escape::html(&tab.label)
            ));
            panels.push_str(&format!(
                "<div class=\"pc-tabpanel\" role=\"tabpanel\" id=\"{}\" aria-labelledby=\"{}\"{}>{}</div>",
                panel_id,
                tab_id,
                if on { "" } else { " hidden" },
                escape::text_with_breaks(&tab.content)
            ));
        }
        list.push_str("</div>");
        let mut html = format!("<div {}>{}{}</div>", root_attrs(cx, "pc-tabs"), list, panels);
        html.push_str(&scripts::enqueue("tabs", &ElementConfig { el: &cx.dom_id }));
        Fragment::flow(html).require(SharedScript::Tabs)
    }
}

/// Server-side block recording one poll answer
fn poll_block(cx: &NodeContext, data_extension: &str, answer_column: &str, answer_field: &str) -> String {
    format!(
        "%%[\nIF RequestParameter(\"{token}\") == \"{form}\" AND NOT Empty(RequestParameter(\"{field}\")) THEN\n  InsertData(\"{de}\", \"PollId\", \"{id}\", \"{column}\", RequestParameter(\"{field}\"))\nENDIF\n]%%",
        token = POLL_TOKEN_FIELD,
        form = escape::placeholder_ident(&cx.dom_id),
        field = answer_field,
        de = escape::placeholder_ident(data_extension),
        id = escape::placeholder_ident(cx.id()),
        column = answer_column
    )
}

fn poll_form(cx: &NodeContext, class: &str, question: &str, body: &str, thanks: &str) -> String {
    format!(
        "<form {} method=\"post\" action=\"\"><input type=\"hidden\" name=\"{}\" value=\"{}\"><p class=\"pc-poll-question\">{}</p>{}<p class=\"pc-poll-thanks\" role=\"status\" hidden>{}</p></form>",
        root_attrs(cx, class),
        POLL_TOKEN_FIELD,
        escape::attr(&cx.dom_id),
        escape::html(question),
        body,
        escape::html(thanks)
    )
}

impl ComponentRenderer for Voting {
    fn render(&self, cx: &NodeContext, _children: &Children, page: &PageContext) -> Fragment {
        let options: Vec<&str> = self
            .options
            .iter()
            .map(|o| o.trim())
            .filter(|o| !o.is_empty())
            .collect();
        if options.is_empty() {
            return Fragment::warning(cx, page, DiagnosticKind::MissingRequired, "voting needs at least one option");
        }

        let mut html = String::new();
        if let Some(key) = page.data_extension_key(self.data_extension_key.as_deref()) {
            html.push_str(&poll_block(cx, key, "Choice", "choice"));
        }
        let buttons: String = options
            .iter()
            .map(|option| {
                format!(
                    "<button type=\"submit\" class=\"pc-poll-option\" name=\"choice\" value=\"{}\">{}</button>",
                    escape::attr(option),
                    escape::html(option)
                )
            })
            .collect();
        html.push_str(&poll_form(
            cx,
            "pc-poll pc-voting",
            self.question.as_deref().unwrap_or(""),
            &format!("<div class=\"pc-poll-options\">{}</div>", buttons),
            &self.thank_you_message,
        ));
        html.push_str(&scripts::enqueue("poll", &ElementConfig { el: &cx.dom_id }));
        Fragment::flow(html).require(SharedScript::Poll)
    }
}

impl ComponentRenderer for Nps {
    fn render(&self, cx: &NodeContext, _children: &Children, page: &PageContext) -> Fragment {
        let mut html = String::new();
        if let Some(key) = page.data_extension_key(self.data_extension_key.as_deref()) {
            html.push_str(&poll_block(cx, key, "Score", "score"));
        }
        let buttons: String = NPS_SCALE
            .map(|score| {
                format!(
                    "<button type=\"submit\" class=\"pc-poll-option\" name=\"score\" value=\"{0}\">{0}</button>",
                    score
                )
            })
            .collect();
        let body = format!(
            "<div class=\"pc-poll-options pc-nps-scale\">{}</div><div class=\"pc-nps-labels\"><span>{}</span><span>{}</span></div>",
            buttons,
            escape::html(&self.low_label),
            escape::html(&self.high_label)
        );
        html.push_str(&poll_form(cx, "pc-poll pc-nps", &self.question, &body, &self.thank_you_message));
        html.push_str(&scripts::enqueue("poll", &ElementConfig { el: &cx.dom_id }));
        Fragment::flow(html).require(SharedScript::Poll)
    }
}

#[derive(Serialize)]
struct CountdownConfig<'a> {
    el: &'a str,
    target: String,
}

const COUNTDOWN_UNITS: &[(&str, &str)] = &[
    ("days", "Days"),
    ("hours", "Hours"),
    ("minutes", "Minutes"),
    ("seconds", "Seconds"),
];

impl ComponentRenderer for Countdown {
    fn render(&self, cx: &NodeContext, _children: &Children, page: &PageContext) -> Fragment {
        let Some(raw) = self.target_date.as_deref() else {
            return Fragment::warning(cx, page, DiagnosticKind::MissingRequired, "countdown needs a targetDate");
        };
        let Some(target) = EventTime::parse(raw) else {
            return Fragment::warning(
                cx,
                page,
                DiagnosticKind::InvalidProps,
                format!("countdown targetDate '{}' is not a date", raw),
            );
        };

        let style = page
            .color(self.color.as_deref())
            .map(|c| format!(" style=\"color:{};\"", escape::attr(&c)))
            .unwrap_or_default();
        let mut html = format!("<div {}{}>", root_attrs(cx, "pc-countdown"), style);
        if let Some(label) = &self.label {
            html.push_str(&format!("<p class=\"pc-countdown-title\">{}</p>", escape::html(label)));
        }
        html.push_str("<div class=\"pc-countdown-clock\">");
        for (unit, label) in COUNTDOWN_UNITS {
            html.push_str(&format!(
                "<div class=\"pc-countdown-unit\"><span class=\"pc-countdown-value\" data-unit=\"{}\">00</span><span class=\"pc-countdown-label\">{}</span></div>",
                unit, label
            ));
        }
        html.push_str(&format!(
            "</div><p class=\"pc-countdown-expired\" hidden>{}</p></div>",
            escape::html(&self.expired_message)
        ));
        html.push_str(&scripts::enqueue(
            "countdown",
            &CountdownConfig {
                el: &cx.dom_id,
                target: target.to_iso(),
            },
        ));
        Fragment::flow(html).require(SharedScript::Countdown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::CompileOptions;
    use pagecraft_model::{Component, PageDocument};
    use serde_json::json;

    fn render_with<R: ComponentRenderer>(props: &R, doc: &PageDocument) -> Fragment {
        let options = CompileOptions::default();
        let page = PageContext::new(doc, &options);
        let component = Component::new("w", "Widget");
        let cx = NodeContext::new(&component, "pc-w");
        props.render(&cx, &Children::default(), &page)
    }

    fn render<R: ComponentRenderer>(props: &R) -> Fragment {
        render_with(props, &PageDocument::default())
    }

    #[test]
    fn test_accordion_opens_first_item_only() {
        let accordion: Accordion = serde_json::from_value(json!({
            "items": [{"title": "One", "content": "a"}, {"title": "Two", "content": "b"}],
            "openFirst": true
        }))
        .unwrap();
        let html = render(&accordion).html;
        assert!(html.contains("id=\"pc-w.trigger-0\" aria-expanded=\"true\""));
        assert!(html.contains("id=\"pc-w.trigger-1\" aria-expanded=\"false\""));
        assert!(html.contains("aria-labelledby=\"pc-w.trigger-0\">a</div>"));
        assert!(html.contains("aria-labelledby=\"pc-w.trigger-1\" hidden>b</div>"));
        assert!(html.contains("\"multiple\":false"));
    }

    #[test]
    fn test_tabs_clamp_default() {
        let tabs: Tabs = serde_json::from_value(json!({
            "tabs": [{"label": "A", "content": "x"}, {"label": "B", "content": "y"}],
            "defaultTab": 5
        }))
        .unwrap();
        let html = render(&tabs).html;
        assert!(html.contains("id=\"pc-w.tab-1\" aria-controls=\"pc-w.tabpanel-1\" aria-selected=\"true\""));
        assert!(html.contains("id=\"pc-w.tabpanel-0\" aria-labelledby=\"pc-w.tab-0\" hidden>"));
    }

    #[test]
    fn test_voting_records_to_data_extension() {
        let voting: Voting = serde_json::from_value(json!({
            "question": "Pick one",
            "options": ["Red", "Blue", " "],
            "dataExtensionKey": "Votes"
        }))
        .unwrap();
        let fragment = render(&voting);
        assert!(fragment
            .html
            .contains("InsertData(\"Votes\", \"PollId\", \"w\", \"Choice\", RequestParameter(\"choice\"))"));
        assert_eq!(fragment.html.matches("class=\"pc-poll-option\"").count(), 2);
        assert_eq!(fragment.requires, vec![SharedScript::Poll]);
    }

    #[test]
    fn test_voting_without_options_warns() {
        let fragment = render(&Voting::default());
        assert_eq!(fragment.diagnostics[0].kind, DiagnosticKind::MissingRequired);
    }

    #[test]
    fn test_nps_renders_eleven_scores() {
        let fragment = render(&Nps::default());
        assert_eq!(fragment.html.matches("name=\"score\"").count(), 11);
        assert!(!fragment.html.contains("InsertData"));
    }

    #[test]
    fn test_countdown_target_is_normalized() {
        let countdown: Countdown = serde_json::from_value(json!({"targetDate": "2030-01-01"})).unwrap();
        let fragment = render(&countdown);
        assert!(fragment.html.contains("\"target\":\"2030-01-01T00:00:00\""));
        assert_eq!(fragment.html.matches("data-unit=").count(), 4);
    }

    #[test]
    fn test_countdown_with_bad_date_warns() {
        let countdown: Countdown = serde_json::from_value(json!({"targetDate": "soon"})).unwrap();
        let fragment = render(&countdown);
        assert_eq!(fragment.diagnostics[0].kind, DiagnosticKind::InvalidProps);
    }
}
