use super::{length_or, root_attrs, ComponentRenderer, Fragment};
use crate::context::{Children, NodeContext, PageContext};
use crate::datetime::EventTime;
use crate::diagnostics::DiagnosticKind;
use crate::escape;
use crate::scripts::{self, SharedScript};
use chrono::Duration;
use pagecraft_model::props::{AddToCalendar, CalendarProvider, Calendly};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

fn timezone_regex() -> &'static Regex {
    static TIMEZONE_REGEX: OnceLock<Regex> = OnceLock::new();
    TIMEZONE_REGEX.get_or_init(|| Regex::new(r"^[A-Za-z_]+(?:/[A-Za-z0-9_+-]+){0,2}$").expect("static regex"))
}

impl ComponentRenderer for Calendly {
    fn render(&self, cx: &NodeContext, _children: &Children, page: &PageContext) -> Fragment {
        let Some(url) = self.url.as_deref().and_then(escape::url) else {
            return Fragment::warning(cx, page, DiagnosticKind::MissingRequired, "Calendly embed needs a url");
        };
        let src = if self.hide_details {
            let joiner = if url.contains('?') { '&' } else { '?' };
            format!("{}{}hide_event_type_details=1", url, joiner)
        } else {
            url
        };
        Fragment::flow(format!(
            "<div {}><iframe src=\"{}\" title=\"Schedule a meeting\" style=\"width:100%;height:{};border:0;\" loading=\"lazy\"></iframe></div>",
            root_attrs(cx, "pc-calendly"),
            escape::attr(&src),
            escape::attr(&length_or(Some(self.height.as_str()), "700px"))
        ))
    }
}

/// A calendar event with both ends resolved
#[derive(Debug, Clone, PartialEq)]
struct CalendarEvent<'a> {
    title: &'a str,
    description: &'a str,
    location: &'a str,
    start: EventTime,
    end: EventTime,
    timezone: Option<&'a str>,
}

impl<'a> CalendarEvent<'a> {
    /// `None` when the title or start time is missing or unreadable
    fn from_props(props: &'a AddToCalendar) -> Option<Self> {
        let title = props.title.as_deref().map(str::trim).filter(|t| !t.is_empty())?;
        let start = EventTime::parse(props.start_time.as_deref()?)?;
        let end = props
            .end_time
            .as_deref()
            .and_then(EventTime::parse)
            .filter(|end| end.sort_key() > start.sort_key())
            .unwrap_or_else(|| start.plus(Duration::hours(1)));
        let timezone = props
            .timezone
            .as_deref()
            .map(str::trim)
            .filter(|tz| timezone_regex().is_match(tz));
        Some(Self {
            title,
            description: props.description.as_deref().unwrap_or(""),
            location: props.location.as_deref().unwrap_or(""),
            start,
            end,
            timezone,
        })
    }

    fn dates(&self) -> String {
        format!("{}/{}", self.start.to_basic(), self.end.to_basic())
    }

    fn google_url(&self) -> String {
        let mut url = format!(
            "https://calendar.google.com/calendar/render?action=TEMPLATE&text={}&dates={}&details={}&location={}",
            urlencoding::encode(self.title),
            urlencoding::encode(&self.dates()),
            urlencoding::encode(self.description),
            urlencoding::encode(self.location)
        );
        if let Some(tz) = self.timezone {
            url.push_str(&format!("&ctz={}", urlencoding::encode(tz)));
        }
        url
    }

    fn outlook_url(&self) -> String {
        format!(
            "https://outlook.live.com/calendar/0/deeplink/compose?path=%2Fcalendar%2Faction%2Fcompose&rru=addevent&subject={}&startdt={}&enddt={}&body={}&location={}",
            urlencoding::encode(self.title),
            urlencoding::encode(&self.start.to_iso()),
            urlencoding::encode(&self.end.to_iso()),
            urlencoding::encode(self.description),
            urlencoding::encode(self.location)
        )
    }
}

#[derive(Serialize)]
struct IcsEvent<'a> {
    title: &'a str,
    description: &'a str,
    location: &'a str,
    start: String,
    end: String,
    timezone: Option<&'a str>,
}

#[derive(Serialize)]
struct CalendarConfig<'a> {
    el: &'a str,
    event: IcsEvent<'a>,
}

fn provider_link(href: &str, label: &str, provider: &str) -> String {
    format!(
        "<a class=\"pc-calendar-link\" data-provider=\"{}\" href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
        provider,
        escape::attr(href),
        escape::html(label)
    )
}

impl ComponentRenderer for AddToCalendar {
    fn render(&self, cx: &NodeContext, _children: &Children, page: &PageContext) -> Fragment {
        let Some(event) = CalendarEvent::from_props(self) else {
            return Fragment::warning(
                cx,
                page,
                DiagnosticKind::MissingRequired,
                "add to calendar needs a title and a valid startTime",
            );
        };

        let providers: &[CalendarProvider] = if self.providers.is_empty() {
            &[CalendarProvider::Google, CalendarProvider::Outlook, CalendarProvider::Apple]
        } else {
            &self.providers
        };

        let justify = match self.align.as_css() {
            "left" => "flex-start",
            "right" => "flex-end",
            _ => "center",
        };
        let mut html = format!(
            "<div {} style=\"justify-content:{};\"><span class=\"pc-calendar-label\">{}</span>",
            root_attrs(cx, "pc-calendar"),
            justify,
            escape::html(&self.label)
        );
        let mut wants_ics = false;
        for provider in providers {
            match provider {
                CalendarProvider::Google => html.push_str(&provider_link(&event.google_url(), "Google", "google")),
                CalendarProvider::Outlook => html.push_str(&provider_link(&event.outlook_url(), "Outlook", "outlook")),
                CalendarProvider::Apple if !wants_ics => {
                    wants_ics = true;
                    html.push_str("<a class=\"pc-calendar-link\" data-provider=\"apple\" href=\"#\" data-pc-ics>Apple / iCal</a>");
                }
                CalendarProvider::Apple => {}
            }
        }
        html.push_str("</div>");

        if !wants_ics {
            return Fragment::flow(html);
        }
        html.push_str(&scripts::enqueue(
            "calendar",
            &CalendarConfig {
                el: &cx.dom_id,
                event: IcsEvent {
                    title: event.title,
                    description: event.description,
                    location: event.location,
                    start: event.start.to_basic(),
                    end: event.end.to_basic(),
                    timezone: event.timezone,
                },
            },
        ));
        Fragment::flow(html).require(SharedScript::AddToCalendar)
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
        let options = CompileOptions::default();
        let page = PageContext::new(&doc, &options);
        let component = Component::new("cal", "AddToCalendar");
        let cx = NodeContext::new(&component, "pc-cal");
        props.render(&cx, &Children::default(), &page)
    }

    fn calendar(props: serde_json::Value) -> AddToCalendar {
        serde_json::from_value(props).unwrap()
    }

    #[test]
    fn test_missing_title_degrades_to_warning() {
        let fragment = render(&calendar(json!({"startTime": "2025-05-01T10:00"})));
        assert!(fragment.html.contains("pc-warning"));
        assert!(fragment.requires.is_empty());
        assert_eq!(fragment.diagnostics.len(), 1);
    }

    #[test]
    fn test_unparseable_start_degrades_to_warning() {
        let fragment = render(&calendar(json!({"title": "Launch", "startTime": "tomorrow"})));
        assert_eq!(fragment.diagnostics[0].kind, DiagnosticKind::MissingRequired);
    }

    #[test]
    fn test_end_defaults_to_one_hour() {
        let props = calendar(json!({"title": "Launch", "startTime": "2025-05-01T10:00"}));
        let event = CalendarEvent::from_props(&props).unwrap();
        assert_eq!(event.dates(), "20250501T100000/20250501T110000");
    }

    #[test]
    fn test_end_before_start_is_replaced() {
        let props = calendar(json!({
            "title": "Launch",
            "startTime": "2025-05-01T10:00",
            "endTime": "2025-05-01T09:00"
        }));
        let event = CalendarEvent::from_props(&props).unwrap();
        assert_eq!(event.end.to_basic(), "20250501T110000");
    }

    #[test]
    fn test_links_for_each_provider() {
        let fragment = render(&calendar(json!({
            "title": "Launch & party",
            "startTime": "2025-05-01T10:00",
            "timezone": "America/Sao_Paulo"
        })));
        let html = &fragment.html;
        assert!(html.contains("text=Launch%20%26%20party&amp;dates=20250501T100000%2F20250501T110000"));
        assert!(html.contains("&amp;ctz=America%2FSao_Paulo"));
        assert!(html.contains("data-provider=\"outlook\""));
        assert!(html.contains("data-pc-ics"));
        assert!(html.contains("\"timezone\":\"America/Sao_Paulo\""));
        assert_eq!(fragment.requires, vec![SharedScript::AddToCalendar]);
    }

    #[test]
    fn test_google_only_needs_no_script() {
        let fragment = render(&calendar(json!({
            "title": "Launch",
            "startTime": "2025-05-01",
            "providers": ["google"]
        })));
        assert!(fragment.requires.is_empty());
        assert!(!fragment.html.contains("<script>"));
    }

    #[test]
    fn test_calendly_hides_details() {
        let calendly: Calendly = serde_json::from_value(json!({
            "url": "https://calendly.com/acme/intro?month=2025-05",
            "hideDetails": true
        }))
        .unwrap();
        let fragment = render(&calendly);
        assert!(fragment
            .html
            .contains("src=\"https://calendly.com/acme/intro?month=2025-05&amp;hide_event_type_details=1\""));
    }
}
