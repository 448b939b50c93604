use crate::escape;
use crate::options::CompileOptions;
use pagecraft_model::page_style::{DEFAULT_MAX_WIDTH, DEFAULT_TEXT_COLOR, DEFAULT_THEME_COLOR};
use pagecraft_model::{Action, Component, PageDocument};

/// Document-wide values a renderer may read but never change
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    pub doc: &'a PageDocument,
    pub options: &'a CompileOptions,
}

impl<'a> PageContext<'a> {
    pub fn new(doc: &'a PageDocument, options: &'a CompileOptions) -> Self {
        Self { doc, options }
    }

    pub fn theme_color(&self) -> String {
        escape::css_value(&self.doc.styles.theme_color)
            .unwrap_or_else(|| DEFAULT_THEME_COLOR.to_string())
    }

    pub fn text_color(&self) -> String {
        escape::css_value(&self.doc.styles.text_color)
            .unwrap_or_else(|| DEFAULT_TEXT_COLOR.to_string())
    }

    pub fn max_width(&self) -> String {
        escape::css_value(&self.doc.styles.max_width)
            .unwrap_or_else(|| DEFAULT_MAX_WIDTH.to_string())
    }

    pub fn brand_id(&self) -> &str {
        self.options.brand_id.as_deref().unwrap_or("")
    }

    pub fn page_id(&self) -> &str {
        self.options.page_id.as_deref().unwrap_or("page")
    }

    pub fn preview(&self) -> bool {
        self.options.preview
    }

    /// Data extension a form or poll writes to: its own key, else the page default
    pub fn data_extension_key<'b>(&'b self, own: Option<&'b str>) -> Option<&'b str> {
        own.or(self.doc.meta.data_extension_key.as_deref())
    }

    /// Resolve a color prop (theme references included) into a CSS value
    pub fn color(&self, value: Option<&str>) -> Option<String> {
        let resolved = self.doc.styles.resolve_color(value?)?;
        escape::css_value(&resolved)
    }

    /// Resolve an action into an `href`. Unusable actions become `#`; the
    /// second element is a reason when that happened.
    pub fn href(&self, action: &Action) -> (String, Option<String>) {
        match action {
            Action::None => ("#".to_string(), None),
            Action::Url { url: None, .. } => {
                ("#".to_string(), Some("URL action has no url".to_string()))
            }
            Action::Url { url: Some(url), .. } => match escape::url(url) {
                Some(safe) => (safe, None),
                None => (
                    "#".to_string(),
                    Some(format!("URL '{}' uses a disallowed scheme", url)),
                ),
            },
            Action::Page { page_id: Some(id) } if is_page_id(id) => (
                format!("%%=RedirectTo(CloudPagesURL({}))=%%", id.trim()),
                None,
            ),
            Action::Page { page_id } => (
                "#".to_string(),
                Some(format!(
                    "PAGE action needs a numeric pageId, got {:?}",
                    page_id.as_deref().unwrap_or("")
                )),
            ),
        }
    }
}

fn is_page_id(id: &str) -> bool {
    let id = id.trim();
    !id.is_empty() && id.chars().all(|c| c.is_ascii_digit())
}

/// Which rendering of an A/B-tested component is being produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    A,
    B,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::A => "A",
            Variant::B => "B",
        }
    }
}

/// Per-node values: the raw record and the DOM id its markup must use
#[derive(Debug, Clone)]
pub struct NodeContext<'a> {
    pub component: &'a Component,
    pub dom_id: String,
    pub variant: Option<Variant>,
}

impl<'a> NodeContext<'a> {
    pub fn new(component: &'a Component, dom_id: impl Into<String>) -> Self {
        Self {
            component,
            dom_id: dom_id.into(),
            variant: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.component.id
    }

    /// The same node rendered as one side of an A/B test
    pub fn for_variant(&self, variant: Variant) -> Self {
        Self {
            component: self.component,
            dom_id: escape::derived_id(&self.dom_id, &variant.as_str().to_ascii_lowercase()),
            variant: Some(variant),
        }
    }

    /// DOM id of a sub-element (`pc-signup.email`)
    pub fn child_id(&self, part: &str) -> String {
        escape::derived_id(&self.dom_id, part)
    }
}

/// Already-rendered child markup, in tree order
#[derive(Debug, Clone, Default)]
pub struct Children {
    items: Vec<RenderedChild>,
}

#[derive(Debug, Clone)]
pub struct RenderedChild {
    pub column: i64,
    pub html: String,
}

impl Children {
    pub fn new(items: Vec<RenderedChild>) -> Self {
        Self { items }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All children concatenated
    pub fn html(&self) -> String {
        self.items.iter().map(|c| c.html.as_str()).collect()
    }

    /// Children in one column lane
    pub fn lane(&self, column: i64) -> String {
        self.items
            .iter()
            .filter(|c| c.column == column)
            .map(|c| c.html.as_str())
            .collect()
    }

    /// Children whose lane is outside `0..count`
    pub fn outside_lanes(&self, count: i64) -> String {
        self.items
            .iter()
            .filter(|c| c.column < 0 || c.column >= count)
            .map(|c| c.html.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn href(action: Action) -> (String, Option<String>) {
        let doc = PageDocument::default();
        let options = CompileOptions::default();
        PageContext::new(&doc, &options).href(&action)
    }

    #[test]
    fn test_href_for_page_action() {
        let (href, reason) = href(Action::Page {
            page_id: Some("4521".to_string()),
        });
        assert_eq!(href, "%%=RedirectTo(CloudPagesURL(4521))=%%");
        assert!(reason.is_none());
    }

    #[test]
    fn test_href_for_malformed_actions() {
        assert_eq!(href(Action::Page { page_id: Some("abc)".to_string()) }).0, "#");
        assert_eq!(href(Action::Url { url: None, new_tab: false }).0, "#");
        let (href, reason) = href(Action::Url {
            url: Some("javascript:alert(1)".to_string()),
            new_tab: false,
        });
        assert_eq!(href, "#");
        assert!(reason.is_some());
    }

    #[test]
    fn test_no_action_is_quiet() {
        let (href, reason) = href(Action::None);
        assert_eq!(href, "#");
        assert!(reason.is_none());
    }

    #[test]
    fn test_theme_color_reference() {
        let mut doc = PageDocument::default();
        doc.styles.theme_color = "#ff0000".to_string();
        let options = CompileOptions::default();
        let page = PageContext::new(&doc, &options);
        assert_eq!(page.color(Some("$theme.primary")), Some("#ff0000".to_string()));
        assert_eq!(page.color(Some("red;x")), None);
        assert_eq!(page.color(None), None);
    }

    #[test]
    fn test_derived_ids_cannot_match_component_ids() {
        let component = Component::new("cta", "Paragraph");
        let cx = NodeContext::new(&component, escape::dom_id("cta"));
        assert_eq!(cx.for_variant(Variant::A).dom_id, "pc-cta.a");
        assert_eq!(cx.child_id("email"), "pc-cta.email");
        assert_eq!(cx.child_id("a b"), "pc-cta.a-b");
        assert_ne!(cx.for_variant(Variant::A).dom_id, escape::dom_id("cta-a"));
        assert_ne!(cx.child_id("x"), escape::dom_id("cta.x"));
    }
}
