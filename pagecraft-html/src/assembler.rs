//! Output assembler.
//!
//! Fixed order: doctype, head (meta, font, tracking, styles), body content in
//! tree order, the shared runtime, then overlays. The cookie banner is the
//! last overlay.

use crate::context::PageContext;
use crate::escape;
use crate::scripts::{self, ScriptSet, SharedScript};
use pagecraft_model::page_style::DEFAULT_FONT_FAMILY;
use pagecraft_model::BannerPosition;
use serde::Serialize;

/// DOM id of the cookie banner. Component ids are always `pc-` prefixed.
pub const COOKIE_BANNER_ID: &str = "pagecraft-cookies";
/// localStorage key remembering the visitor's cookie answer
pub const COOKIE_STORAGE_KEY: &str = "pagecraft:cookies";

const BASE_STYLES: &str = r#"*,*::before,*::after{box-sizing:border-box;}
body{margin:0;line-height:1.5;-webkit-font-smoothing:antialiased;}
img,video,iframe{max-width:100%;}
[data-component]{position:relative;}
.pc-overlay{position:absolute;inset:0;pointer-events:none;}
.pc-inner{position:relative;}
.pc-warning{margin:.5rem auto;max-width:1200px;padding:.75rem 1rem;border:1px dashed #d97706;border-radius:6px;background:#fffbeb;color:#92400e;font:14px/1.4 system-ui,sans-serif;}
.pc-header-bar{display:flex;flex-wrap:wrap;gap:1rem;align-items:center;justify-content:space-between;width:100%;}
.pc-sticky{position:sticky;top:0;z-index:800;}
.pc-logo{display:block;max-height:48px;width:auto;}
.pc-nav{display:flex;flex-wrap:wrap;gap:1rem;}
.pc-nav a{color:inherit;text-decoration:none;}
.pc-footer-text,.pc-copyright{margin:.5rem 0;font-size:.9rem;}
.pc-anchor{display:block;position:relative;top:-80px;visibility:hidden;}
.pc-columns-grid{display:grid;gap:1.5rem;width:100%;}
.pc-column{min-width:0;display:flex;flex-direction:column;gap:1rem;}
@media (max-width:768px){.pc-columns-grid.pc-stack{grid-template-columns:1fr !important;}}
.pc-title,.pc-subtitle,.pc-paragraph{margin:0;width:100%;}
.pc-image{margin:0;}
.pc-image img{display:block;height:auto;}
.pc-video,.pc-map{width:100%;}
.pc-video iframe,.pc-video video,.pc-map iframe{display:block;width:100%;border:0;}
.pc-button-wrap{display:flex;width:100%;}
.pc-button{display:inline-block;padding:.75rem 1.5rem;border-radius:6px;font-weight:600;text-decoration:none;border:2px solid transparent;cursor:pointer;}
.pc-button-primary{background:var(--pc-theme);color:#fff;}
.pc-button-secondary{background:#f3f4f6;color:#111827;}
.pc-button-outline{background:transparent;border-color:var(--pc-theme);color:var(--pc-theme);}
.pc-divider{border:0;margin:1rem auto;}
.pc-social{display:flex;flex-wrap:wrap;gap:.75rem;}
.pc-social-link{color:inherit;text-decoration:none;font-weight:600;}
.pc-download{display:flex;flex-direction:column;gap:.5rem;align-items:center;}
.pc-calendly iframe{display:block;}
.pc-ab[data-ab-assigned] > [data-ab-variant]{display:contents;}
"#;

/// Everything the tree walk produced, ready for assembly
#[derive(Debug, Default)]
pub struct Body {
    pub flow: String,
    pub overlays: Vec<String>,
    pub scripts: ScriptSet,
}

/// Build the final document
pub fn assemble(page: &PageContext, body: Body) -> String {
    let Body {
        flow,
        mut overlays,
        mut scripts,
    } = body;

    if let Some(banner) = cookie_banner(page) {
        scripts.require(SharedScript::CookieBanner);
        overlays.push(banner);
    }

    let minify = page.options.minify;
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n");
    html.push_str(&format!("<html lang=\"{}\">\n", escape::attr(lang(page))));
    html.push_str("<head>\n");
    html.push_str(&head_meta(page));
    html.push_str(&tracking_head(page));
    html.push_str("<style>\n");
    html.push_str(&if minify { scripts::minify_source(BASE_STYLES) } else { BASE_STYLES.to_string() });
    html.push_str(&theme_css(page));
    html.push_str(&scripts.css(minify));
    html.push_str("</style>\n");
    if let Some(custom) = page.doc.styles.custom_css.as_deref() {
        html.push_str(&format!("<style data-pagecraft-custom>\n{}\n</style>\n", escape::style_block(custom)));
    }
    html.push_str("</head>\n<body>\n");
    html.push_str(&tracking_body(page));
    html.push_str(&flow);
    html.push('\n');
    if let Some(runtime) = scripts.runtime(minify) {
        html.push_str(&runtime);
        html.push('\n');
    }
    for overlay in &overlays {
        html.push_str(overlay);
        html.push('\n');
    }
    html.push_str("</body>\n</html>\n");
    html
}

fn lang<'a>(page: &PageContext<'a>) -> &'a str {
    let lang = page.doc.meta.lang.trim();
    if lang.is_empty() {
        "en"
    } else {
        lang
    }
}

fn head_meta(page: &PageContext) -> String {
    let meta = &page.doc.meta;
    let mut out = String::new();
    out.push_str("<meta charset=\"UTF-8\">\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    out.push_str(&format!("<title>{}</title>\n", escape::html(&meta.title)));
    out.push_str(&format!("<meta property=\"og:title\" content=\"{}\">\n", escape::attr(&meta.title)));
    if let Some(description) = meta.description.as_deref() {
        out.push_str(&format!("<meta name=\"description\" content=\"{}\">\n", escape::attr(description)));
        out.push_str(&format!(
            "<meta property=\"og:description\" content=\"{}\">\n",
            escape::attr(description)
        ));
    }
    let keywords: Vec<&str> = meta
        .keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .collect();
    if !keywords.is_empty() {
        out.push_str(&format!(
            "<meta name=\"keywords\" content=\"{}\">\n",
            escape::attr(&keywords.join(", "))
        ));
    }
    if let Some(image) = meta.og_image.as_deref().and_then(escape::url) {
        out.push_str(&format!("<meta property=\"og:image\" content=\"{}\">\n", escape::attr(&image)));
    }
    if let Some(favicon) = meta.favicon.as_deref().and_then(escape::url) {
        out.push_str(&format!("<link rel=\"icon\" href=\"{}\">\n", escape::attr(&favicon)));
    }
    if let Some(font) = page.doc.styles.font_url.as_deref().and_then(escape::url) {
        out.push_str(&format!("<link rel=\"stylesheet\" href=\"{}\">\n", escape::attr(&font)));
    }
    out
}

/// Vendor snippets. Ids are restricted to `[A-Za-z0-9_-]` before they get here.
fn tracking_head(page: &PageContext) -> String {
    let tracking = &page.doc.meta.tracking;
    let mut out = String::new();
    if let Some(id) = tracking.google_tag_manager.active_id() {
        out.push_str(&format!(
            "<script>(function(w,d,s,l,i){{w[l]=w[l]||[];w[l].push({{'gtm.start':new Date().getTime(),event:'gtm.js'}});\
var f=d.getElementsByTagName(s)[0],j=d.createElement(s),dl=l!='dataLayer'?'&l='+l:'';j.async=true;\
j.src='https://www.googletagmanager.com/gtm.js?id='+i+dl;f.parentNode.insertBefore(j,f);}})(window,document,'script','dataLayer','{}');</script>\n",
            id
        ));
    }
    if let Some(id) = tracking.google_analytics.active_id() {
        out.push_str(&format!(
            "<script async src=\"https://www.googletagmanager.com/gtag/js?id={id}\"></script>\n\
<script>window.dataLayer=window.dataLayer||[];function gtag(){{dataLayer.push(arguments);}}gtag('js',new Date());gtag('config','{id}');</script>\n",
            id = id
        ));
    }
    if let Some(id) = tracking.facebook_pixel.active_id() {
        out.push_str(&format!(
            "<script>!function(f,b,e,v,n,t,s){{if(f.fbq)return;n=f.fbq=function(){{n.callMethod?n.callMethod.apply(n,arguments):n.queue.push(arguments)}};\
if(!f._fbq)f._fbq=n;n.push=n;n.loaded=!0;n.version='2.0';n.queue=[];t=b.createElement(e);t.async=!0;t.src=v;\
s=b.getElementsByTagName(e)[0];s.parentNode.insertBefore(t,s)}}(window,document,'script','https://connect.facebook.net/en_US/fbevents.js');\
fbq('init','{}');fbq('track','PageView');</script>\n",
            id
        ));
    }
    if let Some(id) = tracking.linkedin_insight.active_id() {
        out.push_str(&format!(
            "<script>window._linkedin_partner_id=\"{}\";window._linkedin_data_partner_ids=window._linkedin_data_partner_ids||[];\
window._linkedin_data_partner_ids.push(window._linkedin_partner_id);</script>\n\
<script async src=\"https://snap.licdn.com/li.lms-analytics/insight.min.js\"></script>\n",
            id
        ));
    }
    out
}

fn tracking_body(page: &PageContext) -> String {
    match page.doc.meta.tracking.google_tag_manager.active_id() {
        Some(id) => format!(
            "<noscript><iframe src=\"https://www.googletagmanager.com/ns.html?id={}\" height=\"0\" width=\"0\" style=\"display:none;visibility:hidden\"></iframe></noscript>\n",
            id
        ),
        None => String::new(),
    }
}

/// Brand variables and page-level body styles
fn theme_css(page: &PageContext) -> String {
    let styles = &page.doc.styles;
    let mut css = format!(":root{{--pc-theme:{};--pc-text:{};", page.theme_color(), page.text_color());
    if let Some(secondary) = page.color(styles.secondary_color.as_deref()) {
        css.push_str(&format!("--pc-secondary:{};", secondary));
    }
    css.push_str("}\n");

    let font = escape::css_value(&styles.font_family).unwrap_or_else(|| DEFAULT_FONT_FAMILY.to_string());
    css.push_str(&format!("body{{font-family:{};color:var(--pc-text);", font));
    if let Some(background) = page.color(styles.background_color.as_deref()) {
        css.push_str(&format!("background-color:{};", background));
    }
    if let Some(image) = styles.background_image.as_deref().and_then(escape::css_url) {
        css.push_str(&format!("background-image:{};background-size:cover;background-position:center;", image));
    }
    css.push_str("}\n");
    css
}

#[derive(Serialize)]
struct CookieConfig<'a> {
    el: &'a str,
    key: &'a str,
}

fn cookie_banner(page: &PageContext) -> Option<String> {
    let banner = &page.doc.cookie_banner;
    if !banner.enabled {
        return None;
    }
    let position = match banner.position {
        BannerPosition::Top => "top",
        BannerPosition::Bottom => "bottom",
    };
    let background = page
        .color(banner.background_color.as_deref())
        .unwrap_or_else(|| "#111827".to_string());
    let color = page
        .color(banner.text_color.as_deref())
        .unwrap_or_else(|| "#ffffff".to_string());

    let mut html = format!(
        "<div id=\"{}\" class=\"pc-cookies pc-cookies-{}\" role=\"region\" aria-label=\"Cookie consent\" style=\"background:{};color:{};\" hidden>",
        COOKIE_BANNER_ID,
        position,
        escape::attr(&background),
        escape::attr(&color)
    );
    html.push_str(&format!("<span class=\"pc-cookies-text\">{}</span>", escape::html(&banner.text)));
    if let Some(policy) = banner.policy_url.as_deref().and_then(escape::url) {
        html.push_str(&format!(
            "<a class=\"pc-cookies-policy\" href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\" style=\"color:inherit;\">{}</a>",
            escape::attr(&policy),
            escape::html(banner.policy_label.as_deref().unwrap_or("Privacy policy"))
        ));
    }
    html.push_str(&format!(
        "<button type=\"button\" data-pc-accept style=\"background:var(--pc-theme);color:#fff;\">{}</button>",
        escape::html(&banner.accept_label)
    ));
    if let Some(decline) = banner.decline_label.as_deref() {
        html.push_str(&format!(
            "<button type=\"button\" data-pc-decline style=\"background:transparent;color:inherit;border:1px solid currentColor;\">{}</button>",
            escape::html(decline)
        ));
    }
    html.push_str("</div>");
    html.push_str(&scripts::enqueue(
        "cookies",
        &CookieConfig {
            el: COOKIE_BANNER_ID,
            key: COOKIE_STORAGE_KEY,
        },
    ));
    Some(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::CompileOptions;
    use pagecraft_model::PageDocument;

    fn assemble_doc(doc: &PageDocument, body: Body) -> String {
        let options = CompileOptions::default();
        assemble(&PageContext::new(doc, &options), body)
    }

    #[test]
    fn test_empty_document_has_no_runtime() {
        let html = assemble_doc(&PageDocument::default(), Body::default());
        assert!(html.starts_with("<!DOCTYPE html>\n<html lang=\"en\">"));
        assert!(html.contains("<title>Untitled page</title>"));
        assert!(!html.contains("data-pagecraft-runtime"));
        assert!(html.ends_with("</body>\n</html>\n"));
    }

    #[test]
    fn test_custom_css_cannot_close_style() {
        let mut doc = PageDocument::default();
        doc.styles.custom_css = Some("h1{color:red}</STYLE><script>alert(1)</script>".to_string());
        let html = assemble_doc(&doc, Body::default());
        assert!(html.contains("h1{color:red}<\\/style><script>alert(1)</script>"));
        assert_eq!(html.matches("</style>").count(), 2);
    }

    #[test]
    fn test_cookie_banner_is_last_and_pulls_its_script() {
        let mut doc = PageDocument::default();
        doc.cookie_banner.enabled = true;
        doc.cookie_banner.decline_label = Some("No thanks".to_string());
        let body = Body {
            flow: "<p id=\"content\">hi</p>".to_string(),
            overlays: vec!["<a id=\"floating\"></a>".to_string()],
            scripts: ScriptSet::new(),
        };
        let html = assemble_doc(&doc, body);
        let content = html.find("id=\"content\"").unwrap();
        let runtime = html.find("data-pagecraft-runtime").unwrap();
        let floating = html.find("id=\"floating\"").unwrap();
        let banner = html.find("id=\"pagecraft-cookies\"").unwrap();
        assert!(content < runtime && runtime < floating && floating < banner);
        assert!(html.contains("pagecraft.register(\"cookies\""));
        assert!(html.contains("data-pc-decline"));
        assert!(html.contains("\"key\":\"pagecraft:cookies\""));
    }

    #[test]
    fn test_tracking_snippets_are_gated() {
        let mut doc = PageDocument::default();
        doc.meta.tracking.google_analytics.id = Some("G-ABC123".to_string());
        let html = assemble_doc(&doc, Body::default());
        assert!(!html.contains("G-ABC123"));

        doc.meta.tracking.google_analytics.enabled = true;
        let html = assemble_doc(&doc, Body::default());
        assert!(html.contains("gtag('config','G-ABC123')"));
        assert!(!html.contains("fbq("));
    }

    #[test]
    fn test_theme_variables() {
        let mut doc = PageDocument::default();
        doc.styles.theme_color = "#ff6600".to_string();
        doc.styles.background_color = Some("$theme.primary".to_string());
        let html = assemble_doc(&doc, Body::default());
        assert!(html.contains(":root{--pc-theme:#ff6600;"));
        assert!(html.contains("background-color:#ff6600;"));
    }

    #[test]
    fn test_head_metadata() {
        let mut doc = PageDocument::default();
        doc.meta.title = "Spring <sale>".to_string();
        doc.meta.description = Some("Save \"big\"".to_string());
        doc.meta.keywords = vec!["shoes".to_string(), " ".to_string(), "sale".to_string()];
        doc.meta.favicon = Some("javascript:alert(1)".to_string());
        let html = assemble_doc(&doc, Body::default());
        assert!(html.contains("<title>Spring &lt;sale&gt;</title>"));
        assert!(html.contains("content=\"Save &quot;big&quot;\""));
        assert!(html.contains("<meta name=\"keywords\" content=\"shoes, sale\">"));
        assert!(!html.contains("rel=\"icon\""));
    }

    #[test]
    fn test_lang_borrows_from_the_document() {
        let mut doc = PageDocument::default();
        doc.meta.lang = " pt-BR ".to_string();
        let options = CompileOptions::default();
        // the result outlives the context it was read through
        let resolved = {
            let page = PageContext::new(&doc, &options);
            lang(&page)
        };
        assert_eq!(resolved, "pt-BR");

        doc.meta.lang = "  ".to_string();
        assert_eq!(lang(&PageContext::new(&doc, &options)), "en");
    }
}
