use super::{length_or, link_attrs, root_attrs, ComponentRenderer, Fragment};
use crate::context::{Children, NodeContext, PageContext};
use crate::diagnostics::DiagnosticKind;
use crate::escape;
use pagecraft_model::props::{Image, Map, Video};
use regex::Regex;
use std::sync::OnceLock;

fn youtube_regex() -> &'static Regex {
    static YOUTUBE_REGEX: OnceLock<Regex> = OnceLock::new();
    YOUTUBE_REGEX.get_or_init(|| {
        Regex::new(r"(?:youtube(?:-nocookie)?\.com/(?:watch\?(?:[^#]*&)?v=|embed/|shorts/|live/)|youtu\.be/)([A-Za-z0-9_-]{6,20})")
            .expect("static regex")
    })
}

fn vimeo_regex() -> &'static Regex {
    static VIMEO_REGEX: OnceLock<Regex> = OnceLock::new();
    VIMEO_REGEX.get_or_init(|| Regex::new(r"vimeo\.com/(?:video/)?(\d+)").expect("static regex"))
}

/// Where a video URL points
#[derive(Debug, Clone, PartialEq, Eq)]
enum VideoSource {
    YouTube(String),
    Vimeo(String),
    File(String),
}

fn classify_video(url: &str) -> Option<VideoSource> {
    if let Some(caps) = youtube_regex().captures(url) {
        return Some(VideoSource::YouTube(caps[1].to_string()));
    }
    if let Some(caps) = vimeo_regex().captures(url) {
        return Some(VideoSource::Vimeo(caps[1].to_string()));
    }
    escape::url(url).map(VideoSource::File)
}

fn embed_query(video: &Video, youtube: bool) -> String {
    let mut params = Vec::new();
    if video.autoplay {
        params.push("autoplay=1");
    }
    if video.muted {
        params.push(if youtube { "mute=1" } else { "muted=1" });
    }
    if !video.controls {
        params.push("controls=0");
    }
    if params.is_empty() {
        String::new()
    } else {
        format!("?{}", params.join("&amp;"))
    }
}

impl ComponentRenderer for Image {
    fn render(&self, cx: &NodeContext, _children: &Children, page: &PageContext) -> Fragment {
        let Some(src) = self.src.as_deref().and_then(escape::url) else {
            return Fragment::warning(cx, page, DiagnosticKind::MissingRequired, "image needs a src");
        };
        let mut img_css = format!("width:{};max-width:100%;height:auto;", length_or(self.width.as_deref(), "100%"));
        if let Some(radius) = self.border_radius.as_deref().and_then(escape::css_value) {
            img_css.push_str(&format!("border-radius:{};", radius));
        }
        let img = format!(
            "<img src=\"{}\" alt=\"{}\" style=\"{}\" loading=\"lazy\">",
            escape::attr(&src),
            escape::attr(self.alt.as_deref().unwrap_or("")),
            escape::attr(&img_css)
        );

        let mut diagnostics = Vec::new();
        let content = if self.action.is_none() {
            img
        } else {
            let (attrs, problem) = link_attrs(cx, page, &self.action);
            diagnostics.extend(problem);
            format!("<a {}>{}</a>", attrs, img)
        };
        Fragment::flow(format!(
            "<figure {} style=\"margin:0;text-align:{};\">{}</figure>",
            root_attrs(cx, "pc-image"),
            self.align.as_css(),
            content
        ))
        .with_diagnostics(diagnostics)
    }
}

impl ComponentRenderer for Video {
    fn render(&self, cx: &NodeContext, _children: &Children, page: &PageContext) -> Fragment {
        let Some(url) = self.url.as_deref().filter(|u| !u.trim().is_empty()) else {
            return Fragment::warning(cx, page, DiagnosticKind::MissingRequired, "video needs a url");
        };
        let Some(source) = classify_video(url.trim()) else {
            return Fragment::warning(cx, page, DiagnosticKind::InvalidProps, format!("video url '{}' is not allowed", url));
        };

        let title = escape::attr(self.title.as_deref().unwrap_or("Video"));
        let player = match source {
            VideoSource::YouTube(id) => format!(
                "<iframe src=\"https://www.youtube.com/embed/{}{}\" title=\"{}\" allow=\"accelerometer; autoplay; encrypted-media; picture-in-picture\" allowfullscreen loading=\"lazy\"></iframe>",
                id,
                embed_query(self, true),
                title
            ),
            VideoSource::Vimeo(id) => format!(
                "<iframe src=\"https://player.vimeo.com/video/{}{}\" title=\"{}\" allow=\"autoplay; fullscreen; picture-in-picture\" allowfullscreen loading=\"lazy\"></iframe>",
                id,
                embed_query(self, false),
                title
            ),
            VideoSource::File(src) => {
                let mut flags = String::from(" playsinline");
                if self.controls {
                    flags.push_str(" controls");
                }
                if self.autoplay {
                    flags.push_str(" autoplay");
                }
                if self.muted {
                    flags.push_str(" muted");
                }
                format!("<video src=\"{}\" title=\"{}\"{}></video>", escape::attr(&src), title, flags)
            }
        };
        let ratio = length_or(Some(self.aspect_ratio.as_str()), "16/9");
        Fragment::flow(format!(
            "<div {} style=\"aspect-ratio:{};width:100%;\">{}</div>",
            root_attrs(cx, "pc-video"),
            escape::attr(&ratio),
            player
        ))
    }
}

impl ComponentRenderer for Map {
    fn render(&self, cx: &NodeContext, _children: &Children, page: &PageContext) -> Fragment {
        let Some(address) = self.address.as_deref().map(str::trim).filter(|a| !a.is_empty()) else {
            return Fragment::warning(cx, page, DiagnosticKind::MissingRequired, "map needs an address");
        };
        let src = format!(
            "https://maps.google.com/maps?q={}&z={}&output=embed",
            urlencoding::encode(address),
            self.zoom.clamp(1, 21)
        );
        Fragment::flow(format!(
            "<div {}><iframe src=\"{}\" title=\"{}\" style=\"width:100%;height:{};border:0;\" loading=\"lazy\" referrerpolicy=\"no-referrer-when-downgrade\"></iframe></div>",
            root_attrs(cx, "pc-map"),
            escape::attr(&src),
            escape::attr(self.title.as_deref().unwrap_or(address)),
            escape::attr(&length_or(Some(self.height.as_str()), "320px"))
        ))
    }
}
