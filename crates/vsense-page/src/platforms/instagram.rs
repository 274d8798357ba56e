//! Instagram Reels

use crate::document::{Document, ElementRef};
use crate::locate::{prefix_of, text, Derived, PageView, VideoPoster};
use crate::platform::{host_is, PlatformAdapter, VideoContext};
use crate::strategy::{Cascade, ExtractionStrategy};
use url::Url;
use vsense_core::{Config, MetricName, Platform};

const REEL_MARKERS: &[&str] = &["/reel/", "/reels/"];
const SIZED_BOX: &str = "div[style*=\"height\"]";

pub struct InstagramAdapter {
    strategy: ExtractionStrategy,
}

impl InstagramAdapter {
    pub fn new(caption_title_limit: usize) -> Self {
        Self {
            strategy: reel_strategy(caption_title_limit),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.caption_title_limit)
    }
}

impl Default for InstagramAdapter {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl PlatformAdapter for InstagramAdapter {
    fn platform(&self) -> Platform {
        Platform::Instagram
    }

    fn matches(&self, url: &Url) -> bool {
        host_is(url, "instagram.com")
    }

    fn resolve(&self, doc: &dyn Document) -> Option<VideoContext> {
        let location = doc.location();
        REEL_MARKERS
            .iter()
            .any(|marker| location.contains(marker))
            .then(|| VideoContext::at_location(Platform::Instagram, &location))
    }

    fn locate_container(&self, doc: &dyn Document, _ctx: &VideoContext) -> Option<ElementRef> {
        doc.query(None, "article[role=\"presentation\"] video")
            .and_then(|video| doc.closest(video, SIZED_BOX))
            .or_else(|| {
                doc.query(None, "div[role=\"dialog\"] video")
                    .and_then(|video| doc.parent(video))
            })
            .or_else(|| {
                doc.query(None, "video")
                    .and_then(|video| doc.closest(video, SIZED_BOX))
            })
    }

    fn strategy(&self, _ctx: &VideoContext) -> &ExtractionStrategy {
        &self.strategy
    }

    fn noun(&self) -> &str {
        "Reel"
    }
}

/// Text of the first profile link with the handle marker dropped
fn profile_link_text(view: &PageView<'_>) -> Option<String> {
    view.doc
        .query_text(None, "a[href*=\"/\"]")
        .map(|handle| handle.replace('@', ""))
}

fn caption() -> Cascade {
    Cascade::new()
        .then(text("article h1"))
        .then(text("article span[dir=\"auto\"]"))
        .then(text("[role=\"dialog\"] h1"))
        .then(text("._a9zs span"))
}

fn reel_strategy(caption_title_limit: usize) -> ExtractionStrategy {
    ExtractionStrategy {
        title: Cascade::new()
            .then(prefix_of(caption(), caption_title_limit))
            .or("Instagram Reel"),
        author: Cascade::new()
            .then(text("article header a[role=\"link\"]"))
            .then(text("article header span a"))
            .then(Derived(profile_link_text))
            .or("Unknown"),
        description: caption(),
        music: Cascade::new()
            .then(text("a[href*=\"/audio/\"]"))
            .then(text("[href*=\"/original-audio/\"]")),
        thumbnail: Cascade::new().then(VideoPoster),
        metrics: Vec::new(),
    }
    .metric(
        MetricName::Likes,
        Cascade::new()
            .then(text("section button[aria-label*=\"like\"] span"))
            .then(text("section span[aria-label*=\"like\"]"))
            .then(text("a[href*=\"/liked_by/\"] span")),
    )
    .metric(
        MetricName::Views,
        Cascade::new()
            .then(text("[aria-label*=\"views\"]"))
            .then(text("span._ac2a")),
    )
    .metric(
        MetricName::Comments,
        Cascade::new()
            .then(text("section button[aria-label*=\"comment\"] span"))
            .then(text("a[href*=\"/comments/\"] span")),
    )
    .metric(
        MetricName::Shares,
        Cascade::new().then(text("button[aria-label*=\"Share\"] span")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{StaticDocument, VideoState};

    #[test]
    fn test_resolve_reels_only() {
        let adapter = InstagramAdapter::default();
        let doc = StaticDocument::new("https://www.instagram.com/reel/C1abc/");
        assert_eq!(
            adapter.resolve(&doc).map(|ctx| ctx.id).as_deref(),
            Some("https://www.instagram.com/reel/C1abc/")
        );

        doc.set_location("https://www.instagram.com/reels/C2def/");
        assert!(adapter.resolve(&doc).is_some());

        doc.set_location("https://www.instagram.com/p/C3ghi/");
        assert!(adapter.resolve(&doc).is_none());
    }

    #[test]
    fn test_dialog_container_is_video_parent() {
        let adapter = InstagramAdapter::default();
        let doc = StaticDocument::new("https://www.instagram.com/reel/C1abc/");
        let dialog = doc.element("div[role=\"dialog\"]");
        let video = doc.add_video(Some(dialog), VideoState::default());
        doc.alias(video, "div[role=\"dialog\"] video");

        let ctx = adapter.resolve(&doc).unwrap();
        assert_eq!(adapter.locate_container(&doc, &ctx), Some(dialog));
    }

    #[test]
    fn test_title_from_caption_prefix() {
        let adapter = InstagramAdapter::new(10);
        let doc = StaticDocument::new("https://www.instagram.com/reel/C1abc/");
        doc.add("article h1", "A caption that runs long #reels");
        doc.add("a[href*=\"/\"]", "@someone");

        let ctx = adapter.resolve(&doc).unwrap();
        let fields = adapter.extract(&doc, &ctx);
        assert_eq!(fields.title.as_deref(), Some("A caption "));
        assert_eq!(fields.description.as_deref(), Some("A caption that runs long #reels"));
        assert_eq!(fields.author.as_deref(), Some("someone"));
        assert_eq!(adapter.noun(), "Reel");
    }

    #[test]
    fn test_title_fallback_without_caption() {
        let adapter = InstagramAdapter::default();
        let doc = StaticDocument::new("https://www.instagram.com/reel/C1abc/");
        let ctx = adapter.resolve(&doc).unwrap();

        let fields = adapter.extract(&doc, &ctx);
        assert_eq!(fields.title.as_deref(), Some("Instagram Reel"));
        assert_eq!(fields.author.as_deref(), Some("Unknown"));
        assert_eq!(fields.thumbnail, None);
    }
}
