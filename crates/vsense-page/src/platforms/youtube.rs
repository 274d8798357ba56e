//! YouTube watch pages and Shorts

use crate::document::{Document, ElementRef};
use crate::locate::{attr, document_title, text, Derived, PageView};
use crate::platform::{host_is, PlatformAdapter, VideoContext};
use crate::strategy::{Cascade, ExtractionStrategy};
use url::Url;
use vsense_core::{MetricName, Platform};

const WATCH_MARKER: &str = "/watch?v=";
const SHORTS_MARKER: &str = "/shorts/";

const SHORTS_CONTAINERS: &[&str] = &["#shorts-player", "ytd-reel-video-renderer[is-active]"];
const WATCH_CONTAINERS: &[&str] = &["#movie_player", ".html5-video-player"];

pub struct YoutubeAdapter {
    watch: ExtractionStrategy,
    shorts: ExtractionStrategy,
}

impl YoutubeAdapter {
    pub fn new() -> Self {
        Self {
            watch: watch_strategy(),
            shorts: shorts_strategy(),
        }
    }

    fn is_shorts(location: &str) -> bool {
        location.contains(SHORTS_MARKER)
    }
}

impl Default for YoutubeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformAdapter for YoutubeAdapter {
    fn platform(&self) -> Platform {
        Platform::Youtube
    }

    fn matches(&self, url: &Url) -> bool {
        host_is(url, "youtube.com")
    }

    fn resolve(&self, doc: &dyn Document) -> Option<VideoContext> {
        let location = doc.location();
        if location.contains(WATCH_MARKER) || Self::is_shorts(&location) {
            Some(VideoContext::at_location(Platform::Youtube, &location))
        } else {
            None
        }
    }

    fn locate_container(&self, doc: &dyn Document, ctx: &VideoContext) -> Option<ElementRef> {
        let candidates = if Self::is_shorts(&ctx.location) {
            SHORTS_CONTAINERS
        } else {
            WATCH_CONTAINERS
        };
        candidates
            .iter()
            .find_map(|selector| doc.query(None, selector))
    }

    fn strategy(&self, ctx: &VideoContext) -> &ExtractionStrategy {
        if Self::is_shorts(&ctx.location) {
            &self.shorts
        } else {
            &self.watch
        }
    }
}

/// `maxresdefault` still for the `v` query parameter
fn thumbnail_from_video_id(view: &PageView<'_>) -> Option<String> {
    let url = Url::parse(&view.context.location).ok()?;
    let id = url
        .query_pairs()
        .find(|(key, _)| key == "v")
        .map(|(_, value)| value.into_owned())
        .filter(|id| !id.is_empty())?;
    Some(format!("https://i.ytimg.com/vi/{}/maxresdefault.jpg", id))
}

fn watch_strategy() -> ExtractionStrategy {
    ExtractionStrategy {
        title: Cascade::new()
            .then(text("h1.ytd-video-primary-info-renderer"))
            .then(text("yt-formatted-string.ytd-watch-metadata"))
            .then(text("#title h1"))
            .then(document_title(" - YouTube")),
        author: Cascade::new()
            .then(text("ytd-channel-name a"))
            .then(text("#owner-name a"))
            .then(text("#channel-name a"))
            .or("Unknown"),
        description: Cascade::new()
            .then(text("#description yt-formatted-string"))
            .then(text("#description-inline-expander yt-formatted-string"))
            .then(text("ytd-text-inline-expander #plain-snippet-text")),
        music: Cascade::new().then(text("ytd-music-description-shelf-renderer .content")),
        thumbnail: Cascade::new().then(Derived(thumbnail_from_video_id)),
        metrics: Vec::new(),
    }
    .metric(
        MetricName::Views,
        Cascade::new()
            .then(text("ytd-video-view-count-renderer"))
            .then(text(".view-count"))
            .then(text("#info-text")),
    )
    .metric(
        MetricName::Likes,
        Cascade::new()
            .then(attr(
                "#top-level-buttons-computed button[aria-label*=\"like\"]",
                "aria-label",
            ))
            .then(attr(
                "yt-formatted-string.ytd-toggle-button-renderer#text",
                "aria-label",
            ))
            .then(attr("#segmented-like-button button", "aria-label")),
    )
    .metric(
        MetricName::Comments,
        Cascade::new()
            .then(text("#count .count-text"))
            .then(text("ytd-comments-header-renderer #count")),
    )
}

fn shorts_strategy() -> ExtractionStrategy {
    ExtractionStrategy {
        title: Cascade::new()
            .then(text("#shorts-player h2.title"))
            .then(text("ytd-reel-video-renderer[is-active] h2"))
            .or("YouTube Short"),
        author: Cascade::new()
            .then(text("#shorts-player #channel-name a"))
            .then(text("ytd-reel-video-renderer[is-active] #channel-name"))
            .or("Unknown"),
        description: Cascade::new()
            .then(text("#description-text"))
            .then(text("ytd-reel-video-renderer[is-active] #description")),
        music: Cascade::new()
            .then(text("ytd-reel-player-overlay-renderer #attribution a"))
            .then(text("#music-title")),
        thumbnail: Cascade::new().then(attr("ytd-reel-video-renderer[is-active] video", "poster")),
        metrics: Vec::new(),
    }
    .metric(MetricName::Likes, Cascade::new().then(text("#like-button span")))
    .metric(MetricName::Dislikes, Cascade::new().then(text("#dislike-button span")))
    .metric(MetricName::Comments, Cascade::new().then(text("#comments-button span")))
    .metric(MetricName::Shares, Cascade::new().then(text("#share-button span")))
}
