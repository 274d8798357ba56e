//! LinkedIn feed and post videos.
//!
//! Several videos can share one feed url, so a context is keyed by the post
//! that encloses the visible video rather than by the location.

use crate::document::{Document, ElementRef, VideoProbe};
use crate::locate::{prefix_of, scoped_text, VideoPoster};
use crate::platform::{host_is, PlatformAdapter, VideoContext};
use crate::strategy::{Cascade, ExtractionStrategy};
use tracing::debug;
use url::Url;
use vsense_core::{Config, MetricName, Platform};

const VIDEO_MARKERS: &[&str] = &[
    "video[src*=\"linkedin\"]",
    ".feed-shared-video",
    "[data-test-id*=\"video\"]",
];
const POST_CONTAINERS: &[&str] = &["article", "[data-urn]", ".feed-shared-update-v2"];
const VIDEO_CONTAINERS: &[&str] = &[
    ".feed-shared-update-v2__content",
    ".feed-shared-video",
    "[data-test-id*=\"video\"]",
];
const PERMALINK: &str = "a[href*=\"/feed/update/\"]";

pub struct LinkedinAdapter {
    strategy: ExtractionStrategy,
}

impl LinkedinAdapter {
    pub fn new(caption_title_limit: usize) -> Self {
        Self {
            strategy: post_strategy(caption_title_limit),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.caption_title_limit)
    }

    /// First video fully in view whose metadata has loaded
    fn active_video(doc: &dyn Document) -> Option<VideoProbe> {
        doc.videos()
            .into_iter()
            .find(|probe| probe.in_viewport && probe.has_duration())
    }

    /// Post permalink, else the post urn, else something stable for the element
    fn identify(doc: &dyn Document, location: &str, video: &VideoProbe) -> String {
        let permalink = doc
            .closest(video.element, "article")
            .and_then(|article| doc.query_attr(Some(article), PERMALINK, "href"))
            .and_then(|href| absolutize(location, &href));
        if let Some(link) = permalink {
            return link;
        }

        let urn = doc
            .closest(video.element, "[data-urn]")
            .and_then(|post| doc.attr(post, "data-urn"))
            .filter(|urn| !urn.trim().is_empty());
        if let Some(urn) = urn {
            return format!("https://www.linkedin.com/feed/update/{}/", urn.trim());
        }

        match video.src.as_deref().filter(|src| !src.is_empty()) {
            Some(src) => format!("{}#{}", location, src),
            None => format!("{}#video-{}", location, video.element.0),
        }
    }
}

impl Default for LinkedinAdapter {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

fn absolutize(base: &str, href: &str) -> Option<String> {
    match Url::parse(href) {
        Ok(url) => Some(url.into()),
        Err(_) => Url::parse(base)
            .and_then(|base| base.join(href))
            .ok()
            .map(Into::into),
    }
}

impl PlatformAdapter for LinkedinAdapter {
    fn platform(&self) -> Platform {
        Platform::Linkedin
    }

    fn matches(&self, url: &Url) -> bool {
        host_is(url, "linkedin.com")
    }

    fn resolve(&self, doc: &dyn Document) -> Option<VideoContext> {
        if !VIDEO_MARKERS.iter().any(|marker| doc.exists(marker)) {
            return None;
        }
        let Some(video) = Self::active_video(doc) else {
            debug!("no playable video in view");
            return None;
        };

        let location = doc.location();
        let scope = POST_CONTAINERS
            .iter()
            .find_map(|selector| doc.closest(video.element, selector));

        Some(VideoContext {
            id: Self::identify(doc, &location, &video),
            platform: Platform::Linkedin,
            location,
            video: Some(video.element),
            scope,
        })
    }

    /// A post scrolled out of view stays current until its video leaves the DOM
    fn retains(&self, doc: &dyn Document, ctx: &VideoContext) -> bool {
        doc.location() == ctx.location
            && VIDEO_MARKERS.iter().any(|marker| doc.exists(marker))
            && ctx.video.is_some_and(|video| doc.video(video).is_some())
    }

    fn locate_container(&self, doc: &dyn Document, ctx: &VideoContext) -> Option<ElementRef> {
        let video = ctx.video?;
        VIDEO_CONTAINERS
            .iter()
            .find_map(|selector| doc.closest(video, selector))
            .or_else(|| doc.parent(video))
    }

    fn strategy(&self, _ctx: &VideoContext) -> &ExtractionStrategy {
        &self.strategy
    }
}

fn caption() -> Cascade {
    Cascade::new()
        .then(scoped_text(".feed-shared-text"))
        .then(scoped_text(".update-components-text"))
        .then(scoped_text("[data-test-id=\"main-feed-activity-card__commentary\"]"))
        .then(scoped_text(".break-words span[dir=\"ltr\"]"))
}

fn post_strategy(caption_title_limit: usize) -> ExtractionStrategy {
    ExtractionStrategy {
        title: Cascade::new()
            .then(prefix_of(caption(), caption_title_limit))
            .or("LinkedIn Video"),
        author: Cascade::new()
            .then(scoped_text(".update-components-actor__name"))
            .then(scoped_text(".feed-shared-actor__name"))
            .then(scoped_text("[data-test-id=\"post-author\"]"))
            .then(scoped_text(".update-components-actor__title"))
            .or("Unknown"),
        description: caption(),
        // no audio attribution on LinkedIn
        music: Cascade::new(),
        thumbnail: Cascade::new().then(VideoPoster),
        metrics: Vec::new(),
    }
    .metric(
        MetricName::Likes,
        Cascade::new()
            .then(scoped_text(".social-details-social-counts__reactions-count"))
            .then(scoped_text(".social-details-social-counts__count-value")),
    )
    .metric(
        MetricName::Comments,
        Cascade::new()
            .then(scoped_text(".social-details-social-counts__comments"))
            .then(scoped_text("[data-test-id=\"social-actions__comments\"]")),
    )
    .metric(
        MetricName::Reposts,
        Cascade::new()
            .then(scoped_text(".social-details-social-counts__item--reposts"))
            .then(scoped_text("[data-test-id=\"social-actions__reposts\"]")),
    )
    .metric(
        MetricName::Shares,
        Cascade::new().then(scoped_text(".social-details-social-counts__item--shares")),
    )
}
