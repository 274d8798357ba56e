//! Per-platform contract for detecting and reading a watchable video

use crate::document::{Document, ElementRef};
use crate::locate::PageView;
use crate::strategy::{ExtractionStrategy, RawFields};
use url::Url;
use vsense_core::Platform;

/// A watchable video as presented by the host page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoContext {
    /// Stable identifier; becomes the record url
    pub id: String,
    pub platform: Platform,
    /// `location.href` when the context was resolved
    pub location: String,
    /// Video element already picked out during detection
    pub video: Option<ElementRef>,
    /// Element that scoped selectors search under
    pub scope: Option<ElementRef>,
}

impl VideoContext {
    /// Context identified by the page location itself
    pub fn at_location(platform: Platform, location: &str) -> Self {
        Self {
            id: location.to_string(),
            platform,
            location: location.to_string(),
            video: None,
            scope: None,
        }
    }
}

/// Detection and extraction rules for one host platform
pub trait PlatformAdapter: Send + Sync {
    fn platform(&self) -> Platform;

    /// Whether this adapter handles pages at `url`
    fn matches(&self, url: &Url) -> bool;

    /// Current watchable context, if the page presents one
    fn resolve(&self, doc: &dyn Document) -> Option<VideoContext>;

    /// Whether `ctx` is still on the page when `resolve` finds nothing.
    /// A retained context keeps its control and watch time.
    fn retains(&self, _doc: &dyn Document, _ctx: &VideoContext) -> bool {
        false
    }

    /// Element the save control attaches to
    fn locate_container(&self, doc: &dyn Document, ctx: &VideoContext) -> Option<ElementRef>;

    /// Video the watch tracker follows
    fn locate_video(&self, doc: &dyn Document, ctx: &VideoContext) -> Option<ElementRef> {
        match ctx.video {
            Some(el) if doc.video(el).is_some() => Some(el),
            _ => doc.videos().first().map(|probe| probe.element),
        }
    }

    fn strategy(&self, ctx: &VideoContext) -> &ExtractionStrategy;

    /// Word used in notices ("Video saved!")
    fn noun(&self) -> &str {
        "Video"
    }

    fn extract(&self, doc: &dyn Document, ctx: &VideoContext) -> RawFields {
        self.strategy(ctx).extract(&PageView::new(doc, ctx))
    }
}

/// Host check shared by the adapters: exact domain or any subdomain of it
pub(crate) fn host_is(url: &Url, domain: &str) -> bool {
    url.host_str().is_some_and(|host| {
        host == domain
            || host
                .strip_suffix(domain)
                .is_some_and(|rest| rest.ends_with('.'))
    })
}
