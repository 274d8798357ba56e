//! Fallback cascades and per-field extraction

use crate::locate::{Locate, PageView};
use std::sync::Arc;
use tracing::debug;
use vsense_core::{parse_metric, MetricName, Metrics, Platform, RecordDraft};

/// Ordered locators; the first non-blank result wins
#[derive(Clone, Default)]
pub struct Cascade {
    steps: Vec<Arc<dyn Locate>>,
    fallback: Option<String>,
}

impl Cascade {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, step: impl Locate + 'static) -> Self {
        self.steps.push(Arc::new(step));
        self
    }

    /// Value used when every step misses
    pub fn or(mut self, fallback: &str) -> Self {
        self.fallback = Some(fallback.to_string());
        self
    }
}

impl Locate for Cascade {
    fn locate(&self, view: &PageView<'_>) -> Option<String> {
        self.steps
            .iter()
            .filter_map(|step| step.locate(view))
            .find(|value| !value.trim().is_empty())
            .or_else(|| self.fallback.clone())
    }
}

/// Unprocessed field values read from a page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFields {
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub music: Option<String>,
    pub thumbnail: Option<String>,
    pub metrics: Metrics,
}

impl RawFields {
    pub fn into_draft(self, platform: Platform, url: &str, watch_duration: u64) -> RecordDraft {
        RecordDraft {
            platform,
            url: url.to_string(),
            title: self.title,
            author: self.author,
            thumbnail: self.thumbnail,
            metrics: self.metrics,
            watch_duration,
            description: self.description,
            music: self.music,
        }
    }
}

/// One cascade per record field
#[derive(Clone, Default)]
pub struct ExtractionStrategy {
    pub title: Cascade,
    pub author: Cascade,
    pub description: Cascade,
    pub music: Cascade,
    pub thumbnail: Cascade,
    /// Metrics without an entry stay `None`
    pub metrics: Vec<(MetricName, Cascade)>,
}

impl ExtractionStrategy {
    pub fn metric(mut self, name: MetricName, cascade: Cascade) -> Self {
        self.metrics.push((name, cascade));
        self
    }

    pub fn extract(&self, view: &PageView<'_>) -> RawFields {
        let mut metrics = Metrics::default();
        for (name, cascade) in &self.metrics {
            let value = cascade.locate(view).and_then(|text| parse_metric(&text));
            if value.is_none() {
                debug!(metric = name.as_str(), context = %view.context.id, "metric not found");
            }
            metrics.set(*name, value);
        }

        let fields = RawFields {
            title: self.title.locate(view),
            author: self.author.locate(view),
            description: self.description.locate(view),
            music: self.music.locate(view),
            thumbnail: self.thumbnail.locate(view),
            metrics,
        };

        debug!(
            context = %view.context.id,
            has_title = fields.title.is_some(),
            has_author = fields.author.is_some(),
            has_thumbnail = fields.thumbnail.is_some(),
            "extracted fields"
        );
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::fixture::StaticDocument;
    use crate::locate::{text, Derived};
    use crate::platform::VideoContext;

    fn ctx(doc: &StaticDocument) -> VideoContext {
        VideoContext::at_location(Platform::Youtube, &doc.location())
    }

    #[test]
    fn test_cascade_first_non_blank_wins() {
        let doc = StaticDocument::new("https://www.youtube.com/watch?v=abc");
        doc.add("#title h1", "   ");
        doc.add(".second", "Second");
        doc.add(".third", "Third");
        let ctx = ctx(&doc);

        let cascade = Cascade::new()
            .then(text(".missing"))
            .then(text("#title h1"))
            .then(text(".second"))
            .then(text(".third"));

        assert_eq!(cascade.locate(&PageView::new(&doc, &ctx)).as_deref(), Some("Second"));
    }

    #[test]
    fn test_cascade_fallback() {
        let doc = StaticDocument::new("https://www.youtube.com/watch?v=abc");
        let ctx = ctx(&doc);

        let cascade = Cascade::new().then(text(".missing")).or("Unknown");
        assert_eq!(cascade.locate(&PageView::new(&doc, &ctx)).as_deref(), Some("Unknown"));
        assert_eq!(Cascade::new().locate(&PageView::new(&doc, &ctx)), None);
    }

    #[test]
    fn test_derived_blank_is_skipped() {
        let doc = StaticDocument::new("https://www.youtube.com/watch?v=abc");
        let ctx = ctx(&doc);

        let cascade = Cascade::new()
            .then(Derived(|_| Some(String::new())))
            .then(Derived(|view| Some(view.context.location.clone())));
        assert_eq!(
            cascade.locate(&PageView::new(&doc, &ctx)).as_deref(),
            Some("https://www.youtube.com/watch?v=abc")
        );
    }

    #[test]
    fn test_extract_parses_metrics() {
        let doc = StaticDocument::new("https://www.youtube.com/watch?v=abc");
        doc.add(".views", "1.2M views");
        doc.add(".likes", "likes");
        let ctx = ctx(&doc);

        let strategy = ExtractionStrategy {
            title: Cascade::new().then(text(".title")).or("Untitled"),
            ..Default::default()
        }
        .metric(MetricName::Views, Cascade::new().then(text(".views")))
        .metric(MetricName::Likes, Cascade::new().then(text(".likes")));

        let fields = strategy.extract(&PageView::new(&doc, &ctx));
        assert_eq!(fields.title.as_deref(), Some("Untitled"));
        assert_eq!(fields.author, None);
        assert_eq!(fields.metrics.views, Some(1_200_000));
        assert_eq!(fields.metrics.likes, None);
        assert_eq!(fields.metrics.comments, None);
    }

    #[test]
    fn test_into_draft_carries_watch_time() {
        let fields = RawFields {
            title: Some("Foo".to_string()),
            ..Default::default()
        };
        let draft = fields.into_draft(Platform::Instagram, "https://www.instagram.com/reel/1/", 12);
        assert_eq!(draft.platform, Platform::Instagram);
        assert_eq!(draft.watch_duration, 12);
        assert_eq!(draft.title.as_deref(), Some("Foo"));
    }
}
