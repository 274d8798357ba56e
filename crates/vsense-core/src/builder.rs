//! Normalized record assembly

use crate::config::Config;
use crate::text::{clean_text, truncate};
use crate::types::{Metrics, Platform, VideoRecord};
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

pub const TITLE_LIMIT: usize = 200;
pub const DESCRIPTION_LIMIT: usize = 500;

const ID_LEN: usize = 16;

/// Raw values gathered from a page before normalization
#[derive(Debug, Clone)]
pub struct RecordDraft {
    pub platform: Platform,
    pub url: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub thumbnail: Option<String>,
    pub metrics: Metrics,
    pub watch_duration: u64,
    pub description: Option<String>,
    pub music: Option<String>,
}

impl RecordDraft {
    pub fn new(platform: Platform, url: impl Into<String>) -> Self {
        Self {
            platform,
            url: url.into(),
            title: None,
            author: None,
            thumbnail: None,
            metrics: Metrics::default(),
            watch_duration: 0,
            description: None,
            music: None,
        }
    }
}

/// Builds records with the configured length caps
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    title_limit: usize,
    description_limit: usize,
}

impl RecordBuilder {
    pub fn new() -> Self {
        Self {
            title_limit: TITLE_LIMIT,
            description_limit: DESCRIPTION_LIMIT,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            title_limit: config.title_limit,
            description_limit: config.description_limit,
        }
    }

    pub fn build(&self, draft: RecordDraft) -> VideoRecord {
        self.build_at(draft, Utc::now())
    }

    /// Never fails: absent inputs become empty strings or `None`
    pub fn build_at(&self, draft: RecordDraft, saved_at: DateTime<Utc>) -> VideoRecord {
        let normalize =
            |value: Option<String>| value.as_deref().map(clean_text).unwrap_or_default();

        let title = truncate(&normalize(draft.title), self.title_limit);
        let description = truncate(&normalize(draft.description), self.description_limit);
        let thumbnail = draft
            .thumbnail
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        VideoRecord {
            id: record_id(&draft.url),
            url: draft.url,
            platform: draft.platform,
            title,
            author: normalize(draft.author),
            description,
            music: normalize(draft.music),
            thumbnail,
            saved_at,
            watch_duration: draft.watch_duration,
            metrics: draft.metrics,
        }
    }
}

impl Default for RecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Build with the default caps
pub fn build_record(draft: RecordDraft) -> VideoRecord {
    RecordBuilder::new().build(draft)
}

pub fn build_record_at(draft: RecordDraft, saved_at: DateTime<Utc>) -> VideoRecord {
    RecordBuilder::new().build_at(draft, saved_at)
}

/// Display key derived from the url (not used for de-duplication)
pub fn record_id(url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    let mut id: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
    id.truncate(ID_LEN);
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_long_title_truncated_with_ellipsis() {
        let mut draft = RecordDraft::new(Platform::Youtube, "https://www.youtube.com/watch?v=a");
        draft.title = Some("x".repeat(250));

        let record = build_record(draft);
        assert_eq!(record.title.chars().count(), 203);
        assert!(record.title.ends_with("..."));
    }

    #[test]
    fn test_missing_inputs_degrade() {
        let record = build_record(RecordDraft::new(Platform::Linkedin, ""));
        assert_eq!(record.title, "");
        assert_eq!(record.author, "");
        assert_eq!(record.description, "");
        assert_eq!(record.music, "");
        assert_eq!(record.thumbnail, None);
        assert!(record.metrics.is_empty());
        assert_eq!(record.watch_duration, 0);
        assert_eq!(record.id.len(), 16);
    }

    #[test]
    fn test_text_is_cleaned_and_description_capped() {
        let mut draft = RecordDraft::new(Platform::Instagram, "https://www.instagram.com/reel/1/");
        draft.author = Some("\n  some_creator \n".to_string());
        draft.description = Some(format!("  {}  ", "word ".repeat(200)));
        draft.thumbnail = Some("   ".to_string());

        let saved_at = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let record = RecordBuilder::new().build_at(draft, saved_at);

        assert_eq!(record.author, "some_creator");
        assert_eq!(record.description.chars().count(), 503);
        assert_eq!(record.thumbnail, None);
        assert_eq!(record.saved_at, saved_at);
    }

    #[test]
    fn test_record_id_is_stable() {
        let a = record_id("https://www.youtube.com/watch?v=a");
        let b = record_id("https://www.youtube.com/watch?v=b");
        assert_eq!(a, record_id("https://www.youtube.com/watch?v=a"));
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_builder_uses_config_limits() {
        let config = Config {
            title_limit: 5,
            ..Config::default()
        };
        let mut draft = RecordDraft::new(Platform::Youtube, "u");
        draft.title = Some("abcdefgh".to_string());

        let record = RecordBuilder::from_config(&config).build(draft);
        assert_eq!(record.title, "abcde...");
    }
}
