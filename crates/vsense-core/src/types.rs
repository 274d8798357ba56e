//! Core types for saved video records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Platform a record was captured from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Youtube,
    Instagram,
    Linkedin,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Youtube, Platform::Instagram, Platform::Linkedin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Youtube => "youtube",
            Platform::Instagram => "instagram",
            Platform::Linkedin => "linkedin",
        }
    }

    /// Human-readable name used in notices and listings
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Youtube => "YouTube",
            Platform::Instagram => "Instagram",
            Platform::Linkedin => "LinkedIn",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "youtube" => Ok(Platform::Youtube),
            "instagram" => Ok(Platform::Instagram),
            "linkedin" => Ok(Platform::Linkedin),
            other => Err(format!("unknown platform: {other}")),
        }
    }
}

/// Engagement counters a platform may expose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    Views,
    Likes,
    Dislikes,
    Comments,
    Reposts,
    Shares,
}

impl MetricName {
    pub const ALL: [MetricName; 6] = [
        MetricName::Views,
        MetricName::Likes,
        MetricName::Dislikes,
        MetricName::Comments,
        MetricName::Reposts,
        MetricName::Shares,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::Views => "views",
            MetricName::Likes => "likes",
            MetricName::Dislikes => "dislikes",
            MetricName::Comments => "comments",
            MetricName::Reposts => "reposts",
            MetricName::Shares => "shares",
        }
    }
}

/// Metric values; `None` means unknown or unsupported, never zero
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    #[serde(default)]
    pub views: Option<u64>,
    #[serde(default)]
    pub likes: Option<u64>,
    #[serde(default)]
    pub dislikes: Option<u64>,
    #[serde(default)]
    pub comments: Option<u64>,
    #[serde(default)]
    pub reposts: Option<u64>,
    #[serde(default)]
    pub shares: Option<u64>,
}

impl Metrics {
    pub fn get(&self, name: MetricName) -> Option<u64> {
        match name {
            MetricName::Views => self.views,
            MetricName::Likes => self.likes,
            MetricName::Dislikes => self.dislikes,
            MetricName::Comments => self.comments,
            MetricName::Reposts => self.reposts,
            MetricName::Shares => self.shares,
        }
    }

    pub fn set(&mut self, name: MetricName, value: Option<u64>) {
        let slot = match name {
            MetricName::Views => &mut self.views,
            MetricName::Likes => &mut self.likes,
            MetricName::Dislikes => &mut self.dislikes,
            MetricName::Comments => &mut self.comments,
            MetricName::Reposts => &mut self.reposts,
            MetricName::Shares => &mut self.shares,
        };
        *slot = value;
    }

    pub fn is_empty(&self) -> bool {
        MetricName::ALL.iter().all(|&name| self.get(name).is_none())
    }
}

/// A saved video. Shape is identical across platforms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    pub id: String,
    pub url: String,
    pub platform: Platform,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub music: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    pub saved_at: DateTime<Utc>,
    /// Seconds of playback observed before saving
    #[serde(default)]
    pub watch_duration: u64,
    #[serde(default)]
    pub metrics: Metrics,
}
