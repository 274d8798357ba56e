//! Shared record model, metric parsing, and watch-time tracking

mod builder;
mod config;
mod error;
mod metrics;
mod text;
mod tracker;
mod types;

pub use builder::{
    build_record, build_record_at, record_id, RecordBuilder, RecordDraft, DESCRIPTION_LIMIT,
    TITLE_LIMIT,
};
pub use config::Config;
pub use error::ConfigError;
pub use metrics::parse_metric;
pub use text::{clean_text, format_count, format_duration, prefix, truncate};
pub use tracker::WatchTracker;
pub use types::{MetricName, Metrics, Platform, VideoRecord};
