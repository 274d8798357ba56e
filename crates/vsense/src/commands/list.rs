use super::open_store;
use std::fmt::Write;
use vsense_core::{format_count, format_duration, MetricName, Platform, VideoRecord};
use vsense_store::VideoStore;

fn metrics_line(record: &VideoRecord) -> String {
    MetricName::ALL
        .iter()
        .filter_map(|&name| {
            record
                .metrics
                .get(name)
                .map(|value| format!("{} {}", format_count(value), name.as_str()))
        })
        .collect::<Vec<_>>()
        .join(" · ")
}

fn render(records: &[VideoRecord]) -> String {
    let mut out = String::new();
    for record in records {
        let title = if record.title.is_empty() {
            "(untitled)"
        } else {
            &record.title
        };
        let _ = writeln!(out, "[{}] {}", record.platform.display_name(), title);
        if !record.author.is_empty() {
            let _ = writeln!(out, "    by {}", record.author);
        }
        let _ = writeln!(out, "    {}", record.url);

        let metrics = metrics_line(record);
        if !metrics.is_empty() {
            let _ = writeln!(out, "    {}", metrics);
        }
        let _ = writeln!(
            out,
            "    saved {} · watched {}",
            record.saved_at.format("%Y-%m-%d %H:%M"),
            format_duration(record.watch_duration)
        );
    }
    out
}

/// Newest-first listing, optionally narrowed to one platform
pub fn list_records(
    store: &dyn VideoStore,
    platform: Option<Platform>,
    limit: Option<usize>,
) -> anyhow::Result<Vec<VideoRecord>> {
    let records = match platform {
        Some(platform) => store.by_platform(platform)?,
        None => store.get_all()?,
    };
    Ok(records.into_iter().take(limit.unwrap_or(usize::MAX)).collect())
}

pub fn run(platform: Option<&str>, limit: Option<usize>) -> anyhow::Result<()> {
    let platform = platform
        .map(|p| p.parse::<Platform>())
        .transpose()
        .map_err(anyhow::Error::msg)?;

    let store = open_store()?;
    let records = list_records(&store, platform, limit)?;

    if records.is_empty() {
        println!("No saved videos yet.");
        return Ok(());
    }

    println!("Saved Videos ({})", records.len());
    println!("============");
    print!("{}", render(&records));
    Ok(())
}
