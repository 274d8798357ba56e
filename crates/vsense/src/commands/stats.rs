use super::open_store;
use vsense_core::{format_duration, Platform, VideoRecord};
use vsense_store::VideoStore;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct PlatformStats {
    pub count: usize,
    pub watch_secs: u64,
}

/// Counts and watch time per platform, in [`Platform::ALL`] order
pub fn tally(records: &[VideoRecord]) -> Vec<(Platform, PlatformStats)> {
    Platform::ALL
        .iter()
        .map(|&platform| {
            let stats = records
                .iter()
                .filter(|r| r.platform == platform)
                .fold(PlatformStats::default(), |mut acc, r| {
                    acc.count += 1;
                    acc.watch_secs += r.watch_duration;
                    acc
                });
            (platform, stats)
        })
        .collect()
}

pub fn run() -> anyhow::Result<()> {
    let store = open_store()?;
    let records = store.get_all()?;

    println!("Saved Videos");
    println!("============");
    println!("Total: {}", records.len());
    for (platform, stats) in tally(&records) {
        println!(
            "  {:<10} {:>4}  watched {}",
            platform.display_name(),
            stats.count,
            format_duration(stats.watch_secs)
        );
    }
    Ok(())
}
