use super::load_config;
use std::path::Path;
use tracing::debug;
use vsense_core::{Config, RecordBuilder, VideoRecord};
use vsense_page::{Document, PlatformRegistry, StaticDocument};

/// Record the current page would be saved as, without touching the store
pub fn inspect_document(
    doc: &dyn Document,
    config: &Config,
    watched: u64,
) -> anyhow::Result<VideoRecord> {
    let registry = PlatformRegistry::from_config(config);
    let location = doc.location();
    let adapter = registry
        .for_location(&location)
        .ok_or_else(|| anyhow::anyhow!("no enabled platform handles {}", location))?;

    let ctx = adapter
        .resolve(doc)
        .ok_or_else(|| anyhow::anyhow!("no watchable video on {}", location))?;
    debug!(id = %ctx.id, platform = %ctx.platform, "resolved video context");

    let fields = adapter.extract(doc, &ctx);
    let draft = fields.into_draft(ctx.platform, &ctx.id, watched);
    Ok(RecordBuilder::from_config(config).build(draft))
}

pub fn run(fixture: &str, watched: u64) -> anyhow::Result<()> {
    let config = load_config()?;
    let doc = StaticDocument::load_fixture(Path::new(fixture))?;
    let record = inspect_document(&doc, &config, watched)?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}
