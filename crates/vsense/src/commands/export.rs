use super::open_store;
use std::path::Path;
use vsense_store::{atomic_write, VideoStore};

pub fn run(output: Option<&str>) -> anyhow::Result<()> {
    let store = open_store()?;
    let json = store.export_json()?;

    match output {
        Some(path) => {
            atomic_write(Path::new(path), json.as_bytes())?;
            let count = store.get_all()?.len();
            println!("Exported {} videos to {}", count, path);
        }
        None => println!("{}", json),
    }
    Ok(())
}
