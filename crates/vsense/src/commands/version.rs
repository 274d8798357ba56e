pub fn run() -> anyhow::Result<()> {
    println!("vsense {}", env!("CARGO_PKG_VERSION"));
    println!("Save short-form videos with their engagement metrics");
    Ok(())
}
