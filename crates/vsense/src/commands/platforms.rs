use std::path::Path;
use vsense_core::{Config, Platform};
use vsense_page::PlatformRegistry;
use vsense_store::{write_json, Paths};

fn set_platform_enabled(config_path: &Path, name: &str, enabled: bool) -> anyhow::Result<Config> {
    let platform: Platform = name.parse().map_err(anyhow::Error::msg)?;
    let mut config = Config::load(config_path)?;
    config.set_platform_enabled(platform, enabled);
    write_json(config_path, &config)?;
    Ok(config)
}

pub fn run_list() -> anyhow::Result<()> {
    let config = super::load_config()?;
    let registry = PlatformRegistry::from_config(&config);

    println!("Platforms");
    println!("=========");
    for platform in Platform::ALL {
        let status = if registry.get(platform).is_some() {
            "enabled"
        } else {
            "disabled"
        };
        println!("  {:<10} [{}]", platform.as_str(), status);
    }
    Ok(())
}

pub fn run_enable(name: &str) -> anyhow::Result<()> {
    let paths = Paths::new()?;
    set_platform_enabled(&paths.config_file(), name, true)?;
    println!("Enabled platform: {}", name);
    Ok(())
}

pub fn run_disable(name: &str) -> anyhow::Result<()> {
    let paths = Paths::new()?;
    set_platform_enabled(&paths.config_file(), name, false)?;
    println!("Disabled platform: {}", name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use vsense_store::HOME_ENV;

    #[test]
    #[serial]
    fn test_platforms_list() {
        let temp = tempfile::TempDir::new().unwrap();
        std::env::set_var(HOME_ENV, temp.path());

        assert!(run_list().is_ok());

        std::env::remove_var(HOME_ENV);
    }

    #[test]
    fn test_enable_disable_platform() {
        let temp = tempfile::TempDir::new().unwrap();
        let config_path = temp.path().join("config.json");

        set_platform_enabled(&config_path, "linkedin", false).unwrap();
        let config = Config::load(&config_path).unwrap();
        assert!(!config.is_platform_enabled(Platform::Linkedin));
        assert!(config.is_platform_enabled(Platform::Youtube));

        set_platform_enabled(&config_path, "LinkedIn", true).unwrap();
        let config = Config::load(&config_path).unwrap();
        assert!(config.is_platform_enabled(Platform::Linkedin));
    }

    #[test]
    fn test_unknown_platform_rejected() {
        let temp = tempfile::TempDir::new().unwrap();
        let config_path = temp.path().join("config.json");

        assert!(set_platform_enabled(&config_path, "tiktok", false).is_err());
        assert!(!config_path.exists());
    }
}
