use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub navigation: NavigatorConfig,
    #[serde(default)]
    pub demo: DemoConfig,
}

/// Behaviour knobs of the navigation controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigatorConfig {
    /// Tab a back press returns to before leaving the tab host
    #[serde(default)]
    pub home_tab: usize,

    /// Back press on the last screen asks the host to go to the system home
    #[serde(default = "default_exit_on_last_screen")]
    pub exit_on_last_screen: bool,

    /// Slot id for hosts built from this config (0 is invalid)
    #[serde(default = "default_slot")]
    pub default_slot: u32,
}

fn default_exit_on_last_screen() -> bool {
    true
}

fn default_slot() -> u32 {
    1
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            home_tab: 0,
            exit_on_last_screen: default_exit_on_last_screen(),
            default_slot: default_slot(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoConfig {
    #[serde(default = "default_tabs")]
    pub tabs: Vec<String>,
}

fn default_tabs() -> Vec<String> {
    ["First", "Second", "Third", "Fourth"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self { tabs: default_tabs() }
    }
}

impl Config {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("stacknav");
        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, falling back to defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        debug!("Loading config from: {:?}", config_path);

        if !config_path.exists() {
            info!("Config file doesn't exist, using defaults");
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        let config: Config = toml::from_str(&config_content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

        if config.navigation.default_slot == 0 {
            anyhow::bail!("navigation.default_slot must not be 0");
        }

        debug!("Loaded config with {} demo tabs", config.demo.tabs.len());
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        debug!("Saving config to: {:?}", config_path);

        if let Some(config_dir) = config_path.parent() {
            if !config_dir.exists() {
                fs::create_dir_all(config_dir)
                    .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;
                info!("Created config directory: {:?}", config_dir);
            }
        }

        let config_content =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(config_path, config_content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        info!("Config saved successfully");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert!(config.navigation.exit_on_last_screen);
        assert_eq!(config.demo.tabs.len(), 4);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[navigation]\nhome_tab = 2\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.navigation.home_tab, 2);
        assert_eq!(config.navigation.default_slot, 1);
        assert!(config.navigation.exit_on_last_screen);
    }

    #[test]
    fn test_zero_slot_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[navigation]\ndefault_slot = 0\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.navigation.exit_on_last_screen = false;
        config.demo.tabs = vec!["Home".to_string(), "Search".to_string()];

        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }
}
