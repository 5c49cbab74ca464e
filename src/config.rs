use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::endpoint::{DEFAULT_ORIGIN, PageLocation};

/// Environment variable that overrides the configured origin
pub const ORIGIN_ENV: &str = "DOCS2MD_ORIGIN";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Origin the client behaves as if it were served from
    pub origin: Option<String>,
    /// Copy the Markdown to the clipboard after every successful conversion
    pub copy_on_success: Option<bool>,
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let base = dirs::config_dir().context("Could not determine config directory")?;
        Ok(base.join("docs2md"))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load config from file, or return default if not found
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {:?}", path))?;
            let config: Config =
                toml::from_str(&content).with_context(|| "Failed to parse config file")?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save config to file, readable only by the owner
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        let dir = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Config path has no parent directory"))?;

        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create config directory {:?}", dir))?;

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, &content)
            .with_context(|| format!("Failed to write config to {:?}", path))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(path, perms)
                .with_context(|| "Failed to set config file permissions")?;
        }

        Ok(())
    }

    /// Origin to use: explicit override, then environment, then file, then default
    pub fn resolve_origin(&self, cli_origin: Option<&str>) -> String {
        cli_origin
            .map(str::to_string)
            .or_else(|| std::env::var(ORIGIN_ENV).ok())
            .or_else(|| self.origin.clone())
            .filter(|o| !o.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ORIGIN.to_string())
    }

    pub fn location(&self, cli_origin: Option<&str>) -> Result<PageLocation> {
        let origin = self.resolve_origin(cli_origin);
        PageLocation::parse(&origin).with_context(|| format!("Bad origin {:?}", origin))
    }

    pub fn copy_on_success(&self) -> bool {
        self.copy_on_success.unwrap_or(false)
    }
}
