//! Application settings management
//!
//! Stores non-sensitive configuration in a plain JSON file. The master key
//! itself never goes here.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Result, VaultError};
use crate::key_manager::KeyIdentity;

/// Which secret store to use for the master key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// Use the OS keychain when it accepts writes, otherwise no persistence
    #[default]
    Auto,
    /// Require the OS keychain
    Keychain,
    /// Never persist the master key
    None,
}

impl std::str::FromStr for StoreBackend {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "auto" => Ok(StoreBackend::Auto),
            "keychain" => Ok(StoreBackend::Keychain),
            "none" => Ok(StoreBackend::None),
            other => Err(VaultError::Encoding(format!("Unknown store backend: {}", other))),
        }
    }
}

/// Application settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Settings file version
    pub version: u32,
    /// Service identifier of the master key entry
    pub key_service: String,
    /// Account identifier of the master key entry
    pub key_account: String,
    /// Secret store selection
    pub store_backend: StoreBackend,
}

impl Default for Settings {
    fn default() -> Self {
        let identity = KeyIdentity::default();
        Self {
            version: 1,
            key_service: identity.service,
            key_account: identity.account,
            store_backend: StoreBackend::Auto,
        }
    }
}

impl Settings {
    /// The (service, account) pair addressing the master key
    pub fn key_identity(&self) -> KeyIdentity {
        KeyIdentity::new(self.key_service.clone(), self.key_account.clone())
    }
}

/// Settings manager
pub struct SettingsManager {
    settings_file: PathBuf,
    settings: Settings,
}

impl SettingsManager {
    /// Create a new settings manager
    pub fn new(config_dir: &Path) -> Self {
        let settings_file = config_dir.join("settings.json");
        let settings = Self::load_from_file(&settings_file).unwrap_or_default();

        Self {
            settings_file,
            settings,
        }
    }

    /// Get the default configuration directory
    pub fn default_dir() -> Result<PathBuf> {
        ProjectDirs::from("org", "credvault", "credvault")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or_else(|| VaultError::Config("Could not determine config directory".to_string()))
    }

    /// Load settings from file
    fn load_from_file(path: &Path) -> Result<Settings> {
        if !path.exists() {
            debug!("No settings file found, using defaults");
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&contents)?;
        debug!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Save settings to file
    pub async fn save(&self) -> Result<()> {
        if let Some(parent) = self.settings_file.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let contents = serde_json::to_string_pretty(&self.settings)?;

        // Write atomically using temp file
        let temp_path = self.settings_file.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents).await?;
        tokio::fs::rename(&temp_path, &self.settings_file).await?;

        debug!("Saved settings to {:?}", self.settings_file);
        Ok(())
    }

    /// Get current settings
    pub fn get(&self) -> &Settings {
        &self.settings
    }

    /// Get mutable settings
    pub fn get_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Update settings and save
    pub async fn update(&mut self, settings: Settings) -> Result<()> {
        self.settings = settings;
        self.save().await
    }

    /// Reset settings to defaults and delete settings file
    pub async fn reset(&mut self) -> Result<()> {
        self.settings = Settings::default();

        if self.settings_file.exists() {
            tokio::fs::remove_file(&self.settings_file).await?;
        }

        Ok(())
    }

    pub fn settings_file(&self) -> &Path {
        &self.settings_file
    }
}
