use crate::models::settings::GridSettings;
use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

const SETTINGS_FILE: &str = "grid.toml";

/// Loads and stores [`GridSettings`] as a TOML file
pub struct SettingsService {
    path: PathBuf,
}

impl SettingsService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Service backed by the per-user config directory, falling back to the
    /// working directory when no home directory can be resolved.
    pub fn from_default_location() -> Self {
        Self::new(Self::default_path())
    }

    pub fn default_path() -> PathBuf {
        match ProjectDirs::from("com", "KenBoyle", "ClinicScheduler") {
            Some(dirs) => dirs.config_dir().join(SETTINGS_FILE),
            None => PathBuf::from(SETTINGS_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings. A missing file yields defaults; a present but invalid
    /// file is an error so the caller can decide whether to overwrite it.
    pub fn load(&self) -> Result<GridSettings> {
        if !self.path.exists() {
            log::info!(
                "No settings file at {}, using defaults",
                self.path.display()
            );
            return Ok(GridSettings::default());
        }

        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let settings: GridSettings = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse {}", self.path.display()))?;
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings: {}", e))?;

        Ok(settings)
    }

    pub fn save(&self, settings: &GridSettings) -> Result<()> {
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings: {}", e))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create config directory {}", parent.display())
                })?;
            }
        }

        let serialized = toml::to_string_pretty(settings).context("Failed to serialize settings")?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;

        log::info!("Saved grid settings to {}", self.path.display());
        Ok(())
    }

    /// Load settings, logging and falling back to defaults on any error
    pub fn load_or_default(&self) -> GridSettings {
        match self.load() {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Failed to load settings: {:#}, using defaults", e);
                GridSettings::default()
            }
        }
    }

    /// Reset settings to defaults
    pub fn reset(&self) -> Result<()> {
        self.save(&GridSettings::default())
    }
}
