use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

use crate::models::settings::Settings;

const CONFIG_FILE_NAME: &str = "config.toml";
const EVENTS_FILE_NAME: &str = "events.json";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "Morrow", "morrow")
}

/// Reads and writes `config.toml`.
pub struct SettingsService {
    path: PathBuf,
}

impl SettingsService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Service for the platform config directory, falling back to the
    /// current directory when none can be resolved.
    pub fn at_default_location() -> Self {
        let path = match project_dirs() {
            Some(dirs) => dirs.config_dir().join(CONFIG_FILE_NAME),
            None => {
                log::warn!("Unable to resolve project directory; using current dir for config");
                PathBuf::from(CONFIG_FILE_NAME)
            }
        };
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the current settings. A missing file yields the defaults.
    pub fn get(&self) -> Result<Settings> {
        if !self.path.exists() {
            log::debug!("No config at {}; using defaults", self.path.display());
            return Ok(Settings::default());
        }

        let data = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read config from {}", self.path.display()))?;
        let settings: Settings = toml::from_str(&data)
            .with_context(|| format!("Failed to parse config {}", self.path.display()))?;
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings in {}: {}", self.path.display(), e))?;

        Ok(settings)
    }

    /// Update settings
    pub fn update(&self, settings: &Settings) -> Result<()> {
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings: {}", e))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create dir {}", parent.display()))?;
        }

        let data = toml::to_string_pretty(settings).context("Failed to serialize settings")?;
        fs::write(&self.path, data)
            .with_context(|| format!("Failed to write config to {}", self.path.display()))?;
        Ok(())
    }

    /// Reset settings to defaults
    pub fn reset(&self) -> Result<()> {
        self.update(&Settings::default())
    }
}

/// Where the event file lives: the configured path, else the platform data
/// directory, else the current directory.
pub fn resolve_data_file(settings: &Settings) -> PathBuf {
    if let Some(path) = &settings.data_file {
        return path.clone();
    }

    match project_dirs() {
        Some(dirs) => dirs.data_dir().join(EVENTS_FILE_NAME),
        None => {
            log::warn!("Unable to resolve project directory; using current dir for events");
            PathBuf::from(EVENTS_FILE_NAME)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::EventFilter;

    fn service_in(dir: &tempfile::TempDir) -> SettingsService {
        SettingsService::new(dir.path().join("conf").join(CONFIG_FILE_NAME))
    }

    #[test]
    fn test_get_default_settings() {
        let dir = tempfile::tempdir().unwrap();
        let settings = service_in(&dir).get().unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_update_settings() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(&dir);

        let mut settings = service.get().unwrap();
        settings.default_filter = EventFilter::Ended;
        settings.tick_interval_ms = 500;
        service.update(&settings).unwrap();

        let updated = service.get().unwrap();
        assert_eq!(updated.default_filter, EventFilter::Ended);
        assert_eq!(updated.tick_interval_ms, 500);
    }

    #[test]
    fn test_update_invalid_settings() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(&dir);

        let settings = Settings {
            tick_interval_ms: 1,
            ..Settings::default()
        };
        assert!(service.update(&settings).is_err());
        assert!(!service.path().exists());
    }

    #[test]
    fn test_invalid_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(&dir);
        fs::create_dir_all(service.path().parent().unwrap()).unwrap();
        fs::write(service.path(), "tick_interval_ms = \"fast\"").unwrap();

        let err = service.get().unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config"));
    }

    #[test]
    fn test_reset() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(&dir);
        service
            .update(&Settings {
                log_level: "debug".to_string(),
                ..Settings::default()
            })
            .unwrap();

        service.reset().unwrap();
        assert_eq!(service.get().unwrap().log_level, "info");
    }

    #[test]
    fn test_configured_data_file_wins() {
        let settings = Settings {
            data_file: Some(PathBuf::from("/tmp/morrow/events.json")),
            ..Settings::default()
        };
        assert_eq!(resolve_data_file(&settings), PathBuf::from("/tmp/morrow/events.json"));
        assert!(resolve_data_file(&Settings::default()).ends_with(EVENTS_FILE_NAME));
    }
}
