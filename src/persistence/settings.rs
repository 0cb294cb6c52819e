use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// User settings stored in settings.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Interval between reminder evaluations
    pub tick_ms: u64,
    /// Tasks older than this are dropped when the list is read
    pub retention_days: i64,
    /// Choices offered by the completion prompt, in minutes
    pub snooze_options: Vec<u32>,
    pub sounds_enabled: bool,
    /// Directory holding warning/alarm sounds (defaults to <data dir>/sounds)
    pub sound_dir: Option<PathBuf>,
    /// Command used to play a sound file; probed from common players when unset
    pub sound_player: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_ms: crate::ticker::DEFAULT_TICK_MS,
            retention_days: 14,
            snooze_options: vec![5, 10, 15, 30],
            sounds_enabled: true,
            sound_dir: None,
            sound_player: None,
        }
    }
}

impl Settings {
    pub fn retention(&self) -> chrono::Duration {
        chrono::Duration::days(self.retention_days.max(0))
    }

    pub fn sound_dir_in(&self, data_dir: &Path) -> PathBuf {
        self.sound_dir
            .clone()
            .unwrap_or_else(|| data_dir.join("sounds"))
    }
}

/// Load settings, falling back to defaults when the file doesn't exist
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();

    if !path.exists() {
        return Ok(Settings::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings: {}", path.display()))?;
    let settings: Settings = serde_json::from_str(&content)
        .with_context(|| format!("Invalid settings file: {}", path.display()))?;
    Ok(settings)
}

pub fn save_settings<P: AsRef<Path>>(path: P, settings: &Settings) -> Result<()> {
    let json = serde_json::to_string_pretty(settings)?;
    crate::persistence::atomic_write(path, &json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_load_nonexistent_settings() {
        let temp_dir = tempdir().unwrap();
        let settings = load_settings(temp_dir.path().join("settings.json")).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.retention(), chrono::Duration::days(14));
    }

    #[test]
    fn test_partial_settings_use_defaults() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "tick_ms": 250, "snooze_options": [1, 2] }"#).unwrap();

        let settings = load_settings(&path).unwrap();
        assert_eq!(settings.tick_ms, 250);
        assert_eq!(settings.snooze_options, vec![1, 2]);
        assert_eq!(settings.retention_days, 14);
        assert!(settings.sounds_enabled);
    }

    #[test]
    fn test_save_and_load_settings() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("settings.json");

        let settings = Settings {
            sounds_enabled: false,
            sound_player: Some("mpv".to_string()),
            ..Settings::default()
        };
        save_settings(&path, &settings).unwrap();

        assert_eq!(load_settings(&path).unwrap(), settings);
    }

    #[test]
    fn test_invalid_settings_is_an_error() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(load_settings(&path).is_err());
    }

    #[test]
    fn test_sound_dir_default() {
        let settings = Settings::default();
        let dir = settings.sound_dir_in(Path::new("/data"));
        assert_eq!(dir, PathBuf::from("/data/sounds"));
    }
}
