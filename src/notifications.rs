//! Sound notifications for the reminder engine.
//!
//! Playback is best effort: a sound that can't be played is logged and
//! skipped, and nothing here ever returns an error to the tick loop.

use crate::domain::Priority;
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// Players probed in order when none is configured
const DEFAULT_PLAYERS: &[&str] = &["paplay", "aplay", "afplay"];

/// Accepted sound file extensions, in lookup order
const SOUND_EXTENSIONS: &[&str] = &["wav", "oga", "ogg", "mp3"];

/// Capability to alert the user audibly
pub trait NotificationSink {
    /// Priority-specific alarm, falling back to the default alarm once
    fn play_alarm(&self, priority: Priority);

    /// Pre-expiry warning sound; no fallback
    fn play_warning(&self);
}

/// Sink used when sounds are disabled
pub struct SilentSink;

impl NotificationSink for SilentSink {
    fn play_alarm(&self, _priority: Priority) {}

    fn play_warning(&self) {}
}

/// Plays sound files from a directory through an external player:
///
/// ```text
/// <sound_dir>/priorities/{high,medium,low}.<ext>
/// <sound_dir>/alarm.<ext>
/// <sound_dir>/warning.<ext>
/// ```
pub struct SoundSink {
    sound_dir: PathBuf,
    player: Option<String>,
}

impl SoundSink {
    pub fn new(sound_dir: PathBuf, player: Option<String>) -> Self {
        let player = player.or_else(find_default_player);
        if player.is_none() {
            warn!("no sound player found; alarms will be silent");
        }
        Self { sound_dir, player }
    }

    /// Find `<sound_dir>/<stem>.<ext>` for the first extension that exists
    fn locate(&self, stem: &str) -> Option<PathBuf> {
        SOUND_EXTENSIONS
            .iter()
            .map(|ext| self.sound_dir.join(format!("{}.{}", stem, ext)))
            .find(|path| path.is_file())
    }

    fn play(&self, stem: &str) -> Result<PathBuf> {
        let path = self
            .locate(stem)
            .with_context(|| format!("no sound file for {} in {}", stem, self.sound_dir.display()))?;
        let Some(player) = &self.player else {
            bail!("no sound player configured");
        };
        spawn_detached(player, &path)?;
        debug!(sound = %path.display(), "playing sound");
        Ok(path)
    }
}

impl NotificationSink for SoundSink {
    fn play_alarm(&self, priority: Priority) {
        let primary = format!("priorities/{}", priority.as_str());
        if let Err(err) = self.play(&primary) {
            warn!(error = %err, "priority alarm failed, trying default alarm");
            if let Err(err) = self.play("alarm") {
                warn!(error = %err, "default alarm failed");
            }
        }
    }

    fn play_warning(&self) {
        if let Err(err) = self.play("warning") {
            warn!(error = %err, "warning sound failed");
        }
    }
}

/// Start the player without waiting for it; a reaper thread collects the exit status
fn spawn_detached(player: &str, sound: &Path) -> Result<()> {
    let mut child = Command::new(player)
        .arg(sound)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("failed to start sound player {}", player))?;

    std::thread::spawn(move || {
        let _ = child.wait();
    });
    Ok(())
}

/// First of the default players present on $PATH
fn find_default_player() -> Option<String> {
    let path_var = std::env::var_os("PATH")?;
    DEFAULT_PLAYERS
        .iter()
        .find(|player| std::env::split_paths(&path_var).any(|dir| dir.join(player).is_file()))
        .map(|player| player.to_string())
}

/// Sink that remembers what was requested, for tests
#[cfg(test)]
#[derive(Default)]
pub struct RecordingSink {
    pub played: std::rc::Rc<std::cell::RefCell<Vec<String>>>,
}

#[cfg(test)]
impl NotificationSink for RecordingSink {
    fn play_alarm(&self, priority: Priority) {
        self.played.borrow_mut().push(format!("alarm:{}", priority));
    }

    fn play_warning(&self) {
        self.played.borrow_mut().push("warning".to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn sound_dir_with(files: &[&str]) -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("priorities")).unwrap();
        for file in files {
            fs::write(dir.path().join(file), b"").unwrap();
        }
        dir
    }

    #[test]
    fn test_locate_prefers_extension_order() {
        let dir = sound_dir_with(&["alarm.mp3", "alarm.wav"]);
        let sink = SoundSink::new(dir.path().to_path_buf(), Some("true".to_string()));
        assert_eq!(sink.locate("alarm"), Some(dir.path().join("alarm.wav")));
        assert_eq!(sink.locate("warning"), None);
    }

    #[test]
    fn test_missing_sound_is_an_error_not_a_panic() {
        let dir = sound_dir_with(&[]);
        let sink = SoundSink::new(dir.path().to_path_buf(), Some("true".to_string()));
        assert!(sink.play("warning").is_err());

        // Public entry points swallow the failure
        sink.play_warning();
        sink.play_alarm(Priority::High);
    }

    #[test]
    fn test_missing_player_is_reported() {
        let dir = sound_dir_with(&["warning.wav"]);
        let sink = SoundSink::new(dir.path().to_path_buf(), Some("definitely-not-a-player".to_string()));
        assert!(sink.play("warning").is_err());
        sink.play_warning();
    }

    #[cfg(unix)]
    #[test]
    fn test_play_spawns_player() {
        let dir = sound_dir_with(&["priorities/low.oga"]);
        let sink = SoundSink::new(dir.path().to_path_buf(), Some("true".to_string()));
        let played = sink.play("priorities/low").unwrap();
        assert_eq!(played, dir.path().join("priorities/low.oga"));
    }

    #[test]
    fn test_recording_sink() {
        let sink = RecordingSink::default();
        sink.play_warning();
        sink.play_alarm(Priority::Low);
        assert_eq!(*sink.played.borrow(), vec!["warning".to_string(), "alarm:low".to_string()]);
    }
}
