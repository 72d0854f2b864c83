//=========================================================================
// Engine Configuration
//=========================================================================
//
// JSON-backed settings for window, frame rate, assets and audio.
//
// Loading rules:
// - missing file → defaults (not an error)
// - missing keys → per-field defaults
// - malformed JSON → ConfigError::Parse
//
// Example:
// ```json
// {
//   "window": { "width": 800, "height": 600, "title": "Demo" },
//   "target_fps": 30,
//   "assets_folder": "assets",
//   "audio": { "channels": 8, "sound_volume": 100, "music_volume": 64 }
// }
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use crate::error::ConfigError;

//=== Constants ===========================================================

/// Upper bound of mixer volumes.
pub const MAX_VOLUME: u8 = 128;

//=== WindowConfig ========================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl WindowConfig {
    pub fn new(width: u32, height: u32, title: impl Into<String>) -> Self {
        Self {
            width,
            height,
            title: title.into(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::new(1024, 768, "Tempo Engine")
    }
}

//=== AudioConfig =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Number of mixing channels.
    pub channels: usize,
    /// 0..=128
    pub sound_volume: u8,
    /// 0..=128
    pub music_volume: u8,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            channels: 16,
            sound_volume: MAX_VOLUME,
            music_volume: MAX_VOLUME,
        }
    }
}

//=== EngineConfig ========================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub window: WindowConfig,
    pub target_fps: u32,
    pub assets_folder: PathBuf,
    pub audio: AudioConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            target_fps: 60,
            assets_folder: PathBuf::from("assets"),
            audio: AudioConfig::default(),
        }
    }
}

impl EngineConfig {
    //--- Persistence ------------------------------------------------------

    /// Reads a config file; a missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(target: "engine", "Config {} not found, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(target: "engine", "Loaded config from {}", path.display());
        Ok(config)
    }

    /// Writes the config as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let text = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;

        fs::write(path, text).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    //--- Validation -------------------------------------------------------

    /// Rejects values the engine cannot run with. Nothing is clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 {
            return Err(invalid("window.width", "must be positive"));
        }
        if self.window.height == 0 {
            return Err(invalid("window.height", "must be positive"));
        }
        if self.target_fps == 0 {
            return Err(invalid("target_fps", "must be positive"));
        }
        if self.audio.channels == 0 {
            return Err(invalid("audio.channels", "must be positive"));
        }
        if self.audio.sound_volume > MAX_VOLUME {
            return Err(invalid("audio.sound_volume", format!("must be at most {}", MAX_VOLUME)));
        }
        if self.audio.music_volume > MAX_VOLUME {
            return Err(invalid("audio.music_volume", format!("must be at most {}", MAX_VOLUME)));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //--- Test Helpers -----------------------------------------------------

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("tempo_config_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir.join("engine.json")
    }

    //--- Tests ------------------------------------------------------------

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.window, WindowConfig::new(1024, 768, "Tempo Engine"));
        assert_eq!(config.target_fps, 60);
        assert_eq!(config.assets_folder, PathBuf::from("assets"));
        assert_eq!(config.audio.channels, 16);
        assert_eq!(config.audio.sound_volume, 128);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let path = scratch("missing");
        assert_eq!(EngineConfig::load(&path).unwrap(), EngineConfig::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let path = scratch("partial");
        fs::write(&path, r#"{ "window": { "width": 800 }, "target_fps": 30 }"#).unwrap();

        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 768);
        assert_eq!(config.target_fps, 30);
        assert_eq!(config.audio, AudioConfig::default());
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let path = scratch("malformed");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(EngineConfig::load(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn save_then_load() {
        let path = scratch("save");
        let mut config = EngineConfig::default();
        config.window = WindowConfig::new(640, 480, "Saved");
        config.audio.music_volume = 32;

        config.save(&path).unwrap();
        assert_eq!(EngineConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn validate_rejects_zeroes_and_loud_volumes() {
        let mut config = EngineConfig::default();
        config.target_fps = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "target_fps", .. })
        ));

        let mut config = EngineConfig::default();
        config.window.height = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "window.height", .. })
        ));

        let mut config = EngineConfig::default();
        config.audio.sound_volume = 200;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "audio.sound_volume", .. })
        ));
    }
}
