//! Game configuration (window, quality, assets). Loaded from config.ron at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::GameError;

/// Persistent game settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Window width in logical pixels.
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    /// Window height in logical pixels.
    #[serde(default = "default_window_height")]
    pub window_height: u32,
    /// Start in fullscreen.
    #[serde(default)]
    pub fullscreen: bool,
    /// Frame rate the quality governor aims for.
    #[serde(default = "default_target_fps")]
    pub target_fps: u32,
    /// Physics ticks per second at full quality.
    #[serde(default = "default_physics_hz")]
    pub physics_hz: f32,
    /// Let the governor lower and raise render scale on its own.
    #[serde(default = "default_true")]
    pub auto_quality: bool,
    /// glTF/GLB file that replaces the placeholder factory.
    #[serde(default = "default_factory_model")]
    pub factory_model: PathBuf,
    /// glTF/GLB file for the player's body.
    #[serde(default = "default_player_model")]
    pub player_model: PathBuf,
    /// Fixed RNG seed. Entropy-seeded when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_window_width() -> u32 {
    1280
}
fn default_window_height() -> u32 {
    720
}
fn default_target_fps() -> u32 {
    35
}
fn default_physics_hz() -> f32 {
    physics::DEFAULT_PHYSICS_HZ
}
fn default_true() -> bool {
    true
}
fn default_factory_model() -> PathBuf {
    PathBuf::from("assets/abandoned-factory.glb")
}
fn default_player_model() -> PathBuf {
    PathBuf::from("assets/Player.glb")
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            fullscreen: false,
            target_fps: default_target_fps(),
            physics_hz: default_physics_hz(),
            auto_quality: default_true(),
            factory_model: default_factory_model(),
            player_model: default_player_model(),
            seed: None,
        }
    }
}

impl GameConfig {
    /// Load config from `config.ron`. A missing file is created with the
    /// defaults; an invalid one is left alone and the defaults are used.
    pub fn load() -> Self {
        Self::load_or_create(&config_path())
    }

    fn load_or_create(path: &Path) -> Self {
        if !path.exists() {
            let config = Self::default();
            match config.save_to(path) {
                Ok(()) => log::info!("Wrote default config to {:?}", path),
                Err(e) => log::warn!("{}", e),
            }
            return config;
        }
        match Self::load_from(path) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Parse a config file, reporting read and parse failures.
    pub fn load_from(path: &Path) -> Result<Self, GameError> {
        let data = std::fs::read_to_string(path).map_err(|source| GameError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&data).map_err(|e| match e {
            GameError::Config { source, .. } => GameError::Config {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    pub fn from_ron(data: &str) -> Result<Self, GameError> {
        ron::from_str(data).map_err(|source| GameError::Config {
            path: PathBuf::from("<inline>"),
            source,
        })
    }

    /// Write this config as pretty-printed RON.
    pub fn save_to(&self, path: &Path) -> Result<(), GameError> {
        let data = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        std::fs::write(path, data).map_err(|source| GameError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("config.ron")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = GameConfig::from_ron("()").unwrap();
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.physics_hz, 30.0);
        assert_eq!(config.target_fps, 35);
    }

    #[test]
    fn partial_document_overrides_named_fields() {
        let config = GameConfig::from_ron("(physics_hz: 60.0, seed: Some(9), auto_quality: false)").unwrap();
        assert_eq!(config.physics_hz, 60.0);
        assert_eq!(config.seed, Some(9));
        assert!(!config.auto_quality);
        assert_eq!(config.window_width, 1280);
    }

    #[test]
    fn malformed_document_is_a_config_error() {
        let result = GameConfig::from_ron("(physics_hz: \"fast\"");
        assert!(matches!(result, Err(GameError::Config { .. })));
    }

    #[test]
    fn first_load_writes_default_file() {
        let dir = std::env::temp_dir().join(format!("deformed-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.ron");
        let _ = std::fs::remove_file(&path);

        let config = GameConfig::load_or_create(&path);
        assert_eq!(config, GameConfig::default());
        assert!(path.exists());
        assert_eq!(GameConfig::load_from(&path).unwrap(), GameConfig::default());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = GameConfig::load_from(Path::new("no/such/config.ron"));
        assert!(matches!(result, Err(GameError::Io { .. })));
    }
}
