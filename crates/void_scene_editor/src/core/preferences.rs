//! Editor preferences and settings.
//!
//! Persistent settings that survive editor restarts, stored as TOML.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use void_scene::StoreConfig;

/// Preference file errors.
#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid preferences file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Could not encode preferences: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// Editor preferences and settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorPreferences {
    // Scene
    pub scene_file: PathBuf,
    pub save_on_exit: bool,

    // History, unbounded unless set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_limit: Option<usize>,

    // Spawning
    pub spawn_spacing: f32,
    pub default_mesh: PathBuf,

    // Editing
    pub normalize_orientation: bool,
}

impl Default for EditorPreferences {
    fn default() -> Self {
        Self {
            scene_file: PathBuf::from("entities.json"),
            save_on_exit: true,
            history_limit: None,
            spawn_spacing: 3.0,
            default_mesh: PathBuf::from("stl/car.stl"),
            normalize_orientation: true,
        }
    }
}

impl EditorPreferences {
    /// Load preferences from a file.
    pub fn load(path: &Path) -> Result<Self, PreferencesError> {
        let content = std::fs::read_to_string(path)?;
        let preferences = toml::from_str(&content)?;
        log::info!("Loaded preferences from {:?}", path);
        Ok(preferences)
    }

    /// Load preferences, falling back to defaults if the file is missing or bad.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        if !path.exists() {
            log::debug!("No preferences at {:?}, using defaults", path);
            return Self::default();
        }
        Self::load(path).unwrap_or_else(|e| {
            log::warn!("Ignoring preferences at {:?}: {}", path, e);
            Self::default()
        })
    }

    /// Save preferences to a file.
    pub fn save(&self, path: &Path) -> Result<(), PreferencesError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        log::info!("Saved preferences to {:?}", path);
        Ok(())
    }

    /// Get the default preferences path.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("void_scene_editor");
            p.push("preferences.toml");
            p
        })
    }

    /// Spawn settings for the scene store.
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            spawn_spacing: self.spawn_spacing,
            default_mesh: self.default_mesh.clone(),
        }
    }
}
