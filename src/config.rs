//! Viewer configuration, stored as RON

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Settings for a [`Viewer`](crate::app::Viewer)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub clear_color: [f32; 4],
    /// Vertical field of view in degrees
    pub fovy: f32,
    pub znear: f32,
    pub zfar: f32,
    /// Half-width and half-height of the pick window in normalized device coordinates
    pub pick_tolerance: f32,
    /// Whether the Escape key ends the viewer loop
    pub escape_sets_done: bool,
    /// Number of frames averaged by the frame statistics
    pub stats_window: usize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window_title: "thistle".to_string(),
            window_width: 800,
            window_height: 600,
            clear_color: [0.2, 0.2, 0.4, 1.0],
            fovy: 30.0,
            znear: 1.0,
            zfar: 10000.0,
            pick_tolerance: 0.05,
            escape_sets_done: true,
            stats_window: 120,
        }
    }
}

impl ViewerConfig {
    /// Load a configuration file; missing fields take their default values
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let config = ron::ser::PrettyConfig::default().struct_names(true);
        let content = ron::ser::to_string_pretty(self, config)?;
        std::fs::write(path, content).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn with_clear_color(mut self, color: [f32; 4]) -> Self {
        self.clear_color = color;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewer.ron");

        let config = ViewerConfig {
            window_width: 1024,
            pick_tolerance: 0.1,
            ..ViewerConfig::default()
        };
        config.save(&path).unwrap();

        assert_eq!(ViewerConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewer.ron");
        std::fs::write(&path, "(escape_sets_done: false)").unwrap();

        let config = ViewerConfig::load(&path).unwrap();
        assert!(!config.escape_sets_done);
        assert_eq!(config.window_width, 800);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewer.ron");
        std::fs::write(&path, "(window_width: \"wide\")").unwrap();

        let err = ViewerConfig::load(&path).unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
        assert!(err.to_string().starts_with("Failed to parse config file"));
    }

    #[test]
    fn test_missing_file() {
        let err = ViewerConfig::load("does/not/exist.ron").unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
