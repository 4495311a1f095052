//! Settings, that are remembered between two runs of the workbench.

use log::{debug, warn};
use point_cloud_viewer::modules::MenuStyle;
use point_cloud_viewer::navigation::orbit_navigation::ZoomMode;
use point_cloud_viewer::renderer::backends::glium::SessionState;
use point_cloud_viewer::renderer::settings::{RenderMode, WindowGeometry};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use thiserror::Error;

const SETTINGS_DIRECTORY: &str = "point-cloud-workbench";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkbenchSettings {
    /// Geometry of the first viewer window.
    pub window: WindowGeometry,

    /// Directory of the last opened file.
    pub last_directory: Option<PathBuf>,

    pub render_mode: RenderMode,
    pub zoom_mode: ZoomMode,
    pub menu_style: MenuStyle,
}

#[derive(Error, Debug)]
pub enum SettingsIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    SerDe(#[from] serde_json::Error),
}

impl Default for WorkbenchSettings {
    fn default() -> Self {
        WorkbenchSettings {
            window: WindowGeometry::default(),
            last_directory: None,
            render_mode: RenderMode::default(),
            zoom_mode: ZoomMode::default(),
            menu_style: MenuStyle::default(),
        }
    }
}

/// Location of the settings file in the config directory of the user.
pub fn default_settings_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(SETTINGS_DIRECTORY).join(SETTINGS_FILE))
}

impl WorkbenchSettings {
    pub fn load_from_file(file_name: &Path) -> Result<Self, SettingsIoError> {
        let file = File::open(file_name)?;
        let settings = serde_json::from_reader(file)?;
        Ok(settings)
    }

    pub fn save_to_file(&self, file_name: &Path) -> Result<(), SettingsIoError> {
        if let Some(parent) = file_name.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(file_name)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Loads the settings, falling back to the defaults if the file is missing or invalid.
    pub fn load_or_default(file_name: Option<&Path>) -> Self {
        let Some(file_name) = file_name else {
            return Self::default();
        };
        if !file_name.exists() {
            debug!("No settings file at {}. Using defaults.", file_name.display());
            return Self::default();
        }
        match Self::load_from_file(file_name) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(
                    "Could not read settings from {}: {}. Using defaults.",
                    file_name.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Takes over the state of the user interface at the end of the session.
    pub fn update_from_session(&mut self, session: &SessionState) {
        self.window = session.window_geometry;
        self.render_mode = session.render_mode;
        if session.last_directory.is_some() {
            self.last_directory = session.last_directory.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::WorkbenchSettings;
    use point_cloud_viewer::modules::MenuStyle;
    use point_cloud_viewer::navigation::orbit_navigation::ZoomMode;
    use point_cloud_viewer::renderer::backends::glium::SessionState;
    use point_cloud_viewer::renderer::settings::{RenderMode, WindowGeometry};
    use std::path::PathBuf;

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("nested").join("settings.json");
        let settings = WorkbenchSettings {
            window: WindowGeometry {
                x: 10,
                y: 20,
                width: 1024,
                height: 768,
            },
            last_directory: Some(PathBuf::from("/data/scans")),
            render_mode: RenderMode::Rgb,
            zoom_mode: ZoomMode::linear(),
            menu_style: MenuStyle::Nested,
        };
        settings.save_to_file(&file).unwrap();
        assert_eq!(WorkbenchSettings::load_from_file(&file).unwrap(), settings);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("settings.json");
        std::fs::write(&file, r#"{ "render_mode": "Rgb" }"#).unwrap();
        let settings = WorkbenchSettings::load_or_default(Some(&file));
        assert_eq!(settings.render_mode, RenderMode::Rgb);
        assert_eq!(settings.zoom_mode, ZoomMode::default());
    }

    #[test]
    fn test_invalid_or_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("settings.json");
        assert_eq!(
            WorkbenchSettings::load_or_default(Some(&file)),
            WorkbenchSettings::default()
        );
        std::fs::write(&file, "{ not json").unwrap();
        assert_eq!(
            WorkbenchSettings::load_or_default(Some(&file)),
            WorkbenchSettings::default()
        );
    }

    #[test]
    fn test_update_from_session_keeps_last_directory() {
        let mut settings = WorkbenchSettings {
            last_directory: Some(PathBuf::from("/data")),
            ..Default::default()
        };
        settings.update_from_session(&SessionState {
            window_geometry: WindowGeometry::default(),
            render_mode: RenderMode::Rgb,
            last_directory: None,
        });
        assert_eq!(settings.render_mode, RenderMode::Rgb);
        assert_eq!(settings.last_directory, Some(PathBuf::from("/data")));
    }
}
