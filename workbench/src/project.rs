//! Project files (`*.dcpro`) open a set of viewers with their point files at once.
//!
//! ```json
//! {
//!     "viewers": [
//!         { "files": ["ground.txt", "buildings.txt"], "render_mode": "Rgb" },
//!         { "files": ["/data/scan_02.txt"] }
//!     ]
//! }
//! ```
//!
//! Relative paths are relative to the directory of the project file.

use point_cloud_viewer::renderer::settings::RenderMode;
use point_cloud_viewer::renderer::viewer_command::{LoadMode, ViewerCommand};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const PROJECT_EXTENSION: &str = "dcpro";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Project {
    pub viewers: Vec<ProjectViewer>,
}

/// One viewer window of a project.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProjectViewer {
    /// The points of all files are shown together in the viewer.
    #[serde(default)]
    pub files: Vec<PathBuf>,

    #[serde(default)]
    pub render_mode: Option<RenderMode>,
}

#[derive(Error, Debug)]
pub enum ProjectError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    SerDe(#[from] serde_json::Error),

    #[error("The project does not contain any viewers.")]
    Empty,
}

/// Checks, if the file is a project file, based on its extension (case insensitive).
pub fn is_project_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(PROJECT_EXTENSION))
}

impl Project {
    pub fn load_from_file(file_name: &Path) -> Result<Self, ProjectError> {
        let file = File::open(file_name)?;
        let mut project: Project = serde_json::from_reader(file)?;
        if project.viewers.is_empty() {
            return Err(ProjectError::Empty);
        }
        if let Some(base) = file_name.parent() {
            project.resolve_paths(base);
        }
        Ok(project)
    }

    fn resolve_paths(&mut self, base: &Path) {
        for viewer in &mut self.viewers {
            for file in &mut viewer.files {
                if file.is_relative() {
                    *file = base.join(&*file);
                }
            }
        }
    }

    /// The commands, that open the viewers of the project.
    ///
    /// The first file of each viewer is opened with the viewer, the others are added to it.
    pub fn to_commands(&self) -> Vec<ViewerCommand> {
        let mut commands = Vec::new();
        for viewer in &self.viewers {
            let mut files = viewer.files.iter();
            commands.push(ViewerCommand::OpenViewer {
                file: files.next().cloned(),
            });
            for path in files {
                commands.push(ViewerCommand::LoadFile {
                    path: path.clone(),
                    mode: LoadMode::Add,
                });
            }
            if let Some(render_mode) = viewer.render_mode {
                commands.push(ViewerCommand::SetRenderMode(render_mode));
            }
        }
        commands
    }
}

#[cfg(test)]
mod tests {
    use super::{is_project_file, Project, ProjectError};
    use point_cloud_viewer::renderer::settings::RenderMode;
    use point_cloud_viewer::renderer::viewer_command::{LoadMode, ViewerCommand};
    use std::path::{Path, PathBuf};

    #[test]
    fn test_is_project_file() {
        assert!(is_project_file(Path::new("site.dcpro")));
        assert!(is_project_file(Path::new("/data/SITE.DCPRO")));
        assert!(!is_project_file(Path::new("scan.txt")));
        assert!(!is_project_file(Path::new("dcpro")));
    }

    #[test]
    fn test_load_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("site.dcpro");
        std::fs::write(
            &file,
            r#"{"viewers": [{"files": ["a.txt", "/abs/b.txt"], "render_mode": "Rgb"}]}"#,
        )
        .unwrap();

        let project = Project::load_from_file(&file).unwrap();
        assert_eq!(
            project.viewers[0].files,
            vec![dir.path().join("a.txt"), PathBuf::from("/abs/b.txt")]
        );
        assert_eq!(project.viewers[0].render_mode, Some(RenderMode::Rgb));
    }

    #[test]
    fn test_empty_project_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("empty.dcpro");
        std::fs::write(&file, r#"{"viewers": []}"#).unwrap();
        assert!(matches!(
            Project::load_from_file(&file),
            Err(ProjectError::Empty)
        ));
    }

    #[test]
    fn test_to_commands() {
        let project: Project = serde_json::from_str(
            r#"{"viewers": [
                {"files": ["a.txt", "b.txt", "c.txt"], "render_mode": "Elevation"},
                {}
            ]}"#,
        )
        .unwrap();

        assert_eq!(
            project.to_commands(),
            vec![
                ViewerCommand::OpenViewer {
                    file: Some(PathBuf::from("a.txt"))
                },
                ViewerCommand::LoadFile {
                    path: PathBuf::from("b.txt"),
                    mode: LoadMode::Add
                },
                ViewerCommand::LoadFile {
                    path: PathBuf::from("c.txt"),
                    mode: LoadMode::Add
                },
                ViewerCommand::SetRenderMode(RenderMode::Elevation),
                ViewerCommand::OpenViewer { file: None },
            ]
        );
    }
}
