//! Error types returned by the renderer/viewer.

use crate::io::PointFileError;
use crate::renderer::viewer_command::ViewerId;
use std::error::Error;
use std::fmt;
use std::fmt::{Display, Formatter};

/// Shorthand for a [Result] with a [RendererError].
pub type RendererResult<T> = Result<T, RendererError>;

/// Error type returned by the renderer.
#[derive(Debug)]
pub enum RendererError {
    /// The viewer window was closed by the user.
    ViewerClosed { id: ViewerId },

    /// A command needs an active viewer, but no viewer window is open.
    NoActiveViewer,

    /// Some GPU operation was unsuccessful (e.g. because of not sufficient graphics memory)
    Graphics { source: Box<dyn Error + Send> },

    /// A point file could not be loaded.
    PointFile { source: PointFileError },
}

impl Display for RendererError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            RendererError::ViewerClosed { id } => write!(f, "The viewer {} is closed.", id),

            RendererError::NoActiveViewer => write!(f, "There is no active viewer."),

            RendererError::Graphics { source } => write!(f, "Gpu error: {}", source),

            RendererError::PointFile { source } => write!(f, "{}", source),
        }
    }
}

impl Error for RendererError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RendererError::Graphics { source } => Some(&**source),
            RendererError::PointFile { source } => Some(source),
            RendererError::ViewerClosed { .. } => None,
            RendererError::NoActiveViewer => None,
        }
    }
}

impl From<PointFileError> for RendererError {
    fn from(source: PointFileError) -> Self {
        RendererError::PointFile { source }
    }
}
