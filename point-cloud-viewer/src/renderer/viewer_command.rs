//! Commands executed by the viewer windows, and the rules for routing dropped files.

use crate::navigation::event::Modifiers;
use crate::renderer::settings::RenderMode;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Commands, that are sent to the event loop and executed on the ui thread.
#[derive(Clone, Debug, PartialEq)]
pub enum ViewerCommand {
    /// Closes all viewers and exits the event loop.
    Terminate,

    /// Opens a new viewer window. It becomes the active viewer.
    OpenViewer { file: Option<PathBuf> },

    /// Loads a file into the active viewer.
    /// A new viewer is opened, if there is no active one.
    LoadFile { path: PathBuf, mode: LoadMode },

    /// Closes the active viewer.
    CloseActiveViewer,

    SetRenderMode(RenderMode),
    ToggleColorBar,
    ToggleBoundingBox,
    ToggleAxis,
    CycleAxisAnchor,

    /// Moves the camera of the active viewer back to its initial position.
    ResetView,

    /// Arranges all viewer windows in a cascade.
    Cascade,

    /// Prints the menu of all registered modules to the log.
    ShowMenu,
}

/// Defines, what happens to the points that are already loaded, when a file is opened.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum LoadMode {
    /// The new file replaces the current points.
    Replace,

    /// The points of the new file are added to the current points.
    Add,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub struct ViewerId(usize);

impl ViewerId {
    pub fn begin() -> Self {
        ViewerId(0)
    }

    pub fn next(&mut self) -> Self {
        let id = *self;
        self.0 += 1;
        id
    }
}

impl Display for ViewerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Platforms, that differ in how the "add file" drop gesture is performed.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Platform {
    MacOs,
    Windows,
    Linux,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Linux
        }
    }
}

/// Where a dropped file should go.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DropTarget {
    /// There is no active viewer, so a new one is opened.
    NewViewer,

    /// The file is loaded into the active viewer.
    ActiveViewer(LoadMode),
}

/// Determines, whether a dropped file replaces or is added to the points of the active viewer.
///
/// On macOS, holding the command key adds the file. On other platforms, dragging with the right
/// mouse button or holding alt adds the file. Everything else replaces.
pub fn drop_load_mode(platform: Platform, right_button: bool, modifiers: Modifiers) -> LoadMode {
    let add = match platform {
        Platform::MacOs => modifiers.logo,
        Platform::Windows | Platform::Linux => right_button || modifiers.alt,
    };
    if add {
        LoadMode::Add
    } else {
        LoadMode::Replace
    }
}

pub fn route_drop(
    has_active_viewer: bool,
    platform: Platform,
    right_button: bool,
    modifiers: Modifiers,
) -> DropTarget {
    if has_active_viewer {
        DropTarget::ActiveViewer(drop_load_mode(platform, right_button, modifiers))
    } else {
        DropTarget::NewViewer
    }
}
