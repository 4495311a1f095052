//! Render backend based on the `glium` crate.
mod buffers;
mod draw_overlays;
mod draw_point_cloud;
mod event_loop;
mod util;
mod windows;

use crate::modules::{MenuStyle, ModuleRegistry};
use crate::navigation::orbit_navigation::ZoomMode;
use crate::renderer::settings::{BaseRenderSettings, RenderMode, WindowGeometry};
use crate::renderer::viewer_command::ViewerCommand;
use log::warn;
use std::path::PathBuf;

pub use buffers::{GliumBackend, OverlayBuffer};

/// Settings for the Glium point cloud renderer backend.
#[derive(Debug, Clone)]
pub struct GliumRenderOptions {
    /// The multisampling level used during rendering.
    /// The value **must** be a power of 2. Any other value will result in a panic during window creation.
    /// A value of `0` indicates, that multisampling is disabled.
    pub multisampling: u16,

    /// Zoom behaviour of newly opened viewers.
    pub zoom_mode: ZoomMode,

    /// Initial look of newly opened viewers.
    pub render_settings: BaseRenderSettings,

    /// Position and size of the first viewer window. Further windows are cascaded from there.
    pub window_geometry: WindowGeometry,

    /// Arrangement of the module menus, when the menu is shown.
    pub menu_style: MenuStyle,
}

/// State of the user interface, that is reported when the event loop ends.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    /// Geometry of the last active window.
    pub window_geometry: WindowGeometry,

    /// Render mode of the last active window.
    pub render_mode: RenderMode,

    /// Directory of the last loaded file.
    pub last_directory: Option<PathBuf>,
}

impl Default for GliumRenderOptions {
    fn default() -> Self {
        GliumRenderOptions {
            multisampling: 2,
            zoom_mode: ZoomMode::default(),
            render_settings: BaseRenderSettings::default(),
            window_geometry: WindowGeometry::default(),
            menu_style: MenuStyle::default(),
        }
    }
}

impl GliumRenderOptions {
    /// Runs the viewer.
    ///
    /// The startup commands are executed in order, as soon as the event loop is running.
    /// Once the last window is closed (or a [ViewerCommand::Terminate] is executed),
    /// `on_exit` is called with the final session state and the process exits.
    ///
    /// # Limitations
    ///
    /// This method needs to be called on the main thread, and it never returns.
    pub fn run<F>(self, registry: ModuleRegistry, startup: Vec<ViewerCommand>, on_exit: F) -> !
    where
        F: FnOnce(SessionState) + 'static,
    {
        let event_loop = event_loop::new();
        let proxy = event_loop.create_proxy();
        for command in startup {
            if let Err(e) = proxy.send_event(command) {
                warn!("Could not queue startup command: {}", e);
            }
        }
        event_loop::run(event_loop, self, registry, on_exit)
    }
}
