use crate::modules::{ModuleRegistry, Shortcut};
use crate::navigation::Navigation;
use crate::navigation::event::MouseDragSettings;
use crate::renderer::backends::glium::buffers::GliumBackend;
use crate::renderer::backends::glium::draw_overlays::OverlayRenderer;
use crate::renderer::backends::glium::draw_point_cloud::PointRenderer;
use crate::renderer::backends::glium::util;
use crate::renderer::backends::glium::{GliumRenderOptions, SessionState};
use crate::renderer::error::{RendererError, RendererResult};
use crate::renderer::settings::WindowGeometry;
use crate::renderer::viewer::{FrameState, Viewer};
use crate::renderer::viewer_command::{
    DropTarget, LoadMode, Platform, ViewerCommand, ViewerId, route_drop,
};
use glium::glutin::dpi::{PhysicalPosition, PhysicalSize};
use glium::glutin::event::{
    DeviceId, ElementState, KeyboardInput, ModifiersState, MouseButton as WinitMouseButton,
    MouseScrollDelta, WindowEvent,
};
use glium::glutin::event_loop::EventLoopWindowTarget;
use glium::glutin::window::WindowId as OsWindowId;
use glium::{Display, Frame, Surface, glutin};
use log::{debug, error, info, warn};
use nalgebra::Matrix4;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Offset between two cascaded windows, in physical pixels.
const CASCADE_STEP: i32 = 30;

/// Number of cascade positions, before starting over at the top left.
const CASCADE_LENGTH: usize = 10;

pub struct Window {
    display: Display,
    viewer: Viewer<GliumBackend>,
    points_renderer: Option<PointRenderer>,
    overlay_renderer: Option<OverlayRenderer>,
    current_scale_factor: f64,
    modifiers: ModifiersState,
    cursors: HashMap<DeviceId, PhysicalPosition<f64>>,
    current_drag: Option<(DeviceId, WinitMouseButton, ModifiersState)>,
    right_button_pressed: bool,
}

/// Owns all viewer windows and keeps track of the active one.
pub struct WindowManager {
    viewer_id_counter: ViewerId,
    windows_by_id: HashMap<ViewerId, Window>,
    active: Option<ViewerId>,
    nr_opened: usize,
    open_failed: bool,
    options: GliumRenderOptions,
    session: SessionState,
}

impl WindowManager {
    pub fn new(options: GliumRenderOptions) -> Self {
        let session = SessionState {
            window_geometry: options.window_geometry,
            render_mode: options.render_settings.render_mode,
            last_directory: None,
        };
        WindowManager {
            viewer_id_counter: ViewerId::begin(),
            windows_by_id: HashMap::new(),
            active: None,
            nr_opened: 0,
            open_failed: false,
            options,
            session,
        }
    }

    fn cascade_position(&self, index: usize) -> PhysicalPosition<i32> {
        let step = (index % CASCADE_LENGTH) as i32 * CASCADE_STEP;
        PhysicalPosition::new(
            self.options.window_geometry.x + step,
            self.options.window_geometry.y + step,
        )
    }

    /// Opens a new viewer window, which becomes the active one.
    pub fn open_viewer(
        &mut self,
        event_loop: &EventLoopWindowTarget<ViewerCommand>,
    ) -> RendererResult<ViewerId> {
        let geometry = self.options.window_geometry;
        let wb = glutin::window::WindowBuilder::new()
            .with_title(self.options.render_settings.window_title.as_str())
            .with_position(self.cascade_position(self.nr_opened))
            .with_inner_size(PhysicalSize::new(geometry.width, geometry.height));
        let gl_window = glutin::ContextBuilder::new()
            .with_gl(glutin::GlRequest::Specific(glutin::Api::OpenGl, (3, 3)))
            .with_gl_profile(glutin::GlProfile::Core)
            .with_multisampling(self.options.multisampling)
            .with_depth_buffer(24)
            .with_vsync(true)
            .build_windowed(wb, event_loop)
            .map_err(|e| RendererError::Graphics {
                source: Box::new(e),
            })?;
        let display = Display::from_gl_window(gl_window).map_err(|e| RendererError::Graphics {
            source: Box::new(e),
        })?;

        let mut render_settings = self.options.render_settings.clone();
        render_settings.render_mode = self.session.render_mode;
        let viewer = Viewer::new(
            GliumBackend::new(display.clone()),
            render_settings,
            self.options.zoom_mode,
        )?;

        // a broken shader leaves the window empty, but usable
        let points_renderer =
            match PointRenderer::new(&display, &self.options.render_settings.color_map) {
                Ok(r) => Some(r),
                Err(e) => {
                    error!("Could not build the point shader: {}", e);
                    None
                }
            };
        let overlay_renderer = match OverlayRenderer::new(&display) {
            Ok(r) => Some(r),
            Err(e) => {
                error!("Could not build the overlay shader: {}", e);
                None
            }
        };

        let current_scale_factor = display.gl_window().window().scale_factor();
        let current_size = display.gl_window().window().inner_size();
        let mut window = Window {
            display,
            viewer,
            points_renderer,
            overlay_renderer,
            current_scale_factor,
            modifiers: ModifiersState::default(),
            cursors: HashMap::new(),
            current_drag: None,
            right_button_pressed: false,
        };

        // initialize size and scale factor
        let mut tmp = current_size;
        window.process_window_event(WindowEvent::ScaleFactorChanged {
            scale_factor: current_scale_factor,
            new_inner_size: &mut tmp,
        });
        window.process_window_event(WindowEvent::Resized(current_size));

        // log
        debug!(
            "Window opened: {:?}",
            window.display.gl_window().window().id()
        );
        debug!(
            "OpenGL version: {}",
            window.display.get_opengl_version_string()
        );
        debug!(
            "OpenGL renderer: {}",
            window.display.get_opengl_renderer_string()
        );

        // insert window
        let id = self.viewer_id_counter.next();
        self.windows_by_id.insert(id, window);
        self.active = Some(id);
        self.nr_opened += 1;
        Ok(id)
    }

    pub fn window_by_id_mut(&mut self, id: ViewerId) -> RendererResult<&mut Window> {
        match self.windows_by_id.get_mut(&id) {
            None => Err(RendererError::ViewerClosed { id }),
            Some(win) => Ok(win),
        }
    }

    pub fn active_window_mut(&mut self) -> RendererResult<&mut Window> {
        match self.active {
            None => Err(RendererError::NoActiveViewer),
            Some(id) => self.window_by_id_mut(id),
        }
    }

    fn id_by_os_id(&self, os_window_id: OsWindowId) -> Option<ViewerId> {
        self.windows_by_id
            .iter()
            .find(|(_, v)| v.os_id() == os_window_id)
            .map(|(&k, _)| k)
    }

    pub fn window_by_os_id_mut(&mut self, os_window_id: OsWindowId) -> Option<&mut Window> {
        self.windows_by_id
            .values_mut()
            .find(|it| it.os_id() == os_window_id)
    }

    /// Makes the window with the given os id the active one.
    pub fn activate_os(&mut self, os_window_id: OsWindowId) {
        if let Some(id) = self.id_by_os_id(os_window_id) {
            if self.active != Some(id) {
                debug!("Active viewer: {}", id);
            }
            self.active = Some(id);
            self.remember_session();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.windows_by_id.is_empty()
    }

    /// True, once the last viewer has been closed, or no viewer could be opened at all.
    pub fn is_finished(&self) -> bool {
        self.is_empty() && (self.nr_opened > 0 || self.open_failed)
    }

    pub fn close(&mut self, id: ViewerId) {
        if self.active == Some(id) {
            self.remember_session();
        }
        self.windows_by_id.remove(&id);
        if self.active == Some(id) {
            // fall back to the most recently opened viewer
            self.active = self.windows_by_id.keys().max().copied();
        }
    }

    pub fn close_os(&mut self, id: OsWindowId) {
        if let Some(k) = self.id_by_os_id(id) {
            self.close(k);
        }
    }

    /// A file was dropped onto the window with the given os id.
    pub fn drop_file(
        &mut self,
        event_loop: &EventLoopWindowTarget<ViewerCommand>,
        os_window_id: OsWindowId,
        path: PathBuf,
    ) {
        self.activate_os(os_window_id);
        let (right_button, modifiers) = match self.window_by_os_id_mut(os_window_id) {
            Some(window) => (window.right_button_pressed, util::modifiers(window.modifiers)),
            None => (false, Default::default()),
        };
        match route_drop(
            self.active.is_some(),
            Platform::current(),
            right_button,
            modifiers,
        ) {
            DropTarget::NewViewer => self.open_viewer_with_file(event_loop, Some(&path)),
            DropTarget::ActiveViewer(mode) => self.load_into_active(event_loop, &path, mode),
        }
    }

    fn open_viewer_with_file(
        &mut self,
        event_loop: &EventLoopWindowTarget<ViewerCommand>,
        file: Option<&Path>,
    ) {
        let id = match self.open_viewer(event_loop) {
            Ok(id) => id,
            Err(e) => {
                error!("Could not open a viewer: {}", e);
                self.open_failed = true;
                return;
            }
        };
        if let Some(path) = file {
            if let Ok(window) = self.window_by_id_mut(id) {
                window.load_file(path, LoadMode::Replace);
            }
            self.remember_directory(path);
        }
    }

    fn load_into_active(
        &mut self,
        event_loop: &EventLoopWindowTarget<ViewerCommand>,
        path: &Path,
        mode: LoadMode,
    ) {
        match self.active_window_mut() {
            Ok(window) => window.load_file(path, mode),
            Err(_) => return self.open_viewer_with_file(event_loop, Some(path)),
        }
        self.remember_directory(path);
    }

    fn remember_directory(&mut self, path: &Path) {
        if let Some(parent) = path.parent() {
            self.session.last_directory = Some(parent.to_owned());
        }
    }

    fn remember_session(&mut self) {
        if let Some(window) = self.active.and_then(|id| self.windows_by_id.get(&id)) {
            if let Some(geometry) = window.geometry() {
                self.session.window_geometry = geometry;
            }
            self.session.render_mode = window.viewer.settings().render_mode;
        }
    }

    /// Session state to persist, taken from the active window if there still is one.
    pub fn session_state(&mut self) -> SessionState {
        self.remember_session();
        self.session.clone()
    }

    /// Arranges all windows diagonally, in the order they were opened.
    pub fn cascade(&mut self) {
        let mut ids = self.windows_by_id.keys().copied().collect::<Vec<_>>();
        ids.sort();
        for (index, id) in ids.into_iter().enumerate() {
            let position = self.cascade_position(index);
            if let Some(window) = self.windows_by_id.get(&id) {
                window.display.gl_window().window().set_outer_position(position);
            }
        }
        self.nr_opened = self.windows_by_id.len();
    }

    /// Executes a command.
    /// Returns false, if the application should terminate.
    pub fn execute(
        &mut self,
        event_loop: &EventLoopWindowTarget<ViewerCommand>,
        registry: &ModuleRegistry,
        command: ViewerCommand,
    ) -> bool {
        match command {
            ViewerCommand::Terminate => return false,
            ViewerCommand::OpenViewer { file } => {
                self.open_viewer_with_file(event_loop, file.as_deref())
            }
            ViewerCommand::LoadFile { path, mode } => self.load_into_active(event_loop, &path, mode),
            ViewerCommand::CloseActiveViewer => {
                if let Some(id) = self.active {
                    self.close(id);
                }
            }
            ViewerCommand::Cascade => self.cascade(),
            ViewerCommand::ShowMenu => {
                info!(
                    "Menu:\n{}",
                    registry.describe_menu_bar(self.options.menu_style)
                );
            }
            command => match self.active_window_mut() {
                Ok(window) => window.execute(command),
                Err(e) => warn!("Ignoring {:?}: {}", command, e),
            },
        }
        true
    }
}

impl Window {
    pub fn os_id(&self) -> OsWindowId {
        self.display.gl_window().window().id()
    }

    pub fn request_redraw(&self) {
        self.display.gl_window().window().request_redraw()
    }

    pub fn set_title(&self, title: &str) {
        self.display.gl_window().window().set_title(title);
    }

    pub fn geometry(&self) -> Option<WindowGeometry> {
        let window = self.display.gl_window();
        let window = window.window();
        let position = window.outer_position().ok()?;
        let size = window.inner_size();
        Some(WindowGeometry {
            x: position.x,
            y: position.y,
            width: size.width,
            height: size.height,
        })
    }

    /// The shortcut for a key press, if the event is one.
    pub fn shortcut(&self, input: &KeyboardInput) -> Option<Shortcut> {
        if input.state != ElementState::Pressed {
            return None;
        }
        input
            .virtual_keycode
            .and_then(|key| util::shortcut(key, self.modifiers))
    }

    pub fn load_file(&mut self, path: &Path, mode: LoadMode) {
        // failures are logged by the viewer
        if self.viewer.load_file(path, mode).is_ok() {
            self.set_title(&self.viewer.title());
        }
        self.request_redraw();
    }

    /// Executes the commands, that only affect a single viewer.
    fn execute(&mut self, command: ViewerCommand) {
        match command {
            ViewerCommand::SetRenderMode(mode) => self.viewer.set_render_mode(mode),
            ViewerCommand::ToggleColorBar => self.viewer.toggle_color_bar(),
            ViewerCommand::ToggleBoundingBox => self.viewer.toggle_bounding_box(),
            ViewerCommand::ToggleAxis => self.viewer.toggle_axis(),
            ViewerCommand::CycleAxisAnchor => self.viewer.cycle_axis_anchor(),
            ViewerCommand::ResetView => self.viewer.reset_view(),
            other => debug!("Not a viewer command: {:?}", other),
        }
        self.request_redraw();
    }

    pub fn process_window_event(&mut self, event: WindowEvent) {
        match event {
            WindowEvent::ModifiersChanged(new_modifiers) => {
                self.modifiers = new_modifiers;
            }
            WindowEvent::CursorMoved {
                position,
                device_id,
                ..
            } => {
                let previous = self.cursors.insert(device_id, position);
                if let Some(previous_position) = previous {
                    if let Some((drag_device, drag_button, drag_modifiers)) = self.current_drag {
                        if device_id == drag_device {
                            self.viewer.navigation_mut().on_drag(
                                previous_position.x / self.current_scale_factor,
                                previous_position.y / self.current_scale_factor,
                                position.x / self.current_scale_factor,
                                position.y / self.current_scale_factor,
                                MouseDragSettings {
                                    button: util::mouse_button(drag_button),
                                    modifiers: util::modifiers(drag_modifiers),
                                },
                            );
                            self.request_redraw();
                        }
                    }
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.current_scale_factor = scale_factor;
            }
            WindowEvent::Resized(size) => {
                self.viewer.navigation_mut().on_window_resized(
                    size.width as f64 / self.current_scale_factor,
                    size.height as f64 / self.current_scale_factor,
                );
                self.request_redraw();
            }
            WindowEvent::MouseInput {
                state,
                button,
                device_id,
                ..
            } => {
                if button == WinitMouseButton::Right {
                    self.right_button_pressed = state == ElementState::Pressed;
                }
                match state {
                    ElementState::Pressed => {
                        if self.current_drag.is_none() {
                            self.current_drag = Some((device_id, button, self.modifiers));
                        }
                    }
                    ElementState::Released => {
                        if let Some((drag_device, drag_button, ..)) = self.current_drag {
                            if device_id == drag_device && button == drag_button {
                                self.current_drag = None;
                            }
                        }
                    }
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll_amount = match delta {
                    MouseScrollDelta::LineDelta(_, delta_y) => {
                        // assume a line to be equivalent to 20 logical pixels
                        delta_y as f64 * 20.0
                    }
                    MouseScrollDelta::PixelDelta(delta) => delta.y / self.current_scale_factor,
                };
                self.viewer.navigation_mut().on_scroll(scroll_amount);
                self.request_redraw();
            }
            _ => (),
        }
    }

    fn draw_scene(&self, frame: &mut Frame, state: &FrameState) -> RendererResult<()> {
        if let (Some(renderer), Some(points)) =
            (&self.points_renderer, self.viewer.buffers().points())
        {
            renderer.draw(frame, points, state, self.current_scale_factor)?;
        }

        if let Some(renderer) = &self.overlay_renderer {
            let buffers = self.viewer.buffers();
            if let Some(transform) = &state.axis {
                renderer.draw(frame, buffers.axis(), transform, self.current_scale_factor)?;
            }
            if let Some(transform) = &state.bounding_box {
                renderer.draw(
                    frame,
                    buffers.bounding_box(),
                    transform,
                    self.current_scale_factor,
                )?;
            }
            if state.show_legend {
                renderer.draw(
                    frame,
                    buffers.legend(),
                    &Matrix4::identity(),
                    self.current_scale_factor,
                )?;
            }
        }
        Ok(())
    }

    pub fn draw(&mut self) -> RendererResult<()> {
        let state = self.viewer.frame();

        // draw background
        let mut frame = self.display.draw();
        frame.clear_color_and_depth(
            (state.bg_color.r, state.bg_color.g, state.bg_color.b, 1.0),
            1.0,
        );

        // the frame has to be finished, even if drawing failed
        let result = self.draw_scene(&mut frame, &state);
        let finished = frame.finish().map_err(|e| RendererError::Graphics {
            source: Box::new(e),
        });
        result.and(finished)
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        debug!("Window closed: {:?}", self.os_id());
    }
}
