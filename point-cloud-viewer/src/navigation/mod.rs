//! Implementation of the camera controls.
use crate::navigation::event::MouseDragSettings;
use crate::scene::SceneBounds;
use nalgebra::{Matrix4, Vector2};

pub mod event;
pub mod orbit_navigation;

/// The Navigation is responsible for implementing the camera controls in the viewer.
///
/// It gets passed all input events, and controls the camera (view matrix and projection matrix)
/// based on the user input.
pub trait Navigation {
    /// Gets called, when the window size changes.
    fn on_window_resized(&mut self, w: f64, h: f64);

    /// Gets called, when the user "drags" the point cloud,
    /// by moving the mouse with a button held down by the specified amount of pixels.
    fn on_drag(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, drag: MouseDragSettings);

    /// Gets called, when the user scrolls with the mouse wheel.
    /// Positive values zoom in.
    fn on_scroll(&mut self, d: f64);

    /// Gets called each frame before the rendering starts.
    /// The matrices, that are returned by [Self::update] are used during rendering.
    fn update(&mut self) -> Matrices;

    /// Moves the camera back to its initial position for the given scene bounds.
    fn focus_on(&mut self, bounds: &SceneBounds);
}

/// Matrices, that define the camera behavior.
///
/// The **view matrix** transforms (homogeneous) coordinates from world space into camera space.
///
/// World space is the "original" coordinate system of the point clouds. It is a right-handed
/// coordinate system. The orbit camera keeps the y axis pointing up on the screen.
///
/// The **projection matrix** then transforms the coordinates in camera space to clip space.
/// For the clip space we are using clip coordinates, as defined by OpenGL.
/// In particular, clip space ranges from -1.0 to 1.0 for any of the three axes. Anything
/// outside that range will be clipped away.
///
/// Finally, the **window size** is the last bit of information that is needed, to map from
/// clip space to the actual on-screen pixel coordinates:
///  `x = (clip_x + 1.0) / 2.0 * window_size.x` and
///  `y = (clip_y + 1.0) / 2.0 * window_size.y`
#[derive(Clone, PartialEq, Debug)]
pub struct Matrices {
    pub view_matrix: Matrix4<f64>,
    pub projection_matrix: Matrix4<f64>,
    pub view_matrix_inv: Matrix4<f64>,
    pub projection_matrix_inv: Matrix4<f64>,
    pub window_size: Vector2<f64>,
}

impl Matrices {
    pub fn view_projection(&self) -> Matrix4<f64> {
        self.projection_matrix * self.view_matrix
    }
}
