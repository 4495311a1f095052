//! An orbiting camera.

use crate::navigation::event::{MouseButton, MouseDragSettings};
use crate::navigation::{Matrices, Navigation};
use crate::scene::SceneBounds;
use nalgebra::{Matrix4, Point3, Vector2, Vector3};
use serde::{Deserialize, Serialize};

/// Yaw of the camera after a reset, in degrees.
pub const INITIAL_YAW: f64 = -90.0;

/// Pitch of the camera after a reset, in degrees.
pub const INITIAL_PITCH: f64 = -20.0;

/// Distance of the camera after a reset, relative to the scene radius.
pub const INITIAL_DISTANCE_FACTOR: f64 = 2.5;

/// The pitch is kept away from the poles, where the up vector would become degenerate.
pub const MAX_PITCH: f64 = 89.0;

/// Vertical field of view in degrees.
pub const FIELD_OF_VIEW: f64 = 45.0;

/// Defines, how the distance between camera and target changes when scrolling.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ZoomMode {
    /// Each scroll step multiplies the distance by 0.9 (zoom in) or 1.1 (zoom out).
    Linear { min: f64, max: f64 },

    /// Each scroll step adds a fixed step to the logarithm of the distance,
    /// so zooming feels the same at every scale.
    Logarithmic { step: f64, min: f64, max: f64 },
}

impl ZoomMode {
    pub fn linear() -> Self {
        ZoomMode::Linear {
            min: 1.0,
            max: 100.0,
        }
    }

    pub fn logarithmic() -> Self {
        ZoomMode::Logarithmic {
            step: 0.1,
            min: 1e-3,
            max: 1e6,
        }
    }

    /// Smallest and largest distance reachable by scrolling.
    pub fn bounds(&self) -> (f64, f64) {
        match *self {
            ZoomMode::Linear { min, max } => (min, max),
            ZoomMode::Logarithmic { min, max, .. } => (min, max),
        }
    }
}

impl Default for ZoomMode {
    fn default() -> Self {
        ZoomMode::logarithmic()
    }
}

/// A camera that orbits around the center of the scene.
///
/// Dragging with the left mouse button rotates the camera around the target, scrolling moves
/// it closer to or further away from the target.
pub struct OrbitNavigation {
    /// size of the window in (scaled) pixels
    window_size: Vector2<f64>,

    /// The point the camera looks at and orbits around.
    target: Point3<f64>,

    /// Horizontal angle in degrees.
    yaw: f64,

    /// Vertical angle in degrees, within [-MAX_PITCH, MAX_PITCH].
    pitch: f64,

    /// Natural logarithm of the distance between camera and target.
    log_camera_distance: f64,

    /// Degrees of rotation per pixel of mouse movement.
    drag_sensitivity: f64,

    zoom_mode: ZoomMode,
}

impl OrbitNavigation {
    pub fn new(zoom_mode: ZoomMode) -> Self {
        OrbitNavigation {
            window_size: Vector2::new(1.0, 1.0),
            target: Point3::origin(),
            yaw: INITIAL_YAW,
            pitch: INITIAL_PITCH,
            log_camera_distance: INITIAL_DISTANCE_FACTOR.ln(),
            drag_sensitivity: 0.3,
            zoom_mode,
        }
    }

    pub fn yaw(&self) -> f64 {
        self.yaw
    }

    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    pub fn distance(&self) -> f64 {
        self.log_camera_distance.exp()
    }

    pub fn target(&self) -> Point3<f64> {
        self.target
    }

    /// Position of the camera in world space.
    pub fn camera_position(&self) -> Point3<f64> {
        let yaw = self.yaw.to_radians();
        let pitch = self.pitch.to_radians();
        let direction = Vector3::new(
            pitch.cos() * yaw.cos(),
            pitch.sin(),
            pitch.cos() * yaw.sin(),
        );
        self.target + direction * self.distance()
    }

    fn min_render_distance(&self) -> f64 {
        self.distance() * 0.01
    }

    fn max_render_distance(&self) -> f64 {
        self.distance() * 10000.0
    }
}

impl Navigation for OrbitNavigation {
    fn on_window_resized(&mut self, w: f64, h: f64) {
        self.window_size.x = w.max(1.0);
        self.window_size.y = h.max(1.0);
    }

    fn on_drag(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, drag: MouseDragSettings) {
        if drag.button != MouseButton::Left {
            return;
        }
        self.yaw += (x2 - x1) * self.drag_sensitivity;
        self.pitch = (self.pitch - (y2 - y1) * self.drag_sensitivity).clamp(-MAX_PITCH, MAX_PITCH);
    }

    fn on_scroll(&mut self, d: f64) {
        if d == 0.0 || d.is_nan() {
            return;
        }
        let distance = match self.zoom_mode {
            ZoomMode::Linear { min, max } => {
                let factor = if d > 0.0 { 0.9 } else { 1.1 };
                (self.distance() * factor).clamp(min, max)
            }
            ZoomMode::Logarithmic { step, min, max } => {
                let log_distance = self.log_camera_distance - step * d.signum();
                log_distance.exp().clamp(min, max)
            }
        };
        self.log_camera_distance = distance.ln();
    }

    fn update(&mut self) -> Matrices {
        let view_matrix = Matrix4::look_at_rh(
            &self.camera_position(),
            &self.target,
            &Vector3::new(0.0, 1.0, 0.0),
        );
        // look_at_rh is a rigid transform, so it is always invertible
        let view_matrix_inv = view_matrix.try_inverse().unwrap_or_else(Matrix4::identity);

        let projection_matrix = Matrix4::new_perspective(
            self.window_size.x / self.window_size.y,
            FIELD_OF_VIEW.to_radians(),
            self.min_render_distance(),
            self.max_render_distance(),
        );
        let projection_matrix_inv = projection_matrix
            .try_inverse()
            .unwrap_or_else(Matrix4::identity);

        Matrices {
            view_matrix,
            projection_matrix,
            view_matrix_inv,
            projection_matrix_inv,
            window_size: self.window_size,
        }
    }

    fn focus_on(&mut self, bounds: &SceneBounds) {
        self.target = bounds.center();
        self.yaw = INITIAL_YAW;
        self.pitch = INITIAL_PITCH;
        self.log_camera_distance = (INITIAL_DISTANCE_FACTOR * bounds.radius()).ln();
    }
}

impl Default for OrbitNavigation {
    fn default() -> Self {
        Self::new(ZoomMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::{MAX_PITCH, OrbitNavigation, ZoomMode};
    use crate::navigation::Navigation;
    use crate::navigation::event::{Modifiers, MouseButton, MouseDragSettings};
    use crate::scene::SceneBounds;
    use nalgebra::{Vector4, point};

    fn drag(button: MouseButton) -> MouseDragSettings {
        MouseDragSettings {
            button,
            modifiers: Modifiers::default(),
        }
    }

    fn unit_bounds() -> SceneBounds {
        let mut bounds = SceneBounds::empty();
        bounds.extend(point![0.0, 0.0, 0.0]);
        bounds.extend(point![1.0, 1.0, 1.0]);
        bounds
    }

    #[test]
    fn test_focus_on_resets_camera() {
        let mut nav = OrbitNavigation::default();
        nav.on_drag(0.0, 0.0, 100.0, 50.0, drag(MouseButton::Left));
        nav.on_scroll(20.0);
        let bounds = unit_bounds();
        nav.focus_on(&bounds);
        assert_eq!(nav.yaw(), -90.0);
        assert_eq!(nav.pitch(), -20.0);
        assert!((nav.distance() - 2.5 * bounds.radius()).abs() < 1e-9);
        assert_eq!(nav.target(), point![0.5, 0.5, 0.5]);
    }

    #[test]
    fn test_drag_rotates() {
        let mut nav = OrbitNavigation::default();
        nav.on_drag(10.0, 10.0, 20.0, 0.0, drag(MouseButton::Left));
        assert!((nav.yaw() - (-90.0 + 3.0)).abs() < 1e-9);
        assert!((nav.pitch() - (-20.0 + 3.0)).abs() < 1e-9);
    }

    #[test]
    fn test_drag_with_other_buttons_is_ignored() {
        let mut nav = OrbitNavigation::default();
        nav.on_drag(0.0, 0.0, 50.0, 50.0, drag(MouseButton::Right));
        nav.on_drag(0.0, 0.0, 50.0, 50.0, drag(MouseButton::Middle));
        assert_eq!(nav.yaw(), -90.0);
        assert_eq!(nav.pitch(), -20.0);
    }

    #[test]
    fn test_pitch_stays_clamped() {
        let mut nav = OrbitNavigation::default();
        for dy in [-1000.0, 37.0, 5000.0, -3.0, -10000.0, 250.0] {
            nav.on_drag(0.0, 0.0, 0.0, dy, drag(MouseButton::Left));
            assert!(nav.pitch() >= -MAX_PITCH && nav.pitch() <= MAX_PITCH);
        }
        nav.on_drag(0.0, 0.0, 0.0, 10000.0, drag(MouseButton::Left));
        assert_eq!(nav.pitch(), -MAX_PITCH);
    }

    #[test]
    fn test_linear_zoom() {
        let mut nav = OrbitNavigation::new(ZoomMode::linear());
        nav.focus_on(&unit_bounds());
        let before = nav.distance();
        nav.on_scroll(20.0);
        assert!((nav.distance() - (before * 0.9).max(1.0)).abs() < 1e-9);

        let mut nav = OrbitNavigation::new(ZoomMode::linear());
        let mut bounds = SceneBounds::empty();
        bounds.extend(point![0.0, 0.0, 0.0]);
        bounds.extend(point![10.0, 0.0, 0.0]);
        nav.focus_on(&bounds);
        nav.on_scroll(-1.0);
        assert!((nav.distance() - 12.5 * 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_stays_within_bounds() {
        for mode in [ZoomMode::linear(), ZoomMode::logarithmic()] {
            let (min, max) = mode.bounds();
            let mut nav = OrbitNavigation::new(mode);
            nav.focus_on(&unit_bounds());
            for _ in 0..500 {
                nav.on_scroll(1.0);
                assert!(nav.distance() >= min * (1.0 - 1e-9));
            }
            for _ in 0..1000 {
                nav.on_scroll(-120.0);
                assert!(nav.distance() <= max * (1.0 + 1e-9));
            }
        }
    }

    #[test]
    fn test_logarithmic_zoom_steps_are_uniform() {
        let mut nav = OrbitNavigation::new(ZoomMode::logarithmic());
        nav.focus_on(&unit_bounds());
        let d0 = nav.distance();
        nav.on_scroll(5.0);
        let d1 = nav.distance();
        nav.on_scroll(300.0);
        let d2 = nav.distance();
        assert!((d1 / d0 - (-0.1_f64).exp()).abs() < 1e-9);
        assert!((d2 / d1 - (-0.1_f64).exp()).abs() < 1e-9);
        nav.on_scroll(-1.0);
        assert!((nav.distance() - d1).abs() < 1e-9);
    }

    #[test]
    fn test_zero_scroll_does_nothing() {
        let mut nav = OrbitNavigation::new(ZoomMode::linear());
        let before = nav.distance();
        nav.on_scroll(0.0);
        assert_eq!(nav.distance(), before);
    }

    #[test]
    fn test_target_projects_to_screen_center() {
        let mut nav = OrbitNavigation::default();
        nav.on_window_resized(800.0, 600.0);
        nav.focus_on(&unit_bounds());
        let matrices = nav.update();
        let clip = matrices.view_projection() * Vector4::new(0.5, 0.5, 0.5, 1.0);
        assert!((clip.x / clip.w).abs() < 1e-9);
        assert!((clip.y / clip.w).abs() < 1e-9);
        assert!(clip.z / clip.w > -1.0 && clip.z / clip.w < 1.0);
    }
}
