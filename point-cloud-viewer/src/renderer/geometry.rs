//! Geometry of the overlays: bounding box wireframe, axis gizmo and elevation legend.
//!
//! The vertex data is built once on the cpu and placed into the scene by a transformation
//! matrix, that is recomputed every frame.

use crate::navigation::Matrices;
use crate::renderer::settings::{Color, ColorMap};
use crate::renderer::vertex_data::OverlayVertex;
use crate::scene::SceneBounds;
use nalgebra::{Matrix4, Vector3};

/// Length of the screen anchored axis gizmo, in logical pixels.
pub const AXIS_LENGTH_PX: f64 = 40.0;

/// Distance of the screen anchored axis gizmo from the lower left window corner, in logical pixels.
pub const AXIS_MARGIN_PX: f64 = 60.0;

/// Length of the world anchored axis gizmo, relative to the scene radius.
pub const WORLD_AXIS_SCALE: f64 = 0.2;

/// Placement of the legend in normalized device coordinates.
pub const LEGEND_LEFT: f32 = 0.85;
pub const LEGEND_RIGHT: f32 = 0.9;
pub const LEGEND_BOTTOM: f32 = -0.8;
pub const LEGEND_TOP: f32 = 0.8;

/// The 12 edges of the unit cube as a line list.
pub fn bounding_box_vertices(color: Color) -> Vec<OverlayVertex> {
    let color = color.to_array();
    let mut vertices = Vec::with_capacity(24);
    for axis in 0..3 {
        let u = (axis + 1) % 3;
        let v = (axis + 2) % 3;
        for (a, b) in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)] {
            let mut start = [0.0_f32; 3];
            start[u] = a;
            start[v] = b;
            let mut end = start;
            end[axis] = 1.0;
            vertices.push(OverlayVertex::new(start, color));
            vertices.push(OverlayVertex::new(end, color));
        }
    }
    vertices
}

/// Model matrix, that stretches the unit cube over the scene bounds.
pub fn bounding_box_transform(bounds: &SceneBounds) -> Matrix4<f64> {
    Matrix4::new_translation(&bounds.min.coords) * Matrix4::new_nonuniform_scaling(&bounds.extents())
}

/// Three unit lines along the x (red), y (green) and z (blue) axis.
pub fn axis_vertices() -> Vec<OverlayVertex> {
    let origin = [0.0, 0.0, 0.0];
    vec![
        OverlayVertex::new(origin, Color::RED.to_array()),
        OverlayVertex::new([1.0, 0.0, 0.0], Color::RED.to_array()),
        OverlayVertex::new(origin, Color::GREEN.to_array()),
        OverlayVertex::new([0.0, 1.0, 0.0], Color::GREEN.to_array()),
        OverlayVertex::new(origin, Color::BLUE.to_array()),
        OverlayVertex::new([0.0, 0.0, 1.0], Color::BLUE.to_array()),
    ]
}

/// Transformation of the axis gizmo directly into clip space.
///
/// The gizmo keeps a fixed on-screen size and sits in the lower left corner.
/// Only the rotational part of the view matrix is applied.
pub fn screen_axis_transform(matrices: &Matrices) -> Matrix4<f64> {
    let w = matrices.window_size.x.max(1.0);
    let h = matrices.window_size.y.max(1.0);

    let mut rotation = matrices.view_matrix;
    rotation.m14 = 0.0;
    rotation.m24 = 0.0;
    rotation.m34 = 0.0;

    // depth is irrelevant for the gizmo, it only needs to stay inside the clip volume
    let scale = Matrix4::new_nonuniform_scaling(&Vector3::new(
        2.0 * AXIS_LENGTH_PX / w,
        2.0 * AXIS_LENGTH_PX / h,
        0.01,
    ));
    let translation = Matrix4::new_translation(&Vector3::new(
        -1.0 + 2.0 * AXIS_MARGIN_PX / w,
        -1.0 + 2.0 * AXIS_MARGIN_PX / h,
        0.0,
    ));
    translation * scale * rotation
}

/// Transformation of the axis gizmo, when it is placed at the minimum corner of the scene.
pub fn world_axis_transform(bounds: &SceneBounds, matrices: &Matrices) -> Matrix4<f64> {
    let origin = if bounds.is_empty() {
        Vector3::zeros()
    } else {
        bounds.min.coords
    };
    matrices.view_projection()
        * Matrix4::new_translation(&origin)
        * Matrix4::new_scaling(WORLD_AXIS_SCALE * bounds.radius())
}

/// A vertical color bar at the right edge of the window, as a triangle list in
/// normalized device coordinates. Each segment of the color map becomes one quad.
pub fn legend_vertices(color_map: &ColorMap) -> Vec<OverlayVertex> {
    let height = LEGEND_TOP - LEGEND_BOTTOM;
    let mut vertices = Vec::new();
    for segment in color_map.stops().windows(2) {
        let (t0, c0) = segment[0];
        let (t1, c1) = segment[1];
        let y0 = LEGEND_BOTTOM + height * t0;
        let y1 = LEGEND_BOTTOM + height * t1;
        let (c0, c1) = (c0.to_array(), c1.to_array());

        let bottom_left = OverlayVertex::new([LEGEND_LEFT, y0, 0.0], c0);
        let bottom_right = OverlayVertex::new([LEGEND_RIGHT, y0, 0.0], c0);
        let top_left = OverlayVertex::new([LEGEND_LEFT, y1, 0.0], c1);
        let top_right = OverlayVertex::new([LEGEND_RIGHT, y1, 0.0], c1);
        vertices.extend_from_slice(&[
            bottom_left,
            bottom_right,
            top_right,
            bottom_left,
            top_right,
            top_left,
        ]);
    }
    vertices
}
