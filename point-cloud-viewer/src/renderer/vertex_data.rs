//! Vertex types of the overlays drawn on top of the point cloud.

/// A colored vertex of the axis gizmo, the bounding box or the legend.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OverlayVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl OverlayVertex {
    pub const fn new(position: [f32; 3], color: [f32; 3]) -> Self {
        OverlayVertex { position, color }
    }
}

/// Primitive type, that a list of overlay vertices is drawn as.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum OverlayPrimitive {
    /// Every two vertices form a line.
    Lines,

    /// Every three vertices form a triangle.
    Triangles,
}
