//! Gpu buffers backed by glium vertex buffers.

use crate::renderer::error::{RendererError, RendererResult};
use crate::renderer::gpu::GpuBackend;
use crate::renderer::{OverlayPrimitive, OverlayVertex};
use crate::scene::Point;
use glium::implement_vertex;
use glium::{Display, VertexBuffer};

implement_vertex!(Point, position, color);
implement_vertex!(OverlayVertex, position, color);

/// Uploads vertex data to the context of one window.
pub struct GliumBackend {
    display: Display,
}

/// Vertices of one overlay, together with how they are to be drawn.
pub struct OverlayBuffer {
    pub vertices: VertexBuffer<OverlayVertex>,
    pub primitive: OverlayPrimitive,
}

impl GliumBackend {
    pub fn new(display: Display) -> Self {
        GliumBackend { display }
    }
}

impl GpuBackend for GliumBackend {
    type PointBuffer = VertexBuffer<Point>;
    type OverlayBuffer = OverlayBuffer;

    fn upload_points(&self, points: &[Point]) -> RendererResult<VertexBuffer<Point>> {
        VertexBuffer::new(&self.display, points).map_err(|e| RendererError::Graphics {
            source: Box::new(e),
        })
    }

    fn upload_overlay(
        &self,
        vertices: &[OverlayVertex],
        primitive: OverlayPrimitive,
    ) -> RendererResult<OverlayBuffer> {
        let vertices =
            VertexBuffer::new(&self.display, vertices).map_err(|e| RendererError::Graphics {
                source: Box::new(e),
            })?;
        Ok(OverlayBuffer {
            vertices,
            primitive,
        })
    }
}
