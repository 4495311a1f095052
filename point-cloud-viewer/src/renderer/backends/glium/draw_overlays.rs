//! Functionality to draw the axis gizmo, the bounding box and the legend.
//!
//! Overlays are drawn after the points, without depth test and without writing depth.

use crate::renderer::OverlayPrimitive;
use crate::renderer::backends::glium::buffers::OverlayBuffer;
use crate::renderer::backends::glium::util::matrix_to_gl;
use crate::renderer::error::{RendererError, RendererResult};
use glium::index::{NoIndices, PrimitiveType};
use glium::uniform;
use glium::{DepthTest, Display, DrawParameters, Frame, Program, Surface};
use nalgebra::Matrix4;

mod shaders {
    pub const OVERLAY_VERT: &str = include_str!("./shaders/overlay.vert");
    pub const OVERLAY_FRAG: &str = include_str!("./shaders/overlay.frag");
}

/// Width of the overlay lines, in logical pixels.
const LINE_WIDTH: f32 = 1.5;

pub struct OverlayRenderer {
    shader_program: Program,
}

impl OverlayRenderer {
    pub fn new(display: &Display) -> RendererResult<Self> {
        let shader_program =
            Program::from_source(display, shaders::OVERLAY_VERT, shaders::OVERLAY_FRAG, None)
                .map_err(|e| RendererError::Graphics {
                    source: Box::new(e),
                })?;
        Ok(OverlayRenderer { shader_program })
    }

    /// Draws the overlay, with the transform mapping its vertices into clip space.
    pub fn draw(
        &self,
        frame: &mut Frame,
        overlay: &OverlayBuffer,
        transform: &Matrix4<f64>,
        scale_factor: f64,
    ) -> RendererResult<()> {
        let uniforms = uniform! {
            transform: matrix_to_gl(transform),
        };

        let draw_parameters = DrawParameters {
            line_width: Some(LINE_WIDTH * scale_factor as f32),
            depth: glium::Depth {
                write: false,
                test: DepthTest::Overwrite,
                ..Default::default()
            },
            ..Default::default()
        };

        let primitive = match overlay.primitive {
            OverlayPrimitive::Lines => PrimitiveType::LinesList,
            OverlayPrimitive::Triangles => PrimitiveType::TrianglesList,
        };

        frame
            .draw(
                &overlay.vertices,
                &NoIndices(primitive),
                &self.shader_program,
                &uniforms,
                &draw_parameters,
            )
            .map_err(|e| RendererError::Graphics {
                source: Box::new(e),
            })
    }
}
