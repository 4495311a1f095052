//! Functionality to draw the points.

use crate::renderer::backends::glium::util::matrix_to_gl;
use crate::renderer::error::{RendererError, RendererResult};
use crate::renderer::settings::ColorMap;
use crate::renderer::viewer::FrameState;
use crate::scene::Point;
use glium::index::{NoIndices, PrimitiveType};
use glium::program::ProgramCreationInput;
use glium::texture::Texture1d;
use glium::uniform;
use glium::uniforms::{MagnifySamplerFilter, MinifySamplerFilter, SamplerWrapFunction};
use glium::{DepthTest, Display, DrawParameters, Frame, Program, Surface, VertexBuffer};

/// Number of texels of the color map lookup texture.
const COLOR_MAP_SIZE: usize = 128;

mod shaders {
    pub const POINT_VERT: &str = include_str!("./shaders/point.vert");
    pub const POINT_FRAG: &str = include_str!("./shaders/point.frag");
}

pub struct PointRenderer {
    shader_program: Program,
    color_map: Texture1d,
}

impl PointRenderer {
    pub fn new(display: &Display, color_map: &ColorMap) -> RendererResult<Self> {
        let shader_program = Program::new(
            display,
            ProgramCreationInput::SourceCode {
                vertex_shader: shaders::POINT_VERT,
                tessellation_control_shader: None,
                tessellation_evaluation_shader: None,
                geometry_shader: None,
                fragment_shader: shaders::POINT_FRAG,
                transform_feedback_varyings: None,
                outputs_srgb: false,
                uses_point_size: true,
            },
        )
        .map_err(|e| RendererError::Graphics {
            source: Box::new(e),
        })?;

        let texture_data = color_map
            .sample(COLOR_MAP_SIZE)
            .into_iter()
            .map(|c| (c.r, c.g, c.b))
            .collect::<Vec<_>>();
        let color_map = Texture1d::new(display, texture_data).map_err(|e| {
            RendererError::Graphics {
                source: Box::new(e),
            }
        })?;

        Ok(PointRenderer {
            shader_program,
            color_map,
        })
    }

    pub fn draw(
        &self,
        frame: &mut Frame,
        points: &VertexBuffer<Point>,
        state: &FrameState,
        scale_factor: f64,
    ) -> RendererResult<()> {
        let color_map = self
            .color_map
            .sampled()
            .wrap_function(SamplerWrapFunction::Clamp)
            .magnify_filter(MagnifySamplerFilter::Linear)
            .minify_filter(MinifySamplerFilter::Linear);
        let uniforms = uniform! {
            projection_matrix: matrix_to_gl(&state.matrices.projection_matrix),
            view_matrix: matrix_to_gl(&state.matrices.view_matrix),
            render_mode: state.render_mode.shader_value(),
            min_z: state.min_z,
            elevation_range: state.elevation_range,
            point_size: state.point_size * scale_factor as f32,
            color_map: color_map,
            color_map_size: COLOR_MAP_SIZE as f32,
        };

        let draw_parameters = DrawParameters {
            depth: glium::Depth {
                write: true,
                test: DepthTest::IfLess,
                ..Default::default()
            },
            ..Default::default()
        };

        frame
            .draw(
                points,
                &NoIndices(PrimitiveType::Points),
                &self.shader_program,
                &uniforms,
                &draw_parameters,
            )
            .map_err(|e| RendererError::Graphics {
                source: Box::new(e),
            })
    }
}
