//! The viewer: one point cloud, a camera, and the gpu buffers to draw them.
//!
//! A [Viewer] does not know about windows. The window toolkit forwards its input to the
//! [Viewer::navigation_mut] and asks for a [FrameState] each time it draws.

use crate::io::read_point_file;
use crate::navigation::orbit_navigation::{OrbitNavigation, ZoomMode};
use crate::navigation::{Matrices, Navigation};
use crate::renderer::error::RendererResult;
use crate::renderer::geometry;
use crate::renderer::gpu::{BufferSet, GpuBackend};
use crate::renderer::settings::{AxisAnchor, BaseRenderSettings, Color, RenderMode};
use crate::renderer::viewer_command::LoadMode;
use crate::scene::PointSet;
use log::{info, warn};
use nalgebra::Matrix4;
use std::path::{Path, PathBuf};

/// Everything needed to draw one frame.
#[derive(Clone, Debug)]
pub struct FrameState {
    pub matrices: Matrices,
    pub bg_color: Color,
    pub render_mode: RenderMode,
    pub point_size: f32,

    /// Lowest z value of the scene, for the elevation coloring.
    pub min_z: f32,

    /// Height of the scene, never zero.
    pub elevation_range: f32,

    /// Transformation of the bounding box wireframe into clip space, if it is visible.
    pub bounding_box: Option<Matrix4<f64>>,

    /// Transformation of the axis gizmo into clip space, if it is visible.
    pub axis: Option<Matrix4<f64>>,

    /// Whether the elevation legend is visible.
    pub show_legend: bool,
}

pub struct Viewer<B: GpuBackend> {
    backend: B,
    buffers: BufferSet<B>,
    points: PointSet,
    files: Vec<PathBuf>,
    navigation: OrbitNavigation,
    settings: BaseRenderSettings,
}

impl<B: GpuBackend> Viewer<B> {
    pub fn new(
        backend: B,
        settings: BaseRenderSettings,
        zoom_mode: ZoomMode,
    ) -> RendererResult<Self> {
        let buffers = BufferSet::new(&backend, &settings)?;
        let points = PointSet::new();
        let mut navigation = OrbitNavigation::new(zoom_mode);
        navigation.focus_on(points.bounds());
        Ok(Viewer {
            backend,
            buffers,
            points,
            files: Vec::new(),
            navigation,
            settings,
        })
    }

    /// Reads a point file and shows its points.
    ///
    /// If the file cannot be read or has no valid points, a warning is logged and
    /// the viewer keeps showing what it showed before.
    pub fn load_file(&mut self, path: &Path, mode: LoadMode) -> RendererResult<()> {
        let points = match read_point_file(path) {
            Ok(p) => p,
            Err(e) => {
                warn!("{}", e);
                return Err(e.into());
            }
        };
        let nr_points = points.len();
        self.set_points(points, mode)?;
        match mode {
            LoadMode::Replace => self.files = vec![path.to_owned()],
            LoadMode::Add => self.files.push(path.to_owned()),
        }
        info!(
            "Loaded {} points from {} ({} points in total)",
            nr_points,
            path.display(),
            self.points.len()
        );
        Ok(())
    }

    /// Replaces the current points, or adds to them.
    /// The camera is reset to look at the new scene.
    pub fn set_points(&mut self, points: PointSet, mode: LoadMode) -> RendererResult<()> {
        let new_points = match mode {
            LoadMode::Replace => points,
            LoadMode::Add => {
                let mut merged = self.points.clone();
                merged.append(points);
                merged
            }
        };
        if let Err(e) = self.buffers.replace_points(&self.backend, new_points.points()) {
            warn!("Could not upload the points to the gpu: {}", e);
            return Err(e);
        }
        self.points = new_points;
        if mode == LoadMode::Replace {
            self.files.clear();
        }
        self.navigation.focus_on(self.points.bounds());
        Ok(())
    }

    /// Title for the window: the loaded files and the elevation range.
    pub fn title(&self) -> String {
        if self.files.is_empty() {
            return self.settings.window_title.clone();
        }
        let names = self
            .files
            .iter()
            .map(|f| {
                f.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| f.display().to_string())
            })
            .collect::<Vec<_>>()
            .join(" + ");
        let bounds = self.points.bounds();
        format!(
            "{} - z [{:.3}, {:.3}]",
            names,
            bounds.min_z(),
            bounds.min_z() + bounds.extents().z
        )
    }

    pub fn points(&self) -> &PointSet {
        &self.points
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn settings(&self) -> &BaseRenderSettings {
        &self.settings
    }

    pub fn buffers(&self) -> &BufferSet<B> {
        &self.buffers
    }

    pub fn navigation(&self) -> &OrbitNavigation {
        &self.navigation
    }

    pub fn navigation_mut(&mut self) -> &mut OrbitNavigation {
        &mut self.navigation
    }

    pub fn set_render_mode(&mut self, render_mode: RenderMode) {
        self.settings.render_mode = render_mode;
    }

    pub fn toggle_color_bar(&mut self) {
        self.settings.show_color_bar = !self.settings.show_color_bar;
    }

    pub fn toggle_bounding_box(&mut self) {
        self.settings.show_bounding_box = !self.settings.show_bounding_box;
    }

    pub fn toggle_axis(&mut self) {
        self.settings.show_axis = !self.settings.show_axis;
    }

    pub fn cycle_axis_anchor(&mut self) {
        self.settings.axis_anchor = self.settings.axis_anchor.next();
    }

    pub fn reset_view(&mut self) {
        self.navigation.focus_on(self.points.bounds());
    }

    pub fn frame(&mut self) -> FrameState {
        let matrices = self.navigation.update();
        let bounds = *self.points.bounds();
        let has_points = !self.points.is_empty();

        let bounding_box = (has_points && self.settings.show_bounding_box)
            .then(|| matrices.view_projection() * geometry::bounding_box_transform(&bounds));
        let axis = self.settings.show_axis.then(|| match self.settings.axis_anchor {
            AxisAnchor::Screen => geometry::screen_axis_transform(&matrices),
            AxisAnchor::World => geometry::world_axis_transform(&bounds, &matrices),
        });
        let show_legend = has_points
            && self.settings.show_color_bar
            && self.settings.render_mode == RenderMode::Elevation;

        FrameState {
            bg_color: self.settings.bg_color,
            render_mode: self.settings.render_mode,
            point_size: self.settings.point_size,
            min_z: bounds.min_z() as f32,
            elevation_range: bounds.elevation_range() as f32,
            bounding_box,
            axis,
            show_legend,
            matrices,
        }
    }
}
