//! Settings for how the point clouds should look.

use serde::{Deserialize, Serialize};

/// Settings for controlling the look of one point cloud viewer window.
#[derive(Clone, Debug)]
pub struct BaseRenderSettings {
    /// Window title of the renderer window, before a file is loaded.
    pub window_title: String,

    /// Background color
    pub bg_color: Color,

    /// How the points are colored.
    pub render_mode: RenderMode,

    /// Size of the points, in logical pixels.
    pub point_size: f32,

    /// Draw the bounding box of the scene as a wireframe.
    pub show_bounding_box: bool,

    /// Color of the bounding box wireframe.
    pub bounding_box_color: Color,

    /// Draw the axis gizmo.
    pub show_axis: bool,

    /// Where the axis gizmo is placed.
    pub axis_anchor: AxisAnchor,

    /// Draw the elevation legend. Only visible in [RenderMode::Elevation].
    pub show_color_bar: bool,

    /// Color map used for the elevation coloring and the legend.
    pub color_map: ColorMap,
}

/// Defines, how the points should be colored.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize, Default)]
pub enum RenderMode {
    /// Color every point by its height, sampling from the elevation color map.
    #[default]
    Elevation,

    /// Use the color from the point file.
    Rgb,
}

/// Placement of the axis gizmo.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize, Default)]
pub enum AxisAnchor {
    /// Fixed size, in the lower left corner of the window. Only rotates with the camera.
    #[default]
    Screen,

    /// Placed at the minimum corner of the bounding box, scaled with the scene.
    World,
}

/// Position and size of a window, in physical pixels.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct WindowGeometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowGeometry {
    fn default() -> Self {
        WindowGeometry {
            x: 100,
            y: 100,
            width: 800,
            height: 600,
        }
    }
}

/// Defines a mapping from an input value between 0.0 and 1.0 to a color.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorMap {
    colors: Vec<(f32, Color)>,
}

/// An RGB color value.
/// Each of the three channels should be in between 0.0 and 1.0.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Color {
    /// red
    pub r: f32,

    /// green
    pub g: f32,

    /// blue
    pub b: f32,
}

impl RenderMode {
    /// The value of the render mode uniform in the point shader.
    pub fn shader_value(&self) -> i32 {
        match self {
            RenderMode::Elevation => 0,
            RenderMode::Rgb => 1,
        }
    }
}

impl AxisAnchor {
    pub fn next(&self) -> AxisAnchor {
        match self {
            AxisAnchor::Screen => AxisAnchor::World,
            AxisAnchor::World => AxisAnchor::Screen,
        }
    }
}

impl Color {
    /// Creates a color from a r, g, b component
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Color { r, g, b }
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    pub const YELLOW: Color = Color::rgb(1.0, 1.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const DARK_BLUE: Color = Color::rgb(0.0, 0.0, 0.5);

    // greys
    pub const GREY_05: Color = Color::rgb(0.05, 0.05, 0.05);
    pub const GREY_7: Color = Color::rgb(0.7, 0.7, 0.7);
}

impl ColorMap {
    /// Elevation ramp: dark blue at the lowest point, over green and yellow to white.
    pub fn elevation() -> ColorMap {
        ColorMap {
            colors: vec![
                (0.0, Color::DARK_BLUE),
                (0.25, Color::GREEN),
                (0.5, Color::YELLOW),
                (0.75, Color::WHITE),
                (1.0, Color::WHITE),
            ],
        }
    }

    /// The stops of the color map, in ascending order.
    pub fn stops(&self) -> &[(f32, Color)] {
        &self.colors
    }

    /// Samples the color map at the given position.
    /// The value where the color map is sampled should be between 0.0 and 1.0.
    pub fn color_at(&self, value: f32) -> Color {
        let Some(&(min_val, min_color)) = self.colors.first() else {
            return Color::WHITE;
        };
        if value <= min_val {
            return min_color;
        }

        for window in self.colors.windows(2) {
            let (left_val, left_color) = window[0];
            let (right_val, right_color) = window[1];
            if left_val < value && value <= right_val {
                let f1 = (right_val - value) / (right_val - left_val);
                let f2 = (value - left_val) / (right_val - left_val);
                return Color {
                    r: f1 * left_color.r + f2 * right_color.r,
                    g: f1 * left_color.g + f2 * right_color.g,
                    b: f1 * left_color.b + f2 * right_color.b,
                };
            }
        }

        self.colors.last().map_or(min_color, |&(_, c)| c)
    }

    /// Samples the color map at equally spaced positions, e.g. to fill a lookup texture.
    pub fn sample(&self, nr_samples: usize) -> Vec<Color> {
        let divisor = nr_samples.saturating_sub(1).max(1) as f32;
        (0..nr_samples)
            .map(|i| self.color_at(i as f32 / divisor))
            .collect()
    }
}

impl Default for BaseRenderSettings {
    fn default() -> Self {
        BaseRenderSettings {
            window_title: "Point Cloud Viewer".to_string(),
            bg_color: Color::GREY_05,
            render_mode: RenderMode::default(),
            point_size: 2.0,
            show_bounding_box: true,
            bounding_box_color: Color::GREY_7,
            show_axis: true,
            axis_anchor: AxisAnchor::default(),
            show_color_bar: true,
            color_map: ColorMap::elevation(),
        }
    }
}

impl Default for ColorMap {
    fn default() -> Self {
        ColorMap::elevation()
    }
}

#[cfg(test)]
mod tests {
    use super::{AxisAnchor, Color, ColorMap, RenderMode};

    #[test]
    fn test_elevation_ramp_end_stops() {
        let map = ColorMap::elevation();
        assert_eq!(map.color_at(0.0), Color::DARK_BLUE);
        assert_eq!(map.color_at(0.25), Color::GREEN);
        assert_eq!(map.color_at(0.5), Color::YELLOW);
        assert_eq!(map.color_at(1.0), Color::WHITE);
        assert_eq!(map.stops().len(), 5);
    }

    #[test]
    fn test_color_at_clamps_outside_range() {
        let map = ColorMap::elevation();
        assert_eq!(map.color_at(-3.0), Color::DARK_BLUE);
        assert_eq!(map.color_at(7.0), Color::WHITE);
        assert_eq!(map.color_at(0.125), Color::rgb(0.0, 0.5, 0.25));
    }

    #[test]
    fn test_sample() {
        let map = ColorMap::elevation();
        let samples = map.sample(5);
        assert_eq!(
            samples,
            vec![
                Color::DARK_BLUE,
                Color::GREEN,
                Color::YELLOW,
                Color::WHITE,
                Color::WHITE
            ]
        );
    }

    #[test]
    fn test_render_mode_shader_values() {
        assert_eq!(RenderMode::Elevation.shader_value(), 0);
        assert_eq!(RenderMode::Rgb.shader_value(), 1);
    }

    #[test]
    fn test_axis_anchor_cycles() {
        assert_eq!(AxisAnchor::Screen.next(), AxisAnchor::World);
        assert_eq!(AxisAnchor::Screen.next().next(), AxisAnchor::Screen);
    }
}
