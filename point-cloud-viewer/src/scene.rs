//! Points and the bounds of the scene they span.

use nalgebra::{Point3, Vector3, point};

/// Radius of a scene, below which it is considered degenerate.
pub const RADIUS_EPSILON: f64 = 1e-6;

/// Elevation range of a scene, below which it is considered flat.
pub const ELEVATION_EPSILON: f64 = 1e-6;

/// A single point, as it is stored in memory and uploaded to the gpu.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Point {
    /// Position in world space.
    pub position: [f32; 3],

    /// RGB color, each channel between 0.0 and 1.0.
    pub color: [f32; 3],
}

impl Point {
    pub const DEFAULT_COLOR: [f32; 3] = [1.0, 1.0, 1.0];

    pub fn new(position: [f32; 3], color: [f32; 3]) -> Self {
        Point { position, color }
    }

    fn world_position(&self) -> Point3<f64> {
        point![
            self.position[0] as f64,
            self.position[1] as f64,
            self.position[2] as f64
        ]
    }
}

/// Axis aligned bounds of all loaded points.
///
/// An empty bounding box has its minimum at f64::MAX and its maximum at f64::MIN,
/// so that the first call to [SceneBounds::extend] sets both corners.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SceneBounds {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl SceneBounds {
    /// Constructs an empty bounding box.
    pub fn empty() -> Self {
        SceneBounds {
            min: point![f64::MAX, f64::MAX, f64::MAX],
            max: point![f64::MIN, f64::MIN, f64::MIN],
        }
    }

    /// Checks, if the bounding box is empty.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Grow the bounds, so that they contain the given position.
    pub fn extend(&mut self, position: Point3<f64>) {
        for i in 0..3 {
            if self.min[i] > position[i] {
                self.min[i] = position[i];
            }
            if self.max[i] < position[i] {
                self.max[i] = position[i];
            }
        }
    }

    /// Grow the bounds, so that they contain the other bounds.
    pub fn extend_bounds(&mut self, other: &SceneBounds) {
        if !other.is_empty() {
            self.extend(other.min);
            self.extend(other.max);
        }
    }

    /// Center of the bounds. The origin, for empty bounds.
    pub fn center(&self) -> Point3<f64> {
        if self.is_empty() {
            Point3::origin()
        } else {
            nalgebra::center(&self.min, &self.max)
        }
    }

    /// Size along each axis. Zero, for empty bounds.
    pub fn extents(&self) -> Vector3<f64> {
        if self.is_empty() {
            Vector3::zeros()
        } else {
            self.max - self.min
        }
    }

    /// Half the length of the diagonal.
    /// Degenerate scenes (a single point, or nothing at all) get a radius of 1.0.
    pub fn radius(&self) -> f64 {
        let radius = 0.5 * self.extents().norm();
        if radius < RADIUS_EPSILON {
            1.0
        } else {
            radius
        }
    }

    /// Lowest z value. Zero, for empty bounds.
    pub fn min_z(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.min.z
        }
    }

    /// Height of the scene, with flat scenes falling back to a range of 1.0.
    pub fn elevation_range(&self) -> f64 {
        let range = self.extents().z;
        if range < ELEVATION_EPSILON {
            1.0
        } else {
            range
        }
    }

    /// Maps a z value to the unit interval, with the lowest point at 0.0 and the highest at 1.0.
    pub fn normalized_elevation(&self, z: f64) -> f64 {
        ((z - self.min_z()) / self.elevation_range()).clamp(0.0, 1.0)
    }
}

impl Default for SceneBounds {
    fn default() -> Self {
        Self::empty()
    }
}

/// A flat list of points in file order, together with their bounds.
#[derive(Clone, Debug, Default)]
pub struct PointSet {
    points: Vec<Point>,
    bounds: SceneBounds,
}

impl PointSet {
    pub fn new() -> Self {
        PointSet {
            points: Vec::new(),
            bounds: SceneBounds::empty(),
        }
    }

    pub fn push(&mut self, point: Point) {
        self.bounds.extend(point.world_position());
        self.points.push(point);
    }

    /// Appends all points of the other set, keeping their order.
    pub fn append(&mut self, other: PointSet) {
        self.bounds.extend_bounds(&other.bounds);
        self.points.extend(other.points);
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn bounds(&self) -> &SceneBounds {
        &self.bounds
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl FromIterator<Point> for PointSet {
    fn from_iter<T: IntoIterator<Item = Point>>(iter: T) -> Self {
        let mut set = PointSet::new();
        for point in iter {
            set.push(point);
        }
        set
    }
}
