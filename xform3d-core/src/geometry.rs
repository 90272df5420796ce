//! Point-set geometry fed through transforms
use nalgebra::{Point3, Vector3};

/// Ordered sequence of 3D points
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointSet {
    pub points: Vec<Point3<f64>>,
}

impl PointSet {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    pub fn from_points(points: Vec<Point3<f64>>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn add_point(&mut self, point: Point3<f64>) {
        self.points.push(point);
    }

    /// Append every point of `other` after the existing ones
    pub fn append(&mut self, other: &PointSet) {
        self.points.extend_from_slice(&other.points);
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` for an empty set
    pub fn bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = *self.points.first()?;
        Some(self.points.iter().fold((first, first), |(min, max), p| {
            (min.inf(p), max.sup(p))
        }))
    }

    /// Largest distance between corresponding points, or `None` when the
    /// sets differ in length
    pub fn max_deviation(&self, other: &PointSet) -> Option<f64> {
        if self.len() != other.len() {
            return None;
        }
        Some(
            self.points
                .iter()
                .zip(&other.points)
                .map(|(a, b)| (a - b).norm())
                .fold(0.0, f64::max),
        )
    }

    /// Six slightly offset square planes around the unit cube centred at the
    /// origin, each sampled as a `resolution` x `resolution` grid
    pub fn coverage_box(offset: f64, resolution: usize) -> Self {
        let o = offset;
        // (origin, point1, point2) per face
        let faces = [
            ([0.5, o, -0.5], [-0.5, o, -0.5], [0.5, o, 0.5]),
            ([-o, 0.5, -0.5], [-o, -0.5, -0.5], [-o, 0.5, 0.5]),
            ([-0.5, -o, -0.5], [0.5, -o, -0.5], [-0.5, -o, 0.5]),
            ([o, -0.5, -0.5], [o, 0.5, -0.5], [o, -0.5, 0.5]),
            ([0.5, 0.5, -o], [0.5, -0.5, -o], [-0.5, 0.5, -o]),
            ([0.5, 0.5, o], [-0.5, 0.5, o], [0.5, -0.5, o]),
        ];

        let mut set = Self::new();
        for (origin, point1, point2) in faces {
            let plane = PlaneSource::new(
                Point3::from(origin),
                Point3::from(point1),
                Point3::from(point2),
            )
            .with_resolution(resolution, resolution);
            set.append(&plane.points());
        }
        set
    }
}

/// Parallelogram sampled on a regular grid
#[derive(Debug, Clone)]
pub struct PlaneSource {
    pub origin: Point3<f64>,
    pub point1: Point3<f64>,
    pub point2: Point3<f64>,
    pub x_resolution: usize,
    pub y_resolution: usize,
}

impl PlaneSource {
    pub fn new(origin: Point3<f64>, point1: Point3<f64>, point2: Point3<f64>) -> Self {
        Self {
            origin,
            point1,
            point2,
            x_resolution: 1,
            y_resolution: 1,
        }
    }

    /// Set the number of subdivisions along each edge; zero is treated as one
    pub fn with_resolution(mut self, x_resolution: usize, y_resolution: usize) -> Self {
        self.x_resolution = x_resolution.max(1);
        self.y_resolution = y_resolution.max(1);
        self
    }

    /// Grid points, row by row along `point1`
    pub fn points(&self) -> PointSet {
        let v1: Vector3<f64> = self.point1 - self.origin;
        let v2: Vector3<f64> = self.point2 - self.origin;
        let mut set = PointSet::with_capacity((self.x_resolution + 1) * (self.y_resolution + 1));

        for i in 0..=self.y_resolution {
            let t = i as f64 / self.y_resolution as f64;
            for j in 0..=self.x_resolution {
                let s = j as f64 / self.x_resolution as f64;
                set.add_point(self.origin + v1 * s + v2 * t);
            }
        }
        set
    }
}
