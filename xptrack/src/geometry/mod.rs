//! Geometry primitives for track simplification.
//!
//! - [`Point3`] - a 3D sample (latitude, longitude, altitude)
//! - [`DistanceMetric`] - how far apart two samples are
//! - [`simplify`] - Ramer–Douglas–Peucker line simplification
//!
//! Coordinates are used as-is: latitude and longitude in degrees and altitude
//! in feet share one space, so the simplification tolerance is expressed in
//! that mixed unit.

mod simplify;

pub use simplify::{simplify, SimplifyError, Simplifier, DEFAULT_SIMPLIFY_TOLERANCE};

/// A point in 3D space.
///
/// `x` is latitude, `y` is longitude and `z` is altitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    /// Create a new point.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Returns true if every component is finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    fn sub(self, other: Point3) -> Point3 {
        Point3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    fn dot(self, other: Point3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    fn scale(self, factor: f64) -> Point3 {
        Point3::new(self.x * factor, self.y * factor, self.z * factor)
    }

    fn add(self, other: Point3) -> Point3 {
        Point3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

/// Distance metric used by the simplifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceMetric {
    /// Straight-line distance using all three components.
    #[default]
    Euclidean,
    /// Distance in the latitude/longitude plane, altitude ignored.
    Planar,
}

impl DistanceMetric {
    /// Distance between two points.
    pub fn distance(&self, a: Point3, b: Point3) -> f64 {
        let d = self.project(a.sub(b));
        d.dot(d).sqrt()
    }

    /// Distance from `p` to the segment `start`..`end`.
    ///
    /// Falls back to point distance when the segment has zero length.
    pub fn segment_distance(&self, p: Point3, start: Point3, end: Point3) -> f64 {
        let (p, start, end) = (self.project(p), self.project(start), self.project(end));
        let direction = end.sub(start);
        let length_sq = direction.dot(direction);
        if length_sq == 0.0 {
            return self.distance(p, start);
        }

        let t = (p.sub(start).dot(direction) / length_sq).clamp(0.0, 1.0);
        let closest = start.add(direction.scale(t));
        self.distance(p, closest)
    }

    fn project(&self, p: Point3) -> Point3 {
        match self {
            DistanceMetric::Euclidean => p,
            DistanceMetric::Planar => Point3::new(p.x, p.y, 0.0),
        }
    }
}

impl std::fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DistanceMetric::Euclidean => write!(f, "euclidean"),
            DistanceMetric::Planar => write!(f, "planar"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_euclidean_distance() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(3.0, 4.0, 12.0);
        assert!((DistanceMetric::Euclidean.distance(a, b) - 13.0).abs() < 1e-9);
    }

    #[test]
    fn test_planar_distance_ignores_altitude() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(3.0, 4.0, 5000.0);
        assert!((DistanceMetric::Planar.distance(a, b) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_segment_distance_perpendicular() {
        let start = Point3::new(0.0, 0.0, 0.0);
        let end = Point3::new(10.0, 0.0, 0.0);
        let p = Point3::new(5.0, 3.0, 0.0);
        let d = DistanceMetric::Euclidean.segment_distance(p, start, end);
        assert!((d - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_segment_distance_beyond_end_is_clamped() {
        let start = Point3::new(0.0, 0.0, 0.0);
        let end = Point3::new(10.0, 0.0, 0.0);
        let p = Point3::new(14.0, 3.0, 0.0);
        let d = DistanceMetric::Euclidean.segment_distance(p, start, end);
        assert!((d - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_segment_distance_zero_length() {
        let start = Point3::new(1.0, 1.0, 1.0);
        let p = Point3::new(1.0, 1.0, 3.0);
        let d = DistanceMetric::Euclidean.segment_distance(p, start, start);
        assert!((d - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_is_finite() {
        assert!(Point3::new(1.0, 2.0, 3.0).is_finite());
        assert!(!Point3::new(f64::NAN, 2.0, 3.0).is_finite());
        assert!(!Point3::new(1.0, f64::INFINITY, 3.0).is_finite());
    }
}
