//! Route representation.
//!
//! A [`Path`] is an immutable ordered walk from a start point to an end point.
//! [`PlannedRoute`] wraps a path with the bookkeeping a planning run produces.

use crate::kernel::NumericKernel;
use crate::point::Point;
use serde::{Deserialize, Serialize};

/// Ordered sequence of points beginning at `start` and finishing at `end`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    points: Vec<Point>,
}

impl Path {
    /// Wrap an ordered point sequence.
    ///
    /// `points` must be non-empty, start with `start` and finish with `end`.
    pub fn new(start: Point, end: Point, points: Vec<Point>) -> Self {
        debug_assert!(!points.is_empty(), "path needs at least one point");
        debug_assert_eq!(points.first(), Some(&start), "path must begin at start");
        debug_assert_eq!(points.last(), Some(&end), "path must finish at end");
        Path { points }
    }

    /// The path that goes straight from `start` to `end`.
    pub fn direct(start: Point, end: Point) -> Self {
        Path::new(start, end, vec![start, end])
    }

    pub fn start(&self) -> Point {
        self.points[0]
    }

    pub fn end(&self) -> Point {
        self.points[self.points.len() - 1]
    }

    /// All points, endpoints included.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Interior points in visiting order.
    pub fn waypoints(&self) -> &[Point] {
        if self.points.len() < 2 {
            return &[];
        }
        &self.points[1..self.points.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Total Euclidean length, recomputed from the point sequence.
    pub fn length(&self) -> f64 {
        route_length(&self.points, Point::distance)
    }

    /// Total length measured through a specific numeric kernel.
    pub fn length_with(&self, kernel: &dyn NumericKernel) -> f64 {
        route_length(&self.points, |a, b| kernel.distance(a, b))
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }
}

/// Sum of `distance` over consecutive pairs.
pub fn route_length<F>(points: &[Point], distance: F) -> f64
where
    F: Fn(Point, Point) -> f64,
{
    points.windows(2).map(|w| distance(w[0], w[1])).sum()
}

/// Result of a planning run: the route plus how it was obtained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedRoute {
    /// The best route found
    pub path: Path,
    /// Length of `path`
    pub length: f64,
    /// Algorithm that produced the route
    pub algorithm: String,
    /// Wall-clock time in seconds
    pub computation_time: f64,
    /// Number of iterations (if applicable)
    pub iterations: Option<usize>,
    /// Best length known after each iteration (if applicable)
    pub history: Vec<f64>,
}

impl PlannedRoute {
    pub fn from_path(path: Path, algorithm: &str) -> Self {
        let length = path.length();
        PlannedRoute {
            path,
            length,
            algorithm: algorithm.to_string(),
            computation_time: 0.0,
            iterations: None,
            history: Vec::new(),
        }
    }

    /// Number of interior waypoints visited.
    pub fn waypoint_count(&self) -> usize {
        self.path.waypoints().len()
    }
}

impl std::fmt::Display for PlannedRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Route ({})", self.algorithm)?;
        writeln!(f, "  Length: {:.2}", self.length)?;
        writeln!(f, "  Waypoints: {}", self.waypoint_count())?;
        writeln!(f, "  Time: {:.4}s", self.computation_time)?;
        if let Some(iter) = self.iterations {
            writeln!(f, "  Iterations: {}", iter)?;
        }
        let points: Vec<String> = self.path.points().iter().map(|p| p.to_string()).collect();
        writeln!(f, "  Points: {}", points.join(" -> "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::ReferenceKernel;

    fn sample_path() -> Path {
        let start = Point::new(0, 0);
        let end = Point::new(6, 8);
        Path::new(start, end, vec![start, Point::new(3, 4), Point::new(3, 0), end])
    }

    #[test]
    fn test_length_matches_consecutive_sum() {
        let path = sample_path();
        let pts = path.points();
        let mut expected = 0.0;
        for i in 0..pts.len() - 1 {
            let dx = (pts[i + 1].x - pts[i].x) as f64;
            let dy = (pts[i + 1].y - pts[i].y) as f64;
            expected += (dx * dx + dy * dy).sqrt();
        }
        assert!((path.length() - expected).abs() < 1e-12);
        assert!((path.length_with(&ReferenceKernel) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_accessors() {
        let path = sample_path();
        assert_eq!(path.start(), Point::new(0, 0));
        assert_eq!(path.end(), Point::new(6, 8));
        assert_eq!(path.waypoints(), &[Point::new(3, 4), Point::new(3, 0)]);
        assert_eq!(path.len(), 4);
    }

    #[test]
    fn test_direct_path() {
        let path = Path::direct(Point::new(0, 0), Point::new(10, 0));
        assert!(path.waypoints().is_empty());
        assert_eq!(path.length(), 10.0);
    }

    #[test]
    fn test_planned_route_from_path() {
        let route = PlannedRoute::from_path(sample_path(), "test");
        assert_eq!(route.length, sample_path().length());
        assert_eq!(route.waypoint_count(), 2);
        assert!(route.iterations.is_none());
    }
}
