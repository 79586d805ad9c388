//! Integer grid points used as route vertices.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A location on the integer grid.
///
/// Points are compared and hashed by coordinates, so two points with the
/// same `(x, y)` are the same route vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }

    /// Euclidean distance between two points.
    ///
    /// Squares are summed in 128-bit so no pair of `i32` coordinates overflows.
    #[inline]
    pub fn distance(a: Point, b: Point) -> f64 {
        let dx = b.x as i128 - a.x as i128;
        let dy = b.y as i128 - a.y as i128;
        ((dx * dx + dy * dy) as f64).sqrt()
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Point::new(x, y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
