//! The routing problem handed to the heuristics.
//!
//! A problem fixes the start and end points, the candidate waypoints and the
//! target size `k` (number of points on a route, start and end included).

use crate::point::Point;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteProblem {
    pub start: Point,
    pub end: Point,
    /// Eligible waypoints in input order, without duplicates, `start` or `end`
    pub candidates: Vec<Point>,
    pub k: usize,
}

impl RouteProblem {
    /// Build a problem from the raw input points.
    ///
    /// Points equal to `start` or `end` are dropped, and repeated coordinates
    /// keep only their first occurrence.
    pub fn new(points: &[Point], start: Point, end: Point, k: usize) -> Self {
        RouteProblem {
            start,
            end,
            candidates: candidate_set(points, start, end),
            k,
        }
    }

    /// Number of vertices in the route graph (start, candidates, end).
    pub fn vertex_count(&self) -> usize {
        self.candidates.len() + 2
    }

    /// Vertex by graph index: 0 is start, `1..=n` are candidates, `n + 1` is end.
    #[inline]
    pub fn vertex(&self, index: usize) -> Point {
        if index == 0 {
            self.start
        } else if index <= self.candidates.len() {
            self.candidates[index - 1]
        } else {
            self.end
        }
    }

    pub fn end_index(&self) -> usize {
        self.candidates.len() + 1
    }
}

/// Every input point except `start` and `end`, deduplicated, order kept.
pub fn candidate_set(points: &[Point], start: Point, end: Point) -> Vec<Point> {
    let mut seen: HashSet<Point> = HashSet::with_capacity(points.len());
    points
        .iter()
        .copied()
        .filter(|&p| p != start && p != end)
        .filter(|&p| seen.insert(p))
        .collect()
}
