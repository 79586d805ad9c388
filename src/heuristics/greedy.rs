//! Greedy route construction.
//!
//! Candidates are ranked by the detour they would cost if inserted alone
//! between start and end, the best `k - 2` are kept, and the route visits them
//! in nearest-neighbor order.

use crate::error::PlannerError;
use crate::kernel::NumericKernel;
use crate::path::Path;
use crate::point::Point;
use crate::problem::RouteProblem;
use ordered_float::OrderedFloat;

/// Deterministic nearest-neighbor builder used on its own and as the seed
/// for the ant colony.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyPathBuilder;

impl GreedyPathBuilder {
    pub fn new() -> Self {
        GreedyPathBuilder
    }

    /// Build the greedy route for `problem`.
    ///
    /// The route has `min(k - 2, candidates)` waypoints. Fewer candidates than
    /// requested is fine; an empty candidate set yields the direct route.
    pub fn build(
        &self,
        problem: &RouteProblem,
        kernel: &dyn NumericKernel,
    ) -> Result<Path, PlannerError> {
        if problem.k < 2 {
            return Err(PlannerError::InvalidK { k: problem.k });
        }

        let selected = self.select(problem, kernel);
        let mut points = Vec::with_capacity(selected.len() + 2);
        points.push(problem.start);
        points.extend(nearest_neighbor_order(problem.start, selected, kernel));
        points.push(problem.end);

        Ok(Path::new(problem.start, problem.end, points))
    }

    /// The `k - 2` candidates with the smallest `d(start, p) + d(p, end)`,
    /// ties kept in input order.
    fn select(&self, problem: &RouteProblem, kernel: &dyn NumericKernel) -> Vec<Point> {
        let mut scored: Vec<(Point, f64)> = problem
            .candidates
            .iter()
            .map(|&p| (p, kernel.distance(problem.start, p) + kernel.distance(p, problem.end)))
            .collect();

        // stable, so equal bias keeps input order
        scored.sort_by_key(|&(_, bias)| OrderedFloat(bias));
        scored.truncate(problem.k - 2);
        scored.into_iter().map(|(p, _)| p).collect()
    }
}

/// Visit `remaining` from `from`, always moving to the closest unvisited point.
/// Ties go to the point that appears first in `remaining`.
fn nearest_neighbor_order(
    from: Point,
    mut remaining: Vec<Point>,
    kernel: &dyn NumericKernel,
) -> Vec<Point> {
    let mut order = Vec::with_capacity(remaining.len());
    let mut current = from;

    while !remaining.is_empty() {
        let nearest = remaining
            .iter()
            .enumerate()
            .min_by_key(|&(_, &p)| OrderedFloat(kernel.distance(current, p)))
            .map(|(i, _)| i);

        match nearest {
            Some(i) => {
                current = remaining.remove(i);
                order.push(current);
            }
            None => break,
        }
    }

    order
}
