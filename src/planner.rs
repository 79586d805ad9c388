//! Planner facade tying the problem, the kernel and the heuristics together.

use crate::error::PlannerError;
use crate::heuristics::aco::{ACOConfig, AntColonyOptimization};
use crate::heuristics::greedy::GreedyPathBuilder;
use crate::kernel::{resolve, KernelChoice, NumericKernel};
use crate::path::{Path, PlannedRoute};
use crate::point::Point;
use crate::problem::RouteProblem;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Route-building algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Algorithm {
    Greedy,
    Aco,
}

/// Plans routes between a fixed start and end through a candidate point set.
///
/// The numeric kernel is resolved once here and shared by every run.
pub struct WaypointPlanner {
    problem: RouteProblem,
    kernel: Arc<dyn NumericKernel>,
}

impl WaypointPlanner {
    /// Planner using the reference kernel.
    pub fn new(points: &[Point], start: Point, end: Point, k: usize) -> Self {
        Self::with_kernel(points, start, end, k, &KernelChoice::Reference)
    }

    pub fn with_kernel(
        points: &[Point],
        start: Point,
        end: Point,
        k: usize,
        choice: &KernelChoice,
    ) -> Self {
        WaypointPlanner {
            problem: RouteProblem::new(points, start, end, k),
            kernel: resolve(choice),
        }
    }

    pub fn problem(&self) -> &RouteProblem {
        &self.problem
    }

    /// Name of the kernel actually in use after any fallback.
    pub fn kernel_name(&self) -> &str {
        self.kernel.name()
    }

    /// Nearest-neighbor route through the `k - 2` cheapest detours.
    pub fn greedy_path(&self) -> Result<Path, PlannerError> {
        Ok(self.plan_greedy()?.path)
    }

    /// Best route found by the ant colony.
    pub fn aco_path(&self, config: ACOConfig) -> Result<Path, PlannerError> {
        Ok(self.plan_aco(config)?.path)
    }

    /// Run `algorithm` and keep the run metadata.
    pub fn plan(
        &self,
        algorithm: Algorithm,
        config: ACOConfig,
    ) -> Result<PlannedRoute, PlannerError> {
        match algorithm {
            Algorithm::Greedy => self.plan_greedy(),
            Algorithm::Aco => self.plan_aco(config),
        }
    }

    fn plan_greedy(&self) -> Result<PlannedRoute, PlannerError> {
        let start = Instant::now();
        let path = GreedyPathBuilder::new().build(&self.problem, self.kernel.as_ref())?;

        let mut route = PlannedRoute::from_path(path, "Greedy");
        route.computation_time = start.elapsed().as_secs_f64();
        log::info!(
            "[GREEDY] Length {:.2} with {} waypoints in {:.4}s",
            route.length,
            route.waypoint_count(),
            route.computation_time
        );
        Ok(route)
    }

    fn plan_aco(&self, config: ACOConfig) -> Result<PlannedRoute, PlannerError> {
        let mut aco =
            AntColonyOptimization::new(self.problem.clone(), Arc::clone(&self.kernel), config)?;
        Ok(aco.run())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points() -> Vec<Point> {
        vec![
            Point::new(0, 0),
            Point::new(5, 0),
            Point::new(5, 1),
            Point::new(2, 0),
            Point::new(10, 0),
        ]
    }

    #[test]
    fn test_greedy_scenario() {
        let planner = WaypointPlanner::new(&points(), Point::new(0, 0), Point::new(10, 0), 3);
        assert_eq!(planner.problem().candidates.len(), 3);

        let path = planner.greedy_path().unwrap();
        assert_eq!(
            path.points(),
            &[Point::new(0, 0), Point::new(5, 0), Point::new(10, 0)]
        );
        assert!((path.length() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_aco_errors_surface() {
        let planner = WaypointPlanner::new(&points(), Point::new(0, 0), Point::new(10, 0), 4);
        assert_eq!(
            planner.aco_path(ACOConfig::default()),
            Err(PlannerError::NotEnoughCandidates { available: 3, required: 4 })
        );

        let planner = WaypointPlanner::new(&points(), Point::new(0, 0), Point::new(10, 0), 1);
        assert_eq!(planner.greedy_path(), Err(PlannerError::InvalidK { k: 1 }));
    }

    #[test]
    fn test_plan_aco_exact_candidate_count() {
        let planner = WaypointPlanner::new(&points(), Point::new(0, 0), Point::new(10, 0), 3);
        let config = ACOConfig {
            num_ants: 1,
            num_iterations: 1,
            evaporation_rate: 0.0,
            pheromone_deposit: 0.0,
            ..Default::default()
        };
        let route = planner.plan(Algorithm::Aco, config).unwrap();
        assert_eq!(route.waypoint_count(), 3);
        assert_eq!(route.history.len(), 1);
        assert!((route.history[0] - route.length).abs() < 1e-9);
    }

    #[test]
    fn test_fallback_kernel_gives_same_results() {
        let choice = KernelChoice::Native {
            library: "/nonexistent/libwaypoint_kernels.so".into(),
        };
        let start = Point::new(0, 0);
        let end = Point::new(10, 0);
        let reference = WaypointPlanner::new(&points(), start, end, 3);
        let fallback = WaypointPlanner::with_kernel(&points(), start, end, 3, &choice);
        assert_eq!(fallback.kernel_name(), "reference");

        let a = reference.greedy_path().unwrap();
        let b = fallback.greedy_path().unwrap();
        assert!((a.length() - b.length()).abs() <= 1e-9 * a.length());

        let config = ACOConfig { num_ants: 3, num_iterations: 4, ..Default::default() };
        let a = reference.aco_path(config.clone()).unwrap();
        let b = fallback.aco_path(config).unwrap();
        assert!((a.length() - b.length()).abs() <= 1e-9 * a.length());
    }
}
