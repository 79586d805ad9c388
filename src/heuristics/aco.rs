//! Ant Colony Optimization for waypoint routes.
//!
//! Each ant walks from the start, picks `k` waypoints one at a time with
//! probability proportional to `pheromone^alpha * (1/distance)^beta`, then
//! goes to the end. After every iteration all pheromone evaporates and each
//! ant deposits along its route in inverse proportion to the route length.
//! The pheromone matrix starts uniform and is boosted along the greedy route.

use crate::error::PlannerError;
use crate::heuristics::greedy::GreedyPathBuilder;
use crate::kernel::{select_index, NumericKernel, EPSILON};
use crate::path::{route_length, Path, PlannedRoute};
use crate::point::Point;
use crate::problem::RouteProblem;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// ACO configuration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ACOConfig {
    /// Number of ants per iteration
    pub num_ants: usize,
    /// Number of iterations
    pub num_iterations: usize,
    /// Pheromone importance (alpha)
    pub alpha: f64,
    /// Inverse-distance importance (beta)
    pub beta: f64,
    /// Fraction of pheromone removed each iteration, in [0, 1)
    pub evaporation_rate: f64,
    /// Pheromone added along the seed route, and numerator of ant deposits
    pub pheromone_deposit: f64,
    /// Pheromone on every edge before seeding
    pub initial_pheromone: f64,
    /// Random seed
    pub seed: u64,
    /// Build the ants of one iteration on the rayon pool
    pub parallel: bool,
}

impl Default for ACOConfig {
    fn default() -> Self {
        ACOConfig {
            num_ants: 20,
            num_iterations: 100,
            alpha: 1.0,
            beta: 5.0,
            evaporation_rate: 0.5,
            pheromone_deposit: 100.0,
            initial_pheromone: 100.0,
            seed: 42,
            parallel: true,
        }
    }
}

impl ACOConfig {
    pub fn validate(&self) -> Result<(), PlannerError> {
        if self.num_ants == 0 {
            return Err(PlannerError::InvalidConfig("num_ants must be positive".to_string()));
        }
        if self.num_iterations == 0 {
            return Err(PlannerError::InvalidConfig(
                "num_iterations must be positive".to_string(),
            ));
        }
        if !self.alpha.is_finite() || !self.beta.is_finite() {
            return Err(PlannerError::InvalidConfig("alpha and beta must be finite".to_string()));
        }
        if !(0.0..1.0).contains(&self.evaporation_rate) {
            return Err(PlannerError::InvalidConfig(format!(
                "evaporation_rate must be in [0, 1), got {}",
                self.evaporation_rate
            )));
        }
        if !self.pheromone_deposit.is_finite() || self.pheromone_deposit < 0.0 {
            return Err(PlannerError::InvalidConfig(format!(
                "pheromone_deposit must be non-negative, got {}",
                self.pheromone_deposit
            )));
        }
        if !self.initial_pheromone.is_finite() || self.initial_pheromone <= 0.0 {
            return Err(PlannerError::InvalidConfig(format!(
                "initial_pheromone must be positive, got {}",
                self.initial_pheromone
            )));
        }
        Ok(())
    }
}

/// Ant Colony Optimization solver
///
/// Vertices are addressed by [`RouteProblem::vertex`] indices: 0 is the start,
/// `1..=n` the candidates and `n + 1` the end.
pub struct AntColonyOptimization {
    config: ACOConfig,
    problem: RouteProblem,
    kernel: Arc<dyn NumericKernel>,
    index: HashMap<Point, usize>,
    pheromone: Vec<Vec<f64>>,
    seed_path: Path,
    best_tour: Vec<usize>,
    best_length: f64,
    history: Vec<f64>,
    rng: ChaCha8Rng,
}

impl AntColonyOptimization {
    /// Validate the inputs, build the greedy seed and initialize pheromones.
    pub fn new(
        problem: RouteProblem,
        kernel: Arc<dyn NumericKernel>,
        config: ACOConfig,
    ) -> Result<Self, PlannerError> {
        config.validate()?;
        if problem.candidates.len() < problem.k {
            return Err(PlannerError::NotEnoughCandidates {
                available: problem.candidates.len(),
                required: problem.k,
            });
        }

        let seed_path = GreedyPathBuilder::new().build(&problem, kernel.as_ref())?;

        let mut index = HashMap::with_capacity(problem.candidates.len());
        for (i, &p) in problem.candidates.iter().enumerate() {
            index.insert(p, i + 1);
        }

        let n = problem.vertex_count();
        let mut pheromone = vec![vec![config.initial_pheromone; n]; n];
        for (i, row) in pheromone.iter_mut().enumerate() {
            row[i] = 0.0;
        }

        let rng = ChaCha8Rng::seed_from_u64(config.seed);

        let mut aco = AntColonyOptimization {
            config,
            problem,
            kernel,
            index,
            pheromone,
            seed_path,
            best_tour: Vec::new(),
            best_length: f64::INFINITY,
            history: Vec::new(),
            rng,
        };
        aco.boost_seed_path();
        Ok(aco)
    }

    fn boost_seed_path(&mut self) {
        let tour = self.path_to_tour(self.seed_path.points());
        let deposit = self.config.pheromone_deposit;

        for w in tour.windows(2).take(self.problem.k + 1) {
            self.pheromone[w[0]][w[1]] += deposit;
            self.pheromone[w[1]][w[0]] += deposit;
        }
    }

    fn path_to_tour(&self, points: &[Point]) -> Vec<usize> {
        let last = points.len().saturating_sub(1);
        points
            .iter()
            .enumerate()
            .map(|(i, p)| {
                if i == 0 {
                    0
                } else if i == last {
                    self.problem.end_index()
                } else {
                    self.index[p]
                }
            })
            .collect()
    }

    /// One ant's walk: start, `k` sampled waypoints, end.
    fn construct_tour(&self, rng: &mut ChaCha8Rng) -> Vec<usize> {
        let m = self.problem.candidates.len();
        let mut unvisited: Vec<usize> = (1..=m).collect();
        let mut tour = Vec::with_capacity(self.problem.k + 2);
        tour.push(0);

        let mut current = 0;
        let mut pheromones = Vec::with_capacity(m);
        let mut distances = Vec::with_capacity(m);

        for _ in 0..self.problem.k {
            if unvisited.is_empty() {
                break;
            }

            let here = self.problem.vertex(current);
            pheromones.clear();
            distances.clear();
            for &j in &unvisited {
                pheromones.push(self.pheromone[current][j]);
                distances.push(self.kernel.distance(here, self.problem.vertex(j)));
            }

            let probs = self.kernel.probabilities(
                &pheromones,
                &distances,
                self.config.alpha,
                self.config.beta,
            );
            let r: f64 = rng.gen();
            let pick = select_index(&probs, r).unwrap_or(0);

            let next = unvisited.remove(pick);
            tour.push(next);
            current = next;
        }

        tour.push(self.problem.end_index());
        tour
    }

    fn tour_length(&self, tour: &[usize]) -> f64 {
        let points: Vec<Point> = tour.iter().map(|&i| self.problem.vertex(i)).collect();
        route_length(&points, |a, b| self.kernel.distance(a, b))
    }

    /// Build one route per seed. Ants only read the pheromone matrix, so they
    /// can run in parallel; the output keeps seed order.
    fn construct_tours(&self, seeds: &[u64]) -> Vec<(Vec<usize>, f64)> {
        let build = |&seed: &u64| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let tour = self.construct_tour(&mut rng);
            let length = self.tour_length(&tour);
            (tour, length)
        };

        if self.config.parallel {
            seeds.par_iter().map(build).collect()
        } else {
            seeds.iter().map(build).collect()
        }
    }

    fn evaporate(&mut self) {
        let factor = 1.0 - self.config.evaporation_rate;
        for row in self.pheromone.iter_mut() {
            for tau in row.iter_mut() {
                *tau *= factor;
            }
        }
    }

    fn deposit(&mut self, tours: &[(Vec<usize>, f64)]) {
        for (tour, length) in tours {
            let delta = self.config.pheromone_deposit / (length + EPSILON);
            for w in tour.windows(2) {
                self.pheromone[w[0]][w[1]] += delta;
                self.pheromone[w[1]][w[0]] += delta;
            }
        }
    }

    /// Run ACO algorithm
    pub fn run(&mut self) -> PlannedRoute {
        let start = std::time::Instant::now();

        for iteration in 0..self.config.num_iterations {
            let seeds: Vec<u64> = (0..self.config.num_ants).map(|_| self.rng.gen()).collect();
            let tours = self.construct_tours(&seeds);

            for (ant, (tour, length)) in tours.iter().enumerate() {
                if *length < self.best_length {
                    self.best_length = *length;
                    self.best_tour = tour.clone();
                    log::debug!(
                        "[ACO] Iteration {}, ant {}: new best length = {:.2}",
                        iteration,
                        ant,
                        length
                    );
                }
            }
            self.history.push(self.best_length);

            self.evaporate();
            self.deposit(&tours);
        }

        let mut route = PlannedRoute::from_path(self.best_path(), "ACO");
        route.computation_time = start.elapsed().as_secs_f64();
        route.iterations = Some(self.history.len());
        route.history = self.history.clone();

        log::info!(
            "[ACO] Best length {:.2} after {} iterations in {:.2}s",
            route.length,
            self.history.len(),
            route.computation_time
        );
        route
    }

    /// Best route found so far, or the greedy seed before the first iteration.
    pub fn best_path(&self) -> Path {
        if self.best_tour.is_empty() {
            return self.seed_path.clone();
        }
        let points = self.best_tour.iter().map(|&i| self.problem.vertex(i)).collect();
        Path::new(self.problem.start, self.problem.end, points)
    }

    pub fn best_length(&self) -> f64 {
        self.best_length
    }

    /// Best length after each completed iteration.
    pub fn history(&self) -> &[f64] {
        &self.history
    }

    /// The greedy route used to seed the pheromones.
    pub fn seed_path(&self) -> &Path {
        &self.seed_path
    }

    /// Pheromone on the directed edge `a -> b`, if both are route vertices.
    ///
    /// When start and end coincide, `a` resolves to the start vertex and `b`
    /// to the end vertex.
    pub fn pheromone(&self, a: Point, b: Point) -> Option<f64> {
        let i = self.vertex_index(a, false)?;
        let j = self.vertex_index(b, true)?;
        Some(self.pheromone[i][j])
    }

    fn vertex_index(&self, p: Point, as_destination: bool) -> Option<usize> {
        let is_start = p == self.problem.start;
        let is_end = p == self.problem.end;
        match (is_start, is_end) {
            (true, true) if as_destination => Some(self.problem.end_index()),
            (true, _) => Some(0),
            (false, true) => Some(self.problem.end_index()),
            (false, false) => self.index.get(&p).copied(),
        }
    }
}
