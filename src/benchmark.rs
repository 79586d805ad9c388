//! Repeated-run comparison of the route builders.
//!
//! Runs the greedy builder once and the ant colony once per seed on the same
//! planner, then aggregates route lengths and times.

use crate::heuristics::aco::ACOConfig;
use crate::path::PlannedRoute;
use crate::planner::{Algorithm, WaypointPlanner};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// Result of running a single algorithm once
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmResult {
    /// Algorithm name
    pub algorithm: String,
    /// Point set name
    pub point_set: String,
    /// Number of candidate waypoints
    pub num_candidates: usize,
    /// Target route size
    pub k: usize,
    /// Seed used (stochastic algorithms only)
    pub seed: Option<u64>,
    /// Route length
    pub length: f64,
    /// Waypoints on the route
    pub waypoints: usize,
    /// Computation time in seconds
    pub time: f64,
    /// Number of iterations (if applicable)
    pub iterations: Option<usize>,
    /// Relative improvement over the greedy route, in percent
    pub gain_over_greedy: Option<f64>,
}

/// Aggregated statistics for an algorithm
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmStatistics {
    pub algorithm: String,
    pub num_runs: usize,
    pub avg_length: f64,
    pub best_length: f64,
    pub worst_length: f64,
    pub std_length: f64,
    pub avg_time: f64,
    pub total_time: f64,
}

/// Benchmark configuration
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Number of ACO runs; run `i` uses seed `aco.seed + i`
    pub num_runs: usize,
    /// Base ACO parameters
    pub aco: ACOConfig,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            num_runs: 5,
            aco: ACOConfig::default(),
        }
    }
}

/// Benchmarking engine
pub struct Benchmark {
    config: BenchmarkConfig,
    results: Vec<AlgorithmResult>,
}

impl Benchmark {
    pub fn new(config: BenchmarkConfig) -> Self {
        Benchmark {
            config,
            results: Vec::new(),
        }
    }

    /// Run greedy once and ACO `num_runs` times on `planner`.
    pub fn run(&mut self, planner: &WaypointPlanner, point_set: &str) {
        log::info!("Running benchmark on point set: {}", point_set);

        let greedy_length = match planner.plan(Algorithm::Greedy, self.config.aco.clone()) {
            Ok(route) => {
                let length = route.length;
                self.record(planner, point_set, &route, None, None);
                Some(length)
            }
            Err(e) => {
                log::error!("Greedy run failed: {}", e);
                None
            }
        };

        for run in 0..self.config.num_runs {
            let seed = self.config.aco.seed.wrapping_add(run as u64);
            let config = ACOConfig {
                seed,
                ..self.config.aco.clone()
            };

            match planner.plan(Algorithm::Aco, config) {
                Ok(route) => self.record(planner, point_set, &route, Some(seed), greedy_length),
                Err(e) => {
                    log::error!("ACO run with seed {} failed: {}", seed, e);
                    break;
                }
            }
        }
    }

    fn record(
        &mut self,
        planner: &WaypointPlanner,
        point_set: &str,
        route: &PlannedRoute,
        seed: Option<u64>,
        greedy_length: Option<f64>,
    ) {
        let gain_over_greedy = greedy_length
            .filter(|&g| g > 0.0)
            .map(|g| (g - route.length) / g * 100.0);

        self.results.push(AlgorithmResult {
            algorithm: route.algorithm.clone(),
            point_set: point_set.to_string(),
            num_candidates: planner.problem().candidates.len(),
            k: planner.problem().k,
            seed,
            length: route.length,
            waypoints: route.waypoint_count(),
            time: route.computation_time,
            iterations: route.iterations,
            gain_over_greedy,
        });
    }

    /// Compute statistics for each algorithm
    pub fn compute_statistics(&self) -> Vec<AlgorithmStatistics> {
        let mut stats_map: HashMap<String, Vec<&AlgorithmResult>> = HashMap::new();

        for result in &self.results {
            stats_map
                .entry(result.algorithm.clone())
                .or_insert_with(Vec::new)
                .push(result);
        }

        let mut statistics = Vec::new();

        for (algo, results) in stats_map {
            let lengths: Vec<f64> = results.iter().map(|r| r.length).collect();
            let times: Vec<f64> = results.iter().map(|r| r.time).collect();

            let avg_length = lengths.iter().sum::<f64>() / lengths.len() as f64;
            let best_length = lengths.iter().cloned().fold(f64::INFINITY, f64::min);
            let worst_length = lengths.iter().cloned().fold(0.0, f64::max);

            let variance = lengths
                .iter()
                .map(|c| (c - avg_length).powi(2))
                .sum::<f64>()
                / lengths.len() as f64;

            let total_time = times.iter().sum::<f64>();

            statistics.push(AlgorithmStatistics {
                algorithm: algo,
                num_runs: results.len(),
                avg_length,
                best_length,
                worst_length,
                std_length: variance.sqrt(),
                avg_time: total_time / times.len() as f64,
                total_time,
            });
        }

        statistics.sort_by(|a, b| a.avg_length.total_cmp(&b.avg_length));

        statistics
    }

    /// Export results to CSV
    pub fn export_to_csv<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        for result in &self.results {
            writer.serialize(result)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Export statistics to CSV
    pub fn export_statistics_csv<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        for stat in self.compute_statistics() {
            writer.serialize(stat)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Generate summary report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();

        report.push_str("========================================\n");
        report.push_str("     Waypoint Planner Benchmark Report\n");
        report.push_str("========================================\n\n");

        report.push_str("-".repeat(76).as_str());
        report.push('\n');
        report.push_str(&format!(
            "{:<12} {:>6} {:>12} {:>12} {:>12} {:>8} {:>10}\n",
            "Algorithm", "Runs", "Avg Length", "Best", "Worst", "Std", "Avg Time"
        ));
        report.push_str("-".repeat(76).as_str());
        report.push('\n');

        for stat in self.compute_statistics() {
            report.push_str(&format!(
                "{:<12} {:>6} {:>12.2} {:>12.2} {:>12.2} {:>8.2} {:>10.4}\n",
                stat.algorithm,
                stat.num_runs,
                stat.avg_length,
                stat.best_length,
                stat.worst_length,
                stat.std_length,
                stat.avg_time
            ));
        }

        report.push_str("-".repeat(76).as_str());
        report.push('\n');

        if let Some(best) = self
            .results
            .iter()
            .min_by(|a, b| a.length.total_cmp(&b.length))
        {
            let seed = best
                .seed
                .map(|s| format!(", seed {}", s))
                .unwrap_or_default();
            report.push_str(&format!(
                "\nShortest route: {:.2} ({}{})\n",
                best.length, best.algorithm, seed
            ));
        }

        report
    }

    /// Get all results
    pub fn results(&self) -> &[AlgorithmResult] {
        &self.results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point_set::PointSet;

    #[test]
    fn test_benchmark_config() {
        let config = BenchmarkConfig::default();
        assert_eq!(config.num_runs, 5);
    }

    #[test]
    fn test_benchmark_runs_and_aggregates() {
        let set = PointSet::random(30, 200, 1);
        let planner = WaypointPlanner::new(&set.points, set.points[0], set.points[1], 6);

        let mut benchmark = Benchmark::new(BenchmarkConfig {
            num_runs: 3,
            aco: ACOConfig {
                num_ants: 4,
                num_iterations: 5,
                ..Default::default()
            },
        });
        benchmark.run(&planner, &set.name);

        assert_eq!(benchmark.results().len(), 4);
        let stats = benchmark.compute_statistics();
        let aco = stats.iter().find(|s| s.algorithm == "ACO").unwrap();
        assert_eq!(aco.num_runs, 3);
        assert!(aco.best_length <= aco.avg_length + 1e-9);
        assert!(aco.avg_length <= aco.worst_length + 1e-9);

        let report = benchmark.generate_report();
        assert!(report.contains("Greedy"));
        assert!(report.contains("Shortest route"));
    }
}
