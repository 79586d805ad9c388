//! Waypoint Planner Library
//!
//! Builds a short route between a fixed start and end point that passes
//! through a bounded number of waypoints chosen from a larger candidate set.
//!
//! # Features
//!
//! - Greedy construction: cheapest-detour selection plus nearest-neighbor ordering
//! - Ant Colony Optimization seeded with the greedy route
//! - Swappable numeric kernels (pure Rust, or a native shared library with
//!   automatic fallback)
//! - Benchmarking of repeated seeded runs
//!
//! # Example
//!
//! ```no_run
//! use waypoint_planner::heuristics::aco::ACOConfig;
//! use waypoint_planner::point_set::PointSet;
//! use waypoint_planner::planner::WaypointPlanner;
//!
//! let set = PointSet::from_file("points.txt").unwrap();
//! let planner = WaypointPlanner::new(&set.points, set.points[0], set.points[1], 20);
//!
//! let greedy = planner.greedy_path().unwrap();
//! let aco = planner.aco_path(ACOConfig { num_ants: 30, ..Default::default() }).unwrap();
//!
//! println!("greedy {:.2}, aco {:.2}", greedy.length(), aco.length());
//! ```

pub mod benchmark;
pub mod error;
pub mod heuristics;
pub mod kernel;
pub mod path;
pub mod planner;
pub mod point;
pub mod point_set;
pub mod problem;

pub use error::PlannerError;
pub use path::{Path, PlannedRoute};
pub use planner::{Algorithm, WaypointPlanner};
pub use point::Point;
