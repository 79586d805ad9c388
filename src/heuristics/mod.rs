//! Route construction heuristics.
//!
//! The greedy builder gives a fast deterministic route; the ant colony refines
//! it stochastically.

pub mod aco;
pub mod greedy;

pub use aco::*;
pub use greedy::*;
