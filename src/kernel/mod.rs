//! Numeric kernels for the planner's hot path.
//!
//! Both the distance oracle and the next-hop probability computation live
//! behind [`NumericKernel`]. A kernel is picked once, when a planner is built,
//! from a [`KernelChoice`]. Asking for the native kernel never fails a run: if
//! the shared library cannot be used, [`resolve`] hands back the reference
//! kernel instead.

pub mod native;
pub mod reference;

pub use native::NativeKernel;
pub use reference::ReferenceKernel;

use crate::point::Point;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Added to distances before inverting them, so coincident points stay finite.
pub const EPSILON: f64 = 1e-6;

/// Distance oracle and probability kernel.
///
/// Implementations must be pure: equal inputs give equal outputs and calls may
/// run concurrently from several threads.
pub trait NumericKernel: Send + Sync {
    fn name(&self) -> &str;

    /// Euclidean distance between two points.
    fn distance(&self, a: Point, b: Point) -> f64;

    /// Next-hop selection probabilities for candidates whose pheromone and
    /// distance from the current node are given in parallel slices.
    ///
    /// The result has one entry per candidate, is non-negative and sums to one.
    /// When the weights sum to zero or are not finite the result is uniform.
    fn probabilities(
        &self,
        pheromones: &[f64],
        distances: &[f64],
        alpha: f64,
        beta: f64,
    ) -> Vec<f64>;
}

/// Which kernel a planner should run with.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum KernelChoice {
    #[default]
    Reference,
    /// Shared library exporting the `wp_*` kernel ABI.
    Native { library: PathBuf },
}

/// Turn a choice into a kernel, falling back to the reference kernel when the
/// native library is unavailable.
pub fn resolve(choice: &KernelChoice) -> Arc<dyn NumericKernel> {
    match choice {
        KernelChoice::Reference => Arc::new(ReferenceKernel),
        KernelChoice::Native { library } => match NativeKernel::load(library) {
            Ok(kernel) => {
                log::info!("Loaded native kernel from {:?}", library);
                Arc::new(kernel)
            }
            Err(e) => {
                log::warn!(
                    "Native kernel unavailable ({}), using reference kernel",
                    e
                );
                Arc::new(ReferenceKernel)
            }
        },
    }
}

/// Uniform distribution over `n` candidates.
pub fn uniform(n: usize) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    vec![1.0 / n as f64; n]
}

/// Whether `probs` is a usable distribution: finite, non-negative, summing to one.
pub fn is_distribution(probs: &[f64]) -> bool {
    if probs.is_empty() {
        return true;
    }
    let mut total = 0.0;
    for &p in probs {
        if !p.is_finite() || p < 0.0 {
            return false;
        }
        total += p;
    }
    (total - 1.0).abs() < 1e-6
}

/// Roulette-wheel pick for a draw `r` in `[0, 1)`.
///
/// Returns the first index whose running cumulative probability reaches `r`,
/// so a draw landing exactly on a boundary goes to the lower index. If rounding
/// leaves the total short of `r`, the last candidate with non-zero probability
/// is returned. Returns `None` only for an empty slice.
pub fn select_index(probs: &[f64], r: f64) -> Option<usize> {
    let mut cumulative = 0.0;
    for (i, &p) in probs.iter().enumerate() {
        cumulative += p;
        if r <= cumulative {
            return Some(i);
        }
    }
    probs
        .iter()
        .rposition(|&p| p > 0.0)
        .or_else(|| probs.len().checked_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_index_boundaries() {
        let probs = [0.25, 0.25, 0.5];
        assert_eq!(select_index(&probs, 0.0), Some(0));
        assert_eq!(select_index(&probs, 0.25), Some(0));
        assert_eq!(select_index(&probs, 0.2500001), Some(1));
        assert_eq!(select_index(&probs, 0.5), Some(1));
        assert_eq!(select_index(&probs, 0.75), Some(2));
        assert_eq!(select_index(&probs, 0.99), Some(2));
    }

    #[test]
    fn test_select_index_rounding_shortfall() {
        let probs = [0.3, 0.3, 0.3, 0.0];
        assert_eq!(select_index(&probs, 0.95), Some(2));
        assert_eq!(select_index(&[], 0.5), None);
    }

    #[test]
    fn test_resolve_missing_library_falls_back() {
        let choice = KernelChoice::Native {
            library: PathBuf::from("/nonexistent/libwaypoint_kernels.so"),
        };
        let kernel = resolve(&choice);
        assert_eq!(kernel.name(), "reference");
        assert_eq!(kernel.distance(Point::new(0, 0), Point::new(3, 4)), 5.0);
    }

    #[test]
    fn test_is_distribution() {
        assert!(is_distribution(&uniform(4)));
        assert!(!is_distribution(&[0.5, 0.6]));
        assert!(!is_distribution(&[f64::NAN, 1.0]));
        assert!(!is_distribution(&[-0.5, 1.5]));
    }
}
