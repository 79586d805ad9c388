//! Pure Rust kernel.

use super::{uniform, NumericKernel, EPSILON};
use crate::point::Point;

#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceKernel;

/// Unnormalized selection weight `tau^alpha * (1 / (d + eps))^beta`.
#[inline]
pub fn weight(pheromone: f64, distance: f64, alpha: f64, beta: f64) -> f64 {
    let eta = 1.0 / (distance + EPSILON);
    pheromone.powf(alpha) * eta.powf(beta)
}

impl NumericKernel for ReferenceKernel {
    fn name(&self) -> &str {
        "reference"
    }

    #[inline]
    fn distance(&self, a: Point, b: Point) -> f64 {
        Point::distance(a, b)
    }

    fn probabilities(
        &self,
        pheromones: &[f64],
        distances: &[f64],
        alpha: f64,
        beta: f64,
    ) -> Vec<f64> {
        debug_assert_eq!(pheromones.len(), distances.len());

        let mut probs: Vec<f64> = pheromones
            .iter()
            .zip(distances)
            .map(|(&tau, &d)| weight(tau, d, alpha, beta))
            .collect();
        let total: f64 = probs.iter().sum();

        if total > 0.0 && total.is_finite() {
            for p in probs.iter_mut() {
                *p /= total;
            }
            probs
        } else {
            uniform(probs.len())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probabilities_sum_to_one() {
        let kernel = ReferenceKernel;
        let probs = kernel.probabilities(&[100.0, 50.0, 10.0], &[1.0, 2.0, 5.0], 1.0, 3.0);
        assert_eq!(probs.len(), 3);
        assert!(probs.iter().all(|&p| p >= 0.0));
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(probs[0] > probs[1] && probs[1] > probs[2]);
    }

    #[test]
    fn test_nearer_candidate_preferred_with_equal_pheromone() {
        let probs = ReferenceKernel.probabilities(&[1.0, 1.0], &[1.0, 2.0], 1.0, 1.0);
        // weights are ~1 and ~0.5
        assert!((probs[0] - 2.0 / 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_zero_weights_give_uniform() {
        let probs =
            ReferenceKernel.probabilities(&[0.0, 0.0, 0.0, 0.0], &[1.0, 2.0, 3.0, 4.0], 1.0, 2.0);
        assert_eq!(probs, vec![0.25; 4]);
    }

    #[test]
    fn test_overflowing_weights_give_uniform() {
        let probs = ReferenceKernel.probabilities(&[f64::MAX, f64::MAX], &[0.0, 0.0], 2.0, 1.0);
        assert_eq!(probs, vec![0.5, 0.5]);
    }

    #[test]
    fn test_coincident_candidate_is_finite() {
        let probs = ReferenceKernel.probabilities(&[1.0, 1.0], &[0.0, 10.0], 1.0, 5.0);
        assert!(probs.iter().all(|p| p.is_finite()));
        assert!(probs[0] > 0.999);
    }

    #[test]
    fn test_empty_input() {
        assert!(ReferenceKernel.probabilities(&[], &[], 1.0, 1.0).is_empty());
    }
}
