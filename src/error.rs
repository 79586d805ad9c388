//! Error types surfaced by the planner.

use std::error::Error;
use std::fmt;

/// Errors returned before a planning run starts.
///
/// Kernel loading problems and degenerate probability weights are recovered
/// internally and never show up here.
#[derive(Debug, Clone, PartialEq)]
pub enum PlannerError {
    /// `k` counts start and end, so anything below 2 cannot describe a path.
    InvalidK { k: usize },
    /// The colony needs at least `k` intermediate points to pick from.
    NotEnoughCandidates { available: usize, required: usize },
    /// A run parameter is outside its valid range.
    InvalidConfig(String),
}

impl fmt::Display for PlannerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlannerError::InvalidK { k } => {
                write!(f, "k must be at least 2 (start and end), got {}", k)
            }
            PlannerError::NotEnoughCandidates { available, required } => write!(
                f,
                "not enough intermediate points ({}) for k={}",
                available, required
            ),
            PlannerError::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
        }
    }
}

impl Error for PlannerError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            PlannerError::InvalidK { k: 1 }.to_string(),
            "k must be at least 2 (start and end), got 1"
        );
        assert_eq!(
            PlannerError::NotEnoughCandidates { available: 3, required: 5 }.to_string(),
            "not enough intermediate points (3) for k=5"
        );
    }
}
