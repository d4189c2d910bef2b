//! Step and wall-clock budget
//!
//! Every run gets a fresh [`Budget`]. Solvers consume it per derivative
//! evaluation (or per root-scan sample) and stop early once it runs out,
//! returning whatever prefix of the profile they completed. The runner
//! turns that early stop into a `BudgetExhausted` diagnostic.

use std::time::{Duration, Instant};

/// Remaining numerical work a run is allowed to perform.
///
/// Two independent limits, whichever trips first:
///
/// - a count of derivative/function evaluations, bounding iteration even
///   on machines with a coarse clock,
/// - a wall-clock deadline, bounding worst-case latency for callers.
#[derive(Debug, Clone)]
pub struct Budget {
    evals_left: u64,
    deadline: Option<Instant>,
}

impl Budget {
    /// Default evaluation allowance per run.
    pub const DEFAULT_MAX_EVALS: u64 = 1_000_000;

    /// Default wall-clock allowance per run.
    pub const DEFAULT_WALL_CLOCK: Duration = Duration::from_secs(2);

    /// Budget with explicit limits.
    pub fn new(max_evals: u64, wall_clock: Duration) -> Self {
        Self {
            evals_left: max_evals,
            deadline: Some(Instant::now() + wall_clock),
        }
    }

    /// The runner's standard per-run budget.
    pub fn standard() -> Self {
        Self::new(Self::DEFAULT_MAX_EVALS, Self::DEFAULT_WALL_CLOCK)
    }

    /// Budget that never runs out. Intended for tests and for callers
    /// that drive a model directly and manage their own limits.
    pub fn unlimited() -> Self {
        Self {
            evals_left: u64::MAX,
            deadline: None,
        }
    }

    /// Try to consume `evals` function evaluations.
    ///
    /// Returns `false` — without consuming — when the allowance or the
    /// deadline is exceeded; the caller must then stop stepping.
    pub fn try_consume(&mut self, evals: u64) -> bool {
        if self.evals_left < evals {
            return false;
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return false;
            }
        }
        self.evals_left -= evals;
        true
    }

    /// Evaluations still available.
    pub fn evals_left(&self) -> u64 {
        self.evals_left
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consume_until_exhausted() {
        let mut budget = Budget::new(10, Duration::from_secs(60));

        assert!(budget.try_consume(4));
        assert!(budget.try_consume(6));
        assert!(!budget.try_consume(1));
        assert_eq!(budget.evals_left(), 0);
    }

    #[test]
    fn test_oversized_request_refused_without_consuming() {
        let mut budget = Budget::new(5, Duration::from_secs(60));

        assert!(!budget.try_consume(6));
        assert_eq!(budget.evals_left(), 5);
        assert!(budget.try_consume(5));
    }

    #[test]
    fn test_deadline_trips() {
        let mut budget = Budget::new(u64::MAX, Duration::ZERO);
        std::thread::sleep(Duration::from_millis(1));
        assert!(!budget.try_consume(1));
    }

    #[test]
    fn test_unlimited_never_trips() {
        let mut budget = Budget::unlimited();
        for _ in 0..1000 {
            assert!(budget.try_consume(1_000_000));
        }
    }
}
