//! Exchange outcome statistics.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use strum::IntoEnumIterator;

use super::types::Outcome;

/// Thread-safe outcome counters.
///
/// Every [`Outcome`] is initialized to zero on creation so counters can be
/// updated from many in-flight requests without locking.
pub struct OutcomeStats {
    outcomes: HashMap<Outcome, AtomicUsize>,
}

impl OutcomeStats {
    pub fn new() -> Self {
        let mut outcomes = HashMap::new();
        for outcome in Outcome::iter() {
            outcomes.insert(outcome, AtomicUsize::new(0));
        }
        OutcomeStats { outcomes }
    }

    /// Increment the counter for an outcome.
    pub fn increment(&self, outcome: Outcome) {
        if let Some(counter) = self.outcomes.get(&outcome) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment outcome counter for {:?} which is not in the map",
                outcome
            );
        }
    }

    /// Get the count for an outcome.
    pub fn get_count(&self, outcome: Outcome) -> usize {
        self.outcomes
            .get(&outcome)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Total number of recorded exchanges.
    pub fn total(&self) -> usize {
        Outcome::iter().map(|o| self.get_count(o)).sum()
    }

    /// Number of recorded exchanges that failed.
    pub fn total_failures(&self) -> usize {
        Outcome::iter()
            .filter(Outcome::is_failure)
            .map(|o| self.get_count(o))
            .sum()
    }

    /// Non-zero counters in declaration order.
    pub fn non_zero(&self) -> Vec<(Outcome, usize)> {
        Outcome::iter()
            .map(|o| (o, self.get_count(o)))
            .filter(|(_, count)| *count > 0)
            .collect()
    }
}

impl Default for OutcomeStats {
    fn default() -> Self {
        Self::new()
    }
}
