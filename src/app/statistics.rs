//! Statistics printing.

use log::info;

use crate::error_handling::OutcomeStats;

/// Logs the count of every outcome seen at least once.
pub fn print_outcome_statistics(stats: &OutcomeStats) {
    let total = stats.total();
    if total == 0 {
        return;
    }
    info!(
        "Outcome Counts ({} total, {} failed):",
        total,
        stats.total_failures()
    );
    for (outcome, count) in stats.non_zero() {
        info!("   {}: {}", outcome.as_str(), count);
    }
}
