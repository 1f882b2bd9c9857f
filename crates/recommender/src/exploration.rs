//! Forced-exploration template selection.

use core_types::TemplateId;
use std::collections::VecDeque;
use templates::TemplateRegistry;

/// How many of the most recent history entries are excluded from the draw.
pub const EXPLORATION_EXCLUDE_LAST: usize = 3;

/// Picks the exploration template: exclude the templates used in the last
/// few iterations, then take the candidate used least often within the
/// rolling window. If exclusion would empty the candidate set, the full
/// universe is used instead. Ties resolve to the earliest template in
/// registry declaration order, which keeps the choice deterministic.
pub fn select_exploration_template(
    registry: &TemplateRegistry,
    recent: &VecDeque<TemplateId>,
) -> TemplateId {
    let excluded: Vec<TemplateId> = recent
        .iter()
        .rev()
        .take(EXPLORATION_EXCLUDE_LAST)
        .copied()
        .collect();

    let mut candidates: Vec<TemplateId> = registry
        .ids()
        .filter(|id| !excluded.contains(id))
        .collect();
    if candidates.is_empty() {
        candidates = registry.ids().collect();
    }

    let usage = |id: TemplateId| recent.iter().filter(|t| **t == id).count();
    let mut best = candidates[0];
    let mut best_usage = usage(best);
    for &candidate in &candidates[1..] {
        let count = usage(candidate);
        if count < best_usage {
            best = candidate;
            best_usage = count;
        }
    }
    best
}
