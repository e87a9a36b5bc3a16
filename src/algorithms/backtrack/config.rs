use std::time::Duration;

use chrono::TimeDelta;

/// Course ordering policy for the backtracking queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CourseOrder {
    /// Input order, as loaded into the entity store.
    #[default]
    Input,
    /// Largest roster first; ties keep input order.
    LargestFirst,
}

/// Tuning knobs for the backtracking search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Granularity of candidate start times within an availability window.
    pub slot_step: TimeDelta,
    pub order: CourseOrder,
    /// Abort after visiting this many search nodes.
    pub max_nodes: Option<u64>,
    /// Abort once this much wall-clock time has elapsed.
    pub time_limit: Option<Duration>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            slot_step: TimeDelta::minutes(30),
            order: CourseOrder::Input,
            max_nodes: None,
            time_limit: None,
        }
    }
}
