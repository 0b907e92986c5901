//! Custom actions and queries for the Insight actor.

use crate::model::{Insight, InsightStatus};

#[derive(Debug, Clone)]
pub enum InsightAction {
    /// Moves the insight to a new status, returning the previous one.
    SetStatus(InsightStatus),
}

/// Results from InsightActions - variants match 1:1 with InsightAction
#[derive(Debug, Clone)]
pub enum InsightActionResult {
    SetStatus(InsightStatus),
}

#[derive(Debug, Clone)]
pub enum InsightQuery {
    /// Every row, ordered by campaign name.
    All,
    /// Deletes every row and inserts the given ones in a single transaction.
    ReplaceAll(Vec<Insight>),
}

/// Results from InsightQueries - variants match 1:1 with InsightQuery
#[derive(Debug, Clone)]
pub enum InsightQueryResult {
    All(Vec<Insight>),
    /// Number of rows inserted.
    ReplaceAll(usize),
}
