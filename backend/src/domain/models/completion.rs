//! Domain model for a task completion fact.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A record asserting that a task instance was marked done on a calendar
/// date. At most one completion exists per (task, date) pair; the storage
/// layer enforces the uniqueness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskCompletion {
    pub task_id: String,
    pub user_id: String,
    pub completed_on: NaiveDate,
    pub created_at: DateTime<Utc>,
}
