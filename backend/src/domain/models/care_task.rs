//! Domain model for a recurring care task.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::domain::recurrence::RepeatRule;

/// A care task (walk, medication, grooming, ...) attached to a pet.
///
/// Archiving is a soft delete: archived tasks keep their completion
/// history but never evaluate as due.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareTask {
    pub id: String,
    pub user_id: String,
    pub pet_id: String,
    pub title: String,
    /// Free-form category tag: walk/meds/vet/grooming/other
    pub category: String,
    pub rule: RepeatRule,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
}

impl CareTask {
    /// Generate a unique task ID.
    /// Format: task::<timestamp_ms>::<random_suffix>
    pub fn generate_id(timestamp_ms: u64) -> String {
        format!("task::{}::{}", timestamp_ms, Self::generate_random_suffix(4))
    }

    /// Whether this task is due on `date` per its repetition rule.
    /// Archived tasks are never due.
    pub fn is_due_on(&self, date: NaiveDate) -> bool {
        !self.archived && self.rule.is_due_on(date)
    }

    /// Generate a random hex suffix for task IDs.
    fn generate_random_suffix(len: usize) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("Time went backwards")
            .as_nanos();
        format!("{:x}", now % (16_u128.pow(len as u32)))
            .chars()
            .take(len)
            .collect()
    }
}
