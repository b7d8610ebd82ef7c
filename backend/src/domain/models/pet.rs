//! Domain model for a pet profile.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A pet owned by a user account. Tasks, health reminders, records and
/// expenses all hang off a pet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    pub id: String,
    pub user_id: String,
    pub name: String,
    /// Species/type tag, e.g. "dog", "cat"
    pub species: String,
    pub breed: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Pet {
    /// Generate a unique ID for a pet
    pub fn generate_id(timestamp_millis: u64) -> String {
        format!("pet::{}", timestamp_millis)
    }
}
