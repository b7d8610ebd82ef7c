//! Domain model for a free-form pet record.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A dated journal entry for a pet (vet visit notes, weight, etc.).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetRecord {
    pub id: String,
    pub user_id: String,
    pub pet_id: String,
    pub title: String,
    pub record_date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PetRecord {
    /// Generate a unique ID for a record
    pub fn generate_id(timestamp_millis: u64) -> String {
        format!("record::{}", timestamp_millis)
    }
}
