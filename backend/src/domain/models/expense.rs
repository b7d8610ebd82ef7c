//! Domain model for a pet expense.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Money spent on a pet on a given date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetExpense {
    pub id: String,
    pub user_id: String,
    pub pet_id: String,
    /// food/vet/meds/toys/other
    pub category: String,
    pub amount: f64,
    pub spent_on: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PetExpense {
    /// Generate a unique ID for an expense
    pub fn generate_id(timestamp_millis: u64) -> String {
        format!("expense::{}", timestamp_millis)
    }

    /// The "YYYY-MM" month key this expense belongs to.
    pub fn month_key(&self) -> String {
        self.spent_on.format("%Y-%m").to_string()
    }
}
