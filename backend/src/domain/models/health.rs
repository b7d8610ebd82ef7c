//! Domain model for a health reminder ("health passport" entry).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// How a health reminder repeats after its due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthRepeat {
    None,
    Monthly,
    Yearly,
}

impl HealthRepeat {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthRepeat::None => "none",
            HealthRepeat::Monthly => "monthly",
            HealthRepeat::Yearly => "yearly",
        }
    }

    /// Parse the persisted tag; anything unrecognized falls back to `None`.
    pub fn parse(s: &str) -> Self {
        match s {
            "monthly" => HealthRepeat::Monthly,
            "yearly" => HealthRepeat::Yearly,
            _ => HealthRepeat::None,
        }
    }
}

/// A dated health reminder for a pet: vaccination, deworming, checkup...
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReminder {
    pub id: String,
    pub user_id: String,
    pub pet_id: String,
    pub title: String,
    /// vaccine/deworming/antiparasitic/meds/checkup/other
    pub kind: String,
    pub due_on: NaiveDate,
    pub repeat: HealthRepeat,
    pub created_at: DateTime<Utc>,
}

impl HealthReminder {
    /// Generate a unique ID for a health reminder
    pub fn generate_id(timestamp_millis: u64) -> String {
        format!("health::{}", timestamp_millis)
    }
}
