//! Shared wire types for the pet-care tracker.
//!
//! These DTOs are the public API surface exchanged between the HTTP layer
//! and clients. Domain models live in the backend crate; the REST layer is
//! responsible for mapping between the two.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Pets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetDto {
    pub id: String,
    pub name: String,
    /// Species/type tag, e.g. "dog", "cat"
    pub species: String,
    pub breed: Option<String>,
    pub birthdate: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePetRequest {
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub birthdate: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdatePetRequest {
    pub name: Option<String>,
    pub species: Option<String>,
    pub breed: Option<String>,
    pub birthdate: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// Care tasks
// ---------------------------------------------------------------------------

/// A care task as transferred on the wire: the repetition rule travels as
/// the loose triple (`repeat_type`, `start_date`, `weekdays`) for
/// compatibility with existing clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareTaskDto {
    pub id: String,
    pub pet_id: String,
    pub title: String,
    /// Free-form category tag: walk/meds/vet/grooming/other
    pub category: String,
    /// One of "none", "daily", "weekly"
    pub repeat_type: String,
    pub start_date: NaiveDate,
    /// ISO weekday numbers (1 = Monday .. 7 = Sunday); only for "weekly"
    pub weekdays: Option<Vec<u8>>,
    pub archived: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub pet_id: String,
    pub title: String,
    pub category: String,
    pub repeat_type: String,
    pub start_date: NaiveDate,
    pub weekdays: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub category: Option<String>,
    pub repeat_type: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub weekdays: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetArchivedRequest {
    pub archived: bool,
}

/// Mark a task done (or undo it) on a specific calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub date: NaiveDate,
}

// ---------------------------------------------------------------------------
// Schedule / progress
// ---------------------------------------------------------------------------

/// Due/done counts for one date or a summed range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCountDto {
    pub due: u32,
    pub done: u32,
}

/// Monday-start weekly progress for the progress ring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekProgressResponse {
    pub week_start: NaiveDate,
    pub due: u32,
    pub done: u32,
    /// Rounded percent complete; 0 when nothing is due.
    pub percent: u8,
}

/// Per-day breakdown for the seven days after "today".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingDayDto {
    pub date: NaiveDate,
    pub due: u32,
    pub done: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingResponse {
    pub days: Vec<UpcomingDayDto>,
}

// ---------------------------------------------------------------------------
// Health reminders, records, expenses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReminderDto {
    pub id: String,
    pub pet_id: String,
    pub title: String,
    /// vaccine/deworming/antiparasitic/meds/checkup/other
    pub kind: String,
    pub due_on: NaiveDate,
    /// One of "none", "monthly", "yearly"
    pub repeat: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateHealthReminderRequest {
    pub pet_id: String,
    pub title: String,
    pub kind: String,
    pub due_on: NaiveDate,
    pub repeat: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetRecordDto {
    pub id: String,
    pub pet_id: String,
    pub title: String,
    pub record_date: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRecordRequest {
    pub pet_id: String,
    pub title: String,
    pub record_date: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetExpenseDto {
    pub id: String,
    pub pet_id: String,
    /// food/vet/meds/toys/other
    pub category: String,
    pub amount: f64,
    pub spent_on: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateExpenseRequest {
    pub pet_id: String,
    pub category: String,
    pub amount: f64,
    pub spent_on: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseTotalsResponse {
    /// Month the monthly total refers to, as "YYYY-MM"
    pub month: String,
    pub month_total: f64,
    pub total: f64,
}

// ---------------------------------------------------------------------------
// Notification settings / digest
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationSettingDto {
    pub email: String,
    pub email_enabled: bool,
    /// Lead time in days added to "today" to pick the digest's target date.
    pub days_ahead: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateSettingsRequest {
    pub email: Option<String>,
    pub email_enabled: Option<bool>,
    pub days_ahead: Option<i64>,
}

/// Outcome of one digest job invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigestRunSummaryDto {
    pub users_considered: u32,
    pub emails_sent: u32,
    /// Users with digests enabled but nothing due on their target date.
    pub users_skipped: u32,
    /// Users whose task/completion load or email send failed.
    pub users_failed: u32,
}
