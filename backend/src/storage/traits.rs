//! # Storage Traits
//!
//! Storage abstraction traits that let the domain layer work with
//! different storage backends interchangeably. All operations are
//! synchronous and return `anyhow::Result`; reads are already scoped to a
//! user (row-level authorization is the caller's collaborator's job).

use anyhow::Result;
use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::models::{
    CareTask, HealthReminder, NotificationSetting, Pet, PetExpense, PetRecord, TaskCompletion,
};

/// Typed storage failures the domain layer needs to classify.
///
/// Everything else is propagated opaquely as `anyhow::Error`; the one
/// case callers must recognize is the completion uniqueness violation,
/// which `TaskService::mark_done` swallows as a no-op success.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("completion already exists for task {task_id} on {date}")]
    DuplicateCompletion { task_id: String, date: NaiveDate },
}

/// Trait defining the interface for pet storage operations
pub trait PetStorage: Send + Sync {
    /// Store a new pet
    fn store_pet(&self, pet: &Pet) -> Result<()>;

    /// Retrieve a specific pet by ID
    fn get_pet(&self, user_id: &str, pet_id: &str) -> Result<Option<Pet>>;

    /// List all pets for a user ordered by creation time
    fn list_pets(&self, user_id: &str) -> Result<Vec<Pet>>;

    /// Update an existing pet
    fn update_pet(&self, pet: &Pet) -> Result<()>;

    /// Delete a pet by ID; returns true if it existed
    fn delete_pet(&self, user_id: &str, pet_id: &str) -> Result<bool>;
}

/// Trait defining the interface for care task storage operations
pub trait TaskStorage: Send + Sync {
    /// Store a new task
    fn store_task(&self, task: &CareTask) -> Result<()>;

    /// Retrieve a specific task by ID
    fn get_task(&self, user_id: &str, task_id: &str) -> Result<Option<CareTask>>;

    /// List a user's tasks, optionally including archived ones.
    /// Ordered by creation time.
    fn list_tasks(&self, user_id: &str, include_archived: bool) -> Result<Vec<CareTask>>;

    /// Update an existing task (including its archived flag)
    fn update_task(&self, task: &CareTask) -> Result<()>;

    /// Delete a task by ID; returns true if it existed
    fn delete_task(&self, user_id: &str, task_id: &str) -> Result<bool>;
}

/// Trait defining the interface for task completion storage operations
pub trait CompletionStorage: Send + Sync {
    /// Insert a completion fact. Fails with
    /// [`StorageError::DuplicateCompletion`] when a completion already
    /// exists for the same (task, date) pair.
    fn insert_completion(&self, completion: &TaskCompletion) -> Result<()>;

    /// Remove the completion for (task, date); returns true if one existed
    fn delete_completion(&self, user_id: &str, task_id: &str, date: NaiveDate) -> Result<bool>;

    /// List completions recorded on a single date
    fn list_completions_on(&self, user_id: &str, date: NaiveDate) -> Result<Vec<TaskCompletion>>;

    /// List completions within an inclusive date range
    fn list_completions(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<TaskCompletion>>;
}

/// Trait defining the interface for health reminder storage operations
pub trait HealthStorage: Send + Sync {
    /// Store a new health reminder
    fn store_reminder(&self, reminder: &HealthReminder) -> Result<()>;

    /// List reminders for a user, optionally narrowed to one pet,
    /// ordered by due date ascending
    fn list_reminders(&self, user_id: &str, pet_id: Option<&str>) -> Result<Vec<HealthReminder>>;

    /// Delete a reminder by ID; returns true if it existed
    fn delete_reminder(&self, user_id: &str, reminder_id: &str) -> Result<bool>;
}

/// Trait defining the interface for pet record storage operations
pub trait RecordStorage: Send + Sync {
    /// Store a new record
    fn store_record(&self, record: &PetRecord) -> Result<()>;

    /// List records for a user, optionally narrowed to one pet,
    /// ordered by record date descending (most recent first)
    fn list_records(&self, user_id: &str, pet_id: Option<&str>) -> Result<Vec<PetRecord>>;
}

/// Trait defining the interface for expense storage operations
pub trait ExpenseStorage: Send + Sync {
    /// Store a new expense
    fn store_expense(&self, expense: &PetExpense) -> Result<()>;

    /// List expenses for a user, optionally narrowed to one pet,
    /// ordered by spend date descending
    fn list_expenses(&self, user_id: &str, pet_id: Option<&str>) -> Result<Vec<PetExpense>>;
}

/// Trait defining the interface for notification setting storage operations
pub trait SettingsStorage: Send + Sync {
    /// Store (upsert) a user's notification setting
    fn store_setting(&self, setting: &NotificationSetting) -> Result<()>;

    /// Retrieve a user's notification setting
    fn get_setting(&self, user_id: &str) -> Result<Option<NotificationSetting>>;

    /// List every user's notification setting (digest job input)
    fn list_settings(&self) -> Result<Vec<NotificationSetting>>;
}
