//! Health reminders (vaccines, checkups, treatments).

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;

use crate::domain::calendar::add_days;
use crate::domain::commands::health::CreateReminderCommand;
use crate::domain::models::HealthReminder;
use crate::storage::csv::{CsvConnection, HealthRepository, PetRepository};
use crate::storage::traits::{HealthStorage, PetStorage};

#[derive(Clone)]
pub struct HealthService {
    health_repository: HealthRepository,
    pet_repository: PetRepository,
}

impl HealthService {
    /// Create a new HealthService
    pub fn new(csv_conn: Arc<CsvConnection>) -> Self {
        Self {
            health_repository: HealthRepository::new((*csv_conn).clone()),
            pet_repository: PetRepository::new((*csv_conn).clone()),
        }
    }

    pub fn create_reminder(&self, command: CreateReminderCommand) -> Result<HealthReminder> {
        if command.title.trim().is_empty() {
            return Err(anyhow::anyhow!("Reminder title cannot be empty"));
        }
        if self
            .pet_repository
            .get_pet(&command.user_id, &command.pet_id)?
            .is_none()
        {
            return Err(anyhow::anyhow!("Pet not found: {}", command.pet_id));
        }

        let now = Utc::now();
        let reminder = HealthReminder {
            id: HealthReminder::generate_id(now.timestamp_millis() as u64),
            user_id: command.user_id,
            pet_id: command.pet_id,
            title: command.title.trim().to_string(),
            kind: command.kind,
            due_on: command.due_on,
            repeat: command.repeat,
            created_at: now,
        };

        self.health_repository.store_reminder(&reminder)?;
        Ok(reminder)
    }

    pub fn list_reminders(
        &self,
        user_id: &str,
        pet_id: Option<&str>,
    ) -> Result<Vec<HealthReminder>> {
        self.health_repository.list_reminders(user_id, pet_id)
    }

    /// Reminders due within the next `days_ahead` days (inclusive),
    /// overdue ones included. Sorted by due date.
    pub fn list_upcoming(
        &self,
        user_id: &str,
        today: NaiveDate,
        days_ahead: i64,
    ) -> Result<Vec<HealthReminder>> {
        let horizon = add_days(today, days_ahead);
        let mut reminders = self.health_repository.list_reminders(user_id, None)?;
        reminders.retain(|r| r.due_on <= horizon);
        Ok(reminders)
    }

    pub fn delete_reminder(&self, user_id: &str, reminder_id: &str) -> Result<bool> {
        self.health_repository.delete_reminder(user_id, reminder_id)
    }
}
