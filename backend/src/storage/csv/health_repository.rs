use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use csv::{Reader, Writer};
use log::info;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter};

use super::connection::CsvConnection;
use crate::domain::models::{HealthReminder, HealthRepeat};
use crate::storage::traits::HealthStorage;

/// CSV-based health reminder repository
#[derive(Clone)]
pub struct HealthRepository {
    connection: CsvConnection,
}

impl HealthRepository {
    /// Create a new CSV health reminder repository
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_reminders(&self, user_id: &str) -> Result<Vec<HealthReminder>> {
        self.connection.ensure_health_file_exists(user_id)?;

        let file_path = self.connection.get_health_file_path(user_id);
        let file = File::open(&file_path)?;
        let reader = BufReader::new(file);
        let mut csv_reader = Reader::from_reader(reader);

        let mut reminders = Vec::new();

        for result in csv_reader.records() {
            let record = result?;

            let due_on = match record
                .get(4)
                .and_then(|v| NaiveDate::parse_from_str(v, "%Y-%m-%d").ok())
            {
                Some(date) => date,
                None => continue,
            };
            let created_at = record
                .get(6)
                .and_then(|v| DateTime::parse_from_rfc3339(v).ok())
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(Utc::now);

            reminders.push(HealthReminder {
                id: record.get(0).unwrap_or("").to_string(),
                user_id: user_id.to_string(),
                pet_id: record.get(1).unwrap_or("").to_string(),
                title: record.get(2).unwrap_or("").to_string(),
                kind: record.get(3).unwrap_or("").to_string(),
                due_on,
                repeat: HealthRepeat::parse(record.get(5).unwrap_or("none")),
                created_at,
            });
        }

        reminders.sort_by(|a, b| a.due_on.cmp(&b.due_on));
        Ok(reminders)
    }

    fn write_reminders(&self, user_id: &str, reminders: &[HealthReminder]) -> Result<()> {
        self.connection.ensure_health_file_exists(user_id)?;
        let file_path = self.connection.get_health_file_path(user_id);

        let temp_path = file_path.with_extension("tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)?;

            let writer = BufWriter::new(file);
            let mut csv_writer = Writer::from_writer(writer);

            csv_writer.write_record([
                "id",
                "pet_id",
                "title",
                "kind",
                "due_on",
                "repeat",
                "created_at",
            ])?;

            for reminder in reminders {
                csv_writer.write_record([
                    reminder.id.as_str(),
                    reminder.pet_id.as_str(),
                    reminder.title.as_str(),
                    reminder.kind.as_str(),
                    &reminder.due_on.format("%Y-%m-%d").to_string(),
                    reminder.repeat.as_str(),
                    &reminder.created_at.to_rfc3339(),
                ])?;
            }

            csv_writer.flush()?;
        }

        std::fs::rename(&temp_path, &file_path)?;

        Ok(())
    }
}

impl HealthStorage for HealthRepository {
    fn store_reminder(&self, reminder: &HealthReminder) -> Result<()> {
        info!(
            "Storing health reminder {} for user {}",
            reminder.id, reminder.user_id
        );
        let mut reminders = self.read_reminders(&reminder.user_id)?;
        reminders.push(reminder.clone());
        self.write_reminders(&reminder.user_id, &reminders)
    }

    fn list_reminders(&self, user_id: &str, pet_id: Option<&str>) -> Result<Vec<HealthReminder>> {
        let mut reminders = self.read_reminders(user_id)?;
        if let Some(pet_id) = pet_id {
            reminders.retain(|r| r.pet_id == pet_id);
        }
        Ok(reminders)
    }

    fn delete_reminder(&self, user_id: &str, reminder_id: &str) -> Result<bool> {
        let mut reminders = self.read_reminders(user_id)?;
        let before = reminders.len();
        reminders.retain(|r| r.id != reminder_id);
        if reminders.len() == before {
            return Ok(false);
        }
        self.write_reminders(user_id, &reminders)?;
        Ok(true)
    }
}
