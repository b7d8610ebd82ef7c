use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use csv::{Reader, Writer};
use log::info;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter};

use super::connection::CsvConnection;
use crate::domain::models::TaskCompletion;
use crate::storage::traits::{CompletionStorage, StorageError};

/// CSV-based completion repository.
///
/// Completions are append-only facts keyed by (task, date); uniqueness of
/// that pair is enforced here so the domain layer can treat a duplicate
/// mark-done as a recognizable error rather than a second row.
#[derive(Clone)]
pub struct CompletionRepository {
    connection: CsvConnection,
}

impl CompletionRepository {
    /// Create a new CSV completion repository
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    /// Read all completions for a user from their CSV file
    fn read_completions(&self, user_id: &str) -> Result<Vec<TaskCompletion>> {
        self.connection.ensure_completions_file_exists(user_id)?;

        let file_path = self.connection.get_completions_file_path(user_id);
        let file = File::open(&file_path)?;
        let reader = BufReader::new(file);
        let mut csv_reader = Reader::from_reader(reader);

        let mut completions = Vec::new();

        for result in csv_reader.records() {
            let record = result?;

            let completed_on = match record
                .get(1)
                .and_then(|v| NaiveDate::parse_from_str(v, "%Y-%m-%d").ok())
            {
                Some(date) => date,
                None => continue, // unreadable row, skip
            };
            let created_at = record
                .get(2)
                .and_then(|v| DateTime::parse_from_rfc3339(v).ok())
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(Utc::now);

            completions.push(TaskCompletion {
                task_id: record.get(0).unwrap_or("").to_string(),
                user_id: user_id.to_string(),
                completed_on,
                created_at,
            });
        }

        Ok(completions)
    }

    /// Write all completions for a user to their CSV file
    fn write_completions(&self, user_id: &str, completions: &[TaskCompletion]) -> Result<()> {
        self.connection.ensure_completions_file_exists(user_id)?;
        let file_path = self.connection.get_completions_file_path(user_id);

        // Write to a temporary file, then atomically rename over the original
        let temp_path = file_path.with_extension("tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)?;

            let writer = BufWriter::new(file);
            let mut csv_writer = Writer::from_writer(writer);

            csv_writer.write_record(["task_id", "completed_on", "created_at"])?;

            for completion in completions {
                csv_writer.write_record([
                    completion.task_id.as_str(),
                    &completion.completed_on.format("%Y-%m-%d").to_string(),
                    &completion.created_at.to_rfc3339(),
                ])?;
            }

            csv_writer.flush()?;
        }

        std::fs::rename(&temp_path, &file_path)?;

        Ok(())
    }
}

impl CompletionStorage for CompletionRepository {
    fn insert_completion(&self, completion: &TaskCompletion) -> Result<()> {
        let mut completions = self.read_completions(&completion.user_id)?;

        let duplicate = completions.iter().any(|c| {
            c.task_id == completion.task_id && c.completed_on == completion.completed_on
        });
        if duplicate {
            return Err(StorageError::DuplicateCompletion {
                task_id: completion.task_id.clone(),
                date: completion.completed_on,
            }
            .into());
        }

        info!(
            "Recording completion of task {} on {} for user {}",
            completion.task_id, completion.completed_on, completion.user_id
        );
        completions.push(completion.clone());
        self.write_completions(&completion.user_id, &completions)
    }

    fn delete_completion(&self, user_id: &str, task_id: &str, date: NaiveDate) -> Result<bool> {
        let mut completions = self.read_completions(user_id)?;
        let before = completions.len();
        completions.retain(|c| !(c.task_id == task_id && c.completed_on == date));
        if completions.len() == before {
            return Ok(false);
        }
        self.write_completions(user_id, &completions)?;
        Ok(true)
    }

    fn list_completions_on(&self, user_id: &str, date: NaiveDate) -> Result<Vec<TaskCompletion>> {
        let completions = self.read_completions(user_id)?;
        Ok(completions
            .into_iter()
            .filter(|c| c.completed_on == date)
            .collect())
    }

    fn list_completions(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<TaskCompletion>> {
        let completions = self.read_completions(user_id)?;
        Ok(completions
            .into_iter()
            .filter(|c| c.completed_on >= start && c.completed_on <= end)
            .collect())
    }
}
