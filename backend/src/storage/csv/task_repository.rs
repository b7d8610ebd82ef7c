use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use csv::{Reader, Writer};
use log::info;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter};

use super::connection::CsvConnection;
use crate::domain::models::CareTask;
use crate::domain::recurrence::RepeatRule;
use crate::storage::traits::TaskStorage;

/// CSV-based care task repository.
///
/// The repetition rule is persisted as the loose triple
/// (`repeat_type`, `start_date`, `weekdays`), with the weekday set encoded
/// as pipe-separated ISO numbers (`1|3|5`). Malformed rule columns load as
/// never-due rather than poisoning the whole file.
#[derive(Clone)]
pub struct TaskRepository {
    connection: CsvConnection,
}

/// Encode a weekday set as `1|3|5`; empty/absent encodes as the empty string.
fn encode_weekdays(weekdays: Option<&[u8]>) -> String {
    weekdays
        .unwrap_or(&[])
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join("|")
}

/// Decode a `1|3|5` column back into a weekday list. Unparseable entries
/// are dropped.
fn decode_weekdays(encoded: &str) -> Option<Vec<u8>> {
    if encoded.is_empty() {
        return None;
    }
    Some(
        encoded
            .split('|')
            .filter_map(|part| part.parse::<u8>().ok())
            .collect(),
    )
}

impl TaskRepository {
    /// Create a new CSV task repository
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    /// Read all tasks for a user from their CSV file
    fn read_tasks(&self, user_id: &str) -> Result<Vec<CareTask>> {
        self.connection.ensure_tasks_file_exists(user_id)?;

        let file_path = self.connection.get_tasks_file_path(user_id);
        let file = File::open(&file_path)?;
        let reader = BufReader::new(file);
        let mut csv_reader = Reader::from_reader(reader);

        let mut tasks = Vec::new();

        for result in csv_reader.records() {
            let record = result?;

            let start_date = record
                .get(5)
                .and_then(|v| NaiveDate::parse_from_str(v, "%Y-%m-%d").ok())
                .unwrap_or_else(|| Utc::now().date_naive());
            let weekdays = decode_weekdays(record.get(6).unwrap_or(""));
            let rule = RepeatRule::from_parts(
                record.get(4).unwrap_or(""),
                start_date,
                weekdays.as_deref(),
            );
            let created_at = record
                .get(8)
                .and_then(|v| DateTime::parse_from_rfc3339(v).ok())
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(Utc::now);

            tasks.push(CareTask {
                id: record.get(0).unwrap_or("").to_string(),
                user_id: user_id.to_string(),
                pet_id: record.get(1).unwrap_or("").to_string(),
                title: record.get(2).unwrap_or("").to_string(),
                category: record.get(3).unwrap_or("").to_string(),
                rule,
                archived: record.get(7).unwrap_or("false") == "true",
                created_at,
            });
        }

        tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(tasks)
    }

    /// Write all tasks for a user to their CSV file
    fn write_tasks(&self, user_id: &str, tasks: &[CareTask]) -> Result<()> {
        self.connection.ensure_tasks_file_exists(user_id)?;
        let file_path = self.connection.get_tasks_file_path(user_id);

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

            csv_writer.write_record([
                "id",
                "pet_id",
                "title",
                "category",
                "repeat_type",
                "start_date",
                "weekdays",
                "archived",
                "created_at",
            ])?;

            for task in tasks {
                let (repeat_type, start_date, weekdays) = task.rule.to_parts();
                csv_writer.write_record([
                    task.id.as_str(),
                    task.pet_id.as_str(),
                    task.title.as_str(),
                    task.category.as_str(),
                    repeat_type,
                    &start_date.format("%Y-%m-%d").to_string(),
                    &encode_weekdays(weekdays.as_deref()),
                    if task.archived { "true" } else { "false" },
                    &task.created_at.to_rfc3339(),
                ])?;
            }

            csv_writer.flush()?;
        }

        std::fs::rename(&temp_path, &file_path)?;

        Ok(())
    }
}

impl TaskStorage for TaskRepository {
    fn store_task(&self, task: &CareTask) -> Result<()> {
        info!("Storing task {} for user {}", task.id, task.user_id);
        let mut tasks = self.read_tasks(&task.user_id)?;
        tasks.push(task.clone());
        self.write_tasks(&task.user_id, &tasks)
    }

    fn get_task(&self, user_id: &str, task_id: &str) -> Result<Option<CareTask>> {
        let tasks = self.read_tasks(user_id)?;
        Ok(tasks.into_iter().find(|t| t.id == task_id))
    }

    fn list_tasks(&self, user_id: &str, include_archived: bool) -> Result<Vec<CareTask>> {
        let mut tasks = self.read_tasks(user_id)?;
        if !include_archived {
            tasks.retain(|t| !t.archived);
        }
        Ok(tasks)
    }

    fn update_task(&self, task: &CareTask) -> Result<()> {
        let mut tasks = self.read_tasks(&task.user_id)?;
        match tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => {
                *existing = task.clone();
                self.write_tasks(&task.user_id, &tasks)
            }
            None => Err(anyhow::anyhow!("Task not found: {}", task.id)),
        }
    }

    fn delete_task(&self, user_id: &str, task_id: &str) -> Result<bool> {
        let mut tasks = self.read_tasks(user_id)?;
        let before = tasks.len();
        tasks.retain(|t| t.id != task_id);
        if tasks.len() == before {
            return Ok(false);
        }
        self.write_tasks(user_id, &tasks)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::test_utils::TestEnvironment;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample_task(id: &str, rule: RepeatRule) -> CareTask {
        CareTask {
            id: id.to_string(),
            user_id: "user1".to_string(),
            pet_id: "pet::1".to_string(),
            title: "Morning walk".to_string(),
            category: "walk".to_string(),
            rule,
            archived: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_weekly_rule_round_trips_through_csv() -> Result<()> {
        let env = TestEnvironment::new()?;
        let repo = TaskRepository::new(env.connection.clone());

        let rule = RepeatRule::Weekly {
            start_date: d("2024-01-01"),
            weekdays: [1u8, 3, 5].into_iter().collect(),
        };
        repo.store_task(&sample_task("task::1", rule.clone()))?;

        let loaded = repo.get_task("user1", "task::1")?.unwrap();
        assert_eq!(loaded.rule, rule);
        Ok(())
    }

    #[test]
    fn test_one_time_and_daily_rules_round_trip() -> Result<()> {
        let env = TestEnvironment::new()?;
        let repo = TaskRepository::new(env.connection.clone());

        repo.store_task(&sample_task(
            "task::1",
            RepeatRule::OneTime { date: d("2024-03-05") },
        ))?;
        repo.store_task(&sample_task(
            "task::2",
            RepeatRule::Daily { start_date: d("2024-03-01") },
        ))?;

        assert_eq!(
            repo.get_task("user1", "task::1")?.unwrap().rule,
            RepeatRule::OneTime { date: d("2024-03-05") }
        );
        assert_eq!(
            repo.get_task("user1", "task::2")?.unwrap().rule,
            RepeatRule::Daily { start_date: d("2024-03-01") }
        );
        Ok(())
    }

    #[test]
    fn test_list_tasks_filters_archived() -> Result<()> {
        let env = TestEnvironment::new()?;
        let repo = TaskRepository::new(env.connection.clone());

        let mut active = sample_task("task::1", RepeatRule::Daily { start_date: d("2024-01-01") });
        let mut archived = active.clone();
        archived.id = "task::2".to_string();
        archived.archived = true;
        repo.store_task(&active)?;
        repo.store_task(&archived)?;

        assert_eq!(repo.list_tasks("user1", false)?.len(), 1);
        assert_eq!(repo.list_tasks("user1", true)?.len(), 2);

        // Flipping the flag via update is visible on the next read
        active.archived = true;
        repo.update_task(&active)?;
        assert!(repo.list_tasks("user1", false)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_weekday_encoding() {
        assert_eq!(encode_weekdays(Some(&[1, 3, 5])), "1|3|5");
        assert_eq!(encode_weekdays(None), "");
        assert_eq!(decode_weekdays("1|3|5"), Some(vec![1, 3, 5]));
        assert_eq!(decode_weekdays(""), None);
        assert_eq!(decode_weekdays("2|junk|7"), Some(vec![2, 7]));
    }

    #[test]
    fn test_malformed_repeat_type_loads_as_never_due() -> Result<()> {
        let env = TestEnvironment::new()?;
        let repo = TaskRepository::new(env.connection.clone());
        env.connection.ensure_tasks_file_exists("user1")?;

        let path = env.connection.get_tasks_file_path("user1");
        let mut content = std::fs::read_to_string(&path)?;
        content.push_str("task::1,pet::1,Walk,walk,fortnightly,2024-01-01,,false,2024-01-01T00:00:00+00:00\n");
        std::fs::write(&path, content)?;

        let loaded = repo.get_task("user1", "task::1")?.unwrap();
        assert!(!loaded.is_due_on(d("2024-01-01")));
        assert!(!loaded.is_due_on(d("2024-06-01")));
        Ok(())
    }
}
