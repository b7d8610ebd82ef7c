//! Care task management: CRUD, archiving, and completion toggling.

use anyhow::Result;
use chrono::Utc;
use log::info;
use std::sync::Arc;

use crate::domain::commands::tasks::{
    CompletionCommand, CreateTaskCommand, SetArchivedCommand, TaskResult, UpdateTaskCommand,
};
use crate::domain::models::{CareTask, TaskCompletion};
use crate::domain::recurrence::{RepeatRule, REPEAT_WEEKLY};
use crate::storage::csv::{CompletionRepository, CsvConnection, PetRepository, TaskRepository};
use crate::storage::traits::{CompletionStorage, PetStorage, StorageError, TaskStorage};

#[derive(Clone)]
pub struct TaskService {
    task_repository: TaskRepository,
    pet_repository: PetRepository,
    completion_repository: CompletionRepository,
}

/// Reject weekly rules with no usable weekday before they are stored.
/// (Loaded legacy rows may still carry an empty set; those load as
/// never-due instead of erroring.)
fn validate_rule_input(repeat_type: &str, weekdays: Option<&[u8]>) -> Result<()> {
    if repeat_type == REPEAT_WEEKLY {
        let valid_days = weekdays
            .unwrap_or(&[])
            .iter()
            .filter(|d| (1..=7).contains(*d))
            .count();
        if valid_days == 0 {
            return Err(anyhow::anyhow!(
                "Weekly tasks need at least one weekday (1 = Monday .. 7 = Sunday)"
            ));
        }
    }
    Ok(())
}

impl TaskService {
    /// Create a new TaskService
    pub fn new(csv_conn: Arc<CsvConnection>) -> Self {
        Self {
            task_repository: TaskRepository::new((*csv_conn).clone()),
            pet_repository: PetRepository::new((*csv_conn).clone()),
            completion_repository: CompletionRepository::new((*csv_conn).clone()),
        }
    }

    pub fn create_task(&self, command: CreateTaskCommand) -> Result<TaskResult> {
        let title = command.title.trim();
        if title.is_empty() {
            return Err(anyhow::anyhow!("Task title cannot be empty"));
        }
        if self
            .pet_repository
            .get_pet(&command.user_id, &command.pet_id)?
            .is_none()
        {
            return Err(anyhow::anyhow!("Pet not found: {}", command.pet_id));
        }
        validate_rule_input(&command.repeat_type, command.weekdays.as_deref())?;

        let rule = RepeatRule::from_parts(
            &command.repeat_type,
            command.start_date,
            command.weekdays.as_deref(),
        );

        let now = Utc::now();
        let task = CareTask {
            id: CareTask::generate_id(now.timestamp_millis() as u64),
            user_id: command.user_id,
            pet_id: command.pet_id,
            title: title.to_string(),
            category: command.category,
            rule,
            archived: false,
            created_at: now,
        };

        self.task_repository.store_task(&task)?;
        info!("Created task '{}' ({})", task.title, task.id);
        Ok(TaskResult { task })
    }

    pub fn get_task(&self, user_id: &str, task_id: &str) -> Result<Option<CareTask>> {
        self.task_repository.get_task(user_id, task_id)
    }

    pub fn list_tasks(&self, user_id: &str, include_archived: bool) -> Result<Vec<CareTask>> {
        self.task_repository.list_tasks(user_id, include_archived)
    }

    /// Update a task. Rule fields replace the whole rule: omitted rule
    /// fields fall back to the current rule's parts, then the triple is
    /// re-validated as a unit.
    pub fn update_task(&self, command: UpdateTaskCommand) -> Result<TaskResult> {
        let mut task = self
            .task_repository
            .get_task(&command.user_id, &command.task_id)?
            .ok_or_else(|| anyhow::anyhow!("Task not found: {}", command.task_id))?;

        if let Some(title) = command.title {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(anyhow::anyhow!("Task title cannot be empty"));
            }
            task.title = title;
        }
        if let Some(category) = command.category {
            task.category = category;
        }

        if command.repeat_type.is_some()
            || command.start_date.is_some()
            || command.weekdays.is_some()
        {
            let (current_type, current_start, current_weekdays) = task.rule.to_parts();
            let repeat_type = command
                .repeat_type
                .unwrap_or_else(|| current_type.to_string());
            let start_date = command.start_date.unwrap_or(current_start);
            let weekdays = command.weekdays.or(current_weekdays);

            validate_rule_input(&repeat_type, weekdays.as_deref())?;
            task.rule = RepeatRule::from_parts(&repeat_type, start_date, weekdays.as_deref());
        }

        self.task_repository.update_task(&task)?;
        Ok(TaskResult { task })
    }

    /// Archive or unarchive a task. Idempotent; completion history is kept
    /// either way.
    pub fn set_archived(&self, command: SetArchivedCommand) -> Result<TaskResult> {
        let mut task = self
            .task_repository
            .get_task(&command.user_id, &command.task_id)?
            .ok_or_else(|| anyhow::anyhow!("Task not found: {}", command.task_id))?;

        if task.archived != command.archived {
            task.archived = command.archived;
            self.task_repository.update_task(&task)?;
            info!(
                "Task {} {}",
                task.id,
                if task.archived { "archived" } else { "unarchived" }
            );
        }
        Ok(TaskResult { task })
    }

    /// Delete a task permanently, along with its completion rows.
    pub fn delete_task(&self, user_id: &str, task_id: &str) -> Result<bool> {
        self.task_repository.delete_task(user_id, task_id)
    }

    /// Mark a task done on a date. Marking an already-done date is a
    /// no-op success, so a double-tap in the client cannot error or
    /// double-count.
    pub fn mark_done(&self, command: CompletionCommand) -> Result<()> {
        if self
            .task_repository
            .get_task(&command.user_id, &command.task_id)?
            .is_none()
        {
            return Err(anyhow::anyhow!("Task not found: {}", command.task_id));
        }

        let completion = TaskCompletion {
            task_id: command.task_id,
            user_id: command.user_id,
            completed_on: command.date,
            created_at: Utc::now(),
        };

        match self.completion_repository.insert_completion(&completion) {
            Ok(()) => Ok(()),
            Err(e) => match e.downcast_ref::<StorageError>() {
                Some(StorageError::DuplicateCompletion { .. }) => Ok(()),
                _ => Err(e),
            },
        }
    }

    /// Undo a completion. Returns true if one existed for (task, date).
    pub fn undo_completion(&self, command: CompletionCommand) -> Result<bool> {
        self.completion_repository.delete_completion(
            &command.user_id,
            &command.task_id,
            command.date,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::pets::CreatePetCommand;
    use crate::domain::pet_service::PetService;
    use crate::storage::csv::test_utils::TestEnvironment;
    use chrono::NaiveDate;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    struct Fixture {
        service: TaskService,
        completion_repo: CompletionRepository,
        pet_id: String,
        _env: TestEnvironment,
    }

    fn fixture() -> Result<Fixture> {
        let env = TestEnvironment::new()?;
        let conn = Arc::new(env.connection.clone());
        let pets = PetService::new(conn.clone());
        let service = TaskService::new(conn);
        let completion_repo = CompletionRepository::new(env.connection.clone());

        let pet = pets
            .create_pet(CreatePetCommand {
                user_id: "user1".to_string(),
                name: "Momo".to_string(),
                species: "dog".to_string(),
                breed: None,
                birthdate: None,
            })?
            .pet;

        Ok(Fixture {
            service,
            completion_repo,
            pet_id: pet.id,
            _env: env,
        })
    }

    fn create_command(fx: &Fixture, repeat_type: &str, weekdays: Option<Vec<u8>>) -> CreateTaskCommand {
        CreateTaskCommand {
            user_id: "user1".to_string(),
            pet_id: fx.pet_id.clone(),
            title: "Morning walk".to_string(),
            category: "walk".to_string(),
            repeat_type: repeat_type.to_string(),
            start_date: d("2024-01-01"),
            weekdays,
        }
    }

    #[test]
    fn test_create_weekly_task_requires_weekdays() -> Result<()> {
        let fx = fixture()?;

        assert!(fx
            .service
            .create_task(create_command(&fx, "weekly", None))
            .is_err());
        assert!(fx
            .service
            .create_task(create_command(&fx, "weekly", Some(vec![])))
            .is_err());
        assert!(fx
            .service
            .create_task(create_command(&fx, "weekly", Some(vec![0, 8])))
            .is_err());

        let task = fx
            .service
            .create_task(create_command(&fx, "weekly", Some(vec![1, 3, 5])))?
            .task;
        assert!(task.is_due_on(d("2024-01-08")));
        Ok(())
    }

    #[test]
    fn test_create_task_requires_existing_pet() -> Result<()> {
        let fx = fixture()?;
        let mut command = create_command(&fx, "daily", None);
        command.pet_id = "pet::ghost".to_string();
        assert!(fx.service.create_task(command).is_err());
        Ok(())
    }

    #[test]
    fn test_mark_done_is_idempotent() -> Result<()> {
        let fx = fixture()?;
        let task = fx
            .service
            .create_task(create_command(&fx, "daily", None))?
            .task;

        let command = CompletionCommand {
            user_id: "user1".to_string(),
            task_id: task.id.clone(),
            date: d("2024-01-08"),
        };
        fx.service.mark_done(command.clone())?;
        fx.service.mark_done(command.clone())?; // second mark succeeds quietly

        let stored = fx
            .completion_repo
            .list_completions_on("user1", d("2024-01-08"))?;
        assert_eq!(stored.len(), 1);

        // Undo removes the single row; a second undo reports nothing to do
        assert!(fx.service.undo_completion(command.clone())?);
        assert!(!fx.service.undo_completion(command)?);
        Ok(())
    }

    #[test]
    fn test_update_task_rule_replaced_as_a_unit() -> Result<()> {
        let fx = fixture()?;
        let task = fx
            .service
            .create_task(create_command(&fx, "weekly", Some(vec![1, 3, 5])))?
            .task;

        // Changing only the weekday set keeps type and start date
        let updated = fx
            .service
            .update_task(UpdateTaskCommand {
                user_id: "user1".to_string(),
                task_id: task.id.clone(),
                title: None,
                category: None,
                repeat_type: None,
                start_date: None,
                weekdays: Some(vec![6, 7]),
            })?
            .task;
        assert!(updated.is_due_on(d("2024-01-06"))); // Saturday
        assert!(!updated.is_due_on(d("2024-01-08"))); // Monday no longer due

        // Switching to daily drops the weekday requirement
        let daily = fx
            .service
            .update_task(UpdateTaskCommand {
                user_id: "user1".to_string(),
                task_id: task.id,
                title: None,
                category: None,
                repeat_type: Some("daily".to_string()),
                start_date: None,
                weekdays: None,
            })?
            .task;
        assert!(daily.is_due_on(d("2024-01-09")));
        Ok(())
    }

    #[test]
    fn test_archive_is_idempotent_and_keeps_history() -> Result<()> {
        let fx = fixture()?;
        let task = fx
            .service
            .create_task(create_command(&fx, "daily", None))?
            .task;

        fx.service.mark_done(CompletionCommand {
            user_id: "user1".to_string(),
            task_id: task.id.clone(),
            date: d("2024-01-08"),
        })?;

        for _ in 0..2 {
            let archived = fx
                .service
                .set_archived(SetArchivedCommand {
                    user_id: "user1".to_string(),
                    task_id: task.id.clone(),
                    archived: true,
                })?
                .task;
            assert!(archived.archived);
        }

        // History survives archiving
        let stored = fx
            .completion_repo
            .list_completions_on("user1", d("2024-01-08"))?;
        assert_eq!(stored.len(), 1);
        Ok(())
    }
}
