//! Scheduled email digest: one email per opted-in user listing the tasks
//! due on their target date.
//!
//! The run is isolated per user: a bad address or SMTP hiccup for one
//! user is logged and counted, never aborting the rest of the batch. Only
//! a failure to enumerate the settings themselves aborts the run.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::{info, warn};
use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::calendar::add_days;
use crate::domain::email_service::Mailer;
use crate::domain::models::CareTask;
use crate::storage::csv::{CompletionRepository, CsvConnection, SettingsRepository, TaskRepository};
use crate::storage::traits::{CompletionStorage, SettingsStorage, TaskStorage};

/// Outcome counts for one digest run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DigestRunSummary {
    /// Users with digests enabled and an address on file
    pub users_considered: u32,
    pub emails_sent: u32,
    /// Users with nothing due on their target date
    pub users_skipped: u32,
    pub users_failed: u32,
}

/// Object-safe handle the HTTP layer holds, so the concrete mailer type
/// does not leak into application state.
pub trait DigestRunner: Send + Sync {
    fn run_digest(&self, today: NaiveDate) -> Result<DigestRunSummary>;
}

impl<M: Mailer> DigestRunner for DigestService<M> {
    fn run_digest(&self, today: NaiveDate) -> Result<DigestRunSummary> {
        self.run(today)
    }
}

pub struct DigestService<M: Mailer> {
    settings_repository: SettingsRepository,
    task_repository: TaskRepository,
    completion_repository: CompletionRepository,
    mailer: Arc<M>,
}

/// Render the digest body. One list item per due task, checked or not
/// depending on whether a completion exists for the target date.
fn build_digest_html(target: NaiveDate, tasks: &[&CareTask], done_ids: &HashSet<String>) -> String {
    let mut lines = String::new();
    for task in tasks {
        let mark = if done_ids.contains(&task.id) {
            "✅"
        } else {
            "⬜"
        };
        lines.push_str(&format!(
            "<li>{} {} ({})</li>",
            mark, task.title, task.category
        ));
    }
    format!(
        "<h2>Pet care tasks for {}</h2><ul>{}</ul>",
        target.format("%A, %B %-d"),
        lines
    )
}

impl<M: Mailer> DigestService<M> {
    /// Create a new DigestService
    pub fn new(csv_conn: Arc<CsvConnection>, mailer: Arc<M>) -> Self {
        Self {
            settings_repository: SettingsRepository::new((*csv_conn).clone()),
            task_repository: TaskRepository::new((*csv_conn).clone()),
            completion_repository: CompletionRepository::new((*csv_conn).clone()),
            mailer,
        }
    }

    /// Run the digest for every opted-in user, evaluating due-ness against
    /// each user's own target date (`today + days_ahead`).
    pub fn run(&self, today: NaiveDate) -> Result<DigestRunSummary> {
        let settings = self
            .settings_repository
            .list_settings()
            .context("Failed to load notification settings")?;

        let mut summary = DigestRunSummary::default();

        for setting in settings {
            if !setting.email_enabled || setting.email.trim().is_empty() {
                continue;
            }
            summary.users_considered += 1;

            match self.send_user_digest(&setting.user_id, &setting.email, today, setting.days_ahead)
            {
                Ok(true) => summary.emails_sent += 1,
                Ok(false) => summary.users_skipped += 1,
                Err(e) => {
                    warn!("Digest failed for user {}: {:#}", setting.user_id, e);
                    summary.users_failed += 1;
                }
            }
        }

        info!(
            "Digest run for {}: {} considered, {} sent, {} skipped, {} failed",
            today,
            summary.users_considered,
            summary.emails_sent,
            summary.users_skipped,
            summary.users_failed
        );
        Ok(summary)
    }

    /// Returns Ok(true) if an email went out, Ok(false) if the user had
    /// nothing due.
    fn send_user_digest(
        &self,
        user_id: &str,
        email: &str,
        today: NaiveDate,
        days_ahead: i64,
    ) -> Result<bool> {
        let target = add_days(today, days_ahead);

        let tasks = self.task_repository.list_tasks(user_id, false)?;
        let due: Vec<&CareTask> = tasks.iter().filter(|t| t.is_due_on(target)).collect();
        if due.is_empty() {
            return Ok(false);
        }

        let done_ids: HashSet<String> = self
            .completion_repository
            .list_completions_on(user_id, target)?
            .into_iter()
            .map(|c| c.task_id)
            .collect();

        let subject = if days_ahead == 0 {
            "🐾 Tasks for today".to_string()
        } else {
            format!("🐾 Tasks for {}", target)
        };
        let body = build_digest_html(target, &due, &done_ids);

        self.mailer.send(email, &subject, &body)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::pets::CreatePetCommand;
    use crate::domain::commands::settings::UpdateSettingsCommand;
    use crate::domain::commands::tasks::{CompletionCommand, CreateTaskCommand};
    use crate::domain::pet_service::PetService;
    use crate::domain::settings_service::SettingsService;
    use crate::domain::task_service::TaskService;
    use crate::storage::csv::test_utils::TestEnvironment;
    use std::sync::Mutex;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    /// Mailer that records every send instead of talking to SMTP.
    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<(String, String, String)>>,
    }

    impl Mailer for RecordingMailer {
        fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<()> {
            self.sent.lock().unwrap().push((
                to.to_string(),
                subject.to_string(),
                html_body.to_string(),
            ));
            Ok(())
        }
    }

    /// Mailer that fails for one unlucky address.
    struct FlakyMailer {
        failing_address: String,
        inner: RecordingMailer,
    }

    impl Mailer for FlakyMailer {
        fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<()> {
            if to == self.failing_address {
                return Err(anyhow::anyhow!("mailbox unavailable"));
            }
            self.inner.send(to, subject, html_body)
        }
    }

    struct Fixture {
        env: TestEnvironment,
        pets: PetService,
        tasks: TaskService,
        settings: SettingsService,
    }

    impl Fixture {
        fn new() -> Result<Self> {
            let env = TestEnvironment::new()?;
            let conn = Arc::new(env.connection.clone());
            Ok(Self {
                pets: PetService::new(conn.clone()),
                tasks: TaskService::new(conn.clone()),
                settings: SettingsService::new(conn),
                env,
            })
        }

        fn digest<M: Mailer>(&self, mailer: Arc<M>) -> DigestService<M> {
            DigestService::new(Arc::new(self.env.connection.clone()), mailer)
        }

        fn add_user(&self, user_id: &str, email: &str, days_ahead: i64) -> Result<String> {
            self.settings.update(UpdateSettingsCommand {
                user_id: user_id.to_string(),
                email: email.to_string(),
                email_enabled: true,
                days_ahead,
            })?;
            let pet = self
                .pets
                .create_pet(CreatePetCommand {
                    user_id: user_id.to_string(),
                    name: "Momo".to_string(),
                    species: "dog".to_string(),
                    breed: None,
                    birthdate: None,
                })?
                .pet;
            Ok(pet.id)
        }

        fn add_daily_task(&self, user_id: &str, pet_id: &str, title: &str) -> Result<String> {
            let task = self
                .tasks
                .create_task(CreateTaskCommand {
                    user_id: user_id.to_string(),
                    pet_id: pet_id.to_string(),
                    title: title.to_string(),
                    category: "walk".to_string(),
                    repeat_type: "daily".to_string(),
                    start_date: d("2024-01-01"),
                    weekdays: None,
                })?
                .task;
            Ok(task.id)
        }
    }

    #[test]
    fn test_digest_sends_checked_and_unchecked_lines() -> Result<()> {
        let fx = Fixture::new()?;
        let pet_id = fx.add_user("user1", "owner@example.com", 0)?;
        let walk = fx.add_daily_task("user1", &pet_id, "Morning walk")?;
        fx.add_daily_task("user1", &pet_id, "Evening meds")?;

        fx.tasks.mark_done(CompletionCommand {
            user_id: "user1".to_string(),
            task_id: walk,
            date: d("2024-01-08"),
        })?;

        let mailer = Arc::new(RecordingMailer::default());
        let summary = fx.digest(mailer.clone()).run(d("2024-01-08"))?;

        assert_eq!(summary.users_considered, 1);
        assert_eq!(summary.emails_sent, 1);

        let sent = mailer.sent.lock().unwrap();
        let (to, subject, body) = &sent[0];
        assert_eq!(to, "owner@example.com");
        assert_eq!(subject, "🐾 Tasks for today");
        assert!(body.contains("✅ Morning walk (walk)"));
        assert!(body.contains("⬜ Evening meds (walk)"));
        Ok(())
    }

    #[test]
    fn test_days_ahead_shifts_target_date_and_subject() -> Result<()> {
        let fx = Fixture::new()?;
        let pet_id = fx.add_user("user1", "owner@example.com", 1)?;

        // Weekly task due Tuesday only: today is Monday, target is Tuesday
        fx.tasks.create_task(CreateTaskCommand {
            user_id: "user1".to_string(),
            pet_id,
            title: "Brush teeth".to_string(),
            category: "grooming".to_string(),
            repeat_type: "weekly".to_string(),
            start_date: d("2024-01-01"),
            weekdays: Some(vec![2]),
        })?;

        let mailer = Arc::new(RecordingMailer::default());
        let summary = fx.digest(mailer.clone()).run(d("2024-01-08"))?;
        assert_eq!(summary.emails_sent, 1);

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent[0].1, "🐾 Tasks for 2024-01-09");
        Ok(())
    }

    #[test]
    fn test_nothing_due_means_no_email() -> Result<()> {
        let fx = Fixture::new()?;
        let pet_id = fx.add_user("user1", "owner@example.com", 0)?;

        // Only an archived task exists: not due
        let task_id = fx.add_daily_task("user1", &pet_id, "Old chore")?;
        fx.tasks.set_archived(crate::domain::commands::tasks::SetArchivedCommand {
            user_id: "user1".to_string(),
            task_id,
            archived: true,
        })?;

        let mailer = Arc::new(RecordingMailer::default());
        let summary = fx.digest(mailer.clone()).run(d("2024-01-08"))?;

        assert_eq!(summary.users_considered, 1);
        assert_eq!(summary.users_skipped, 1);
        assert_eq!(summary.emails_sent, 0);
        assert!(mailer.sent.lock().unwrap().is_empty());
        Ok(())
    }

    #[test]
    fn test_disabled_or_missing_email_users_are_ignored() -> Result<()> {
        let fx = Fixture::new()?;
        let pet_id = fx.add_user("user1", "owner@example.com", 0)?;
        fx.add_daily_task("user1", &pet_id, "Walk")?;

        // user2 opted out
        fx.settings.update(UpdateSettingsCommand {
            user_id: "user2".to_string(),
            email: "other@example.com".to_string(),
            email_enabled: false,
            days_ahead: 0,
        })?;

        let mailer = Arc::new(RecordingMailer::default());
        let summary = fx.digest(mailer.clone()).run(d("2024-01-08"))?;

        assert_eq!(summary.users_considered, 1);
        assert_eq!(summary.emails_sent, 1);
        Ok(())
    }

    #[test]
    fn test_one_failing_user_does_not_abort_the_run() -> Result<()> {
        let fx = Fixture::new()?;
        let pet1 = fx.add_user("user1", "broken@example.com", 0)?;
        fx.add_daily_task("user1", &pet1, "Walk")?;
        let pet2 = fx.add_user("user2", "fine@example.com", 0)?;
        fx.add_daily_task("user2", &pet2, "Feed")?;

        let mailer = Arc::new(FlakyMailer {
            failing_address: "broken@example.com".to_string(),
            inner: RecordingMailer::default(),
        });
        let summary = fx.digest(mailer.clone()).run(d("2024-01-08"))?;

        assert_eq!(summary.users_considered, 2);
        assert_eq!(summary.users_failed, 1);
        assert_eq!(summary.emails_sent, 1);

        let sent = mailer.inner.sent.lock().unwrap();
        assert_eq!(sent[0].0, "fine@example.com");
        Ok(())
    }
}
