//! Due/done aggregation over calendar windows.
//!
//! Builds on the recurrence evaluator to produce the counts behind the
//! progress ring (today and the Monday-start week) and the per-day
//! "upcoming" breakdown. Each date in a range is evaluated in isolation:
//! a task due on 3 of 7 days contributes 3 to `due`, not 1.

use anyhow::Result;
use chrono::NaiveDate;
use log::debug;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::domain::calendar::{add_days, start_of_week};
use crate::domain::models::{CareTask, TaskCompletion};
use crate::storage::csv::{CompletionRepository, CsvConnection, TaskRepository};
use crate::storage::traits::{CompletionStorage, TaskStorage};

/// Due/done counts for a single date or a summed range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DayCount {
    pub due: u32,
    pub done: u32,
}

/// Weekly progress for the Monday-start week containing the reference date.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekProgress {
    pub week_start: NaiveDate,
    pub counts: DayCount,
    pub percent: u8,
}

/// One day of the upcoming-week breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct UpcomingDay {
    pub date: NaiveDate,
    pub counts: DayCount,
}

/// The tasks due on `date`. Archived tasks never appear.
pub fn due_on(tasks: &[CareTask], date: NaiveDate) -> Vec<&CareTask> {
    tasks.iter().filter(|t| t.is_due_on(date)).collect()
}

/// Count the tasks due on `date` and how many of them are done.
///
/// `done_task_ids` is the set of task IDs with a completion recorded on
/// that exact date. A completion for a task that is not due on the date
/// is not counted, so `done <= due` always holds (a rule edited after the
/// fact cannot inflate the done count).
pub fn count_due_and_done(
    tasks: &[CareTask],
    done_task_ids: &HashSet<String>,
    date: NaiveDate,
) -> DayCount {
    let due_tasks = due_on(tasks, date);
    let done = due_tasks
        .iter()
        .filter(|t| done_task_ids.contains(&t.id))
        .count() as u32;
    DayCount {
        due: due_tasks.len() as u32,
        done,
    }
}

/// Sum `count_due_and_done` over each date in `dates` independently.
pub fn range_counts(
    tasks: &[CareTask],
    done_by_date: &HashMap<NaiveDate, HashSet<String>>,
    dates: &[NaiveDate],
) -> DayCount {
    let empty = HashSet::new();
    let mut total = DayCount::default();
    for &date in dates {
        let done_ids = done_by_date.get(&date).unwrap_or(&empty);
        let day = count_due_and_done(tasks, done_ids, date);
        total.due += day.due;
        total.done += day.done;
    }
    total
}

/// Rounded percent complete; 0 when nothing is due (never NaN, never a
/// phantom 100% for an empty window).
pub fn percent_complete(counts: DayCount) -> u8 {
    if counts.due == 0 {
        0
    } else {
        ((counts.done as f64 / counts.due as f64) * 100.0).round() as u8
    }
}

/// Index completions by date for range evaluation.
fn index_completions(completions: &[TaskCompletion]) -> HashMap<NaiveDate, HashSet<String>> {
    let mut by_date: HashMap<NaiveDate, HashSet<String>> = HashMap::new();
    for completion in completions {
        by_date
            .entry(completion.completed_on)
            .or_default()
            .insert(completion.task_id.clone());
    }
    by_date
}

/// Repository-backed aggregation used by the interactive client endpoints.
#[derive(Clone)]
pub struct ScheduleService {
    task_repository: TaskRepository,
    completion_repository: CompletionRepository,
}

impl ScheduleService {
    /// Create a new ScheduleService
    pub fn new(csv_conn: Arc<CsvConnection>) -> Self {
        Self {
            task_repository: TaskRepository::new((*csv_conn).clone()),
            completion_repository: CompletionRepository::new((*csv_conn).clone()),
        }
    }

    /// Due/done counts for the reference date itself.
    pub fn today_counts(&self, user_id: &str, today: NaiveDate) -> Result<DayCount> {
        let tasks = self.task_repository.list_tasks(user_id, false)?;
        let completions = self.completion_repository.list_completions_on(user_id, today)?;
        let done_ids: HashSet<String> =
            completions.into_iter().map(|c| c.task_id).collect();
        Ok(count_due_and_done(&tasks, &done_ids, today))
    }

    /// Summed counts and percent for the Monday-start week containing
    /// the reference date.
    pub fn week_progress(&self, user_id: &str, today: NaiveDate) -> Result<WeekProgress> {
        let week_start = start_of_week(today);
        let dates: Vec<NaiveDate> = (0..7).map(|i| add_days(week_start, i)).collect();

        let tasks = self.task_repository.list_tasks(user_id, false)?;
        let completions =
            self.completion_repository
                .list_completions(user_id, week_start, add_days(week_start, 6))?;
        let counts = range_counts(&tasks, &index_completions(&completions), &dates);
        debug!(
            "Week {}..{}: {} due, {} done for user {}",
            week_start,
            add_days(week_start, 6),
            counts.due,
            counts.done,
            user_id
        );
        Ok(WeekProgress {
            week_start,
            counts,
            percent: percent_complete(counts),
        })
    }

    /// Per-day breakdown for the seven dates strictly after the reference
    /// date (`today+1 ..= today+7`).
    pub fn upcoming_week(&self, user_id: &str, today: NaiveDate) -> Result<Vec<UpcomingDay>> {
        let dates: Vec<NaiveDate> = (1..=7).map(|i| add_days(today, i)).collect();
        let tasks = self.task_repository.list_tasks(user_id, false)?;
        let completions =
            self.completion_repository
                .list_completions(user_id, dates[0], dates[6])?;
        let by_date = index_completions(&completions);

        let empty = HashSet::new();
        Ok(dates
            .into_iter()
            .map(|date| {
                let done_ids = by_date.get(&date).unwrap_or(&empty);
                UpcomingDay {
                    date,
                    counts: count_due_and_done(&tasks, done_ids, date),
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::recurrence::RepeatRule;
    use chrono::Utc;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn task(id: &str, rule: RepeatRule) -> CareTask {
        CareTask {
            id: id.to_string(),
            user_id: "user1".to_string(),
            pet_id: "pet1".to_string(),
            title: format!("Task {}", id),
            category: "walk".to_string(),
            rule,
            archived: false,
            created_at: Utc::now(),
        }
    }

    fn weekly_mwf(start: &str) -> RepeatRule {
        RepeatRule::Weekly {
            start_date: d(start),
            weekdays: [1u8, 3, 5].into_iter().collect(),
        }
    }

    fn week_dates(monday: &str) -> Vec<NaiveDate> {
        (0..7).map(|i| add_days(d(monday), i)).collect()
    }

    #[test]
    fn test_weekly_task_due_three_times_in_a_week() {
        // 2024-01-01 is a Monday; evaluate the week of Jan 8..14
        let tasks = vec![task("t1", weekly_mwf("2024-01-01"))];
        let counts = range_counts(&tasks, &HashMap::new(), &week_dates("2024-01-08"));
        assert_eq!(counts, DayCount { due: 3, done: 0 });
    }

    #[test]
    fn test_completion_counts_once_and_percent_rounds() {
        let tasks = vec![task("t1", weekly_mwf("2024-01-01"))];
        let mut done_by_date = HashMap::new();
        done_by_date.insert(
            d("2024-01-10"),
            ["t1".to_string()].into_iter().collect::<HashSet<_>>(),
        );

        let counts = range_counts(&tasks, &done_by_date, &week_dates("2024-01-08"));
        assert_eq!(counts, DayCount { due: 3, done: 1 });
        assert_eq!(percent_complete(counts), 33);
    }

    #[test]
    fn test_done_never_exceeds_due() {
        // Completion recorded for a date the (edited) rule no longer
        // makes due: it must not count.
        let tasks = vec![task("t1", weekly_mwf("2024-01-01"))];
        let done_ids: HashSet<String> = ["t1".to_string()].into_iter().collect();

        // Tuesday: not due, completion ignored
        let tuesday = count_due_and_done(&tasks, &done_ids, d("2024-01-09"));
        assert_eq!(tuesday, DayCount { due: 0, done: 0 });

        // Stray IDs for tasks that do not exist are ignored too
        let stray: HashSet<String> = ["ghost".to_string(), "t1".to_string()].into_iter().collect();
        let monday = count_due_and_done(&tasks, &stray, d("2024-01-08"));
        assert_eq!(monday, DayCount { due: 1, done: 1 });
        assert!(monday.done <= monday.due);
    }

    #[test]
    fn test_percent_is_zero_when_nothing_due() {
        assert_eq!(percent_complete(DayCount { due: 0, done: 0 }), 0);
        assert_eq!(percent_complete(DayCount { due: 4, done: 4 }), 100);
        assert_eq!(percent_complete(DayCount { due: 3, done: 2 }), 67);
    }

    #[test]
    fn test_archived_task_contributes_nothing() {
        let mut archived = task("t1", RepeatRule::Daily { start_date: d("2024-01-01") });
        archived.archived = true;
        let tasks = vec![archived];

        // Even with a completion on file for it
        let done_ids: HashSet<String> = ["t1".to_string()].into_iter().collect();
        let counts = count_due_and_done(&tasks, &done_ids, d("2024-01-08"));
        assert_eq!(counts, DayCount { due: 0, done: 0 });
        assert!(due_on(&tasks, d("2024-01-08")).is_empty());
    }

    #[test]
    fn test_one_time_task_due_exactly_once() {
        let tasks = vec![task("t1", RepeatRule::OneTime { date: d("2024-03-05") })];
        assert!(due_on(&tasks, d("2024-03-04")).is_empty());
        assert_eq!(due_on(&tasks, d("2024-03-05")).len(), 1);
        assert!(due_on(&tasks, d("2024-03-06")).is_empty());
    }

    #[test]
    fn test_range_counts_evaluates_dates_independently() {
        let tasks = vec![
            task("daily", RepeatRule::Daily { start_date: d("2024-01-01") }),
            task("mwf", weekly_mwf("2024-01-01")),
        ];
        // Daily contributes 7, Mon/Wed/Fri contributes 3
        let counts = range_counts(&tasks, &HashMap::new(), &week_dates("2024-01-08"));
        assert_eq!(counts.due, 10);
    }
}
