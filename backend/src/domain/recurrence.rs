//! Repetition rules and due-date evaluation.
//!
//! A task's repetition rule decides on which calendar dates the task is
//! due. The evaluator is pure: the same rule and date always give the
//! same answer, and the interactive client and the digest job share this
//! one implementation.

use chrono::NaiveDate;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::calendar::weekday_number;

/// Persisted tag for a one-time rule.
pub const REPEAT_NONE: &str = "none";
/// Persisted tag for a daily rule.
pub const REPEAT_DAILY: &str = "daily";
/// Persisted tag for a weekly rule.
pub const REPEAT_WEEKLY: &str = "weekly";

/// When a task repeats.
///
/// The persisted shape is the loose triple
/// (`repeat_type`, `start_date`, `weekdays`); `from_parts`/`to_parts`
/// convert between the two. A weekly rule with an empty weekday set is
/// representable and simply never due.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepeatRule {
    /// Due on exactly one date.
    OneTime { date: NaiveDate },
    /// Due on every date on/after the start date.
    Daily { start_date: NaiveDate },
    /// Due on the selected ISO weekdays (1 = Monday .. 7 = Sunday) on/after
    /// the start date.
    Weekly {
        start_date: NaiveDate,
        weekdays: BTreeSet<u8>,
    },
}

impl RepeatRule {
    /// The first date on which the rule can possibly be due.
    pub fn start_date(&self) -> NaiveDate {
        match self {
            RepeatRule::OneTime { date } => *date,
            RepeatRule::Daily { start_date } => *start_date,
            RepeatRule::Weekly { start_date, .. } => *start_date,
        }
    }

    /// Whether the rule is due on `date`.
    ///
    /// The start-date guard comes first and short-circuits: a date
    /// strictly before the start date is never due, regardless of kind.
    pub fn is_due_on(&self, date: NaiveDate) -> bool {
        if date < self.start_date() {
            return false;
        }
        match self {
            RepeatRule::OneTime { date: due } => date == *due,
            RepeatRule::Daily { .. } => true,
            RepeatRule::Weekly { weekdays, .. } => weekdays.contains(&weekday_number(date)),
        }
    }

    /// Build a rule from the loose persisted triple.
    ///
    /// Malformed data degrades instead of failing: a weekly rule with a
    /// missing/empty weekday set becomes a never-due `Weekly`, out-of-range
    /// weekday values are dropped, and an unknown `repeat_type` is treated
    /// as never due.
    pub fn from_parts(repeat_type: &str, start_date: NaiveDate, weekdays: Option<&[u8]>) -> Self {
        match repeat_type {
            REPEAT_NONE => RepeatRule::OneTime { date: start_date },
            REPEAT_DAILY => RepeatRule::Daily { start_date },
            REPEAT_WEEKLY => {
                let days: BTreeSet<u8> = weekdays
                    .unwrap_or(&[])
                    .iter()
                    .copied()
                    .filter(|d| (1..=7).contains(d))
                    .collect();
                if days.is_empty() {
                    warn!(
                        "Weekly rule starting {} has no valid weekdays; it will never be due",
                        start_date
                    );
                }
                RepeatRule::Weekly {
                    start_date,
                    weekdays: days,
                }
            }
            other => {
                warn!(
                    "Unknown repeat_type '{}' (start {}); treating as never due",
                    other, start_date
                );
                RepeatRule::Weekly {
                    start_date,
                    weekdays: BTreeSet::new(),
                }
            }
        }
    }

    /// The loose triple this rule persists as.
    pub fn to_parts(&self) -> (&'static str, NaiveDate, Option<Vec<u8>>) {
        match self {
            RepeatRule::OneTime { date } => (REPEAT_NONE, *date, None),
            RepeatRule::Daily { start_date } => (REPEAT_DAILY, *start_date, None),
            RepeatRule::Weekly {
                start_date,
                weekdays,
            } => (
                REPEAT_WEEKLY,
                *start_date,
                Some(weekdays.iter().copied().collect()),
            ),
        }
    }
}
