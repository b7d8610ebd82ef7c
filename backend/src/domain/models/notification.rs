//! Domain model for per-user email digest preferences.

use serde::{Deserialize, Serialize};

/// Email digest preference for one user.
///
/// `days_ahead` is the lead time added to "today" when the digest job
/// picks its target date: 0 means "today's tasks", 1 means "tomorrow's".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationSetting {
    pub user_id: String,
    pub email: String,
    pub email_enabled: bool,
    pub days_ahead: i64,
    pub updated_at: String,
}

impl NotificationSetting {
    /// Default setting created on first visit: digests off until the user
    /// supplies an address and opts in.
    pub fn default_for_user(user_id: &str, updated_at: String) -> Self {
        Self {
            user_id: user_id.to_string(),
            email: String::new(),
            email_enabled: false,
            days_ahead: 0,
            updated_at,
        }
    }
}
