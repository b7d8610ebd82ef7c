//! Per-user email digest preferences.

use anyhow::Result;
use chrono::Utc;
use log::info;
use std::sync::Arc;

use crate::domain::commands::settings::UpdateSettingsCommand;
use crate::domain::models::NotificationSetting;
use crate::storage::csv::{CsvConnection, SettingsRepository};
use crate::storage::traits::SettingsStorage;

#[derive(Clone)]
pub struct SettingsService {
    settings_repository: SettingsRepository,
}

impl SettingsService {
    /// Create a new SettingsService
    pub fn new(csv_conn: Arc<CsvConnection>) -> Self {
        Self {
            settings_repository: SettingsRepository::new((*csv_conn).clone()),
        }
    }

    /// Fetch a user's settings, creating the opted-out default on first
    /// access so the client always has something to render.
    pub fn get_or_default(&self, user_id: &str) -> Result<NotificationSetting> {
        if let Some(setting) = self.settings_repository.get_setting(user_id)? {
            return Ok(setting);
        }

        let setting = NotificationSetting::default_for_user(user_id, Utc::now().to_rfc3339());
        self.settings_repository.store_setting(&setting)?;
        Ok(setting)
    }

    pub fn update(&self, command: UpdateSettingsCommand) -> Result<NotificationSetting> {
        if command.email_enabled && command.email.trim().is_empty() {
            return Err(anyhow::anyhow!(
                "An email address is required to enable digests"
            ));
        }
        if command.days_ahead < 0 {
            return Err(anyhow::anyhow!("days_ahead cannot be negative"));
        }

        let setting = NotificationSetting {
            user_id: command.user_id,
            email: command.email.trim().to_string(),
            email_enabled: command.email_enabled,
            days_ahead: command.days_ahead,
            updated_at: Utc::now().to_rfc3339(),
        };
        self.settings_repository.store_setting(&setting)?;
        info!(
            "Updated digest settings for user {} (enabled: {}, days_ahead: {})",
            setting.user_id, setting.email_enabled, setting.days_ahead
        );
        Ok(setting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::test_utils::TestEnvironment;

    fn fixture() -> Result<(SettingsService, TestEnvironment)> {
        let env = TestEnvironment::new()?;
        let conn = Arc::new(env.connection.clone());
        Ok((SettingsService::new(conn), env))
    }

    #[test]
    fn test_first_access_creates_opted_out_default() -> Result<()> {
        let (service, _env) = fixture()?;

        let setting = service.get_or_default("user1")?;
        assert!(!setting.email_enabled);
        assert!(setting.email.is_empty());
        assert_eq!(setting.days_ahead, 0);

        // Second access returns the stored copy, not a fresh default
        let again = service.get_or_default("user1")?;
        assert_eq!(again.updated_at, setting.updated_at);
        Ok(())
    }

    #[test]
    fn test_enable_requires_email() -> Result<()> {
        let (service, _env) = fixture()?;

        assert!(service
            .update(UpdateSettingsCommand {
                user_id: "user1".to_string(),
                email: "  ".to_string(),
                email_enabled: true,
                days_ahead: 0,
            })
            .is_err());

        let updated = service.update(UpdateSettingsCommand {
            user_id: "user1".to_string(),
            email: "owner@example.com".to_string(),
            email_enabled: true,
            days_ahead: 1,
        })?;
        assert!(updated.email_enabled);
        assert_eq!(updated.days_ahead, 1);
        Ok(())
    }

    #[test]
    fn test_negative_days_ahead_rejected() -> Result<()> {
        let (service, _env) = fixture()?;
        assert!(service
            .update(UpdateSettingsCommand {
                user_id: "user1".to_string(),
                email: "owner@example.com".to_string(),
                email_enabled: true,
                days_ahead: -1,
            })
            .is_err());
        Ok(())
    }
}
