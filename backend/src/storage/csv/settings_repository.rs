use anyhow::Result;
use log::{info, warn};
use std::fs;

use super::connection::CsvConnection;
use crate::domain::models::NotificationSetting;
use crate::storage::traits::SettingsStorage;

/// YAML-based notification settings repository.
///
/// Each user's preference lives in `notification_settings.yaml` inside
/// their data directory. The digest job enumerates users by scanning the
/// base directory, so a user with no settings file simply has no digest.
#[derive(Clone)]
pub struct SettingsRepository {
    connection: CsvConnection,
}

impl SettingsRepository {
    /// Create a new YAML settings repository
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_setting(&self, user_id: &str) -> Result<Option<NotificationSetting>> {
        let file_path = self.connection.get_settings_file_path(user_id);
        if !file_path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&file_path)?;
        let setting: NotificationSetting = serde_yaml::from_str(&content)?;
        Ok(Some(setting))
    }

    fn write_setting(&self, setting: &NotificationSetting) -> Result<()> {
        self.connection.ensure_user_directory_exists(&setting.user_id)?;
        let file_path = self.connection.get_settings_file_path(&setting.user_id);

        // Write to a temporary file, then atomically rename over the original
        let temp_path = file_path.with_extension("tmp");
        let content = serde_yaml::to_string(setting)?;
        fs::write(&temp_path, content)?;
        fs::rename(&temp_path, &file_path)?;

        Ok(())
    }
}

impl SettingsStorage for SettingsRepository {
    fn store_setting(&self, setting: &NotificationSetting) -> Result<()> {
        info!("Storing notification settings for user {}", setting.user_id);
        self.write_setting(setting)
    }

    fn get_setting(&self, user_id: &str) -> Result<Option<NotificationSetting>> {
        self.read_setting(user_id)
    }

    fn list_settings(&self) -> Result<Vec<NotificationSetting>> {
        let mut settings = Vec::new();
        for user_id in self.connection.list_user_ids()? {
            match self.read_setting(&user_id) {
                Ok(Some(setting)) => settings.push(setting),
                Ok(None) => {}
                Err(e) => {
                    // One corrupt file must not hide every other user
                    warn!("Skipping unreadable settings for user {}: {}", user_id, e);
                }
            }
        }
        Ok(settings)
    }
}
