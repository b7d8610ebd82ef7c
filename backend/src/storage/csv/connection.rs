use anyhow::Result;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// CsvConnection manages file paths and ensures the per-user data files exist.
///
/// Layout: one directory per user under the base directory, holding one CSV
/// file per entity kind plus a `notification_settings.yaml`.
#[derive(Clone)]
pub struct CsvConnection {
    base_directory: PathBuf,
}

const PETS_HEADER: &str = "id,name,species,breed,birthdate,created_at\n";
const TASKS_HEADER: &str =
    "id,pet_id,title,category,repeat_type,start_date,weekdays,archived,created_at\n";
const COMPLETIONS_HEADER: &str = "task_id,completed_on,created_at\n";
const HEALTH_HEADER: &str = "id,pet_id,title,kind,due_on,repeat,created_at\n";
const RECORDS_HEADER: &str = "id,pet_id,title,record_date,notes,created_at\n";
const EXPENSES_HEADER: &str = "id,pet_id,category,amount,spent_on,notes,created_at\n";

impl CsvConnection {
    /// Create a new CSV connection with a base directory
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    /// Create a new CSV connection in the default data directory.
    /// Honors the `PETSDAY_DATA_DIR` environment variable, otherwise uses
    /// ~/Documents/PetsDay.
    pub fn new_default() -> Result<Self> {
        let data_dir = match std::env::var("PETSDAY_DATA_DIR") {
            Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir.trim()),
            _ => {
                let home_dir = std::env::var("HOME")
                    .or_else(|_| std::env::var("USERPROFILE"))
                    .map_err(|_| anyhow::anyhow!("Could not determine home directory"))?;
                PathBuf::from(home_dir).join("Documents").join("PetsDay")
            }
        };

        info!("Using data directory: {}", data_dir.display());
        Self::new(data_dir)
    }

    /// Get the base directory path
    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Get the directory path for a user's data
    pub fn get_user_directory(&self, user_id: &str) -> PathBuf {
        self.base_directory.join(user_id)
    }

    /// List every user ID that has a data directory
    pub fn list_user_ids(&self) -> Result<Vec<String>> {
        let mut user_ids = Vec::new();
        for entry in fs::read_dir(&self.base_directory)? {
            let entry = entry?;
            if entry.path().is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    user_ids.push(name.to_string());
                }
            }
        }
        user_ids.sort();
        Ok(user_ids)
    }

    pub fn get_pets_file_path(&self, user_id: &str) -> PathBuf {
        self.get_user_directory(user_id).join("pets.csv")
    }

    pub fn get_tasks_file_path(&self, user_id: &str) -> PathBuf {
        self.get_user_directory(user_id).join("tasks.csv")
    }

    pub fn get_completions_file_path(&self, user_id: &str) -> PathBuf {
        self.get_user_directory(user_id).join("completions.csv")
    }

    pub fn get_health_file_path(&self, user_id: &str) -> PathBuf {
        self.get_user_directory(user_id).join("health.csv")
    }

    pub fn get_records_file_path(&self, user_id: &str) -> PathBuf {
        self.get_user_directory(user_id).join("records.csv")
    }

    pub fn get_expenses_file_path(&self, user_id: &str) -> PathBuf {
        self.get_user_directory(user_id).join("expenses.csv")
    }

    pub fn get_settings_file_path(&self, user_id: &str) -> PathBuf {
        self.get_user_directory(user_id)
            .join("notification_settings.yaml")
    }

    fn ensure_file_exists(&self, user_id: &str, file_name: &str, header: &str) -> Result<()> {
        let user_dir = self.get_user_directory(user_id);
        if !user_dir.exists() {
            fs::create_dir_all(&user_dir)?;
        }

        let file_path = user_dir.join(file_name);
        if !file_path.exists() {
            fs::write(&file_path, header)?;
        }

        Ok(())
    }

    pub fn ensure_pets_file_exists(&self, user_id: &str) -> Result<()> {
        self.ensure_file_exists(user_id, "pets.csv", PETS_HEADER)
    }

    pub fn ensure_tasks_file_exists(&self, user_id: &str) -> Result<()> {
        self.ensure_file_exists(user_id, "tasks.csv", TASKS_HEADER)
    }

    pub fn ensure_completions_file_exists(&self, user_id: &str) -> Result<()> {
        self.ensure_file_exists(user_id, "completions.csv", COMPLETIONS_HEADER)
    }

    pub fn ensure_health_file_exists(&self, user_id: &str) -> Result<()> {
        self.ensure_file_exists(user_id, "health.csv", HEALTH_HEADER)
    }

    pub fn ensure_records_file_exists(&self, user_id: &str) -> Result<()> {
        self.ensure_file_exists(user_id, "records.csv", RECORDS_HEADER)
    }

    pub fn ensure_expenses_file_exists(&self, user_id: &str) -> Result<()> {
        self.ensure_file_exists(user_id, "expenses.csv", EXPENSES_HEADER)
    }

    pub fn ensure_user_directory_exists(&self, user_id: &str) -> Result<()> {
        let user_dir = self.get_user_directory(user_id);
        if !user_dir.exists() {
            fs::create_dir_all(&user_dir)?;
        }
        Ok(())
    }
}
