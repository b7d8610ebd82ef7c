//! Test utilities for consistent storage test infrastructure.
//!
//! RAII-based cleanup: the temporary directory lives as long as the
//! environment and is removed on drop, even when a test panics.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use super::completion_repository::CompletionRepository;
use super::connection::CsvConnection;
use super::expense_repository::ExpenseRepository;
use super::health_repository::HealthRepository;
use super::pet_repository::PetRepository;
use super::record_repository::RecordRepository;
use super::settings_repository::SettingsRepository;
use super::task_repository::TaskRepository;

/// Test environment holding a connection rooted in a temporary directory.
pub struct TestEnvironment {
    /// Kept alive to prevent cleanup until drop
    _temp_dir: TempDir,
    pub connection: CsvConnection,
    pub base_path: PathBuf,
}

impl TestEnvironment {
    /// Create a new test environment with automatic cleanup
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let base_path = temp_dir.path().to_path_buf();
        let connection = CsvConnection::new(&base_path)?;

        Ok(TestEnvironment {
            _temp_dir: temp_dir,
            connection,
            base_path,
        })
    }

    /// Get the base directory path for this test environment
    pub fn base_directory(&self) -> &Path {
        &self.base_path
    }
}

/// Test helper with every repository pre-built against one environment.
pub struct RepositoryTestHelper {
    pub env: TestEnvironment,
    pub pet_repo: PetRepository,
    pub task_repo: TaskRepository,
    pub completion_repo: CompletionRepository,
    pub health_repo: HealthRepository,
    pub record_repo: RecordRepository,
    pub expense_repo: ExpenseRepository,
    pub settings_repo: SettingsRepository,
}

impl RepositoryTestHelper {
    /// Create a new repository test helper with all repositories
    pub fn new() -> Result<Self> {
        let env = TestEnvironment::new()?;

        let pet_repo = PetRepository::new(env.connection.clone());
        let task_repo = TaskRepository::new(env.connection.clone());
        let completion_repo = CompletionRepository::new(env.connection.clone());
        let health_repo = HealthRepository::new(env.connection.clone());
        let record_repo = RecordRepository::new(env.connection.clone());
        let expense_repo = ExpenseRepository::new(env.connection.clone());
        let settings_repo = SettingsRepository::new(env.connection.clone());

        Ok(RepositoryTestHelper {
            env,
            pet_repo,
            task_repo,
            completion_repo,
            health_repo,
            record_repo,
            expense_repo,
            settings_repo,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_cleanup() -> Result<()> {
        let base_path;

        {
            let env = TestEnvironment::new()?;
            base_path = env.base_directory().to_path_buf();
            assert!(base_path.exists());

            std::fs::write(base_path.join("probe.txt"), "probe")?;
            assert!(base_path.join("probe.txt").exists());
        } // env dropped here

        assert!(!base_path.exists());
        Ok(())
    }
}
