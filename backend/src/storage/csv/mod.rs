//! CSV/YAML file storage backend.
//!
//! One directory per user, one flat file per entity kind. Every write
//! rewrites the whole file through a temp-file rename, which is atomic on
//! the filesystems this runs on and keeps readers from seeing torn rows.

pub mod completion_repository;
pub mod connection;
pub mod expense_repository;
pub mod health_repository;
pub mod pet_repository;
pub mod record_repository;
pub mod settings_repository;
pub mod task_repository;

#[cfg(test)]
pub mod test_utils;

pub use completion_repository::CompletionRepository;
pub use connection::CsvConnection;
pub use expense_repository::ExpenseRepository;
pub use health_repository::HealthRepository;
pub use pet_repository::PetRepository;
pub use record_repository::RecordRepository;
pub use settings_repository::SettingsRepository;
pub use task_repository::TaskRepository;
