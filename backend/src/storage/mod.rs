//! Storage layer: abstraction traits plus the CSV/YAML file backend.

pub mod csv;
pub mod traits;

pub use traits::{
    CompletionStorage, ExpenseStorage, HealthStorage, PetStorage, RecordStorage, SettingsStorage,
    StorageError, TaskStorage,
};
