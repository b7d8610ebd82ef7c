//! Domain models for the pet-care tracker.

pub mod care_task;
pub mod completion;
pub mod expense;
pub mod health;
pub mod notification;
pub mod pet;
pub mod record;

pub use care_task::CareTask;
pub use completion::TaskCompletion;
pub use expense::PetExpense;
pub use health::{HealthReminder, HealthRepeat};
pub use notification::NotificationSetting;
pub use pet::Pet;
pub use record::PetRecord;
