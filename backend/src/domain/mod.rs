//! Domain layer: models, repetition rules, and the services the REST
//! layer drives.

pub mod calendar;
pub mod commands;
pub mod digest_service;
pub mod email_service;
pub mod expense_service;
pub mod health_service;
pub mod models;
pub mod pet_service;
pub mod record_service;
pub mod recurrence;
pub mod schedule_service;
pub mod settings_service;
pub mod task_service;

pub use digest_service::{DigestRunSummary, DigestRunner, DigestService};
pub use email_service::{EmailConfig, EmailService, Mailer};
pub use expense_service::ExpenseService;
pub use health_service::HealthService;
pub use pet_service::PetService;
pub use record_service::RecordService;
pub use schedule_service::ScheduleService;
pub use settings_service::SettingsService;
pub use task_service::TaskService;
