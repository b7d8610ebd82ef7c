//! Backend for the pet-care task tracker: domain services, CSV/YAML
//! storage, and the HTTP REST surface.

pub mod domain;
pub mod io;
pub mod storage;

use std::sync::Arc;

use domain::{
    DigestRunner, ExpenseService, HealthService, PetService, RecordService, ScheduleService,
    SettingsService, TaskService,
};
use storage::csv::CsvConnection;

/// Shared application state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub pet_service: PetService,
    pub task_service: TaskService,
    pub schedule_service: ScheduleService,
    pub health_service: HealthService,
    pub record_service: RecordService,
    pub expense_service: ExpenseService,
    pub settings_service: SettingsService,
    pub digest_service: Arc<dyn DigestRunner>,
    /// Bearer secret guarding the digest endpoint; empty disables it.
    pub digest_secret: String,
}

impl AppState {
    /// Wire every service against one storage connection.
    pub fn new(
        csv_conn: Arc<CsvConnection>,
        digest_service: Arc<dyn DigestRunner>,
        digest_secret: String,
    ) -> Self {
        Self {
            pet_service: PetService::new(csv_conn.clone()),
            task_service: TaskService::new(csv_conn.clone()),
            schedule_service: ScheduleService::new(csv_conn.clone()),
            health_service: HealthService::new(csv_conn.clone()),
            record_service: RecordService::new(csv_conn.clone()),
            expense_service: ExpenseService::new(csv_conn.clone()),
            settings_service: SettingsService::new(csv_conn),
            digest_service,
            digest_secret,
        }
    }
}
