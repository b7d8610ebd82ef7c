//! Pet record journal and JSON export.

use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

use crate::domain::commands::records::CreateRecordCommand;
use crate::domain::models::{Pet, PetRecord};
use crate::storage::csv::{CsvConnection, PetRepository, RecordRepository};
use crate::storage::traits::{PetStorage, RecordStorage};

#[derive(Clone)]
pub struct RecordService {
    record_repository: RecordRepository,
    pet_repository: PetRepository,
}

/// Shape of the downloadable export file.
#[derive(Debug, Serialize)]
struct RecordExport<'a> {
    exported_at: String,
    pets: &'a [Pet],
    records: &'a [PetRecord],
}

impl RecordService {
    /// Create a new RecordService
    pub fn new(csv_conn: Arc<CsvConnection>) -> Self {
        Self {
            record_repository: RecordRepository::new((*csv_conn).clone()),
            pet_repository: PetRepository::new((*csv_conn).clone()),
        }
    }

    pub fn create_record(&self, command: CreateRecordCommand) -> Result<PetRecord> {
        if command.title.trim().is_empty() {
            return Err(anyhow::anyhow!("Record title cannot be empty"));
        }
        if self
            .pet_repository
            .get_pet(&command.user_id, &command.pet_id)?
            .is_none()
        {
            return Err(anyhow::anyhow!("Pet not found: {}", command.pet_id));
        }

        let now = Utc::now();
        let record = PetRecord {
            id: PetRecord::generate_id(now.timestamp_millis() as u64),
            user_id: command.user_id,
            pet_id: command.pet_id,
            title: command.title.trim().to_string(),
            record_date: command.record_date,
            notes: command.notes,
            created_at: now,
        };

        self.record_repository.store_record(&record)?;
        Ok(record)
    }

    pub fn list_records(&self, user_id: &str, pet_id: Option<&str>) -> Result<Vec<PetRecord>> {
        self.record_repository.list_records(user_id, pet_id)
    }

    /// Export every record (with pet profiles for context) as pretty JSON.
    pub fn export_json(&self, user_id: &str) -> Result<String> {
        let pets = self.pet_repository.list_pets(user_id)?;
        let records = self.record_repository.list_records(user_id, None)?;

        let export = RecordExport {
            exported_at: Utc::now().to_rfc3339(),
            pets: &pets,
            records: &records,
        };
        Ok(serde_json::to_string_pretty(&export)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::pets::CreatePetCommand;
    use crate::domain::pet_service::PetService;
    use crate::storage::csv::test_utils::TestEnvironment;
    use chrono::NaiveDate;

    fn fixture() -> Result<(RecordService, String, TestEnvironment)> {
        let env = TestEnvironment::new()?;
        let conn = Arc::new(env.connection.clone());
        let pets = PetService::new(conn.clone());
        let service = RecordService::new(conn);
        let pet = pets
            .create_pet(CreatePetCommand {
                user_id: "user1".to_string(),
                name: "Momo".to_string(),
                species: "dog".to_string(),
                breed: None,
                birthdate: None,
            })?
            .pet;
        Ok((service, pet.id, env))
    }

    #[test]
    fn test_export_contains_pets_and_records() -> Result<()> {
        let (service, pet_id, _env) = fixture()?;

        service.create_record(CreateRecordCommand {
            user_id: "user1".to_string(),
            pet_id,
            title: "Vet visit".to_string(),
            record_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            notes: Some("weight 12kg".to_string()),
        })?;

        let json = service.export_json("user1")?;
        let parsed: serde_json::Value = serde_json::from_str(&json)?;
        assert_eq!(parsed["pets"].as_array().unwrap().len(), 1);
        assert_eq!(parsed["records"].as_array().unwrap().len(), 1);
        assert_eq!(parsed["records"][0]["title"], "Vet visit");
        assert!(parsed["exported_at"].is_string());
        Ok(())
    }

    #[test]
    fn test_export_for_empty_user_is_valid_json() -> Result<()> {
        let (service, _pet_id, _env) = fixture()?;
        let json = service.export_json("user2")?;
        let parsed: serde_json::Value = serde_json::from_str(&json)?;
        assert!(parsed["records"].as_array().unwrap().is_empty());
        Ok(())
    }
}
