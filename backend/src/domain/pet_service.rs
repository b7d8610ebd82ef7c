//! Pet profile management.

use anyhow::Result;
use chrono::Utc;
use log::info;
use std::sync::Arc;

use crate::domain::commands::pets::{CreatePetCommand, PetResult, UpdatePetCommand};
use crate::domain::models::Pet;
use crate::storage::csv::{CsvConnection, PetRepository, TaskRepository};
use crate::storage::traits::{PetStorage, TaskStorage};

#[derive(Clone)]
pub struct PetService {
    pet_repository: PetRepository,
    task_repository: TaskRepository,
}

impl PetService {
    /// Create a new PetService
    pub fn new(csv_conn: Arc<CsvConnection>) -> Self {
        Self {
            pet_repository: PetRepository::new((*csv_conn).clone()),
            task_repository: TaskRepository::new((*csv_conn).clone()),
        }
    }

    pub fn create_pet(&self, command: CreatePetCommand) -> Result<PetResult> {
        let name = command.name.trim();
        if name.is_empty() {
            return Err(anyhow::anyhow!("Pet name cannot be empty"));
        }
        if command.species.trim().is_empty() {
            return Err(anyhow::anyhow!("Pet species cannot be empty"));
        }

        let now = Utc::now();
        let pet = Pet {
            id: Pet::generate_id(now.timestamp_millis() as u64),
            user_id: command.user_id,
            name: name.to_string(),
            species: command.species.trim().to_string(),
            breed: command.breed,
            birthdate: command.birthdate,
            created_at: now,
        };

        self.pet_repository.store_pet(&pet)?;
        info!("Created pet '{}' ({})", pet.name, pet.id);
        Ok(PetResult { pet })
    }

    pub fn get_pet(&self, user_id: &str, pet_id: &str) -> Result<Option<Pet>> {
        self.pet_repository.get_pet(user_id, pet_id)
    }

    pub fn list_pets(&self, user_id: &str) -> Result<Vec<Pet>> {
        self.pet_repository.list_pets(user_id)
    }

    pub fn update_pet(&self, command: UpdatePetCommand) -> Result<PetResult> {
        let mut pet = self
            .pet_repository
            .get_pet(&command.user_id, &command.pet_id)?
            .ok_or_else(|| anyhow::anyhow!("Pet not found: {}", command.pet_id))?;

        if let Some(name) = command.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(anyhow::anyhow!("Pet name cannot be empty"));
            }
            pet.name = name;
        }
        if let Some(species) = command.species {
            if species.trim().is_empty() {
                return Err(anyhow::anyhow!("Pet species cannot be empty"));
            }
            pet.species = species.trim().to_string();
        }
        if let Some(breed) = command.breed {
            pet.breed = breed;
        }
        if let Some(birthdate) = command.birthdate {
            pet.birthdate = birthdate;
        }

        self.pet_repository.update_pet(&pet)?;
        Ok(PetResult { pet })
    }

    /// Delete a pet. Refused while any unarchived task still points at it;
    /// archived tasks and their completion history survive the deletion.
    pub fn delete_pet(&self, user_id: &str, pet_id: &str) -> Result<bool> {
        let active_tasks = self
            .task_repository
            .list_tasks(user_id, false)?
            .into_iter()
            .filter(|t| t.pet_id == pet_id)
            .count();
        if active_tasks > 0 {
            return Err(anyhow::anyhow!(
                "Cannot delete pet {}: {} active task(s) still reference it",
                pet_id,
                active_tasks
            ));
        }

        self.pet_repository.delete_pet(user_id, pet_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::tasks::CreateTaskCommand;
    use crate::domain::commands::tasks::SetArchivedCommand;
    use crate::domain::task_service::TaskService;
    use crate::storage::csv::test_utils::TestEnvironment;
    use chrono::NaiveDate;

    fn services() -> Result<(PetService, TaskService, TestEnvironment)> {
        let env = TestEnvironment::new()?;
        let conn = Arc::new(env.connection.clone());
        Ok((PetService::new(conn.clone()), TaskService::new(conn), env))
    }

    fn create_pet_command(name: &str) -> CreatePetCommand {
        CreatePetCommand {
            user_id: "user1".to_string(),
            name: name.to_string(),
            species: "dog".to_string(),
            breed: None,
            birthdate: None,
        }
    }

    #[test]
    fn test_create_and_list_pets() -> Result<()> {
        let (pets, _tasks, _env) = services()?;

        let created = pets.create_pet(create_pet_command("Momo"))?;
        assert!(created.pet.id.starts_with("pet::"));

        let listed = pets.list_pets("user1")?;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Momo");
        Ok(())
    }

    #[test]
    fn test_create_pet_rejects_blank_name() -> Result<()> {
        let (pets, _tasks, _env) = services()?;
        assert!(pets.create_pet(create_pet_command("   ")).is_err());
        Ok(())
    }

    #[test]
    fn test_update_pet_partial_fields() -> Result<()> {
        let (pets, _tasks, _env) = services()?;
        let pet = pets.create_pet(create_pet_command("Momo"))?.pet;

        let updated = pets.update_pet(UpdatePetCommand {
            user_id: "user1".to_string(),
            pet_id: pet.id.clone(),
            name: None,
            species: None,
            breed: Some(Some("corgi".to_string())),
            birthdate: None,
        })?;
        assert_eq!(updated.pet.name, "Momo");
        assert_eq!(updated.pet.breed.as_deref(), Some("corgi"));
        Ok(())
    }

    #[test]
    fn test_delete_pet_blocked_by_active_tasks() -> Result<()> {
        let (pets, tasks, _env) = services()?;
        let pet = pets.create_pet(create_pet_command("Momo"))?.pet;

        let task = tasks
            .create_task(CreateTaskCommand {
                user_id: "user1".to_string(),
                pet_id: pet.id.clone(),
                title: "Morning walk".to_string(),
                category: "walk".to_string(),
                repeat_type: "daily".to_string(),
                start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                weekdays: None,
            })?
            .task;

        assert!(pets.delete_pet("user1", &pet.id).is_err());

        // Archiving the task unblocks deletion
        tasks.set_archived(SetArchivedCommand {
            user_id: "user1".to_string(),
            task_id: task.id,
            archived: true,
        })?;
        assert!(pets.delete_pet("user1", &pet.id)?);
        Ok(())
    }
}
