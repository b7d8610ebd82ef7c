use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use csv::{Reader, Writer};
use log::info;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter};

use super::connection::CsvConnection;
use crate::domain::models::Pet;
use crate::storage::traits::PetStorage;

/// CSV-based pet repository
#[derive(Clone)]
pub struct PetRepository {
    connection: CsvConnection,
}

impl PetRepository {
    /// Create a new CSV pet repository
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    /// Read all pets for a user from their CSV file
    fn read_pets(&self, user_id: &str) -> Result<Vec<Pet>> {
        self.connection.ensure_pets_file_exists(user_id)?;

        let file_path = self.connection.get_pets_file_path(user_id);
        let file = File::open(&file_path)?;
        let reader = BufReader::new(file);
        let mut csv_reader = Reader::from_reader(reader);

        let mut pets = Vec::new();

        for result in csv_reader.records() {
            let record = result?;

            let breed = match record.get(3).unwrap_or("") {
                "" => None,
                value => Some(value.to_string()),
            };
            let birthdate = record
                .get(4)
                .filter(|v| !v.is_empty())
                .and_then(|v| NaiveDate::parse_from_str(v, "%Y-%m-%d").ok());
            let created_at = record
                .get(5)
                .and_then(|v| DateTime::parse_from_rfc3339(v).ok())
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(Utc::now);

            pets.push(Pet {
                id: record.get(0).unwrap_or("").to_string(),
                user_id: user_id.to_string(),
                name: record.get(1).unwrap_or("").to_string(),
                species: record.get(2).unwrap_or("").to_string(),
                breed,
                birthdate,
                created_at,
            });
        }

        pets.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(pets)
    }

    /// Write all pets for a user to their CSV file
    fn write_pets(&self, user_id: &str, pets: &[Pet]) -> Result<()> {
        self.connection.ensure_pets_file_exists(user_id)?;
        let file_path = self.connection.get_pets_file_path(user_id);

        // Write to a temporary file, then atomically rename over the original
        let temp_path = file_path.with_extension("tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)?;

            let writer = BufWriter::new(file);
            let mut csv_writer = Writer::from_writer(writer);

            csv_writer.write_record([
                "id",
                "name",
                "species",
                "breed",
                "birthdate",
                "created_at",
            ])?;

            for pet in pets {
                csv_writer.write_record([
                    pet.id.as_str(),
                    pet.name.as_str(),
                    pet.species.as_str(),
                    pet.breed.as_deref().unwrap_or(""),
                    &pet
                        .birthdate
                        .map(|d| d.format("%Y-%m-%d").to_string())
                        .unwrap_or_default(),
                    &pet.created_at.to_rfc3339(),
                ])?;
            }

            csv_writer.flush()?;
        }

        std::fs::rename(&temp_path, &file_path)?;

        Ok(())
    }
}

impl PetStorage for PetRepository {
    fn store_pet(&self, pet: &Pet) -> Result<()> {
        info!("Storing pet {} for user {}", pet.id, pet.user_id);
        let mut pets = self.read_pets(&pet.user_id)?;
        pets.push(pet.clone());
        self.write_pets(&pet.user_id, &pets)
    }

    fn get_pet(&self, user_id: &str, pet_id: &str) -> Result<Option<Pet>> {
        let pets = self.read_pets(user_id)?;
        Ok(pets.into_iter().find(|p| p.id == pet_id))
    }

    fn list_pets(&self, user_id: &str) -> Result<Vec<Pet>> {
        self.read_pets(user_id)
    }

    fn update_pet(&self, pet: &Pet) -> Result<()> {
        let mut pets = self.read_pets(&pet.user_id)?;
        match pets.iter_mut().find(|p| p.id == pet.id) {
            Some(existing) => {
                *existing = pet.clone();
                self.write_pets(&pet.user_id, &pets)
            }
            None => Err(anyhow::anyhow!("Pet not found: {}", pet.id)),
        }
    }

    fn delete_pet(&self, user_id: &str, pet_id: &str) -> Result<bool> {
        let mut pets = self.read_pets(user_id)?;
        let before = pets.len();
        pets.retain(|p| p.id != pet_id);
        if pets.len() == before {
            return Ok(false);
        }
        self.write_pets(user_id, &pets)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::test_utils::TestEnvironment;
    use chrono::NaiveDate;

    fn sample_pet(id: &str, name: &str) -> Pet {
        Pet {
            id: id.to_string(),
            user_id: "user1".to_string(),
            name: name.to_string(),
            species: "dog".to_string(),
            breed: Some("corgi".to_string()),
            birthdate: NaiveDate::from_ymd_opt(2020, 5, 1),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_store_and_get_pet() -> Result<()> {
        let env = TestEnvironment::new()?;
        let repo = PetRepository::new(env.connection.clone());

        let pet = sample_pet("pet::1", "Momo");
        repo.store_pet(&pet)?;

        let loaded = repo.get_pet("user1", "pet::1")?.unwrap();
        assert_eq!(loaded.name, "Momo");
        assert_eq!(loaded.breed.as_deref(), Some("corgi"));
        assert_eq!(loaded.birthdate, NaiveDate::from_ymd_opt(2020, 5, 1));
        Ok(())
    }

    #[test]
    fn test_optional_fields_round_trip_as_empty() -> Result<()> {
        let env = TestEnvironment::new()?;
        let repo = PetRepository::new(env.connection.clone());

        let mut pet = sample_pet("pet::1", "Momo");
        pet.breed = None;
        pet.birthdate = None;
        repo.store_pet(&pet)?;

        let loaded = repo.get_pet("user1", "pet::1")?.unwrap();
        assert!(loaded.breed.is_none());
        assert!(loaded.birthdate.is_none());
        Ok(())
    }

    #[test]
    fn test_delete_pet_reports_existence() -> Result<()> {
        let env = TestEnvironment::new()?;
        let repo = PetRepository::new(env.connection.clone());

        repo.store_pet(&sample_pet("pet::1", "Momo"))?;
        assert!(repo.delete_pet("user1", "pet::1")?);
        assert!(!repo.delete_pet("user1", "pet::1")?);
        assert!(repo.get_pet("user1", "pet::1")?.is_none());
        Ok(())
    }

    #[test]
    fn test_users_are_isolated() -> Result<()> {
        let env = TestEnvironment::new()?;
        let repo = PetRepository::new(env.connection.clone());

        repo.store_pet(&sample_pet("pet::1", "Momo"))?;
        assert!(repo.list_pets("user2")?.is_empty());
        Ok(())
    }
}
