use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use csv::{Reader, Writer};
use log::info;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter};

use super::connection::CsvConnection;
use crate::domain::models::PetRecord;
use crate::storage::traits::RecordStorage;

/// CSV-based pet record repository
#[derive(Clone)]
pub struct RecordRepository {
    connection: CsvConnection,
}

impl RecordRepository {
    /// Create a new CSV record repository
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_records(&self, user_id: &str) -> Result<Vec<PetRecord>> {
        self.connection.ensure_records_file_exists(user_id)?;

        let file_path = self.connection.get_records_file_path(user_id);
        let file = File::open(&file_path)?;
        let reader = BufReader::new(file);
        let mut csv_reader = Reader::from_reader(reader);

        let mut records = Vec::new();

        for result in csv_reader.records() {
            let record = result?;

            let record_date = match record
                .get(3)
                .and_then(|v| NaiveDate::parse_from_str(v, "%Y-%m-%d").ok())
            {
                Some(date) => date,
                None => continue,
            };
            let notes = match record.get(4).unwrap_or("") {
                "" => None,
                value => Some(value.to_string()),
            };
            let created_at = record
                .get(5)
                .and_then(|v| DateTime::parse_from_rfc3339(v).ok())
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(Utc::now);

            records.push(PetRecord {
                id: record.get(0).unwrap_or("").to_string(),
                user_id: user_id.to_string(),
                pet_id: record.get(1).unwrap_or("").to_string(),
                title: record.get(2).unwrap_or("").to_string(),
                record_date,
                notes,
                created_at,
            });
        }

        // Most recent first
        records.sort_by(|a, b| b.record_date.cmp(&a.record_date));
        Ok(records)
    }

    fn write_records(&self, user_id: &str, records: &[PetRecord]) -> Result<()> {
        self.connection.ensure_records_file_exists(user_id)?;
        let file_path = self.connection.get_records_file_path(user_id);

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
                "pet_id",
                "title",
                "record_date",
                "notes",
                "created_at",
            ])?;

            for record in records {
                csv_writer.write_record([
                    record.id.as_str(),
                    record.pet_id.as_str(),
                    record.title.as_str(),
                    &record.record_date.format("%Y-%m-%d").to_string(),
                    record.notes.as_deref().unwrap_or(""),
                    &record.created_at.to_rfc3339(),
                ])?;
            }

            csv_writer.flush()?;
        }

        std::fs::rename(&temp_path, &file_path)?;

        Ok(())
    }
}

impl RecordStorage for RecordRepository {
    fn store_record(&self, record: &PetRecord) -> Result<()> {
        info!("Storing record {} for user {}", record.id, record.user_id);
        let mut records = self.read_records(&record.user_id)?;
        records.push(record.clone());
        self.write_records(&record.user_id, &records)
    }

    fn list_records(&self, user_id: &str, pet_id: Option<&str>) -> Result<Vec<PetRecord>> {
        let mut records = self.read_records(user_id)?;
        if let Some(pet_id) = pet_id {
            records.retain(|r| r.pet_id == pet_id);
        }
        Ok(records)
    }
}
