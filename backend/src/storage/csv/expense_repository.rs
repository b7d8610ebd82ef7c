use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use csv::{Reader, Writer};
use log::info;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter};

use super::connection::CsvConnection;
use crate::domain::models::PetExpense;
use crate::storage::traits::ExpenseStorage;

/// CSV-based expense repository
#[derive(Clone)]
pub struct ExpenseRepository {
    connection: CsvConnection,
}

impl ExpenseRepository {
    /// Create a new CSV expense repository
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_expenses(&self, user_id: &str) -> Result<Vec<PetExpense>> {
        self.connection.ensure_expenses_file_exists(user_id)?;

        let file_path = self.connection.get_expenses_file_path(user_id);
        let file = File::open(&file_path)?;
        let reader = BufReader::new(file);
        let mut csv_reader = Reader::from_reader(reader);

        let mut expenses = Vec::new();

        for result in csv_reader.records() {
            let record = result?;

            let spent_on = match record
                .get(4)
                .and_then(|v| NaiveDate::parse_from_str(v, "%Y-%m-%d").ok())
            {
                Some(date) => date,
                None => continue,
            };
            let notes = match record.get(5).unwrap_or("") {
                "" => None,
                value => Some(value.to_string()),
            };
            let created_at = record
                .get(6)
                .and_then(|v| DateTime::parse_from_rfc3339(v).ok())
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(Utc::now);

            expenses.push(PetExpense {
                id: record.get(0).unwrap_or("").to_string(),
                user_id: user_id.to_string(),
                pet_id: record.get(1).unwrap_or("").to_string(),
                category: record.get(2).unwrap_or("").to_string(),
                amount: record.get(3).unwrap_or("0").parse::<f64>().unwrap_or(0.0),
                spent_on,
                notes,
                created_at,
            });
        }

        // Most recent first
        expenses.sort_by(|a, b| b.spent_on.cmp(&a.spent_on));
        Ok(expenses)
    }

    fn write_expenses(&self, user_id: &str, expenses: &[PetExpense]) -> Result<()> {
        self.connection.ensure_expenses_file_exists(user_id)?;
        let file_path = self.connection.get_expenses_file_path(user_id);

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
                "category",
                "amount",
                "spent_on",
                "notes",
                "created_at",
            ])?;

            for expense in expenses {
                csv_writer.write_record([
                    expense.id.as_str(),
                    expense.pet_id.as_str(),
                    expense.category.as_str(),
                    &expense.amount.to_string(),
                    &expense.spent_on.format("%Y-%m-%d").to_string(),
                    expense.notes.as_deref().unwrap_or(""),
                    &expense.created_at.to_rfc3339(),
                ])?;
            }

            csv_writer.flush()?;
        }

        std::fs::rename(&temp_path, &file_path)?;

        Ok(())
    }
}

impl ExpenseStorage for ExpenseRepository {
    fn store_expense(&self, expense: &PetExpense) -> Result<()> {
        info!("Storing expense {} for user {}", expense.id, expense.user_id);
        let mut expenses = self.read_expenses(&expense.user_id)?;
        expenses.push(expense.clone());
        self.write_expenses(&expense.user_id, &expenses)
    }

    fn list_expenses(&self, user_id: &str, pet_id: Option<&str>) -> Result<Vec<PetExpense>> {
        let mut expenses = self.read_expenses(user_id)?;
        if let Some(pet_id) = pet_id {
            expenses.retain(|e| e.pet_id == pet_id);
        }
        Ok(expenses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::test_utils::TestEnvironment;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn expense(id: &str, amount: f64, date: &str) -> PetExpense {
        PetExpense {
            id: id.to_string(),
            user_id: "user1".to_string(),
            pet_id: "pet::1".to_string(),
            category: "food".to_string(),
            amount,
            spent_on: d(date),
            notes: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_amounts_round_trip() -> Result<()> {
        let env = TestEnvironment::new()?;
        let repo = ExpenseRepository::new(env.connection.clone());

        repo.store_expense(&expense("e1", 42.5, "2024-01-15"))?;
        let loaded = repo.list_expenses("user1", None)?;
        assert_eq!(loaded[0].amount, 42.5);
        assert_eq!(loaded[0].month_key(), "2024-01");
        Ok(())
    }

    #[test]
    fn test_expenses_listed_most_recent_first() -> Result<()> {
        let env = TestEnvironment::new()?;
        let repo = ExpenseRepository::new(env.connection.clone());

        repo.store_expense(&expense("e1", 10.0, "2024-01-15"))?;
        repo.store_expense(&expense("e2", 20.0, "2024-03-02"))?;

        let loaded = repo.list_expenses("user1", None)?;
        assert_eq!(loaded[0].id, "e2");
        assert_eq!(loaded[1].id, "e1");
        Ok(())
    }
}
