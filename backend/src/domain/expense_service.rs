//! Pet expense tracking with month-bucketed totals.

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;

use crate::domain::commands::expenses::{CreateExpenseCommand, ExpenseTotals};
use crate::domain::models::PetExpense;
use crate::storage::csv::{CsvConnection, ExpenseRepository, PetRepository};
use crate::storage::traits::{ExpenseStorage, PetStorage};

#[derive(Clone)]
pub struct ExpenseService {
    expense_repository: ExpenseRepository,
    pet_repository: PetRepository,
}

impl ExpenseService {
    /// Create a new ExpenseService
    pub fn new(csv_conn: Arc<CsvConnection>) -> Self {
        Self {
            expense_repository: ExpenseRepository::new((*csv_conn).clone()),
            pet_repository: PetRepository::new((*csv_conn).clone()),
        }
    }

    pub fn create_expense(&self, command: CreateExpenseCommand) -> Result<PetExpense> {
        if command.category.trim().is_empty() {
            return Err(anyhow::anyhow!("Expense category cannot be empty"));
        }
        if !command.amount.is_finite() || command.amount < 0.0 {
            return Err(anyhow::anyhow!(
                "Expense amount must be a non-negative number"
            ));
        }
        if self
            .pet_repository
            .get_pet(&command.user_id, &command.pet_id)?
            .is_none()
        {
            return Err(anyhow::anyhow!("Pet not found: {}", command.pet_id));
        }

        let now = Utc::now();
        let expense = PetExpense {
            id: PetExpense::generate_id(now.timestamp_millis() as u64),
            user_id: command.user_id,
            pet_id: command.pet_id,
            category: command.category.trim().to_string(),
            amount: command.amount,
            spent_on: command.spent_on,
            notes: command.notes,
            created_at: now,
        };

        self.expense_repository.store_expense(&expense)?;
        Ok(expense)
    }

    pub fn list_expenses(&self, user_id: &str, pet_id: Option<&str>) -> Result<Vec<PetExpense>> {
        self.expense_repository.list_expenses(user_id, pet_id)
    }

    /// Totals for the month containing the reference date, plus the
    /// all-time total.
    pub fn totals(&self, user_id: &str, today: NaiveDate) -> Result<ExpenseTotals> {
        let month = today.format("%Y-%m").to_string();
        let expenses = self.expense_repository.list_expenses(user_id, None)?;

        let total: f64 = expenses.iter().map(|e| e.amount).sum();
        let month_total: f64 = expenses
            .iter()
            .filter(|e| e.month_key() == month)
            .map(|e| e.amount)
            .sum();

        Ok(ExpenseTotals {
            month,
            month_total,
            total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::pets::CreatePetCommand;
    use crate::domain::pet_service::PetService;
    use crate::storage::csv::test_utils::TestEnvironment;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn fixture() -> Result<(ExpenseService, String, TestEnvironment)> {
        let env = TestEnvironment::new()?;
        let conn = Arc::new(env.connection.clone());
        let pets = PetService::new(conn.clone());
        let service = ExpenseService::new(conn);
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

    fn expense_command(pet_id: &str, amount: f64, spent_on: &str) -> CreateExpenseCommand {
        CreateExpenseCommand {
            user_id: "user1".to_string(),
            pet_id: pet_id.to_string(),
            category: "food".to_string(),
            amount,
            spent_on: d(spent_on),
            notes: None,
        }
    }

    #[test]
    fn test_totals_split_by_month() -> Result<()> {
        let (service, pet_id, _env) = fixture()?;

        service.create_expense(expense_command(&pet_id, 30.0, "2024-06-05"))?;
        service.create_expense(expense_command(&pet_id, 12.5, "2024-06-20"))?;
        service.create_expense(expense_command(&pet_id, 99.0, "2024-05-31"))?;

        let totals = service.totals("user1", d("2024-06-15"))?;
        assert_eq!(totals.month, "2024-06");
        assert_eq!(totals.month_total, 42.5);
        assert_eq!(totals.total, 141.5);
        Ok(())
    }

    #[test]
    fn test_negative_amount_rejected() -> Result<()> {
        let (service, pet_id, _env) = fixture()?;
        assert!(service
            .create_expense(expense_command(&pet_id, -5.0, "2024-06-05"))
            .is_err());
        Ok(())
    }
}
