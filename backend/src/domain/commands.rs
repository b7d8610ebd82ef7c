//! Domain-level command and query types.
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer is responsible for mapping the
//! public DTOs defined in the `shared` crate to these internal types.

pub mod pets {
    use chrono::NaiveDate;

    use crate::domain::models::Pet;

    /// Input for registering a new pet.
    #[derive(Debug, Clone)]
    pub struct CreatePetCommand {
        pub user_id: String,
        pub name: String,
        pub species: String,
        pub breed: Option<String>,
        pub birthdate: Option<NaiveDate>,
    }

    /// Input for updating a pet's profile.
    #[derive(Debug, Clone)]
    pub struct UpdatePetCommand {
        pub user_id: String,
        pub pet_id: String,
        pub name: Option<String>,
        pub species: Option<String>,
        pub breed: Option<Option<String>>,
        pub birthdate: Option<Option<NaiveDate>>,
    }

    /// Result of creating or updating a pet.
    #[derive(Debug, Clone)]
    pub struct PetResult {
        pub pet: Pet,
    }
}

pub mod tasks {
    use chrono::NaiveDate;

    use crate::domain::models::CareTask;

    /// Input for creating a care task. The repetition rule arrives as the
    /// loose wire triple and is validated into a typed rule by the service.
    #[derive(Debug, Clone)]
    pub struct CreateTaskCommand {
        pub user_id: String,
        pub pet_id: String,
        pub title: String,
        pub category: String,
        pub repeat_type: String,
        pub start_date: NaiveDate,
        pub weekdays: Option<Vec<u8>>,
    }

    /// Input for updating a task. `None` fields are left unchanged.
    #[derive(Debug, Clone)]
    pub struct UpdateTaskCommand {
        pub user_id: String,
        pub task_id: String,
        pub title: Option<String>,
        pub category: Option<String>,
        pub repeat_type: Option<String>,
        pub start_date: Option<NaiveDate>,
        pub weekdays: Option<Vec<u8>>,
    }

    /// Input for archiving or unarchiving a task.
    #[derive(Debug, Clone)]
    pub struct SetArchivedCommand {
        pub user_id: String,
        pub task_id: String,
        pub archived: bool,
    }

    /// Input for marking a task done (or undoing it) on a date.
    #[derive(Debug, Clone)]
    pub struct CompletionCommand {
        pub user_id: String,
        pub task_id: String,
        pub date: NaiveDate,
    }

    /// Result of creating or updating a task.
    #[derive(Debug, Clone)]
    pub struct TaskResult {
        pub task: CareTask,
    }
}

pub mod health {
    use chrono::NaiveDate;

    use crate::domain::models::HealthRepeat;

    /// Input for creating a health reminder.
    #[derive(Debug, Clone)]
    pub struct CreateReminderCommand {
        pub user_id: String,
        pub pet_id: String,
        pub title: String,
        pub kind: String,
        pub due_on: NaiveDate,
        pub repeat: HealthRepeat,
    }
}

pub mod records {
    use chrono::NaiveDate;

    /// Input for adding a pet record entry.
    #[derive(Debug, Clone)]
    pub struct CreateRecordCommand {
        pub user_id: String,
        pub pet_id: String,
        pub title: String,
        pub record_date: NaiveDate,
        pub notes: Option<String>,
    }
}

pub mod expenses {
    use chrono::NaiveDate;

    /// Input for recording an expense.
    #[derive(Debug, Clone)]
    pub struct CreateExpenseCommand {
        pub user_id: String,
        pub pet_id: String,
        pub category: String,
        pub amount: f64,
        pub spent_on: NaiveDate,
        pub notes: Option<String>,
    }

    /// Totals returned alongside the expense list.
    #[derive(Debug, Clone, PartialEq)]
    pub struct ExpenseTotals {
        /// Current month key, `YYYY-MM`
        pub month: String,
        pub month_total: f64,
        pub total: f64,
    }
}

pub mod settings {
    /// Input for updating a user's digest preferences.
    #[derive(Debug, Clone)]
    pub struct UpdateSettingsCommand {
        pub user_id: String,
        pub email: String,
        pub email_enabled: bool,
        pub days_ahead: i64,
    }
}
