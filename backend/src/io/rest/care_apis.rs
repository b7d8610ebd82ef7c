//! # REST API for Health Reminders, Records, and Expenses

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use chrono::NaiveDate;
use log::{error, info};
use serde::Deserialize;

use crate::domain::calendar::today_utc;
use crate::domain::commands::expenses::CreateExpenseCommand;
use crate::domain::commands::health::CreateReminderCommand;
use crate::domain::commands::records::CreateRecordCommand;
use crate::domain::models::{HealthReminder, HealthRepeat, PetExpense, PetRecord};
use crate::AppState;
use shared::{
    CreateExpenseRequest, CreateHealthReminderRequest, CreateRecordRequest, ExpenseTotalsResponse,
    HealthReminderDto, PetExpenseDto, PetRecordDto,
};

fn reminder_to_dto(reminder: HealthReminder) -> HealthReminderDto {
    HealthReminderDto {
        id: reminder.id,
        pet_id: reminder.pet_id,
        title: reminder.title,
        kind: reminder.kind,
        due_on: reminder.due_on,
        repeat: reminder.repeat.as_str().to_string(),
    }
}

fn record_to_dto(record: PetRecord) -> PetRecordDto {
    PetRecordDto {
        id: record.id,
        pet_id: record.pet_id,
        title: record.title,
        record_date: record.record_date,
        notes: record.notes,
    }
}

fn expense_to_dto(expense: PetExpense) -> PetExpenseDto {
    PetExpenseDto {
        id: expense.id,
        pet_id: expense.pet_id,
        category: expense.category,
        amount: expense.amount,
        spent_on: expense.spent_on,
        notes: expense.notes,
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct PetFilterQuery {
    pub pet_id: Option<String>,
    /// For health reminders: look-ahead window in days
    pub days: Option<i64>,
}

#[derive(Debug, Deserialize, Default)]
pub struct TotalsQuery {
    pub date: Option<NaiveDate>,
}

/// Create a health reminder
pub async fn create_reminder(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<CreateHealthReminderRequest>,
) -> impl IntoResponse {
    info!("POST /api/users/{}/health - request: {:?}", user_id, request);

    let command = CreateReminderCommand {
        user_id,
        pet_id: request.pet_id,
        title: request.title,
        kind: request.kind,
        due_on: request.due_on,
        repeat: HealthRepeat::parse(request.repeat.as_deref().unwrap_or("none")),
    };

    match state.health_service.create_reminder(command) {
        Ok(reminder) => (StatusCode::CREATED, Json(reminder_to_dto(reminder))).into_response(),
        Err(e) => {
            error!("Failed to create health reminder: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}

/// List health reminders, optionally filtered by pet or an upcoming window
pub async fn list_reminders(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<PetFilterQuery>,
) -> impl IntoResponse {
    info!("GET /api/users/{}/health", user_id);

    let result = match query.days {
        Some(days) => state
            .health_service
            .list_upcoming(&user_id, today_utc(), days),
        None => state
            .health_service
            .list_reminders(&user_id, query.pet_id.as_deref()),
    };

    match result {
        Ok(reminders) => {
            let dtos: Vec<HealthReminderDto> =
                reminders.into_iter().map(reminder_to_dto).collect();
            (StatusCode::OK, Json(dtos)).into_response()
        }
        Err(e) => {
            error!("Failed to list health reminders: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error listing reminders").into_response()
        }
    }
}

/// Delete a health reminder
pub async fn delete_reminder(
    State(state): State<AppState>,
    Path((user_id, reminder_id)): Path<(String, String)>,
) -> impl IntoResponse {
    info!("DELETE /api/users/{}/health/{}", user_id, reminder_id);

    match state.health_service.delete_reminder(&user_id, &reminder_id) {
        Ok(true) => (StatusCode::NO_CONTENT, "").into_response(),
        Ok(false) => (StatusCode::NOT_FOUND, "Reminder not found").into_response(),
        Err(e) => {
            error!("Failed to delete health reminder: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Add a pet record entry
pub async fn create_record(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<CreateRecordRequest>,
) -> impl IntoResponse {
    info!("POST /api/users/{}/records - request: {:?}", user_id, request);

    let command = CreateRecordCommand {
        user_id,
        pet_id: request.pet_id,
        title: request.title,
        record_date: request.record_date,
        notes: request.notes,
    };

    match state.record_service.create_record(command) {
        Ok(record) => (StatusCode::CREATED, Json(record_to_dto(record))).into_response(),
        Err(e) => {
            error!("Failed to create record: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}

/// List pet records, most recent first
pub async fn list_records(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<PetFilterQuery>,
) -> impl IntoResponse {
    info!("GET /api/users/{}/records", user_id);

    match state
        .record_service
        .list_records(&user_id, query.pet_id.as_deref())
    {
        Ok(records) => {
            let dtos: Vec<PetRecordDto> = records.into_iter().map(record_to_dto).collect();
            (StatusCode::OK, Json(dtos)).into_response()
        }
        Err(e) => {
            error!("Failed to list records: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error listing records").into_response()
        }
    }
}

/// Download every record as a JSON attachment
pub async fn export_records(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/users/{}/records/export", user_id);

    match state.record_service.export_json(&user_id) {
        Ok(json) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/json"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"pet_records.json\"",
                ),
            ],
            json,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to export records: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error exporting records").into_response()
        }
    }
}

/// Record an expense
pub async fn create_expense(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<CreateExpenseRequest>,
) -> impl IntoResponse {
    info!("POST /api/users/{}/expenses - request: {:?}", user_id, request);

    let command = CreateExpenseCommand {
        user_id,
        pet_id: request.pet_id,
        category: request.category,
        amount: request.amount,
        spent_on: request.spent_on,
        notes: request.notes,
    };

    match state.expense_service.create_expense(command) {
        Ok(expense) => (StatusCode::CREATED, Json(expense_to_dto(expense))).into_response(),
        Err(e) => {
            error!("Failed to create expense: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}

/// List expenses, most recent first
pub async fn list_expenses(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<PetFilterQuery>,
) -> impl IntoResponse {
    info!("GET /api/users/{}/expenses", user_id);

    match state
        .expense_service
        .list_expenses(&user_id, query.pet_id.as_deref())
    {
        Ok(expenses) => {
            let dtos: Vec<PetExpenseDto> = expenses.into_iter().map(expense_to_dto).collect();
            (StatusCode::OK, Json(dtos)).into_response()
        }
        Err(e) => {
            error!("Failed to list expenses: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error listing expenses").into_response()
        }
    }
}

/// Month-to-date and all-time expense totals
pub async fn expense_totals(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<TotalsQuery>,
) -> impl IntoResponse {
    let today = query.date.unwrap_or_else(today_utc);
    info!("GET /api/users/{}/expenses/totals?date={}", user_id, today);

    match state.expense_service.totals(&user_id, today) {
        Ok(totals) => (
            StatusCode::OK,
            Json(ExpenseTotalsResponse {
                month: totals.month,
                month_total: totals.month_total,
                total: totals.total,
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to compute expense totals: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error computing totals").into_response()
        }
    }
}
