//! # REST API for Care Tasks
//!
//! CRUD plus the archive and completion toggles.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::{error, info};
use serde::Deserialize;

use crate::domain::commands::tasks::{
    CompletionCommand, CreateTaskCommand, SetArchivedCommand, UpdateTaskCommand,
};
use crate::domain::models::CareTask;
use crate::AppState;
use shared::{CareTaskDto, CompletionRequest, CreateTaskRequest, SetArchivedRequest, UpdateTaskRequest};

pub(crate) fn task_to_dto(task: CareTask) -> CareTaskDto {
    let (repeat_type, start_date, weekdays) = task.rule.to_parts();
    CareTaskDto {
        id: task.id,
        pet_id: task.pet_id,
        title: task.title,
        category: task.category,
        repeat_type: repeat_type.to_string(),
        start_date,
        weekdays,
        archived: task.archived,
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct ListTasksQuery {
    #[serde(default)]
    pub include_archived: bool,
}

/// Create a new care task
pub async fn create_task(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<CreateTaskRequest>,
) -> impl IntoResponse {
    info!("POST /api/users/{}/tasks - request: {:?}", user_id, request);

    let command = CreateTaskCommand {
        user_id,
        pet_id: request.pet_id,
        title: request.title,
        category: request.category,
        repeat_type: request.repeat_type,
        start_date: request.start_date,
        weekdays: request.weekdays,
    };

    match state.task_service.create_task(command) {
        Ok(result) => (StatusCode::CREATED, Json(task_to_dto(result.task))).into_response(),
        Err(e) => {
            error!("Failed to create task: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}

/// Get a task by ID
pub async fn get_task(
    State(state): State<AppState>,
    Path((user_id, task_id)): Path<(String, String)>,
) -> impl IntoResponse {
    info!("GET /api/users/{}/tasks/{}", user_id, task_id);

    match state.task_service.get_task(&user_id, &task_id) {
        Ok(Some(task)) => (StatusCode::OK, Json(task_to_dto(task))).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Task not found").into_response(),
        Err(e) => {
            error!("Failed to get task: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error retrieving task").into_response()
        }
    }
}

/// List a user's tasks; archived ones only on request
pub async fn list_tasks(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<ListTasksQuery>,
) -> impl IntoResponse {
    info!(
        "GET /api/users/{}/tasks?include_archived={}",
        user_id, query.include_archived
    );

    match state.task_service.list_tasks(&user_id, query.include_archived) {
        Ok(tasks) => {
            let dtos: Vec<CareTaskDto> = tasks.into_iter().map(task_to_dto).collect();
            (StatusCode::OK, Json(dtos)).into_response()
        }
        Err(e) => {
            error!("Failed to list tasks: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error listing tasks").into_response()
        }
    }
}

/// Update a task
pub async fn update_task(
    State(state): State<AppState>,
    Path((user_id, task_id)): Path<(String, String)>,
    Json(request): Json<UpdateTaskRequest>,
) -> impl IntoResponse {
    info!(
        "PUT /api/users/{}/tasks/{} - request: {:?}",
        user_id, task_id, request
    );

    let command = UpdateTaskCommand {
        user_id,
        task_id,
        title: request.title,
        category: request.category,
        repeat_type: request.repeat_type,
        start_date: request.start_date,
        weekdays: request.weekdays,
    };

    match state.task_service.update_task(command) {
        Ok(result) => (StatusCode::OK, Json(task_to_dto(result.task))).into_response(),
        Err(e) => {
            error!("Failed to update task: {}", e);
            let status = if e.to_string().contains("not found") {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::BAD_REQUEST
            };
            (status, e.to_string()).into_response()
        }
    }
}

/// Archive or unarchive a task
pub async fn set_archived(
    State(state): State<AppState>,
    Path((user_id, task_id)): Path<(String, String)>,
    Json(request): Json<SetArchivedRequest>,
) -> impl IntoResponse {
    info!(
        "POST /api/users/{}/tasks/{}/archive - archived: {}",
        user_id, task_id, request.archived
    );

    let command = SetArchivedCommand {
        user_id,
        task_id,
        archived: request.archived,
    };

    match state.task_service.set_archived(command) {
        Ok(result) => (StatusCode::OK, Json(task_to_dto(result.task))).into_response(),
        Err(e) => {
            error!("Failed to set archived flag: {}", e);
            let status = if e.to_string().contains("not found") {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::BAD_REQUEST
            };
            (status, e.to_string()).into_response()
        }
    }
}

/// Delete a task permanently
pub async fn delete_task(
    State(state): State<AppState>,
    Path((user_id, task_id)): Path<(String, String)>,
) -> impl IntoResponse {
    info!("DELETE /api/users/{}/tasks/{}", user_id, task_id);

    match state.task_service.delete_task(&user_id, &task_id) {
        Ok(true) => (StatusCode::NO_CONTENT, "").into_response(),
        Ok(false) => (StatusCode::NOT_FOUND, "Task not found").into_response(),
        Err(e) => {
            error!("Failed to delete task: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Mark a task done on a date (idempotent)
pub async fn complete_task(
    State(state): State<AppState>,
    Path((user_id, task_id)): Path<(String, String)>,
    Json(request): Json<CompletionRequest>,
) -> impl IntoResponse {
    info!(
        "POST /api/users/{}/tasks/{}/complete - date: {}",
        user_id, task_id, request.date
    );

    let command = CompletionCommand {
        user_id,
        task_id,
        date: request.date,
    };

    match state.task_service.mark_done(command) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            error!("Failed to record completion: {}", e);
            let status = if e.to_string().contains("not found") {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (status, e.to_string()).into_response()
        }
    }
}

/// Undo a completion for a date
pub async fn uncomplete_task(
    State(state): State<AppState>,
    Path((user_id, task_id)): Path<(String, String)>,
    Json(request): Json<CompletionRequest>,
) -> impl IntoResponse {
    info!(
        "POST /api/users/{}/tasks/{}/uncomplete - date: {}",
        user_id, task_id, request.date
    );

    let command = CompletionCommand {
        user_id,
        task_id,
        date: request.date,
    };

    match state.task_service.undo_completion(command) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            error!("Failed to undo completion: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
