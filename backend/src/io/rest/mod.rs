//! # REST API Interface Layer
//!
//! Provides the HTTP endpoints for the pet-care tracker. This layer
//! handles:
//! - HTTP request/response serialization and deserialization
//! - Input validation before the domain layer
//! - Error translation from domain errors to HTTP status codes
//! - CORS configuration for browser clients
//! - Request logging
//!
//! The layer is a pure translation shell: DTOs from the `shared` crate in,
//! domain commands out, no business logic.

pub mod care_apis;
pub mod digest_apis;
pub mod pet_apis;
pub mod schedule_apis;
pub mod settings_apis;
pub mod task_apis;

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::AppState;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/users/:user_id/pets",
            get(pet_apis::list_pets).post(pet_apis::create_pet),
        )
        .route(
            "/api/users/:user_id/pets/:pet_id",
            get(pet_apis::get_pet)
                .put(pet_apis::update_pet)
                .delete(pet_apis::delete_pet),
        )
        .route(
            "/api/users/:user_id/tasks",
            get(task_apis::list_tasks).post(task_apis::create_task),
        )
        .route(
            "/api/users/:user_id/tasks/:task_id",
            get(task_apis::get_task)
                .put(task_apis::update_task)
                .delete(task_apis::delete_task),
        )
        .route(
            "/api/users/:user_id/tasks/:task_id/archive",
            post(task_apis::set_archived),
        )
        .route(
            "/api/users/:user_id/tasks/:task_id/complete",
            post(task_apis::complete_task),
        )
        .route(
            "/api/users/:user_id/tasks/:task_id/uncomplete",
            post(task_apis::uncomplete_task),
        )
        .route(
            "/api/users/:user_id/schedule/today",
            get(schedule_apis::today_counts),
        )
        .route(
            "/api/users/:user_id/schedule/week",
            get(schedule_apis::week_progress),
        )
        .route(
            "/api/users/:user_id/schedule/upcoming",
            get(schedule_apis::upcoming_week),
        )
        .route(
            "/api/users/:user_id/health",
            get(care_apis::list_reminders).post(care_apis::create_reminder),
        )
        .route(
            "/api/users/:user_id/health/:reminder_id",
            delete(care_apis::delete_reminder),
        )
        .route(
            "/api/users/:user_id/records",
            get(care_apis::list_records).post(care_apis::create_record),
        )
        .route(
            "/api/users/:user_id/records/export",
            get(care_apis::export_records),
        )
        .route(
            "/api/users/:user_id/expenses",
            get(care_apis::list_expenses).post(care_apis::create_expense),
        )
        .route(
            "/api/users/:user_id/expenses/totals",
            get(care_apis::expense_totals),
        )
        .route(
            "/api/users/:user_id/settings",
            get(settings_apis::get_settings).put(settings_apis::update_settings),
        )
        .route("/api/send-digests", get(digest_apis::send_digests))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
