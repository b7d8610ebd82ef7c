//! # REST API for Notification Settings

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::{error, info};

use crate::domain::commands::settings::UpdateSettingsCommand;
use crate::domain::models::NotificationSetting;
use crate::AppState;
use shared::{NotificationSettingDto, UpdateSettingsRequest};

fn setting_to_dto(setting: NotificationSetting) -> NotificationSettingDto {
    NotificationSettingDto {
        email: setting.email,
        email_enabled: setting.email_enabled,
        days_ahead: setting.days_ahead,
    }
}

/// Get a user's digest settings (creating the opted-out default on first
/// access)
pub async fn get_settings(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/users/{}/settings", user_id);

    match state.settings_service.get_or_default(&user_id) {
        Ok(setting) => (StatusCode::OK, Json(setting_to_dto(setting))).into_response(),
        Err(e) => {
            error!("Failed to load settings: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error loading settings").into_response()
        }
    }
}

/// Update a user's digest settings. Omitted fields keep their current
/// values.
pub async fn update_settings(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<UpdateSettingsRequest>,
) -> impl IntoResponse {
    info!("PUT /api/users/{}/settings - request: {:?}", user_id, request);

    let current = match state.settings_service.get_or_default(&user_id) {
        Ok(setting) => setting,
        Err(e) => {
            error!("Failed to load settings: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Error loading settings").into_response();
        }
    };

    let command = UpdateSettingsCommand {
        user_id,
        email: request.email.unwrap_or(current.email),
        email_enabled: request.email_enabled.unwrap_or(current.email_enabled),
        days_ahead: request.days_ahead.unwrap_or(current.days_ahead),
    };

    match state.settings_service.update(command) {
        Ok(setting) => (StatusCode::OK, Json(setting_to_dto(setting))).into_response(),
        Err(e) => {
            error!("Failed to update settings: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}
