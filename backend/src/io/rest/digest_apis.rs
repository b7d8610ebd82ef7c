//! # REST API for the Digest Job
//!
//! A single endpoint the external scheduler hits on its cadence. Guarded
//! by a bearer secret rather than user auth, since the caller is a cron
//! service, not a person.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use chrono::NaiveDate;
use log::{error, info, warn};
use serde::Deserialize;

use crate::domain::calendar::today_utc;
use crate::domain::DigestRunner;
use crate::AppState;
use shared::DigestRunSummaryDto;

#[derive(Debug, Deserialize, Default)]
pub struct DigestQuery {
    pub date: Option<NaiveDate>,
}

fn authorized(headers: &HeaderMap, secret: &str) -> bool {
    if secret.is_empty() {
        // No secret configured: the endpoint is disabled, not open
        return false;
    }
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", secret))
        .unwrap_or(false)
}

/// Run the digest for every opted-in user
pub async fn send_digests(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<DigestQuery>,
) -> impl IntoResponse {
    if !authorized(&headers, &state.digest_secret) {
        warn!("Rejected digest trigger with missing or bad credentials");
        return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
    }

    let today = query.date.unwrap_or_else(today_utc);
    info!("GET /api/send-digests - running digest for {}", today);

    match state.digest_service.run_digest(today) {
        Ok(summary) => (
            StatusCode::OK,
            Json(DigestRunSummaryDto {
                users_considered: summary.users_considered,
                emails_sent: summary.emails_sent,
                users_skipped: summary.users_skipped,
                users_failed: summary.users_failed,
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Digest run failed: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Digest run failed").into_response()
        }
    }
}
