//! # REST API for Schedule Aggregation
//!
//! Today's counts, the weekly progress ring, and the upcoming-week
//! breakdown. Every endpoint accepts an optional `?date=YYYY-MM-DD`
//! reference date, defaulting to the current UTC date, so clients near a
//! midnight boundary can pin the evaluation date explicitly.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::NaiveDate;
use log::{error, info};
use serde::Deserialize;

use crate::domain::calendar::today_utc;
use crate::AppState;
use shared::{DayCountDto, UpcomingDayDto, UpcomingResponse, WeekProgressResponse};

#[derive(Debug, Deserialize, Default)]
pub struct ReferenceDateQuery {
    pub date: Option<NaiveDate>,
}

/// Due/done counts for the reference date
pub async fn today_counts(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<ReferenceDateQuery>,
) -> impl IntoResponse {
    let today = query.date.unwrap_or_else(today_utc);
    info!("GET /api/users/{}/schedule/today?date={}", user_id, today);

    match state.schedule_service.today_counts(&user_id, today) {
        Ok(counts) => (
            StatusCode::OK,
            Json(DayCountDto {
                due: counts.due,
                done: counts.done,
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to compute today's counts: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error computing counts").into_response()
        }
    }
}

/// Weekly progress for the Monday-start week containing the reference date
pub async fn week_progress(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<ReferenceDateQuery>,
) -> impl IntoResponse {
    let today = query.date.unwrap_or_else(today_utc);
    info!("GET /api/users/{}/schedule/week?date={}", user_id, today);

    match state.schedule_service.week_progress(&user_id, today) {
        Ok(progress) => (
            StatusCode::OK,
            Json(WeekProgressResponse {
                week_start: progress.week_start,
                due: progress.counts.due,
                done: progress.counts.done,
                percent: progress.percent,
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to compute week progress: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error computing progress").into_response()
        }
    }
}

/// Per-day counts for the seven days after the reference date
pub async fn upcoming_week(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<ReferenceDateQuery>,
) -> impl IntoResponse {
    let today = query.date.unwrap_or_else(today_utc);
    info!("GET /api/users/{}/schedule/upcoming?date={}", user_id, today);

    match state.schedule_service.upcoming_week(&user_id, today) {
        Ok(days) => {
            let days = days
                .into_iter()
                .map(|day| UpcomingDayDto {
                    date: day.date,
                    due: day.counts.due,
                    done: day.counts.done,
                })
                .collect();
            (StatusCode::OK, Json(UpcomingResponse { days })).into_response()
        }
        Err(e) => {
            error!("Failed to compute upcoming week: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error computing upcoming week").into_response()
        }
    }
}
