// src/handlers/schedule.rs

use crate::{
    engine::schedule::generate_periods,
    errors::{AppError, AppResult},
    models::{GeneratePeriodsRequest, PayPeriod, PaySchedule, SetPayScheduleRequest},
    state::AppState,
};
use axum::{Json, extract::State};
use chrono::Utc;
use tracing::info;

/// Set or replace the company pay schedule
#[utoipa::path(
    put,
    path = "/api/v1/pay-schedule",
    request_body = SetPayScheduleRequest,
    responses(
        (status = 200, description = "Pay schedule saved", body = PaySchedule),
        (status = 400, description = "Invalid anchor date"),
    ),
    tag = "Pay Schedule"
)]
pub async fn set_pay_schedule(
    State(state): State<AppState>,
    Json(body): Json<SetPayScheduleRequest>,
) -> AppResult<Json<PaySchedule>> {
    let schedule = PaySchedule {
        cadence: body.cadence,
        anchor_payday: body.anchor_payday,
        updated_at: Utc::now(),
    };

    let mut store = state.store.write().await;
    store.pay_schedule = Some(schedule.clone());
    info!(
        "Pay schedule set: {:?} anchored at {}",
        schedule.cadence, schedule.anchor_payday
    );

    Ok(Json(schedule))
}

/// Get the current pay schedule
#[utoipa::path(
    get,
    path = "/api/v1/pay-schedule",
    responses(
        (status = 200, description = "Current pay schedule", body = PaySchedule),
        (status = 404, description = "Pay schedule not configured"),
    ),
    tag = "Pay Schedule"
)]
pub async fn get_pay_schedule(State(state): State<AppState>) -> AppResult<Json<PaySchedule>> {
    let store = state.store.read().await;
    let schedule = store
        .pay_schedule
        .clone()
        .ok_or_else(|| AppError::NotFound("Pay schedule not configured".to_string()))?;

    Ok(Json(schedule))
}

/// Generate the pay periods for a target year.
///
/// Pure computation: nothing is persisted here. Callers are responsible for
/// deduplicating against periods they already stored before inserting.
#[utoipa::path(
    post,
    path = "/api/v1/pay-periods/generate",
    request_body = GeneratePeriodsRequest,
    responses(
        (status = 200, description = "Ordered pay periods for the year", body = Vec<PayPeriod>),
        (status = 400, description = "Invalid anchor date or target year"),
    ),
    tag = "Pay Schedule"
)]
pub async fn generate_pay_periods(
    Json(body): Json<GeneratePeriodsRequest>,
) -> AppResult<Json<Vec<PayPeriod>>> {
    let periods = generate_periods(body.cadence, body.anchor_payday, body.target_year)?;
    info!(
        "Generated {} {:?} periods for {}",
        periods.len(),
        body.cadence,
        body.target_year
    );

    Ok(Json(periods))
}
