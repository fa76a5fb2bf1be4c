// src/handlers/payroll.rs

use crate::{
    engine::{
        export,
        lifecycle::{self, compute_rows, rates_in_force},
        money::{format_money, parse_money},
        payroll::{aggregate, validate_rate_table},
    },
    errors::{AppError, AppResult},
    models::{
        CompanyProfile, CreateRunRequest, EmployeeInputs, PayrollRun, PayrollRunDetail,
        SaveDraftRequest, SetRateTableRequest, StatutoryRateTable,
    },
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use chrono::Utc;
use std::collections::BTreeMap;
use tracing::info;
use uuid::Uuid;

/// Replace the statutory rate table (CNSS, AMO and IR brackets)
#[utoipa::path(
    put,
    path = "/api/v1/rate-table",
    request_body = SetRateTableRequest,
    responses(
        (status = 200, description = "Rate table saved", body = StatutoryRateTable),
        (status = 400, description = "Inconsistent brackets or rates"),
    ),
    tag = "Rate Table"
)]
pub async fn set_rate_table(
    State(state): State<AppState>,
    Json(body): Json<SetRateTableRequest>,
) -> AppResult<Json<StatutoryRateTable>> {
    validate_rate_table(&body.cnss, &body.amo, &body.ir_brackets)?;

    let table = StatutoryRateTable {
        cnss: body.cnss,
        amo: body.amo,
        ir_brackets: body.ir_brackets,
        updated_at: Utc::now(),
    };

    let mut store = state.store.write().await;
    store.rate_table = table.clone();

    Ok(Json(table))
}

/// Get the statutory rate table currently in force
#[utoipa::path(
    get,
    path = "/api/v1/rate-table",
    responses((status = 200, description = "Current rate table", body = StatutoryRateTable)),
    tag = "Rate Table"
)]
pub async fn get_rate_table(State(state): State<AppState>) -> AppResult<Json<StatutoryRateTable>> {
    let store = state.store.read().await;
    Ok(Json(store.rate_table.clone()))
}

/// Create a draft payroll run for a period.
///
/// At most one run may exist per "YYYY-MM" period; the draft seeds every
/// active employee's inputs from their profile compensation.
#[utoipa::path(
    post,
    path = "/api/v1/payroll/runs",
    request_body = CreateRunRequest,
    responses(
        (status = 201, description = "Draft run created", body = PayrollRun),
        (status = 400, description = "Malformed period key"),
        (status = 409, description = "A run already exists for this period"),
    ),
    tag = "Payroll"
)]
pub async fn create_run(
    State(state): State<AppState>,
    Json(body): Json<CreateRunRequest>,
) -> AppResult<(StatusCode, Json<PayrollRun>)> {
    let mut store = state.store.write().await;
    if store.runs.contains_key(&body.period) {
        return Err(AppError::DuplicatePeriod(body.period));
    }

    let employees: Vec<_> = store.employees.values().cloned().collect();
    let run = lifecycle::create_draft(&body.period, &employees, Utc::now())?;
    store.runs.insert(run.period.clone(), run.clone());
    info!(
        "Draft run created for {} with {} employees",
        run.period,
        run.employee_data.len()
    );

    Ok((StatusCode::CREATED, Json(run)))
}

/// List all payroll runs
#[utoipa::path(
    get,
    path = "/api/v1/payroll/runs",
    responses((status = 200, description = "List of payroll runs", body = Vec<PayrollRun>)),
    tag = "Payroll"
)]
pub async fn list_runs(State(state): State<AppState>) -> AppResult<Json<Vec<PayrollRun>>> {
    let store = state.store.read().await;
    let mut runs: Vec<PayrollRun> = store.runs.values().cloned().collect();
    runs.sort_by(|a, b| b.period.cmp(&a.period));

    Ok(Json(runs))
}

/// Get a payroll run with its rows recomputed from the current inputs.
///
/// Draft rows are derived against the rate table currently in force;
/// finalized rows against the snapshot frozen at finalize, so the derived
/// totals always agree with the frozen ones.
#[utoipa::path(
    get,
    path = "/api/v1/payroll/runs/{period}",
    params(("period" = String, Path, description = "Period key, format YYYY-MM")),
    responses(
        (status = 200, description = "Run detail with derived rows and totals", body = PayrollRunDetail),
        (status = 404, description = "Run not found"),
    ),
    tag = "Payroll"
)]
pub async fn get_run(
    State(state): State<AppState>,
    Path(period): Path<String>,
) -> AppResult<Json<PayrollRunDetail>> {
    let store = state.store.read().await;
    let run = store
        .runs
        .get(&period)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("No payroll run for period {}", period)))?;

    let rows = compute_rows(&run.employee_data, rates_in_force(&run, &store.rate_table));
    let totals = aggregate(&rows);

    Ok(Json(PayrollRunDetail { run, rows, totals }))
}

/// Save edited employee inputs into a draft run.
///
/// Inputs are stored verbatim after money normalization; no computed figures
/// are persisted. Finalized runs reject edits.
#[utoipa::path(
    put,
    path = "/api/v1/payroll/runs/{period}/draft",
    params(("period" = String, Path, description = "Period key, format YYYY-MM")),
    request_body = SaveDraftRequest,
    responses(
        (status = 200, description = "Draft saved", body = PayrollRun),
        (status = 404, description = "Run not found"),
        (status = 409, description = "Run is finalized"),
    ),
    tag = "Payroll"
)]
pub async fn save_run_draft(
    State(state): State<AppState>,
    Path(period): Path<String>,
    Json(body): Json<SaveDraftRequest>,
) -> AppResult<Json<PayrollRun>> {
    let employee_data: BTreeMap<Uuid, EmployeeInputs> = body
        .employee_data
        .iter()
        .map(|(id, raw)| {
            (
                *id,
                EmployeeInputs {
                    base_salary: parse_money(&raw.base_salary),
                    bonuses: parse_money(&raw.bonuses),
                    other_deductions: parse_money(&raw.other_deductions),
                },
            )
        })
        .collect();

    let mut store = state.store.write().await;
    let run = store
        .runs
        .get_mut(&period)
        .ok_or_else(|| AppError::NotFound(format!("No payroll run for period {}", period)))?;

    lifecycle::save_draft(run, employee_data)?;

    Ok(Json(run.clone()))
}

/// Finalize a draft run.
///
/// Recomputes every row under the store's write lock and rejects the whole
/// run if any employee nets out negative; on success the totals are frozen
/// and the run becomes immutable.
#[utoipa::path(
    post,
    path = "/api/v1/payroll/runs/{period}/finalize",
    params(("period" = String, Path, description = "Period key, format YYYY-MM")),
    responses(
        (status = 200, description = "Run finalized", body = PayrollRun),
        (status = 404, description = "Run not found"),
        (status = 409, description = "Run is already finalized"),
        (status = 422, description = "An employee has a negative net pay"),
    ),
    tag = "Payroll"
)]
pub async fn finalize_run(
    State(state): State<AppState>,
    Path(period): Path<String>,
) -> AppResult<Json<PayrollRun>> {
    let mut store = state.store.write().await;
    let rate_table = store.rate_table.clone();
    let run = store
        .runs
        .get_mut(&period)
        .ok_or_else(|| AppError::NotFound(format!("No payroll run for period {}", period)))?;

    let totals = lifecycle::finalize(run, &rate_table, Utc::now())?;
    info!(
        "Run {} finalized: gross {} / net {}",
        period,
        format_money(totals.gross_pay),
        format_money(totals.net_pay)
    );

    Ok(Json(run.clone()))
}

/// Export a finalized run as the statutory declaration XML
#[utoipa::path(
    get,
    path = "/api/v1/payroll/runs/{period}/export",
    params(("period" = String, Path, description = "Period key, format YYYY-MM")),
    responses(
        (status = 200, description = "Statutory XML document", body = String, content_type = "application/xml"),
        (status = 404, description = "Run not found"),
        (status = 409, description = "Run is not finalized"),
    ),
    tag = "Payroll"
)]
pub async fn export_run(
    State(state): State<AppState>,
    Path(period): Path<String>,
) -> AppResult<impl IntoResponse> {
    let store = state.store.read().await;
    let run = store
        .runs
        .get(&period)
        .ok_or_else(|| AppError::NotFound(format!("No payroll run for period {}", period)))?;

    let rows = compute_rows(&run.employee_data, rates_in_force(run, &store.rate_table));
    let company = CompanyProfile {
        name: state.config.company_name.clone(),
        fiscal_id: state.config.company_fiscal_id.clone(),
        cnss_affiliation: state.config.company_cnss_affiliation.clone(),
    };
    let xml = export::render(run, &rows, &store.employees, &company)?;

    Ok(([(header::CONTENT_TYPE, "application/xml")], xml))
}
