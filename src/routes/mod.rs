// src/routes/mod.rs

use crate::{
    handlers::{
        employee::{
            add_time_off, create_employee, get_employee, get_leave_balance, list_employees,
        },
        payroll::{
            create_run, export_run, finalize_run, get_rate_table, get_run, list_runs,
            save_run_draft, set_rate_table,
        },
        schedule::{generate_pay_periods, get_pay_schedule, set_pay_schedule},
    },
    state::AppState,
};
use axum::{
    Router,
    routing::{get, post, put},
};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // ─── Pay Schedule ─────────────────────────────────────
        .route("/pay-schedule", put(set_pay_schedule).get(get_pay_schedule))
        .route("/pay-periods/generate", post(generate_pay_periods))
        // ─── Employees ────────────────────────────────────────
        .route("/employees", post(create_employee).get(list_employees))
        .route("/employees/{employee_id}", get(get_employee))
        .route("/employees/{employee_id}/time-off", post(add_time_off))
        .route(
            "/employees/{employee_id}/leave-balance",
            get(get_leave_balance),
        )
        // ─── Rate Table ───────────────────────────────────────
        .route("/rate-table", put(set_rate_table).get(get_rate_table))
        // ─── Payroll Runs ─────────────────────────────────────
        .route("/payroll/runs", post(create_run).get(list_runs))
        .route("/payroll/runs/{period}", get(get_run))
        .route("/payroll/runs/{period}/draft", put(save_run_draft))
        .route("/payroll/runs/{period}/finalize", post(finalize_run))
        .route("/payroll/runs/{period}/export", get(export_run))
}
