// src/handlers/employee.rs

use crate::{
    engine::accrual::leave_balance,
    errors::{AppError, AppResult},
    models::{
        CreateEmployeeRequest, CreateTimeOffRequest, Employee, LeaveAccrualState, TimeOffRequest,
    },
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use rust_decimal_macros::dec;
use uuid::Uuid;

/// Register a new employee
#[utoipa::path(
    post,
    path = "/api/v1/employees",
    request_body = CreateEmployeeRequest,
    responses(
        (status = 201, description = "Employee created", body = Employee),
        (status = 400, description = "Invalid employee data"),
    ),
    tag = "Employees"
)]
pub async fn create_employee(
    State(state): State<AppState>,
    Json(body): Json<CreateEmployeeRequest>,
) -> AppResult<(StatusCode, Json<Employee>)> {
    if body.first_name.trim().is_empty() || body.last_name.trim().is_empty() {
        return Err(AppError::Validation(
            "Employee first and last name are required".to_string(),
        ));
    }
    if body.base_salary < dec!(0) {
        return Err(AppError::Validation(
            "Base salary cannot be negative".to_string(),
        ));
    }

    let now = Utc::now();
    let employee = Employee {
        id: Uuid::new_v4(),
        first_name: body.first_name,
        last_name: body.last_name,
        email: body.email,
        national_id: body.national_id,
        cnss_number: body.cnss_number,
        address: body.address,
        birth_date: body.birth_date,
        hire_date: body.hire_date,
        base_salary: body.base_salary,
        initial_vacation_balance: body.initial_vacation_balance.unwrap_or(dec!(0)),
        is_active: true,
        created_at: now,
        updated_at: now,
    };

    let mut store = state.store.write().await;
    store.employees.insert(employee.id, employee.clone());

    Ok((StatusCode::CREATED, Json(employee)))
}

/// List all employees
#[utoipa::path(
    get,
    path = "/api/v1/employees",
    responses((status = 200, description = "List of employees", body = Vec<Employee>)),
    tag = "Employees"
)]
pub async fn list_employees(State(state): State<AppState>) -> AppResult<Json<Vec<Employee>>> {
    let store = state.store.read().await;
    let mut employees: Vec<Employee> = store.employees.values().cloned().collect();
    employees.sort_by_key(|e| e.created_at);

    Ok(Json(employees))
}

/// Get a single employee
#[utoipa::path(
    get,
    path = "/api/v1/employees/{employee_id}",
    params(("employee_id" = Uuid, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee detail", body = Employee),
        (status = 404, description = "Employee not found"),
    ),
    tag = "Employees"
)]
pub async fn get_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<Uuid>,
) -> AppResult<Json<Employee>> {
    let store = state.store.read().await;
    let employee = store
        .employees
        .get(&employee_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", employee_id)))?;

    Ok(Json(employee))
}

/// Record a time-off request for an employee
#[utoipa::path(
    post,
    path = "/api/v1/employees/{employee_id}/time-off",
    params(("employee_id" = Uuid, Path, description = "Employee ID")),
    request_body = CreateTimeOffRequest,
    responses(
        (status = 201, description = "Time-off request recorded", body = TimeOffRequest),
        (status = 400, description = "Invalid date range"),
        (status = 404, description = "Employee not found"),
    ),
    tag = "Leave"
)]
pub async fn add_time_off(
    State(state): State<AppState>,
    Path(employee_id): Path<Uuid>,
    Json(body): Json<CreateTimeOffRequest>,
) -> AppResult<(StatusCode, Json<TimeOffRequest>)> {
    if body.end_date < body.start_date {
        return Err(AppError::Validation(
            "Time-off end date is before its start date".to_string(),
        ));
    }
    if body.total_days <= dec!(0) {
        return Err(AppError::Validation(
            "Time-off total days must be positive".to_string(),
        ));
    }

    let mut store = state.store.write().await;
    if !store.employees.contains_key(&employee_id) {
        return Err(AppError::NotFound(format!(
            "Employee {} not found",
            employee_id
        )));
    }

    let request = TimeOffRequest {
        id: Uuid::new_v4(),
        employee_id,
        start_date: body.start_date,
        end_date: body.end_date,
        total_days: body.total_days,
        status: body.status,
        created_at: Utc::now(),
    };
    store.time_off.push(request.clone());

    Ok((StatusCode::CREATED, Json(request)))
}

/// Current leave balance for an employee.
///
/// Recomputed from the hire date, accrual rate and approved time-off history
/// on every call — never cached.
#[utoipa::path(
    get,
    path = "/api/v1/employees/{employee_id}/leave-balance",
    params(("employee_id" = Uuid, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Accrued/used/expired/balance ledger", body = LeaveAccrualState),
        (status = 404, description = "Employee not found"),
    ),
    tag = "Leave"
)]
pub async fn get_leave_balance(
    State(state): State<AppState>,
    Path(employee_id): Path<Uuid>,
) -> AppResult<Json<LeaveAccrualState>> {
    let store = state.store.read().await;
    let employee = store
        .employees
        .get(&employee_id)
        .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", employee_id)))?;

    let requests: Vec<_> = store
        .time_off
        .iter()
        .filter(|r| r.employee_id == employee_id)
        .cloned()
        .collect();

    let today = Utc::now().date_naive();
    let ledger = leave_balance(
        employee.hire_date,
        employee.initial_vacation_balance,
        &requests,
        today,
        state.config.monthly_accrual_days,
    );

    Ok(Json(ledger))
}
