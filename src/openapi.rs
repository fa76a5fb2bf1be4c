// src/openapi.rs

use crate::models::{
    CompanyProfile, ComputedRow, ContributionRate, CreateEmployeeRequest, CreateRunRequest,
    CreateTimeOffRequest, Employee, EmployeeInputs, EmployeeInputsRaw, GeneratePeriodsRequest,
    LeaveAccrualState, MoneyInput, PayCadence, PayPeriod, PaySchedule, PayrollRun,
    PayrollRunDetail, PeriodState, PeriodType, RunRow, RunStatus, RunTotals, SaveDraftRequest,
    SetPayScheduleRequest, SetRateTableRequest, StatutoryRateTable, TaxBracket, TimeOffRequest,
    TimeOffStatus,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Payroll Engine API",
        version = "1.0.0",
        description = "Payroll & leave-accrual computation engine: deterministic pay-period \
            scheduling, statutory payroll computation with a draft → finalize lifecycle, \
            FIFO leave-accrual ledgers and statutory XML export. All figures are derived \
            on read from plain inputs; nothing computed is ever stored.",
        license(name = "MIT")
    ),
    paths(
        // Pay Schedule
        crate::handlers::schedule::set_pay_schedule,
        crate::handlers::schedule::get_pay_schedule,
        crate::handlers::schedule::generate_pay_periods,
        // Employees & Leave
        crate::handlers::employee::create_employee,
        crate::handlers::employee::list_employees,
        crate::handlers::employee::get_employee,
        crate::handlers::employee::add_time_off,
        crate::handlers::employee::get_leave_balance,
        // Rate Table
        crate::handlers::payroll::set_rate_table,
        crate::handlers::payroll::get_rate_table,
        // Payroll Runs
        crate::handlers::payroll::create_run,
        crate::handlers::payroll::list_runs,
        crate::handlers::payroll::get_run,
        crate::handlers::payroll::save_run_draft,
        crate::handlers::payroll::finalize_run,
        crate::handlers::payroll::export_run,
    ),
    components(schemas(
        PayCadence,
        PaySchedule,
        SetPayScheduleRequest,
        PeriodState,
        PeriodType,
        PayPeriod,
        GeneratePeriodsRequest,
        ContributionRate,
        TaxBracket,
        StatutoryRateTable,
        SetRateTableRequest,
        Employee,
        CreateEmployeeRequest,
        TimeOffStatus,
        TimeOffRequest,
        CreateTimeOffRequest,
        LeaveAccrualState,
        RunStatus,
        EmployeeInputs,
        EmployeeInputsRaw,
        MoneyInput,
        PayrollRun,
        CreateRunRequest,
        SaveDraftRequest,
        ComputedRow,
        RunRow,
        RunTotals,
        PayrollRunDetail,
        CompanyProfile,
    )),
    tags(
        (name = "Pay Schedule", description = "Cadence configuration and pay-period generation"),
        (name = "Employees", description = "Employee profiles"),
        (name = "Leave", description = "Time-off requests and accrual ledgers"),
        (name = "Rate Table", description = "Statutory contribution rates and tax brackets"),
        (name = "Payroll", description = "Payroll runs: draft, finalize, export"),
    )
)]
pub struct ApiDoc;
