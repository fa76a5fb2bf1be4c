// src/models/mod.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;
use uuid::Uuid;

// ─── Pay Schedule ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PayCadence {
    Weekly,
    Biweekly,
    SemiMonthly,
    Monthly,
}

impl PayCadence {
    /// Expected period count over a full calendar year. Used to bound
    /// iteration, not to force exact counts when the anchor falls mid-year.
    pub fn periods_per_year(self) -> u32 {
        match self {
            PayCadence::Weekly => 52,
            PayCadence::Biweekly => 26,
            PayCadence::SemiMonthly => 24,
            PayCadence::Monthly => 12,
        }
    }
}

/// Company-wide payroll schedule configuration. Read-only to the engine.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaySchedule {
    pub cadence: PayCadence,
    /// The next payday the schedule is anchored to.
    pub anchor_payday: NaiveDate,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetPayScheduleRequest {
    pub cadence: PayCadence,
    pub anchor_payday: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum PeriodState {
    Open,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum PeriodType {
    Recurring,
}

/// One pay period. Periods for a given (cadence, year) are contiguous and
/// non-overlapping; immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PayPeriod {
    pub index: u32,
    pub period_label: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub payday: NaiveDate,
    pub state: PeriodState,
    #[serde(rename = "type")]
    pub period_type: PeriodType,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct GeneratePeriodsRequest {
    pub cadence: PayCadence,
    pub anchor_payday: NaiveDate,
    pub target_year: i32,
}

// ─── Statutory Rate Table ─────────────────────────────────────────────────────

/// A flat-rate contribution, optionally capped by a monthly ceiling on the
/// contribution base.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContributionRate {
    /// Rate as a fraction, e.g. 0.0448 means 4.48%
    pub rate: Decimal,
    pub monthly_ceiling: Option<Decimal>,
}

/// One progressive income-tax bracket in closed (rate, fixed-deduction) form:
/// `ir = taxable * rate - deduction` for taxable in `[min, max]`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TaxBracket {
    pub min: Decimal,
    /// `None` means the bracket is unbounded above.
    pub max: Option<Decimal>,
    pub rate: Decimal,
    pub deduction: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatutoryRateTable {
    pub cnss: ContributionRate,
    pub amo: ContributionRate,
    pub ir_brackets: Vec<TaxBracket>,
    pub updated_at: DateTime<Utc>,
}

impl Default for StatutoryRateTable {
    /// Moroccan monthly table: CNSS 4.48% capped at 6 000 MAD, AMO 2.26%
    /// uncapped, six IR brackets with continuity-consistent deductions.
    fn default() -> Self {
        StatutoryRateTable {
            cnss: ContributionRate {
                rate: dec!(0.0448),
                monthly_ceiling: Some(dec!(6000)),
            },
            amo: ContributionRate {
                rate: dec!(0.0226),
                monthly_ceiling: None,
            },
            ir_brackets: vec![
                TaxBracket {
                    min: dec!(0),
                    max: Some(dec!(2500)),
                    rate: dec!(0),
                    deduction: dec!(0),
                },
                TaxBracket {
                    min: dec!(2500.01),
                    max: Some(dec!(4166.67)),
                    rate: dec!(0.10),
                    deduction: dec!(250),
                },
                TaxBracket {
                    min: dec!(4166.68),
                    max: Some(dec!(5000)),
                    rate: dec!(0.20),
                    deduction: dec!(666.67),
                },
                TaxBracket {
                    min: dec!(5000.01),
                    max: Some(dec!(6666.67)),
                    rate: dec!(0.30),
                    deduction: dec!(1166.67),
                },
                TaxBracket {
                    min: dec!(6666.68),
                    max: Some(dec!(15000)),
                    rate: dec!(0.34),
                    deduction: dec!(1433.33),
                },
                TaxBracket {
                    min: dec!(15000.01),
                    max: None,
                    rate: dec!(0.38),
                    deduction: dec!(2033.33),
                },
            ],
            updated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetRateTableRequest {
    pub cnss: ContributionRate,
    pub amo: ContributionRate,
    pub ir_brackets: Vec<TaxBracket>,
}

// ─── Employee ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Employee {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// National identity card number, exported verbatim.
    pub national_id: String,
    pub cnss_number: String,
    pub address: String,
    pub birth_date: Option<NaiveDate>,
    pub hire_date: Option<NaiveDate>,
    /// Monthly compensation; seeds the run draft's base salary.
    pub base_salary: Decimal,
    pub initial_vacation_balance: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateEmployeeRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub national_id: String,
    pub cnss_number: String,
    pub address: String,
    pub birth_date: Option<NaiveDate>,
    pub hire_date: Option<NaiveDate>,
    pub base_salary: Decimal,
    #[serde(default)]
    pub initial_vacation_balance: Option<Decimal>,
}

// ─── Time Off & Leave Accrual ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TimeOffStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TimeOffRequest {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_days: Decimal,
    pub status: TimeOffStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTimeOffRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_days: Decimal,
    pub status: TimeOffStatus,
}

/// Derived leave balance, recomputed on read and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct LeaveAccrualState {
    pub accrued: Decimal,
    pub used: Decimal,
    pub expired: Decimal,
    pub balance: Decimal,
}

impl LeaveAccrualState {
    pub fn zero() -> Self {
        LeaveAccrualState {
            accrued: dec!(0),
            used: dec!(0),
            expired: dec!(0),
            balance: dec!(0),
        }
    }
}

// ─── Payroll Run ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Draft,
    Finalized,
}

/// Per-employee gross inputs owned by a run. Seeded from the employee profile
/// at draft creation, then independently editable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EmployeeInputs {
    pub base_salary: Decimal,
    pub bonuses: Decimal,
    pub other_deductions: Decimal,
}

impl EmployeeInputs {
    pub fn from_base_salary(base_salary: Decimal) -> Self {
        EmployeeInputs {
            base_salary,
            bonuses: dec!(0),
            other_deductions: dec!(0),
        }
    }
}

/// Raw inputs as edited in a form: each field is a JSON number or a
/// locale-formatted string, normalized through `engine::money::parse_money`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct EmployeeInputsRaw {
    #[serde(default)]
    pub base_salary: MoneyInput,
    #[serde(default)]
    pub bonuses: MoneyInput,
    #[serde(default)]
    pub other_deductions: MoneyInput,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum MoneyInput {
    Number(f64),
    Text(String),
}

impl Default for MoneyInput {
    fn default() -> Self {
        MoneyInput::Number(0.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PayrollRun {
    pub id: Uuid,
    /// Format: "YYYY-MM". At most one run may exist per period.
    pub period: String,
    pub period_label: String,
    pub status: RunStatus,
    pub employee_data: BTreeMap<Uuid, EmployeeInputs>,
    pub total_gross_pay: Decimal,
    pub total_net_pay: Decimal,
    /// The rate table in force when the run was finalized; `None` while the
    /// run is a draft. Rows of a finalized run are always derived against
    /// this snapshot so they keep matching the frozen totals.
    pub rate_table: Option<StatutoryRateTable>,
    pub created_at: DateTime<Utc>,
    pub finalized_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRunRequest {
    /// Format: "YYYY-MM"
    pub period: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveDraftRequest {
    pub employee_data: BTreeMap<Uuid, EmployeeInputsRaw>,
}

/// Derived payroll figures for one employee. Pure function of the inputs and
/// the rate table; recomputed on read, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ComputedRow {
    pub gross_pay: Decimal,
    pub cnss: Decimal,
    pub amo: Decimal,
    pub ir: Decimal,
    pub net_pay: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RunRow {
    pub employee_id: Uuid,
    pub inputs: EmployeeInputs,
    pub computed: ComputedRow,
}

/// Element-wise sum over all rows of a run. Always derived from the rows,
/// never independently tracked.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RunTotals {
    pub gross_pay: Decimal,
    pub cnss: Decimal,
    pub amo: Decimal,
    pub ir: Decimal,
    pub other_deductions: Decimal,
    pub net_pay: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PayrollRunDetail {
    #[serde(flatten)]
    pub run: PayrollRun,
    pub rows: Vec<RunRow>,
    pub totals: RunTotals,
}

// ─── Company Profile (statutory export header) ────────────────────────────────

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CompanyProfile {
    pub name: String,
    pub fiscal_id: String,
    pub cnss_affiliation: String,
}
