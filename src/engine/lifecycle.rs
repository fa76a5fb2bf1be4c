// src/engine/lifecycle.rs

use crate::engine::payroll::{aggregate, compute_row};
use crate::errors::{AppError, AppResult};
use crate::models::{
    Employee, EmployeeInputs, PayrollRun, RunRow, RunStatus, RunTotals, StatutoryRateTable,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Build a new draft run for a `"YYYY-MM"` period, seeding each active
/// employee's inputs from their profile compensation. Period uniqueness is
/// enforced by the store before this run is inserted.
pub fn create_draft(
    period: &str,
    employees: &[Employee],
    now: DateTime<Utc>,
) -> AppResult<PayrollRun> {
    let period_label = period_label(period)?;

    let employee_data: BTreeMap<Uuid, EmployeeInputs> = employees
        .iter()
        .filter(|e| e.is_active)
        .map(|e| (e.id, EmployeeInputs::from_base_salary(e.base_salary)))
        .collect();

    Ok(PayrollRun {
        id: Uuid::new_v4(),
        period: period.to_string(),
        period_label,
        status: RunStatus::Draft,
        employee_data,
        total_gross_pay: Decimal::ZERO,
        total_net_pay: Decimal::ZERO,
        rate_table: None,
        created_at: now,
        finalized_at: None,
    })
}

/// Replace a draft's inputs verbatim. Nothing derived is stored; rows are
/// recomputed from the latest inputs on every read.
pub fn save_draft(
    run: &mut PayrollRun,
    employee_data: BTreeMap<Uuid, EmployeeInputs>,
) -> AppResult<()> {
    ensure_draft(run)?;
    run.employee_data = employee_data;
    Ok(())
}

/// Validate and freeze a run. Recomputes every row from the current inputs;
/// if any employee's net pay is negative the whole finalize is rejected and
/// the run is left untouched. On success the run becomes `Finalized`
/// (terminal), `finalized_at` is stamped, and both the aggregate totals and
/// the rate table used to validate them are frozen onto the run, so later
/// reads and the statutory export derive rows from exactly what was
/// validated here.
pub fn finalize(
    run: &mut PayrollRun,
    rates: &StatutoryRateTable,
    now: DateTime<Utc>,
) -> AppResult<RunTotals> {
    ensure_draft(run)?;

    let rows = compute_rows(&run.employee_data, rates);
    if let Some(row) = rows.iter().find(|r| r.computed.net_pay < Decimal::ZERO) {
        return Err(AppError::InvalidNetPay {
            employee_id: row.employee_id,
            net_pay: row.computed.net_pay,
        });
    }

    let totals = aggregate(&rows);
    run.status = RunStatus::Finalized;
    run.finalized_at = Some(now);
    run.total_gross_pay = totals.gross_pay;
    run.total_net_pay = totals.net_pay;
    run.rate_table = Some(rates.clone());
    Ok(totals)
}

/// The rate table a run's rows must be derived against: the snapshot frozen
/// at finalize, or the table currently in force while the run is a draft.
pub fn rates_in_force<'a>(
    run: &'a PayrollRun,
    current: &'a StatutoryRateTable,
) -> &'a StatutoryRateTable {
    run.rate_table.as_ref().unwrap_or(current)
}

/// Derive the rows for a run's current inputs. Read-only projection — the
/// result is never stored alongside the run.
pub fn compute_rows(
    employee_data: &BTreeMap<Uuid, EmployeeInputs>,
    rates: &StatutoryRateTable,
) -> Vec<RunRow> {
    employee_data
        .iter()
        .map(|(employee_id, inputs)| RunRow {
            employee_id: *employee_id,
            inputs: inputs.clone(),
            computed: compute_row(inputs, rates),
        })
        .collect()
}

fn ensure_draft(run: &PayrollRun) -> AppResult<()> {
    match run.status {
        RunStatus::Draft => Ok(()),
        RunStatus::Finalized => Err(AppError::State(format!(
            "Run for period {} is finalized and can no longer be modified",
            run.period
        ))),
    }
}

/// Human label for a `"YYYY-MM"` period key, e.g. "March 2026".
/// Malformed keys are a validation error.
pub fn period_label(period: &str) -> AppResult<String> {
    let first_of_month = NaiveDate::parse_from_str(&format!("{period}-01"), "%Y-%m-%d")
        .map_err(|_| {
            AppError::Validation(format!("Invalid period '{period}', expected YYYY-MM"))
        })?;
    Ok(first_of_month.format("%B %Y").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn period_labels_are_human_readable() {
        assert_eq!(period_label("2026-03").unwrap(), "March 2026");
        assert!(matches!(
            period_label("March 2026"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(period_label("2026-13"), Err(AppError::Validation(_))));
    }

    #[test]
    fn draft_seeds_inputs_from_active_employees_only() {
        let mut active = sample_employee(dec!(8000));
        active.is_active = true;
        let mut inactive = sample_employee(dec!(5000));
        inactive.is_active = false;

        let run = create_draft("2026-03", &[active.clone(), inactive], Utc::now()).unwrap();
        assert_eq!(run.status, RunStatus::Draft);
        assert_eq!(run.employee_data.len(), 1);
        assert_eq!(run.employee_data[&active.id].base_salary, dec!(8000));
        assert_eq!(run.employee_data[&active.id].bonuses, dec!(0));
        assert!(run.finalized_at.is_none());
    }

    #[test]
    fn finalize_freezes_the_rate_table_in_force() {
        let rates = StatutoryRateTable::default();
        let staff = vec![sample_employee(dec!(6000))];

        let mut run = create_draft("2026-03", &staff, Utc::now()).unwrap();
        assert!(run.rate_table.is_none());
        // a draft derives rows from whatever table is current
        assert_eq!(rates_in_force(&run, &rates).cnss.rate, rates.cnss.rate);

        finalize(&mut run, &rates, Utc::now()).unwrap();
        let frozen = run.rate_table.as_ref().expect("finalize snapshots the rates");
        assert_eq!(frozen.cnss.rate, rates.cnss.rate);
        assert_eq!(frozen.ir_brackets.len(), rates.ir_brackets.len());

        // a later table change no longer reaches this run
        let mut raised = StatutoryRateTable::default();
        raised.cnss.rate = dec!(0.10);
        assert_eq!(
            rates_in_force(&run, &raised).cnss.rate,
            rates.cnss.rate
        );
    }

    fn sample_employee(base_salary: Decimal) -> Employee {
        Employee {
            id: Uuid::new_v4(),
            first_name: "Sample".to_string(),
            last_name: "Employee".to_string(),
            email: "sample@example.com".to_string(),
            national_id: "AB123456".to_string(),
            cnss_number: "1234567".to_string(),
            address: "1 Example St".to_string(),
            birth_date: None,
            hire_date: None,
            base_salary,
            initial_vacation_balance: dec!(0),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}
