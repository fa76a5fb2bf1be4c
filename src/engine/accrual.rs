// src/engine/accrual.rs

use crate::models::{LeaveAccrualState, TimeOffRequest, TimeOffStatus};
use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;

/// Compute an employee's leave ledger as of `today`.
///
/// Accrual: `monthly_rate` days for each whole month of employment, credited
/// on the hire-date anniversary of each month after the hire month.
///
/// Expiration: accruals credited more than two years before `today` expire
/// FIFO — the oldest accrual is matched against used days first, and only
/// the part no usage absorbed is lost. A single running used-days pool
/// implements this without per-request matching.
///
/// The balance is floored at zero; it is never negative.
pub fn leave_balance(
    hire_date: Option<NaiveDate>,
    initial_vacation_balance: Decimal,
    requests: &[TimeOffRequest],
    today: NaiveDate,
    monthly_rate: Decimal,
) -> LeaveAccrualState {
    let Some(hire_date) = hire_date else {
        return LeaveAccrualState::zero();
    };

    let mut accrual_dates = Vec::new();
    let mut months = 1u32;
    while let Some(credited) = hire_date.checked_add_months(Months::new(months)) {
        if credited > today {
            break;
        }
        accrual_dates.push(credited);
        months += 1;
    }
    let accrued = monthly_rate * Decimal::from(accrual_dates.len() as u64);

    let used: Decimal = requests
        .iter()
        .filter(|r| r.status == TimeOffStatus::Approved)
        .map(|r| r.total_days)
        .sum();

    let expiration_cutoff = today.checked_sub_months(Months::new(24));
    let mut used_pool = used;
    let mut expired = Decimal::ZERO;
    for credited in &accrual_dates {
        match expiration_cutoff {
            Some(cutoff) if *credited < cutoff => {
                let consumed = used_pool.min(monthly_rate);
                used_pool -= consumed;
                expired += monthly_rate - consumed;
            }
            _ => break, // accrual dates are ascending
        }
    }

    let balance = (initial_vacation_balance + accrued - used - expired).max(Decimal::ZERO);

    LeaveAccrualState {
        accrued,
        used,
        expired,
        balance,
    }
}
