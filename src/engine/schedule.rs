// src/engine/schedule.rs

use crate::errors::{AppError, AppResult};
use crate::models::{PayCadence, PayPeriod, PeriodState, PeriodType};
use chrono::{Datelike, Days, Months, NaiveDate};

/// Generate the ordered pay periods for `target_year`, anchored so that
/// `anchor_payday` is itself a payday. Walks forward from the anchor until
/// the computed payday's year exceeds the target year; periods are not
/// clipped at the year boundary.
///
/// Pure function with no memory of prior runs — deduplication against
/// already-persisted periods is the caller's responsibility.
pub fn generate_periods(
    cadence: PayCadence,
    anchor_payday: NaiveDate,
    target_year: i32,
) -> AppResult<Vec<PayPeriod>> {
    if anchor_payday.year() > target_year {
        return Err(AppError::Validation(format!(
            "Anchor payday {} is after the target year {}",
            anchor_payday, target_year
        )));
    }

    // Bound iteration even for anchors far before the target year. The slack
    // covers years where an extra payday fits (e.g. 53 weekly paydays).
    let years = (target_year - anchor_payday.year()) as usize + 1;
    let cap = cadence.periods_per_year() as usize * years + 2;

    let mut periods = Vec::new();
    let mut payday = anchor_payday;
    while payday.year() <= target_year && periods.len() < cap {
        let (period_start, period_end) = period_bounds(cadence, payday)?;
        periods.push(PayPeriod {
            index: periods.len() as u32 + 1,
            period_label: format!(
                "{} - {}",
                period_start.format("%Y-%m-%d"),
                period_end.format("%Y-%m-%d")
            ),
            period_start,
            period_end,
            payday,
            state: PeriodState::Open,
            period_type: PeriodType::Recurring,
        });
        payday = next_payday(cadence, payday, anchor_payday)?;
    }

    Ok(periods)
}

/// Period boundaries for the period whose payday is `payday`.
fn period_bounds(cadence: PayCadence, payday: NaiveDate) -> AppResult<(NaiveDate, NaiveDate)> {
    match cadence {
        PayCadence::Weekly => Ok((back_days(payday, 6)?, payday)),
        PayCadence::Biweekly => Ok((back_days(payday, 13)?, payday)),
        PayCadence::Monthly => Ok((month_start(payday)?, month_end(payday)?)),
        PayCadence::SemiMonthly => {
            if payday.day() < 20 {
                Ok((month_start(payday)?, with_day(payday, 15)?))
            } else {
                Ok((with_day(payday, 16)?, month_end(payday)?))
            }
        }
    }
}

/// The payday following `payday`. Monthly paydays keep the anchor's
/// day-of-month, clamped to the length of each month.
fn next_payday(
    cadence: PayCadence,
    payday: NaiveDate,
    anchor_payday: NaiveDate,
) -> AppResult<NaiveDate> {
    match cadence {
        PayCadence::Weekly => forward_days(payday, 7),
        PayCadence::Biweekly => forward_days(payday, 14),
        PayCadence::Monthly => {
            let next_month = add_months(month_start(payday)?, 1)?;
            let day = anchor_payday.day().min(days_in_month(next_month)?);
            with_day(next_month, day)
        }
        PayCadence::SemiMonthly => {
            if payday.day() < 20 {
                // mid-month payday pairs with the end of the same month
                month_end(payday)
            } else {
                with_day(add_months(month_start(payday)?, 1)?, 15)
            }
        }
    }
}

fn out_of_range() -> AppError {
    AppError::Validation("Date arithmetic out of the supported calendar range".to_string())
}

fn back_days(date: NaiveDate, days: u64) -> AppResult<NaiveDate> {
    date.checked_sub_days(Days::new(days)).ok_or_else(out_of_range)
}

fn forward_days(date: NaiveDate, days: u64) -> AppResult<NaiveDate> {
    date.checked_add_days(Days::new(days)).ok_or_else(out_of_range)
}

fn add_months(date: NaiveDate, months: u32) -> AppResult<NaiveDate> {
    date.checked_add_months(Months::new(months)).ok_or_else(out_of_range)
}

fn with_day(date: NaiveDate, day: u32) -> AppResult<NaiveDate> {
    date.with_day(day).ok_or_else(out_of_range)
}

fn month_start(date: NaiveDate) -> AppResult<NaiveDate> {
    with_day(date, 1)
}

fn month_end(date: NaiveDate) -> AppResult<NaiveDate> {
    let next = add_months(month_start(date)?, 1)?;
    next.pred_opt().ok_or_else(out_of_range)
}

fn days_in_month(date: NaiveDate) -> AppResult<u32> {
    Ok(month_end(date)?.day())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Periods must partition time: contiguous, non-overlapping, ordered.
    fn assert_partition(periods: &[PayPeriod]) {
        for window in periods.windows(2) {
            assert_eq!(
                window[1].period_start,
                window[0].period_end.succ_opt().unwrap(),
                "gap or overlap between {} and {}",
                window[0].period_label,
                window[1].period_label
            );
        }
        for (i, p) in periods.iter().enumerate() {
            assert_eq!(p.index, i as u32 + 1);
            assert!(p.period_start <= p.period_end);
            assert_eq!(p.state, PeriodState::Open);
        }
    }

    #[test]
    fn weekly_produces_52_contiguous_periods() {
        let periods = generate_periods(PayCadence::Weekly, date(2026, 1, 2), 2026).unwrap();
        assert_eq!(periods.len(), 52);
        assert_partition(&periods);
        assert_eq!(periods[0].period_start, date(2025, 12, 27));
        assert_eq!(periods[0].period_end, date(2026, 1, 2));
        assert_eq!(periods[51].payday, date(2026, 12, 25));
    }

    #[test]
    fn biweekly_produces_26_periods() {
        let periods = generate_periods(PayCadence::Biweekly, date(2026, 1, 9), 2026).unwrap();
        assert_eq!(periods.len(), 26);
        assert_partition(&periods);
        assert_eq!(periods[0].period_start, date(2025, 12, 27));
        assert_eq!(periods[25].payday, date(2026, 12, 25));
    }

    #[test]
    fn semi_monthly_produces_24_periods_alternating_halves() {
        let periods = generate_periods(PayCadence::SemiMonthly, date(2026, 1, 15), 2026).unwrap();
        assert_eq!(periods.len(), 24);
        assert_partition(&periods);

        assert_eq!(periods[0].period_start, date(2026, 1, 1));
        assert_eq!(periods[0].period_end, date(2026, 1, 15));
        assert_eq!(periods[0].payday, date(2026, 1, 15));

        assert_eq!(periods[1].period_start, date(2026, 1, 16));
        assert_eq!(periods[1].period_end, date(2026, 1, 31));
        assert_eq!(periods[1].payday, date(2026, 1, 31));

        // February's second half pays on the 28th
        assert_eq!(periods[3].payday, date(2026, 2, 28));
        assert_eq!(periods[23].period_end, date(2026, 12, 31));
    }

    #[test]
    fn monthly_produces_12_periods_with_day_clamped_to_month_length() {
        let periods = generate_periods(PayCadence::Monthly, date(2026, 1, 31), 2026).unwrap();
        assert_eq!(periods.len(), 12);
        assert_partition(&periods);

        assert_eq!(periods[0].period_start, date(2026, 1, 1));
        assert_eq!(periods[0].period_end, date(2026, 1, 31));
        // anchor day 31 clamps to Feb 28 but snaps back to the 31st in March
        assert_eq!(periods[1].payday, date(2026, 2, 28));
        assert_eq!(periods[2].payday, date(2026, 3, 31));
        assert_eq!(periods[11].payday, date(2026, 12, 31));
    }

    #[test]
    fn mid_year_anchor_yields_a_partial_year() {
        let periods = generate_periods(PayCadence::Monthly, date(2026, 6, 15), 2026).unwrap();
        assert_eq!(periods.len(), 7); // June through December
        assert_partition(&periods);
    }

    #[test]
    fn walk_stops_once_the_payday_leaves_the_target_year() {
        // Weekly anchor on Dec 31: the period ends in the target year,
        // the next payday falls in the following year and stops the walk.
        let periods = generate_periods(PayCadence::Weekly, date(2026, 12, 31), 2026).unwrap();
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].period_end, date(2026, 12, 31));
    }

    #[test]
    fn anchor_after_target_year_is_rejected() {
        let err = generate_periods(PayCadence::Weekly, date(2027, 1, 1), 2026).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn generation_is_deterministic() {
        let a = generate_periods(PayCadence::Biweekly, date(2026, 1, 9), 2026).unwrap();
        let b = generate_periods(PayCadence::Biweekly, date(2026, 1, 9), 2026).unwrap();
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.payday, y.payday);
            assert_eq!(x.period_label, y.period_label);
        }
    }
}
