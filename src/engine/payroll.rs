// src/engine/payroll.rs

use crate::engine::money::round2;
use crate::errors::{AppError, AppResult};
use crate::models::{
    ComputedRow, ContributionRate, EmployeeInputs, RunRow, RunTotals, StatutoryRateTable,
    TaxBracket,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Compute the statutory deductions, progressive income tax and net pay for
/// one employee-period. Pure function of the inputs and the rate table.
///
/// `other_deductions` is neither taxed nor capped and may drive the net pay
/// negative — a valid intermediate state while a draft is being edited; the
/// lifecycle rejects it at finalize time.
pub fn compute_row(inputs: &EmployeeInputs, rates: &StatutoryRateTable) -> ComputedRow {
    let gross_pay = round2(inputs.base_salary + inputs.bonuses);

    let cnss = contribution(gross_pay, &rates.cnss);
    let amo = contribution(gross_pay, &rates.amo);

    let taxable_income = (gross_pay - cnss - amo).max(Decimal::ZERO);
    let ir = income_tax(taxable_income, &rates.ir_brackets);

    let net_pay = round2(gross_pay - cnss - amo - ir - inputs.other_deductions);

    ComputedRow {
        gross_pay,
        cnss,
        amo,
        ir,
        net_pay,
    }
}

fn contribution(gross_pay: Decimal, rate: &ContributionRate) -> Decimal {
    let base = match rate.monthly_ceiling {
        Some(ceiling) => gross_pay.min(ceiling),
        None => gross_pay,
    };
    round2(base * rate.rate)
}

/// Progressive tax in closed form: `rate * income - deduction` for the first
/// bracket containing the taxable income. Matches cumulative marginal-bracket
/// taxation to the cent when the deductions are continuity-consistent.
fn income_tax(taxable_income: Decimal, brackets: &[TaxBracket]) -> Decimal {
    brackets
        .iter()
        .find(|b| taxable_income >= b.min && b.max.is_none_or(|max| taxable_income <= max))
        .map(|b| round2((taxable_income * b.rate - b.deduction).max(Decimal::ZERO)))
        .unwrap_or(Decimal::ZERO)
}

/// Element-wise sum across all rows. Totals are always derived this way,
/// never accumulated separately, so stored and displayed figures cannot
/// drift apart.
pub fn aggregate(rows: &[RunRow]) -> RunTotals {
    let mut totals = RunTotals {
        gross_pay: dec!(0),
        cnss: dec!(0),
        amo: dec!(0),
        ir: dec!(0),
        other_deductions: dec!(0),
        net_pay: dec!(0),
    };
    for row in rows {
        totals.gross_pay += row.computed.gross_pay;
        totals.cnss += row.computed.cnss;
        totals.amo += row.computed.amo;
        totals.ir += row.computed.ir;
        totals.other_deductions += row.inputs.other_deductions;
        totals.net_pay += row.computed.net_pay;
    }
    totals
}

/// Validate a replacement rate table: fractional rates, ordered brackets
/// covering `[0, ∞)` with no gaps or overlaps, only the last one unbounded.
pub fn validate_rate_table(
    cnss: &ContributionRate,
    amo: &ContributionRate,
    brackets: &[TaxBracket],
) -> AppResult<()> {
    for (name, rate) in [("cnss", cnss), ("amo", amo)] {
        if rate.rate < dec!(0) || rate.rate > dec!(1) {
            return Err(AppError::Validation(format!(
                "{name} rate must be a fraction between 0 and 1"
            )));
        }
        if rate.monthly_ceiling.is_some_and(|c| c <= dec!(0)) {
            return Err(AppError::Validation(format!(
                "{name} monthly ceiling must be positive"
            )));
        }
    }

    if brackets.is_empty() {
        return Err(AppError::Validation(
            "At least one tax bracket is required".to_string(),
        ));
    }
    if brackets[0].min != dec!(0) {
        return Err(AppError::Validation(
            "The first tax bracket must start at 0".to_string(),
        ));
    }
    for (i, bracket) in brackets.iter().enumerate() {
        if bracket.rate < dec!(0) || bracket.rate > dec!(1) {
            return Err(AppError::Validation(format!(
                "Bracket {i}: rate must be a fraction between 0 and 1"
            )));
        }
        let last = i == brackets.len() - 1;
        match bracket.max {
            None if !last => {
                return Err(AppError::Validation(format!(
                    "Bracket {i}: only the last bracket may be unbounded"
                )));
            }
            Some(max) if max < bracket.min => {
                return Err(AppError::Validation(format!(
                    "Bracket {i}: max is below min"
                )));
            }
            Some(max) if last => {
                return Err(AppError::Validation(format!(
                    "The last tax bracket must be unbounded, got max {max}"
                )));
            }
            _ => {}
        }
        if i > 0 {
            let prev_max = brackets[i - 1].max.unwrap_or(Decimal::ZERO);
            let gap = bracket.min - prev_max;
            if gap <= dec!(0) || gap > dec!(0.01) {
                return Err(AppError::Validation(format!(
                    "Bracket {i}: must start one cent above the previous bracket's max"
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn inputs(base: Decimal, bonuses: Decimal, deductions: Decimal) -> EmployeeInputs {
        EmployeeInputs {
            base_salary: base,
            bonuses,
            other_deductions: deductions,
        }
    }

    #[test]
    fn worked_example_6000_gross() {
        let rates = StatutoryRateTable::default();
        let row = compute_row(&inputs(dec!(6000), dec!(0), dec!(0)), &rates);

        assert_eq!(row.gross_pay, dec!(6000));
        assert_eq!(row.cnss, dec!(268.80));
        assert_eq!(row.amo, dec!(135.60));
        // taxable 5595.60 lands in the 30% bracket (deduction 1166.67)
        assert_eq!(row.ir, dec!(512.01));
        assert_eq!(row.net_pay, dec!(5083.59));
    }

    #[test]
    fn cnss_base_is_capped_at_the_ceiling() {
        let rates = StatutoryRateTable::default();
        let row = compute_row(&inputs(dec!(20000), dec!(0), dec!(0)), &rates);

        // 6000 * 4.48%, regardless of how far gross exceeds the ceiling
        assert_eq!(row.cnss, dec!(268.80));
        // AMO is uncapped in the default table
        assert_eq!(row.amo, dec!(452.00));
    }

    #[test]
    fn income_below_the_first_threshold_pays_no_tax() {
        let rates = StatutoryRateTable::default();
        let row = compute_row(&inputs(dec!(2000), dec!(0), dec!(0)), &rates);
        assert_eq!(row.ir, dec!(0));
        assert!(row.net_pay > dec!(0));
    }

    #[test]
    fn bonuses_are_part_of_gross() {
        let rates = StatutoryRateTable::default();
        let with_bonus = compute_row(&inputs(dec!(5000), dec!(1000), dec!(0)), &rates);
        let flat = compute_row(&inputs(dec!(6000), dec!(0), dec!(0)), &rates);
        assert_eq!(with_bonus, flat);
    }

    #[test]
    fn other_deductions_are_untaxed_and_may_drive_net_negative() {
        let rates = StatutoryRateTable::default();
        let row = compute_row(&inputs(dec!(3000), dec!(0), dec!(5000)), &rates);
        assert!(row.net_pay < dec!(0));
        // IR is unchanged by the manual deduction
        let without = compute_row(&inputs(dec!(3000), dec!(0), dec!(0)), &rates);
        assert_eq!(row.ir, without.ir);
    }

    /// Adjacent brackets must agree at their shared boundary: the closed-form
    /// tax is continuous, it never jumps at a threshold.
    #[test]
    fn default_brackets_are_continuous_at_boundaries() {
        let rates = StatutoryRateTable::default();
        for pair in rates.ir_brackets.windows(2) {
            let boundary = pair[0].max.expect("only the last bracket is unbounded");
            let below = round2(boundary * pair[0].rate - pair[0].deduction);
            let above = round2(boundary * pair[1].rate - pair[1].deduction);
            assert!(
                (below - above).abs() <= dec!(0.01),
                "tax jumps at {boundary}: {below} vs {above}"
            );
        }
    }

    #[test]
    fn totals_equal_the_sum_of_rows() {
        let rates = StatutoryRateTable::default();
        let cases = [
            inputs(dec!(6000), dec!(0), dec!(0)),
            inputs(dec!(12500), dec!(1500), dec!(300)),
            inputs(dec!(2400), dec!(0), dec!(50)),
        ];
        let rows: Vec<RunRow> = cases
            .iter()
            .map(|i| RunRow {
                employee_id: Uuid::new_v4(),
                inputs: i.clone(),
                computed: compute_row(i, &rates),
            })
            .collect();

        let totals = aggregate(&rows);
        assert_eq!(
            totals.net_pay,
            rows.iter().map(|r| r.computed.net_pay).sum::<Decimal>()
        );
        assert_eq!(
            totals.gross_pay,
            rows.iter().map(|r| r.computed.gross_pay).sum::<Decimal>()
        );
        assert_eq!(aggregate(&[]).net_pay, dec!(0));
    }

    #[test]
    fn default_table_passes_validation() {
        let rates = StatutoryRateTable::default();
        validate_rate_table(&rates.cnss, &rates.amo, &rates.ir_brackets).unwrap();
    }

    #[test]
    fn gapped_brackets_are_rejected() {
        let rates = StatutoryRateTable::default();
        let mut brackets = rates.ir_brackets.clone();
        brackets[1].min = dec!(3000); // leaves (2500, 3000) uncovered
        let err = validate_rate_table(&rates.cnss, &rates.amo, &brackets).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn bounded_last_bracket_is_rejected() {
        let rates = StatutoryRateTable::default();
        let mut brackets = rates.ir_brackets.clone();
        let last = brackets.len() - 1;
        brackets[last].max = Some(dec!(99999));
        let err = validate_rate_table(&rates.cnss, &rates.amo, &brackets).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
