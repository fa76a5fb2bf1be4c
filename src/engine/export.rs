// src/engine/export.rs

use crate::engine::money::round2;
use crate::errors::{AppError, AppResult};
use crate::models::{CompanyProfile, Employee, PayrollRun, RunRow, RunStatus};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;
use uuid::Uuid;

/// Fixed period length declared per employee, in days.
const PERIOD_LENGTH_DAYS: u32 = 30;

/// Render a finalized run as the fixed-schema statutory declaration XML.
///
/// The export is all-or-nothing: every row must resolve to an employee
/// profile and the rows must sum to the totals frozen at finalize (they do
/// whenever they were derived against the run's rate-table snapshot),
/// otherwise the whole render fails. Only finalized runs may be exported.
pub fn render(
    run: &PayrollRun,
    rows: &[RunRow],
    employees: &HashMap<Uuid, Employee>,
    company: &CompanyProfile,
) -> AppResult<String> {
    if run.status != RunStatus::Finalized {
        return Err(AppError::State(format!(
            "Run for period {} is not finalized and cannot be exported",
            run.period
        )));
    }

    let gross_sum: Decimal = rows.iter().map(|r| r.computed.gross_pay).sum();
    let net_sum: Decimal = rows.iter().map(|r| r.computed.net_pay).sum();
    if round2(gross_sum) != run.total_gross_pay || round2(net_sum) != run.total_net_pay {
        return Err(AppError::Internal(format!(
            "Export aborted for {}: rows sum to gross {} / net {} but the finalized totals are {} / {}",
            run.period, gross_sum, net_sum, run.total_gross_pay, run.total_net_pay
        )));
    }

    let fiscal_year = &run.period[..run.period.len().min(4)];

    let mut xml = String::with_capacity(1024 + rows.len() * 512);
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<DeclarationSalaires>\n");

    xml.push_str("  <Identite>\n");
    tag(&mut xml, 4, "RaisonSociale", &escape(&company.name));
    tag(&mut xml, 4, "IdentifiantFiscal", &escape(&company.fiscal_id));
    tag(
        &mut xml,
        4,
        "NumeroAffiliationCnss",
        &escape(&company.cnss_affiliation),
    );
    tag(&mut xml, 4, "ExerciceFiscal", &escape(fiscal_year));
    tag(&mut xml, 4, "Periode", &escape(&run.period));
    tag(&mut xml, 4, "EffectifDeclare", &rows.len().to_string());
    tag(&mut xml, 4, "TotalRemunerationBrute", &amount(run.total_gross_pay));
    tag(&mut xml, 4, "TotalRemunerationNette", &amount(run.total_net_pay));
    xml.push_str("  </Identite>\n");

    xml.push_str("  <Salaries>\n");
    for row in rows {
        let employee = employees.get(&row.employee_id).ok_or_else(|| {
            AppError::NotFound(format!(
                "Employee {} referenced by run {} no longer exists",
                row.employee_id, run.period
            ))
        })?;

        xml.push_str("    <salarie>\n");
        tag(&mut xml, 6, "Nom", &escape(&employee.last_name));
        tag(&mut xml, 6, "Prenom", &escape(&employee.first_name));
        tag(&mut xml, 6, "NumeroCin", &escape(&employee.national_id));
        tag(&mut xml, 6, "NumeroCnss", &escape(&employee.cnss_number));
        tag(&mut xml, 6, "Adresse", &escape(&employee.address));
        tag(&mut xml, 6, "DateNaissance", &date(employee.birth_date));
        tag(&mut xml, 6, "DateEmbauche", &date(employee.hire_date));
        tag(
            &mut xml,
            6,
            "NombreJoursPeriode",
            &PERIOD_LENGTH_DAYS.to_string(),
        );
        tag(&mut xml, 6, "RemunerationBrute", &amount(row.computed.gross_pay));
        tag(&mut xml, 6, "RemunerationNette", &amount(row.computed.net_pay));
        xml.push_str("    </salarie>\n");
    }
    xml.push_str("  </Salaries>\n");

    xml.push_str("</DeclarationSalaires>\n");
    Ok(xml)
}

fn tag(xml: &mut String, indent: usize, name: &str, value: &str) {
    for _ in 0..indent {
        xml.push(' ');
    }
    xml.push('<');
    xml.push_str(name);
    xml.push('>');
    xml.push_str(value);
    xml.push_str("</");
    xml.push_str(name);
    xml.push_str(">\n");
}

fn amount(value: Decimal) -> String {
    format!("{:.2}", round2(value))
}

fn date(value: Option<NaiveDate>) -> String {
    value.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

/// XML entity escaping for free-text and identifier fields.
fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\'' => escaped.push_str("&apos;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_the_five_xml_entities() {
        assert_eq!(
            escape(r#"S&M <Industries> "quoted" d'Or"#),
            "S&amp;M &lt;Industries&gt; &quot;quoted&quot; d&apos;Or"
        );
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn amounts_render_with_two_decimals() {
        use rust_decimal_macros::dec;
        assert_eq!(amount(dec!(6000)), "6000.00");
        assert_eq!(amount(dec!(512.015)), "512.02");
    }
}
