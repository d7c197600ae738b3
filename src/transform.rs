// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use chrono::NaiveDate;
use serde_json::Value;

use crate::error::ExportError;
use crate::labels::humanize_field;
use crate::models::{PeriodRecord, RawStatementRecord, StatementTable, StatementType};

pub const QUARTERS_PER_YEAR: usize = 4;

/// Period-end date of a record; becomes the column header.
pub const DATE_FIELD: &str = "fiscalDateEnding";
/// Reporting currency of a record; not exported.
pub const CURRENCY_FIELD: &str = "reportedCurrency";

/// Literal the API uses for "no value reported".
const NONE_MARKER: &str = "None";

fn is_data_field(field: &str) -> bool {
    field != DATE_FIELD && field != CURRENCY_FIELD
}

/// Data fields of a statement in provider order, taken from its newest period.
pub fn field_catalog(first: &PeriodRecord) -> Vec<&str> {
    first
        .keys()
        .map(String::as_str)
        .filter(|field| is_data_field(field))
        .collect()
}

/// Reshapes the newest `years` of quarterly reports into a table of
/// labels x periods, oldest period first.
pub fn process_statement(
    statement: StatementType,
    raw: &RawStatementRecord,
    years: usize,
) -> Result<StatementTable, ExportError> {
    if years == 0 {
        return Err(ExportError::Validation(
            "year span must be at least 1".to_string(),
        ));
    }

    let requested = years * QUARTERS_PER_YEAR;
    let available = raw.quarterly_reports.len();
    if available < requested {
        return Err(ExportError::InsufficientData {
            statement,
            requested,
            available,
        });
    }

    let periods = &raw.quarterly_reports[..requested];
    let catalog = field_catalog(&periods[0]);
    let labels: Vec<String> = catalog.iter().map(|field| humanize_field(field)).collect();

    // Built newest-first, the way the API delivers them.
    let mut dates = Vec::with_capacity(requested);
    let mut columns = Vec::with_capacity(requested);
    for period in periods {
        let date = period_date(statement, period)?;
        let period_label = date.to_string();

        if let Some(extra) = period
            .keys()
            .find(|field| is_data_field(field) && !catalog.contains(&field.as_str()))
        {
            return Err(ExportError::SchemaMismatch {
                statement,
                period: period_label,
                field: extra.clone(),
            });
        }

        let column = catalog
            .iter()
            .map(|field| {
                coerce_value(period.get(*field)).ok_or_else(|| ExportError::InvalidValue {
                    statement,
                    period: period_label.clone(),
                    field: field.to_string(),
                    value: period.get(*field).map(Value::to_string).unwrap_or_default(),
                })
            })
            .collect::<Result<Vec<f64>, _>>()?;

        dates.push(date);
        columns.push(column);
    }

    dates.reverse();
    columns.reverse();

    let values = (0..catalog.len())
        .map(|row| columns.iter().map(|column| column[row]).collect())
        .collect();

    Ok(StatementTable::new(statement, labels, dates, values))
}

fn period_date(statement: StatementType, period: &PeriodRecord) -> Result<NaiveDate, ExportError> {
    let raw = period
        .get(DATE_FIELD)
        .and_then(Value::as_str)
        .ok_or_else(|| ExportError::MalformedStatement {
            statement,
            reason: format!("period without a `{}` field", DATE_FIELD),
        })?;

    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| {
        ExportError::MalformedStatement {
            statement,
            reason: format!("invalid {} `{}`: {}", DATE_FIELD, raw, e),
        }
    })
}

/// Absent, null and the `"None"` marker all count as zero.
/// Returns `None` for values that are neither missing nor numeric.
fn coerce_value(value: Option<&Value>) -> Option<f64> {
    match value {
        None | Some(Value::Null) => Some(0.0),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) if s == NONE_MARKER => Some(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        Some(_) => None,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use serde_json::json;

    const QUARTER_ENDS: [(u32, u32); 4] = [(12, 31), (9, 30), (6, 30), (3, 31)];

    /// Quarter-end dates, newest first, starting at 2024-12-31.
    pub(crate) fn quarter_dates(count: usize) -> Vec<NaiveDate> {
        (0..count)
            .map(|i| {
                let year = 2024 - (i / 4) as i32;
                let (month, day) = QUARTER_ENDS[i % 4];
                NaiveDate::from_ymd_opt(year, month, day).unwrap()
            })
            .collect()
    }

    /// A response with `count` quarters. Period `i` (0 = newest) reports
    /// totalAssets = 1000 + i and always leaves goodwill as "None".
    pub(crate) fn sample_response(count: usize) -> Value {
        let reports: Vec<Value> = quarter_dates(count)
            .into_iter()
            .enumerate()
            .map(|(i, date)| {
                json!({
                    "fiscalDateEnding": date.to_string(),
                    "reportedCurrency": "USD",
                    "totalAssets": (1000 + i).to_string(),
                    "totalNonCurrentAssets": "-250",
                    "goodwill": "None",
                    "longTermDebt": 42.5,
                })
            })
            .collect();
        json!({ "symbol": "IBM", "annualReports": [], "quarterlyReports": reports })
    }

    pub(crate) fn sample_record(count: usize) -> RawStatementRecord {
        serde_json::from_value(sample_response(count)).unwrap()
    }

    #[test]
    fn test_process_statement_shape_and_order() {
        let raw = sample_record(12);
        let table = process_statement(StatementType::BalanceSheet, &raw, 2).unwrap();

        assert_eq!(table.column_count(), 8);
        assert_eq!(table.row_count(), 4);
        assert_eq!(
            table.labels(),
            &["Total Assets", "Total Non Current Assets", "Goodwill", "Long Term Debt"]
        );

        let mut expected = quarter_dates(8);
        expected.reverse();
        assert_eq!(table.periods(), expected.as_slice());
        assert!(table.periods().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_reversing_columns_restores_api_order() {
        let raw = sample_record(8);
        let table = process_statement(StatementType::CashFlow, &raw, 2).unwrap();

        let api_order: Vec<String> = raw
            .quarterly_reports
            .iter()
            .map(|p| p[DATE_FIELD].as_str().unwrap().to_string())
            .collect();
        let mut table_order: Vec<String> = table.periods().iter().map(|d| d.to_string()).collect();
        table_order.reverse();
        assert_eq!(table_order, api_order);

        // Newest period reported 1000, oldest 1007.
        assert_relative_eq!(table.value(0, 7).unwrap(), 1000.0);
        assert_relative_eq!(table.value(0, 0).unwrap(), 1007.0);
    }

    #[test]
    fn test_missing_values_become_zero() {
        let mut response = sample_response(4);
        response["quarterlyReports"][1]["longTermDebt"] = Value::Null;
        response["quarterlyReports"][2]
            .as_object_mut()
            .unwrap()
            .remove("totalNonCurrentAssets");
        let raw: RawStatementRecord = serde_json::from_value(response).unwrap();

        let table = process_statement(StatementType::BalanceSheet, &raw, 1).unwrap();
        let dates = quarter_dates(4);

        for (label, values) in table.rows() {
            assert!(values.iter().all(|v| v.is_finite()), "{} has a non-finite value", label);
        }
        assert_relative_eq!(table.get("Goodwill", dates[0]).unwrap(), 0.0);
        assert_relative_eq!(table.get("Long Term Debt", dates[1]).unwrap(), 0.0);
        assert_relative_eq!(table.get("Long Term Debt", dates[0]).unwrap(), 42.5);
        assert_relative_eq!(table.get("Total Non Current Assets", dates[2]).unwrap(), 0.0);
        assert_relative_eq!(table.get("Total Non Current Assets", dates[3]).unwrap(), -250.0);
    }

    #[test]
    fn test_insufficient_history_is_an_error() {
        let raw = sample_record(7);
        let err = process_statement(StatementType::IncomeStatement, &raw, 2).unwrap_err();
        assert!(matches!(
            err,
            ExportError::InsufficientData {
                statement: StatementType::IncomeStatement,
                requested: 8,
                available: 7,
            }
        ));
    }

    #[test]
    fn test_zero_years_is_rejected() {
        let raw = sample_record(4);
        assert!(matches!(
            process_statement(StatementType::BalanceSheet, &raw, 0),
            Err(ExportError::Validation(_))
        ));
    }

    #[test]
    fn test_non_data_fields_excluded_by_name() {
        // Currency first, date last: exclusion must not depend on position.
        let raw: RawStatementRecord = serde_json::from_value(json!({
            "quarterlyReports": [
                { "reportedCurrency": "USD", "totalRevenue": "10", "fiscalDateEnding": "2024-03-31" },
                { "reportedCurrency": "USD", "totalRevenue": "20", "fiscalDateEnding": "2023-12-31" },
                { "reportedCurrency": "USD", "totalRevenue": "30", "fiscalDateEnding": "2023-09-30" },
                { "reportedCurrency": "USD", "totalRevenue": "40", "fiscalDateEnding": "2023-06-30" }
            ]
        }))
        .unwrap();

        let table = process_statement(StatementType::IncomeStatement, &raw, 1).unwrap();
        assert_eq!(table.labels(), &["Total Revenue"]);
        assert_relative_eq!(table.value(0, 0).unwrap(), 40.0);
        assert_relative_eq!(table.value(0, 3).unwrap(), 10.0);
    }

    #[test]
    fn test_unknown_field_in_later_period_is_rejected() {
        let mut response = sample_response(4);
        response["quarterlyReports"][3]["surpriseField"] = json!("1");
        let raw: RawStatementRecord = serde_json::from_value(response).unwrap();

        match process_statement(StatementType::BalanceSheet, &raw, 1) {
            Err(ExportError::SchemaMismatch { field, period, .. }) => {
                assert_eq!(field, "surpriseField");
                assert_eq!(period, "2024-03-31");
            }
            other => panic!("expected SchemaMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_value_is_rejected() {
        let mut response = sample_response(4);
        response["quarterlyReports"][0]["totalAssets"] = json!("n/a");
        let raw: RawStatementRecord = serde_json::from_value(response).unwrap();

        assert!(matches!(
            process_statement(StatementType::BalanceSheet, &raw, 1),
            Err(ExportError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_bad_period_date_is_rejected() {
        let mut response = sample_response(4);
        response["quarterlyReports"][2]["fiscalDateEnding"] = json!("Q2 2024");
        let raw: RawStatementRecord = serde_json::from_value(response).unwrap();

        assert!(matches!(
            process_statement(StatementType::BalanceSheet, &raw, 1),
            Err(ExportError::MalformedStatement { .. })
        ));
    }

    #[test]
    fn test_output_is_deterministic() {
        let raw = sample_record(8);
        let first = process_statement(StatementType::BalanceSheet, &raw, 2).unwrap();
        let second = process_statement(StatementType::BalanceSheet, &raw, 2).unwrap();
        assert_eq!(first, second);
    }
}
