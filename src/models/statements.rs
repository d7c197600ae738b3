// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// One of the three quarterly statements the exporter works with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementType {
    BalanceSheet,
    IncomeStatement,
    CashFlow,
}

impl StatementType {
    /// Fetch and export order.
    pub const ALL: [StatementType; 3] = [
        StatementType::BalanceSheet,
        StatementType::IncomeStatement,
        StatementType::CashFlow,
    ];

    /// Value of the `function` query parameter, also used in cache file names.
    pub fn function(&self) -> &'static str {
        match self {
            StatementType::BalanceSheet => "BALANCE_SHEET",
            StatementType::IncomeStatement => "INCOME_STATEMENT",
            StatementType::CashFlow => "CASH_FLOW",
        }
    }

    pub fn sheet_name(&self) -> &'static str {
        match self {
            StatementType::BalanceSheet => "Balance Sheet",
            StatementType::IncomeStatement => "Income Statement",
            StatementType::CashFlow => "Cash Flow",
        }
    }
}

impl fmt::Display for StatementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sheet_name())
    }
}

/// A single fiscal period as delivered by the API: field identifier -> value.
pub type PeriodRecord = Map<String, Value>;

/// The API response for one statement type and ticker.
///
/// Periods arrive newest-first. `serde_json` is built with `preserve_order`,
/// so each record keeps the provider's field order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawStatementRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(rename = "annualReports", default)]
    pub annual_reports: Vec<PeriodRecord>,
    #[serde(rename = "quarterlyReports", default)]
    pub quarterly_reports: Vec<PeriodRecord>,
}

/// Rows are humanized field labels, columns are fiscal periods oldest-to-newest.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementTable {
    statement: StatementType,
    labels: Vec<String>,
    periods: Vec<NaiveDate>,
    // row-major: values[row][column]
    values: Vec<Vec<f64>>,
}

impl StatementTable {
    pub(crate) fn new(
        statement: StatementType,
        labels: Vec<String>,
        periods: Vec<NaiveDate>,
        values: Vec<Vec<f64>>,
    ) -> Self {
        debug_assert_eq!(labels.len(), values.len());
        debug_assert!(values.iter().all(|row| row.len() == periods.len()));
        Self {
            statement,
            labels,
            periods,
            values,
        }
    }

    pub fn statement(&self) -> StatementType {
        self.statement
    }

    #[cfg(test)]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn periods(&self) -> &[NaiveDate] {
        &self.periods
    }

    pub fn row_count(&self) -> usize {
        self.labels.len()
    }

    pub fn column_count(&self) -> usize {
        self.periods.len()
    }

    pub fn rows(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(Vec::as_slice))
    }

    #[cfg(test)]
    pub fn value(&self, row: usize, column: usize) -> Option<f64> {
        self.values.get(row).and_then(|r| r.get(column)).copied()
    }

    /// Looks a cell up by its humanized label and period date.
    #[cfg(test)]
    pub fn get(&self, label: &str, period: NaiveDate) -> Option<f64> {
        let row = self.labels.iter().position(|l| l == label)?;
        let column = self.periods.iter().position(|p| *p == period)?;
        self.value(row, column)
    }
}
