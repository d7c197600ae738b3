// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::ExportError;
use crate::models::{RawStatementRecord, StatementType};
use crate::utils::write_atomic;

/// Raw API responses on disk, one file per (ticker, statement type).
#[derive(Debug, Clone)]
pub struct StatementCache {
    dir: PathBuf,
}

impl StatementCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<dir>/<SYMBOL>_<FUNCTION>.json`
    pub fn path_for(&self, symbol: &str, statement: StatementType) -> PathBuf {
        self.dir
            .join(format!("{}_{}.json", symbol, statement.function()))
    }

    /// Cache files that do not exist yet for `symbol`.
    pub fn missing(&self, symbol: &str) -> Vec<PathBuf> {
        StatementType::ALL
            .iter()
            .map(|st| self.path_for(symbol, *st))
            .filter(|path| !path.is_file())
            .collect()
    }

    /// Persists a response as pretty-printed JSON, keeping the provider's field order.
    pub fn store(
        &self,
        symbol: &str,
        statement: StatementType,
        payload: &Value,
    ) -> Result<PathBuf, ExportError> {
        let path = self.path_for(symbol, statement);
        let body = serde_json::to_vec_pretty(payload)?;
        write_atomic(&path, &body)?;
        debug!(path = %path.display(), bytes = body.len(), "cached statement");
        Ok(path)
    }

    pub fn load(
        &self,
        symbol: &str,
        statement: StatementType,
    ) -> Result<RawStatementRecord, ExportError> {
        let path = self.path_for(symbol, statement);
        let text = std::fs::read_to_string(&path).map_err(|e| ExportError::io(&path, e))?;
        serde_json::from_str(&text).map_err(|e| ExportError::MalformedStatement {
            statement,
            reason: format!("cannot parse {}: {}", path.display(), e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::tests::sample_response;

    #[test]
    fn test_path_pattern() {
        let cache = StatementCache::new("data");
        assert_eq!(
            cache.path_for("IBM", StatementType::BalanceSheet),
            PathBuf::from("data/IBM_BALANCE_SHEET.json")
        );
        assert_eq!(
            cache.path_for("AAPL", StatementType::CashFlow),
            PathBuf::from("data/AAPL_CASH_FLOW.json")
        );
    }

    #[test]
    fn test_store_then_load_keeps_field_order() {
        let dir = tempfile::tempdir().unwrap();
        let cache = StatementCache::new(dir.path());
        let payload = sample_response(4);

        cache
            .store("IBM", StatementType::IncomeStatement, &payload)
            .unwrap();
        let raw = cache.load("IBM", StatementType::IncomeStatement).unwrap();

        assert_eq!(raw.quarterly_reports.len(), 4);
        let keys: Vec<&str> = raw.quarterly_reports[0].keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            [
                "fiscalDateEnding",
                "reportedCurrency",
                "totalAssets",
                "totalNonCurrentAssets",
                "goodwill",
                "longTermDebt"
            ]
        );
    }

    #[test]
    fn test_missing_lists_absent_files() {
        let dir = tempfile::tempdir().unwrap();
        let cache = StatementCache::new(dir.path());
        assert_eq!(cache.missing("IBM").len(), 3);

        cache
            .store("IBM", StatementType::BalanceSheet, &sample_response(4))
            .unwrap();
        let missing = cache.missing("IBM");
        assert_eq!(
            missing,
            vec![
                cache.path_for("IBM", StatementType::IncomeStatement),
                cache.path_for("IBM", StatementType::CashFlow),
            ]
        );
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let cache = StatementCache::new(dir.path());
        std::fs::write(cache.path_for("IBM", StatementType::CashFlow), "not json").unwrap();

        assert!(matches!(
            cache.load("IBM", StatementType::CashFlow),
            Err(ExportError::MalformedStatement { .. })
        ));
    }
}
