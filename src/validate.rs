// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::api::CompanyLookup;
use crate::error::ExportError;

pub const MIN_YEARS: u8 = 1;
pub const MAX_YEARS: u8 = 15;
pub const DEFAULT_YEARS: u8 = 5;

static TICKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z0-9]{1,5}$").expect("ticker pattern is valid"));

/// Normalizes (trim, uppercase) and checks the ticker format. Used as a clap value parser.
pub fn parse_ticker(input: &str) -> Result<String, String> {
    let symbol = input.trim().to_uppercase();
    if TICKER.is_match(&symbol) {
        Ok(symbol)
    } else {
        Err(format!(
            "Invalid ticker: '{}'. Must be 1-5 letters/numbers.",
            symbol
        ))
    }
}

pub fn check_years(years: u8) -> Result<u8, ExportError> {
    if (MIN_YEARS..=MAX_YEARS).contains(&years) {
        Ok(years)
    } else {
        Err(ExportError::Validation(format!(
            "year span must be between {} and {}, got {}",
            MIN_YEARS, MAX_YEARS, years
        )))
    }
}

/// Rejects symbols without recent price history. When the lookup itself
/// fails the check is skipped, so an unreachable provider does not block exports.
pub async fn verify_ticker_exists(lookup: &dyn CompanyLookup, symbol: &str) -> Result<(), ExportError> {
    match lookup.ticker_exists(symbol).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(ExportError::Validation(format!(
            "Ticker '{}' not found in Yahoo Finance.",
            symbol
        ))),
        Err(e) => {
            warn!(symbol, error = %e, "ticker lookup unavailable, skipping existence check");
            Ok(())
        }
    }
}
