// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

pub mod alpha_vantage;
pub mod retry;
pub mod yahoo;

pub use alpha_vantage::AlphaVantageClient;
pub use retry::RetryPolicy;
pub use yahoo::YahooClient;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::config::HttpSettings;
use crate::error::{CompanyInfoError, ExportError};
use crate::models::{CompanyInfo, StatementType};

/// Desktop UA; Yahoo rejects the default reqwest one.
pub const USER_AGENT: &str = concat!(
    "Mozilla/5.0 (X11; Linux x86_64) ",
    "AppleWebKit/537.36 (KHTML, like Gecko) ",
    "Chrome/122.0.0.0 Safari/537.36"
);

/// Where raw statement payloads come from.
#[async_trait]
pub trait StatementSource: Send + Sync {
    /// Returns the decoded response body as delivered by the provider,
    /// including in-band error or throttling messages.
    async fn fetch_statement(
        &self,
        statement: StatementType,
        symbol: &str,
    ) -> Result<Value, ExportError>;
}

/// Company metadata and ticker existence.
#[async_trait]
pub trait CompanyLookup: Send + Sync {
    /// `Ok(false)` when the symbol has no recent price history.
    async fn ticker_exists(&self, symbol: &str) -> Result<bool, CompanyInfoError>;

    async fn company_info(&self, symbol: &str) -> Result<CompanyInfo, CompanyInfoError>;
}

/// Shared HTTP client for all collaborators.
pub fn build_http_client(settings: &HttpSettings) -> Result<Client, ExportError> {
    let client = Client::builder()
        .timeout(settings.timeout())
        .user_agent(USER_AGENT)
        .cookie_store(true)
        .build()?;
    Ok(client)
}
