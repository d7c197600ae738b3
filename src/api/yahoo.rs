// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

//! Yahoo Finance: company profile (quoteSummary) and ticker existence (chart).

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use super::retry::RetryPolicy;
use super::CompanyLookup;
use crate::config::Endpoints;
use crate::error::CompanyInfoError;
use crate::models::CompanyInfo;

const PROFILE_MODULES: &str = "assetProfile,quoteType";

#[derive(Clone)]
pub struct YahooClient {
    client: Client,
    chart_url: String,
    quote_summary_url: String,
    cookie_url: String,
    crumb_url: String,
    retry: RetryPolicy,
}

impl YahooClient {
    pub fn new(client: Client, endpoints: &Endpoints, retry: RetryPolicy) -> Self {
        Self {
            client,
            chart_url: endpoints.yahoo_chart.clone(),
            quote_summary_url: endpoints.yahoo_quote_summary.clone(),
            cookie_url: endpoints.yahoo_cookie.clone(),
            crumb_url: endpoints.yahoo_crumb.clone(),
            retry,
        }
    }

    /// The quoteSummary API wants a crumb tied to a session cookie.
    /// The cookie lands in the client's cookie store; its status code is irrelevant.
    async fn crumb(&self) -> Result<String, CompanyInfoError> {
        self.retry.send(self.client.get(&self.cookie_url)).await?;

        let response = self.retry.send(self.client.get(&self.crumb_url)).await?;
        if !response.status().is_success() {
            return Err(CompanyInfoError::Status {
                status: response.status().as_u16(),
                url: self.crumb_url.clone(),
            });
        }

        let crumb = response.text().await?.trim().to_string();
        if crumb.is_empty() || crumb.contains('{') || crumb.contains('<') {
            return Err(CompanyInfoError::Malformed(format!(
                "received invalid crumb: {}",
                crumb
            )));
        }
        Ok(crumb)
    }
}

#[async_trait]
impl CompanyLookup for YahooClient {
    async fn ticker_exists(&self, symbol: &str) -> Result<bool, CompanyInfoError> {
        let url = format!("{}{}", self.chart_url, symbol);
        let request = self
            .client
            .get(&url)
            .query(&[("range", "1d"), ("interval", "1d")]);
        let response = self.retry.send(request).await?;
        let status = response.status();
        debug!(%url, %status, "chart response");

        if status == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        if !status.is_success() {
            return Err(CompanyInfoError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let envelope: ChartEnvelope = response.json().await?;
        let has_history = envelope
            .chart
            .and_then(|chart| chart.result)
            .and_then(|results| results.into_iter().next())
            .and_then(|result| result.timestamp)
            .is_some_and(|timestamps| !timestamps.is_empty());
        Ok(has_history)
    }

    async fn company_info(&self, symbol: &str) -> Result<CompanyInfo, CompanyInfoError> {
        let crumb = self.crumb().await?;

        let url = format!("{}{}", self.quote_summary_url, symbol);
        let request = self
            .client
            .get(&url)
            .query(&[("modules", PROFILE_MODULES), ("crumb", crumb.as_str())]);
        let response = self.retry.send(request).await?;
        let status = response.status();
        debug!(%url, %status, "quoteSummary response");

        if status == StatusCode::NOT_FOUND {
            return Err(CompanyInfoError::NotFound(symbol.to_string()));
        }
        if !status.is_success() {
            return Err(CompanyInfoError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let envelope: SummaryEnvelope = response
            .json()
            .await
            .map_err(|e| CompanyInfoError::Malformed(e.to_string()))?;
        let summary = envelope
            .quote_summary
            .ok_or_else(|| CompanyInfoError::Malformed("quoteSummary missing".to_string()))?;

        if let Some(error) = summary.error {
            return Err(CompanyInfoError::NotFound(format!(
                "{} ({})",
                symbol, error.description
            )));
        }

        let first = summary
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| CompanyInfoError::NotFound(symbol.to_string()))?;

        let name = first
            .quote_type
            .and_then(|q| q.long_name.or(q.short_name));
        let profile = first.asset_profile.unwrap_or_default();

        Ok(CompanyInfo::from_parts(
            name,
            profile.sector,
            profile.industry,
            profile.website,
        ))
    }
}

/* --------- Minimal serde mapping for the API JSON --------- */

#[derive(Deserialize)]
struct ChartEnvelope {
    chart: Option<ChartNode>,
}

#[derive(Deserialize)]
struct ChartNode {
    result: Option<Vec<ChartResult>>,
}

#[derive(Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
}

#[derive(Deserialize)]
struct SummaryEnvelope {
    #[serde(rename = "quoteSummary")]
    quote_summary: Option<QuoteSummary>,
}

#[derive(Deserialize)]
struct QuoteSummary {
    result: Option<Vec<SummaryResult>>,
    error: Option<SummaryError>,
}

#[derive(Deserialize)]
struct SummaryError {
    description: String,
}

#[derive(Deserialize)]
struct SummaryResult {
    #[serde(rename = "assetProfile")]
    asset_profile: Option<AssetProfile>,
    #[serde(rename = "quoteType")]
    quote_type: Option<QuoteType>,
}

#[derive(Deserialize, Default)]
struct AssetProfile {
    sector: Option<String>,
    industry: Option<String>,
    website: Option<String>,
}

#[derive(Deserialize)]
struct QuoteType {
    #[serde(rename = "longName")]
    long_name: Option<String>,
    #[serde(rename = "shortName")]
    short_name: Option<String>,
}
