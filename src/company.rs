// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use tracing::warn;

use crate::api::CompanyLookup;
use crate::models::CompanyInfo;

/// Company metadata for the cover sheet. Any provider failure is logged and
/// replaced by [`CompanyInfo::placeholder`]; this never fails an export.
pub async fn resolve_company_info(lookup: &dyn CompanyLookup, symbol: &str) -> CompanyInfo {
    match lookup.company_info(symbol).await {
        Ok(info) => info,
        Err(e) => {
            warn!(symbol, error = %e, "unable to fetch company data, using placeholders");
            CompanyInfo::placeholder()
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::CompanyInfoError;
    use async_trait::async_trait;

    /// Lookup with a fixed answer for both questions.
    pub(crate) struct StubLookup {
        pub(crate) exists: Result<bool, ()>,
        pub(crate) info: Option<CompanyInfo>,
    }

    impl StubLookup {
        pub(crate) fn known() -> Self {
            Self {
                exists: Ok(true),
                info: Some(CompanyInfo::from_parts(
                    Some("International Business Machines Corporation".to_string()),
                    Some("Technology".to_string()),
                    Some("Information Technology Services".to_string()),
                    Some("https://www.ibm.com".to_string()),
                )),
            }
        }

        pub(crate) fn unreachable() -> Self {
            Self {
                exists: Err(()),
                info: None,
            }
        }
    }

    #[async_trait]
    impl CompanyLookup for StubLookup {
        async fn ticker_exists(&self, _symbol: &str) -> Result<bool, CompanyInfoError> {
            self.exists
                .map_err(|_| CompanyInfoError::Malformed("lookup unreachable".to_string()))
        }

        async fn company_info(&self, symbol: &str) -> Result<CompanyInfo, CompanyInfoError> {
            self.info
                .clone()
                .ok_or_else(|| CompanyInfoError::NotFound(symbol.to_string()))
        }
    }

    #[tokio::test]
    async fn test_resolved_info_is_passed_through() {
        let info = resolve_company_info(&StubLookup::known(), "IBM").await;
        assert_eq!(info.sector, "Technology");
    }

    #[tokio::test]
    async fn test_failure_yields_exact_placeholder() {
        let info = resolve_company_info(&StubLookup::unreachable(), "IBM").await;
        assert_eq!(info, CompanyInfo::placeholder());
        assert_eq!(info.name, "Unknown Company Name");
        assert_eq!(info.sector, "Unknown Sector");
        assert_eq!(info.industry, "Unknown Industry");
        assert_eq!(info.website, "N/A");
    }

    #[tokio::test]
    async fn test_unreachable_http_source_yields_placeholder() {
        use crate::api::{RetryPolicy, YahooClient};
        use crate::config::Endpoints;
        use std::time::Duration;

        // Nothing listens on port 9 of localhost.
        let endpoints = Endpoints {
            alpha_vantage: "http://127.0.0.1:9/query".to_string(),
            yahoo_chart: "http://127.0.0.1:9/chart/".to_string(),
            yahoo_quote_summary: "http://127.0.0.1:9/quoteSummary/".to_string(),
            yahoo_cookie: "http://127.0.0.1:9/consent".to_string(),
            yahoo_crumb: "http://127.0.0.1:9/getcrumb".to_string(),
        };
        let client = YahooClient::new(
            reqwest::Client::new(),
            &endpoints,
            RetryPolicy {
                max_retries: 0,
                base_delay: Duration::from_millis(1),
            },
        );

        let info = resolve_company_info(&client, "IBM").await;
        assert_eq!(info, CompanyInfo::placeholder());
    }
}
