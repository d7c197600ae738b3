// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use reqwest::{RequestBuilder, Response, StatusCode};
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

use crate::config::HttpSettings;

const MAX_BACKOFF: Duration = Duration::from_secs(10);

/// Bounded retry with exponential backoff for transient transport failures.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn from_settings(settings: &HttpSettings) -> Self {
        Self {
            max_retries: settings.max_retries,
            base_delay: Duration::from_millis(settings.retry_backoff_ms),
        }
    }

    /// Delay before retry number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(MAX_BACKOFF)
    }

    fn is_retryable_status(status: StatusCode) -> bool {
        status == StatusCode::REQUEST_TIMEOUT
            || status == StatusCode::TOO_MANY_REQUESTS
            || status.is_server_error()
    }

    /// Sends `request`, retrying connect errors, timeouts and 408/429/5xx answers.
    /// The last response or error is returned once retries run out.
    pub async fn send(&self, request: RequestBuilder) -> Result<Response, reqwest::Error> {
        let mut attempt = 0;
        loop {
            let Some(this_try) = request.try_clone() else {
                return request.send().await;
            };

            match this_try.send().await {
                Ok(resp) if Self::is_retryable_status(resp.status()) && attempt < self.max_retries => {
                    warn!(status = %resp.status(), url = %redact(resp.url()), attempt, "retrying request");
                }
                Ok(resp) => return Ok(resp),
                Err(e) if (e.is_timeout() || e.is_connect()) && attempt < self.max_retries => {
                    warn!(error = %e.without_url(), attempt, "retrying request");
                }
                Err(e) => return Err(e),
            }

            attempt += 1;
            sleep(self.delay_for(attempt)).await;
        }
    }
}

/// URL with any `apikey` query value masked, safe for logs.
pub fn redact(url: &reqwest::Url) -> String {
    let mut masked = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k.eq_ignore_ascii_case("apikey") {
                "***".to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), v)
        })
        .collect();
    if pairs.is_empty() {
        return masked.to_string();
    }
    masked.query_pairs_mut().clear().extend_pairs(pairs);
    masked.to_string()
}
