// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::retry::{redact, RetryPolicy};
use super::StatementSource;
use crate::error::ExportError;
use crate::models::StatementType;

/// Top-level fields the API uses for throttling notices instead of an HTTP status.
const RATE_LIMIT_FIELDS: [&str; 2] = ["Information", "Note"];
const ERROR_FIELD: &str = "Error Message";
const QUARTERLY_FIELD: &str = "quarterlyReports";

/// Client for the fundamentals endpoints (`BALANCE_SHEET`, `INCOME_STATEMENT`, `CASH_FLOW`).
#[derive(Clone)]
pub struct AlphaVantageClient {
    client: Client,
    base_url: String,
    api_key: String,
    retry: RetryPolicy,
}

impl AlphaVantageClient {
    pub fn new(client: Client, base_url: String, api_key: String, retry: RetryPolicy) -> Self {
        Self {
            client,
            base_url,
            api_key,
            retry,
        }
    }
}

#[async_trait]
impl StatementSource for AlphaVantageClient {
    async fn fetch_statement(
        &self,
        statement: StatementType,
        symbol: &str,
    ) -> Result<Value, ExportError> {
        if symbol.is_empty() {
            return Err(ExportError::Validation("ticker empty".to_string()));
        }

        let request = self.client.get(&self.base_url).query(&[
            ("function", statement.function()),
            ("symbol", symbol),
            ("apikey", self.api_key.as_str()),
        ]);

        // reqwest errors print their URL, which carries the key.
        let response = self
            .retry
            .send(request)
            .await
            .map_err(reqwest::Error::without_url)?;
        let status = response.status();
        let url = redact(response.url());
        debug!(%url, %status, "statement response");

        if !status.is_success() {
            return Err(ExportError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let payload = response
            .json::<Value>()
            .await
            .map_err(reqwest::Error::without_url)?;
        Ok(payload)
    }
}

/// Sorts a decoded payload into usable data, throttling or a provider error.
///
/// A throttling notice wins over everything else in the body.
pub fn check_payload(payload: &Value) -> Result<(), ExportError> {
    let Some(object) = payload.as_object() else {
        return Err(ExportError::Api(format!(
            "expected a JSON object, got: {}",
            payload
        )));
    };

    if let Some(message) = RATE_LIMIT_FIELDS.iter().find_map(|f| object.get(*f)) {
        return Err(ExportError::RateLimited(message_text(message)));
    }
    if let Some(message) = object.get(ERROR_FIELD) {
        return Err(ExportError::Api(message_text(message)));
    }
    if !object.get(QUARTERLY_FIELD).is_some_and(Value::is_array) {
        return Err(ExportError::Api(format!(
            "response has no `{}` array",
            QUARTERLY_FIELD
        )));
    }
    Ok(())
}

fn message_text(value: &Value) -> String {
    value
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| value.to_string())
}
