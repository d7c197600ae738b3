// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use std::path::PathBuf;
use thiserror::Error;

use crate::models::StatementType;

/// Everything that can stop an export run.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Missing or placeholder API key, unreadable configuration file.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Bad ticker, unknown ticker or out-of-range year span.
    #[error("invalid input: {0}")]
    Validation(String),

    /// The API answered with its in-band throttling message.
    #[error("API limit reached: {0}")]
    RateLimited(String),

    /// Cache-only mode was requested but some cached statements are absent.
    #[error("cache-only mode requested but cached statements are missing: {}", .missing.join(", "))]
    MissingCache { missing: Vec<String> },

    #[error("{statement}: {requested} quarterly periods requested but only {available} available")]
    InsufficientData {
        statement: StatementType,
        requested: usize,
        available: usize,
    },

    #[error("{statement}: period {period} reports field `{field}` which is not in the field catalog")]
    SchemaMismatch {
        statement: StatementType,
        period: String,
        field: String,
    },

    #[error("{statement}: field `{field}` of period {period} is not numeric: {value}")]
    InvalidValue {
        statement: StatementType,
        period: String,
        field: String,
        value: String,
    },

    #[error("{statement}: {reason}")]
    MalformedStatement {
        statement: StatementType,
        reason: String,
    },

    /// The API reported an error in the response body (e.g. unknown symbol).
    #[error("API error: {0}")]
    Api(String),

    #[error("unexpected response status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("workbook error: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),
}

impl ExportError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ExportError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failure of the company metadata provider. Never fails an export on its own.
#[derive(Debug, Error)]
pub enum CompanyInfoError {
    #[error("no company data found for {0}")]
    NotFound(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("malformed company data: {0}")]
    Malformed(String),
}
