// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use chrono::{Local, NaiveDateTime};
use std::path::PathBuf;
use tracing::info;

use crate::api::{CompanyLookup, StatementSource};
use crate::cache::StatementCache;
use crate::company::resolve_company_info;
use crate::config::Config;
use crate::error::ExportError;
use crate::fetcher::{FetchMode, FetchOutcome, StatementFetcher};
use crate::models::{StatementTable, StatementType};
use crate::transform::process_statement;
use crate::validate::check_years;
use crate::workbook::{plan_workbook, write_workbook, WorkbookPlan};

/// One export run for one ticker.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub symbol: String,
    pub years: u8,
    pub mode: FetchMode,
}

#[derive(Debug)]
pub struct ExportSummary {
    pub workbook: PathBuf,
    pub fetched: bool,
    /// What was written, sheet by sheet.
    pub plan: WorkbookPlan,
}

/// Fetch (or reuse) the statements, reshape them and write the workbook.
///
/// Nothing is written to the output directory unless every statement
/// could be transformed.
pub async fn run_export(
    config: &Config,
    request: &ExportRequest,
    source: &dyn StatementSource,
    lookup: &dyn CompanyLookup,
) -> Result<ExportSummary, ExportError> {
    run_export_at(config, request, source, lookup, Local::now().naive_local()).await
}

pub(crate) async fn run_export_at(
    config: &Config,
    request: &ExportRequest,
    source: &dyn StatementSource,
    lookup: &dyn CompanyLookup,
    retrieved: NaiveDateTime,
) -> Result<ExportSummary, ExportError> {
    let years = usize::from(check_years(request.years)?);
    if request.mode == FetchMode::Network {
        config.require_api_key()?;
    }

    let cache = StatementCache::new(&config.data_dir);
    let outcome = StatementFetcher::new(source, &cache)
        .fetch_all(&request.symbol, request.mode)
        .await?;

    let tables = StatementType::ALL
        .iter()
        .map(|statement| {
            let raw = cache.load(&request.symbol, *statement)?;
            process_statement(*statement, &raw, years)
        })
        .collect::<Result<Vec<StatementTable>, _>>()?;

    let company = resolve_company_info(lookup, &request.symbol).await;
    let plan = plan_workbook(&company, retrieved, &tables);

    let path = config.workbook_path(&request.symbol);
    write_workbook(&plan, &path)?;
    info!(symbol = %request.symbol, years, path = %path.display(), "workbook written");

    Ok(ExportSummary {
        workbook: path,
        fetched: matches!(outcome, FetchOutcome::Fetched(_)),
        plan,
    })
}
