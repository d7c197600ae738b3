// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::{info, warn};

use crate::api::alpha_vantage::check_payload;
use crate::api::StatementSource;
use crate::cache::StatementCache;
use crate::error::ExportError;
use crate::models::StatementType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Always request fresh statements and overwrite the cache.
    Network,
    /// Only use statements cached by an earlier run.
    CacheOnly,
}

#[derive(Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Every statement was requested and written to these files.
    Fetched(Vec<PathBuf>),
    /// All statements were already cached; nothing was requested.
    Cached,
}

pub struct StatementFetcher<'a> {
    source: &'a dyn StatementSource,
    cache: &'a StatementCache,
}

impl<'a> StatementFetcher<'a> {
    pub fn new(source: &'a dyn StatementSource, cache: &'a StatementCache) -> Self {
        Self { source, cache }
    }

    /// Makes sure all three statements for `symbol` are in the cache.
    ///
    /// On a throttling answer the remaining statements are not requested;
    /// files written before it stay in place.
    pub async fn fetch_all(&self, symbol: &str, mode: FetchMode) -> Result<FetchOutcome, ExportError> {
        if mode == FetchMode::CacheOnly {
            let missing = self.cache.missing(symbol);
            if !missing.is_empty() {
                return Err(ExportError::MissingCache {
                    missing: missing.iter().map(|p| p.display().to_string()).collect(),
                });
            }
            info!(symbol, dir = %self.cache.dir().display(), "using cached statements");
            return Ok(FetchOutcome::Cached);
        }

        let progress = ProgressBar::new(StatementType::ALL.len() as u64);
        if let Ok(style) =
            ProgressStyle::default_bar().template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
        {
            progress.set_style(style.progress_chars("=>-"));
        }

        let mut written = Vec::with_capacity(StatementType::ALL.len());
        for statement in StatementType::ALL {
            progress.set_message(statement.function());
            let payload = self.source.fetch_statement(statement, symbol).await?;

            if let Err(e) = check_payload(&payload) {
                progress.abandon();
                if let ExportError::RateLimited(ref message) = e {
                    warn!(symbol, statement = %statement, %message, "rate limited, stopping fetch");
                }
                return Err(e);
            }

            let path = self.cache.store(symbol, statement, &payload)?;
            progress.suspend(|| println!("✅ Saved: {}", path.display()));
            written.push(path);
            progress.inc(1);
        }
        progress.finish_and_clear();

        info!(symbol, files = written.len(), "statements fetched");
        Ok(FetchOutcome::Fetched(written))
    }
}
