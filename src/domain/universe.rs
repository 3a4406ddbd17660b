//! Ticker universe: parsing the configured code list and loading each
//! code's series through a [`DataPort`].
//!
//! A code whose data cannot be fetched, or comes back empty, is skipped and
//! reported; it takes no part in any aggregate. Short series are kept: the
//! collector and the simulator already degrade to zero output on them.

use crate::domain::series::Series;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::{info, warn};

#[derive(Debug, Clone, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in code list")]
    EmptyToken,

    #[error("duplicate code: {0}")]
    DuplicateCode(String),
}

pub fn parse_codes(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut codes = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let code = trimmed.to_uppercase();
        if !seen.insert(code.clone()) {
            return Err(UniverseError::DuplicateCode(code));
        }
        codes.push(code);
    }

    Ok(codes)
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedCode {
    pub code: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    NoData,
    FetchFailed { reason: String },
}

#[derive(Debug, Clone)]
pub struct LoadedUniverse {
    pub series: Vec<Series>,
    pub skipped: Vec<SkippedCode>,
}

impl LoadedUniverse {
    pub fn requested(&self) -> usize {
        self.series.len() + self.skipped.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

pub fn load_universe(
    data_port: &dyn DataPort,
    codes: &[String],
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> LoadedUniverse {
    let mut series = Vec::with_capacity(codes.len());
    let mut skipped = Vec::new();

    for code in codes {
        let bars = match data_port.fetch_ohlcv(code, start_date, end_date) {
            Ok(bars) => bars,
            Err(e) => {
                warn!(%code, error = %e, "skipping code");
                skipped.push(SkippedCode {
                    code: code.clone(),
                    reason: SkipReason::FetchFailed {
                        reason: e.to_string(),
                    },
                });
                continue;
            }
        };

        if bars.is_empty() {
            warn!(%code, "skipping code: no data in range");
            skipped.push(SkippedCode {
                code: code.clone(),
                reason: SkipReason::NoData,
            });
            continue;
        }

        let s = Series::new(code.clone(), bars);
        if !s.is_chronological() {
            warn!(%code, "series has duplicate dates");
        }
        if let Some((first, last)) = s.date_range() {
            info!(%code, bars = s.len(), %first, %last, "loaded");
        }
        series.push(s);
    }

    if !skipped.is_empty() {
        info!(
            loaded = series.len(),
            requested = series.len() + skipped.len(),
            "universe partially loaded"
        );
    }

    LoadedUniverse { series, skipped }
}
