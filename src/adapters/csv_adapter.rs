//! CSV price-history adapter.
//!
//! One file per ticker, `<dir>/<CODE>.csv`, with the header
//! `date,open,high,low,close,volume`. Extra trailing columns are ignored.

use crate::domain::error::StreakError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::warn;

#[derive(Debug)]
pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn csv_path(&self, code: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", code))
    }
}

fn field<T: FromStr>(record: &csv::StringRecord, index: usize, name: &str) -> Result<T, StreakError>
where
    T::Err: std::fmt::Display,
{
    let raw = record.get(index).ok_or_else(|| StreakError::Data {
        reason: format!("missing {} column", name),
    })?;
    raw.trim().parse().map_err(|e| StreakError::Data {
        reason: format!("invalid {} value '{}': {}", name, raw, e),
    })
}

fn parse_bar(record: &csv::StringRecord) -> Result<OhlcvBar, StreakError> {
    let date_str = record.get(0).ok_or_else(|| StreakError::Data {
        reason: "missing date column".into(),
    })?;
    let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|e| {
        StreakError::Data {
            reason: format!("invalid date '{}': {}", date_str, e),
        }
    })?;

    // some exporters write volume as a float
    let volume: f64 = field(record, 5, "volume")?;

    Ok(OhlcvBar {
        date,
        open: field(record, 1, "open")?,
        high: field(record, 2, "high")?,
        low: field(record, 3, "low")?,
        close: field(record, 4, "close")?,
        volume: volume as i64,
    })
}

impl DataPort for CsvAdapter {
    fn fetch_ohlcv(
        &self,
        code: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, StreakError> {
        let path = self.csv_path(code);
        let content = fs::read_to_string(&path).map_err(|e| StreakError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| StreakError::Data {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;
            let bar = parse_bar(&record)?;
            if bar.date < start_date || bar.date > end_date {
                continue;
            }
            bars.push(bar);
        }

        bars.sort_by_key(|b| b.date);
        let before = bars.len();
        bars.dedup_by_key(|b| b.date);
        if bars.len() != before {
            warn!(%code, dropped = before - bars.len(), "duplicate dates removed");
        }
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, StreakError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| StreakError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StreakError::Data {
                reason: format!("directory entry error: {}", e),
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("csv") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                symbols.push(stem.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
