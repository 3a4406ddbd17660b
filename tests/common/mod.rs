#![allow(dead_code)]

use candlestreak::domain::analysis::AnalysisConfig;
use candlestreak::domain::backtest::{BacktestConfig, Variant};
use candlestreak::domain::error::StreakError;
pub use candlestreak::domain::ohlcv::OhlcvBar;
use candlestreak::domain::series::Series;
use candlestreak::domain::streak::TrailingStreak;
use candlestreak::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, code: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(code.to_string(), bars);
        self
    }

    pub fn with_error(mut self, code: &str, reason: &str) -> Self {
        self.errors.insert(code.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_ohlcv(
        &self,
        code: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, StreakError> {
        if let Some(reason) = self.errors.get(code) {
            return Err(StreakError::Data {
                reason: reason.clone(),
            });
        }
        match self.data.get(code) {
            Some(bars) => Ok(bars
                .iter()
                .filter(|b| b.date >= start_date && b.date <= end_date)
                .cloned()
                .collect()),
            None => Err(StreakError::Data {
                reason: format!("no such ticker {code}"),
            }),
        }
    }

    fn list_symbols(&self) -> Result<Vec<String>, StreakError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Consecutive daily bars from (open, close) pairs starting 2024-01-01.
pub fn candles(pairs: &[(f64, f64)]) -> Vec<OhlcvBar> {
    let start = date(2024, 1, 1);
    pairs
        .iter()
        .enumerate()
        .map(|(i, &(open, close))| OhlcvBar {
            date: start + chrono::Duration::days(i as i64),
            open,
            high: open.max(close) + 0.5,
            low: open.min(close) - 0.5,
            close,
            volume: 1000,
        })
        .collect()
}

/// 'g' green, 'r' red, anything else flat; prices hover around 100.
pub fn pattern(s: &str) -> Vec<OhlcvBar> {
    let pairs: Vec<(f64, f64)> = s
        .chars()
        .map(|c| match c {
            'g' => (100.0, 101.0),
            'r' => (101.0, 100.0),
            _ => (100.0, 100.0),
        })
        .collect();
    candles(&pairs)
}

pub fn series(code: &str, bars: Vec<OhlcvBar>) -> Series {
    Series::new(code, bars)
}

pub fn analysis_config(tickers: &[&str], n: usize) -> AnalysisConfig {
    AnalysisConfig {
        n,
        tickers: tickers.iter().map(|t| t.to_string()).collect(),
        start_date: date(2020, 1, 1),
        end_date: date(2025, 1, 1),
        trailing: TrailingStreak::Drop,
    }
}

pub fn frictionless(variant: Variant) -> BacktestConfig {
    BacktestConfig {
        initial_capital: 100_000.0,
        commission_rate: 0.0,
        variant,
    }
}
