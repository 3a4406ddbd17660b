//! Streak-reversal backtest simulator.
//!
//! Each bar is one trading day. When flat, the `n` bars before the current
//! one are inspected: all red opens a long at the current open, and in the
//! long/short variant all green opens a short. Whatever happened, the
//! position is closed at the current bar's close.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use super::account::{Account, EntryResult, EquityPoint};
use super::ohlcv::OhlcvBar;
use super::position::{ClosedTrade, Side};
use super::series::Series;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    #[default]
    LongOnly,
    LongShort,
}

impl Variant {
    pub fn allows_short(self) -> bool {
        self == Variant::LongShort
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "long-only" | "long" => Ok(Variant::LongOnly),
            "long-short" | "both" => Ok(Variant::LongShort),
            other => Err(format!("unknown variant '{other}' (expected long-only or long-short)")),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::LongOnly => write!(f, "long-only"),
            Variant::LongShort => write!(f, "long-short"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub initial_capital: f64,
    /// Fraction of notional charged on each side of a trade.
    pub commission_rate: f64,
    pub variant: Variant,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            initial_capital: 100_000.0,
            commission_rate: 0.0002,
            variant: Variant::LongOnly,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub code: String,
    pub initial_capital: f64,
    pub final_equity: f64,
    pub return_pct: f64,
    pub closed_trades: Vec<ClosedTrade>,
    pub equity_curve: Vec<EquityPoint>,
}

impl BacktestResult {
    pub fn trade_count(&self) -> usize {
        self.closed_trades.len()
    }
}

/// Entry decision for bar `i`: looks at bars `i-n ..= i-1` only.
pub fn entry_signal(bars: &[OhlcvBar], i: usize, n: usize, variant: Variant) -> Option<Side> {
    if n == 0 || i < n || i >= bars.len() {
        return None;
    }
    let lookback = &bars[i - n..i];
    if lookback.iter().all(OhlcvBar::is_red) {
        return Some(Side::Long);
    }
    if variant.allows_short() && lookback.iter().all(OhlcvBar::is_green) {
        return Some(Side::Short);
    }
    None
}

pub fn run_backtest(series: &Series, n: usize, config: &BacktestConfig) -> BacktestResult {
    let mut account = Account::new(config.initial_capital, config.commission_rate);

    for (i, bar) in series.bars.iter().enumerate() {
        if account.is_flat() {
            if let Some(side) = entry_signal(&series.bars, i, n, config.variant) {
                match account.open(side, bar.open, bar.date) {
                    EntryResult::Entered { quantity, price } => {
                        debug!(code = %series.code, date = %bar.date, ?side, quantity, price, "entered");
                    }
                    EntryResult::InsufficientCapital => {
                        debug!(code = %series.code, date = %bar.date, equity = account.equity, "entry skipped: insufficient capital");
                    }
                    EntryResult::PositionOpen => {}
                }
            }
        }

        // day end: always back to flat
        if let Some(trade) = account.close(bar.close, bar.date) {
            debug!(code = %series.code, date = %bar.date, pnl = trade.pnl, "closed");
        }
        account.record_equity(bar.date);
    }

    let return_pct = account.total_return_pct();
    BacktestResult {
        code: series.code.clone(),
        initial_capital: account.initial_capital,
        final_equity: account.equity,
        return_pct,
        closed_trades: account.closed_trades,
        equity_curve: account.equity_curve,
    }
}

/// Total return percentage of one simulation run.
pub fn run(
    bars: &[OhlcvBar],
    n: usize,
    variant: Variant,
    starting_cash: f64,
    commission_rate: f64,
) -> f64 {
    let series = Series {
        code: String::new(),
        bars: bars.to_vec(),
    };
    let config = BacktestConfig {
        initial_capital: starting_cash,
        commission_rate,
        variant,
    };
    run_backtest(&series, n, &config).return_pct
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn candles(pairs: &[(f64, f64)]) -> Vec<OhlcvBar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        pairs
            .iter()
            .enumerate()
            .map(|(i, &(open, close))| OhlcvBar {
                date: start + chrono::Duration::days(i as i64),
                open,
                high: open.max(close),
                low: open.min(close),
                close,
                volume: 1000,
            })
            .collect()
    }

    fn series(pairs: &[(f64, f64)]) -> Series {
        Series::new("TEST", candles(pairs))
    }

    fn frictionless(variant: Variant) -> BacktestConfig {
        BacktestConfig {
            initial_capital: 100_000.0,
            commission_rate: 0.0,
            variant,
        }
    }

    #[test]
    fn default_config() {
        let c = BacktestConfig::default();
        assert!((c.initial_capital - 100_000.0).abs() < f64::EPSILON);
        assert!((c.commission_rate - 0.0002).abs() < f64::EPSILON);
        assert_eq!(c.variant, Variant::LongOnly);
    }

    #[test]
    fn variant_parsing() {
        assert_eq!("long-only".parse::<Variant>().unwrap(), Variant::LongOnly);
        assert_eq!("LONG_SHORT".parse::<Variant>().unwrap(), Variant::LongShort);
        assert!("short-only".parse::<Variant>().is_err());
        assert_eq!(Variant::LongShort.to_string(), "long-short");
    }

    #[test]
    fn three_reds_then_green_gains_five_percent() {
        let s = series(&[(103.0, 102.0), (102.0, 101.0), (101.0, 100.5), (100.0, 105.0)]);
        let result = run_backtest(&s, 3, &frictionless(Variant::LongOnly));

        assert_eq!(result.trade_count(), 1);
        let trade = &result.closed_trades[0];
        assert_eq!(trade.side, Side::Long);
        assert!((trade.entry_price - 100.0).abs() < f64::EPSILON);
        assert!((trade.exit_price - 105.0).abs() < f64::EPSILON);
        assert_eq!(trade.entry_date, trade.exit_date);
        assert!((result.return_pct - 5.0).abs() < 1e-9);
    }

    #[test]
    fn lookback_excludes_current_bar() {
        // only two reds precede the last bar
        let s = series(&[(10.0, 11.0), (11.0, 10.0), (10.0, 9.0), (9.0, 8.0)]);
        let result = run_backtest(&s, 3, &frictionless(Variant::LongOnly));
        assert_eq!(result.trade_count(), 0);
    }

    #[test]
    fn too_short_series_is_zero_trade_run() {
        let s = series(&[(11.0, 10.0), (10.0, 9.0)]);
        let result = run_backtest(&s, 3, &frictionless(Variant::LongOnly));
        assert_eq!(result.trade_count(), 0);
        assert_eq!(result.return_pct, 0.0);
        assert_eq!(result.equity_curve.len(), 2);

        let empty = Series::new("EMPTY", vec![]);
        assert_eq!(run_backtest(&empty, 3, &frictionless(Variant::LongOnly)).return_pct, 0.0);
    }

    #[test]
    fn long_only_ignores_green_streaks() {
        let s = series(&[(10.0, 11.0), (11.0, 12.0), (12.0, 13.0), (13.0, 12.0)]);
        let result = run_backtest(&s, 3, &frictionless(Variant::LongOnly));
        assert_eq!(result.trade_count(), 0);
    }

    #[test]
    fn long_short_shorts_after_green_streak() {
        let s = series(&[(10.0, 11.0), (11.0, 12.0), (12.0, 13.0), (100.0, 90.0)]);
        let result = run_backtest(&s, 3, &frictionless(Variant::LongShort));

        assert_eq!(result.trade_count(), 1);
        assert_eq!(result.closed_trades[0].side, Side::Short);
        assert!((result.return_pct - 10.0).abs() < 1e-9);
    }

    #[test]
    fn flat_candle_breaks_lookback() {
        let s = series(&[(11.0, 10.0), (10.0, 10.0), (10.0, 9.0), (9.0, 12.0)]);
        let result = run_backtest(&s, 3, &frictionless(Variant::LongShort));
        assert_eq!(result.trade_count(), 0);
    }

    #[test]
    fn consecutive_signals_trade_each_day() {
        // reds keep coming, so every bar from index 3 re-enters
        let s = series(&[
            (10.0, 9.0),
            (9.0, 8.0),
            (8.0, 7.0),
            (7.0, 6.0),
            (6.0, 5.0),
        ]);
        let result = run_backtest(&s, 3, &frictionless(Variant::LongOnly));
        assert_eq!(result.trade_count(), 2);
        for trade in &result.closed_trades {
            assert_eq!(trade.entry_date, trade.exit_date);
        }
        assert!(result.return_pct < 0.0);
    }

    #[test]
    fn commission_reduces_return() {
        let pairs = [(103.0, 102.0), (102.0, 101.0), (101.0, 100.5), (100.0, 105.0)];
        let free = run(&candles(&pairs), 3, Variant::LongOnly, 100_000.0, 0.0);
        let costly = run(&candles(&pairs), 3, Variant::LongOnly, 100_000.0, 0.0002);
        assert!(costly < free);
        assert!(costly > 4.9);
    }

    #[test]
    fn equity_curve_has_one_point_per_bar() {
        let s = series(&[(103.0, 102.0), (102.0, 101.0), (101.0, 100.5), (100.0, 105.0)]);
        let result = run_backtest(&s, 3, &frictionless(Variant::LongOnly));
        assert_eq!(result.equity_curve.len(), 4);
        assert!((result.equity_curve[2].equity - 100_000.0).abs() < f64::EPSILON);
        assert!((result.equity_curve[3].equity - 105_000.0).abs() < 1e-9);
        assert!((result.final_equity - 105_000.0).abs() < 1e-9);
    }

    #[test]
    fn entry_signal_requires_positive_n() {
        let bars = candles(&[(11.0, 10.0), (10.0, 9.0)]);
        assert_eq!(entry_signal(&bars, 1, 0, Variant::LongOnly), None);
        assert_eq!(entry_signal(&bars, 1, 1, Variant::LongOnly), Some(Side::Long));
        assert_eq!(entry_signal(&bars, 5, 1, Variant::LongOnly), None);
    }
}
