//! Batch runner over a loaded universe.
//!
//! Assets are processed independently on the rayon pool; the only shared
//! step is the final reduction, which is a plain sum.

use chrono::NaiveDate;
use rayon::prelude::*;

use super::backtest::{run_backtest, BacktestConfig, BacktestResult};
use super::series::Series;
use super::streak::{count_streaks, StreakCounts, TrailingStreak};

/// Resolved `[analysis]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub n: usize,
    pub tickers: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub trailing: TrailingStreak,
}

/// Streak counters summed across every analysed asset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreakStats {
    pub n: usize,
    pub assets: usize,
    pub counts: StreakCounts,
}

impl StreakStats {
    pub fn up_fraction(&self) -> f64 {
        self.counts.up_fraction()
    }

    pub fn down_fraction(&self) -> f64 {
        self.counts.down_fraction()
    }
}

pub fn collect_streak_stats(series: &[Series], n: usize, trailing: TrailingStreak) -> StreakStats {
    let counts = series
        .par_iter()
        .map(|s| count_streaks(&s.bars, n, trailing))
        .reduce(StreakCounts::default, |a, b| a + b);

    StreakStats {
        n,
        assets: series.len(),
        counts,
    }
}

/// One result per series, in input order.
pub fn run_backtests(series: &[Series], n: usize, config: &BacktestConfig) -> Vec<BacktestResult> {
    series
        .par_iter()
        .map(|s| run_backtest(s, n, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::backtest::Variant;
    use crate::domain::ohlcv::OhlcvBar;
    use chrono::NaiveDate;

    fn from_pattern(code: &str, s: &str) -> Series {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = s
            .chars()
            .enumerate()
            .map(|(i, c)| {
                let (open, close) = match c {
                    'g' => (100.0, 101.0),
                    'r' => (101.0, 100.0),
                    _ => (100.0, 100.0),
                };
                OhlcvBar {
                    date: start + chrono::Duration::days(i as i64),
                    open,
                    high: 102.0,
                    low: 99.0,
                    close,
                    volume: 1000,
                }
            })
            .collect();
        Series::new(code, bars)
    }

    #[test]
    fn stats_sum_across_assets() {
        let series = vec![
            from_pattern("AAA", "grrrg"),
            from_pattern("BBB", "rgggr"),
            from_pattern("CCC", "ffff"),
        ];
        let stats = collect_streak_stats(&series, 3, TrailingStreak::Drop);

        assert_eq!(stats.n, 3);
        assert_eq!(stats.assets, 3);
        assert_eq!(stats.counts.down_streaks, 1);
        assert_eq!(stats.counts.down_followed_by_green, 1);
        assert_eq!(stats.counts.up_streaks, 1);
        assert_eq!(stats.counts.up_followed_by_red, 1);
        assert!((stats.up_fraction() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn stats_on_empty_universe() {
        let stats = collect_streak_stats(&[], 3, TrailingStreak::Drop);
        assert_eq!(stats.assets, 0);
        assert!(stats.counts.is_empty());
        assert_eq!(stats.down_fraction(), 0.0);
    }

    #[test]
    fn backtests_keep_input_order() {
        let series: Vec<Series> = (0..16)
            .map(|i| from_pattern(&format!("T{i:02}"), "rrrgrrrg"))
            .collect();
        let config = BacktestConfig {
            variant: Variant::LongShort,
            ..BacktestConfig::default()
        };
        let results = run_backtests(&series, 3, &config);

        assert_eq!(results.len(), 16);
        for (i, result) in results.iter().enumerate() {
            assert_eq!(result.code, format!("T{i:02}"));
        }
    }
}
