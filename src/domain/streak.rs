//! Streak statistics collector.
//!
//! Counts runs of at least `n` same-colored candles and how often the candle
//! that ends the run has the opposite color. Up-streaks and down-streaks are
//! scanned in two independent passes over the same bars.
//!
//! Boundary policy: the scan starts at index 1, so the first bar never belongs
//! to a counted streak. A streak still running when the bars end is dropped
//! unless [`TrailingStreak::Flush`] is selected.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

use crate::domain::ohlcv::{CandleColor, OhlcvBar};

/// What to do with a qualifying streak that is still open at the last bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrailingStreak {
    #[default]
    Drop,
    /// Count it as a qualifying streak with no reversal.
    Flush,
}

impl FromStr for TrailingStreak {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "drop" => Ok(TrailingStreak::Drop),
            "flush" => Ok(TrailingStreak::Flush),
            other => Err(format!("unknown trailing streak policy '{other}' (expected drop or flush)")),
        }
    }
}

impl fmt::Display for TrailingStreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrailingStreak::Drop => write!(f, "drop"),
            TrailingStreak::Flush => write!(f, "flush"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreakCounts {
    pub up_streaks: usize,
    pub up_followed_by_red: usize,
    pub down_streaks: usize,
    pub down_followed_by_green: usize,
}

impl StreakCounts {
    /// Share of qualifying up-streaks broken by a red candle.
    pub fn up_fraction(&self) -> f64 {
        ratio(self.up_followed_by_red, self.up_streaks)
    }

    /// Share of qualifying down-streaks broken by a green candle.
    pub fn down_fraction(&self) -> f64 {
        ratio(self.down_followed_by_green, self.down_streaks)
    }

    pub fn is_empty(&self) -> bool {
        *self == StreakCounts::default()
    }
}

fn ratio(hits: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64
    }
}

impl Add for StreakCounts {
    type Output = StreakCounts;

    fn add(mut self, rhs: StreakCounts) -> StreakCounts {
        self += rhs;
        self
    }
}

impl AddAssign for StreakCounts {
    fn add_assign(&mut self, rhs: StreakCounts) {
        self.up_streaks += rhs.up_streaks;
        self.up_followed_by_red += rhs.up_followed_by_red;
        self.down_streaks += rhs.down_streaks;
        self.down_followed_by_green += rhs.down_followed_by_green;
    }
}

impl Sum for StreakCounts {
    fn sum<I: Iterator<Item = StreakCounts>>(iter: I) -> Self {
        iter.fold(StreakCounts::default(), Add::add)
    }
}

/// Counts qualifying up- and down-streaks of length `n` in one asset's bars.
///
/// A zero `n` qualifies nothing and yields empty counts.
pub fn count_streaks(bars: &[OhlcvBar], n: usize, trailing: TrailingStreak) -> StreakCounts {
    if n == 0 {
        return StreakCounts::default();
    }
    let (up_streaks, up_followed_by_red) = scan(bars, CandleColor::Green, n, trailing);
    let (down_streaks, down_followed_by_green) = scan(bars, CandleColor::Red, n, trailing);
    StreakCounts {
        up_streaks,
        up_followed_by_red,
        down_streaks,
        down_followed_by_green,
    }
}

/// Single pass for one color. Returns (qualifying streaks, reversals).
fn scan(bars: &[OhlcvBar], color: CandleColor, n: usize, trailing: TrailingStreak) -> (usize, usize) {
    let mut streaks = 0;
    let mut reversals = 0;
    let mut streak = 0;

    for bar in bars.iter().skip(1) {
        let current = bar.color();
        if current == color {
            streak += 1;
            continue;
        }
        if streak >= n {
            streaks += 1;
            // a flat breaker qualifies the streak but is never a reversal
            if current == color.opposite() {
                reversals += 1;
            }
        }
        streak = 0;
    }

    if trailing == TrailingStreak::Flush && streak >= n {
        streaks += 1;
    }

    (streaks, reversals)
}
