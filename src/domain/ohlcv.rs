//! Daily OHLCV bar and candle classification.

use chrono::NaiveDate;

/// Direction of a single candle body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandleColor {
    Green,
    Red,
    /// open == close; never part of a streak.
    Flat,
}

impl CandleColor {
    pub fn opposite(self) -> Self {
        match self {
            CandleColor::Green => CandleColor::Red,
            CandleColor::Red => CandleColor::Green,
            CandleColor::Flat => CandleColor::Flat,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl OhlcvBar {
    pub fn color(&self) -> CandleColor {
        if self.close > self.open {
            CandleColor::Green
        } else if self.close < self.open {
            CandleColor::Red
        } else {
            CandleColor::Flat
        }
    }

    pub fn is_green(&self) -> bool {
        self.color() == CandleColor::Green
    }

    pub fn is_red(&self) -> bool {
        self.color() == CandleColor::Red
    }
}
