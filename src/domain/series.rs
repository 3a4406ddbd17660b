//! Per-asset chronological bar series.

use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct Series {
    pub code: String,
    pub bars: Vec<OhlcvBar>,
}

impl Series {
    /// Builds a series, sorting bars by date.
    pub fn new(code: impl Into<String>, mut bars: Vec<OhlcvBar>) -> Self {
        bars.sort_by_key(|b| b.date);
        Self {
            code: code.into(),
            bars,
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// True when dates strictly increase (no duplicates).
    pub fn is_chronological(&self) -> bool {
        self.bars.windows(2).all(|w| w[0].date < w[1].date)
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.bars.first(), self.bars.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }
}
