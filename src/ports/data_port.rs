//! Price history access port.

use crate::domain::error::StreakError;
use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;

pub trait DataPort {
    /// Daily bars for `code` between `start_date` and `end_date` inclusive,
    /// in chronological order.
    fn fetch_ohlcv(
        &self,
        code: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, StreakError>;

    fn list_symbols(&self) -> Result<Vec<String>, StreakError>;
}
