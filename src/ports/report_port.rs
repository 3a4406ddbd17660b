//! Result reporting port.

use crate::domain::analysis::StreakStats;
use crate::domain::backtest::Variant;
use crate::domain::error::StreakError;
use crate::domain::summary::ReturnSummary;
use crate::domain::universe::SkippedCode;

pub trait ReportPort {
    fn write_streaks(&mut self, stats: &StreakStats) -> Result<(), StreakError>;

    fn write_returns(&mut self, summary: &ReturnSummary, variant: Variant) -> Result<(), StreakError>;

    /// Default: skipped codes are not reported.
    fn write_skipped(&mut self, skipped: &[SkippedCode]) -> Result<(), StreakError> {
        let _ = skipped;
        Ok(())
    }
}
