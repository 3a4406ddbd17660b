//! Plain-text report writer.

use std::io::Write;

use crate::domain::analysis::StreakStats;
use crate::domain::backtest::Variant;
use crate::domain::error::StreakError;
use crate::domain::summary::ReturnSummary;
use crate::domain::universe::{SkipReason, SkippedCode};
use crate::ports::report_port::ReportPort;

pub struct ConsoleReportAdapter<W: Write> {
    out: W,
}

impl<W: Write> ConsoleReportAdapter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl ConsoleReportAdapter<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> ReportPort for ConsoleReportAdapter<W> {
    fn write_streaks(&mut self, stats: &StreakStats) -> Result<(), StreakError> {
        let c = &stats.counts;
        writeln!(self.out, "=== Streak reversals (n = {}, {} assets) ===", stats.n, stats.assets)?;
        writeln!(
            self.out,
            "{} green candles followed by red: {:.2}% ({} of {})",
            stats.n,
            stats.up_fraction() * 100.0,
            c.up_followed_by_red,
            c.up_streaks
        )?;
        writeln!(
            self.out,
            "{} red candles followed by green: {:.2}% ({} of {})",
            stats.n,
            stats.down_fraction() * 100.0,
            c.down_followed_by_green,
            c.down_streaks
        )?;
        Ok(())
    }

    fn write_returns(&mut self, summary: &ReturnSummary, variant: Variant) -> Result<(), StreakError> {
        writeln!(self.out, "\n=== Backtest results ({variant}) ===")?;
        for (code, ret) in &summary.returns {
            writeln!(self.out, "{code}: {ret:.2}%")?;
        }
        writeln!(
            self.out,
            "\nTotal return over {} assets: {:.2}%",
            summary.asset_count(),
            summary.total
        )?;
        writeln!(self.out, "Average return per asset: {:.2}%", summary.average)?;
        Ok(())
    }

    fn write_skipped(&mut self, skipped: &[SkippedCode]) -> Result<(), StreakError> {
        if skipped.is_empty() {
            return Ok(());
        }
        writeln!(self.out, "\nSkipped:")?;
        for s in skipped {
            match &s.reason {
                SkipReason::NoData => writeln!(self.out, "  {}: no data", s.code)?,
                SkipReason::FetchFailed { reason } => writeln!(self.out, "  {}: {}", s.code, reason)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::streak::StreakCounts;

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut ConsoleReportAdapter<Vec<u8>>),
    {
        let mut adapter = ConsoleReportAdapter::new(Vec::new());
        f(&mut adapter);
        String::from_utf8(adapter.into_inner()).unwrap()
    }

    #[test]
    fn streak_report_shows_percentages() {
        let stats = StreakStats {
            n: 3,
            assets: 2,
            counts: StreakCounts {
                up_streaks: 8,
                up_followed_by_red: 4,
                down_streaks: 3,
                down_followed_by_green: 2,
            },
        };
        let text = render(|a| a.write_streaks(&stats).unwrap());

        assert!(text.contains("n = 3, 2 assets"));
        assert!(text.contains("3 green candles followed by red: 50.00% (4 of 8)"));
        assert!(text.contains("3 red candles followed by green: 66.67% (2 of 3)"));
    }

    #[test]
    fn returns_report_lists_each_code() {
        let summary = ReturnSummary::from_returns(vec![
            ("AAPL".to_string(), 12.4),
            ("TSLA".to_string(), -2.0),
        ]);
        let text = render(|a| a.write_returns(&summary, Variant::LongOnly).unwrap());

        assert!(text.contains("(long-only)"));
        assert!(text.contains("AAPL: 12.40%"));
        assert!(text.contains("TSLA: -2.00%"));
        assert!(text.contains("Total return over 2 assets: 10.40%"));
        assert!(text.contains("Average return per asset: 5.20%"));
    }

    #[test]
    fn skipped_section_omitted_when_empty() {
        let text = render(|a| a.write_skipped(&[]).unwrap());
        assert!(text.is_empty());

        let text = render(|a| {
            a.write_skipped(&[SkippedCode {
                code: "META".into(),
                reason: SkipReason::NoData,
            }])
            .unwrap()
        });
        assert!(text.contains("META: no data"));
    }
}
