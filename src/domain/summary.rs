//! Cross-asset return aggregation.

use super::backtest::BacktestResult;

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnSummary {
    /// (code, total return %) in simulation order.
    pub returns: Vec<(String, f64)>,
    pub total: f64,
    /// `total` divided by the number of simulated assets; 0 when none were.
    pub average: f64,
}

impl ReturnSummary {
    pub fn from_results(results: &[BacktestResult]) -> Self {
        Self::from_returns(results.iter().map(|r| (r.code.clone(), r.return_pct)))
    }

    pub fn from_returns<I>(returns: I) -> Self
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        let returns: Vec<(String, f64)> = returns.into_iter().collect();
        let total: f64 = returns.iter().map(|(_, r)| r).sum();
        let average = if returns.is_empty() {
            0.0
        } else {
            total / returns.len() as f64
        };
        ReturnSummary {
            returns,
            total,
            average,
        }
    }

    pub fn asset_count(&self) -> usize {
        self.returns.len()
    }

    pub fn get(&self, code: &str) -> Option<f64> {
        self.returns
            .iter()
            .find(|(c, _)| c == code)
            .map(|(_, r)| *r)
    }
}
