//! Per-asset performance metrics for a backtest run.

use super::account::EquityPoint;
use super::backtest::BacktestResult;

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub return_pct: f64,
    pub total_trades: usize,
    pub trades_won: usize,
    pub trades_lost: usize,
    pub win_rate: f64,
    pub profit_factor: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
    pub total_commission: f64,
    /// Mean of per-trade returns on entry notional, in percent.
    pub avg_trade_return_pct: f64,
    /// Peak-to-trough decline of the equity curve, as a fraction.
    pub max_drawdown: f64,
}

impl Metrics {
    pub fn compute(result: &BacktestResult) -> Self {
        let mut trades_won = 0usize;
        let mut trades_lost = 0usize;
        let mut total_wins = 0.0_f64;
        let mut total_losses = 0.0_f64;
        let mut largest_win = 0.0_f64;
        let mut largest_loss = 0.0_f64;
        let mut total_commission = 0.0_f64;
        let mut sum_trade_return = 0.0_f64;

        for trade in &result.closed_trades {
            let pnl = trade.pnl;
            total_commission += trade.commission;
            sum_trade_return += trade.return_pct();
            if pnl > 0.0 {
                trades_won += 1;
                total_wins += pnl;
                largest_win = largest_win.max(pnl);
            } else if pnl < 0.0 {
                trades_lost += 1;
                total_losses += pnl.abs();
                largest_loss = largest_loss.max(pnl.abs());
            }
        }

        let total_trades = result.closed_trades.len();
        let (win_rate, avg_trade_return_pct) = if total_trades > 0 {
            (
                trades_won as f64 / total_trades as f64,
                sum_trade_return / total_trades as f64,
            )
        } else {
            (0.0, 0.0)
        };

        let profit_factor = if total_losses > 0.0 {
            total_wins / total_losses
        } else if total_wins > 0.0 {
            f64::INFINITY
        } else {
            0.0
        };

        Metrics {
            return_pct: result.return_pct,
            total_trades,
            trades_won,
            trades_lost,
            win_rate,
            profit_factor,
            largest_win,
            largest_loss,
            total_commission,
            avg_trade_return_pct,
            max_drawdown: compute_drawdown(&result.equity_curve),
        }
    }
}

fn compute_drawdown(equity_curve: &[EquityPoint]) -> f64 {
    let Some(first) = equity_curve.first() else {
        return 0.0;
    };

    let mut peak = first.equity;
    let mut max_dd = 0.0_f64;
    for point in equity_curve {
        if point.equity > peak {
            peak = point.equity;
        } else if peak > 0.0 {
            max_dd = max_dd.max((peak - point.equity) / peak);
        }
    }
    max_dd
}
