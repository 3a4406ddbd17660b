//! Single-asset trading account: one position slot, equity and trade log.

use chrono::NaiveDate;

use super::position::{ClosedTrade, Position, Side};

#[derive(Debug, Clone, PartialEq)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub equity: f64,
}

/// Position slot of the simulator. Long-only runs never reach `Short`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PositionState {
    #[default]
    Flat,
    Long(Position),
    Short(Position),
}

impl PositionState {
    pub fn is_flat(&self) -> bool {
        matches!(self, PositionState::Flat)
    }
}

/// Result of an entry attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryResult {
    Entered { quantity: u64, price: f64 },
    /// Exclusive orders: a position is already open.
    PositionOpen,
    InsufficientCapital,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub initial_capital: f64,
    pub equity: f64,
    pub commission_rate: f64,
    pub state: PositionState,
    pub closed_trades: Vec<ClosedTrade>,
    pub equity_curve: Vec<EquityPoint>,
}

/// Proportional commission on one side of a trade.
pub fn calculate_commission(notional: f64, rate: f64) -> f64 {
    notional * rate
}

impl Account {
    pub fn new(initial_capital: f64, commission_rate: f64) -> Self {
        Account {
            initial_capital,
            equity: initial_capital,
            commission_rate,
            state: PositionState::Flat,
            closed_trades: Vec::new(),
            equity_curve: Vec::new(),
        }
    }

    pub fn is_flat(&self) -> bool {
        self.state.is_flat()
    }

    /// Opens a position sized to the whole shares current equity can buy,
    /// leaving room for the entry commission.
    pub fn open(&mut self, side: Side, price: f64, date: NaiveDate) -> EntryResult {
        if !self.is_flat() {
            return EntryResult::PositionOpen;
        }
        if price <= 0.0 || self.equity <= 0.0 {
            return EntryResult::InsufficientCapital;
        }

        let quantity = (self.equity / (price * (1.0 + self.commission_rate))).floor() as u64;
        if quantity == 0 {
            return EntryResult::InsufficientCapital;
        }

        let position = Position {
            side,
            quantity,
            entry_price: price,
            entry_date: date,
        };
        self.state = match side {
            Side::Long => PositionState::Long(position),
            Side::Short => PositionState::Short(position),
        };

        EntryResult::Entered { quantity, price }
    }

    /// Closes the open position at `price`, charging commission on both legs.
    /// Returns `None` when already flat.
    pub fn close(&mut self, price: f64, date: NaiveDate) -> Option<ClosedTrade> {
        let position = match std::mem::take(&mut self.state) {
            PositionState::Flat => return None,
            PositionState::Long(p) | PositionState::Short(p) => p,
        };

        let commission = calculate_commission(position.notional(position.entry_price), self.commission_rate)
            + calculate_commission(position.notional(price), self.commission_rate);
        let pnl = position.gross_pnl(price) - commission;
        self.equity += pnl;

        let trade = ClosedTrade {
            side: position.side,
            quantity: position.quantity,
            entry_price: position.entry_price,
            exit_price: price,
            entry_date: position.entry_date,
            exit_date: date,
            commission,
            pnl,
        };
        self.closed_trades.push(trade.clone());
        Some(trade)
    }

    pub fn record_equity(&mut self, date: NaiveDate) {
        self.equity_curve.push(EquityPoint {
            date,
            equity: self.equity,
        });
    }

    /// (equity - initial) / initial, in percent.
    pub fn total_return_pct(&self) -> f64 {
        if self.initial_capital > 0.0 {
            (self.equity - self.initial_capital) / self.initial_capital * 100.0
        } else {
            0.0
        }
    }
}
