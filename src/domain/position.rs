//! Open position and closed trade records.

use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Long,
    Short,
}

impl Side {
    /// +1 for long, -1 for short.
    pub fn sign(self) -> f64 {
        match self {
            Side::Long => 1.0,
            Side::Short => -1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub side: Side,
    pub quantity: u64,
    pub entry_price: f64,
    pub entry_date: NaiveDate,
}

impl Position {
    pub fn notional(&self, price: f64) -> f64 {
        self.quantity as f64 * price
    }

    /// Price move in the position's favour, before commission.
    pub fn gross_pnl(&self, exit_price: f64) -> f64 {
        self.quantity as f64 * (exit_price - self.entry_price) * self.side.sign()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClosedTrade {
    pub side: Side,
    pub quantity: u64,
    pub entry_price: f64,
    pub exit_price: f64,
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub commission: f64,
    /// Net of commission.
    pub pnl: f64,
}

impl ClosedTrade {
    /// Net P/L relative to entry notional, in percent.
    pub fn return_pct(&self) -> f64 {
        let notional = self.quantity as f64 * self.entry_price;
        if notional > 0.0 {
            self.pnl / notional * 100.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_long_position() -> Position {
        Position {
            side: Side::Long,
            quantity: 100,
            entry_price: 50.0,
            entry_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        }
    }

    fn sample_short_position() -> Position {
        Position {
            side: Side::Short,
            quantity: 100,
            entry_price: 100.0,
            entry_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        }
    }

    #[test]
    fn notional_ignores_side() {
        assert!((sample_long_position().notional(55.0) - 5500.0).abs() < f64::EPSILON);
        assert!((sample_short_position().notional(95.0) - 9500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn gross_pnl_long() {
        let pos = sample_long_position();
        assert!((pos.gross_pnl(55.0) - 500.0).abs() < f64::EPSILON);
        assert!((pos.gross_pnl(45.0) - (-500.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn gross_pnl_short() {
        let pos = sample_short_position();
        assert!((pos.gross_pnl(90.0) - 1000.0).abs() < f64::EPSILON);
        assert!((pos.gross_pnl(110.0) - (-1000.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn closed_trade_return_pct() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let trade = ClosedTrade {
            side: Side::Long,
            quantity: 100,
            entry_price: 50.0,
            exit_price: 55.0,
            entry_date: date,
            exit_date: date,
            commission: 0.0,
            pnl: 500.0,
        };
        assert!((trade.return_pct() - 10.0).abs() < 1e-9);
    }
}
