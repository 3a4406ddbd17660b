//! Core domain types and logic.

pub mod ohlcv;
pub mod series;
pub mod streak;
pub mod position;
pub mod account;
pub mod backtest;
pub mod metrics;
pub mod analysis;
pub mod summary;
pub mod universe;
pub mod config_validation;
pub mod error;
