//! Configuration validation.
//!
//! Checks every `[analysis]` and `[backtest]` field before any data is loaded.

use crate::domain::backtest::Variant;
use crate::domain::error::StreakError;
use crate::domain::streak::TrailingStreak;
use crate::domain::universe::parse_codes;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const DEFAULT_N: i64 = 3;
pub const DEFAULT_INITIAL_CAPITAL: f64 = 100_000.0;
pub const DEFAULT_COMMISSION: f64 = 0.0002;

pub fn validate_analysis_config(config: &dyn ConfigPort) -> Result<(), StreakError> {
    validate_n(config)?;
    validate_tickers(config)?;
    validate_dates(config)?;
    validate_trailing_streak(config)?;
    Ok(())
}

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), StreakError> {
    validate_initial_capital(config)?;
    validate_commission(config)?;
    validate_variant(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> StreakError {
    StreakError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn validate_n(config: &dyn ConfigPort) -> Result<(), StreakError> {
    if let Some(raw) = config.get_string("analysis", "n") {
        if raw.trim().parse::<i64>().is_err() {
            return Err(invalid("analysis", "n", "n must be an integer"));
        }
    }
    let value = config.get_int("analysis", "n", DEFAULT_N);
    if value < 1 {
        return Err(invalid("analysis", "n", "n must be at least 1"));
    }
    Ok(())
}

fn validate_tickers(config: &dyn ConfigPort) -> Result<(), StreakError> {
    match config.get_string("analysis", "tickers") {
        Some(s) if !s.trim().is_empty() => {
            parse_codes(&s).map_err(|e| invalid("analysis", "tickers", e.to_string()))?;
            Ok(())
        }
        _ => Err(StreakError::ConfigMissing {
            section: "analysis".to_string(),
            key: "tickers".to_string(),
        }),
    }
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), StreakError> {
    let start_str = config.get_string("analysis", "start_date");
    let end_str = config.get_string("analysis", "end_date");

    let start_date = parse_date(start_str.as_deref(), "start_date")?;
    let end_date = parse_date(end_str.as_deref(), "end_date")?;

    if start_date >= end_date {
        return Err(invalid(
            "analysis",
            "start_date",
            "start_date must be before end_date",
        ));
    }
    Ok(())
}

pub fn parse_date(value: Option<&str>, field: &str) -> Result<NaiveDate, StreakError> {
    match value {
        None => Err(StreakError::ConfigMissing {
            section: "analysis".to_string(),
            key: field.to_string(),
        }),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
            invalid(
                "analysis",
                field,
                format!("invalid {} format, expected YYYY-MM-DD", field),
            )
        }),
    }
}

fn validate_trailing_streak(config: &dyn ConfigPort) -> Result<(), StreakError> {
    if let Some(s) = config.get_string("analysis", "trailing_streak") {
        s.parse::<TrailingStreak>()
            .map_err(|e| invalid("analysis", "trailing_streak", e))?;
    }
    Ok(())
}

/// Reads a float key, rejecting text that does not parse and non-finite values.
fn finite_double(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, StreakError> {
    let Some(raw) = config.get_string(section, key) else {
        return Ok(default);
    };
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        Ok(_) => Err(invalid(section, key, format!("{key} must be a finite number"))),
        Err(_) => Err(invalid(section, key, format!("{key} must be a number, got '{raw}'"))),
    }
}

fn validate_initial_capital(config: &dyn ConfigPort) -> Result<(), StreakError> {
    let value = finite_double(config, "backtest", "initial_capital", DEFAULT_INITIAL_CAPITAL)?;
    if value <= 0.0 {
        return Err(invalid(
            "backtest",
            "initial_capital",
            "initial_capital must be positive",
        ));
    }
    Ok(())
}

fn validate_commission(config: &dyn ConfigPort) -> Result<(), StreakError> {
    let value = finite_double(config, "backtest", "commission", DEFAULT_COMMISSION)?;
    if !(0.0..1.0).contains(&value) {
        return Err(invalid(
            "backtest",
            "commission",
            "commission must be a fraction in [0, 1)",
        ));
    }
    Ok(())
}

fn validate_variant(config: &dyn ConfigPort) -> Result<(), StreakError> {
    if let Some(s) = config.get_string("backtest", "variant") {
        s.parse::<Variant>()
            .map_err(|e| invalid("backtest", "variant", e))?;
    }
    Ok(())
}
