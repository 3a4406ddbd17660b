//! Error types for the outer layers. The streak collector and the simulator
//! themselves never fail.

use crate::domain::universe::UniverseError;

#[derive(Debug, thiserror::Error)]
pub enum StreakError {
    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid ticker list: {0}")]
    Universe(#[from] UniverseError),

    #[error("no usable data for any of {requested} tickers")]
    NoData { requested: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&StreakError> for std::process::ExitCode {
    fn from(err: &StreakError) -> Self {
        let code: u8 = match err {
            StreakError::Io(_) => 1,
            StreakError::ConfigParse { .. }
            | StreakError::ConfigMissing { .. }
            | StreakError::ConfigInvalid { .. } => 2,
            StreakError::Data { .. } => 3,
            StreakError::Universe(_) => 4,
            StreakError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
