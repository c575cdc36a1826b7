use thiserror::Error;

/// Why a win probability series could not be turned into an analysis.
///
/// Indices refer to the position of the record inside the upstream
/// `winprobability` list.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExcitementError {
    #[error("winprobability[{index}] missing 'homeWinPercentage'")]
    MissingField { index: usize },

    #[error("winprobability[{index}].homeWinPercentage is not a number: {raw}")]
    NotNumeric { index: usize, raw: String },

    #[error("winprobability[{index}].homeWinPercentage must be between 0 and 1 (got {value})")]
    OutOfRange { index: usize, value: f64 },

    #[error("No win probability data available")]
    EmptyInput,

    #[error("Need at least two win probability points to analyze the game (got {samples})")]
    InsufficientData { samples: usize },
}
