// error.rs

#[cfg(feature = "cli")]
use std::num::ParseFloatError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BinningError {
    #[error("Invalid bin specification: {0}")]
    InvalidSpecification(String),

    #[error("Channel count mismatch: expected {expected} channels, found {found}")]
    ChannelCountMismatch { expected: usize, found: usize },

    #[error("Weight length mismatch: {samples} samples but {weights} weights")]
    WeightLengthMismatch { samples: usize, weights: usize },

    #[error("Cannot merge histograms with different bin edges")]
    IncompatibleBins,

    #[cfg(feature = "cli")]
    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),

    #[cfg(feature = "cli")]
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[cfg(feature = "cli")]
    #[error("Parse float error: {0}")]
    ParseFloatError(#[from] ParseFloatError),

    #[cfg(feature = "cli")]
    #[error("{0}")]
    StringError(String),
}

#[cfg(feature = "cli")]
impl From<&str> for BinningError {
    fn from(error: &str) -> Self {
        BinningError::StringError(error.to_string())
    }
}

#[cfg(feature = "cli")]
impl From<String> for BinningError {
    fn from(error: String) -> Self {
        BinningError::StringError(error)
    }
}
