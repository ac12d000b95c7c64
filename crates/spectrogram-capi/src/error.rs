//! C ABI Error Types

use spectrogram::SpectrogramError;
use thiserror::Error;

/// Status codes returned by the C entry points
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok = 0,
    NullHandle = -1,
    NullBuffer = -2,
    InvalidConfig = -3,
    SignalTooShort = -4,
    OutputTooSmall = -5,
    SampleWidthMismatch = -6,
    LoggingInitialized = -7,
    Unknown = -99,
}

impl From<i32> for StatusCode {
    fn from(code: i32) -> Self {
        match code {
            0 => Self::Ok,
            -1 => Self::NullHandle,
            -2 => Self::NullBuffer,
            -3 => Self::InvalidConfig,
            -4 => Self::SignalTooShort,
            -5 => Self::OutputTooSmall,
            -6 => Self::SampleWidthMismatch,
            -7 => Self::LoggingInitialized,
            _ => Self::Unknown,
        }
    }
}

/// Errors raised at the C boundary
#[derive(Error, Debug)]
pub enum CapiError {
    #[error("Null transform handle")]
    NullHandle,

    #[error("Null {0} buffer")]
    NullBuffer(&'static str),

    #[error("Logging already initialized")]
    LoggingInitialized,

    #[error(transparent)]
    Transform(#[from] SpectrogramError),
}

impl CapiError {
    /// Status code reported to the caller
    pub fn code(&self) -> StatusCode {
        match self {
            Self::NullHandle => StatusCode::NullHandle,
            Self::NullBuffer(_) => StatusCode::NullBuffer,
            Self::LoggingInitialized => StatusCode::LoggingInitialized,
            Self::Transform(err) => match err {
                SpectrogramError::UnknownWindow(_)
                | SpectrogramError::UnknownPaddingMode(_)
                | SpectrogramError::UnknownSampleWidth(_)
                | SpectrogramError::SizeOverflow(_)
                | SpectrogramError::Config(_) => StatusCode::InvalidConfig,
                SpectrogramError::SignalTooShort { .. } => StatusCode::SignalTooShort,
                SpectrogramError::OutputTooSmall { .. } => StatusCode::OutputTooSmall,
                SpectrogramError::SampleWidthMismatch { .. } => StatusCode::SampleWidthMismatch,
                SpectrogramError::Encoding(_) => StatusCode::Unknown,
            },
        }
    }
}
