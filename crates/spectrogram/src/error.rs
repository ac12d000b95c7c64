//! Spectrogram Error Types

use thiserror::Error;

/// Errors that can occur while configuring or running a transform
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpectrogramError {
    /// Window kind code or name not recognised
    #[error("Unknown window kind: {0}")]
    UnknownWindow(String),

    /// Padding mode code or name not recognised
    #[error("Unknown padding mode: {0}")]
    UnknownPaddingMode(String),

    /// Sample width is neither 32-bit nor 64-bit float
    #[error("Unknown sample width: {0}")]
    UnknownSampleWidth(String),

    /// Input signal cannot hold every strided sample
    #[error("Signal too short: need {required} elements, got {actual}")]
    SignalTooShort { required: usize, actual: usize },

    /// Query destination is smaller than the output it must receive
    #[error("Output buffer for {name} too small: need {required} elements, got {actual}")]
    OutputTooSmall {
        name: &'static str,
        required: usize,
        actual: usize,
    },

    /// Typed access used an element type the transform was not built for
    #[error("Sample width mismatch: transform is {expected}, call used {actual}")]
    SampleWidthMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// Signal or buffer size does not fit in `usize`
    #[error("Size overflow: {0} exceeds addressable memory")]
    SizeOverflow(&'static str),

    /// Layered configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    /// Snapshot could not be encoded or decoded
    #[error("Encoding error: {0}")]
    Encoding(String),
}

impl From<::config::ConfigError> for SpectrogramError {
    fn from(err: ::config::ConfigError) -> Self {
        SpectrogramError::Config(err.to_string())
    }
}

impl From<postcard::Error> for SpectrogramError {
    fn from(err: postcard::Error) -> Self {
        SpectrogramError::Encoding(err.to_string())
    }
}

/// Check that a caller-supplied destination can hold `required` elements
pub(crate) fn ensure_len(
    name: &'static str,
    required: usize,
    actual: usize,
) -> Result<(), SpectrogramError> {
    if actual < required {
        return Err(SpectrogramError::OutputTooSmall {
            name,
            required,
            actual,
        });
    }
    Ok(())
}
