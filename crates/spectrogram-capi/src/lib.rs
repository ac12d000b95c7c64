//! Spectrogram C Interface
//!
//! Exposes the spectrogram transform to C callers through an opaque handle.
//! All numerical work happens in the `spectrogram` crate.

mod error;
mod ffi;

pub use error::{CapiError, StatusCode};
pub use ffi::{
    spectrogram_create, spectrogram_destroy, spectrogram_execute, spectrogram_get_freq,
    spectrogram_get_freqlen, spectrogram_get_phase, spectrogram_get_phase_periodogram,
    spectrogram_get_power, spectrogram_get_power_periodogram, spectrogram_get_time,
    spectrogram_get_timelen, spectrogram_init_logging, SpectrogramConfig, SpectrogramInput,
    SpectrogramTransform,
};
