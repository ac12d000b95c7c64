//! Spectrogram Engine
//!
//! Short-time Fourier transform of a sampled real signal: windowed,
//! overlapping segments are transformed with a batched real FFT and read back
//! as power spectral density, phase, and whole-signal periodograms.

mod config;
mod error;
mod fft;
mod output;
mod params;
mod sample;
mod segment;
mod spectrum;
mod transform;
pub mod window;

pub use crate::config::{
    InputDescriptor, PaddingMode, PhaseAggregation, SampleWidth, TransformConfig, ENV_PREFIX,
};
pub use error::SpectrogramError;
pub use fft::{FftEngine, RustFftEngine};
pub use output::Spectrogram;
pub use params::{frequency_vector, num_frequencies, num_segments, time_vector};
pub use sample::Sample;
pub use segment::SegmentLayout;
pub use spectrum::SpectrumView;
pub use transform::{AnyStft, Stft};
pub use window::WindowKind;
