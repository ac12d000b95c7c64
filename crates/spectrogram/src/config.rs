//! Transform configuration
//!
//! Input properties and transform parameters, their validation, and layered
//! loading from files and `SPECTROGRAM_*` environment variables.

use crate::window::{self, WindowKind};
use crate::SpectrogramError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::warn;

/// Environment variable prefix for layered configuration
pub const ENV_PREFIX: &str = "SPECTROGRAM";

/// Floating-point width of the input samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleWidth {
    /// 32-bit float
    F32,
    /// 64-bit float
    #[default]
    F64,
}

impl SampleWidth {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            SampleWidth::F32 => "f32",
            SampleWidth::F64 => "f64",
        }
    }

    /// Size of one sample in bytes
    pub fn size_in_bytes(&self) -> usize {
        match self {
            SampleWidth::F32 => std::mem::size_of::<f32>(),
            SampleWidth::F64 => std::mem::size_of::<f64>(),
        }
    }

    /// Resolve a C-style `data_size` (bytes per sample)
    pub fn from_size_in_bytes(size: usize) -> Result<Self, SpectrogramError> {
        match size {
            4 => Ok(SampleWidth::F32),
            8 => Ok(SampleWidth::F64),
            other => Err(SpectrogramError::UnknownSampleWidth(other.to_string())),
        }
    }
}

impl FromStr for SampleWidth {
    type Err = SpectrogramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "f32" | "float" | "float32" => Ok(SampleWidth::F32),
            "f64" | "double" | "float64" => Ok(SampleWidth::F64),
            _ => Err(SpectrogramError::UnknownSampleWidth(s.to_string())),
        }
    }
}

/// Policy for the trailing partial segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaddingMode {
    /// Drop segments that would extend past the end of the signal
    #[default]
    Truncate,
    /// Keep a final partial segment, reading missing samples as zero
    Pad,
}

impl PaddingMode {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PaddingMode::Truncate => "truncate",
            PaddingMode::Pad => "pad",
        }
    }
}

impl TryFrom<i64> for PaddingMode {
    type Error = SpectrogramError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(PaddingMode::Truncate),
            1 => Ok(PaddingMode::Pad),
            other => Err(SpectrogramError::UnknownPaddingMode(other.to_string())),
        }
    }
}

impl FromStr for PaddingMode {
    type Err = SpectrogramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "truncate" => Ok(PaddingMode::Truncate),
            "pad" => Ok(PaddingMode::Pad),
            _ => Err(SpectrogramError::UnknownPaddingMode(s.to_string())),
        }
    }
}

/// How per-segment phase is combined into the phase periodogram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseAggregation {
    /// Each bin holds the phase of the last segment
    #[default]
    LastSegment,
    /// Each bin holds the argument of the summed unit phasors
    CircularMean,
}

/// Properties of the sampled input signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputDescriptor {
    /// Sampling frequency (Hz)
    pub sample_rate: f64,
    /// Number of logical samples
    pub num_samples: usize,
    /// Width of each sample
    pub sample_width: SampleWidth,
    /// Element distance between consecutive logical samples
    pub stride: usize,
}

impl Default for InputDescriptor {
    fn default() -> Self {
        Self {
            sample_rate: 1.0,
            num_samples: 0,
            sample_width: SampleWidth::F64,
            stride: 1,
        }
    }
}

impl InputDescriptor {
    /// Contiguous input of the given length and rate
    pub fn new(sample_rate: f64, num_samples: usize, sample_width: SampleWidth) -> Self {
        Self {
            sample_rate,
            num_samples,
            sample_width,
            stride: 1,
        }
    }

    /// Same input, read every `stride` elements
    pub fn with_stride(self, stride: usize) -> Self {
        Self { stride, ..self }
    }

    /// Number of elements a signal slice must hold, `None` on overflow
    pub fn required_len(&self) -> Option<usize> {
        match self.num_samples {
            0 => Some(0),
            n => (n - 1).checked_mul(self.stride)?.checked_add(1),
        }
    }

    /// Clamp out-of-range fields to the nearest valid value
    pub fn validate(mut self) -> Self {
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            warn!(
                "Sample rate must be finite and greater than zero (got {}). Setting to 1.",
                self.sample_rate
            );
            self.sample_rate = 1.0;
        }

        if self.stride < 1 {
            warn!("Stride cannot be less than 1. Setting to 1.");
            self.stride = 1;
        }

        self
    }

    /// Load from a config file overridden by `SPECTROGRAM_*` environment variables
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SpectrogramError> {
        load_layered(path.as_ref())
    }
}

/// Parameters of the short-time Fourier transform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Trailing segment policy
    pub padding_mode: PaddingMode,
    /// Segment weighting function
    pub window_kind: WindowKind,
    /// Samples per segment
    pub window_length: usize,
    /// Samples shared by consecutive segments
    pub window_overlap: usize,
    /// FFT length; samples past the window are zero
    pub transform_length: usize,
    /// Phase periodogram combination rule
    pub phase_aggregation: PhaseAggregation,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            padding_mode: PaddingMode::Truncate,
            window_kind: WindowKind::Hamming,
            window_length: 256,
            window_overlap: 128,
            transform_length: 256,
            phase_aggregation: PhaseAggregation::LastSegment,
        }
    }
}

impl TransformConfig {
    /// Window of the given kind and length, FFT length equal to the window
    pub fn with_window(window_kind: WindowKind, window_length: usize, window_overlap: usize) -> Self {
        Self {
            window_kind,
            window_length,
            window_overlap,
            transform_length: window_length,
            ..Default::default()
        }
    }

    /// Zero-pad each segment to `transform_length`
    pub fn with_transform_length(self, transform_length: usize) -> Self {
        Self {
            transform_length,
            ..self
        }
    }

    /// Use the given trailing segment policy
    pub fn with_padding(self, padding_mode: PaddingMode) -> Self {
        Self {
            padding_mode,
            ..self
        }
    }

    /// Fine frequency grid: Hann window, 75% overlap, 4x zero padding
    pub fn high_resolution(window_length: usize) -> Self {
        Self {
            window_kind: WindowKind::Hann,
            window_length,
            window_overlap: window_length * 3 / 4,
            transform_length: window_length * 4,
            ..Default::default()
        }
    }

    /// Fast tracking: rectangular window, no overlap
    pub fn low_latency(window_length: usize) -> Self {
        Self {
            window_kind: WindowKind::Rectangular,
            window_length,
            window_overlap: 0,
            transform_length: window_length,
            ..Default::default()
        }
    }

    /// Samples between the starts of consecutive segments
    pub fn increment(&self) -> usize {
        self.window_length - self.window_overlap
    }

    /// Clamp out-of-range fields to the nearest valid value
    pub fn validate(mut self) -> Self {
        if self.window_length < 2 {
            warn!(
                "Window length must be greater than 1 (got {}). Setting to 2.",
                self.window_length
            );
            self.window_length = 2;
        }

        if window::energy(&window::generate(self.window_length, self.window_kind)) <= f64::EPSILON {
            warn!(
                "{} window of length {} has no energy. Setting length to 3.",
                self.window_kind.as_str(),
                self.window_length
            );
            self.window_length = 3;
        }

        if self.window_overlap >= self.window_length {
            warn!(
                "Window overlap must be less than window length (got {} >= {}). Setting to {}.",
                self.window_overlap,
                self.window_length,
                self.window_length - 1
            );
            self.window_overlap = self.window_length - 1;
        }

        if self.transform_length < self.window_length {
            warn!(
                "Transform length must be at least the window length (got {} < {}). Setting to window length.",
                self.transform_length, self.window_length
            );
            self.transform_length = self.window_length;
        }

        self
    }

    /// Load from a config file overridden by `SPECTROGRAM_*` environment variables
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SpectrogramError> {
        load_layered(path.as_ref())
    }
}

fn load_layered<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, SpectrogramError> {
    let settings = ::config::Config::builder()
        .add_source(::config::File::from(path))
        .add_source(::config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
        .build()?;
    Ok(settings.try_deserialize()?)
}
