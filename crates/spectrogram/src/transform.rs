//! Short-Time Fourier Transform
//!
//! [`Stft`] owns every buffer and derived parameter of one transform. It is
//! created once from an [`InputDescriptor`] and [`TransformConfig`], computed
//! any number of times over new signals of the same shape, and queried
//! between computes. Queries recompute their output from the spectra buffer
//! on every call.

use crate::config::{InputDescriptor, PaddingMode, SampleWidth, TransformConfig};
use crate::error::ensure_len;
use crate::fft::{FftEngine, RustFftEngine};
use crate::output::Spectrogram;
use crate::segment::{self, SegmentLayout};
use crate::spectrum::SpectrumView;
use crate::window::{self, WindowKind};
use crate::{params, Sample, SpectrogramError};
use tracing::{debug, trace};

/// Spectrogram transform computing in precision `T`
#[derive(Clone)]
pub struct Stft<T: Sample, E: FftEngine<T> = RustFftEngine<T>> {
    input: InputDescriptor,
    config: TransformConfig,

    num_segments: usize,
    num_frequencies: usize,
    /// Elements a signal slice must hold
    signal_len: usize,
    window_coefficients: Vec<f64>,
    scale_factor: f64,
    time: Vec<f64>,
    frequency: Vec<f64>,

    /// Window coefficients in working precision
    weights: Vec<T>,
    /// Scale factor in working precision
    scale: T,
    /// `num_segments` rows of `transform_length` halfcomplex values
    spectra: Vec<T>,
    engine: E,
}

impl<T: Sample> Stft<T> {
    /// Create a transform backed by a `rustfft` plan.
    ///
    /// Out-of-range numeric parameters are clamped with a warning. Fails if
    /// `input.sample_width` does not match `T`.
    pub fn new(input: InputDescriptor, config: TransformConfig) -> Result<Self, SpectrogramError> {
        Self::with_engine(input, config, RustFftEngine::new)
    }
}

impl<T: Sample, E: FftEngine<T>> Stft<T, E> {
    /// Create a transform whose FFT engine is built by `plan(transform_length, num_segments)`
    pub fn with_engine<F>(
        input: InputDescriptor,
        config: TransformConfig,
        plan: F,
    ) -> Result<Self, SpectrogramError>
    where
        F: FnOnce(usize, usize) -> E,
    {
        if input.sample_width != T::WIDTH {
            return Err(SpectrogramError::SampleWidthMismatch {
                expected: input.sample_width.as_str(),
                actual: T::WIDTH.as_str(),
            });
        }

        let input = input.validate();
        let config = config.validate();

        let num_segments = params::num_segments(
            input.num_samples,
            config.window_length,
            config.window_overlap,
            config.padding_mode,
        );
        let num_frequencies = params::num_frequencies(config.transform_length);

        let signal_len = input
            .required_len()
            .ok_or(SpectrogramError::SizeOverflow("signal length"))?;
        let buffer_len = num_segments
            .checked_mul(config.transform_length)
            .ok_or(SpectrogramError::SizeOverflow("spectra buffer"))?;

        let window_coefficients = window::generate(config.window_length, config.window_kind);
        let scale_factor = window::scale_factor(&window_coefficients, input.sample_rate);
        let time = params::time_vector(
            num_segments,
            config.window_length,
            config.window_overlap,
            input.sample_rate,
        );
        let frequency = params::frequency_vector(config.transform_length, input.sample_rate);

        debug!(
            "STFT derived: segments={}, frequencies={}, window={} x{}, overlap={}, nfft={}",
            num_segments,
            num_frequencies,
            config.window_kind.as_str(),
            config.window_length,
            config.window_overlap,
            config.transform_length
        );

        let engine = plan(config.transform_length, num_segments);

        Ok(Self {
            weights: window_coefficients.iter().map(|&c| T::from_real(c)).collect(),
            scale: T::from_real(scale_factor),
            spectra: vec![T::zero(); buffer_len],
            input,
            config,
            num_segments,
            num_frequencies,
            signal_len,
            window_coefficients,
            scale_factor,
            time,
            frequency,
            engine,
        })
    }

    /// Segment, window and transform `signal`, overwriting the previous spectra.
    ///
    /// `signal` holds `num_samples` logical samples `stride` elements apart.
    /// Does nothing when there are no segments. On error the spectra are left
    /// untouched.
    pub fn compute(&mut self, signal: &[T]) -> Result<(), SpectrogramError> {
        if self.num_segments == 0 {
            trace!("No segments; compute skipped");
            return Ok(());
        }

        if signal.len() < self.signal_len {
            return Err(SpectrogramError::SignalTooShort {
                required: self.signal_len,
                actual: signal.len(),
            });
        }

        let layout = SegmentLayout {
            num_samples: self.input.num_samples,
            stride: self.input.stride,
            increment: self.config.increment(),
            transform_length: self.config.transform_length,
        };
        segment::fill(&mut self.spectra, signal, &self.weights, &layout);
        self.engine.execute(&mut self.spectra);

        trace!("Computed {} segments", self.num_segments);
        Ok(())
    }

    fn view(&self) -> SpectrumView<'_, T> {
        SpectrumView::new(
            &self.spectra,
            self.config.transform_length,
            self.num_frequencies,
            self.scale,
        )
    }

    /// Length of a spectrogram output (`num_segments * num_frequencies`)
    pub fn spectrogram_len(&self) -> usize {
        self.num_segments * self.num_frequencies
    }

    /// Write the segment centre times (seconds)
    pub fn write_time(&self, out: &mut [T]) -> Result<(), SpectrogramError> {
        ensure_len("time", self.num_segments, out.len())?;
        for (dest, &t) in out.iter_mut().zip(&self.time) {
            *dest = T::from_real(t);
        }
        Ok(())
    }

    /// Write the bin frequencies (Hz)
    pub fn write_frequency(&self, out: &mut [T]) -> Result<(), SpectrogramError> {
        ensure_len("frequency", self.num_frequencies, out.len())?;
        for (dest, &f) in out.iter_mut().zip(&self.frequency) {
            *dest = T::from_real(f);
        }
        Ok(())
    }

    /// Write power spectral density, row-major by segment
    pub fn write_power(&self, out: &mut [T]) -> Result<(), SpectrogramError> {
        ensure_len("power", self.spectrogram_len(), out.len())?;
        self.view().power(out);
        Ok(())
    }

    /// Write phase (radians), row-major by segment
    pub fn write_phase(&self, out: &mut [T]) -> Result<(), SpectrogramError> {
        ensure_len("phase", self.spectrogram_len(), out.len())?;
        self.view().phase(out);
        Ok(())
    }

    /// Write power summed over all segments
    pub fn write_power_periodogram(&self, out: &mut [T]) -> Result<(), SpectrogramError> {
        ensure_len("power periodogram", self.num_frequencies, out.len())?;
        self.view().power_periodogram(out);
        Ok(())
    }

    /// Write phase combined over segments per the configured aggregation
    pub fn write_phase_periodogram(&self, out: &mut [T]) -> Result<(), SpectrogramError> {
        ensure_len("phase periodogram", self.num_frequencies, out.len())?;
        self.view()
            .phase_periodogram(out, self.config.phase_aggregation);
        Ok(())
    }

    /// Segment centre times (seconds)
    pub fn time(&self) -> Vec<T> {
        self.time.iter().map(|&t| T::from_real(t)).collect()
    }

    /// Bin frequencies (Hz)
    pub fn frequency(&self) -> Vec<T> {
        self.frequency.iter().map(|&f| T::from_real(f)).collect()
    }

    /// Power spectral density, row-major by segment
    pub fn power(&self) -> Vec<T> {
        let mut out = vec![T::zero(); self.spectrogram_len()];
        self.view().power(&mut out);
        out
    }

    /// Phase (radians), row-major by segment
    pub fn phase(&self) -> Vec<T> {
        let mut out = vec![T::zero(); self.spectrogram_len()];
        self.view().phase(&mut out);
        out
    }

    /// Power summed over all segments
    pub fn power_periodogram(&self) -> Vec<T> {
        let mut out = vec![T::zero(); self.num_frequencies];
        self.view().power_periodogram(&mut out);
        out
    }

    /// Phase combined over segments
    pub fn phase_periodogram(&self) -> Vec<T> {
        let mut out = vec![T::zero(); self.num_frequencies];
        self.view()
            .phase_periodogram(&mut out, self.config.phase_aggregation);
        out
    }

    /// Owned copy of the axes, power and phase
    pub fn snapshot(&self) -> Spectrogram<T> {
        Spectrogram {
            time_length: self.num_segments,
            freq_length: self.num_frequencies,
            time: self.time(),
            freq: self.frequency(),
            power: self.power(),
            phase: self.phase(),
        }
    }

    /// Validated input properties
    pub fn input(&self) -> &InputDescriptor {
        &self.input
    }

    /// Validated transform parameters
    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    pub fn num_samples(&self) -> usize {
        self.input.num_samples
    }

    pub fn sample_rate(&self) -> f64 {
        self.input.sample_rate
    }

    pub fn sample_width(&self) -> SampleWidth {
        self.input.sample_width
    }

    pub fn stride(&self) -> usize {
        self.input.stride
    }

    pub fn padding_mode(&self) -> PaddingMode {
        self.config.padding_mode
    }

    pub fn window_kind(&self) -> WindowKind {
        self.config.window_kind
    }

    pub fn window_length(&self) -> usize {
        self.config.window_length
    }

    pub fn window_overlap(&self) -> usize {
        self.config.window_overlap
    }

    pub fn transform_length(&self) -> usize {
        self.config.transform_length
    }

    /// Elements a signal slice passed to [`Stft::compute`] must hold
    pub fn required_len(&self) -> usize {
        self.signal_len
    }

    /// Number of analysis segments
    pub fn num_segments(&self) -> usize {
        self.num_segments
    }

    /// Number of half-spectrum bins
    pub fn num_frequencies(&self) -> usize {
        self.num_frequencies
    }

    /// Window coefficients
    pub fn window_coefficients(&self) -> &[f64] {
        &self.window_coefficients
    }

    /// `1 / (sample_rate * sum(coef^2))`
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }
}

/// Transform whose precision is chosen at runtime from [`SampleWidth`]
#[derive(Clone)]
pub enum AnyStft {
    F32(Stft<f32>),
    F64(Stft<f64>),
}

impl AnyStft {
    /// Create a transform in the precision named by `input.sample_width`
    pub fn new(input: InputDescriptor, config: TransformConfig) -> Result<Self, SpectrogramError> {
        Ok(match input.sample_width {
            SampleWidth::F32 => AnyStft::F32(Stft::new(input, config)?),
            SampleWidth::F64 => AnyStft::F64(Stft::new(input, config)?),
        })
    }

    pub fn sample_width(&self) -> SampleWidth {
        match self {
            AnyStft::F32(_) => SampleWidth::F32,
            AnyStft::F64(_) => SampleWidth::F64,
        }
    }

    pub fn num_segments(&self) -> usize {
        match self {
            AnyStft::F32(stft) => stft.num_segments(),
            AnyStft::F64(stft) => stft.num_segments(),
        }
    }

    pub fn num_frequencies(&self) -> usize {
        match self {
            AnyStft::F32(stft) => stft.num_frequencies(),
            AnyStft::F64(stft) => stft.num_frequencies(),
        }
    }

    /// Borrow as the transform of precision `T`
    pub fn typed<T: Sample>(&self) -> Result<&Stft<T>, SpectrogramError> {
        T::select(self).ok_or_else(|| self.mismatch::<T>())
    }

    /// Mutably borrow as the transform of precision `T`
    pub fn typed_mut<T: Sample>(&mut self) -> Result<&mut Stft<T>, SpectrogramError> {
        let err = self.mismatch::<T>();
        T::select_mut(self).ok_or(err)
    }

    /// Compute over a signal of precision `T`
    pub fn compute<T: Sample>(&mut self, signal: &[T]) -> Result<(), SpectrogramError> {
        self.typed_mut::<T>()?.compute(signal)
    }

    fn mismatch<T: Sample>(&self) -> SpectrogramError {
        SpectrogramError::SampleWidthMismatch {
            expected: self.sample_width().as_str(),
            actual: T::WIDTH.as_str(),
        }
    }
}
