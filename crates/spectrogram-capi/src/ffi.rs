//! Opaque-Handle C Interface
//!
//! A transform is created from two plain C records, executed over a raw
//! signal pointer, queried into caller-owned buffers, and destroyed. Element
//! type of every buffer follows `data_size` of the input record (4 for
//! `float`, 8 for `double`).

use crate::error::{CapiError, StatusCode};
use libc::{c_int, c_ulong, c_void};
use spectrogram::{
    AnyStft, InputDescriptor, PaddingMode, Sample, SampleWidth, SpectrogramError, Stft,
    TransformConfig, WindowKind,
};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Properties of the signal, mirroring `spectrogram_input`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct SpectrogramInput {
    pub sample_rate: f64,
    pub num_samples: c_ulong,
    /// Bytes per sample: 4 or 8
    pub data_size: c_int,
    pub stride: c_int,
}

/// Transform parameters, mirroring `spectrogram_config`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct SpectrogramConfig {
    /// 0 = truncate, 1 = pad
    pub padding_mode: c_int,
    /// Window code, rectangular = 0 through blackman-harris = 9
    pub window_type: c_int,
    pub window_length: c_ulong,
    pub window_overlap: c_ulong,
    pub transform_length: c_ulong,
}

impl TryFrom<&SpectrogramInput> for InputDescriptor {
    type Error = SpectrogramError;

    fn try_from(input: &SpectrogramInput) -> Result<Self, Self::Error> {
        let sample_width = usize::try_from(input.data_size)
            .map_err(|_| SpectrogramError::UnknownSampleWidth(input.data_size.to_string()))
            .and_then(SampleWidth::from_size_in_bytes)?;

        Ok(InputDescriptor {
            sample_rate: input.sample_rate,
            num_samples: input.num_samples as usize,
            sample_width,
            // non-positive strides are clamped by validation
            stride: usize::try_from(input.stride).unwrap_or(0),
        })
    }
}

impl TryFrom<&SpectrogramConfig> for TransformConfig {
    type Error = SpectrogramError;

    fn try_from(config: &SpectrogramConfig) -> Result<Self, Self::Error> {
        Ok(TransformConfig {
            padding_mode: PaddingMode::try_from(i64::from(config.padding_mode))?,
            window_kind: WindowKind::try_from(i64::from(config.window_type))?,
            window_length: config.window_length as usize,
            window_overlap: config.window_overlap as usize,
            transform_length: config.transform_length as usize,
            ..Default::default()
        })
    }
}

/// Opaque transform handle handed to C callers
pub struct SpectrogramTransform {
    inner: AnyStft,
}

impl SpectrogramTransform {
    /// Build a transform from the C records
    pub fn new(input: &SpectrogramInput, config: &SpectrogramConfig) -> Result<Self, CapiError> {
        let input = InputDescriptor::try_from(input)?;
        let config = TransformConfig::try_from(config)?;
        Ok(Self {
            inner: AnyStft::new(input, config)?,
        })
    }

    /// Typed transform behind the handle
    pub fn transform(&self) -> &AnyStft {
        &self.inner
    }
}

impl Drop for SpectrogramTransform {
    fn drop(&mut self) {
        info!(
            "Destroying {} spectrogram transform ({} segments)",
            self.inner.sample_width().as_str(),
            self.inner.num_segments()
        );
    }
}

#[derive(Debug, Clone, Copy)]
enum Query {
    Time,
    Frequency,
    Power,
    Phase,
    PowerPeriodogram,
    PhasePeriodogram,
}

impl Query {
    fn name(self) -> &'static str {
        match self {
            Query::Time => "time",
            Query::Frequency => "frequency",
            Query::Power => "power",
            Query::Phase => "phase",
            Query::PowerPeriodogram => "power periodogram",
            Query::PhasePeriodogram => "phase periodogram",
        }
    }

    fn len<T: Sample>(self, stft: &Stft<T>) -> usize {
        match self {
            Query::Time => stft.num_segments(),
            Query::Power | Query::Phase => stft.spectrogram_len(),
            Query::Frequency | Query::PowerPeriodogram | Query::PhasePeriodogram => {
                stft.num_frequencies()
            }
        }
    }

    /// Fill `out`, which must hold `self.len(stft)` elements of `T`
    unsafe fn write<T: Sample>(self, stft: &Stft<T>, out: *mut c_void) -> Result<(), CapiError> {
        let out = std::slice::from_raw_parts_mut(out.cast::<T>(), self.len(stft));
        match self {
            Query::Time => stft.write_time(out)?,
            Query::Frequency => stft.write_frequency(out)?,
            Query::Power => stft.write_power(out)?,
            Query::Phase => stft.write_phase(out)?,
            Query::PowerPeriodogram => stft.write_power_periodogram(out)?,
            Query::PhasePeriodogram => stft.write_phase_periodogram(out)?,
        }
        Ok(())
    }
}

fn status(result: Result<(), CapiError>) -> c_int {
    match result {
        Ok(()) => StatusCode::Ok as c_int,
        Err(err) => {
            error!("Spectrogram call failed: {}", err);
            err.code() as c_int
        }
    }
}

unsafe fn handle_ref<'a>(
    handle: *const SpectrogramTransform,
) -> Result<&'a SpectrogramTransform, CapiError> {
    handle.as_ref().ok_or(CapiError::NullHandle)
}

unsafe fn execute_typed<T: Sample>(stft: &mut Stft<T>, signal: *const c_void) -> Result<(), CapiError> {
    if stft.num_segments() == 0 {
        return Ok(stft.compute(&[])?);
    }
    if signal.is_null() {
        return Err(CapiError::NullBuffer("signal"));
    }
    let signal = std::slice::from_raw_parts(signal.cast::<T>(), stft.required_len());
    Ok(stft.compute(signal)?)
}

unsafe fn query_into(
    handle: *const SpectrogramTransform,
    out: *mut c_void,
    query: Query,
) -> Result<(), CapiError> {
    let transform = handle_ref(handle)?;
    if out.is_null() {
        return Err(CapiError::NullBuffer(query.name()));
    }
    match &transform.inner {
        AnyStft::F32(stft) => query.write(stft, out),
        AnyStft::F64(stft) => query.write(stft, out),
    }
}

unsafe fn query(handle: *const SpectrogramTransform, out: *mut c_void, query: Query) -> c_int {
    status(query_into(handle, out, query))
}

/// Create a transform. Returns null on an unknown window, padding mode or
/// sample size; out-of-range numeric fields are clamped with a warning.
///
/// # Safety
/// `input` and `config` must be null or point to valid records.
#[no_mangle]
pub unsafe extern "C" fn spectrogram_create(
    input: *const SpectrogramInput,
    config: *const SpectrogramConfig,
) -> *mut SpectrogramTransform {
    let (Some(input), Some(config)) = (input.as_ref(), config.as_ref()) else {
        error!("spectrogram_create called with a null record");
        return std::ptr::null_mut();
    };

    match SpectrogramTransform::new(input, config) {
        Ok(transform) => {
            info!(
                "Created {} spectrogram transform: {} segments x {} bins",
                transform.inner.sample_width().as_str(),
                transform.inner.num_segments(),
                transform.inner.num_frequencies()
            );
            Box::into_raw(Box::new(transform))
        }
        Err(err) => {
            error!("Failed to create spectrogram transform: {}", err);
            std::ptr::null_mut()
        }
    }
}

/// Compute the spectrogram of `signal`.
///
/// # Safety
/// `handle` must come from [`spectrogram_create`]. `signal` must point to
/// `(num_samples - 1) * stride + 1` elements of the transform's sample type.
#[no_mangle]
pub unsafe extern "C" fn spectrogram_execute(
    handle: *mut SpectrogramTransform,
    signal: *const c_void,
) -> c_int {
    let result = match handle.as_mut() {
        Some(transform) => match &mut transform.inner {
            AnyStft::F32(stft) => execute_typed(stft, signal),
            AnyStft::F64(stft) => execute_typed(stft, signal),
        },
        None => Err(CapiError::NullHandle),
    };
    status(result)
}

/// Number of segments, or 0 for a null handle
///
/// # Safety
/// `handle` must be null or come from [`spectrogram_create`].
#[no_mangle]
pub unsafe extern "C" fn spectrogram_get_timelen(handle: *const SpectrogramTransform) -> c_ulong {
    handle_ref(handle).map_or(0, |t| t.inner.num_segments() as c_ulong)
}

/// Number of frequency bins, or 0 for a null handle
///
/// # Safety
/// `handle` must be null or come from [`spectrogram_create`].
#[no_mangle]
pub unsafe extern "C" fn spectrogram_get_freqlen(handle: *const SpectrogramTransform) -> c_ulong {
    handle_ref(handle).map_or(0, |t| t.inner.num_frequencies() as c_ulong)
}

/// # Safety
/// `out` must hold `timelen` elements of the transform's sample type.
#[no_mangle]
pub unsafe extern "C" fn spectrogram_get_time(
    handle: *const SpectrogramTransform,
    out: *mut c_void,
) -> c_int {
    query(handle, out, Query::Time)
}

/// # Safety
/// `out` must hold `freqlen` elements of the transform's sample type.
#[no_mangle]
pub unsafe extern "C" fn spectrogram_get_freq(
    handle: *const SpectrogramTransform,
    out: *mut c_void,
) -> c_int {
    query(handle, out, Query::Frequency)
}

/// # Safety
/// `out` must hold `timelen * freqlen` elements of the transform's sample type.
#[no_mangle]
pub unsafe extern "C" fn spectrogram_get_power(
    handle: *const SpectrogramTransform,
    out: *mut c_void,
) -> c_int {
    query(handle, out, Query::Power)
}

/// # Safety
/// `out` must hold `timelen * freqlen` elements of the transform's sample type.
#[no_mangle]
pub unsafe extern "C" fn spectrogram_get_phase(
    handle: *const SpectrogramTransform,
    out: *mut c_void,
) -> c_int {
    query(handle, out, Query::Phase)
}

/// # Safety
/// `out` must hold `freqlen` elements of the transform's sample type.
#[no_mangle]
pub unsafe extern "C" fn spectrogram_get_power_periodogram(
    handle: *const SpectrogramTransform,
    out: *mut c_void,
) -> c_int {
    query(handle, out, Query::PowerPeriodogram)
}

/// # Safety
/// `out` must hold `freqlen` elements of the transform's sample type.
#[no_mangle]
pub unsafe extern "C" fn spectrogram_get_phase_periodogram(
    handle: *const SpectrogramTransform,
    out: *mut c_void,
) -> c_int {
    query(handle, out, Query::PhasePeriodogram)
}

/// Release a transform. Null is ignored.
///
/// # Safety
/// `handle` must be null or come from [`spectrogram_create`], and must not be
/// used afterwards.
#[no_mangle]
pub unsafe extern "C" fn spectrogram_destroy(handle: *mut SpectrogramTransform) {
    if !handle.is_null() {
        drop(Box::from_raw(handle));
    }
}

/// Install a global log subscriber.
///
/// `level`: 0 error, 1 warn, 2 info, 3 debug, 4 or more trace.
#[no_mangle]
pub extern "C" fn spectrogram_init_logging(level: c_int) -> c_int {
    let level = match level {
        i32::MIN..=0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        3 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    status(
        tracing::subscriber::set_global_default(subscriber)
            .map_err(|_| CapiError::LoggingInitialized),
    )
}
