//! Working precision of a transform

use crate::config::SampleWidth;
use crate::transform::{AnyStft, Stft};
use num_traits::Float;
use rustfft::FftNum;

/// Floating-point type a transform computes in (`f32` or `f64`)
pub trait Sample: FftNum + Float {
    /// Width tag matching this type
    const WIDTH: SampleWidth;

    /// Narrow a derived `f64` quantity to the working precision
    fn from_real(value: f64) -> Self;

    /// Borrow the transform of this precision, if `any` holds one
    fn select(any: &AnyStft) -> Option<&Stft<Self>>;

    /// Mutably borrow the transform of this precision, if `any` holds one
    fn select_mut(any: &mut AnyStft) -> Option<&mut Stft<Self>>;
}

impl Sample for f32 {
    const WIDTH: SampleWidth = SampleWidth::F32;

    #[inline]
    fn from_real(value: f64) -> Self {
        value as f32
    }

    fn select(any: &AnyStft) -> Option<&Stft<Self>> {
        match any {
            AnyStft::F32(stft) => Some(stft),
            AnyStft::F64(_) => None,
        }
    }

    fn select_mut(any: &mut AnyStft) -> Option<&mut Stft<Self>> {
        match any {
            AnyStft::F32(stft) => Some(stft),
            AnyStft::F64(_) => None,
        }
    }
}

impl Sample for f64 {
    const WIDTH: SampleWidth = SampleWidth::F64;

    #[inline]
    fn from_real(value: f64) -> Self {
        value
    }

    fn select(any: &AnyStft) -> Option<&Stft<Self>> {
        match any {
            AnyStft::F64(stft) => Some(stft),
            AnyStft::F32(_) => None,
        }
    }

    fn select_mut(any: &mut AnyStft) -> Option<&mut Stft<Self>> {
        match any {
            AnyStft::F64(stft) => Some(stft),
            AnyStft::F32(_) => None,
        }
    }
}
