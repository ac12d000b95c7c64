//! Batched Real-to-Halfcomplex FFT
//!
//! Rows of a flat buffer are transformed in place and left in halfcomplex
//! order: `r0, r1, ..., r(n/2), i((n+1)/2 - 1), ..., i1`, where `rk`/`ik` are
//! the real/imaginary parts of bin `k` under the forward convention
//! `X(k) = sum x(j) exp(-2 pi i jk / n)`.

use crate::Sample;
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;
use tracing::debug;

/// Batched, in-place, real-input FFT of a fixed length
pub trait FftEngine<T>: Send + Sync {
    /// Transform length of every row
    fn len(&self) -> usize;

    /// Transform every `len()`-sized row of `buffer` to halfcomplex order.
    ///
    /// `buffer.len()` must be a multiple of `len()`.
    fn execute(&mut self, buffer: &mut [T]);
}

/// [`FftEngine`] backed by a `rustfft` forward plan owned by the instance
#[derive(Clone)]
pub struct RustFftEngine<T: Sample> {
    /// Forward complex plan
    plan: Arc<dyn Fft<T>>,
    /// Complex copy of all rows, transformed together
    work: Vec<Complex<T>>,
    /// Plan scratch space
    scratch: Vec<Complex<T>>,
}

impl<T: Sample> RustFftEngine<T> {
    /// Plan a transform of `len` points over `rows` rows
    pub fn new(len: usize, rows: usize) -> Self {
        let mut planner = FftPlanner::new();
        let plan = planner.plan_fft_forward(len);
        let scratch = vec![Complex::new(T::zero(), T::zero()); plan.get_inplace_scratch_len()];

        debug!("Planned {}-point forward FFT over {} rows", len, rows);

        Self {
            plan,
            work: vec![Complex::new(T::zero(), T::zero()); len * rows],
            scratch,
        }
    }
}

impl<T: Sample> FftEngine<T> for RustFftEngine<T> {
    fn len(&self) -> usize {
        self.plan.len()
    }

    fn execute(&mut self, buffer: &mut [T]) {
        let n = self.plan.len();
        if buffer.is_empty() || n == 0 {
            return;
        }
        debug_assert_eq!(buffer.len() % n, 0);

        self.work
            .resize(buffer.len(), Complex::new(T::zero(), T::zero()));
        for (w, &x) in self.work.iter_mut().zip(buffer.iter()) {
            *w = Complex::new(x, T::zero());
        }

        // rustfft processes every len-sized chunk of the buffer
        self.plan
            .process_with_scratch(&mut self.work, &mut self.scratch);

        for (row, spectrum) in buffer.chunks_exact_mut(n).zip(self.work.chunks_exact(n)) {
            pack_halfcomplex(spectrum, row);
        }
    }
}

/// Write the non-redundant half of a full complex spectrum in halfcomplex order
fn pack_halfcomplex<T: Sample>(spectrum: &[Complex<T>], row: &mut [T]) {
    let n = row.len();

    for k in 0..=n / 2 {
        row[k] = spectrum[k].re;
    }
    for k in 1..(n + 1) / 2 {
        row[n - k] = spectrum[k].im;
    }
}
