//! Segmentation and Windowing
//!
//! Copies weighted, possibly overlapping segments of a strided signal into
//! the rows of the FFT buffer.

use crate::Sample;

/// Geometry of the segment rows inside the FFT buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentLayout {
    /// Logical samples in the signal
    pub num_samples: usize,
    /// Element distance between logical samples
    pub stride: usize,
    /// Samples between segment starts
    pub increment: usize,
    /// Row length (window plus zero padding)
    pub transform_length: usize,
}

/// Fill `buffer` with one windowed segment per row.
///
/// The buffer is zeroed first, so the tail of every row past the window is
/// FFT zero padding. Samples at or past `num_samples` (the final segment
/// under [`crate::PaddingMode::Pad`]) are read as zero. `signal` must hold
/// `(num_samples - 1) * stride + 1` elements.
pub fn fill<T: Sample>(buffer: &mut [T], signal: &[T], window: &[T], layout: &SegmentLayout) {
    buffer.fill(T::zero());
    if layout.transform_length == 0 {
        return;
    }

    for (segment, row) in buffer.chunks_exact_mut(layout.transform_length).enumerate() {
        let start = segment * layout.increment;
        let available = layout.num_samples.saturating_sub(start).min(window.len());

        for (j, (out, &weight)) in row.iter_mut().zip(window).take(available).enumerate() {
            *out = weight * signal[layout.stride * (start + j)];
        }
    }
}
