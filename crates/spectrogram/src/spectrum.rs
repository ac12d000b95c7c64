//! Spectrum Extraction
//!
//! Power, phase and periodogram values read from a buffer of halfcomplex
//! rows. Bin 0 carries no imaginary part. For even transform lengths the last
//! bin is the true Nyquist bin and carries none either; for odd lengths it is
//! an ordinary bin.

use crate::config::PhaseAggregation;
use crate::Sample;

/// Read-only view of halfcomplex spectra
#[derive(Debug, Clone, Copy)]
pub struct SpectrumView<'a, T> {
    spectra: &'a [T],
    transform_length: usize,
    num_frequencies: usize,
    scale: T,
}

impl<'a, T: Sample> SpectrumView<'a, T> {
    /// View `spectra` as rows of `transform_length` halfcomplex values
    pub fn new(spectra: &'a [T], transform_length: usize, num_frequencies: usize, scale: T) -> Self {
        Self {
            spectra,
            transform_length,
            num_frequencies,
            scale,
        }
    }

    /// Number of rows (segments) in the view
    pub fn num_rows(&self) -> usize {
        if self.transform_length == 0 {
            0
        } else {
            self.spectra.len() / self.transform_length
        }
    }

    fn rows(&self) -> impl Iterator<Item = &'a [T]> {
        self.spectra.chunks_exact(self.transform_length.max(1))
    }

    /// Whether `bin` has no imaginary part
    #[inline]
    fn is_real_bin(&self, bin: usize) -> bool {
        bin == 0 || (bin == self.num_frequencies - 1 && self.transform_length % 2 == 0)
    }

    #[inline]
    fn real_imag(&self, row: &[T], bin: usize) -> (T, T) {
        (row[bin], row[self.transform_length - bin])
    }

    /// Single-sided power of one bin; interior bins fold in the negative frequency
    #[inline]
    fn bin_power(&self, row: &[T], bin: usize) -> T {
        if self.is_real_bin(bin) {
            let real = row[bin];
            real * real * self.scale
        } else {
            let (real, imag) = self.real_imag(row, bin);
            let two = T::one() + T::one();
            (real * real + imag * imag) * two * self.scale
        }
    }

    #[inline]
    fn bin_phase(&self, row: &[T], bin: usize) -> T {
        if self.is_real_bin(bin) {
            T::zero()
        } else {
            let (real, imag) = self.real_imag(row, bin);
            imag.atan2(real)
        }
    }

    /// Write `num_rows * num_frequencies` power values, row-major by segment
    pub fn power(&self, out: &mut [T]) {
        for (row, dest) in self.rows().zip(out.chunks_exact_mut(self.num_frequencies)) {
            for (bin, value) in dest.iter_mut().enumerate() {
                *value = self.bin_power(row, bin);
            }
        }
    }

    /// Write `num_rows * num_frequencies` phase values (radians), row-major by segment
    pub fn phase(&self, out: &mut [T]) {
        for (row, dest) in self.rows().zip(out.chunks_exact_mut(self.num_frequencies)) {
            for (bin, value) in dest.iter_mut().enumerate() {
                *value = self.bin_phase(row, bin);
            }
        }
    }

    /// Write the per-bin power summed over all rows
    pub fn power_periodogram(&self, out: &mut [T]) {
        let out = &mut out[..self.num_frequencies];
        out.fill(T::zero());

        for row in self.rows() {
            for (bin, value) in out.iter_mut().enumerate() {
                *value = *value + self.bin_power(row, bin);
            }
        }
    }

    /// Write one phase per bin combined across rows.
    ///
    /// Bin 0 and the last bin are left at zero.
    pub fn phase_periodogram(&self, out: &mut [T], aggregation: PhaseAggregation) {
        let out = &mut out[..self.num_frequencies];
        out.fill(T::zero());
        let interior = 1..self.num_frequencies - 1;

        match aggregation {
            PhaseAggregation::LastSegment => {
                if let Some(row) = self.rows().last() {
                    for bin in interior {
                        let (real, imag) = self.real_imag(row, bin);
                        out[bin] = imag.atan2(real);
                    }
                }
            }
            PhaseAggregation::CircularMean => {
                for bin in interior {
                    let (mut sum_cos, mut sum_sin) = (T::zero(), T::zero());
                    for row in self.rows() {
                        let (real, imag) = self.real_imag(row, bin);
                        if real == T::zero() && imag == T::zero() {
                            continue;
                        }
                        let angle = imag.atan2(real);
                        sum_cos = sum_cos + angle.cos();
                        sum_sin = sum_sin + angle.sin();
                    }
                    out[bin] = sum_sin.atan2(sum_cos);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Halfcomplex rows for n = 4: r0, r1, r2, i1
    fn even_rows() -> Vec<f64> {
        vec![
            2.0, 1.0, 3.0, 1.0, //
            -2.0, 0.0, 1.0, -1.0,
        ]
    }

    #[test]
    fn test_power_even_length() {
        let spectra = even_rows();
        let view = SpectrumView::new(&spectra, 4, 3, 0.5);
        assert_eq!(view.num_rows(), 2);

        let mut power = vec![0.0; 6];
        view.power(&mut power);
        // bin 0: r^2 s; bin 1: (r^2 + i^2) 2 s; Nyquist: r^2 s
        assert_eq!(power, vec![2.0, 2.0, 4.5, 2.0, 1.0, 0.5]);
    }

    #[test]
    fn test_power_odd_length_last_bin_is_complex() {
        // n = 3: r0, r1, i1
        let spectra = vec![6.0, -1.5, 0.75f64.sqrt()];
        let view = SpectrumView::new(&spectra, 3, 2, 1.0 / 9.0);
        let mut power = vec![0.0; 2];
        view.power(&mut power);
        assert!((power[0] - 4.0).abs() < 1e-12);
        // (2.25 + 0.75) * 2 / 9
        assert!((power[1] - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_phase() {
        let spectra = even_rows();
        let view = SpectrumView::new(&spectra, 4, 3, 1.0);
        let mut phase = vec![9.0; 6];
        view.phase(&mut phase);
        assert_eq!(phase[0], 0.0);
        assert!((phase[1] - std::f64::consts::FRAC_PI_4).abs() < 1e-12);
        assert_eq!(phase[2], 0.0);
        assert_eq!(phase[3], 0.0);
        // atan2(-1, 0)
        assert!((phase[4] + std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert_eq!(phase[5], 0.0);

        let odd = vec![6.0, -1.5, 0.75f64.sqrt()];
        let mut phase = vec![9.0; 2];
        SpectrumView::new(&odd, 3, 2, 1.0).phase(&mut phase);
        assert_eq!(phase[0], 0.0);
        assert!((phase[1] - 2.617_993_877_991_494).abs() < 1e-12);
    }

    #[test]
    fn test_power_periodogram_sums_rows() {
        let spectra = even_rows();
        let view = SpectrumView::new(&spectra, 4, 3, 0.5);
        let mut periodogram = vec![7.0; 3];
        view.power_periodogram(&mut periodogram);
        assert_eq!(periodogram, vec![4.0, 3.0, 5.0]);
    }

    #[test]
    fn test_phase_periodogram_last_segment() {
        let spectra = even_rows();
        let view = SpectrumView::new(&spectra, 4, 3, 1.0);
        let mut periodogram = vec![7.0; 3];
        view.phase_periodogram(&mut periodogram, PhaseAggregation::LastSegment);
        assert_eq!(periodogram[0], 0.0);
        assert!((periodogram[1] + std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert_eq!(periodogram[2], 0.0);
    }

    #[test]
    fn test_phase_periodogram_circular_mean() {
        // phases pi/4 and -pi/2 average to atan2(sin, cos) of the phasor sum
        let spectra = even_rows();
        let view = SpectrumView::new(&spectra, 4, 3, 1.0);
        let mut periodogram = vec![7.0; 3];
        view.phase_periodogram(&mut periodogram, PhaseAggregation::CircularMean);

        let half = std::f64::consts::FRAC_1_SQRT_2;
        let expected = (half - 1.0).atan2(half);
        assert!((periodogram[1] - expected).abs() < 1e-12);
        assert_eq!(periodogram[0], 0.0);
        assert_eq!(periodogram[2], 0.0);
    }

    #[test]
    fn test_empty_view() {
        let spectra: Vec<f64> = Vec::new();
        let view = SpectrumView::new(&spectra, 4, 3, 1.0);
        assert_eq!(view.num_rows(), 0);

        let mut power: Vec<f64> = Vec::new();
        view.power(&mut power);

        let mut periodogram = vec![5.0; 3];
        view.power_periodogram(&mut periodogram);
        assert_eq!(periodogram, vec![0.0; 3]);
        periodogram.fill(5.0);
        view.phase_periodogram(&mut periodogram, PhaseAggregation::LastSegment);
        assert_eq!(periodogram, vec![0.0; 3]);
    }
}
