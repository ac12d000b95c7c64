//! Window Coefficient Generation
//!
//! Symmetric weighting functions applied to each segment before the FFT,
//! and the power scale factor derived from them.

use crate::SpectrogramError;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::str::FromStr;

/// Weighting function applied to every segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowKind {
    /// Boxcar, all ones
    Rectangular,
    /// Triangle with non-zero end points
    Triangular,
    /// Triangle with zero end points
    Bartlett,
    /// Raised cosine
    Hann,
    /// Parabolic
    Welch,
    /// Raised cosine with the 25/46 optimal alpha
    #[default]
    Hamming,
    /// Exact Blackman, 3 terms
    Blackman,
    /// Nuttall, 4 terms, continuous first derivative
    Nuttall,
    /// Blackman-Nuttall, 4 terms
    BlackmanNuttall,
    /// Blackman-Harris, 4 terms
    BlackmanHarris,
}

impl WindowKind {
    /// All kinds, in C enum order
    pub const ALL: [WindowKind; 10] = [
        WindowKind::Rectangular,
        WindowKind::Triangular,
        WindowKind::Bartlett,
        WindowKind::Hann,
        WindowKind::Welch,
        WindowKind::Hamming,
        WindowKind::Blackman,
        WindowKind::Nuttall,
        WindowKind::BlackmanNuttall,
        WindowKind::BlackmanHarris,
    ];

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            WindowKind::Rectangular => "rectangular",
            WindowKind::Triangular => "triangular",
            WindowKind::Bartlett => "bartlett",
            WindowKind::Hann => "hann",
            WindowKind::Welch => "welch",
            WindowKind::Hamming => "hamming",
            WindowKind::Blackman => "blackman",
            WindowKind::Nuttall => "nuttall",
            WindowKind::BlackmanNuttall => "blackman_nuttall",
            WindowKind::BlackmanHarris => "blackman_harris",
        }
    }

    /// Cosine-sum weights `a0 - a1 cos(x) + a2 cos(2x) - a3 cos(3x)`, if this
    /// kind is a cosine-sum window
    fn cosine_terms(&self) -> Option<[f64; 4]> {
        match self {
            WindowKind::Hann => Some([0.5, 0.5, 0.0, 0.0]),
            WindowKind::Hamming => Some([25.0 / 46.0, 21.0 / 46.0, 0.0, 0.0]),
            WindowKind::Blackman => Some([
                7938.0 / 18608.0,
                9240.0 / 18608.0,
                1430.0 / 18608.0,
                0.0,
            ]),
            WindowKind::Nuttall => Some([0.355768, 0.487396, 0.144232, 0.012604]),
            WindowKind::BlackmanNuttall => Some([0.3635819, 0.4891775, 0.1365995, 0.0106411]),
            WindowKind::BlackmanHarris => Some([0.35875, 0.48829, 0.14128, 0.01168]),
            _ => None,
        }
    }
}

impl TryFrom<i64> for WindowKind {
    type Error = SpectrogramError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        usize::try_from(code)
            .ok()
            .and_then(|idx| Self::ALL.get(idx).copied())
            .ok_or_else(|| SpectrogramError::UnknownWindow(code.to_string()))
    }
}

impl FromStr for WindowKind {
    type Err = SpectrogramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| SpectrogramError::UnknownWindow(s.to_string()))
    }
}

/// Generate `length` coefficients of the given window.
///
/// Lengths below 2 are the caller's responsibility; [`crate::TransformConfig`]
/// clamps them before a transform ever calls this.
pub fn generate(length: usize, kind: WindowKind) -> Vec<f64> {
    let mut coefs = vec![0.0; length];
    if length == 0 {
        return coefs;
    }
    let len = length as f64;
    let mult = 2.0 * PI / (len - 1.0);

    match kind {
        WindowKind::Rectangular => coefs.fill(1.0),
        WindowKind::Triangular => {
            for i in 0..length.div_ceil(2) {
                let step = (i + 1) as f64;
                coefs[i] = if length % 2 == 0 {
                    (2.0 * step - 1.0) / len
                } else {
                    2.0 * step / (len + 1.0)
                };
                coefs[length - i - 1] = coefs[i];
            }
        }
        WindowKind::Bartlett => {
            let x = (len - 1.0) / 2.0;
            for (i, c) in coefs.iter_mut().enumerate() {
                *c = 1.0 - ((i as f64 - x) / x).abs();
            }
        }
        WindowKind::Welch => {
            let x = (len - 1.0) / 2.0;
            for (i, c) in coefs.iter_mut().enumerate() {
                let r = (i as f64 - x) / x;
                *c = 1.0 - r * r;
            }
        }
        _ => {
            // every remaining kind is a cosine sum
            let [a0, a1, a2, a3] = kind.cosine_terms().unwrap_or([1.0, 0.0, 0.0, 0.0]);
            for (i, c) in coefs.iter_mut().enumerate() {
                let x = i as f64 * mult;
                *c = a0 - a1 * x.cos() + a2 * (2.0 * x).cos() - a3 * (3.0 * x).cos();
            }
        }
    }

    coefs
}

/// Sum of squared coefficients
pub fn energy(coefs: &[f64]) -> f64 {
    coefs.iter().map(|c| c * c).sum()
}

/// Power scale factor `1 / (sample_rate * sum(coef^2))`.
///
/// Compensates for the energy removed by the window and converts raw FFT
/// energy to density per Hz.
pub fn scale_factor(coefs: &[f64], sample_rate: f64) -> f64 {
    1.0 / (sample_rate * energy(coefs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn max_error(a: &[f64], b: &[f64]) -> f64 {
        assert_eq!(a.len(), b.len());
        a.iter()
            .zip(b)
            .map(|(x, y)| (x - y).abs())
            .fold(0.0, f64::max)
    }

    #[test]
    fn test_rectangular_all_ones() {
        assert_eq!(generate(2, WindowKind::Rectangular), vec![1.0, 1.0]);
        assert_eq!(generate(5, WindowKind::Rectangular), vec![1.0; 5]);
    }

    #[test]
    fn test_triangular_even() {
        let expected = [
            0.0625, 0.1875, 0.3125, 0.4375, 0.5625, 0.6875, 0.8125, 0.9375, 0.9375, 0.8125, 0.6875,
            0.5625, 0.4375, 0.3125, 0.1875, 0.0625,
        ];
        assert!(max_error(&generate(16, WindowKind::Triangular), &expected) < 1e-6);
    }

    #[test]
    fn test_triangular_odd() {
        let expected = [
            0.111111, 0.222222, 0.333333, 0.444444, 0.555556, 0.666667, 0.777778, 0.888889,
            1.000000, 0.888889, 0.777778, 0.666667, 0.555556, 0.444444, 0.333333, 0.222222,
            0.111111,
        ];
        assert!(max_error(&generate(17, WindowKind::Triangular), &expected) < 1e-6);
    }

    #[test]
    fn test_hamming_even() {
        let expected = [
            0.086957, 0.126425, 0.238006, 0.402405, 0.591198, 0.771739, 0.912812, 0.990024,
            0.990024, 0.912812, 0.771739, 0.591198, 0.402405, 0.238006, 0.126425, 0.086957,
        ];
        assert!(max_error(&generate(16, WindowKind::Hamming), &expected) < 1e-6);
    }

    #[test]
    fn test_hamming_odd() {
        let expected = [
            0.086957, 0.121707, 0.220669, 0.368775, 0.543478, 0.718182, 0.866288, 0.965249,
            1.000000, 0.965249, 0.866288, 0.718182, 0.543478, 0.368775, 0.220669, 0.121707,
            0.086957,
        ];
        assert!(max_error(&generate(17, WindowKind::Hamming), &expected) < 1e-6);
    }

    #[test]
    fn test_bartlett_zero_endpoints() {
        let coefs = generate(5, WindowKind::Bartlett);
        assert!(max_error(&coefs, &[0.0, 0.5, 1.0, 0.5, 0.0]) < 1e-12);
    }

    #[test]
    fn test_welch_and_hann_shape() {
        let welch = generate(5, WindowKind::Welch);
        assert!(max_error(&welch, &[0.0, 0.75, 1.0, 0.75, 0.0]) < 1e-12);

        let hann = generate(5, WindowKind::Hann);
        assert!(max_error(&hann, &[0.0, 0.5, 1.0, 0.5, 0.0]) < 1e-12);
    }

    #[test]
    fn test_blackman_family_peak_near_one() {
        for kind in [
            WindowKind::Blackman,
            WindowKind::Nuttall,
            WindowKind::BlackmanNuttall,
            WindowKind::BlackmanHarris,
        ] {
            let coefs = generate(9, kind);
            assert!((coefs[4] - 1.0).abs() < 1e-3, "{:?} peak = {}", kind, coefs[4]);
            assert!(coefs[0] < 0.01, "{:?} edge = {}", kind, coefs[0]);
        }
    }

    #[test]
    fn test_two_point_windows() {
        // end points of these kinds are both zero
        for kind in [WindowKind::Hann, WindowKind::Welch, WindowKind::Bartlett, WindowKind::Nuttall] {
            assert!(energy(&generate(2, kind)) < 1e-12, "{:?}", kind);
        }
        assert!(energy(&generate(2, WindowKind::Blackman)) > 0.0);
        assert!(energy(&generate(3, WindowKind::Hann)) > 0.0);
    }

    #[test]
    fn test_scale_factor() {
        let coefs = generate(4, WindowKind::Rectangular);
        assert!((scale_factor(&coefs, 2.0) - 0.125).abs() < 1e-15);
    }

    #[test]
    fn test_kind_codes() {
        assert_eq!(WindowKind::try_from(0).unwrap(), WindowKind::Rectangular);
        assert_eq!(WindowKind::try_from(5).unwrap(), WindowKind::Hamming);
        assert_eq!(WindowKind::try_from(9).unwrap(), WindowKind::BlackmanHarris);
        assert!(matches!(
            WindowKind::try_from(10),
            Err(SpectrogramError::UnknownWindow(_))
        ));
        assert!(WindowKind::try_from(-1).is_err());
        assert_eq!(WindowKind::default(), WindowKind::Hamming);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!("hann".parse::<WindowKind>().unwrap(), WindowKind::Hann);
        assert_eq!(
            "Blackman-Harris".parse::<WindowKind>().unwrap(),
            WindowKind::BlackmanHarris
        );
        assert!("kaiser".parse::<WindowKind>().is_err());
    }

    proptest! {
        #[test]
        fn prop_symmetric(length in 2usize..300, idx in 0usize..10) {
            let kind = WindowKind::ALL[idx];
            let coefs = generate(length, kind);
            for i in 0..length {
                prop_assert!((coefs[i] - coefs[length - 1 - i]).abs() < 1e-9,
                    "{:?} len={} i={}", kind, length, i);
            }
        }

        #[test]
        fn prop_scale_factor_identity(length in 3usize..300, idx in 0usize..10, fs in 0.1f64..48000.0) {
            let coefs = generate(length, WindowKind::ALL[idx]);
            let energy: f64 = coefs.iter().map(|c| c * c).sum();
            prop_assert!(energy > 0.0);
            let scale = scale_factor(&coefs, fs);
            prop_assert!((scale * fs * energy - 1.0).abs() < 1e-9);
        }
    }
}
