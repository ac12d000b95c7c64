//! Derived Parameters
//!
//! Segment count, half-spectrum length, and the time/frequency axes.

use crate::config::PaddingMode;

/// Number of analysis segments for a signal.
///
/// `raw = (num_samples - window_length) / increment + 1`, floored under
/// [`PaddingMode::Truncate`] and ceiled (never below zero) under
/// [`PaddingMode::Pad`]. Computed in integers.
pub fn num_segments(
    num_samples: usize,
    window_length: usize,
    window_overlap: usize,
    padding_mode: PaddingMode,
) -> usize {
    let increment = window_length.saturating_sub(window_overlap).max(1);

    if num_samples >= window_length {
        let span = num_samples - window_length;
        return match padding_mode {
            PaddingMode::Truncate => span / increment + 1,
            PaddingMode::Pad => span.div_ceil(increment) + 1,
        };
    }

    match padding_mode {
        PaddingMode::Truncate => 0,
        // ceil(1 - shortfall / increment) is 1 while the shortfall is under one increment
        PaddingMode::Pad if window_length - num_samples < increment => 1,
        PaddingMode::Pad => 0,
    }
}

/// Length of the non-redundant half spectrum of a real FFT
pub fn num_frequencies(transform_length: usize) -> usize {
    if transform_length % 2 == 0 {
        transform_length / 2 + 1
    } else {
        (transform_length + 1) / 2
    }
}

/// Centre time of each segment (seconds)
pub fn time_vector(
    num_segments: usize,
    window_length: usize,
    window_overlap: usize,
    sample_rate: f64,
) -> Vec<f64> {
    let time_increment = (window_length - window_overlap) as f64 / sample_rate;
    let time_offset = (window_length as f64 - 1.0) / (2.0 * sample_rate);

    (0..num_segments)
        .map(|segment| segment as f64 * time_increment + time_offset)
        .collect()
}

/// Frequency of each half-spectrum bin (Hz)
pub fn frequency_vector(transform_length: usize, sample_rate: f64) -> Vec<f64> {
    let resolution = sample_rate / transform_length as f64;

    (0..num_frequencies(transform_length))
        .map(|bin| bin as f64 * resolution)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_num_segments_truncate() {
        assert_eq!(num_segments(4, 2, 1, PaddingMode::Truncate), 3);
        assert_eq!(num_segments(7, 3, 2, PaddingMode::Truncate), 5);
        assert_eq!(num_segments(10, 4, 1, PaddingMode::Truncate), 3);
        assert_eq!(num_segments(18, 6, 3, PaddingMode::Truncate), 5);
        assert_eq!(num_segments(3, 4, 1, PaddingMode::Truncate), 0);
        assert_eq!(num_segments(0, 4, 1, PaddingMode::Truncate), 0);
    }

    #[test]
    fn test_num_segments_pad() {
        // (11 - 4) / 3 + 1 = 3.33
        assert_eq!(num_segments(11, 4, 1, PaddingMode::Truncate), 3);
        assert_eq!(num_segments(11, 4, 1, PaddingMode::Pad), 4);
        // exact fit is the same under both modes
        assert_eq!(num_segments(10, 4, 1, PaddingMode::Pad), 3);
        // shorter than a window
        assert_eq!(num_segments(3, 4, 0, PaddingMode::Pad), 1);
        assert_eq!(num_segments(3, 4, 3, PaddingMode::Pad), 0);
        assert_eq!(num_segments(0, 4, 0, PaddingMode::Pad), 0);
    }

    #[test]
    fn test_num_frequencies() {
        assert_eq!(num_frequencies(2), 2);
        assert_eq!(num_frequencies(3), 2);
        assert_eq!(num_frequencies(4), 3);
        assert_eq!(num_frequencies(6), 4);
        assert_eq!(num_frequencies(16), 9);
        assert_eq!(num_frequencies(17), 9);
    }

    #[test]
    fn test_time_vector() {
        assert_eq!(time_vector(3, 2, 1, 1.0), vec![0.5, 1.5, 2.5]);
        assert_eq!(time_vector(5, 3, 2, 1.0), vec![1.0, 2.0, 3.0, 4.0, 5.0]);

        let time = time_vector(5, 6, 3, 10.0);
        for (t, expected) in time.iter().zip([0.25, 0.55, 0.85, 1.15, 1.45]) {
            assert!((t - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_frequency_vector() {
        assert_eq!(frequency_vector(2, 1.0), vec![0.0, 0.5]);
        assert_eq!(frequency_vector(3, 1.0), vec![0.0, 1.0 / 3.0]);

        let freq = frequency_vector(4, std::f64::consts::PI);
        assert_eq!(freq.len(), 3);
        assert!((freq[2] - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn prop_num_frequencies_formula(n in 2usize..10_000) {
            let nf = num_frequencies(n);
            if n % 2 == 0 {
                prop_assert_eq!(nf, n / 2 + 1);
            } else {
                prop_assert_eq!(nf, (n + 1) / 2);
            }
            prop_assert!(nf <= n);
        }

        #[test]
        fn prop_truncate_stays_in_range(
            num_samples in 0usize..2000,
            window_length in 2usize..256,
            overlap_frac in 0.0f64..1.0,
        ) {
            let window_overlap = ((window_length as f64 * overlap_frac) as usize).min(window_length - 1);
            let increment = window_length - window_overlap;
            let segments = num_segments(num_samples, window_length, window_overlap, PaddingMode::Truncate);
            if segments > 0 {
                let last = (segments - 1) * increment + window_length;
                prop_assert!(last <= num_samples);
                // one more segment would not fit
                prop_assert!(last + increment > num_samples);
            } else {
                prop_assert!(num_samples < window_length);
            }
        }

        #[test]
        fn prop_pad_covers_signal(
            num_samples in 1usize..2000,
            window_length in 2usize..256,
            overlap_frac in 0.0f64..1.0,
        ) {
            let window_overlap = ((window_length as f64 * overlap_frac) as usize).min(window_length - 1);
            let increment = window_length - window_overlap;
            let truncated = num_segments(num_samples, window_length, window_overlap, PaddingMode::Truncate);
            let padded = num_segments(num_samples, window_length, window_overlap, PaddingMode::Pad);
            prop_assert!(padded >= truncated);
            prop_assert!(padded <= truncated + 1);
            if padded > 0 {
                // the last padded segment starts inside the signal
                prop_assert!((padded - 1) * increment < num_samples);
            }
        }
    }
}
