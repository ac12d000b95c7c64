//! Owned Spectrogram Output
//!
//! A detached copy of a computed transform that can be stored or sent
//! elsewhere. Encoded with postcard.

use crate::SpectrogramError;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Axes and values of one computed spectrogram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spectrogram<T> {
    /// Number of segments (rows)
    pub time_length: usize,
    /// Number of frequency bins (columns)
    pub freq_length: usize,
    /// Segment centre times (seconds)
    pub time: Vec<T>,
    /// Bin frequencies (Hz)
    pub freq: Vec<T>,
    /// Power spectral density, row-major by segment
    pub power: Vec<T>,
    /// Phase (radians), row-major by segment
    pub phase: Vec<T>,
}

impl<T> Spectrogram<T>
where
    T: Copy + PartialOrd + Serialize + DeserializeOwned,
{
    /// Serialize to postcard bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, SpectrogramError> {
        Ok(postcard::to_allocvec(self)?)
    }

    /// Deserialize from postcard bytes, checking that the shapes agree
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SpectrogramError> {
        let spectrogram: Self = postcard::from_bytes(bytes)?;
        spectrogram.check_shape()?;
        Ok(spectrogram)
    }

    fn check_shape(&self) -> Result<(), SpectrogramError> {
        let cells = self.time_length.checked_mul(self.freq_length);
        let consistent = self.time.len() == self.time_length
            && self.freq.len() == self.freq_length
            && Some(self.power.len()) == cells
            && Some(self.phase.len()) == cells;

        if consistent {
            Ok(())
        } else {
            Err(SpectrogramError::Encoding(format!(
                "shape {}x{} does not match time={}, freq={}, power={}, phase={}",
                self.time_length,
                self.freq_length,
                self.time.len(),
                self.freq.len(),
                self.power.len(),
                self.phase.len()
            )))
        }
    }

    /// Power of `bin` in `segment`
    pub fn power_at(&self, segment: usize, bin: usize) -> Option<T> {
        if bin >= self.freq_length {
            return None;
        }
        let index = segment.checked_mul(self.freq_length)?.checked_add(bin)?;
        self.power.get(index).copied()
    }

    /// Power row of one segment
    pub fn power_row(&self, segment: usize) -> Option<&[T]> {
        let start = segment.checked_mul(self.freq_length)?;
        let end = start.checked_add(self.freq_length)?;
        self.power.get(start..end)
    }

    /// Bin with the largest power in `segment`
    pub fn peak_bin(&self, segment: usize) -> Option<usize> {
        let row = self.power_row(segment)?;
        let mut peak: Option<(usize, T)> = None;
        for (bin, &value) in row.iter().enumerate() {
            if peak.map_or(true, |(_, best)| value > best) {
                peak = Some((bin, value));
            }
        }
        peak.map(|(bin, _)| bin)
    }
}
