//! Mono audio buffer.
//!
//! The core consumes already-decoded mono floating-point samples; WAV
//! decoding/encoding, channel mixdown and playback live outside this
//! crate. Samples are typically in [-1, 1] but the range is not enforced.

use crate::error::{FilterError, Result};

/// A mono sequence of samples plus its sample rate.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AudioBuffer {
    samples: Vec<f64>,
    sample_rate: u32,
}

impl AudioBuffer {
    /// Creates a buffer. Fails on a zero sample rate.
    pub fn new(samples: Vec<f64>, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(FilterError::InvalidSampleRate { sample_rate: 0.0 });
        }
        Ok(AudioBuffer {
            samples,
            sample_rate,
        })
    }

    pub(crate) fn from_filtered(samples: Vec<f64>, sample_rate: u32) -> Self {
        AudioBuffer {
            samples,
            sample_rate,
        }
    }

    /// Returns the samples.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Returns the sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Returns the sample rate as f64, the form the designers take.
    pub fn sample_rate_hz(&self) -> f64 {
        f64::from(self.sample_rate)
    }

    /// Returns the number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` if the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Buffer duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }

    /// Largest absolute sample value (0.0 for an empty buffer).
    pub fn peak(&self) -> f64 {
        self.samples.iter().fold(0.0, |acc, &s| acc.max(s.abs()))
    }

    /// Scales the buffer so its peak is 1.0. Silence is left untouched.
    ///
    /// The application engine never rescales its output; this is the
    /// caller-side normalization the surrounding tool applies before
    /// writing a WAV.
    pub fn normalize_peak(&mut self) {
        let peak = self.peak();
        if peak > 0.0 {
            for s in &mut self.samples {
                *s /= peak;
            }
        }
    }
}
