//! Error types for filter design and analysis.
//!
//! All parameter validation happens at design time: a designer either
//! returns coefficients or one of the invalid-parameter variants below.
//! The application engine trusts designer output and never fails.

use thiserror::Error;

/// Errors that can occur during filter design or response analysis.
#[derive(Debug, Error)]
pub enum FilterError {
    /// Frequency is outside the open interval (0, Nyquist).
    #[error("invalid frequency: {freq} Hz (must be > 0 and < Nyquist frequency {nyquist} Hz)")]
    InvalidFrequency {
        /// The invalid frequency value
        freq: f64,
        /// The Nyquist frequency (sample_rate / 2)
        nyquist: f64,
    },

    /// Band edges are degenerate (lower edge not strictly below upper edge).
    #[error("invalid band: lower edge {low} Hz must be strictly below upper edge {high} Hz")]
    InvalidBand {
        /// Lower band edge in Hz
        low: f64,
        /// Upper band edge in Hz
        high: f64,
    },

    /// Filter order is invalid for the requested design.
    #[error("invalid filter order: {order} ({reason})")]
    InvalidOrder {
        /// The invalid order value
        order: usize,
        /// Why the order is rejected
        reason: &'static str,
    },

    /// FIR tap count is invalid for the requested design.
    #[error("invalid tap count: {numtaps} ({reason})")]
    InvalidTaps {
        /// The invalid tap count
        numtaps: usize,
        /// Why the tap count is rejected
        reason: &'static str,
    },

    /// Q factor is invalid (must be > 0).
    #[error("invalid Q factor: {q} (must be > 0)")]
    InvalidQ {
        /// The invalid Q value
        q: f64,
    },

    /// Gain value is invalid (non-finite).
    #[error("invalid gain: {gain_db} dB (must be finite)")]
    InvalidGain {
        /// The invalid gain value
        gain_db: f64,
    },

    /// Sample rate is invalid (must be > 0).
    #[error("invalid sample rate: {sample_rate} Hz (must be > 0)")]
    InvalidSampleRate {
        /// The invalid sample rate value
        sample_rate: f64,
    },

    /// Transition width is degenerate (must be > 0 and < Nyquist).
    #[error("invalid transition width: {width} Hz (must be > 0 and < Nyquist)")]
    InvalidTransitionWidth {
        /// The invalid transition width
        width: f64,
    },

    /// Passband ripple is invalid (must be > 0 dB).
    #[error("invalid passband ripple: {ripple_db} dB (must be > 0)")]
    InvalidRipple {
        /// The invalid ripple value
        ripple_db: f64,
    },

    /// Stopband attenuation is invalid for the requested design.
    #[error("invalid stopband attenuation: {attenuation_db} dB ({reason})")]
    InvalidAttenuation {
        /// The invalid attenuation value
        attenuation_db: f64,
        /// Why the attenuation is rejected
        reason: &'static str,
    },

    /// The (family, band) combination has no designer.
    #[error("unsupported design: {family} has no {band} form")]
    UnsupportedDesign {
        /// Filter family name
        family: &'static str,
        /// Band shape name
        band: &'static str,
    },

    /// An iterative numeric routine failed to converge.
    #[error("numerical instability: {context}")]
    NumericalInstability {
        /// Where the instability arose
        context: &'static str,
    },
}

/// A specialized `Result` type for filter operations.
pub type Result<T> = std::result::Result<T, FilterError>;

impl FilterError {
    /// Returns `true` if this error reports an invalid input parameter.
    pub fn is_invalid_parameter(&self) -> bool {
        !matches!(self, FilterError::NumericalInstability { .. })
    }

    /// Returns `true` if this is a frequency or band error.
    pub fn is_frequency_error(&self) -> bool {
        matches!(
            self,
            FilterError::InvalidFrequency { .. } | FilterError::InvalidBand { .. }
        )
    }

    /// Returns `true` if this error came from a failed numeric routine.
    pub fn is_numerical(&self) -> bool {
        matches!(self, FilterError::NumericalInstability { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FilterError::InvalidQ { q: -1.0 };
        assert_eq!(err.to_string(), "invalid Q factor: -1 (must be > 0)");
    }

    #[test]
    fn test_frequency_error_display() {
        let err = FilterError::InvalidFrequency {
            freq: 25000.0,
            nyquist: 24000.0,
        };
        assert!(err.to_string().contains("25000"));
        assert!(err.to_string().contains("24000"));
    }

    #[test]
    fn test_is_invalid_parameter() {
        let freq_err = FilterError::InvalidFrequency {
            freq: 0.0,
            nyquist: 24000.0,
        };
        let num_err = FilterError::NumericalInstability {
            context: "pole placement",
        };

        assert!(freq_err.is_invalid_parameter());
        assert!(freq_err.is_frequency_error());
        assert!(!num_err.is_invalid_parameter());
        assert!(num_err.is_numerical());
    }
}
