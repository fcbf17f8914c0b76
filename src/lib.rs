//! Digital audio filter design and application.
//!
//! This crate converts high-level filter specifications (cutoff
//! frequency, order, ripple, attenuation, Q, gain) into stable digital
//! filter coefficients and applies them to sampled audio:
//!
//! - **FIR design**: windowed-sinc kernels with a Kaiser window
//!   ([`fir`]), plus Kaiser's order estimator.
//! - **IIR design**: Butterworth, Chebyshev I/II, elliptic and Bessel
//!   families ([`design`]), synthesized through analog prototypes and the
//!   bilinear transform, always emitted as second-order sections.
//! - **Analytic EQ**: peaking and shelving biquads ([`parametric_eq`],
//!   [`shelving_lowshelf`], [`shelving_highshelf`]).
//! - **Application**: whole-buffer convolution ([`apply_fir`]) and
//!   cascade filtering ([`apply_iir`]).
//! - **Analysis**: frequency response and group delay
//!   ([`frequency_response_sos`], [`group_delay_sos`] and the FIR
//!   equivalents).
//!
//! # Example
//!
//! ```rust
//! use filterlab::{butter_lowpass, apply_iir, parametric_eq};
//!
//! // 4th-order Butterworth lowpass at 1 kHz for 48 kHz audio
//! let sos = butter_lowpass(1000.0, 48000.0, 4).unwrap();
//! assert_eq!(sos.len(), 2);
//!
//! // Filter a buffer (here: silence stays silence)
//! let signal = vec![0.0_f64; 480];
//! let filtered = apply_iir(&signal, &sos);
//! assert_eq!(filtered.len(), 480);
//!
//! // +6 dB presence boost at 3 kHz
//! let boost = parametric_eq(3000.0, 6.0, 1.5, 48000.0).unwrap();
//! assert!((boost.magnitude_db_at(3000.0, 48000.0) - 6.0).abs() < 0.1);
//! ```
#![warn(missing_docs)]

mod apply;
mod biquad;
mod buffer;
pub mod design;
mod eq;
mod error;
pub mod fir;
mod response;
mod spec;
pub mod windows;

pub use apply::{apply_fir, apply_fir_buffer, apply_iir, apply_iir_buffer};
pub use biquad::{Biquad, SosCascade};
pub use buffer::AudioBuffer;
pub use design::{
    bessel_bandpass, bessel_highpass, bessel_lowpass, butter_bandpass, butter_bandstop,
    butter_highpass, butter_lowpass, butter_notch, cheby1_bandpass, cheby1_bandstop,
    cheby1_highpass, cheby1_lowpass, cheby2_bandstop, cheby2_highpass, cheby2_lowpass,
    ellip_bandstop, ellip_highpass, ellip_lowpass,
};
pub use eq::{parametric_eq, shelving_highshelf, shelving_lowshelf};
pub use error::{FilterError, Result};
pub use fir::{adaptive_numtaps, FirKernel};
pub use response::{
    frequency_response_fir, frequency_response_sos, group_delay_fir, group_delay_sos,
    magnitude_db, phase,
};
pub use spec::{design as design_spec, DesignMethod, DesignedFilter, FilterBand, FilterSpec};

// Defaults matching the interactive tool's design surface

/// Default FIR tap count
pub const DEFAULT_NUMTAPS: usize = 129;
/// Default Kaiser window shape parameter
pub const DEFAULT_KAISER_BETA: f64 = 8.0;
/// Default IIR filter order
pub const DEFAULT_ORDER: usize = 6;
/// Default Chebyshev/elliptic passband ripple in dB
pub const DEFAULT_RIPPLE_DB: f64 = 0.5;
/// Default stopband attenuation in dB
pub const DEFAULT_ATTENUATION_DB: f64 = 40.0;
/// Default shelving filter slope (Butterworth-like shelf)
pub const DEFAULT_SHELF_Q: f64 = std::f64::consts::FRAC_1_SQRT_2;

/// Converts a gain in dB to a linear amplitude factor.
pub fn db_to_linear(db: f64) -> f64 {
    10.0_f64.powf(db / 20.0)
}

/// Converts a linear amplitude factor to dB, floored at -400 dB.
pub fn linear_to_db(amplitude: f64) -> f64 {
    20.0 * amplitude.abs().max(1.0e-20).log10()
}
