//! Analytic audio-EQ biquads: peaking and shelving filters.
//!
//! These are closed-form designs from the Audio EQ Cookbook
//! (Robert Bristow-Johnson); no iterative synthesis is involved. Each
//! function returns a single-section [`SosCascade`].

use std::f64::consts::PI;

use crate::biquad::{Biquad, SosCascade};
use crate::error::{FilterError, Result};

struct EqParams {
    a: f64,
    w0: f64,
}

fn validate_eq(freq: f64, gain_db: f64, q_factor: f64, fs: f64) -> Result<EqParams> {
    if fs <= 0.0 || !fs.is_finite() {
        return Err(FilterError::InvalidSampleRate { sample_rate: fs });
    }
    let nyquist = fs / 2.0;
    if freq <= 0.0 || freq >= nyquist || !freq.is_finite() {
        return Err(FilterError::InvalidFrequency { freq, nyquist });
    }
    if q_factor <= 0.0 || !q_factor.is_finite() {
        return Err(FilterError::InvalidQ { q: q_factor });
    }
    if !gain_db.is_finite() {
        return Err(FilterError::InvalidGain { gain_db });
    }
    Ok(EqParams {
        a: 10.0_f64.powf(gain_db / 40.0),
        w0: 2.0 * PI * freq / fs,
    })
}

/// Designs a parametric equalizer (peaking filter).
///
/// Boosts or cuts around `center_freq`; the bandwidth is
/// `center_freq / q_factor`. A gain of 0 dB collapses to an
/// identity-equivalent section.
///
/// # Arguments
/// * `center_freq` - Center frequency in Hz
/// * `gain_db` - Gain in dB (positive = boost, negative = cut)
/// * `q_factor` - Quality factor (must be > 0)
/// * `fs` - Sampling frequency in Hz
pub fn parametric_eq(center_freq: f64, gain_db: f64, q_factor: f64, fs: f64) -> Result<SosCascade> {
    let EqParams { a, w0 } = validate_eq(center_freq, gain_db, q_factor, fs)?;
    let alpha = w0.sin() / (2.0 * q_factor);
    let cs = w0.cos();

    let b0 = 1.0 + alpha * a;
    let b1 = -2.0 * cs;
    let b2 = 1.0 - alpha * a;
    let a0 = 1.0 + alpha / a;
    let a1 = -2.0 * cs;
    let a2 = 1.0 - alpha / a;

    Ok(SosCascade::from_section(Biquad::from_unnormalized(
        b0, b1, b2, a0, a1, a2,
    )?))
}

/// Designs a low-shelf filter (boost/cut below the cutoff).
///
/// # Arguments
/// * `cutoff` - Shelf corner frequency in Hz
/// * `gain_db` - Shelf gain in dB
/// * `fs` - Sampling frequency in Hz
/// * `q_factor` - Shelf slope control (0.707 gives the steepest
///   monotonic shelf)
pub fn shelving_lowshelf(cutoff: f64, gain_db: f64, fs: f64, q_factor: f64) -> Result<SosCascade> {
    let EqParams { a, w0 } = validate_eq(cutoff, gain_db, q_factor, fs)?;
    let cs = w0.cos();
    let alpha = w0.sin() / 2.0 * ((a + 1.0 / a) * (1.0 / q_factor - 1.0) + 2.0).sqrt();
    let two_sqrt_a_alpha = 2.0 * a.sqrt() * alpha;

    let b0 = a * ((a + 1.0) - (a - 1.0) * cs + two_sqrt_a_alpha);
    let b1 = 2.0 * a * ((a - 1.0) - (a + 1.0) * cs);
    let b2 = a * ((a + 1.0) - (a - 1.0) * cs - two_sqrt_a_alpha);
    let a0 = (a + 1.0) + (a - 1.0) * cs + two_sqrt_a_alpha;
    let a1 = -2.0 * ((a - 1.0) + (a + 1.0) * cs);
    let a2 = (a + 1.0) + (a - 1.0) * cs - two_sqrt_a_alpha;

    Ok(SosCascade::from_section(Biquad::from_unnormalized(
        b0, b1, b2, a0, a1, a2,
    )?))
}

/// Designs a high-shelf filter (boost/cut above the cutoff).
///
/// # Arguments
/// * `cutoff` - Shelf corner frequency in Hz
/// * `gain_db` - Shelf gain in dB
/// * `fs` - Sampling frequency in Hz
/// * `q_factor` - Shelf slope control
pub fn shelving_highshelf(cutoff: f64, gain_db: f64, fs: f64, q_factor: f64) -> Result<SosCascade> {
    let EqParams { a, w0 } = validate_eq(cutoff, gain_db, q_factor, fs)?;
    let cs = w0.cos();
    let alpha = w0.sin() / 2.0 * ((a + 1.0 / a) * (1.0 / q_factor - 1.0) + 2.0).sqrt();
    let two_sqrt_a_alpha = 2.0 * a.sqrt() * alpha;

    let b0 = a * ((a + 1.0) + (a - 1.0) * cs + two_sqrt_a_alpha);
    let b1 = -2.0 * a * ((a - 1.0) + (a + 1.0) * cs);
    let b2 = a * ((a + 1.0) + (a - 1.0) * cs - two_sqrt_a_alpha);
    let a0 = (a + 1.0) - (a - 1.0) * cs + two_sqrt_a_alpha;
    let a1 = 2.0 * ((a - 1.0) - (a + 1.0) * cs);
    let a2 = (a + 1.0) - (a - 1.0) * cs - two_sqrt_a_alpha;

    Ok(SosCascade::from_section(Biquad::from_unnormalized(
        b0, b1, b2, a0, a1, a2,
    )?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn test_peak_gain_at_center() {
        let sos = parametric_eq(1000.0, 6.0, 2.0, 48000.0).unwrap();
        assert_eq!(sos.len(), 1);
        assert!(approx_eq(sos.magnitude_db_at(1000.0, 48000.0), 6.0, 0.01));
    }

    #[test]
    fn test_peak_cut_at_center() {
        let sos = parametric_eq(500.0, -6.0, 1.5, 48000.0).unwrap();
        assert!(approx_eq(sos.magnitude_db_at(500.0, 48000.0), -6.0, 0.01));
    }

    #[test]
    fn test_zero_gain_is_identity() {
        let sos = parametric_eq(1000.0, 0.0, 2.0, 48000.0).unwrap();
        for freq in [20.0, 200.0, 1000.0, 5000.0, 20000.0] {
            assert!(
                approx_eq(sos.magnitude_db_at(freq, 48000.0), 0.0, 1e-9),
                "zero-gain peak should be flat at {} Hz",
                freq
            );
        }
        let shelf = shelving_lowshelf(200.0, 0.0, 48000.0, 0.707).unwrap();
        for freq in [20.0, 200.0, 1000.0, 5000.0] {
            assert!(approx_eq(shelf.magnitude_db_at(freq, 48000.0), 0.0, 1e-9));
        }
    }

    #[test]
    fn test_lowshelf_boosts_bass_only() {
        let sos = shelving_lowshelf(200.0, 6.0, 48000.0, 0.707).unwrap();
        assert!(approx_eq(sos.magnitude_db_at(10.0, 48000.0), 6.0, 0.2));
        assert!(approx_eq(sos.magnitude_db_at(10000.0, 48000.0), 0.0, 0.2));
        // Half the shelf gain at the corner
        assert!(approx_eq(sos.magnitude_db_at(200.0, 48000.0), 3.0, 0.5));
    }

    #[test]
    fn test_highshelf_cuts_treble_only() {
        let sos = shelving_highshelf(5000.0, -6.0, 48000.0, 0.707).unwrap();
        assert!(approx_eq(sos.magnitude_db_at(20000.0, 48000.0), -6.0, 0.3));
        assert!(approx_eq(sos.magnitude_db_at(100.0, 48000.0), 0.0, 0.2));
    }

    #[test]
    fn test_invalid_parameters_fail_fast() {
        assert!(matches!(
            parametric_eq(1000.0, 6.0, 0.0, 48000.0),
            Err(FilterError::InvalidQ { .. })
        ));
        assert!(matches!(
            parametric_eq(1000.0, 6.0, -1.0, 48000.0),
            Err(FilterError::InvalidQ { .. })
        ));
        assert!(matches!(
            parametric_eq(30000.0, 6.0, 2.0, 48000.0),
            Err(FilterError::InvalidFrequency { .. })
        ));
        assert!(matches!(
            parametric_eq(1000.0, f64::NAN, 2.0, 48000.0),
            Err(FilterError::InvalidGain { .. })
        ));
        assert!(matches!(
            shelving_lowshelf(200.0, 6.0, 0.0, 0.707),
            Err(FilterError::InvalidSampleRate { .. })
        ));
    }
}
