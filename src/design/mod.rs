//! IIR filter design: classical analog prototypes, bilinear-transformed
//! to digital second-order sections.
//!
//! Every designer validates its parameters, normalizes frequencies by
//! Nyquist, synthesizes an analog lowpass prototype in factored
//! zero/pole/gain form, frequency-transforms it with prewarped band
//! edges, applies the bilinear transform, and pairs the result into an
//! [`SosCascade`](crate::SosCascade). A single high-order transfer
//! polynomial is never formed: above roughly order 4, expanding one
//! amplifies coefficient error catastrophically, while per-section
//! condition numbers stay bounded.

mod pairing;
mod special;
mod transform;
mod zpk;

use std::f64::consts::PI;

use crate::biquad::SosCascade;
use crate::error::{FilterError, Result};
use self::pairing::zpk2sos;
use self::transform::{bilinear, lp2bp, lp2bs, lp2hp, lp2lp};
use self::zpk::{besselap, buttap, cheb1ap, cheb2ap, ellipap, Zpk};

/// Band shape with edges normalized to Nyquist (0..1).
enum Band {
    Lowpass(f64),
    Highpass(f64),
    Bandpass(f64, f64),
    Bandstop(f64, f64),
}

/// Internal design sample rate for the bilinear transform.
const DESIGN_FS: f64 = 2.0;

fn prewarp(wn: f64) -> f64 {
    2.0 * DESIGN_FS * (PI * wn / DESIGN_FS).tan()
}

fn validate_order(order: usize) -> Result<()> {
    if order == 0 {
        return Err(FilterError::InvalidOrder {
            order,
            reason: "must be >= 1",
        });
    }
    Ok(())
}

fn validate_ripple(ripple_db: f64) -> Result<()> {
    if ripple_db <= 0.0 || !ripple_db.is_finite() {
        return Err(FilterError::InvalidRipple { ripple_db });
    }
    Ok(())
}

fn validate_attenuation(attenuation_db: f64) -> Result<()> {
    if attenuation_db <= 0.0 || !attenuation_db.is_finite() {
        return Err(FilterError::InvalidAttenuation {
            attenuation_db,
            reason: "must be > 0",
        });
    }
    Ok(())
}

fn normalize_cutoff(cutoff: f64, fs: f64) -> Result<f64> {
    if fs <= 0.0 || !fs.is_finite() {
        return Err(FilterError::InvalidSampleRate { sample_rate: fs });
    }
    let nyquist = fs / 2.0;
    if cutoff <= 0.0 || cutoff >= nyquist || !cutoff.is_finite() {
        return Err(FilterError::InvalidFrequency {
            freq: cutoff,
            nyquist,
        });
    }
    Ok(cutoff / nyquist)
}

fn normalize_band(f_low: f64, f_high: f64, fs: f64) -> Result<(f64, f64)> {
    let lo = normalize_cutoff(f_low, fs)?;
    let hi = normalize_cutoff(f_high, fs)?;
    if lo >= hi {
        return Err(FilterError::InvalidBand {
            low: f_low,
            high: f_high,
        });
    }
    Ok((lo, hi))
}

/// Runs the shared transform pipeline on a validated prototype and band.
fn digitalize(proto: Zpk, band: Band) -> Result<SosCascade> {
    let analog = match band {
        Band::Lowpass(wn) => lp2lp(proto, prewarp(wn)),
        Band::Highpass(wn) => lp2hp(proto, prewarp(wn)),
        Band::Bandpass(lo, hi) => {
            let (w1, w2) = (prewarp(lo), prewarp(hi));
            lp2bp(proto, (w1 * w2).sqrt(), w2 - w1)
        }
        Band::Bandstop(lo, hi) => {
            let (w1, w2) = (prewarp(lo), prewarp(hi));
            lp2bs(proto, (w1 * w2).sqrt(), w2 - w1)
        }
    };
    let sos = zpk2sos(bilinear(analog, DESIGN_FS))?;
    log::debug!("designed cascade with {} sections", sos.len());
    Ok(sos)
}

// ==================== Butterworth ====================

/// Designs a Butterworth lowpass filter: maximally flat passband,
/// monotonic rolloff, -3 dB at the cutoff.
///
/// # Arguments
/// * `cutoff` - Cutoff frequency in Hz
/// * `fs` - Sampling frequency in Hz
/// * `order` - Filter order (higher = sharper transition)
pub fn butter_lowpass(cutoff: f64, fs: f64, order: usize) -> Result<SosCascade> {
    validate_order(order)?;
    let wn = normalize_cutoff(cutoff, fs)?;
    digitalize(buttap(order), Band::Lowpass(wn))
}

/// Designs a Butterworth highpass filter.
pub fn butter_highpass(cutoff: f64, fs: f64, order: usize) -> Result<SosCascade> {
    validate_order(order)?;
    let wn = normalize_cutoff(cutoff, fs)?;
    digitalize(buttap(order), Band::Highpass(wn))
}

/// Designs a Butterworth bandpass filter.
pub fn butter_bandpass(f_low: f64, f_high: f64, fs: f64, order: usize) -> Result<SosCascade> {
    validate_order(order)?;
    let (lo, hi) = normalize_band(f_low, f_high, fs)?;
    digitalize(buttap(order), Band::Bandpass(lo, hi))
}

/// Designs a Butterworth bandstop filter.
pub fn butter_bandstop(f_low: f64, f_high: f64, fs: f64, order: usize) -> Result<SosCascade> {
    validate_order(order)?;
    let (lo, hi) = normalize_band(f_low, f_high, fs)?;
    digitalize(buttap(order), Band::Bandstop(lo, hi))
}

/// Designs a Butterworth notch: a bandstop over a narrow symmetric band
/// around `center_freq`.
pub fn butter_notch(center_freq: f64, bandwidth: f64, fs: f64, order: usize) -> Result<SosCascade> {
    butter_bandstop(
        center_freq - bandwidth / 2.0,
        center_freq + bandwidth / 2.0,
        fs,
        order,
    )
}

// ==================== Chebyshev Type I ====================

/// Designs a Chebyshev Type I lowpass filter: `ripple_db` of equiripple
/// in the passband, sharper transition than Butterworth at equal order.
///
/// # Arguments
/// * `cutoff` - Passband edge frequency in Hz
/// * `fs` - Sampling frequency in Hz
/// * `order` - Filter order
/// * `ripple_db` - Maximum passband ripple in dB
pub fn cheby1_lowpass(cutoff: f64, fs: f64, order: usize, ripple_db: f64) -> Result<SosCascade> {
    validate_order(order)?;
    validate_ripple(ripple_db)?;
    let wn = normalize_cutoff(cutoff, fs)?;
    digitalize(cheb1ap(order, ripple_db), Band::Lowpass(wn))
}

/// Designs a Chebyshev Type I highpass filter.
pub fn cheby1_highpass(cutoff: f64, fs: f64, order: usize, ripple_db: f64) -> Result<SosCascade> {
    validate_order(order)?;
    validate_ripple(ripple_db)?;
    let wn = normalize_cutoff(cutoff, fs)?;
    digitalize(cheb1ap(order, ripple_db), Band::Highpass(wn))
}

/// Designs a Chebyshev Type I bandpass filter.
pub fn cheby1_bandpass(
    f_low: f64,
    f_high: f64,
    fs: f64,
    order: usize,
    ripple_db: f64,
) -> Result<SosCascade> {
    validate_order(order)?;
    validate_ripple(ripple_db)?;
    let (lo, hi) = normalize_band(f_low, f_high, fs)?;
    digitalize(cheb1ap(order, ripple_db), Band::Bandpass(lo, hi))
}

/// Designs a Chebyshev Type I bandstop filter.
pub fn cheby1_bandstop(
    f_low: f64,
    f_high: f64,
    fs: f64,
    order: usize,
    ripple_db: f64,
) -> Result<SosCascade> {
    validate_order(order)?;
    validate_ripple(ripple_db)?;
    let (lo, hi) = normalize_band(f_low, f_high, fs)?;
    digitalize(cheb1ap(order, ripple_db), Band::Bandstop(lo, hi))
}

// ==================== Chebyshev Type II ====================

/// Designs a Chebyshev Type II lowpass filter: flat passband, equiripple
/// stopband held `attenuation_db` down. The cutoff is the stopband edge.
pub fn cheby2_lowpass(
    cutoff: f64,
    fs: f64,
    order: usize,
    attenuation_db: f64,
) -> Result<SosCascade> {
    validate_order(order)?;
    validate_attenuation(attenuation_db)?;
    let wn = normalize_cutoff(cutoff, fs)?;
    digitalize(cheb2ap(order, attenuation_db), Band::Lowpass(wn))
}

/// Designs a Chebyshev Type II highpass filter.
pub fn cheby2_highpass(
    cutoff: f64,
    fs: f64,
    order: usize,
    attenuation_db: f64,
) -> Result<SosCascade> {
    validate_order(order)?;
    validate_attenuation(attenuation_db)?;
    let wn = normalize_cutoff(cutoff, fs)?;
    digitalize(cheb2ap(order, attenuation_db), Band::Highpass(wn))
}

/// Designs a Chebyshev Type II bandstop filter.
pub fn cheby2_bandstop(
    f_low: f64,
    f_high: f64,
    fs: f64,
    order: usize,
    attenuation_db: f64,
) -> Result<SosCascade> {
    validate_order(order)?;
    validate_attenuation(attenuation_db)?;
    let (lo, hi) = normalize_band(f_low, f_high, fs)?;
    digitalize(cheb2ap(order, attenuation_db), Band::Bandstop(lo, hi))
}

// ==================== Elliptic (Cauer) ====================

/// Designs an elliptic lowpass filter: equiripple in both bands, the
/// sharpest transition for a given order.
///
/// # Arguments
/// * `cutoff` - Passband edge frequency in Hz
/// * `fs` - Sampling frequency in Hz
/// * `order` - Filter order
/// * `ripple_db` - Maximum passband ripple in dB
/// * `attenuation_db` - Minimum stopband attenuation in dB (must exceed
///   the ripple)
pub fn ellip_lowpass(
    cutoff: f64,
    fs: f64,
    order: usize,
    ripple_db: f64,
    attenuation_db: f64,
) -> Result<SosCascade> {
    validate_order(order)?;
    validate_elliptic(ripple_db, attenuation_db)?;
    let wn = normalize_cutoff(cutoff, fs)?;
    digitalize(ellipap(order, ripple_db, attenuation_db)?, Band::Lowpass(wn))
}

/// Designs an elliptic highpass filter.
pub fn ellip_highpass(
    cutoff: f64,
    fs: f64,
    order: usize,
    ripple_db: f64,
    attenuation_db: f64,
) -> Result<SosCascade> {
    validate_order(order)?;
    validate_elliptic(ripple_db, attenuation_db)?;
    let wn = normalize_cutoff(cutoff, fs)?;
    digitalize(
        ellipap(order, ripple_db, attenuation_db)?,
        Band::Highpass(wn),
    )
}

/// Designs an elliptic bandstop filter.
pub fn ellip_bandstop(
    f_low: f64,
    f_high: f64,
    fs: f64,
    order: usize,
    ripple_db: f64,
    attenuation_db: f64,
) -> Result<SosCascade> {
    validate_order(order)?;
    validate_elliptic(ripple_db, attenuation_db)?;
    let (lo, hi) = normalize_band(f_low, f_high, fs)?;
    digitalize(
        ellipap(order, ripple_db, attenuation_db)?,
        Band::Bandstop(lo, hi),
    )
}

fn validate_elliptic(ripple_db: f64, attenuation_db: f64) -> Result<()> {
    validate_ripple(ripple_db)?;
    validate_attenuation(attenuation_db)?;
    if attenuation_db <= ripple_db {
        return Err(FilterError::InvalidAttenuation {
            attenuation_db,
            reason: "must exceed the passband ripple",
        });
    }
    Ok(())
}

// ==================== Bessel ====================

/// Designs a Bessel lowpass filter: maximally flat group delay (near
/// linear phase) at the cost of rolloff sharpness. Phase-normalized, so
/// the nominal cutoff corresponds to matched group delay rather than the
/// -3 dB point.
pub fn bessel_lowpass(cutoff: f64, fs: f64, order: usize) -> Result<SosCascade> {
    validate_order(order)?;
    let wn = normalize_cutoff(cutoff, fs)?;
    digitalize(besselap(order)?, Band::Lowpass(wn))
}

/// Designs a Bessel highpass filter.
pub fn bessel_highpass(cutoff: f64, fs: f64, order: usize) -> Result<SosCascade> {
    validate_order(order)?;
    let wn = normalize_cutoff(cutoff, fs)?;
    digitalize(besselap(order)?, Band::Highpass(wn))
}

/// Designs a Bessel bandpass filter.
pub fn bessel_bandpass(f_low: f64, f_high: f64, fs: f64, order: usize) -> Result<SosCascade> {
    validate_order(order)?;
    let (lo, hi) = normalize_band(f_low, f_high, fs)?;
    digitalize(besselap(order)?, Band::Bandpass(lo, hi))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn test_butter_lowpass_3db_at_cutoff() {
        for order in [2usize, 4, 6, 8] {
            let sos = butter_lowpass(1000.0, 48000.0, order).unwrap();
            let mag = sos.magnitude_db_at(1000.0, 48000.0);
            assert!(
                approx_eq(mag, -3.0103, 0.01),
                "order {}: {} dB at cutoff",
                order,
                mag
            );
            assert!(approx_eq(sos.magnitude_db_at(1.0, 48000.0), 0.0, 0.01));
        }
    }

    #[test]
    fn test_butter_lowpass_concrete_scenario() {
        // order 4 at 1 kHz / 44.1 kHz: exactly 2 sections, -3.01 dB
        let sos = butter_lowpass(1000.0, 44100.0, 4).unwrap();
        assert_eq!(sos.len(), 2);
        assert!(approx_eq(sos.magnitude_db_at(1000.0, 44100.0), -3.01, 0.05));
    }

    #[test]
    fn test_butter_highpass_mirrors_lowpass() {
        let sos = butter_highpass(500.0, 48000.0, 6).unwrap();
        assert!(approx_eq(sos.magnitude_db_at(500.0, 48000.0), -3.0103, 0.01));
        assert!(approx_eq(sos.magnitude_db_at(10000.0, 48000.0), 0.0, 0.01));
        assert!(sos.magnitude_db_at(50.0, 48000.0) < -50.0);
    }

    #[test]
    fn test_butter_bandpass_passes_center_only() {
        let sos = butter_bandpass(500.0, 2000.0, 48000.0, 4).unwrap();
        assert_eq!(sos.len(), 4);
        let center = (500.0_f64 * 2000.0).sqrt();
        assert!(approx_eq(sos.magnitude_db_at(center, 48000.0), 0.0, 0.01));
        assert!(sos.magnitude_db_at(50.0, 48000.0) < -40.0);
        assert!(sos.magnitude_db_at(12000.0, 48000.0) < -40.0);
    }

    #[test]
    fn test_butter_notch_rejects_center() {
        let sos = butter_notch(60.0, 10.0, 8000.0, 4).unwrap();
        assert!(sos.magnitude_db_at(60.0, 8000.0) < -60.0);
        assert!(approx_eq(sos.magnitude_db_at(10.0, 8000.0), 0.0, 0.1));
        assert!(approx_eq(sos.magnitude_db_at(1000.0, 8000.0), 0.0, 0.1));
    }

    #[test]
    fn test_cheby1_ripple_at_passband_edge() {
        let sos = cheby1_lowpass(4000.0, 48000.0, 5, 0.5).unwrap();
        assert!(approx_eq(sos.magnitude_db_at(4000.0, 48000.0), -0.5, 0.01));
        // Odd order: unity at DC
        assert!(approx_eq(sos.magnitude_db_at(1.0, 48000.0), 0.0, 0.01));
        // Even order: -ripple at DC
        let sos4 = cheby1_lowpass(4000.0, 48000.0, 4, 1.0).unwrap();
        assert!(approx_eq(sos4.magnitude_db_at(1.0, 48000.0), -1.0, 0.01));
    }

    #[test]
    fn test_cheby1_sharper_than_butter() {
        let butter = butter_lowpass(4000.0, 48000.0, 5).unwrap();
        let cheby = cheby1_lowpass(4000.0, 48000.0, 5, 0.5).unwrap();
        assert!(
            cheby.magnitude_db_at(8000.0, 48000.0) < butter.magnitude_db_at(8000.0, 48000.0),
            "Chebyshev should roll off faster past the edge"
        );
    }

    #[test]
    fn test_cheby2_attenuation_at_stopband_edge() {
        let sos = cheby2_lowpass(4000.0, 48000.0, 5, 40.0).unwrap();
        assert!(approx_eq(sos.magnitude_db_at(4000.0, 48000.0), -40.0, 0.1));
        assert!(approx_eq(sos.magnitude_db_at(10.0, 48000.0), 0.0, 0.01));
        // Stopband stays held down past the edge
        assert!(sos.magnitude_db_at(8000.0, 48000.0) <= -39.9);
    }

    #[test]
    fn test_cheby2_highpass_and_bandstop() {
        let hp = cheby2_highpass(2000.0, 48000.0, 4, 40.0).unwrap();
        assert!(approx_eq(hp.magnitude_db_at(2000.0, 48000.0), -40.0, 0.1));
        assert!(approx_eq(hp.magnitude_db_at(20000.0, 48000.0), 0.0, 0.1));

        let bs = cheby2_bandstop(500.0, 2000.0, 48000.0, 3, 40.0).unwrap();
        assert!(bs.magnitude_db_at(1000.0, 48000.0) < -39.0);
        assert!(approx_eq(bs.magnitude_db_at(10.0, 48000.0), 0.0, 0.1));
    }

    #[test]
    fn test_ellip_ripple_at_passband_edge() {
        let sos = ellip_lowpass(4000.0, 48000.0, 4, 0.5, 60.0).unwrap();
        assert!(approx_eq(sos.magnitude_db_at(4000.0, 48000.0), -0.5, 0.01));
        // This spec's stopband starts near 2.7x the passband edge; past
        // it the response is held at -60 dB
        assert!(sos.magnitude_db_at(12000.0, 48000.0) < -59.0);
        assert!(sos.magnitude_db_at(16000.0, 48000.0) < -59.0);
    }

    #[test]
    fn test_ellip_reaches_stopband_before_cheby1() {
        let cheby = cheby1_lowpass(4000.0, 48000.0, 4, 0.5).unwrap();
        let ellip = ellip_lowpass(4000.0, 48000.0, 4, 0.5, 60.0).unwrap();
        // Once the elliptic stopband is reached it is far below what an
        // equal-order Chebyshev manages there
        assert!(
            ellip.magnitude_db_at(10000.0, 48000.0)
                < cheby.magnitude_db_at(10000.0, 48000.0) - 5.0
        );
    }

    #[test]
    fn test_bessel_lowpass_dc_and_rolloff() {
        let sos = bessel_lowpass(4000.0, 48000.0, 6).unwrap();
        assert_eq!(sos.len(), 3);
        assert!(approx_eq(sos.magnitude_db_at(1.0, 48000.0), 0.0, 0.01));
        // Gentle but real attenuation past the cutoff
        assert!(sos.magnitude_db_at(4000.0, 48000.0) < -1.0);
        assert!(sos.magnitude_db_at(16000.0, 48000.0) < -30.0);
    }

    #[test]
    fn test_bessel_bandpass_center_unity() {
        let sos = bessel_bandpass(500.0, 2000.0, 48000.0, 3).unwrap();
        let center = (500.0_f64 * 2000.0).sqrt();
        assert!(approx_eq(sos.magnitude_db_at(center, 48000.0), 0.0, 0.01));
    }

    #[test]
    fn test_validation_rejects_bad_parameters() {
        assert!(matches!(
            butter_lowpass(24000.0, 48000.0, 4),
            Err(FilterError::InvalidFrequency { .. })
        ));
        assert!(matches!(
            butter_lowpass(-100.0, 48000.0, 4),
            Err(FilterError::InvalidFrequency { .. })
        ));
        assert!(matches!(
            butter_lowpass(1000.0, 48000.0, 0),
            Err(FilterError::InvalidOrder { .. })
        ));
        assert!(matches!(
            butter_bandpass(2000.0, 500.0, 48000.0, 4),
            Err(FilterError::InvalidBand { .. })
        ));
        assert!(matches!(
            cheby1_lowpass(1000.0, 48000.0, 4, 0.0),
            Err(FilterError::InvalidRipple { .. })
        ));
        assert!(matches!(
            cheby2_lowpass(1000.0, 48000.0, 4, -40.0),
            Err(FilterError::InvalidAttenuation { .. })
        ));
        assert!(matches!(
            ellip_lowpass(1000.0, 48000.0, 4, 1.0, 0.5),
            Err(FilterError::InvalidAttenuation { .. })
        ));
        assert!(matches!(
            butter_lowpass(1000.0, 0.0, 4),
            Err(FilterError::InvalidSampleRate { .. })
        ));
    }

    #[test]
    fn test_cutoff_just_below_nyquist_is_valid() {
        let sos = butter_lowpass(23999.9, 48000.0, 4).unwrap();
        assert!(approx_eq(sos.magnitude_db_at(100.0, 48000.0), 0.0, 0.01));
    }

    #[test]
    fn test_section_counts_match_order() {
        assert_eq!(butter_lowpass(1000.0, 48000.0, 1).unwrap().len(), 1);
        assert_eq!(butter_lowpass(1000.0, 48000.0, 5).unwrap().len(), 3);
        assert_eq!(butter_bandstop(500.0, 900.0, 48000.0, 3).unwrap().len(), 3);
        assert_eq!(cheby2_lowpass(1000.0, 48000.0, 6, 40.0).unwrap().len(), 3);
    }
}
