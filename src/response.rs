//! Frequency response and group delay analysis.
//!
//! IIR responses are evaluated section by section and multiplied; the
//! cascade is never collapsed into a single high-order polynomial, for the
//! same conditioning reason the designers emit second-order sections in
//! the first place.

use std::f64::consts::PI;

use ndarray::Array1;
use num_complex::Complex64;

use crate::biquad::SosCascade;
use crate::fir::FirKernel;

/// Linearly spaced analysis grid over `[0, Nyquist)`, endpoint excluded.
fn freq_grid(fs: f64, n_points: usize) -> Array1<f64> {
    let step = fs / 2.0 / n_points as f64;
    Array1::from_shape_fn(n_points, |i| i as f64 * step)
}

/// Evaluates a real polynomial in `z^-1` at `e^{jw}` together with its
/// ramp-weighted companion `sum n c_n e^{-jwn}` (used for group delay).
fn eval_poly(coeffs: &[f64], omega: f64) -> (Complex64, Complex64) {
    let mut d = Complex64::new(0.0, 0.0);
    let mut s = Complex64::new(0.0, 0.0);
    for (n, &c) in coeffs.iter().enumerate() {
        let phase = -(n as f64) * omega;
        let e = Complex64::new(phase.cos(), phase.sin());
        d += c * e;
        s += (n as f64) * c * e;
    }
    (d, s)
}

/// Computes the complex frequency response of an FIR kernel at `n_points`
/// linearly spaced frequencies in `[0, Nyquist)`.
///
/// Returns `(frequencies_hz, response)`.
pub fn frequency_response_fir(
    kernel: &FirKernel,
    fs: f64,
    n_points: usize,
) -> (Array1<f64>, Array1<Complex64>) {
    let freqs = freq_grid(fs, n_points);
    let response = freqs.mapv(|f| kernel.response_at(f, fs));
    (freqs, response)
}

/// Computes the complex frequency response of an SOS cascade at `n_points`
/// linearly spaced frequencies in `[0, Nyquist)`, as the product of
/// per-section responses.
///
/// Returns `(frequencies_hz, response)`.
pub fn frequency_response_sos(
    cascade: &SosCascade,
    fs: f64,
    n_points: usize,
) -> (Array1<f64>, Array1<Complex64>) {
    let freqs = freq_grid(fs, n_points);
    let response = freqs.mapv(|f| cascade.response_at(f, fs));
    (freqs, response)
}

/// Group delay contribution of one polynomial at `omega`, or `None` when
/// the evaluation is singular (magnitude collapses to ~0 there).
fn poly_group_delay(coeffs: &[f64], omega: f64) -> Option<f64> {
    let (d, s) = eval_poly(coeffs, omega);
    let scale: f64 = coeffs.iter().map(|c| c * c).sum();
    if d.norm_sqr() <= f64::EPSILON * scale.max(f64::MIN_POSITIVE) {
        return None;
    }
    Some((s / d).re)
}

/// Computes the group delay of an FIR kernel in samples at `n_points`
/// linearly spaced frequencies in `[0, Nyquist)`.
///
/// For a symmetric kernel this is the constant `(len - 1) / 2`. Singular
/// grid points (response magnitude ~0) are reported as 0.0 and counted in
/// a single `log::warn!`; values are otherwise returned raw, without any
/// display-oriented clipping.
pub fn group_delay_fir(kernel: &FirKernel, fs: f64, n_points: usize) -> (Array1<f64>, Array1<f64>) {
    let freqs = freq_grid(fs, n_points);
    let mut singular = 0usize;
    let delay = freqs.mapv(|f| {
        let omega = 2.0 * PI * f / fs;
        match poly_group_delay(kernel.taps(), omega) {
            Some(gd) => gd,
            None => {
                singular += 1;
                0.0
            }
        }
    });
    if singular > 0 {
        log::warn!(
            "group delay singular at {} of {} grid points (response ~0); reported as 0",
            singular,
            n_points
        );
    }
    (freqs, delay)
}

/// Computes the group delay of an SOS cascade in samples at `n_points`
/// linearly spaced frequencies in `[0, Nyquist)`.
///
/// The delay is summed over sections, each evaluated from its own
/// degree-2 numerator and denominator. Singular points are reported as
/// 0.0 and counted in a single `log::warn!`.
pub fn group_delay_sos(
    cascade: &SosCascade,
    fs: f64,
    n_points: usize,
) -> (Array1<f64>, Array1<f64>) {
    let freqs = freq_grid(fs, n_points);
    let mut singular = 0usize;
    let delay = freqs.mapv(|f| {
        let omega = 2.0 * PI * f / fs;
        let mut total = 0.0;
        for section in cascade.sections() {
            let b = [section.b0, section.b1, section.b2];
            let a = [1.0, section.a1, section.a2];
            match (poly_group_delay(&b, omega), poly_group_delay(&a, omega)) {
                (Some(gd_b), Some(gd_a)) => total += gd_b - gd_a,
                _ => {
                    singular += 1;
                    return 0.0;
                }
            }
        }
        total
    });
    if singular > 0 {
        log::warn!(
            "group delay singular at {} of {} grid points (response ~0); reported as 0",
            singular,
            n_points
        );
    }
    (freqs, delay)
}

/// Converts a complex response to magnitude in dB, floored at -400 dB.
pub fn magnitude_db(response: &Array1<Complex64>) -> Array1<f64> {
    response.mapv(|h| 20.0 * h.norm().max(1.0e-20).log10())
}

/// Extracts the phase of a complex response in radians.
pub fn phase(response: &Array1<Complex64>) -> Array1<f64> {
    response.mapv(|h| h.arg())
}
