//! FIR filter design using the windowed-sinc method with a Kaiser window.
//!
//! Each designer returns a [`FirKernel`]: a tapped delay line approximating
//! an ideal brick-wall response. The pass bands are built by summing scaled
//! sinc terms, the Kaiser window shapes the transition/attenuation tradeoff,
//! and the kernel is scaled to unity gain at a band-dependent reference
//! frequency (DC, Nyquist or band center).

use std::f64::consts::PI;
use std::fmt;

use num_complex::Complex64;

use crate::error::{FilterError, Result};
use crate::windows::{generate_window, WindowType};

/// An immutable FIR filter kernel (tap sequence).
///
/// Symmetric for odd-tap designs, giving exactly linear phase with a
/// constant group delay of `(len - 1) / 2` samples.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FirKernel {
    taps: Vec<f64>,
}

impl FirKernel {
    /// Wraps raw coefficients as a kernel.
    pub fn from_taps(taps: Vec<f64>) -> Result<Self> {
        if taps.is_empty() {
            return Err(FilterError::InvalidTaps {
                numtaps: 0,
                reason: "kernel must have at least one tap",
            });
        }
        Ok(FirKernel { taps })
    }

    /// Returns the tap coefficients.
    pub fn taps(&self) -> &[f64] {
        &self.taps
    }

    /// Returns the number of taps.
    pub fn len(&self) -> usize {
        self.taps.len()
    }

    /// A kernel is never empty; provided for slice-like symmetry.
    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }

    /// Group delay of the centered kernel in samples, `(len - 1) / 2`.
    pub fn delay_samples(&self) -> f64 {
        (self.taps.len() as f64 - 1.0) / 2.0
    }

    /// Returns `true` if the kernel is symmetric within `tol`.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        let n = self.taps.len();
        (0..n / 2).all(|i| (self.taps[i] - self.taps[n - 1 - i]).abs() <= tol)
    }

    /// Evaluates the complex response `H(e^{jw})` at a single frequency.
    pub fn response_at(&self, freq: f64, fs: f64) -> Complex64 {
        let omega = 2.0 * PI * freq / fs;
        let mut real = 0.0;
        let mut imag = 0.0;
        for (n, &coeff) in self.taps.iter().enumerate() {
            let phase = -(n as f64) * omega;
            real += coeff * phase.cos();
            imag += coeff * phase.sin();
        }
        Complex64::new(real, imag)
    }

    /// Magnitude response in dB at a single frequency.
    pub fn magnitude_db_at(&self, freq: f64, fs: f64) -> f64 {
        let mag = self.response_at(freq, fs).norm().max(1.0e-20);
        20.0 * mag.log10()
    }
}

impl fmt::Display for FirKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FirKernel(taps:{})", self.taps.len())
    }
}

/// Normalized sinc: `sin(pi x) / (pi x)`.
fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        (PI * x).sin() / (PI * x)
    }
}

fn validate_fs(fs: f64) -> Result<f64> {
    if fs <= 0.0 || !fs.is_finite() {
        return Err(FilterError::InvalidSampleRate { sample_rate: fs });
    }
    Ok(fs / 2.0)
}

fn validate_cutoff(cutoff: f64, nyquist: f64) -> Result<f64> {
    if cutoff <= 0.0 || cutoff >= nyquist || !cutoff.is_finite() {
        return Err(FilterError::InvalidFrequency {
            freq: cutoff,
            nyquist,
        });
    }
    Ok(cutoff / nyquist)
}

fn validate_numtaps(numtaps: usize) -> Result<()> {
    if numtaps == 0 {
        return Err(FilterError::InvalidTaps {
            numtaps,
            reason: "must be at least 1",
        });
    }
    Ok(())
}

/// A design whose pass band reaches Nyquist needs a nonzero response there,
/// which an even-length symmetric kernel cannot produce.
fn reject_even_at_nyquist(numtaps: usize) -> Result<()> {
    if numtaps % 2 == 0 {
        return Err(FilterError::InvalidTaps {
            numtaps,
            reason: "must be odd for a filter whose pass band includes Nyquist",
        });
    }
    Ok(())
}

/// Windowed-sinc kernel over a set of pass bands.
///
/// `bands` are (left, right) edges normalized to Nyquist; `scale_at` is the
/// normalized frequency at which the kernel is scaled to unit gain.
fn windowed_sinc(numtaps: usize, bands: &[(f64, f64)], beta: f64, scale_at: f64) -> Vec<f64> {
    let center = (numtaps as f64 - 1.0) / 2.0;
    let win = generate_window(numtaps, WindowType::Kaiser, beta);

    let mut h = vec![0.0; numtaps];
    for (i, h_val) in h.iter_mut().enumerate() {
        let x = i as f64 - center;
        for &(left, right) in bands {
            *h_val += right * sinc(right * x) - left * sinc(left * x);
        }
        *h_val *= win[i];
    }

    // Scale to unit gain at the reference frequency.
    let mut s = 0.0;
    for (i, &h_val) in h.iter().enumerate() {
        let x = i as f64 - center;
        s += h_val * (PI * x * scale_at).cos();
    }
    if s.abs() > 1e-12 {
        for h_val in h.iter_mut() {
            *h_val /= s;
        }
    }

    h
}

/// Designs a lowpass FIR filter.
///
/// # Arguments
/// * `cutoff` - Cutoff frequency in Hz
/// * `fs` - Sampling frequency in Hz
/// * `numtaps` - Number of filter taps (odd preferred for exact linear phase)
/// * `beta` - Kaiser window beta (higher = more attenuation, wider transition)
pub fn lowpass(cutoff: f64, fs: f64, numtaps: usize, beta: f64) -> Result<FirKernel> {
    let nyquist = validate_fs(fs)?;
    validate_numtaps(numtaps)?;
    let fc = validate_cutoff(cutoff, nyquist)?;
    Ok(FirKernel {
        taps: windowed_sinc(numtaps, &[(0.0, fc)], beta, 0.0),
    })
}

/// Designs a highpass FIR filter.
///
/// `numtaps` must be odd: the pass band includes Nyquist.
pub fn highpass(cutoff: f64, fs: f64, numtaps: usize, beta: f64) -> Result<FirKernel> {
    let nyquist = validate_fs(fs)?;
    validate_numtaps(numtaps)?;
    reject_even_at_nyquist(numtaps)?;
    let fc = validate_cutoff(cutoff, nyquist)?;
    Ok(FirKernel {
        taps: windowed_sinc(numtaps, &[(fc, 1.0)], beta, 1.0),
    })
}

/// Designs a bandpass FIR filter, scaled to unit gain at the band center.
pub fn bandpass(f_low: f64, f_high: f64, fs: f64, numtaps: usize, beta: f64) -> Result<FirKernel> {
    let nyquist = validate_fs(fs)?;
    validate_numtaps(numtaps)?;
    let lo = validate_cutoff(f_low, nyquist)?;
    let hi = validate_cutoff(f_high, nyquist)?;
    if lo >= hi {
        return Err(FilterError::InvalidBand {
            low: f_low,
            high: f_high,
        });
    }
    Ok(FirKernel {
        taps: windowed_sinc(numtaps, &[(lo, hi)], beta, (lo + hi) / 2.0),
    })
}

/// Designs a bandstop FIR filter.
///
/// `numtaps` must be odd: the upper pass band includes Nyquist.
pub fn bandstop(f_low: f64, f_high: f64, fs: f64, numtaps: usize, beta: f64) -> Result<FirKernel> {
    let nyquist = validate_fs(fs)?;
    validate_numtaps(numtaps)?;
    reject_even_at_nyquist(numtaps)?;
    let lo = validate_cutoff(f_low, nyquist)?;
    let hi = validate_cutoff(f_high, nyquist)?;
    if lo >= hi {
        return Err(FilterError::InvalidBand {
            low: f_low,
            high: f_high,
        });
    }
    Ok(FirKernel {
        taps: windowed_sinc(numtaps, &[(0.0, lo), (hi, 1.0)], beta, 0.0),
    })
}

/// Designs a notch filter: a bandstop centered on `center_freq` with the
/// given bandwidth.
pub fn notch(
    center_freq: f64,
    bandwidth: f64,
    fs: f64,
    numtaps: usize,
    beta: f64,
) -> Result<FirKernel> {
    let f_low = center_freq - bandwidth / 2.0;
    let f_high = center_freq + bandwidth / 2.0;
    bandstop(f_low, f_high, fs, numtaps, beta)
}

/// Estimates the number of taps needed for a target transition width and
/// stopband attenuation, using Kaiser's empirical order formula.
///
/// The result is rounded up to the next odd integer so the kernel is a
/// symmetric Type-I design.
///
/// # Errors
/// Returns `InvalidTransitionWidth` for a degenerate width and
/// `InvalidAttenuation` below the 8 dB validity floor of the formula.
pub fn adaptive_numtaps(transition_width: f64, fs: f64, attenuation_db: f64) -> Result<usize> {
    let nyquist = validate_fs(fs)?;
    if transition_width <= 0.0 || transition_width >= nyquist || !transition_width.is_finite() {
        return Err(FilterError::InvalidTransitionWidth {
            width: transition_width,
        });
    }
    if attenuation_db < 8.0 {
        return Err(FilterError::InvalidAttenuation {
            attenuation_db,
            reason: "Kaiser's order formula requires at least 8 dB",
        });
    }

    let width_norm = transition_width / nyquist;
    let estimate = (attenuation_db - 7.95) / (2.285 * PI * width_norm) + 1.0;
    let mut numtaps = estimate.ceil() as usize;
    if numtaps % 2 == 0 {
        numtaps += 1;
    }
    Ok(numtaps)
}
