//! Whole-buffer filter application.
//!
//! Both paths are single-shot transforms: any internal delay-line state is
//! local to one call and reset to zero at its start, so separate
//! invocations never share filter memory. Cascade coefficients are
//! read-only and safely shareable across concurrent calls.

use crate::biquad::SosCascade;
use crate::buffer::AudioBuffer;
use crate::fir::FirKernel;

/// Applies an FIR kernel by centered linear convolution.
///
/// The output has the same length as the input, aligned so the kernel's
/// center tap lines up with each output sample. For an odd symmetric
/// kernel the group delay is a constant `(len - 1) / 2` samples.
pub fn apply_fir(signal: &[f64], kernel: &FirKernel) -> Vec<f64> {
    let taps = kernel.taps();
    let n = signal.len();
    if n == 0 {
        return Vec::new();
    }
    let l = taps.len();
    let offset = (l - 1) / 2;

    let mut out = vec![0.0; n];
    for (i, out_val) in out.iter_mut().enumerate() {
        // y[i] = sum_j h[j] * x[i + offset - j], clipped to valid indices
        let pos = i + offset;
        let j_lo = pos.saturating_sub(n - 1).min(l);
        let j_hi = (pos + 1).min(l);
        let mut acc = 0.0;
        for (j, &tap) in taps.iter().enumerate().take(j_hi).skip(j_lo) {
            acc += tap * signal[pos - j];
        }
        *out_val = acc;
    }
    out
}

/// Applies an SOS cascade by sequential per-section recursive filtering.
///
/// Each section runs a transposed direct-form-II recursion with its own
/// zero-initialized `(z1, z2)` delay line, feeding the next section's
/// input. The output has the same length as the input.
pub fn apply_iir(signal: &[f64], cascade: &SosCascade) -> Vec<f64> {
    let mut out = signal.to_vec();
    for section in cascade.sections() {
        let (b0, b1, b2, a1, a2) = section.constants();
        let mut z1 = 0.0;
        let mut z2 = 0.0;
        for v in out.iter_mut() {
            let x = *v;
            let y = b0 * x + z1;
            z1 = b1 * x + z2 - a1 * y;
            z2 = b2 * x - a2 * y;
            *v = y;
        }
    }
    out
}

/// [`apply_fir`] over an [`AudioBuffer`], preserving the sample rate.
pub fn apply_fir_buffer(buffer: &AudioBuffer, kernel: &FirKernel) -> AudioBuffer {
    AudioBuffer::from_filtered(apply_fir(buffer.samples(), kernel), buffer.sample_rate())
}

/// [`apply_iir`] over an [`AudioBuffer`], preserving the sample rate.
pub fn apply_iir_buffer(buffer: &AudioBuffer, cascade: &SosCascade) -> AudioBuffer {
    AudioBuffer::from_filtered(apply_iir(buffer.samples(), cascade), buffer.sample_rate())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biquad::Biquad;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn test_fir_impulse_reproduces_centered_kernel() {
        let kernel = FirKernel::from_taps(vec![0.25, 0.5, 0.25]).unwrap();
        // Impulse in the middle of a buffer long enough for full support
        let mut x = vec![0.0; 9];
        x[4] = 1.0;
        let y = apply_fir(&x, &kernel);
        assert_eq!(y.len(), 9);
        assert!(approx_eq(y[3], 0.25, 1e-15));
        assert!(approx_eq(y[4], 0.5, 1e-15));
        assert!(approx_eq(y[5], 0.25, 1e-15));
        assert!(approx_eq(y[0], 0.0, 1e-15));
    }

    #[test]
    fn test_fir_output_length_matches_input() {
        let kernel = FirKernel::from_taps(vec![0.2; 5]).unwrap();
        for n in [1usize, 2, 7, 64] {
            let x = vec![1.0; n];
            assert_eq!(apply_fir(&x, &kernel).len(), n);
        }
    }

    #[test]
    fn test_fir_dc_passthrough() {
        // Moving-average kernel sums to 1, so a constant signal is
        // preserved away from the edges.
        let kernel = FirKernel::from_taps(vec![0.2; 5]).unwrap();
        let x = vec![1.0; 32];
        let y = apply_fir(&x, &kernel);
        for &v in &y[4..28] {
            assert!(approx_eq(v, 1.0, 1e-12));
        }
    }

    #[test]
    fn test_iir_zero_in_zero_out() {
        let cascade = SosCascade::from_section(Biquad::new(0.3, 0.2, 0.1, -0.5, 0.25));
        let x = vec![0.0; 256];
        let y = apply_iir(&x, &cascade);
        assert_eq!(y.len(), 256);
        assert!(y.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_iir_identity_cascade_passthrough() {
        let cascade = SosCascade::from_section(Biquad::identity());
        let x: Vec<f64> = (0..64).map(|i| (i as f64 * 0.1).sin()).collect();
        let y = apply_iir(&x, &cascade);
        for (a, b) in x.iter().zip(&y) {
            assert!(approx_eq(*a, *b, 1e-15));
        }
    }

    #[test]
    fn test_iir_state_does_not_leak_between_calls() {
        let cascade = SosCascade::from_section(Biquad::new(0.3, 0.2, 0.1, -0.5, 0.25));
        let x: Vec<f64> = (0..128).map(|i| (i as f64 * 0.05).cos()).collect();
        let y1 = apply_iir(&x, &cascade);
        let y2 = apply_iir(&x, &cascade);
        assert_eq!(y1, y2);
    }

    #[test]
    fn test_iir_impulse_response_first_samples() {
        // For b=[b0,b1,b2], a=[1,a1,a2]: h[0]=b0, h[1]=b1-a1*b0
        let cascade = SosCascade::from_section(Biquad::new(0.5, 0.25, 0.125, -0.3, 0.02));
        let mut x = vec![0.0; 8];
        x[0] = 1.0;
        let y = apply_iir(&x, &cascade);
        assert!(approx_eq(y[0], 0.5, 1e-15));
        assert!(approx_eq(y[1], 0.25 - (-0.3) * 0.5, 1e-15));
    }
}
