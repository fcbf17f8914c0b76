//! Window functions for FIR filter design.

use std::f64::consts::PI;

/// Window function types for FIR filter design
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum WindowType {
    /// Rectangular window (no windowing)
    Rectangular,
    /// Hamming window
    Hamming,
    /// Hann (Hanning) window
    Hann,
    /// Blackman window
    Blackman,
    /// Kaiser window (requires beta parameter)
    Kaiser,
}

impl WindowType {
    /// Returns the short string representation of the window type.
    pub fn short_name(&self) -> &'static str {
        match self {
            WindowType::Rectangular => "RECT",
            WindowType::Hamming => "HAMM",
            WindowType::Hann => "HANN",
            WindowType::Blackman => "BLKM",
            WindowType::Kaiser => "KAIS",
        }
    }
}

/// Modified Bessel function of the first kind (I0), used for Kaiser window.
pub(crate) fn bessel_i0(x: f64) -> f64 {
    let mut sum = 1.0;
    let mut term = 1.0;
    let mut k = 1.0;

    let half_x_sq = (x / 2.0) * (x / 2.0);

    // Series expansion: I0(x) = sum ((x/2)^k / k!)^2
    // Each term is: term_k = term_{k-1} * (x/2)^2 / k^2
    loop {
        term *= half_x_sq / (k * k);
        sum += term;
        if term < 1e-12 * sum {
            break;
        }
        k += 1.0;
    }

    sum
}

/// Generates a window function for FIR filter design.
///
/// # Arguments
/// * `n` - Window length
/// * `window_type` - Type of window to generate
/// * `kaiser_beta` - Beta parameter for Kaiser window (ignored for other types)
///
/// # Returns
/// Vector of window coefficients
pub fn generate_window(n: usize, window_type: WindowType, kaiser_beta: f64) -> Vec<f64> {
    let mut window = vec![0.0; n];
    if n == 1 {
        window[0] = 1.0;
        return window;
    }

    match window_type {
        WindowType::Rectangular => {
            window.fill(1.0);
        }
        WindowType::Hamming => {
            for (i, w) in window.iter_mut().enumerate() {
                *w = 0.54 - 0.46 * (2.0 * PI * i as f64 / (n - 1) as f64).cos();
            }
        }
        WindowType::Hann => {
            for (i, w) in window.iter_mut().enumerate() {
                *w = 0.5 * (1.0 - (2.0 * PI * i as f64 / (n - 1) as f64).cos());
            }
        }
        WindowType::Blackman => {
            for (i, w) in window.iter_mut().enumerate() {
                let arg = 2.0 * PI * i as f64 / (n - 1) as f64;
                *w = 0.42 - 0.5 * arg.cos() + 0.08 * (2.0 * arg).cos();
            }
        }
        WindowType::Kaiser => {
            let i0_beta = bessel_i0(kaiser_beta);
            let n_minus_1 = (n - 1) as f64;
            for (i, w) in window.iter_mut().enumerate() {
                let x =
                    kaiser_beta * (1.0 - ((2.0 * i as f64 - n_minus_1) / n_minus_1).powi(2)).sqrt();
                *w = bessel_i0(x) / i0_beta;
            }
        }
    }

    window
}

/// Estimates the Kaiser window beta parameter for a target stopband
/// attenuation in dB, using the standard empirical fit.
pub fn kaiser_beta(attenuation_db: f64) -> f64 {
    let a = attenuation_db;
    if a > 50.0 {
        0.1102 * (a - 8.7)
    } else if a > 21.0 {
        0.5842 * (a - 21.0).powf(0.4) + 0.07886 * (a - 21.0)
    } else {
        0.0
    }
}
