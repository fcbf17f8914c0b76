//! Declarative filter specifications and the single design entry point.
//!
//! The free functions in [`fir`](crate::fir) and [`design`](crate::design)
//! are the primary surface; [`FilterSpec`] wraps the same designers
//! behind one exhaustively-matched tagged union, which is convenient for
//! tools that build filters from user input.

use ndarray::Array1;
use num_complex::Complex64;

use crate::biquad::SosCascade;
use crate::error::{FilterError, Result};
use crate::fir::FirKernel;
use crate::{apply, design, eq, fir, response};

/// Band shape of a frequency-selective filter, in Hz.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum FilterBand {
    /// Pass below `cutoff`
    Lowpass {
        /// Cutoff frequency in Hz
        cutoff: f64,
    },
    /// Pass above `cutoff`
    Highpass {
        /// Cutoff frequency in Hz
        cutoff: f64,
    },
    /// Pass between the edges
    Bandpass {
        /// Lower band edge in Hz
        low: f64,
        /// Upper band edge in Hz
        high: f64,
    },
    /// Reject between the edges
    Bandstop {
        /// Lower band edge in Hz
        low: f64,
        /// Upper band edge in Hz
        high: f64,
    },
    /// Reject a narrow symmetric band around `center`
    Notch {
        /// Center frequency in Hz
        center: f64,
        /// Total rejection bandwidth in Hz
        bandwidth: f64,
    },
}

impl FilterBand {
    fn name(&self) -> &'static str {
        match self {
            FilterBand::Lowpass { .. } => "lowpass",
            FilterBand::Highpass { .. } => "highpass",
            FilterBand::Bandpass { .. } => "bandpass",
            FilterBand::Bandstop { .. } => "bandstop",
            FilterBand::Notch { .. } => "notch",
        }
    }

    /// Notch is a degenerate bandstop; everything else maps to itself.
    fn canonical(self) -> FilterBand {
        match self {
            FilterBand::Notch { center, bandwidth } => FilterBand::Bandstop {
                low: center - bandwidth / 2.0,
                high: center + bandwidth / 2.0,
            },
            other => other,
        }
    }
}

/// Design method for a band-shaped filter.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum DesignMethod {
    /// Windowed-sinc FIR with a Kaiser window
    FirKaiser {
        /// Number of taps
        numtaps: usize,
        /// Kaiser window shape parameter
        beta: f64,
    },
    /// Butterworth (maximally flat passband)
    Butterworth {
        /// Filter order
        order: usize,
    },
    /// Chebyshev Type I (passband ripple)
    ChebyshevI {
        /// Filter order
        order: usize,
        /// Maximum passband ripple in dB
        ripple_db: f64,
    },
    /// Chebyshev Type II (stopband ripple)
    ChebyshevII {
        /// Filter order
        order: usize,
        /// Minimum stopband attenuation in dB
        attenuation_db: f64,
    },
    /// Elliptic / Cauer (ripple in both bands)
    Elliptic {
        /// Filter order
        order: usize,
        /// Maximum passband ripple in dB
        ripple_db: f64,
        /// Minimum stopband attenuation in dB
        attenuation_db: f64,
    },
    /// Bessel (maximally flat group delay), phase-normalized
    Bessel {
        /// Filter order
        order: usize,
    },
}

impl DesignMethod {
    fn name(&self) -> &'static str {
        match self {
            DesignMethod::FirKaiser { .. } => "FIR-Kaiser",
            DesignMethod::Butterworth { .. } => "Butterworth",
            DesignMethod::ChebyshevI { .. } => "Chebyshev-I",
            DesignMethod::ChebyshevII { .. } => "Chebyshev-II",
            DesignMethod::Elliptic { .. } => "Elliptic",
            DesignMethod::Bessel { .. } => "Bessel",
        }
    }
}

/// A complete filter specification: what to design.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum FilterSpec {
    /// A frequency-selective filter designed by a named method
    Band {
        /// Band shape and edges
        band: FilterBand,
        /// Design method and its parameters
        method: DesignMethod,
        /// Sampling frequency in Hz
        fs: f64,
    },
    /// Peaking EQ (analytic biquad)
    ParametricEq {
        /// Center frequency in Hz
        center: f64,
        /// Gain in dB (positive = boost)
        gain_db: f64,
        /// Quality factor
        q: f64,
        /// Sampling frequency in Hz
        fs: f64,
    },
    /// Low shelf (analytic biquad)
    LowShelf {
        /// Shelf corner frequency in Hz
        cutoff: f64,
        /// Shelf gain in dB
        gain_db: f64,
        /// Shelf slope control
        q: f64,
        /// Sampling frequency in Hz
        fs: f64,
    },
    /// High shelf (analytic biquad)
    HighShelf {
        /// Shelf corner frequency in Hz
        cutoff: f64,
        /// Shelf gain in dB
        gain_db: f64,
        /// Shelf slope control
        q: f64,
        /// Sampling frequency in Hz
        fs: f64,
    },
}

/// A designed filter: either an FIR kernel or an SOS cascade.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum DesignedFilter {
    /// FIR tap sequence, applied by convolution
    Fir(FirKernel),
    /// Second-order-section cascade, applied recursively
    Sos(SosCascade),
}

impl DesignedFilter {
    /// Applies the filter to a signal buffer.
    pub fn apply(&self, signal: &[f64]) -> Vec<f64> {
        match self {
            DesignedFilter::Fir(kernel) => apply::apply_fir(signal, kernel),
            DesignedFilter::Sos(cascade) => apply::apply_iir(signal, cascade),
        }
    }

    /// Complex frequency response on a linear grid up to Nyquist.
    pub fn frequency_response(&self, fs: f64, n_points: usize) -> (Array1<f64>, Array1<Complex64>) {
        match self {
            DesignedFilter::Fir(kernel) => response::frequency_response_fir(kernel, fs, n_points),
            DesignedFilter::Sos(cascade) => response::frequency_response_sos(cascade, fs, n_points),
        }
    }

    /// Group delay in samples on a linear grid up to Nyquist.
    pub fn group_delay(&self, fs: f64, n_points: usize) -> (Array1<f64>, Array1<f64>) {
        match self {
            DesignedFilter::Fir(kernel) => response::group_delay_fir(kernel, fs, n_points),
            DesignedFilter::Sos(cascade) => response::group_delay_sos(cascade, fs, n_points),
        }
    }
}

/// Designs the filter described by `spec`.
///
/// Dispatches to the concrete designer for each (band, method)
/// combination; combinations without a designer (Chebyshev-II bandpass,
/// Elliptic bandpass, Bessel bandstop/notch) return
/// [`FilterError::UnsupportedDesign`].
pub fn design(spec: &FilterSpec) -> Result<DesignedFilter> {
    match *spec {
        FilterSpec::Band { band, method, fs } => design_band(band, method, fs),
        FilterSpec::ParametricEq {
            center,
            gain_db,
            q,
            fs,
        } => Ok(DesignedFilter::Sos(eq::parametric_eq(
            center, gain_db, q, fs,
        )?)),
        FilterSpec::LowShelf {
            cutoff,
            gain_db,
            q,
            fs,
        } => Ok(DesignedFilter::Sos(eq::shelving_lowshelf(
            cutoff, gain_db, fs, q,
        )?)),
        FilterSpec::HighShelf {
            cutoff,
            gain_db,
            q,
            fs,
        } => Ok(DesignedFilter::Sos(eq::shelving_highshelf(
            cutoff, gain_db, fs, q,
        )?)),
    }
}

fn design_band(band: FilterBand, method: DesignMethod, fs: f64) -> Result<DesignedFilter> {
    use DesignMethod::*;
    use FilterBand::*;

    // FIR keeps the notch designer's own path; IIR families fold notch
    // into bandstop
    if let FirKaiser { numtaps, beta } = method {
        let kernel = match band {
            Lowpass { cutoff } => fir::lowpass(cutoff, fs, numtaps, beta)?,
            Highpass { cutoff } => fir::highpass(cutoff, fs, numtaps, beta)?,
            Bandpass { low, high } => fir::bandpass(low, high, fs, numtaps, beta)?,
            Bandstop { low, high } => fir::bandstop(low, high, fs, numtaps, beta)?,
            Notch { center, bandwidth } => fir::notch(center, bandwidth, fs, numtaps, beta)?,
        };
        return Ok(DesignedFilter::Fir(kernel));
    }

    let unsupported = FilterError::UnsupportedDesign {
        family: method.name(),
        band: band.name(),
    };

    let sos = match (band.canonical(), method) {
        (Lowpass { cutoff }, Butterworth { order }) => design::butter_lowpass(cutoff, fs, order)?,
        (Highpass { cutoff }, Butterworth { order }) => design::butter_highpass(cutoff, fs, order)?,
        (Bandpass { low, high }, Butterworth { order }) => {
            design::butter_bandpass(low, high, fs, order)?
        }
        (Bandstop { low, high }, Butterworth { order }) => {
            design::butter_bandstop(low, high, fs, order)?
        }

        (Lowpass { cutoff }, ChebyshevI { order, ripple_db }) => {
            design::cheby1_lowpass(cutoff, fs, order, ripple_db)?
        }
        (Highpass { cutoff }, ChebyshevI { order, ripple_db }) => {
            design::cheby1_highpass(cutoff, fs, order, ripple_db)?
        }
        (Bandpass { low, high }, ChebyshevI { order, ripple_db }) => {
            design::cheby1_bandpass(low, high, fs, order, ripple_db)?
        }
        (Bandstop { low, high }, ChebyshevI { order, ripple_db }) => {
            design::cheby1_bandstop(low, high, fs, order, ripple_db)?
        }

        (
            Lowpass { cutoff },
            ChebyshevII {
                order,
                attenuation_db,
            },
        ) => design::cheby2_lowpass(cutoff, fs, order, attenuation_db)?,
        (
            Highpass { cutoff },
            ChebyshevII {
                order,
                attenuation_db,
            },
        ) => design::cheby2_highpass(cutoff, fs, order, attenuation_db)?,
        (
            Bandstop { low, high },
            ChebyshevII {
                order,
                attenuation_db,
            },
        ) => design::cheby2_bandstop(low, high, fs, order, attenuation_db)?,

        (
            Lowpass { cutoff },
            Elliptic {
                order,
                ripple_db,
                attenuation_db,
            },
        ) => design::ellip_lowpass(cutoff, fs, order, ripple_db, attenuation_db)?,
        (
            Highpass { cutoff },
            Elliptic {
                order,
                ripple_db,
                attenuation_db,
            },
        ) => design::ellip_highpass(cutoff, fs, order, ripple_db, attenuation_db)?,
        (
            Bandstop { low, high },
            Elliptic {
                order,
                ripple_db,
                attenuation_db,
            },
        ) => design::ellip_bandstop(low, high, fs, order, ripple_db, attenuation_db)?,

        (Lowpass { cutoff }, Bessel { order }) => design::bessel_lowpass(cutoff, fs, order)?,
        (Highpass { cutoff }, Bessel { order }) => design::bessel_highpass(cutoff, fs, order)?,
        (Bandpass { low, high }, Bessel { order }) => {
            design::bessel_bandpass(low, high, fs, order)?
        }

        _ => return Err(unsupported),
    };
    Ok(DesignedFilter::Sos(sos))
}
