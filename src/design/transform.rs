//! Frequency transforms and the bilinear map, in zero/pole/gain form.
//!
//! The lowpass prototype is moved to the requested band while still
//! analog, then mapped to the z-plane. Working on factored zeros/poles
//! (never expanded polynomials) keeps every step well conditioned.

use num_complex::Complex64;

use crate::design::zpk::{prod_neg, Zpk};

/// Lowpass-to-lowpass: rescales the cutoff to `wo`.
pub(crate) fn lp2lp(zpk: Zpk, wo: f64) -> Zpk {
    let degree = zpk.p.len() - zpk.z.len();
    let z: Vec<Complex64> = zpk.z.iter().map(|&zi| zi * wo).collect();
    let p: Vec<Complex64> = zpk.p.iter().map(|&pi| pi * wo).collect();
    let k = zpk.k * wo.powi(degree as i32);
    Zpk { z, p, k }
}

/// Lowpass-to-highpass: `s -> wo / s`.
pub(crate) fn lp2hp(zpk: Zpk, wo: f64) -> Zpk {
    let degree = zpk.p.len() - zpk.z.len();
    let mut z: Vec<Complex64> = zpk.z.iter().map(|&zi| wo / zi).collect();
    let p: Vec<Complex64> = zpk.p.iter().map(|&pi| wo / pi).collect();
    // Zeros at infinity move to the origin
    z.extend(std::iter::repeat(Complex64::new(0.0, 0.0)).take(degree));
    let k = zpk.k * (prod_neg(&zpk.z) / prod_neg(&zpk.p)).re;
    Zpk { z, p, k }
}

/// Lowpass-to-bandpass: `s -> (s^2 + wo^2) / (bw * s)`, doubling the
/// order around center `wo` with bandwidth `bw`.
pub(crate) fn lp2bp(zpk: Zpk, wo: f64, bw: f64) -> Zpk {
    let degree = zpk.p.len() - zpk.z.len();
    let wo_sq = Complex64::new(wo * wo, 0.0);

    let split = |roots: &[Complex64]| -> Vec<Complex64> {
        let mut out = Vec::with_capacity(roots.len() * 2);
        for &r in roots {
            let scaled = r * (bw / 2.0);
            let disc = (scaled * scaled - wo_sq).sqrt();
            out.push(scaled + disc);
            out.push(scaled - disc);
        }
        out
    };

    let mut z = split(&zpk.z);
    let p = split(&zpk.p);
    z.extend(std::iter::repeat(Complex64::new(0.0, 0.0)).take(degree));
    let k = zpk.k * bw.powi(degree as i32);
    Zpk { z, p, k }
}

/// Lowpass-to-bandstop: `s -> bw * s / (s^2 + wo^2)`.
pub(crate) fn lp2bs(zpk: Zpk, wo: f64, bw: f64) -> Zpk {
    let degree = zpk.p.len() - zpk.z.len();
    let wo_sq = Complex64::new(wo * wo, 0.0);

    let split = |roots: &[Complex64]| -> Vec<Complex64> {
        let mut out = Vec::with_capacity(roots.len() * 2);
        for &r in roots {
            let inverted = (bw / 2.0) / r;
            let disc = (inverted * inverted - wo_sq).sqrt();
            out.push(inverted + disc);
            out.push(inverted - disc);
        }
        out
    };

    let mut z = split(&zpk.z);
    let p = split(&zpk.p);
    // Zeros at infinity move to +/- j*wo
    for _ in 0..degree {
        z.push(Complex64::new(0.0, wo));
        z.push(Complex64::new(0.0, -wo));
    }
    let k = zpk.k * (prod_neg(&zpk.z) / prod_neg(&zpk.p)).re;
    Zpk { z, p, k }
}

/// Bilinear transform: maps the analog plane to the z-plane via
/// `s = 2*fs*(z-1)/(z+1)`, preserving the magnitude at mapped
/// frequencies. Zeros at analog infinity land at z = -1.
pub(crate) fn bilinear(zpk: Zpk, fs: f64) -> Zpk {
    let fs2 = 2.0 * fs;
    let degree = zpk.p.len() - zpk.z.len();

    let map = |roots: &[Complex64]| -> Vec<Complex64> {
        roots.iter().map(|&r| (fs2 + r) / (fs2 - r)).collect()
    };

    let mut z = map(&zpk.z);
    let p = map(&zpk.p);
    z.extend(std::iter::repeat(Complex64::new(-1.0, 0.0)).take(degree));

    let num: Complex64 = zpk
        .z
        .iter()
        .fold(Complex64::new(1.0, 0.0), |acc, &zi| acc * (fs2 - zi));
    let den: Complex64 = zpk
        .p
        .iter()
        .fold(Complex64::new(1.0, 0.0), |acc, &pi| acc * (fs2 - pi));
    let k = zpk.k * (num / den).re;

    Zpk { z, p, k }
}
