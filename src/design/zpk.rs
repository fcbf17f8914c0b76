//! Analog lowpass prototypes in zero/pole/gain form.
//!
//! Each prototype is normalized to an angular cutoff of 1 rad/s (phase-
//! matched for Bessel) and is later frequency-transformed and bilinear-
//! mapped by the digital design driver. Keeping the factored form all the
//! way to the second-order-section pairing is what keeps high orders
//! numerically sound.

use num_complex::Complex64;

use crate::design::special::{
    ellipk, polynomial_roots, sncndn, solve_elliptic_modulus, solve_sc,
};
use crate::error::{FilterError, Result};

/// A transfer function as zeros, poles and gain:
/// `H(s) = k * prod(s - z_i) / prod(s - p_i)`.
#[derive(Debug, Clone)]
pub(crate) struct Zpk {
    pub z: Vec<Complex64>,
    pub p: Vec<Complex64>,
    pub k: f64,
}

/// Product of `(-v)` over a set of roots; 1 for an empty set.
pub(crate) fn prod_neg(values: &[Complex64]) -> Complex64 {
    values
        .iter()
        .fold(Complex64::new(1.0, 0.0), |acc, &v| acc * (-v))
}

/// Butterworth prototype: poles equally spaced on the left unit
/// semicircle, maximally flat passband.
pub(crate) fn buttap(order: usize) -> Zpk {
    let n = order as f64;
    let p = (0..order)
        .map(|i| {
            let m = (2 * i as i64 + 1 - order as i64) as f64;
            let theta = std::f64::consts::PI * m / (2.0 * n);
            -Complex64::new(0.0, theta).exp()
        })
        .collect();
    Zpk {
        z: vec![],
        p,
        k: 1.0,
    }
}

/// Chebyshev Type I prototype: equiripple passband with `ripple_db` of
/// ripple, poles on an ellipse.
pub(crate) fn cheb1ap(order: usize, ripple_db: f64) -> Zpk {
    let n = order as f64;
    let eps = (10.0_f64.powf(0.1 * ripple_db) - 1.0).sqrt();
    let mu = (1.0 / eps).asinh() / n;

    let p: Vec<Complex64> = (0..order)
        .map(|i| {
            let m = (2 * i as i64 + 1 - order as i64) as f64;
            let theta = std::f64::consts::PI * m / (2.0 * n);
            -Complex64::new(mu, theta).sinh()
        })
        .collect();

    let mut k = prod_neg(&p).re;
    if order % 2 == 0 {
        k /= (1.0 + eps * eps).sqrt();
    }
    Zpk { z: vec![], p, k }
}

/// Chebyshev Type II (inverse Chebyshev) prototype: flat passband,
/// equiripple stopband `attenuation_db` down, zeros on the imaginary
/// axis.
pub(crate) fn cheb2ap(order: usize, attenuation_db: f64) -> Zpk {
    let n = order as f64;
    let de = 1.0 / (10.0_f64.powf(0.1 * attenuation_db) - 1.0).sqrt();
    let mu = (1.0 / de).asinh() / n;

    // Zero angles skip the middle index for odd orders (no zero at
    // infinity is produced twice)
    let m_zeros: Vec<f64> = if order % 2 == 1 {
        let mut v: Vec<f64> = (1..order).step_by(2).map(|i| -(order as f64) + i as f64).collect();
        v.extend((2..order).step_by(2).map(|i| i as f64));
        v
    } else {
        (0..order)
            .map(|i| (2 * i as i64 + 1 - order as i64) as f64)
            .collect()
    };
    let z: Vec<Complex64> = m_zeros
        .iter()
        .map(|&m| {
            let angle = m * std::f64::consts::PI / (2.0 * n);
            Complex64::new(0.0, 1.0 / angle.sin())
        })
        .collect();

    let p: Vec<Complex64> = (0..order)
        .map(|i| {
            let m = (2 * i as i64 + 1 - order as i64) as f64;
            let theta = std::f64::consts::PI * m / (2.0 * n);
            let warped = -Complex64::new(0.0, theta).exp();
            let stretched = Complex64::new(mu.sinh() * warped.re, mu.cosh() * warped.im);
            1.0 / stretched
        })
        .collect();

    let k = (prod_neg(&p) / prod_neg(&z)).re;
    Zpk { z, p, k }
}

/// Elliptic (Cauer) prototype: equiripple in both bands, the sharpest
/// transition achievable at a given order.
///
/// The elliptic modulus is found by solving the degree equation
/// `K(m)/K(1-m) = n*K(k1^2)/K(1-k1^2)` by bisection; zeros and poles then
/// follow from Jacobi elliptic functions on the quarter-period grid.
pub(crate) fn ellipap(order: usize, ripple_db: f64, attenuation_db: f64) -> Result<Zpk> {
    if order == 1 {
        // Degenerates to a real pole matching the passband edge gain
        let p = -(1.0 / (10.0_f64.powf(0.1 * ripple_db) - 1.0)).sqrt();
        return Ok(Zpk {
            z: vec![],
            p: vec![Complex64::new(p, 0.0)],
            k: -p,
        });
    }

    let n = order as f64;
    let eps_sq = 10.0_f64.powf(0.1 * ripple_db) - 1.0;
    let eps = eps_sq.sqrt();
    let ck1_sq = eps_sq / (10.0_f64.powf(0.1 * attenuation_db) - 1.0);

    let val0 = ellipk(ck1_sq);
    let val1 = ellipk(1.0 - ck1_sq);
    let m = solve_elliptic_modulus(n * val0 / val1)?;
    let capk = ellipk(m);

    // Jacobi grid over the odd (even order) or even (odd order) indices
    let start = 1 - order % 2;
    let grid: Vec<(f64, f64, f64)> = (start..order)
        .step_by(2)
        .map(|j| sncndn(j as f64 * capk / n, 1.0 - m))
        .collect();

    let mut z: Vec<Complex64> = Vec::new();
    for &(s, _, _) in &grid {
        if s.abs() > 1.0e-12 {
            let zz = 1.0 / (m.sqrt() * s);
            z.push(Complex64::new(0.0, zz));
            z.push(Complex64::new(0.0, -zz));
        }
    }

    // v0 solves sc(u, 1 - ck1^2) = 1/eps; poles come from the addition
    // theorem evaluated at (j*K/n, v0)
    let r = solve_sc(1.0 / eps, 1.0 - ck1_sq)?;
    let v0 = capk * r / (n * val0);
    let (sv, cv, dv) = sncndn(v0, m);

    let mut p: Vec<Complex64> = Vec::new();
    for &(s, c, d) in &grid {
        let denom = 1.0 - (d * sv) * (d * sv);
        let re = -(c * d * sv * cv) / denom;
        let im = -(s * dv) / denom;
        if im.abs() > 1.0e-10 * (1.0 + re.abs()) {
            p.push(Complex64::new(re, im));
            p.push(Complex64::new(re, -im));
        } else {
            p.push(Complex64::new(re, 0.0));
        }
    }

    let mut k = (prod_neg(&p) / prod_neg(&z)).re;
    if order % 2 == 0 {
        k /= (1.0 + eps_sq).sqrt();
    }
    log::debug!(
        "ellipap: order {} -> {} zeros, {} poles, modulus {:.6}",
        order,
        z.len(),
        p.len(),
        m
    );
    Ok(Zpk { z, p, k })
}

/// Bessel prototype, phase-normalized: the nominal cutoff matches the
/// phase midpoint (matched group delay), not the -3 dB magnitude point.
///
/// Poles are the roots of the reverse Bessel polynomial, found on the
/// rescaled (unit constant term) polynomial so the root finder works on
/// well-conditioned coefficients.
pub(crate) fn besselap(order: usize) -> Result<Zpk> {
    // Root-finder precision degrades past this point
    const MAX_BESSEL_ORDER: usize = 24;
    if order > MAX_BESSEL_ORDER {
        return Err(FilterError::InvalidOrder {
            order,
            reason: "Bessel designs are limited to order 24",
        });
    }

    // Reverse Bessel polynomial coefficients, computed downward from the
    // monic leading term: c[k-1]/c[k] = (2n-k+1)*k / (2*(n-k+1))
    let n = order as f64;
    let mut c = vec![0.0_f64; order + 1];
    c[order] = 1.0;
    for k in (1..=order).rev() {
        let kf = k as f64;
        c[k - 1] = c[k] * (2.0 * n - kf + 1.0) * kf / (2.0 * (n - kf + 1.0));
    }
    let a0 = c[0];

    // Substitute s = a0^(1/n) * t: the scaled polynomial is monic with
    // unit constant term and its roots are the phase-normalized poles.
    let scale = a0.powf(1.0 / n);
    let mut d = vec![0.0_f64; order + 1];
    for (k, dk) in d.iter_mut().enumerate() {
        *dk = c[k] * scale.powi(k as i32) / a0;
    }

    let p = polynomial_roots(&d)?;
    Ok(Zpk {
        z: vec![],
        p,
        k: 1.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    /// |H(jw)| of a prototype evaluated from the factored form.
    fn proto_mag(zpk: &Zpk, w: f64) -> f64 {
        let jw = Complex64::new(0.0, w);
        let num: Complex64 = zpk
            .z
            .iter()
            .fold(Complex64::new(1.0, 0.0), |acc, &z| acc * (jw - z));
        let den: Complex64 = zpk
            .p
            .iter()
            .fold(Complex64::new(1.0, 0.0), |acc, &p| acc * (jw - p));
        (zpk.k * num / den).norm()
    }

    #[test]
    fn test_buttap_pole_placement() {
        let zpk = buttap(4);
        assert!(zpk.z.is_empty());
        assert_eq!(zpk.p.len(), 4);
        for p in &zpk.p {
            assert!(approx_eq(p.norm(), 1.0, 1e-12), "pole off unit circle");
            assert!(p.re < 0.0, "unstable prototype pole");
        }
        // -3.0103 dB at the cutoff, unity at DC
        assert!(approx_eq(proto_mag(&zpk, 0.0), 1.0, 1e-12));
        assert!(approx_eq(proto_mag(&zpk, 1.0), 1.0 / 2.0_f64.sqrt(), 1e-12));
    }

    #[test]
    fn test_buttap_odd_order_has_real_pole() {
        let zpk = buttap(5);
        let real_poles: Vec<_> = zpk.p.iter().filter(|p| p.im.abs() < 1e-12).collect();
        assert_eq!(real_poles.len(), 1);
        assert!(approx_eq(real_poles[0].re, -1.0, 1e-12));
    }

    #[test]
    fn test_cheb1ap_gain_at_edges() {
        let rp = 1.0;
        for order in [2usize, 3, 4, 5, 6] {
            let zpk = cheb1ap(order, rp);
            assert_eq!(zpk.p.len(), order);
            // Passband edge sits exactly rp below unity
            let edge = 20.0 * proto_mag(&zpk, 1.0).log10();
            assert!(
                approx_eq(edge, -rp, 1e-8),
                "order {}: edge at {} dB",
                order,
                edge
            );
            // DC: unity for odd orders, -rp for even (equiripple trough)
            let dc = 20.0 * proto_mag(&zpk, 0.0).log10();
            let expected = if order % 2 == 1 { 0.0 } else { -rp };
            assert!(
                approx_eq(dc, expected, 1e-8),
                "order {}: DC at {} dB",
                order,
                dc
            );
        }
    }

    #[test]
    fn test_cheb2ap_stopband_edge() {
        let rs = 40.0;
        for order in [2usize, 3, 4, 5] {
            let zpk = cheb2ap(order, rs);
            assert_eq!(zpk.p.len(), order);
            // Zeros: order for even, order-1 for odd
            assert_eq!(zpk.z.len(), order - order % 2);
            // Unity at DC, exactly -rs at the stopband edge
            assert!(approx_eq(proto_mag(&zpk, 0.0), 1.0, 1e-8));
            let edge = 20.0 * proto_mag(&zpk, 1.0).log10();
            assert!(
                approx_eq(edge, -rs, 1e-6),
                "order {}: stopband edge at {} dB",
                order,
                edge
            );
        }
    }

    #[test]
    fn test_ellipap_band_edges() {
        let rp = 0.5;
        let rs = 60.0;
        for order in [2usize, 3, 4, 5] {
            let zpk = ellipap(order, rp, rs).unwrap();
            assert_eq!(zpk.p.len(), order);
            // Passband edge exactly rp down
            let edge = 20.0 * proto_mag(&zpk, 1.0).log10();
            assert!(
                approx_eq(edge, -rp, 1e-6),
                "order {}: passband edge at {} dB",
                order,
                edge
            );
            // Inside the passband the ripple stays within rp of unity
            for w in [0.2, 0.5, 0.9] {
                let mag = 20.0 * proto_mag(&zpk, w).log10();
                assert!(
                    mag <= 0.01 && mag >= -rp - 0.01,
                    "order {}: {} dB at w={} in passband",
                    order,
                    mag,
                    w
                );
            }
            // Past the first transmission zero the response stays at or
            // below the equiripple stopband level
            let ws = zpk
                .z
                .iter()
                .map(|z| z.norm())
                .fold(f64::INFINITY, f64::min);
            for w in [1.5 * ws, 3.0 * ws, 10.0 * ws] {
                let mag = 20.0 * proto_mag(&zpk, w).log10();
                assert!(
                    mag <= -rs + 0.5,
                    "order {}: {} dB at w={} in stopband",
                    order,
                    mag,
                    w
                );
            }
        }
    }

    #[test]
    fn test_ellipap_order_one_matches_edge() {
        let zpk = ellipap(1, 0.5, 60.0).unwrap();
        let edge = 20.0 * proto_mag(&zpk, 1.0).log10();
        assert!(approx_eq(edge, -0.5, 1e-10));
    }

    #[test]
    fn test_besselap_unity_dc_and_stability() {
        for order in [1usize, 2, 3, 5, 8] {
            let zpk = besselap(order).unwrap();
            assert_eq!(zpk.p.len(), order);
            assert!(approx_eq(proto_mag(&zpk, 0.0), 1.0, 1e-9), "order {}", order);
            for p in &zpk.p {
                assert!(p.re < 0.0, "order {}: unstable pole {}", order, p);
            }
        }
    }

    #[test]
    fn test_besselap_second_order_known_roots() {
        // theta_2 scaled: poles at (-3 +/- j*sqrt(3)) / 2, then divided
        // by 3^(1/2)
        let zpk = besselap(2).unwrap();
        let scale = 3.0_f64.sqrt();
        let mut poles = zpk.p.clone();
        poles.sort_by(|a, b| a.im.partial_cmp(&b.im).unwrap());
        assert!(approx_eq(poles[0].re, -1.5 / scale, 1e-10));
        assert!(approx_eq(poles[0].im, -(3.0_f64.sqrt() / 2.0) / scale, 1e-10));
        assert!(approx_eq(poles[1].im, (3.0_f64.sqrt() / 2.0) / scale, 1e-10));
    }

    #[test]
    fn test_besselap_rejects_extreme_order() {
        assert!(besselap(25).is_err());
    }
}
