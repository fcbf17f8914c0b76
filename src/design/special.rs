//! Special functions backing the analog prototype designers.
//!
//! Complete elliptic integrals via the arithmetic-geometric mean, Jacobi
//! elliptic functions via descending Landen transformations, and a
//! Durand-Kerner root finder for the Bessel prototype polynomials.

use num_complex::Complex64;

use crate::error::{FilterError, Result};

/// Complete elliptic integral of the first kind `K(m)` in the parameter
/// convention (`m = k^2`).
///
/// Computed as `pi / (2 * agm(1, sqrt(1 - m)))`; diverges as `m -> 1`.
pub(crate) fn ellipk(m: f64) -> f64 {
    if m >= 1.0 {
        return f64::INFINITY;
    }
    let mut a = 1.0_f64;
    let mut b = (1.0 - m).sqrt();
    while (a - b).abs() > f64::EPSILON * a {
        let an = 0.5 * (a + b);
        b = (a * b).sqrt();
        a = an;
    }
    std::f64::consts::PI / (2.0 * a)
}

/// Jacobi elliptic functions `(sn, cn, dn)` of argument `u` with
/// complementary parameter `mc = 1 - m`, by the descending Landen
/// (Gauss) transformation.
pub(crate) fn sncndn(u: f64, mc: f64) -> (f64, f64, f64) {
    const CA: f64 = 1.0e-8;

    if mc.abs() < 1.0e-16 {
        // m = 1 limit: hyperbolic
        let sn = u.tanh();
        let cn = 1.0 / u.cosh();
        return (sn, cn, cn);
    }

    let mut emc = mc;
    let mut a = 1.0_f64;
    let mut dn = 1.0_f64;
    let mut em = [0.0_f64; 14];
    let mut en = [0.0_f64; 14];
    let mut c = 0.0_f64;
    let mut l = 0usize;

    for i in 0..13 {
        l = i;
        em[i] = a;
        emc = emc.sqrt();
        en[i] = emc;
        c = 0.5 * (a + emc);
        if (a - emc).abs() <= CA * a {
            break;
        }
        emc *= a;
        a = c;
    }

    let uc = c * u;
    let mut sn = uc.sin();
    let mut cn = uc.cos();
    if sn != 0.0 {
        let mut aa = cn / sn;
        let mut cc = c * aa;
        for ii in (0..=l).rev() {
            let b = em[ii];
            aa *= cc;
            cc *= dn;
            dn = (en[ii] + aa) / (b + aa);
            aa = cc / b;
        }
        let amp = 1.0 / (cc * cc + 1.0).sqrt();
        sn = if sn < 0.0 { -amp } else { amp };
        cn = cc * sn;
    }
    (sn, cn, dn)
}

/// Solves `K(m) / K(1 - m) = target` for the elliptic modulus parameter
/// `m` by bisection. The left side is continuous and strictly increasing
/// on (0, 1).
pub(crate) fn solve_elliptic_modulus(target: f64) -> Result<f64> {
    let ratio = |m: f64| ellipk(m) / ellipk(1.0 - m);
    let mut lo = 1.0e-15;
    let mut hi = 1.0 - 1.0e-15;
    if ratio(lo) > target || ratio(hi) < target {
        return Err(FilterError::NumericalInstability {
            context: "elliptic modulus out of solvable range",
        });
    }
    for _ in 0..200 {
        let mid = 0.5 * (lo + hi);
        if ratio(mid) < target {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Ok(0.5 * (lo + hi))
}

/// Solves `sn(u, m) / cn(u, m) = target` for `u` in `(0, K(m))` by
/// bisection, with `m` in the parameter convention. `sc` grows
/// monotonically from 0 to infinity on the interval.
pub(crate) fn solve_sc(target: f64, m: f64) -> Result<f64> {
    let quarter = ellipk(m);
    let sc = |u: f64| {
        let (s, c, _) = sncndn(u, 1.0 - m);
        s / c
    };
    let mut lo = 0.0_f64;
    let mut hi = quarter * (1.0 - 1.0e-14);
    if sc(hi) < target {
        return Err(FilterError::NumericalInstability {
            context: "elliptic pole placement: sc equation out of range",
        });
    }
    for _ in 0..200 {
        let mid = 0.5 * (lo + hi);
        if sc(mid) < target {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Ok(0.5 * (lo + hi))
}

/// Finds all roots of a monic real polynomial by Durand-Kerner iteration.
///
/// `coeffs[k]` is the coefficient of `x^k`; the leading coefficient must
/// be 1. Convergence is checked on the largest per-root update.
pub(crate) fn polynomial_roots(coeffs: &[f64]) -> Result<Vec<Complex64>> {
    let degree = coeffs.len() - 1;
    debug_assert!(degree >= 1);
    debug_assert!((coeffs[degree] - 1.0).abs() < 1e-12);

    let eval = |x: Complex64| {
        let mut acc = Complex64::new(0.0, 0.0);
        for &c in coeffs.iter().rev() {
            acc = acc * x + c;
        }
        acc
    };

    // Standard non-real, non-unit-modulus seeds spread around a circle
    let seed = Complex64::new(0.4, 0.9);
    let mut roots: Vec<Complex64> = (0..degree).map(|i| seed.powu(i as u32 + 1)).collect();

    for iter in 0..500 {
        let mut max_delta = 0.0_f64;
        for i in 0..degree {
            let mut den = Complex64::new(1.0, 0.0);
            for j in 0..degree {
                if j != i {
                    den *= roots[i] - roots[j];
                }
            }
            if den.norm() < 1e-300 {
                // Coincident iterates: nudge apart and keep going
                roots[i] += Complex64::new(1e-6, 1e-6);
                max_delta = f64::INFINITY;
                continue;
            }
            let delta = eval(roots[i]) / den;
            roots[i] -= delta;
            max_delta = max_delta.max(delta.norm() / (1.0 + roots[i].norm()));
        }
        if max_delta < 1e-14 {
            log::debug!(
                "Durand-Kerner converged after {} iterations (degree {})",
                iter + 1,
                degree
            );
            return Ok(roots);
        }
    }

    Err(FilterError::NumericalInstability {
        context: "polynomial root finding did not converge",
    })
}
