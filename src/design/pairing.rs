//! Pairing of digital zeros and poles into second-order sections.
//!
//! Pole pairs are matched with their nearest zero pairs so intermediate
//! section gains stay bounded, and the sections whose poles sit closest
//! to the unit circle are applied last. The overall gain is folded into
//! the first section's numerator.

use num_complex::Complex64;

use crate::biquad::{Biquad, SosCascade};
use crate::design::zpk::Zpk;
use crate::error::{FilterError, Result};

/// A first- or second-order group of roots.
#[derive(Debug, Clone, Copy)]
struct RootPair {
    first: Complex64,
    second: Option<Complex64>,
}

impl RootPair {
    fn centroid(&self) -> Complex64 {
        match self.second {
            Some(s) => (self.first + s) * 0.5,
            None => self.first,
        }
    }

    /// Expands `(x - r1)(x - r2)` into real `[1, c1, c0]` coefficients.
    /// Conjugate pairs and real pairs both yield real products.
    fn expand(&self) -> (f64, f64) {
        match self.second {
            Some(s) => (-(self.first + s).re, (self.first * s).re),
            None => (-self.first.re, 0.0),
        }
    }

    fn max_norm(&self) -> f64 {
        match self.second {
            Some(s) => self.first.norm().max(s.norm()),
            None => self.first.norm(),
        }
    }
}

/// Groups roots into conjugate pairs plus pairs of reals.
///
/// Complex roots are cleaned to exact conjugate symmetry (the positive-
/// imaginary member is kept and mirrored), which keeps the expanded
/// section coefficients exactly real.
fn group_pairs(mut roots: Vec<Complex64>) -> Result<Vec<RootPair>> {
    let tol = 1.0e-8;
    let mut pairs = Vec::new();
    let mut reals = Vec::new();
    let mut negatives = 0usize;

    roots.sort_by(|a, b| {
        a.re.partial_cmp(&b.re)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.im.partial_cmp(&b.im).unwrap_or(std::cmp::Ordering::Equal))
    });
    for r in &roots {
        if r.im.abs() <= tol * (1.0 + r.norm()) {
            reals.push(r.re);
        } else if r.im > 0.0 {
            pairs.push(RootPair {
                first: *r,
                second: Some(r.conj()),
            });
        } else {
            negatives += 1;
        }
    }
    if negatives != pairs.len() {
        return Err(FilterError::NumericalInstability {
            context: "root set is not conjugate-symmetric",
        });
    }

    reals.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mut it = reals.chunks_exact(2);
    for chunk in &mut it {
        pairs.push(RootPair {
            first: Complex64::new(chunk[0], 0.0),
            second: Some(Complex64::new(chunk[1], 0.0)),
        });
    }
    if let [leftover] = it.remainder() {
        pairs.push(RootPair {
            first: Complex64::new(*leftover, 0.0),
            second: None,
        });
    }
    Ok(pairs)
}

/// Converts a digital zero/pole/gain filter into a second-order-section
/// cascade.
pub(crate) fn zpk2sos(zpk: Zpk) -> Result<SosCascade> {
    let Zpk { mut z, mut p, k } = zpk;
    debug_assert_eq!(z.len(), p.len(), "bilinear output must be balanced");

    if p.is_empty() {
        return SosCascade::new(vec![Biquad::new(k, 0.0, 0.0, 0.0, 0.0)]);
    }
    // Odd order: pad with a canceling pole/zero pair at the origin so
    // everything groups into sections
    if p.len() % 2 == 1 {
        z.push(Complex64::new(0.0, 0.0));
        p.push(Complex64::new(0.0, 0.0));
    }

    let mut zero_pairs = group_pairs(z)?;
    let mut pole_pairs = group_pairs(p)?;

    // Apply the best-damped sections first; poles closest to the unit
    // circle run last where their input is already band-limited
    pole_pairs.sort_by(|a, b| {
        let da = (1.0 - a.max_norm()).abs();
        let db = (1.0 - b.max_norm()).abs();
        db.partial_cmp(&da).unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut sections = Vec::with_capacity(pole_pairs.len());
    for pole_pair in &pole_pairs {
        // Nearest remaining zero pair by centroid distance
        let (idx, _) = zero_pairs
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                let da = (a.centroid() - pole_pair.centroid()).norm();
                let db = (b.centroid() - pole_pair.centroid()).norm();
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
            .ok_or(FilterError::NumericalInstability {
                context: "zero/pole pair count mismatch",
            })?;
        let zero_pair = zero_pairs.swap_remove(idx);

        let (b1, b2) = zero_pair.expand();
        let (a1, a2) = pole_pair.expand();
        sections.push(Biquad::new(1.0, b1, b2, a1, a2));
    }

    // Overall gain lives in the first section
    if let Some(first) = sections.first_mut() {
        first.b0 *= k;
        first.b1 *= k;
        first.b2 *= k;
    }

    log::debug!(
        "zpk2sos: paired {} sections (gain {:.6e} in first)",
        sections.len(),
        k
    );
    SosCascade::new(sections)
}
