//! Unconstrained parametrisation of the orbit state for the simplex search.
//!
//! `vp = softplus(x)` maps ℝ onto `(0, ∞)` and `de = 2·logistic(y)` maps ℝ onto `(0, 2)`,
//! so the simplex can move freely while every evaluated state stays in the bound domain.

/// Softplus `ln(1 + eˣ)`, linear above 20 to avoid overflow.
#[inline]
pub fn safe_softplus(x: f64) -> f64 {
    if x > 20.0 {
        x
    } else {
        x.exp().ln_1p()
    }
}

/// Inverse of [`safe_softplus`] on `(0, ∞)`, `ln(eˣ - 1)`.
#[inline]
pub fn safe_softplus_inv(x: f64) -> f64 {
    if x > 20.0 {
        x
    } else {
        x.exp_m1().ln()
    }
}

/// Logistic function `1 / (1 + e⁻ʸ)`, evaluated on the side that cannot overflow.
#[inline]
pub fn logistic(y: f64) -> f64 {
    if y >= 0.0 {
        1.0 / (1.0 + (-y).exp())
    } else {
        let e = y.exp();
        e / (1.0 + e)
    }
}

/// Inverse of [`logistic`] on `(0, 1)`.
#[inline]
pub fn logit(p: f64) -> f64 {
    (p / (1.0 - p)).ln()
}

/// Unconstrained coordinates → `(vp, de)`.
#[inline]
pub fn to_orbit(x: f64, y: f64) -> (f64, f64) {
    (safe_softplus(x), 2.0 * logistic(y))
}

/// `(vp, de)` → unconstrained coordinates. Requires `vp > 0` and `0 < de < 2`.
#[inline]
pub fn from_orbit(vp: f64, de: f64) -> (f64, f64) {
    (safe_softplus_inv(vp), logit(0.5 * de))
}

#[cfg(test)]
mod transform_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn inverse_pairs() {
        for &(vp, de) in &[(0.5, 0.4), (1e-3, 1e-4), (0.035, 1.99), (25.0, 1.0)] {
            let (x, y) = from_orbit(vp, de);
            let (vp2, de2) = to_orbit(x, y);
            assert_relative_eq!(vp2, vp, max_relative = 1e-12);
            assert_relative_eq!(de2, de, max_relative = 1e-12);
        }
    }

    #[test]
    fn bounded_images() {
        for y in [-800.0, -50.0, 0.0, 50.0, 800.0] {
            let de = 2.0 * logistic(y);
            assert!((0.0..=2.0).contains(&de));
            assert!(de.is_finite());
        }
        assert!(safe_softplus(-800.0) >= 0.0);
        assert_eq!(safe_softplus(100.0), 100.0);
        assert_relative_eq!(logistic(0.0), 0.5);
    }
}
