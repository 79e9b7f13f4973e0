//! # First post-Newtonian burst map
//!
//! The 1PN map multiplies each Newtonian quantity by `(1 + X·vp²)` where `X` is a
//! polynomial in the eccentricity deficit `de` (first order, like the Newtonian factors)
//! and the symmetric mass ratio `eta`:
//!
//! ```text
//! Δvp = ΔvpN(vp0, de0) · (1 + V2(de0, eta)·vp0²)
//! Δde = ΔdeN(vp0, de0) · (1 + D2(de0, eta)·vp0²)
//! T   = TN(vp1, de1)   · (1 + P2(de1, eta)·vp1²)
//! f   = fN(vp1, de1)   · (1 - R2(de1, eta)·vp1²)
//! ```
//!
//! The period and the burst frequency are evaluated at the **advanced** state
//! `(vp1, de1) = (vp0 + Δvp, de0 + Δde)`: the burst that closes an orbit is emitted by
//! the orbit that radiation reaction has already shrunk.
//!
//! ## Coefficients
//!
//! The four polynomials come from the harmonic-gauge 1PN two-body problem:
//!
//! * `P2`, `R2` from the 1PN radial period `T = 2π·B/(-A)^{3/2}` of the radial equation
//!   `ṙ² = A + 2B/r + C/r² + D/r³`, and from the 1PN pericenter distance, both expressed
//!   in `(vp, de)`;
//! * `V2`, `D2` from the orbit-averaged 1PN energy and angular-momentum fluxes, mapped
//!   back to `(vp, de)` through the 1PN energy and angular momentum at pericenter.
//!
//! Every polynomial is truncated at first order in `de`.
//!
//! ## Models
//!
//! The coefficients are injected through the [`CorrectionModel`] trait.
//! [`FirstPostNewtonian`] is the physical model; [`NewtonianOnly`] zeroes every
//! coefficient, which reduces the map to the Newtonian quantities evaluated at the
//! Newtonian-advanced state.
//!
//! ## See also
//!
//! * [`crate::evolution::newtonian`] – the Newtonian factors.
//! * [`crate::orbit_state::OrbitState`] – checked evaluation of the same map.
use crate::constants::{Hertz, Seconds};
use crate::evolution::newtonian::{
    newtonian_burst_frequency, newtonian_delta_eccentricity, newtonian_delta_pericenter_speed,
    newtonian_period,
};

// -------------------------------------------------------------------------------------------------
// V2: pericenter-speed change, V2 = V2_0 + V2_0_ETA·eta + (V2_1 + V2_1_ETA·eta)·de
// -------------------------------------------------------------------------------------------------

pub const V2_0: f64 = 8321.0 / 2080.0;
pub const V2_0_ETA: f64 = -251.0 / 104.0;
pub const V2_1: f64 = 84521.0 / 135200.0;
pub const V2_1_ETA: f64 = 11109.0 / 6760.0;

// -------------------------------------------------------------------------------------------------
// D2: eccentricity-deficit change
// -------------------------------------------------------------------------------------------------

pub const D2_0: f64 = 3173.0 / 800.0;
pub const D2_0_ETA: f64 = -3507.0 / 680.0;
pub const D2_1: f64 = 47923.0 / 20000.0;
pub const D2_1_ETA: f64 = -819.0 / 289000.0;

// -------------------------------------------------------------------------------------------------
// P2: radial period
// -------------------------------------------------------------------------------------------------

pub const P2_0: f64 = -15.0 / 4.0;
pub const P2_0_ETA: f64 = 21.0 / 8.0;
pub const P2_1: f64 = 3.0 / 4.0;
pub const P2_1_ETA: f64 = -5.0 / 8.0;

// -------------------------------------------------------------------------------------------------
// R2: burst frequency (enters with a minus sign)
// -------------------------------------------------------------------------------------------------

pub const R2_0: f64 = -5.0 / 2.0;
pub const R2_0_ETA: f64 = 7.0 / 4.0;
pub const R2_1: f64 = -1.0;
pub const R2_1_ETA: f64 = -1.0 / 4.0;

#[inline]
fn first_order(c0: f64, c0_eta: f64, c1: f64, c1_eta: f64, de: f64, eta: f64) -> f64 {
    c0 + c0_eta * eta + (c1 + c1_eta * eta) * de
}

/// 1PN correction to the pericenter-speed change.
#[inline]
pub fn v2(de: f64, eta: f64) -> f64 {
    first_order(V2_0, V2_0_ETA, V2_1, V2_1_ETA, de, eta)
}

/// 1PN correction to the eccentricity-deficit change.
#[inline]
pub fn d2(de: f64, eta: f64) -> f64 {
    first_order(D2_0, D2_0_ETA, D2_1, D2_1_ETA, de, eta)
}

/// 1PN correction to the radial period.
#[inline]
pub fn p2(de: f64, eta: f64) -> f64 {
    first_order(P2_0, P2_0_ETA, P2_1, P2_1_ETA, de, eta)
}

/// 1PN correction to the burst frequency.
#[inline]
pub fn r2(de: f64, eta: f64) -> f64 {
    first_order(R2_0, R2_0_ETA, R2_1, R2_1_ETA, de, eta)
}

/// Source of the four correction coefficients of the burst map.
///
/// Implementors only provide the coefficients; the map itself (the provided methods) is
/// shared, so every model applies the corrections in the same order. All provided
/// methods are raw `f64` evaluations with IEEE semantics.
pub trait CorrectionModel {
    /// Short identifier used in logs and `Display` output.
    fn name(&self) -> &'static str;

    fn v2(&self, de: f64, eta: f64) -> f64;
    fn d2(&self, de: f64, eta: f64) -> f64;
    fn p2(&self, de: f64, eta: f64) -> f64;
    fn r2(&self, de: f64, eta: f64) -> f64;

    /// Corrected change of the pericenter speed over one orbit starting at `(vp0, de0)`.
    fn delta_pericenter_speed(&self, vp0: f64, de0: f64, eta: f64) -> f64 {
        newtonian_delta_pericenter_speed(vp0, de0, eta) * (1.0 + self.v2(de0, eta) * vp0 * vp0)
    }

    /// Corrected change of the eccentricity deficit over one orbit starting at `(vp0, de0)`.
    fn delta_eccentricity(&self, vp0: f64, de0: f64, eta: f64) -> f64 {
        newtonian_delta_eccentricity(vp0, de0, eta) * (1.0 + self.d2(de0, eta) * vp0 * vp0)
    }

    /// Orbit state one radial period later, `(vp0 + Δvp, de0 + Δde)`.
    fn advance(&self, vp0: f64, de0: f64, eta: f64) -> (f64, f64) {
        (
            vp0 + self.delta_pericenter_speed(vp0, de0, eta),
            de0 + self.delta_eccentricity(vp0, de0, eta),
        )
    }

    /// Time between the burst at `(vp0, de0)` and the next one.
    ///
    /// Arguments
    /// -----------------
    /// * `vp0`, `de0`: orbit state at the current burst.
    /// * `eta`: symmetric mass ratio.
    /// * `m`: total mass in seconds.
    ///
    /// Return
    /// ----------
    /// * `TN(vp1, de1)·(1 + P2(de1)·vp1²)` with `(vp1, de1)` the advanced state.
    fn period(&self, vp0: f64, de0: f64, eta: f64, m: f64) -> Seconds {
        let (vp1, de1) = self.advance(vp0, de0, eta);
        newtonian_period(vp1, de1, m) * (1.0 + self.p2(de1, eta) * vp1 * vp1)
    }

    /// Frequency of the next burst, `fN(vp1, de1)·(1 - R2(de1)·vp1²)`.
    fn burst_frequency(&self, vp0: f64, de0: f64, eta: f64, m: f64) -> Hertz {
        let (vp1, de1) = self.advance(vp0, de0, eta);
        newtonian_burst_frequency(vp1, de1, m) * (1.0 - self.r2(de1, eta) * vp1 * vp1)
    }
}

/// Harmonic-gauge first post-Newtonian corrections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FirstPostNewtonian;

impl CorrectionModel for FirstPostNewtonian {
    fn name(&self) -> &'static str {
        "1PN"
    }

    fn v2(&self, de: f64, eta: f64) -> f64 {
        v2(de, eta)
    }

    fn d2(&self, de: f64, eta: f64) -> f64 {
        d2(de, eta)
    }

    fn p2(&self, de: f64, eta: f64) -> f64 {
        p2(de, eta)
    }

    fn r2(&self, de: f64, eta: f64) -> f64 {
        r2(de, eta)
    }
}

/// Every correction coefficient set to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NewtonianOnly;

impl CorrectionModel for NewtonianOnly {
    fn name(&self) -> &'static str {
        "Newtonian"
    }

    fn v2(&self, _de: f64, _eta: f64) -> f64 {
        0.0
    }

    fn d2(&self, _de: f64, _eta: f64) -> f64 {
        0.0
    }

    fn p2(&self, _de: f64, _eta: f64) -> f64 {
        0.0
    }

    fn r2(&self, _de: f64, _eta: f64) -> f64 {
        0.0
    }
}

/// 1PN change of the pericenter speed over one orbit.
pub fn pn_delta_pericenter_speed(vp0: f64, de0: f64, eta: f64) -> f64 {
    FirstPostNewtonian.delta_pericenter_speed(vp0, de0, eta)
}

/// 1PN change of the eccentricity deficit over one orbit.
pub fn pn_delta_eccentricity(vp0: f64, de0: f64, eta: f64) -> f64 {
    FirstPostNewtonian.delta_eccentricity(vp0, de0, eta)
}

/// 1PN time to the next burst, evaluated at the 1PN-advanced state.
pub fn pn_period(vp0: f64, de0: f64, eta: f64, m: f64) -> Seconds {
    FirstPostNewtonian.period(vp0, de0, eta, m)
}

/// 1PN frequency of the next burst, evaluated at the 1PN-advanced state.
pub fn pn_burst_frequency(vp0: f64, de0: f64, eta: f64, m: f64) -> Hertz {
    FirstPostNewtonian.burst_frequency(vp0, de0, eta, m)
}

#[cfg(test)]
mod post_newtonian_test {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector4;

    #[test]
    fn newtonian_only_reduces_to_newtonian_map() {
        let (vp0, de0, eta, m) = (0.2, 0.3, 0.16, 1.0);
        let vp1 = vp0 + newtonian_delta_pericenter_speed(vp0, de0, eta);
        let de1 = de0 + newtonian_delta_eccentricity(vp0, de0, eta);

        assert_eq!(
            NewtonianOnly.period(vp0, de0, eta, m),
            newtonian_period(vp1, de1, m)
        );
        assert_eq!(
            NewtonianOnly.burst_frequency(vp0, de0, eta, m),
            newtonian_burst_frequency(vp1, de1, m)
        );
        assert_eq!(NewtonianOnly.advance(vp0, de0, eta), (vp1, de1));
    }

    #[test]
    fn coefficients_at_reference_points() {
        // Test-mass, quasi-parabolic limit
        assert_relative_eq!(v2(0.0, 0.0), 8321.0 / 2080.0);
        assert_relative_eq!(d2(0.0, 0.0), 3173.0 / 800.0);
        assert_relative_eq!(p2(0.0, 0.0), -3.75);
        assert_relative_eq!(r2(0.0, 0.0), -2.5);

        // Equal-mass values
        assert_relative_eq!(v2(0.0, 0.25), 3533.0 / 1040.0, max_relative = 1e-14);
        assert_relative_eq!(d2(0.0, 0.25), 18203.0 / 6800.0, max_relative = 1e-14);
        assert_relative_eq!(
            v2(0.5, 0.125),
            15387.0 / 4160.0 + 0.5 * 224587.0 / 270400.0,
            max_relative = 1e-14
        );
        assert_relative_eq!(
            d2(0.5, 0.0625),
            198229.0 / 54400.0 + 0.5 * 55394893.0 / 23120000.0,
            max_relative = 1e-14
        );
        assert_relative_eq!(p2(1.0, 0.25), -3.75 + 21.0 / 32.0 + 0.75 - 5.0 / 32.0);
        assert_relative_eq!(r2(1.0, 0.25), -2.5 + 7.0 / 16.0 - 1.0 - 1.0 / 16.0);
    }

    /// Harmonic-gauge 1PN relative acceleration for unit total mass.
    fn harmonic_acceleration(state: &Vector4<f64>, eta: f64) -> Vector4<f64> {
        let (x, y, vx, vy) = (state[0], state[1], state[2], state[3]);
        let r = x.hypot(y);
        let (nx, ny) = (x / r, y / r);
        let v2 = vx * vx + vy * vy;
        let rdot = nx * vx + ny * vy;
        let a = (1.0 + 3.0 * eta) * v2 - 2.0 * (2.0 + eta) / r - 1.5 * eta * rdot * rdot;
        let b = -2.0 * (2.0 - eta) * rdot;
        let k = -1.0 / (r * r);
        Vector4::new(
            vx,
            vy,
            k * ((1.0 + a) * nx + b * vx),
            k * ((1.0 + a) * ny + b * vy),
        )
    }

    /// Integrates one radial period from pericenter with RK4 and returns
    /// `(period, apocenter distance)`.
    fn integrate_radial_period(rp: f64, vp: f64, eta: f64) -> (f64, f64) {
        let mut state = Vector4::new(rp, 0.0, 0.0, vp);
        let mut t = 0.0;
        let mut ra: f64 = rp;
        let mut outgoing = false;
        loop {
            let r = state[0].hypot(state[1]);
            let dt = 2e-3 * r.powf(1.5);
            let k1 = harmonic_acceleration(&state, eta);
            let k2 = harmonic_acceleration(&(state + k1 * (dt / 2.0)), eta);
            let k3 = harmonic_acceleration(&(state + k2 * (dt / 2.0)), eta);
            let k4 = harmonic_acceleration(&(state + k3 * dt), eta);
            let next = state + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (dt / 6.0);

            let rv_old = state[0] * state[2] + state[1] * state[3];
            let rv_new = next[0] * next[2] + next[1] * next[3];
            ra = ra.max(next[0].hypot(next[1]));
            if rv_old > 0.0 {
                outgoing = true;
            }
            if outgoing && rv_old < 0.0 && rv_new >= 0.0 {
                return (t + dt * rv_old / (rv_old - rv_new), ra);
            }
            state = next;
            t += dt;
        }
    }

    #[test]
    fn period_matches_integrated_harmonic_orbit() {
        let vp = 0.05;
        let rp = (2.0 - 0.2) / (vp * vp);
        for eta in [0.0, 0.25] {
            let (period, ra) = integrate_radial_period(rp, vp, eta);
            let de = 2.0 * rp / (rp + ra);
            let newtonian = newtonian_period(vp, de, 1.0);

            assert_relative_eq!(
                period,
                newtonian * (1.0 + p2(de, eta) * vp * vp),
                max_relative = 5e-4
            );
            // the correction itself is resolved
            assert!((period / newtonian - 1.0).abs() > 5e-3);
        }
    }

    #[test]
    fn corrections_are_small_at_low_speed() {
        let (de0, eta, m) = (0.25, 0.16, 1.0);
        let vp0 = 0.01;
        let pn = pn_period(vp0, de0, eta, m);
        let newt = NewtonianOnly.period(vp0, de0, eta, m);
        assert_relative_eq!(pn, newt, max_relative = 1e-3);

        let pn = pn_burst_frequency(vp0, de0, eta, m);
        let newt = NewtonianOnly.burst_frequency(vp0, de0, eta, m);
        assert_relative_eq!(pn, newt, max_relative = 1e-3);
    }

    #[test]
    fn pn_deltas_follow_the_formula() {
        let (vp0, de0, eta) = (0.1, 0.2, 0.2);
        assert_relative_eq!(
            pn_delta_pericenter_speed(vp0, de0, eta),
            newtonian_delta_pericenter_speed(vp0, de0, eta) * (1.0 + v2(de0, eta) * 0.01),
            max_relative = 1e-15
        );
        assert_relative_eq!(
            pn_delta_eccentricity(vp0, de0, eta),
            newtonian_delta_eccentricity(vp0, de0, eta) * (1.0 + d2(de0, eta) * 0.01),
            max_relative = 1e-15
        );
    }

    #[test]
    fn frequency_uses_minus_r2() {
        let (vp0, de0, eta, m) = (0.3, 0.5, 0.1, 2.0);
        let (vp1, de1) = FirstPostNewtonian.advance(vp0, de0, eta);
        let expected = newtonian_burst_frequency(vp1, de1, m) * (1.0 - r2(de1, eta) * vp1 * vp1);
        assert_eq!(pn_burst_frequency(vp0, de0, eta, m), expected);
        // R2 < 0 here, so the 1PN burst is at a higher frequency
        assert!(expected > newtonian_burst_frequency(vp1, de1, m));
    }

    #[test]
    fn model_names() {
        assert_eq!(FirstPostNewtonian.name(), "1PN");
        assert_eq!(NewtonianOnly.name(), "Newtonian");
    }
}
