//! # Orbit state at a pericenter passage
//!
//! [`OrbitState`] is the `(vp, de)` pair that the burst map advances from one burst to
//! the next. Its methods are the **checked** counterpart of the raw functions in
//! [`crate::evolution`]: the domain is validated before evaluation, and non-finite
//! results are turned into [`EccBurstError::NonFiniteResult`].
//!
//! Domain
//! -----------------
//! * `vp` finite and `≥ 0` (required at construction),
//! * `de` finite and `≥ 0` (required at construction),
//! * `0 < de < 2` for every period and frequency evaluation, at the current state and
//!   at the advanced state the corrected formulas are evaluated at.
use std::fmt;

use crate::binary::BinaryParameters;
use crate::constants::{Hertz, Seconds};
use crate::eccburst_errors::EccBurstError;
use crate::evolution::newtonian::{
    newtonian_burst_frequency, newtonian_pericenter_distance, newtonian_period,
};
use crate::evolution::post_newtonian::CorrectionModel;

/// Orbit state `(vp, de)` at a pericenter passage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitState {
    vp: f64,
    de: f64,
}

impl OrbitState {
    /// Build a state from a pericenter speed and an eccentricity deficit.
    ///
    /// Return
    /// ----------
    /// * `Err(EccBurstError::InvalidPericenterSpeed)` if `vp` is negative or not finite.
    /// * `Err(EccBurstError::InvalidEccentricityDeficit)` if `de` is negative or not finite.
    ///
    /// `de = 0` and `de ≥ 2` are accepted here; they are rejected by the evaluators.
    pub fn new(vp: f64, de: f64) -> Result<Self, EccBurstError> {
        if !(vp.is_finite() && vp >= 0.0) {
            return Err(EccBurstError::InvalidPericenterSpeed(vp));
        }
        if !(de.is_finite() && de >= 0.0) {
            return Err(EccBurstError::InvalidEccentricityDeficit(de));
        }
        Ok(OrbitState { vp, de })
    }

    /// Pericenter speed in units of c.
    pub fn vp(&self) -> f64 {
        self.vp
    }

    /// Eccentricity deficit `1 - e`.
    pub fn de(&self) -> f64 {
        self.de
    }

    pub fn eccentricity(&self) -> f64 {
        1.0 - self.de
    }

    /// True when `0 < de < 2`, i.e. the period and frequency formulas are finite.
    pub fn is_bound(&self) -> bool {
        self.de > 0.0 && self.de < 2.0
    }

    fn check_bound(&self) -> Result<(), EccBurstError> {
        if self.is_bound() {
            Ok(())
        } else {
            Err(EccBurstError::InvalidEccentricityDeficit(self.de))
        }
    }

    fn finite(value: f64, what: &'static str) -> Result<f64, EccBurstError> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(EccBurstError::NonFiniteResult(what))
        }
    }

    /// State one radial period later under the given correction model.
    ///
    /// Return
    /// ----------
    /// * The advanced state, or a domain error when radiation reaction drives `vp`
    ///   negative or `de` out of `[0, ∞)`.
    pub fn advance<M: CorrectionModel + ?Sized>(
        &self,
        binary: &BinaryParameters,
        model: &M,
    ) -> Result<OrbitState, EccBurstError> {
        let (vp1, de1) = model.advance(self.vp, self.de, binary.eta());
        OrbitState::new(vp1, de1)
    }

    /// Change of `(vp, de)` over one orbit, `(Δvp, Δde)`.
    pub fn deltas<M: CorrectionModel + ?Sized>(
        &self,
        binary: &BinaryParameters,
        model: &M,
    ) -> (f64, f64) {
        let eta = binary.eta();
        (
            model.delta_pericenter_speed(self.vp, self.de, eta),
            model.delta_eccentricity(self.vp, self.de, eta),
        )
    }

    /// Check the current state and its advanced state before a corrected evaluation.
    fn check_corrected<M: CorrectionModel + ?Sized>(
        &self,
        binary: &BinaryParameters,
        model: &M,
    ) -> Result<(), EccBurstError> {
        self.check_bound()?;
        self.advance(binary, model)?.check_bound()
    }

    /// Time to the next burst, evaluated at the advanced state.
    ///
    /// Arguments
    /// -----------------
    /// * `binary`: mass configuration (gives `eta` and the mass in seconds).
    /// * `model`: correction coefficients, [`FirstPostNewtonian`](crate::evolution::post_newtonian::FirstPostNewtonian)
    ///   for the physical map.
    ///
    /// Return
    /// ----------
    /// * The inter-burst time in seconds, identical to the raw
    ///   [`CorrectionModel::period`] for in-domain input.
    /// * A domain error if the current or advanced state has `de ∉ (0, 2)`, or if the
    ///   result is not finite.
    pub fn period<M: CorrectionModel + ?Sized>(
        &self,
        binary: &BinaryParameters,
        model: &M,
    ) -> Result<Seconds, EccBurstError> {
        self.check_corrected(binary, model)?;
        Self::finite(
            model.period(self.vp, self.de, binary.eta(), binary.mass_seconds()),
            "period",
        )
    }

    /// Frequency of the next burst, evaluated at the advanced state.
    pub fn burst_frequency<M: CorrectionModel + ?Sized>(
        &self,
        binary: &BinaryParameters,
        model: &M,
    ) -> Result<Hertz, EccBurstError> {
        self.check_corrected(binary, model)?;
        Self::finite(
            model.burst_frequency(self.vp, self.de, binary.eta(), binary.mass_seconds()),
            "burst frequency",
        )
    }

    /// Newtonian radial period of this very state (no advance, no correction).
    pub fn newtonian_period(&self, binary: &BinaryParameters) -> Result<Seconds, EccBurstError> {
        self.check_bound()?;
        Self::finite(
            newtonian_period(self.vp, self.de, binary.mass_seconds()),
            "Newtonian period",
        )
    }

    /// Newtonian frequency of the burst emitted by this very state.
    pub fn newtonian_burst_frequency(
        &self,
        binary: &BinaryParameters,
    ) -> Result<Hertz, EccBurstError> {
        self.check_bound()?;
        Self::finite(
            newtonian_burst_frequency(self.vp, self.de, binary.mass_seconds()),
            "Newtonian burst frequency",
        )
    }

    /// Pericenter distance in units of the total mass.
    pub fn pericenter_distance(&self) -> Result<f64, EccBurstError> {
        self.check_bound()?;
        Self::finite(
            newtonian_pericenter_distance(self.vp, self.de),
            "pericenter distance",
        )
    }
}

impl fmt::Display for OrbitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OrbitState(vp={:.6}, de={:.6})", self.vp, self.de)
    }
}

#[cfg(test)]
mod orbit_state_test {
    use super::*;
    use crate::evolution::post_newtonian::{pn_burst_frequency, pn_period, FirstPostNewtonian};
    use approx::assert_relative_eq;

    fn binary() -> BinaryParameters {
        BinaryParameters::new(30.0, 0.25).unwrap()
    }

    #[test]
    fn checked_matches_raw() {
        let b = binary();
        let state = OrbitState::new(0.04, 0.25).unwrap();
        let period = state.period(&b, &FirstPostNewtonian).unwrap();
        let freq = state.burst_frequency(&b, &FirstPostNewtonian).unwrap();
        assert_eq!(period, pn_period(0.04, 0.25, b.eta(), b.mass_seconds()));
        assert_eq!(freq, pn_burst_frequency(0.04, 0.25, b.eta(), b.mass_seconds()));
    }

    #[test]
    fn zero_deficit_is_a_domain_error() {
        let b = BinaryParameters::default();
        let state = OrbitState::new(0.5, 0.0).unwrap();
        let err = state.period(&b, &FirstPostNewtonian).unwrap_err();
        assert_eq!(err, EccBurstError::InvalidEccentricityDeficit(0.0));
        assert!(err.is_domain_error());

        assert!(state.newtonian_period(&b).is_err());
        assert!(state.burst_frequency(&b, &FirstPostNewtonian).is_err());
    }

    #[test]
    fn unbound_state_is_rejected() {
        let b = BinaryParameters::default();
        let state = OrbitState::new(0.1, 2.0).unwrap();
        assert_eq!(
            state.newtonian_burst_frequency(&b),
            Err(EccBurstError::InvalidEccentricityDeficit(2.0))
        );
        assert!(state.pericenter_distance().is_err());
    }

    #[test]
    fn zero_speed_gives_non_finite_period() {
        let b = BinaryParameters::default();
        let state = OrbitState::new(0.0, 0.5).unwrap();
        assert_eq!(
            state.newtonian_period(&b),
            Err(EccBurstError::NonFiniteResult("Newtonian period"))
        );
    }

    #[test]
    fn construction_validation() {
        assert_eq!(
            OrbitState::new(-0.1, 0.5),
            Err(EccBurstError::InvalidPericenterSpeed(-0.1))
        );
        assert_eq!(
            OrbitState::new(0.1, -0.5),
            Err(EccBurstError::InvalidEccentricityDeficit(-0.5))
        );
        assert_eq!(
            OrbitState::new(f64::NAN, 0.5),
            Err(EccBurstError::InvalidPericenterSpeed(f64::NAN))
        );
    }

    #[test]
    fn advance_shrinks_and_circularises() {
        let b = binary();
        let state = OrbitState::new(0.2, 0.1).unwrap();
        let next = state.advance(&b, &FirstPostNewtonian).unwrap();
        assert!(next.vp() < state.vp());
        assert!(next.de() > state.de());

        let (dvp, dde) = state.deltas(&b, &FirstPostNewtonian);
        assert_relative_eq!(next.vp(), state.vp() + dvp);
        assert_relative_eq!(next.de(), state.de() + dde);
        assert_relative_eq!(next.eccentricity(), 1.0 - next.de());
    }

    #[test]
    fn display() {
        let state = OrbitState::new(0.5, 0.25).unwrap();
        assert_eq!(state.to_string(), "OrbitState(vp=0.500000, de=0.250000)");
    }
}
