//! # Binary system parameters
//!
//! [`BinaryParameters`] carries the mass configuration of the emitting binary: the total
//! mass `Mtot` (solar masses) and the mass ratio `q = m2/m1`. Every other mass quantity
//! needed by the burst model is derived from these two numbers:
//!
//! - the **symmetric mass ratio** `eta = q/(1+q)²`, which sets the radiation-reaction
//!   strength of the orbit-evolution map,
//! - the **total mass in seconds** `m = Mtot·T_SUN`, the time scale of every period and
//!   frequency formula in [`crate::evolution`],
//! - the **chirp mass** `Mc = q^{3/5}/(1+q)^{6/5}·Mtot`.
//!
//! The value is validated on construction, so downstream code never re-checks the masses.
//!
//! ## Example
//!
//! ```rust
//! use eccburst::binary::BinaryParameters;
//!
//! let binary = BinaryParameters::new(30.0, 0.25).unwrap();
//! assert!((binary.eta() - 0.16).abs() < 1e-15);
//! ```
use std::fmt;

use crate::constants::{Seconds, SolarMass, T_SUN};
use crate::eccburst_errors::EccBurstError;

/// Mass configuration of an eccentric compact binary.
///
/// Invariants
/// -----------------
/// * `total_mass` is finite and strictly positive.
/// * `mass_ratio` is finite and strictly positive. `q` and `1/q` describe the same
///   system and give the same `eta`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryParameters {
    total_mass: SolarMass,
    mass_ratio: f64,
}

impl BinaryParameters {
    /// Build a validated binary from its total mass (solar masses) and mass ratio.
    ///
    /// Arguments
    /// -----------------
    /// * `total_mass`: total mass `Mtot` in solar masses.
    /// * `mass_ratio`: mass ratio `q`, any positive value (`q` and `1/q` are equivalent).
    ///
    /// Return
    /// ----------
    /// * `Ok(BinaryParameters)` when both inputs are finite and strictly positive.
    /// * `Err(EccBurstError::InvalidTotalMass)` or `Err(EccBurstError::InvalidMassRatio)` otherwise.
    pub fn new(total_mass: SolarMass, mass_ratio: f64) -> Result<Self, EccBurstError> {
        if !(total_mass.is_finite() && total_mass > 0.0) {
            return Err(EccBurstError::InvalidTotalMass(total_mass));
        }
        if !(mass_ratio.is_finite() && mass_ratio > 0.0) {
            return Err(EccBurstError::InvalidMassRatio(mass_ratio));
        }
        Ok(BinaryParameters {
            total_mass,
            mass_ratio,
        })
    }

    /// Build a binary from its total mass and chirp mass (solar masses).
    ///
    /// `eta = (Mc/Mtot)^{5/3}` is inverted on the `q ≤ 1` branch,
    /// `q = (1 - 2·eta - √(1 - 4·eta)) / (2·eta)`.
    ///
    /// Return
    /// ----------
    /// * `Err(EccBurstError::InvalidTotalMass)` for a non-positive or non-finite `Mtot`.
    /// * `Err(EccBurstError::InvalidChirpMass)` unless `0 < eta ≤ 1/4`.
    pub fn from_chirp_mass(
        total_mass: SolarMass,
        chirp_mass: SolarMass,
    ) -> Result<Self, EccBurstError> {
        if !(total_mass.is_finite() && total_mass > 0.0) {
            return Err(EccBurstError::InvalidTotalMass(total_mass));
        }
        let eta = (chirp_mass / total_mass).powf(5.0 / 3.0);
        // Equal mass sits on the edge: allow the rounding of the 5/3 power
        if !(chirp_mass > 0.0 && eta <= 0.25 + 1e-12) {
            return Err(EccBurstError::InvalidChirpMass(chirp_mass));
        }
        let eta = eta.min(0.25);
        let root = (1.0 - 4.0 * eta).sqrt();
        Self::new(total_mass, (1.0 - 2.0 * eta - root) / (2.0 * eta))
    }

    /// Equal-mass binary of the given total mass.
    pub fn equal_mass(total_mass: SolarMass) -> Result<Self, EccBurstError> {
        Self::new(total_mass, 1.0)
    }

    pub fn total_mass(&self) -> SolarMass {
        self.total_mass
    }

    pub fn mass_ratio(&self) -> f64 {
        self.mass_ratio
    }

    /// Symmetric mass ratio `eta = q/(1+q)²`, in `(0, 0.25]`.
    pub fn eta(&self) -> f64 {
        symmetric_mass_ratio(self.mass_ratio)
    }

    /// Total mass expressed as a time, `Mtot·G·M☉/c³` (seconds).
    pub fn mass_seconds(&self) -> Seconds {
        self.total_mass * T_SUN
    }

    /// Chirp mass in solar masses, `q^{3/5}/(1+q)^{6/5}·Mtot`.
    pub fn chirp_mass(&self) -> SolarMass {
        let q = self.mass_ratio;
        q.powf(0.6) / (1.0 + q).powf(1.2) * self.total_mass
    }

    /// Component masses `(m1, m2)` with `m2 = q·m1`, in solar masses.
    pub fn component_masses(&self) -> (SolarMass, SolarMass) {
        let m1 = self.total_mass / (1.0 + self.mass_ratio);
        (m1, self.mass_ratio * m1)
    }
}

impl Default for BinaryParameters {
    /// One solar mass, equal components.
    fn default() -> Self {
        BinaryParameters {
            total_mass: 1.0,
            mass_ratio: 1.0,
        }
    }
}

/// Symmetric mass ratio of a mass ratio `q`, `q/(1+q)²`.
///
/// Raw function: no validation, a non-positive `q` gives a meaningless value.
#[inline]
pub fn symmetric_mass_ratio(q: f64) -> f64 {
    q / ((1.0 + q) * (1.0 + q))
}

impl fmt::Display for BinaryParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            let (m1, m2) = self.component_masses();
            writeln!(f, "Binary parameters")?;
            writeln!(f, "-----------------")?;
            writeln!(f, "  Mtot  = {:.6} Msun", self.total_mass)?;
            writeln!(f, "  q     = {:.6}", self.mass_ratio)?;
            writeln!(f, "  m1,m2 = {:.6}, {:.6} Msun", m1, m2)?;
            writeln!(f, "  eta   = {:.6}", self.eta())?;
            writeln!(f, "  Mc    = {:.6} Msun", self.chirp_mass())?;
            write!(f, "  m     = {:.6e} s", self.mass_seconds())
        } else {
            write!(
                f,
                "BinaryParameters(Mtot={:.3} Msun, q={:.4}, eta={:.4})",
                self.total_mass,
                self.mass_ratio,
                self.eta()
            )
        }
    }
}

#[cfg(test)]
mod binary_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn eta_is_symmetric_in_q() {
        for q in [1e-3, 0.1, 0.25, 0.5, 1.0, 3.0, 17.0] {
            let direct = BinaryParameters::new(10.0, q).unwrap().eta();
            let inverse = BinaryParameters::new(10.0, 1.0 / q).unwrap().eta();
            assert_relative_eq!(direct, inverse, max_relative = 1e-14);
            assert!(direct > 0.0 && direct <= 0.25);
        }
        assert_relative_eq!(symmetric_mass_ratio(1.0), 0.25);
    }

    #[test]
    fn reference_binary() {
        let binary = BinaryParameters::new(30.0, 0.25).unwrap();
        assert_relative_eq!(binary.eta(), 0.16, max_relative = 1e-15);
        assert_relative_eq!(binary.mass_seconds(), 30.0 * T_SUN);
        assert_relative_eq!(binary.mass_seconds(), 1.477_647_284e-4, max_relative = 1e-8);

        let (m1, m2) = binary.component_masses();
        assert_relative_eq!(m1, 24.0);
        assert_relative_eq!(m2, 6.0);

        // Mc = (m1 m2)^{3/5} / (m1 + m2)^{1/5}
        let expected = (m1 * m2).powf(0.6) / (m1 + m2).powf(0.2);
        assert_relative_eq!(binary.chirp_mass(), expected, max_relative = 1e-13);
    }

    #[test]
    fn chirp_mass_round_trip() {
        for q in [0.05, 0.25, 0.6, 1.0] {
            let binary = BinaryParameters::new(42.0, q).unwrap();
            let rebuilt = BinaryParameters::from_chirp_mass(42.0, binary.chirp_mass()).unwrap();
            assert_relative_eq!(rebuilt.mass_ratio(), q, max_relative = 1e-6);
            assert_relative_eq!(rebuilt.eta(), binary.eta(), max_relative = 1e-12);
        }
        // q > 1 comes back on the q <= 1 branch
        let flipped = BinaryParameters::new(42.0, 4.0).unwrap();
        let rebuilt = BinaryParameters::from_chirp_mass(42.0, flipped.chirp_mass()).unwrap();
        assert_relative_eq!(rebuilt.mass_ratio(), 0.25, max_relative = 1e-10);

        assert_eq!(
            BinaryParameters::from_chirp_mass(10.0, 9.0),
            Err(EccBurstError::InvalidChirpMass(9.0))
        );
        assert_eq!(
            BinaryParameters::from_chirp_mass(10.0, 0.0),
            Err(EccBurstError::InvalidChirpMass(0.0))
        );
        assert!(BinaryParameters::from_chirp_mass(10.0, f64::NAN).is_err());
    }

    #[test]
    fn rejects_invalid_masses() {
        assert_eq!(
            BinaryParameters::new(0.0, 1.0),
            Err(EccBurstError::InvalidTotalMass(0.0))
        );
        assert_eq!(
            BinaryParameters::new(-3.0, 1.0),
            Err(EccBurstError::InvalidTotalMass(-3.0))
        );
        assert_eq!(
            BinaryParameters::new(1.0, -0.5),
            Err(EccBurstError::InvalidMassRatio(-0.5))
        );
        assert!(BinaryParameters::new(f64::NAN, 1.0).is_err());
        assert!(BinaryParameters::new(1.0, f64::INFINITY).is_err());
    }

    #[test]
    fn display_forms() {
        let binary = BinaryParameters::default();
        assert_eq!(
            format!("{binary}"),
            "BinaryParameters(Mtot=1.000 Msun, q=1.0000, eta=0.2500)"
        );
        let table = format!("{binary:#}");
        assert!(table.starts_with("Binary parameters"));
        assert!(table.contains("eta   = 0.250000"));
    }
}
