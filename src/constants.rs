//! # Constants and type definitions for eccburst
//!
//! This module centralizes the **physical constants**, the **solar mass scales** and the
//! **named rational coefficients** of the burst model. Every coefficient that appears in
//! the Newtonian orbit-evolution formulas lives here, next to the equation it comes from,
//! so the formulas in [`crate::evolution`] read as plain algebra.
//!
//! ## Overview
//!
//! - Fundamental constants (SI) and the geometric solar mass scales `R_SUN`, `T_SUN`
//! - Numerical coefficients of the Newtonian burst map (eqs. 69–72)
//! - Unit type aliases used across the crate
//!
//! All post-Newtonian coefficient polynomials are kept with their evaluation code in
//! [`crate::evolution::post_newtonian`].

// -------------------------------------------------------------------------------------------------
// Physical constants and mass scales
// -------------------------------------------------------------------------------------------------

/// 2π, used by every period/frequency relation
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Newton's gravitational constant in m³·kg⁻¹·s⁻² (CODATA 2018)
pub const NEWTON_G: f64 = 6.674_30e-11;

/// Speed of light in vacuum in m/s
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Nominal solar mass in kg (IAU 2015, derived from the solar mass parameter)
pub const SOLAR_MASS: f64 = 1.988_409_870_698_051e30;

/// Nominal solar mass parameter G·M☉ in m³/s² (IAU 2015 Resolution B3)
pub const GM_SUN: f64 = 1.327_124_4e20;

/// Solar mass expressed as a length, G·M☉/c² (meters)
pub const R_SUN: f64 = GM_SUN / (SPEED_OF_LIGHT * SPEED_OF_LIGHT);

/// Solar mass expressed as a time, G·M☉/c³ (seconds)
pub const T_SUN: f64 = R_SUN / SPEED_OF_LIGHT;

// -------------------------------------------------------------------------------------------------
// Newtonian burst map coefficients
// -------------------------------------------------------------------------------------------------

/// Leading factor of the Newtonian pericenter-speed change per orbit, −13π/96 (eq. 69)
pub const DELTA_VP_LEADING: f64 = -13.0 * std::f64::consts::PI / 96.0;

/// First-order eccentricity-deficit coefficient of the pericenter-speed change, 44/65 (eq. 69)
pub const DELTA_VP_DE: f64 = 44.0 / 65.0;

/// Leading factor of the Newtonian eccentricity-deficit change per orbit, 85π/48 (eq. 70)
pub const DELTA_DE_LEADING: f64 = 85.0 * std::f64::consts::PI / 48.0;

/// First-order eccentricity-deficit coefficient of the eccentricity-deficit change, 791/850 (eq. 70)
pub const DELTA_DE_DE: f64 = 791.0 / 850.0;

/// Exponent of the `(2 - de)/de` factor in the radial period, 3/2 (eq. 71)
pub const PERIOD_EXPONENT: f64 = 1.5;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Time in seconds
pub type Seconds = f64;
/// Frequency in Hertz
pub type Hertz = f64;
/// Mass in solar masses
pub type SolarMass = f64;

#[cfg(test)]
mod constants_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn solar_mass_scales() {
        assert_relative_eq!(R_SUN, 1476.625, epsilon = 1e-2);
        assert_relative_eq!(T_SUN, 4.925_490_9e-6, max_relative = 1e-7);
        assert_relative_eq!(NEWTON_G * SOLAR_MASS, GM_SUN, max_relative = 1e-12);
    }

    #[test]
    fn newtonian_coefficients_are_consistent() {
        // −13π/96 · 44/65 = −11π/120 and 85π/48 · 791/850 = 791π/480
        assert_relative_eq!(
            DELTA_VP_LEADING * DELTA_VP_DE,
            -11.0 * std::f64::consts::PI / 120.0,
            max_relative = 1e-15
        );
        assert_relative_eq!(
            DELTA_DE_LEADING * DELTA_DE_DE,
            791.0 * std::f64::consts::PI / 480.0,
            max_relative = 1e-15
        );
    }
}
