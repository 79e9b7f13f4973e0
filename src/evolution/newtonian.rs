//! # Newtonian burst map
//!
//! Leading-order (quadrupole, Newtonian orbit) change of the orbit state over one radial
//! period, plus the radial period and the burst frequency of a highly eccentric orbit.
//!
//! The orbit is described by its pericenter speed `vp` (in units of c) and its
//! eccentricity deficit `de = 1 - e`. Time-like quantities scale with the total mass in
//! seconds `m = G·Mtot/c³`; `m = 1` gives geometric units.
//!
//! All functions here are **raw**: no validation, IEEE-754 semantics. An input outside
//! the physical domain (`de ≤ 0`, `de ≥ 2`, `vp = 0`) yields `NaN` or `±∞`, which callers
//! can test with [`f64::is_finite`]. Checked evaluation lives on
//! [`OrbitState`](crate::orbit_state::OrbitState).
use crate::constants::{
    Hertz, Seconds, DELTA_DE_DE, DELTA_DE_LEADING, DELTA_VP_DE, DELTA_VP_LEADING, DPI,
    PERIOD_EXPONENT,
};

/// Change of the pericenter speed over one orbit, `-13π/96 · eta · vp⁶ · (1 + 44/65·de)`.
///
/// Always `≤ 0` for physical input: radiation reaction slows the pericenter passage.
#[inline]
pub fn newtonian_delta_pericenter_speed(vp: f64, de: f64, eta: f64) -> f64 {
    DELTA_VP_LEADING * eta * vp.powi(6) * (1.0 + DELTA_VP_DE * de)
}

/// Change of the eccentricity deficit over one orbit, `85π/48 · eta · vp⁵ · (1 + 791/850·de)`.
///
/// Always `≥ 0` for physical input: the orbit circularises.
#[inline]
pub fn newtonian_delta_eccentricity(vp: f64, de: f64, eta: f64) -> f64 {
    DELTA_DE_LEADING * eta * vp.powi(5) * (1.0 + DELTA_DE_DE * de)
}

/// Radial (pericenter-to-pericenter) period of the Newtonian orbit.
///
/// Arguments
/// -----------------
/// * `vp`: pericenter speed in units of c.
/// * `de`: eccentricity deficit `1 - e`, must lie in `(0, 2)` for a finite result.
/// * `m`: total mass in seconds.
///
/// Return
/// ----------
/// * `2π·m / vp³ · ((2 - de)/de)^{3/2}` in seconds.
#[inline]
pub fn newtonian_period(vp: f64, de: f64, m: f64) -> Seconds {
    DPI * m / vp.powi(3) * ((2.0 - de) / de).powf(PERIOD_EXPONENT)
}

/// Gravitational-wave frequency of the burst emitted at pericenter, `vp³ / (2π·m·(2 - de))`.
#[inline]
pub fn newtonian_burst_frequency(vp: f64, de: f64, m: f64) -> Hertz {
    vp.powi(3) / (DPI * m * (2.0 - de))
}

/// Pericenter distance in units of the total mass, `(2 - de)/vp²`.
#[inline]
pub fn newtonian_pericenter_distance(vp: f64, de: f64) -> f64 {
    (2.0 - de) / (vp * vp)
}

/// Pericenter speed of the orbit that emits a burst of frequency `f` at eccentricity
/// deficit `de`: the inverse of [`newtonian_burst_frequency`] in `vp`.
#[inline]
pub fn pericenter_speed_from_frequency(f: Hertz, de: f64, m: f64) -> f64 {
    (DPI * f * m * (2.0 - de)).cbrt()
}
