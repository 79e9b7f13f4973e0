//! # Orbit evolution between bursts
//!
//! Closed-form maps that take the orbit state `(vp, de)` at one pericenter passage to the
//! next one, and give the time between the two bursts and the frequency of the next burst.
//!
//! * [`newtonian`] – leading-order map, period and burst frequency.
//! * [`post_newtonian`] – 1PN correction polynomials and the [`CorrectionModel`] seam.
//! * [`burst_train`] – repeated application of the map to forecast a burst sequence.
//!
//! Raw functions take and return `f64` with IEEE semantics; the checked equivalents are
//! the methods of [`OrbitState`](crate::orbit_state::OrbitState).
pub mod burst_train;
pub mod newtonian;
pub mod post_newtonian;

pub use newtonian::{
    newtonian_burst_frequency, newtonian_delta_eccentricity, newtonian_delta_pericenter_speed,
    newtonian_period,
};
pub use post_newtonian::{
    pn_burst_frequency, pn_delta_eccentricity, pn_delta_pericenter_speed, pn_period,
    CorrectionModel, FirstPostNewtonian, NewtonianOnly,
};
