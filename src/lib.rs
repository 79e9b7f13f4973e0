//! # eccburst
//!
//! Gravitational-wave bursts from highly eccentric compact binaries.
//!
//! A binary on a very eccentric orbit radiates most of its gravitational-wave energy in a
//! short burst at each pericenter passage. Between two bursts, radiation reaction lowers
//! the pericenter speed `vp` and raises the eccentricity deficit `de = 1 - e`. This crate
//! provides:
//!
//! * the Newtonian and first post-Newtonian maps `(vp, de) → (vp', de')`, the time between
//!   bursts and the frequency of the next burst ([`evolution`]),
//! * checked evaluation on a validated [`orbit_state::OrbitState`],
//! * the inverse problem: recovering `(vp, de)` from a pair of observed bursts ([`fit`]),
//! * burst lists and their text-file reader ([`bursts`]),
//! * a Morlet–Gabor wavelet model of a burst train, with a centroid prior driven by the
//!   burst map ([`wavelet`]).
//!
//! ## Quick start
//!
//! ```rust
//! use eccburst::binary::BinaryParameters;
//! use eccburst::evolution::FirstPostNewtonian;
//! use eccburst::orbit_state::OrbitState;
//!
//! let binary = BinaryParameters::new(30.0, 0.25)?;
//! let state = OrbitState::new(0.044, 0.25)?;
//!
//! let period = state.period(&binary, &FirstPostNewtonian)?;
//! let freq = state.burst_frequency(&binary, &FirstPostNewtonian)?;
//! assert!(period > 0.0 && freq > 0.0);
//! # Ok::<(), eccburst::eccburst_errors::EccBurstError>(())
//! ```
//!
//! Diagnostics are emitted through `tracing`; install a subscriber to see them.
pub mod binary;
pub mod bursts;
pub mod constants;
pub mod eccburst_errors;
pub mod evolution;
pub mod fit;
pub mod orbit_state;
pub mod wavelet;
