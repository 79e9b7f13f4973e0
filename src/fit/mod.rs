//! # Orbit fit from a pair of bursts
//!
//! Given an **anchor** burst `(t*, f*)` and the **next** observed burst `(t_next, f_next)`,
//! recover the orbit state `(vp, de)` at the anchor such that the burst map predicts the
//! next burst.
//!
//! ## Strategies
//!
//! * [`FitStrategy::Joint`] – two-dimensional weighted least squares on both the arrival
//!   time and the frequency of the next burst:
//!
//!   ```text
//!   χ²(vp, de) = ((t* + T(vp, de)) - t_next)² / σT² + (f(vp, de) - f_next)² / σF²
//!   ```
//!
//!   minimised with a Nelder–Mead simplex in unconstrained coordinates
//!   (see [`transform`]), restarted around the incumbent until it stops improving.
//!
//! * [`FitStrategy::Anchored`] – one-dimensional: the anchor frequency pins
//!   `vp(de) = (2π·f*·m·(2 - de))^{1/3}`, and `de` is solved from
//!   `t* + T(vp(de), de) = t_next` by a bracket scan and Brent's method. When the
//!   residual never changes sign on the scan, `|residual|` is minimised instead.
//!
//! ## Configuration
//!
//! All tunables live in [`FitParams`], built through [`FitParams::builder`] with
//! validation, in the same way as every other configuration object of the crate.
//!
//! ## Example
//!
//! ```rust,no_run
//! use eccburst::binary::BinaryParameters;
//! use eccburst::bursts::BurstObservation;
//! use eccburst::fit::{fit_next_burst, FitParams};
//!
//! let binary = BinaryParameters::new(30.0, 0.25).unwrap();
//! let anchor = BurstObservation::new(-203.0, 0.027441440005832807);
//! let next = BurstObservation::new(0.0, 0.05255602595335716);
//!
//! let params = FitParams::builder().sigma_time(5.0).build().unwrap();
//! let fit = fit_next_burst(&anchor, &next, &binary, &params).unwrap();
//! println!("{fit:#}");
//! ```
//!
//! ## See also
//!
//! * [`crate::evolution::post_newtonian`] – the burst map being inverted.
//! * [`FitResult`] – fitted state, objective and predicted burst.
use std::cmp::Ordering::{Equal, Greater, Less};
use std::fmt;

use crate::binary::BinaryParameters;
use crate::bursts::{BurstObservation, BurstSet};
use crate::eccburst_errors::EccBurstError;
use crate::evolution::post_newtonian::{CorrectionModel, FirstPostNewtonian};

pub mod anchored;
pub mod fit_result;
pub mod joint;
pub mod transform;

pub use fit_result::FitResult;

/// How the orbit state is recovered from a pair of bursts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FitStrategy {
    /// 2-D weighted least squares on time and frequency.
    #[default]
    Joint,
    /// 1-D root search on the arrival time, `vp` pinned by the anchor frequency.
    Anchored,
}

impl fmt::Display for FitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitStrategy::Joint => write!(f, "joint"),
            FitStrategy::Anchored => write!(f, "anchored"),
        }
    }
}

/// Configuration of the burst-pair fit.
///
/// Fields
/// -----------------
/// **Objective**
/// * `strategy` – [`FitStrategy::Joint`] or [`FitStrategy::Anchored`].
/// * `sigma_time` – arrival-time uncertainty σT (s) weighting the time residual.
/// * `sigma_frequency` – frequency uncertainty σF (Hz) weighting the frequency residual.
///
/// **Joint (simplex) search**
/// * `initial_guess` – starting `(vp, de)`, with `vp > 0` and `0 < de < 2`.
/// * `max_iters` – iteration budget of each Nelder–Mead run.
/// * `sd_tolerance` – the simplex stops when the standard deviation of its vertex costs
///   falls below this value.
/// * `simplex_step` – edge length of the initial simplex in unconstrained coordinates.
/// * `max_restarts` – maximum number of restarts around the incumbent.
///
/// **Anchored (root) search**
/// * `de_bounds` – `(lo, hi)` interval scanned for `de`, inside `(0, 2)`.
/// * `scan_steps` – number of sub-intervals of the bracket scan.
/// * `root_tolerance` – convergence tolerance of Brent's method on `de`.
/// * `root_max_iter` – iteration cap of Brent's method.
///
/// Defaults
/// -----------------
/// * `strategy`: joint
/// * `sigma_time`: 5.0 s, `sigma_frequency`: 0.005 Hz
/// * `initial_guess`: (0.5, 0.4)
/// * `max_iters`: 2000, `sd_tolerance`: 1e-14, `simplex_step`: 0.25, `max_restarts`: 4
/// * `de_bounds`: (1e-6, 2 - 1e-6), `scan_steps`: 256
/// * `root_tolerance`: 1e-12, `root_max_iter`: 200
#[derive(Debug, Clone, PartialEq)]
pub struct FitParams {
    pub strategy: FitStrategy,
    pub sigma_time: f64,
    pub sigma_frequency: f64,

    pub initial_guess: (f64, f64),
    pub max_iters: u64,
    pub sd_tolerance: f64,
    pub simplex_step: f64,
    pub max_restarts: usize,

    pub de_bounds: (f64, f64),
    pub scan_steps: usize,
    pub root_tolerance: f64,
    pub root_max_iter: usize,
}

impl FitParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a [`FitParamsBuilder`] initialised with the defaults.
    pub fn builder() -> FitParamsBuilder {
        FitParamsBuilder::new()
    }
}

impl Default for FitParams {
    fn default() -> Self {
        FitParams {
            strategy: FitStrategy::Joint,
            sigma_time: 5.0,
            sigma_frequency: 0.005,

            initial_guess: (0.5, 0.4),
            max_iters: 2000,
            sd_tolerance: 1e-14,
            simplex_step: 0.25,
            max_restarts: 4,

            de_bounds: (1e-6, 2.0 - 1e-6),
            scan_steps: 256,
            root_tolerance: 1e-12,
            root_max_iter: 200,
        }
    }
}

/// Builder for [`FitParams`], with validation.
#[derive(Debug, Clone, Default)]
pub struct FitParamsBuilder {
    params: FitParams,
}

impl FitParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: FitParams::default(),
        }
    }

    pub fn strategy(mut self, v: FitStrategy) -> Self {
        self.params.strategy = v;
        self
    }
    pub fn sigma_time(mut self, v: f64) -> Self {
        self.params.sigma_time = v;
        self
    }
    pub fn sigma_frequency(mut self, v: f64) -> Self {
        self.params.sigma_frequency = v;
        self
    }

    // --- Joint search ---
    pub fn initial_guess(mut self, vp: f64, de: f64) -> Self {
        self.params.initial_guess = (vp, de);
        self
    }
    pub fn max_iters(mut self, v: u64) -> Self {
        self.params.max_iters = v;
        self
    }
    pub fn sd_tolerance(mut self, v: f64) -> Self {
        self.params.sd_tolerance = v;
        self
    }
    pub fn simplex_step(mut self, v: f64) -> Self {
        self.params.simplex_step = v;
        self
    }
    pub fn max_restarts(mut self, v: usize) -> Self {
        self.params.max_restarts = v;
        self
    }

    // --- Anchored search ---
    pub fn de_bounds(mut self, lo: f64, hi: f64) -> Self {
        self.params.de_bounds = (lo, hi);
        self
    }
    pub fn scan_steps(mut self, v: usize) -> Self {
        self.params.scan_steps = v;
        self
    }
    pub fn root_tolerance(mut self, v: f64) -> Self {
        self.params.root_tolerance = v;
        self
    }
    pub fn root_max_iter(mut self, v: usize) -> Self {
        self.params.root_max_iter = v;
        self
    }

    /// Return true iff x > 0.0 and comparable (i.e., not NaN).
    #[inline]
    fn gt0(x: f64) -> bool {
        x.partial_cmp(&0.0) == Some(Greater)
    }

    /// Return true iff a < b and comparable.
    #[inline]
    fn lt(a: f64, b: f64) -> bool {
        a.partial_cmp(&b) == Some(Less)
    }

    /// Return true iff x ≥ 0.0 and comparable.
    #[inline]
    fn ge0(x: f64) -> bool {
        matches!(x.partial_cmp(&0.0), Some(Greater) | Some(Equal))
    }

    /// Finalize the builder.
    ///
    /// Validation rules
    /// -----------------
    /// * `sigma_time > 0`, `sigma_frequency > 0`.
    /// * `initial_guess`: `vp > 0` and finite, `0 < de < 2`.
    /// * `max_iters ≥ 1`, `sd_tolerance ≥ 0`, `simplex_step > 0` and finite.
    /// * `0 < de_bounds.0 < de_bounds.1 < 2`.
    /// * `scan_steps ≥ 1`, `root_tolerance > 0`, `root_max_iter ≥ 1`.
    ///
    /// Return
    /// ----------
    /// * `Err(EccBurstError::InvalidFitParameter)` naming the first violated rule.
    pub fn build(self) -> Result<FitParams, EccBurstError> {
        let p = &self.params;
        let invalid = |msg: &str| Err(EccBurstError::InvalidFitParameter(msg.into()));

        if !Self::gt0(p.sigma_time) || !Self::gt0(p.sigma_frequency) {
            return invalid("sigma_time and sigma_frequency must be > 0");
        }

        let (vp0, de0) = p.initial_guess;
        if !(Self::gt0(vp0) && vp0.is_finite()) {
            return invalid("initial vp must be finite and > 0");
        }
        if !(Self::gt0(de0) && Self::lt(de0, 2.0)) {
            return invalid("initial de must satisfy 0 < de < 2");
        }

        if p.max_iters == 0 {
            return invalid("max_iters must be >= 1");
        }
        if !Self::ge0(p.sd_tolerance) {
            return invalid("sd_tolerance must be >= 0");
        }
        if !(Self::gt0(p.simplex_step) && p.simplex_step.is_finite()) {
            return invalid("simplex_step must be finite and > 0");
        }

        let (lo, hi) = p.de_bounds;
        if !(Self::gt0(lo) && Self::lt(lo, hi) && Self::lt(hi, 2.0)) {
            return invalid("de_bounds must satisfy 0 < lo < hi < 2");
        }
        if p.scan_steps == 0 {
            return invalid("scan_steps must be >= 1");
        }
        if !Self::gt0(p.root_tolerance) {
            return invalid("root_tolerance must be > 0");
        }
        if p.root_max_iter == 0 {
            return invalid("root_max_iter must be >= 1");
        }

        Ok(self.params)
    }
}

impl fmt::Display for FitParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            const PARAM_COL: usize = 40;
            writeln!(f, "Burst fit parameters")?;
            writeln!(f, "--------------------")?;

            macro_rules! line {
                ($fmt:expr, $val:expr, $comment:expr) => {{
                    let s = format!($fmt, $val);
                    let pad = if s.len() < PARAM_COL {
                        " ".repeat(PARAM_COL - s.len())
                    } else {
                        " ".to_string()
                    };
                    writeln!(f, "  {}{}# {}", s, pad, $comment)
                }};
            }

            writeln!(f, "[Objective]")?;
            line!("strategy        = {}", self.strategy, "Fit strategy")?;
            line!("sigma_time      = {:.3} s", self.sigma_time, "Arrival-time uncertainty")?;
            line!(
                "sigma_frequency = {:.3e} Hz",
                self.sigma_frequency,
                "Frequency uncertainty"
            )?;

            writeln!(f, "\n[Joint search]")?;
            line!(
                "initial_guess   = {:?}",
                self.initial_guess,
                "Starting (vp, de)"
            )?;
            line!("max_iters       = {}", self.max_iters, "Nelder-Mead iterations per run")?;
            line!("sd_tolerance    = {:.1e}", self.sd_tolerance, "Simplex cost spread")?;
            line!("simplex_step    = {:.3}", self.simplex_step, "Initial simplex edge")?;
            line!("max_restarts    = {}", self.max_restarts, "Restarts around incumbent")?;

            writeln!(f, "\n[Anchored search]")?;
            line!("de_bounds       = {:?}", self.de_bounds, "Scanned de interval")?;
            line!("scan_steps      = {}", self.scan_steps, "Bracket scan resolution")?;
            line!("root_tolerance  = {:.1e}", self.root_tolerance, "Brent tolerance on de")?;
            line!("root_max_iter   = {}", self.root_max_iter, "Brent iteration cap")?;

            Ok(())
        } else {
            write!(
                f,
                "FitParams(strategy={}, sigma_time={:.2}s, sigma_frequency={:.1e}Hz, guess=({:.3}, {:.3}), max_iters={}, restarts={})",
                self.strategy,
                self.sigma_time,
                self.sigma_frequency,
                self.initial_guess.0,
                self.initial_guess.1,
                self.max_iters,
                self.max_restarts,
            )
        }
    }
}

/// Fit the orbit state at `anchor` from the `next` burst with the 1PN map.
///
/// Arguments
/// -----------------
/// * `anchor`: burst `(t*, f*)` at which the orbit state is wanted.
/// * `next`: the following observed burst.
/// * `binary`: mass configuration.
/// * `params`: fit configuration, including the strategy.
///
/// Return
/// ----------
/// * A [`FitResult`] with the fitted state and the predicted next burst.
/// * `Err(EccBurstError::OptimizationFailure)` if the search does not converge.
pub fn fit_next_burst(
    anchor: &BurstObservation,
    next: &BurstObservation,
    binary: &BinaryParameters,
    params: &FitParams,
) -> Result<FitResult, EccBurstError> {
    fit_next_burst_with(anchor, next, binary, params, &FirstPostNewtonian)
}

/// Same as [`fit_next_burst`] with an explicit correction model.
pub fn fit_next_burst_with<M: CorrectionModel + ?Sized>(
    anchor: &BurstObservation,
    next: &BurstObservation,
    binary: &BinaryParameters,
    params: &FitParams,
    model: &M,
) -> Result<FitResult, EccBurstError> {
    match params.strategy {
        FitStrategy::Joint => joint::fit_joint(anchor, next, binary, params, model),
        FitStrategy::Anchored => anchored::fit_anchored(anchor, next, binary, params, model),
    }
}

/// Fit every consecutive pair of a burst set, in order.
///
/// Return
/// ----------
/// * One [`FitResult`] per pair (`len - 1` results).
/// * `Err(EccBurstError::NotEnoughBursts)` when the set holds fewer than two bursts,
///   or the first fit error encountered.
pub fn fit_burst_set(
    bursts: &BurstSet,
    binary: &BinaryParameters,
    params: &FitParams,
) -> Result<Vec<FitResult>, EccBurstError> {
    fit_burst_set_with(bursts, binary, params, &FirstPostNewtonian)
}

/// Same as [`fit_burst_set`] with an explicit correction model.
pub fn fit_burst_set_with<M: CorrectionModel + ?Sized>(
    bursts: &BurstSet,
    binary: &BinaryParameters,
    params: &FitParams,
    model: &M,
) -> Result<Vec<FitResult>, EccBurstError> {
    bursts.leading_pair()?;
    bursts
        .consecutive_pairs()
        .map(|(anchor, next)| fit_next_burst_with(anchor, next, binary, params, model))
        .collect()
}
