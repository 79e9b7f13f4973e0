//! One-dimensional fit: the anchor frequency pins `vp`, `de` is solved from the arrival
//! time of the next burst.
//!
//! ```text
//! vp(de)      = (2π·f*·m·(2 - de))^{1/3}
//! residual(de) = t* + T(vp(de), de) - t_next
//! ```
//!
//! The residual is scanned on `scan_steps` sub-intervals of `de_bounds`. The first
//! sub-interval with a sign change is refined by Brent's root finder (`roots`). Without a
//! sign change, `|residual|` is minimised by Brent's method (`argmin`) instead, and a
//! warning is emitted since the time of the next burst cannot be matched exactly.
use std::cell::Cell;

use argmin::core::{CostFunction, Error, Executor, State, TerminationReason, TerminationStatus};
use argmin::solver::brent::BrentOpt;
use itertools::Itertools;
use roots::{find_root_brent, SearchError, SimpleConvergency};
use tracing::{debug, info, warn};

use crate::binary::BinaryParameters;
use crate::bursts::BurstObservation;
use crate::eccburst_errors::EccBurstError;
use crate::evolution::newtonian::pericenter_speed_from_frequency;
use crate::evolution::post_newtonian::CorrectionModel;
use crate::fit::{FitParams, FitResult, FitStrategy};
use crate::orbit_state::OrbitState;

/// Arrival-time residual of the next burst as a function of `de` alone.
pub struct AnchoredResidual<'a, M: CorrectionModel + ?Sized> {
    pub anchor_time: f64,
    pub anchor_frequency: f64,
    pub next_time: f64,
    pub eta: f64,
    pub mass_seconds: f64,
    pub model: &'a M,
    evaluations: Cell<u64>,
    last_residual: Cell<f64>,
}

impl<'a, M: CorrectionModel + ?Sized> AnchoredResidual<'a, M> {
    pub fn new(
        anchor: &BurstObservation,
        next: &BurstObservation,
        binary: &BinaryParameters,
        model: &'a M,
    ) -> Self {
        AnchoredResidual {
            anchor_time: anchor.time,
            anchor_frequency: anchor.frequency,
            next_time: next.time,
            eta: binary.eta(),
            mass_seconds: binary.mass_seconds(),
            model,
            evaluations: Cell::new(0),
            last_residual: Cell::new(f64::NAN),
        }
    }

    /// Pericenter speed implied by the anchor frequency at eccentricity deficit `de`.
    pub fn pericenter_speed(&self, de: f64) -> f64 {
        pericenter_speed_from_frequency(self.anchor_frequency, de, self.mass_seconds)
    }

    /// Predicted next burst `(t* + T, f)` at `de`.
    pub fn predict(&self, de: f64) -> (f64, f64) {
        let vp = self.pericenter_speed(de);
        let period = self.model.period(vp, de, self.eta, self.mass_seconds);
        let freq = self
            .model
            .burst_frequency(vp, de, self.eta, self.mass_seconds);
        (self.anchor_time + period, freq)
    }

    /// Signed residual `t* + T - t_next` in seconds.
    pub fn residual(&self, de: f64) -> f64 {
        self.evaluations.set(self.evaluations.get() + 1);
        let value = self.predict(de).0 - self.next_time;
        self.last_residual.set(value);
        value
    }

    pub fn evaluations(&self) -> u64 {
        self.evaluations.get()
    }

    /// Residual returned by the most recent evaluation, `NaN` before the first one.
    pub fn last_residual(&self) -> f64 {
        self.last_residual.get()
    }
}

/// `|residual|` as an `argmin` problem for the no-bracket fallback.
struct AbsResidual<'r, 'a, M: CorrectionModel + ?Sized>(&'r AnchoredResidual<'a, M>);

impl<M: CorrectionModel + ?Sized> CostFunction for AbsResidual<'_, '_, M> {
    type Param = f64;
    type Output = f64;

    fn cost(&self, de: &Self::Param) -> Result<Self::Output, Error> {
        let value = self.0.residual(*de).abs();
        Ok(if value.is_finite() {
            value
        } else {
            f64::INFINITY
        })
    }
}

/// Scan `[lo, hi]` and return the first sub-interval on which the residual changes sign.
fn find_bracket<M: CorrectionModel + ?Sized>(
    residual: &AnchoredResidual<'_, M>,
    (lo, hi): (f64, f64),
    steps: usize,
) -> Option<(f64, f64)> {
    let width = (hi - lo) / steps as f64;
    (0..=steps)
        .map(|i| {
            let de = if i == steps { hi } else { lo + width * i as f64 };
            (de, residual.residual(de))
        })
        .filter(|(_, r)| r.is_finite())
        .tuple_windows()
        .find(|((_, ra), (_, rb))| ra.signum() != rb.signum() || *ra == 0.0 || *rb == 0.0)
        .map(|((a, _), (b, _))| (a, b))
}

/// Run the anchored fit.
///
/// Return
/// ----------
/// * The fitted [`FitResult`] with `strategy = Anchored`; `cost` is `|residual|` in seconds.
/// * `Err(EccBurstError::OptimizationFailure)` if Brent's root search runs out of
///   `root_max_iter` on a bracket, or if the fallback minimisation ends on a non-finite
///   residual or exhausts its iteration budget.
/// * `Err(EccBurstError::RootFindingError)` for any other failure of the root search.
pub fn fit_anchored<M: CorrectionModel + ?Sized>(
    anchor: &BurstObservation,
    next: &BurstObservation,
    binary: &BinaryParameters,
    params: &FitParams,
    model: &M,
) -> Result<FitResult, EccBurstError> {
    let residual = AnchoredResidual::new(anchor, next, binary, model);
    let (lo, hi) = params.de_bounds;

    let de = match find_bracket(&residual, params.de_bounds, params.scan_steps) {
        Some((a, b)) => {
            debug!(a, b, "bracketed arrival-time residual");
            let mut convergency = SimpleConvergency {
                eps: params.root_tolerance,
                max_iter: params.root_max_iter,
            };
            find_root_brent(a, b, |de| residual.residual(de), &mut convergency).map_err(
                |err| match err {
                    SearchError::NoConvergency => EccBurstError::OptimizationFailure {
                        iterations: residual.evaluations(),
                        last_cost: residual.last_residual().abs(),
                        reason: format!(
                            "root search on [{a}, {b}] did not converge in {} iterations",
                            params.root_max_iter
                        ),
                    },
                    other => other.into(),
                },
            )?
        }
        None => {
            warn!(
                lo,
                hi, "no sign change of the arrival-time residual, minimising |residual|"
            );
            let eps = params.root_tolerance.max(f64::EPSILON.sqrt());
            let solver = BrentOpt::new(lo, hi).set_tolerance(eps, 1e-14);
            let result = Executor::new(AbsResidual(&residual), solver)
                .configure(|state| state.max_iters(params.root_max_iter as u64))
                .run()?;
            let state = result.state();
            if *state.get_termination_status()
                == TerminationStatus::Terminated(TerminationReason::MaxItersReached)
            {
                return Err(EccBurstError::OptimizationFailure {
                    iterations: state.get_iter(),
                    last_cost: state.get_best_cost(),
                    reason: format!(
                        "iteration budget of {} exhausted while minimising |residual|",
                        params.root_max_iter
                    ),
                });
            }
            match state.get_best_param() {
                Some(&de) if state.get_best_cost().is_finite() => de,
                _ => {
                    return Err(EccBurstError::OptimizationFailure {
                        iterations: state.get_iter(),
                        last_cost: state.get_best_cost(),
                        reason: "no finite arrival-time residual on de_bounds".into(),
                    })
                }
            }
        }
    };

    let vp = residual.pericenter_speed(de);
    let state = OrbitState::new(vp, de)?;
    let (t_next, f_next) = residual.predict(de);
    let cost = (t_next - next.time).abs();

    info!(
        vp,
        de,
        cost,
        evaluations = residual.evaluations(),
        "anchored burst fit converged"
    );

    Ok(FitResult::new(
        state,
        cost,
        residual.evaluations(),
        FitStrategy::Anchored,
        model.name(),
        BurstObservation::new(t_next, f_next),
        next,
    ))
}
