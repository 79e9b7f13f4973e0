//! Two-dimensional fit: Nelder–Mead on the weighted time/frequency misfit.
//!
//! The simplex works in the unconstrained coordinates of [`crate::fit::transform`].
//! Non-finite objective values are mapped to `+∞` so that a vertex falling outside the
//! physical region is simply the worst vertex of the simplex.
//!
//! A single Nelder–Mead run can collapse early on the narrow valley of this problem, so
//! the search is restarted from a fresh simplex around the incumbent until a restart no
//! longer lowers the objective (or `max_restarts` is reached).
use argmin::core::{CostFunction, Error, Executor, State, TerminationReason, TerminationStatus};
use argmin::solver::neldermead::NelderMead;
use tracing::{debug, info};

use crate::binary::BinaryParameters;
use crate::bursts::BurstObservation;
use crate::eccburst_errors::EccBurstError;
use crate::evolution::post_newtonian::CorrectionModel;
use crate::fit::transform::{from_orbit, to_orbit};
use crate::fit::{FitParams, FitResult, FitStrategy};
use crate::orbit_state::OrbitState;

/// Weighted misfit between the burst predicted from `(vp, de)` at the anchor and the
/// observed next burst.
pub struct JointObjective<'a, M: CorrectionModel + ?Sized> {
    pub anchor_time: f64,
    pub next_time: f64,
    pub next_frequency: f64,
    pub eta: f64,
    pub mass_seconds: f64,
    pub sigma_time: f64,
    pub sigma_frequency: f64,
    pub model: &'a M,
}

impl<M: CorrectionModel + ?Sized> Clone for JointObjective<'_, M> {
    fn clone(&self) -> Self {
        JointObjective { ..*self }
    }
}

impl<'a, M: CorrectionModel + ?Sized> JointObjective<'a, M> {
    pub fn new(
        anchor: &BurstObservation,
        next: &BurstObservation,
        binary: &BinaryParameters,
        params: &FitParams,
        model: &'a M,
    ) -> Self {
        JointObjective {
            anchor_time: anchor.time,
            next_time: next.time,
            next_frequency: next.frequency,
            eta: binary.eta(),
            mass_seconds: binary.mass_seconds(),
            sigma_time: params.sigma_time,
            sigma_frequency: params.sigma_frequency,
            model,
        }
    }

    /// Predicted next burst `(t* + T, f)` for the anchor state `(vp, de)`.
    pub fn predict(&self, vp: f64, de: f64) -> (f64, f64) {
        let period = self.model.period(vp, de, self.eta, self.mass_seconds);
        let freq = self
            .model
            .burst_frequency(vp, de, self.eta, self.mass_seconds);
        (self.anchor_time + period, freq)
    }

    /// χ² of the physical state `(vp, de)`. Raw: `NaN`/`∞` outside the domain.
    pub fn chi2(&self, vp: f64, de: f64) -> f64 {
        let (t, f) = self.predict(vp, de);
        let dt = (t - self.next_time) / self.sigma_time;
        let df = (f - self.next_frequency) / self.sigma_frequency;
        dt * dt + df * df
    }
}

impl<M: CorrectionModel + ?Sized> CostFunction for JointObjective<'_, M> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, p: &Self::Param) -> Result<Self::Output, Error> {
        let (vp, de) = to_orbit(p[0], p[1]);
        let value = self.chi2(vp, de);
        Ok(if value.is_finite() {
            value
        } else {
            f64::INFINITY
        })
    }
}

/// Initial simplex: the centre and one step along each axis.
fn build_simplex(center: &[f64], step: f64) -> Vec<Vec<f64>> {
    let mut simplex = vec![center.to_vec()];
    for i in 0..center.len() {
        let mut vertex = center.to_vec();
        vertex[i] += step;
        simplex.push(vertex);
    }
    simplex
}

/// Run the restarted Nelder–Mead search.
///
/// Return
/// ----------
/// * The fitted [`FitResult`] with `strategy = Joint`.
/// * `Err(EccBurstError::OptimizationFailure)` when the starting point has a non-finite
///   objective, the best objective stays non-finite, or the last run exhausted its
///   iteration budget without meeting `sd_tolerance`.
pub fn fit_joint<M: CorrectionModel + ?Sized>(
    anchor: &BurstObservation,
    next: &BurstObservation,
    binary: &BinaryParameters,
    params: &FitParams,
    model: &M,
) -> Result<FitResult, EccBurstError> {
    let objective = JointObjective::new(anchor, next, binary, params, model);

    let (vp0, de0) = params.initial_guess;
    let (x0, y0) = from_orbit(vp0, de0);
    let mut best_param = vec![x0, y0];
    let mut best_cost = objective.cost(&best_param)?;
    if !best_cost.is_finite() {
        return Err(EccBurstError::OptimizationFailure {
            iterations: 0,
            last_cost: best_cost,
            reason: "non-finite objective at the initial guess".into(),
        });
    }

    let mut total_iters = 0u64;
    let mut last_status = TerminationStatus::NotTerminated;

    for restart in 0..=params.max_restarts {
        let solver = NelderMead::new(build_simplex(&best_param, params.simplex_step))
            .with_sd_tolerance(params.sd_tolerance)?;
        let result = Executor::new(objective.clone(), solver)
            .configure(|state| state.max_iters(params.max_iters))
            .run()?;

        let state = result.state();
        total_iters += state.get_iter();
        last_status = state.get_termination_status().clone();
        let cost = state.get_best_cost();

        debug!(
            restart,
            cost,
            iterations = state.get_iter(),
            status = ?last_status,
            "Nelder-Mead run finished"
        );

        let improved = cost < best_cost;
        if improved {
            if let Some(param) = state.get_best_param() {
                best_param = param.clone();
            }
        }
        let gain = best_cost - cost;
        best_cost = best_cost.min(cost);

        // Stop once a restart no longer moves the objective
        if restart > 0 && gain <= params.sd_tolerance.max(f64::EPSILON * best_cost.abs()) {
            break;
        }
    }

    if !best_cost.is_finite() {
        return Err(EccBurstError::OptimizationFailure {
            iterations: total_iters,
            last_cost: best_cost,
            reason: "non-finite objective".into(),
        });
    }
    if last_status == TerminationStatus::Terminated(TerminationReason::MaxItersReached) {
        return Err(EccBurstError::OptimizationFailure {
            iterations: total_iters,
            last_cost: best_cost,
            reason: format!("iteration budget of {} exhausted", params.max_iters),
        });
    }

    let (vp, de) = to_orbit(best_param[0], best_param[1]);
    let state = OrbitState::new(vp, de)?;
    let (t_next, f_next) = objective.predict(vp, de);

    info!(
        vp,
        de,
        cost = best_cost,
        iterations = total_iters,
        "joint burst fit converged"
    );

    Ok(FitResult::new(
        state,
        best_cost,
        total_iters,
        FitStrategy::Joint,
        model.name(),
        BurstObservation::new(t_next, f_next),
        next,
    ))
}
