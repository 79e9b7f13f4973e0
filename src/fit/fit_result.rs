use std::fmt;

use crate::bursts::BurstObservation;
use crate::fit::FitStrategy;
use crate::orbit_state::OrbitState;

/// Outcome of a burst-pair fit.
///
/// * `state` – fitted orbit state at the anchor burst.
/// * `cost` – objective at convergence: χ² for the joint fit, `|t* + T - t_next|` (s) for
///   the anchored fit.
/// * `iterations` – solver iterations (joint: summed over restarts; anchored: objective
///   evaluations of the root or minimisation search).
/// * `predicted_next` – `(t* + T, f)` evaluated at `state`.
/// * `time_residual`, `frequency_residual` – predicted minus observed next burst.
#[derive(Debug, Clone, PartialEq)]
pub struct FitResult {
    pub state: OrbitState,
    pub cost: f64,
    pub iterations: u64,
    pub strategy: FitStrategy,
    pub model: &'static str,
    pub predicted_next: BurstObservation,
    pub time_residual: f64,
    pub frequency_residual: f64,
}

impl FitResult {
    pub(crate) fn new(
        state: OrbitState,
        cost: f64,
        iterations: u64,
        strategy: FitStrategy,
        model: &'static str,
        predicted_next: BurstObservation,
        observed_next: &BurstObservation,
    ) -> Self {
        FitResult {
            state,
            cost,
            iterations,
            strategy,
            model,
            predicted_next,
            time_residual: predicted_next.time - observed_next.time,
            frequency_residual: predicted_next.frequency - observed_next.frequency,
        }
    }

    /// True when both residuals lie within `n_sigma` of their uncertainties.
    pub fn within_sigmas(&self, sigma_time: f64, sigma_frequency: f64, n_sigma: f64) -> bool {
        self.time_residual.abs() <= n_sigma * sigma_time
            && self.frequency_residual.abs() <= n_sigma * sigma_frequency
    }
}

impl fmt::Display for FitResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "Burst fit ({} strategy, {} map)", self.strategy, self.model)?;
            writeln!(f, "  vp          = {:.10}", self.state.vp())?;
            writeln!(f, "  de          = {:.10}", self.state.de())?;
            writeln!(f, "  e           = {:.10}", self.state.eccentricity())?;
            writeln!(f, "  cost        = {:.6e}", self.cost)?;
            writeln!(f, "  iterations  = {}", self.iterations)?;
            writeln!(
                f,
                "  next burst  = t {:.6} s, f {:.6e} Hz",
                self.predicted_next.time, self.predicted_next.frequency
            )?;
            write!(
                f,
                "  residuals   = dt {:+.3e} s, df {:+.3e} Hz",
                self.time_residual, self.frequency_residual
            )
        } else {
            write!(
                f,
                "FitResult({}, vp={:.6}, de={:.6}, cost={:.3e}, iters={})",
                self.strategy,
                self.state.vp(),
                self.state.de(),
                self.cost,
                self.iterations
            )
        }
    }
}

#[cfg(test)]
mod fit_result_test {
    use super::*;

    #[test]
    fn residuals_and_sigmas() {
        let state = OrbitState::new(0.04, 0.25).unwrap();
        let predicted = BurstObservation::new(1.0, 0.051);
        let observed = BurstObservation::new(0.0, 0.05);
        let res = FitResult::new(state, 0.1, 10, FitStrategy::Joint, "1PN", predicted, &observed);

        assert_eq!(res.time_residual, 1.0);
        assert!((res.frequency_residual - 0.001).abs() < 1e-15);
        assert!(res.within_sigmas(5.0, 0.005, 1.0));
        assert!(!res.within_sigmas(0.5, 0.005, 1.0));
        assert_eq!(
            res.to_string(),
            "FitResult(joint, vp=0.040000, de=0.250000, cost=1.000e-1, iters=10)"
        );
    }
}
