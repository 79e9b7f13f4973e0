//! # Meta-parameter prior on burst centroids
//!
//! Scores wavelet centroids `(t_i, f_i)` against the burst train that the burst map
//! predicts from a small set of meta-parameters: the total mass, the chirp mass and the
//! anchor burst `(t*, f*)` with the eccentricity deficit `de*` of its orbit.
//!
//! ```text
//! vp*  = (2π·f*·m·(2 - de*))^{1/3}
//! ln p = Σ_i [ -½·((t_i - t_k)/σT)² - ½·((f_i - f_k)/σF)² - ln(2π·σT·σF) ]
//! ```
//!
//! where `(t_k, f_k)` is the predicted burst nearest in time to the centroid, the anchor
//! included. The train is predicted forward from `t*` until it leaves the analysis window
//! `[t_min, t_max]`, so centroids earlier than `t*` are scored against the anchor itself.
//!
//! The prior is `-∞` outside its support: meta-parameters that do not describe a binary
//! or a bound orbit, an anchor or a centroid outside the window, or an orbit that leaves
//! `0 < de < 2` before the end of the window.
use tracing::debug;

use crate::binary::BinaryParameters;
use crate::bursts::BurstObservation;
use crate::constants::{Hertz, Seconds, SolarMass, DPI};
use crate::eccburst_errors::EccBurstError;
use crate::evolution::burst_train::predict_bursts_until;
use crate::evolution::newtonian::pericenter_speed_from_frequency;
use crate::evolution::post_newtonian::{CorrectionModel, FirstPostNewtonian};
use crate::orbit_state::OrbitState;

/// Masses and anchor burst that generate the predicted train.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetaParameters {
    pub total_mass: SolarMass,
    pub chirp_mass: SolarMass,
    /// `t*`
    pub anchor_time: Seconds,
    /// `f*`
    pub anchor_frequency: Hertz,
    /// `de*`
    pub eccentricity_deficit: f64,
}

impl MetaParameters {
    pub fn new(
        binary: &BinaryParameters,
        anchor_time: Seconds,
        anchor_frequency: Hertz,
        eccentricity_deficit: f64,
    ) -> Self {
        MetaParameters {
            total_mass: binary.total_mass(),
            chirp_mass: binary.chirp_mass(),
            anchor_time,
            anchor_frequency,
            eccentricity_deficit,
        }
    }

    /// Meta-parameters of a burst that carries its eccentricity deficit, as read from
    /// the third column of a burst file.
    ///
    /// Return
    /// ----------
    /// * `Err(EccBurstError::MissingEccentricityDeficit)` when the burst has none.
    pub fn from_anchor(
        binary: &BinaryParameters,
        anchor: &BurstObservation,
    ) -> Result<Self, EccBurstError> {
        let de = anchor
            .eccentricity_deficit
            .ok_or(EccBurstError::MissingEccentricityDeficit)?;
        Ok(Self::new(binary, anchor.time, anchor.frequency, de))
    }

    /// Binary rebuilt from `(Mtot, Mc)` on the `q ≤ 1` branch.
    pub fn binary(&self) -> Result<BinaryParameters, EccBurstError> {
        BinaryParameters::from_chirp_mass(self.total_mass, self.chirp_mass)
    }

    pub fn anchor(&self) -> BurstObservation {
        BurstObservation::new(self.anchor_time, self.anchor_frequency)
            .with_eccentricity_deficit(self.eccentricity_deficit)
    }

    /// Orbit state at the anchor, `vp` from the Newtonian burst frequency `f*`.
    pub fn anchor_state(&self, binary: &BinaryParameters) -> Result<OrbitState, EccBurstError> {
        let vp = pericenter_speed_from_frequency(
            self.anchor_frequency,
            self.eccentricity_deficit,
            binary.mass_seconds(),
        );
        OrbitState::new(vp, self.eccentricity_deficit)
    }
}

/// Gaussian prior of centroids around the predicted train, restricted to a time window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CentroidPrior {
    t_min: Seconds,
    t_max: Seconds,
    sigma_time: Seconds,
    sigma_frequency: Hertz,
    max_bursts: usize,
}

impl CentroidPrior {
    /// Cap on the length of the predicted train.
    pub const DEFAULT_MAX_BURSTS: usize = 64;

    /// Build a prior on the window `(t_min, t_max)`, see
    /// [`BurstSet::analysis_window`](crate::bursts::BurstSet::analysis_window).
    ///
    /// Return
    /// ----------
    /// * `Err(EccBurstError::InvalidFitParameter)` unless `t_min < t_max` are finite and
    ///   both widths are finite and strictly positive.
    pub fn new(
        (t_min, t_max): (Seconds, Seconds),
        sigma_time: Seconds,
        sigma_frequency: Hertz,
    ) -> Result<Self, EccBurstError> {
        let invalid = |msg: &str| Err(EccBurstError::InvalidFitParameter(msg.into()));
        if !(t_min.is_finite() && t_max.is_finite() && t_min < t_max) {
            return invalid("prior window must satisfy t_min < t_max");
        }
        let positive = |x: f64| x.is_finite() && x > 0.0;
        if !(positive(sigma_time) && positive(sigma_frequency)) {
            return invalid("prior widths must be finite and > 0");
        }
        Ok(CentroidPrior {
            t_min,
            t_max,
            sigma_time,
            sigma_frequency,
            max_bursts: Self::DEFAULT_MAX_BURSTS,
        })
    }

    pub fn with_max_bursts(mut self, max_bursts: usize) -> Self {
        self.max_bursts = max_bursts;
        self
    }

    pub fn window(&self) -> (Seconds, Seconds) {
        (self.t_min, self.t_max)
    }

    fn contains(&self, t: f64) -> bool {
        (self.t_min..=self.t_max).contains(&t)
    }

    /// Anchor burst followed by the bursts predicted up to the end of the window.
    pub fn predicted_train<M: CorrectionModel + ?Sized>(
        &self,
        meta: &MetaParameters,
        model: &M,
    ) -> Result<Vec<BurstObservation>, EccBurstError> {
        let binary = meta.binary()?;
        let state = meta.anchor_state(&binary)?;
        let anchor = meta.anchor();

        let mut train = vec![anchor];
        train.extend(
            predict_bursts_until(&anchor, state, &binary, model, self.t_max, self.max_bursts)?
                .into_iter()
                .map(|p| p.burst),
        );
        Ok(train)
    }

    /// Log prior of `centroids` with the 1PN map.
    pub fn log_prior<I>(&self, centroids: I, meta: &MetaParameters) -> f64
    where
        I: IntoIterator<Item = (Seconds, Hertz)>,
    {
        self.log_prior_with(centroids, meta, &FirstPostNewtonian)
    }

    /// Same as [`CentroidPrior::log_prior`] with an explicit correction model.
    pub fn log_prior_with<I, M>(&self, centroids: I, meta: &MetaParameters, model: &M) -> f64
    where
        I: IntoIterator<Item = (Seconds, Hertz)>,
        M: CorrectionModel + ?Sized,
    {
        if !self.contains(meta.anchor_time) || !(meta.anchor_frequency > 0.0) {
            return f64::NEG_INFINITY;
        }
        let train = match self.predicted_train(meta, model) {
            Ok(train) => train,
            Err(err) => {
                debug!(%err, "meta-parameters outside the prior support");
                return f64::NEG_INFINITY;
            }
        };

        let norm = (DPI * self.sigma_time * self.sigma_frequency).ln();
        let mut total = 0.0;
        for (t, f) in centroids {
            if !self.contains(t) || !f.is_finite() {
                return f64::NEG_INFINITY;
            }
            let Some(nearest) = train
                .iter()
                .min_by(|a, b| (a.time - t).abs().total_cmp(&(b.time - t).abs()))
            else {
                return f64::NEG_INFINITY;
            };
            let dt = (t - nearest.time) / self.sigma_time;
            let df = (f - nearest.frequency) / self.sigma_frequency;
            total += -0.5 * (dt * dt + df * df) - norm;
        }
        total
    }
}
