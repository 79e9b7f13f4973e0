//! # Burst-train prediction
//!
//! Iterates the burst map from a known burst and orbit state to forecast the centroids
//! of the following bursts:
//!
//! ```text
//! t_{i+1} = t_i + T(s_i)
//! f_{i+1} = f(s_i)
//! s_{i+1} = advance(s_i)
//! ```
//!
//! where `T` and `f` are the corrected period and burst frequency (evaluated at the
//! advanced state `s_{i+1}`). The prediction stops with a domain error as soon as the
//! orbit leaves the bound domain.
use tracing::debug;

use crate::binary::BinaryParameters;
use crate::bursts::{BurstObservation, BurstSet};
use crate::eccburst_errors::EccBurstError;
use crate::evolution::post_newtonian::CorrectionModel;
use crate::orbit_state::OrbitState;

/// One predicted burst and the orbit state that emits it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictedBurst {
    pub burst: BurstObservation,
    pub state: OrbitState,
}

/// Predict the `n` bursts following `anchor`.
///
/// Arguments
/// -----------------
/// * `anchor`: the last known burst.
/// * `state`: orbit state at the anchor burst.
/// * `binary`: mass configuration.
/// * `model`: correction coefficients.
/// * `n`: number of bursts to predict.
///
/// Return
/// ----------
/// * `n` predicted bursts in time order, each paired with its emitting state.
/// * A domain error (see [`OrbitState::period`]) if the orbit leaves `0 < de < 2` or
///   `vp` turns negative before `n` bursts are produced.
pub fn predict_burst_train<M: CorrectionModel + ?Sized>(
    anchor: &BurstObservation,
    state: OrbitState,
    binary: &BinaryParameters,
    model: &M,
    n: usize,
) -> Result<Vec<PredictedBurst>, EccBurstError> {
    let mut train = Vec::with_capacity(n);
    let mut previous = (anchor.time, state);

    for i in 0..n {
        let predicted = next_burst(previous.0, &previous.1, binary, model, i)?;
        previous = (predicted.burst.time, predicted.state);
        train.push(predicted);
    }

    Ok(train)
}

/// Predict bursts following `anchor` until one arrives after `t_end`.
///
/// The first burst past `t_end` is kept, so every time up to `t_end` lies between two
/// bursts of the train (or before the first one). At most `max_bursts` are produced.
///
/// Return
/// ----------
/// * The predicted bursts in time order, empty when `anchor.time > t_end`.
/// * A domain error as in [`predict_burst_train`].
pub fn predict_bursts_until<M: CorrectionModel + ?Sized>(
    anchor: &BurstObservation,
    state: OrbitState,
    binary: &BinaryParameters,
    model: &M,
    t_end: f64,
    max_bursts: usize,
) -> Result<Vec<PredictedBurst>, EccBurstError> {
    let mut train = Vec::new();
    let mut previous = (anchor.time, state);

    while previous.0 <= t_end && train.len() < max_bursts {
        let predicted = next_burst(previous.0, &previous.1, binary, model, train.len())?;
        previous = (predicted.burst.time, predicted.state);
        train.push(predicted);
    }

    Ok(train)
}

/// One application of the burst map from the burst at `time` emitted by `current`.
fn next_burst<M: CorrectionModel + ?Sized>(
    time: f64,
    current: &OrbitState,
    binary: &BinaryParameters,
    model: &M,
    index: usize,
) -> Result<PredictedBurst, EccBurstError> {
    let period = current.period(binary, model)?;
    let frequency = current.burst_frequency(binary, model)?;
    let next = current.advance(binary, model)?;
    let time = time + period;

    debug!(
        index,
        time,
        frequency,
        vp = next.vp(),
        de = next.de(),
        "predicted burst"
    );

    Ok(PredictedBurst {
        burst: BurstObservation::new(time, frequency).with_eccentricity_deficit(next.de()),
        state: next,
    })
}

/// Predicted train with the anchor burst in front, as a [`BurstSet`].
pub fn burst_train_set<M: CorrectionModel + ?Sized>(
    anchor: &BurstObservation,
    state: OrbitState,
    binary: &BinaryParameters,
    model: &M,
    n: usize,
) -> Result<BurstSet, EccBurstError> {
    let mut bursts = Vec::with_capacity(n + 1);
    bursts.push(*anchor);
    bursts.extend(
        predict_burst_train(anchor, state, binary, model, n)?
            .into_iter()
            .map(|p| p.burst),
    );
    BurstSet::new(bursts)
}
