mod common;

use approx::assert_relative_eq;
use eccburst::bursts::{BurstObservation, BurstSet};
use eccburst::eccburst_errors::EccBurstError;
use eccburst::evolution::burst_train::{burst_train_set, predict_burst_train};
use eccburst::evolution::{FirstPostNewtonian, NewtonianOnly};
use eccburst::fit::{
    fit_burst_set, fit_burst_set_with, fit_next_burst, fit_next_burst_with, FitParams,
    FitStrategy,
};
use eccburst::orbit_state::OrbitState;

use crate::common::{assert_state_close, reference_binary, reference_pair};

#[test]
fn joint_fit_reference_pair() {
    let (anchor, next) = reference_pair();
    let params = FitParams::default();
    let fit = fit_next_burst(&anchor, &next, &reference_binary(), &params).unwrap();

    assert_eq!(fit.strategy, FitStrategy::Joint);
    assert!(fit.cost < 1e-6, "cost = {}", fit.cost);
    assert!(fit.within_sigmas(params.sigma_time, params.sigma_frequency, 1.0));
    assert_state_close(&fit.state, &OrbitState::new(0.04398, 0.2485).unwrap(), 2e-2);
}

#[test]
fn anchored_fit_reference_pair() {
    let (anchor, next) = reference_pair();
    let params = FitParams::builder()
        .strategy(FitStrategy::Anchored)
        .build()
        .unwrap();
    let fit = fit_next_burst(&anchor, &next, &reference_binary(), &params).unwrap();

    assert_eq!(fit.strategy, FitStrategy::Anchored);
    assert!(fit.time_residual.abs() < 1e-6);
    assert!(fit.state.de() > 0.34 && fit.state.de() < 0.4);
}

#[test]
fn anchored_fit_recovers_synthetic_state() {
    let binary = reference_binary();
    let truth = OrbitState::new(0.044, 0.25).unwrap();
    // vp is pinned through the Newtonian frequency of the anchor state
    let anchor = BurstObservation::new(-203.0, truth.newtonian_burst_frequency(&binary).unwrap());
    let predicted = predict_burst_train(&anchor, truth, &binary, &FirstPostNewtonian, 1).unwrap();

    let params = FitParams::builder()
        .strategy(FitStrategy::Anchored)
        .build()
        .unwrap();
    let fit = fit_next_burst(&anchor, &predicted[0].burst, &binary, &params).unwrap();

    assert_state_close(&fit.state, &truth, 1e-6);
    assert_relative_eq!(
        fit.predicted_next.frequency,
        predicted[0].burst.frequency,
        max_relative = 1e-6
    );
}

#[test]
fn newtonian_model_fits_its_own_prediction() {
    let binary = reference_binary();
    let truth = OrbitState::new(0.044, 0.25).unwrap();
    let (anchor, _) = reference_pair();
    let predicted = predict_burst_train(&anchor, truth, &binary, &NewtonianOnly, 1).unwrap();

    let params = FitParams::default();
    let fit =
        fit_next_burst_with(&anchor, &predicted[0].burst, &binary, &params, &NewtonianOnly).unwrap();

    assert_eq!(fit.model, "Newtonian");
    assert!(fit.within_sigmas(params.sigma_time, params.sigma_frequency, 1.0));
}

#[test]
fn fit_every_pair_of_a_predicted_train() {
    let binary = reference_binary();
    let truth = OrbitState::new(0.04398, 0.2485).unwrap();
    let (anchor, _) = reference_pair();
    let train = burst_train_set(&anchor, truth, &binary, &FirstPostNewtonian, 3).unwrap();
    assert_eq!(train.len(), 4);

    let params = FitParams::default();
    let fits = fit_burst_set(&train, &binary, &params).unwrap();
    assert_eq!(fits.len(), 3);
    for fit in &fits {
        assert!(
            fit.within_sigmas(params.sigma_time, params.sigma_frequency, 1.0),
            "{fit:#}"
        );
    }
}

#[test]
fn newtonian_train_fitted_with_its_own_model() {
    let binary = reference_binary();
    let truth = OrbitState::new(0.044, 0.25).unwrap();
    let anchor = BurstObservation::new(-203.0, truth.newtonian_burst_frequency(&binary).unwrap());
    let predicted = predict_burst_train(&anchor, truth, &binary, &NewtonianOnly, 3).unwrap();
    let train = burst_train_set(&anchor, truth, &binary, &NewtonianOnly, 3).unwrap();

    let params = FitParams::builder()
        .strategy(FitStrategy::Anchored)
        .build()
        .unwrap();
    let fits = fit_burst_set_with(&train, &binary, &params, &NewtonianOnly).unwrap();
    assert_eq!(fits.len(), 3);

    // Every burst of a Newtonian train sits at the Newtonian frequency of its state
    let states: Vec<OrbitState> = std::iter::once(truth)
        .chain(predicted.iter().map(|p| p.state))
        .collect();
    for (fit, state) in fits.iter().zip(&states) {
        assert_eq!(fit.model, "Newtonian");
        assert_state_close(&fit.state, state, 1e-6);
    }

    // The 1PN map does not reproduce the same train
    let pn_fits = fit_burst_set(&train, &binary, &params).unwrap();
    assert!((pn_fits[0].state.de() - truth.de()).abs() > 1e-4);
}

#[test]
fn single_burst_cannot_be_fitted() {
    let (anchor, _) = reference_pair();
    let bursts = BurstSet::new(vec![anchor]).unwrap();
    let err = fit_burst_set(&bursts, &reference_binary(), &FitParams::default()).unwrap_err();
    assert_eq!(err, EccBurstError::NotEnoughBursts { needed: 2, found: 1 });
}
