//! # Morlet–Gabor wavelet model of a burst train
//!
//! A toy time-domain model in which every burst is one Morlet–Gabor wavelet
//!
//! ```text
//! ψ(t) = A · exp(-(t - t0)²/τ²) · cos(2π·f0·(t - t0) + φ0),    τ = Q / (2π·f0)
//! ```
//!
//! centred on the burst centroid `(t0, f0)`. A sum of wavelets sampled on a uniform time
//! grid gives a synthetic strain series; candidate wavelets are scored against it with a
//! white-noise (unit variance) Gaussian likelihood and the wavelet amplitude prior.
//!
//! The wavelet SNR assumes unit noise spectral density and unit reference SNR:
//!
//! ```text
//! SNR = A·√Q / √(2·√(2π)·f0)
//! p(A) ∝ 3·SNR / (4·(1 + SNR/4))
//! ```
//!
//! The full posterior adds the [`centroid_prior`]: the wavelet centroids must also sit
//! near the burst train predicted from the meta-parameters `(Mtot, Mc, t*, f*, de*)`.
//!
//! Sample series are [`nalgebra::DVector`]s.
pub mod centroid_prior;

use std::f64::consts::PI;

use nalgebra::DVector;

use crate::bursts::BurstSet;
use crate::constants::{Seconds, DPI};

pub use centroid_prior::{CentroidPrior, MetaParameters};

/// One Morlet–Gabor wavelet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wavelet {
    /// Centre time `t0` (s)
    pub center_time: f64,
    /// Centre frequency `f0` (Hz)
    pub frequency: f64,
    pub amplitude: f64,
    /// Quality factor `Q`
    pub quality: f64,
    /// Phase offset `φ0` (rad)
    pub phase: f64,
}

impl Wavelet {
    pub fn new(center_time: f64, frequency: f64, amplitude: f64, quality: f64, phase: f64) -> Self {
        Wavelet {
            center_time,
            frequency,
            amplitude,
            quality,
            phase,
        }
    }

    /// Envelope width `τ = Q/(2π·f0)`.
    pub fn tau(&self) -> f64 {
        self.quality / (DPI * self.frequency)
    }

    /// Value of the wavelet at time `t`.
    pub fn value(&self, t: f64) -> f64 {
        let tau = self.tau();
        let dt = t - self.center_time;
        self.amplitude * (-(dt * dt) / (tau * tau)).exp() * (DPI * self.frequency * dt + self.phase).cos()
    }

    /// Wavelet sampled on `times`.
    pub fn sample(&self, times: &DVector<f64>) -> DVector<f64> {
        times.map(|t| self.value(t))
    }

    /// Signal-to-noise ratio of the wavelet (unit noise PSD).
    pub fn snr(&self) -> f64 {
        self.amplitude * self.quality.sqrt() / (2.0 * (2.0 * PI).sqrt() * self.frequency).sqrt()
    }

    /// Log of the amplitude prior `3·SNR / (4·(1 + SNR/4))`.
    ///
    /// `-∞` for a zero amplitude, `NaN` for a negative one.
    pub fn log_amplitude_prior(&self) -> f64 {
        let snr = self.snr();
        (3.0 * snr / (4.0 * (1.0 + snr / 4.0))).ln()
    }

    /// Uniform-prior support on the sample grid `times`.
    ///
    /// * `t0` inside the grid,
    /// * `1/|t_first| ≤ f0 ≤` Nyquist frequency of the grid,
    /// * `Q ≥ 1`, `A ≥ 0`, `-π ≤ φ0 ≤ π`.
    pub fn is_admissible(&self, times: &DVector<f64>) -> bool {
        let (Some(&first), Some(&last)) = (times.iter().next(), times.iter().last()) else {
            return false;
        };
        if times.len() < 2 {
            return false;
        }
        let nyquist = 0.5 / (times[1] - times[0]);

        (first..=last).contains(&self.center_time)
            && self.frequency >= first.abs().recip()
            && self.frequency <= nyquist
            && self.quality >= 1.0
            && self.amplitude >= 0.0
            && (-PI..=PI).contains(&self.phase)
    }
}

/// Uniform time grid `start, start + dt, …` with `n` samples.
pub fn time_grid(start: f64, dt: f64, n: usize) -> DVector<f64> {
    DVector::from_fn(n, |i, _| start + dt * i as f64)
}

/// `n` samples spanning the analysis window `(t_min, t_max)`, both ends included.
pub fn window_grid((t_min, t_max): (Seconds, Seconds), n: usize) -> DVector<f64> {
    let dt = if n > 1 {
        (t_max - t_min) / (n - 1) as f64
    } else {
        0.0
    };
    time_grid(t_min, dt, n)
}

/// Sum of wavelets sampled on `times`.
pub fn wavelet_sum(wavelets: &[Wavelet], times: &DVector<f64>) -> DVector<f64> {
    wavelets
        .iter()
        .fold(DVector::zeros(times.len()), |acc, w| acc + w.sample(times))
}

/// One wavelet per burst, sharing amplitude, quality factor and phase.
pub fn wavelets_from_bursts(
    bursts: &BurstSet,
    amplitude: f64,
    quality: f64,
    phase: f64,
) -> Vec<Wavelet> {
    bursts
        .iter()
        .map(|b| Wavelet::new(b.time, b.frequency, amplitude, quality, phase))
        .collect()
}

/// Gaussian log-likelihood with unit noise, `-½·Σ(data - model)²`.
///
/// `-∞` when the two series differ in length.
pub fn log_likelihood(model: &DVector<f64>, data: &DVector<f64>) -> f64 {
    if model.len() != data.len() {
        return f64::NEG_INFINITY;
    }
    -0.5 * (data - model).norm_squared()
}

/// Log posterior of a set of wavelets given `data` sampled on `times`, without the
/// centroid prior.
///
/// `-∞` when any wavelet is outside the uniform-prior support; otherwise the likelihood
/// plus the amplitude prior of every wavelet.
pub fn log_wavelet_posterior(
    wavelets: &[Wavelet],
    times: &DVector<f64>,
    data: &DVector<f64>,
) -> f64 {
    if !wavelets.iter().all(|w| w.is_admissible(times)) {
        return f64::NEG_INFINITY;
    }
    let model = wavelet_sum(wavelets, times);
    let prior: f64 = wavelets.iter().map(Wavelet::log_amplitude_prior).sum();
    log_likelihood(&model, data) + prior
}

/// Full log posterior: [`log_wavelet_posterior`] plus the centroid prior of the wavelet
/// centres under `meta`.
pub fn log_posterior(
    wavelets: &[Wavelet],
    meta: &MetaParameters,
    prior: &CentroidPrior,
    times: &DVector<f64>,
    data: &DVector<f64>,
) -> f64 {
    let wavelet_part = log_wavelet_posterior(wavelets, times, data);
    if wavelet_part == f64::NEG_INFINITY {
        return wavelet_part;
    }
    let centroids = wavelets.iter().map(|w| (w.center_time, w.frequency));
    wavelet_part + prior.log_prior(centroids, meta)
}
