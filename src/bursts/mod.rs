//! # Burst observations
//!
//! A burst is the short gravitational-wave transient emitted at each pericenter passage
//! of a highly eccentric binary. It is summarised by its centroid: arrival time (s) and
//! frequency (Hz). An optional eccentricity deficit can ride along when the burst comes
//! from a simulated catalogue that knows the true orbit.
//!
//! [`BurstSet`] is an ordered sequence of bursts (non-decreasing arrival times). Consecutive
//! pairs `(anchor, next)` are what the fit driver in [`crate::fit`] consumes.
//!
//! ## See also
//!
//! * [`burst_reader`] – whitespace-delimited `time frequency [de]` files.
//! * [`crate::evolution::burst_train`] – forward prediction of a burst sequence.
use std::fmt;

use camino::Utf8Path;
use itertools::Itertools;
use serde::Deserialize;

use crate::constants::{Hertz, Seconds};
use crate::eccburst_errors::EccBurstError;

pub mod burst_reader;

/// Centroid of one gravitational-wave burst.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BurstObservation {
    pub time: Seconds,
    pub frequency: Hertz,
    /// Eccentricity deficit of the emitting orbit, when known.
    #[serde(default)]
    pub eccentricity_deficit: Option<f64>,
}

impl BurstObservation {
    pub fn new(time: Seconds, frequency: Hertz) -> Self {
        BurstObservation {
            time,
            frequency,
            eccentricity_deficit: None,
        }
    }

    /// Attach the eccentricity deficit of the emitting orbit.
    pub fn with_eccentricity_deficit(mut self, de: f64) -> Self {
        self.eccentricity_deficit = Some(de);
        self
    }
}

impl fmt::Display for BurstObservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "burst(t={:.6} s, f={:.6e} Hz", self.time, self.frequency)?;
        if let Some(de) = self.eccentricity_deficit {
            write!(f, ", de={de:.6}")?;
        }
        write!(f, ")")
    }
}

/// Time-ordered sequence of bursts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BurstSet {
    bursts: Vec<BurstObservation>,
}

impl BurstSet {
    /// Build a burst set, checking that times are non-decreasing and that every burst has a
    /// finite time and a finite, strictly positive frequency.
    ///
    /// Return
    /// ----------
    /// * `Err(EccBurstError::UnorderedBursts(i))` with `i` the index of the first burst
    ///   that arrives before its predecessor.
    /// * `Err(EccBurstError::InvalidBurstRecord)` for a non-finite or non-positive value.
    pub fn new(bursts: Vec<BurstObservation>) -> Result<Self, EccBurstError> {
        for (i, b) in bursts.iter().enumerate() {
            if !b.time.is_finite() || !(b.frequency.is_finite() && b.frequency > 0.0) {
                return Err(EccBurstError::InvalidBurstRecord {
                    line: i as u64 + 1,
                    reason: format!("non-physical burst {b}"),
                });
            }
        }
        if let Some((i, _)) = bursts
            .iter()
            .tuple_windows()
            .enumerate()
            .find(|(_, (a, b))| b.time < a.time)
        {
            return Err(EccBurstError::UnorderedBursts(i + 1));
        }
        Ok(BurstSet { bursts })
    }

    /// Read a burst file, see [`burst_reader::read_burst_file`].
    pub fn from_file(path: &Utf8Path) -> Result<Self, EccBurstError> {
        burst_reader::read_burst_file(path)
    }

    pub fn len(&self) -> usize {
        self.bursts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bursts.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&BurstObservation> {
        self.bursts.get(index)
    }

    pub fn first(&self) -> Option<&BurstObservation> {
        self.bursts.first()
    }

    pub fn last(&self) -> Option<&BurstObservation> {
        self.bursts.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BurstObservation> {
        self.bursts.iter()
    }

    pub fn as_slice(&self) -> &[BurstObservation] {
        &self.bursts
    }

    /// Consecutive `(anchor, next)` pairs.
    pub fn consecutive_pairs(
        &self,
    ) -> impl Iterator<Item = (&BurstObservation, &BurstObservation)> + '_ {
        self.bursts.iter().tuple_windows()
    }

    /// Time between consecutive bursts.
    pub fn intervals(&self) -> Vec<Seconds> {
        self.consecutive_pairs()
            .map(|(a, b)| b.time - a.time)
            .collect()
    }

    /// The first two bursts, the minimum a fit needs.
    pub fn leading_pair(&self) -> Result<(&BurstObservation, &BurstObservation), EccBurstError> {
        match (self.bursts.first(), self.bursts.get(1)) {
            (Some(a), Some(b)) => Ok((a, b)),
            _ => Err(EccBurstError::NotEnoughBursts {
                needed: 2,
                found: self.bursts.len(),
            }),
        }
    }
    /// Time window around the three bursts starting at `low`, padded by half the
    /// neighbouring interval on each side:
    ///
    /// ```text
    /// t_min = t[low]     - (t[low+1] - t[low])   / 2
    /// t_max = t[low + 2] + (t[low+2] - t[low+1]) / 2
    /// ```
    ///
    /// Return
    /// ----------
    /// * `Err(EccBurstError::NotEnoughBursts)` when fewer than three bursts start at `low`.
    pub fn analysis_window(&self, low: usize) -> Result<(Seconds, Seconds), EccBurstError> {
        match self.bursts.get(low..low.saturating_add(3)) {
            Some([a, b, c]) => Ok((
                a.time - (b.time - a.time) / 2.0,
                c.time + (c.time - b.time) / 2.0,
            )),
            _ => Err(EccBurstError::NotEnoughBursts {
                needed: low.saturating_add(3),
                found: self.bursts.len(),
            }),
        }
    }
}

impl<'a> IntoIterator for &'a BurstSet {
    type Item = &'a BurstObservation;
    type IntoIter = std::slice::Iter<'a, BurstObservation>;

    fn into_iter(self) -> Self::IntoIter {
        self.bursts.iter()
    }
}

impl fmt::Display for BurstSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "{:>4}  {:>16}  {:>14}  {:>10}", "#", "time [s]", "freq [Hz]", "de")?;
            for (i, b) in self.bursts.iter().enumerate() {
                let de = b
                    .eccentricity_deficit
                    .map(|de| format!("{de:.6}"))
                    .unwrap_or_else(|| "-".to_string());
                writeln!(f, "{i:>4}  {:>16.6}  {:>14.6e}  {de:>10}", b.time, b.frequency)?;
            }
            Ok(())
        } else {
            match (self.first(), self.last()) {
                (Some(a), Some(b)) => write!(
                    f,
                    "BurstSet({} bursts, t ∈ [{:.3}, {:.3}] s)",
                    self.len(),
                    a.time,
                    b.time
                ),
                _ => write!(f, "BurstSet(empty)"),
            }
        }
    }
}

#[cfg(test)]
mod bursts_test {
    use super::*;
    use approx::assert_relative_eq;

    fn sample() -> BurstSet {
        BurstSet::new(vec![
            BurstObservation::new(-203.0, 0.027441440005832807),
            BurstObservation::new(0.0, 0.05255602595335716),
            BurstObservation::new(40.5, 0.08).with_eccentricity_deficit(0.3),
        ])
        .unwrap()
    }

    #[test]
    fn intervals_and_pairs() {
        let set = sample();
        assert_eq!(set.len(), 3);
        let intervals = set.intervals();
        assert_relative_eq!(intervals[0], 203.0);
        assert_relative_eq!(intervals[1], 40.5);
        assert_eq!(set.consecutive_pairs().count(), 2);

        let (a, b) = set.leading_pair().unwrap();
        assert_eq!(a.time, -203.0);
        assert_eq!(b.time, 0.0);
    }

    #[test]
    fn rejects_unordered_times() {
        let err = BurstSet::new(vec![
            BurstObservation::new(0.0, 1.0),
            BurstObservation::new(10.0, 1.0),
            BurstObservation::new(5.0, 1.0),
        ])
        .unwrap_err();
        assert_eq!(err, EccBurstError::UnorderedBursts(2));
    }

    #[test]
    fn rejects_non_physical_frequency() {
        let err = BurstSet::new(vec![BurstObservation::new(0.0, -1.0)]).unwrap_err();
        assert!(matches!(err, EccBurstError::InvalidBurstRecord { line: 1, .. }));
    }

    #[test]
    fn leading_pair_needs_two_bursts() {
        let set = BurstSet::new(vec![BurstObservation::new(0.0, 1.0)]).unwrap();
        assert_eq!(
            set.leading_pair().unwrap_err(),
            EccBurstError::NotEnoughBursts {
                needed: 2,
                found: 1
            }
        );
    }

    #[test]
    fn analysis_window_pads_half_intervals() {
        let set = sample();
        assert_eq!(set.analysis_window(0).unwrap(), (-304.5, 60.75));
        assert_eq!(
            set.analysis_window(1).unwrap_err(),
            EccBurstError::NotEnoughBursts {
                needed: 4,
                found: 3
            }
        );
    }

    #[test]
    fn display() {
        let set = sample();
        assert_eq!(
            set.to_string(),
            "BurstSet(3 bursts, t ∈ [-203.000, 40.500] s)"
        );
        let table = format!("{set:#}");
        assert_eq!(table.lines().count(), 4);
        assert!(table.contains("0.300000"));
        assert_eq!(BurstSet::default().to_string(), "BurstSet(empty)");
    }
}
