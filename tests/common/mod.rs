use approx::assert_relative_eq;
use eccburst::binary::BinaryParameters;
use eccburst::bursts::BurstObservation;
use eccburst::orbit_state::OrbitState;

/// Binary used by the reference burst pair.
pub fn reference_binary() -> BinaryParameters {
    BinaryParameters::new(30.0, 0.25).unwrap()
}

/// Anchor and next burst of the reference pair.
pub fn reference_pair() -> (BurstObservation, BurstObservation) {
    (
        BurstObservation::new(-203.0, 0.027441440005832807),
        BurstObservation::new(0.0, 0.05255602595335716),
    )
}

pub fn assert_state_close(actual: &OrbitState, expected: &OrbitState, max_relative: f64) {
    assert_relative_eq!(actual.vp(), expected.vp(), max_relative = max_relative);
    assert_relative_eq!(actual.de(), expected.de(), max_relative = max_relative);
}
