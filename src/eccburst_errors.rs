use thiserror::Error;

#[derive(Error, Debug)]
pub enum EccBurstError {
    #[error("Eccentricity deficit out of domain (expected 0 < de < 2): {0}")]
    InvalidEccentricityDeficit(f64),

    #[error("Pericenter speed out of domain (expected finite vp >= 0): {0}")]
    InvalidPericenterSpeed(f64),

    #[error("Non-finite result while evaluating {0}")]
    NonFiniteResult(&'static str),

    #[error("Invalid mass ratio (expected finite q > 0): {0}")]
    InvalidMassRatio(f64),

    #[error("Invalid total mass (expected finite Mtot > 0): {0}")]
    InvalidTotalMass(f64),

    #[error("Invalid chirp mass (expected 0 < Mc <= 0.25^(3/5)·Mtot): {0}")]
    InvalidChirpMass(f64),

    #[error("Invalid fit parameter: {0}")]
    InvalidFitParameter(String),

    #[error(
        "Optimization failed after {iterations} iterations (last objective = {last_cost:e}): {reason}"
    )]
    OptimizationFailure {
        iterations: u64,
        last_cost: f64,
        reason: String,
    },

    #[error("Argmin solver error: {0}")]
    ArgminError(String),

    #[error("ROOTS finding error: {0}")]
    RootFindingError(#[from] roots::SearchError),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Error during the burst file parsing: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Invalid burst record at line {line}: {reason}")]
    InvalidBurstRecord { line: u64, reason: String },

    #[error("Burst times must be non-decreasing (first violation at index {0})")]
    UnorderedBursts(usize),

    #[error("Not enough bursts: needed {needed}, found {found}")]
    NotEnoughBursts { needed: usize, found: usize },

    #[error("The anchor burst carries no eccentricity deficit")]
    MissingEccentricityDeficit,
}

impl From<argmin::core::Error> for EccBurstError {
    fn from(err: argmin::core::Error) -> Self {
        EccBurstError::ArgminError(err.to_string())
    }
}

impl PartialEq for EccBurstError {
    fn eq(&self, other: &Self) -> bool {
        use EccBurstError::*;
        match (self, other) {
            (InvalidEccentricityDeficit(a), InvalidEccentricityDeficit(b)) => {
                a == b || (a.is_nan() && b.is_nan())
            }
            (InvalidPericenterSpeed(a), InvalidPericenterSpeed(b)) => {
                a == b || (a.is_nan() && b.is_nan())
            }
            (NonFiniteResult(a), NonFiniteResult(b)) => a == b,
            (InvalidMassRatio(a), InvalidMassRatio(b)) => a == b,
            (InvalidTotalMass(a), InvalidTotalMass(b)) => a == b,
            (InvalidChirpMass(a), InvalidChirpMass(b)) => a == b,
            (InvalidFitParameter(a), InvalidFitParameter(b)) => a == b,
            (
                OptimizationFailure {
                    iterations: i1,
                    reason: r1,
                    ..
                },
                OptimizationFailure {
                    iterations: i2,
                    reason: r2,
                    ..
                },
            ) => i1 == i2 && r1 == r2,
            (ArgminError(a), ArgminError(b)) => a == b,
            (RootFindingError(a), RootFindingError(b)) => a == b,

            // Wrapped I/O and csv errors are not comparable: same variant is enough
            (IoError(_), IoError(_)) => true,
            (CsvError(_), CsvError(_)) => true,

            (
                InvalidBurstRecord {
                    line: l1,
                    reason: r1,
                },
                InvalidBurstRecord {
                    line: l2,
                    reason: r2,
                },
            ) => l1 == l2 && r1 == r2,
            (UnorderedBursts(a), UnorderedBursts(b)) => a == b,
            (
                NotEnoughBursts {
                    needed: n1,
                    found: f1,
                },
                NotEnoughBursts {
                    needed: n2,
                    found: f2,
                },
            ) => n1 == n2 && f1 == f2,
            (MissingEccentricityDeficit, MissingEccentricityDeficit) => true,

            _ => false,
        }
    }
}

impl EccBurstError {
    /// True for the variants raised when an orbital formula is evaluated outside its domain.
    pub fn is_domain_error(&self) -> bool {
        matches!(
            self,
            EccBurstError::InvalidEccentricityDeficit(_)
                | EccBurstError::InvalidPericenterSpeed(_)
                | EccBurstError::NonFiniteResult(_)
        )
    }
}
