//! Error type shared by configuration, parameter validation and the engine.
use thiserror::Error;

/// Errors raised before any trial starts. A run never fails midway.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("roster has no members")]
    EmptyRoster,
    #[error("minimum pool size {min} must be between 1 and the roster length {len}")]
    InvalidMinPoolSize { min: usize, len: usize },
    #[error("no roster defined for pool size {requested} (valid sizes {min}..={max})")]
    UnknownPoolSize {
        requested: usize,
        min: usize,
        max: usize,
    },
    #[error(
        "pull rates must cover every phase: {phases} phases, {limited} limited rates, {standard} standard rates"
    )]
    PhaseRateMismatch {
        phases: usize,
        limited: usize,
        standard: usize,
    },
    #[error("phase {phase} has no patches")]
    EmptyPhase { phase: String },
    #[error("phase {phase} shrinks the pool from {previous} to {requested}")]
    ShrinkingPool {
        phase: String,
        previous: usize,
        requested: usize,
    },
    #[error("unknown roster member: {0}")]
    UnknownMember(String),
    #[error("roster member {0} is listed more than once")]
    DuplicateMember(String),
    #[error("trial count must be at least 1")]
    NoTrials,
    #[error("{field} must be a probability in [0, 1] (got {value})")]
    InvalidProbability { field: &'static str, value: f64 },
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error("worker pool unavailable: {0}")]
    WorkerPool(String),
    #[error("seed derivation failed: {0}")]
    Seed(String),
}

impl From<rayon::ThreadPoolBuildError> for SimError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        Self::WorkerPool(err.to_string())
    }
}
