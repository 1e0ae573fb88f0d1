//! Error types shared by the whole crate.

use thiserror::Error;

use crate::evolution::Phase;

/// Boxed error returned by external collaborators (problem models,
/// evaluators).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors produced while configuring or running an evolution.
///
/// Configuration errors are fatal and reported before any round runs.
/// Collaborator errors abort the run in progress; nothing is retried.
#[derive(Error, Debug)]
pub enum EvolveError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("unknown stop criterion `{0}`")]
    UnknownCriterion(String),

    #[error("problem model failed to generate a candidate")]
    ProblemModel(#[source] BoxError),

    #[error("candidate has {actual} genes, expected {expected}")]
    GeneCount { expected: usize, actual: usize },

    #[error("evaluator failed")]
    Evaluator(#[source] BoxError),

    #[error("evaluator returned {actual} costs for a population of {expected}")]
    CostCount { expected: usize, actual: usize },

    #[error("cannot {action} while the evolution is {phase:?}")]
    Phase { action: &'static str, phase: Phase },

    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EvolveError>;
