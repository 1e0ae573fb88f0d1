//! Evolutionary optimization engine.
//!
//! A generic, domain-agnostic engine that evolves a fixed-size population
//! toward lower cost. Each round appends uniform-crossover offspring,
//! replaces random candidates with fresh ones (mutation), then scores the
//! grown population and keeps the best `population_size` candidates
//! (truncation selection). Rounds repeat until the configured
//! [`StopCriterion`] ends the run.
//!
//! # Core Traits
//!
//! - [`ProblemModel`]: what a candidate is and how to draw a random one
//! - [`Evaluator`]: scores a whole population
//! - [`Cost`]: totally ordered cost values, lower is better
//!
//! # Key Types
//!
//! - [`EvolutionConfig`]: run parameters
//! - [`Evolution`]: one run, driven step by step or to completion
//! - [`EvolutionRunner`]: one-call entry point
//! - [`EvolutionResult`]: best candidate, counters and trajectory
//!
//! # Submodules
//!
//! - [`operators`]: uniform crossover and replacement mutation
//! - [`population`]: initialization and the gene-count check
//! - [`selection`]: stable ranking and truncation
//!
//! # Determinism
//!
//! All randomness, including what the problem model draws, comes from one
//! generator seeded with [`EvolutionConfig::seed`]. Two runs with the same
//! configuration and deterministic collaborators produce the same
//! trajectory, unless the stop criterion is [`StopCriterion::ElapsedTime`].

mod config;
pub mod operators;
pub mod population;
mod runner;
pub mod selection;
mod stop;
mod types;

pub use config::EvolutionConfig;
pub use runner::{Evolution, EvolutionResult, EvolutionRunner, Phase, RoundRecord, RunState};
pub use selection::Ranking;
pub use stop::{Progress, StopCriterion, ELAPSED_TIME_GRACE};
pub use types::{Candidate, Cost, Evaluator, ProblemModel};
