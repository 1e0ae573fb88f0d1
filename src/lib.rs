//! Domain-agnostic evolutionary optimization engine.
//!
//! Evolves a fixed-size population of candidate solutions toward lower
//! cost with uniform crossover, replacement mutation and truncation
//! selection:
//!
//! - **Evolution**: the control loop, its configuration, stop criteria and
//!   result record. See [`evolution`].
//! - **Reports**: human-readable run reports written to any writer or to
//!   timestamped files. See [`report`].
//!
//! # Architecture
//!
//! The engine knows nothing about the problem being solved. A
//! [`ProblemModel`](evolution::ProblemModel) defines candidates and draws
//! random ones; an [`Evaluator`](evolution::Evaluator) scores a population.
//! Everything else (operators, selection, stopping, bookkeeping) is generic.
//!
//! The engine is single-threaded and reproducible: one seeded generator
//! drives every random decision of a run.

pub mod error;
pub mod evolution;
pub mod random;
pub mod report;
