//! Evolution configuration.
//!
//! [`EvolutionConfig`] holds every parameter of a run. It is fixed once the
//! run starts.

use super::stop::StopCriterion;
use crate::error::{EvolveError, Result};

/// Configuration for an evolution run.
///
/// # Defaults
///
/// ```
/// use u_evolve::evolution::{EvolutionConfig, StopCriterion};
///
/// let config = EvolutionConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.stop, StopCriterion::Generations(500));
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_evolve::evolution::{EvolutionConfig, StopCriterion};
///
/// let config = EvolutionConfig::default()
///     .with_population_size(50)
///     .with_crossover_rate(0.7)
///     .with_mutation_rate(0.05)
///     .with_seed(42)
///     .with_stop(StopCriterion::Stagnation(20));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvolutionConfig {
    /// Number of candidates kept after every selection.
    ///
    /// The population grows above this during a round (crossover offspring)
    /// and is truncated back to it by selection.
    pub population_size: usize,

    /// Probability that a candidate and its randomly drawn partner produce
    /// an offspring (0.0–1.0).
    pub crossover_rate: f64,

    /// Probability that a candidate is replaced by a fresh random candidate
    /// (0.0–1.0).
    pub mutation_rate: f64,

    /// Seed of the run's random number generator.
    ///
    /// The same seed and configuration reproduce the same run, unless the
    /// stop criterion is [`StopCriterion::ElapsedTime`].
    pub seed: u64,

    /// Condition that ends the run.
    pub stop: StopCriterion,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            crossover_rate: 0.9,
            mutation_rate: 0.1,
            seed: 42,
            stop: StopCriterion::default(),
        }
    }
}

impl EvolutionConfig {
    /// Creates a configuration from the full run surface.
    pub fn new(
        population_size: usize,
        crossover_rate: f64,
        mutation_rate: f64,
        seed: u64,
        stop: StopCriterion,
    ) -> Self {
        Self {
            population_size,
            crossover_rate,
            mutation_rate,
            seed,
            stop,
        }
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the crossover rate.
    ///
    /// Not clamped; [`validate`](Self::validate) rejects values outside
    /// `[0, 1]`.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate;
        self
    }

    /// Sets the mutation rate.
    ///
    /// Not clamped; [`validate`](Self::validate) rejects values outside
    /// `[0, 1]`.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the stop criterion.
    pub fn with_stop(mut self, stop: StopCriterion) -> Self {
        self.stop = stop;
        self
    }

    /// Validates the configuration.
    ///
    /// Returns [`EvolveError::Config`] describing the first invalid
    /// parameter.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(EvolveError::Config(
                "population_size must be at least 1".into(),
            ));
        }
        check_probability("crossover_rate", self.crossover_rate)?;
        check_probability("mutation_rate", self.mutation_rate)?;
        if let StopCriterion::Mutations(limit) = self.stop {
            if limit > 0 && self.mutation_rate == 0.0 {
                return Err(EvolveError::Config(
                    "mutation-count criterion can never be reached with mutation_rate 0".into(),
                ));
            }
        }
        Ok(())
    }
}

fn check_probability(name: &str, p: f64) -> Result<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(EvolveError::Config(format!(
            "{name} must be within [0, 1], got {p}"
        )))
    }
}
