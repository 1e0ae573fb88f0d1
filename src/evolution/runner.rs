//! Evolution loop execution.
//!
//! [`Evolution`] owns one run: its configuration, random generator, run
//! state and trajectory. A round is crossover → mutation → selection; rounds
//! repeat until the stop criterion says otherwise, then a final selection
//! produces the [`EvolutionResult`].
//!
//! [`EvolutionRunner`] is the one-call entry point for the common case.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use rand::rngs::StdRng;

use super::config::EvolutionConfig;
use super::operators;
use super::population;
use super::selection;
use super::stop::Progress;
use super::types::{Candidate, Cost, Evaluator, ProblemModel};
use crate::error::{EvolveError, Result};
use crate::random::create_rng;

/// Lifecycle of an [`Evolution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Created, no population yet.
    Uninitialized,
    /// Initial population drawn, no round run yet.
    Populated,
    /// At least one round has started.
    Running,
    /// Final selection done, or the run failed.
    Finished,
}

/// Best result of one round, as kept in the trajectory log.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundRecord<G, C> {
    /// Zero-based round index.
    pub round: usize,
    /// Lowest cost of the round.
    pub best_cost: C,
    /// Candidate holding that cost.
    pub best: Candidate<G>,
}

/// Mutable state of a run, owned by its [`Evolution`].
#[derive(Debug, Clone)]
pub struct RunState<G, C> {
    population: Vec<Candidate<G>>,
    rounds: usize,
    mutations: usize,
    best_cost: C,
    stagnation: usize,
}

impl<G, C: Cost> RunState<G, C> {
    fn new(population: Vec<Candidate<G>>) -> Self {
        Self {
            population,
            rounds: 0,
            mutations: 0,
            best_cost: C::worst(),
            stagnation: 0,
        }
    }

    /// The current population.
    pub fn population(&self) -> &[Candidate<G>] {
        &self.population
    }

    /// Rounds executed.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Cumulative mutation events.
    pub fn mutations(&self) -> usize {
        self.mutations
    }

    /// Best round cost seen so far, [`Cost::worst`] before the first round.
    pub fn best_cost(&self) -> C {
        self.best_cost
    }

    /// Consecutive rounds whose best cost was not strictly lower than
    /// [`best_cost`](Self::best_cost).
    pub fn stagnation(&self) -> usize {
        self.stagnation
    }

    /// Counters for the stop criterion.
    pub fn progress(&self, elapsed: Duration) -> Progress {
        Progress {
            rounds: self.rounds,
            mutations: self.mutations,
            stagnation: self.stagnation,
            elapsed,
        }
    }

    /// Updates improvement tracking with a round's best cost.
    ///
    /// Returns `true` when the cost is a strict improvement.
    fn record_best(&mut self, cost: C) -> bool {
        if cost < self.best_cost {
            self.best_cost = cost;
            self.stagnation = 0;
            true
        } else {
            self.stagnation += 1;
            false
        }
    }
}

/// Result of a completed evolution run.
#[derive(Debug, Clone)]
pub struct EvolutionResult<G, C> {
    /// Configuration the run was executed with.
    pub config: EvolutionConfig,

    /// Best-ranked candidate of the final selection.
    pub best: Candidate<G>,

    /// Cost of [`best`](Self::best) in the final selection.
    pub best_cost: C,

    /// Population at the end of the run, in the order left by the last
    /// round. Its length equals the configured population size.
    pub population: Vec<Candidate<G>>,

    /// Rounds executed.
    pub rounds: usize,

    /// Cumulative mutation events.
    pub mutations: usize,

    /// Consecutive non-improving rounds at the end of the run.
    pub stagnation: usize,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Wall-clock time spent in the loop.
    pub elapsed: Duration,

    /// One record per round, in order.
    pub trajectory: Vec<RoundRecord<G, C>>,
}

impl<G, C: Cost> EvolutionResult<G, C> {
    /// Best cost of every round as `f64`.
    pub fn cost_history(&self) -> Vec<f64> {
        self.trajectory.iter().map(|r| r.best_cost.to_f64()).collect()
    }
}

/// A single evolution run.
///
/// # Usage
///
/// ```
/// use rand::Rng;
/// use u_evolve::error::BoxError;
/// use u_evolve::evolution::{
///     Candidate, Evaluator, Evolution, EvolutionConfig, ProblemModel, StopCriterion,
/// };
///
/// struct Bits;
///
/// impl ProblemModel for Bits {
///     type Gene = bool;
///     fn gene_count(&self) -> usize { 8 }
///     fn random_candidate<R: Rng>(&self, rng: &mut R) -> Result<Candidate<bool>, BoxError> {
///         Ok((0..8).map(|_| rng.random_bool(0.5)).collect())
///     }
/// }
///
/// struct Zeros;
///
/// impl Evaluator<bool> for Zeros {
///     type Cost = usize;
///     fn evaluate(&self, population: &[Candidate<bool>]) -> Result<Vec<usize>, BoxError> {
///         Ok(population.iter().map(|c| c.genes().iter().filter(|&&b| !b).count()).collect())
///     }
/// }
///
/// let config = EvolutionConfig::default()
///     .with_population_size(20)
///     .with_stop(StopCriterion::Generations(10));
/// let result = Evolution::new(&Bits, &Zeros, config)?.run()?;
/// assert_eq!(result.trajectory.len(), 10);
/// assert_eq!(result.population.len(), 20);
/// # Ok::<(), u_evolve::error::EvolveError>(())
/// ```
pub struct Evolution<'a, P, E>
where
    P: ProblemModel,
    E: Evaluator<P::Gene>,
{
    config: EvolutionConfig,
    model: &'a P,
    evaluator: &'a E,
    rng: StdRng,
    phase: Phase,
    state: RunState<P::Gene, E::Cost>,
    trajectory: Vec<RoundRecord<P::Gene, E::Cost>>,
    started: Option<Instant>,
}

impl<'a, P, E> Evolution<'a, P, E>
where
    P: ProblemModel,
    E: Evaluator<P::Gene>,
{
    /// Creates a run after validating `config`.
    ///
    /// The random generator is seeded here, so everything the run does is
    /// determined by `config` and the collaborators.
    pub fn new(model: &'a P, evaluator: &'a E, config: EvolutionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            rng: create_rng(config.seed),
            config,
            model,
            evaluator,
            phase: Phase::Uninitialized,
            state: RunState::new(Vec::new()),
            trajectory: Vec::new(),
            started: None,
        })
    }

    /// The validated configuration of this run.
    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Counters and population of the run so far.
    pub fn state(&self) -> &RunState<P::Gene, E::Cost> {
        &self.state
    }

    /// Records of the rounds run so far.
    pub fn trajectory(&self) -> &[RoundRecord<P::Gene, E::Cost>] {
        &self.trajectory
    }

    /// Draws the initial population.
    pub fn populate(&mut self) -> Result<()> {
        self.expect_phase("populate", &[Phase::Uninitialized])?;
        let population = self.guard(|this| {
            population::initialize(this.model, this.config.population_size, &mut this.rng)
        })?;
        self.state = RunState::new(population);
        self.phase = Phase::Populated;
        Ok(())
    }

    /// Whether the stop criterion allows another round.
    ///
    /// Elapsed time is measured from the first round (or from the start of
    /// [`run`](Self::run)).
    pub fn should_continue(&self) -> bool {
        let elapsed = self.started.map(|t| t.elapsed()).unwrap_or_default();
        self.config
            .stop
            .should_continue(&self.state.progress(elapsed))
    }

    /// Runs one round and returns its trajectory record.
    ///
    /// The stop criterion is not consulted; callers driving the loop
    /// themselves check [`should_continue`](Self::should_continue) first.
    ///
    /// # Errors
    /// Collaborator failures abort the run: the controller moves to
    /// [`Phase::Finished`] and no result can be produced from it.
    pub fn run_round(&mut self) -> Result<&RoundRecord<P::Gene, E::Cost>> {
        self.expect_phase("run a round", &[Phase::Populated, Phase::Running])?;
        self.phase = Phase::Running;
        self.started.get_or_insert_with(Instant::now);
        self.guard(Self::round)?;
        Ok(&self.trajectory[self.trajectory.len() - 1])
    }

    /// Performs the final selection and produces the result.
    ///
    /// The population is scored and ranked once more but not truncated or
    /// replaced; the best-ranked candidate becomes the result's best.
    pub fn finish(&mut self) -> Result<EvolutionResult<P::Gene, E::Cost>> {
        self.finish_with(false)
    }

    /// Runs to completion: populates if needed, loops until the stop
    /// criterion is met, then finishes.
    pub fn run(self) -> Result<EvolutionResult<P::Gene, E::Cost>> {
        self.run_with_cancel(None)
    }

    /// Runs to completion with an optional cancellation token.
    ///
    /// The flag is checked between rounds only, next to the stop criterion.
    /// A cancelled run still performs the final selection and returns its
    /// result with `cancelled` set.
    pub fn run_with_cancel(
        mut self,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<EvolutionResult<P::Gene, E::Cost>> {
        if self.phase == Phase::Uninitialized {
            self.populate()?;
        }
        info!(
            "evolution started: population={}, crossover={}, mutation={}, seed={}, stop={}",
            self.config.population_size,
            self.config.crossover_rate,
            self.config.mutation_rate,
            self.config.seed,
            self.config.stop
        );
        self.started.get_or_insert_with(Instant::now);

        let mut cancelled = false;
        loop {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    warn!("evolution cancelled after {} rounds", self.state.rounds);
                    cancelled = true;
                    break;
                }
            }
            if !self.should_continue() {
                break;
            }
            self.run_round()?;
        }

        let result = self.finish_with(cancelled)?;
        info!(
            "evolution finished after {} rounds ({} mutations): best cost {}",
            result.rounds, result.mutations, result.best_cost
        );
        Ok(result)
    }

    fn round(&mut self) -> Result<()> {
        let offspring = operators::crossover(
            &mut self.state.population,
            self.config.crossover_rate,
            &mut self.rng,
        )?;
        let mutations = operators::mutate(
            &mut self.state.population,
            self.config.mutation_rate,
            self.model,
            &mut self.rng,
        )?;
        self.state.mutations += mutations;

        let ranking = selection::score(self.evaluator, &self.state.population)?;
        let best_cost = ranking
            .best()
            .map(|(_, cost)| cost)
            .unwrap_or_else(<E::Cost as Cost>::worst);
        self.state.population =
            ranking.truncate(&self.state.population, self.config.population_size)?;

        let round = self.state.rounds;
        self.state.rounds += 1;
        let improved = self.state.record_best(best_cost);
        debug!(
            "round {round}: best cost {best_cost}, offspring {offspring}, mutations {mutations}, \
             improved {improved}, stagnation {}",
            self.state.stagnation
        );

        self.trajectory.push(RoundRecord {
            round,
            best_cost,
            best: self.state.population[0].clone(),
        });
        Ok(())
    }

    fn finish_with(&mut self, cancelled: bool) -> Result<EvolutionResult<P::Gene, E::Cost>> {
        self.expect_phase("finish", &[Phase::Populated, Phase::Running])?;
        let ranking = self.guard(|this| selection::score(this.evaluator, &this.state.population))?;
        let (best_index, best_cost) = ranking.best().unwrap_or((0, <E::Cost as Cost>::worst()));
        let best = self.state.population[best_index].clone();
        self.phase = Phase::Finished;

        Ok(EvolutionResult {
            config: self.config.clone(),
            best,
            best_cost,
            population: std::mem::take(&mut self.state.population),
            rounds: self.state.rounds,
            mutations: self.state.mutations,
            stagnation: self.state.stagnation,
            cancelled,
            elapsed: self.started.map(|t| t.elapsed()).unwrap_or_default(),
            trajectory: std::mem::take(&mut self.trajectory),
        })
    }

    fn expect_phase(&self, action: &'static str, allowed: &[Phase]) -> Result<()> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(EvolveError::Phase {
                action,
                phase: self.phase,
            })
        }
    }

    /// Runs `step`, moving to [`Phase::Finished`] if it fails.
    fn guard<T>(&mut self, step: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let outcome = step(self);
        if outcome.is_err() {
            self.phase = Phase::Finished;
        }
        outcome
    }
}

/// Executes an evolution run in one call.
///
/// # Usage
///
/// ```ignore
/// let config = EvolutionConfig::default().with_seed(42);
/// let result = EvolutionRunner::run(&model, &evaluator, &config)?;
/// println!("Best cost: {}", result.best_cost);
/// ```
pub struct EvolutionRunner;

impl EvolutionRunner {
    /// Runs the evolution to completion.
    pub fn run<P, E>(
        model: &P,
        evaluator: &E,
        config: &EvolutionConfig,
    ) -> Result<EvolutionResult<P::Gene, E::Cost>>
    where
        P: ProblemModel,
        E: Evaluator<P::Gene>,
    {
        Self::run_with_cancel(model, evaluator, config, None)
    }

    /// Runs the evolution with an optional cancellation token.
    pub fn run_with_cancel<P, E>(
        model: &P,
        evaluator: &E,
        config: &EvolutionConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<EvolutionResult<P::Gene, E::Cost>>
    where
        P: ProblemModel,
        E: Evaluator<P::Gene>,
    {
        Evolution::new(model, evaluator, config.clone())?.run_with_cancel(cancel)
    }
}

// ============================================================================
// Tests
// ============================================================================
