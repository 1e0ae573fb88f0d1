//! Core trait definitions for the evolution engine.
//!
//! The engine is generic over two collaborators: a [`ProblemModel`] that
//! knows what a candidate looks like and how to draw a random one, and an
//! [`Evaluator`] that scores a whole population at once.

use std::cmp::Ordering;
use std::fmt;

use rand::Rng;

use crate::error::BoxError;

/// Marker trait for cost values.
///
/// Lower cost is considered better (minimization). Costs must be totally
/// ordered for ranking; [`rank_cmp`](Cost::rank_cmp) provides that order
/// even for floating point types.
///
/// Built-in implementations exist for `f64`, `f32` and the common integer
/// types.
pub trait Cost: PartialOrd + Copy + Send + Sync + fmt::Debug + fmt::Display + 'static {
    /// Returns a value representing the worst possible cost.
    ///
    /// Used as the "best so far" before the first round has been scored.
    fn worst() -> Self;

    /// Converts the cost to `f64` for logging and statistics.
    fn to_f64(self) -> f64;

    /// Total order used when ranking a population.
    ///
    /// Floating point implementations use IEEE 754 total ordering, so a
    /// `NaN` cost ranks after every finite cost.
    fn rank_cmp(&self, other: &Self) -> Ordering;
}

impl Cost for f64 {
    fn worst() -> Self {
        f64::INFINITY
    }

    fn to_f64(self) -> f64 {
        self
    }

    fn rank_cmp(&self, other: &Self) -> Ordering {
        f64::total_cmp(self, other)
    }
}

impl Cost for f32 {
    fn worst() -> Self {
        f32::INFINITY
    }

    fn to_f64(self) -> f64 {
        self as f64
    }

    fn rank_cmp(&self, other: &Self) -> Ordering {
        f32::total_cmp(self, other)
    }
}

macro_rules! impl_integer_cost {
    ($($t:ty),*) => {
        $(
            impl Cost for $t {
                fn worst() -> Self {
                    <$t>::MAX
                }

                fn to_f64(self) -> f64 {
                    self as f64
                }

                fn rank_cmp(&self, other: &Self) -> Ordering {
                    Ord::cmp(self, other)
                }
            }
        )*
    };
}

impl_integer_cost!(i32, i64, u32, u64, usize);

/// One candidate solution: an ordered sequence of genes.
///
/// The meaning of each gene is owned by the [`ProblemModel`]. Within a
/// population every candidate has the same number of genes; the engine
/// checks this once, when the model hands a candidate over.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Candidate<G> {
    genes: Vec<G>,
}

impl<G> Candidate<G> {
    /// Wraps a gene vector.
    pub fn new(genes: Vec<G>) -> Self {
        Self { genes }
    }

    /// The genes in positional order.
    pub fn genes(&self) -> &[G] {
        &self.genes
    }

    /// Number of genes.
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Whether the candidate has no genes.
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Consumes the candidate and returns its genes.
    pub fn into_genes(self) -> Vec<G> {
        self.genes
    }
}

impl<G> From<Vec<G>> for Candidate<G> {
    fn from(genes: Vec<G>) -> Self {
        Self::new(genes)
    }
}

impl<G> FromIterator<G> for Candidate<G> {
    fn from_iter<I: IntoIterator<Item = G>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Defines what a candidate is and how to draw a random one.
///
/// # Implementing
///
/// ```
/// use rand::Rng;
/// use u_evolve::error::BoxError;
/// use u_evolve::evolution::{Candidate, ProblemModel};
///
/// struct Bits(usize);
///
/// impl ProblemModel for Bits {
///     type Gene = bool;
///
///     fn gene_count(&self) -> usize {
///         self.0
///     }
///
///     fn random_candidate<R: Rng>(&self, rng: &mut R) -> Result<Candidate<bool>, BoxError> {
///         Ok((0..self.0).map(|_| rng.random_bool(0.5)).collect())
///     }
/// }
/// ```
pub trait ProblemModel {
    /// The gene type of a candidate.
    type Gene: Clone + fmt::Debug;

    /// Number of genes every candidate of this problem carries.
    fn gene_count(&self) -> usize;

    /// Creates a random, valid candidate.
    ///
    /// Called for the initial population and again for every mutation, so
    /// it must be callable repeatedly and independently. All randomness must
    /// come from `rng` for runs to be reproducible.
    fn random_candidate<R: Rng>(&self, rng: &mut R) -> Result<Candidate<Self::Gene>, BoxError>;
}

/// Scores a population.
///
/// This is typically the most expensive operation of a round. It is called
/// once per round with the grown population (offspring included) and once
/// more at the end of the run.
pub trait Evaluator<G> {
    /// The cost type. Lower is better.
    type Cost: Cost;

    /// Returns exactly one cost per candidate, aligned by index.
    fn evaluate(&self, population: &[Candidate<G>]) -> Result<Vec<Self::Cost>, BoxError>;
}
