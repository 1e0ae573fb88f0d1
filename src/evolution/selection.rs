//! Truncation selection.
//!
//! A scored population is ranked by ascending cost and cut back to the
//! configured size. The sort is stable: candidates with equal cost keep
//! their population order, so the ranking is fully determined by the cost
//! vector. In particular the candidate reported as "best" among several
//! with the same cost is the one with the lowest index.

use super::types::{Candidate, Cost, Evaluator};
use crate::error::{EvolveError, Result};

/// Population indices ordered from best to worst cost.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking<C> {
    order: Vec<usize>,
    costs: Vec<C>,
}

impl<C: Cost> Ranking<C> {
    /// Ranks a cost vector, where `costs[i]` belongs to candidate `i`.
    ///
    /// # Complexity
    /// O(n log n)
    pub fn from_costs(costs: Vec<C>) -> Self {
        let mut order: Vec<usize> = (0..costs.len()).collect();
        // `sort_by` is stable, which gives the index tie-break.
        order.sort_by(|&a, &b| costs[a].rank_cmp(&costs[b]));
        Self { order, costs }
    }

    /// Number of ranked candidates.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the ranking holds no candidates.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Indices from best to worst.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Costs indexed by original population position.
    pub fn costs(&self) -> &[C] {
        &self.costs
    }

    /// Costs from best to worst.
    pub fn sorted_costs(&self) -> impl Iterator<Item = C> + '_ {
        self.order.iter().map(|&i| self.costs[i])
    }

    /// Index and cost of the best-ranked candidate.
    pub fn best(&self) -> Option<(usize, C)> {
        self.order.first().map(|&i| (i, self.costs[i]))
    }

    /// Keeps the `size` best-ranked candidates, best first.
    ///
    /// If the population is smaller than `size`, every candidate is kept.
    ///
    /// # Errors
    /// [`EvolveError::CostCount`] if `population` is not the population this
    /// ranking was built from, i.e. its length differs from the number of
    /// ranked costs.
    pub fn truncate<G: Clone>(
        &self,
        population: &[Candidate<G>],
        size: usize,
    ) -> Result<Vec<Candidate<G>>> {
        if population.len() != self.len() {
            return Err(EvolveError::CostCount {
                expected: population.len(),
                actual: self.len(),
            });
        }
        Ok(self
            .order
            .iter()
            .take(size)
            .map(|&i| population[i].clone())
            .collect())
    }
}

/// Evaluates `population` and ranks it.
///
/// # Errors
/// [`EvolveError::Evaluator`] if the evaluator fails, and
/// [`EvolveError::CostCount`] if it does not return exactly one cost per
/// candidate.
pub fn score<G, E: Evaluator<G>>(
    evaluator: &E,
    population: &[Candidate<G>],
) -> Result<Ranking<E::Cost>> {
    let costs = evaluator
        .evaluate(population)
        .map_err(EvolveError::Evaluator)?;
    if costs.len() != population.len() {
        return Err(EvolveError::CostCount {
            expected: population.len(),
            actual: costs.len(),
        });
    }
    Ok(Ranking::from_costs(costs))
}
