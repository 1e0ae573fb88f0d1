//! Genetic operators: uniform crossover and replacement mutation.
//!
//! # Crossover
//!
//! - [`uniform_crossover`]: per-gene coin flip between two parents
//! - [`crossover`]: one pass over the round-start population, appending
//!   offspring
//!
//! # Mutation
//!
//! - [`mutate`]: replaces candidates wholesale with fresh random ones drawn
//!   from the problem model. This injects diversity; it is not a local
//!   search step.
//!
//! # References
//!
//! - Syswerda (1989), "Uniform Crossover in Genetic Algorithms"

use rand::Rng;

use super::population::draw_candidate;
use super::types::{Candidate, ProblemModel};
use crate::error::{EvolveError, Result};

// ============================================================================
// Crossover
// ============================================================================

/// Uniform crossover.
///
/// Each gene of the child is copied from `a` or `b` at the same position,
/// with equal probability and independently of every other gene.
///
/// # Errors
/// [`EvolveError::GeneCount`] if the parents differ in length.
///
/// # Complexity
/// O(n) time, O(n) space
pub fn uniform_crossover<G: Clone, R: Rng>(
    a: &Candidate<G>,
    b: &Candidate<G>,
    rng: &mut R,
) -> Result<Candidate<G>> {
    if a.len() != b.len() {
        return Err(EvolveError::GeneCount {
            expected: a.len(),
            actual: b.len(),
        });
    }
    Ok(a.genes()
        .iter()
        .zip(b.genes())
        .map(|(x, y)| if rng.random_bool(0.5) { x.clone() } else { y.clone() })
        .collect())
}

/// Runs one crossover pass and returns the number of offspring appended.
///
/// Only the `n` candidates present when the pass starts take part: for each
/// index `i < n` a partner `j` is drawn uniformly from `0..n`. Pairs with
/// `j == i` are skipped, otherwise an offspring is produced with probability
/// `rate` and pushed onto the end of `population`. Offspring never breed in
/// the pass that created them, so at most `n` are appended.
///
/// # Errors
/// [`EvolveError::GeneCount`] if two paired candidates differ in length.
/// Offspring appended before the failure stay in `population`.
pub fn crossover<G: Clone, R: Rng>(
    population: &mut Vec<Candidate<G>>,
    rate: f64,
    rng: &mut R,
) -> Result<usize> {
    let n = population.len();
    let mut offspring = 0usize;
    for i in 0..n {
        let j = rng.random_range(0..n);
        if j == i {
            continue;
        }
        if rng.random::<f64>() >= rate {
            continue;
        }
        let child = uniform_crossover(&population[i], &population[j], rng)?;
        population.push(child);
        offspring += 1;
    }
    Ok(offspring)
}

// ============================================================================
// Mutation
// ============================================================================

/// Runs one mutation pass and returns the number of candidates replaced.
///
/// Every candidate, offspring included, is replaced by a fresh draw from
/// `model` with probability `rate`.
///
/// # Errors
/// Propagates the first failure of the problem model; candidates visited
/// before it stay replaced.
pub fn mutate<P: ProblemModel, R: Rng>(
    population: &mut [Candidate<P::Gene>],
    rate: f64,
    model: &P,
    rng: &mut R,
) -> Result<usize> {
    let mut mutations = 0usize;
    for slot in population.iter_mut() {
        if rng.random::<f64>() < rate {
            *slot = draw_candidate(model, rng)?;
            mutations += 1;
        }
    }
    Ok(mutations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use crate::random::create_rng;

    struct Constant {
        value: i32,
        len: usize,
    }

    impl ProblemModel for Constant {
        type Gene = i32;

        fn gene_count(&self) -> usize {
            self.len
        }

        fn random_candidate<R: Rng>(&self, _rng: &mut R) -> std::result::Result<Candidate<i32>, BoxError> {
            Ok(vec![self.value; self.len].into())
        }
    }

    fn labelled(n: usize, len: usize) -> Vec<Candidate<i32>> {
        (0..n)
            .map(|i| vec![i as i32; len].into())
            .collect()
    }

    // ---- uniform_crossover ----

    #[test]
    fn test_uniform_crossover_genes_from_parents() {
        let a: Candidate<i32> = (0..50).collect();
        let b: Candidate<i32> = (100..150).collect();
        let mut rng = create_rng(42);

        for _ in 0..20 {
            let child = uniform_crossover(&a, &b, &mut rng).unwrap();
            assert_eq!(child.len(), 50);
            for (pos, gene) in child.genes().iter().enumerate() {
                assert!(
                    *gene == a.genes()[pos] || *gene == b.genes()[pos],
                    "gene {gene} at {pos} comes from neither parent"
                );
            }
        }
    }

    #[test]
    fn test_uniform_crossover_mixes() {
        let a: Candidate<bool> = vec![true; 200].into();
        let b: Candidate<bool> = vec![false; 200].into();
        let mut rng = create_rng(42);
        let child = uniform_crossover(&a, &b, &mut rng).unwrap();
        let from_a = child.genes().iter().filter(|&&g| g).count();
        assert!(
            (60..140).contains(&from_a),
            "expected roughly half from each parent, got {from_a}/200 from a"
        );
    }

    #[test]
    fn test_uniform_crossover_rejects_unequal_parents() {
        let a: Candidate<i32> = vec![1, 2, 3].into();
        let b: Candidate<i32> = vec![4, 5].into();
        let err = uniform_crossover(&a, &b, &mut create_rng(42)).unwrap_err();
        assert!(matches!(
            err,
            EvolveError::GeneCount {
                expected: 3,
                actual: 2
            }
        ));
    }

    // ---- crossover pass ----

    #[test]
    fn test_crossover_rate_zero_no_offspring() {
        let mut pop = labelled(10, 3);
        let mut rng = create_rng(42);
        for _ in 0..50 {
            assert_eq!(crossover(&mut pop, 0.0, &mut rng).unwrap(), 0);
        }
        assert_eq!(pop.len(), 10);
    }

    #[test]
    fn test_crossover_rate_one_bounded() {
        for seed in 0..20 {
            let mut pop = labelled(10, 3);
            let mut rng = create_rng(seed);
            let added = crossover(&mut pop, 1.0, &mut rng).unwrap();
            assert!(added <= 10, "seed {seed}: {added} offspring from 10 parents");
            assert_eq!(pop.len(), 10 + added);
        }
    }

    #[test]
    fn test_crossover_deterministic_for_seed() {
        let mut a = labelled(8, 4);
        let mut b = labelled(8, 4);
        let added_a = crossover(&mut a, 1.0, &mut create_rng(3)).unwrap();
        let added_b = crossover(&mut b, 1.0, &mut create_rng(3)).unwrap();
        assert_eq!(added_a, added_b);
        assert_eq!(a, b);
    }

    #[test]
    fn test_crossover_offspring_never_breed_in_same_pass() {
        // Gene `pos` of candidate `i` is `i * 1000 + pos`, so every gene
        // names the candidate it came from.
        let (n, len) = (12usize, 64usize);
        for seed in 0..200 {
            let mut pop: Vec<Candidate<i32>> = (0..n)
                .map(|i| (0..len).map(|pos| (i * 1000 + pos) as i32).collect())
                .collect();
            let added = crossover(&mut pop, 1.0, &mut create_rng(seed)).unwrap();
            for child in &pop[n..n + added] {
                let mut parents: Vec<i32> = child.genes().iter().map(|g| g / 1000).collect();
                parents.sort_unstable();
                parents.dedup();
                assert!(
                    parents.len() <= 2 && parents.iter().all(|&p| (p as usize) < n),
                    "seed {seed}: child inherits from {parents:?}"
                );
            }
        }
    }

    #[test]
    fn test_crossover_mismatched_lengths_fail() {
        let mut pop: Vec<Candidate<i32>> = vec![vec![0; 3].into(), vec![1; 2].into()];
        let mut rng = create_rng(42);
        let failed = (0..50).any(|_| crossover(&mut pop, 1.0, &mut rng).is_err());
        assert!(failed);
    }

    #[test]
    fn test_crossover_single_candidate_never_breeds() {
        let mut pop = labelled(1, 3);
        let mut rng = create_rng(42);
        for _ in 0..20 {
            assert_eq!(crossover(&mut pop, 1.0, &mut rng).unwrap(), 0);
        }
    }

    // ---- mutation pass ----

    #[test]
    fn test_mutate_rate_zero() {
        let model = Constant { value: -1, len: 3 };
        let mut pop = labelled(10, 3);
        let before = pop.clone();
        let mut rng = create_rng(42);
        assert_eq!(mutate(&mut pop, 0.0, &model, &mut rng).unwrap(), 0);
        assert_eq!(pop, before);
    }

    #[test]
    fn test_mutate_rate_one_replaces_all() {
        let model = Constant { value: -1, len: 3 };
        let mut pop = labelled(10, 3);
        let mut rng = create_rng(42);
        assert_eq!(mutate(&mut pop, 1.0, &model, &mut rng).unwrap(), 10);
        assert!(pop.iter().all(|c| c.genes() == [-1, -1, -1]));
    }

    #[test]
    fn test_mutate_rejects_malformed_candidate() {
        // The model promises 3 genes but draws 2.
        struct Liar;

        impl ProblemModel for Liar {
            type Gene = i32;

            fn gene_count(&self) -> usize {
                3
            }

            fn random_candidate<R: Rng>(&self, _rng: &mut R) -> std::result::Result<Candidate<i32>, BoxError> {
                Ok(vec![0, 0].into())
            }
        }

        let mut pop = labelled(3, 3);
        let mut rng = create_rng(42);
        let err = mutate(&mut pop, 1.0, &Liar, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            EvolveError::GeneCount {
                expected: 3,
                actual: 2
            }
        ));
    }
}
