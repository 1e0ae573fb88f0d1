//! Shared toy problems for the integration tests.

#![allow(dead_code)]

use rand::Rng;
use u_evolve::error::BoxError;
use u_evolve::evolution::{Candidate, Evaluator, ProblemModel};

/// Routing toy: each demand picks one of `paths` paths, each path loads
/// one link. Cost is the sum of squared link loads, so spreading demands
/// evenly is optimal.
pub struct Routing {
    pub demands: usize,
    pub paths: u8,
}

impl ProblemModel for Routing {
    type Gene = u8;

    fn gene_count(&self) -> usize {
        self.demands
    }

    fn random_candidate<R: Rng>(&self, rng: &mut R) -> Result<Candidate<u8>, BoxError> {
        Ok((0..self.demands)
            .map(|_| rng.random_range(0..self.paths))
            .collect())
    }
}

impl Evaluator<u8> for Routing {
    type Cost = u64;

    fn evaluate(&self, population: &[Candidate<u8>]) -> Result<Vec<u64>, BoxError> {
        Ok(population
            .iter()
            .map(|c| {
                let mut loads = vec![0u64; self.paths as usize];
                for &p in c.genes() {
                    loads[p as usize] += 1;
                }
                loads.iter().map(|l| l * l).sum()
            })
            .collect())
    }
}

/// Lower bound of [`Routing`] cost: demands spread as evenly as possible.
pub fn routing_optimum(demands: usize, paths: u8) -> u64 {
    let paths = paths as u64;
    let demands = demands as u64;
    let base = demands / paths;
    let extra = demands % paths;
    extra * (base + 1) * (base + 1) + (paths - extra) * base * base
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
