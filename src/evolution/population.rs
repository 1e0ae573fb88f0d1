//! Population initialization and the problem-model boundary.
//!
//! Every candidate enters the engine through [`draw_candidate`], which is the
//! single place its gene count is checked. Operators downstream rely on all
//! candidates sharing that length.

use rand::Rng;

use super::types::{Candidate, ProblemModel};
use crate::error::{EvolveError, Result};

/// Draws one random candidate from the model and checks its gene count.
pub fn draw_candidate<P: ProblemModel, R: Rng>(
    model: &P,
    rng: &mut R,
) -> Result<Candidate<P::Gene>> {
    let candidate = model
        .random_candidate(rng)
        .map_err(EvolveError::ProblemModel)?;
    let expected = model.gene_count();
    if candidate.len() != expected {
        return Err(EvolveError::GeneCount {
            expected,
            actual: candidate.len(),
        });
    }
    Ok(candidate)
}

/// Creates `size` independently drawn candidates.
///
/// Duplicates are allowed. Fails with [`EvolveError::Config`] when `size`
/// is zero.
pub fn initialize<P: ProblemModel, R: Rng>(
    model: &P,
    size: usize,
    rng: &mut R,
) -> Result<Vec<Candidate<P::Gene>>> {
    if size == 0 {
        return Err(EvolveError::Config(
            "initial population must hold at least one candidate".into(),
        ));
    }
    (0..size).map(|_| draw_candidate(model, rng)).collect()
}
