//! Seeded random number generation.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Creates the generator that drives every random decision of a run.
///
/// Two generators created from the same seed yield identical sequences,
/// which is what makes a run reproducible.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}
