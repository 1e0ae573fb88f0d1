//! Stop criteria for the evolution loop.
//!
//! A run is configured with exactly one [`StopCriterion`]. The controller
//! asks it before every round whether to keep going; once it says no, the
//! controller performs the final selection and the run ends.

use std::fmt;
use std::time::Duration;

use crate::error::{EvolveError, Result};

/// Slack added to the elapsed-time budget before the loop stops.
pub const ELAPSED_TIME_GRACE: Duration = Duration::from_secs(1);

/// Condition that ends an evolution run.
///
/// Each variant keeps the loop running while its counter is strictly below
/// the threshold. A threshold that is already met before the first round
/// means no round is executed at all.
///
/// # Examples
///
/// ```
/// use u_evolve::evolution::StopCriterion;
///
/// let stop = StopCriterion::parse("generation-count", 50.0).unwrap();
/// assert_eq!(stop, StopCriterion::Generations(50));
///
/// // Legacy names are accepted as aliases.
/// let stop = StopCriterion::parse("no_improvement", 10.0).unwrap();
/// assert_eq!(stop, StopCriterion::Stagnation(10));
/// assert_eq!(stop.name(), "stagnation-count");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopCriterion {
    /// Run while wall-clock time since start is below the budget plus
    /// [`ELAPSED_TIME_GRACE`]. The only criterion that is not reproducible.
    ElapsedTime(Duration),

    /// Run while fewer rounds than this have been executed.
    Generations(usize),

    /// Run while fewer mutations than this have happened in total.
    Mutations(usize),

    /// Run while the number of consecutive rounds without a strictly better
    /// best cost is below this.
    Stagnation(usize),
}

impl Default for StopCriterion {
    fn default() -> Self {
        StopCriterion::Generations(500)
    }
}

/// Snapshot of the counters a criterion is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    /// Rounds executed so far.
    pub rounds: usize,
    /// Cumulative mutation events.
    pub mutations: usize,
    /// Consecutive rounds without improvement.
    pub stagnation: usize,
    /// Wall-clock time since the loop started.
    pub elapsed: Duration,
}

impl StopCriterion {
    /// Canonical criterion names, in declaration order.
    pub const NAMES: [&'static str; 4] = [
        "elapsed-time",
        "generation-count",
        "mutation-count",
        "stagnation-count",
    ];

    /// Builds a criterion from its name and numeric threshold.
    ///
    /// Accepts the canonical names in [`NAMES`](Self::NAMES) as well as the
    /// aliases `time`, `number_of_generations`, `number_of_mutations` and
    /// `no_improvement`.
    ///
    /// Time thresholds are seconds and may be fractional. Count thresholds
    /// must be whole, non-negative numbers.
    pub fn parse(name: &str, value: f64) -> Result<Self> {
        let canonical = match name {
            "elapsed-time" | "time" => Self::NAMES[0],
            "generation-count" | "number_of_generations" => Self::NAMES[1],
            "mutation-count" | "number_of_mutations" => Self::NAMES[2],
            "stagnation-count" | "no_improvement" => Self::NAMES[3],
            other => return Err(EvolveError::UnknownCriterion(other.to_string())),
        };
        if !value.is_finite() || value < 0.0 {
            return Err(EvolveError::Config(format!(
                "threshold for `{name}` must be a finite, non-negative number, got {value}"
            )));
        }
        match canonical {
            "elapsed-time" => Duration::try_from_secs_f64(value)
                .map(StopCriterion::ElapsedTime)
                .map_err(|e| EvolveError::Config(format!("threshold for `{name}`: {e}"))),
            "generation-count" => Ok(StopCriterion::Generations(whole_count(name, value)?)),
            "mutation-count" => Ok(StopCriterion::Mutations(whole_count(name, value)?)),
            _ => Ok(StopCriterion::Stagnation(whole_count(name, value)?)),
        }
    }

    /// Canonical name of this criterion.
    pub fn name(&self) -> &'static str {
        match self {
            StopCriterion::ElapsedTime(_) => Self::NAMES[0],
            StopCriterion::Generations(_) => Self::NAMES[1],
            StopCriterion::Mutations(_) => Self::NAMES[2],
            StopCriterion::Stagnation(_) => Self::NAMES[3],
        }
    }

    /// Threshold as a number, in the unit [`parse`](Self::parse) expects.
    pub fn value(&self) -> f64 {
        match *self {
            StopCriterion::ElapsedTime(d) => d.as_secs_f64(),
            StopCriterion::Generations(n)
            | StopCriterion::Mutations(n)
            | StopCriterion::Stagnation(n) => n as f64,
        }
    }

    /// Returns `true` while the loop should run another round.
    pub fn should_continue(&self, progress: &Progress) -> bool {
        match *self {
            StopCriterion::ElapsedTime(budget) => {
                progress.elapsed < budget.saturating_add(ELAPSED_TIME_GRACE)
            }
            StopCriterion::Generations(limit) => progress.rounds < limit,
            StopCriterion::Mutations(limit) => progress.mutations < limit,
            StopCriterion::Stagnation(limit) => progress.stagnation < limit,
        }
    }
}

impl fmt::Display for StopCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.name(), self.value())
    }
}

fn whole_count(name: &str, value: f64) -> Result<usize> {
    if value.fract() != 0.0 || value >= usize::MAX as f64 {
        return Err(EvolveError::Config(format!(
            "threshold for `{name}` must be a whole number, got {value}"
        )));
    }
    Ok(value as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(rounds: usize, mutations: usize, stagnation: usize, secs: u64) -> Progress {
        Progress {
            rounds,
            mutations,
            stagnation,
            elapsed: Duration::from_secs(secs),
        }
    }

    // ---- parse ----

    #[test]
    fn test_parse_canonical_names() {
        assert_eq!(
            StopCriterion::parse("elapsed-time", 2.5).unwrap(),
            StopCriterion::ElapsedTime(Duration::from_millis(2500))
        );
        assert_eq!(
            StopCriterion::parse("generation-count", 5.0).unwrap(),
            StopCriterion::Generations(5)
        );
        assert_eq!(
            StopCriterion::parse("mutation-count", 3.0).unwrap(),
            StopCriterion::Mutations(3)
        );
        assert_eq!(
            StopCriterion::parse("stagnation-count", 7.0).unwrap(),
            StopCriterion::Stagnation(7)
        );
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!(
            StopCriterion::parse("time", 1.0).unwrap(),
            StopCriterion::ElapsedTime(Duration::from_secs(1))
        );
        assert_eq!(
            StopCriterion::parse("number_of_generations", 4.0).unwrap(),
            StopCriterion::Generations(4)
        );
        assert_eq!(
            StopCriterion::parse("number_of_mutations", 0.0).unwrap(),
            StopCriterion::Mutations(0)
        );
        assert_eq!(
            StopCriterion::parse("no_improvement", 2.0).unwrap(),
            StopCriterion::Stagnation(2)
        );
    }

    #[test]
    fn test_parse_unknown_name() {
        let err = StopCriterion::parse("forever", -1.0).unwrap_err();
        assert!(matches!(err, EvolveError::UnknownCriterion(ref n) if n == "forever"));
    }

    #[test]
    fn test_parse_rejects_bad_values() {
        assert!(StopCriterion::parse("generation-count", -1.0).is_err());
        assert!(StopCriterion::parse("generation-count", 2.5).is_err());
        assert!(StopCriterion::parse("elapsed-time", f64::NAN).is_err());
        assert!(StopCriterion::parse("mutation-count", f64::INFINITY).is_err());
    }

    #[test]
    fn test_parse_rejects_count_beyond_usize() {
        // `usize::MAX as f64` rounds up to a power of two that does not fit.
        let too_large = usize::MAX as f64;
        assert!(matches!(
            StopCriterion::parse("stagnation-count", too_large),
            Err(EvolveError::Config(_))
        ));
        assert_eq!(
            StopCriterion::parse("stagnation-count", 1e9).unwrap(),
            StopCriterion::Stagnation(1_000_000_000)
        );
    }

    #[test]
    fn test_name_value_round_trip() {
        for name in StopCriterion::NAMES {
            let stop = StopCriterion::parse(name, 3.0).unwrap();
            assert_eq!(stop.name(), name);
            assert!((stop.value() - 3.0).abs() < 1e-12);
        }
    }

    // ---- should_continue ----

    #[test]
    fn test_generations_exclusive() {
        let stop = StopCriterion::Generations(3);
        assert!(stop.should_continue(&progress(2, 0, 0, 0)));
        assert!(!stop.should_continue(&progress(3, 0, 0, 0)));
    }

    #[test]
    fn test_mutations_zero_threshold_never_runs() {
        let stop = StopCriterion::Mutations(0);
        assert!(!stop.should_continue(&Progress::default()));
    }

    #[test]
    fn test_mutations_stop_at_threshold() {
        let stop = StopCriterion::Mutations(10);
        assert!(stop.should_continue(&progress(4, 9, 0, 0)));
        assert!(!stop.should_continue(&progress(4, 10, 0, 0)));
        assert!(!stop.should_continue(&progress(4, 12, 0, 0)));
    }

    #[test]
    fn test_stagnation_stops_when_equal() {
        let stop = StopCriterion::Stagnation(2);
        assert!(stop.should_continue(&progress(9, 0, 1, 0)));
        assert!(!stop.should_continue(&progress(9, 0, 2, 0)));
    }

    #[test]
    fn test_elapsed_time_has_grace() {
        let stop = StopCriterion::ElapsedTime(Duration::from_secs(2));
        assert!(stop.should_continue(&progress(0, 0, 0, 2)));
        assert!(!stop.should_continue(&progress(0, 0, 0, 3)));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            StopCriterion::Generations(5).to_string(),
            "generation-count = 5"
        );
    }
}
