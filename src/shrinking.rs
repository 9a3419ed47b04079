// Shrinking search: walk a failing value's lazily produced candidate
// sequences toward a locally minimal failing case, under a trial and
// wall-clock budget.
//
// The loop pulls candidates from the current best value's shrink
// sequence. A candidate that still fails becomes the new best and the
// search restarts from its own, freshly obtained sequence; candidates
// that no longer fail are discarded. Exhausting a sequence without an
// adoption means the current value is locally minimal.

use crate::generator::Generator;
use crate::values::Value;
use std::time::{Duration, Instant};

/// Trial and wall-clock budget for one shrink search.
#[derive(Debug, Clone)]
pub struct ShrinkBudget {
    pub max_trials: u64,
    pub deadline: Option<Duration>,
}

impl Default for ShrinkBudget {
    fn default() -> ShrinkBudget {
        ShrinkBudget {
            max_trials: 10_000,
            deadline: Some(Duration::from_secs(10)),
        }
    }
}

impl ShrinkBudget {
    pub fn trials(max_trials: u64) -> ShrinkBudget {
        ShrinkBudget {
            max_trials,
            deadline: None,
        }
    }
}

/// Terminal state of a shrink search. Budget exhaustion is a normal
/// outcome, not an error; `value` is always at least as simple as the
/// input under the generator's own ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct ShrinkOutcome {
    pub value: Value,
    pub trials: u64,
    pub improvements: u64,
    /// True when the search ran to completion: no simpler failing
    /// candidate exists in the final sequence.
    pub minimal: bool,
}

/// Search for a locally minimal value for which `still_fails` holds,
/// starting from the failing `origin`.
pub fn shrink<F>(
    generator: &dyn Generator,
    origin: Value,
    mut still_fails: F,
    budget: &ShrinkBudget,
) -> ShrinkOutcome
where
    F: FnMut(&Value) -> bool,
{
    let started = Instant::now();
    let mut current = origin;
    let mut candidates = generator.shrink(&current);
    let mut trials = 0;
    let mut improvements = 0;
    loop {
        if trials >= budget.max_trials {
            return ShrinkOutcome {
                value: current,
                trials,
                improvements,
                minimal: false,
            };
        }
        if let Some(deadline) = budget.deadline {
            if started.elapsed() >= deadline {
                return ShrinkOutcome {
                    value: current,
                    trials,
                    improvements,
                    minimal: false,
                };
            }
        }
        match candidates.next() {
            None => {
                return ShrinkOutcome {
                    value: current,
                    trials,
                    improvements,
                    minimal: true,
                }
            }
            Some(candidate) => {
                trials += 1;
                if still_fails(&candidate) {
                    log::trace!("adopted simpler failing value {}", candidate);
                    current = candidate;
                    candidates = generator.shrink(&current);
                    improvements += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::ConstraintSet;
    use crate::random::RandomSource;
    use crate::repository::GeneratorRepository;
    use crate::status::{GenerationContext, GenerationStatus};
    use crate::types::RequestedType;

    fn int_generator() -> Box<dyn Generator> {
        GeneratorRepository::with_defaults()
            .resolve(&RequestedType::scalar("i64"), &ConstraintSet::new())
            .unwrap()
    }

    /// A failing value for `still_fails`, found by plain generation.
    fn failing_origin<F>(generator: &dyn Generator, still_fails: F, seed: u64) -> Value
    where
        F: Fn(&Value) -> bool,
    {
        let mut source = RandomSource::new(seed);
        let mut context = GenerationContext::new();
        let mut status = GenerationStatus::new(&mut context);
        loop {
            let value = generator.produce(&mut source, &mut status).unwrap();
            if still_fails(&value) {
                return value;
            }
        }
    }

    #[test]
    fn finds_the_unique_minimal_failing_integer() {
        let generator = int_generator();
        let still_fails = |v: &Value| v.as_int().map_or(false, |n| n >= 37);
        let origin = failing_origin(generator.as_ref(), still_fails, 3);
        let outcome = shrink(
            generator.as_ref(),
            origin,
            still_fails,
            &ShrinkBudget::default(),
        );
        assert_eq!(outcome.value, Value::Int(37));
        assert!(outcome.minimal);
    }

    #[test]
    fn negative_failures_shrink_toward_zero_too() {
        let generator = int_generator();
        let still_fails = |v: &Value| v.as_int().map_or(false, |n| n <= -20);
        let origin = failing_origin(generator.as_ref(), still_fails, 9);
        let outcome = shrink(
            generator.as_ref(),
            origin,
            still_fails,
            &ShrinkBudget::default(),
        );
        assert_eq!(outcome.value, Value::Int(-20));
        assert!(outcome.minimal);
    }

    #[test]
    fn result_is_never_more_complex_than_the_origin() {
        let generator = int_generator();
        let still_fails = |v: &Value| v.as_int().map_or(false, |n| n.abs() >= 1000);
        let origin = Value::Int(123_456);
        let outcome = shrink(
            generator.as_ref(),
            origin.clone(),
            still_fails,
            &ShrinkBudget::default(),
        );
        let origin_magnitude = origin.as_int().unwrap().abs();
        assert!(outcome.value.as_int().unwrap().abs() <= origin_magnitude);
        assert_eq!(outcome.value, Value::Int(1000));
    }

    #[test]
    fn exhausted_trial_budget_reports_best_so_far() {
        let generator = int_generator();
        let still_fails = |v: &Value| v.as_int().map_or(false, |n| n >= 37);
        let outcome = shrink(
            generator.as_ref(),
            Value::Int(1_000_000),
            still_fails,
            &ShrinkBudget::trials(3),
        );
        assert!(!outcome.minimal);
        assert_eq!(outcome.trials, 3);
        let best = outcome.value.as_int().unwrap();
        assert!((37..=1_000_000).contains(&best));
    }

    #[test]
    fn an_already_minimal_value_terminates_immediately() {
        let generator = int_generator();
        let outcome = shrink(
            generator.as_ref(),
            Value::Int(0),
            |_| true,
            &ShrinkBudget::default(),
        );
        assert_eq!(outcome.value, Value::Int(0));
        assert_eq!(outcome.trials, 0);
        assert!(outcome.minimal);
    }

    #[test]
    fn list_failures_shrink_to_the_shortest_failing_list() {
        let repository = GeneratorRepository::with_defaults();
        let generator = repository
            .resolve(
                &RequestedType::generic("vec", vec![RequestedType::scalar("i64")]),
                &ConstraintSet::new(),
            )
            .unwrap();
        let still_fails =
            |v: &Value| v.as_list().map_or(false, |items| items.len() >= 3);
        let origin = Value::List(vec![
            Value::Int(5),
            Value::Int(-9),
            Value::Int(14),
            Value::Int(2),
            Value::Int(0),
        ]);
        let outcome = shrink(
            generator.as_ref(),
            origin,
            still_fails,
            &ShrinkBudget::default(),
        );
        let items = outcome.value.as_list().unwrap();
        assert_eq!(items.len(), 3);
        assert!(outcome.minimal);
        // Surviving elements were themselves simplified.
        assert!(items.iter().all(|item| item.as_int().unwrap() == 0));
    }

    #[test]
    fn adopted_candidates_only_ever_get_simpler() {
        let generator = int_generator();
        let mut magnitudes = vec![50_000i128];
        let outcome = shrink(
            generator.as_ref(),
            Value::Int(50_000),
            |v| {
                let n = v.as_int().unwrap();
                if n >= 321 {
                    magnitudes.push(n);
                }
                n >= 321
            },
            &ShrinkBudget::default(),
        );
        assert_eq!(outcome.value, Value::Int(321));
        // Every adopted value is no larger than the previous one.
        for pair in magnitudes.windows(2) {
            assert!(pair[1] <= pair[0], "complexity increased: {:?}", pair);
        }
    }
}
