//! # Surmise
//!
//! Core engine for typed property-based testing: a registry that
//! resolves requested types (plus constraint metadata) to composed
//! generators, a randomized generation protocol over a seedable,
//! splittable source, and a shrinking search that minimizes failing
//! inputs.
//!
//! The host test framework stays outside this crate: it discovers
//! properties, extracts per-parameter metadata into a [`RequestedType`]
//! and [`ConstraintSet`], and drives trials through three entry points:
//! [`GeneratorRepository::resolve`], [`Generator::produce`] and
//! [`shrink`]. Each property run owns one [`RandomSource`] and one
//! [`GenerationContext`]; nothing is shared between runs.

pub mod booleans;
pub mod collections;
pub mod constraints;
pub mod distributions;
pub mod errors;
pub mod floats;
pub mod generator;
pub mod ints;
pub mod random;
pub mod repository;
pub mod sampling;
pub mod shrinking;
pub mod status;
pub mod strings;
pub mod temporal;
pub mod types;
pub mod values;

pub use constraints::{ConstraintSet, Predicate, RangeSpec};
pub use distributions::{weighted, Distribution, Geometric};
pub use errors::GenerationError;
pub use generator::{Generator, GeneratorSignature, ShrinkSequence};
pub use random::RandomSource;
pub use repository::GeneratorRepository;
pub use sampling::{ParameterSampler, Sample};
pub use shrinking::{shrink, ShrinkBudget, ShrinkOutcome};
pub use status::{GenerationContext, GenerationStatus};
pub use types::RequestedType;
pub use values::Value;

#[cfg(test)]
mod tests {
    use super::*;

    // Resolve, produce and shrink through the public surface only, the
    // way a host framework drives one failing trial.
    #[test]
    fn end_to_end_trial_with_shrinking() {
        let repository = GeneratorRepository::with_defaults();
        let requested = RequestedType::scalar("i64");
        let constraints = ConstraintSet::new().with_range(RangeSpec::between("0", "10000"));
        let generator = repository.resolve(&requested, &constraints).unwrap();

        let mut source = RandomSource::new(2024);
        let mut context = GenerationContext::new();
        let property = |v: &Value| v.as_int().map_or(true, |n| n < 5000);

        let mut failing = None;
        for _ in 0..200 {
            let mut status = GenerationStatus::new(&mut context);
            let value = generator.produce(&mut source, &mut status).unwrap();
            if !property(&value) {
                failing = Some(value);
                break;
            }
        }
        let failing = failing.expect("a counterexample should turn up in 200 trials");

        let outcome = shrink(
            generator.as_ref(),
            failing,
            |v| !property(v),
            &ShrinkBudget::default(),
        );
        assert_eq!(outcome.value, Value::Int(5000));
        assert!(outcome.minimal);
    }
}
