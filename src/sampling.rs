// Drives constrained generation for one parameter: applies the
// post-generation filter and enforces the discard-ratio protocol.
//
// A negative ratio never succeeds and fails the parameter immediately.
// A positive ratio allows that many consecutive discards before the
// sampler gives up cleanly. A zero (or absent) ratio derives its
// ceiling from the configured trial count.

use crate::constraints::{ConstraintSet, Predicate};
use crate::errors::GenerationError;
use crate::generator::Generator;
use crate::random::RandomSource;
use crate::status::GenerationStatus;
use crate::values::Value;

/// One sampling step's outcome. `Exhausted` is a clean give-up: the
/// host reports the run successful with zero values for this
/// parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Sample {
    Value(Value),
    Exhausted,
}

pub struct ParameterSampler {
    generator: Box<dyn Generator>,
    filter: Option<Predicate>,
    ceiling: Option<u64>,
    consecutive_discards: u64,
}

impl ParameterSampler {
    /// `trials` is the host's configured trial count for the property,
    /// used as the ceiling when the discard ratio is zero.
    pub fn new(
        generator: Box<dyn Generator>,
        constraints: &ConstraintSet,
        trials: u64,
    ) -> ParameterSampler {
        let ratio = constraints.discard_ratio().unwrap_or(0);
        let ceiling = if ratio < 0 {
            None
        } else if ratio == 0 {
            Some(trials.max(1))
        } else {
            Some(ratio as u64)
        };
        ParameterSampler {
            generator,
            filter: constraints.filter().cloned(),
            ceiling,
            consecutive_discards: 0,
        }
    }

    pub fn generator(&self) -> &dyn Generator {
        self.generator.as_ref()
    }

    pub fn next(
        &mut self,
        source: &mut RandomSource,
        status: &mut GenerationStatus<'_>,
    ) -> Result<Sample, GenerationError> {
        let ceiling = match self.ceiling {
            Some(ceiling) => ceiling,
            // Negative ratio: never found parameters, regardless of any
            // predicate.
            None => return Err(GenerationError::DiscardExhausted { discards: 0 }),
        };
        loop {
            let value = self.generator.produce(source, status)?;
            match &self.filter {
                Some(filter) if !(**filter)(&value) => {
                    self.consecutive_discards += 1;
                    if self.consecutive_discards > ceiling {
                        log::debug!(
                            "giving up after {} consecutive discards",
                            self.consecutive_discards
                        );
                        return Ok(Sample::Exhausted);
                    }
                }
                _ => {
                    self.consecutive_discards = 0;
                    return Ok(Sample::Value(value));
                }
            }
        }
    }
}
