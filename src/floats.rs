// Floating point generation over inclusive ranges.

use crate::constraints::{parse_bound, ConstraintSet};
use crate::errors::GenerationError;
use crate::generator::{Generator, GeneratorSignature, ShrinkSequence};
use crate::random::RandomSource;
use crate::status::GenerationStatus;
use crate::values::Value;

#[derive(Debug, Clone)]
pub struct FloatGenerator {
    min: f64,
    max: f64,
}

impl FloatGenerator {
    pub fn new() -> FloatGenerator {
        FloatGenerator {
            min: -f64::MAX,
            max: f64::MAX,
        }
    }

    fn parse_finite(text: &str) -> Result<f64, GenerationError> {
        let value: f64 = parse_bound(text, "f64")?;
        if !value.is_finite() {
            return Err(GenerationError::parse(text, "f64"));
        }
        Ok(value)
    }
}

impl Default for FloatGenerator {
    fn default() -> FloatGenerator {
        FloatGenerator::new()
    }
}

impl Generator for FloatGenerator {
    fn name(&self) -> &str {
        "f64"
    }

    fn signature(&self) -> GeneratorSignature {
        GeneratorSignature::scalar("f64")
    }

    fn clone_box(&self) -> Box<dyn Generator> {
        Box::new(self.clone())
    }

    fn configure(&mut self, constraints: &ConstraintSet) -> Result<(), GenerationError> {
        if let Some(range) = constraints.range() {
            if let Some(text) = &range.min {
                self.min = FloatGenerator::parse_finite(text)?;
            }
            if let Some(text) = &range.max {
                self.max = FloatGenerator::parse_finite(text)?;
            }
            if self.min > self.max {
                return Err(GenerationError::invalid_range(self.min, self.max));
            }
        }
        Ok(())
    }

    fn produce(
        &self,
        source: &mut RandomSource,
        status: &mut GenerationStatus<'_>,
    ) -> Result<Value, GenerationError> {
        status.note_produced();
        // Convex combination; avoids overflow when the span exceeds
        // f64::MAX. Clamped, since rounding can overshoot a bound by an
        // ulp.
        let u = source.next_f64();
        let value = u * self.max + (1.0 - u) * self.min;
        Ok(Value::Float(value.max(self.min).min(self.max)))
    }

    fn shrink(&self, value: &Value) -> ShrinkSequence {
        match value {
            Value::Float(v) => {
                let target = if self.min > 0.0 {
                    self.min
                } else if self.max < 0.0 {
                    self.max
                } else {
                    0.0
                };
                Box::new(FloatShrinker::toward(*v, target))
            }
            _ => Box::new(std::iter::empty()),
        }
    }
}

/// Distance-halving candidates toward the target, preceded by the
/// integer truncation when it is strictly closer. Bounded round count
/// keeps the sequence finite.
struct FloatShrinker {
    value: f64,
    step: f64,
    truncation: Option<f64>,
    rounds_left: u32,
}

impl FloatShrinker {
    fn toward(value: f64, target: f64) -> FloatShrinker {
        let step = value - target;
        let truncated = value.trunc();
        let truncation = if truncated != value
            && (truncated - target).abs() < (value - target).abs()
        {
            Some(truncated)
        } else {
            None
        };
        FloatShrinker {
            value,
            step: if step.is_finite() { step } else { 0.0 },
            truncation,
            rounds_left: 64,
        }
    }
}

impl Iterator for FloatShrinker {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        if let Some(truncated) = self.truncation.take() {
            return Some(Value::Float(truncated));
        }
        if self.rounds_left == 0 || self.step == 0.0 {
            return None;
        }
        let candidate = self.value - self.step;
        self.rounds_left -= 1;
        self.step /= 2.0;
        if candidate == self.value {
            return None;
        }
        Some(Value::Float(candidate))
    }
}
