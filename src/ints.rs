// Integer generators: fixed-width machine integers and the wide-carrier
// "bigint" shape with magnitude-based open-range sampling.

use crate::constraints::{parse_bound, ConstraintSet};
use crate::distributions::{Distribution, Geometric};
use crate::errors::GenerationError;
use crate::generator::{Generator, GeneratorSignature, ShrinkSequence};
use crate::random::RandomSource;
use crate::status::GenerationStatus;
use crate::values::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntWidth {
    I8,
    I16,
    I32,
    I64,
}

impl IntWidth {
    pub fn type_name(self) -> &'static str {
        match self {
            IntWidth::I8 => "i8",
            IntWidth::I16 => "i16",
            IntWidth::I32 => "i32",
            IntWidth::I64 => "i64",
        }
    }

    pub fn min_value(self) -> i128 {
        match self {
            IntWidth::I8 => i8::MIN as i128,
            IntWidth::I16 => i16::MIN as i128,
            IntWidth::I32 => i32::MIN as i128,
            IntWidth::I64 => i64::MIN as i128,
        }
    }

    pub fn max_value(self) -> i128 {
        match self {
            IntWidth::I8 => i8::MAX as i128,
            IntWidth::I16 => i16::MAX as i128,
            IntWidth::I32 => i32::MAX as i128,
            IntWidth::I64 => i64::MAX as i128,
        }
    }
}

/// Fixed-width integer generator. Unconstrained, it spans the width's
/// full domain; a one-sided bound defaults the other side to the
/// width's extreme.
#[derive(Debug, Clone)]
pub struct IntGenerator {
    width: IntWidth,
    min: i128,
    max: i128,
}

impl IntGenerator {
    pub fn new(width: IntWidth) -> IntGenerator {
        IntGenerator {
            width,
            min: width.min_value(),
            max: width.max_value(),
        }
    }

    fn parse_in_domain(&self, text: &str) -> Result<i128, GenerationError> {
        let value: i128 = parse_bound(text, self.width.type_name())?;
        if value < self.width.min_value() || value > self.width.max_value() {
            return Err(GenerationError::parse(text, self.width.type_name()));
        }
        Ok(value)
    }
}

impl Generator for IntGenerator {
    fn name(&self) -> &str {
        self.width.type_name()
    }

    fn signature(&self) -> GeneratorSignature {
        GeneratorSignature::scalar(self.width.type_name())
    }

    fn clone_box(&self) -> Box<dyn Generator> {
        Box::new(self.clone())
    }

    fn configure(&mut self, constraints: &ConstraintSet) -> Result<(), GenerationError> {
        if let Some(range) = constraints.range() {
            if let Some(text) = &range.min {
                self.min = self.parse_in_domain(text)?;
            }
            if let Some(text) = &range.max {
                self.max = self.parse_in_domain(text)?;
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
        Ok(Value::Int(source.next_i128_bounded(self.min, self.max)?))
    }

    fn shrink(&self, value: &Value) -> ShrinkSequence {
        match value {
            Value::Int(v) => Box::new(IntShrinker::toward(
                *v,
                shrink_target(Some(self.min), Some(self.max)),
            )),
            _ => Box::new(std::iter::empty()),
        }
    }
}

/// Wide integer generator. With both bounds, offsets are drawn with
/// `bit_length(max - min)` bits and out-of-range draws rejected. With
/// an open side, a decimal magnitude is sampled instead, keyed to the
/// run's progress counter, so draws start near the closed bound and
/// range farther as the run ages.
#[derive(Debug, Clone)]
pub struct BigIntGenerator {
    min: Option<i128>,
    max: Option<i128>,
    distribution: Geometric,
}

// 10^37 is the largest power of ten below i128::MAX.
const MAX_DECIMAL_EXPONENT: u32 = 37;

impl BigIntGenerator {
    pub fn new() -> BigIntGenerator {
        BigIntGenerator {
            min: None,
            max: None,
            distribution: Geometric,
        }
    }

    fn magnitude_offset(
        &self,
        source: &mut RandomSource,
        status: &GenerationStatus<'_>,
    ) -> i128 {
        let mean = (status.size() + 1) as f64;
        let exponent = self
            .distribution
            .sample_with_mean(mean, source)
            .min((MAX_DECIMAL_EXPONENT - 1) as usize) as u32;
        let bound = 10u128.pow(exponent + 1);
        let bits = 128 - bound.leading_zeros();
        source.next_bits(bits) as i128
    }
}

impl Default for BigIntGenerator {
    fn default() -> BigIntGenerator {
        BigIntGenerator::new()
    }
}

impl Generator for BigIntGenerator {
    fn name(&self) -> &str {
        "bigint"
    }

    fn signature(&self) -> GeneratorSignature {
        GeneratorSignature::scalar("bigint")
    }

    fn clone_box(&self) -> Box<dyn Generator> {
        Box::new(self.clone())
    }

    fn configure(&mut self, constraints: &ConstraintSet) -> Result<(), GenerationError> {
        if let Some(range) = constraints.range() {
            if let Some(text) = &range.min {
                self.min = Some(parse_bound(text, "bigint")?);
            }
            if let Some(text) = &range.max {
                self.max = Some(parse_bound(text, "bigint")?);
            }
            if let (Some(min), Some(max)) = (self.min, self.max) {
                if min > max {
                    return Err(GenerationError::invalid_range(min, max));
                }
            }
        }
        Ok(())
    }

    fn produce(
        &self,
        source: &mut RandomSource,
        status: &mut GenerationStatus<'_>,
    ) -> Result<Value, GenerationError> {
        let value = match (self.min, self.max) {
            (Some(min), Some(max)) => {
                let span = (max as u128).wrapping_sub(min as u128);
                if span == u128::MAX {
                    source.next_bits(128) as i128
                } else {
                    let bits = 128 - span.leading_zeros();
                    loop {
                        let offset = source.next_bits(bits);
                        if offset <= span {
                            break min.wrapping_add(offset as i128);
                        }
                    }
                }
            }
            (Some(min), None) => min.saturating_add(self.magnitude_offset(source, status)),
            (None, Some(max)) => max.saturating_sub(self.magnitude_offset(source, status)),
            (None, None) => {
                let magnitude = self.magnitude_offset(source, status);
                if source.next_bool() {
                    magnitude
                } else {
                    -magnitude
                }
            }
        };
        status.note_produced();
        Ok(Value::Int(value))
    }

    fn shrink(&self, value: &Value) -> ShrinkSequence {
        match value {
            Value::Int(v) => Box::new(IntShrinker::toward(*v, shrink_target(self.min, self.max))),
            _ => Box::new(std::iter::empty()),
        }
    }
}

/// In-range point closest to zero; integer shrinking moves toward it.
pub(crate) fn shrink_target(min: Option<i128>, max: Option<i128>) -> i128 {
    match (min, max) {
        (Some(min), _) if min > 0 => min,
        (_, Some(max)) if max < 0 => max,
        _ => 0,
    }
}

/// Candidates strictly closer to the target: the target itself, then
/// distance-halving steps, ending one step away from the start. The
/// final one-step candidate makes local minima exact.
pub(crate) struct IntShrinker {
    value: i128,
    step: i128,
}

impl IntShrinker {
    pub(crate) fn toward(value: i128, target: i128) -> IntShrinker {
        IntShrinker {
            value,
            step: value.saturating_sub(target),
        }
    }
}

impl Iterator for IntShrinker {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        if self.step == 0 {
            return None;
        }
        let candidate = self.value - self.step;
        self.step /= 2;
        Some(Value::Int(candidate))
    }
}
