// Calendar/temporal value generation with lexically parsed bounds.
//
// Bounds arrive as text and are parsed with a strftime pattern (the
// `format` directive, or the canonical form below). A malformed
// pattern, an unparsable bound and a backwards range are three distinct
// resolution-time failures.

use crate::constraints::ConstraintSet;
use crate::errors::GenerationError;
use crate::generator::{Generator, GeneratorSignature, ShrinkSequence};
use crate::ints::IntShrinker;
use crate::random::RandomSource;
use crate::status::GenerationStatus;
use crate::values::Value;
use chrono::format::{parse as parse_items, Item, Parsed};
use chrono::format::strftime::StrftimeItems;
use chrono::{Duration, NaiveDateTime};

pub const DEFAULT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

const NANOS_PER_SEC: i128 = 1_000_000_000;

#[derive(Debug, Clone)]
pub struct DateTimeGenerator {
    min: NaiveDateTime,
    max: NaiveDateTime,
}

impl DateTimeGenerator {
    pub fn new() -> DateTimeGenerator {
        DateTimeGenerator {
            min: NaiveDateTime::MIN,
            max: NaiveDateTime::MAX,
        }
    }
}

impl Default for DateTimeGenerator {
    fn default() -> DateTimeGenerator {
        DateTimeGenerator::new()
    }
}

/// Validate a strftime pattern, rejecting unknown or truncated
/// specifiers.
fn checked_format(pattern: &str) -> Result<Vec<Item<'_>>, GenerationError> {
    let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(GenerationError::Format {
            pattern: pattern.to_string(),
        });
    }
    Ok(items)
}

fn parse_datetime(
    text: &str,
    items: &[Item<'_>],
    pattern: &str,
) -> Result<NaiveDateTime, GenerationError> {
    let mut parsed = Parsed::new();
    parse_items(&mut parsed, text, items.iter())
        .map_err(|_| GenerationError::parse(text, pattern))?;
    let date = parsed
        .to_naive_date()
        .map_err(|_| GenerationError::parse(text, pattern))?;
    let time = parsed
        .to_naive_time()
        .map_err(|_| GenerationError::parse(text, pattern))?;
    Ok(date.and_time(time))
}

/// Nanoseconds since the earliest representable instant; non-negative
/// for every valid value.
fn to_nanos(dt: NaiveDateTime) -> i128 {
    let delta = dt.signed_duration_since(NaiveDateTime::MIN);
    delta.num_seconds() as i128 * NANOS_PER_SEC + delta.subsec_nanos() as i128
}

fn from_nanos(nanos: i128, fallback: NaiveDateTime) -> NaiveDateTime {
    let secs = (nanos / NANOS_PER_SEC) as i64;
    let rem = (nanos % NANOS_PER_SEC) as i64;
    NaiveDateTime::MIN
        .checked_add_signed(Duration::seconds(secs))
        .and_then(|dt| dt.checked_add_signed(Duration::nanoseconds(rem)))
        .unwrap_or(fallback)
}

impl Generator for DateTimeGenerator {
    fn name(&self) -> &str {
        "datetime"
    }

    fn signature(&self) -> GeneratorSignature {
        GeneratorSignature::scalar("datetime")
    }

    fn clone_box(&self) -> Box<dyn Generator> {
        Box::new(self.clone())
    }

    fn configure(&mut self, constraints: &ConstraintSet) -> Result<(), GenerationError> {
        let range = match constraints.range() {
            Some(range) => range,
            None => return Ok(()),
        };
        let pattern = range.format.as_deref().unwrap_or(DEFAULT_FORMAT);
        let items = checked_format(pattern)?;
        if let Some(text) = &range.min {
            self.min = parse_datetime(text, &items, pattern)?;
        }
        if let Some(text) = &range.max {
            self.max = parse_datetime(text, &items, pattern)?;
        }
        if self.min > self.max {
            return Err(GenerationError::invalid_range(self.min, self.max));
        }
        Ok(())
    }

    fn produce(
        &self,
        source: &mut RandomSource,
        status: &mut GenerationStatus<'_>,
    ) -> Result<Value, GenerationError> {
        status.note_produced();
        let nanos = source.next_i128_bounded(to_nanos(self.min), to_nanos(self.max))?;
        Ok(Value::DateTime(from_nanos(nanos, self.min)))
    }

    fn shrink(&self, value: &Value) -> ShrinkSequence {
        match value {
            Value::DateTime(dt) => {
                let min = self.min;
                Box::new(
                    IntShrinker::toward(to_nanos(*dt), to_nanos(min)).map(move |candidate| {
                        match candidate {
                            Value::Int(nanos) => Value::DateTime(from_nanos(nanos, min)),
                            other => other,
                        }
                    }),
                )
            }
            _ => Box::new(std::iter::empty()),
        }
    }
}
