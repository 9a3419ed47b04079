// String and byte-sequence generation. Lengths come from the size
// distribution, scaled down as generation descends.

use crate::constraints::ConstraintSet;
use crate::distributions::{Distribution, Geometric};
use crate::errors::GenerationError;
use crate::generator::{Generator, GeneratorSignature, ShrinkSequence};
use crate::random::RandomSource;
use crate::status::GenerationStatus;
use crate::values::Value;

const DEFAULT_MEAN_LEN: f64 = 8.0;

#[derive(Debug, Clone)]
pub struct StringGenerator {
    alphabet: Vec<char>,
    mean_len: f64,
    distribution: Geometric,
}

impl StringGenerator {
    /// Printable-ASCII generator.
    pub fn new() -> StringGenerator {
        StringGenerator::with_alphabet((' '..='~').collect())
    }

    pub fn with_alphabet(alphabet: Vec<char>) -> StringGenerator {
        StringGenerator {
            alphabet,
            mean_len: DEFAULT_MEAN_LEN,
            distribution: Geometric,
        }
    }
}

impl Default for StringGenerator {
    fn default() -> StringGenerator {
        StringGenerator::new()
    }
}

impl Generator for StringGenerator {
    fn name(&self) -> &str {
        "string"
    }

    fn signature(&self) -> GeneratorSignature {
        GeneratorSignature::scalar("string")
    }

    fn clone_box(&self) -> Box<dyn Generator> {
        Box::new(self.clone())
    }

    fn configure(&mut self, constraints: &ConstraintSet) -> Result<(), GenerationError> {
        if let Some(mean) = constraints.size_mean() {
            self.mean_len = mean;
        }
        Ok(())
    }

    fn produce(
        &self,
        source: &mut RandomSource,
        status: &mut GenerationStatus<'_>,
    ) -> Result<Value, GenerationError> {
        status.note_produced();
        if self.alphabet.is_empty() {
            return Ok(Value::Str(String::new()));
        }
        let mean = status.scaled_mean(self.mean_len);
        let len = self
            .distribution
            .sample_with_mean(mean, source)
            .min(status.remaining() as usize);
        let mut out = String::with_capacity(len);
        for _ in 0..len {
            let index = source.next_bits(32) as usize % self.alphabet.len();
            out.push(self.alphabet[index]);
        }
        Ok(Value::Str(out))
    }

    fn shrink(&self, value: &Value) -> ShrinkSequence {
        match value {
            Value::Str(s) => {
                let chars: Vec<char> = s.chars().collect();
                Box::new(SequenceShrinker::new(chars).map(|cs| {
                    Value::Str(cs.into_iter().collect())
                }))
            }
            _ => Box::new(std::iter::empty()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BytesGenerator {
    mean_len: f64,
    distribution: Geometric,
}

impl BytesGenerator {
    pub fn new() -> BytesGenerator {
        BytesGenerator {
            mean_len: DEFAULT_MEAN_LEN,
            distribution: Geometric,
        }
    }
}

impl Default for BytesGenerator {
    fn default() -> BytesGenerator {
        BytesGenerator::new()
    }
}

impl Generator for BytesGenerator {
    fn name(&self) -> &str {
        "bytes"
    }

    fn signature(&self) -> GeneratorSignature {
        GeneratorSignature::scalar("bytes")
    }

    fn clone_box(&self) -> Box<dyn Generator> {
        Box::new(self.clone())
    }

    fn configure(&mut self, constraints: &ConstraintSet) -> Result<(), GenerationError> {
        if let Some(mean) = constraints.size_mean() {
            self.mean_len = mean;
        }
        Ok(())
    }

    fn produce(
        &self,
        source: &mut RandomSource,
        status: &mut GenerationStatus<'_>,
    ) -> Result<Value, GenerationError> {
        status.note_produced();
        let mean = status.scaled_mean(self.mean_len);
        let len = self
            .distribution
            .sample_with_mean(mean, source)
            .min(status.remaining() as usize);
        Ok(Value::Bytes(source.next_bytes(len)))
    }

    fn shrink(&self, value: &Value) -> ShrinkSequence {
        match value {
            Value::Bytes(bytes) => {
                Box::new(SequenceShrinker::new(bytes.clone()).map(Value::Bytes))
            }
            _ => Box::new(std::iter::empty()),
        }
    }
}

/// Strictly-shorter candidates for a sequence: empty, the first half,
/// then every remove-one-element variant.
pub(crate) struct SequenceShrinker<T> {
    items: Vec<T>,
    stage: ShrinkStage,
}

#[derive(Clone, Copy)]
enum ShrinkStage {
    Empty,
    Half,
    RemoveAt(usize),
    Done,
}

impl<T: Clone> SequenceShrinker<T> {
    pub(crate) fn new(items: Vec<T>) -> SequenceShrinker<T> {
        let stage = if items.is_empty() {
            ShrinkStage::Done
        } else {
            ShrinkStage::Empty
        };
        SequenceShrinker { items, stage }
    }
}

impl<T: Clone> Iterator for SequenceShrinker<T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Vec<T>> {
        loop {
            match self.stage {
                ShrinkStage::Empty => {
                    self.stage = ShrinkStage::Half;
                    return Some(Vec::new());
                }
                ShrinkStage::Half => {
                    self.stage = ShrinkStage::RemoveAt(0);
                    if self.items.len() >= 2 {
                        return Some(self.items[..self.items.len() / 2].to_vec());
                    }
                }
                ShrinkStage::RemoveAt(index) => {
                    if self.items.len() < 2 || index >= self.items.len() {
                        self.stage = ShrinkStage::Done;
                        continue;
                    }
                    self.stage = ShrinkStage::RemoveAt(index + 1);
                    let mut shorter = self.items.clone();
                    shorter.remove(index);
                    return Some(shorter);
                }
                ShrinkStage::Done => return None,
            }
        }
    }
}
