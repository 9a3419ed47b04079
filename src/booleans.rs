// Boolean generation. `true` shrinks to `false`.

use crate::errors::GenerationError;
use crate::generator::{Generator, GeneratorSignature, ShrinkSequence};
use crate::random::RandomSource;
use crate::status::GenerationStatus;
use crate::values::Value;

#[derive(Debug, Clone, Default)]
pub struct BoolGenerator;

impl BoolGenerator {
    pub fn new() -> BoolGenerator {
        BoolGenerator
    }
}

impl Generator for BoolGenerator {
    fn name(&self) -> &str {
        "bool"
    }

    fn signature(&self) -> GeneratorSignature {
        GeneratorSignature::scalar("bool")
    }

    fn clone_box(&self) -> Box<dyn Generator> {
        Box::new(self.clone())
    }

    fn produce(
        &self,
        source: &mut RandomSource,
        status: &mut GenerationStatus<'_>,
    ) -> Result<Value, GenerationError> {
        status.note_produced();
        Ok(Value::Bool(source.next_bool()))
    }

    fn shrink(&self, value: &Value) -> ShrinkSequence {
        match value {
            Value::Bool(true) => Box::new(std::iter::once(Value::Bool(false))),
            _ => Box::new(std::iter::empty()),
        }
    }
}
