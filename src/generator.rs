// The generator capability: produce one value of a declared shape from
// a randomness source plus generation status, and optionally offer a
// sequence of simpler candidates for a previously produced value.

use crate::constraints::ConstraintSet;
use crate::errors::GenerationError;
use crate::random::RandomSource;
use crate::status::GenerationStatus;
use crate::types::RequestedType;
use crate::values::Value;

/// Lazily produced, finite sequence of shrink candidates. Restartable
/// by calling [`Generator::shrink`] again.
pub type ShrinkSequence = Box<dyn Iterator<Item = Value>>;

/// Capability record a generator registers under: the type name it
/// produces and how many generic arguments that type carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorSignature {
    pub produces: String,
    pub arity: usize,
}

impl GeneratorSignature {
    pub fn scalar(produces: &str) -> GeneratorSignature {
        GeneratorSignature {
            produces: produces.to_string(),
            arity: 0,
        }
    }

    pub fn generic(produces: &str, arity: usize) -> GeneratorSignature {
        GeneratorSignature {
            produces: produces.to_string(),
            arity,
        }
    }

    pub fn matches(&self, requested: &RequestedType) -> bool {
        self.produces == requested.name() && self.arity == requested.arity()
    }
}

pub trait Generator {
    /// Unique implementation name, matched by explicit-generator
    /// directives.
    fn name(&self) -> &str;

    fn signature(&self) -> GeneratorSignature;

    fn clone_box(&self) -> Box<dyn Generator>;

    /// Apply the request's constraints. Bound parsing and validation
    /// happen here, so range errors surface at resolution time, before
    /// any trial runs.
    fn configure(&mut self, _constraints: &ConstraintSet) -> Result<(), GenerationError> {
        Ok(())
    }

    /// Bind resolved component generators, one per generic argument in
    /// declaration order. Only aggregate shapes override this.
    fn set_components(&mut self, _components: Vec<Box<dyn Generator>>) {}

    fn produce(
        &self,
        source: &mut RandomSource,
        status: &mut GenerationStatus<'_>,
    ) -> Result<Value, GenerationError>;

    /// Simpler alternatives for `value`: finite, and strictly simpler
    /// under this generator's own ordering. The default treats every
    /// value as already minimal.
    fn shrink(&self, _value: &Value) -> ShrinkSequence {
        Box::new(std::iter::empty())
    }
}

impl Clone for Box<dyn Generator> {
    fn clone(&self) -> Box<dyn Generator> {
        self.clone_box()
    }
}

impl std::fmt::Debug for dyn Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("name", &self.name())
            .field("signature", &self.signature())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::GenerationContext;

    #[derive(Debug, Clone)]
    struct UnitGenerator;

    impl Generator for UnitGenerator {
        fn name(&self) -> &str {
            "unit"
        }

        fn signature(&self) -> GeneratorSignature {
            GeneratorSignature::scalar("unit")
        }

        fn clone_box(&self) -> Box<dyn Generator> {
            Box::new(self.clone())
        }

        fn produce(
            &self,
            _source: &mut RandomSource,
            status: &mut GenerationStatus<'_>,
        ) -> Result<Value, GenerationError> {
            status.note_produced();
            Ok(Value::Int(0))
        }
    }

    #[test]
    fn default_shrink_is_empty() {
        let gen = UnitGenerator;
        assert_eq!(gen.shrink(&Value::Int(0)).count(), 0);
    }

    #[test]
    fn signatures_match_on_name_and_arity() {
        let sig = GeneratorSignature::generic("vec", 1);
        let vec_of_int =
            RequestedType::generic("vec", vec![RequestedType::scalar("i64")]);
        assert!(sig.matches(&vec_of_int));
        assert!(!sig.matches(&RequestedType::scalar("vec")));
        assert!(!sig.matches(&RequestedType::scalar("i64")));
    }

    #[test]
    fn boxed_generators_are_cloneable() {
        let boxed: Box<dyn Generator> = Box::new(UnitGenerator);
        let copy = boxed.clone();
        let mut context = GenerationContext::new();
        let mut status = GenerationStatus::new(&mut context);
        let mut source = RandomSource::new(0);
        assert_eq!(
            copy.produce(&mut source, &mut status).unwrap(),
            Value::Int(0)
        );
    }
}
