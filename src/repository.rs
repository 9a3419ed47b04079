// Resolution from requested types (plus constraint metadata) to
// configured generator instances.
//
// Registered generators act as prototypes: resolution clones the
// selected entry, binds component generators for generic shapes, and
// applies the request's constraints to the clone. Selection is
// deterministic: an explicit-generator directive wins when one of its
// names matches a compatible entry; otherwise the last-registered
// compatible entry wins, so later registrations override earlier ones.

use crate::booleans::BoolGenerator;
use crate::collections::{MapGenerator, VecGenerator};
use crate::constraints::ConstraintSet;
use crate::errors::GenerationError;
use crate::floats::FloatGenerator;
use crate::generator::Generator;
use crate::ints::{BigIntGenerator, IntGenerator, IntWidth};
use crate::strings::{BytesGenerator, StringGenerator};
use crate::temporal::DateTimeGenerator;
use crate::types::RequestedType;

pub struct GeneratorRepository {
    entries: Vec<Box<dyn Generator>>,
}

impl GeneratorRepository {
    pub fn new() -> GeneratorRepository {
        GeneratorRepository {
            entries: Vec::new(),
        }
    }

    /// Consume a discovery source's catalog once at construction, in
    /// the source's order.
    pub fn from_source(source: impl IntoIterator<Item = Box<dyn Generator>>) -> GeneratorRepository {
        GeneratorRepository {
            entries: source.into_iter().collect(),
        }
    }

    /// Repository preloaded with the built-in catalog.
    pub fn with_defaults() -> GeneratorRepository {
        GeneratorRepository::from_source(vec![
            Box::new(BoolGenerator::new()) as Box<dyn Generator>,
            Box::new(IntGenerator::new(IntWidth::I8)),
            Box::new(IntGenerator::new(IntWidth::I16)),
            Box::new(IntGenerator::new(IntWidth::I32)),
            Box::new(IntGenerator::new(IntWidth::I64)),
            Box::new(BigIntGenerator::new()),
            Box::new(FloatGenerator::new()),
            Box::new(StringGenerator::new()),
            Box::new(BytesGenerator::new()),
            Box::new(DateTimeGenerator::new()),
            Box::new(VecGenerator::new()),
            Box::new(MapGenerator::new()),
        ])
    }

    pub fn register(&mut self, generator: Box<dyn Generator>) {
        self.entries.push(generator);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All compatible entries, in registration order.
    pub fn generators_for(&self, requested: &RequestedType) -> Vec<&dyn Generator> {
        self.entries
            .iter()
            .filter(|entry| entry.signature().matches(requested))
            .map(|entry| entry.as_ref())
            .collect()
    }

    /// Select, compose and configure one generator for the request.
    /// Component generators for generic shapes are resolved per type
    /// argument, independently and in declaration order.
    pub fn resolve(
        &self,
        requested: &RequestedType,
        constraints: &ConstraintSet,
    ) -> Result<Box<dyn Generator>, GenerationError> {
        let mut selected = None;
        for name in constraints.explicit_generators() {
            selected = self
                .entries
                .iter()
                .find(|entry| entry.name() == name && entry.signature().matches(requested));
            if selected.is_some() {
                break;
            }
        }
        if selected.is_none() {
            selected = self
                .entries
                .iter()
                .rev()
                .find(|entry| entry.signature().matches(requested));
        }
        let prototype = selected.ok_or_else(|| GenerationError::UnresolvableType {
            requested: requested.to_string(),
        })?;
        let mut generator = prototype.clone_box();
        if requested.arity() > 0 {
            let component_constraints = constraints.for_components();
            let mut components = Vec::with_capacity(requested.arity());
            for arg in requested.args() {
                components.push(self.resolve(arg, &component_constraints)?);
            }
            generator.set_components(components);
        }
        generator.configure(constraints)?;
        log::debug!("resolved {} -> {}", requested, generator.name());
        Ok(generator)
    }
}

impl Default for GeneratorRepository {
    fn default() -> GeneratorRepository {
        GeneratorRepository::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::RangeSpec;
    use crate::generator::GeneratorSignature;
    use crate::random::RandomSource;
    use crate::status::{GenerationContext, GenerationStatus};
    use crate::values::Value;

    /// An alternative i16 source that only ever produces boundary
    /// values.
    #[derive(Debug, Clone)]
    struct EdgeI16Generator;

    impl Generator for EdgeI16Generator {
        fn name(&self) -> &str {
            "i16-edges"
        }

        fn signature(&self) -> GeneratorSignature {
            GeneratorSignature::scalar("i16")
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
            let edge = if source.next_bool() {
                i16::MAX as i128
            } else {
                i16::MIN as i128
            };
            Ok(Value::Int(edge))
        }
    }

    #[test]
    fn all_compatible_entries_are_observable_in_order() {
        let mut repository = GeneratorRepository::with_defaults();
        repository.register(Box::new(EdgeI16Generator));
        let matches = repository.generators_for(&RequestedType::scalar("i16"));
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].name(), "i16");
        assert_eq!(matches[1].name(), "i16-edges");
    }

    #[test]
    fn resolution_picks_the_last_registered_entry_deterministically() {
        let mut repository = GeneratorRepository::with_defaults();
        repository.register(Box::new(EdgeI16Generator));
        for _ in 0..5 {
            let resolved = repository
                .resolve(&RequestedType::scalar("i16"), &ConstraintSet::new())
                .unwrap();
            assert_eq!(resolved.name(), "i16-edges");
        }
    }

    #[test]
    fn explicit_generator_directive_overrides_registration_order() {
        let mut repository = GeneratorRepository::with_defaults();
        repository.register(Box::new(EdgeI16Generator));
        let constraints = ConstraintSet::new().with_explicit_generators(&["i16"]);
        let resolved = repository
            .resolve(&RequestedType::scalar("i16"), &constraints)
            .unwrap();
        assert_eq!(resolved.name(), "i16");
    }

    #[test]
    fn incompatible_explicit_directive_falls_back_to_type_match() {
        let repository = GeneratorRepository::with_defaults();
        let constraints = ConstraintSet::new().with_explicit_generators(&["datetime"]);
        let resolved = repository
            .resolve(&RequestedType::scalar("i64"), &constraints)
            .unwrap();
        assert_eq!(resolved.name(), "i64");
    }

    #[test]
    fn unknown_types_are_unresolvable() {
        let repository = GeneratorRepository::with_defaults();
        let err = repository
            .resolve(&RequestedType::scalar("nonsense"), &ConstraintSet::new())
            .unwrap_err();
        match err {
            GenerationError::UnresolvableType { requested } => {
                assert_eq!(requested, "nonsense")
            }
            other => panic!("expected UnresolvableType, got {:?}", other),
        }
        // Arity participates in compatibility.
        let err = repository
            .resolve(
                &RequestedType::generic("vec", vec![]),
                &ConstraintSet::new(),
            )
            .unwrap_err();
        assert!(matches!(err, GenerationError::UnresolvableType { .. }));
    }

    #[test]
    fn unresolvable_component_fails_the_whole_request() {
        let repository = GeneratorRepository::with_defaults();
        let requested =
            RequestedType::generic("vec", vec![RequestedType::scalar("nonsense")]);
        let err = repository
            .resolve(&requested, &ConstraintSet::new())
            .unwrap_err();
        assert!(matches!(err, GenerationError::UnresolvableType { .. }));
    }

    #[test]
    fn range_errors_surface_at_resolution_time() {
        let repository = GeneratorRepository::with_defaults();
        let constraints = ConstraintSet::new().with_range(RangeSpec::between("7", "3"));
        let err = repository
            .resolve(&RequestedType::scalar("i32"), &constraints)
            .unwrap_err();
        assert!(matches!(err, GenerationError::InvalidRange { .. }));
    }

    #[test]
    fn resolved_generators_produce_assignable_values() {
        let repository = GeneratorRepository::with_defaults();
        let mut source = RandomSource::new(2);
        let mut context = GenerationContext::new();
        let mut status = GenerationStatus::new(&mut context);
        let cases = vec![
            (RequestedType::scalar("bool"), "bool"),
            (RequestedType::scalar("i64"), "int"),
            (RequestedType::scalar("f64"), "float"),
            (RequestedType::scalar("string"), "string"),
            (RequestedType::scalar("datetime"), "datetime"),
            (
                RequestedType::generic("vec", vec![RequestedType::scalar("i8")]),
                "list",
            ),
        ];
        for (requested, expected) in cases {
            let gen = repository.resolve(&requested, &ConstraintSet::new()).unwrap();
            let value = gen.produce(&mut source, &mut status).unwrap();
            assert_eq!(value.type_name(), expected, "for {}", requested);
        }
    }
}
