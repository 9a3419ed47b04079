// Aggregate generators: sequences and maps composed from component
// generators resolved at configuration time.
//
// Element counts come from the size distribution, scaled down by the
// current generation depth; at the depth cap containers produce empty.
// Every element draws from a derived sub-source.

use crate::constraints::ConstraintSet;
use crate::distributions::{Distribution, Geometric};
use crate::errors::GenerationError;
use crate::generator::{Generator, GeneratorSignature, ShrinkSequence};
use crate::random::RandomSource;
use crate::status::GenerationStatus;
use crate::strings::SequenceShrinker;
use crate::values::Value;

const DEFAULT_MEAN_COUNT: f64 = 4.0;

#[derive(Clone)]
pub struct VecGenerator {
    component: Option<Box<dyn Generator>>,
    mean_count: f64,
    distribution: Geometric,
}

impl VecGenerator {
    pub fn new() -> VecGenerator {
        VecGenerator {
            component: None,
            mean_count: DEFAULT_MEAN_COUNT,
            distribution: Geometric,
        }
    }

    fn component(&self) -> Result<&dyn Generator, GenerationError> {
        self.component
            .as_deref()
            .ok_or_else(|| GenerationError::UnresolvableType {
                requested: "vec<_>".to_string(),
            })
    }
}

impl Default for VecGenerator {
    fn default() -> VecGenerator {
        VecGenerator::new()
    }
}

impl Generator for VecGenerator {
    fn name(&self) -> &str {
        "vec"
    }

    fn signature(&self) -> GeneratorSignature {
        GeneratorSignature::generic("vec", 1)
    }

    fn clone_box(&self) -> Box<dyn Generator> {
        Box::new(self.clone())
    }

    fn configure(&mut self, constraints: &ConstraintSet) -> Result<(), GenerationError> {
        if let Some(mean) = constraints.size_mean() {
            self.mean_count = mean;
        }
        Ok(())
    }

    fn set_components(&mut self, components: Vec<Box<dyn Generator>>) {
        self.component = components.into_iter().next();
    }

    fn produce(
        &self,
        source: &mut RandomSource,
        status: &mut GenerationStatus<'_>,
    ) -> Result<Value, GenerationError> {
        let component = self.component()?;
        status.note_produced();
        let count = sample_count(&self.distribution, self.mean_count, source, status);
        let mut items = Vec::with_capacity(count);
        status.descend(|status| -> Result<(), GenerationError> {
            for _ in 0..count {
                let mut sub = source.split();
                items.push(component.produce(&mut sub, status)?);
            }
            Ok(())
        })?;
        Ok(Value::List(items))
    }

    fn shrink(&self, value: &Value) -> ShrinkSequence {
        let items = match value {
            Value::List(items) => items.clone(),
            _ => return Box::new(std::iter::empty()),
        };
        let shorter = SequenceShrinker::new(items.clone()).map(Value::List);
        let component = match &self.component {
            Some(component) => component.clone(),
            None => return Box::new(shorter),
        };
        // Same length, one element simplified: still simpler under the
        // (length, element-wise) ordering.
        let elementwise = (0..items.len()).flat_map(move |index| {
            let items = items.clone();
            component.shrink(&items[index]).map(move |candidate| {
                let mut simpler = items.clone();
                simpler[index] = candidate;
                Value::List(simpler)
            })
        });
        Box::new(shorter.chain(elementwise))
    }
}

#[derive(Clone)]
pub struct MapGenerator {
    keys: Option<Box<dyn Generator>>,
    values: Option<Box<dyn Generator>>,
    mean_count: f64,
    distribution: Geometric,
}

impl MapGenerator {
    pub fn new() -> MapGenerator {
        MapGenerator {
            keys: None,
            values: None,
            mean_count: DEFAULT_MEAN_COUNT,
            distribution: Geometric,
        }
    }

    fn components(&self) -> Result<(&dyn Generator, &dyn Generator), GenerationError> {
        match (self.keys.as_deref(), self.values.as_deref()) {
            (Some(keys), Some(values)) => Ok((keys, values)),
            _ => Err(GenerationError::UnresolvableType {
                requested: "map<_, _>".to_string(),
            }),
        }
    }
}

impl Default for MapGenerator {
    fn default() -> MapGenerator {
        MapGenerator::new()
    }
}

impl Generator for MapGenerator {
    fn name(&self) -> &str {
        "map"
    }

    fn signature(&self) -> GeneratorSignature {
        GeneratorSignature::generic("map", 2)
    }

    fn clone_box(&self) -> Box<dyn Generator> {
        Box::new(self.clone())
    }

    fn configure(&mut self, constraints: &ConstraintSet) -> Result<(), GenerationError> {
        if let Some(mean) = constraints.size_mean() {
            self.mean_count = mean;
        }
        Ok(())
    }

    fn set_components(&mut self, components: Vec<Box<dyn Generator>>) {
        let mut iter = components.into_iter();
        self.keys = iter.next();
        self.values = iter.next();
    }

    fn produce(
        &self,
        source: &mut RandomSource,
        status: &mut GenerationStatus<'_>,
    ) -> Result<Value, GenerationError> {
        let (keys, values) = self.components()?;
        status.note_produced();
        let count = sample_count(&self.distribution, self.mean_count, source, status);
        let mut entries: Vec<(Value, Value)> = Vec::with_capacity(count);
        status.descend(|status| -> Result<(), GenerationError> {
            for _ in 0..count {
                let mut key_source = source.split();
                let key = keys.produce(&mut key_source, status)?;
                let mut value_source = source.split();
                let value = values.produce(&mut value_source, status)?;
                // Colliding keys are dropped rather than overwritten, so
                // the entry count never exceeds the sampled count.
                if entries.iter().all(|(existing, _)| *existing != key) {
                    entries.push((key, value));
                }
            }
            Ok(())
        })?;
        Ok(Value::Pairs(entries))
    }

    fn shrink(&self, value: &Value) -> ShrinkSequence {
        match value {
            Value::Pairs(entries) => {
                Box::new(SequenceShrinker::new(entries.clone()).map(Value::Pairs))
            }
            _ => Box::new(std::iter::empty()),
        }
    }
}

fn sample_count(
    distribution: &Geometric,
    mean: f64,
    source: &mut RandomSource,
    status: &GenerationStatus<'_>,
) -> usize {
    if status.at_depth_limit() {
        return 0;
    }
    distribution
        .sample_with_mean(status.scaled_mean(mean), source)
        .min(status.remaining() as usize)
}
