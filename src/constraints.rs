// Constraint directives attached to one generation request.
//
// A ConstraintSet is assembled once by the host's metadata collaborator
// and passed immutably into resolution; the engine never reads
// annotations or reflection metadata itself.

use crate::errors::GenerationError;
use crate::values::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Textual range bounds. Bounds are parsed by the generator selected
/// for the request: numeric generators via `FromStr`, temporal
/// generators via the strftime `format` pattern. A missing bound
/// degrades to the type's natural extreme.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RangeSpec {
    pub min: Option<String>,
    pub max: Option<String>,
    pub format: Option<String>,
}

impl RangeSpec {
    pub fn between(min: &str, max: &str) -> RangeSpec {
        RangeSpec {
            min: Some(min.to_string()),
            max: Some(max.to_string()),
            format: None,
        }
    }

    pub fn at_least(min: &str) -> RangeSpec {
        RangeSpec {
            min: Some(min.to_string()),
            max: None,
            format: None,
        }
    }

    pub fn at_most(max: &str) -> RangeSpec {
        RangeSpec {
            min: None,
            max: Some(max.to_string()),
            format: None,
        }
    }

    pub fn with_format(mut self, format: &str) -> RangeSpec {
        self.format = Some(format.to_string());
        self
    }
}

/// Post-generation filter. Values rejected by the predicate count
/// toward the discard ratio.
pub type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

#[derive(Clone, Default)]
pub struct ConstraintSet {
    range: Option<RangeSpec>,
    filter: Option<Predicate>,
    discard_ratio: Option<i32>,
    explicit: Vec<String>,
    size_mean: Option<f64>,
}

impl ConstraintSet {
    pub fn new() -> ConstraintSet {
        ConstraintSet::default()
    }

    pub fn with_range(mut self, range: RangeSpec) -> ConstraintSet {
        self.range = Some(range);
        self
    }

    pub fn with_filter<F>(mut self, filter: F) -> ConstraintSet
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(filter));
        self
    }

    /// Negative means never succeed; zero means derive the ceiling from
    /// the configured trial count.
    pub fn with_discard_ratio(mut self, ratio: i32) -> ConstraintSet {
        self.discard_ratio = Some(ratio);
        self
    }

    /// Force specific generator implementations, by name, in preference
    /// order.
    pub fn with_explicit_generators(mut self, names: &[&str]) -> ConstraintSet {
        self.explicit = names.iter().map(|n| n.to_string()).collect();
        self
    }

    /// Requested mean element count for container shapes.
    pub fn with_size_mean(mut self, mean: f64) -> ConstraintSet {
        self.size_mean = Some(mean);
        self
    }

    pub fn range(&self) -> Option<&RangeSpec> {
        self.range.as_ref()
    }

    pub fn filter(&self) -> Option<&Predicate> {
        self.filter.as_ref()
    }

    pub fn discard_ratio(&self) -> Option<i32> {
        self.discard_ratio
    }

    pub fn explicit_generators(&self) -> &[String] {
        &self.explicit
    }

    pub fn size_mean(&self) -> Option<f64> {
        self.size_mean
    }

    /// Constraint view handed to component generators of a composed
    /// shape. Range and size directives flow down so that, e.g., the
    /// elements of a ranged collection respect the bounds; filter,
    /// discard and explicit-generator directives stay with the outer
    /// request.
    pub fn for_components(&self) -> ConstraintSet {
        ConstraintSet {
            range: self.range.clone(),
            filter: None,
            discard_ratio: None,
            explicit: Vec::new(),
            size_mean: self.size_mean,
        }
    }
}

impl fmt::Debug for ConstraintSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstraintSet")
            .field("range", &self.range)
            .field("filter", &self.filter.as_ref().map(|_| "<predicate>"))
            .field("discard_ratio", &self.discard_ratio)
            .field("explicit", &self.explicit)
            .field("size_mean", &self.size_mean)
            .finish()
    }
}

/// Parse a numeric bound with `FromStr`, surfacing failures as a
/// parameter-scoped parse error.
pub(crate) fn parse_bound<T: FromStr>(text: &str, expected: &str) -> Result<T, GenerationError> {
    text.trim()
        .parse()
        .map_err(|_| GenerationError::parse(text, expected))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_view_keeps_range_and_drops_filter() {
        let constraints = ConstraintSet::new()
            .with_range(RangeSpec::between("0", "9"))
            .with_filter(|v| v.as_int() != Some(5))
            .with_discard_ratio(3)
            .with_explicit_generators(&["alt"])
            .with_size_mean(2.0);
        let component = constraints.for_components();
        assert_eq!(component.range(), constraints.range());
        assert_eq!(component.size_mean(), Some(2.0));
        assert!(component.filter().is_none());
        assert_eq!(component.discard_ratio(), None);
        assert!(component.explicit_generators().is_empty());
    }

    #[test]
    fn bound_parsing_reports_the_offending_text() {
        let err = parse_bound::<i64>("@#!@#@", "i64").unwrap_err();
        match err {
            GenerationError::Parse { text, expected } => {
                assert_eq!(text, "@#!@#@");
                assert_eq!(expected, "i64");
            }
            other => panic!("expected Parse, got {:?}", other),
        }
    }
}
