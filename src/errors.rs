// Error taxonomy for resolution and generation failures.
//
// Every variant is scoped to a single parameter's generation: an error
// aborts that property run and nothing else, since independent runs
// share no mutable state.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    /// Declared or parsed minimum exceeds the maximum. Never silently
    /// swapped.
    #[error("invalid range: minimum {min} exceeds maximum {max}")]
    InvalidRange { min: String, max: String },

    /// The range `format` pattern itself is malformed.
    #[error("malformed bound format {pattern:?}")]
    Format { pattern: String },

    /// A bound string does not conform to the expected textual form.
    #[error("cannot parse bound {text:?} as {expected}")]
    Parse { text: String, expected: String },

    /// No registered generator is compatible with the requested type.
    #[error("no generator can produce values of type {requested}")]
    UnresolvableType { requested: String },

    /// Constrained generation gave up before producing a single value.
    #[error("never found parameters ({discards} consecutive discards)")]
    DiscardExhausted { discards: u64 },
}

impl GenerationError {
    pub(crate) fn invalid_range(min: impl ToString, max: impl ToString) -> Self {
        GenerationError::InvalidRange {
            min: min.to_string(),
            max: max.to_string(),
        }
    }

    pub(crate) fn parse(text: &str, expected: &str) -> Self {
        GenerationError::Parse {
            text: text.to_string(),
            expected: expected.to_string(),
        }
    }
}
