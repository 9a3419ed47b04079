// Structural type descriptors for generation requests.
//
// Built once per call site by the host's metadata collaborator;
// immutable afterwards. The raw shape is a type name, generic types
// carry their argument descriptors recursively in declaration order.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestedType {
    name: String,
    args: Vec<RequestedType>,
}

impl RequestedType {
    pub fn scalar(name: impl Into<String>) -> RequestedType {
        RequestedType {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn generic(name: impl Into<String>, args: Vec<RequestedType>) -> RequestedType {
        RequestedType {
            name: name.into(),
            args,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[RequestedType] {
        &self.args
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }
}

impl fmt::Display for RequestedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.args.is_empty() {
            write!(f, "<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", arg)?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}
