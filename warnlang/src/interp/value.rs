//! Runtime values for the interpreter

use std::fmt;

use crate::ast::{Span, Width};
use crate::types::Scalar;

/// Runtime value: a scalar tagged with where it came from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Value {
    pub scalar: Scalar,
    pub span: Span,
}

impl Value {
    pub fn new(scalar: Scalar, span: Span) -> Self {
        Value { scalar, span }
    }

    /// The `u8(0)` sentinel produced by an if-chain with no taken branch
    pub fn null(span: Span) -> Self {
        Value::new(Scalar::U8(0), span)
    }

    /// Width tag
    pub fn width(&self) -> Width {
        self.scalar.width()
    }

    /// Check if value is truthy
    pub fn is_truthy(&self) -> bool {
        self.scalar.is_truthy()
    }

    /// Same value, reported at another location
    pub fn with_span(self, span: Span) -> Self {
        Value { span, ..self }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.width(), self.scalar)
    }
}

/// Result of evaluating one statement
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Value(Value),
    /// Results of the statements of a block, in order
    Sequence(Vec<Output>),
    /// Statements that produce nothing (declarations, loops, updates)
    Empty,
}

impl Output {
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Output::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Last value produced, looking through sequences
    pub fn last_value(&self) -> Option<&Value> {
        match self {
            Output::Value(v) => Some(v),
            Output::Sequence(items) => items.iter().rev().find_map(Output::last_value),
            Output::Empty => None,
        }
    }
}

impl From<Value> for Output {
    fn from(value: Value) -> Self {
        Output::Value(value)
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Value(v) => write!(f, "{v}"),
            Output::Sequence(items) => {
                write!(f, "[")?;
                let shown = items.iter().filter(|item| **item != Output::Empty);
                for (i, item) in shown.enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Output::Empty => Ok(()),
        }
    }
}
