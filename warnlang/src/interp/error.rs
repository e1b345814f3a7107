//! Runtime errors for the interpreter

use std::fmt;

use crate::ast::{Span, Width};

/// Runtime error during interpretation
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub message: String,
    pub span: Span,
    /// Enclosing contexts, outermost first; empty until the error leaves
    /// the scope it was raised in
    pub traceback: Vec<Frame>,
}

/// Kinds of runtime errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Identifier not bound in any enclosing scope
    UndefinedIdentifier,
    /// Literal does not fit its declared width
    OutOfRange,
    /// Write to a const binding
    ConstReassignment,
    /// Division by zero
    DivisionByZero,
    /// Node the evaluator has no rule for
    UnsupportedOperation,
}

impl ErrorKind {
    /// Diagnostic heading for this kind
    pub fn category(self) -> &'static str {
        match self {
            ErrorKind::OutOfRange => "Variable Size Error",
            ErrorKind::ConstReassignment => "Reassigning Constant Error",
            ErrorKind::UndefinedIdentifier
            | ErrorKind::DivisionByZero
            | ErrorKind::UnsupportedOperation => "Runtime Error",
        }
    }
}

/// One traceback line: the context and where execution was inside it
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub context: String,
    pub span: Span,
}

impl RuntimeError {
    fn new(kind: ErrorKind, message: String, span: Span) -> Self {
        RuntimeError {
            kind,
            message,
            span,
            traceback: Vec::new(),
        }
    }

    pub fn undefined_identifier(name: &str, span: Span) -> Self {
        Self::new(
            ErrorKind::UndefinedIdentifier,
            format!("`{name}` is not defined"),
            span,
        )
    }

    pub fn out_of_range(literal: impl fmt::Display, width: Width, span: Span) -> Self {
        Self::new(
            ErrorKind::OutOfRange,
            format!("`{literal}` does not fit in `{width}`"),
            span,
        )
    }

    pub fn const_redefinition(name: &str, span: Span) -> Self {
        Self::new(
            ErrorKind::ConstReassignment,
            format!("`{name}` is already defined as const"),
            span,
        )
    }

    /// Mutation of a const binding; `operation` names what was attempted
    pub fn const_mutation(operation: &str, span: Span) -> Self {
        Self::new(
            ErrorKind::ConstReassignment,
            format!("Cannot perform {operation} operation on a constant variable"),
            span,
        )
    }

    pub fn division_by_zero(span: Span) -> Self {
        Self::new(ErrorKind::DivisionByZero, "Division by zero".to_string(), span)
    }

    pub fn unsupported(what: &str, span: Span) -> Self {
        Self::new(
            ErrorKind::UnsupportedOperation,
            format!("{what} is not supported here"),
            span,
        )
    }

    /// Attach a traceback unless an inner scope already did
    pub fn with_traceback(mut self, frames: impl FnOnce(Span) -> Vec<Frame>) -> Self {
        if self.traceback.is_empty() {
            self.traceback = frames(self.span);
        }
        self
    }

    pub fn category(&self) -> &'static str {
        self.kind.category()
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.category(), self.message)
    }
}

impl std::error::Error for RuntimeError {}

/// Result type for interpreter operations
pub type InterpResult<T> = Result<T, RuntimeError>;
