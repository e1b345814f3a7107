//! warning-lang interpreter library
//!
//! A small statement language over fixed-width integers and floats, run by a
//! four-stage pipeline: scan, parse, check ranges, evaluate.

pub mod ast;
pub mod error;
pub mod interp;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod types;

pub use ast::Span;
pub use error::{Diagnostic, Error, Result};
pub use interp::{Output, Scope, Value};

use interp::Interpreter;

/// Context name of the outermost scope, shown in tracebacks
pub const PROGRAM_CONTEXT: &str = "<program>";

/// Stack growth parameters for deeply nested programs
pub(crate) const STACK_RED_ZONE: usize = 128 * 1024; // 128KB remaining triggers growth
pub(crate) const STACK_GROW_SIZE: usize = 4 * 1024 * 1024; // Grow by 4MB each time

/// Outputs of every top-level statement, or the first error
pub type PipelineResult = std::result::Result<Vec<Output>, Diagnostic>;

/// Scan, parse and evaluate `source` in a fresh root scope
#[tracing::instrument(level = "debug", skip(source))]
pub fn run(source_name: &str, source: &str) -> PipelineResult {
    let mut scope = Scope::root(PROGRAM_CONTEXT);
    execute(source, &mut scope, &mut Interpreter::new())
        .map_err(|err| Diagnostic::new(err, source_name, source))
}

fn execute(source: &str, scope: &mut Scope<'_>, interpreter: &mut Interpreter) -> Result<Vec<Output>> {
    let tokens = lexer::tokenize(source)?;
    let program = parser::parse(&tokens)?;
    Ok(interpreter.run_program(&program, scope)?)
}

/// Runs successive inputs against one persistent root scope
#[derive(Debug)]
pub struct Session {
    scope: Scope<'static>,
    interpreter: Interpreter,
}

impl Session {
    pub fn new() -> Self {
        Session {
            scope: Scope::root(PROGRAM_CONTEXT),
            interpreter: Interpreter::new(),
        }
    }

    /// Run one input; bindings made by earlier inputs stay visible.
    ///
    /// A failing input keeps whatever bindings it made before the error.
    pub fn run_line(&mut self, source_name: &str, source: &str) -> PipelineResult {
        execute(source, &mut self.scope, &mut self.interpreter)
            .map_err(|err| Diagnostic::new(err, source_name, source))
    }

    pub fn scope(&self) -> &Scope<'static> {
        &self.scope
    }

    /// Forget every binding made so far
    pub fn reset(&mut self) {
        self.scope.reset();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
