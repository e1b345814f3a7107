//! Tree-walking interpreter

mod env;
mod error;
mod eval;
mod value;

pub use env::{Binding, Scope};
pub use error::{ErrorKind, Frame, InterpResult, RuntimeError};
pub use eval::{Interpreter, eval_binary};
pub use value::{Output, Value};
