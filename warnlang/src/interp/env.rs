//! Scopes for variable bindings

use std::collections::HashMap;

use super::error::Frame;
use super::Value;
use crate::ast::Span;
use crate::types::Scalar;

/// Names seeded into every root scope, with their values
const PREDEFINED: [(&str, Scalar); 6] = [
    ("null", Scalar::U8(0)),
    ("mid", Scalar::U8(0)),
    ("false", Scalar::U8(0)),
    ("cap", Scalar::U8(0)),
    ("true", Scalar::U8(1)),
    ("nocap", Scalar::U8(1)),
];

/// A bound value and whether it may change
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Binding {
    pub value: Value,
    pub is_const: bool,
}

/// Scope holding variable bindings.
///
/// Reads walk the parent chain; writes only touch this scope.
#[derive(Debug)]
pub struct Scope<'p> {
    /// Context name shown in tracebacks
    name: String,
    bindings: HashMap<String, Binding>,
    parent: Option<&'p Scope<'p>>,
    /// Where the parent was when this scope was entered
    entry_span: Option<Span>,
}

impl Scope<'static> {
    /// Create a root scope seeded with the predefined names
    pub fn root(name: impl Into<String>) -> Self {
        let mut scope = Scope {
            name: name.into(),
            bindings: HashMap::new(),
            parent: None,
            entry_span: None,
        };
        for (ident, scalar) in PREDEFINED {
            scope.define(ident, Value::new(scalar, Span::new(0, 0)), false);
        }
        scope
    }
}

impl<'p> Scope<'p> {
    /// Create a nested scope entered at `entry_span` of `parent`
    pub fn child(parent: &'p Scope<'p>, name: impl Into<String>, entry_span: Span) -> Self {
        Scope {
            name: name.into(),
            bindings: HashMap::new(),
            parent: Some(parent),
            entry_span: Some(entry_span),
        }
    }

    /// Look up a binding in the scope chain
    pub fn get(&self, name: &str) -> Option<&Binding> {
        match self.bindings.get(name) {
            Some(binding) => Some(binding),
            None => self.parent.and_then(|parent| parent.get(name)),
        }
    }

    /// Bind a name in this scope, replacing any earlier binding here
    pub fn define(&mut self, name: &str, value: Value, is_const: bool) {
        self.bindings
            .insert(name.to_string(), Binding { value, is_const });
    }

    /// Whether `name` is bound const in this scope (parents are not consulted)
    pub fn is_const_here(&self, name: &str) -> bool {
        self.bindings.get(name).is_some_and(|b| b.is_const)
    }

    /// Frames from the root down to this scope, this scope at `span`
    pub fn traceback(&self, span: Span) -> Vec<Frame> {
        let mut frames = Vec::new();
        let mut scope = Some(self);
        let mut at = span;
        while let Some(current) = scope {
            frames.push(Frame {
                context: current.name.clone(),
                span: at,
            });
            at = current.entry_span.unwrap_or(at);
            scope = current.parent;
        }
        frames.reverse();
        frames
    }

    /// Bindings of this scope only, sorted by name
    pub fn bindings(&self) -> Vec<(&str, &Binding)> {
        let mut list: Vec<_> = self
            .bindings
            .iter()
            .map(|(name, binding)| (name.as_str(), binding))
            .collect();
        list.sort_by(|a, b| a.0.cmp(b.0));
        list
    }

    /// Drop every binding and reseed the predefined names
    pub fn reset(&mut self) {
        self.bindings.clear();
        if self.parent.is_none() {
            for (ident, scalar) in PREDEFINED {
                self.define(ident, Value::new(scalar, Span::new(0, 0)), false);
            }
        }
    }
}
