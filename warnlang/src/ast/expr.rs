//! Expression AST nodes

use std::cell::OnceCell;

use super::{RawNumber, Spanned, Width};
use crate::types::{self, Scalar};
use serde::{Deserialize, Serialize};

/// Expression or statement node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Numeric literal
    Number(NumberLit),

    /// Variable reference
    Var(String),

    /// Typed declaration: `i32 [const] x = value`
    Bind {
        name: Spanned<String>,
        width: Width,
        is_const: bool,
        value: Box<Spanned<Expr>>,
    },

    /// Unary operation
    Unary {
        op: UnOp,
        expr: Box<Spanned<Expr>>,
    },

    /// Binary operation
    Binary {
        left: Box<Spanned<Expr>>,
        op: BinOp,
        right: Box<Spanned<Expr>>,
    },

    /// `++x` or `x++`
    Increment {
        target: Spanned<String>,
        prefix: bool,
    },

    /// `--x` or `x--`
    Decrement {
        target: Spanned<String>,
        prefix: bool,
    },

    /// Compound assignment: `incr x by amount`, `decr`, `mult`, `div`
    Update {
        op: UpdateOp,
        target: Spanned<String>,
        amount: Box<Spanned<Expr>>,
    },

    /// if / elif / else chain
    If {
        cases: Vec<IfCase>,
        else_branch: Option<Box<Spanned<Expr>>>,
    },

    /// while cond { body }
    While {
        cond: Box<Spanned<Expr>>,
        body: Box<Spanned<Expr>>,
    },

    /// for var in start...end [step step] { body }
    For {
        var: Spanned<String>,
        start: Box<Spanned<Expr>>,
        end: Box<Spanned<Expr>>,
        step: Option<Box<Spanned<Expr>>>,
        body: Box<Spanned<Expr>>,
    },

    /// `start...end` outside a for header
    Range {
        start: Box<Spanned<Expr>>,
        end: Box<Spanned<Expr>>,
    },

    /// Braced statement list
    Block(Vec<Spanned<Expr>>),
}

impl Expr {
    /// Statements that end in a block and need no `;`
    pub fn is_block_terminated(&self) -> bool {
        matches!(self, Expr::If { .. } | Expr::While { .. } | Expr::For { .. })
    }
}

/// One `if`/`elif` arm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfCase {
    pub cond: Spanned<Expr>,
    pub body: Spanned<Expr>,
}

/// Numeric literal node.
///
/// The range check and the cast to the literal's width happen the first time
/// the node is evaluated; the outcome is cached on the node so loop bodies
/// that revisit it never check or cast again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberLit {
    pub raw: RawNumber,
    /// Width back-annotated from an enclosing declaration
    pub width: Option<Width>,
    #[serde(skip)]
    resolved: OnceCell<Option<Scalar>>,
}

impl NumberLit {
    pub fn new(raw: RawNumber) -> Self {
        NumberLit {
            raw,
            width: None,
            resolved: OnceCell::new(),
        }
    }

    pub fn with_width(raw: RawNumber, width: Width) -> Self {
        NumberLit {
            width: Some(width),
            ..NumberLit::new(raw)
        }
    }

    /// Declared width, or the default for this kind of literal
    pub fn effective_width(&self) -> Width {
        self.width.unwrap_or_else(|| self.raw.default_width())
    }

    /// Range-checked, cast value; `None` when the literal does not fit
    pub fn resolve(&self) -> Option<Scalar> {
        *self.resolved.get_or_init(|| {
            let width = self.effective_width();
            let fits = types::is_value_in_range(width, self.raw);
            tracing::trace!(raw = %self.raw, %width, fits, "literal range check");
            fits.then(|| Scalar::from_raw(width, self.raw))
        })
    }

    /// Whether the one-time check has already run
    pub fn is_resolved(&self) -> bool {
        self.resolved.get().is_some()
    }
}

/// Binary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Pow,

    // Comparison
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,

    // Logical
    And,
    Or,
}

impl std::fmt::Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinOp::Add => write!(f, "+"),
            BinOp::Sub => write!(f, "-"),
            BinOp::Mul => write!(f, "*"),
            BinOp::Div => write!(f, "/"),
            BinOp::Pow => write!(f, "^"),
            BinOp::Eq => write!(f, "=="),
            BinOp::Ne => write!(f, "!="),
            BinOp::Lt => write!(f, "<"),
            BinOp::Gt => write!(f, ">"),
            BinOp::Le => write!(f, "<="),
            BinOp::Ge => write!(f, ">="),
            BinOp::And => write!(f, "&&"),
            BinOp::Or => write!(f, "||"),
        }
    }
}

/// Unary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnOp {
    /// Negation (-)
    Neg,
    /// Unary plus (+), a no-op
    Plus,
    /// Logical not (!)
    Not,
}

impl std::fmt::Display for UnOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnOp::Neg => write!(f, "-"),
            UnOp::Plus => write!(f, "+"),
            UnOp::Not => write!(f, "!"),
        }
    }
}

/// Compound assignment keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateOp {
    Incr,
    Decr,
    Mult,
    Div,
}

impl UpdateOp {
    /// Arithmetic the update performs
    pub fn bin_op(self) -> BinOp {
        match self {
            UpdateOp::Incr => BinOp::Add,
            UpdateOp::Decr => BinOp::Sub,
            UpdateOp::Mult => BinOp::Mul,
            UpdateOp::Div => BinOp::Div,
        }
    }

    /// Operation name used in diagnostics
    pub fn describe(self) -> &'static str {
        match self {
            UpdateOp::Incr => "increment by",
            UpdateOp::Decr => "decrement by",
            UpdateOp::Mult => "multiplication by",
            UpdateOp::Div => "division by",
        }
    }
}

impl std::fmt::Display for UpdateOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpdateOp::Incr => write!(f, "incr"),
            UpdateOp::Decr => write!(f, "decr"),
            UpdateOp::Mult => write!(f, "mult"),
            UpdateOp::Div => write!(f, "div"),
        }
    }
}
