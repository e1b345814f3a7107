//! Expression evaluator

use super::env::Scope;
use super::error::{InterpResult, RuntimeError};
use super::value::{Output, Value};
use crate::ast::{BinOp, Domain, Expr, IfCase, Program, Span, Spanned, UnOp, UpdateOp, Width};
use crate::types::{self, Scalar};
use crate::{STACK_GROW_SIZE, STACK_RED_ZONE};

/// The interpreter
#[derive(Debug, Default)]
pub struct Interpreter {
    /// Loop iterations executed so far
    iterations: u64,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total loop iterations run by this interpreter
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Run every top-level statement in order, stopping at the first error
    pub fn run_program(&mut self, program: &Program, scope: &mut Scope<'_>) -> InterpResult<Vec<Output>> {
        let outputs = program
            .stmts
            .iter()
            .map(|stmt| self.eval(stmt, scope))
            .collect::<InterpResult<Vec<_>>>()?;
        tracing::debug!(
            statements = outputs.len(),
            iterations = self.iterations,
            "program finished"
        );
        Ok(outputs)
    }

    /// Evaluate a node with automatic stack growth for deep nesting
    pub fn eval(&mut self, node: &Spanned<Expr>, scope: &mut Scope<'_>) -> InterpResult<Output> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.eval_inner(node, scope))
            .map_err(|err| err.with_traceback(|span| scope.traceback(span)))
    }

    /// Evaluate a node that must produce a value
    fn value(&mut self, node: &Spanned<Expr>, scope: &mut Scope<'_>) -> InterpResult<Value> {
        match self.eval(node, scope)? {
            Output::Value(v) => Ok(v),
            Output::Sequence(_) | Output::Empty => {
                Err(RuntimeError::unsupported("a statement used as a value", node.span))
            }
        }
    }

    fn eval_inner(&mut self, node: &Spanned<Expr>, scope: &mut Scope<'_>) -> InterpResult<Output> {
        let span = node.span;
        match &node.node {
            Expr::Number(lit) => match lit.resolve() {
                Some(scalar) => Ok(Value::new(scalar, span).into()),
                None => Err(RuntimeError::out_of_range(lit.raw, lit.effective_width(), span)),
            },

            Expr::Var(name) => scope
                .get(name)
                .map(|binding| binding.value.with_span(span).into())
                .ok_or_else(|| RuntimeError::undefined_identifier(name, span)),

            Expr::Bind {
                name,
                is_const,
                value,
                ..
            } => {
                let v = self.value(value, scope)?;
                if scope.is_const_here(&name.node) {
                    return Err(RuntimeError::const_redefinition(&name.node, name.span));
                }
                scope.define(&name.node, v, *is_const);
                Ok(Output::Empty)
            }

            Expr::Increment { target, prefix } => self.step(target, 1, *prefix, span, scope),
            Expr::Decrement { target, prefix } => self.step(target, -1, *prefix, span, scope),

            Expr::Update { op, target, amount } => {
                self.update(*op, target, amount, span, scope)?;
                Ok(Output::Empty)
            }

            Expr::Binary { left, op, right } => {
                let l = self.value(left, scope)?;
                let r = self.value(right, scope)?;
                eval_binary(*op, l, r, span).map(Output::from)
            }

            Expr::Unary { op, expr } => {
                let v = self.value(expr, scope)?;
                eval_unary(*op, v, span).map(Output::from)
            }

            Expr::If { cases, else_branch } => self.eval_if(cases, else_branch.as_deref(), span, scope),

            Expr::While { cond, body } => {
                while self.value(cond, scope)?.is_truthy() {
                    self.iterations += 1;
                    self.eval(body, scope)?;
                }
                Ok(Output::Empty)
            }

            Expr::For {
                var,
                start,
                end,
                step,
                body,
            } => {
                let start = self.value(start, scope)?;
                let end = self.value(end, scope)?;
                let step = match step {
                    Some(step) => self.value(step, scope)?.scalar,
                    None => Scalar::I64(1),
                };
                if scope.is_const_here(&var.node) {
                    return Err(RuntimeError::const_redefinition(&var.node, var.span));
                }

                let ascending = step.as_f64() >= 0.0;
                let mut counter = LoopCounter::new(start.scalar, step);
                tracing::trace!(var = %var.node, ?counter, %end, ascending, "for loop");
                while counter.before(end.scalar, ascending) {
                    let Some(bound) = counter.advance() else {
                        break;
                    };
                    self.iterations += 1;
                    scope.define(&var.node, Value::new(Scalar::I64(bound), var.span), false);
                    self.eval(body, scope)?;
                }
                Ok(Output::Empty)
            }

            Expr::Range { .. } => Err(RuntimeError::unsupported(
                "a range outside of a `for` header",
                span,
            )),

            Expr::Block(stmts) => stmts
                .iter()
                .map(|stmt| self.eval(stmt, scope))
                .collect::<InterpResult<Vec<_>>>()
                .map(Output::Sequence),
        }
    }

    /// `++`/`--`; the stored result is always an `i64`
    fn step(
        &mut self,
        target: &Spanned<String>,
        delta: i64,
        prefix: bool,
        span: Span,
        scope: &mut Scope<'_>,
    ) -> InterpResult<Output> {
        let binding = *scope
            .get(&target.node)
            .ok_or_else(|| RuntimeError::undefined_identifier(&target.node, target.span))?;
        if binding.is_const {
            let operation = if delta > 0 { "increment" } else { "decrement" };
            return Err(RuntimeError::const_mutation(operation, span));
        }

        let old = binding.value.with_span(span);
        let stepped = match old.scalar.domain() {
            Domain::Integral => old.scalar.as_i64().wrapping_add(delta),
            Domain::Floating => (old.scalar.as_f64() + delta as f64) as i64,
        };
        let new = Value::new(Scalar::I64(stepped), span);
        scope.define(&target.node, new, false);
        let result = if prefix { new } else { old };
        Ok(result.into())
    }

    /// `incr|decr|mult|div <target> by <amount>`, keeping the target's width
    fn update(
        &mut self,
        op: UpdateOp,
        target: &Spanned<String>,
        amount: &Spanned<Expr>,
        span: Span,
        scope: &mut Scope<'_>,
    ) -> InterpResult<()> {
        let binding = *scope
            .get(&target.node)
            .ok_or_else(|| RuntimeError::undefined_identifier(&target.node, target.span))?;
        if binding.is_const {
            return Err(RuntimeError::const_mutation(op.describe(), span));
        }

        let amount = self.value(amount, scope)?;
        let current = binding.value;
        let result = eval_binary(op.bin_op(), current, amount, span)?;
        let rewrapped = Value::new(result.scalar.cast(current.width()), span);
        scope.define(&target.node, rewrapped, false);
        Ok(())
    }

    fn eval_if(
        &mut self,
        cases: &[IfCase],
        else_branch: Option<&Spanned<Expr>>,
        span: Span,
        scope: &mut Scope<'_>,
    ) -> InterpResult<Output> {
        for case in cases {
            if self.value(&case.cond, scope)?.is_truthy() {
                return self.eval(&case.body, scope);
            }
        }
        match else_branch {
            Some(body) => self.eval(body, scope),
            None => Ok(Value::null(span).into()),
        }
    }
}

/// For-loop counter.
///
/// Integral starts and steps count in `i64`. A float start or step counts in
/// `f64`, and the loop variable gets the truncated value.
#[derive(Debug, Clone, Copy, PartialEq)]
enum LoopCounter {
    Integral { at: i64, step: i64 },
    Floating { at: f64, step: f64 },
}

impl LoopCounter {
    fn new(start: Scalar, step: Scalar) -> Self {
        match (start.domain(), step.domain()) {
            (Domain::Integral, Domain::Integral) => LoopCounter::Integral {
                at: start.as_i64(),
                step: step.as_i64(),
            },
            _ => LoopCounter::Floating {
                at: start.as_f64(),
                step: step.as_f64(),
            },
        }
    }

    /// Loop guard; the direction is fixed by the sign of the step
    fn before(self, end: Scalar, ascending: bool) -> bool {
        match (self, end.domain()) {
            (LoopCounter::Integral { at, .. }, Domain::Integral) => {
                let (at, end) = (at as i128, end.as_i128());
                if ascending { at < end } else { at > end }
            }
            (LoopCounter::Integral { at, .. }, Domain::Floating) => {
                let (at, end) = (at as f64, end.as_f64());
                if ascending { at < end } else { at > end }
            }
            (LoopCounter::Floating { at, .. }, _) => {
                let end = end.as_f64();
                if ascending { at < end } else { at > end }
            }
        }
    }

    /// Step once and return the value to bind; `None` on `i64` overflow
    fn advance(&mut self) -> Option<i64> {
        match self {
            LoopCounter::Integral { at, step } => {
                *at = at.checked_add(*step)?;
                Some(*at)
            }
            LoopCounter::Floating { at, step } => {
                *at += *step;
                Some(Scalar::from_f64(Width::I64, *at).as_i64())
            }
        }
    }
}

fn eval_unary(op: UnOp, v: Value, span: Span) -> InterpResult<Value> {
    match op {
        UnOp::Neg => {
            let minus_one = Value::new(Scalar::I16(-1), span);
            eval_binary(BinOp::Mul, v, minus_one, span)
        }
        UnOp::Plus => Ok(v.with_span(span)),
        UnOp::Not => {
            let flag = i128::from(!v.is_truthy());
            Ok(Value::new(Scalar::from_i128(v.width(), flag), span))
        }
    }
}

/// Apply a binary operator in the promoted width of its operands.
///
/// Both operands are already evaluated; `&&` and `||` select one of them
/// and re-wrap it in the promoted width.
pub fn eval_binary(op: BinOp, a: Value, b: Value, span: Span) -> InterpResult<Value> {
    let width = types::promote(a.width(), b.width());

    if op == BinOp::Div && b.scalar.is_zero() {
        return Err(RuntimeError::division_by_zero(b.span));
    }

    let scalar = match width.domain() {
        Domain::Integral => {
            let (x, y) = (a.scalar.as_i128(), b.scalar.as_i128());
            let r = match op {
                BinOp::Add => x.wrapping_add(y),
                BinOp::Sub => x.wrapping_sub(y),
                BinOp::Mul => x.wrapping_mul(y),
                BinOp::Div => x.wrapping_div(y),
                BinOp::Pow if y < 0 => {
                    return Ok(Value::new(
                        Scalar::from_f64(width, (x as f64).powf(y as f64)),
                        span,
                    ));
                }
                BinOp::Pow => wrapping_pow(x, y as u128),
                BinOp::Eq => i128::from(x == y),
                BinOp::Ne => i128::from(x != y),
                BinOp::Lt => i128::from(x < y),
                BinOp::Gt => i128::from(x > y),
                BinOp::Le => i128::from(x <= y),
                BinOp::Ge => i128::from(x >= y),
                BinOp::And => if x != 0 { y } else { x },
                BinOp::Or => if x != 0 { x } else { y },
            };
            Scalar::from_i128(width, r)
        }
        Domain::Floating => {
            let (x, y) = (a.scalar.as_f64(), b.scalar.as_f64());
            let r = match op {
                BinOp::Add => x + y,
                BinOp::Sub => x - y,
                BinOp::Mul => x * y,
                BinOp::Div => x / y,
                BinOp::Pow => x.powf(y),
                BinOp::Eq => f64::from(u8::from(x == y)),
                BinOp::Ne => f64::from(u8::from(x != y)),
                BinOp::Lt => f64::from(u8::from(x < y)),
                BinOp::Gt => f64::from(u8::from(x > y)),
                BinOp::Le => f64::from(u8::from(x <= y)),
                BinOp::Ge => f64::from(u8::from(x >= y)),
                BinOp::And => if x != 0.0 { y } else { x },
                BinOp::Or => if x != 0.0 { x } else { y },
            };
            Scalar::from_f64(width, r)
        }
    };
    Ok(Value::new(scalar, span))
}

/// Exponentiation by squaring, wrapping modulo 2^128
fn wrapping_pow(mut base: i128, mut exp: u128) -> i128 {
    let mut acc: i128 = 1;
    while exp > 0 {
        if exp & 1 == 1 {
            acc = acc.wrapping_mul(base);
        }
        base = base.wrapping_mul(base);
        exp >>= 1;
    }
    acc
}
