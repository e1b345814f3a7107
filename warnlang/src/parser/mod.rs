//! Recursive-descent parser

use crate::ast::{BinOp, Expr, IfCase, NumberLit, Program, Span, Spanned, UnOp, UpdateOp, Width};
use crate::error::{Error, Result};
use crate::lexer::Token;
use crate::{STACK_GROW_SIZE, STACK_RED_ZONE};


/// Message used when a comparison-level operand is missing entirely
const EXPECTED_OPERAND: &str =
    "Expected int, float, identifier, `+`, `-`, `++`, `--`, `!` or `(`";

static EOF: (Token, Span) = (Token::Eof, Span { start: 0, end: 0 });

/// Parse tokens into AST
#[tracing::instrument(level = "debug", skip_all, fields(tokens = tokens.len()))]
pub fn parse(tokens: &[(Token, Span)]) -> Result<Program> {
    let mut parser = Parser::new(tokens);
    let stmts = parser.statement_list(false)?;
    tracing::debug!(statements = stmts.len(), "parsed");
    Ok(Program { stmts })
}

struct Parser<'a> {
    tokens: &'a [(Token, Span)],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [(Token, Span)]) -> Self {
        Parser { tokens, pos: 0 }
    }

    // ====================================================================
    // Cursor
    // ====================================================================

    fn current(&self) -> &'a (Token, Span) {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .unwrap_or(&EOF)
    }

    fn peek(&self) -> &'a Token {
        &self.current().0
    }

    fn peek_nth(&self, n: usize) -> &'a Token {
        self.tokens.get(self.pos + n).map_or(&EOF.0, |(t, _)| t)
    }

    fn span(&self) -> Span {
        self.current().1
    }

    fn advance(&mut self) -> &'a (Token, Span) {
        let token = self.current();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn check(&self, token: &Token) -> bool {
        self.peek() == token
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &Token, message: &str) -> Result<Span> {
        if self.check(token) {
            Ok(self.advance().1)
        } else {
            Err(Error::syntax(message, self.span()))
        }
    }

    fn ident(&mut self, message: &str) -> Result<Spanned<String>> {
        match self.current() {
            (Token::Ident(name), span) => {
                self.advance();
                Ok(Spanned::new(name.clone(), *span))
            }
            (_, span) => Err(Error::syntax(message, *span)),
        }
    }

    // ====================================================================
    // Statements
    // ====================================================================

    fn statement_list(&mut self, in_block: bool) -> Result<Vec<Spanned<Expr>>> {
        let mut stmts = Vec::new();
        loop {
            match self.peek() {
                Token::Eof => break,
                Token::RBrace if in_block => break,
                Token::RBrace => {
                    return Err(Error::syntax(
                        "Unexpected `}` outside of a block",
                        self.span(),
                    ));
                }
                _ => {}
            }

            let stmt = self.statement()?;
            if stmt.node.is_block_terminated() {
                self.eat(&Token::Semi);
            } else if !self.eat(&Token::Semi) {
                return Err(Error::missing_terminator(stmt.span.after()));
            }
            stmts.push(stmt);
        }
        Ok(stmts)
    }

    fn statement(&mut self) -> Result<Spanned<Expr>> {
        match self.peek() {
            Token::If => self.if_chain(),
            Token::While => self.while_loop(),
            Token::For => self.for_loop(),
            Token::Incr | Token::Decr | Token::Mult | Token::Div => self.update(),
            Token::Ty(width) => self.declaration(*width),
            Token::Ident(_) if matches!(self.peek_nth(1), Token::PlusEq | Token::MinusEq) => {
                self.update_sugar()
            }
            _ => self.expr(),
        }
    }

    /// `<width> [const] <ident> = <expr>`
    fn declaration(&mut self, width: Width) -> Result<Spanned<Expr>> {
        let start = self.advance().1;
        let is_const = self.eat(&Token::Const);
        let name = self.ident("Expected identifier")?;
        self.expect(&Token::Eq, "Expected '='")?;
        let mut value = self.expr()?;
        annotate_width(&mut value.node, width);
        let span = start.merge(value.span);
        Ok(Spanned::new(
            Expr::Bind {
                name,
                width,
                is_const,
                value: Box::new(value),
            },
            span,
        ))
    }

    /// `incr|decr|mult|div <ident> by <expr>`
    fn update(&mut self) -> Result<Spanned<Expr>> {
        let (keyword, start) = self.advance();
        let op = match keyword {
            Token::Incr => UpdateOp::Incr,
            Token::Decr => UpdateOp::Decr,
            Token::Mult => UpdateOp::Mult,
            _ => UpdateOp::Div,
        };
        let target = self.ident("Expected identifier")?;
        self.expect(&Token::By, "Expected `by` keyword")?;
        let amount = self.expr()?;
        let span = start.merge(amount.span);
        Ok(Spanned::new(
            Expr::Update {
                op,
                target,
                amount: Box::new(amount),
            },
            span,
        ))
    }

    /// `<ident> += <expr>` / `<ident> -= <expr>`
    fn update_sugar(&mut self) -> Result<Spanned<Expr>> {
        let target = self.ident("Expected identifier")?;
        let op = match self.advance().0 {
            Token::PlusEq => UpdateOp::Incr,
            _ => UpdateOp::Decr,
        };
        let amount = self.expr()?;
        let span = target.span.merge(amount.span);
        Ok(Spanned::new(
            Expr::Update {
                op,
                target,
                amount: Box::new(amount),
            },
            span,
        ))
    }

    fn if_chain(&mut self) -> Result<Spanned<Expr>> {
        let start = self.advance().1;
        let mut cases = Vec::new();

        let cond = self.expr()?;
        let body = self.block()?;
        let mut end = body.span;
        cases.push(IfCase { cond, body });

        while self.eat(&Token::Elif) {
            let cond = self.expr()?;
            let body = self.block()?;
            end = body.span;
            cases.push(IfCase { cond, body });
        }

        let else_branch = if self.eat(&Token::Else) {
            let body = self.block()?;
            end = body.span;
            Some(Box::new(body))
        } else {
            None
        };

        Ok(Spanned::new(
            Expr::If { cases, else_branch },
            start.merge(end),
        ))
    }

    fn while_loop(&mut self) -> Result<Spanned<Expr>> {
        let start = self.advance().1;
        let cond = self.expr()?;
        let body = self.block()?;
        let span = start.merge(body.span);
        Ok(Spanned::new(
            Expr::While {
                cond: Box::new(cond),
                body: Box::new(body),
            },
            span,
        ))
    }

    /// `for <ident> in <start>...<end> [step <step>] { ... }`
    fn for_loop(&mut self) -> Result<Spanned<Expr>> {
        let start_span = self.advance().1;
        let var = self.ident("Expected identifier")?;
        self.expect(&Token::In, "Expected `in` keyword")?;
        let start = self.additive()?;
        self.expect(&Token::DotDotDot, "Expected `...`")?;
        let end = self.additive()?;
        let step = if self.eat(&Token::Step) {
            Some(Box::new(self.additive()?))
        } else {
            None
        };
        let body = self.block()?;
        let span = start_span.merge(body.span);
        Ok(Spanned::new(
            Expr::For {
                var,
                start: Box::new(start),
                end: Box::new(end),
                step,
                body: Box::new(body),
            },
            span,
        ))
    }

    fn block(&mut self) -> Result<Spanned<Expr>> {
        let open = self.expect(&Token::LBrace, "Expected `{`")?;
        let stmts = self.statement_list(true)?;
        let close = self.expect(&Token::RBrace, "Expected `}`")?;
        Ok(Spanned::new(Expr::Block(stmts), open.merge(close)))
    }

    // ====================================================================
    // Expressions, loosest to tightest
    // ====================================================================

    fn expr(&mut self) -> Result<Spanned<Expr>> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.logical())
    }

    fn logical(&mut self) -> Result<Spanned<Expr>> {
        let mut left = self.comparison()?;
        loop {
            let op = match self.peek() {
                Token::AndAnd => BinOp::And,
                Token::OrOr => BinOp::Or,
                _ => break,
            };
            self.advance();
            let right = self.comparison()?;
            left = binary(left, op, right);
        }
        Ok(left)
    }

    /// Comparisons; a failure before any token was consumed reports the
    /// generic missing-operand message
    fn comparison(&mut self) -> Result<Spanned<Expr>> {
        let start = self.pos;
        self.comparison_chain().map_err(|err| {
            if self.pos == start {
                Error::syntax(EXPECTED_OPERAND, err.span())
            } else {
                err
            }
        })
    }

    fn comparison_chain(&mut self) -> Result<Spanned<Expr>> {
        let mut left = self.range()?;
        loop {
            let op = match self.peek() {
                Token::EqEq => BinOp::Eq,
                Token::NotEq => BinOp::Ne,
                Token::Lt => BinOp::Lt,
                Token::LtEq => BinOp::Le,
                Token::Gt => BinOp::Gt,
                Token::GtEq => BinOp::Ge,
                _ => break,
            };
            self.advance();
            let right = self.range()?;
            left = binary(left, op, right);
        }
        Ok(left)
    }

    fn range(&mut self) -> Result<Spanned<Expr>> {
        let start = self.additive()?;
        if !self.eat(&Token::DotDotDot) {
            return Ok(start);
        }
        let end = self.additive()?;
        let span = start.span.merge(end.span);
        Ok(Spanned::new(
            Expr::Range {
                start: Box::new(start),
                end: Box::new(end),
            },
            span,
        ))
    }

    fn additive(&mut self) -> Result<Spanned<Expr>> {
        let mut left = self.multiplicative()?;
        loop {
            let op = match self.peek() {
                Token::Plus => BinOp::Add,
                Token::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.multiplicative()?;
            left = binary(left, op, right);
        }
        Ok(left)
    }

    fn multiplicative(&mut self) -> Result<Spanned<Expr>> {
        let mut left = self.power()?;
        loop {
            let op = match self.peek() {
                Token::Star => BinOp::Mul,
                Token::Slash => BinOp::Div,
                _ => break,
            };
            self.advance();
            let right = self.power()?;
            left = binary(left, op, right);
        }
        Ok(left)
    }

    /// `^` is right-associative
    fn power(&mut self) -> Result<Spanned<Expr>> {
        let base = self.unary()?;
        if !self.eat(&Token::Caret) {
            return Ok(base);
        }
        let exponent = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.power())?;
        Ok(binary(base, BinOp::Pow, exponent))
    }

    fn unary(&mut self) -> Result<Spanned<Expr>> {
        let op = match self.peek() {
            Token::Bang => UnOp::Not,
            Token::Minus => UnOp::Neg,
            Token::Plus => UnOp::Plus,
            Token::PlusPlus | Token::MinusMinus => return self.prefix_step(),
            _ => return self.primary(),
        };
        let start = self.advance().1;
        let operand = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.unary())?;
        let span = start.merge(operand.span);
        Ok(Spanned::new(
            Expr::Unary {
                op,
                expr: Box::new(operand),
            },
            span,
        ))
    }

    /// `++x` / `--x`
    fn prefix_step(&mut self) -> Result<Spanned<Expr>> {
        let (token, start) = self.advance();
        let increment = *token == Token::PlusPlus;
        let target = self.ident(if increment {
            "Expected identifier after `++`"
        } else {
            "Expected identifier after `--`"
        })?;
        let span = start.merge(target.span);
        let node = if increment {
            Expr::Increment { target, prefix: true }
        } else {
            Expr::Decrement { target, prefix: true }
        };
        Ok(Spanned::new(node, span))
    }

    fn primary(&mut self) -> Result<Spanned<Expr>> {
        let (token, span) = self.current();
        match token {
            Token::Number(raw) => {
                self.advance();
                Ok(Spanned::new(Expr::Number(NumberLit::new(*raw)), *span))
            }
            Token::Ident(name) => {
                self.advance();
                let target = Spanned::new(name.clone(), *span);
                match self.peek() {
                    Token::PlusPlus => {
                        let end = self.advance().1;
                        Ok(Spanned::new(
                            Expr::Increment { target, prefix: false },
                            span.merge(end),
                        ))
                    }
                    Token::MinusMinus => {
                        let end = self.advance().1;
                        Ok(Spanned::new(
                            Expr::Decrement { target, prefix: false },
                            span.merge(end),
                        ))
                    }
                    _ => Ok(Spanned::new(Expr::Var(name.clone()), *span)),
                }
            }
            Token::LParen => {
                self.advance();
                let inner = self.expr()?;
                let close = self.expect(&Token::RParen, "Expected ')'")?;
                Ok(Spanned::new(inner.node, span.merge(close)))
            }
            _ => Err(Error::syntax("Expected int, float or identifier", *span)),
        }
    }
}

fn binary(left: Spanned<Expr>, op: BinOp, right: Spanned<Expr>) -> Spanned<Expr> {
    let span = left.span.merge(right.span);
    Spanned::new(
        Expr::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        },
        span,
    )
}

/// A declaration's width applies to a bare literal or one under a unary op
fn annotate_width(value: &mut Expr, width: Width) {
    match value {
        Expr::Number(lit) => lit.width = Some(width),
        Expr::Unary { expr, .. } => {
            if let Expr::Number(lit) = &mut expr.node {
                lit.width = Some(width);
            }
        }
        _ => {}
    }
}
