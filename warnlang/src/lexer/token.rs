//! Token definitions

use logos::{Lexer, Logos};

use crate::ast::{RawNumber, Width};

/// warning-lang token
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")]
pub enum Token {
    // Width keywords
    #[token("i8", |_| Width::I8)]
    #[token("i16", |_| Width::I16)]
    #[token("i32", |_| Width::I32)]
    #[token("i64", |_| Width::I64)]
    #[token("u8", |_| Width::U8)]
    #[token("u16", |_| Width::U16)]
    #[token("u32", |_| Width::U32)]
    #[token("u64", |_| Width::U64)]
    #[token("f32", |_| Width::F32)]
    #[token("f64", |_| Width::F64)]
    Ty(Width),

    // Keywords, with their slang aliases
    #[token("const")]
    Const,
    #[token("if")]
    #[token("vibecheck")]
    If,
    #[token("elif")]
    #[token("also")]
    Elif,
    #[token("else")]
    #[token("idk")]
    Else,
    #[token("while")]
    #[token("rickroll")]
    While,
    #[token("for")]
    #[token("loopsy")]
    For,
    #[token("in")]
    In,
    #[token("step")]
    Step,
    #[token("incr")]
    Incr,
    #[token("decr")]
    Decr,
    #[token("mult")]
    Mult,
    #[token("div")]
    Div,
    #[token("by")]
    By,

    // Literals
    #[regex(r"[0-9]+", number)]
    Number(RawNumber),

    // Identifiers
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string(), priority = 1)]
    Ident(String),

    // Arithmetic
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("^")]
    Caret,

    // Increment / update
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,

    // Comparison
    #[token("=")]
    Eq,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,

    // Logical
    #[token("!")]
    Bang,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,

    // Delimiters
    #[token("...")]
    DotDotDot,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(";")]
    Semi,

    /// End of input, appended by [`crate::lexer::tokenize`]
    Eof,
}

/// Integer digits, plus a `.digits` fraction when one follows directly.
///
/// The fraction is taken by hand so that `0...5` still lexes as
/// `0`, `...`, `5`.
fn number(lex: &mut Lexer<Token>) -> Option<RawNumber> {
    let rest = lex.remainder();
    let fraction = match rest.strip_prefix('.') {
        Some(after) => after.bytes().take_while(u8::is_ascii_digit).count(),
        None => 0,
    };
    if fraction > 0 {
        lex.bump(1 + fraction);
        return lex.slice().parse::<f64>().ok().map(RawNumber::Float);
    }
    let digits = lex.slice();
    match digits.parse::<u64>() {
        Ok(n) => Some(RawNumber::Int(n)),
        Err(_) => digits.parse::<f64>().ok().map(RawNumber::Wide),
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Ty(width) => write!(f, "{width}"),
            Token::Const => write!(f, "const"),
            Token::If => write!(f, "if"),
            Token::Elif => write!(f, "elif"),
            Token::Else => write!(f, "else"),
            Token::While => write!(f, "while"),
            Token::For => write!(f, "for"),
            Token::In => write!(f, "in"),
            Token::Step => write!(f, "step"),
            Token::Incr => write!(f, "incr"),
            Token::Decr => write!(f, "decr"),
            Token::Mult => write!(f, "mult"),
            Token::Div => write!(f, "div"),
            Token::By => write!(f, "by"),
            Token::Number(n) => write!(f, "{n}"),
            Token::Ident(s) => write!(f, "{s}"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Caret => write!(f, "^"),
            Token::PlusPlus => write!(f, "++"),
            Token::MinusMinus => write!(f, "--"),
            Token::PlusEq => write!(f, "+="),
            Token::MinusEq => write!(f, "-="),
            Token::Eq => write!(f, "="),
            Token::EqEq => write!(f, "=="),
            Token::NotEq => write!(f, "!="),
            Token::Lt => write!(f, "<"),
            Token::LtEq => write!(f, "<="),
            Token::Gt => write!(f, ">"),
            Token::GtEq => write!(f, ">="),
            Token::Bang => write!(f, "!"),
            Token::AndAnd => write!(f, "&&"),
            Token::OrOr => write!(f, "||"),
            Token::DotDotDot => write!(f, "..."),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::Semi => write!(f, ";"),
            Token::Eof => write!(f, "end of input"),
        }
    }
}
