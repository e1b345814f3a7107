//! Lexer implementation using logos

mod token;

pub use token::Token;

use crate::ast::Span;
use crate::error::{Error, Result};
use logos::Logos;

/// Tokenize source code.
///
/// The returned sequence always ends with [`Token::Eof`].
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn tokenize(source: &str) -> Result<Vec<(Token, Span)>> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);

    while let Some(result) = lexer.next() {
        let span = Span::from(lexer.span());
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(()) => return Err(lex_error(lexer.slice(), span)),
        }
    }

    tokens.push((Token::Eof, Span::new(source.len(), source.len())));
    tracing::debug!(count = tokens.len(), "tokenized");
    Ok(tokens)
}

fn lex_error(slice: &str, span: Span) -> Error {
    let Some(first) = slice.chars().next() else {
        return Error::illegal_char("unexpected end of input", span);
    };
    let first_span = Span::new(span.start, span.start + first.len_utf8());
    match first {
        '&' => Error::expected_char("Expected another `&`, use `&&` next time!", first_span),
        '|' => Error::expected_char("Expected another `|`, use `||` next time!", first_span),
        c => Error::illegal_char(format!("`{c}`"), first_span),
    }
}
