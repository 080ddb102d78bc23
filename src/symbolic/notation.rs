//! # Loose notation
//!
//! Conversion between the informal notation typed by users (`2x^2+3`, `2sin(x)`, `(x+1)(x-1)`)
//! and the strict notation understood by the parser (`2*x**2+3`).
//!
//! - [`normalize`] makes implicit multiplication explicit, rewrites `^` as `**` and guarantees that
//!   the free variable occurs in the result by appending `*x**0` when it is absent, so that a
//!   constant formula is still a function of the variable.
//! - [`render`] goes the other way for display: `**` becomes `^` and every `*` is dropped.
//!   The result is for reading only and is not guaranteed to normalize back to the same expression
//!   (`2*3` renders as `23`).
use itertools::Itertools;
use log::{error, info};

use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::tokenizer::{Token, tokenize};

/// Name of the free variable when none is configured.
pub const DEFAULT_VARIABLE: &str = "x";

/// `prev next` pairs that are juxtaposed factors
fn needs_multiplication(prev: &Token, next: &Token) -> bool {
    match next {
        Token::Ident(_) | Token::Func(_) => matches!(prev, Token::Number(_) | Token::RParen),
        Token::LParen => matches!(
            prev,
            Token::Number(_) | Token::Ident(_) | Token::RParen
        ),
        _ => false,
    }
}

/// Inserts an explicit `*` between juxtaposed factors: `2x`, `)x`, `2sin(x)`, `2(`, `x(`, `)(`.
/// A function name followed by its bracket is left alone.
pub fn insert_implicit_multiplication(tokens: Vec<Token>) -> Vec<Token> {
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len() * 2);
    for token in tokens {
        if let Some(prev) = out.last() {
            if needs_multiplication(prev, &token) {
                out.push(Token::Star);
            }
        }
        out.push(token);
    }
    out
}

fn try_normalize(compact: &str, variable: &str) -> Result<String, String> {
    let tokens = insert_implicit_multiplication(tokenize(compact)?);
    let mut normalized = tokens
        .iter()
        .map(|token| match token {
            Token::Caret => "**".to_string(),
            other => other.to_string(),
        })
        .join("");
    let has_variable = tokens
        .iter()
        .any(|token| matches!(token, Token::Ident(name) if name == variable));
    if !has_variable {
        normalized.push_str(&format!("*{}**0", variable));
    }
    Ok(normalized)
}

/// Normalizes loose notation in the default variable `x`.
pub fn normalize(raw: &str) -> String {
    normalize_with(raw, DEFAULT_VARIABLE)
}

/// Normalizes loose notation in the given free variable. Never fails: if the input cannot be
/// tokenized the error is logged and the input is returned unchanged, leaving the parser to report it.
pub fn normalize_with(raw: &str, variable: &str) -> String {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    match try_normalize(&compact, variable) {
        Ok(normalized) => {
            info!("Input: {} -> Parsed: {}", compact, normalized);
            normalized
        }
        Err(e) => {
            error!("Error parsing expression '{}': {}", raw, e);
            raw.to_string()
        }
    }
}

/// Loose-notation form of a canonical expression string.
pub fn render_str(canonical: &str) -> String {
    canonical.replace("**", "^").replace('*', "")
}

/// Loose-notation form of an expression: `2*x` -> `2x`, `x**2/2` -> `x^2/2`.
pub fn render(expr: &Expr) -> String {
    render_str(&expr.to_string())
}
