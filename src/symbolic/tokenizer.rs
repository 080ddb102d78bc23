//! # Tokenizer
//!
//! Splits an expression string into a typed token stream: numbers, identifiers,
//! function names, operators and parentheses. Both the notation normalizer and the
//! strict-notation parser work on this stream instead of on raw characters.
//!
//! ## Token classes
//! - `Number` - `12`, `3.5`, `.5`
//! - `Ident` - maximal run of letters, `_` and trailing digits (`x`, `pi`, `x2`, `sinx`)
//! - `Func` - a known function name immediately followed by `(` (`sin(`, `log(`)
//! - operators `+ - * / ^ **` and parentheses
//! - `Other` - any other character, passed through untouched
//!
//! A known function name that is NOT followed by `(` stays an `Ident`, so `sinx` is a single
//! identifier and `sin` alone is an unknown symbol for the parser.
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{anychar, char, digit0, digit1, multispace0},
    combinator::{map, opt, recognize, value},
    multi::many0,
    sequence::{pair, preceded},
};
use std::f64::consts::{E, PI};
use std::fmt;
use std::str::FromStr;
use strum_macros::{Display, EnumIter, EnumString};

use crate::symbolic::symbolic_engine::Expr;

/// Elementary functions understood by the engine. `Display` gives the canonical name,
/// `FromStr` accepts every alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
pub enum Func {
    #[strum(to_string = "exp")]
    Exp,
    #[strum(to_string = "log", serialize = "ln")]
    Ln,
    #[strum(to_string = "sqrt")]
    Sqrt,
    #[strum(to_string = "sin")]
    Sin,
    #[strum(to_string = "cos")]
    Cos,
    #[strum(to_string = "tan", serialize = "tg")]
    Tan,
    #[strum(to_string = "cot", serialize = "ctg")]
    Cot,
    #[strum(to_string = "asin", serialize = "arcsin")]
    Asin,
    #[strum(to_string = "acos", serialize = "arccos")]
    Acos,
    #[strum(to_string = "atan", serialize = "arctan", serialize = "arctg")]
    Atan,
    #[strum(to_string = "acot", serialize = "arccot", serialize = "arcctg")]
    Acot,
}

impl Func {
    /// wraps the argument into the matching expression node
    pub fn apply(self, arg: Expr) -> Expr {
        let arg = Box::new(arg);
        match self {
            Func::Exp => Expr::Exp(arg),
            Func::Ln => Expr::Ln(arg),
            Func::Sqrt => Expr::Pow(arg, Box::new(Expr::Const(0.5))),
            Func::Sin => Expr::sin(arg),
            Func::Cos => Expr::cos(arg),
            Func::Tan => Expr::tg(arg),
            Func::Cot => Expr::ctg(arg),
            Func::Asin => Expr::arcsin(arg),
            Func::Acos => Expr::arccos(arg),
            Func::Atan => Expr::arctg(arg),
            Func::Acot => Expr::arcctg(arg),
        }
    }
}

/// Named constants recognised by the parser.
pub fn named_constant(name: &str) -> Option<f64> {
    match name {
        "pi" => Some(PI),
        "E" => Some(E),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(String),
    Ident(String),
    /// function name, always followed by `LParen`
    Func(String),
    Plus,
    Minus,
    Star,
    Slash,
    /// loose power operator `^`
    Caret,
    /// strict power operator `**`
    Pow,
    LParen,
    RParen,
    Other(char),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::Number(s) | Token::Ident(s) | Token::Func(s) => write!(f, "{}", s),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Caret => write!(f, "^"),
            Token::Pow => write!(f, "**"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Other(c) => write!(f, "{}", c),
        }
    }
}

fn number(input: &str) -> IResult<&str, Token> {
    let digits_first = recognize(pair(digit1, opt(pair(char('.'), digit0))));
    let dot_first = recognize(pair(char('.'), digit1));
    map(alt((digits_first, dot_first)), |s: &str| {
        Token::Number(s.to_string())
    })
    .parse(input)
}

fn word(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_alphabetic() || c == '_'),
        take_while(|c: char| c.is_alphanumeric() || c == '_'),
    ))
    .parse(input)
}

fn identifier(input: &str) -> IResult<&str, Token> {
    let (rest, name) = word(input)?;
    let token = if rest.starts_with('(') && Func::from_str(name).is_ok() {
        Token::Func(name.to_string())
    } else {
        Token::Ident(name.to_string())
    };
    Ok((rest, token))
}

fn operator(input: &str) -> IResult<&str, Token> {
    alt((
        value(Token::Pow, tag("**")),
        value(Token::Star, char('*')),
        value(Token::Plus, char('+')),
        value(Token::Minus, char('-')),
        value(Token::Slash, char('/')),
        value(Token::Caret, char('^')),
        value(Token::LParen, char('(')),
        value(Token::RParen, char(')')),
    ))
    .parse(input)
}

fn token(input: &str) -> IResult<&str, Token> {
    alt((number, identifier, operator, map(anychar, Token::Other))).parse(input)
}

/// Tokenizes the whole input. Whitespace between tokens is skipped.
pub fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let mut parser = many0(preceded(multispace0, token));
    match parser.parse(input) {
        Ok((rest, tokens)) if rest.trim().is_empty() => Ok(tokens),
        Ok((rest, _)) => Err(format!("unexpected input left after tokenizing: '{}'", rest)),
        Err(e) => Err(format!("tokenizer failed on '{}': {:?}", input, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn ident(s: &str) -> Token {
        Token::Ident(s.to_string())
    }
    fn num(s: &str) -> Token {
        Token::Number(s.to_string())
    }

    #[test]
    fn test_tokenize_polynomial() {
        let tokens = tokenize("2x^2+3").unwrap();
        assert_eq!(
            tokens,
            vec![
                num("2"),
                ident("x"),
                Token::Caret,
                num("2"),
                Token::Plus,
                num("3")
            ]
        );
    }

    #[test]
    fn test_tokenize_strict_power() {
        let tokens = tokenize("x**2*3").unwrap();
        assert_eq!(
            tokens,
            vec![ident("x"), Token::Pow, num("2"), Token::Star, num("3")]
        );
    }

    #[test]
    fn test_function_needs_paren() {
        let tokens = tokenize("sin(x)").unwrap();
        assert_eq!(tokens[0], Token::Func("sin".to_string()));
        assert_eq!(tokens[1], Token::LParen);
        // without the bracket a function name is a plain identifier
        assert_eq!(tokenize("sinx").unwrap(), vec![ident("sinx")]);
        assert_eq!(tokenize("sin").unwrap(), vec![ident("sin")]);
    }

    #[test]
    fn test_unknown_name_before_paren_is_ident() {
        let tokens = tokenize("x(3)").unwrap();
        assert_eq!(tokens[0], ident("x"));
        assert_eq!(tokens[1], Token::LParen);
    }

    #[test]
    fn test_decimal_numbers() {
        assert_eq!(tokenize("3.25").unwrap(), vec![num("3.25")]);
        assert_eq!(tokenize(".5").unwrap(), vec![num(".5")]);
        assert_eq!(tokenize("2.").unwrap(), vec![num("2.")]);
    }

    #[test]
    fn test_identifier_with_digits() {
        assert_eq!(
            tokenize("2x3").unwrap(),
            vec![num("2"), ident("x3")]
        );
    }

    #[test]
    fn test_whitespace_is_skipped() {
        assert_eq!(
            tokenize(" x +  1 ").unwrap(),
            vec![ident("x"), Token::Plus, num("1")]
        );
    }

    #[test]
    fn test_other_characters_pass_through() {
        let tokens = tokenize("x$2").unwrap();
        assert_eq!(tokens[1], Token::Other('$'));
        assert_eq!(tokenize("").unwrap(), vec![]);
    }

    #[test]
    fn test_token_display_roundtrip() {
        let input = "2*(x+1)**3-sin(x)/4";
        let joined: String = tokenize(input)
            .unwrap()
            .iter()
            .map(|t| t.to_string())
            .collect();
        assert_eq!(joined, input);
    }

    #[test]
    fn test_func_aliases() {
        assert_eq!(Func::from_str("ln").unwrap(), Func::Ln);
        assert_eq!(Func::from_str("log").unwrap(), Func::Ln);
        assert_eq!(Func::from_str("tg").unwrap(), Func::Tan);
        assert_eq!(Func::from_str("arcctg").unwrap(), Func::Acot);
        assert_eq!(Func::Ln.to_string(), "log");
        assert!(Func::from_str("foo").is_err());
        // every canonical name is parseable back
        for func in Func::iter() {
            assert_eq!(Func::from_str(&func.to_string()).unwrap(), func);
        }
    }

    #[test]
    fn test_named_constants() {
        assert_eq!(named_constant("pi"), Some(PI));
        assert_eq!(named_constant("E"), Some(E));
        assert_eq!(named_constant("e"), None);
    }
}
