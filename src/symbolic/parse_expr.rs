//! Strict-notation parser: turns a normalized expression string (`2*x**2+3`) into an `Expr`.
//!
//! Precedence climbing over the token stream produced by `tokenizer::tokenize`:
//! `+ -` bind weakest, then `* /`, then unary `-`/`+`, then `**` (right associative,
//! `2**-1` allowed). The only identifiers accepted are the free variable and the named
//! constants `pi` and `E`; function names must be followed by a bracketed argument.
use std::fmt;
use std::str::FromStr;

use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::tokenizer::{Func, Token, named_constant, tokenize};

/// Failure to read a strict-notation expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub input: String,
}

impl ParseError {
    fn new(message: impl Into<String>, input: &str) -> Self {
        ParseError {
            message: message.into(),
            input: input.to_string(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot parse '{}': {}", self.input, self.message)
    }
}

impl std::error::Error for ParseError {}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    variable: &'a str,
    input: &'a str,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(message, self.input)
    }

    fn expect_rparen(&mut self) -> Result<(), ParseError> {
        match self.next() {
            Some(Token::RParen) => Ok(()),
            Some(other) => Err(self.error(format!("expected ')' but found '{}'", other))),
            None => Err(self.error("unbalanced parentheses: missing ')'")),
        }
    }

    // sum := product (('+' | '-') product)*
    fn parse_sum(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_product()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    let rhs = self.parse_product()?;
                    lhs = lhs + rhs;
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    let rhs = self.parse_product()?;
                    lhs = lhs - rhs;
                }
                _ => return Ok(lhs),
            }
        }
    }

    // product := unary (('*' | '/') unary)*
    fn parse_product(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    let rhs = self.parse_unary()?;
                    lhs = lhs * rhs;
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    let rhs = self.parse_unary()?;
                    lhs = lhs / rhs;
                }
                _ => return Ok(lhs),
            }
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                Ok(-self.parse_unary()?)
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.parse_unary()
            }
            _ => self.parse_power(),
        }
    }

    // power := atom ('**' unary)?
    fn parse_power(&mut self) -> Result<Expr, ParseError> {
        let base = self.parse_atom()?;
        match self.peek() {
            Some(Token::Pow) => {
                self.pos += 1;
                let exponent = self.parse_unary()?;
                Ok(base.pow(exponent))
            }
            Some(Token::Caret) => Err(self.error("'^' is not a power operator here, use '**'")),
            _ => Ok(base),
        }
    }

    fn parse_atom(&mut self) -> Result<Expr, ParseError> {
        let Some(token) = self.next() else {
            return Err(self.error("unexpected end of expression"));
        };
        match token {
            Token::Number(text) => text
                .parse::<f64>()
                .map(Expr::Const)
                .map_err(|e| self.error(format!("invalid number '{}': {}", text, e))),
            Token::Ident(name) if name == self.variable => Ok(Expr::Var(name.clone())),
            Token::Ident(name) => named_constant(name)
                .map(Expr::Const)
                .ok_or_else(|| self.error(format!("unknown symbol '{}'", name))),
            Token::Func(name) => {
                let func = Func::from_str(name)
                    .map_err(|_| self.error(format!("unknown function '{}'", name)))?;
                match self.next() {
                    Some(Token::LParen) => {}
                    _ => return Err(self.error(format!("expected '(' after '{}'", name))),
                }
                let arg = self.parse_sum()?;
                self.expect_rparen()?;
                Ok(func.apply(arg))
            }
            Token::LParen => {
                let inner = self.parse_sum()?;
                self.expect_rparen()?;
                Ok(inner)
            }
            Token::RParen => Err(self.error("unbalanced parentheses: unexpected ')'")),
            Token::Caret => Err(self.error("'^' is not a power operator here, use '**'")),
            Token::Other(c) => Err(self.error(format!("unsupported character '{}'", c))),
            other => Err(self.error(format!("unexpected operator '{}'", other))),
        }
    }
}

/// Parses a strict-notation expression in the free variable `variable`.
pub fn parse_expression(input: &str, variable: &str) -> Result<Expr, ParseError> {
    let tokens = tokenize(input).map_err(|e| ParseError::new(e, input))?;
    if tokens.is_empty() {
        return Err(ParseError::new("empty expression", input));
    }
    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        variable,
        input,
    };
    let expr = parser.parse_sum()?;
    match parser.peek() {
        None => Ok(expr),
        Some(Token::RParen) => Err(parser.error("unbalanced parentheses: unexpected ')'")),
        Some(token) => Err(parser.error(format!("unexpected token '{}'", token))),
    }
}

impl Expr {
    /// Parses a strict-notation expression, see [`parse_expression`].
    pub fn parse(input: &str, variable: &str) -> Result<Expr, ParseError> {
        parse_expression(input, variable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn x() -> Expr {
        Expr::var("x")
    }
    fn c(val: f64) -> Expr {
        Expr::Const(val)
    }

    #[test]
    fn test_parse_polynomial() {
        let expr = parse_expression("2*x**2+3", "x").unwrap();
        let expected = c(2.0) * x().pow(c(2.0)) + c(3.0);
        assert_eq!(expr, expected);
    }

    #[test]
    fn test_precedence_and_associativity() {
        // left associative subtraction and division
        assert_eq!(
            parse_expression("x-1-2", "x").unwrap(),
            (x() - c(1.0)) - c(2.0)
        );
        assert_eq!(
            parse_expression("x/2/3", "x").unwrap(),
            (x() / c(2.0)) / c(3.0)
        );
        // right associative power
        assert_eq!(
            parse_expression("x**2**3", "x").unwrap(),
            x().pow(c(2.0).pow(c(3.0)))
        );
    }

    #[test]
    fn test_unary_minus() {
        assert_eq!(parse_expression("-3", "x").unwrap(), c(-3.0));
        // power binds tighter than unary minus
        assert_eq!(
            parse_expression("-x**2", "x").unwrap(),
            -(x().pow(c(2.0)))
        );
        assert_eq!(
            parse_expression("x**-1", "x").unwrap(),
            x().pow(c(-1.0))
        );
        assert_eq!(parse_expression("+x", "x").unwrap(), x());
    }

    #[test]
    fn test_functions_and_constants() {
        assert_eq!(
            parse_expression("sin(x)", "x").unwrap(),
            Expr::sin(x().boxed())
        );
        assert_eq!(parse_expression("ln(x)", "x").unwrap(), x().ln());
        assert_eq!(
            parse_expression("sqrt(x)", "x").unwrap(),
            x().pow(c(0.5))
        );
        assert_eq!(parse_expression("2*pi", "x").unwrap(), c(2.0) * c(PI));
        assert_eq!(
            parse_expression("tg(x)+arcctg(x)", "x").unwrap(),
            Expr::tg(x().boxed()) + Expr::arcctg(x().boxed())
        );
    }

    #[test]
    fn test_other_variable_name() {
        let expr = parse_expression("t**2", "t").unwrap();
        assert_eq!(expr, Expr::var("t").pow(c(2.0)));
        assert!(parse_expression("x**2", "t").is_err());
    }

    #[test]
    fn test_unknown_symbol() {
        let err = parse_expression("abc", "x").unwrap_err();
        assert!(err.message.contains("unknown symbol"));
        assert!(parse_expression("sin", "x").is_err());
        assert!(parse_expression("y*x", "x").is_err());
    }

    #[test]
    fn test_unbalanced_parentheses() {
        assert!(parse_expression("(x+1", "x").is_err());
        assert!(parse_expression("x+1)", "x").is_err());
        assert!(parse_expression(")", "x").is_err());
        assert!(parse_expression("sin(x", "x").is_err());
    }

    #[test]
    fn test_rejected_inputs() {
        assert!(parse_expression("", "x").is_err());
        assert!(parse_expression("x^2", "x").is_err());
        assert!(parse_expression("x$2", "x").is_err());
        assert!(parse_expression("x+", "x").is_err());
        assert!(parse_expression("2 x", "x").is_err());
        assert!(parse_expression("x**", "x").is_err());
    }

    #[test]
    fn test_parse_display_roundtrip() {
        for input in ["x**2 + 2*x + 1", "2*x", "x**2/2", "-sin(x)", "x**(-1)", "exp(2*x)"] {
            let expr = parse_expression(input, "x").unwrap();
            assert_eq!(expr.to_string(), input);
        }
    }
}
