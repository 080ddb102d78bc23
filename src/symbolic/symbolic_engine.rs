//! # Symbolic Engine Module
//!
//! Core expression tree of the calculator. An `Expr` is built by the strict-notation parser
//! (`parse_expr`), transformed by differentiation, integration and simplification, compiled to a
//! numeric closure (`symbolic_lambdify`) and finally printed back as text.
//!
//! ## Main Structures and Methods
//!
//! ### `Expr` Enum
//! - **Variables**: `Var(String)` - the free variable, e.g. "x"
//! - **Constants**: `Const(f64)` - numerical constants
//! - **Operations**: `Add`, `Sub`, `Mul`, `Div`, `Pow` - basic arithmetic
//! - **Functions**: `Exp`, `Ln`, `sin`, `cos`, `tg`, `ctg` and the inverse trigonometric functions
//!
//! ### Key Methods
//! - `diff(var: &str)` - analytical differentiation (`symbolic_engine_derivatives`)
//! - `integrate(var: &str)` - rule based antiderivative (`symbolic_integration`)
//! - `simplify()` - algebraic simplification (`symbolic_simplify`)
//! - `compile(var: &str)` - conversion to an executable function (`symbolic_lambdify`)
//!
//! ## Canonical string form
//!
//! `Display` prints strict infix notation with `*` and `**`, using the fewest parentheses that
//! keep the meaning: `2*x`, `x**2/2`, `x**2 + 2*x + 1`, `-sin(x)`, `x**(-1)`. Whole-number
//! constants print without a fractional part. This string is what the notation renderer
//! rewrites into loose notation.
//!
//! Functions keep the mathematical variant names (`tg`, `ctg`, `arctg`) inside the tree but are
//! printed with the conventional names `tan`, `cot`, `atan`.

#![allow(non_camel_case_types)]

use std::fmt;

/// Core symbolic expression enum representing mathematical expressions as an abstract syntax tree.
///
/// # Examples
/// ```rust, ignore
/// use RustedCalc::symbolic::symbolic_engine::Expr;
/// let x = Expr::Var("x".to_string());
/// let expr = Expr::Add(Box::new(x), Box::new(Expr::Const(2.0)));
/// assert_eq!(expr.to_string(), "x + 2");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Symbolic variable with a name (e.g., "x")
    Var(String),
    /// Numerical constant value
    Const(f64),
    /// Addition operation: left + right
    Add(Box<Expr>, Box<Expr>),
    /// Subtraction operation: left - right
    Sub(Box<Expr>, Box<Expr>),
    /// Multiplication operation: left * right
    Mul(Box<Expr>, Box<Expr>),
    /// Division operation: left / right
    Div(Box<Expr>, Box<Expr>),
    /// Power operation: base ** exponent
    Pow(Box<Expr>, Box<Expr>),
    /// Exponential function: e^x
    Exp(Box<Expr>),
    /// Natural logarithm, printed as log(x)
    Ln(Box<Expr>),
    /// Sine function: sin(x)
    sin(Box<Expr>),
    /// Cosine function: cos(x)
    cos(Box<Expr>),
    /// Tangent function, printed as tan(x)
    tg(Box<Expr>),
    /// Cotangent function, printed as cot(x)
    ctg(Box<Expr>),
    /// Arcsine function, printed as asin(x)
    arcsin(Box<Expr>),
    /// Arccosine function, printed as acos(x)
    arccos(Box<Expr>),
    /// Arctangent function, printed as atan(x)
    arctg(Box<Expr>),
    /// Arccotangent function, printed as acot(x)
    arcctg(Box<Expr>),
}

/// Binding strength of the node when printed: sums 1, products 2, powers 3, atoms 4.
fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Add(..) | Expr::Sub(..) => 1,
        Expr::Mul(..) | Expr::Div(..) => 2,
        Expr::Const(val) if *val < 0.0 => 2,
        Expr::Pow(..) => 3,
        _ => 4,
    }
}

/// Formats a number without a trailing `.0` and without a negative zero.
pub fn format_number(val: f64) -> String {
    if val == 0.0 {
        "0".to_string()
    } else {
        format!("{}", val)
    }
}

struct Wrapped<'a> {
    expr: &'a Expr,
    parens: bool,
}

impl fmt::Display for Wrapped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.parens {
            write!(f, "({})", self.expr)
        } else {
            write!(f, "{}", self.expr)
        }
    }
}

fn wrap(expr: &Expr, min_precedence: u8) -> Wrapped<'_> {
    Wrapped {
        expr,
        parens: precedence(expr) < min_precedence,
    }
}

/// like `wrap` but also parenthesizes anything printed with a leading minus
fn wrap_signed(expr: &Expr, min_precedence: u8) -> Wrapped<'_> {
    Wrapped {
        expr,
        parens: precedence(expr) < min_precedence || expr.is_negative(),
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Const(val) => write!(f, "{}", format_number(*val)),
            Expr::Add(lhs, rhs) => match rhs.negated() {
                Some(positive) => write!(f, "{} - {}", lhs, wrap_signed(&positive, 2)),
                None => write!(f, "{} + {}", lhs, rhs),
            },
            Expr::Sub(lhs, rhs) => write!(f, "{} - {}", lhs, wrap_signed(rhs, 2)),
            Expr::Mul(lhs, rhs) => {
                if let Expr::Const(c) = lhs.as_ref() {
                    if *c == -1.0 {
                        return write!(f, "-{}", wrap_signed(rhs, 2));
                    }
                }
                write!(f, "{}*{}", wrap(lhs, 2), wrap_signed(rhs, 2))
            }
            Expr::Div(lhs, rhs) => write!(f, "{}/{}", wrap(lhs, 2), wrap_signed(rhs, 3)),
            Expr::Pow(base, exp) => write!(f, "{}**{}", wrap_signed(base, 4), wrap_signed(exp, 3)),
            Expr::Exp(expr) => write!(f, "exp({})", expr),
            Expr::Ln(expr) => write!(f, "log({})", expr),
            Expr::sin(expr) => write!(f, "sin({})", expr),
            Expr::cos(expr) => write!(f, "cos({})", expr),
            Expr::tg(expr) => write!(f, "tan({})", expr),
            Expr::ctg(expr) => write!(f, "cot({})", expr),
            Expr::arcsin(expr) => write!(f, "asin({})", expr),
            Expr::arccos(expr) => write!(f, "acos({})", expr),
            Expr::arctg(expr) => write!(f, "atan({})", expr),
            Expr::arcctg(expr) => write!(f, "acot({})", expr),
        }
    }
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Add(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Sub(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Mul(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::Div(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        match self {
            Expr::Const(val) => Expr::Const(-val),
            other => Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(other)),
        }
    }
}

impl Expr {
    /// Creates a variable expression.
    pub fn var(name: &str) -> Expr {
        Expr::Var(name.to_string())
    }

    /// check if the expression contains a variable
    pub fn contains_variable(&self, var_name: &str) -> bool {
        match self {
            Expr::Var(name) => name == var_name,
            Expr::Const(_) => false,
            Expr::Add(left, right)
            | Expr::Sub(left, right)
            | Expr::Mul(left, right)
            | Expr::Div(left, right)
            | Expr::Pow(left, right) => {
                left.contains_variable(var_name) || right.contains_variable(var_name)
            }
            Expr::Exp(expr)
            | Expr::Ln(expr)
            | Expr::sin(expr)
            | Expr::cos(expr)
            | Expr::tg(expr)
            | Expr::ctg(expr)
            | Expr::arcsin(expr)
            | Expr::arccos(expr)
            | Expr::arctg(expr)
            | Expr::arcctg(expr) => expr.contains_variable(var_name),
        }
    }

    /// Names of all variables occurring in the expression, in order of first appearance.
    pub fn variables(&self) -> Vec<String> {
        let mut names = Vec::new();
        self.collect_variables(&mut names);
        names
    }

    fn collect_variables(&self, names: &mut Vec<String>) {
        match self {
            Expr::Var(name) => {
                if !names.contains(name) {
                    names.push(name.clone());
                }
            }
            Expr::Const(_) => {}
            Expr::Add(left, right)
            | Expr::Sub(left, right)
            | Expr::Mul(left, right)
            | Expr::Div(left, right)
            | Expr::Pow(left, right) => {
                left.collect_variables(names);
                right.collect_variables(names);
            }
            Expr::Exp(expr)
            | Expr::Ln(expr)
            | Expr::sin(expr)
            | Expr::cos(expr)
            | Expr::tg(expr)
            | Expr::ctg(expr)
            | Expr::arcsin(expr)
            | Expr::arccos(expr)
            | Expr::arctg(expr)
            | Expr::arcctg(expr) => expr.collect_variables(names),
        }
    }

    /// Convenience method to wrap expression in Box for recursive structures.
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    /// Creates exponential function e^(self).
    pub fn exp(self) -> Expr {
        Expr::Exp(self.boxed())
    }

    /// Creates natural logarithm ln(self).
    pub fn ln(self) -> Expr {
        Expr::Ln(self.boxed())
    }

    /// Creates power expression self**rhs.
    pub fn pow(self, rhs: Expr) -> Expr {
        Expr::Pow(self.boxed(), rhs.boxed())
    }

    /// Checks if expression is exactly zero (constant 0.0).
    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Const(val) if *val == 0.0)
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Expr::Const(val) if *val == 1.0)
    }

    /// Returns the value of a numeric constant node.
    pub fn as_const(&self) -> Option<f64> {
        match self {
            Expr::Const(val) => Some(*val),
            _ => None,
        }
    }

    /// true when the canonical string of the expression starts with a minus sign
    pub fn is_negative(&self) -> bool {
        match self {
            Expr::Const(val) => *val < 0.0,
            Expr::Mul(lhs, _) | Expr::Div(lhs, _) => lhs.is_negative(),
            _ => false,
        }
    }

    /// For a term printed with a leading minus returns the term without it:
    /// `-3` -> `3`, `-1*e` -> `e`, `-2*e` -> `2*e`, `-2*e/3` -> `2*e/3`.
    pub fn negated(&self) -> Option<Expr> {
        match self {
            Expr::Const(val) if *val < 0.0 => Some(Expr::Const(-val)),
            Expr::Mul(lhs, rhs) => match lhs.as_ref() {
                Expr::Const(c) if *c == -1.0 => Some(rhs.as_ref().clone()),
                _ => lhs
                    .negated()
                    .map(|positive| Expr::Mul(positive.boxed(), rhs.clone())),
            },
            Expr::Div(lhs, rhs) => lhs
                .negated()
                .map(|positive| Expr::Div(positive.boxed(), rhs.clone())),
            _ => None,
        }
    }
}
