/// typed tokens of an expression string, built with nom
pub mod tokenizer;
///____________________________________________________________________________________________________________________________
/// # Loose notation
/// converts informal input (`2x^2+3`, `2sin(x)`, `(x+1)(x-1)`) to strict notation and back
///# Example
/// ```
/// use RustedCalc::symbolic::notation::{normalize, render_str};
/// assert_eq!(normalize("2x^2+3"), "2*x**2+3");
/// assert_eq!(normalize("5"), "5*x**0");
/// assert_eq!(render_str("x**2/2"), "x^2/2");
/// ```
pub mod notation;
/// a module turns a strict-notation String expression into a symbolic expression
///
///# Example
/// ```
/// use RustedCalc::symbolic::symbolic_engine::Expr;
/// let parsed_expression = Expr::parse("x**2 + 2*x + 1", "x").unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// ```
/// ________________________________________________________________________________________________________________________________
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// a module
/// 1) keeps a single-variable expression as a tree
/// 2) differentiates, integrates and simplifies it
/// 3) turns it into a Rust function and evaluates it over ndarray arrays
///# Example#
/// ```
/// use RustedCalc::symbolic::symbolic_engine::Expr;
/// use ndarray::array;
/// let f = Expr::parse("x**3", "x").unwrap();
/// let df_dx = f.diff("x").simplify();
/// assert_eq!(df_dx.to_string(), "3*x**2");
/// let F = f.integrate("x").unwrap();
/// assert_eq!(F.to_string(), "x**4/4");
/// let values = df_dx.compile("x").unwrap().eval_array(array![1.0, 2.0].view(), true).unwrap();
/// assert_eq!(values, array![3.0, 12.0]);
/// ```
/// ________________________________________________________________________________________________________________________________________________
pub mod symbolic_engine;
pub mod symbolic_engine_derivatives;
/// rule-based antiderivatives and Gauss-Legendre quadrature
pub mod symbolic_integration;
pub mod symbolic_lambdify;
pub mod symbolic_simplify;
