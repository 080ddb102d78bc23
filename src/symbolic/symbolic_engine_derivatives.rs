//! # Symbolic Engine Derivatives Module
//!
//! Analytical differentiation of `Expr` by structural recursion. The raw result is not simplified;
//! callers run `simplify()` on it before printing or compiling.
//!
//! Implemented rules:
//! - sum and difference rules
//! - product rule: d/dx(f*g) = f'*g + f*g'
//! - quotient rule: d/dx(f/g) = (f'*g - f*g')/g**2
//! - power rule for exponents free of the variable: d/dx(f**c) = c*f**(c-1)*f'
//! - exponential rule for bases free of the variable: d/dx(c**g) = c**g*log(c)*g'
//! - general power: d/dx(f**g) = f**g*(g'*log(f) + g*f'/f)
//! - chain rule for every elementary function

use crate::symbolic::symbolic_engine::Expr;

impl Expr {
    /// Computes the analytical derivative of the expression with respect to `var`.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let x = Expr::Var("x".to_string());
    /// let f = x.clone().pow(Expr::Const(2.0)); // x**2
    /// let df_dx = f.diff("x").simplify(); // 2*x
    /// ```
    pub fn diff(&self, var: &str) -> Expr {
        match self {
            Expr::Var(name) => {
                if name == var {
                    Expr::Const(1.0)
                } else {
                    Expr::Const(0.0)
                }
            }
            Expr::Const(_) => Expr::Const(0.0),
            Expr::Add(lhs, rhs) => Expr::Add(lhs.diff(var).boxed(), rhs.diff(var).boxed()),
            Expr::Sub(lhs, rhs) => Expr::Sub(lhs.diff(var).boxed(), rhs.diff(var).boxed()),
            Expr::Mul(lhs, rhs) => Expr::Add(
                Box::new(Expr::Mul(lhs.diff(var).boxed(), rhs.clone())),
                Box::new(Expr::Mul(lhs.clone(), rhs.diff(var).boxed())),
            ),
            Expr::Div(lhs, rhs) => Expr::Div(
                Box::new(Expr::Sub(
                    Box::new(Expr::Mul(lhs.diff(var).boxed(), rhs.clone())),
                    Box::new(Expr::Mul(lhs.clone(), rhs.diff(var).boxed())),
                )),
                Box::new(Expr::Pow(rhs.clone(), Box::new(Expr::Const(2.0)))),
            ),
            Expr::Pow(base, exp) => {
                let base_varies = base.contains_variable(var);
                let exp_varies = exp.contains_variable(var);
                match (base_varies, exp_varies) {
                    (_, false) => Expr::Mul(
                        Box::new(Expr::Mul(
                            exp.clone(),
                            Box::new(Expr::Pow(
                                base.clone(),
                                Box::new(Expr::Sub(exp.clone(), Box::new(Expr::Const(1.0)))),
                            )),
                        )),
                        base.diff(var).boxed(),
                    ),
                    (false, true) => Expr::Mul(
                        Box::new(Expr::Mul(
                            Box::new(self.clone()),
                            Box::new(Expr::Ln(base.clone())),
                        )),
                        exp.diff(var).boxed(),
                    ),
                    (true, true) => Expr::Mul(
                        Box::new(self.clone()),
                        Box::new(Expr::Add(
                            Box::new(Expr::Mul(exp.diff(var).boxed(), Box::new(Expr::Ln(base.clone())))),
                            Box::new(Expr::Div(
                                Box::new(Expr::Mul(exp.clone(), base.diff(var).boxed())),
                                base.clone(),
                            )),
                        )),
                    ),
                }
            }
            Expr::Exp(expr) => Expr::Mul(Box::new(Expr::Exp(expr.clone())), expr.diff(var).boxed()),
            Expr::Ln(expr) => Expr::Div(expr.diff(var).boxed(), expr.clone()),
            Expr::sin(expr) => Expr::Mul(Box::new(Expr::cos(expr.clone())), expr.diff(var).boxed()),
            Expr::cos(expr) => Expr::Mul(
                Box::new(Expr::Mul(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(Expr::sin(expr.clone())),
                )),
                expr.diff(var).boxed(),
            ),
            Expr::tg(expr) => Expr::Div(
                expr.diff(var).boxed(),
                Box::new(Expr::Pow(
                    Box::new(Expr::cos(expr.clone())),
                    Box::new(Expr::Const(2.0)),
                )),
            ),
            Expr::ctg(expr) => Expr::Mul(
                Box::new(Expr::Const(-1.0)),
                Box::new(Expr::Div(
                    expr.diff(var).boxed(),
                    Box::new(Expr::Pow(
                        Box::new(Expr::sin(expr.clone())),
                        Box::new(Expr::Const(2.0)),
                    )),
                )),
            ),
            Expr::arcsin(expr) => Expr::Div(
                expr.diff(var).boxed(),
                Box::new(Expr::Pow(
                    Box::new(Expr::Sub(
                        Box::new(Expr::Const(1.0)),
                        Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                    )),
                    Box::new(Expr::Const(0.5)),
                )),
            ),
            Expr::arccos(expr) => Expr::Mul(
                Box::new(Expr::Const(-1.0)),
                Box::new(Expr::Div(
                    expr.diff(var).boxed(),
                    Box::new(Expr::Pow(
                        Box::new(Expr::Sub(
                            Box::new(Expr::Const(1.0)),
                            Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                        )),
                        Box::new(Expr::Const(0.5)),
                    )),
                )),
            ),
            Expr::arctg(expr) => Expr::Div(
                expr.diff(var).boxed(),
                Box::new(Expr::Add(
                    Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                    Box::new(Expr::Const(1.0)),
                )),
            ),
            Expr::arcctg(expr) => Expr::Mul(
                Box::new(Expr::Const(-1.0)),
                Box::new(Expr::Div(
                    expr.diff(var).boxed(),
                    Box::new(Expr::Add(
                        Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                        Box::new(Expr::Const(1.0)),
                    )),
                )),
            ),
        }
    }

    /// n-th derivative, simplified after every step
    pub fn nth_derivative(&self, var: &str, n: usize) -> Expr {
        let mut derivative = self.simplify();
        for _ in 0..n {
            derivative = derivative.diff(var).simplify();
        }
        derivative
    }
}
