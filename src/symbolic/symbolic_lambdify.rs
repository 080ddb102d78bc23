//! Conversion of symbolic expressions into executable closures of one variable.
//!
//! `Expr::compile` walks the tree once and nests boxed closures, so the returned `CompiledFn`
//! evaluates without touching the tree again. Expressions free of the variable are folded into a
//! single constant which `eval_array` broadcasts to the sample length.
use ndarray::{Array1, ArrayView1};
use std::f64::consts::PI;
use std::fmt;
use std::sync::Arc;

use crate::symbolic::symbolic_engine::Expr;

type Closure = Box<dyn Fn(f64) -> f64 + Send + Sync>;

/// Compiled numeric function of the free variable. Cheap to clone, safe to share between threads.
#[derive(Clone)]
pub struct CompiledFn {
    func: Arc<dyn Fn(f64) -> f64 + Send + Sync>,
    constant: Option<f64>,
    variable: String,
}

impl fmt::Debug for CompiledFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledFn")
            .field("variable", &self.variable)
            .field("constant", &self.constant)
            .finish()
    }
}

impl CompiledFn {
    #[inline]
    pub fn call(&self, x: f64) -> f64 {
        (self.func)(x)
    }

    /// true when the expression did not depend on the variable
    pub fn is_constant(&self) -> bool {
        self.constant.is_some()
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Evaluates the function at every sample. A constant function is broadcast to the sample length.
    ///
    /// With `reject_non_finite` a NaN or infinite value produced from a finite sample is an error
    /// naming the first offending sample.
    pub fn eval_array(
        &self,
        samples: ArrayView1<f64>,
        reject_non_finite: bool,
    ) -> Result<Array1<f64>, String> {
        let values = match self.constant {
            Some(c) => Array1::from_elem(samples.len(), c),
            None => samples.mapv(|x| (self.func)(x)),
        };
        if reject_non_finite {
            if let Some((x, value)) = samples
                .iter()
                .zip(values.iter())
                .find(|(x, value)| x.is_finite() && !value.is_finite())
            {
                return Err(format!(
                    "non-finite value {} at {} = {}",
                    value, self.variable, x
                ));
            }
        }
        Ok(values)
    }
}

impl Expr {
    /// Compiles the expression into a function of `var`. Fails if any other variable occurs in it.
    pub fn compile(&self, var: &str) -> Result<CompiledFn, String> {
        let func = self.lambdify_var(var)?;
        let constant = if self.contains_variable(var) {
            None
        } else {
            Some(func(0.0))
        };
        Ok(CompiledFn {
            func: Arc::from(func),
            constant,
            variable: var.to_string(),
        })
    }

    fn lambdify_var(&self, var: &str) -> Result<Closure, String> {
        let closure: Closure = match self {
            Expr::Var(name) => {
                if name != var {
                    return Err(format!(
                        "cannot compile: unknown variable '{}' (expected '{}')",
                        name, var
                    ));
                }
                Box::new(|x| x)
            }
            Expr::Const(val) => {
                let val = *val;
                Box::new(move |_| val)
            }
            Expr::Add(lhs, rhs) => {
                let lf = lhs.lambdify_var(var)?;
                let rf = rhs.lambdify_var(var)?;
                Box::new(move |x| lf(x) + rf(x))
            }
            Expr::Sub(lhs, rhs) => {
                let lf = lhs.lambdify_var(var)?;
                let rf = rhs.lambdify_var(var)?;
                Box::new(move |x| lf(x) - rf(x))
            }
            Expr::Mul(lhs, rhs) => {
                let lf = lhs.lambdify_var(var)?;
                let rf = rhs.lambdify_var(var)?;
                Box::new(move |x| lf(x) * rf(x))
            }
            Expr::Div(lhs, rhs) => {
                let lf = lhs.lambdify_var(var)?;
                let rf = rhs.lambdify_var(var)?;
                Box::new(move |x| lf(x) / rf(x))
            }
            Expr::Pow(base, exp) => {
                let bf = base.lambdify_var(var)?;
                match exp.as_const() {
                    Some(n) if n.fract() == 0.0 && n.abs() <= i32::MAX as f64 => {
                        let n = n as i32;
                        Box::new(move |x| bf(x).powi(n))
                    }
                    Some(n) if n == 0.5 => Box::new(move |x| bf(x).sqrt()),
                    _ => {
                        let ef = exp.lambdify_var(var)?;
                        Box::new(move |x| bf(x).powf(ef(x)))
                    }
                }
            }
            Expr::Exp(expr) => {
                let f = expr.lambdify_var(var)?;
                Box::new(move |x| f(x).exp())
            }
            Expr::Ln(expr) => {
                let f = expr.lambdify_var(var)?;
                Box::new(move |x| f(x).ln())
            }
            Expr::sin(expr) => {
                let f = expr.lambdify_var(var)?;
                Box::new(move |x| f(x).sin())
            }
            Expr::cos(expr) => {
                let f = expr.lambdify_var(var)?;
                Box::new(move |x| f(x).cos())
            }
            Expr::tg(expr) => {
                let f = expr.lambdify_var(var)?;
                Box::new(move |x| f(x).tan())
            }
            Expr::ctg(expr) => {
                let f = expr.lambdify_var(var)?;
                Box::new(move |x| 1.0 / f(x).tan())
            }
            Expr::arcsin(expr) => {
                let f = expr.lambdify_var(var)?;
                Box::new(move |x| f(x).asin())
            }
            Expr::arccos(expr) => {
                let f = expr.lambdify_var(var)?;
                Box::new(move |x| f(x).acos())
            }
            Expr::arctg(expr) => {
                let f = expr.lambdify_var(var)?;
                Box::new(move |x| f(x).atan())
            }
            Expr::arcctg(expr) => {
                let f = expr.lambdify_var(var)?;
                Box::new(move |x| PI / 2.0 - f(x).atan())
            }
        };
        Ok(closure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn x() -> Expr {
        Expr::var("x")
    }
    fn c(val: f64) -> Expr {
        Expr::Const(val)
    }

    #[test]
    fn test_compile_and_call() {
        let expr = c(2.0) * x().pow(c(2.0)) + c(3.0);
        let f = expr.compile("x").unwrap();
        assert_eq!(f.call(2.0), 11.0);
        assert!(!f.is_constant());
        assert_eq!(f.variable(), "x");
    }

    #[test]
    fn test_compile_functions() {
        let f = (Expr::sin(x().boxed()) + Expr::cos(x().boxed())).compile("x").unwrap();
        assert_relative_eq!(f.call(0.3), 0.3f64.sin() + 0.3f64.cos());
        let f = Expr::ctg(x().boxed()).compile("x").unwrap();
        assert_relative_eq!(f.call(0.7), 1.0 / 0.7f64.tan());
        let f = Expr::arcctg(x().boxed()).compile("x").unwrap();
        assert_relative_eq!(f.call(1.0), PI / 4.0);
        let f = x().pow(c(0.5)).compile("x").unwrap();
        assert_relative_eq!(f.call(9.0), 3.0);
        let f = c(2.0).pow(x()).compile("x").unwrap();
        assert_relative_eq!(f.call(3.0), 8.0);
    }

    #[test]
    fn test_compile_rejects_unknown_variable() {
        let expr = x() + Expr::var("y");
        assert!(expr.compile("x").is_err());
    }

    #[test]
    fn test_eval_array() {
        let f = x().pow(c(2.0)).compile("x").unwrap();
        let values = f.eval_array(array![1.0, 2.0, 3.0].view(), true).unwrap();
        assert_eq!(values, array![1.0, 4.0, 9.0]);
    }

    #[test]
    fn test_constant_is_broadcast() {
        let f = c(5.0).compile("x").unwrap();
        assert!(f.is_constant());
        let values = f.eval_array(array![1.0, 2.0, 3.0].view(), true).unwrap();
        assert_eq!(values, array![5.0, 5.0, 5.0]);
        let empty = f.eval_array(Array1::<f64>::zeros(0).view(), true).unwrap();
        assert_eq!(empty.len(), 0);
    }

    #[test]
    fn test_non_finite_policy() {
        let f = (c(1.0) / (x() - c(1.0))).compile("x").unwrap();
        let samples = array![0.0, 1.0, 2.0];
        let err = f.eval_array(samples.view(), true).unwrap_err();
        assert!(err.contains("x = 1"));
        let values = f.eval_array(samples.view(), false).unwrap();
        assert!(values[1].is_infinite());
        // non-finite input is passed through
        let g = x().compile("x").unwrap();
        assert!(g.eval_array(array![f64::NAN].view(), true).is_ok());
    }

    #[test]
    fn test_compiled_fn_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>(_: &T) {}
        let f = x().exp().compile("x").unwrap();
        assert_send_sync(&f);
        let handle = std::thread::spawn(move || f.call(0.0));
        assert_eq!(handle.join().unwrap(), 1.0);
    }
}
