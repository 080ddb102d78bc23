//! Evaluate, differentiate and integrate expressions typed in loose notation.
//!
//! Every operation runs the same pipeline: `normalize` the raw text, `parse` it in the free
//! variable, transform it symbolically, `compile` the result and apply it to the samples.
//! The `*_with` variants take an explicit [`CalcConfig`]; the short forms use the defaults.
//! Failures come back as a tagged [`CalcError`]; the `*_or_marker` functions collapse any failure
//! into [`ERROR_MARKER`] for display.
use log::{debug, error, info, warn};
use ndarray::{Array1, ArrayView1};

use crate::Utils::config::CalcConfig;
use crate::calculus::error::{CalcError, ERROR_MARKER};
use crate::symbolic::notation::{normalize_with, render};
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_lambdify::CompiledFn;

/// Derivative of an expression together with its values at the samples.
#[derive(Debug, Clone)]
pub struct Derivative {
    pub values: Array1<f64>,
    /// loose-notation form of the derivative
    pub display: String,
    pub expr: Expr,
}

/// Definite integral over `[lower, upper]` and the antiderivative it was computed from.
#[derive(Debug, Clone)]
pub struct Integral {
    pub antiderivative: CompiledFn,
    pub value: f64,
    /// loose-notation form of the antiderivative
    pub display: String,
    pub expr: Expr,
}

fn logged(e: CalcError) -> CalcError {
    error!("Error in calculation: {}", e);
    e
}

fn parse_loose(raw: &str, config: &CalcConfig) -> Result<Expr, CalcError> {
    let normalized = normalize_with(raw, &config.variable);
    let expr = Expr::parse(&normalized, &config.variable).map_err(CalcError::Parse)?;
    debug!("parsed {} as {}", raw, expr);
    Ok(expr)
}

fn compile(expr: &Expr, config: &CalcConfig) -> Result<CompiledFn, CalcError> {
    expr.compile(&config.variable).map_err(CalcError::Symbolic)
}

fn apply(f: &CompiledFn, samples: ArrayView1<f64>, config: &CalcConfig) -> Result<Array1<f64>, CalcError> {
    f.eval_array(samples, config.reject_non_finite)
        .map_err(CalcError::Numeric)
}

/// Evaluates `raw` at every sample using the default configuration.
pub fn evaluate<'a>(raw: &str, samples: impl Into<ArrayView1<'a, f64>>) -> Result<Array1<f64>, CalcError> {
    evaluate_with(raw, samples, &CalcConfig::default())
}

pub fn evaluate_with<'a>(
    raw: &str,
    samples: impl Into<ArrayView1<'a, f64>>,
    config: &CalcConfig,
) -> Result<Array1<f64>, CalcError> {
    let samples = samples.into();
    let result = parse_loose(raw, config).and_then(|expr| {
        let f = compile(&expr.simplify(), config)?;
        apply(&f, samples, config)
    });
    result.map_err(logged)
}

/// Differentiates `raw` with respect to the free variable and evaluates the derivative at the
/// samples using the default configuration.
pub fn differentiate<'a>(raw: &str, samples: impl Into<ArrayView1<'a, f64>>) -> Result<Derivative, CalcError> {
    differentiate_with(raw, samples, &CalcConfig::default())
}

pub fn differentiate_with<'a>(
    raw: &str,
    samples: impl Into<ArrayView1<'a, f64>>,
    config: &CalcConfig,
) -> Result<Derivative, CalcError> {
    let samples = samples.into();
    let result = parse_loose(raw, config).and_then(|expr| {
        let derivative = expr.simplify().diff(&config.variable).simplify();
        let f = compile(&derivative, config)?;
        let values = apply(&f, samples, config)?;
        let display = render(&derivative);
        info!("d/d{} {} = {}", config.variable, raw, display);
        Ok(Derivative {
            values,
            display,
            expr: derivative,
        })
    });
    result.map_err(logged)
}

/// Integrates `raw` over `[lower, upper]` as `F(upper) - F(lower)` using the default configuration.
pub fn integrate(raw: &str, lower: f64, upper: f64) -> Result<Integral, CalcError> {
    integrate_with(raw, lower, upper, &CalcConfig::default())
}

pub fn integrate_with(raw: &str, lower: f64, upper: f64, config: &CalcConfig) -> Result<Integral, CalcError> {
    let var = config.variable.as_str();
    let result = parse_loose(raw, config).and_then(|expr| {
        let antiderivative = expr.integrate(var).map_err(CalcError::Symbolic)?;
        let f = compile(&antiderivative, config)?;
        let value = f.call(upper) - f.call(lower);
        if !value.is_finite() {
            return Err(CalcError::Numeric(format!(
                "integral over [{}, {}] is {}",
                lower, upper, value
            )));
        }
        if config.quadrature_check {
            cross_check(&expr, value, lower, upper, config);
        }
        let display = render(&antiderivative);
        info!(
            "integral of {} d{} = {}, over [{}, {}] = {}",
            raw, var, display, lower, upper, value
        );
        Ok(Integral {
            antiderivative: f,
            value,
            display,
            expr: antiderivative,
        })
    });
    result.map_err(logged)
}

/// Compares the symbolic result with Gauss-Legendre quadrature of the integrand. Only warns: a
/// mismatch usually means a singularity inside the interval.
fn cross_check(integrand: &Expr, value: f64, lower: f64, upper: f64, config: &CalcConfig) {
    match integrand.quad(&config.variable, lower, upper, config.quadrature_degree) {
        Ok(numeric) => {
            let scale = value.abs().max(numeric.abs()).max(1.0);
            if !numeric.is_finite() || (value - numeric).abs() > config.quadrature_tolerance * scale {
                warn!(
                    "integral of {} over [{}, {}]: symbolic {} differs from quadrature {}",
                    integrand, lower, upper, value, numeric
                );
            } else {
                debug!("quadrature agrees: {} vs {}", value, numeric);
            }
        }
        Err(e) => warn!("quadrature check skipped: {}", e),
    }
}

/// [`evaluate`] with every failure collapsed to `None`.
pub fn evaluate_or_none<'a>(raw: &str, samples: impl Into<ArrayView1<'a, f64>>) -> Option<Array1<f64>> {
    evaluate(raw, samples).ok()
}

/// `Ok(values)` or the uniform marker string.
pub fn evaluate_or_marker<'a>(
    raw: &str,
    samples: impl Into<ArrayView1<'a, f64>>,
) -> Result<Array1<f64>, &'static str> {
    evaluate(raw, samples).map_err(|e| e.marker())
}

/// Values and loose-notation derivative, or `(None, "Error in calculation")`.
pub fn differentiate_or_marker<'a>(
    raw: &str,
    samples: impl Into<ArrayView1<'a, f64>>,
) -> (Option<Array1<f64>>, String) {
    match differentiate(raw, samples) {
        Ok(derivative) => (Some(derivative.values), derivative.display),
        Err(_) => (None, ERROR_MARKER.to_string()),
    }
}

/// Antiderivative, value and loose-notation antiderivative, or `(None, None, "Error in calculation")`.
pub fn integrate_or_marker(raw: &str, lower: f64, upper: f64) -> (Option<CompiledFn>, Option<f64>, String) {
    match integrate(raw, lower, upper) {
        Ok(integral) => (
            Some(integral.antiderivative),
            Some(integral.value),
            integral.display,
        ),
        Err(_) => (None, None, ERROR_MARKER.to_string()),
    }
}
