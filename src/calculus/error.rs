use std::fmt;

use crate::symbolic::parse_expr::ParseError;

/// The single message shown to users for any failed calculation.
pub const ERROR_MARKER: &str = "Error in calculation";

/// Why a calculation failed. Callers that only need the uniform marker use [`CalcError::marker`].
#[derive(Debug, Clone, PartialEq)]
pub enum CalcError {
    /// the normalized text is not a valid expression in the free variable
    Parse(ParseError),
    /// the engine has no rule for the requested operation (e.g. no antiderivative)
    Symbolic(String),
    /// NaN or infinity produced from finite input
    Numeric(String),
}

impl CalcError {
    pub fn marker(&self) -> &'static str {
        ERROR_MARKER
    }
}

impl fmt::Display for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalcError::Parse(e) => write!(f, "parse error: {}", e),
            CalcError::Symbolic(e) => write!(f, "symbolic error: {}", e),
            CalcError::Numeric(e) => write!(f, "numeric error: {}", e),
        }
    }
}

impl std::error::Error for CalcError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CalcError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseError> for CalcError {
    fn from(e: ParseError) -> Self {
        CalcError::Parse(e)
    }
}
