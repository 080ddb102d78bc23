//! # Calculus on loose notation
//!
//! Pointwise evaluation, differentiation and definite integration of a single-variable expression
//! typed the way people write it on paper.
//!
//! ```
//! use RustedCalc::calculus::{differentiate, integrate};
//! let derivative = differentiate("x^2", &[1.0, 2.0, 3.0][..]).unwrap();
//! assert_eq!(derivative.display, "2x");
//! let integral = integrate("x", 0.0, 2.0).unwrap();
//! assert_eq!(integral.display, "x^2/2");
//! ```
/// tagged failure causes and the uniform marker
pub mod error;
/// evaluate / differentiate / integrate
pub mod operations;
pub use error::{CalcError, ERROR_MARKER};
pub use operations::*;
