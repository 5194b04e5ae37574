//! Library crate for nd_functions
//!
//! Univariate polynomials and rational functions whose coefficients live in any
//! [`Ring`](nd_tensor::Ring). The coefficient algebra is passed explicitly to the spaces, so the
//! same polynomial type works over integers, floats or user defined rings.

use nd_tensor::{Field, Ring};

mod error;
mod polynomial;
mod rational;

pub use crate::error::FunctionsError;
pub use crate::polynomial::{Polynomial, PolynomialSpace};
pub use crate::rational::{RationalFunction, RationalFunctionSpace};

pub type Result<T> = std::result::Result<T, FunctionsError>;
