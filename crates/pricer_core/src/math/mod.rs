//! Numeric building blocks for the pricing kernel.
//!
//! - `scalar`: the [`Scalar`] trait over `f64` and `Complex64`
//! - `distributions`: normal CDF/PDF, including the complex continuation of Φ
//! - `grid`: linear and logarithmic evaluation grids

pub mod distributions;
pub mod grid;
pub mod scalar;

pub use distributions::{complex_erfc, complex_norm_cdf, norm_cdf, norm_pdf};
pub use grid::{linear_grid, log_grid};
pub use scalar::Scalar;
