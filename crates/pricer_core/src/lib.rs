//! # pricer_core: Numeric Foundation for Greeks Validation
//!
//! ## Layer 1 (Foundation) Role
//!
//! pricer_core serves as the bottom layer, providing:
//! - A [`Scalar`](math::Scalar) trait implemented for `f64` and `Complex64`, so
//!   one pricing formula serves real and complex-step evaluation (`math::scalar`)
//! - The standard normal CDF/PDF and the analytic continuation of Φ to complex
//!   arguments (`math::distributions`)
//! - Linear and logarithmic evaluation grids (`math::grid`)
//! - Error types: `GridError` (`types::error`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other pricer_* crates, with minimal external dependencies:
//! - num-traits: Zero/One bounds for generic numerics
//! - num-complex: `Complex64`
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use num_complex::Complex64;
//! use pricer_core::math::{norm_cdf, norm_pdf, Scalar};
//!
//! let h = 1e-20;
//! let z = Complex64::new(0.25, h).norm_cdf();
//! assert_eq!(z.re, norm_cdf(0.25));
//! assert!((z.im / h - norm_pdf(0.25)).abs() < 1e-15);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
pub mod types;
