//! Closed-form Black-Scholes pricing for European calls.
//!
//! This module provides:
//! - [`BlackScholesParams`]: validated (S, K, r, q, σ, T) inputs
//! - [`BlackScholes`]: the call pricing kernel, generic over real and complex spots
//! - [`AnalyticalError`]: parameter and evaluation failures
//!
//! ## Design Principles
//!
//! - **Generic over `S: Scalar`**: one formula serves `f64` and `Complex64`
//! - **Explicit degenerate handling**: σ√T = 0 returns the deterministic payoff
//! - **Numerical Stability**: uses erfc-based CDF for accuracy

pub mod black_scholes;
pub mod error;
pub mod params;

// Re-export main types at module level
pub use black_scholes::BlackScholes;
pub use error::AnalyticalError;
pub use params::BlackScholesParams;
