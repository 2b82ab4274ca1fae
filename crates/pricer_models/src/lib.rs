//! # Pricer Models (L2: Business Logic)
//!
//! The Black-Scholes European call model that every Greek in the workspace
//! is computed from.
//!
//! This crate provides:
//! - Validated Black-Scholes parameters
//! - The call pricing kernel over real and complex spots
//! - Model error types shared by the Greeks layer
//!
//! ## Design Principles
//!
//! - **Single kernel** for analytic, finite-difference and complex-step use
//! - **Validated construction**: invalid inputs never reach the formula
//!
//! # Examples
//! ```
//! use pricer_models::analytical::{BlackScholes, BlackScholesParams};
//!
//! let params = BlackScholesParams::new(100.0, 100.0, 0.0, 0.0, 0.2, 1.0).unwrap();
//! let price = BlackScholes::new(params).price_call().unwrap();
//! assert!((price - 7.965567455405804).abs() < 1e-12);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod analytical;
