//! Core error types.
//!
//! # Re-exports
//!
//! - [`GridError`] from `error`

pub mod error;

pub use error::GridError;
