//! Numeric representation shared by real and complex-step pricing.
//!
//! The pricing kernel is written once against [`Scalar`] and instantiated for
//! `f64` (analytic and finite-difference evaluation) and [`Complex64`]
//! (complex-step evaluation). Keeping a single formula for both avoids drift
//! between the two code paths: a complex-step derivative is only as accurate
//! as the complex extension is faithful to the real function.
//!
//! # Examples
//! ```
//! use pricer_core::math::scalar::Scalar;
//! use num_complex::Complex64;
//!
//! fn discounted<S: Scalar>(x: S, rate: f64) -> S {
//!     x * (-rate).exp()
//! }
//!
//! let real = discounted(100.0_f64, 0.05);
//! let complex = discounted(Complex64::new(100.0, 1e-20), 0.05);
//! assert_eq!(complex.re, real);
//! ```

use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Neg, Sub};

use num_complex::Complex64;
use num_traits::{One, Zero};

use super::distributions;

/// Field-like numeric type usable by the pricing kernel.
///
/// Implemented for `f64` and [`Complex64`]. Mixed arithmetic with `f64`
/// operands is required so that real market inputs (strike, rates, volatility)
/// never need to be lifted into the complex plane explicitly.
pub trait Scalar:
    Copy
    + Debug
    + PartialEq
    + Send
    + Sync
    + Zero
    + One
    + From<f64>
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + Add<f64, Output = Self>
    + Sub<f64, Output = Self>
    + Mul<f64, Output = Self>
    + Div<f64, Output = Self>
{
    /// Real part of the value.
    fn re(self) -> f64;

    /// Imaginary part of the value (always `0.0` for real types).
    fn im(self) -> f64;

    /// Exponential function.
    fn exp(self) -> Self;

    /// Natural logarithm (principal branch for complex values).
    fn ln(self) -> Self;

    /// Standard normal cumulative distribution Φ.
    ///
    /// For complex arguments this is the analytic continuation of Φ, see
    /// [`distributions::complex_norm_cdf`].
    fn norm_cdf(self) -> Self;

    /// Returns `true` if every component is finite.
    fn is_finite(self) -> bool;
}

impl Scalar for f64 {
    #[inline]
    fn re(self) -> f64 {
        self
    }

    #[inline]
    fn im(self) -> f64 {
        0.0
    }

    #[inline]
    fn exp(self) -> Self {
        f64::exp(self)
    }

    #[inline]
    fn ln(self) -> Self {
        f64::ln(self)
    }

    #[inline]
    fn norm_cdf(self) -> Self {
        distributions::norm_cdf(self)
    }

    #[inline]
    fn is_finite(self) -> bool {
        f64::is_finite(self)
    }
}

impl Scalar for Complex64 {
    #[inline]
    fn re(self) -> f64 {
        self.re
    }

    #[inline]
    fn im(self) -> f64 {
        self.im
    }

    #[inline]
    fn exp(self) -> Self {
        Complex64::exp(self)
    }

    #[inline]
    fn ln(self) -> Self {
        Complex64::ln(self)
    }

    #[inline]
    fn norm_cdf(self) -> Self {
        distributions::complex_norm_cdf(self)
    }

    #[inline]
    fn is_finite(self) -> bool {
        Complex64::is_finite(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square_plus_exp<S: Scalar>(x: S) -> S {
        x * x + x.exp()
    }

    #[test]
    fn test_real_instantiation_matches_f64() {
        let x = 0.75_f64;
        assert_relative_eq!(square_plus_exp(x), x * x + x.exp(), epsilon = 1e-15);
        assert_eq!(Scalar::im(x), 0.0);
    }

    #[test]
    fn test_complex_instantiation_carries_derivative() {
        // Im(f(x + ih)) / h recovers f'(x) = 2x + e^x
        let x = 0.75_f64;
        let h = 1e-20;
        let value = square_plus_exp(Complex64::new(x, h));
        assert_relative_eq!(value.re, x * x + x.exp(), epsilon = 1e-14);
        assert_relative_eq!(value.im / h, 2.0 * x + x.exp(), epsilon = 1e-14);
    }

    #[test]
    fn test_mixed_arithmetic_with_f64() {
        let z = Complex64::new(2.0, 3.0);
        let w = (z + 1.0) * 2.0 - 4.0;
        assert_eq!(w, Complex64::new(2.0, 6.0));
        assert_eq!(<Complex64 as From<f64>>::from(1.5), Complex64::new(1.5, 0.0));
    }

    #[test]
    fn test_is_finite() {
        assert!(Scalar::is_finite(1.0_f64));
        assert!(!Scalar::is_finite(f64::NAN));
        assert!(!Scalar::is_finite(Complex64::new(1.0, f64::INFINITY)));
    }
}
