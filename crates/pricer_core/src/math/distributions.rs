//! Standard normal distribution functions over real and complex arguments.
//!
//! This module provides:
//! - `norm_cdf`: Φ(x) for real x, to a few ulps across the real line
//! - `norm_pdf`: φ(x) for real x
//! - `complex_norm_cdf`: the analytic continuation Φ(x + iy)
//! - `complex_erfc`: the complex complementary error function, erfc(z) = 2Φ(−√2·z)
//!
//! ## Real Φ
//!
//! - |x| < 1: Maclaurin series Φ(x) = ½ + φ(x)·(x + x³/3 + x⁵/15 + …), all
//!   terms of one sign
//! - |x| ≥ 1: the lower tail Φ(−|x|) from the Legendre continued fraction of
//!   the upper incomplete gamma function, Φ(−t) = ½·Q(½, t²/2), evaluated
//!   bottom-up; the upper tail is 1 − Φ(−x)
//!
//! φ splits its argument so that the large part of x² is exact before
//! exponentiation. Relative error stays near 1e-15 wherever Φ(x) is a normal
//! float, so the closed-form Greeks and the complex continuation below share
//! one full-precision Φ and φ.
//!
//! ## Complex continuation
//!
//! Φ is entire, so its continuation off the real axis is the Taylor series
//! about the real part:
//!
//! Φ(x + iy) = Φ(x) + φ(x) · Σₖ (−1)ᵏ Heₖ(x) (iy)ᵏ⁺¹ / (k+1)!
//!
//! where Heₖ are the probabilists' Hermite polynomials
//! (He₀ = 1, He₁ = x, Heₖ₊₁ = x·Heₖ − k·Heₖ₋₁). Both the imaginary part (first
//! derivative information) and the real part (second derivative information)
//! are carried exactly up to series truncation, which matters for the
//! complex-step Gamma estimator that reads the real part.
//!
//! The series converges for every y but loses accuracy once |y| is no longer
//! small relative to 1; complex-step evaluations only ever use tiny imaginary
//! parts. When the series fails to converge within [`MAX_SERIES_TERMS`] the
//! result is NaN so the caller reports a kernel failure instead of a wrong
//! number.

use num_complex::Complex64;

/// 1 / sqrt(2π)
const FRAC_1_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// Upper bound on Hermite series terms before giving up.
pub const MAX_SERIES_TERMS: usize = 200;

/// Relative size below which a series term is treated as negligible.
const SERIES_TOLERANCE: f64 = 1e-18;

/// |x| below which the real Φ uses the Maclaurin series.
const CDF_SERIES_CUTOFF: f64 = 1.0;

/// Continued-fraction depth is `TAIL_MIN_DEPTH + ⌈TAIL_DEPTH_SCALE / t²⌉`.
const TAIL_MIN_DEPTH: usize = 8;
const TAIL_DEPTH_SCALE: f64 = 240.0;

/// φ vanishes in f64 beyond this |x|.
const PDF_UNDERFLOW: f64 = 40.0;

/// Standard normal cumulative distribution function.
///
/// Relative error is a few ulps wherever the result is a normal float,
/// including deep in the lower tail.
///
/// # Examples
/// ```
/// use pricer_core::math::distributions::norm_cdf;
///
/// assert_eq!(norm_cdf(0.0), 0.5);
/// assert!((norm_cdf(1.0) - 0.841_344_746_068_542_9).abs() < 1e-15);
/// assert!((norm_cdf(-10.0) / 7.619_853_024_160_525e-24 - 1.0).abs() < 1e-14);
/// ```
pub fn norm_cdf(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }

    let t = x.abs();
    if t < CDF_SERIES_CUTOFF {
        0.5 + central_series(x)
    } else if x < 0.0 {
        lower_tail(t)
    } else {
        1.0 - lower_tail(t)
    }
}

/// Φ(x) − ½ = φ(x)·Σₙ x^(2n+1) / (2n+1)!!
fn central_series(x: f64) -> f64 {
    let x2 = x * x;
    let mut term = x;
    let mut sum = x;
    for n in 1..MAX_SERIES_TERMS {
        term *= x2 / (2 * n + 1) as f64;
        sum += term;
        if term.abs() <= 0.5 * f64::EPSILON * sum.abs() {
            break;
        }
    }
    norm_pdf(x) * sum
}

/// Φ(−t) for t ≥ 1.
///
/// Φ(−t) = ½·t·φ(t) / (b₀ + a₁/(b₁ + a₂/(b₂ + …))) with bᵢ = t²/2 + ½ + 2i
/// and aᵢ = −i·(i − ½).
fn lower_tail(t: f64) -> f64 {
    let density = norm_pdf(t);
    if density == 0.0 {
        return 0.0;
    }

    let half_square = 0.5 * t * t;
    let depth = TAIL_MIN_DEPTH + (TAIL_DEPTH_SCALE / (t * t)).ceil() as usize;

    let mut fraction = 0.0;
    for i in (1..=depth).rev() {
        let i = i as f64;
        fraction = -i * (i - 0.5) / (half_square + 0.5 + 2.0 * i + fraction);
    }
    0.5 * t * density / (half_square + 0.5 + fraction)
}

/// Standard normal probability density function.
///
/// φ(x) = (1 / √(2π)) · exp(−x² / 2)
///
/// # Examples
/// ```
/// use pricer_core::math::distributions::norm_pdf;
///
/// assert!((norm_pdf(0.0) - 0.398_942_280_401_432_7).abs() < 1e-15);
/// ```
pub fn norm_pdf(x: f64) -> f64 {
    let t = x.abs();
    if t.is_nan() {
        return f64::NAN;
    }
    if t > PDF_UNDERFLOW {
        return 0.0;
    }

    // x² = high² + low with high² exact
    let high = (t * 16.0).trunc() / 16.0;
    let low = (t - high) * (t + high);
    FRAC_1_SQRT_2PI * (-0.5 * high * high).exp() * (-0.5 * low).exp()
}

/// Analytic continuation of the standard normal CDF to complex arguments.
///
/// Evaluates the Hermite–Taylor series about `z.re` (see module docs). For a
/// purely real argument this is exactly [`norm_cdf`].
///
/// # Examples
/// ```
/// use num_complex::Complex64;
/// use pricer_core::math::distributions::{complex_norm_cdf, norm_pdf};
///
/// // Im Φ(x + ih) / h → φ(x)
/// let h = 1e-20;
/// let value = complex_norm_cdf(Complex64::new(0.3, h));
/// assert!((value.im / h - norm_pdf(0.3)).abs() < 1e-15);
/// ```
pub fn complex_norm_cdf(z: Complex64) -> Complex64 {
    let x = z.re;
    let y = z.im;
    let base = norm_cdf(x);

    if y == 0.0 {
        return Complex64::new(base, 0.0);
    }

    let density = norm_pdf(x);
    if density == 0.0 {
        // Far tail: every derivative of Φ is below f64 range
        return Complex64::new(base, 0.0);
    }

    let iy = Complex64::new(0.0, y);

    // k = 0 term: He₀ = 1, coefficient (iy)¹ / 1!
    let mut coefficient = iy;
    let mut he_prev = 0.0_f64;
    let mut he_curr = 1.0_f64;
    let mut series = coefficient;
    let mut previous_small = false;

    for k in 1..MAX_SERIES_TERMS {
        // Heₖ = x·Heₖ₋₁ − (k−1)·Heₖ₋₂
        let he_next = x * he_curr - (k as f64 - 1.0) * he_prev;
        he_prev = he_curr;
        he_curr = he_next;

        coefficient = coefficient * iy / (k as f64 + 1.0);
        let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
        let term = coefficient * (sign * he_curr);
        series += term;

        if !series.is_finite() {
            break;
        }

        // Hermite zeros can make a single term vanish; consecutive Hermite
        // polynomials never share a zero.
        let small = term.norm() <= SERIES_TOLERANCE * series.norm();
        if small && previous_small {
            return Complex64::new(base, 0.0) + series * density;
        }
        previous_small = small;
    }

    Complex64::new(f64::NAN, f64::NAN)
}

/// Complex complementary error function.
///
/// erfc(z) = 2 · Φ(−√2 · z), using [`complex_norm_cdf`]. Agrees with the real
/// `erfc` on the real axis.
///
/// # Examples
/// ```
/// use num_complex::Complex64;
/// use pricer_core::math::distributions::complex_erfc;
///
/// let value = complex_erfc(Complex64::new(0.0, 0.0));
/// assert!((value.re - 1.0).abs() < 1e-15);
/// ```
pub fn complex_erfc(z: Complex64) -> Complex64 {
    complex_norm_cdf(-z * std::f64::consts::SQRT_2) * 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    // ==========================================================
    // Real Φ / φ
    // ==========================================================

    #[test]
    fn test_norm_cdf_reference_values() {
        assert_eq!(norm_cdf(0.0), 0.5);
        assert_relative_eq!(norm_cdf(1.0), 0.8413447460685429, max_relative = 2e-15);
        assert_relative_eq!(norm_cdf(-1.0), 0.15865525393145705, max_relative = 2e-15);
        assert_relative_eq!(norm_cdf(2.0), 0.9772498680518208, max_relative = 2e-15);
        assert_relative_eq!(norm_cdf(0.1), 0.539827837277029, max_relative = 2e-15);
    }

    #[test]
    fn test_norm_cdf_full_precision_across_regions() {
        // Reference values to 40 significant digits, rounded to f64. Points
        // straddle the series / continued-fraction switch at |x| = 1.
        let cases = [
            (-20.0, 2.7536241186062337e-89),
            (-10.0, 7.619853024160525e-24),
            (-5.0, 2.866515718791939e-07),
            (-3.0, 0.0013498980316300946),
            (-2.0, 0.02275013194817921),
            (-1.5, 0.06680720126885807),
            (-0.95, 0.17105612630848183),
            (-0.75, 0.2266273523768682),
            (0.5, 0.6914624612740131),
        ];
        for (x, expected) in cases {
            assert_relative_eq!(norm_cdf(x), expected, max_relative = 4e-15);
        }
    }

    #[test]
    fn test_norm_cdf_limits() {
        assert_eq!(norm_cdf(-60.0), 0.0);
        assert_eq!(norm_cdf(60.0), 1.0);
        assert_eq!(norm_cdf(f64::NEG_INFINITY), 0.0);
        assert_eq!(norm_cdf(f64::INFINITY), 1.0);
        assert!(norm_cdf(f64::NAN).is_nan());
    }

    #[test]
    fn test_norm_cdf_symmetry() {
        for x in [-3.0, -1.5, -0.25, 0.0, 0.25, 1.5, 3.0] {
            assert_abs_diff_eq!(norm_cdf(x) + norm_cdf(-x), 1.0, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_norm_cdf_tail_keeps_relative_precision() {
        // 1 − Φ(x) evaluated as Φ(−x) must not collapse to zero at moderate x
        let tail = norm_cdf(-10.0);
        assert!(tail > 0.0);
        assert_relative_eq!(tail, 7.619853024160527e-24, max_relative = 1e-12);
    }

    #[test]
    fn test_norm_pdf_reference_values() {
        assert_relative_eq!(norm_pdf(0.0), FRAC_1_SQRT_2PI, epsilon = 1e-16);
        assert_relative_eq!(norm_pdf(1.0), 0.24197072451914337, epsilon = 1e-15);
        assert_relative_eq!(norm_pdf(-2.0), 0.05399096651318806, epsilon = 1e-15);
    }

    // ==========================================================
    // Complex continuation
    // ==========================================================

    #[test]
    fn test_complex_cdf_on_real_axis() {
        for x in [-2.0, -0.5, 0.0, 0.7, 3.0] {
            let value = complex_norm_cdf(Complex64::new(x, 0.0));
            assert_eq!(value.re, norm_cdf(x));
            assert_eq!(value.im, 0.0);
        }
    }

    #[test]
    fn test_complex_cdf_first_order_is_density() {
        let h = 1e-12;
        for x in [-2.0, -0.5, 0.0, 0.7, 3.0] {
            let value = complex_norm_cdf(Complex64::new(x, h));
            assert_relative_eq!(value.im / h, norm_pdf(x), max_relative = 1e-12);
        }
    }

    #[test]
    fn test_complex_cdf_second_order_real_part() {
        // Re Φ(x + iy) = Φ(x) − y²/2 · Φ''(x) + O(y⁴), Φ''(x) = −x·φ(x)
        let y = 1e-3;
        for x in [-1.5, -0.3, 0.4, 1.2] {
            let value = complex_norm_cdf(Complex64::new(x, y));
            let curvature = 2.0 * (value.re - norm_cdf(x)) / (y * y);
            assert_relative_eq!(curvature, x * norm_pdf(x), max_relative = 1e-5);
        }
    }

    #[test]
    fn test_complex_cdf_matches_closed_form_on_imaginary_axis() {
        // Φ(iy) = ½ + i·(1/√(2π))·∫₀ʸ e^{t²/2} dt; for small y the integral
        // is y + y³/6 + y⁵/40 + y⁷/336 + y⁹/3456
        let y = 0.2_f64;
        let integral =
            y + y.powi(3) / 6.0 + y.powi(5) / 40.0 + y.powi(7) / 336.0 + y.powi(9) / 3456.0;
        let value = complex_norm_cdf(Complex64::new(0.0, y));
        assert_abs_diff_eq!(value.re, 0.5, epsilon = 1e-15);
        assert_relative_eq!(value.im, FRAC_1_SQRT_2PI * integral, max_relative = 1e-9);
    }

    #[test]
    fn test_complex_cdf_conjugate_symmetry() {
        let z = Complex64::new(0.4, 0.05);
        let a = complex_norm_cdf(z);
        let b = complex_norm_cdf(z.conj());
        assert_relative_eq!(a.re, b.re, epsilon = 1e-15);
        assert_relative_eq!(a.im, -b.im, epsilon = 1e-15);
    }

    #[test]
    fn test_complex_cdf_far_tail_is_finite() {
        let value = complex_norm_cdf(Complex64::new(-60.0, 1e-10));
        assert!(value.is_finite());
        assert_eq!(value.im, 0.0);
    }

    #[test]
    fn test_complex_erfc_matches_real_erfc() {
        let cases = [
            (-1.0, 1.8427007929497148),
            (0.0, 1.0),
            (0.5, 0.4795001221869535),
            (2.0, 0.004677734981047266),
        ];
        for (x, expected) in cases {
            let value = complex_erfc(Complex64::new(x, 0.0));
            assert_relative_eq!(value.re, expected, max_relative = 4e-15);
        }
    }

    #[test]
    fn test_complex_erfc_derivative() {
        // d/dz erfc(z) = −(2/√π)·e^{−z²}
        let h = 1e-20;
        let x = 0.6_f64;
        let value = complex_erfc(Complex64::new(x, h));
        let expected = -2.0 / std::f64::consts::PI.sqrt() * (-x * x).exp();
        assert_relative_eq!(value.im / h, expected, max_relative = 1e-13);
    }
}
