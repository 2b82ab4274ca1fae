//! Evaluation grids for spot-price sweeps and step-size studies.
//!
//! - [`linear_grid`]: evenly spaced points on `[min, max]`, endpoints exact
//! - [`log_grid`]: points `10^e` for exponents evenly spaced on `[start, end]`
//!
//! Both are pure functions of their inputs, so two sweeps over the same
//! range always visit bit-identical points.

use crate::types::GridError;

/// Builds `points` evenly spaced values from `min` to `max` inclusive.
///
/// Each point is computed as `min + i·step` from the index rather than by
/// accumulation, and the last point is pinned to `max`.
///
/// # Errors
/// - [`GridError::InsufficientPoints`] if `points < 2`
/// - [`GridError::InvalidRange`] if the bounds are not finite or `min >= max`
///
/// # Examples
/// ```
/// use pricer_core::math::grid::linear_grid;
///
/// let grid = linear_grid(50.0, 150.0, 101).unwrap();
/// assert_eq!(grid.len(), 101);
/// assert_eq!(grid[50], 100.0);
/// assert_eq!(grid[100], 150.0);
/// ```
pub fn linear_grid(min: f64, max: f64, points: usize) -> Result<Vec<f64>, GridError> {
    validate(min, max, points)?;

    let step = (max - min) / (points - 1) as f64;
    let mut grid: Vec<f64> = (0..points).map(|i| min + i as f64 * step).collect();
    grid[points - 1] = max;
    Ok(grid)
}

/// Builds `points` logarithmically spaced values `10^e`, with exponents evenly
/// spaced from `start_exponent` to `end_exponent` inclusive.
///
/// # Errors
/// Same conditions as [`linear_grid`], applied to the exponents.
///
/// # Examples
/// ```
/// use pricer_core::math::grid::log_grid;
///
/// let grid = log_grid(-16.0, -4.0, 13).unwrap();
/// assert_eq!(grid.len(), 13);
/// assert!((grid[0] - 1e-16).abs() < 1e-30);
/// assert!((grid[12] - 1e-4).abs() < 1e-18);
/// ```
pub fn log_grid(
    start_exponent: f64,
    end_exponent: f64,
    points: usize,
) -> Result<Vec<f64>, GridError> {
    Ok(linear_grid(start_exponent, end_exponent, points)?
        .into_iter()
        .map(|exponent| 10f64.powf(exponent))
        .collect())
}

fn validate(min: f64, max: f64, points: usize) -> Result<(), GridError> {
    if points < 2 {
        return Err(GridError::InsufficientPoints {
            got: points,
            need: 2,
        });
    }
    if !min.is_finite() || !max.is_finite() || min >= max {
        return Err(GridError::InvalidRange { min, max });
    }
    Ok(())
}
