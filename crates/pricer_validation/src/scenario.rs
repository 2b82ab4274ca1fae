//! Named validation scenarios.
//!
//! A [`Scenario`] bundles immutable base parameters with a [`SpotSweep`].
//! The two canonical configurations are exposed as [`ScenarioId`] presets:
//!
//! | Id | Name | S, K | r, q | σ | T | Sweep |
//! |----|------|------|------|---|---|-------|
//! | 1 | ATM Reference | 100 | 0 | 0.20 | 1 | 50 … 150, 101 points |
//! | 2 | Near-expiry low-vol ATM | 100 | 0 | 0.01 | 1/365 | 99.75 … 100.25, 101 points |
//!
//! The near-expiry sweep is narrow because σ√T ≈ 5.2e-4: all of the
//! curvature sits within a few tenths of the strike.

use std::fmt;
use std::str::FromStr;

use pricer_core::math::linear_grid;
use pricer_models::analytical::{AnalyticalError, BlackScholesParams};

use crate::error::ValidationError;

/// Canonical scenario presets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ScenarioId {
    /// S = K = 100, r = q = 0, σ = 0.20, T = 1
    AtmReference,
    /// S = K = 100, r = q = 0, σ = 0.01, T = 1/365
    NearExpiryLowVol,
}

impl ScenarioId {
    /// All presets in id order.
    pub const ALL: [ScenarioId; 2] = [ScenarioId::AtmReference, ScenarioId::NearExpiryLowVol];

    /// Numeric identifier used by the calling layer.
    pub fn number(&self) -> u8 {
        match self {
            Self::AtmReference => 1,
            Self::NearExpiryLowVol => 2,
        }
    }

    /// Stable textual identifier.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::AtmReference => "atm-reference",
            Self::NearExpiryLowVol => "near-expiry-low-vol",
        }
    }

    /// Get human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AtmReference => "ATM Reference",
            Self::NearExpiryLowVol => "Near-expiry low-vol ATM",
        }
    }

    /// Get description.
    pub fn description(&self) -> &'static str {
        match self {
            Self::AtmReference => "S = K = 100, r = q = 0, vol 20%, one year to expiry",
            Self::NearExpiryLowVol => "S = K = 100, r = q = 0, vol 1%, one day to expiry",
        }
    }

    /// Builds the preset scenario.
    pub fn scenario(&self) -> Result<Scenario, ValidationError> {
        let (volatility, expiry, sweep) = match self {
            Self::AtmReference => (
                0.20,
                1.0,
                SpotSweep {
                    min: 50.0,
                    max: 150.0,
                    points: 101,
                },
            ),
            Self::NearExpiryLowVol => (
                0.01,
                1.0 / 365.0,
                SpotSweep {
                    min: 99.75,
                    max: 100.25,
                    points: 101,
                },
            ),
        };

        Ok(Scenario {
            name: self.name().to_string(),
            id: Some(*self),
            base: BlackScholesParams::new(100.0, 100.0, 0.0, 0.0, volatility, expiry)?,
            sweep,
        })
    }
}

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ScenarioId {
    type Err = ValidationError;

    /// Parses `1`, `2` or a slug, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "atm-reference" | "atm" => Ok(Self::AtmReference),
            "2" | "near-expiry-low-vol" | "near-expiry" => Ok(Self::NearExpiryLowVol),
            other => Err(ValidationError::InvalidScenario {
                reason: format!("unknown scenario id '{}'", other),
            }),
        }
    }
}

/// Spot-price sweep: `points` evenly spaced spots on `[min, max]`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpotSweep {
    min: f64,
    max: f64,
    points: usize,
}

impl SpotSweep {
    /// Creates a sweep.
    ///
    /// # Errors
    /// `InvalidScenario` if `min` is not positive, `min >= max`, or fewer than
    /// two points are requested.
    pub fn new(min: f64, max: f64, points: usize) -> Result<Self, ValidationError> {
        if !(min.is_finite() && min > 0.0) {
            return Err(ValidationError::InvalidScenario {
                reason: format!("sweep minimum must be positive, got {}", min),
            });
        }
        linear_grid(min, max, points)?;
        Ok(Self { min, max, points })
    }

    /// Lowest spot.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Highest spot.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Number of grid points.
    pub fn points(&self) -> usize {
        self.points
    }

    /// Grid spots in ascending order.
    pub fn spots(&self) -> Result<Vec<f64>, ValidationError> {
        Ok(linear_grid(self.min, self.max, self.points)?)
    }
}

/// Immutable validation scenario.
///
/// # Examples
/// ```
/// use pricer_validation::{Scenario, ScenarioId};
///
/// let scenario: Scenario = "1".parse::<ScenarioId>().unwrap().scenario().unwrap();
/// assert_eq!(scenario.name(), "ATM Reference");
/// assert_eq!(scenario.spots().unwrap()[50], 100.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Scenario {
    name: String,
    id: Option<ScenarioId>,
    base: BlackScholesParams,
    sweep: SpotSweep,
}

impl Scenario {
    /// Creates a custom scenario around `base`.
    pub fn new(name: impl Into<String>, base: BlackScholesParams, sweep: SpotSweep) -> Self {
        Self {
            name: name.into(),
            id: None,
            base,
            sweep,
        }
    }

    /// Scenario name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Preset id, if the scenario is a preset.
    pub fn id(&self) -> Option<ScenarioId> {
        self.id
    }

    /// Base parameters (the spot is the sweep's reference spot).
    pub fn base(&self) -> &BlackScholesParams {
        &self.base
    }

    /// Spot sweep.
    pub fn sweep(&self) -> &SpotSweep {
        &self.sweep
    }

    /// Sweep spots in ascending order.
    pub fn spots(&self) -> Result<Vec<f64>, ValidationError> {
        self.sweep.spots()
    }

    /// Base parameters with the spot replaced.
    pub fn params_at(&self, spot: f64) -> Result<BlackScholesParams, AnalyticalError> {
        self.base.with_spot(spot)
    }
}

impl TryFrom<ScenarioId> for Scenario {
    type Error = ValidationError;

    fn try_from(id: ScenarioId) -> Result<Self, Self::Error> {
        id.scenario()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numeric_and_slug_ids() {
        assert_eq!("1".parse::<ScenarioId>().unwrap(), ScenarioId::AtmReference);
        assert_eq!("2".parse::<ScenarioId>().unwrap(), ScenarioId::NearExpiryLowVol);
        assert_eq!(
            "ATM-Reference".parse::<ScenarioId>().unwrap(),
            ScenarioId::AtmReference
        );
        assert_eq!(
            " near-expiry-low-vol ".parse::<ScenarioId>().unwrap(),
            ScenarioId::NearExpiryLowVol
        );
    }

    #[test]
    fn test_parse_unknown_id() {
        match "3".parse::<ScenarioId>() {
            Err(ValidationError::InvalidScenario { reason }) => assert!(reason.contains("'3'")),
            other => panic!("Expected InvalidScenario, got {:?}", other),
        }
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for id in ScenarioId::ALL {
            assert_eq!(id.to_string().parse::<ScenarioId>().unwrap(), id);
        }
    }

    #[test]
    fn test_atm_reference_preset() {
        let scenario = ScenarioId::AtmReference.scenario().unwrap();
        let base = scenario.base();
        assert_eq!(base.spot(), 100.0);
        assert_eq!(base.strike(), 100.0);
        assert_eq!(base.volatility(), 0.2);
        assert_eq!(base.expiry(), 1.0);
        assert_eq!(scenario.id(), Some(ScenarioId::AtmReference));

        let spots = scenario.spots().unwrap();
        assert_eq!(spots.len(), 101);
        assert_eq!(spots[0], 50.0);
        assert_eq!(spots[50], 100.0);
        assert_eq!(spots[100], 150.0);
    }

    #[test]
    fn test_near_expiry_preset() {
        let scenario = ScenarioId::NearExpiryLowVol.scenario().unwrap();
        assert_eq!(scenario.base().volatility(), 0.01);
        assert_eq!(scenario.base().expiry(), 1.0 / 365.0);
        let spots = scenario.spots().unwrap();
        assert_eq!(spots[50], 100.0);
        assert!(spots.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_sweep_validation() {
        assert!(SpotSweep::new(0.0, 100.0, 10).is_err());
        assert!(SpotSweep::new(100.0, 50.0, 10).is_err());
        assert!(SpotSweep::new(50.0, 100.0, 1).is_err());
        assert!(SpotSweep::new(50.0, 100.0, 2).is_ok());
    }

    #[test]
    fn test_params_at_replaces_spot() {
        let scenario = ScenarioId::AtmReference.scenario().unwrap();
        let params = scenario.params_at(75.0).unwrap();
        assert_eq!(params.spot(), 75.0);
        assert_eq!(params.volatility(), 0.2);
    }
}
