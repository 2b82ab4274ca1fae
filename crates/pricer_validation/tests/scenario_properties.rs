//! End-to-end properties of scenario runs.
//!
//! # Test Categories
//!
//! 1. **Reference point**: ATM Greeks of the first preset
//! 2. **Method agreement**: complex-step Delta tracks the closed form
//! 3. **Step-size floor**: shrinking a finite-difference step past the
//!    cancellation floor does not help
//! 4. **Idempotence**: repeated runs are bit-identical
//! 5. **Expiry boundary**: all methods agree on the intrinsic Delta

use approx::assert_relative_eq;
use pricer_greeks::{GreekMethod, GreeksEngine, GreeksError};
use pricer_models::analytical::BlackScholesParams;
use pricer_validation::{
    Greek, ScenarioId, ScenarioValidator, StepSizeStudy, StudyEstimator, ValidationConfig,
    ValidationError, ValidationOutcome,
};

fn run(id: ScenarioId) -> pricer_validation::ValidationRun {
    ScenarioValidator::new(id.scenario().unwrap(), ValidationConfig::default())
        .unwrap()
        .run()
        .unwrap()
}

#[test]
fn test_atm_reference_point() {
    let run = run(ScenarioId::AtmReference);
    let analytic = &run.series.method(GreekMethod::Analytic)[50];
    assert_eq!(analytic.spot, 100.0);
    assert_relative_eq!(analytic.delta, 0.539_827_837_277_029, epsilon = 1e-12);
    assert_relative_eq!(analytic.gamma, 0.019_847_627_373_850_59, epsilon = 1e-12);

    for method in [GreekMethod::FiniteDifference, GreekMethod::ComplexStep] {
        let sample = &run.series.method(method)[50];
        assert!((sample.delta - analytic.delta).abs() < 1e-9, "{} delta", method);
        assert!((sample.gamma - analytic.gamma).abs() < 1e-4, "{} gamma", method);
    }
    assert!(run.report.passed);
    assert_eq!(run.outcome(), ValidationOutcome::Passed);
}

#[test]
fn test_complex_step_delta_within_1e9_across_sweep() {
    let run = run(ScenarioId::AtmReference);
    let analytic = run.series.method(GreekMethod::Analytic);
    let cs = run.series.method(GreekMethod::ComplexStep);
    for (a, c) in analytic.iter().zip(cs) {
        assert!((c.delta - a.delta).abs() < 1e-9, "S = {}", a.spot);
    }
}

#[test]
fn test_near_expiry_exceeds_tolerance_without_failing() {
    let mut validator = ScenarioValidator::new(
        ScenarioId::NearExpiryLowVol.scenario().unwrap(),
        ValidationConfig::default(),
    )
    .unwrap();

    let run = match validator.run() {
        Ok(run) => run,
        Err(ValidationError::GridPointFailed {
            source: GreeksError::InvalidStepSize { .. },
            ..
        }) => panic!("default steps must stay valid in the near-expiry sweep"),
        Err(err) => panic!("unexpected failure: {}", err),
    };

    assert!(!run.report.passed);
    match run.outcome() {
        ValidationOutcome::ToleranceExceeded { breaches } => {
            assert!(breaches.iter().any(|b| b.greek == Greek::Gamma));
            assert!(breaches.iter().all(|b| b.method != GreekMethod::Analytic));
        }
        ValidationOutcome::Passed => panic!("expected a tolerance breach"),
    }
}

#[test]
fn test_gamma_tolerance_looser_than_delta() {
    let run = run(ScenarioId::AtmReference);
    assert!(run.report.tolerances.gamma > run.report.tolerances.delta);
}

#[test]
fn test_finite_difference_below_floor_not_better() {
    let params = BlackScholesParams::new(100.0, 100.0, 0.0, 0.0, 0.2, 1.0).unwrap();
    let optimal = f64::EPSILON.cbrt();
    let study = StepSizeStudy::new(params, vec![1e-12, optimal])
        .unwrap()
        .run()
        .unwrap();

    let below = study.rows[0].error(StudyEstimator::FdCentralDelta).unwrap();
    let at_floor = study.rows[1].error(StudyEstimator::FdCentralDelta).unwrap();
    assert!(below >= at_floor, "{} < {}", below, at_floor);

    // Complex step has no floor
    let cs = study.rows[0].error(StudyEstimator::CsDelta).unwrap();
    assert!(cs < 1e-12);
}

#[test]
fn test_repeated_runs_bit_identical() {
    let first = run(ScenarioId::NearExpiryLowVol);
    let second = run(ScenarioId::NearExpiryLowVol);

    let bits = |run: &pricer_validation::ValidationRun| -> Vec<(u64, u64, u64)> {
        run.series
            .iter()
            .map(|s| (s.spot.to_bits(), s.delta.to_bits(), s.gamma.to_bits()))
            .collect()
    };
    assert_eq!(bits(&first), bits(&second));
}

#[test]
fn test_expiry_boundary_delta_across_methods() {
    let engine = GreeksEngine::with_defaults();
    for (spot, expected) in [(110.0, 1.0), (90.0, 0.0)] {
        let params = BlackScholesParams::new(spot, 100.0, 0.03, 0.0, 0.2, 0.0).unwrap();
        for sample in engine.sample_all(&params).unwrap() {
            assert!(
                (sample.delta - expected).abs() < 1e-9,
                "{} at S = {}: {}",
                sample.method,
                spot,
                sample.delta
            );
            assert!(sample.gamma.abs() < 1e-8, "{} gamma", sample.method);
        }
    }
}
