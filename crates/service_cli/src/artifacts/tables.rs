//! CSV exports of sample series and step-size studies.

use std::path::Path;

use pricer_greeks::GreekMethod;
use pricer_validation::{GreekSeries, StepStudy, StudyEstimator};
use serde::Serialize;

use crate::Result;

#[derive(Debug, Serialize)]
struct SampleRecord<'a> {
    spot: f64,
    method: &'a str,
    delta: f64,
    gamma: f64,
    gamma_estimator: &'a str,
    delta_step: Option<f64>,
    gamma_step: Option<f64>,
}

/// One row per (spot, method), grid order, Analytic first at each spot.
pub fn write_samples(path: &Path, series: &GreekSeries) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path)?;
    let mut rows = 0;

    let samples = (0..series.len())
        .flat_map(|i| GreekMethod::ALL.into_iter().map(move |m| (i, m)))
        .map(move |(i, method)| &series.method(method)[i]);

    for sample in samples {
        writer.serialize(SampleRecord {
            spot: sample.spot,
            method: sample.method.name(),
            delta: sample.delta,
            gamma: sample.gamma,
            gamma_estimator: sample.gamma_estimator.label(),
            delta_step: sample.steps.map(|s| s.delta),
            gamma_step: sample.steps.map(|s| s.gamma),
        })?;
        rows += 1;
    }

    writer.flush()?;
    Ok(rows)
}

/// One row per relative step: value, absolute error and realised step of
/// every estimator. Degenerate steps leave all three cells empty.
pub fn write_step_study(path: &Path, study: &StepStudy) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path)?;

    let mut header = vec![
        "relative_step".to_string(),
        "nominal_step".to_string(),
        "analytic_delta".to_string(),
        "analytic_gamma".to_string(),
    ];
    for estimator in StudyEstimator::ALL {
        header.push(estimator.label().to_string());
        header.push(format!("{}_error", estimator.label()));
        header.push(format!("{}_step", estimator.label()));
    }
    writer.write_record(&header)?;

    for row in &study.rows {
        let mut record = vec![
            row.relative_step.to_string(),
            row.nominal_step.to_string(),
            row.analytic_delta.to_string(),
            row.analytic_gamma.to_string(),
        ];
        for estimator in StudyEstimator::ALL {
            record.push(cell(row.value(estimator)));
            record.push(cell(row.error(estimator)));
            record.push(cell(row.realised_step(estimator)));
        }
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(study.rows.len())
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricer_validation::{ScenarioId, ScenarioValidator, StepSizeStudy, ValidationConfig};

    #[test]
    fn test_samples_csv_has_row_per_spot_and_method() {
        let scenario = ScenarioId::AtmReference.scenario().unwrap();
        let run = ScenarioValidator::new(scenario, ValidationConfig::default())
            .unwrap()
            .run()
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("greeks_samples.csv");
        assert_eq!(write_samples(&path, &run.series).unwrap(), 303);

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "spot");
        assert_eq!(&headers[4], "gamma_estimator");

        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 303);
        assert_eq!(&records[0][1], "Analytic");
        // Closed form has no step
        assert_eq!(&records[0][5], "");
        assert_eq!(&records[2][4], "HybridComplexStep");
    }

    #[test]
    fn test_step_study_csv_leaves_degenerate_cells_empty() {
        let scenario = ScenarioId::AtmReference.scenario().unwrap();
        let study = StepSizeStudy::new(*scenario.base(), vec![1e-18, 1e-6])
            .unwrap()
            .run()
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("step_study.csv");
        assert_eq!(write_step_study(&path, &study).unwrap(), 2);

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), 4 + 3 * StudyEstimator::ALL.len());
        assert_eq!(&headers[1], "nominal_step");
        assert_eq!(&headers[6], "fd_central_delta_step");
        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        // fd_central_delta is the first estimator column
        assert_eq!(&records[0][4], "");
        assert_eq!(&records[0][6], "");
        assert!(!records[1][4].is_empty());

        // Realised finite-difference step is (S + h) − S, not the nominal h
        let nominal: f64 = records[1][1].parse().unwrap();
        let realised: f64 = records[1][6].parse().unwrap();
        assert_eq!(realised, (100.0 + nominal) - 100.0);
    }
}
