//! Target and predictor selection
//!
//! A [`ModelSpec`] names the target column and the predictor columns of a
//! regression, in the manner of a model formula. [`ModelFrame`] materializes
//! it against a derived dataset as a dense row-major predictor matrix.

use rockfall_pipeline::{dataset::DerivedDataset, record::Column};
use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Predictors shared by the linear presets.
pub const BASE_PREDICTORS: [Column; 6] = [
    Column::SlopeHeight,
    Column::SlopeAngle,
    Column::Weight,
    Column::IsRock,
    Column::IsColluvium,
    Column::IsWeatheredRock,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSpec {
    pub target: Column,
    pub predictors: Vec<Column>,
    /// Model the natural logarithm of the target instead of the target.
    pub log_target: bool,
}

impl ModelSpec {
    /// Total energy against slope geometry, weight and material indicators.
    #[must_use]
    pub fn linear() -> Self {
        Self {
            target: Column::TotalEnergy,
            predictors: BASE_PREDICTORS.to_vec(),
            log_target: false,
        }
    }

    /// Like [`Self::linear`], on the log of total energy.
    #[must_use]
    pub fn log_linear() -> Self {
        Self {
            log_target: true,
            ..Self::linear()
        }
    }
}

/// Target vector and predictor rows of one regression problem.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelFrame {
    spec: ModelSpec,
    target: Vec<f64>,
    rows: Vec<Vec<f64>>,
}

impl ModelFrame {
    pub fn from_dataset(dataset: &DerivedDataset, spec: &ModelSpec) -> Result<Self, ModelError> {
        if let Some(&column) = spec.predictors.iter().find(|&&c| c == spec.target) {
            return Err(ModelError::TargetAsPredictor { column });
        }
        if dataset.is_empty() {
            return Err(ModelError::EmptyFrame);
        }

        let mut target = Vec::with_capacity(dataset.len());
        let mut rows = Vec::with_capacity(dataset.len());
        for record in dataset.records() {
            let value = spec.target.value(record);
            let value = if spec.log_target {
                if value <= 0.0 {
                    return Err(ModelError::NonPositiveTarget {
                        index: record.observation.source_index,
                        value,
                    });
                }
                value.ln()
            } else {
                value
            };
            target.push(value);
            rows.push(spec.predictors.iter().map(|c| c.value(record)).collect());
        }

        Ok(Self {
            spec: spec.clone(),
            target,
            rows,
        })
    }

    /// Builds a frame from already extracted values.
    ///
    /// `target` must already be on the modeled scale (logged when
    /// `spec.log_target` is set).
    ///
    /// # Panics
    ///
    /// Panics if `target` and `rows` differ in length or a row's width differs
    /// from the number of predictors.
    #[must_use]
    pub fn from_parts(spec: ModelSpec, target: Vec<f64>, rows: Vec<Vec<f64>>) -> Self {
        assert_eq!(target.len(), rows.len());
        assert!(rows.iter().all(|r| r.len() == spec.predictors.len()));
        Self { spec, target, rows }
    }

    #[must_use]
    pub fn spec(&self) -> &ModelSpec {
        &self.spec
    }

    #[must_use]
    pub fn target(&self) -> &[f64] {
        &self.target
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    #[must_use]
    pub fn predictor_names(&self) -> Vec<&'static str> {
        self.spec.predictors.iter().map(|c| c.name()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.target.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.target.is_empty()
    }

    /// Frame restricted to the rows at `indices`, in that order.
    #[must_use]
    pub fn subset(&self, indices: &[usize]) -> Self {
        Self {
            spec: self.spec.clone(),
            target: indices.iter().map(|&i| self.target[i]).collect(),
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rockfall_pipeline::{PipelineConfig, prepare, record::RawRecord};

    use super::*;

    fn raw(material: &str, height: f64, trans: f64) -> RawRecord {
        RawRecord {
            test_group: Some("G1".to_string()),
            slope_material: Some(material.to_string()),
            slope_height: Some(height),
            slope_angle: Some(45.0),
            weight: Some(1000.0),
            translational_kinetic_energy: Some(trans),
            rotational_kinetic_energy: Some(1.0),
        }
    }

    fn dataset(records: &[RawRecord]) -> DerivedDataset {
        prepare(records, &PipelineConfig::default()).unwrap().dataset
    }

    #[test]
    fn test_linear_frame() {
        let data = dataset(&[raw("Rock", 40.0, 9.0), raw("Colluvium", 60.0, 19.0)]);
        let frame = ModelFrame::from_dataset(&data, &ModelSpec::linear()).unwrap();

        assert_eq!(frame.len(), 2);
        assert_eq!(frame.target(), &[10.0, 20.0]);
        assert_eq!(frame.rows()[0], vec![40.0, 45.0, 1000.0, 1.0, 0.0, 0.0]);
        assert_eq!(frame.rows()[1], vec![60.0, 45.0, 1000.0, 0.0, 1.0, 0.0]);
        assert_eq!(
            frame.predictor_names(),
            vec![
                "slope_height",
                "slope_angle",
                "weight",
                "is_rock",
                "is_colluvium",
                "is_weathered_rock"
            ]
        );
    }

    #[test]
    fn test_log_target() {
        let data = dataset(&[raw("Rock", 40.0, 9.0)]);
        let frame = ModelFrame::from_dataset(&data, &ModelSpec::log_linear()).unwrap();
        assert!((frame.target()[0] - 10.0_f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_log_target_rejects_non_positive() {
        let mut zero = raw("Rock", 40.0, 0.0);
        zero.rotational_kinetic_energy = Some(0.0);
        let data = dataset(&[raw("Rock", 40.0, 9.0), zero]);
        let err = ModelFrame::from_dataset(&data, &ModelSpec::log_linear()).unwrap_err();
        assert_eq!(err, ModelError::NonPositiveTarget { index: 1, value: 0.0 });

        assert!(ModelFrame::from_dataset(&data, &ModelSpec::linear()).is_ok());
    }

    #[test]
    fn test_non_positive_target_names_input_position() {
        let mut no_angle = raw("Rock", 40.0, 9.0);
        no_angle.slope_angle = None;
        let mut zero = raw("Rock", 40.0, 0.0);
        zero.rotational_kinetic_energy = Some(0.0);
        let data = dataset(&[no_angle, raw("Rock", 40.0, 9.0), zero]);
        let err = ModelFrame::from_dataset(&data, &ModelSpec::log_linear()).unwrap_err();
        assert_eq!(err, ModelError::NonPositiveTarget { index: 2, value: 0.0 });
    }

    #[test]
    fn test_target_as_predictor() {
        let data = dataset(&[raw("Rock", 40.0, 9.0)]);
        let spec = ModelSpec {
            target: Column::Weight,
            predictors: vec![Column::SlopeHeight, Column::Weight],
            log_target: false,
        };
        assert_eq!(
            ModelFrame::from_dataset(&data, &spec).unwrap_err(),
            ModelError::TargetAsPredictor {
                column: Column::Weight
            }
        );
    }

    #[test]
    fn test_empty_dataset() {
        let data = dataset(&[]);
        assert_eq!(
            ModelFrame::from_dataset(&data, &ModelSpec::linear()).unwrap_err(),
            ModelError::EmptyFrame
        );
    }

    #[test]
    fn test_subset() {
        let data = dataset(&[
            raw("Rock", 10.0, 0.0),
            raw("Rock", 20.0, 1.0),
            raw("Rock", 30.0, 2.0),
        ]);
        let frame = ModelFrame::from_dataset(&data, &ModelSpec::linear()).unwrap();
        let sub = frame.subset(&[2, 0]);
        assert_eq!(sub.target(), &[3.0, 1.0]);
        assert_eq!(sub.rows()[0][0], 30.0);
    }
}
