//! Field normalization of raw records
//!
//! Turns [`RawRecord`]s into typed [`Observation`]s:
//!
//! 1. Apply the missing-value policy (slope angle, rotational energy)
//! 2. Resolve the slope material category and its indicator flags
//! 3. Assign group codes in first-seen order over the surviving rows
//!
//! The defaults of [`NormalizationPolicy`] reproduce how the field-test
//! report prepared its modeling dataset: rows without a slope angle are
//! excluded and a missing rotational energy counts as zero. Both are
//! provisional data-quality compromises, so they are configurable.
//!
//! Non-finite numbers (`NaN`, infinities) count as missing. Values outside
//! their physical range (slope angle outside (0, 90] degrees, non-positive
//! height or weight, negative energy) are kept but reported.
//!
//! Normalization is idempotent: feeding the observations back (through
//! `RawRecord::from`) yields the same observations and group codes, with no
//! row dropped and no value filled. Only [`Observation::source_index`]
//! changes, when the first pass dropped rows.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::record::{Observation, RawRecord, SlopeMaterial};

/// What to do with a record whose slope angle is missing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingSlopeAngle {
    /// Exclude the record from the working dataset.
    #[default]
    Drop,
    /// Abort normalization.
    Reject,
}

/// What to do with a record whose rotational kinetic energy is missing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingRotationalEnergy {
    /// Treat the missing value as exactly 0.
    #[default]
    FillZero,
    /// Exclude the record from the working dataset.
    Drop,
    /// Abort normalization.
    Reject,
}

/// What to do with a slope material outside the known categories.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownMaterial {
    /// Keep the record with all material indicators set to 0 and report the value.
    #[default]
    Permissive,
    /// Abort normalization.
    Reject,
}

/// Missing-value and category policy applied by the [`Normalizer`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizationPolicy {
    pub missing_slope_angle: MissingSlopeAngle,
    pub missing_rotational_energy: MissingRotationalEnergy,
    pub unknown_material: UnknownMaterial,
}

/// Errors aborting normalization. `index` is the position in the input slice.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum NormalizationError {
    #[display("record #{index} (group {test_group}) has no slope angle")]
    MissingSlopeAngle { index: usize, test_group: String },
    #[display("record #{index} (group {test_group}) has no rotational kinetic energy")]
    MissingRotationalEnergy { index: usize, test_group: String },
    #[display("record #{index} has unknown slope material '{value}'")]
    UnknownMaterial { index: usize, value: String },
    #[display("record #{index} is missing required field {field}")]
    MissingField { index: usize, field: &'static str },
}

/// Stable numeric codes of test groups, in first-seen order starting at 1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupCodes {
    names: Vec<String>,
    #[serde(skip)]
    codes: HashMap<String, u32>,
}

impl GroupCodes {
    /// Returns the code of `name`, assigning the next one on first sight.
    #[expect(clippy::cast_possible_truncation)]
    pub fn code_for(&mut self, name: &str) -> u32 {
        if let Some(&code) = self.codes.get(name) {
            return code;
        }
        self.names.push(name.to_string());
        let code = self.names.len() as u32;
        self.codes.insert(name.to_string(), code);
        code
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<u32> {
        self.codes.get(name).copied()
    }

    #[must_use]
    pub fn name(&self, code: u32) -> Option<&str> {
        let idx = usize::try_from(code).ok()?.checked_sub(1)?;
        self.names.get(idx).map(String::as_str)
    }

    /// Group names in code order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// What normalization did to the input, for visible policy reporting.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizationReport {
    /// Number of raw records read.
    pub rows_in: usize,
    /// Number of observations produced.
    pub rows_out: usize,
    /// Input indices excluded because the slope angle was missing.
    pub dropped_missing_slope_angle: Vec<usize>,
    /// Input indices excluded because the rotational energy was missing.
    pub dropped_missing_rotational_energy: Vec<usize>,
    /// Input indices whose rotational energy was filled with 0.
    pub filled_rotational_energy: Vec<usize>,
    /// Input indices and values of unrecognized slope materials.
    pub unknown_materials: Vec<(usize, String)>,
    /// Input indices without any slope material.
    pub unset_materials: Vec<usize>,
    /// Input indices and field names of values outside their physical range.
    pub out_of_range: Vec<(usize, &'static str)>,
}

impl NormalizationReport {
    /// Whether the run dropped or filled anything.
    #[must_use]
    pub fn changed_data(&self) -> bool {
        !self.dropped_missing_slope_angle.is_empty()
            || !self.dropped_missing_rotational_energy.is_empty()
            || !self.filled_rotational_energy.is_empty()
    }
}

/// Output of the [`Normalizer`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedData {
    pub observations: Vec<Observation>,
    pub group_codes: GroupCodes,
    pub report: NormalizationReport,
}

/// Applies a [`NormalizationPolicy`] to raw records.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    policy: NormalizationPolicy,
}

impl Normalizer {
    #[must_use]
    pub fn new(policy: NormalizationPolicy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub fn policy(&self) -> &NormalizationPolicy {
        &self.policy
    }

    /// Normalizes raw records without modifying them.
    pub fn normalize(&self, records: &[RawRecord]) -> Result<NormalizedData, NormalizationError> {
        let mut report = NormalizationReport {
            rows_in: records.len(),
            ..NormalizationReport::default()
        };
        let mut group_codes = GroupCodes::default();
        let mut observations = Vec::with_capacity(records.len());

        for (index, record) in records.iter().enumerate() {
            if let Some(obs) = self.normalize_one(index, record, &mut group_codes, &mut report)? {
                observations.push(obs);
            }
        }
        report.rows_out = observations.len();

        info!(
            rows_in = report.rows_in,
            rows_out = report.rows_out,
            groups = group_codes.len(),
            "normalized records"
        );
        if !report.dropped_missing_slope_angle.is_empty() {
            info!(
                count = report.dropped_missing_slope_angle.len(),
                "excluded records without slope angle"
            );
        }
        if !report.filled_rotational_energy.is_empty() {
            info!(
                count = report.filled_rotational_energy.len(),
                "treated missing rotational kinetic energy as 0"
            );
        }
        if !report.out_of_range.is_empty() {
            warn!(
                count = report.out_of_range.len(),
                "kept values outside their physical range"
            );
        }

        Ok(NormalizedData {
            observations,
            group_codes,
            report,
        })
    }

    fn normalize_one(
        &self,
        index: usize,
        record: &RawRecord,
        group_codes: &mut GroupCodes,
        report: &mut NormalizationReport,
    ) -> Result<Option<Observation>, NormalizationError> {
        let missing = |field| NormalizationError::MissingField { index, field };
        let test_group = record.test_group.clone().ok_or_else(|| missing("TestGroup"))?;

        let Some(slope_angle) = finite(record.slope_angle) else {
            match self.policy.missing_slope_angle {
                MissingSlopeAngle::Drop => {
                    debug!(index, %test_group, "dropping record without slope angle");
                    report.dropped_missing_slope_angle.push(index);
                    return Ok(None);
                }
                MissingSlopeAngle::Reject => {
                    return Err(NormalizationError::MissingSlopeAngle { index, test_group });
                }
            }
        };

        let rotational_kinetic_energy = match finite(record.rotational_kinetic_energy) {
            Some(value) => value,
            None => match self.policy.missing_rotational_energy {
                MissingRotationalEnergy::FillZero => {
                    report.filled_rotational_energy.push(index);
                    0.0
                }
                MissingRotationalEnergy::Drop => {
                    debug!(index, %test_group, "dropping record without rotational energy");
                    report.dropped_missing_rotational_energy.push(index);
                    return Ok(None);
                }
                MissingRotationalEnergy::Reject => {
                    return Err(NormalizationError::MissingRotationalEnergy { index, test_group });
                }
            },
        };

        let slope_height = finite(record.slope_height).ok_or_else(|| missing("SlopeHeight"))?;
        let weight = finite(record.weight).ok_or_else(|| missing("Weight"))?;
        let translational_kinetic_energy = finite(record.translational_kinetic_energy)
            .ok_or_else(|| missing("TranslationalKineticEnergy"))?;

        let checks = [
            ("SlopeAngle", slope_angle > 0.0 && slope_angle <= 90.0),
            ("SlopeHeight", slope_height > 0.0),
            ("Weight", weight > 0.0),
            ("TranslationalKineticEnergy", translational_kinetic_energy >= 0.0),
            ("RotationalKineticEnergy", rotational_kinetic_energy >= 0.0),
        ];
        for (field, in_range) in checks {
            if !in_range {
                warn!(index, %test_group, field, "value outside its physical range");
                report.out_of_range.push((index, field));
            }
        }

        let material = match record.slope_material.as_deref() {
            None => {
                report.unset_materials.push(index);
                None
            }
            Some(label) => match SlopeMaterial::from_label(label) {
                Some(material) => Some(material),
                None => match self.policy.unknown_material {
                    UnknownMaterial::Permissive => {
                        warn!(index, value = label, "unknown slope material, indicators set to 0");
                        report.unknown_materials.push((index, label.to_string()));
                        None
                    }
                    UnknownMaterial::Reject => {
                        return Err(NormalizationError::UnknownMaterial {
                            index,
                            value: label.to_string(),
                        });
                    }
                },
            },
        };
        let indicator = |m| u8::from(material == Some(m));

        Ok(Some(Observation {
            source_index: index,
            group_code: group_codes.code_for(&test_group),
            test_group,
            slope_material: record.slope_material.clone(),
            material,
            slope_height,
            slope_angle,
            weight,
            translational_kinetic_energy,
            rotational_kinetic_energy,
            is_rock: indicator(SlopeMaterial::Rock),
            is_colluvium: indicator(SlopeMaterial::Colluvium),
            is_weathered_rock: indicator(SlopeMaterial::WeatheredRock),
        }))
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(group: &str, material: Option<&str>, angle: Option<f64>, rot: Option<f64>) -> RawRecord {
        RawRecord {
            test_group: Some(group.to_string()),
            slope_material: material.map(str::to_string),
            slope_height: Some(40.0),
            slope_angle: angle,
            weight: Some(2000.0),
            translational_kinetic_energy: Some(15.0),
            rotational_kinetic_energy: rot,
        }
    }

    #[test]
    fn test_missing_slope_angle_is_dropped() {
        let records = vec![
            raw("A", Some("Rock"), Some(30.0), Some(1.0)),
            raw("A", Some("Rock"), None, Some(1.0)),
            raw("B", Some("Rock"), Some(45.0), Some(1.0)),
        ];
        let data = Normalizer::default().normalize(&records).unwrap();
        assert_eq!(data.observations.len(), records.len() - 1);
        assert_eq!(data.report.dropped_missing_slope_angle, vec![1]);
        assert_eq!(records.len(), 3, "input must not be modified");
    }

    #[test]
    fn test_missing_slope_angle_rejected() {
        let policy = NormalizationPolicy {
            missing_slope_angle: MissingSlopeAngle::Reject,
            ..NormalizationPolicy::default()
        };
        let err = Normalizer::new(policy)
            .normalize(&[raw("A", None, None, None)])
            .unwrap_err();
        assert!(matches!(err, NormalizationError::MissingSlopeAngle { index: 0, .. }));
    }

    #[test]
    fn test_missing_rotational_energy_filled_with_zero() {
        let data = Normalizer::default()
            .normalize(&[raw("A", Some("Rock"), Some(30.0), None)])
            .unwrap();
        assert_eq!(data.observations[0].rotational_kinetic_energy, 0.0);
        assert_eq!(data.report.filled_rotational_energy, vec![0]);
    }

    #[test]
    fn test_missing_rotational_energy_drop_policy() {
        let policy = NormalizationPolicy {
            missing_rotational_energy: MissingRotationalEnergy::Drop,
            ..NormalizationPolicy::default()
        };
        let data = Normalizer::new(policy)
            .normalize(&[
                raw("A", Some("Rock"), Some(30.0), None),
                raw("A", Some("Rock"), Some(30.0), Some(2.0)),
            ])
            .unwrap();
        assert_eq!(data.observations.len(), 1);
        assert_eq!(data.report.dropped_missing_rotational_energy, vec![0]);
    }

    #[test]
    fn test_material_indicators() {
        let records = vec![
            raw("A", Some("Rock"), Some(30.0), Some(0.0)),
            raw("A", Some("Colluvium"), Some(30.0), Some(0.0)),
            raw("A", Some("Weathered Rock"), Some(30.0), Some(0.0)),
            raw("A", None, Some(30.0), Some(0.0)),
            raw("A", Some("Talus"), Some(30.0), Some(0.0)),
        ];
        let data = Normalizer::default().normalize(&records).unwrap();
        let flags = data
            .observations
            .iter()
            .map(|o| (o.is_rock, o.is_colluvium, o.is_weathered_rock))
            .collect::<Vec<_>>();
        assert_eq!(
            flags,
            vec![(1, 0, 0), (0, 1, 0), (0, 0, 1), (0, 0, 0), (0, 0, 0)]
        );
        assert_eq!(data.report.unknown_materials, vec![(4, "Talus".to_string())]);
        assert_eq!(data.report.unset_materials, vec![3]);
    }

    #[test]
    fn test_unknown_material_rejected() {
        let policy = NormalizationPolicy {
            unknown_material: UnknownMaterial::Reject,
            ..NormalizationPolicy::default()
        };
        let err = Normalizer::new(policy)
            .normalize(&[raw("A", Some("rock"), Some(30.0), Some(0.0))])
            .unwrap_err();
        assert_eq!(
            err,
            NormalizationError::UnknownMaterial {
                index: 0,
                value: "rock".to_string()
            }
        );
    }

    #[test]
    fn test_group_codes_first_seen_order() {
        let records = vec![
            raw("Zeta", None, Some(30.0), Some(0.0)),
            raw("Alpha", None, Some(30.0), Some(0.0)),
            raw("Zeta", None, Some(30.0), Some(0.0)),
            raw("Mid", None, Some(30.0), Some(0.0)),
        ];
        let data = Normalizer::default().normalize(&records).unwrap();
        let codes = data.observations.iter().map(|o| o.group_code).collect::<Vec<_>>();
        assert_eq!(codes, vec![1, 2, 1, 3]);
        assert_eq!(data.group_codes.name(2), Some("Alpha"));
        assert_eq!(data.group_codes.get("Mid"), Some(3));
        assert_eq!(data.group_codes.name(0), None);
    }

    #[test]
    fn test_group_only_in_dropped_rows_gets_no_code() {
        let records = vec![
            raw("Gone", None, None, Some(0.0)),
            raw("Kept", None, Some(30.0), Some(0.0)),
        ];
        let data = Normalizer::default().normalize(&records).unwrap();
        assert_eq!(data.group_codes.names(), &["Kept".to_string()]);
        assert_eq!(data.observations[0].group_code, 1);
    }

    #[test]
    fn test_missing_required_field() {
        let mut record = raw("A", None, Some(30.0), Some(0.0));
        record.weight = None;
        let err = Normalizer::default().normalize(&[record]).unwrap_err();
        assert_eq!(
            err,
            NormalizationError::MissingField {
                index: 0,
                field: "Weight"
            }
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let records = vec![
            raw("A", Some("Rock"), Some(30.0), None),
            raw("B", Some("Talus"), None, Some(1.0)),
            raw("C", None, Some(60.0), Some(2.5)),
            raw("A", Some("Colluvium"), Some(35.0), Some(0.5)),
        ];
        let normalizer = Normalizer::default();
        let first = normalizer.normalize(&records).unwrap();
        let again = first.observations.iter().map(RawRecord::from).collect::<Vec<_>>();
        let second = normalizer.normalize(&again).unwrap();

        let positions = |data: &NormalizedData| {
            data.observations.iter().map(|o| o.source_index).collect::<Vec<_>>()
        };
        assert_eq!(positions(&first), vec![0, 2, 3]);
        assert_eq!(positions(&second), vec![0, 1, 2]);
        let without_position = |data: &NormalizedData| {
            data.observations
                .iter()
                .map(|o| Observation {
                    source_index: 0,
                    ..o.clone()
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(without_position(&second), without_position(&first));
        assert_eq!(second.group_codes, first.group_codes);
        assert!(!second.report.changed_data());
    }

    #[test]
    fn test_non_finite_values_are_missing() {
        let records = vec![
            raw("A", Some("Rock"), Some(f64::NAN), Some(1.0)),
            raw("A", Some("Rock"), Some(30.0), Some(f64::INFINITY)),
            raw("A", Some("Rock"), Some(f64::NEG_INFINITY), Some(1.0)),
        ];
        let data = Normalizer::default().normalize(&records).unwrap();
        assert_eq!(data.report.dropped_missing_slope_angle, vec![0, 2]);
        assert_eq!(data.report.filled_rotational_energy, vec![1]);
        assert_eq!(data.observations.len(), 1);
        assert_eq!(data.observations[0].rotational_kinetic_energy, 0.0);
        assert_eq!(data.observations[0].source_index, 1);

        let mut record = raw("A", None, Some(30.0), Some(0.0));
        record.slope_height = Some(f64::NAN);
        assert_eq!(
            Normalizer::default().normalize(&[record]).unwrap_err(),
            NormalizationError::MissingField {
                index: 0,
                field: "SlopeHeight"
            }
        );
    }

    #[test]
    fn test_padded_material_is_unknown() {
        let data = Normalizer::default()
            .normalize(&[raw("A", Some("Rock "), Some(30.0), Some(0.0))])
            .unwrap();
        assert_eq!(data.observations[0].is_rock, 0);
        assert_eq!(data.report.unknown_materials, vec![(0, "Rock ".to_string())]);
    }

    #[test]
    fn test_out_of_range_values_are_reported() {
        let mut negative_weight = raw("A", None, Some(30.0), Some(0.0));
        negative_weight.weight = Some(-5.0);
        let mut zero_height = raw("A", None, Some(30.0), Some(0.0));
        zero_height.slope_height = Some(0.0);
        let records = vec![
            raw("A", None, Some(90.0), Some(0.0)),
            raw("A", None, Some(120.0), Some(0.0)),
            negative_weight,
            raw("A", None, Some(0.0), Some(-1.0)),
            zero_height,
        ];
        let data = Normalizer::default().normalize(&records).unwrap();
        assert_eq!(data.observations.len(), 5, "rows are kept");
        assert_eq!(
            data.report.out_of_range,
            vec![
                (1, "SlopeAngle"),
                (2, "Weight"),
                (3, "SlopeAngle"),
                (3, "RotationalKineticEnergy"),
                (4, "SlopeHeight"),
            ]
        );
        assert!(!data.report.changed_data());
    }
}
