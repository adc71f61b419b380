//! Physics-derived features
//!
//! For each observation:
//!
//! ```text
//! total_energy     = translational + rotational kinetic energy
//! slope_length     = slope_height / sin(slope_angle in radians)
//! potential_energy = slope_height * weight / 2000
//! energy_ratio     = total_energy / potential_energy
//! ```
//!
//! A zero divisor never turns into an infinite feature: it is reported as
//! [`DeriveError::DivisionByZero`] and, depending on the
//! [`DegenerateRowPolicy`], either aborts the run or excludes the row.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    dataset::{DerivedDataset, ExcludedRow},
    normalization::GroupCodes,
    record::{DerivedRecord, Observation},
};

/// Divisor of `slope_height * weight` that brings potential energy into the
/// units of the measured kinetic energies.
pub const POTENTIAL_ENERGY_SCALE: f64 = 2000.0;

/// Derived quantity whose divisor vanished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivedQuantity {
    SlopeLength,
    EnergyRatio,
}

impl fmt::Display for DerivedQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DerivedQuantity::SlopeLength => f.write_str("slope length"),
            DerivedQuantity::EnergyRatio => f.write_str("energy ratio"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, derive_more::Display, derive_more::Error)]
pub enum DeriveError {
    /// `index` is the position of the record in the raw input.
    #[display("division by zero computing {quantity} of record #{index} (group {test_group})")]
    DivisionByZero {
        index: usize,
        test_group: String,
        quantity: DerivedQuantity,
    },
}

/// What to do with rows whose derived features are undefined.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegenerateRowPolicy {
    /// Abort with [`DeriveError::DivisionByZero`].
    #[default]
    Fail,
    /// Exclude the row and list it in [`DerivedDataset::excluded`].
    Exclude,
}

/// Slope face length for a drop of `slope_height` at `slope_angle_deg` degrees.
///
/// Returns `None` when the sine of the angle is zero.
#[must_use]
pub fn slope_length(slope_height: f64, slope_angle_deg: f64) -> Option<f64> {
    let sin = slope_angle_deg.to_radians().sin();
    if sin.abs() < f64::EPSILON {
        return None;
    }
    Some(slope_height / sin)
}

#[must_use]
pub fn potential_energy(slope_height: f64, weight: f64) -> f64 {
    slope_height * weight / POTENTIAL_ENERGY_SCALE
}

/// Computes the derived features of one observation.
///
/// Errors name the record by [`Observation::source_index`].
pub fn derive(observation: &Observation) -> Result<DerivedRecord, DeriveError> {
    let division_by_zero = |quantity| DeriveError::DivisionByZero {
        index: observation.source_index,
        test_group: observation.test_group.clone(),
        quantity,
    };

    let total_energy =
        observation.translational_kinetic_energy + observation.rotational_kinetic_energy;
    let slope_length = slope_length(observation.slope_height, observation.slope_angle)
        .ok_or_else(|| division_by_zero(DerivedQuantity::SlopeLength))?;
    let potential_energy = potential_energy(observation.slope_height, observation.weight);
    if potential_energy == 0.0 {
        return Err(division_by_zero(DerivedQuantity::EnergyRatio));
    }
    let energy_ratio = total_energy / potential_energy;

    Ok(DerivedRecord {
        observation: observation.clone(),
        total_energy,
        slope_length,
        potential_energy,
        energy_ratio,
    })
}

/// Derives features for a whole normalized table.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureCalculator {
    degenerate_rows: DegenerateRowPolicy,
}

impl FeatureCalculator {
    #[must_use]
    pub fn new(degenerate_rows: DegenerateRowPolicy) -> Self {
        Self { degenerate_rows }
    }

    pub fn derive_all(
        &self,
        observations: &[Observation],
        group_codes: GroupCodes,
    ) -> Result<DerivedDataset, DeriveError> {
        let mut records = Vec::with_capacity(observations.len());
        let mut excluded = vec![];

        for observation in observations {
            match derive(observation) {
                Ok(record) => records.push(record),
                Err(error) => match self.degenerate_rows {
                    DegenerateRowPolicy::Fail => return Err(error),
                    DegenerateRowPolicy::Exclude => {
                        warn!(%error, "excluding degenerate record");
                        excluded.push(ExcludedRow {
                            observation: observation.clone(),
                            error,
                        });
                    }
                },
            }
        }

        let dataset = DerivedDataset::new(records, excluded, group_codes);
        info!(
            rows = dataset.records().len(),
            excluded = dataset.excluded().len(),
            energy_ratio_anomalies = dataset.energy_ratio_anomalies().count(),
            "derived features"
        );
        Ok(dataset)
    }
}
