//! Record types flowing through the pipeline
//!
//! ```text
//! RawRecord         (as read from the CSV file, every field optional)
//!   └─ Observation  (normalized: typed categoricals, no missing angle/energy)
//!       └─ DerivedRecord (observation + physics-derived quantities)
//! ```
//!
//! Column access is by name only, through [`Column`].

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, de};

/// Header names of the required input columns.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "TestGroup",
    "SlopeMaterial",
    "SlopeHeight",
    "SlopeAngle",
    "Weight",
    "TranslationalKineticEnergy",
    "RotationalKineticEnergy",
];

/// One field-test roll as read from the input file.
///
/// Empty cells and the literal `NA` are read as missing, and so are numeric
/// cells holding `NaN` or an infinity. Text cells are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RawRecord {
    #[serde(rename = "TestGroup", default, deserialize_with = "na_string")]
    pub test_group: Option<String>,
    #[serde(rename = "SlopeMaterial", default, deserialize_with = "na_string")]
    pub slope_material: Option<String>,
    #[serde(rename = "SlopeHeight", default, deserialize_with = "na_f64")]
    pub slope_height: Option<f64>,
    #[serde(rename = "SlopeAngle", default, deserialize_with = "na_f64")]
    pub slope_angle: Option<f64>,
    #[serde(rename = "Weight", default, deserialize_with = "na_f64")]
    pub weight: Option<f64>,
    #[serde(
        rename = "TranslationalKineticEnergy",
        default,
        deserialize_with = "na_f64"
    )]
    pub translational_kinetic_energy: Option<f64>,
    #[serde(
        rename = "RotationalKineticEnergy",
        default,
        deserialize_with = "na_f64"
    )]
    pub rotational_kinetic_energy: Option<f64>,
}

fn is_na(cell: &str) -> bool {
    let cell = cell.trim();
    cell.is_empty() || cell == "NA"
}

fn na_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let cell = Option::<String>::deserialize(deserializer)?;
    Ok(cell.filter(|c| !is_na(c)))
}

fn na_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(cell) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if is_na(&cell) {
        return Ok(None);
    }
    let value = cell
        .trim()
        .parse::<f64>()
        .map_err(|e| de::Error::custom(format!("invalid number {cell:?}: {e}")))?;
    Ok(value.is_finite().then_some(value))
}

/// Slope surface material of a test site.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SlopeMaterial {
    Rock,
    Colluvium,
    WeatheredRock,
}

impl SlopeMaterial {
    pub const ALL: [SlopeMaterial; 3] = [
        SlopeMaterial::Rock,
        SlopeMaterial::Colluvium,
        SlopeMaterial::WeatheredRock,
    ];

    /// Category label as it appears in the field data.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            SlopeMaterial::Rock => "Rock",
            SlopeMaterial::Colluvium => "Colluvium",
            SlopeMaterial::WeatheredRock => "Weathered Rock",
        }
    }

    /// Exact match against a field-data label.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.label() == label)
    }
}

impl fmt::Display for SlopeMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A normalized field-test roll.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    /// Position of the originating record in the raw input.
    pub source_index: usize,
    /// Test group label (nominal).
    pub test_group: String,
    /// Code of the test group, assigned in first-seen order starting at 1.
    pub group_code: u32,
    /// Material label as found in the data, if any.
    pub slope_material: Option<String>,
    /// Recognized material category.
    pub material: Option<SlopeMaterial>,
    /// Vertical drop to the initiation point (ft).
    pub slope_height: f64,
    /// Slope angle (degrees).
    pub slope_angle: f64,
    /// Rock weight (lb).
    pub weight: f64,
    pub translational_kinetic_energy: f64,
    pub rotational_kinetic_energy: f64,
    pub is_rock: u8,
    pub is_colluvium: u8,
    pub is_weathered_rock: u8,
}

impl From<&Observation> for RawRecord {
    fn from(obs: &Observation) -> Self {
        Self {
            test_group: Some(obs.test_group.clone()),
            slope_material: obs.slope_material.clone(),
            slope_height: Some(obs.slope_height),
            slope_angle: Some(obs.slope_angle),
            weight: Some(obs.weight),
            translational_kinetic_energy: Some(obs.translational_kinetic_energy),
            rotational_kinetic_energy: Some(obs.rotational_kinetic_energy),
        }
    }
}

/// An observation extended with physics-derived quantities.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedRecord {
    #[serde(flatten)]
    pub observation: Observation,
    /// Translational plus rotational kinetic energy.
    pub total_energy: f64,
    /// Length of the slope face (ft).
    pub slope_length: f64,
    /// Initial potential energy, scaled to the units of `total_energy`.
    pub potential_energy: f64,
    /// `total_energy / potential_energy`.
    pub energy_ratio: f64,
}

/// Flat row layout of a [`DerivedRecord`], used for CSV export.
#[derive(Debug, Clone, Serialize)]
pub struct DerivedRow<'a> {
    pub test_group: &'a str,
    pub group_code: u32,
    pub slope_material: Option<&'a str>,
    pub slope_height: f64,
    pub slope_angle: f64,
    pub weight: f64,
    pub translational_kinetic_energy: f64,
    pub rotational_kinetic_energy: f64,
    pub is_rock: u8,
    pub is_colluvium: u8,
    pub is_weathered_rock: u8,
    pub total_energy: f64,
    pub slope_length: f64,
    pub potential_energy: f64,
    pub energy_ratio: f64,
}

impl<'a> From<&'a DerivedRecord> for DerivedRow<'a> {
    fn from(record: &'a DerivedRecord) -> Self {
        let obs = &record.observation;
        Self {
            test_group: &obs.test_group,
            group_code: obs.group_code,
            slope_material: obs.slope_material.as_deref(),
            slope_height: obs.slope_height,
            slope_angle: obs.slope_angle,
            weight: obs.weight,
            translational_kinetic_energy: obs.translational_kinetic_energy,
            rotational_kinetic_energy: obs.rotational_kinetic_energy,
            is_rock: obs.is_rock,
            is_colluvium: obs.is_colluvium,
            is_weathered_rock: obs.is_weathered_rock,
            total_energy: record.total_energy,
            slope_length: record.slope_length,
            potential_energy: record.potential_energy,
            energy_ratio: record.energy_ratio,
        }
    }
}

/// A numeric column of the derived table, addressed by name.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    GroupCode,
    SlopeHeight,
    SlopeAngle,
    Weight,
    TranslationalKineticEnergy,
    RotationalKineticEnergy,
    IsRock,
    IsColluvium,
    IsWeatheredRock,
    TotalEnergy,
    SlopeLength,
    PotentialEnergy,
    EnergyRatio,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown column '{name}'")]
pub struct UnknownColumnError {
    pub name: String,
}

impl Column {
    pub const ALL: [Column; 13] = [
        Column::GroupCode,
        Column::SlopeHeight,
        Column::SlopeAngle,
        Column::Weight,
        Column::TranslationalKineticEnergy,
        Column::RotationalKineticEnergy,
        Column::IsRock,
        Column::IsColluvium,
        Column::IsWeatheredRock,
        Column::TotalEnergy,
        Column::SlopeLength,
        Column::PotentialEnergy,
        Column::EnergyRatio,
    ];

    /// Geometry, weight and energy columns explored in the correlation plots.
    pub const CONTINUOUS: [Column; 8] = [
        Column::SlopeHeight,
        Column::SlopeAngle,
        Column::Weight,
        Column::SlopeLength,
        Column::PotentialEnergy,
        Column::TranslationalKineticEnergy,
        Column::RotationalKineticEnergy,
        Column::TotalEnergy,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Column::GroupCode => "group_code",
            Column::SlopeHeight => "slope_height",
            Column::SlopeAngle => "slope_angle",
            Column::Weight => "weight",
            Column::TranslationalKineticEnergy => "translational_kinetic_energy",
            Column::RotationalKineticEnergy => "rotational_kinetic_energy",
            Column::IsRock => "is_rock",
            Column::IsColluvium => "is_colluvium",
            Column::IsWeatheredRock => "is_weathered_rock",
            Column::TotalEnergy => "total_energy",
            Column::SlopeLength => "slope_length",
            Column::PotentialEnergy => "potential_energy",
            Column::EnergyRatio => "energy_ratio",
        }
    }

    /// Value of this column in a derived record.
    #[must_use]
    pub fn value(self, record: &DerivedRecord) -> f64 {
        let obs = &record.observation;
        match self {
            Column::GroupCode => f64::from(obs.group_code),
            Column::SlopeHeight => obs.slope_height,
            Column::SlopeAngle => obs.slope_angle,
            Column::Weight => obs.weight,
            Column::TranslationalKineticEnergy => obs.translational_kinetic_energy,
            Column::RotationalKineticEnergy => obs.rotational_kinetic_energy,
            Column::IsRock => f64::from(obs.is_rock),
            Column::IsColluvium => f64::from(obs.is_colluvium),
            Column::IsWeatheredRock => f64::from(obs.is_weathered_rock),
            Column::TotalEnergy => record.total_energy,
            Column::SlopeLength => record.slope_length,
            Column::PotentialEnergy => record.potential_energy,
            Column::EnergyRatio => record.energy_ratio,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Column {
    type Err = UnknownColumnError;

    /// Accepts snake_case names (`total_energy`) and input header names
    /// (`SlopeHeight`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().replace(['_', '-', ' '], "").to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.name().replace('_', "") == key)
            .ok_or_else(|| UnknownColumnError {
                name: s.to_string(),
            })
    }
}
