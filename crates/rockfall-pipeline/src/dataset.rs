//! The derived modeling table and its queries
//!
//! [`DerivedDataset`] owns the derived records of one pipeline run. Records
//! are never modified after derivation; every query borrows.
//!
//! Data-quality anomalies stay in the table. Records whose reported impact
//! energy exceeds their initial potential energy (`energy_ratio > 1`) are
//! physically implausible, but they are exposed through
//! [`DerivedDataset::energy_ratio_anomalies`] and
//! [`DerivedDataset::data_quality_warnings`] so that analyses can inspect or
//! exclude them explicitly.

use std::io;

use rockfall_stats::{correlation::CorrelationMatrix, summary::ColumnSummary};
use serde::Serialize;

use crate::{
    features::DeriveError,
    normalization::GroupCodes,
    record::{Column, DerivedRecord, DerivedRow, Observation, SlopeMaterial},
    report::{Color, ColumnReport, ReportConfig},
};

/// Energy ratio above which a record violates energy conservation.
pub const ENERGY_RATIO_LIMIT: f64 = 1.0;

/// A row excluded because one of its derived features was undefined.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExcludedRow {
    pub observation: Observation,
    pub error: DeriveError,
}

/// Non-fatal data-quality findings.
#[derive(Debug, Clone, PartialEq, Serialize, derive_more::Display)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataQualityWarning {
    /// `index` is the position of the record in the raw input.
    #[display(
        "record #{index} (group {test_group}) reports impact energy {energy_ratio:.3} times its potential energy"
    )]
    EnergyRatioExceedsOne {
        index: usize,
        test_group: String,
        energy_ratio: f64,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct DerivedDataset {
    records: Vec<DerivedRecord>,
    excluded: Vec<ExcludedRow>,
    group_codes: GroupCodes,
}

impl DerivedDataset {
    #[must_use]
    pub fn new(
        records: Vec<DerivedRecord>,
        excluded: Vec<ExcludedRow>,
        group_codes: GroupCodes,
    ) -> Self {
        Self {
            records,
            excluded,
            group_codes,
        }
    }

    #[must_use]
    pub fn records(&self) -> &[DerivedRecord] {
        &self.records
    }

    #[must_use]
    pub fn excluded(&self) -> &[ExcludedRow] {
        &self.excluded
    }

    #[must_use]
    pub fn group_codes(&self) -> &GroupCodes {
        &self.group_codes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records matching `predicate`, in table order.
    pub fn records_where<F>(&self, mut predicate: F) -> impl Iterator<Item = &DerivedRecord>
    where
        F: FnMut(&DerivedRecord) -> bool,
    {
        self.records.iter().filter(move |r| predicate(r))
    }

    /// Records with `energy_ratio > 1`.
    pub fn energy_ratio_anomalies(&self) -> impl Iterator<Item = &DerivedRecord> {
        self.records_where(|r| r.energy_ratio > ENERGY_RATIO_LIMIT)
    }

    /// Records of one slope material (`None` selects unset or unknown materials).
    pub fn by_material(
        &self,
        material: Option<SlopeMaterial>,
    ) -> impl Iterator<Item = &DerivedRecord> {
        self.records_where(move |r| r.observation.material == material)
    }

    /// Records of one test group.
    pub fn by_group(&self, group_code: u32) -> impl Iterator<Item = &DerivedRecord> {
        self.records_where(move |r| r.observation.group_code == group_code)
    }

    /// One warning per record violating energy conservation.
    #[must_use]
    pub fn data_quality_warnings(&self) -> Vec<DataQualityWarning> {
        self.records
            .iter()
            .filter(|r| r.energy_ratio > ENERGY_RATIO_LIMIT)
            .map(|r| DataQualityWarning::EnergyRatioExceedsOne {
                index: r.observation.source_index,
                test_group: r.observation.test_group.clone(),
                energy_ratio: r.energy_ratio,
            })
            .collect()
    }

    /// Values of a named column, in table order.
    #[must_use]
    pub fn column(&self, column: Column) -> Vec<Option<f64>> {
        self.records
            .iter()
            .map(|r| Some(column.value(r)))
            .collect()
    }

    /// Summary report of a named column, styled with `config`.
    ///
    /// Returns `None` for an empty table.
    #[must_use]
    pub fn summarize(&self, column: Column, config: &ReportConfig) -> Option<ColumnReport> {
        let summary = ColumnSummary::new(self.column(column), config.num_buckets)?;
        Some(ColumnReport::new(column, summary, config))
    }

    /// Pairwise correlation matrix of named columns.
    #[must_use]
    pub fn correlation(&self, columns: &[Column]) -> CorrelationMatrix {
        let names = columns.iter().map(|c| c.name().to_string()).collect();
        let values = columns.iter().map(|&c| self.column(c)).collect::<Vec<_>>();
        CorrelationMatrix::new(names, &values)
    }

    /// Point colors by material, in table order, for scatter plots.
    #[must_use]
    pub fn material_colors<'a>(&self, config: &'a ReportConfig) -> Vec<&'a Color> {
        self.records
            .iter()
            .map(|r| config.palette.color_for(r.observation.material))
            .collect()
    }

    /// Writes the table as CSV with a header row.
    pub fn write_csv<W>(&self, writer: W) -> Result<(), csv::Error>
    where
        W: io::Write,
    {
        let mut writer = csv::Writer::from_writer(writer);
        for record in &self.records {
            writer.serialize(DerivedRow::from(record))?;
        }
        writer.flush()?;
        Ok(())
    }
}
