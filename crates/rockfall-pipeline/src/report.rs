//! Report styling and column reports
//!
//! Chart appearance is carried by an explicit [`ReportConfig`] value passed
//! to each report call. The material palette maps every [`SlopeMaterial`]
//! (and the unset case) to a color and is validated for full coverage when
//! built.

use std::collections::BTreeMap;

use rockfall_stats::summary::ColumnSummary;
use serde::{Deserialize, Serialize};

use crate::record::{Column, SlopeMaterial};

/// A color as understood by the chart renderer (e.g. `#1b9e77`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub String);

impl Color {
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum PaletteError {
    #[display("palette has no color for material '{material}'")]
    MissingMaterial { material: SlopeMaterial },
}

/// Serialized form of a [`MaterialPalette`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaletteSpec {
    pub materials: BTreeMap<SlopeMaterial, Color>,
    pub unset: Color,
}

/// Color for each slope material plus one for unset/unknown materials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PaletteSpec", into = "PaletteSpec")]
pub struct MaterialPalette {
    rock: Color,
    colluvium: Color,
    weathered_rock: Color,
    unset: Color,
}

impl MaterialPalette {
    /// Builds a palette, failing if any known material has no color.
    pub fn from_map(
        mut materials: BTreeMap<SlopeMaterial, Color>,
        unset: Color,
    ) -> Result<Self, PaletteError> {
        let mut take = |material: SlopeMaterial| {
            materials
                .remove(&material)
                .ok_or(PaletteError::MissingMaterial { material })
        };
        Ok(Self {
            rock: take(SlopeMaterial::Rock)?,
            colluvium: take(SlopeMaterial::Colluvium)?,
            weathered_rock: take(SlopeMaterial::WeatheredRock)?,
            unset,
        })
    }

    #[must_use]
    pub fn color_for(&self, material: Option<SlopeMaterial>) -> &Color {
        match material {
            Some(SlopeMaterial::Rock) => &self.rock,
            Some(SlopeMaterial::Colluvium) => &self.colluvium,
            Some(SlopeMaterial::WeatheredRock) => &self.weathered_rock,
            None => &self.unset,
        }
    }
}

impl Default for MaterialPalette {
    fn default() -> Self {
        Self {
            rock: Color::new("#1b9e77"),
            colluvium: Color::new("#d95f02"),
            weathered_rock: Color::new("#7570b3"),
            unset: Color::new("#999999"),
        }
    }
}

impl TryFrom<PaletteSpec> for MaterialPalette {
    type Error = PaletteError;

    fn try_from(spec: PaletteSpec) -> Result<Self, Self::Error> {
        Self::from_map(spec.materials, spec.unset)
    }
}

impl From<MaterialPalette> for PaletteSpec {
    fn from(palette: MaterialPalette) -> Self {
        let MaterialPalette {
            rock,
            colluvium,
            weathered_rock,
            unset,
        } = palette;
        Self {
            materials: BTreeMap::from([
                (SlopeMaterial::Rock, rock),
                (SlopeMaterial::Colluvium, colluvium),
                (SlopeMaterial::WeatheredRock, weathered_rock),
            ]),
            unset,
        }
    }
}

/// Plot margins in lines of text (bottom, left, top, right).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub bottom: f64,
    pub left: f64,
    pub top: f64,
    pub right: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            bottom: 5.1,
            left: 4.1,
            top: 4.1,
            right: 2.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineType {
    Solid,
    Dashed,
    Dotted,
}

/// Largest accepted histogram bucket count.
pub const MAX_BUCKETS: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("histogram bucket count {num_buckets} is outside 1..={max}")]
pub struct InvalidBucketCountError {
    pub num_buckets: usize,
    pub max: usize,
}

/// Appearance shared by every report section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Histogram bucket count, at most [`MAX_BUCKETS`].
    pub num_buckets: usize,
    pub bar_color: Color,
    pub marker_color: Color,
    pub marker_line: LineType,
    pub margins: Margins,
    pub palette: MaterialPalette,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            num_buckets: 20,
            bar_color: Color::new("#bdbdbd"),
            marker_color: Color::new("#e41a1c"),
            marker_line: LineType::Dashed,
            margins: Margins::default(),
            palette: MaterialPalette::default(),
        }
    }
}

impl ReportConfig {
    /// Checks that the bucket count is positive and at most [`MAX_BUCKETS`].
    pub fn validate(&self) -> Result<(), InvalidBucketCountError> {
        if (1..=MAX_BUCKETS).contains(&self.num_buckets) {
            Ok(())
        } else {
            Err(InvalidBucketCountError {
                num_buckets: self.num_buckets,
                max: MAX_BUCKETS,
            })
        }
    }
}

/// Styling resolved for one chart.
#[derive(Debug, Clone, Serialize)]
pub struct ChartStyle {
    pub bar_color: Color,
    pub marker_color: Color,
    pub marker_line: LineType,
    pub margins: Margins,
}

/// Histogram-with-quantile-markers description of one column.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnReport {
    pub column: Column,
    pub summary: ColumnSummary,
    pub style: ChartStyle,
}

impl ColumnReport {
    #[must_use]
    pub fn new(column: Column, summary: ColumnSummary, config: &ReportConfig) -> Self {
        Self {
            column,
            summary,
            style: ChartStyle {
                bar_color: config.bar_color.clone(),
                marker_color: config.marker_color.clone(),
                marker_line: config.marker_line,
                margins: config.margins,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_requires_every_material() {
        let materials = BTreeMap::from([
            (SlopeMaterial::Rock, Color::new("red")),
            (SlopeMaterial::WeatheredRock, Color::new("blue")),
        ]);
        let err = MaterialPalette::from_map(materials, Color::new("grey")).unwrap_err();
        assert_eq!(
            err,
            PaletteError::MissingMaterial {
                material: SlopeMaterial::Colluvium
            }
        );
    }

    #[test]
    fn test_palette_lookup() {
        let materials = SlopeMaterial::ALL
            .into_iter()
            .map(|m| (m, Color::new(m.label())))
            .collect();
        let palette = MaterialPalette::from_map(materials, Color::new("none")).unwrap();
        assert_eq!(
            palette.color_for(Some(SlopeMaterial::WeatheredRock)),
            &Color::new("Weathered Rock")
        );
        assert_eq!(palette.color_for(None), &Color::new("none"));
    }

    #[test]
    fn test_palette_from_json() {
        let json = r##"{"materials": {"rock": "#000", "colluvium": "#111"}, "unset": "#fff"}"##;
        let result = serde_json::from_str::<MaterialPalette>(json);
        assert!(result.is_err());

        let json = r##"{"materials": {"rock": "#000", "colluvium": "#111", "weathered_rock": "#222"}, "unset": "#fff"}"##;
        let palette = serde_json::from_str::<MaterialPalette>(json).unwrap();
        assert_eq!(palette.color_for(Some(SlopeMaterial::Colluvium)), &Color::new("#111"));
    }

    #[test]
    fn test_bucket_count_bounds() {
        let config = |num_buckets| ReportConfig {
            num_buckets,
            ..ReportConfig::default()
        };
        assert!(ReportConfig::default().validate().is_ok());
        assert!(config(MAX_BUCKETS).validate().is_ok());
        assert_eq!(
            config(0).validate().unwrap_err(),
            InvalidBucketCountError {
                num_buckets: 0,
                max: MAX_BUCKETS
            }
        );
        let err = config(usize::MAX).validate().unwrap_err();
        assert_eq!(err.num_buckets, usize::MAX);
    }

    #[test]
    fn test_report_config_partial_json() {
        let config = serde_json::from_str::<ReportConfig>(r#"{"num_buckets": 8}"#).unwrap();
        assert_eq!(config.num_buckets, 8);
        assert_eq!(config.palette, MaterialPalette::default());
    }
}
