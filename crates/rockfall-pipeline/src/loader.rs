//! Raw record loading from delimited files
//!
//! The loader reads a header row followed by one row per test roll. Column
//! order does not matter; the required columns are located by header name
//! and any other column is ignored.

use std::{
    fs::File,
    io::{self, BufReader, Read},
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use crate::record::{REQUIRED_COLUMNS, RawRecord};

/// Errors raised while loading raw records. All of them abort the pipeline.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum LoadError {
    #[display("failed to read {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[display("malformed input at line {line}: {message}")]
    Malformed { line: u64, message: String },
    #[display("missing required column '{column}'")]
    MissingColumn { column: &'static str },
}

/// Options for reading delimited input.
#[derive(Debug, Clone, Copy)]
pub struct LoaderOptions {
    pub delimiter: u8,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

/// Loads raw records from a file, preserving file order.
pub fn load_records<P>(path: P, options: LoaderOptions) -> Result<Vec<RawRecord>, LoadError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records = read_records(BufReader::new(file), options).map_err(|e| match e {
        LoadError::Io { source, .. } => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;
    info!(path = %path.display(), rows = records.len(), "loaded raw records");
    Ok(records)
}

/// Reads raw records from any reader, preserving input order.
pub fn read_records<R>(reader: R, options: LoaderOptions) -> Result<Vec<RawRecord>, LoadError>
where
    R: Read,
{
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = reader.headers().map_err(from_csv_error)?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(LoadError::MissingColumn { column });
        }
    }
    debug!(columns = headers.len(), "header validated");

    reader
        .deserialize::<RawRecord>()
        .map(|row| row.map_err(from_csv_error))
        .collect()
}

fn from_csv_error(error: csv::Error) -> LoadError {
    let line = error.position().map_or(0, csv::Position::line);
    match error.into_kind() {
        csv::ErrorKind::Io(source) => LoadError::Io {
            path: PathBuf::from("<input>"),
            source,
        },
        csv::ErrorKind::UnequalLengths {
            expected_len, len, ..
        } => LoadError::Malformed {
            line,
            message: format!("expected {expected_len} fields, found {len}"),
        },
        csv::ErrorKind::Deserialize { err, .. } => LoadError::Malformed {
            line,
            message: err.to_string(),
        },
        csv::ErrorKind::Utf8 { err, .. } => LoadError::Malformed {
            line,
            message: err.to_string(),
        },
        other => LoadError::Malformed {
            line,
            message: format!("{other:?}"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "TestGroup,SlopeMaterial,SlopeHeight,SlopeAngle,Weight,TranslationalKineticEnergy,RotationalKineticEnergy";

    fn read(input: &str) -> Result<Vec<RawRecord>, LoadError> {
        read_records(input.as_bytes(), LoaderOptions::default())
    }

    #[test]
    fn test_reads_rows_in_order() {
        let input = format!("{HEADER}\nA,Rock,40,30,2000,15,2\nB,Colluvium,55.5,45,1200,20,NA\n");
        let records = read(&input).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].test_group.as_deref(), Some("A"));
        assert_eq!(records[0].slope_height, Some(40.0));
        assert_eq!(records[1].slope_material.as_deref(), Some("Colluvium"));
        assert_eq!(records[1].rotational_kinetic_energy, None);
    }

    #[test]
    fn test_column_order_not_significant() {
        let input = "Weight,RotationalKineticEnergy,Extra,SlopeAngle,TestGroup,SlopeHeight,SlopeMaterial,TranslationalKineticEnergy\n\
                     2000,,x,30,G1,40,Weathered Rock,15\n";
        let records = read(input).unwrap();
        assert_eq!(records[0].weight, Some(2000.0));
        assert_eq!(records[0].slope_angle, Some(30.0));
        assert_eq!(records[0].slope_material.as_deref(), Some("Weathered Rock"));
        assert_eq!(records[0].rotational_kinetic_energy, None);
    }

    #[test]
    fn test_empty_and_na_cells_are_missing() {
        let input = format!("{HEADER}\nA,NA,40,,2000,15,NA\n");
        let records = read(&input).unwrap();
        assert_eq!(records[0].slope_material, None);
        assert_eq!(records[0].slope_angle, None);
        assert_eq!(records[0].rotational_kinetic_energy, None);
    }

    #[test]
    fn test_non_finite_cells_are_missing() {
        let input = format!("{HEADER}\nA,Rock,inf,NaN,-inf,15,nan\n");
        let records = read(&input).unwrap();
        assert_eq!(records[0].slope_height, None);
        assert_eq!(records[0].slope_angle, None);
        assert_eq!(records[0].weight, None);
        assert_eq!(records[0].rotational_kinetic_energy, None);
        assert_eq!(records[0].translational_kinetic_energy, Some(15.0));
    }

    #[test]
    fn test_material_cell_kept_verbatim() {
        let input = format!("{HEADER}\nA,Rock ,40,30,2000,15,2\nB, NA ,40,30,2000,15,2\n");
        let records = read(&input).unwrap();
        assert_eq!(records[0].slope_material.as_deref(), Some("Rock "));
        assert_eq!(records[1].slope_material, None);
    }

    #[test]
    fn test_inconsistent_column_count() {
        let input = format!("{HEADER}\nA,Rock,40,30,2000,15,2\nB,Rock,40,30\n");
        let err = read(&input).unwrap_err();
        match err {
            LoadError::Malformed { message, .. } => {
                assert!(message.contains("expected 7 fields"), "{message}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_column() {
        let input = "TestGroup,SlopeMaterial,SlopeHeight,SlopeAngle,Weight,TranslationalKineticEnergy\nA,Rock,40,30,2000,15\n";
        let err = read(input).unwrap_err();
        assert!(matches!(
            err,
            LoadError::MissingColumn {
                column: "RotationalKineticEnergy"
            }
        ));
    }

    #[test]
    fn test_invalid_number() {
        let input = format!("{HEADER}\nA,Rock,forty,30,2000,15,2\n");
        assert!(matches!(read(&input), Err(LoadError::Malformed { .. })));
    }

    #[test]
    fn test_missing_file() {
        let err = load_records("/nonexistent/rockfall.csv", LoaderOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_semicolon_delimiter() {
        let input = HEADER.replace(',', ";") + "\nA;Rock;40;30;2000;15;2\n";
        let records = read_records(input.as_bytes(), LoaderOptions { delimiter: b';' }).unwrap();
        assert_eq!(records[0].translational_kinetic_energy, Some(15.0));
    }
}
