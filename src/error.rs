//! Errors raised while turning a telemetry export into lap records.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RaceDataError {
    /// The input path does not exist. Callers report it and carry on with no laps.
    #[error("The file '{}' was not found.", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed CSV input: {0}")]
    Csv(#[from] csv::Error),

    /// A data row is shorter than the fixed column layout.
    #[error("Line {line}: missing column {column} ({field})")]
    MissingField {
        line: u64,
        column: usize,
        field: &'static str,
    },

    /// A required numeric field could not be parsed.
    #[error("Line {line}: cannot parse {field} from '{value}'")]
    Parse {
        line: u64,
        field: &'static str,
        value: String,
    },
}

impl RaceDataError {
    pub fn parse(line: u64, field: &'static str, value: impl Into<String>) -> Self {
        Self::Parse {
            line,
            field,
            value: value.into(),
        }
    }

    pub fn is_file_not_found(&self) -> bool {
        matches!(self, Self::FileNotFound { .. })
    }
}
