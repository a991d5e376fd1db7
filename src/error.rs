use thiserror::Error;

/// Reasons a roster file could not become the current roster.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to read workbook: {0}")]
    Workbook(#[from] calamine::Error),
    #[error("unsupported roster format: {0}")]
    UnsupportedFormat(String),
    #[error("workbook has no sheets")]
    NoSheet,
    #[error("file must contain the columns 'name' and 'score' (missing: {})", .0.join(", "))]
    MissingColumns(Vec<&'static str>),
    #[error("row {row} has a non-numeric score: '{value}'")]
    InvalidScore { row: usize, value: String },
}

/// Reasons an export could not be written. The session keeps its data either way.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing to export, load a roster first")]
    NothingToExport,
    #[error("roster is empty, no statistics available")]
    EmptyRoster,
    #[error("unsupported export format: {0}")]
    UnsupportedFormat(String),
    #[error("failed to write file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to write csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to write workbook: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),
}

#[derive(Debug, Error)]
pub enum ParametersError {
    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),
}
