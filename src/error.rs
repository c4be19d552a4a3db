use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Excel export error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Invalid window length: {0} days (must be between 1 and {max})", max = crate::analyzer::window::MAX_WINDOW_DAYS)]
    InvalidWindow(i64),

    #[error("Unknown range label: {0}")]
    UnknownRange(String),

    #[error("Invalid timestamp on line {line}: {value:?}")]
    InvalidTimestamp { line: usize, value: String },

    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("File is empty or has no data rows")]
    EmptyFile,

    #[error("Unsupported import format: {0}")]
    UnsupportedFormat(String),

    #[error("{0}")]
    Custom(String),
}
