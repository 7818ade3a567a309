use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("CSV file has no records")]
    EmptyDataset,

    #[error("Unknown field '{field}' (available: {})", .available.join(", "))]
    UnknownField { field: String, available: Vec<String> },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Excel error: {0}")]
    Excel(#[from] rust_xlsxwriter::XlsxError),
}

pub type Result<T> = std::result::Result<T, StatsError>;
