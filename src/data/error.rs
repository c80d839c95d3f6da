use thiserror::Error;

/// Everything that can stop a log from being shown.
///
/// The `Display` text is what the user sees on the terminal.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Error opening file: {0}")]
    FileAccess(#[from] std::io::Error),

    #[error("Error: Unable to parse frequency axis.")]
    AxisParse,

    #[error("Error: line {line}, column {column}: '{token}' is not a valid value")]
    Table {
        line: u64,
        column: usize,
        token: String,
    },

    #[error("Error: line {line} has {found} magnitude values but the frequency axis has {expected} bins")]
    ShapeMismatch {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("Error: the file contains no data rows")]
    NoSamples,

    #[error("Error: unable to read data table: {0}")]
    Csv(#[from] csv::Error),
}
