//! Typed errors for input validation.

use thiserror::Error;

/// Problems with the uploaded review table that the caller can act on.
#[derive(Debug, Error)]
pub enum InputError {
    /// Nothing was supplied to analyse.
    #[error("no CSV file provided: pass --input <FILE> or upload a CSV file to run the analysis")]
    MissingInput,
    /// A required column could not be resolved from the header row.
    #[error("missing `{column}` column (found: {})", .available.join(", "))]
    MissingColumn {
        column: &'static str,
        available: Vec<String>,
    },
    /// Every row was dropped during validation.
    #[error("no usable reviews in input ({skipped} rows skipped)")]
    NoUsableRows { skipped: usize },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl InputError {
    /// Whether the error was caused by the client rather than the environment.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Io(_))
    }
}
