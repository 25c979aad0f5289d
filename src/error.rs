use thiserror::Error;

/// Main error type for the Rusty Table extension.
/// Aggregates errors from the standard library, dependencies and internal modules.
/// The grid normalization core never fails; these errors come from acquiring
/// and parsing the source and from binding SQL parameters.
#[derive(Error, Debug)]
pub enum RustyTableError {
    #[error("{0}")]
    WithContextError(String),

    // Standard library errors
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    // Third-party library errors
    #[error("{0}")]
    DuckDBError(#[from] duckdb::Error),

    #[error("{0}")]
    CsvError(#[from] csv::Error),

    // Helper module errors
    #[error("{0}")]
    UnifiedReaderError(#[from] crate::helpers::reader::UnifiedReaderError),

    // Database module errors
    #[error("{0}")]
    RangeError(#[from] crate::database::range::RangeError),

    // Extension module errors
    #[error("{0}")]
    ExtensionError(#[from] crate::extension::ExtensionError),
}

pub(crate) trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T, RustyTableError> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| RustyTableError::WithContextError(format!("{}: {}", message, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_prefix_adds_context() {
        let result: Result<(), RustyTableError> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into());
        let message = result.with_prefix("specs.csv").unwrap_err().to_string();
        assert_eq!(message, "specs.csv: missing");
    }
}
