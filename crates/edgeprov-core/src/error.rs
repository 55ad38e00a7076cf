use thiserror::Error;

/// Error type for record loading, rendering, and batch driving.
///
/// Remote failures arrive wrapped as `Api`; the batch and teardown
/// drivers log those per row/phase and continue. `MissingField` is the
/// one local per-record failure -- it skips the record, not the batch.
/// `Io` and `Schema` are the fatal ones.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A record lacks a field the template references.
    #[error("record is missing field '{field}' referenced by the template")]
    MissingField { field: String },

    /// The input file's header row lacks a required column.
    #[error("input schema error: {message}")]
    Schema { message: String },

    /// Tabular input could not be parsed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Template compilation or rendering failed.
    #[error("template error: {message}")]
    Template { message: String },

    /// Local filesystem failure (output directory, document files).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Orchestrator API failure.
    #[error(transparent)]
    Api(#[from] edgeprov_api::Error),
}
