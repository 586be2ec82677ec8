use thiserror::Error;

/// Unified error type for the library.
///
/// Loading and reshaping errors carry enough context (dataset key, column,
/// row) to point at the offending cell without a debugger.
#[derive(Debug, Error)]
pub enum Error {
    /// The requested dataset key is not in the catalog.
    #[error("unknown dataset `{name}`; expected one of {expected}")]
    UnknownDataset { name: String, expected: String },

    /// The numeric description flag is not valid for this dataset.
    #[error("dataset `{dataset}` does not support description mode {mode}; valid modes: {supported}")]
    InvalidMode {
        dataset: String,
        mode: i8,
        supported: String,
    },

    /// Definitions and estimates were requested at the same time.
    #[error("definitions and estimates cannot be requested together")]
    ConflictingModes,

    /// A named column is missing from a table.
    #[error("no column named `{0}`")]
    MissingColumn(String),

    /// A member file was not found in the dataset store.
    #[error("archive member `{member}` not found in the data bundle")]
    MissingMember { member: String },

    /// A CSV cell could not be decoded into its declared type.
    #[error("cannot parse `{value}` in column `{column}` (row {row})")]
    Parse {
        column: String,
        row: usize,
        value: String,
    },

    /// A reshape operation (pivot, melt, merge) hit malformed input.
    #[error("reshape failed: {0}")]
    Reshape(String),

    /// The shading target resolved to zero axes.
    #[error("no axes to shade: the target is empty")]
    EmptyAxisTarget,

    /// Invalid arguments for an evenly spaced grid.
    #[error("invalid range: low={low}, high={high}, count={count} (need low < high and count >= 2)")]
    InvalidRange { low: f64, high: f64, count: usize },

    /// A drawing backend refused a shading primitive.
    #[error("draw failed: {0}")]
    Draw(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
