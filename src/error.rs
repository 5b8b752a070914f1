use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum MicroarrayError {
    #[error("invalid platform id: {0}")]
    InvalidPlatformId(String),

    #[error("invalid sample id: {0}")]
    InvalidSampleId(String),

    #[error("platform not found in catalog: {0}")]
    PlatformNotFound(String),

    #[error("file not found: {path}")]
    #[diagnostic(help("every requested sample needs a <sample>.tsv next to meta.tsv"))]
    NotFound { path: Utf8PathBuf },

    #[error("failed to read {path}: {message}")]
    Io { path: Utf8PathBuf, message: String },

    #[error("malformed TSV record in {path}: {message}")]
    Tsv { path: Utf8PathBuf, message: String },

    #[error("malformed metadata {path}: {message}")]
    MalformedMetadata { path: Utf8PathBuf, message: String },

    #[error("shape mismatch in {path}: {message}")]
    ShapeMismatch { path: Utf8PathBuf, message: String },

    #[error("{path}:{line}: column {column} is not a number: {value:?}")]
    NumericParse {
        path: Utf8PathBuf,
        line: u64,
        /// 1-based, like `line`.
        column: usize,
        value: String,
    },

    #[error("{path}:{line}: expected probe {expected}, found {found}")]
    ProbeMismatch {
        path: Utf8PathBuf,
        line: u64,
        expected: String,
        found: String,
    },

    #[error("catalog query failed: {0}")]
    Catalog(String),

    #[error("missing config file microarray.json in current directory")]
    MissingConfig,

    #[error("failed to read config file at {0}")]
    ConfigRead(Utf8PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("failed to serialize output: {0}")]
    Serialize(String),
}

impl From<rusqlite::Error> for MicroarrayError {
    fn from(err: rusqlite::Error) -> Self {
        MicroarrayError::Catalog(err.to_string())
    }
}
