use thiserror::Error;

/// Feil fra kjernen. Degenererte geometri-tilfeller (null forflytning,
/// null tidssteg, vindstille) er IKKE feil – de gir `None`/0 i datasettet.
#[derive(Debug, Error)]
pub enum PerfError {
    #[error("insufficient track data: {found} point(s), need at least 2")]
    InsufficientData { found: usize },

    #[error("invalid time window: start {start} is after end {end}")]
    InvalidTimeWindow { start: String, end: String },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("length mismatch: {what} has {got} values, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },

    #[error("failed to parse GPX: {0}")]
    GpxParse(String),

    #[error("failed to parse wind data: {0}")]
    WindParse(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("json error at `{path}`: {message}")]
    Json { path: String, message: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl PerfError {
    pub(crate) fn from_path_error(err: serde_path_to_error::Error<serde_json::Error>) -> Self {
        PerfError::Json {
            path: err.path().to_string(),
            message: err.inner().to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PerfError>;
