use std::path::PathBuf;
use thiserror::Error;

/// Stable error codes used at the JSON boundary.
pub mod error_codes {
    pub const INVALID_ACTION: &str = "E_INVALID_ACTION";
    pub const NO_TRANSITION_DATA: &str = "E_NO_TRANSITION_DATA";
    pub const DEGENERATE_DISTRIBUTION: &str = "E_DEGENERATE_DISTRIBUTION";
    pub const MALFORMED_DATASET: &str = "E_MALFORMED_DATASET";
    pub const IO: &str = "E_IO";
    pub const INVALID_REQUEST: &str = "E_INVALID_REQUEST";
}

#[derive(Error, Debug)]
pub enum GenError {
    #[error("Invalid action '{label}': no fitted profile or transition row")]
    InvalidAction { label: String },

    #[error("No outgoing transition data for action '{label}'")]
    NoTransitionData { label: String },

    #[error("Degenerate distribution for action '{label}': {reason}")]
    DegenerateDistribution { label: String, reason: String },

    #[error("Malformed dataset: {0}")]
    MalformedDataset(String),

    #[error("IO error reading '{}': {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl GenError {
    pub(crate) fn degenerate(label: &str, reason: impl Into<String>) -> Self {
        GenError::DegenerateDistribution { label: label.to_string(), reason: reason.into() }
    }

    pub fn code(&self) -> &'static str {
        match self {
            GenError::InvalidAction { .. } => error_codes::INVALID_ACTION,
            GenError::NoTransitionData { .. } => error_codes::NO_TRANSITION_DATA,
            GenError::DegenerateDistribution { .. } => error_codes::DEGENERATE_DISTRIBUTION,
            GenError::MalformedDataset(_) => error_codes::MALFORMED_DATASET,
            GenError::Io { .. } => error_codes::IO,
            GenError::InvalidRequest(_) => error_codes::INVALID_REQUEST,
        }
    }
}

pub type Result<T> = std::result::Result<T, GenError>;
