use hyper::StatusCode;
use thiserror::Error;

use crate::analyzer::AnalyzerError;
use crate::dataset::DatasetError;

/// Message returned for any action outside the dispatch table
pub const INVALID_ACTION_MESSAGE: &str = "Invalid action specified";

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("{}", INVALID_ACTION_MESSAGE)]
    InvalidAction(String),

    #[error("Unknown dataset: {0}")]
    UnknownDataset(String),

    #[error("Invalid {name}: {value}")]
    InvalidFilter { name: &'static str, value: String },

    #[error("Tender not found")]
    TenderNotFound,

    #[error("Request body is required")]
    MissingBody,

    #[error("Request body is not valid UTF-8")]
    BodyEncoding(#[from] std::string::FromUtf8Error),

    #[error("Invalid JSON body: {0}")]
    MalformedInput(#[source] serde_json::Error),

    #[error(transparent)]
    Upstream(#[from] DatasetError),

    #[error(transparent)]
    Analyzer(#[from] AnalyzerError),
}

impl DispatchError {
    /// Caller mistakes are 400, a missing tender 404, everything else 500
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidAction(_) | Self::UnknownDataset(_) | Self::InvalidFilter { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::TenderNotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
