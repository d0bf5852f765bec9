//! Error types for the clustering pipeline and its HTTP surface.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Failure anywhere between reading the CSV and producing the outputs.
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("column '{0}' not found in the uploaded data")]
    MissingColumn(String),

    #[error("non-numeric value '{value}' in column '{column}' at row {row}")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },

    #[error("row {row} has {found} fields, but the header has {expected}")]
    ExtraFields {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("failed to read upload: {0}")]
    Upload(String),

    #[error("no rows with both values present")]
    EmptyDataset,

    #[error("invalid value '{value}' for parameter '{name}'")]
    InvalidParameter { name: &'static str, value: String },

    #[error("clustering failed: {0}")]
    Clustering(String),

    #[error("rendering failed: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced to HTTP clients.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("No file part")]
    MissingUpload,

    #[error("No selected file")]
    EmptyFilename,

    #[error("No data to download")]
    MissingDownloadData,

    #[error("An error occurred: {0}")]
    Processing(#[from] ProcessingError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingUpload | AppError::EmptyFilename | AppError::MissingDownloadData => {
                StatusCode::BAD_REQUEST
            }
            AppError::Processing(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            AppError::Processing(e) => tracing::error!("Request failed: {}", e),
            other => tracing::warn!("Rejected request: {}", other),
        }
        (status, self.to_string()).into_response()
    }
}

pub type Result<T, E = ProcessingError> = std::result::Result<T, E>;
