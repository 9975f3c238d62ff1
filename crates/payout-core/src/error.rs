use thiserror::Error;

use crate::endpoint::Endpoint;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("No PDF file selected")]
    NoFileSelected,

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("{endpoint} returned HTTP {status}")]
    HttpStatus { endpoint: Endpoint, status: u16 },

    #[error("Response was not valid JSON: {0}")]
    InvalidJson(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentInfoError {
    #[error("File too small to be a valid PDF")]
    TooSmall,

    #[error("Not a valid PDF file (missing %PDF- header)")]
    MissingHeader,

    #[error("Failed to parse PDF: {0}")]
    Parse(String),

    #[error("PDF has no pages")]
    NoPages,
}
