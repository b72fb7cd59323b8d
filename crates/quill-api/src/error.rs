//! Error types for backend communication.

use miette::Diagnostic;

/// Errors from the blog backend client.
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum ApiError {
    /// Transport or HTTP-status failure, including body decoding.
    #[error(transparent)]
    #[diagnostic(code(quill::api::http))]
    Http(#[from] reqwest::Error),

    /// Serialization/deserialization error outside of HTTP bodies.
    #[error(transparent)]
    #[diagnostic(code(quill::api::serde))]
    Json(#[from] serde_json::Error),
}
