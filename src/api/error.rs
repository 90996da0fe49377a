//! Handler error type
//!
//! Every variant is reported to the client the same way: a 500 with the
//! endpoint's fixed message. The variants only matter for the error log.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("failed to read request body: {0}")]
    Body(String),

    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("JSON body must be an object or an array")]
    UnexpectedJson,

    #[error("invalid multipart body: {0}")]
    Multipart(#[from] multer::Error),

    #[error("upload storage error: {0}")]
    Io(#[from] std::io::Error),
}
