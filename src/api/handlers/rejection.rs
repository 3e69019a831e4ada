//! Maps extractor rejections into the error envelope.

use serde_json::json;
use std::fmt::Display;

use crate::error::AppError;

/// Malformed path, query, JSON, or multipart input.
pub(crate) fn bad_input(rejection: impl Display) -> AppError {
    AppError::bad_request(
        "Invalid request",
        json!({ "reason": rejection.to_string() }),
    )
}
