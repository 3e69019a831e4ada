//! Shared helpers.
//!
//! - [`db_error`] - Database error classification
//! - [`like_pattern`] - Escaping user input for SQL `LIKE` patterns

pub mod db_error;
pub mod like_pattern;
