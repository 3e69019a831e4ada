//! Data Transfer Objects for API requests and responses.
//!
//! Request DTOs validate shape with `validator` before services apply business
//! rules. Every response body is wrapped in [`envelope::ApiResponse`].

pub mod envelope;
pub mod health;
pub mod listing;
pub mod restaurant;
pub mod review;

pub use envelope::ApiResponse;
