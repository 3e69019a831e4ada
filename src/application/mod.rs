//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! validation, and business rules. Services consume repository traits and provide
//! a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::restaurant_service::RestaurantService`] - Registration, lookup, listing
//! - [`services::review_service::ReviewService`] - Review submission and the aggregate rating
//! - [`services::auth_service::AuthService`] - API token authentication

pub mod services;
