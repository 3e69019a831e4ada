//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access following the Repository pattern. They are
//! implemented in the infrastructure layer by PostgreSQL repositories and by the
//! in-memory store.
//!
//! # Available Repositories
//!
//! - [`RestaurantRepository`] - Restaurant storage and search
//! - [`ReviewRepository`] - Review appends and the aggregate rating
//! - [`TokenRepository`] - API token authentication
//!
//! # Testing
//!
//! Mock implementations are generated with `mockall` under `cfg(test)`.
//! See integration tests in `tests/repository_*.rs` for database usage.

pub mod restaurant_repository;
pub mod review_repository;
pub mod token_repository;

pub use restaurant_repository::{
    OpenStatusFilter, RestaurantFilter, RestaurantPage, RestaurantRepository,
};
pub use review_repository::ReviewRepository;
pub use token_repository::TokenRepository;

#[cfg(test)]
pub use restaurant_repository::MockRestaurantRepository;
#[cfg(test)]
pub use review_repository::MockReviewRepository;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
