//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx with
//! bound parameters and `FromRow` row types.
//!
//! # Repositories
//!
//! - [`PgRestaurantRepository`] - Restaurant storage and filtered listing
//! - [`PgReviewRepository`] - Transactional review appends
//! - [`PgTokenRepository`] - API token storage and validation

mod rows;

pub mod pg_restaurant_repository;
pub mod pg_review_repository;
pub mod pg_token_repository;

pub use pg_restaurant_repository::PgRestaurantRepository;
pub use pg_review_repository::PgReviewRepository;
pub use pg_token_repository::PgTokenRepository;
