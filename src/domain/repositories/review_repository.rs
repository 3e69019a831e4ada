//! Repository trait for restaurant reviews.

use crate::domain::entities::{NewReview, Review, ReviewOutcome};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for reviews and the aggregate rating they drive.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgReviewRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::MemoryStore`] - In-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Appends a review and recomputes the restaurant's aggregate rating as one
    /// atomic unit. Concurrent appends to the same restaurant are serialized.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the restaurant does not exist.
    /// Returns [`AppError::Conflict`] if the user already reviewed the restaurant.
    /// Returns [`AppError::Internal`] on database errors.
    async fn append(
        &self,
        restaurant_id: i64,
        new_review: NewReview,
    ) -> Result<ReviewOutcome, AppError>;

    /// Returns true if the user has already reviewed the restaurant.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn has_reviewed(&self, restaurant_id: i64, user_id: i64) -> Result<bool, AppError>;

    /// Lists a restaurant's reviews in append order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_for_restaurant(&self, restaurant_id: i64) -> Result<Vec<Review>, AppError>;

    /// Counts all reviews.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count(&self) -> Result<i64, AppError>;
}
