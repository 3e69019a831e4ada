//! DTOs for review submission and listing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{Review, ReviewOutcome};

/// Review submission body.
///
/// The rating range is checked by the review service so that the error
/// message stays the same for every client.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReviewRequest {
    #[validate(length(min = 1, max = 120, message = "must be between 1 and 120 characters"))]
    pub name: String,

    pub rating: f64,

    #[validate(length(max = 5000, message = "must be at most 5000 characters"))]
    #[serde(default)]
    pub review: String,
}

impl CreateReviewRequest {
    /// Trims the text fields so that length checks apply to the stored values.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            review: self.review.trim().to_string(),
            ..self
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub id: i64,
    pub restaurant_id: i64,
    pub user_id: i64,
    pub name: String,
    pub rating: f64,
    pub review: String,
    pub created_at: DateTime<Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(r: Review) -> Self {
        Self {
            id: r.id,
            restaurant_id: r.restaurant_id,
            user_id: r.user_id,
            name: r.name,
            rating: r.rating,
            review: r.content,
            created_at: r.created_at,
        }
    }
}

/// Accepted review plus the restaurant's new aggregate.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewCreatedResponse {
    pub review: ReviewResponse,
    pub rating: f64,
    pub review_count: i64,
}

impl From<ReviewOutcome> for ReviewCreatedResponse {
    fn from(o: ReviewOutcome) -> Self {
        Self {
            review: o.review.into(),
            rating: o.rating,
            review_count: o.review_count,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewListResponse {
    pub reviews: Vec<ReviewResponse>,
    pub count: usize,
}

impl From<Vec<Review>> for ReviewListResponse {
    fn from(reviews: Vec<Review>) -> Self {
        let reviews: Vec<ReviewResponse> = reviews.into_iter().map(Into::into).collect();
        Self {
            count: reviews.len(),
            reviews,
        }
    }
}
