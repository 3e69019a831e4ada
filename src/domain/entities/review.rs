//! Review entity and the aggregate rating it feeds.

use chrono::{DateTime, Utc};

/// Lowest accepted rating.
pub const MIN_RATING: f64 = 0.0;
/// Highest accepted rating.
pub const MAX_RATING: f64 = 5.0;

/// A user's review of a restaurant.
#[derive(Debug, Clone)]
pub struct Review {
    pub id: i64,
    pub restaurant_id: i64,
    pub user_id: i64,
    pub name: String,
    pub rating: f64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Input data for appending a review.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub user_id: i64,
    pub name: String,
    pub rating: f64,
    pub content: String,
}

/// Result of an accepted review: the stored review and the restaurant's
/// recomputed aggregate.
#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    pub review: Review,
    pub rating: f64,
    pub review_count: i64,
}

/// Returns true if `rating` lies within `[MIN_RATING, MAX_RATING]`.
///
/// NaN and infinities are rejected.
pub fn is_valid_rating(rating: f64) -> bool {
    rating.is_finite() && (MIN_RATING..=MAX_RATING).contains(&rating)
}

/// Unweighted mean of all ratings, `0.0` when there are none.
pub fn average_rating<I>(ratings: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = ratings
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), r| (sum + r, count + 1));

    if count == 0 { 0.0 } else { sum / count as f64 }
}
