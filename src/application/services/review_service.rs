//! Review submission and retrieval.

use serde_json::json;
use std::sync::Arc;

use crate::domain::entities::{MAX_RATING, MIN_RATING, NewReview, Review, ReviewOutcome, is_valid_rating};
use crate::domain::repositories::{RestaurantRepository, ReviewRepository};
use crate::error::AppError;

/// Service for restaurant reviews.
///
/// Each user may review a restaurant once. The restaurant's aggregate rating is
/// the mean of all its review ratings, recomputed by the repository in the same
/// atomic unit as the append.
pub struct ReviewService<
    RR: RestaurantRepository + ?Sized = dyn RestaurantRepository,
    VR: ReviewRepository + ?Sized = dyn ReviewRepository,
> {
    restaurants: Arc<RR>,
    reviews: Arc<VR>,
}

impl<RR, VR> ReviewService<RR, VR>
where
    RR: RestaurantRepository + ?Sized,
    VR: ReviewRepository + ?Sized,
{
    /// Creates a new review service.
    pub fn new(restaurants: Arc<RR>, reviews: Arc<VR>) -> Self {
        Self {
            restaurants,
            reviews,
        }
    }

    /// Adds a review from `user_id` to a restaurant.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the rating is outside `[0, 5]`.
    /// Returns [`AppError::NotFound`] if the restaurant does not exist.
    /// Returns [`AppError::Conflict`] if the user already reviewed it.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn add_review(
        &self,
        restaurant_id: i64,
        new_review: NewReview,
    ) -> Result<ReviewOutcome, AppError> {
        if !is_valid_rating(new_review.rating) {
            return Err(AppError::bad_request(
                format!("Rating must be between {MIN_RATING} and {MAX_RATING}"),
                json!({ "rating": new_review.rating, "min": MIN_RATING, "max": MAX_RATING }),
            ));
        }

        self.ensure_restaurant(restaurant_id).await?;

        let user_id = new_review.user_id;
        if self.reviews.has_reviewed(restaurant_id, user_id).await? {
            return Err(already_reviewed(restaurant_id, user_id));
        }

        let outcome = self
            .reviews
            .append(restaurant_id, new_review)
            .await
            .map_err(|e| match e {
                // Lost the race against a concurrent submission by the same user.
                AppError::Conflict { .. } => already_reviewed(restaurant_id, user_id),
                other => other,
            })?;

        metrics::counter!("reviews_submitted_total").increment(1);
        tracing::info!(
            restaurant_id,
            user_id,
            rating = outcome.rating,
            review_count = outcome.review_count,
            "Review added"
        );

        Ok(outcome)
    }

    /// Lists a restaurant's reviews in the order they were added.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the restaurant does not exist.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn list_reviews(&self, restaurant_id: i64) -> Result<Vec<Review>, AppError> {
        self.ensure_restaurant(restaurant_id).await?;
        self.reviews.list_for_restaurant(restaurant_id).await
    }

    async fn ensure_restaurant(&self, restaurant_id: i64) -> Result<(), AppError> {
        match self.restaurants.find_by_id(restaurant_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::not_found(
                "Restaurant not found",
                json!({ "id": restaurant_id }),
            )),
        }
    }
}

fn already_reviewed(restaurant_id: i64, user_id: i64) -> AppError {
    AppError::conflict(
        "You have already reviewed this restaurant",
        json!({ "restaurant_id": restaurant_id, "user_id": user_id }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Restaurant, RestaurantDetails};
    use crate::domain::repositories::{MockRestaurantRepository, MockReviewRepository};
    use chrono::{NaiveTime, Utc};

    fn restaurant(id: i64) -> Restaurant {
        Restaurant {
            id,
            owner_id: 1,
            details: RestaurantDetails {
                name: "Blue Fig".to_string(),
                description: "Mediterranean".to_string(),
                owner_name: "Sam Doe".to_string(),
                email: "owner@bluefig.example".to_string(),
                phone_number: "555-0100".to_string(),
                opening_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                closing_time: NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
                address: "1 Main St".to_string(),
                city: "Springfield".to_string(),
                state: "IL".to_string(),
                zip_code: "62701".to_string(),
            },
            avatar_url: "https://media.example/a.png".to_string(),
            rating: 0.0,
            review_count: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn new_review(user_id: i64, rating: f64) -> NewReview {
        NewReview {
            user_id,
            name: "Alex".to_string(),
            rating,
            content: "Great falafel".to_string(),
        }
    }

    fn outcome(restaurant_id: i64, review: &NewReview, rating: f64, count: i64) -> ReviewOutcome {
        ReviewOutcome {
            review: Review {
                id: count,
                restaurant_id,
                user_id: review.user_id,
                name: review.name.clone(),
                rating: review.rating,
                content: review.content.clone(),
                created_at: Utc::now(),
            },
            rating,
            review_count: count,
        }
    }

    fn service(
        restaurants: MockRestaurantRepository,
        reviews: MockReviewRepository,
    ) -> ReviewService<MockRestaurantRepository, MockReviewRepository> {
        ReviewService::new(Arc::new(restaurants), Arc::new(reviews))
    }

    #[tokio::test]
    async fn test_add_review_success() {
        let mut restaurants = MockRestaurantRepository::new();
        let mut reviews = MockReviewRepository::new();

        restaurants
            .expect_find_by_id()
            .returning(|id| Ok(Some(restaurant(id))));
        reviews.expect_has_reviewed().returning(|_, _| Ok(false));
        reviews
            .expect_append()
            .withf(|id, review| *id == 10 && review.rating == 4.0)
            .times(1)
            .returning(|id, review| Ok(outcome(id, &review, 4.0, 1)));

        let result = service(restaurants, reviews)
            .add_review(10, new_review(3, 4.0))
            .await
            .unwrap();

        assert_eq!(result.rating, 4.0);
        assert_eq!(result.review_count, 1);
        assert_eq!(result.review.user_id, 3);
    }

    #[tokio::test]
    async fn test_add_review_rejects_out_of_range_rating() {
        for rating in [-1.0, 5.5, f64::NAN] {
            let mut restaurants = MockRestaurantRepository::new();
            let mut reviews = MockReviewRepository::new();
            restaurants.expect_find_by_id().never();
            reviews.expect_append().never();

            let result = service(restaurants, reviews)
                .add_review(10, new_review(3, rating))
                .await;

            assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
        }
    }

    #[tokio::test]
    async fn test_add_review_accepts_zero_rating() {
        let mut restaurants = MockRestaurantRepository::new();
        let mut reviews = MockReviewRepository::new();

        restaurants
            .expect_find_by_id()
            .returning(|id| Ok(Some(restaurant(id))));
        reviews.expect_has_reviewed().returning(|_, _| Ok(false));
        reviews
            .expect_append()
            .returning(|id, review| Ok(outcome(id, &review, 0.0, 1)));

        let result = service(restaurants, reviews)
            .add_review(10, new_review(3, 0.0))
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_add_review_restaurant_not_found() {
        let mut restaurants = MockRestaurantRepository::new();
        let mut reviews = MockReviewRepository::new();

        restaurants.expect_find_by_id().returning(|_| Ok(None));
        reviews.expect_append().never();

        let result = service(restaurants, reviews)
            .add_review(10, new_review(3, 4.0))
            .await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_add_review_twice_is_conflict() {
        let mut restaurants = MockRestaurantRepository::new();
        let mut reviews = MockReviewRepository::new();

        restaurants
            .expect_find_by_id()
            .returning(|id| Ok(Some(restaurant(id))));
        reviews
            .expect_has_reviewed()
            .withf(|restaurant_id, user_id| *restaurant_id == 10 && *user_id == 3)
            .returning(|_, _| Ok(true));
        reviews.expect_append().never();

        let result = service(restaurants, reviews)
            .add_review(10, new_review(3, 4.0))
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_add_review_storage_conflict_is_reported_as_duplicate() {
        let mut restaurants = MockRestaurantRepository::new();
        let mut reviews = MockReviewRepository::new();

        restaurants
            .expect_find_by_id()
            .returning(|id| Ok(Some(restaurant(id))));
        reviews.expect_has_reviewed().returning(|_, _| Ok(false));
        reviews.expect_append().returning(|_, _| {
            Err(AppError::conflict("Unique constraint violation", json!({})))
        });

        let err = service(restaurants, reviews)
            .add_review(10, new_review(3, 4.0))
            .await
            .unwrap_err();

        assert_eq!(err.message(), "You have already reviewed this restaurant");
    }

    #[tokio::test]
    async fn test_list_reviews_restaurant_not_found() {
        let mut restaurants = MockRestaurantRepository::new();
        let mut reviews = MockReviewRepository::new();

        restaurants.expect_find_by_id().returning(|_| Ok(None));
        reviews.expect_list_for_restaurant().never();

        let result = service(restaurants, reviews).list_reviews(99).await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }
}
