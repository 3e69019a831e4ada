//! PostgreSQL implementation of review repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use super::rows::{ReviewRow, review_columns};
use crate::domain::entities::{NewReview, Review, ReviewOutcome};
use crate::domain::repositories::ReviewRepository;
use crate::error::AppError;
use crate::utils::db_error::{REVIEW_USER_KEY, is_unique_violation_on};

/// PostgreSQL repository for reviews.
///
/// Appends run in a transaction that locks the restaurant row, so concurrent
/// reviews of one restaurant are serialized and the stored aggregate always
/// equals `AVG(rating)` over its reviews.
pub struct PgReviewRepository {
    pool: Arc<PgPool>,
}

impl PgReviewRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewRepository for PgReviewRepository {
    async fn append(
        &self,
        restaurant_id: i64,
        new_review: NewReview,
    ) -> Result<ReviewOutcome, AppError> {
        let mut tx = self.pool.begin().await?;

        let locked: Option<i64> =
            sqlx::query_scalar("SELECT id FROM restaurants WHERE id = $1 FOR UPDATE")
                .bind(restaurant_id)
                .fetch_optional(&mut *tx)
                .await?;

        if locked.is_none() {
            return Err(AppError::not_found(
                "Restaurant not found",
                json!({ "id": restaurant_id }),
            ));
        }

        let user_id = new_review.user_id;
        let review = sqlx::query_as::<_, ReviewRow>(concat!(
            r#"
            INSERT INTO reviews (restaurant_id, user_id, name, rating, content, created_at)
            VALUES ($1, $2, $3, $4, $5, clock_timestamp())
            RETURNING "#,
            review_columns!()
        ))
        .bind(restaurant_id)
        .bind(user_id)
        .bind(new_review.name)
        .bind(new_review.rating)
        .bind(new_review.content)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation_on(&e, REVIEW_USER_KEY) {
                AppError::conflict(
                    "You have already reviewed this restaurant",
                    json!({ "restaurant_id": restaurant_id, "user_id": user_id }),
                )
            } else {
                AppError::from(e)
            }
        })?;

        let (rating, review_count): (f64, i64) = sqlx::query_as(
            r#"
            UPDATE restaurants r
            SET rating = agg.avg_rating,
                review_count = agg.review_count,
                updated_at = NOW()
            FROM (
                SELECT COALESCE(AVG(rating), 0)::float8 AS avg_rating,
                       COUNT(*) AS review_count
                FROM reviews
                WHERE restaurant_id = $1
            ) agg
            WHERE r.id = $1
            RETURNING r.rating, r.review_count
            "#,
        )
        .bind(restaurant_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(ReviewOutcome {
            review: review.into(),
            rating,
            review_count,
        })
    }

    async fn has_reviewed(&self, restaurant_id: i64, user_id: i64) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM reviews WHERE restaurant_id = $1 AND user_id = $2)",
        )
        .bind(restaurant_id)
        .bind(user_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(exists)
    }

    async fn list_for_restaurant(&self, restaurant_id: i64) -> Result<Vec<Review>, AppError> {
        let rows = sqlx::query_as::<_, ReviewRow>(concat!(
            "SELECT ",
            review_columns!(),
            " FROM reviews WHERE restaurant_id = $1 ORDER BY id"
        ))
        .bind(restaurant_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
