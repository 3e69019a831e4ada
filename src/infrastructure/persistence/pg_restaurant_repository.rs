//! PostgreSQL implementation of restaurant repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use super::rows::{RestaurantRow, restaurant_columns};
use crate::domain::entities::{NewRestaurant, Restaurant};
use crate::domain::repositories::{RestaurantFilter, RestaurantPage, RestaurantRepository};
use crate::error::AppError;
use crate::utils::db_error::{RESTAURANT_OWNER_KEY, is_unique_violation_on};
use crate::utils::like_pattern::contains_pattern;

/// Shared `WHERE` clause for listing and counting.
///
/// Binds: `$1` keyword pattern, `$2` city, `$3` state, `$4` zip code,
/// `$5` min rating, `$6` max rating, `$7` local time, `$8` wanted open status.
macro_rules! restaurant_filter {
    () => {
        r#"
        WHERE ($1::text IS NULL
               OR name ILIKE $1 ESCAPE '\'
               OR description ILIKE $1 ESCAPE '\'
               OR city ILIKE $1 ESCAPE '\')
          AND ($2::text IS NULL OR LOWER(city) = LOWER($2))
          AND ($3::text IS NULL OR LOWER(state) = LOWER($3))
          AND ($4::text IS NULL OR LOWER(zip_code) = LOWER($4))
          AND ($5::float8 IS NULL OR rating >= $5)
          AND ($6::float8 IS NULL OR rating <= $6)
          AND ($7::time IS NULL OR (
                CASE
                    WHEN opening_time = closing_time THEN TRUE
                    WHEN opening_time < closing_time
                        THEN $7::time >= opening_time AND $7::time < closing_time
                    ELSE $7::time >= opening_time OR $7::time < closing_time
                END
              ) = $8::bool)
        "#
    };
}

/// PostgreSQL repository for restaurant storage and search.
pub struct PgRestaurantRepository {
    pool: Arc<PgPool>,
}

impl PgRestaurantRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RestaurantRepository for PgRestaurantRepository {
    async fn create(&self, new_restaurant: NewRestaurant) -> Result<Restaurant, AppError> {
        let NewRestaurant {
            owner_id,
            details,
            avatar_url,
        } = new_restaurant;

        let row = sqlx::query_as::<_, RestaurantRow>(concat!(
            r#"
            INSERT INTO restaurants (
                owner_id, name, description, owner_name, email, phone_number,
                opening_time, closing_time, address, city, state, zip_code, avatar_url
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING "#,
            restaurant_columns!()
        ))
        .bind(owner_id)
        .bind(details.name)
        .bind(details.description)
        .bind(details.owner_name)
        .bind(details.email)
        .bind(details.phone_number)
        .bind(details.opening_time)
        .bind(details.closing_time)
        .bind(details.address)
        .bind(details.city)
        .bind(details.state)
        .bind(details.zip_code)
        .bind(avatar_url)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| {
            if is_unique_violation_on(&e, RESTAURANT_OWNER_KEY) {
                AppError::conflict(
                    "User already has a restaurant",
                    json!({ "owner_id": owner_id }),
                )
            } else {
                AppError::from(e)
            }
        })?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Restaurant>, AppError> {
        let row = sqlx::query_as::<_, RestaurantRow>(concat!(
            "SELECT ",
            restaurant_columns!(),
            " FROM restaurants WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_by_owner(&self, owner_id: i64) -> Result<Option<Restaurant>, AppError> {
        let row = sqlx::query_as::<_, RestaurantRow>(concat!(
            "SELECT ",
            restaurant_columns!(),
            " FROM restaurants WHERE owner_id = $1"
        ))
        .bind(owner_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn search(&self, filter: RestaurantFilter) -> Result<RestaurantPage, AppError> {
        let keyword = filter.keyword.as_deref().map(contains_pattern);
        let at = filter.open_status.map(|s| s.at);
        let open = filter.open_status.map(|s| s.open);

        let rows = sqlx::query_as::<_, RestaurantRow>(concat!(
            "SELECT ",
            restaurant_columns!(),
            " FROM restaurants ",
            restaurant_filter!(),
            " ORDER BY created_at, id LIMIT $9 OFFSET $10"
        ))
        .bind(&keyword)
        .bind(&filter.city)
        .bind(&filter.state)
        .bind(&filter.zip_code)
        .bind(filter.min_rating)
        .bind(filter.max_rating)
        .bind(at)
        .bind(open)
        .bind(filter.limit)
        .bind(filter.offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        let total: i64 = sqlx::query_scalar(concat!(
            "SELECT COUNT(*) FROM restaurants ",
            restaurant_filter!()
        ))
        .bind(&keyword)
        .bind(&filter.city)
        .bind(&filter.state)
        .bind(&filter.zip_code)
        .bind(filter.min_rating)
        .bind(filter.max_rating)
        .bind(at)
        .bind(open)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(RestaurantPage {
            items: rows.into_iter().map(Into::into).collect(),
            total,
        })
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM restaurants")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
