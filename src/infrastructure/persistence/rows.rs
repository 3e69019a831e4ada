//! Row types shared by the PostgreSQL repositories.

use chrono::{DateTime, NaiveTime, Utc};
use sqlx::FromRow;

use crate::domain::entities::{ApiToken, Restaurant, RestaurantDetails, Review};

/// Column list matching [`RestaurantRow`].
macro_rules! restaurant_columns {
    () => {
        "id, owner_id, name, description, owner_name, email, phone_number, \
         opening_time, closing_time, address, city, state, zip_code, avatar_url, \
         rating, review_count, created_at, updated_at"
    };
}

/// Column list matching [`ReviewRow`].
macro_rules! review_columns {
    () => {
        "id, restaurant_id, user_id, name, rating, content, created_at"
    };
}

/// Column list matching [`TokenRow`].
macro_rules! token_columns {
    () => {
        "id, user_id, name, token_hash, created_at, last_used_at, revoked_at"
    };
}

pub(crate) use {restaurant_columns, review_columns, token_columns};

#[derive(Debug, FromRow)]
pub(crate) struct RestaurantRow {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub description: String,
    pub owner_name: String,
    pub email: String,
    pub phone_number: String,
    pub opening_time: NaiveTime,
    pub closing_time: NaiveTime,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub avatar_url: String,
    pub rating: f64,
    pub review_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RestaurantRow> for Restaurant {
    fn from(row: RestaurantRow) -> Self {
        Restaurant {
            id: row.id,
            owner_id: row.owner_id,
            details: RestaurantDetails {
                name: row.name,
                description: row.description,
                owner_name: row.owner_name,
                email: row.email,
                phone_number: row.phone_number,
                opening_time: row.opening_time,
                closing_time: row.closing_time,
                address: row.address,
                city: row.city,
                state: row.state,
                zip_code: row.zip_code,
            },
            avatar_url: row.avatar_url,
            rating: row.rating,
            review_count: row.review_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct ReviewRow {
    pub id: i64,
    pub restaurant_id: i64,
    pub user_id: i64,
    pub name: String,
    pub rating: f64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Review {
            id: row.id,
            restaurant_id: row.restaurant_id,
            user_id: row.user_id,
            name: row.name,
            rating: row.rating,
            content: row.content,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct TokenRow {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl From<TokenRow> for ApiToken {
    fn from(row: TokenRow) -> Self {
        ApiToken {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            token_hash: row.token_hash,
            created_at: row.created_at,
            last_used_at: row.last_used_at,
            revoked_at: row.revoked_at,
        }
    }
}
