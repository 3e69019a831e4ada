//! In-process repository implementations.
//!
//! [`MemoryStore`] backs `STORAGE_BACKEND=memory` for local runs and the
//! HTTP test suites. One mutex guards all tables, which makes every review
//! append atomic with its rating recompute.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::entities::{
    ApiToken, NewRestaurant, NewReview, Restaurant, Review, ReviewOutcome, average_rating,
};
use crate::domain::repositories::{
    RestaurantFilter, RestaurantPage, RestaurantRepository, ReviewRepository, TokenRepository,
};
use crate::error::AppError;

#[derive(Default)]
struct Tables {
    restaurants: Vec<Restaurant>,
    reviews: Vec<Review>,
    tokens: Vec<ApiToken>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Thread-safe in-memory store implementing every repository trait.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn eq_ignore_case(value: &str, wanted: &Option<String>) -> bool {
    wanted
        .as_deref()
        .is_none_or(|w| value.to_lowercase() == w.to_lowercase())
}

fn matches_filter(restaurant: &Restaurant, filter: &RestaurantFilter) -> bool {
    let d = &restaurant.details;

    let keyword_ok = filter.keyword.as_deref().is_none_or(|kw| {
        let kw = kw.to_lowercase();
        [&d.name, &d.description, &d.city]
            .iter()
            .any(|field| field.to_lowercase().contains(&kw))
    });

    keyword_ok
        && eq_ignore_case(&d.city, &filter.city)
        && eq_ignore_case(&d.state, &filter.state)
        && eq_ignore_case(&d.zip_code, &filter.zip_code)
        && filter.min_rating.is_none_or(|min| restaurant.rating >= min)
        && filter.max_rating.is_none_or(|max| restaurant.rating <= max)
        && filter
            .open_status
            .is_none_or(|s| d.is_open_at(s.at) == s.open)
}

#[async_trait]
impl RestaurantRepository for MemoryStore {
    async fn create(&self, new_restaurant: NewRestaurant) -> Result<Restaurant, AppError> {
        let mut tables = self.lock();

        if tables
            .restaurants
            .iter()
            .any(|r| r.owner_id == new_restaurant.owner_id)
        {
            return Err(AppError::conflict(
                "User already has a restaurant",
                json!({ "owner_id": new_restaurant.owner_id }),
            ));
        }

        let now = Utc::now();
        let restaurant = Restaurant {
            id: tables.next_id(),
            owner_id: new_restaurant.owner_id,
            details: new_restaurant.details,
            avatar_url: new_restaurant.avatar_url,
            rating: 0.0,
            review_count: 0,
            created_at: now,
            updated_at: now,
        };
        tables.restaurants.push(restaurant.clone());

        Ok(restaurant)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Restaurant>, AppError> {
        Ok(self.lock().restaurants.iter().find(|r| r.id == id).cloned())
    }

    async fn find_by_owner(&self, owner_id: i64) -> Result<Option<Restaurant>, AppError> {
        Ok(self
            .lock()
            .restaurants
            .iter()
            .find(|r| r.owner_id == owner_id)
            .cloned())
    }

    async fn search(&self, filter: RestaurantFilter) -> Result<RestaurantPage, AppError> {
        let tables = self.lock();
        let matching: Vec<&Restaurant> = tables
            .restaurants
            .iter()
            .filter(|r| matches_filter(r, &filter))
            .collect();

        let offset = usize::try_from(filter.offset).unwrap_or(0);
        let limit = usize::try_from(filter.limit).unwrap_or(0);

        Ok(RestaurantPage {
            total: matching.len() as i64,
            items: matching
                .into_iter()
                .skip(offset)
                .take(limit)
                .cloned()
                .collect(),
        })
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.lock().restaurants.len() as i64)
    }
}

#[async_trait]
impl ReviewRepository for MemoryStore {
    async fn append(
        &self,
        restaurant_id: i64,
        new_review: NewReview,
    ) -> Result<ReviewOutcome, AppError> {
        let mut tables = self.lock();

        if !tables.restaurants.iter().any(|r| r.id == restaurant_id) {
            return Err(AppError::not_found(
                "Restaurant not found",
                json!({ "id": restaurant_id }),
            ));
        }

        if tables
            .reviews
            .iter()
            .any(|r| r.restaurant_id == restaurant_id && r.user_id == new_review.user_id)
        {
            return Err(AppError::conflict(
                "You have already reviewed this restaurant",
                json!({ "restaurant_id": restaurant_id, "user_id": new_review.user_id }),
            ));
        }

        let review = Review {
            id: tables.next_id(),
            restaurant_id,
            user_id: new_review.user_id,
            name: new_review.name,
            rating: new_review.rating,
            content: new_review.content,
            created_at: Utc::now(),
        };
        tables.reviews.push(review.clone());

        let ratings: Vec<f64> = tables
            .reviews
            .iter()
            .filter(|r| r.restaurant_id == restaurant_id)
            .map(|r| r.rating)
            .collect();
        let rating = average_rating(ratings.iter().copied());
        let review_count = ratings.len() as i64;

        if let Some(restaurant) = tables.restaurants.iter_mut().find(|r| r.id == restaurant_id) {
            restaurant.rating = rating;
            restaurant.review_count = review_count;
            restaurant.updated_at = Utc::now();
        }

        Ok(ReviewOutcome {
            review,
            rating,
            review_count,
        })
    }

    async fn has_reviewed(&self, restaurant_id: i64, user_id: i64) -> Result<bool, AppError> {
        Ok(self
            .lock()
            .reviews
            .iter()
            .any(|r| r.restaurant_id == restaurant_id && r.user_id == user_id))
    }

    async fn list_for_restaurant(&self, restaurant_id: i64) -> Result<Vec<Review>, AppError> {
        Ok(self
            .lock()
            .reviews
            .iter()
            .filter(|r| r.restaurant_id == restaurant_id)
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.lock().reviews.len() as i64)
    }
}

#[async_trait]
impl TokenRepository for MemoryStore {
    async fn find_active_by_hash(&self, token_hash: &str) -> Result<Option<ApiToken>, AppError> {
        Ok(self
            .lock()
            .tokens
            .iter()
            .find(|t| t.token_hash == token_hash && !t.is_revoked())
            .cloned())
    }

    async fn update_last_used(&self, token_hash: &str) -> Result<(), AppError> {
        if let Some(token) = self
            .lock()
            .tokens
            .iter_mut()
            .find(|t| t.token_hash == token_hash && !t.is_revoked())
        {
            token.last_used_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn create_token(
        &self,
        user_id: i64,
        name: &str,
        token_hash: &str,
    ) -> Result<ApiToken, AppError> {
        let mut tables = self.lock();

        if tables
            .tokens
            .iter()
            .any(|t| t.name == name || t.token_hash == token_hash)
        {
            return Err(AppError::conflict(
                "Token already exists",
                json!({ "name": name }),
            ));
        }

        let token = ApiToken {
            id: tables.next_id(),
            user_id,
            name: name.to_string(),
            token_hash: token_hash.to_string(),
            created_at: Utc::now(),
            last_used_at: None,
            revoked_at: None,
        };
        tables.tokens.push(token.clone());

        Ok(token)
    }

    async fn list_tokens(&self) -> Result<Vec<ApiToken>, AppError> {
        let mut tokens = self.lock().tokens.clone();
        tokens.reverse();
        Ok(tokens)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ApiToken>, AppError> {
        Ok(self.lock().tokens.iter().find(|t| t.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<ApiToken>, AppError> {
        Ok(self.lock().tokens.iter().find(|t| t.name == name).cloned())
    }

    async fn revoke_token(&self, id: i64) -> Result<(), AppError> {
        match self
            .lock()
            .tokens
            .iter_mut()
            .find(|t| t.id == id && !t.is_revoked())
        {
            Some(token) => {
                token.revoked_at = Some(Utc::now());
                Ok(())
            }
            None => Err(AppError::not_found(
                "Token not found or already revoked",
                json!({ "id": id }),
            )),
        }
    }
}
