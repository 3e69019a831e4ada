//! Handlers for restaurant registration, lookup, and listing.

use axum::{
    Extension,
    extract::{
        Multipart, Path, Query, State,
        rejection::{PathRejection, QueryRejection},
        multipart::MultipartRejection,
    },
};
use validator::Validate;

use super::rejection::bad_input;
use crate::api::dto::ApiResponse;
use crate::api::dto::listing::{ListRestaurantsQuery, RestaurantListResponse};
use crate::api::dto::restaurant::{RegisterRestaurantForm, RestaurantResponse};
use crate::domain::entities::AuthUser;
use crate::error::AppError;
use crate::infrastructure::cache::restaurant_key;
use crate::state::AppState;

/// Lists restaurants with search, filters, and pagination.
///
/// # Endpoint
///
/// `GET /api/v1/restaurants`
///
/// # Query Parameters
///
/// - `keyword` (optional): case-insensitive match on name, description, city
/// - `city`, `state`, `zip_code` (optional): case-insensitive exact match
/// - `min_rating`, `max_rating` (optional): inclusive bounds, 0 to 5
/// - `open` (optional): `true` for open now, `false` for closed now
/// - `page` (optional): 1-based page number (default: 1)
/// - `page_size` (optional): results per page (default: 5, max: 50)
///
/// # Errors
///
/// Returns 400 for malformed parameters and 404 when the page is empty.
pub async fn list_restaurants_handler(
    State(state): State<AppState>,
    query: Result<Query<ListRestaurantsQuery>, QueryRejection>,
) -> Result<ApiResponse<RestaurantListResponse>, AppError> {
    let Query(query) = query.map_err(bad_input)?;

    let listing = state
        .restaurant_service
        .list_restaurants(query.into())
        .await?;

    Ok(ApiResponse::ok(
        RestaurantListResponse::from(listing),
        "Restaurants fetched successfully",
    ))
}

/// Retrieves one restaurant, served from the read cache when possible.
///
/// # Endpoint
///
/// `GET /api/v1/restaurants/{id}`
///
/// # Errors
///
/// Returns 404 if the restaurant does not exist.
pub async fn get_restaurant_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<ApiResponse<RestaurantResponse>, AppError> {
    let Path(id) = id.map_err(bad_input)?;
    let key = restaurant_key(id);

    if let Ok(Some(cached)) = state.cache.get(&key).await {
        match serde_json::from_str::<RestaurantResponse>(&cached) {
            Ok(restaurant) => return Ok(ApiResponse::ok(restaurant, "Restaurant found")),
            Err(e) => tracing::warn!(error = %e, %key, "Discarding unreadable cache entry"),
        }
    }

    let restaurant = RestaurantResponse::from(state.restaurant_service.get_restaurant(id).await?);

    match serde_json::to_string(&restaurant) {
        Ok(json) => {
            if let Err(e) = state.cache.set(&key, &json, None).await {
                tracing::warn!(error = ?e, %key, "Failed to cache restaurant");
            }
        }
        Err(e) => tracing::warn!(error = %e, %key, "Failed to serialize restaurant for cache"),
    }

    Ok(ApiResponse::ok(restaurant, "Restaurant found"))
}

/// Retrieves the caller's own restaurant.
///
/// # Endpoint
///
/// `GET /api/v1/restaurants/me` (Bearer token required)
pub async fn my_restaurant_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<ApiResponse<RestaurantResponse>, AppError> {
    let restaurant = state
        .restaurant_service
        .get_owned_restaurant(user.user_id)
        .await?;

    Ok(ApiResponse::ok(restaurant.into(), "Restaurant found"))
}

/// Registers the caller's restaurant from a multipart form.
///
/// # Endpoint
///
/// `POST /api/v1/restaurants` (Bearer token required)
///
/// # Form Fields
///
/// `name`, `description`, `owner_name`, `email`, `phone_number`,
/// `opening_time`, `closing_time` (`HH:MM`), `address`, `city`, `state`,
/// `zip_code`, and the `avatar` image file.
///
/// # Errors
///
/// - 400: missing or invalid field, missing or invalid avatar
/// - 409: the caller already has a restaurant
/// - 502: the avatar could not be uploaded
pub async fn register_restaurant_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<ApiResponse<RestaurantResponse>, AppError> {
    let multipart = multipart.map_err(bad_input)?;
    let (form, avatar) = RegisterRestaurantForm::from_multipart(multipart).await?;

    form.validate()?;
    let details = form.into_details()?;

    let restaurant = state
        .restaurant_service
        .register(user.user_id, details, avatar)
        .await?;

    Ok(ApiResponse::created(
        restaurant.into(),
        "Restaurant registered successfully",
    ))
}
