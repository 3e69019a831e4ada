//! Handlers for restaurant reviews.

use axum::{
    Extension, Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
};
use validator::Validate;

use super::rejection::bad_input;
use crate::api::dto::ApiResponse;
use crate::api::dto::review::{CreateReviewRequest, ReviewCreatedResponse, ReviewListResponse};
use crate::domain::entities::{AuthUser, NewReview};
use crate::error::AppError;
use crate::infrastructure::cache::invalidate_restaurant;
use crate::state::AppState;

/// Submits the caller's review of a restaurant.
///
/// # Endpoint
///
/// `POST /api/v1/restaurants/{id}/reviews` (Bearer token required)
///
/// # Request Body
///
/// ```json
/// { "name": "Alex", "rating": 4, "review": "Great falafel" }
/// ```
///
/// # Errors
///
/// - 400: rating outside `[0, 5]` or invalid body
/// - 404: restaurant does not exist
/// - 409: the caller already reviewed this restaurant
pub async fn create_review_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<CreateReviewRequest>, JsonRejection>,
) -> Result<ApiResponse<ReviewCreatedResponse>, AppError> {
    let Path(restaurant_id) = id.map_err(bad_input)?;
    let Json(payload) = body.map_err(bad_input)?;
    let payload = payload.normalized();
    payload.validate()?;

    let outcome = state
        .review_service
        .add_review(
            restaurant_id,
            NewReview {
                user_id: user.user_id,
                name: payload.name,
                rating: payload.rating,
                content: payload.review,
            },
        )
        .await?;

    invalidate_restaurant(&state.cache, restaurant_id).await;

    Ok(ApiResponse::created(
        outcome.into(),
        "Review added successfully",
    ))
}

/// Lists a restaurant's reviews in submission order.
///
/// # Endpoint
///
/// `GET /api/v1/restaurants/{id}/reviews`
pub async fn list_reviews_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<ApiResponse<ReviewListResponse>, AppError> {
    let Path(restaurant_id) = id.map_err(bad_input)?;

    let reviews = state.review_service.list_reviews(restaurant_id).await?;

    Ok(ApiResponse::ok(reviews.into(), "Reviews fetched successfully"))
}
