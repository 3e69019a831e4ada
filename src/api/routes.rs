//! API route configuration.
//!
//! Reads are public. Writes and the owner lookup require Bearer token
//! authentication via [`crate::api::middleware::auth`].

use crate::api::handlers::{
    create_review_handler, get_restaurant_handler, list_restaurants_handler,
    list_reviews_handler, my_restaurant_handler, register_restaurant_handler,
};
use crate::api::middleware::auth;
use crate::state::AppState;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};

/// Headroom over the avatar limit for the form's text fields.
pub const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Public read routes.
///
/// # Endpoints
///
/// - `GET /restaurants`                - Search, filter, and page restaurants
/// - `GET /restaurants/{id}`           - Restaurant by id
/// - `GET /restaurants/{id}/reviews`   - Reviews of a restaurant
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/restaurants", get(list_restaurants_handler))
        .route("/restaurants/{id}", get(get_restaurant_handler))
        .route("/restaurants/{id}/reviews", get(list_reviews_handler))
}

/// Routes protected by Bearer token authentication.
///
/// # Endpoints
///
/// - `POST /restaurants`               - Register the caller's restaurant (multipart)
/// - `GET  /restaurants/me`            - The caller's restaurant
/// - `POST /restaurants/{id}/reviews`  - Review a restaurant
///
/// `max_avatar_bytes` bounds the registration body (plus form overhead).
pub fn protected_routes(state: AppState, max_avatar_bytes: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/restaurants",
            post(register_restaurant_handler).layer(DefaultBodyLimit::max(
                max_avatar_bytes.saturating_add(FORM_OVERHEAD_BYTES),
            )),
        )
        .route("/restaurants/me", get(my_restaurant_handler))
        .route("/restaurants/{id}/reviews", post(create_review_handler))
        .route_layer(middleware::from_fn_with_state(state, auth::layer))
}
