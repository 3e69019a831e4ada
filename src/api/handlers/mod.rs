//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
mod rejection;
pub mod restaurants;
pub mod reviews;

pub use health::health_handler;
pub use restaurants::{
    get_restaurant_handler, list_restaurants_handler, my_restaurant_handler,
    register_restaurant_handler,
};
pub use reviews::{create_review_handler, list_reviews_handler};
