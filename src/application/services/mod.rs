//! Business logic services for the application layer.

pub mod auth_service;
pub mod restaurant_service;
pub mod review_service;

pub use auth_service::AuthService;
pub use restaurant_service::{
    ListingQuery, RestaurantListing, RestaurantService, RestaurantSettings, UploadRetryPolicy,
};
pub use review_service::ReviewService;
