//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures. Derived values (aggregate rating,
//! open-now status) are computed by the small pure helpers next to them.
//!
//! # Entity Types
//!
//! - [`Restaurant`] - A registered restaurant with its aggregate rating
//! - [`Review`] - One user's rating and comment for a restaurant
//! - [`ApiToken`] - A bearer token resolving to an [`AuthUser`]
//!
//! Creation inputs use separate structs: [`NewRestaurant`], [`NewReview`].

pub mod restaurant;
pub mod review;
pub mod token;

pub use restaurant::{NewRestaurant, Restaurant, RestaurantDetails, is_open_at, parse_clock_time};
pub use review::{
    MAX_RATING, MIN_RATING, NewReview, Review, ReviewOutcome, average_rating, is_valid_rating,
};
pub use token::{ApiToken, AuthUser};
