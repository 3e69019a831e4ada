//! Shared application state injected into handlers.

use std::sync::Arc;

use crate::application::services::{AuthService, RestaurantService, RestaurantSettings, ReviewService};
use crate::domain::media::MediaHost;
use crate::domain::repositories::{RestaurantRepository, ReviewRepository, TokenRepository};
use crate::infrastructure::cache::CacheService;

/// Process-wide handles, created once at startup.
///
/// Cloning is cheap: every field is an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub restaurant_service: Arc<RestaurantService>,
    pub review_service: Arc<ReviewService>,
    pub auth_service: Arc<AuthService>,
    pub cache: Arc<dyn CacheService>,
}

/// Storage, media and cache backends used to assemble [`AppState`].
pub struct Backends {
    pub restaurants: Arc<dyn RestaurantRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub tokens: Arc<dyn TokenRepository>,
    pub media: Arc<dyn MediaHost>,
    pub cache: Arc<dyn CacheService>,
}

impl AppState {
    /// Wires services on top of the given backends.
    pub fn new(backends: Backends, settings: RestaurantSettings, signing_secret: String) -> Self {
        let Backends {
            restaurants,
            reviews,
            tokens,
            media,
            cache,
        } = backends;

        Self {
            restaurant_service: Arc::new(RestaurantService::new(
                restaurants.clone(),
                media,
                settings,
            )),
            review_service: Arc::new(ReviewService::new(restaurants, reviews)),
            auth_service: Arc::new(AuthService::new(tokens, signing_secret)),
            cache,
        }
    }
}
