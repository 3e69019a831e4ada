//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`      - Health check: store and cache (public)
//! - `/api/v1/*`         - REST API (writes require a Bearer token)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket, stricter for authenticated routes
//! - **Body limit** - Caps request bodies at the upload limit
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::rate_limit::{self, READ_QUOTA, WRITE_QUOTA};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Router construction options.
#[derive(Debug, Clone, Copy)]
pub struct RouterOptions {
    /// When `true`, rate limiting reads client IP from forwarding headers
    /// instead of the peer socket address.
    pub behind_proxy: bool,
    /// Disabled in tests, where requests carry no peer address.
    pub rate_limit: bool,
    pub max_avatar_bytes: usize,
}

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState, options: RouterOptions) -> NormalizePath<Router> {
    let mut public = api::routes::public_routes();
    let mut protected = api::routes::protected_routes(state.clone(), options.max_avatar_bytes);

    if options.rate_limit {
        if options.behind_proxy {
            public = public.layer(rate_limit::forwarded_ip(READ_QUOTA));
            protected = protected.layer(rate_limit::forwarded_ip(WRITE_QUOTA));
        } else {
            public = public.layer(rate_limit::peer_ip(READ_QUOTA));
            protected = protected.layer(rate_limit::peer_ip(WRITE_QUOTA));
        }
    }

    let body_limit = options
        .max_avatar_bytes
        .saturating_add(api::routes::FORM_OVERHEAD_BYTES);

    let router = Router::new()
        .route("/health", get(health_handler))
        .nest("/api/v1", public.merge(protected))
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
