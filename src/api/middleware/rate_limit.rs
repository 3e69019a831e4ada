//! Rate limiting middleware using token bucket algorithm.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

type Layer<K> = GovernorLayer<K, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Bucket size and the interval after which one request is replenished.
#[derive(Debug, Clone, Copy)]
pub struct Quota {
    pub replenish_ms: u64,
    pub burst: u32,
}

/// Read endpoints: 5 req/s sustained, burst 100.
pub const READ_QUOTA: Quota = Quota {
    replenish_ms: 200,
    burst: 100,
};

/// Write endpoints (registration, reviews): 1 req/s sustained, burst 10.
pub const WRITE_QUOTA: Quota = Quota {
    replenish_ms: 1000,
    burst: 10,
};

fn build<K: KeyExtractor>(key_extractor: K, quota: Quota) -> Layer<K> {
    let config = GovernorConfigBuilder::default()
        .key_extractor(key_extractor)
        .per_millisecond(quota.replenish_ms.max(1))
        .burst_size(quota.burst.max(1))
        .finish()
        .expect("non-zero rate limit quota");

    GovernorLayer::new(Arc::new(config))
}

/// Limits per socket peer address.
///
/// Requires the server to be started with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn peer_ip(quota: Quota) -> Layer<PeerIpKeyExtractor> {
    build(PeerIpKeyExtractor, quota)
}

/// Limits per client IP taken from `X-Forwarded-For`, `X-Real-IP`, or
/// `Forwarded`, falling back to the peer address.
///
/// Use only behind a trusted reverse proxy; the headers are client-controlled
/// otherwise.
pub fn forwarded_ip(quota: Quota) -> Layer<SmartIpKeyExtractor> {
    build(SmartIpKeyExtractor, quota)
}
