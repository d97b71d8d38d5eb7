// src/presentation/http/middleware/rate_limit.rs
use ::governor::middleware::NoOpMiddleware;
use axum::body::Body;
use std::sync::OnceLock;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};
use tracing::error;

pub type LoginRateLimit<K> = GovernorLayer<K, NoOpMiddleware, Body>;

/// Per-IP limiter for login attempts keyed on the socket peer. Forwarded
/// headers are ignored so clients cannot pick their own bucket.
pub fn login_rate_limit_layer() -> Option<LoginRateLimit<PeerIpKeyExtractor>> {
    static RATE_LIMITER: OnceLock<Option<LoginRateLimit<PeerIpKeyExtractor>>> = OnceLock::new();

    RATE_LIMITER
        .get_or_init(|| build_layer(PeerIpKeyExtractor))
        .clone()
}

/// Same limits, keyed on `X-Forwarded-For` / `X-Real-Ip` / `Forwarded` for
/// deployments behind a trusted reverse proxy.
pub fn proxied_login_rate_limit_layer() -> Option<LoginRateLimit<SmartIpKeyExtractor>> {
    static RATE_LIMITER: OnceLock<Option<LoginRateLimit<SmartIpKeyExtractor>>> = OnceLock::new();

    RATE_LIMITER
        .get_or_init(|| build_layer(SmartIpKeyExtractor))
        .clone()
}

/// 10 requests per second, bursts of 20.
fn build_layer<K: KeyExtractor>(extractor: K) -> Option<LoginRateLimit<K>> {
    let mut builder = GovernorConfigBuilder::default();
    builder.per_second(10);
    builder.burst_size(20);
    match builder.key_extractor(extractor).finish() {
        Some(config) => Some(GovernorLayer::new(config)),
        None => {
            error!("invalid login rate limit configuration, limiter disabled");
            None
        }
    }
}
