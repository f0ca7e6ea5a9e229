// src/presentation/http/middleware/rate_limit.rs
use ::governor::middleware::NoOpMiddleware;
use axum::body::Body;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor,
};

/// Sustained requests per second allowed for one client address.
const REPLENISH_PER_SECOND: u64 = 2;
const BURST: u32 = 10;

pub type PublicWriteLimiter = GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware, Body>;

/// Per-IP limiter for unauthenticated endpoints that write rows. `None` when
/// the quota is rejected by the builder.
pub fn public_write_limiter() -> Option<PublicWriteLimiter> {
    let mut builder = GovernorConfigBuilder::default();
    builder.per_second(REPLENISH_PER_SECOND);
    builder.burst_size(BURST);
    let config = builder.key_extractor(SmartIpKeyExtractor).finish()?;
    Some(GovernorLayer::new(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_quota_is_accepted() {
        assert!(public_write_limiter().is_some());
    }
}
