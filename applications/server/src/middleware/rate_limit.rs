/// Rate limiting middleware
use crate::{error::ServerError, services::RateLimiter};
use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use std::{net::SocketAddr, sync::Arc};

/// Reject requests from clients that have used up their quota
///
/// Runs before any body parsing or CSRF check, so a limited request never
/// reaches the store.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiter>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    match limiter.check(addr.ip()) {
        Ok(()) => Ok(next.run(request).await),
        Err(retry_after) => {
            tracing::warn!(
                client = %addr.ip(),
                limiter = limiter.name(),
                path = %request.uri().path(),
                "Rate limit exceeded"
            );
            // Round up so a retry is never refused again
            let retry_after_secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            Err(ServerError::RateLimited {
                limit: limiter.describe(),
                retry_after_secs: retry_after_secs.max(1),
            })
        }
    }
}
