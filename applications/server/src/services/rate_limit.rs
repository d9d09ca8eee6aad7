//! Per-client-address rate limiting
//!
//! Each write endpoint owns a `governor` keyed limiter over the peer IP, so
//! submit and like quotas are counted independently. A quota of N per window
//! allows a burst of N and replenishes one request every `window / N`.

use governor::{
    clock::{Clock, DefaultClock},
    state::keyed::DefaultKeyedStateStore,
    Quota,
};
use std::net::IpAddr;
use std::num::NonZeroU32;
use std::time::Duration;

type KeyedLimiter = governor::RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, DefaultClock>;

/// Drop idle client state once this many addresses are tracked
const RETAIN_THRESHOLD: usize = 4096;

pub struct RateLimiter {
    name: &'static str,
    limit: u32,
    window: Duration,
    inner: Option<KeyedLimiter>,
}

impl RateLimiter {
    /// `limit` requests per `window` for each client address
    ///
    /// A zero limit is clamped to one request.
    pub fn new(name: &'static str, limit: u32, window: Duration) -> Self {
        let burst = NonZeroU32::new(limit).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::with_period(window / burst.get())
            .unwrap_or_else(|| Quota::per_second(burst))
            .allow_burst(burst);

        Self {
            name,
            limit: burst.get(),
            window,
            inner: Some(KeyedLimiter::keyed(quota)),
        }
    }

    /// `limit` requests per minute
    pub fn per_minute(name: &'static str, limit: u32) -> Self {
        Self::new(name, limit, Duration::from_secs(60))
    }

    /// A limiter that lets everything through
    pub fn disabled(name: &'static str) -> Self {
        Self {
            name,
            limit: u32::MAX,
            window: Duration::from_secs(60),
            inner: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Human-readable quota, e.g. "5 per 1 minute"
    pub fn describe(&self) -> String {
        let secs = self.window.as_secs();
        if secs % 60 == 0 && secs > 0 {
            format!("{} per {} minute", self.limit, secs / 60)
        } else {
            format!("{} per {} second", self.limit, secs)
        }
    }

    /// Count a request from `client`
    ///
    /// On refusal the error holds how long the client must wait before the
    /// next request would be let through.
    pub fn check(&self, client: IpAddr) -> Result<(), Duration> {
        let Some(limiter) = &self.inner else {
            return Ok(());
        };

        if limiter.len() >= RETAIN_THRESHOLD {
            limiter.retain_recent();
        }

        limiter
            .check_key(&client)
            .map_err(|not_until| not_until.wait_time_from(DefaultClock::default().now()))
    }
}
