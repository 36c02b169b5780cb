//! Per-client request limiting, keyed on the peer address.

use axum::body::Body;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::header::RETRY_AFTER;
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use governor::clock::{Clock, DefaultClock};
use governor::{DefaultKeyedRateLimiter, Quota};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use super::ApiError;
use crate::config::AppConfig;
use crate::TARGET_WEB_REQUEST;

pub const RATE_LIMIT_MESSAGE: &str = "Too many requests from this IP, please try again later.";

pub type ClientLimiter = DefaultKeyedRateLimiter<IpAddr>;

/// `max` requests per `window` for each client. `None` when either is zero.
///
/// The whole allowance is available as a burst and refills evenly over the window.
pub fn build_limiter(window: Duration, max: u32) -> Option<Arc<ClientLimiter>> {
    let burst = NonZeroU32::new(max)?;
    let quota = Quota::with_period(window / max)?.allow_burst(burst);
    Some(Arc::new(ClientLimiter::keyed(quota)))
}

pub fn limiter_from_config(config: &AppConfig) -> Option<Arc<ClientLimiter>> {
    let limiter = build_limiter(Duration::from_millis(config.rate_limit_window_ms), config.rate_limit_max);
    if limiter.is_none() {
        warn!(
            target: TARGET_WEB_REQUEST,
            "Rate limiting disabled (window {}ms, max {})",
            config.rate_limit_window_ms,
            config.rate_limit_max
        );
    }
    limiter
}

/// Requests without a known peer address share one bucket.
fn client_ip(req: &Request<Body>) -> IpAddr {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

pub async fn rate_limit(
    State(limiter): State<Arc<ClientLimiter>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let ip = client_ip(&req);
    match limiter.check_key(&ip) {
        Ok(()) => next.run(req).await,
        Err(not_until) => {
            let wait = not_until.wait_time_from(DefaultClock::default().now());
            warn!(target: TARGET_WEB_REQUEST, "Rate limit exceeded for {}", ip);
            let mut response =
                ApiError::new(StatusCode::TOO_MANY_REQUESTS, RATE_LIMIT_MESSAGE).into_response();
            let secs = wait.as_secs().max(1);
            if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert(RETRY_AFTER, value);
            }
            response
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_settings_disable_limiting() {
        assert!(build_limiter(Duration::from_secs(60), 0).is_none());
        assert!(build_limiter(Duration::ZERO, 10).is_none());
    }

    #[test]
    fn test_burst_is_the_window_allowance() {
        let limiter = build_limiter(Duration::from_secs(900), 3).unwrap();
        let ip = IpAddr::V4(Ipv4Addr::LOCALHOST);
        for _ in 0..3 {
            assert!(limiter.check_key(&ip).is_ok());
        }
        assert!(limiter.check_key(&ip).is_err());

        let other = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2));
        assert!(limiter.check_key(&other).is_ok());
    }
}
