//! Redis-backed fixed-window request counter.

use redis::{aio::ConnectionManager, Client, Pipeline, RedisError};

use crate::config::CACHE_PREFIX_RATE_LIMIT;
use crate::errors::{AppError, AppResult};

/// Shared Redis connection used by the rate limiting middleware.
#[derive(Clone)]
pub struct RateLimiter {
    connection: ConnectionManager,
}

impl RateLimiter {
    /// Connect to Redis at `redis_url`.
    pub async fn connect(redis_url: &str) -> Result<Self, RedisError> {
        let client = Client::open(redis_url)?;
        let connection = ConnectionManager::new(client).await?;
        tracing::info!("Redis connected for rate limiting");
        Ok(Self { connection })
    }

    /// Count one hit for `identifier` in the current window.
    /// Returns (current_count, is_allowed).
    pub async fn check(
        &self,
        identifier: &str,
        max_requests: u64,
        window_seconds: u64,
    ) -> AppResult<(u64, bool)> {
        let key = rate_limit_key(identifier);
        let mut conn = self.connection.clone();

        let (count,): (i64,) = window_hit(&key, window_seconds)
            .query_async(&mut conn)
            .await
            .map_err(redis_error)?;

        let count = count.max(0) as u64;
        Ok((count, count <= max_requests))
    }

    /// Round-trip a PING for health checks.
    pub async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(redis_error)?;
        Ok(())
    }
}

/// MULTI { SET key 0 NX EX window; INCR key }. The counter never exists
/// without a TTL, and INCR keeps the TTL set when the window opened.
fn window_hit(key: &str, window_seconds: u64) -> Pipeline {
    let mut pipe = redis::pipe();
    pipe.atomic()
        .cmd("SET")
        .arg(key)
        .arg(0)
        .arg("NX")
        .arg("EX")
        .arg(window_seconds)
        .ignore()
        .incr(key, 1);
    pipe
}

fn rate_limit_key(identifier: &str) -> String {
    format!("{}{}", CACHE_PREFIX_RATE_LIMIT, identifier)
}

fn redis_error(e: RedisError) -> AppError {
    tracing::error!("Redis error: {}", e);
    AppError::internal(format!("Rate limiter error: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_key_prefix() {
        assert_eq!(rate_limit_key("auth:10.0.0.1"), "rate_limit:auth:10.0.0.1");
    }

    #[test]
    fn test_window_hit_sets_ttl_in_same_transaction() {
        let packed = window_hit("rate_limit:general:10.0.0.1", 60).get_packed_pipeline();
        let text = String::from_utf8(packed).unwrap();

        let multi = text.find("MULTI").unwrap();
        let set = text.find("SET").unwrap();
        let incr = text.find("INCR").unwrap();
        let exec = text.find("EXEC").unwrap();
        assert!(multi < set && set < incr && incr < exec);
        assert!(text.contains("NX"));
        assert!(text.contains("EX\r\n$2\r\n60"));
    }
}
