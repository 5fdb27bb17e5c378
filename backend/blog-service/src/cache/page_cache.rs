use redis::{aio::ConnectionManager, AsyncCommands};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{AppError, Result};
use crate::metrics::PAGE_CACHE_EVENTS;

/// Full-response page cache backed by Redis.
///
/// Keyed by request path+query; entries expire on a short TTL. Within the
/// TTL, readers get the stored bytes back unchanged even if posts were
/// written in the meantime (stale-while-valid).
#[derive(Clone)]
pub struct PageCache {
    redis: ConnectionManager,
    default_ttl: Duration,
}

/// A rendered response body with its content type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedPage {
    pub content_type: String,
    pub body: String,
}

impl PageCache {
    pub fn new(redis: ConnectionManager, default_ttl_secs: u64) -> Self {
        Self {
            redis,
            default_ttl: Duration::from_secs(default_ttl_secs),
        }
    }

    fn page_key(path_and_query: &str) -> String {
        format!("page:v1:{}", path_and_query)
    }

    /// Read a cached page. Redis trouble is reported as a miss so the
    /// caller falls back to rendering.
    pub async fn read(&self, path_and_query: &str) -> Option<CachedPage> {
        let key = Self::page_key(path_and_query);
        let mut conn = self.redis.clone();

        match conn.get::<_, Option<String>>(&key).await {
            Ok(Some(data)) => match serde_json::from_str::<CachedPage>(&data) {
                Ok(page) => {
                    debug!("Page cache HIT for {}", path_and_query);
                    PAGE_CACHE_EVENTS.with_label_values(&["hit"]).inc();
                    Some(page)
                }
                Err(e) => {
                    warn!("Failed to deserialize cached page: {}", e);
                    PAGE_CACHE_EVENTS.with_label_values(&["error"]).inc();
                    None
                }
            },
            Ok(None) => {
                debug!("Page cache MISS for {}", path_and_query);
                PAGE_CACHE_EVENTS.with_label_values(&["miss"]).inc();
                None
            }
            Err(e) => {
                warn!("Redis read error for page cache: {}", e);
                PAGE_CACHE_EVENTS.with_label_values(&["error"]).inc();
                None
            }
        }
    }

    /// Store a rendered page under the default TTL plus a little jitter.
    pub async fn write(&self, path_and_query: &str, page: &CachedPage) -> Result<()> {
        let key = Self::page_key(path_and_query);

        let data = serde_json::to_string(page)
            .map_err(|e| AppError::Internal(format!("Cache serialization error: {}", e)))?;

        let jitter = (rand::random::<u32>() % 10) as f64 / 100.0;
        let jitter_secs = (self.default_ttl.as_secs_f64() * jitter).round() as u64;
        let final_ttl = self.default_ttl + Duration::from_secs(jitter_secs);

        let mut conn = self.redis.clone();
        conn.set_ex::<_, _, ()>(&key, data, final_ttl.as_secs())
            .await
            .map_err(|e| {
                warn!("Failed to write page cache: {}", e);
                AppError::Cache(e.to_string())
            })?;

        debug!(
            "Page cache WRITE for {} with TTL {:?}",
            path_and_query, final_ttl
        );

        Ok(())
    }

    /// Drop every cached page (operator action).
    pub async fn clear_all(&self) -> Result<u64> {
        let mut conn = self.redis.clone();
        let mut keys: Vec<String> = Vec::new();
        {
            let mut iter: redis::AsyncIter<String> = conn
                .scan_match("page:v1:*")
                .await
                .map_err(|e| AppError::Cache(e.to_string()))?;
            while let Some(key) = iter.next_item().await {
                keys.push(key);
            }
        }

        if keys.is_empty() {
            return Ok(0);
        }

        let mut conn = self.redis.clone();
        conn.del::<_, ()>(keys.clone())
            .await
            .map_err(|e| AppError::Cache(e.to_string()))?;

        debug!("Page cache CLEAR removed {} entries", keys.len());

        Ok(keys.len() as u64)
    }

    /// Drop one cached page.
    pub async fn invalidate(&self, path_and_query: &str) -> Result<()> {
        let key = Self::page_key(path_and_query);
        let mut conn = self.redis.clone();
        conn.del::<_, ()>(&key)
            .await
            .map_err(|e| AppError::Cache(e.to_string()))?;

        debug!("Page cache INVALIDATE for {}", path_and_query);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_key_format() {
        let key = PageCache::page_key("/?page=2");
        assert_eq!(key, "page:v1:/?page=2");
    }

    #[test]
    fn test_page_keys_differ_by_query() {
        assert_ne!(PageCache::page_key("/"), PageCache::page_key("/?page=2"));
    }

    #[test]
    fn cached_page_round_trips_through_json() {
        let page = CachedPage {
            content_type: "application/json".into(),
            body: r#"{"page_obj":{}}"#.into(),
        };
        let data = serde_json::to_string(&page).unwrap();
        let back: CachedPage = serde_json::from_str(&data).unwrap();
        assert_eq!(back.body, page.body);
    }
}
