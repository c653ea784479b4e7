/// Fetch-and-cache orchestration
///
/// Wraps an extraction call with the cache store under a stable
/// `"<namespace>=<url>"` key and supplies the uniform response-header
/// surface: `Cache-Control: public` plus `Expires` on a cache hit or a
/// fresh cacheable fetch, nothing on a non-cacheable result.
use std::future::Future;

use axum::http::{header, HeaderMap, HeaderValue};
use tracing::{debug, info};

use crate::cache::{cache_key, decide, http_date, CacheDecision};
use crate::context::AppContext;

/// Serve a JSON payload through the cache.
///
/// On a miss, `produce` fetches and serializes the payload and returns it
/// together with the origin's response headers; those headers drive the
/// cacheability decision. Producers substitute an empty payload on failure,
/// so failures are cached under the same rules as successes.
pub async fn cached_json<F, Fut>(
    ctx: &AppContext,
    namespace: &str,
    url: &str,
    produce: F,
) -> (Vec<u8>, CacheDecision)
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = (Vec<u8>, HeaderMap)>,
{
    let key = cache_key(namespace, url);

    if let Some((content, expires_at)) = ctx.cache.get(&key).await {
        debug!("{} cache hit", key);
        return (content, CacheDecision::cacheable_until(expires_at));
    }

    let (content, origin_headers) = produce().await;

    let decision = decide(&origin_headers);
    if decision.cacheable {
        ctx.cache.set(&key, &content, decision.expires_at).await;
        info!("{} cached until {}", key, decision.expires_at);
    } else {
        info!("{} not cached", key);
    }

    (content, decision)
}

/// Response headers for a cacheability decision
pub fn caching_headers(decision: &CacheDecision) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if decision.cacheable {
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("public"));
        if let Ok(value) = HeaderValue::from_str(&http_date(decision.expires_at)) {
            headers.insert(header::EXPIRES, value);
        }
    }
    headers
}
