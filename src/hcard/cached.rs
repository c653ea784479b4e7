/// Cached identity-card lookup
use axum::http::HeaderMap;
use tracing::{debug, info, warn};

use crate::cache::{cache_key, decide, namespaces, CacheDecision};
use crate::context::AppContext;
use crate::error::{GlueError, GlueResult};
use crate::mf;

use super::{representative, IdentityCard};

/// Resolve the identity card for a link, through the cache.
///
/// Any failure (transport, parse, no representative card) degrades to an
/// all-empty card rather than an error; the empty result is cached under
/// the same header-derived policy as a success, so repeated lookups of a
/// known-absent card are also rate-limited by the cache.
pub async fn cached_card(ctx: &AppContext, link: &str) -> (IdentityCard, CacheDecision) {
    let key = cache_key(namespaces::HCARD, link);

    if let Some((content, expires_at)) = ctx.cache.get(&key).await {
        match serde_json::from_slice::<IdentityCard>(&content) {
            Ok(card) => {
                debug!("hcard cache hit: {}", link);
                return (card, CacheDecision::cacheable_until(expires_at));
            }
            // Corrupt entry: fall through and resolve afresh
            Err(e) => warn!("can't parse cached hcard for {}: {}", link, e),
        }
    }

    let (card, origin_headers) = match fetch_card(ctx, link).await {
        Ok(found) => found,
        Err(e) => {
            debug!("hcard resolution for {} failed: {}", link, e);
            (IdentityCard::default(), HeaderMap::new())
        }
    };

    let decision = decide(&origin_headers);
    if decision.cacheable {
        match serde_json::to_vec(&card) {
            Ok(content) => {
                ctx.cache.set(&key, &content, decision.expires_at).await;
                info!("{} cached until {}", key, decision.expires_at);
            }
            Err(e) => warn!("can't serialize hcard for {}: {}", link, e),
        }
    } else {
        info!("{} not cached", key);
    }

    (card, decision)
}

/// Fetch a page and resolve its representative card
async fn fetch_card(ctx: &AppContext, link: &str) -> GlueResult<(IdentityCard, HeaderMap)> {
    let page = ctx.fetcher.get(link).await?;
    let doc = mf::parse(&page.body, &page.final_url);

    let item = representative(&doc, &page.final_url)
        .ok_or_else(|| GlueError::NotFound(format!("no representative h-card at {}", link)))?;

    Ok((IdentityCard::from_item(item, &page.final_url), page.headers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::config::GlueConfig;
    use chrono::{Duration, Utc};
    use std::sync::Arc;

    fn test_context() -> AppContext {
        let config = GlueConfig {
            service: crate::config::ServiceConfig {
                hostname: "127.0.0.1".to_string(),
                port: 0,
            },
            cache: crate::config::CacheConfig { redis_url: None },
            fetch: crate::config::FetchConfig::default(),
        };
        AppContext::with_store(config, Arc::new(MemoryCache::new())).unwrap()
    }

    #[tokio::test]
    async fn test_failed_resolution_yields_cached_empty_card() {
        let ctx = test_context();

        // An unfetchable link: resolution fails before any network access
        let (card, decision) = cached_card(&ctx, "").await;
        assert!(card.is_empty());
        // Empty origin headers take the 24h default-cache branch
        assert!(decision.cacheable);
        assert!(decision.expires_at > Utc::now() + Duration::hours(23));

        // The empty card is now served from the cache
        let (card, decision) = cached_card(&ctx, "").await;
        assert!(card.is_empty());
        assert!(decision.cacheable);
    }

    #[tokio::test]
    async fn test_cache_hit_returns_stored_card() {
        let ctx = test_context();
        let stored = IdentityCard {
            source: "https://example.com/".to_string(),
            pname: "Anna Author".to_string(),
            ..Default::default()
        };
        let exp = Utc::now() + Duration::hours(1);
        ctx.cache
            .set(
                "hcard=https://example.com/",
                &serde_json::to_vec(&stored).unwrap(),
                exp,
            )
            .await;

        let (card, decision) = cached_card(&ctx, "https://example.com/").await;
        assert_eq!(card, stored);
        assert!(decision.cacheable);
        assert_eq!(decision.expires_at, exp);
    }
}
