/// Author-photo endpoint
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
};
use tracing::{debug, info};

use crate::cache::{cache_key, combine, decide, namespaces, CacheDecision};
use crate::context::AppContext;
use crate::error::{GlueError, GlueResult};
use crate::hcard;

use super::cached::caching_headers;
use super::UrlParams;

/// GET /api/photo?url=…
///
/// Resolves the page's identity card, then serves its photo bytes. The
/// response's freshness depends on two origin fetches (the page and the
/// photo), so the caching headers carry the combined, more conservative
/// decision; a non-cacheable combination is served with
/// `Cache-Control: no-cache`.
pub async fn serve_photo(
    State(ctx): State<AppContext>,
    Query(params): Query<UrlParams>,
) -> GlueResult<Response> {
    let url = params.require_url()?;

    let (card, card_decision) = hcard::cached_card(&ctx, url).await;
    if card.photo.is_empty() {
        return Err(GlueError::NotFound("no photo".to_string()));
    }

    let (content, photo_decision, content_type) = cached_photo(&ctx, &card.photo).await?;

    let combined = combine(card_decision, photo_decision);
    let mut headers = if combined.cacheable {
        caching_headers(&combined)
    } else {
        let mut h = HeaderMap::new();
        h.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        h
    };
    headers.insert(header::CONTENT_TYPE, content_type);

    Ok((headers, content).into_response())
}

/// Fetch photo bytes through the cache. Unlike the card path, a failed
/// photo fetch is an error (there is nothing sensible to substitute).
async fn cached_photo(
    ctx: &AppContext,
    link: &str,
) -> GlueResult<(Vec<u8>, CacheDecision, HeaderValue)> {
    let key = cache_key(namespaces::PHOTO, link);

    if let Some((content, expires_at)) = ctx.cache.get(&key).await {
        debug!("photo {} cache hit", link);
        let content_type = sniff_content_type(&content);
        return Ok((
            content,
            CacheDecision::cacheable_until(expires_at),
            content_type,
        ));
    }

    let page = ctx
        .fetcher
        .get(link)
        .await
        .map_err(|e| GlueError::NotFound(format!("can't fetch photo: {}", e)))?;

    let decision = decide(&page.headers);
    if decision.cacheable {
        ctx.cache.set(&key, &page.body, decision.expires_at).await;
        info!("{} cached until {}", key, decision.expires_at);
    } else {
        info!("{} not cached", key);
    }

    let content_type = page
        .headers
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| sniff_content_type(&page.body));
    Ok((page.body.to_vec(), decision, content_type))
}

/// Content type from the leading magic bytes. Only the bytes are stored,
/// so cache hits must recover the type the same way a file server would.
fn sniff_content_type(content: &[u8]) -> HeaderValue {
    let mime = if content.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if content.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        "image/png"
    } else if content.starts_with(b"GIF87a") || content.starts_with(b"GIF89a") {
        "image/gif"
    } else if content.len() >= 12 && &content[0..4] == b"RIFF" && &content[8..12] == b"WEBP" {
        "image/webp"
    } else {
        "application/octet-stream"
    };
    HeaderValue::from_static(mime)
}
