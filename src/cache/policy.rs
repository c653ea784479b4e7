/// Cacheable-duration policy
///
/// Pure functions over origin response headers: no I/O, no store access.
/// `decide` turns a header set into a cacheability decision; `combine`
/// merges two decisions conservatively.
use axum::http::{header, HeaderMap};
use chrono::{DateTime, Duration, Utc};

/// Window applied when the origin sends no `Cache-Control` at all
const DEFAULT_CACHE_WINDOW_HOURS: i64 = 24;

/// Cacheability of a fetched artifact
///
/// `expires_at` is meaningless when `cacheable` is false and must not be
/// persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheDecision {
    pub cacheable: bool,
    pub expires_at: DateTime<Utc>,
}

impl CacheDecision {
    pub fn cacheable_until(expires_at: DateTime<Utc>) -> Self {
        Self {
            cacheable: true,
            expires_at,
        }
    }

    pub fn not_cacheable() -> Self {
        Self {
            cacheable: false,
            expires_at: DateTime::UNIX_EPOCH,
        }
    }
}

/// Decide whether and until when a response may be cached.
///
/// Rules, in order:
/// - no `Cache-Control` header at all: cacheable for 24 hours
/// - `Cache-Control` without the `public` directive: not cacheable
///   (this includes a present-but-empty header value)
/// - `public` with `max-age=<seconds>`: cacheable until now + seconds;
///   the first `max-age` token wins; a malformed integer fails closed
/// - `public` without `max-age`: the `Expires` header (RFC 1123) supplies
///   the expiry; an unparsable `Expires` is cacheable with an epoch expiry
///   (preserved quirk; such an entry is stale on arrival and is evicted on
///   the next read, so nothing is cached indefinitely)
pub fn decide(headers: &HeaderMap) -> CacheDecision {
    // Only a genuinely absent header takes the default window; a present
    // header that yields no directives still fails the public gate below.
    if headers.get_all(header::CACHE_CONTROL).iter().next().is_none() {
        return CacheDecision::cacheable_until(
            Utc::now() + Duration::hours(DEFAULT_CACHE_WINDOW_HOURS),
        );
    }

    let directives: Vec<&str> = headers
        .get_all(header::CACHE_CONTROL)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .collect();

    if !directives.iter().any(|d| *d == "public") {
        return CacheDecision::not_cacheable();
    }

    for directive in &directives {
        if let Some(raw) = directive.strip_prefix("max-age=") {
            return match raw.trim().parse::<i64>() {
                Ok(seconds) => {
                    CacheDecision::cacheable_until(Utc::now() + Duration::seconds(seconds))
                }
                Err(_) => CacheDecision::not_cacheable(),
            };
        }
    }

    let expires = headers
        .get(header::EXPIRES)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    match DateTime::parse_from_rfc2822(expires) {
        Ok(t) => CacheDecision::cacheable_until(t.with_timezone(&Utc)),
        Err(_) => CacheDecision::cacheable_until(DateTime::UNIX_EPOCH),
    }
}

/// Merge two decisions for an artifact whose freshness depends on two
/// independently-fetched resources. Cacheable only when both inputs are;
/// the combined expiry is the earlier of the two.
pub fn combine(a: CacheDecision, b: CacheDecision) -> CacheDecision {
    if !a.cacheable || !b.cacheable {
        return CacheDecision::not_cacheable();
    }
    CacheDecision::cacheable_until(a.expires_at.min(b.expires_at))
}

/// Format an instant as an HTTP-date (RFC 1123) for the `Expires` header
pub fn http_date(t: DateTime<Utc>) -> String {
    t.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
