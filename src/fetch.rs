/// Outbound page fetching
///
/// Thin reqwest wrapper: bounded timeout, service User-Agent, and the
/// original's lenient link handling (a link with no scheme gets `http://`
/// prepended). Callers get the final URL after redirects, the body bytes,
/// and the origin's response headers for the cacheability policy.
use axum::http::HeaderMap;
use bytes::Bytes;
use std::time::Duration;
use url::Url;

use crate::config::FetchConfig;
use crate::error::{GlueError, GlueResult};

/// A fetched page
#[derive(Debug)]
pub struct FetchedPage {
    /// URL after redirects; used as the canonical page URL downstream
    pub final_url: Url,
    pub body: Bytes,
    pub headers: HeaderMap,
}

/// Shared HTTP client for origin fetches
#[derive(Clone)]
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    pub fn new(config: &FetchConfig) -> GlueResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GlueError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Fetch a page. Non-2xx responses are transport failures.
    pub async fn get(&self, link: &str) -> GlueResult<FetchedPage> {
        let url = normalize_link(link)?;

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(GlueError::Transport(format!(
                "origin returned {} for {}",
                response.status(),
                link
            )));
        }

        let final_url = response.url().clone();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(FetchedPage {
            final_url,
            body,
            headers,
        })
    }
}

/// Parse a user-supplied link, defaulting to `http://` when no scheme is
/// present
fn normalize_link(link: &str) -> GlueResult<Url> {
    match Url::parse(link) {
        Ok(url) => Ok(url),
        Err(_) => Url::parse(&format!("http://{}", link))
            .map_err(|e| GlueError::Validation(format!("invalid URL '{}': {}", link, e))),
    }
}
