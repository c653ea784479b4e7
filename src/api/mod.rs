/// HTTP API endpoints
pub mod cached;
pub mod hcard;
pub mod page;
pub mod photo;

use axum::{routing::get, Router};
use serde::Deserialize;

use crate::context::AppContext;
use crate::error::{GlueError, GlueResult};

/// Common query parameters: every endpoint takes the subject URL
#[derive(Debug, Deserialize)]
pub struct UrlParams {
    pub url: Option<String>,
}

impl UrlParams {
    /// The subject URL, or a validation error when missing
    pub fn require_url(&self) -> GlueResult<&str> {
        match self.url.as_deref() {
            Some(url) if !url.is_empty() => Ok(url),
            _ => Err(GlueError::Validation("no URL specified".to_string())),
        }
    }
}

/// Build the API route table
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/api/hcard", get(hcard::serve_hcard))
        .route("/api/photo", get(photo::serve_photo))
        .route("/api/og", get(page::serve_og))
        .route("/api/pageinfo", get(page::serve_pageinfo))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_url() {
        let params = UrlParams {
            url: Some("https://example.com/".to_string()),
        };
        assert_eq!(params.require_url().unwrap(), "https://example.com/");

        assert!(UrlParams { url: None }.require_url().is_err());
        assert!(UrlParams {
            url: Some(String::new())
        }
        .require_url()
        .is_err());
    }
}
