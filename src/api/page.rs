/// OpenGraph and page-info endpoints
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::cache::{namespaces, CacheDecision};
use crate::context::AppContext;
use crate::error::{GlueError, GlueResult};
use crate::{og, pageinfo};

use super::cached::{cached_json, caching_headers};
use super::UrlParams;

/// GET /api/og?url=…
pub async fn serve_og(
    State(ctx): State<AppContext>,
    Query(params): Query<UrlParams>,
) -> GlueResult<Response> {
    let url = params.require_url()?.to_string();

    let (body, decision) = cached_json(&ctx, namespaces::OG, &url, || async {
        match produce_og(&ctx, &url).await {
            Ok(payload) => payload,
            Err(e) => {
                debug!("og extraction for {} failed: {}", url, e);
                (b"{}".to_vec(), HeaderMap::new())
            }
        }
    })
    .await;

    json_response(body, decision)
}

/// GET /api/pageinfo?url=…
pub async fn serve_pageinfo(
    State(ctx): State<AppContext>,
    Query(params): Query<UrlParams>,
) -> GlueResult<Response> {
    let url = params.require_url()?.to_string();

    let (body, decision) = cached_json(&ctx, namespaces::PAGEINFO, &url, || async {
        match produce_pageinfo(&ctx, &url).await {
            Ok(payload) => payload,
            Err(e) => {
                debug!("pageinfo extraction for {} failed: {}", url, e);
                (b"{}".to_vec(), HeaderMap::new())
            }
        }
    })
    .await;

    json_response(body, decision)
}

async fn produce_og(ctx: &AppContext, url: &str) -> GlueResult<(Vec<u8>, HeaderMap)> {
    let page = ctx.fetcher.get(url).await?;
    let og = og::extract(&page.body)?;
    let body = serde_json::to_vec(&og)
        .map_err(|e| GlueError::Internal(format!("can't serialize og info: {}", e)))?;
    Ok((body, page.headers))
}

async fn produce_pageinfo(ctx: &AppContext, url: &str) -> GlueResult<(Vec<u8>, HeaderMap)> {
    let page = ctx.fetcher.get(url).await?;
    let info = pageinfo::extract(&page.body, &page.final_url);
    let body = serde_json::to_vec(&info)
        .map_err(|e| GlueError::Internal(format!("can't serialize page info: {}", e)))?;
    Ok((body, page.headers))
}

/// An empty JSON object means nothing was extractable: a 404, after the
/// emptiness has already been cached under the usual policy
fn json_response(body: Vec<u8>, decision: CacheDecision) -> GlueResult<Response> {
    if body.as_slice() == b"{}" {
        return Err(GlueError::NotFound("no appropriate info at URL".to_string()));
    }

    let mut headers = caching_headers(&decision);
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    Ok((headers, body).into_response())
}
