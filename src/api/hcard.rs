/// Identity-card endpoint
use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::context::AppContext;
use crate::error::{GlueError, GlueResult};
use crate::hcard;

use super::cached::caching_headers;
use super::UrlParams;

/// GET /api/hcard?url=…
///
/// The representative identity card of the page, as JSON. An empty card
/// (no representative h-card found, or the page was unfetchable) is a 404;
/// the emptiness is still cached upstream of this translation.
pub async fn serve_hcard(
    State(ctx): State<AppContext>,
    Query(params): Query<UrlParams>,
) -> GlueResult<Response> {
    let url = params.require_url()?;

    let (card, decision) = hcard::cached_card(&ctx, url).await;
    if card.is_empty() {
        return Err(GlueError::NotFound("no appropriate info at URL".to_string()));
    }

    let body = serde_json::to_vec(&card)
        .map_err(|e| GlueError::Internal(format!("can't serialize hcard: {}", e)))?;

    let mut headers = caching_headers(&decision);
    headers.insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/json"),
    );
    Ok((headers, body).into_response())
}
