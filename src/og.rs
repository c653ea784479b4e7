/// OpenGraph extraction
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

use crate::error::{GlueError, GlueResult};

/// OpenGraph information for a page. A page without an `og:title` has no
/// OpenGraph information at all; image and description are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenGraph {
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// Extract OpenGraph info from page bytes
pub fn extract(bytes: &[u8]) -> GlueResult<OpenGraph> {
    let html = String::from_utf8_lossy(bytes);
    from_html(&Html::parse_document(&html))
}

/// Extract OpenGraph info from a parsed document
pub fn from_html(doc: &Html) -> GlueResult<OpenGraph> {
    let title = meta_property(doc, "og:title").ok_or_else(|| {
        GlueError::NotFound("no opengraph title property found".to_string())
    })?;

    Ok(OpenGraph {
        title,
        image: meta_property(doc, "og:image").unwrap_or_default(),
        description: meta_property(doc, "og:description").unwrap_or_default(),
    })
}

fn meta_property(doc: &Html, property: &str) -> Option<String> {
    let selector = Selector::parse(&format!(r#"meta[property="{}"]"#, property)).ok()?;
    doc.select(&selector)
        .next()?
        .value()
        .attr("content")
        .map(str::to_string)
}
