/// Generic page summary extraction
///
/// Best-effort title/description/image for arbitrary pages, preferring
/// author-supplied structured data and falling back through OpenGraph and
/// plain HTML heuristics. Purely extractive; consumes the same fetch and
/// cache layers as the identity card path.
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{mf, og};

/// Summary information about a page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl PageInfo {
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.image.is_empty() && self.description.is_empty()
    }
}

/// Extract page info from page bytes.
///
/// Title: mf content name, then OpenGraph, then `<title>`.
/// Description: mf content summary, then OpenGraph, then MediaWiki first
/// paragraph, then the description meta tag.
/// Image: OpenGraph, then a `u-featured` image.
pub fn extract(bytes: &[u8], base: &Url) -> PageInfo {
    let html = String::from_utf8_lossy(bytes);
    let doc = Html::parse_document(&html);
    let mf_doc = mf::parse(bytes, base);
    let og = og::from_html(&doc).unwrap_or_default();

    let title = [
        mf_content_property(&mf_doc, "name"),
        og.title.clone(),
        tag_text(&doc, "title"),
    ]
    .into_iter()
    .find(|s| !s.is_empty())
    .unwrap_or_default();

    let description = [
        mf_content_property(&mf_doc, "summary"),
        og.description.clone(),
        wiki_first_paragraph(&doc),
        meta_content(&doc, "description"),
    ]
    .into_iter()
    .find(|s| !s.is_empty())
    .unwrap_or_default();

    let image = if og.image.is_empty() {
        featured_image(&doc, base)
    } else {
        og.image
    };

    PageInfo {
        title,
        image,
        description,
    }
}

/// Property of the structured item marking the page's main content
/// (`id="content"`)
fn mf_content_property(doc: &mf::ParsedDocument, property: &str) -> String {
    doc.items
        .iter()
        .find(|item| item.id == "content")
        .map(|item| item.first_value(property))
        .unwrap_or_default()
}

/// First paragraph of body text if the page is a MediaWiki page
fn wiki_first_paragraph(doc: &Html) -> String {
    let generator = meta_content(doc, "generator");
    if !generator.starts_with("MediaWiki") {
        return String::new();
    }

    select_text(doc, ".mw-parser-output p")
}

/// Image representing a page that has microformats on it
fn featured_image(doc: &Html, base: &Url) -> String {
    let Ok(selector) = Selector::parse("img.u-featured") else {
        return String::new();
    };
    let Some(src) = doc
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("src"))
    else {
        return String::new();
    };
    base.join(src).map(|u| u.to_string()).unwrap_or_default()
}

fn meta_content(doc: &Html, name: &str) -> String {
    let Ok(selector) = Selector::parse(&format!(r#"meta[name="{}"]"#, name)) else {
        return String::new();
    };
    doc.select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .unwrap_or_default()
        .to_string()
}

fn tag_text(doc: &Html, selector: &str) -> String {
    select_text(doc, selector)
}

fn select_text(doc: &Html, selector: &str) -> String {
    let Ok(selector) = Selector::parse(selector) else {
        return String::new();
    };
    doc.select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}
