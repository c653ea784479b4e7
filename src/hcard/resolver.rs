/// Representative h-card selection
///
/// Three checks run in order, encoding a trust hierarchy: self-asserted
/// identity (uid/url/page agreement), externally corroborated identity
/// (rel=me), then a best-effort singleton fallback. The ordering is
/// load-bearing and must not change.
use url::Url;

use crate::mf::{ParsedDocument, StructuredItem};

const CARD_TYPE: &str = "h-card";

/// Select the representative h-card of a page, if any.
///
/// Total and deterministic over its inputs: candidates are considered in
/// document order and URL comparisons never fail or match accidentally.
pub fn representative<'a>(doc: &'a ParsedDocument, page_url: &Url) -> Option<&'a StructuredItem> {
    let candidates: Vec<&StructuredItem> = doc
        .items
        .iter()
        .filter(|i| i.has_type(CARD_TYPE))
        .collect();

    // check 1: first card whose uid and url both equal the page URL
    for &card in &candidates {
        if match_url_uid(card, page_url) {
            return Some(card);
        }
    }

    // check 2: first card whose url is the target of a rel=me link
    if let Some(me_links) = doc.rels.get("me") {
        for &card in &candidates {
            for me in me_links {
                if match_urls(&card.first_value("url"), me) {
                    return Some(card);
                }
            }
        }
    }

    // check 3: single card on the page and its url equals the page URL
    if candidates.len() == 1 && match_urls(&candidates[0].first_value("url"), page_url.as_str()) {
        return Some(candidates[0]);
    }

    None
}

fn match_url_uid(card: &StructuredItem, page_url: &Url) -> bool {
    let uid = card.first_value("uid");
    if uid.is_empty() {
        return false;
    }

    let url = card.first_value("url");
    match_urls(&uid, &url) && match_urls(&url, page_url.as_str())
}

/// Compare two URL strings by their canonical parsed forms. A parse
/// failure on either side is a non-match, never an error.
fn match_urls(a: &str, b: &str) -> bool {
    match (Url::parse(a), Url::parse(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mf::parse;

    fn page_url() -> Url {
        Url::parse("https://example.com/").unwrap()
    }

    #[test]
    fn test_uid_self_match_wins_over_document_order() {
        // The unrelated card comes first; the self-matching one must win.
        let html = r#"
            <div class="h-card">
                <span class="p-name">Someone Else</span>
                <a class="u-url" href="https://other.example/">other</a>
            </div>
            <div class="h-card">
                <span class="p-name">Anna Author</span>
                <a class="u-url u-uid" href="https://example.com/">home</a>
            </div>"#;
        let doc = parse(html.as_bytes(), &page_url());

        let card = representative(&doc, &page_url()).unwrap();
        assert_eq!(card.first_value("name"), "Anna Author");
    }

    #[test]
    fn test_rel_me_corroboration() {
        // No uid anywhere; the card's url matches a rel=me target.
        let html = r#"
            <link rel="me" href="https://social.example/@anna">
            <div class="h-card">
                <span class="p-name">Anna Author</span>
                <a class="u-url" href="https://social.example/@anna">profile</a>
            </div>
            <div class="h-card">
                <span class="p-name">Someone Else</span>
                <a class="u-url" href="https://other.example/">other</a>
            </div>"#;
        let doc = parse(html.as_bytes(), &page_url());

        let card = representative(&doc, &page_url()).unwrap();
        assert_eq!(card.first_value("name"), "Anna Author");
    }

    #[test]
    fn test_singleton_fallback_requires_page_url_match() {
        let matching = r#"
            <div class="h-card">
                <span class="p-name">Anna Author</span>
                <a class="u-url" href="https://example.com/">home</a>
            </div>"#;
        let doc = parse(matching.as_bytes(), &page_url());
        assert!(representative(&doc, &page_url()).is_some());

        let mismatched = r#"
            <div class="h-card">
                <span class="p-name">Anna Author</span>
                <a class="u-url" href="https://elsewhere.example/">home</a>
            </div>"#;
        let doc = parse(mismatched.as_bytes(), &page_url());
        assert!(representative(&doc, &page_url()).is_none());
    }

    #[test]
    fn test_singleton_fallback_does_not_apply_to_multiple_cards() {
        // Two cards, neither self-asserted nor corroborated; even though one
        // matches the page URL, the singleton check requires exactly one.
        let html = r#"
            <div class="h-card">
                <a class="u-url" href="https://example.com/">home</a>
            </div>
            <div class="h-card">
                <a class="u-url" href="https://other.example/">other</a>
            </div>"#;
        let doc = parse(html.as_bytes(), &page_url());
        assert!(representative(&doc, &page_url()).is_none());
    }

    #[test]
    fn test_no_candidates_resolves_to_none() {
        let html = r#"<p>No structured data here.</p>"#;
        let doc = parse(html.as_bytes(), &page_url());
        assert!(representative(&doc, &page_url()).is_none());
    }

    #[test]
    fn test_unparsable_urls_never_match() {
        let html = r#"
            <div class="h-card">
                <span class="p-name">Anna</span>
                <span class="p-uid">not a url</span>
                <span class="p-url">not a url</span>
            </div>"#;
        let doc = parse(html.as_bytes(), &page_url());
        assert!(representative(&doc, &page_url()).is_none());
    }

    #[test]
    fn test_equivalent_url_spellings_match() {
        // Default port and absent trailing slash normalize to the same URL.
        let html = r#"
            <div class="h-card">
                <a class="u-url u-uid" href="https://example.com:443">home</a>
            </div>"#;
        let doc = parse(html.as_bytes(), &page_url());
        assert!(representative(&doc, &page_url()).is_some());
    }
}
