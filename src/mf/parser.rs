/// HTML to structured items
///
/// A deliberately small microformats2 reader: h-* roots become items,
/// p-/u-/dt-/e- classes become properties, and the usual implied
/// name/photo/url conventions are honored for bare h-cards. Nested roots
/// contribute a named value to their parent and are also collected as
/// items in their own right.
use std::collections::HashMap;

use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::{ParsedDocument, PropertyValue, StructuredItem};

/// Parse page bytes into structured items and rel metadata.
///
/// Never fails: unparsable input yields an empty document.
pub fn parse(bytes: &[u8], base: &Url) -> ParsedDocument {
    let html = String::from_utf8_lossy(bytes);
    let doc = Html::parse_document(&html);

    let mut items = Vec::new();
    collect_items(doc.root_element(), base, &mut items);

    ParsedDocument {
        items,
        rels: collect_rels(&doc, base),
    }
}

fn classes(el: &ElementRef) -> Vec<String> {
    el.value()
        .attr("class")
        .map(|c| c.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

fn root_types(el: &ElementRef) -> Vec<String> {
    classes(el)
        .into_iter()
        .filter(|c| c.starts_with("h-"))
        .collect()
}

fn collect_items(el: ElementRef, base: &Url, out: &mut Vec<StructuredItem>) {
    if !root_types(&el).is_empty() {
        out.push(parse_item(el, base));
    }
    for child in el.children().filter_map(ElementRef::wrap) {
        collect_items(child, base, out);
    }
}

fn parse_item(root: ElementRef, base: &Url) -> StructuredItem {
    let mut item = StructuredItem {
        types: root_types(&root),
        id: root.value().attr("id").unwrap_or_default().to_string(),
        properties: HashMap::new(),
    };

    for child in root.children().filter_map(ElementRef::wrap) {
        collect_properties(child, base, &mut item);
    }
    imply_properties(root, base, &mut item);

    item
}

fn collect_properties(el: ElementRef, base: &Url, item: &mut StructuredItem) {
    let cls = classes(&el);
    let is_nested_root = cls.iter().any(|c| c.starts_with("h-"));

    for class in &cls {
        if let Some(name) = class.strip_prefix("p-") {
            let text = text_of(&el);
            push(item, name, named_or_plain(is_nested_root, text));
        } else if let Some(name) = class.strip_prefix("u-") {
            let target = url_of(&el, base);
            push(item, name, named_or_plain(is_nested_root, target));
        } else if let Some(name) = class.strip_prefix("dt-") {
            let value = el
                .value()
                .attr("datetime")
                .map(str::to_string)
                .unwrap_or_else(|| text_of(&el));
            push(item, name, PropertyValue::Plain(value));
        } else if let Some(name) = class.strip_prefix("e-") {
            push(item, name, PropertyValue::Plain(text_of(&el)));
        }
    }

    // Contents of a nested root belong to the nested item
    if is_nested_root {
        return;
    }
    for child in el.children().filter_map(ElementRef::wrap) {
        collect_properties(child, base, item);
    }
}

fn named_or_plain(nested: bool, value: String) -> PropertyValue {
    if nested {
        PropertyValue::Named { value }
    } else {
        PropertyValue::Plain(value)
    }
}

fn push(item: &mut StructuredItem, name: &str, value: PropertyValue) {
    item.properties
        .entry(name.to_string())
        .or_default()
        .push(value);
}

/// Implied name/photo/url for roots that carry no explicit property
fn imply_properties(root: ElementRef, base: &Url, item: &mut StructuredItem) {
    let tag = root.value().name();

    if !item.properties.contains_key("name") {
        let name = if tag == "img" {
            root.value().attr("alt").unwrap_or_default().to_string()
        } else {
            text_of(&root)
        };
        if !name.is_empty() {
            push(item, "name", PropertyValue::Plain(name));
        }
    }

    if !item.properties.contains_key("photo") {
        let photo = if tag == "img" {
            root.value().attr("src").map(str::to_string)
        } else {
            sole_descendant(root, "img", "src")
        };
        if let Some(src) = photo {
            push(item, "photo", PropertyValue::Plain(resolve(&src, base)));
        }
    }

    if !item.properties.contains_key("url") {
        let url = if tag == "a" {
            root.value().attr("href").map(str::to_string)
        } else {
            sole_descendant(root, "a", "href")
        };
        if let Some(href) = url {
            push(item, "url", PropertyValue::Plain(resolve(&href, base)));
        }
    }
}

/// Attribute of the only `tag` element under `root`, skipping nested roots;
/// ambiguity (zero or several) yields nothing
fn sole_descendant(root: ElementRef, tag: &str, attr: &str) -> Option<String> {
    let mut found: Option<String> = None;
    let mut stack: Vec<ElementRef> = root.children().filter_map(ElementRef::wrap).collect();
    while let Some(el) = stack.pop() {
        if classes(&el).iter().any(|c| c.starts_with("h-")) {
            continue;
        }
        if el.value().name() == tag {
            if let Some(v) = el.value().attr(attr) {
                if found.is_some() {
                    return None;
                }
                found = Some(v.to_string());
            }
        }
        stack.extend(el.children().filter_map(ElementRef::wrap));
    }
    found
}

fn text_of(el: &ElementRef) -> String {
    el.text().collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// URL-bearing attribute for the element kind, resolved against the base
fn url_of(el: &ElementRef, base: &Url) -> String {
    let raw = match el.value().name() {
        "a" | "area" | "link" => el.value().attr("href"),
        "img" | "audio" | "video" | "source" | "iframe" => el.value().attr("src"),
        "object" => el.value().attr("data"),
        _ => el.value().attr("href").or_else(|| el.value().attr("src")),
    };
    match raw {
        Some(v) => resolve(v, base),
        None => text_of(el),
    }
}

fn resolve(raw: &str, base: &Url) -> String {
    match base.join(raw) {
        Ok(u) => u.to_string(),
        Err(_) => raw.to_string(),
    }
}

fn collect_rels(doc: &Html, base: &Url) -> HashMap<String, Vec<String>> {
    let selector = Selector::parse("a[rel], link[rel]").unwrap();

    let mut rels: HashMap<String, Vec<String>> = HashMap::new();
    for el in doc.select(&selector) {
        let Some(rel) = el.value().attr("rel") else {
            continue;
        };
        let Some(href) = el.value().attr("href") else {
            continue;
        };
        let target = resolve(href, base);
        for token in rel.split_whitespace() {
            rels.entry(token.to_ascii_lowercase())
                .or_default()
                .push(target.clone());
        }
    }
    rels
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/").unwrap()
    }

    #[test]
    fn test_explicit_hcard_properties() {
        let html = r#"
            <div class="h-card">
                <span class="p-name">Anna Author</span>
                <a class="u-url u-uid" href="https://example.com/">home</a>
                <img class="u-photo" src="/img/avatar.jpg">
                <span class="p-nickname">anna</span>
                <p class="p-note">Writes things.</p>
            </div>"#;
        let doc = parse(html.as_bytes(), &base());

        assert_eq!(doc.items.len(), 1);
        let card = &doc.items[0];
        assert!(card.has_type("h-card"));
        assert_eq!(card.first_value("name"), "Anna Author");
        assert_eq!(card.first_value("url"), "https://example.com/");
        assert_eq!(card.first_value("uid"), "https://example.com/");
        assert_eq!(card.first_value("photo"), "https://example.com/img/avatar.jpg");
        assert_eq!(card.first_value("nickname"), "anna");
        assert_eq!(card.first_value("note"), "Writes things.");
    }

    #[test]
    fn test_implied_properties() {
        let html = r#"<a class="h-card" href="/anna">Anna Author</a>"#;
        let doc = parse(html.as_bytes(), &base());

        let card = &doc.items[0];
        assert_eq!(card.first_value("name"), "Anna Author");
        assert_eq!(card.first_value("url"), "https://example.com/anna");
    }

    #[test]
    fn test_nested_root_yields_named_value_and_own_item() {
        let html = r#"
            <div class="h-card">
                <span class="p-name">Anna</span>
                <a class="p-org h-card" href="https://org.example/">Example Org</a>
            </div>"#;
        let doc = parse(html.as_bytes(), &base());

        assert_eq!(doc.items.len(), 2);
        assert_eq!(
            doc.items[0].properties.get("org").unwrap()[0],
            PropertyValue::Named {
                value: "Example Org".to_string()
            }
        );
        assert_eq!(doc.items[1].first_value("name"), "Example Org");
    }

    #[test]
    fn test_rel_me_collection_in_document_order() {
        let html = r#"
            <link rel="me" href="https://social.example/@anna">
            <p><a rel="me nofollow" href="/elsewhere">me too</a></p>"#;
        let doc = parse(html.as_bytes(), &base());

        assert_eq!(
            doc.rels.get("me").unwrap(),
            &vec![
                "https://social.example/@anna".to_string(),
                "https://example.com/elsewhere".to_string(),
            ]
        );
        assert_eq!(
            doc.rels.get("nofollow").unwrap(),
            &vec!["https://example.com/elsewhere".to_string()]
        );
    }

    #[test]
    fn test_garbage_input_yields_empty_document() {
        let doc = parse(&[0xff, 0xfe, 0x00, 0x01], &base());
        assert!(doc.items.is_empty());
        assert!(doc.rels.is_empty());
    }
}
