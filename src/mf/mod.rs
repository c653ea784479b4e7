/// Microformats2 extraction
///
/// The collaborator boundary for the resolver: raw page bytes plus a base
/// URL in, typed structured items plus page-level rel metadata out. Nothing
/// outside this module inspects HTML.
pub mod parser;

pub use parser::parse;

use std::collections::HashMap;

/// A single property value on a structured item.
///
/// Values are either plain strings or nested mappings carrying a `value`
/// field; anything else is treated as absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    Plain(String),
    Named { value: String },
    Other,
}

/// One typed structured-data item found on a page. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct StructuredItem {
    pub types: Vec<String>,
    /// `id` attribute of the root element, empty when absent
    pub id: String,
    pub properties: HashMap<String, Vec<PropertyValue>>,
}

impl StructuredItem {
    /// Collapse a property to a single string: the first value wins, a
    /// named value contributes its `value` field, anything else is empty.
    pub fn first_value(&self, property: &str) -> String {
        match self.properties.get(property).and_then(|vv| vv.first()) {
            Some(PropertyValue::Plain(s)) => s.clone(),
            Some(PropertyValue::Named { value }) => value.clone(),
            _ => String::new(),
        }
    }

    pub fn has_type(&self, t: &str) -> bool {
        self.types.iter().any(|v| v == t)
    }
}

/// A parsed page: its structured items in document order, and its rel
/// registry (rel token -> target URLs in document order).
#[derive(Debug, Clone, Default)]
pub struct ParsedDocument {
    pub items: Vec<StructuredItem>,
    pub rels: HashMap<String, Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_value_collapse() {
        let mut item = StructuredItem::default();
        item.properties.insert(
            "url".to_string(),
            vec![
                PropertyValue::Plain("https://a.example/".to_string()),
                PropertyValue::Plain("https://b.example/".to_string()),
            ],
        );
        item.properties.insert(
            "photo".to_string(),
            vec![PropertyValue::Named {
                value: "https://a.example/me.jpg".to_string(),
            }],
        );
        item.properties
            .insert("note".to_string(), vec![PropertyValue::Other]);

        assert_eq!(item.first_value("url"), "https://a.example/");
        assert_eq!(item.first_value("photo"), "https://a.example/me.jpg");
        assert_eq!(item.first_value("note"), "");
        assert_eq!(item.first_value("missing"), "");
    }
}
