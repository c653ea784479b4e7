/// Representative h-card resolution
///
/// Picks the one h-card on a page that authoritatively describes the page's
/// owner, and maps it onto a serializable identity card.
pub mod cached;
pub mod resolver;

pub use cached::cached_card;
pub use resolver::representative;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::mf::StructuredItem;

/// The identity card served to clients. All fields are optional; a card
/// with every field empty serializes to `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityCard {
    /// The resolved page URL the card was found on
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pname: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub nickname: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub note: String,
    #[serde(rename = "uphoto", default, skip_serializing_if = "String::is_empty")]
    pub photo: String,
}

impl IdentityCard {
    /// Map a chosen representative item onto a card. Absent properties
    /// yield empty fields; `source` is the resolved page URL, not the raw
    /// input link.
    pub fn from_item(item: &StructuredItem, source: &Url) -> Self {
        Self {
            source: source.to_string(),
            pname: item.first_value("name"),
            nickname: item.first_value("nickname"),
            note: item.first_value("note"),
            photo: item.first_value("photo"),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
            && self.pname.is_empty()
            && self.nickname.is_empty()
            && self.note.is_empty()
            && self.photo.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mf::PropertyValue;

    #[test]
    fn test_empty_card_serializes_to_empty_object() {
        let card = IdentityCard::default();
        assert!(card.is_empty());
        assert_eq!(serde_json::to_string(&card).unwrap(), "{}");
    }

    #[test]
    fn test_card_field_names() {
        let card = IdentityCard {
            source: "https://example.com/".to_string(),
            pname: "Anna Author".to_string(),
            nickname: "anna".to_string(),
            note: String::new(),
            photo: "https://example.com/img/avatar.jpg".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&card).unwrap(),
            r#"{"source":"https://example.com/","pname":"Anna Author","nickname":"anna","uphoto":"https://example.com/img/avatar.jpg"}"#
        );
    }

    #[test]
    fn test_from_item_missing_properties_yield_empty_fields() {
        let mut item = StructuredItem::default();
        item.properties.insert(
            "name".to_string(),
            vec![PropertyValue::Plain("Anna".to_string())],
        );
        let source = Url::parse("https://example.com/").unwrap();

        let card = IdentityCard::from_item(&item, &source);
        assert_eq!(card.pname, "Anna");
        assert_eq!(card.source, "https://example.com/");
        assert_eq!(card.photo, "");
        assert_eq!(card.nickname, "");
        assert_eq!(card.note, "");
    }
}
