//! Wire model for review pages.
//!
//! Pages arrive as opaque bytes from a [`crate::source::FetchProvider`] and are decoded here
//! at the boundary. Decoding is all-or-nothing: one bad record fails the page.

use super::error::FetchError;
use serde::{Deserialize, Serialize};

/// A single review as delivered by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    /// Review body.
    pub text: String,
    /// Creation time, already formatted for display by the backend.
    pub created: String,
    /// Reviewer's first name.
    pub first_name: String,
    /// Reviewer's last name.
    pub last_name: String,
    /// Star rating as sent by the backend; not clamped here.
    pub rating: i32,
    /// Avatar image URL, if the reviewer has one.
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// One page of reviews plus the backend's total count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewsPage {
    /// Records of this page, in display order.
    pub items: Vec<ReviewRecord>,
    /// Total number of reviews available across all pages.
    pub count: usize,
}

impl ReviewsPage {
    /// Decode a page from raw provider bytes.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Decode`] if the payload is not valid JSON or any required field is
    /// missing or mistyped.
    pub fn decode(bytes: &[u8]) -> Result<Self, FetchError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Encode the page back to JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Decode`] if serialization fails.
    pub fn encode(&self) -> Result<Vec<u8>, FetchError> {
        Ok(serde_json::to_vec(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"{
        "items": [
            {
                "first_name": "Ada",
                "last_name": "Lovelace",
                "rating": 5,
                "text": "Great engine.",
                "created": "13 March",
                "avatar_url": "https://cdn.example/ada.png"
            },
            {
                "first_name": "Charles",
                "last_name": "Babbage",
                "rating": 3,
                "text": "",
                "created": "14 March"
            }
        ],
        "count": 57
    }"#;

    #[test]
    fn decode_valid_page() {
        let page = ReviewsPage::decode(PAGE.as_bytes()).unwrap();
        assert_eq!(page.count, 57);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].first_name, "Ada");
        assert_eq!(
            page.items[0].avatar_url.as_deref(),
            Some("https://cdn.example/ada.png")
        );
    }

    #[test]
    fn decode_missing_avatar_is_none() {
        let page = ReviewsPage::decode(PAGE.as_bytes()).unwrap();
        assert_eq!(page.items[1].avatar_url, None);
    }

    #[test]
    fn decode_null_avatar_is_none() {
        let json = r#"{"items":[{"first_name":"A","last_name":"B","rating":1,"text":"t","created":"c","avatar_url":null}],"count":1}"#;
        let page = ReviewsPage::decode(json.as_bytes()).unwrap();
        assert_eq!(page.items[0].avatar_url, None);
    }

    #[test]
    fn decode_missing_required_field_fails_whole_page() {
        // Second record lacks "rating"
        let json = r#"{"items":[
            {"first_name":"A","last_name":"B","rating":1,"text":"t","created":"c"},
            {"first_name":"C","last_name":"D","text":"t","created":"c"}
        ],"count":2}"#;
        let err = ReviewsPage::decode(json.as_bytes()).unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }), "got {:?}", err);
    }

    #[test]
    fn decode_missing_count_fails() {
        let err = ReviewsPage::decode(br#"{"items":[]}"#).unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }));
    }

    #[test]
    fn decode_garbage_fails() {
        let err = ReviewsPage::decode(b"\xff\xfe not json").unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }));
    }

    #[test]
    fn encode_then_decode_preserves_page() {
        let page = ReviewsPage::decode(PAGE.as_bytes()).unwrap();
        let bytes = page.encode().unwrap();
        assert_eq!(ReviewsPage::decode(&bytes).unwrap(), page);
    }
}
