use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A movie as read from the raw metadata tables
///
/// The cast/crew/genre/keyword fields hold the serialized blobs untouched;
/// they are only interpreted by the normalizer.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieRecord {
    pub id: u64,
    pub title: String,
    pub overview: String,
    pub genres: String,
    pub keywords: String,
    pub cast: String,
    pub crew: String,
}

/// Name tokens extracted from a record's blobs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieMetadata {
    /// At most the first three billed cast members
    pub cast: Vec<String>,
    pub director: Option<String>,
    pub genres: Vec<String>,
    pub keywords: Vec<String>,
}

/// Where a run of tokens in a tag document comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Overview,
    Cast,
    Crew,
    Genres,
    Keywords,
}

/// Concatenation order of token sources in every tag document.
///
/// Rebuilds must reproduce this order exactly.
pub const TOKEN_SOURCE_ORDER: [TokenSource; 5] = [
    TokenSource::Overview,
    TokenSource::Cast,
    TokenSource::Crew,
    TokenSource::Genres,
    TokenSource::Keywords,
];

/// Lowercased, stemmed, space-joined content tags of one movie
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagDocument(String);

impl TagDocument {
    pub fn new(tags: impl Into<String>) -> Self {
        Self(tags.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Display for TagDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row of the serving corpus: identity plus its tag document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusEntry {
    pub id: u64,
    pub title: String,
    pub tags: TagDocument,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_source_order_is_fixed() {
        assert_eq!(
            TOKEN_SOURCE_ORDER,
            [
                TokenSource::Overview,
                TokenSource::Cast,
                TokenSource::Crew,
                TokenSource::Genres,
                TokenSource::Keywords,
            ]
        );
    }

    #[test]
    fn test_tag_document_serializes_as_plain_string() {
        let entry = CorpusEntry {
            id: 19995,
            title: "Avatar".to_string(),
            tags: TagDocument::new("in the 22nd centuri"),
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(
            json,
            r#"{"id":19995,"title":"Avatar","tags":"in the 22nd centuri"}"#
        );
    }

    #[test]
    fn test_blank_tag_document_is_empty() {
        assert!(TagDocument::new("   ").is_empty());
        assert!(!TagDocument::new("war").is_empty());
    }
}
