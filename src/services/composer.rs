use crate::{
    models::{MovieMetadata, TagDocument, TokenSource, TOKEN_SOURCE_ORDER},
    services::stemmer::PorterStemmer,
};

/// Raw tokens a single source contributes, case preserved
fn source_tokens<'a>(
    source: TokenSource,
    overview: &'a str,
    metadata: &'a MovieMetadata,
) -> Box<dyn Iterator<Item = &'a str> + 'a> {
    match source {
        TokenSource::Overview => Box::new(overview.split_whitespace()),
        TokenSource::Cast => Box::new(metadata.cast.iter().map(String::as_str)),
        TokenSource::Crew => Box::new(metadata.director.as_deref().into_iter()),
        TokenSource::Genres => Box::new(metadata.genres.iter().map(String::as_str)),
        TokenSource::Keywords => Box::new(metadata.keywords.iter().map(String::as_str)),
    }
}

/// Builds the tag document of one movie
///
/// Tokens are concatenated in [`TOKEN_SOURCE_ORDER`], lowercased, stemmed
/// one by one and joined with single spaces.
pub fn compose(overview: &str, metadata: &MovieMetadata, stemmer: &PorterStemmer) -> TagDocument {
    let joined = TOKEN_SOURCE_ORDER
        .iter()
        .flat_map(|source| source_tokens(*source, overview, metadata))
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let stemmed = joined
        .split_whitespace()
        .map(|word| stemmer.stem(word))
        .collect::<Vec<_>>()
        .join(" ");

    TagDocument::new(stemmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> MovieMetadata {
        MovieMetadata {
            cast: vec!["SamWorthington".to_string(), "ZoeSaldana".to_string()],
            director: Some("JamesCameron".to_string()),
            genres: vec!["Action".to_string()],
            keywords: vec!["spacecolony".to_string()],
        }
    }

    #[test]
    fn test_compose_follows_source_order() {
        let tags = compose("Marines  invade", &metadata(), &PorterStemmer::new());
        assert_eq!(
            tags.as_str(),
            "marin invad samworthington zoesaldana jamescameron action spacecoloni"
        );
    }

    #[test]
    fn test_compose_without_metadata() {
        let tags = compose("Running dogs", &MovieMetadata::default(), &PorterStemmer::new());
        assert_eq!(tags.as_str(), "run dog");
    }

    #[test]
    fn test_compose_empty_everything() {
        let tags = compose("   ", &MovieMetadata::default(), &PorterStemmer::new());
        assert!(tags.is_empty());
    }

    #[test]
    fn test_compose_is_deterministic() {
        let stemmer = PorterStemmer::new();
        let first = compose("A war in space", &metadata(), &stemmer);
        let second = compose("A war in space", &metadata(), &stemmer);
        assert_eq!(first, second);
    }
}
