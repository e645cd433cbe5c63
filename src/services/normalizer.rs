use serde::Deserialize;

use crate::{
    error::MalformedField,
    models::{MovieMetadata, MovieRecord},
};

/// Number of billed cast members kept per movie
pub const TOP_CAST: usize = 3;

/// One record of a serialized metadata list
///
/// Blobs are JSON arrays of objects. Only `name` and `job` are read;
/// every other key (ids, credit ids, characters, ...) is ignored.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CreditEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub job: Option<String>,
}

/// Parses a blob into its records
pub fn parse_entries(field: &'static str, blob: &str) -> Result<Vec<CreditEntry>, MalformedField> {
    serde_json::from_str(blob).map_err(|e| MalformedField {
        field,
        reason: e.to_string(),
    })
}

/// Collapses a multi-word name into a single vocabulary token
pub fn name_token(name: &str) -> String {
    name.chars().filter(|c| !c.is_whitespace()).collect()
}

fn tokens_of(entries: impl IntoIterator<Item = CreditEntry>) -> Vec<String> {
    entries
        .into_iter()
        .filter_map(|entry| entry.name)
        .map(|name| name_token(&name))
        .filter(|token| !token.is_empty())
        .collect()
}

/// All names in a genre or keyword blob
pub fn names(field: &'static str, blob: &str) -> Result<Vec<String>, MalformedField> {
    Ok(tokens_of(parse_entries(field, blob)?))
}

/// Up to the first [`TOP_CAST`] listed cast members, in billing order
pub fn top_cast(blob: &str) -> Result<Vec<String>, MalformedField> {
    let entries = parse_entries("cast", blob)?;
    Ok(tokens_of(entries.into_iter().take(TOP_CAST)))
}

/// The first crew member whose job is "Director"
pub fn director(blob: &str) -> Result<Option<String>, MalformedField> {
    let entries = parse_entries("crew", blob)?;
    Ok(entries
        .into_iter()
        .filter(|entry| {
            entry
                .job
                .as_deref()
                .is_some_and(|job| job.eq_ignore_ascii_case("director"))
        })
        .find_map(|entry| entry.name)
        .map(|name| name_token(&name))
        .filter(|token| !token.is_empty()))
}

/// Falls back to an empty value for a field that failed to parse
fn contained<T: Default>(movie: &MovieRecord, result: Result<T, MalformedField>) -> T {
    result.unwrap_or_else(|e| {
        tracing::warn!(
            movie_id = movie.id,
            title = %movie.title,
            error = %e,
            "Dropping malformed metadata field"
        );
        T::default()
    })
}

/// Extracts name tokens from every blob of a record
///
/// A malformed field contributes nothing; the other fields are unaffected.
pub fn normalize(movie: &MovieRecord) -> MovieMetadata {
    MovieMetadata {
        cast: contained(movie, top_cast(&movie.cast)),
        director: contained(movie, director(&movie.crew)),
        genres: contained(movie, names("genres", &movie.genres)),
        keywords: contained(movie, names("keywords", &movie.keywords)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(cast: &str, crew: &str) -> MovieRecord {
        MovieRecord {
            id: 1,
            title: "Test".to_string(),
            overview: "overview".to_string(),
            genres: r#"[{"id": 28, "name": "Action"}, {"id": 878, "name": "Science Fiction"}]"#
                .to_string(),
            keywords: r#"[{"id": 1463, "name": "culture clash"}]"#.to_string(),
            cast: cast.to_string(),
            crew: crew.to_string(),
        }
    }

    #[test]
    fn test_name_token_strips_whitespace() {
        assert_eq!(name_token("Sam Worthington"), "SamWorthington");
        assert_eq!(name_token("Science  Fiction\t"), "ScienceFiction");
        assert_eq!(name_token("Drama"), "Drama");
    }

    #[test]
    fn test_names_keeps_order_and_skips_nameless_entries() {
        let blob = r#"[{"id": 1, "name": "Action"}, {"id": 2}, {"id": 3, "name": "Science Fiction"}]"#;
        assert_eq!(
            names("genres", blob).unwrap(),
            vec!["Action".to_string(), "ScienceFiction".to_string()]
        );
    }

    #[test]
    fn test_top_cast_takes_first_three() {
        let blob = r#"[
            {"cast_id": 242, "character": "Jake Sully", "name": "Sam Worthington", "order": 0},
            {"cast_id": 3, "character": "Neytiri", "name": "Zoe Saldana", "order": 1},
            {"cast_id": 25, "character": "Dr. Grace Augustine", "name": "Sigourney Weaver", "order": 2},
            {"cast_id": 4, "character": "Col. Quaritch", "name": "Stephen Lang", "order": 3}
        ]"#;
        assert_eq!(
            top_cast(blob).unwrap(),
            vec!["SamWorthington", "ZoeSaldana", "SigourneyWeaver"]
        );
    }

    #[test]
    fn test_top_cast_short_list() {
        let blob = r#"[{"name": "Solo Actor"}]"#;
        assert_eq!(top_cast(blob).unwrap(), vec!["SoloActor"]);
        assert!(top_cast("[]").unwrap().is_empty());
    }

    #[test]
    fn test_director_is_case_insensitive() {
        let blob = r#"[
            {"department": "Writing", "job": "Screenplay", "name": "Someone Else"},
            {"department": "Directing", "job": "director", "name": "James Cameron"}
        ]"#;
        assert_eq!(director(blob).unwrap(), Some("JamesCameron".to_string()));
    }

    #[test]
    fn test_director_missing() {
        let blob = r#"[{"job": "Producer", "name": "Jon Landau"}]"#;
        assert_eq!(director(blob).unwrap(), None);
    }

    #[test]
    fn test_parse_entries_rejects_garbage() {
        let err = parse_entries("cast", "[{'name': broken").unwrap_err();
        assert_eq!(err.field, "cast");
        assert!(parse_entries("cast", "").is_err());
        assert!(parse_entries("cast", r#"{"name": "not a list"}"#).is_err());
    }

    #[test]
    fn test_normalize_contains_malformed_cast() {
        let movie = record("not json at all", r#"[{"job": "Director", "name": "Ridley Scott"}]"#);
        let metadata = normalize(&movie);

        assert!(metadata.cast.is_empty());
        assert_eq!(metadata.director, Some("RidleyScott".to_string()));
        assert_eq!(metadata.genres, vec!["Action", "ScienceFiction"]);
        assert_eq!(metadata.keywords, vec!["cultureclash"]);
    }
}
