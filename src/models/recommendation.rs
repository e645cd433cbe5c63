use serde::{Deserialize, Serialize};

/// A recommended movie returned to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedMovie {
    pub title: String,
    pub poster: String,
}

/// How a free-text query was resolved to a corpus movie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Exact,
    Substring,
}

/// Result of a recommendation query
///
/// `NotFound` is an ordinary value; callers branch on it instead of
/// handling an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecommendOutcome {
    Found {
        matched_title: String,
        match_kind: MatchKind,
        results: Vec<RecommendedMovie>,
    },
    NotFound {
        query: String,
    },
}

impl RecommendOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, RecommendOutcome::Found { .. })
    }

    /// Ranked results, empty for `NotFound`
    pub fn results(&self) -> &[RecommendedMovie] {
        match self {
            RecommendOutcome::Found { results, .. } => results,
            RecommendOutcome::NotFound { .. } => &[],
        }
    }
}
