use std::collections::HashMap;
use std::time::Instant;

use rayon::prelude::*;

use crate::{
    error::{AppError, AppResult},
    models::{CorpusEntry, MatchKind, MovieRecord, TagDocument},
    services::{
        composer::compose, normalizer::normalize, similarity::SimilarityMatrix,
        stemmer::PorterStemmer, vectorizer::Vocabulary,
    },
};

/// Outcome of resolving a free-text title query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleMatch {
    /// Lowercased title equals the query
    Exact(usize),
    /// First title, in corpus order, containing the query
    Substring(usize),
    NotFound,
}

impl TitleMatch {
    pub fn index(&self) -> Option<usize> {
        match self {
            TitleMatch::Exact(i) | TitleMatch::Substring(i) => Some(*i),
            TitleMatch::NotFound => None,
        }
    }

    pub fn kind(&self) -> Option<MatchKind> {
        match self {
            TitleMatch::Exact(_) => Some(MatchKind::Exact),
            TitleMatch::Substring(_) => Some(MatchKind::Substring),
            TitleMatch::NotFound => None,
        }
    }
}

/// Lowercase title lookup over the corpus, in corpus order
#[derive(Debug, Clone)]
pub struct TitleIndex {
    titles: Vec<String>,
    lowered: Vec<String>,
    /// Duplicate titles resolve to their first occurrence
    exact: HashMap<String, usize>,
}

impl TitleIndex {
    pub fn new(titles: Vec<String>) -> Self {
        let lowered: Vec<String> = titles.iter().map(|t| t.to_lowercase()).collect();
        let mut exact = HashMap::with_capacity(lowered.len());
        for (i, title) in lowered.iter().enumerate() {
            exact.entry(title.clone()).or_insert(i);
        }
        Self {
            titles,
            lowered,
            exact,
        }
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    pub fn title(&self, i: usize) -> &str {
        &self.titles[i]
    }

    /// (original title, lowercased title) pairs in corpus order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.titles
            .iter()
            .map(String::as_str)
            .zip(self.lowered.iter().map(String::as_str))
    }

    /// Trims and lowercases `query`, then tries exact, then substring match
    ///
    /// A blank query is `NotFound` rather than a substring hit on the first
    /// title.
    pub fn resolve(&self, query: &str) -> TitleMatch {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return TitleMatch::NotFound;
        }
        if let Some(&i) = self.exact.get(&query) {
            return TitleMatch::Exact(i);
        }
        self.lowered
            .iter()
            .position(|title| title.contains(&query))
            .map_or(TitleMatch::NotFound, TitleMatch::Substring)
    }
}

/// Immutable serving state: corpus rows, title lookup and similarity matrix
///
/// Row `i` of every component refers to the same movie.
#[derive(Debug, Clone)]
pub struct RecommendationIndex {
    entries: Vec<CorpusEntry>,
    titles: TitleIndex,
    similarity: SimilarityMatrix,
}

impl RecommendationIndex {
    /// Runs the full pipeline: normalize, compose, vectorize, compare
    pub fn build(records: &[MovieRecord], max_features: usize) -> AppResult<Self> {
        let start = Instant::now();
        let stemmer = PorterStemmer::new();

        let entries: Vec<CorpusEntry> = records
            .par_iter()
            .map(|record| CorpusEntry {
                id: record.id,
                title: record.title.clone(),
                tags: compose(&record.overview, &normalize(record), &stemmer),
            })
            .collect();

        tracing::info!(
            movies = entries.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Tag documents composed"
        );

        Self::from_entries(entries, max_features)
    }

    /// Vectorizes already-composed tag documents and builds the matrix
    pub fn from_entries(entries: Vec<CorpusEntry>, max_features: usize) -> AppResult<Self> {
        if entries.iter().all(|entry| entry.tags.is_empty()) {
            return Err(AppError::EmptyCorpus(format!(
                "none of {} movies produced a tag document",
                entries.len()
            )));
        }

        let start = Instant::now();
        let documents: Vec<TagDocument> = entries.iter().map(|e| e.tags.clone()).collect();
        let vocabulary = Vocabulary::fit(&documents, max_features)?;
        let vectors = vocabulary.vectorize_all(&documents);

        let zero_vectors = vectors.iter().filter(|v| v.is_zero()).count();
        if zero_vectors > 0 {
            tracing::warn!(
                count = zero_vectors,
                "Movies with no in-vocabulary tags will score 0 against everything"
            );
        }

        let similarity = SimilarityMatrix::build(&vectors);

        tracing::info!(
            movies = entries.len(),
            vocabulary = vocabulary.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Similarity matrix built"
        );

        Self::from_parts(entries, similarity)
    }

    /// Assembles an index from persisted parts, checking their alignment
    pub fn from_parts(entries: Vec<CorpusEntry>, similarity: SimilarityMatrix) -> AppResult<Self> {
        if entries.is_empty() {
            return Err(AppError::EmptyCorpus("corpus has no movies".to_string()));
        }
        if similarity.size() != entries.len() {
            return Err(AppError::Snapshot(format!(
                "similarity matrix is {0}x{0} but corpus has {1} movies",
                similarity.size(),
                entries.len()
            )));
        }

        let titles = TitleIndex::new(entries.iter().map(|e| e.title.clone()).collect());
        Ok(Self {
            entries,
            titles,
            similarity,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[CorpusEntry] {
        &self.entries
    }

    pub fn titles(&self) -> &TitleIndex {
        &self.titles
    }

    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    pub fn resolve(&self, query: &str) -> TitleMatch {
        self.titles.resolve(query)
    }

    /// The `top_n` movies most similar to movie `index`, best first
    ///
    /// Ties keep the lower corpus index first. The movie itself is never
    /// part of the result.
    pub fn most_similar(&self, index: usize, top_n: usize) -> Vec<(usize, f64)> {
        let mut scored: Vec<(usize, f64)> = self
            .similarity
            .row(index)
            .iter()
            .copied()
            .enumerate()
            .collect();
        // stable sort: equal scores stay in index order
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        scored
            .into_iter()
            .filter(|&(i, _)| i != index)
            .take(top_n)
            .collect()
    }
}
