use std::collections::HashMap;

use rayon::prelude::*;

use crate::{
    error::{AppError, AppResult},
    models::TagDocument,
    services::stopwords::StopWords,
};

/// Default cap on vocabulary size
pub const MAX_FEATURES: usize = 5000;

/// Splits a tag document into terms
///
/// A term is a maximal run of word characters (alphanumeric or `_`) at
/// least two characters long.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|term| term.chars().nth(1).is_some())
}

/// Frozen term → column mapping shared by every tag vector
#[derive(Debug, Clone, PartialEq)]
pub struct Vocabulary {
    terms: Vec<String>,
    index: HashMap<String, usize>,
}

/// Term counts of one movie, indexed by [`Vocabulary`] column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagVector(Vec<u32>);

impl TagVector {
    pub fn counts(&self) -> &[u32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&count| count == 0)
    }
}

impl Vocabulary {
    /// Selects the `max_features` most frequent non-stop-word terms
    ///
    /// Frequency is the total number of occurrences across the corpus; ties
    /// go to the lexicographically smaller term. Selected terms are indexed
    /// in lexicographic order.
    pub fn fit(documents: &[TagDocument], max_features: usize) -> AppResult<Self> {
        let stop_words = StopWords::english();
        let mut frequencies: HashMap<&str, u64> = HashMap::new();

        for document in documents {
            for term in tokenize(document.as_str()) {
                if !stop_words.contains(term) {
                    *frequencies.entry(term).or_insert(0) += 1;
                }
            }
        }

        let mut ranked: Vec<(&str, u64)> = frequencies.into_iter().collect();
        ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(max_features);

        let mut terms: Vec<String> = ranked.into_iter().map(|(term, _)| term.to_string()).collect();
        terms.sort_unstable();

        if terms.is_empty() {
            return Err(AppError::EmptyCorpus(format!(
                "vocabulary is empty after stop word removal ({} documents)",
                documents.len()
            )));
        }

        Ok(Self::from_terms(terms))
    }

    fn from_terms(terms: Vec<String>) -> Self {
        let index = terms
            .iter()
            .enumerate()
            .map(|(i, term)| (term.clone(), i))
            .collect();
        Self { terms, index }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    /// Bag-of-words counts; out-of-vocabulary terms are dropped
    pub fn vectorize(&self, document: &TagDocument) -> TagVector {
        let mut counts = vec![0u32; self.terms.len()];
        for term in tokenize(document.as_str()) {
            if let Some(column) = self.index_of(term) {
                counts[column] += 1;
            }
        }
        TagVector(counts)
    }

    pub fn vectorize_all(&self, documents: &[TagDocument]) -> Vec<TagVector> {
        documents.par_iter().map(|document| self.vectorize(document)).collect()
    }
}
