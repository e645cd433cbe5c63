use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::{
    error::{AppError, AppResult},
    models::{CorpusEntry, MovieRecord},
    services::{index::RecommendationIndex, similarity::SimilarityMatrix},
};

/// Columns read from the movies table; the rest are ignored
#[derive(Debug, Deserialize)]
struct MovieRow {
    id: u64,
    title: String,
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    genres: String,
    #[serde(default)]
    keywords: String,
}

/// Columns read from the credits table
#[derive(Debug, Deserialize)]
struct CreditsRow {
    title: String,
    #[serde(default)]
    cast: String,
    #[serde(default)]
    crew: String,
}

fn read_rows<T, R>(reader: R) -> AppResult<Vec<T>>
where
    T: serde::de::DeserializeOwned,
    R: Read,
{
    let mut reader = csv::Reader::from_reader(reader);
    reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(AppError::from)
}

/// Joins movies and credits on title into corpus records
///
/// Movie order is preserved and a movie matching several credits rows
/// appears once per match. Movies without an overview are dropped, then only
/// the first `limit` records are kept.
pub fn load_records<M: Read, C: Read>(movies: M, credits: C, limit: usize) -> AppResult<Vec<MovieRecord>> {
    let movie_rows: Vec<MovieRow> = read_rows(movies)?;
    let credit_rows: Vec<CreditsRow> = read_rows(credits)?;

    let mut credits_by_title: HashMap<&str, Vec<&CreditsRow>> = HashMap::new();
    for row in &credit_rows {
        credits_by_title.entry(row.title.as_str()).or_default().push(row);
    }

    let mut unmatched = 0usize;
    let mut missing_overview = 0usize;
    let mut records = Vec::new();

    for movie in &movie_rows {
        let Some(matches) = credits_by_title.get(movie.title.as_str()) else {
            unmatched += 1;
            continue;
        };
        let overview = match movie.overview.as_deref().map(str::trim) {
            Some(overview) if !overview.is_empty() => overview,
            _ => {
                missing_overview += matches.len();
                continue;
            }
        };
        for credits in matches {
            records.push(MovieRecord {
                id: movie.id,
                title: movie.title.clone(),
                overview: overview.to_string(),
                genres: movie.genres.clone(),
                keywords: movie.keywords.clone(),
                cast: credits.cast.clone(),
                crew: credits.crew.clone(),
            });
        }
    }

    let merged = records.len();
    records.truncate(limit);

    tracing::info!(
        movies = movie_rows.len(),
        credits = credit_rows.len(),
        merged,
        unmatched,
        missing_overview,
        kept = records.len(),
        "Corpus tables joined"
    );

    Ok(records)
}

/// Reads and joins the two raw CSV tables from disk
pub fn load_records_from_paths(
    movies_path: impl AsRef<Path>,
    credits_path: impl AsRef<Path>,
    limit: usize,
) -> AppResult<Vec<MovieRecord>> {
    let movies = BufReader::new(File::open(movies_path)?);
    let credits = BufReader::new(File::open(credits_path)?);
    load_records(movies, credits, limit)
}

/// Persisted serving state: row-aligned corpus table plus its similarity matrix
#[derive(Debug, Serialize, Deserialize)]
pub struct Snapshot {
    pub built_at: DateTime<Utc>,
    pub movies: Vec<CorpusEntry>,
    pub similarity: Vec<Vec<f64>>,
}

impl Snapshot {
    pub fn from_index(index: &RecommendationIndex) -> Self {
        Self {
            built_at: Utc::now(),
            movies: index.entries().to_vec(),
            similarity: index.similarity().to_rows(),
        }
    }

    /// Validates shape and alignment, then assembles the index
    pub fn into_index(self) -> AppResult<RecommendationIndex> {
        let similarity = SimilarityMatrix::from_rows(self.similarity)?;
        RecommendationIndex::from_parts(self.movies, similarity)
    }

    pub fn write_to<W: Write>(&self, writer: W) -> AppResult<()> {
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    pub fn read_from<R: Read>(reader: R) -> AppResult<Self> {
        Ok(serde_json::from_reader(reader)?)
    }
}

pub fn save_snapshot(index: &RecommendationIndex, path: impl AsRef<Path>) -> AppResult<()> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    Snapshot::from_index(index).write_to(&mut writer)?;
    writer.flush()?;

    tracing::info!(
        path = %path.as_ref().display(),
        movies = index.len(),
        "Snapshot written"
    );
    Ok(())
}

pub fn load_snapshot(path: impl AsRef<Path>) -> AppResult<RecommendationIndex> {
    let snapshot = Snapshot::read_from(BufReader::new(File::open(path.as_ref())?))?;
    let built_at = snapshot.built_at;
    let index = snapshot.into_index()?;

    tracing::info!(
        path = %path.as_ref().display(),
        movies = index.len(),
        built_at = %built_at,
        "Snapshot loaded"
    );
    Ok(index)
}
