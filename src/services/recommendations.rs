use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;

use crate::{
    models::{RecommendOutcome, RecommendedMovie},
    services::{
        index::{RecommendationIndex, TitleMatch},
        providers::{PosterProvider, PLACEHOLDER_POSTER},
    },
};

/// Resolves posters for `titles` concurrently, keeping input order
///
/// Every lookup is bounded by `timeout`; a timed-out or panicked lookup
/// yields the placeholder. Dropping the returned future aborts lookups
/// still in flight.
pub async fn resolve_posters(
    provider: Arc<dyn PosterProvider>,
    titles: &[String],
    timeout: Duration,
) -> Vec<String> {
    let mut tasks = JoinSet::new();

    for (slot, title) in titles.iter().enumerate() {
        let provider = provider.clone();
        let title = title.clone();
        tasks.spawn(async move {
            let poster = match tokio::time::timeout(timeout, provider.resolve(&title)).await {
                Ok(poster) => poster,
                Err(_) => {
                    tracing::warn!(
                        title = %title,
                        timeout_ms = timeout.as_millis() as u64,
                        provider = provider.name(),
                        "Poster lookup timed out"
                    );
                    PLACEHOLDER_POSTER.to_string()
                }
            };
            (slot, poster)
        });
    }

    let mut posters = vec![PLACEHOLDER_POSTER.to_string(); titles.len()];
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((slot, poster)) => posters[slot] = poster,
            Err(e) => tracing::error!(error = %e, "Poster task join error"),
        }
    }

    posters
}

/// Recommends up to `top_n` movies similar to the one `query` names
///
/// The query is resolved by exact title, then by first substring match in
/// corpus order. An unmatched query yields [`RecommendOutcome::NotFound`].
pub async fn recommend(
    index: &RecommendationIndex,
    provider: Arc<dyn PosterProvider>,
    query: &str,
    top_n: usize,
    poster_timeout: Duration,
) -> RecommendOutcome {
    let resolved = index.resolve(query);
    let (Some(matched), Some(match_kind)) = (resolved.index(), resolved.kind()) else {
        tracing::info!(query = %query, "No movie matches query");
        return RecommendOutcome::NotFound {
            query: query.to_string(),
        };
    };

    let ranked = index.most_similar(matched, top_n);
    let titles: Vec<String> = ranked
        .iter()
        .map(|&(i, _)| index.titles().title(i).to_string())
        .collect();

    tracing::info!(
        query = %query,
        matched_title = %index.titles().title(matched),
        exact = matches!(resolved, TitleMatch::Exact(_)),
        results = titles.len(),
        "Query resolved"
    );

    let posters = resolve_posters(provider, &titles, poster_timeout).await;
    let results = titles
        .into_iter()
        .zip(posters)
        .map(|(title, poster)| RecommendedMovie { title, poster })
        .collect();

    RecommendOutcome::Found {
        matched_title: index.titles().title(matched).to_string(),
        match_kind,
        results,
    }
}
