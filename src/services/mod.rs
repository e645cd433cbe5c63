pub mod composer;
pub mod corpus;
pub mod index;
pub mod normalizer;
pub mod providers;
pub mod recommendations;
pub mod similarity;
pub mod stemmer;
pub mod stopwords;
pub mod suggestions;
pub mod vectorizer;

pub use index::{RecommendationIndex, TitleIndex, TitleMatch};
pub use providers::{PlaceholderProvider, PosterProvider, TmdbPosterProvider, PLACEHOLDER_POSTER};
