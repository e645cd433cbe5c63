mod movie;
mod recommendation;

pub use movie::{CorpusEntry, MovieMetadata, MovieRecord, TagDocument, TokenSource, TOKEN_SOURCE_ORDER};
pub use recommendation::{MatchKind, RecommendOutcome, RecommendedMovie};
