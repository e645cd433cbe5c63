use crate::services::index::TitleIndex;

/// Maximum number of autocomplete suggestions
pub const MAX_SUGGESTIONS: usize = 7;

/// Autocomplete titles for `prefix`
///
/// Titles starting with the prefix come first, then titles that merely
/// contain it; corpus order is kept within each group. Matching is
/// case-insensitive on the trimmed prefix. A blank prefix suggests nothing.
pub fn suggest(titles: &TitleIndex, prefix: &str) -> Vec<String> {
    let prefix = prefix.trim().to_lowercase();
    if prefix.is_empty() {
        return Vec::new();
    }

    let (starts, contains): (Vec<_>, Vec<_>) = titles
        .iter()
        .filter(|(_, lowered)| lowered.contains(&prefix))
        .partition(|(_, lowered)| lowered.starts_with(&prefix));

    starts
        .into_iter()
        .chain(contains)
        .take(MAX_SUGGESTIONS)
        .map(|(title, _)| title.to_string())
        .collect()
}
