//! Edit-distance matching shared by column resolution and subject search.

/// Similarity a fuzzy column match must reach.
pub const DEFAULT_CUTOFF: f64 = 0.8;

/// Number of edits a keyword may differ by, given its length.
///
/// Up to 2 characters: exact only. 3 to 5: one edit. Longer: two edits.
#[must_use]
pub fn adaptive_distance(keyword: &str) -> usize {
    match keyword.chars().count() {
        0..=2 => 0,
        3..=5 => 1,
        _ => 2,
    }
}

/// Lowercased tokens of `text`, split on whitespace, `-` and `_`.
pub fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

/// Returns true if some token of `target` is within `max_distance` edits of `keyword`.
///
/// Comparison is case-insensitive.
#[must_use]
pub fn strict_token_match(keyword: &str, target: &str, max_distance: usize) -> bool {
    let keyword = keyword.to_lowercase();
    if keyword.is_empty() {
        return false;
    }
    tokens(target).any(|token| strsim::levenshtein(&token, &keyword) <= max_distance)
}

/// Normalized Levenshtein similarity in `[0, 1]`.
#[must_use]
pub fn similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b)
}

/// Index and score of the candidate most similar to `query`.
///
/// Only scores at or above `cutoff` qualify; ties keep the earlier candidate.
pub fn closest_match<'a, I>(query: &str, candidates: I, cutoff: f64) -> Option<(usize, f64)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(usize, f64)> = None;
    for (i, candidate) in candidates.into_iter().enumerate() {
        let score = similarity(query, candidate);
        if score < cutoff {
            continue;
        }
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((i, score));
        }
    }
    best
}
