//! Fuzzy correction of query tokens against the vocabulary.
//!
//! Scores use the Ratcliff/Obershelp "gestalt" ratio: `2 * M / (|a| + |b|)`,
//! where `M` counts characters in the matching blocks found by repeatedly
//! taking the longest common substring and recursing on both sides of it.

use crate::store::EmbeddingStore;
use tracing::info;

/// Minimum ratio a vocabulary word needs to replace a query token.
pub const DEFAULT_CUTOFF: f64 = 0.75;

/// Normalizes `token` and maps it to the closest vocabulary word.
///
/// Known words come back unchanged. Otherwise every vocabulary word is scored
/// in lexicographic order and the first one with the highest ratio wins,
/// provided the ratio is at least `cutoff`. With no qualifying candidate the
/// normalized token is returned as-is, so callers still have to check membership.
///
/// ```
/// use wordvec::{fuzzy, EmbeddingStore};
///
/// let store = EmbeddingStore::from_rows(vec![
///     ("king".to_string(), vec![1.0, 0.0]),
///     ("queen".to_string(), vec![0.0, 1.0]),
/// ]).unwrap();
///
/// assert_eq!(fuzzy::correct(&store, "  Kingg ", fuzzy::DEFAULT_CUTOFF), "king");
/// assert_eq!(fuzzy::correct(&store, "zzzzqq", fuzzy::DEFAULT_CUTOFF), "zzzzqq");
/// ```
pub fn correct(store: &EmbeddingStore, token: &str, cutoff: f64) -> String {
    let word = token.trim().to_lowercase();
    if store.contains(&word) {
        return word;
    }

    let query: Vec<char> = word.chars().collect();
    let mut chars: Vec<char> = Vec::new();

    let mut best: Option<(&str, f64)> = None;
    for candidate in store.words_sorted() {
        chars.clear();
        chars.extend(candidate.chars());
        // Upper bound on the ratio, skip the full match when it cannot win
        let bound = 2.0 * chars.len().min(query.len()) as f64 / (chars.len() + query.len()) as f64;
        if bound < cutoff || best.is_some_and(|(_, score)| bound <= score) {
            continue;
        }

        let score = ratio(&chars, &query);
        if score >= cutoff && best.is_none_or(|(_, s)| score > s) {
            best = Some((candidate, score));
        }
    }

    match best {
        Some((corrected, score)) => {
            info!(from = %word, to = %corrected, ratio = score, "auto-corrected query token");
            corrected.to_string()
        }
        None => word,
    }
}

/// Similarity ratio in `[0, 1]`. Two empty sequences count as identical.
pub fn ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(a, b) as f64 / total as f64
}

/// Convenience wrapper over [`ratio`] for string slices.
pub fn str_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    ratio(&a, &b)
}

/// Total size of the matching blocks between `a` and `b`.
fn matching_chars(a: &[char], b: &[char]) -> usize {
    let mut total = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, size) = longest_match(a, b, alo, ahi, blo, bhi);
        if size == 0 {
            continue;
        }
        total += size;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + size < ahi && j + size < bhi {
            pending.push((i + size, ahi, j + size, bhi));
        }
    }

    total
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]`.
///
/// Ties go to the block starting earliest in `a`, then earliest in `b`.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
    // run[j] = length of the common run ending at a[i - 1], b[j - 1]
    let mut prev = vec![0usize; bhi - blo + 1];
    let mut curr = vec![0usize; bhi - blo + 1];

    for i in alo..ahi {
        for j in blo..bhi {
            let k = j - blo + 1;
            curr[k] = if a[i] == b[j] { prev[k - 1] + 1 } else { 0 };
            if curr[k] > best_size {
                best_size = curr[k];
                best_i = i + 1 - best_size;
                best_j = j + 1 - best_size;
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    (best_i, best_j, best_size)
}
