//! Cosine similarity and nearest-neighbor search over the table

use crate::error::{EmbedError, Result};
use crate::fuzzy;
use crate::store::EmbeddingStore;
use crate::vector::{cosine, l2_norm};
use serde::Serialize;
use tracing::debug;

pub const DEFAULT_NEIGHBORS: usize = 10;

/// One ranked `(word, score)` entry of a query result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Neighbor {
    pub word: String,
    pub score: f32,
}

/// Neighbors ordered by descending score.
pub type QueryResult = Vec<Neighbor>;

/// The `k` words closest to `word`, never including `word` itself.
///
/// The token is fuzzy-corrected first. Ties keep vocabulary id order.
///
/// ```
/// use wordvec::{similarity, EmbeddingStore};
///
/// let store = EmbeddingStore::from_rows(vec![
///     ("cat".to_string(), vec![1.0, 0.1]),
///     ("dog".to_string(), vec![0.9, 0.2]),
///     ("car".to_string(), vec![0.0, 1.0]),
/// ]).unwrap();
///
/// let result = similarity::most_similar(&store, "cat", 1, 0.75).unwrap();
/// assert_eq!(result[0].word, "dog");
/// ```
pub fn most_similar(store: &EmbeddingStore, word: &str, k: usize, cutoff: f64) -> Result<QueryResult> {
    let word = fuzzy::correct(store, word, cutoff);
    let id = store.id_of(&word).ok_or_else(|| EmbedError::unknown(&word))?;
    let query = store.vector(&word)?;

    debug!(word = %word, k, "most_similar");
    rank(store, query, &[id], k)
}

/// Cosine similarity between two vocabulary words.
///
/// Both tokens are corrected first; if either is still unknown the error
/// names every missing word.
pub fn similarity(store: &EmbeddingStore, w1: &str, w2: &str, cutoff: f64) -> Result<f32> {
    let w1 = fuzzy::correct(store, w1, cutoff);
    let w2 = fuzzy::correct(store, w2, cutoff);
    require_known(store, &[w1.as_str(), w2.as_str()])?;

    debug!(w1 = %w1, w2 = %w2, "similarity");
    cosine(store.vector(&w1)?, store.vector(&w2)?)
}

/// Ranks every vocabulary row against `target`, skipping the ids in `exclude`
/// and rows with zero norm. Returns at most `k` neighbors.
pub(crate) fn rank(store: &EmbeddingStore, target: &[f32], exclude: &[usize], k: usize) -> Result<QueryResult> {
    if l2_norm(target) == 0.0 {
        return Err(EmbedError::ZeroVector);
    }

    let mut scored = Vec::with_capacity(store.size());
    for (id, _, vector) in store.rows() {
        if exclude.contains(&id) || l2_norm(vector) == 0.0 {
            continue;
        }
        scored.push((id, cosine(target, vector)?));
    }

    // Stable sort keeps id order among equal scores
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(k);

    Ok(scored
        .into_iter()
        .map(|(id, score)| Neighbor { word: store.words()[id].clone(), score })
        .collect())
}

/// Fails with `UnknownWord` naming every word missing from the vocabulary.
pub(crate) fn require_known(store: &EmbeddingStore, words: &[&str]) -> Result<()> {
    let missing: Vec<String> = words
        .iter()
        .filter(|w| !store.contains(w))
        .map(|w| w.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(EmbedError::UnknownWord { words: missing })
    }
}
