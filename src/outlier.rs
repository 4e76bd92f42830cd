//! Odd-one-out detection

use crate::error::{EmbedError, Result};
use crate::fuzzy;
use crate::similarity::require_known;
use crate::store::EmbeddingStore;
use crate::vector::{cosine, l2_norm, mean, unit};
use tracing::debug;

/// Returns the member of `words` least similar to the mean of the group's
/// unit vectors.
///
/// Tokens are corrected and de-duplicated (first occurrence kept). Any token
/// still unknown fails the whole call; fewer than two distinct words is
/// `InsufficientInput`, and a member with a zero vector is `ZeroVector`.
/// Equal scores resolve to the earliest input.
pub fn odd_one_out<S: AsRef<str>>(store: &EmbeddingStore, words: &[S], cutoff: f64) -> Result<String> {
    let mut group: Vec<String> = Vec::with_capacity(words.len());
    for token in words {
        let word = fuzzy::correct(store, token.as_ref(), cutoff);
        if !group.contains(&word) {
            group.push(word);
        }
    }

    let refs: Vec<&str> = group.iter().map(String::as_str).collect();
    require_known(store, &refs)?;
    if group.len() < 2 {
        return Err(EmbedError::InsufficientInput { needed: 2, got: group.len() });
    }

    // Members are compared by direction only, so a long vector cannot drag the centroid
    let units = refs
        .iter()
        .map(|w| store.vector(w).and_then(unit))
        .collect::<Result<Vec<_>>>()?;
    let members: Vec<&[f32]> = units.iter().map(Vec::as_slice).collect();
    let centroid = mean(&members)?;
    // Directions that cancel out leave no centroid; every member then scores 0
    let centered = l2_norm(&centroid) > 0.0;

    let mut odd: Option<(usize, f32)> = None;
    for (i, v) in members.iter().enumerate() {
        let score = if centered { cosine(v, &centroid)? } else { 0.0 };
        if odd.is_none_or(|(_, lowest)| score < lowest) {
            odd = Some((i, score));
        }
    }

    let (i, score) = odd.ok_or(EmbedError::InsufficientInput { needed: 2, got: 0 })?;
    debug!(group = ?refs, odd = %group[i], score, "odd_one_out");
    Ok(group.swap_remove(i))
}
