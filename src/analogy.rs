//! Vector-offset analogies: "a is to b as c is to ?"

use crate::error::Result;
use crate::fuzzy;
use crate::similarity::{rank, require_known, QueryResult};
use crate::store::EmbeddingStore;
use crate::vector::offset;
use tracing::debug;

pub const DEFAULT_ANALOGY_RESULTS: usize = 5;

/// Solves `a : b :: c : ?` by ranking the vocabulary against `b - a + c`.
///
/// The three input words never appear in the result.
///
/// ```
/// use wordvec::{analogy, EmbeddingStore};
///
/// let store = EmbeddingStore::from_rows(vec![
///     ("king".to_string(), vec![1.0, 1.0, 0.0]),
///     ("queen".to_string(), vec![0.0, 1.0, 1.0]),
///     ("man".to_string(), vec![1.0, 0.0, 0.0]),
///     ("woman".to_string(), vec![0.0, 0.0, 1.0]),
/// ]).unwrap();
///
/// let result = analogy::analogy(&store, "man", "king", "woman", 1, 0.75).unwrap();
/// assert_eq!(result[0].word, "queen");
/// ```
pub fn analogy(
    store: &EmbeddingStore,
    a: &str,
    b: &str,
    c: &str,
    k: usize,
    cutoff: f64,
) -> Result<QueryResult> {
    let a = fuzzy::correct(store, a, cutoff);
    let b = fuzzy::correct(store, b, cutoff);
    let c = fuzzy::correct(store, c, cutoff);
    require_known(store, &[a.as_str(), b.as_str(), c.as_str()])?;

    let target = offset(store.vector(&a)?, store.vector(&b)?, store.vector(&c)?)?;
    let exclude: Vec<usize> = [&a, &b, &c]
        .iter()
        .filter_map(|w| store.id_of(w))
        .collect();

    debug!(a = %a, b = %b, c = %c, k, "analogy");
    rank(store, &target, &exclude, k)
}

#[cfg(test)]
mod analogy_test {
    use super::*;
    use crate::error::EmbedError;
    use crate::fuzzy::DEFAULT_CUTOFF;

    /// Gender on axis 0, royalty on axis 1, plus a little noise on axis 2.
    fn royalty() -> EmbeddingStore {
        EmbeddingStore::from_rows(vec![
            ("king".to_string(), vec![0.1, 0.9, 0.2]),
            ("queen".to_string(), vec![0.9, 0.9, 0.2]),
            ("man".to_string(), vec![0.1, 0.1, 0.2]),
            ("woman".to_string(), vec![0.9, 0.1, 0.2]),
            ("apple".to_string(), vec![-0.5, 0.0, 0.9]),
        ])
        .unwrap()
    }

    #[test]
    fn test_king_man_woman_queen() {
        let store = royalty();
        let result = analogy(&store, "man", "king", "woman", 1, DEFAULT_CUTOFF).unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].word, "queen");
        assert!(result[0].score > 0.5);
    }

    #[test]
    fn test_inputs_never_returned() {
        let store = royalty();
        let result = analogy(&store, "man", "king", "woman", 10, DEFAULT_CUTOFF).unwrap();

        assert_eq!(result.len(), 2);
        for n in &result {
            assert!(!["man", "king", "woman"].contains(&n.word.as_str()));
        }
    }

    #[test]
    fn test_repeated_input_excluded_once() {
        let store = royalty();
        let result = analogy(&store, "man", "man", "woman", 10, DEFAULT_CUTOFF).unwrap();

        assert_eq!(result.len(), 3);
        assert!(result.iter().all(|n| n.word != "man" && n.word != "woman"));
    }

    #[test]
    fn test_unknown_input() {
        let store = royalty();
        match analogy(&store, "man", "emperor", "woman", 1, DEFAULT_CUTOFF) {
            Err(EmbedError::UnknownWord { words }) => assert_eq!(words, vec!["emperor".to_string()]),
            other => panic!("Expected UnknownWord, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_target() {
        let store = EmbeddingStore::from_rows(vec![
            ("a".to_string(), vec![1.0, 0.0]),
            ("b".to_string(), vec![0.0, 1.0]),
            ("c".to_string(), vec![-1.0, 1.0]),
            ("d".to_string(), vec![1.0, 1.0]),
        ])
        .unwrap();

        // a - b + c = (1,0) - (0,1) + (-1,1) = (0,0)
        let result = analogy(&store, "b", "a", "c", 1, DEFAULT_CUTOFF);
        assert!(matches!(result, Err(EmbedError::ZeroVector)));
    }
}
