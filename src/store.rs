//! The embedding store module
//! Holds the immutable word -> vector table produced by the training pipeline

use crate::error::{EmbedError, Result};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs::File,
    io::{
        BufReader,
        BufWriter,
    },
    path::Path,
};
use tracing::info;

/// On-disk layout of the table. `vectors` is row-major, one row per word.
#[derive(Serialize, Deserialize)]
struct StoredTable {
    words: Vec<String>,
    dimension: usize,
    vectors: Vec<f32>,
}

/// Read-only vocabulary and embedding table.
///
/// Word ids are row indices: id `i` names `words[i]` and the slice
/// `vectors[i * dimension..(i + 1) * dimension]`. Nothing mutates a store
/// after construction, so a shared reference can be handed to any number
/// of readers.
#[derive(Debug, Clone)]
pub struct EmbeddingStore {
    words: Vec<String>,
    vectors: Vec<f32>,
    dimension: usize,
    index: HashMap<String, usize>,
    // Ids sorted by word, for candidate scans that must run in lexicographic order
    sorted: Vec<usize>,
}

impl EmbeddingStore {
    /// Builds a store from `(word, vector)` rows.
    ///
    /// Every row must have the same length and every word must be distinct.
    ///
    /// # Examples
    ///
    /// ```
    /// use wordvec::EmbeddingStore;
    ///
    /// let store = EmbeddingStore::from_rows(vec![
    ///     ("cat".to_string(), vec![1.0, 0.0]),
    ///     ("dog".to_string(), vec![0.9, 0.1]),
    /// ]).unwrap();
    ///
    /// assert_eq!(store.size(), 2);
    /// assert_eq!(store.dimension(), 2);
    /// assert!(store.contains("cat"));
    /// ```
    pub fn from_rows(rows: Vec<(String, Vec<f32>)>) -> Result<Self> {
        let dimension = rows.first().map(|(_, v)| v.len()).unwrap_or(0);
        let mut words = Vec::with_capacity(rows.len());
        let capacity = rows
            .len()
            .checked_mul(dimension)
            .ok_or_else(|| EmbedError::corrupt("table size overflows the address space"))?;
        let mut vectors = Vec::with_capacity(capacity);

        for (word, vector) in rows {
            if vector.len() != dimension {
                return Err(EmbedError::corrupt(format!(
                    "row '{}' has {} dimensions, expected {}",
                    word,
                    vector.len(),
                    dimension
                )));
            }
            words.push(word);
            vectors.extend(vector);
        }

        Self::from_table(StoredTable { words, dimension, vectors })
    }

    /// Validates a decoded table and builds the word index.
    fn from_table(table: StoredTable) -> Result<Self> {
        let StoredTable { words, dimension, vectors } = table;

        if dimension == 0 && !words.is_empty() {
            return Err(EmbedError::corrupt("dimension is 0 for a non-empty vocabulary"));
        }
        let expected = words.len().checked_mul(dimension).ok_or_else(|| {
            EmbedError::corrupt(format!("{} words of dimension {} overflow the matrix size", words.len(), dimension))
        })?;
        if vectors.len() != expected {
            return Err(EmbedError::corrupt(format!(
                "{} words but {} matrix values (dimension {})",
                words.len(),
                vectors.len(),
                dimension
            )));
        }

        let mut index = HashMap::with_capacity(words.len());
        for (id, word) in words.iter().enumerate() {
            if index.insert(word.clone(), id).is_some() {
                return Err(EmbedError::corrupt(format!("duplicate word '{}'", word)));
            }
        }

        let mut sorted: Vec<usize> = (0..words.len()).collect();
        sorted.sort_unstable_by(|&a, &b| words[a].cmp(&words[b]));

        Ok(EmbeddingStore { words, vectors, dimension, index, sorted })
    }

    /// Loads a table previously written by the training pipeline or [`save`](EmbeddingStore::save).
    ///
    /// `.json` files are decoded with serde_json, everything else with bincode.
    ///
    /// # Errors
    ///
    /// * `StoreNotFound` - the file does not exist or cannot be opened
    /// * `StoreCorrupt` - decoding fails or the word count disagrees with the matrix rows
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use wordvec::EmbeddingStore;
    ///
    /// let store = EmbeddingStore::load("word2vec.bin").unwrap();
    /// println!("Loaded {} words", store.size());
    /// ```
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let not_found = || EmbedError::StoreNotFound { path: path.display().to_string() };

        if !path.exists() {
            return Err(not_found());
        }

        let file = File::open(path).map_err(|_| not_found())?;
        let reader = BufReader::new(file);

        let table: StoredTable = if is_json(path) {
            serde_json::from_reader(reader)
                .map_err(|e| EmbedError::corrupt(format!("JSON decoding failed: {}", e)))?
        } else {
            bincode::deserialize_from(reader)
                .map_err(|e| EmbedError::corrupt(format!("bincode decoding failed: {}", e)))?
        };

        let store = Self::from_table(table)?;
        info!(
            path = %path.display(),
            words = store.size(),
            dimension = store.dimension(),
            "embedding table loaded"
        );
        Ok(store)
    }

    /// Writes the table in the format [`load`](EmbeddingStore::load) reads back.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let io_err = |source: std::io::Error| EmbedError::Io { path: path.display().to_string(), source };

        let file = File::create(path).map_err(io_err)?;
        let writer = BufWriter::new(file);

        let table = StoredTable {
            words: self.words.clone(),
            dimension: self.dimension,
            vectors: self.vectors.clone(),
        };

        if is_json(path) {
            serde_json::to_writer(writer, &table)
                .map_err(|e| io_err(std::io::Error::other(e)))?;
        } else {
            bincode::serialize_into(writer, &table)
                .map_err(|e| io_err(std::io::Error::other(e)))?;
        }

        Ok(())
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    /// Returns the vector for `word`, or `UnknownWord` if it is not in the vocabulary.
    pub fn vector(&self, word: &str) -> Result<&[f32]> {
        self.id_of(word)
            .map(|id| self.row(id))
            .ok_or_else(|| EmbedError::unknown(word))
    }

    pub fn id_of(&self, word: &str) -> Option<usize> {
        self.index.get(word).copied()
    }

    pub fn word(&self, id: usize) -> Option<&str> {
        self.words.get(id).map(String::as_str)
    }

    /// Vocabulary cardinality.
    pub fn size(&self) -> usize {
        self.words.len()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Words in id order.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Words in lexicographic order.
    pub fn words_sorted(&self) -> impl Iterator<Item = &str> {
        self.sorted.iter().map(|&id| self.words[id].as_str())
    }

    /// Iterates `(id, word, vector)` in id order.
    pub fn rows(&self) -> impl Iterator<Item = (usize, &str, &[f32])> {
        self.words
            .iter()
            .enumerate()
            .map(|(id, word)| (id, word.as_str(), self.row(id)))
    }

    /// Slices one row out of the flat matrix. The matrix is laid out as
    /// `[w0_d0, w0_d1, ..., w1_d0, w1_d1, ...]`.
    fn row(&self, id: usize) -> &[f32] {
        let start = id * self.dimension;
        &self.vectors[start..start + self.dimension]
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

#[cfg(test)]
mod store_test {
    use super::*;

    fn animals() -> EmbeddingStore {
        EmbeddingStore::from_rows(vec![
            ("cat".to_string(), vec![1.0, 0.0, 0.0]),
            ("dog".to_string(), vec![0.0, 1.0, 0.0]),
            ("fish".to_string(), vec![0.0, 0.0, 1.0]),
        ])
        .unwrap()
    }

    #[test]
    fn test_from_rows_builds_index() {
        let store = animals();

        assert_eq!(store.size(), 3);
        assert_eq!(store.dimension(), 3);
        assert_eq!(store.id_of("dog"), Some(1));
        assert_eq!(store.word(2), Some("fish"));
        assert_eq!(store.vector("dog").unwrap(), &[0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_from_rows_dimension_mismatch() {
        let result = EmbeddingStore::from_rows(vec![
            ("a".to_string(), vec![1.0, 2.0, 3.0]),
            ("b".to_string(), vec![1.0, 2.0]),
        ]);

        assert!(matches!(result, Err(EmbedError::StoreCorrupt { .. })));
    }

    #[test]
    fn test_from_rows_duplicate_word() {
        let result = EmbeddingStore::from_rows(vec![
            ("a".to_string(), vec![1.0]),
            ("a".to_string(), vec![2.0]),
        ]);

        match result {
            Err(EmbedError::StoreCorrupt { reason }) => assert!(reason.contains("duplicate")),
            _ => panic!("Expected duplicate word to be rejected"),
        }
    }

    #[test]
    fn test_vector_unknown_word() {
        let store = animals();

        assert!(!store.contains("car"));
        match store.vector("car") {
            Err(EmbedError::UnknownWord { words }) => assert_eq!(words, vec!["car".to_string()]),
            _ => panic!("Expected UnknownWord"),
        }
    }

    #[test]
    fn test_rows_in_id_order() {
        let store = animals();
        let words: Vec<&str> = store.rows().map(|(_, w, _)| w).collect();
        assert_eq!(words, vec!["cat", "dog", "fish"]);
    }

    #[test]
    fn test_words_sorted() {
        let store = EmbeddingStore::from_rows(vec![
            ("pear".to_string(), vec![1.0]),
            ("apple".to_string(), vec![2.0]),
            ("fig".to_string(), vec![3.0]),
        ])
        .unwrap();

        let sorted: Vec<&str> = store.words_sorted().collect();
        assert_eq!(sorted, vec!["apple", "fig", "pear"]);
        // Ids are untouched
        assert_eq!(store.id_of("pear"), Some(0));
    }

    #[test]
    fn test_empty_store() {
        let store = EmbeddingStore::from_rows(Vec::new()).unwrap();
        assert_eq!(store.size(), 0);
        assert_eq!(store.dimension(), 0);
    }

    // ========== Save/Load Tests ==========

    #[test]
    fn test_save_and_load_bincode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.bin");

        animals().save(&path).unwrap();
        let loaded = EmbeddingStore::load(&path).unwrap();

        assert_eq!(loaded.size(), 3);
        assert_eq!(loaded.dimension(), 3);
        assert_eq!(loaded.vector("fish").unwrap(), &[0.0, 0.0, 1.0]);
        assert_eq!(loaded.id_of("cat"), Some(0));
    }

    #[test]
    fn test_save_and_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.json");

        animals().save(&path).unwrap();
        let loaded = EmbeddingStore::load(&path).unwrap();

        assert_eq!(loaded.words(), animals().words());
    }

    #[test]
    fn test_load_nonexistent_file() {
        match EmbeddingStore::load("nonexistent_table.bin") {
            Err(EmbedError::StoreNotFound { path }) => assert!(path.contains("nonexistent_table.bin")),
            _ => panic!("Expected StoreNotFound for nonexistent file"),
        }
    }

    #[test]
    fn test_load_row_count_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(
            &path,
            r#"{"words": ["a", "b"], "dimension": 2, "vectors": [1.0, 0.0, 0.0]}"#,
        )
        .unwrap();

        assert!(matches!(EmbeddingStore::load(&path), Err(EmbedError::StoreCorrupt { .. })));
    }

    #[test]
    fn test_load_oversized_dimension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.json");
        // 2 * 2^63 overflows usize, must not wrap around to an empty matrix
        std::fs::write(
            &path,
            r#"{"words": ["a", "b"], "dimension": 9223372036854775808, "vectors": []}"#,
        )
        .unwrap();

        assert!(matches!(EmbeddingStore::load(&path), Err(EmbedError::StoreCorrupt { .. })));
    }

    #[test]
    fn test_load_garbage_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.bin");
        std::fs::write(&path, b"\x01\x02").unwrap();

        assert!(matches!(EmbeddingStore::load(&path), Err(EmbedError::StoreCorrupt { .. })));
    }
}
