//! Query session: the boundary presentation layers talk to.
//!
//! A session may exist before any table is loaded; every query issued in
//! that state fails with `StoreNotFound` instead of panicking.

use crate::analogy;
use crate::config::QueryConfig;
use crate::error::{EmbedError, Result};
use crate::fuzzy;
use crate::outlier;
use crate::projection::{self, Projection};
use crate::similarity::{self, QueryResult};
use crate::store::EmbeddingStore;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

/// Raw vector of a word, for diagnostic display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordVector {
    pub word: String,
    pub dimension: usize,
    pub values: Vec<f32>,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    store: Option<Arc<EmbeddingStore>>,
    config: QueryConfig,
}

impl Session {
    /// Creates a session with no table loaded.
    pub fn new(config: QueryConfig) -> Self {
        Session { store: None, config }
    }

    pub fn with_store(store: EmbeddingStore, config: QueryConfig) -> Self {
        Session { store: Some(Arc::new(store)), config }
    }

    /// Loads a table, replacing the current one only on success.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let store = EmbeddingStore::load(path)?;
        let size = store.size();
        self.store = Some(Arc::new(store));
        Ok(size)
    }

    pub fn is_loaded(&self) -> bool {
        self.store.is_some()
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    pub fn store(&self) -> Result<&EmbeddingStore> {
        self.store
            .as_deref()
            .ok_or_else(|| EmbedError::StoreNotFound { path: "no embedding table loaded".to_string() })
    }

    /// Fuzzy-corrects a single token against the loaded vocabulary.
    pub fn correct(&self, token: &str) -> Result<String> {
        Ok(fuzzy::correct(self.store()?, token, self.config.fuzzy_cutoff))
    }

    pub fn most_similar(&self, word: &str, k: Option<usize>) -> Result<QueryResult> {
        let k = k.unwrap_or(self.config.neighbors);
        similarity::most_similar(self.store()?, word, k, self.config.fuzzy_cutoff)
    }

    pub fn similarity(&self, w1: &str, w2: &str) -> Result<f32> {
        similarity::similarity(self.store()?, w1, w2, self.config.fuzzy_cutoff)
    }

    pub fn analogy(&self, a: &str, b: &str, c: &str, k: Option<usize>) -> Result<QueryResult> {
        let k = k.unwrap_or(self.config.analogy_results);
        analogy::analogy(self.store()?, a, b, c, k, self.config.fuzzy_cutoff)
    }

    pub fn odd_one_out<S: AsRef<str>>(&self, words: &[S]) -> Result<String> {
        outlier::odd_one_out(self.store()?, words, self.config.fuzzy_cutoff)
    }

    pub fn project_2d<S: AsRef<str>>(&self, words: &[S]) -> Result<Projection> {
        projection::project_2d(self.store()?, words, self.config.fuzzy_cutoff)
    }

    pub fn vector_of(&self, word: &str) -> Result<WordVector> {
        let store = self.store()?;
        let word = fuzzy::correct(store, word, self.config.fuzzy_cutoff);
        let values = store.vector(&word)?.to_vec();
        Ok(WordVector { dimension: values.len(), word, values })
    }

    pub fn vocab_size(&self) -> Result<usize> {
        Ok(self.store()?.size())
    }
}
