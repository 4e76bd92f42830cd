//! Query Configuration

use crate::analogy::DEFAULT_ANALOGY_RESULTS;
use crate::fuzzy::DEFAULT_CUTOFF;
use crate::similarity::DEFAULT_NEIGHBORS;

/// Per-session query defaults
#[derive(Debug, Clone, PartialEq)]
pub struct QueryConfig {
    /// Results returned by `most_similar` when the caller gives no k
    pub neighbors: usize,

    /// Results returned by `analogy` when the caller gives no k
    pub analogy_results: usize,

    /// Minimum ratio for fuzzy correction of query tokens
    pub fuzzy_cutoff: f64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            neighbors: DEFAULT_NEIGHBORS,
            analogy_results: DEFAULT_ANALOGY_RESULTS,
            fuzzy_cutoff: DEFAULT_CUTOFF,
        }
    }
}

impl QueryConfig {
    pub fn with_neighbors(mut self, k: usize) -> Self {
        self.neighbors = k;
        self
    }

    pub fn with_analogy_results(mut self, k: usize) -> Self {
        self.analogy_results = k;
        self
    }

    pub fn with_fuzzy_cutoff(mut self, cutoff: f64) -> Self {
        self.fuzzy_cutoff = cutoff;
        self
    }
}
