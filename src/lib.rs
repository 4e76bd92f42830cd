//! # wordvec - Word Embedding Query Engine
//!
//! wordvec answers questions about a trained word-embedding table: nearest
//! neighbors, pairwise similarity, vector analogies, odd-one-out detection,
//! raw vector inspection and 2D projection for plotting. The table is read
//! once and never modified, and every query is a plain function of the table
//! and its arguments. Misspelled query tokens are fuzzy-corrected against the
//! vocabulary before lookup.
//!
//! ## Example
//!
//! ```
//! use wordvec::{EmbeddingStore, QueryConfig, Session};
//!
//! let store = EmbeddingStore::from_rows(vec![
//!     ("king".to_string(), vec![1.0, 1.0, 0.0]),
//!     ("queen".to_string(), vec![0.0, 1.0, 1.0]),
//!     ("man".to_string(), vec![1.0, 0.0, 0.0]),
//!     ("woman".to_string(), vec![0.0, 0.0, 1.0]),
//! ]).unwrap();
//! let session = Session::with_store(store, QueryConfig::default());
//!
//! // man is to king as woman is to ?
//! let result = session.analogy("man", "king", "woman", Some(1)).unwrap();
//! assert_eq!(result[0].word, "queen");
//!
//! // Misspellings are corrected before lookup
//! let sim = session.similarity("kingg", "king").unwrap();
//! assert!((sim - 1.0).abs() < 1e-6);
//! ```

pub mod analogy;
pub mod config;
pub mod error;
pub mod fuzzy;
pub mod outlier;
pub mod projection;
pub mod server;
pub mod session;
pub mod similarity;
pub mod store;
pub mod vector;

// Re-export the primary public API
pub use config::QueryConfig;
pub use error::{EmbedError, Result};
pub use projection::{Projection, ProjectedPoint};
pub use session::{Session, WordVector};
pub use similarity::{Neighbor, QueryResult};
pub use store::EmbeddingStore;
