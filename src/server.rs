//! REST API for wordvec.
//!
//! Provides a JSON query server over one embedding table loaded at startup.
//! The table is shared read-only between workers, so handlers never lock.
//!
//! ## Endpoints
//!
//! - `GET /vocab` - Vocabulary size and dimension
//! - `POST /similar` - Nearest neighbors of a word
//! - `POST /similarity` - Cosine similarity of two words
//! - `POST /analogy` - Solve "a is to b as c is to ?"
//! - `POST /odd-one-out` - Least representative word of a group
//! - `POST /vector` - Raw vector of a word
//! - `POST /project` - 2D PCA coordinates for a word set
//!
//! ## Usage
//!
//! ```rust,no_run
//! use actix_web::{web, App, HttpServer};
//! use wordvec::{QueryConfig, Session};
//!
//! #[actix_web::main]
//! async fn main() -> std::io::Result<()> {
//!     let mut session = Session::new(QueryConfig::default());
//!     session.load("word2vec.bin").expect("embedding table");
//!     let session = web::Data::new(session);
//!
//!     HttpServer::new(move || App::new().app_data(session.clone()).configure(wordvec::server::config))
//!         .bind("127.0.0.1:7878")?
//!         .run()
//!         .await
//! }
//! ```

use crate::error::EmbedError;
use crate::session::Session;
use crate::similarity::QueryResult;
use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use tracing::warn;

// --- Request structs ---

#[derive(Deserialize)]
struct SimilarRequest {
    word: String,
    top_k: Option<usize>,
}

#[derive(Deserialize)]
struct SimilarityRequest {
    word1: String,
    word2: String,
}

#[derive(Deserialize)]
struct AnalogyRequest {
    a: String,
    b: String,
    c: String,
    top_k: Option<usize>,
}

#[derive(Deserialize)]
struct WordsRequest {
    words: Vec<String>,
}

#[derive(Deserialize)]
struct VectorRequest {
    word: String,
}

// --- Response structs ---

#[derive(Serialize)]
struct VocabResponse {
    size: usize,
    dimension: usize,
}

#[derive(Serialize)]
struct MatchResponse {
    matches: QueryResult,
}

#[derive(Serialize)]
struct SimilarityResponse {
    word1: String,
    word2: String,
    score: f32,
}

#[derive(Serialize)]
struct OddOneOutResponse {
    odd: String,
}

/// Maps a query failure onto an HTTP status with a JSON error body.
fn error_response(err: EmbedError) -> HttpResponse {
    let status = match &err {
        EmbedError::UnknownWord { .. } => StatusCode::NOT_FOUND,
        EmbedError::InsufficientInput { .. }
        | EmbedError::ZeroVector
        | EmbedError::DimensionMismatch { .. } => StatusCode::BAD_REQUEST,
        EmbedError::StoreNotFound { .. } => StatusCode::SERVICE_UNAVAILABLE,
        EmbedError::StoreCorrupt { .. } | EmbedError::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        warn!(error = %err, "query failed");
    }
    HttpResponse::build(status).json(serde_json::json!({"error": err.to_string()}))
}

// --- Handlers ---

async fn vocab_handler(session: web::Data<Session>) -> impl Responder {
    match session.store() {
        Ok(store) => HttpResponse::Ok().json(VocabResponse {
            size: store.size(),
            dimension: store.dimension(),
        }),
        Err(e) => error_response(e),
    }
}

async fn similar_handler(session: web::Data<Session>, body: web::Json<SimilarRequest>) -> impl Responder {
    match session.most_similar(&body.word, body.top_k) {
        Ok(matches) => HttpResponse::Ok().json(MatchResponse { matches }),
        Err(e) => error_response(e),
    }
}

async fn similarity_handler(session: web::Data<Session>, body: web::Json<SimilarityRequest>) -> impl Responder {
    // Corrected words are known, so the scoring call does not scan the vocabulary again
    let result = session.correct(&body.word1).and_then(|word1| {
        let word2 = session.correct(&body.word2)?;
        let score = session.similarity(&word1, &word2)?;
        Ok(SimilarityResponse { word1, word2, score })
    });

    match result {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => error_response(e),
    }
}

async fn analogy_handler(session: web::Data<Session>, body: web::Json<AnalogyRequest>) -> impl Responder {
    match session.analogy(&body.a, &body.b, &body.c, body.top_k) {
        Ok(matches) => HttpResponse::Ok().json(MatchResponse { matches }),
        Err(e) => error_response(e),
    }
}

async fn odd_one_out_handler(session: web::Data<Session>, body: web::Json<WordsRequest>) -> impl Responder {
    match session.odd_one_out(&body.words) {
        Ok(odd) => HttpResponse::Ok().json(OddOneOutResponse { odd }),
        Err(e) => error_response(e),
    }
}

async fn vector_handler(session: web::Data<Session>, body: web::Json<VectorRequest>) -> impl Responder {
    match session.vector_of(&body.word) {
        Ok(vector) => HttpResponse::Ok().json(vector),
        Err(e) => error_response(e),
    }
}

async fn project_handler(session: web::Data<Session>, body: web::Json<WordsRequest>) -> impl Responder {
    match session.project_2d(&body.words) {
        Ok(projection) => HttpResponse::Ok().json(projection),
        Err(e) => error_response(e),
    }
}

/// Registers every query route. The caller supplies the `web::Data<Session>`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/vocab").route(web::get().to(vocab_handler)))
       .service(web::resource("/similar").route(web::post().to(similar_handler)))
       .service(web::resource("/similarity").route(web::post().to(similarity_handler)))
       .service(web::resource("/analogy").route(web::post().to(analogy_handler)))
       .service(web::resource("/odd-one-out").route(web::post().to(odd_one_out_handler)))
       .service(web::resource("/vector").route(web::post().to(vector_handler)))
       .service(web::resource("/project").route(web::post().to(project_handler)));
}
