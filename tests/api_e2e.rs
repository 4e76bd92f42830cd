use actix_web::{web, App, HttpServer};
use reqwest::Client;
use serde_json::json;
use std::net::TcpListener;
use tokio::time::{sleep, Duration};
use wordvec::{EmbeddingStore, QueryConfig, Session};

/// Find a free port by binding to port 0
fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

fn sample_session() -> Session {
    let store = EmbeddingStore::from_rows(vec![
        ("king".to_string(), vec![0.1, 0.9, 0.2, 0.0]),
        ("queen".to_string(), vec![0.9, 0.9, 0.2, 0.0]),
        ("man".to_string(), vec![0.1, 0.1, 0.2, 0.0]),
        ("woman".to_string(), vec![0.9, 0.1, 0.2, 0.0]),
        ("cat".to_string(), vec![0.0, 0.1, 0.1, 0.9]),
    ])
    .unwrap();
    Session::with_store(store, QueryConfig::default())
}

/// Start a server in the background and return its base URL and handle
async fn start(session: Session) -> (String, actix_web::dev::ServerHandle) {
    let port = free_port();
    let data = web::Data::new(session);

    let server = HttpServer::new(move || App::new().app_data(data.clone()).configure(wordvec::server::config))
        .bind(format!("127.0.0.1:{}", port))
        .unwrap()
        .run();
    let handle = server.handle();
    tokio::spawn(server);
    sleep(Duration::from_millis(200)).await;

    (format!("http://127.0.0.1:{}", port), handle)
}

#[actix_web::test]
async fn test_vocab_and_similar() {
    let (base, handle) = start(sample_session()).await;
    let client = Client::new();

    let resp = client.get(format!("{}/vocab", base)).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["size"], 5);
    assert_eq!(body["dimension"], 4);

    // --- Nearest neighbors exclude the query word ---
    let resp = client
        .post(format!("{}/similar", base))
        .json(&json!({"word": "king", "top_k": 2}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    let matches = body["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 2);
    assert!(matches.iter().all(|m| m["word"] != "king"));
    assert!(matches[0]["score"].as_f64().unwrap() >= matches[1]["score"].as_f64().unwrap());

    handle.stop(true).await;
}

#[actix_web::test]
async fn test_similarity_and_analogy() {
    let (base, handle) = start(sample_session()).await;
    let client = Client::new();

    // --- Misspelled word is corrected before scoring ---
    let resp = client
        .post(format!("{}/similarity", base))
        .json(&json!({"word1": "Queenn", "word2": "queen"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["word1"], "queen");
    assert!((body["score"].as_f64().unwrap() - 1.0).abs() < 1e-5);

    // --- man : king :: woman : queen ---
    let resp = client
        .post(format!("{}/analogy", base))
        .json(&json!({"a": "man", "b": "king", "c": "woman", "top_k": 1}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["matches"][0]["word"], "queen");
    assert!(body["matches"][0]["score"].as_f64().unwrap() > 0.5);

    handle.stop(true).await;
}

#[actix_web::test]
async fn test_odd_one_out_vector_and_project() {
    let (base, handle) = start(sample_session()).await;
    let client = Client::new();

    let resp = client
        .post(format!("{}/odd-one-out", base))
        .json(&json!({"words": ["king", "queen", "woman", "cat"]}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["odd"], "cat");

    let resp = client
        .post(format!("{}/vector", base))
        .json(&json!({"word": "man"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["dimension"], 4);
    assert_eq!(body["values"].as_array().unwrap().len(), 4);

    let resp = client
        .post(format!("{}/project", base))
        .json(&json!({"words": ["king", "unknownword", "queen", "cat"]}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    let points = body["points"].as_array().unwrap();
    assert_eq!(points.len(), 3);
    assert_eq!(points[0]["word"], "king");
    assert_eq!(points[2]["word"], "cat");

    handle.stop(true).await;
}

#[actix_web::test]
async fn test_error_statuses() {
    let (base, handle) = start(sample_session()).await;
    let client = Client::new();

    // Unknown word -> 404 naming the word
    let resp = client
        .post(format!("{}/similar", base))
        .json(&json!({"word": "xylophone"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("xylophone"));

    // Fewer than two valid words -> 400
    let resp = client
        .post(format!("{}/project", base))
        .json(&json!({"words": ["king"]}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    handle.stop(true).await;
}

#[actix_web::test]
async fn test_queries_without_table() {
    let (base, handle) = start(Session::new(QueryConfig::default())).await;
    let client = Client::new();

    let resp = client.get(format!("{}/vocab", base)).send().await.unwrap();
    assert_eq!(resp.status(), 503);

    let resp = client
        .post(format!("{}/similar", base))
        .json(&json!({"word": "king"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 503);

    handle.stop(true).await;
}
