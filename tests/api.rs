use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use review_insights::{
    api::{router, AppState},
    config::{EmbedderKind, Settings},
    nlp::Pipeline,
};
use serde_json::Value;
use tower::ServiceExt;

fn app() -> Router {
    let settings = Settings {
        embedder: EmbedderKind::Hashing,
        embedding_dim: 64,
        min_cluster_size: 3,
        min_samples: 2,
        keyword_min_cluster_size: 2,
        ..Settings::default()
    };
    let pipeline = Pipeline::from_settings(&settings).unwrap();
    router(AppState::new(settings, pipeline))
}

fn sample_csv() -> String {
    let mut csv = String::from("full_text,rating,brand\n");
    for _ in 0..4 {
        csv.push_str("Creamy texture and delicious taste,5,Alpina\n");
        csv.push_str("The bottle cap arrived broken,1,Alpina\n");
        csv.push_str("Too expensive for the size,3,Colanta\n");
    }
    csv.push_str(",4,Alpina\n");
    csv
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "text/csv")
        .body(body.into())
        .unwrap()
}

fn json(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap()
}

#[tokio::test]
async fn summary_is_missing_before_any_upload() {
    let (status, body) = send(&app(), get("/summary")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json(&body)["error"].as_str().unwrap().contains("no analysis yet"));
}

#[tokio::test]
async fn empty_upload_asks_for_a_file() {
    let (status, body) = send(&app(), post("/analyze", Body::empty())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json(&body)["error"]
        .as_str()
        .unwrap()
        .starts_with("no CSV file provided"));
}

#[tokio::test]
async fn malformed_table_is_a_client_error() {
    let (status, body) = send(&app(), post("/analyze", "comment,when\nhello,today\n")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json(&body)["error"].as_str().unwrap().contains("full_text"));
}

#[tokio::test]
async fn upload_runs_the_pipeline_and_keeps_the_result() {
    let app = app();
    let (status, body) = send(&app, post("/analyze", sample_csv())).await;
    assert_eq!(status, StatusCode::OK);
    let report = json(&body);
    assert_eq!(report["kpis"]["total_reviews"], 12);
    assert_eq!(report["kpis"]["skipped_rows"], 1);
    assert_eq!(report["embedder"], "hashing");
    assert_eq!(report["reviews"].as_array().unwrap().len(), 12);
    assert_eq!(report["topic_volume"]["packaging"], 4);
    assert_eq!(report["sentiment_by_topic"]["price"]["neutral"], 4);
    for review in report["reviews"].as_array().unwrap() {
        assert!(!review["topics"].as_array().unwrap().is_empty());
    }

    let (status, body) = send(&app, get("/summary")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["kpis"], report["kpis"]);
}

#[tokio::test]
async fn brand_query_filters_the_upload() {
    let (status, body) = send(&app(), post("/analyze?brand=colanta", sample_csv())).await;
    assert_eq!(status, StatusCode::OK);
    let report = json(&body);
    assert_eq!(report["kpis"]["total_reviews"], 4);
    assert_eq!(report["kpis"]["filtered_out"], 9);
    assert_eq!(report["brands"][0]["brand"], "Colanta");
}

#[tokio::test]
async fn topics_lists_expanded_keywords() {
    let (status, body) = send(&app(), get("/topics")).await;
    assert_eq!(status, StatusCode::OK);
    let topics = json(&body);
    let topics = topics.as_array().unwrap();
    assert_eq!(topics.len(), 6);
    assert_eq!(topics[0]["topic"], "flavour");
    assert_eq!(topics[0]["seeds"][0], "flavour");
    assert!(topics[0]["keywords"]
        .as_array()
        .unwrap()
        .iter()
        .any(|k| k == "flavor"));
}

#[cfg(feature = "askama")]
#[tokio::test]
async fn index_switches_from_prompt_to_report() {
    let app = app();
    let (status, body) = send(&app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(body).unwrap().contains("no CSV file provided"));

    send(&app, post("/analyze", sample_csv())).await;
    let (status, body) = send(&app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("<html"));
    assert!(html.contains("packaging"));
}
