use std::sync::{Arc, OnceLock};

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use fraud_core::logic::model::{ForestParams, MaxFeatures};
use fraud_core::logic::model::StandardScaler;
use fraud_core::logic::training::{self, TrainConfig};
use fraud_core::{load_artifacts, Predictor, TrainedModel, FEATURE_COUNT, FEATURE_LAYOUT};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::config::Config;
use crate::error::MISSING_FEATURES;
use crate::{create_router, AppState};

/// Trains once on a small separable CSV (fraud iff Amount is large) and
/// loads the written artifacts the same way startup does.
fn trained() -> &'static (TrainedModel, Arc<Predictor>) {
    static MODEL: OnceLock<(TrainedModel, Arc<Predictor>)> = OnceLock::new();

    MODEL.get_or_init(|| {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("creditcard.csv");

        let mut csv = FEATURE_LAYOUT.join(",");
        csv.push_str(",Class\n");
        for i in 0..200 {
            let fraud = i % 10 == 0;
            let amount = if fraud { 500.0 + (i % 13) as f64 } else { (i % 37) as f64 };
            let mut row = vec!["0".to_string(); FEATURE_COUNT - 1];
            row.push(amount.to_string());
            row.push(u8::from(fraud).to_string());
            csv.push_str(&row.join(","));
            csv.push('\n');
        }
        std::fs::write(&csv_path, csv).unwrap();

        let config = TrainConfig {
            dataset_path: csv_path,
            output_dir: dir.path().join("model"),
            forest: ForestParams {
                n_estimators: 10,
                max_features: MaxFeatures::All,
                ..Default::default()
            },
            ..Default::default()
        };
        let model = training::run(&config).unwrap();
        let loaded = Arc::new(load_artifacts(&config.output_dir).unwrap());

        (model, loaded)
    })
}

fn trained_predictor() -> Arc<Predictor> {
    trained().1.clone()
}

/// Trained forest behind a scaler whose tiny scale overflows on large inputs
fn overflowing_predictor() -> Arc<Predictor> {
    let model = &trained().0;
    let scaler = StandardScaler {
        mean: vec![0.0; FEATURE_COUNT],
        scale: vec![1e-300; FEATURE_COUNT],
        n_samples_seen: 1,
    };
    Arc::new(Predictor::new(model.config.clone(), scaler, model.forest.clone()))
}

fn app(model: Option<Arc<Predictor>>) -> Router {
    create_router(AppState {
        config: Config::default(),
        model,
    })
}

fn loaded() -> Router {
    app(Some(trained_predictor()))
}

fn unloaded() -> Router {
    app(None)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// ----------------------------------------------------------------------------
// GET / and /health
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_health_reports_model_loaded() {
    let (status, body) = send(loaded(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["model_loaded"], true);
}

#[tokio::test]
async fn test_health_without_model() {
    let (status, body) = send(unloaded(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["model_loaded"], false);
}

#[tokio::test]
async fn test_root_lists_features_when_ready() {
    let (status, body) = send(loaded(), get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Credit Card Fraud Detection API");
    assert_eq!(body["status"], "ready");
    assert_eq!(body["features_required"], 30);

    let features = body["features"].as_array().unwrap();
    assert_eq!(features.len(), 30);
    assert_eq!(features[0], "Time");
    assert_eq!(features[29], "Amount");
}

#[tokio::test]
async fn test_root_not_ready() {
    let (status, body) = send(unloaded(), get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "not_ready");
    assert_eq!(body["features_required"], 0);
    assert_eq!(body["features"], json!([]));
}

// ----------------------------------------------------------------------------
// POST /predict
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_predict_legit_vector() {
    let req = post_json("/predict", json!({ "features": vec![0.0; 30] }));
    let (status, body) = send(loaded(), req).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(body["fraud"], false);
    let p = body["fraud_probability"].as_f64().unwrap();
    let confidence = body["confidence"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&p));
    assert!(confidence >= 0.5);
    assert!((confidence - p.max(1.0 - p)).abs() < 1e-12);
}

#[tokio::test]
async fn test_predict_fraud_vector() {
    let mut features = vec![0.0; 30];
    features[29] = 10_000.0;

    let (status, body) = send(loaded(), post_json("/predict", json!({ "features": features }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fraud"], true);
    assert!(body["fraud_probability"].as_f64().unwrap() > 0.5);
}

#[tokio::test]
async fn test_predict_is_deterministic() {
    let features: Vec<f64> = (0..30).map(|i| i as f64 * 0.5).collect();

    let (_, first) = send(loaded(), post_json("/predict", json!({ "features": features }))).await;
    let (_, second) = send(loaded(), post_json("/predict", json!({ "features": features }))).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_predict_wrong_length() {
    let req = post_json("/predict", json!({ "features": vec![0.0; 29] }));
    let (status, body) = send(loaded(), req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Expected 30 features, got 29");
    assert_eq!(body["kind"], "validation");
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn test_predict_missing_features() {
    let (status, body) = send(loaded(), post_json("/predict", json!({ "values": [1.0] }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], MISSING_FEATURES);
    assert_eq!(body["kind"], "validation");
}

#[tokio::test]
async fn test_predict_non_numeric_features() {
    let mut features = vec![json!(0.0); 30];
    features[3] = json!("abc");

    let (status, body) = send(loaded(), post_json("/predict", json!({ "features": features }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "validation");
}

#[tokio::test]
async fn test_predict_unparsable_body() {
    let req = Request::post("/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(loaded(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], MISSING_FEATURES);
}

#[tokio::test]
async fn test_predict_inference_failure() {
    let mut features = vec![0.0; 30];
    features[5] = 1e300;

    let req = post_json("/predict", json!({ "features": features }));
    let (status, body) = send(app(Some(overflowing_predictor())), req).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["kind"], "inference");
    assert_eq!(body["status"], 500);
    assert_eq!(body["error"], "Scaled feature at index 5 is not a finite number");
}

#[tokio::test]
async fn test_predict_without_model() {
    let req = post_json("/predict", json!({ "features": vec![0.0; 30] }));
    let (status, body) = send(unloaded(), req).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["kind"], "unavailable");
    assert_eq!(body["status"], 503);
}

// ----------------------------------------------------------------------------
// GET /predict_demo
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_predict_demo() {
    let (status, body) = send(loaded(), get("/predict_demo")).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(body["non_fraud"]["fraud"], false);
    assert_eq!(body["fraud"]["fraud"], true);
    for key in ["non_fraud", "fraud"] {
        let p = body[key]["probability"].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&p));
    }
}

#[tokio::test]
async fn test_predict_demo_without_model() {
    let (status, body) = send(unloaded(), get("/predict_demo")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "Model not loaded");
}

#[test]
fn test_config_defaults() {
    let config = Config::default();
    assert_eq!(config.port, 5000);
    assert!(!config.is_production());
}

#[tokio::test]
async fn test_panic_becomes_internal_error() {
    let resp = crate::handle_panic(Box::new("boom"));
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let bytes = axum::body::to_bytes(resp.into_body(), 1024).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["kind"], "internal");
    assert_eq!(body["error"], "Internal server error");
}
