use serde::Serialize;

pub const SERVICE_MESSAGE: &str = "Credit Card Fraud Detection API";

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub message: &'static str,
    /// "ready" or "not_ready"
    pub status: &'static str,
    pub features_required: usize,
    pub features: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_loaded: bool,
    pub version: &'static str,
    pub environment: String,
    pub timestamp: i64,
}
