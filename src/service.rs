use axum::{
    Router,
    extract::State,
    response::Json,
    routing::{get, post},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::analyzer::SymptomAnalyzer;
use crate::config::AnalyzerConfig;
use crate::gemini::GeminiClient;
use crate::models::{AnalyzeRequest, DisplayTriple};

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<SymptomAnalyzer>,
}

pub fn create_app() -> anyhow::Result<Router> {
    let config = AnalyzerConfig::from_env()?;
    let client = Arc::new(GeminiClient::new(&config));
    let analyzer = Arc::new(SymptomAnalyzer::new(config, client));
    Ok(build_router(AppState { analyzer }))
}

fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/analyze", post(analyze))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "service": "Symptom Analyzer Service",
        "version": "1.0.0",
        "description": "AI-powered symptom analysis with bilingual summaries and video links",
        "endpoints": {
            "POST /analyze": "Analyze symptom text and an optional image",
            "GET /health": "Health check"
        }
    }))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Always answers 200 with the three display boxes; model and parsing
/// failures arrive as display text, not as HTTP errors.
async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Json<DisplayTriple> {
    info!(
        "Analyze request received (symptoms: {}, image: {})",
        request.symptoms.is_some(),
        request.image_path.is_some()
    );

    let triple = state
        .analyzer
        .analyze(request.symptoms.as_deref(), request.image_path.as_deref())
        .await;
    Json(triple)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FallbackVideos;
    use crate::gemini::{FileHandle, GenerativeModel, RequestPart};
    use async_trait::async_trait;

    struct EchoModel;

    #[async_trait]
    impl GenerativeModel for EchoModel {
        async fn upload_file(&self, _path: &str) -> anyhow::Result<FileHandle> {
            anyhow::bail!("not used")
        }

        async fn generate(&self, _parts: Vec<RequestPart>) -> anyhow::Result<serde_json::Value> {
            Ok(json!({
                "candidates": [{"content": {"parts": [{"text": "{\"summary_en\": \"ok\"}"}]}}]
            }))
        }
    }

    fn test_state() -> AppState {
        let config = AnalyzerConfig {
            api_key: "test-key".to_string(),
            model: "test-model".to_string(),
            base_url: "http://localhost:0".to_string(),
            fallback_videos: FallbackVideos::default(),
        };
        AppState {
            analyzer: Arc::new(SymptomAnalyzer::new(config, Arc::new(EchoModel))),
        }
    }

    #[tokio::test]
    async fn analyze_handler_returns_the_triple() {
        let request = AnalyzeRequest {
            symptoms: Some("fever".to_string()),
            image_path: None,
        };
        let Json(triple) = analyze(State(test_state()), Json(request)).await;
        assert!(triple.summary.starts_with("Summary (EN):\nok"));
        assert!(triple.diet.starts_with("Diet (EN):\n"));
    }

    #[tokio::test]
    async fn health_reports_healthy() {
        let Json(body) = health_check().await;
        assert_eq!(body["status"], "healthy");
    }
}
