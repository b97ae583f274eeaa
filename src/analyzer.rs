use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::AnalyzerConfig;
use crate::gemini::{GenerativeModel, RequestPart, response_text};
use crate::models::DisplayTriple;
use crate::pipeline::json_extract::extract_json;
use crate::pipeline::marker_split::split_by_markers;
use crate::pipeline::normalize::{normalize, render};

pub const MISSING_INPUT_GUIDANCE: &str = "Please enter symptoms or upload an image.";
pub const NO_RESPONSE_PLACEHOLDER: &str = "No response text from Gemini.";

/// Instruction appended as the last content part of every request. Asking
/// for strict JSON keeps parsing reliable; the resolution pipeline still
/// copes when the model ignores it.
const SCHEMA_PROMPT: &str = r#"
You are a helpful, careful AI medical doctor. Analyze the patient's symptoms and optional image.
RESPOND ONLY IN JSON (no extra commentary). Produce the following JSON structure exactly:

{
  "summary_en": "<short symptom summary in English>",
  "summary_te": "<short symptom summary in Telugu>",
  "diet_en": "<short diet recommendations in English>",
  "diet_te": "<short diet recommendations in Telugu>",
  "care_en": "<short health care instructions in English>",
  "care_te": "<short health care instructions in Telugu>",
  "videos": {
    "summary": "<one YouTube URL that explains the symptoms or overview>",
    "diet": "<one YouTube URL with diet recommendations>",
    "care": "<one YouTube URL with health care instructions>"
  }
}

Keep each text concise (2-5 sentences). Use clear, non-diagnostic language and add general advice (seek in-person medical care when needed).
"#;

/// Failures at the two external call sites. The `Display` form is exactly
/// the text shown in the summary box.
#[derive(Debug, Error)]
pub enum ModelCallError {
    #[error("Image upload failed: {0}")]
    Upload(anyhow::Error),
    #[error("Gemini API call failed: {0}")]
    Generation(anyhow::Error),
}

/// Validates input, drives the model call, and resolves whatever comes back
/// into the three display boxes. Infallible from the caller's view: every
/// failure ends up as display text.
pub struct SymptomAnalyzer {
    config: AnalyzerConfig,
    model: Arc<dyn GenerativeModel>,
}

impl SymptomAnalyzer {
    pub fn new(config: AnalyzerConfig, model: Arc<dyn GenerativeModel>) -> Self {
        Self { config, model }
    }

    pub async fn analyze(
        &self,
        symptoms: Option<&str>,
        image_path: Option<&str>,
    ) -> DisplayTriple {
        let symptoms = symptoms.filter(|s| !s.is_empty());
        let image_path = image_path.filter(|p| !p.is_empty());

        if symptoms.is_none() && image_path.is_none() {
            return DisplayTriple::summary_only(MISSING_INPUT_GUIDANCE);
        }

        info!(
            "Starting analysis (symptoms: {}, image: {})",
            symptoms.is_some(),
            image_path.is_some()
        );

        match self.run_model(symptoms, image_path).await {
            Ok(response) => self.resolve(&response),
            Err(e) => {
                warn!("Model call failed: {}", e);
                DisplayTriple::summary_only(e.to_string())
            }
        }
    }

    /// Assembles the ordered content parts and runs the generation call.
    /// Order matters: symptoms line, then the uploaded image, then the
    /// schema instruction last.
    async fn run_model(
        &self,
        symptoms: Option<&str>,
        image_path: Option<&str>,
    ) -> Result<Value, ModelCallError> {
        let mut parts = Vec::new();
        if let Some(symptoms) = symptoms {
            parts.push(RequestPart::Text(format!("Patient Symptoms: {}", symptoms)));
        }
        if let Some(path) = image_path {
            let handle = self
                .model
                .upload_file(path)
                .await
                .map_err(ModelCallError::Upload)?;
            parts.push(RequestPart::File(handle));
        }
        parts.push(RequestPart::Text(SCHEMA_PROMPT.to_string()));

        self.model
            .generate(parts)
            .await
            .map_err(ModelCallError::Generation)
    }

    fn resolve(&self, response: &Value) -> DisplayTriple {
        let raw_text = response_text(response);

        if let Some(parsed) = extract_json(&raw_text) {
            info!("Structured JSON recovered from response");
            return render(&normalize(&parsed, &self.config.fallback_videos));
        }

        warn!("Response is not JSON, falling back to marker split");
        let text = if raw_text.is_empty() {
            NO_RESPONSE_PLACEHOLDER
        } else {
            raw_text.as_str()
        };
        split_by_markers(text, &self.config.fallback_videos)
    }
}
