use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;

use crate::config::AnalyzerConfig;

/// Opaque handle to a file accepted by the model provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileHandle {
    pub uri: String,
    pub mime_type: String,
}

/// One element of the ordered content list sent to the model.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestPart {
    Text(String),
    File(FileHandle),
}

/// Seam to the hosted model. The analyzer only ever talks to this trait, so
/// tests can substitute fakes for the network client.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Uploads a local file and returns a handle usable as a content part.
    async fn upload_file(&self, path: &str) -> anyhow::Result<FileHandle>;

    /// Runs one generation over the ordered parts and returns the raw
    /// response body.
    async fn generate(&self, parts: Vec<RequestPart>) -> anyhow::Result<Value>;
}

/// reqwest client for the Gemini generative-language REST API.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(config: &AnalyzerConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.clone(),
        }
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn upload_file(&self, path: &str) -> anyhow::Result<FileHandle> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path, e))?;
        let mime_type = guess_mime(path);

        info!("Uploading {} ({} bytes, {})", path, bytes.len(), mime_type);

        let url = format!("{}/upload/v1beta/files?key={}", self.base_url, self.api_key);
        let response = self
            .http
            .post(&url)
            .header("X-Goog-Upload-Protocol", "raw")
            .header(reqwest::header::CONTENT_TYPE, mime_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("File upload request failed: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("File upload error {}: {}", status, body);
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to parse upload response: {}", e))?;

        let uri = body["file"]["uri"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Upload response carries no file uri"))?
            .to_string();
        let mime_type = body["file"]["mimeType"]
            .as_str()
            .unwrap_or(mime_type)
            .to_string();

        Ok(FileHandle { uri, mime_type })
    }

    async fn generate(&self, parts: Vec<RequestPart>) -> anyhow::Result<Value> {
        let parts: Vec<Value> = parts
            .iter()
            .map(|part| match part {
                RequestPart::Text(text) => json!({ "text": text }),
                RequestPart::File(handle) => json!({
                    "file_data": {
                        "file_uri": handle.uri,
                        "mime_type": handle.mime_type,
                    }
                }),
            })
            .collect();
        let body = json!({ "contents": [{ "parts": parts }] });

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Gemini request failed: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini API error {}: {}", status, body);
        }

        response
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to parse Gemini response: {}", e))
    }
}

fn guess_mime(path: &str) -> &'static str {
    let extension = path.rsplit('.').next().unwrap_or("");
    match extension.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "heic" => "image/heic",
        _ => "application/octet-stream",
    }
}

type ShapeExtractor = fn(&Value) -> Option<String>;

/// Known response shapes, tried in order; the first one that yields text
/// wins. Covers the direct `text` field, the candidates/content/parts path,
/// and two older candidate layouts.
const SHAPE_EXTRACTORS: &[ShapeExtractor] = &[
    direct_text,
    candidate_part_text,
    candidate_content_string,
    candidate_text,
];

/// Robust text extraction from a raw model response. Falls back to a string
/// rendering of the whole body, and to an empty string for a null response.
pub fn response_text(response: &Value) -> String {
    if response.is_null() {
        return String::new();
    }
    SHAPE_EXTRACTORS
        .iter()
        .find_map(|extract| extract(response))
        .unwrap_or_else(|| response.to_string())
}

fn direct_text(response: &Value) -> Option<String> {
    response
        .get("text")
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

fn candidate_part_text(response: &Value) -> Option<String> {
    response
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn candidate_content_string(response: &Value) -> Option<String> {
    response
        .pointer("/candidates/0/content")
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn candidate_text(response: &Value) -> Option<String> {
    response
        .pointer("/candidates/0/text")
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_text_wins_over_candidates() {
        let response = json!({
            "text": "direct",
            "candidates": [{"content": {"parts": [{"text": "nested"}]}}]
        });
        assert_eq!(response_text(&response), "direct");
    }

    #[test]
    fn empty_direct_text_falls_through_to_candidates() {
        let response = json!({
            "text": "",
            "candidates": [{"content": {"parts": [{"text": "nested"}]}}]
        });
        assert_eq!(response_text(&response), "nested");
    }

    #[test]
    fn candidate_content_as_plain_string() {
        let response = json!({"candidates": [{"content": "plain"}]});
        assert_eq!(response_text(&response), "plain");
    }

    #[test]
    fn candidate_level_text_field() {
        let response = json!({"candidates": [{"text": "cand"}]});
        assert_eq!(response_text(&response), "cand");
    }

    #[test]
    fn unknown_shape_renders_whole_body() {
        let response = json!({"error": {"code": 500}});
        assert_eq!(response_text(&response), r#"{"error":{"code":500}}"#);
    }

    #[test]
    fn null_response_yields_empty_string() {
        assert_eq!(response_text(&Value::Null), "");
    }

    #[test]
    fn mime_guess_covers_common_image_types() {
        assert_eq!(guess_mime("/tmp/scan.PNG"), "image/png");
        assert_eq!(guess_mime("photo.jpeg"), "image/jpeg");
        assert_eq!(guess_mime("unknown.bin"), "application/octet-stream");
    }

    /// Live round trip against the real API.
    /// Usage: GEMINI_API_KEY=key cargo test live_generate -- --ignored
    #[tokio::test]
    #[ignore]
    async fn live_generate() -> anyhow::Result<()> {
        let Ok(config) = crate::config::AnalyzerConfig::from_env() else {
            println!("Skipping test - set GEMINI_API_KEY environment variable");
            return Ok(());
        };
        let client = GeminiClient::new(&config);
        let response = client
            .generate(vec![RequestPart::Text("Reply with the word pong.".into())])
            .await?;
        assert!(!response_text(&response).is_empty());
        Ok(())
    }
}
