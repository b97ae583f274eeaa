use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default video links used when the model omits one. Read-only for the
/// lifetime of the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackVideos {
    pub summary: String,
    pub diet: String,
    pub care: String,
}

impl Default for FallbackVideos {
    fn default() -> Self {
        Self {
            // general symptom overview
            summary: "https://www.youtube.com/watch?v=JfS4y3WmT8E".to_string(),
            // diet suggestions
            diet: "https://www.youtube.com/watch?v=2-5bZk1qG1k".to_string(),
            // general health care tips
            care: "https://www.youtube.com/watch?v=Vb3m6uH7r5M".to_string(),
        }
    }
}

/// Configuration handed to the analyzer at construction time. Keeping the
/// credential and fallback table here rather than in process-wide state lets
/// tests run the analyzer against fake collaborators.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub fallback_videos: FallbackVideos,
}

impl AnalyzerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| anyhow::anyhow!("GEMINI_API_KEY not set"))?;
        let model =
            std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Ok(Self {
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
            fallback_videos: FallbackVideos::default(),
        })
    }
}
