use serde::{Deserialize, Serialize};

/// Body of `POST /analyze`. At least one of the two fields must be present
/// and non-empty, otherwise the analyzer answers with a guidance message
/// instead of calling the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub symptoms: Option<String>,
    pub image_path: Option<String>,
}

/// Normalized analysis record derived from a parsed model response.
/// Text fields may be empty; the three video links are always populated,
/// from the response or from the fallback table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredResult {
    pub summary_en: String,
    pub summary_te: String,
    pub diet_en: String,
    pub diet_te: String,
    pub care_en: String,
    pub care_te: String,
    pub videos: CategoryLinks,
}

/// One video URL per result category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryLinks {
    pub summary: String,
    pub diet: String,
    pub care: String,
}

/// Final text for the three display boxes. Serialized as the `/analyze`
/// response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayTriple {
    pub summary: String,
    pub diet: String,
    pub care: String,
}

impl DisplayTriple {
    /// A triple whose summary box carries a message and whose other boxes
    /// are empty. Used for guidance and error outcomes.
    pub fn summary_only(message: impl Into<String>) -> Self {
        Self {
            summary: message.into(),
            diet: String::new(),
            care: String::new(),
        }
    }
}
