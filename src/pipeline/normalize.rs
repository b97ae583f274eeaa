use serde_json::Value;

use crate::config::FallbackVideos;
use crate::models::{CategoryLinks, DisplayTriple, StructuredResult};

/// Maps a parsed model response onto the always-complete result record.
/// Missing or non-string text fields become empty strings; missing, empty or
/// non-string video links are replaced by the category's fallback URL.
pub fn normalize(parsed: &Value, fallbacks: &FallbackVideos) -> StructuredResult {
    let videos = parsed.get("videos").and_then(Value::as_object);
    let link = |key: &str, fallback: &str| {
        videos
            .and_then(|v| v.get(key))
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
            .unwrap_or(fallback)
            .to_string()
    };

    StructuredResult {
        summary_en: text_field(parsed, "summary_en"),
        summary_te: text_field(parsed, "summary_te"),
        diet_en: text_field(parsed, "diet_en"),
        diet_te: text_field(parsed, "diet_te"),
        care_en: text_field(parsed, "care_en"),
        care_te: text_field(parsed, "care_te"),
        videos: CategoryLinks {
            summary: link("summary", &fallbacks.summary),
            diet: link("diet", &fallbacks.diet),
            care: link("care", &fallbacks.care),
        },
    }
}

fn text_field(parsed: &Value, key: &str) -> String {
    parsed
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or("")
        .trim()
        .to_string()
}

/// Renders the three display boxes. The label text and blank-line spacing
/// are the external contract for the UI and must not change.
pub fn render(result: &StructuredResult) -> DisplayTriple {
    DisplayTriple {
        summary: box_text(
            "Summary",
            &result.summary_en,
            &result.summary_te,
            &result.videos.summary,
        ),
        diet: box_text("Diet", &result.diet_en, &result.diet_te, &result.videos.diet),
        care: box_text(
            "Health Care",
            &result.care_en,
            &result.care_te,
            &result.videos.care,
        ),
    }
}

fn box_text(label: &str, en: &str, te: &str, url: &str) -> String {
    format!("{label} (EN):\n{en}\n\n{label} (TE):\n{te}\n\nVideo: {url}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fallbacks() -> FallbackVideos {
        FallbackVideos {
            summary: "https://fallback/summary".to_string(),
            diet: "https://fallback/diet".to_string(),
            care: "https://fallback/care".to_string(),
        }
    }

    #[test]
    fn missing_links_get_fallbacks_provided_links_are_kept() {
        let parsed = json!({
            "summary_en": "Mild viral symptoms.",
            "videos": {"summary": "", "diet": "https://x/diet"}
        });
        let result = normalize(&parsed, &fallbacks());
        assert_eq!(result.videos.summary, "https://fallback/summary");
        assert_eq!(result.videos.diet, "https://x/diet");
        assert_eq!(result.videos.care, "https://fallback/care");
    }

    #[test]
    fn non_object_videos_value_counts_as_absent() {
        let parsed = json!({"videos": "not a map"});
        let result = normalize(&parsed, &fallbacks());
        assert_eq!(result.videos.summary, "https://fallback/summary");
        assert_eq!(result.videos.diet, "https://fallback/diet");
        assert_eq!(result.videos.care, "https://fallback/care");
    }

    #[test]
    fn text_fields_default_to_empty_and_are_trimmed() {
        let parsed = json!({
            "summary_en": "  Rest and hydrate.  ",
            "diet_en": 42
        });
        let result = normalize(&parsed, &fallbacks());
        assert_eq!(result.summary_en, "Rest and hydrate.");
        assert_eq!(result.diet_en, "");
        assert_eq!(result.care_te, "");
    }

    #[test]
    fn render_matches_display_contract() {
        let parsed = json!({
            "summary_en": "Mild viral symptoms.",
            "summary_te": "తేలికపాటి వైరల్ లక్షణాలు."
        });
        let triple = render(&normalize(&parsed, &fallbacks()));
        assert_eq!(
            triple.summary,
            "Summary (EN):\nMild viral symptoms.\n\n\
             Summary (TE):\nతేలికపాటి వైరల్ లక్షణాలు.\n\n\
             Video: https://fallback/summary"
        );
        assert!(triple.diet.starts_with("Diet (EN):\n"));
        assert!(triple.care.starts_with("Health Care (EN):\n"));
    }
}
