use crate::config::FallbackVideos;
use crate::models::DisplayTriple;

/// Section markers the model tends to emit when it ignores the JSON
/// instruction and answers in prose.
pub const DIET_MARKER: &str = "🥗";
pub const CARE_MARKER: &str = "💊";
const SUMMARY_HEADER: &str = "🩺 Symptom Summary";

/// Salvages the three sections from non-JSON output.
///
/// Assumes one diet marker followed by one care marker; repeated or
/// out-of-order markers give silently wrong boundaries (accepted
/// limitation). Without both markers the whole text lands in the summary
/// box, unmodified, and the other boxes stay empty.
pub fn split_by_markers(text: &str, fallbacks: &FallbackVideos) -> DisplayTriple {
    let (Some(diet_at), Some(_)) = (text.find(DIET_MARKER), text.find(CARE_MARKER)) else {
        return DisplayTriple::summary_only(text);
    };

    let summary = text[..diet_at].replace(SUMMARY_HEADER, "");
    let diet = truncate_at(segment_after(text, DIET_MARKER), CARE_MARKER);
    let care = segment_after(text, CARE_MARKER);

    DisplayTriple {
        summary: with_video(&summary, &fallbacks.summary),
        diet: with_video(diet, &fallbacks.diet),
        care: with_video(care, &fallbacks.care),
    }
}

/// The segment between the first occurrence of `marker` and its next
/// occurrence (or the end of the text).
fn segment_after<'a>(text: &'a str, marker: &str) -> &'a str {
    let Some(at) = text.find(marker) else {
        return "";
    };
    truncate_at(&text[at + marker.len()..], marker)
}

fn truncate_at<'a>(text: &'a str, marker: &str) -> &'a str {
    match text.find(marker) {
        Some(at) => &text[..at],
        None => text,
    }
}

fn with_video(section: &str, url: &str) -> String {
    format!("{}\n\nVideo: {}", section.trim(), url)
}
