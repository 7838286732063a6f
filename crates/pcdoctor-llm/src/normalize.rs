//! Best-effort diagnosis extraction
//!
//! The upstream model is asked for JSON-only output but cannot be trusted
//! to comply; replies regularly arrive wrapped in prose or markdown
//! fences. `normalize` is total: whatever the input, the caller gets a
//! valid `DiagnosisResult` back, degrading to a fixed retry template when
//! nothing parses.

use pcdoctor_core::{DiagnosisResult, DiagnosisStep, Difficulty};
use regex::Regex;
use std::sync::LazyLock;

// Greedy: first `{` to last `}`, spanning newlines
static JSON_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("JSON_SPAN is a compile-time constant"));

/// Extract a [`DiagnosisResult`] from free-form model output.
///
/// Tries the largest brace-delimited span first, then the whole text, and
/// falls back to [`degraded_result`] when neither parses. Never fails.
#[must_use]
pub fn normalize(raw: &str) -> DiagnosisResult {
    if let Some(span) = JSON_SPAN.find(raw) {
        match serde_json::from_str(span.as_str()) {
            Ok(parsed) => return parsed,
            Err(e) => {
                tracing::warn!(error = %e, "failed to parse extracted JSON span, degrading");
                return degraded_result();
            }
        }
    }

    match serde_json::from_str(raw) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(error = %e, "model reply contained no parseable JSON, degrading");
            degraded_result()
        }
    }
}

/// The fixed result returned when the model reply cannot be parsed.
#[must_use]
pub fn degraded_result() -> DiagnosisResult {
    DiagnosisResult {
        diagnosis: "Unable to parse AI response. Please try again.".to_string(),
        confidence: 50,
        possible_causes: vec!["AI response parsing error".to_string()],
        steps: vec![DiagnosisStep {
            step: 1,
            title: "Try Again".to_string(),
            description: "Please rephrase your problem and try again.".to_string(),
            difficulty: Difficulty::Easy,
            estimated_time: "1 min".to_string(),
            commands: None,
            warnings: None,
        }],
        preventive_tips: vec!["Provide more specific details about your issue".to_string()],
    }
}
