//! Defensive revalidation of structured backend responses.
//!
//! Structured-output mode should guarantee conforming payloads; this layer
//! does not trust the backend and re-checks anyway. On success the decoded
//! value is returned unchanged: no field defaulting, no silent coercion.

use crate::models::{AnalysisResult, OutreachContent};
use crate::{Error, Result};
use serde::de::DeserializeOwned;

/// Parse `raw` as JSON conforming to `T`.
///
/// `None` or blank text fails with `EmptyResponse`; unparseable JSON with
/// `MalformedPayload`; a missing or mistyped required field with
/// `SchemaViolation`.
pub fn validate<T: DeserializeOwned>(raw: Option<&str>) -> Result<T> {
    let text = raw
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(Error::EmptyResponse)?;
    let text = strip_json_fences(text);

    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| Error::MalformedPayload(e.to_string()))?;

    serde_json::from_value(value).map_err(|e| Error::SchemaViolation(e.to_string()))
}

/// Typed entry point for the analysis use case; also enforces the 0-100
/// score bound the integer type alone cannot express.
pub fn validate_analysis(raw: Option<&str>) -> Result<AnalysisResult> {
    let result: AnalysisResult = validate(raw)?;
    if result.match_score > 100 {
        return Err(Error::SchemaViolation(format!(
            "matchScore {} out of range 0-100",
            result.match_score
        )));
    }
    Ok(result)
}

/// Typed entry point for the outreach use case.
pub fn validate_outreach(raw: Option<&str>) -> Result<OutreachContent> {
    validate(raw)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from backend output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
