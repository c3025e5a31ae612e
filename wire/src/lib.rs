//! Shared wire model for the `/analyze` HTTP exchange.
//!
//! This crate owns the JSON representation used by the panel core, the CLI
//! host and test backends. Response fields are all optional on the wire and
//! default to empty so a partially filled response still decodes; anything
//! that is not a JSON object is rejected at the boundary.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Error returned by [`decode_response`].
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The body is not valid JSON, or a field has the wrong JSON type.
    #[error("failed to decode analysis response: {0}")]
    Decode(#[from] serde_json::Error),
    /// The body is valid JSON but not an object.
    #[error("analysis response is not a JSON object (got {0})")]
    NotAnObject(&'static str),
}

// =============================================================================
// REQUEST
// =============================================================================

/// A staged file sent alongside the code under analysis.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    /// Display name (base name of the path).
    pub file_name: String,
    /// Full UTF-8 file content.
    pub content: String,
    /// Identity of the attachment; at most one attachment per path.
    pub file_path: String,
}

impl Attachment {
    #[must_use]
    pub fn new(content: impl Into<String>, file_name: impl Into<String>, file_path: impl Into<String>) -> Self {
        Self { file_name: file_name.into(), content: content.into(), file_path: file_path.into() }
    }
}

/// Body of `POST /analyze`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub code: String,
    pub purpose: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

// =============================================================================
// RESPONSE
// =============================================================================

/// Top-level or per-file outcome reported by the analysis service.
///
/// Only `"error"` is meaningful to consumers; any other string, a missing
/// field or `null` decodes as a non-error status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    #[default]
    Ok,
    Error,
    /// A status string the client does not recognise.
    Other,
}

impl ResponseStatus {
    #[must_use]
    pub fn is_error(self) -> bool {
        self == Self::Error
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Error => "error",
            Self::Other => "other",
        }
    }
}

impl<'de> Deserialize<'de> for ResponseStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(match raw.as_deref() {
            None | Some("ok") => Self::Ok,
            Some("error") => Self::Error,
            Some(_) => Self::Other,
        })
    }
}

/// A fix suggestion is either a plain string or an object carrying `text`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FixSuggestion {
    Text(String),
    Structured {
        #[serde(default)]
        text: Option<String>,
    },
}

impl FixSuggestion {
    /// The suggestion text before any normalization.
    #[must_use]
    pub fn raw_text(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Structured { text } => text.as_deref().unwrap_or_default(),
        }
    }

    #[must_use]
    pub fn is_structured(&self) -> bool {
        matches!(self, Self::Structured { .. })
    }

    /// `true` when there is suggestion text to show.
    #[must_use]
    pub fn is_present(&self) -> bool {
        !self.raw_text().is_empty()
    }
}

/// Analysis outcome for one attached file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAnalysis {
    #[serde(rename = "fileName", default, deserialize_with = "null_as_default")]
    pub file_name: String,
    #[serde(default)]
    pub status: ResponseStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix_suggestion: Option<FixSuggestion>,
}

impl FileAnalysis {
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.status.is_error()
    }
}

/// Structured result returned by `POST /analyze`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    #[serde(default)]
    pub status: ResponseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix_suggestion: Option<FixSuggestion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refactored_code: Option<String>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub file_analysis: Vec<FileAnalysis>,
}

impl AnalysisResponse {
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.status.is_error()
    }

    /// `true` when at least one attached file was reported as an error.
    #[must_use]
    pub fn has_file_errors(&self) -> bool {
        self.file_analysis.iter().any(FileAnalysis::is_error)
    }
}

/// Decode a response body.
///
/// # Errors
///
/// Returns [`WireError::Decode`] for invalid JSON or mistyped fields and
/// [`WireError::NotAnObject`] when the top-level value is not an object.
pub fn decode_response(bytes: &[u8]) -> Result<AnalysisResponse, WireError> {
    let value: Value = serde_json::from_slice(bytes)?;
    if !value.is_object() {
        return Err(WireError::NotAnObject(json_kind(&value)));
    }
    Ok(serde_json::from_value(value)?)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
