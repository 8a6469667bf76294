//! Uniform response envelope wrapping every answered operation.

use serde::{Deserialize, Serialize};

/// Wraps operation output in a consistent `{data, message, status, error}` shape.
///
/// `None` fields are meant to be omitted when serialized for a client (a
/// caller embedding this in an HTTP response should skip `null` fields), but
/// the struct itself always carries them for ease of construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// The operation's result, present only on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human-readable status message.
    pub message: String,
    /// `true` on success, `false` on failure.
    pub status: bool,
    /// Error detail, present only on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Wall-clock time the operation took, in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<f64>,
}

impl<T> Envelope<T> {
    /// Wraps a successful result.
    #[must_use]
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            message: "Success".to_string(),
            status: true,
            error: None,
            execution_time_ms: None,
        }
    }

    /// Attaches an elapsed-time measurement.
    #[must_use]
    pub fn with_execution_time_ms(mut self, ms: f64) -> Self {
        self.execution_time_ms = Some(ms);
        self
    }

    /// Builds a failure envelope carrying `message` as the error detail.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            data: None,
            message: "Error".to_string(),
            status: false,
            error: Some(message),
            execution_time_ms: None,
        }
    }
}
