//! Server-sent event framing for streamed answers.
//!
//! Every frame is a JSON object `{"text": "...", "done": bool}`, mirroring
//! how streaming responses are framed elsewhere in this workspace: text
//! chunks carry `done: false`, and a final empty-text chunk with `done: true`
//! signals the end of the stream. If generation failed mid-stream, the
//! terminal frame also carries an `error` field naming the failure.

use serde::Serialize;

/// One SSE data frame.
#[derive(Debug, Serialize)]
pub struct StreamFrame {
    /// Text chunk. Empty on the terminal frame.
    pub text: String,
    /// `true` only on the terminal frame.
    pub done: bool,
    /// Set on the terminal frame only when generation failed mid-stream.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StreamFrame {
    /// A non-terminal chunk carrying `text`.
    #[must_use]
    pub fn chunk(text: String) -> Self {
        Self {
            text,
            done: false,
            error: None,
        }
    }

    /// The terminal frame for a stream that completed without error.
    #[must_use]
    pub fn done() -> Self {
        Self {
            text: String::new(),
            done: true,
            error: None,
        }
    }

    /// The terminal frame for a stream that failed partway through.
    #[must_use]
    pub fn done_with_error(error: String) -> Self {
        Self {
            text: String::new(),
            done: true,
            error: Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_frame_is_not_done() {
        let frame = StreamFrame::chunk("hello".to_string());
        assert!(!frame.done);
        assert_eq!(frame.text, "hello");
        assert!(frame.error.is_none());
    }

    #[test]
    fn done_frame_has_empty_text_and_no_error() {
        let frame = StreamFrame::done();
        assert!(frame.done);
        assert!(frame.text.is_empty());
        assert!(frame.error.is_none());
    }

    #[test]
    fn done_with_error_carries_error_detail() {
        let frame = StreamFrame::done_with_error("timeout".to_string());
        assert!(frame.done);
        assert_eq!(frame.error.as_deref(), Some("timeout"));
    }
}
