//! Text completion.
//!
//! The RAG pipeline only ever needs a provider to turn a prompt into text —
//! either all at once or as a stream of chunks for server-sent events. This
//! module deliberately does not model tool calling, reasoning traces, or
//! structured generation: none of that is part of the external service
//! contract this workspace depends on.

pub mod message;

use std::future::Future;

use futures_core::Stream;
use futures_lite::StreamExt;
pub use message::{Message, Role};

/// Produces text completions from a prompt, optionally as a stream of chunks.
///
/// Implementations typically call out to a hosted chat/completion API
/// (`policyrag-providers`). A fixed-response mock is used in tests.
pub trait Generator: Send + Sync {
    /// The error type returned by this generator.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Completes a conversation, returning the full text at once.
    fn complete(
        &self,
        messages: &[Message],
        temperature: f32,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;

    /// Completes a conversation, returning the response as a stream of text
    /// chunks. Concatenating every chunk yields the same text [`complete`](Generator::complete)
    /// would return.
    fn stream(
        &self,
        messages: &[Message],
        temperature: f32,
    ) -> impl Stream<Item = Result<String, Self::Error>> + Send;
}

/// Convenience helper that builds a single system + user prompt.
#[must_use]
pub fn oneshot(system: impl Into<String>, user: impl Into<String>) -> Vec<Message> {
    vec![Message::system(system), Message::user(user)]
}

/// Collects every chunk of a [`Generator::stream`] output into one string.
///
/// # Errors
///
/// Returns the first stream error encountered while collecting chunks.
pub async fn collect_text<S, E>(stream: S) -> Result<String, E>
where
    S: Stream<Item = Result<String, E>>,
{
    futures_lite::pin!(stream);
    let mut result = String::new();
    while let Some(chunk) = stream.next().await {
        result.push_str(&chunk?);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    struct MockGenerator {
        reply: String,
    }

    impl Generator for MockGenerator {
        type Error = Infallible;

        async fn complete(&self, messages: &[Message], _temperature: f32) -> Result<String, Self::Error> {
            Ok(format!("{}:{}", messages.len(), self.reply))
        }

        fn stream(
            &self,
            _messages: &[Message],
            _temperature: f32,
        ) -> impl Stream<Item = Result<String, Self::Error>> + Send {
            let chunks: Vec<Result<String, Self::Error>> = self
                .reply
                .split_whitespace()
                .map(|w| Ok(format!("{w} ")))
                .collect();
            futures_lite::stream::iter(chunks)
        }
    }

    #[tokio::test]
    async fn complete_includes_message_count() {
        let generator = MockGenerator {
            reply: "answer".to_string(),
        };
        let messages = oneshot("system prompt", "question");
        let reply = generator.complete(&messages, 0.0).await.unwrap();
        assert_eq!(reply, "2:answer");
    }

    #[tokio::test]
    async fn stream_concatenates_to_same_text() {
        let generator = MockGenerator {
            reply: "한 둘 셋".to_string(),
        };
        let messages = oneshot("system", "user");
        let collected = collect_text(generator.stream(&messages, 0.2)).await.unwrap();
        assert_eq!(collected, "한 둘 셋 ");
    }
}
