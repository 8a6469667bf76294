use futures_core::Stream;
use policyrag_core::llm::{Generator, Message, Role};
use reqwest::Response;
use serde::{Deserialize, Serialize};

use crate::{client::Provider, error::ProviderError};

impl Generator for Provider {
    type Error = ProviderError;

    async fn complete(&self, messages: &[Message], temperature: f32) -> Result<String, Self::Error> {
        let request = chat_request(self, messages, temperature, false);
        let response = self
            .http
            .post(self.config().chat_completions_url())
            .header(reqwest::header::AUTHORIZATION, self.bearer())
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(map_error_status(response).await);
        }

        let body: ChatCompletionResponse = response.json().await?;
        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ProviderError::Api("completion response had no choices".into()))
    }

    fn stream(
        &self,
        messages: &[Message],
        temperature: f32,
    ) -> impl Stream<Item = Result<String, Self::Error>> + Send {
        let request = chat_request(self, messages, temperature, true);
        let provider = self.clone();

        async_stream::try_stream! {
            let response = provider
                .http
                .post(provider.config().chat_completions_url())
                .header(reqwest::header::AUTHORIZATION, provider.bearer())
                .json(&request)
                .send()
                .await?;

            if !response.status().is_success() {
                Err(map_error_status(response).await)?;
                return;
            }

            let mut buffer = String::new();
            use futures_lite::StreamExt;
            let mut bytes_stream = response.bytes_stream();

            while let Some(chunk) = bytes_stream.next().await {
                let chunk = chunk?;
                buffer.push_str(&String::from_utf8_lossy(&chunk));

                while let Some(pos) = buffer.find("\n\n") {
                    let event = buffer[..pos].to_string();
                    buffer.drain(..pos + 2);
                    if let Some(text) = parse_sse_event(&event)? {
                        yield text;
                    }
                }
            }
        }
    }
}

fn parse_sse_event(event: &str) -> Result<Option<String>, ProviderError> {
    for line in event.lines() {
        let Some(data) = line.strip_prefix("data: ") else {
            continue;
        };
        if data == "[DONE]" {
            return Ok(None);
        }
        let chunk: ChatCompletionChunk = serde_json::from_str(data)?;
        let text = chunk
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta.content);
        return Ok(text);
    }
    Ok(None)
}

pub(crate) async fn map_error_status(response: Response) -> ProviderError {
    let status = response.status();
    if status.as_u16() == 429 {
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<u64>().ok())
            .map(std::time::Duration::from_secs);
        return ProviderError::RateLimit { retry_after };
    }
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "<unreadable body>".to_string());
    ProviderError::ServerError {
        status: status.as_u16(),
        message,
    }
}

fn chat_request(
    provider: &Provider,
    messages: &[Message],
    temperature: f32,
    stream: bool,
) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: provider.config().completion_model.clone(),
        messages: messages.iter().map(ChatMessage::from).collect(),
        temperature,
        stream,
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

impl From<&Message> for ChatMessage {
    fn from(message: &Message) -> Self {
        let role = match message.role {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        Self {
            role,
            content: message.content.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionMessage,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChunk {
    choices: Vec<ChatCompletionChunkChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChunkChoice {
    delta: ChatCompletionDelta,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionDelta {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_message_maps_role() {
        let message = Message::system("be concise");
        let chat: ChatMessage = (&message).into();
        assert_eq!(chat.role, "system");
        assert_eq!(chat.content, "be concise");
    }

    #[test]
    fn parses_done_sentinel_as_end_of_stream() {
        let event = "data: [DONE]";
        assert!(parse_sse_event(event).unwrap().is_none());
    }

    #[test]
    fn parses_delta_chunk() {
        let event = r#"data: {"choices":[{"delta":{"content":"hi"}}]}"#;
        assert_eq!(parse_sse_event(event).unwrap(), Some("hi".to_string()));
    }
}
