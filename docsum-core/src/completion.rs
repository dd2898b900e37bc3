//! HTTPS client for an OpenAI-style `chat/completions` endpoint.
//!
//! One POST per [`Completer::complete`] call, bearer-token auth, JSON body
//! `{"model", "messages"}`. The text of `choices[0].message.content` is
//! returned verbatim. Nothing is retried here.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::config::CompletionConfig;
use crate::contract::{Completer, CompletionError};
use crate::conversation::Conversation;

const USER_AGENT: &str = concat!("docsum/", env!("CARGO_PKG_VERSION"));

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a Conversation,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

pub struct CompletionClient {
    config: CompletionConfig,
    http: reqwest::Client,
}

impl CompletionClient {
    pub fn new(config: CompletionConfig) -> Result<Self, CompletionError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                error!(error = ?e, "Failed to build HTTP client");
                CompletionError::Transport(e)
            })?;
        info!(
            endpoint = %config.endpoint,
            model = %config.model,
            api_key_set = !config.api_key.is_empty(),
            "Initialised CompletionClient"
        );
        Ok(Self { config, http })
    }
}

#[async_trait]
impl Completer for CompletionClient {
    async fn complete(&self, conversation: &Conversation) -> Result<String, CompletionError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: conversation,
        };
        debug!(
            endpoint = %self.config.endpoint,
            turns = conversation.turns().len(),
            "Sending completion request"
        );

        let response = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .header(ACCEPT, "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, endpoint = %self.config.endpoint, "Completion request failed in transport");
                CompletionError::Transport(e)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!(error = ?e, status = status.as_u16(), "Failed to read completion response body");
            CompletionError::Transport(e)
        })?;

        if !status.is_success() {
            error!(status = status.as_u16(), body = %body, "Completion endpoint returned an error status");
            return Err(CompletionError::Http {
                status: status.as_u16(),
                body,
            });
        }

        extract_completion(&body)
    }
}

/// Pulls `choices[0].message.content` out of a raw response body.
fn extract_completion(body: &str) -> Result<String, CompletionError> {
    let parsed: ChatResponse = serde_json::from_str(body).map_err(|e| {
        error!(error = ?e, "Completion response did not match the expected shape");
        CompletionError::Parse(e.to_string())
    })?;

    match parsed.choices.into_iter().next() {
        Some(choice) => {
            debug!(chars = choice.message.content.len(), "Completion received");
            Ok(choice.message.content)
        }
        None => {
            error!("Completion response contained no choices");
            Err(CompletionError::Parse("response contained no choices".into()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_first_choice_content() {
        let body = r#"{"id":"c1","choices":[{"index":0,"message":{"role":"assistant","content":"first"}},{"index":1,"message":{"role":"assistant","content":"second"}}]}"#;
        assert_eq!(extract_completion(body).unwrap(), "first");
    }

    #[test]
    fn missing_or_empty_choices_is_a_parse_error() {
        for body in [
            r#"{"id":"c1"}"#,
            r#"{"choices":[]}"#,
            r#"{"choices":[{"message":{}}]}"#,
            "not json",
        ] {
            let err = extract_completion(body).unwrap_err();
            assert!(
                matches!(err, CompletionError::Parse(_)),
                "body {body:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn request_body_carries_model_and_messages() {
        let conversation = Conversation::summary_template().with_appended("doc");
        let request = ChatRequest {
            model: "llama-3.3-70b",
            messages: &conversation,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "llama-3.3-70b");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert!(json["messages"][1]["content"]
            .as_str()
            .unwrap()
            .ends_with("doc"));
    }
}
