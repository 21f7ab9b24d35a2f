//! Minimal OpenAI-compatible client for our use-cases.
//!
//! We only call chat.completions and request plain text; JSON is coaxed out of the model
//! through the prompt and parsed loosely by `validate`. Calls are instrumented and log model
//! names, latencies, and response sizes (not contents).
//!
//! NOTE: We never log the API key.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::client::{ClientError, TextGenerator};
use crate::config::AiSettings;

#[derive(Clone)]
pub struct OpenAI {
  client: reqwest::Client,
  api_key: String,
  base_url: String,
  model: String,
  temperature: f32,
  max_tokens: Option<u32>,
  system: String,
}

impl OpenAI {
  /// Construct the client if the settings carry an API key; otherwise return None.
  /// The per-call deadline is enforced by the generator, not by reqwest.
  pub fn from_settings(settings: &AiSettings, system: &str) -> Option<Self> {
    let api_key = settings.api_key.clone()?;
    let client = match reqwest::Client::builder().build() {
      Ok(c) => c,
      Err(e) => {
        error!(target: "studygenie_backend", error = %e, "Failed to build HTTP client; AI backend disabled.");
        return None;
      }
    };
    Some(Self {
      client,
      api_key,
      base_url: settings.base_url.clone(),
      model: settings.model.clone(),
      temperature: settings.temperature,
      max_tokens: settings.max_tokens,
      system: system.to_string(),
    })
  }

  /// Plain-text chat completion.
  #[instrument(level = "info", skip(self, user), fields(model = %self.model, prompt_len = user.len()))]
  async fn chat_plain(&self, user: &str) -> Result<String, ClientError> {
    let url = format!("{}/chat/completions", self.base_url);
    let req = ChatCompletionRequest {
      model: self.model.clone(),
      messages: vec![
        ChatMessageReq { role: "system".into(), content: self.system.clone() },
        ChatMessageReq { role: "user".into(), content: user.into() },
      ],
      temperature: self.temperature,
      max_tokens: self.max_tokens,
    };

    let started = Instant::now();
    let res = self.client.post(&url)
      .header(USER_AGENT, "studygenie-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
      .json(&req).send().await?;

    if !res.status().is_success() {
      let status = res.status().as_u16();
      let body = res.text().await.unwrap_or_default();
      let message = extract_openai_error(&body).unwrap_or(body);
      return Err(ClientError::Http { status, message });
    }

    let body: ChatCompletionResponse = res.json().await?;
    if let Some(usage) = &body.usage {
      info!(prompt_tokens = ?usage.prompt_tokens, completion_tokens = ?usage.completion_tokens, total_tokens = ?usage.total_tokens, "OpenAI usage");
    }
    let text = body.choices.first()
      .and_then(|c| c.message.content.clone())
      .unwrap_or_default().trim().to_string();

    info!(elapsed_ms = %started.elapsed().as_millis(), response_len = text.len(), "OpenAI chat completed");
    if text.is_empty() {
      return Err(ClientError::EmptyResponse);
    }
    Ok(text)
  }
}

#[async_trait]
impl TextGenerator for OpenAI {
  fn model(&self) -> &str {
    &self.model
  }

  async fn generate(&self, prompt: &str) -> Result<String, ClientError> {
    self.chat_plain(prompt).await
  }
}

// --- Chat DTOs ---

#[derive(Serialize)]
struct ChatCompletionRequest {
  model: String,
  messages: Vec<ChatMessageReq>,
  temperature: f32,
  #[serde(skip_serializing_if = "Option::is_none")]
  max_tokens: Option<u32>,
}
#[derive(Serialize)]
struct ChatMessageReq { role: String, content: String }

#[derive(Deserialize)]
struct ChatCompletionResponse {
  choices: Vec<ChatChoice>,
  #[serde(default)] usage: Option<Usage>,
}
#[derive(Deserialize)]
struct ChatChoice { message: ChatMessageResp }
#[derive(Deserialize)]
struct ChatMessageResp { content: Option<String> }
#[derive(Deserialize)]
struct Usage {
  #[serde(default)] prompt_tokens: Option<u32>,
  #[serde(default)] completion_tokens: Option<u32>,
  #[serde(default)] total_tokens: Option<u32>,
}

/// Try to extract a clean error message from an OpenAI error body.
fn extract_openai_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  match serde_json::from_str::<EWrap>(body) {
    Ok(w) => Some(w.error.message),
    Err(_) => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn no_key_no_client() {
    assert!(OpenAI::from_settings(&AiSettings::default(), "sys").is_none());
  }

  #[test]
  fn client_carries_resolved_settings() {
    let settings = AiSettings { api_key: Some("sk-test".into()), model: "m1".into(), ..AiSettings::default() };
    let client = OpenAI::from_settings(&settings, "sys").unwrap();
    assert_eq!(client.model(), "m1");
    assert_eq!(client.base_url, settings.base_url);
    assert_eq!(client.max_tokens, None);
  }

  #[test]
  fn configured_max_tokens_reaches_the_request() {
    let settings = AiSettings { api_key: Some("sk-test".into()), max_tokens: Some(800), ..AiSettings::default() };
    let client = OpenAI::from_settings(&settings, "sys").unwrap();
    let req = ChatCompletionRequest {
      model: client.model.clone(),
      messages: vec![ChatMessageReq { role: "user".into(), content: "hi".into() }],
      temperature: client.temperature,
      max_tokens: client.max_tokens,
    };
    let v = serde_json::to_value(&req).unwrap();
    assert_eq!(v["max_tokens"], 800);
  }

  #[test]
  fn error_body_message_is_extracted() {
    let body = r#"{"error":{"message":"You exceeded your current quota","type":"insufficient_quota"}}"#;
    assert_eq!(extract_openai_error(body).as_deref(), Some("You exceeded your current quota"));
    assert_eq!(extract_openai_error("<html>bad gateway</html>"), None);
  }

  #[test]
  fn request_omits_unset_max_tokens() {
    let req = ChatCompletionRequest {
      model: "m".into(),
      messages: vec![ChatMessageReq { role: "user".into(), content: "hi".into() }],
      temperature: 0.4,
      max_tokens: None,
    };
    let v = serde_json::to_value(&req).unwrap();
    assert!(v.get("max_tokens").is_none());
    assert_eq!(v["messages"][0]["role"], "user");
  }
}
