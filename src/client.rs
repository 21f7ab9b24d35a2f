//! The external text-generation boundary.
//!
//! The pipeline only needs `generate(prompt) -> text`; anything that can answer a prompt
//! (the OpenAI-compatible HTTP client, a local model, a test double) plugs in here.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Failures of a single generation call. All of them are recoverable by the caller.
#[derive(Debug, Error)]
pub enum ClientError {
  #[error("no generation backend configured")]
  NotConfigured,
  #[error("transport error: {0}")]
  Transport(String),
  #[error("HTTP {status}: {message}")]
  Http { status: u16, message: String },
  #[error("generation timed out after {0:?}")]
  Timeout(Duration),
  #[error("model returned an empty response")]
  EmptyResponse,
}

impl From<reqwest::Error> for ClientError {
  fn from(e: reqwest::Error) -> Self {
    ClientError::Transport(e.to_string())
  }
}

/// Why a model-backed artifact was not produced. Every variant is matched into a fallback.
#[derive(Debug, Error)]
pub enum GenerationError {
  #[error("model invocation failed: {0}")]
  InvocationFailed(#[from] ClientError),
  #[error("could not parse model output: {0}")]
  ParseFailed(String),
  #[error("model output rejected: {0}")]
  ValidationFailed(String),
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
  /// Model identifier, for logs only.
  fn model(&self) -> &str;

  async fn generate(&self, prompt: &str) -> Result<String, ClientError>;
}

#[cfg(test)]
pub(crate) mod testing {
  use std::collections::VecDeque;
  use std::sync::Mutex;

  use super::*;

  /// Replays queued outcomes in order; once drained, every call fails like a quota error.
  pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<String, ClientError>>>,
    pub prompts: Mutex<Vec<String>>,
    delay: Option<Duration>,
  }

  impl ScriptedGenerator {
    pub fn new(replies: Vec<Result<String, ClientError>>) -> Self {
      Self { replies: Mutex::new(replies.into()), prompts: Mutex::new(Vec::new()), delay: None }
    }

    pub fn replying(text: &str) -> Self {
      Self::new(vec![Ok(text.to_string())])
    }

    pub fn quota_exceeded() -> Self {
      Self::new(Vec::new())
    }

    pub fn slow(delay: Duration, text: &str) -> Self {
      Self { delay: Some(delay), ..Self::replying(text) }
    }

    pub fn calls(&self) -> usize {
      self.prompts.lock().map(|p| p.len()).unwrap_or(0)
    }
  }

  #[async_trait]
  impl TextGenerator for ScriptedGenerator {
    fn model(&self) -> &str { "scripted" }

    async fn generate(&self, prompt: &str) -> Result<String, ClientError> {
      if let Ok(mut p) = self.prompts.lock() { p.push(prompt.to_string()); }
      if let Some(d) = self.delay { tokio::time::sleep(d).await; }
      let next = self.replies.lock().ok().and_then(|mut r| r.pop_front());
      next.unwrap_or_else(|| Err(ClientError::Http { status: 429, message: "Resource has been exhausted (e.g. check quota).".into() }))
    }
  }
}
