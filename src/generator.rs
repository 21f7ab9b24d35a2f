//! AI content generation with validation and deterministic fallback.
//!
//! Every public operation is infallible: the model path returns
//! `Result<_, GenerationError>` internally and any error is matched into the
//! corresponding fallback artifact built from the same document analysis.

use std::sync::Arc;
use std::time::Duration;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

use crate::analysis::DocumentAnalysis;
pub use crate::client::GenerationError;
use crate::client::{ClientError, TextGenerator};
use crate::config::{AgentConfig, AiSettings, GenerationOptions, Prompts};
use crate::domain::{
  AnswerKey, Difficulty, FlashcardSet, GeneratedArtifact, Language, Quality, QuizOptions, QuizQuestion,
  QuizQuestionSet, Summary,
};
use crate::fallback::{fallback_flashcards, fallback_quiz, fallback_summary, MIN_USABLE_CHARS};
use crate::openai::OpenAI;
use crate::prompt;
use crate::util::trunc_for_log;
use crate::validate;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
  Summary,
  Quiz,
  Flashcards,
}

/// One artifact to produce from a document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenerationRequest {
  pub kind: ArtifactKind,
  pub difficulty: Difficulty,
  pub language: Language,
}

impl GenerationRequest {
  pub fn new(kind: ArtifactKind, language: Language) -> Self {
    Self { kind, difficulty: Difficulty::default(), language }
  }

  pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
    self.difficulty = difficulty;
    self
  }
}

fn usable(text: &str) -> bool {
  text.trim().chars().count() >= MIN_USABLE_CHARS
}

/// Why `from_config` ended up without a backend.
fn offline_reason(settings: &AiSettings) -> &'static str {
  if settings.api_key.is_some() {
    "HTTP client could not be built"
  } else {
    "no OPENAI_API_KEY"
  }
}

#[derive(Clone)]
pub struct ContentGenerator {
  backend: Option<Arc<dyn TextGenerator>>,
  prompts: Arc<Prompts>,
  timeout: Duration,
  options: GenerationOptions,
}

impl ContentGenerator {
  pub fn new(
    backend: Option<Arc<dyn TextGenerator>>,
    prompts: Arc<Prompts>,
    timeout: Duration,
    options: GenerationOptions,
  ) -> Self {
    Self { backend, prompts, timeout, options }
  }

  /// A generator that never calls out; every artifact comes from the fallback path.
  pub fn offline(prompts: Arc<Prompts>) -> Self {
    Self::new(None, prompts, Duration::from_secs(crate::config::DEFAULT_TIMEOUT_SECS), GenerationOptions::default())
  }

  /// Build from resolved settings; without an API key the generator runs offline.
  pub fn from_config(settings: &AiSettings, cfg: &AgentConfig) -> Self {
    let prompts = Arc::new(cfg.prompts.clone());
    let backend = OpenAI::from_settings(settings, &prompts.system).map(|c| Arc::new(c) as Arc<dyn TextGenerator>);
    match &backend {
      Some(b) => info!(target: "studygenie_backend", base_url = %settings.base_url, model = %b.model(), timeout_secs = settings.timeout.as_secs(), "AI backend enabled."),
      None => info!(target: "studygenie_backend", reason = offline_reason(settings), "AI backend disabled. Using fallback generation."),
    }
    Self::new(backend, prompts, settings.timeout, cfg.generation)
  }

  pub fn is_online(&self) -> bool {
    self.backend.is_some()
  }

  pub fn model(&self) -> Option<&str> {
    self.backend.as_deref().map(|b| b.model())
  }

  pub fn prompts(&self) -> &Prompts {
    &self.prompts
  }

  pub fn options(&self) -> GenerationOptions {
    self.options
  }

  /// One bounded model call. A missing backend and an expired deadline are invocation errors.
  pub(crate) async fn invoke(&self, prompt: &str) -> Result<String, GenerationError> {
    let backend = self.backend.as_ref().ok_or(ClientError::NotConfigured)?;
    debug!(target: "generation", model = %backend.model(), prompt_len = prompt.len(), "invoking model");
    let reply = tokio::time::timeout(self.timeout, backend.generate(prompt))
      .await
      .map_err(|_| ClientError::Timeout(self.timeout))??;
    debug!(target: "generation", reply_len = reply.len(), reply = %trunc_for_log(&reply, 120), "model replied");
    Ok(reply)
  }

  fn report(kind: &str, e: &GenerationError) {
    match e {
      GenerationError::InvocationFailed(ClientError::NotConfigured) => {
        debug!(target: "generation", kind, "no AI backend; using fallback");
      }
      GenerationError::InvocationFailed(err) => {
        error!(target: "generation", kind, error = %err, "AI call failed; using fallback.");
      }
      other => {
        warn!(target: "generation", kind, error = %other, "AI output rejected; using fallback.");
      }
    }
  }

  async fn try_summary(&self, text: &str, lang: Language, analysis: &DocumentAnalysis) -> Result<String, GenerationError> {
    if lang != Language::En {
      let raw = self.invoke(&prompt::language_summary_prompt(&self.prompts, text, lang)).await?;
      return validate::validate_language_summary(&raw);
    }
    let raw = self.invoke(&prompt::summary_prompt(&self.prompts, text, analysis)).await?;
    let raw_len = raw.trim().chars().count();
    if raw_len <= validate::SUMMARY_MIN_RAW_CHARS {
      return Err(GenerationError::ValidationFailed(format!("summary too short ({} chars)", raw_len)));
    }
    let cleaned = validate::clean_summary(&raw);
    validate::validate_summary(&cleaned, &analysis.key_terms)?;
    Ok(cleaned)
  }

  #[instrument(level = "info", skip(self, text, lang), fields(text_len = text.len(), %lang))]
  pub async fn summary(&self, text: &str, lang: Language) -> Summary {
    let analysis = DocumentAnalysis::of(text);
    if !usable(text) {
      let mut s = fallback_summary(text, &analysis.key_terms, &analysis.topics);
      s.language = lang;
      return s;
    }
    match self.try_summary(text, lang, &analysis).await {
      Ok(body) => Summary::new(body, lang, Quality::Validated),
      Err(e) => {
        Self::report("summary", &e);
        let mut s = fallback_summary(text, &analysis.key_terms, &analysis.topics);
        s.language = lang;
        s
      }
    }
  }

  async fn try_quiz(&self, text: &str, difficulty: Difficulty, lang: Language, analysis: &DocumentAnalysis) -> Result<Vec<QuizQuestion>, GenerationError> {
    let raw = self.invoke(&prompt::quiz_prompt(&self.prompts, text, difficulty, lang, analysis)).await?;
    validate::validate_quiz(&raw, difficulty, analysis.document_type.label())
  }

  #[instrument(level = "info", skip(self, text, difficulty, lang), fields(text_len = text.len(), %difficulty, %lang))]
  pub async fn quiz(&self, text: &str, difficulty: Difficulty, lang: Language) -> QuizQuestionSet {
    let analysis = DocumentAnalysis::of(text);
    let attempt = if usable(text) {
      self.try_quiz(text, difficulty, lang, &analysis).await
    } else {
      Err(GenerationError::ValidationFailed("text too short to prompt".into()))
    };
    let mut set = match attempt {
      Ok(questions) => QuizQuestionSet { questions, difficulty, language: lang, quality: Quality::Validated },
      Err(e) => {
        Self::report("quiz", &e);
        let mut set = fallback_quiz(text, difficulty, &analysis.key_terms, &analysis.topics);
        set.language = lang;
        set
      }
    };
    if self.options.shuffle_quiz_options {
      let mut rng = rand::thread_rng();
      for q in &mut set.questions {
        shuffle_options(q, &mut rng);
      }
    }
    set
  }

  async fn try_flashcards(&self, text: &str, lang: Language) -> Result<FlashcardSet, GenerationError> {
    let raw = self.invoke(&prompt::flashcard_prompt(&self.prompts, text, lang)).await?;
    let cards = validate::validate_flashcards(&raw)?;
    Ok(FlashcardSet { cards, language: lang, quality: Quality::Validated })
  }

  #[instrument(level = "info", skip(self, text, lang), fields(text_len = text.len(), %lang))]
  pub async fn flashcards(&self, text: &str, lang: Language) -> FlashcardSet {
    let attempt = if usable(text) {
      self.try_flashcards(text, lang).await
    } else {
      Err(GenerationError::ValidationFailed("text too short to prompt".into()))
    };
    match attempt {
      Ok(set) => set,
      Err(e) => {
        Self::report("flashcards", &e);
        let mut set = fallback_flashcards(text);
        set.language = lang;
        set
      }
    }
  }

  /// Translate up to the prompt window of `text`; any failure returns the input unchanged.
  #[instrument(level = "info", skip(self, text, target), fields(text_len = text.len(), %target))]
  pub async fn translate(&self, text: &str, target: Language) -> String {
    if text.trim().is_empty() {
      return text.to_string();
    }
    let attempt = match self.invoke(&prompt::translate_prompt(&self.prompts, text, target)).await {
      Ok(raw) => validate::validate_translation(&raw),
      Err(e) => Err(e),
    };
    match attempt {
      Ok(t) => t,
      Err(e) => {
        Self::report("translate", &e);
        text.to_string()
      }
    }
  }

  pub async fn generate(&self, text: &str, request: GenerationRequest) -> GeneratedArtifact {
    match request.kind {
      ArtifactKind::Summary => GeneratedArtifact::Summary(self.summary(text, request.language).await),
      ArtifactKind::Quiz => GeneratedArtifact::Quiz(self.quiz(text, request.difficulty, request.language).await),
      ArtifactKind::Flashcards => GeneratedArtifact::Flashcards(self.flashcards(text, request.language).await),
    }
  }
}

/// Permute the options of one question, moving the answer key with the correct option.
fn shuffle_options<R: rand::Rng + ?Sized>(q: &mut QuizQuestion, rng: &mut R) {
  let correct = q.answer_key;
  let mut slots: Vec<(AnswerKey, String)> = AnswerKey::ALL
    .into_iter()
    .zip(q.options.clone().into_array())
    .collect();
  slots.shuffle(rng);
  if let Some(pos) = slots.iter().position(|(k, _)| *k == correct) {
    q.answer_key = AnswerKey::ALL[pos];
  }
  let [a, b, c, d] = [0, 1, 2, 3].map(|i| std::mem::take(&mut slots[i].1));
  q.options = QuizOptions::from_array([a, b, c, d]);
}
