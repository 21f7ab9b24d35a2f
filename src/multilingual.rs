//! Fan-out of the generation pipeline over several target languages.
//!
//! Languages are processed one after another in request order. A failure for one code
//! (today only an unsupported code can fail) is recorded under that code and never stops
//! the remaining languages.

use serde::{Serialize, Serializer};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::domain::{Difficulty, FlashcardSet, Language, QuizQuestionSet, Summary};
use crate::generator::ContentGenerator;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LanguageError {
  #[error("unsupported language code '{0}'")]
  Unsupported(String),
}

/// Outcome for one requested language code.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LanguageOutcome {
  Success {
    summary: Summary,
    quiz: QuizQuestionSet,
    flashcards: FlashcardSet,
  },
  Error {
    error: String,
  },
}

impl LanguageOutcome {
  pub fn is_success(&self) -> bool {
    matches!(self, LanguageOutcome::Success { .. })
  }
}

/// Per-language outcomes in request order. Serializes as a JSON object keyed by code.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LanguageResults(Vec<(String, LanguageOutcome)>);

impl LanguageResults {
  pub fn get(&self, code: &str) -> Option<&LanguageOutcome> {
    self.0.iter().find(|(k, _)| k == code).map(|(_, o)| o)
  }

  pub fn contains(&self, code: &str) -> bool {
    self.get(code).is_some()
  }

  pub fn keys(&self) -> impl Iterator<Item = &str> {
    self.0.iter().map(|(k, _)| k.as_str())
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &LanguageOutcome)> {
    self.0.iter().map(|(k, o)| (k.as_str(), o))
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  fn push(&mut self, code: String, outcome: LanguageOutcome) {
    self.0.push((code, outcome));
  }
}

impl Serialize for LanguageResults {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_map(self.0.iter().map(|(k, o)| (k, o)))
  }
}

pub fn resolve_language(code: &str) -> Result<Language, LanguageError> {
  Language::from_code(code).ok_or_else(|| LanguageError::Unsupported(code.trim().to_string()))
}

async fn generate_for(generator: &ContentGenerator, text: &str, code: &str, difficulty: Difficulty) -> Result<LanguageOutcome, LanguageError> {
  let lang = resolve_language(code)?;
  let summary = generator.summary(text, lang).await;
  let quiz = generator.quiz(text, difficulty, lang).await;
  let flashcards = generator.flashcards(text, lang).await;
  Ok(LanguageOutcome::Success { summary, quiz, flashcards })
}

/// Summary, quiz and flashcards for each requested language code.
/// Keys are the trimmed codes as requested; duplicates are generated once.
#[instrument(level = "info", skip(generator, text), fields(text_len = text.len(), languages = codes.len()))]
pub async fn generate_for_languages(
  generator: &ContentGenerator,
  text: &str,
  codes: &[String],
  difficulty: Difficulty,
) -> LanguageResults {
  let mut results = LanguageResults::default();
  for code in codes {
    let key = code.trim().to_string();
    if results.contains(&key) {
      continue;
    }
    let outcome = match generate_for(generator, text, &key, difficulty).await {
      Ok(outcome) => outcome,
      Err(e) => {
        warn!(target: "generation", code = %key, error = %e, "language skipped");
        LanguageOutcome::Error { error: e.to_string() }
      }
    };
    results.push(key, outcome);
  }
  let ok = results.iter().filter(|(_, o)| o.is_success()).count();
  info!(target: "generation", requested = codes.len(), succeeded = ok, "multilingual generation finished");
  results
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use super::*;
  use crate::config::Prompts;
  use crate::domain::QUIZ_LEN;

  const TEXT: &str = "A variable is a named storage location in memory. \
    A function refers to a reusable block of code. Loops repeat statements until a condition fails.";

  fn codes(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
  }

  #[tokio::test]
  async fn unsupported_code_does_not_abort_the_rest() {
    let gen = ContentGenerator::offline(Arc::new(Prompts::default()));
    let out = generate_for_languages(&gen, TEXT, &codes(&["hi", "xx"]), Difficulty::Medium).await;
    assert_eq!(out.len(), 2);
    match out.get("hi") {
      Some(LanguageOutcome::Success { summary, quiz, flashcards }) => {
        assert_eq!(summary.language, Language::Hi);
        assert_eq!(quiz.len(), QUIZ_LEN);
        assert_eq!(flashcards.language, Language::Hi);
      }
      other => panic!("expected success, got {:?}", other),
    }
    assert_eq!(out.get("xx"), Some(&LanguageOutcome::Error { error: "unsupported language code 'xx'".into() }));
  }

  #[tokio::test]
  async fn duplicates_are_generated_once() {
    let gen = ContentGenerator::offline(Arc::new(Prompts::default()));
    let out = generate_for_languages(&gen, TEXT, &codes(&["en", " en", "mr"]), Difficulty::Easy).await;
    assert_eq!(out.keys().collect::<Vec<_>>(), vec!["en", "mr"]);
  }

  #[tokio::test]
  async fn results_keep_request_order() {
    let gen = ContentGenerator::offline(Arc::new(Prompts::default()));
    let out = generate_for_languages(&gen, TEXT, &codes(&["mr", "hi", "en"]), Difficulty::Easy).await;
    assert_eq!(out.keys().collect::<Vec<_>>(), vec!["mr", "hi", "en"]);
    let json = serde_json::to_string(&out).unwrap();
    let pos = |code: &str| json.find(&format!("\"{}\":{{", code)).unwrap();
    assert!(pos("mr") < pos("hi") && pos("hi") < pos("en"));
  }

  #[test]
  fn outcome_serializes_with_status_tag() {
    let v = serde_json::to_value(LanguageOutcome::Error { error: "boom".into() }).unwrap();
    assert_eq!(v["status"], "error");
    assert_eq!(v["error"], "boom");
  }
}
