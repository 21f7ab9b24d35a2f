//! Domain models: difficulty, document type, languages, and the generated study artifacts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::util::clamp_words;

/// Exact number of questions in every quiz.
pub const QUIZ_LEN: usize = 10;
pub const MIN_FLASHCARDS: usize = 8;
pub const MAX_FLASHCARDS: usize = 12;
pub const FLASHCARD_FRONT_MAX_WORDS: usize = 10;
pub const FLASHCARD_BACK_MAX_WORDS: usize = 25;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
  Easy,
  #[default]
  Medium,
  Hard,
}

impl Difficulty {
  pub fn as_str(&self) -> &'static str {
    match self {
      Difficulty::Easy => "easy",
      Difficulty::Medium => "medium",
      Difficulty::Hard => "hard",
    }
  }
}

impl fmt::Display for Difficulty {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Difficulty {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "easy" => Ok(Difficulty::Easy),
      "medium" => Ok(Difficulty::Medium),
      "hard" => Ok(Difficulty::Hard),
      other => Err(format!("unknown difficulty '{}'", other)),
    }
  }
}

/// Coarse classification of the uploaded material.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentType {
  #[serde(rename = "Programming/Computer Science Material")]
  Programming,
  #[serde(rename = "Mathematics Material")]
  Mathematics,
  #[serde(rename = "Physics Material")]
  Physics,
  #[serde(rename = "Engineering Material")]
  Engineering,
  #[serde(rename = "Academic Study Material")]
  Academic,
  #[serde(rename = "Educational Document")]
  Educational,
}

impl DocumentType {
  pub fn label(&self) -> &'static str {
    match self {
      DocumentType::Programming => "Programming/Computer Science Material",
      DocumentType::Mathematics => "Mathematics Material",
      DocumentType::Physics => "Physics Material",
      DocumentType::Engineering => "Engineering Material",
      DocumentType::Academic => "Academic Study Material",
      DocumentType::Educational => "Educational Document",
    }
  }
}

impl fmt::Display for DocumentType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

/// Languages the pipeline can target. Detection only ever yields En, Hi or Mr.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
  #[default]
  En,
  Hi,
  Mr,
  Es,
  Fr,
  De,
}

impl Language {
  pub const ALL: [Language; 6] =
    [Language::En, Language::Hi, Language::Mr, Language::Es, Language::Fr, Language::De];

  pub fn code(&self) -> &'static str {
    match self {
      Language::En => "en",
      Language::Hi => "hi",
      Language::Mr => "mr",
      Language::Es => "es",
      Language::Fr => "fr",
      Language::De => "de",
    }
  }

  pub fn name(&self) -> &'static str {
    match self {
      Language::En => "English",
      Language::Hi => "Hindi",
      Language::Mr => "Marathi",
      Language::Es => "Spanish",
      Language::Fr => "French",
      Language::De => "German",
    }
  }

  pub fn from_code(code: &str) -> Option<Self> {
    let code = code.trim().to_ascii_lowercase();
    Language::ALL.into_iter().find(|l| l.code() == code)
  }
}

impl fmt::Display for Language {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.code())
  }
}

/// Whether an artifact came from the model and passed validation, or was synthesized locally.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Quality {
  Validated,
  #[default]
  Fallback,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AnswerKey {
  A,
  B,
  C,
  D,
}

impl AnswerKey {
  pub const ALL: [AnswerKey; 4] = [AnswerKey::A, AnswerKey::B, AnswerKey::C, AnswerKey::D];

  pub fn as_str(&self) -> &'static str {
    match self {
      AnswerKey::A => "A",
      AnswerKey::B => "B",
      AnswerKey::C => "C",
      AnswerKey::D => "D",
    }
  }
}

impl TryFrom<String> for AnswerKey {
  type Error = String;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    match value.trim().to_ascii_uppercase().as_str() {
      "A" => Ok(AnswerKey::A),
      "B" => Ok(AnswerKey::B),
      "C" => Ok(AnswerKey::C),
      "D" => Ok(AnswerKey::D),
      other => Err(format!("answer_key must be one of A-D, got '{}'", other)),
    }
  }
}

impl From<AnswerKey> for String {
  fn from(k: AnswerKey) -> String {
    k.as_str().to_string()
  }
}

/// The four options of a question, serialized as `{"A": .., "B": .., "C": .., "D": ..}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOptions {
  #[serde(rename = "A")] pub a: String,
  #[serde(rename = "B")] pub b: String,
  #[serde(rename = "C")] pub c: String,
  #[serde(rename = "D")] pub d: String,
}

impl QuizOptions {
  pub fn new(a: impl Into<String>, b: impl Into<String>, c: impl Into<String>, d: impl Into<String>) -> Self {
    Self { a: a.into(), b: b.into(), c: c.into(), d: d.into() }
  }

  pub fn get(&self, key: AnswerKey) -> &str {
    match key {
      AnswerKey::A => &self.a,
      AnswerKey::B => &self.b,
      AnswerKey::C => &self.c,
      AnswerKey::D => &self.d,
    }
  }

  pub fn into_array(self) -> [String; 4] {
    [self.a, self.b, self.c, self.d]
  }

  pub fn from_array([a, b, c, d]: [String; 4]) -> Self {
    Self { a, b, c, d }
  }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
  pub stem: String,
  pub options: QuizOptions,
  pub answer_key: AnswerKey,
  pub explanation: String,
  pub difficulty: Difficulty,
  pub topic: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
  pub front: String,
  pub back: String,
}

impl Flashcard {
  /// Build a card, clamping both sides to the revision-card word limits.
  pub fn new(front: impl AsRef<str>, back: impl AsRef<str>) -> Self {
    Self {
      front: clamp_words(front.as_ref(), FLASHCARD_FRONT_MAX_WORDS),
      back: clamp_words(back.as_ref(), FLASHCARD_BACK_MAX_WORDS),
    }
  }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Summary {
  pub text: String,
  pub language: Language,
  #[serde(skip)]
  pub(crate) quality: Quality,
}

impl Summary {
  pub(crate) fn new(text: String, language: Language, quality: Quality) -> Self {
    Self { text, language, quality }
  }

  pub fn quality(&self) -> Quality { self.quality }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QuizQuestionSet {
  pub questions: Vec<QuizQuestion>,
  pub difficulty: Difficulty,
  pub language: Language,
  #[serde(skip)]
  pub(crate) quality: Quality,
}

impl QuizQuestionSet {
  pub fn quality(&self) -> Quality { self.quality }
  pub fn len(&self) -> usize { self.questions.len() }
  pub fn is_empty(&self) -> bool { self.questions.is_empty() }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FlashcardSet {
  pub cards: Vec<Flashcard>,
  pub language: Language,
  #[serde(skip)]
  pub(crate) quality: Quality,
}

impl FlashcardSet {
  pub fn quality(&self) -> Quality { self.quality }
  pub fn len(&self) -> usize { self.cards.len() }
  pub fn is_empty(&self) -> bool { self.cards.is_empty() }
}

/// One generated study item.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GeneratedArtifact {
  Summary(Summary),
  Quiz(QuizQuestionSet),
  Flashcards(FlashcardSet),
}

impl GeneratedArtifact {
  pub fn language(&self) -> Language {
    match self {
      GeneratedArtifact::Summary(s) => s.language,
      GeneratedArtifact::Quiz(q) => q.language,
      GeneratedArtifact::Flashcards(f) => f.language,
    }
  }

  pub fn quality(&self) -> Quality {
    match self {
      GeneratedArtifact::Summary(s) => s.quality,
      GeneratedArtifact::Quiz(q) => q.quality,
      GeneratedArtifact::Flashcards(f) => f.quality,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn answer_key_accepts_lowercase_and_rejects_others() {
    let k: AnswerKey = serde_json::from_str("\"b\"").unwrap();
    assert_eq!(k, AnswerKey::B);
    assert!(serde_json::from_str::<AnswerKey>("\"E\"").is_err());
  }

  #[test]
  fn question_serializes_with_wire_field_names() {
    let q = QuizQuestion {
      stem: "What is RAM?".into(),
      options: QuizOptions::new("Memory", "Disk", "CPU", "Bus"),
      answer_key: AnswerKey::A,
      explanation: "RAM is memory.".into(),
      difficulty: Difficulty::Easy,
      topic: "RAM".into(),
    };
    let v = serde_json::to_value(&q).unwrap();
    assert_eq!(v["options"]["A"], "Memory");
    assert_eq!(v["answer_key"], "A");
    assert_eq!(v["difficulty"], "easy");
  }

  #[test]
  fn quality_is_not_serialized() {
    let s = Summary::new("text".into(), Language::Hi, Quality::Validated);
    let v = serde_json::to_value(&s).unwrap();
    assert!(v.get("quality").is_none());
    assert_eq!(v["language"], "hi");
  }

  #[test]
  fn language_codes_round_trip() {
    for lang in Language::ALL {
      assert_eq!(Language::from_code(lang.code()), Some(lang));
    }
    assert_eq!(Language::from_code("xx"), None);
  }

  #[test]
  fn flashcard_clamps_long_sides() {
    let card = Flashcard::new("a b c d e f g h i j k l", "word ".repeat(40));
    assert_eq!(card.front.split_whitespace().count(), 10);
    assert_eq!(card.back.split_whitespace().count(), 25);
  }
}
