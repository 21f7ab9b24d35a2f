//! Pure acceptance checks for model output, one per artifact kind.
//!
//! Model text is loosely structured: JSON wrapped in prose or code fences, markdown bullets,
//! items with missing fields. These functions normalize what can be salvaged and reject the
//! rest, so the generator can fall back.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::client::GenerationError;
use crate::domain::{AnswerKey, Difficulty, Flashcard, QuizOptions, QuizQuestion, QUIZ_LEN};
use crate::seeds::{pad_flashcards, pad_questions};

const REDUNDANT_PHRASES: [&str; 11] = [
  "as mentioned", "as stated", "as discussed", "as we can see",
  "it is important to note", "it should be noted", "furthermore",
  "in addition", "moreover", "additionally", "also mentioned",
];

/// Minimum raw length of a model summary before it is even cleaned.
pub const SUMMARY_MIN_RAW_CHARS: usize = 100;
pub const SUMMARY_MIN_CHARS: usize = 100;
pub const SUMMARY_MAX_CHARS: usize = 200;
const SUMMARY_TERMS_CHECKED: usize = 5;
const SUMMARY_TERMS_REQUIRED: usize = 2;

/// Strip filler connectives, collapse whitespace within each line, drop markdown header
/// lines, and turn `-`/`*` bullets into `•`.
pub fn clean_summary(raw: &str) -> String {
  let mut text = raw.to_string();
  for phrase in REDUNDANT_PHRASES {
    text = text.replace(phrase, "");
  }

  text
    .lines()
    .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
    .filter(|line| !line.is_empty())
    .filter(|line| !(line.len() > 4 && line.starts_with("**") && line.ends_with("**")))
    .map(|line| match line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
      Some(rest) => format!("• {}", rest.trim()),
      None => line,
    })
    .collect::<Vec<_>>()
    .join("\n")
}

/// Structural gate for an English summary (already cleaned).
pub fn validate_summary(summary: &str, key_terms: &[String]) -> Result<(), GenerationError> {
  let len = summary.chars().count();
  if len < SUMMARY_MIN_CHARS {
    return Err(GenerationError::ValidationFailed(format!("summary too short ({} chars)", len)));
  }
  if !(summary.contains('•') || summary.contains("- ")) {
    return Err(GenerationError::ValidationFailed("summary has no bullet points".into()));
  }
  let lower = summary.to_lowercase();
  let hits = key_terms
    .iter()
    .take(SUMMARY_TERMS_CHECKED)
    .filter(|t| lower.contains(&t.to_lowercase()))
    .count();
  if hits < SUMMARY_TERMS_REQUIRED {
    return Err(GenerationError::ValidationFailed(format!("summary mentions {} of the top key terms", hits)));
  }
  if len > SUMMARY_MAX_CHARS {
    return Err(GenerationError::ValidationFailed(format!("summary too long ({} chars)", len)));
  }
  Ok(())
}

/// Summaries written in another language only need to say something.
pub fn validate_language_summary(raw: &str) -> Result<String, GenerationError> {
  let cleaned = clean_summary(raw);
  if cleaned.is_empty() {
    Err(GenerationError::ValidationFailed("empty language summary".into()))
  } else {
    Ok(cleaned)
  }
}

pub fn validate_translation(raw: &str) -> Result<String, GenerationError> {
  let text = raw.trim();
  if text.is_empty() {
    Err(GenerationError::ValidationFailed("empty translation".into()))
  } else {
    Ok(text.to_string())
  }
}

/// Free-form tutor and assistant replies only need to say something.
pub fn validate_reply(raw: &str) -> Result<String, GenerationError> {
  let text = raw.trim();
  if text.is_empty() {
    Err(GenerationError::ValidationFailed("empty reply".into()))
  } else {
    Ok(text.to_string())
  }
}

/// Slice from the first `[` to the last `]`.
pub fn extract_json_array(raw: &str) -> Result<&str, GenerationError> {
  match (raw.find('['), raw.rfind(']')) {
    (Some(start), Some(end)) if end > start => Ok(&raw[start..=end]),
    _ => Err(GenerationError::ParseFailed("no JSON array in model output".into())),
  }
}

fn parse_items(raw: &str) -> Result<Vec<Value>, GenerationError> {
  let slice = extract_json_array(raw)?;
  serde_json::from_str::<Vec<Value>>(slice).map_err(|e| GenerationError::ParseFailed(e.to_string()))
}

#[derive(Deserialize)]
struct RawQuestion {
  stem: String,
  options: QuizOptions,
  answer_key: AnswerKey,
  explanation: String,
  #[serde(default)]
  difficulty: Option<String>,
  #[serde(default)]
  topic: Option<String>,
}

impl RawQuestion {
  fn into_question(self, requested: Difficulty) -> Option<QuizQuestion> {
    let options = [&self.options.a, &self.options.b, &self.options.c, &self.options.d];
    if self.stem.trim().is_empty() || options.iter().any(|o| o.trim().is_empty()) {
      return None;
    }
    let difficulty = self.difficulty.and_then(|d| d.parse().ok()).unwrap_or(requested);
    let topic = self.topic.filter(|t| !t.trim().is_empty()).unwrap_or_else(|| "General".to_string());
    Some(QuizQuestion {
      stem: self.stem.trim().to_string(),
      options: self.options,
      answer_key: self.answer_key,
      explanation: self.explanation.trim().to_string(),
      difficulty,
      topic,
    })
  }
}

/// Stem phrasing expected at each difficulty.
fn difficulty_cues(difficulty: Difficulty) -> &'static [&'static str] {
  match difficulty {
    Difficulty::Easy => &["what is", "define", "which", "identify"],
    Difficulty::Medium => &["how", "why", "compare", "explain", "what happens"],
    Difficulty::Hard => &["analyze", "evaluate", "critique", "synthesize", "best approach"],
  }
}

/// Parse and normalize a model quiz into exactly `QUIZ_LEN` questions.
///
/// Items missing required fields are dropped; if none survive the output is rejected.
/// Questions phrased for the requested difficulty are placed first.
pub fn validate_quiz(raw: &str, difficulty: Difficulty, doc_type: &str) -> Result<Vec<QuizQuestion>, GenerationError> {
  let items = parse_items(raw)?;
  let total = items.len();
  let valid: Vec<QuizQuestion> = items
    .into_iter()
    .filter_map(|v| serde_json::from_value::<RawQuestion>(v).ok())
    .filter_map(|q| q.into_question(difficulty))
    .collect();

  if valid.is_empty() {
    return Err(GenerationError::ValidationFailed(format!("none of {} quiz items were usable", total)));
  }
  debug!(target: "generation", total, valid = valid.len(), "quiz items parsed");

  let cues = difficulty_cues(difficulty);
  let (mut ordered, rest): (Vec<_>, Vec<_>) = valid
    .into_iter()
    .partition(|q| {
      let stem = q.stem.to_lowercase();
      cues.iter().any(|c| stem.contains(c))
    });
  ordered.extend(rest);
  Ok(pad_questions(ordered, QUIZ_LEN, difficulty, doc_type))
}

#[derive(Deserialize)]
struct RawCard {
  front: String,
  back: String,
}

/// Parse a model deck, clamp card sides, and size it to 8..=12 cards.
pub fn validate_flashcards(raw: &str) -> Result<Vec<Flashcard>, GenerationError> {
  let items = parse_items(raw)?;
  let total = items.len();
  let cards: Vec<Flashcard> = items
    .into_iter()
    .filter_map(|v| serde_json::from_value::<RawCard>(v).ok())
    .filter(|c| !c.front.trim().is_empty() && !c.back.trim().is_empty())
    .map(|c| Flashcard::new(c.front, c.back))
    .collect();

  if cards.is_empty() {
    return Err(GenerationError::ValidationFailed(format!("none of {} flashcards were usable", total)));
  }
  debug!(target: "generation", total, valid = cards.len(), "flashcards parsed");
  Ok(pad_flashcards(cards))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{MAX_FLASHCARDS, MIN_FLASHCARDS};

  fn terms(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
  }

  #[test]
  fn cleanup_normalizes_bullets_and_drops_filler() {
    let raw = "**Summary**\nThis document covers loops.   Furthermore it is short.\n- First point\n* Second   point\n\n";
    let cleaned = clean_summary(raw);
    assert_eq!(cleaned, "This document covers loops. Furthermore it is short.\n• First point\n• Second point");
    assert_eq!(clean_summary("moreover loops repeat"), "loops repeat");
  }

  #[test]
  fn summary_gate_accepts_compact_bulleted_summary() {
    let s = "This document covers loops and conditions.\nKey Points:\n• Loops repeat code blocks\n• Conditions choose between branches\n• Both shape control flow";
    assert!(s.chars().count() >= 100 && s.chars().count() <= 200);
    assert!(validate_summary(s, &terms(&["loops", "conditions", "flow"])).is_ok());
  }

  #[test]
  fn summary_gate_rejects_missing_structure_or_terms() {
    let prose = "This document covers loops and conditions in a long paragraph without any bullet markers at all, just prose text.";
    assert!(matches!(validate_summary(prose, &terms(&["loops", "conditions"])), Err(GenerationError::ValidationFailed(_))));

    let off_topic = "This document covers something else entirely.\n• Point one about cooking\n• Point two about gardens\n• Point three about weather";
    assert!(validate_summary(off_topic, &terms(&["loops", "conditions"])).is_err());

    let long = format!("This document covers loops and conditions.\n• {}", "loops ".repeat(40));
    assert!(validate_summary(&long, &terms(&["loops", "conditions"])).is_err());
  }

  #[test]
  fn json_array_is_sliced_out_of_prose() {
    let raw = "Here you go:\n```json\n[{\"front\": \"a\", \"back\": \"b\"}]\n```";
    assert_eq!(extract_json_array(raw).unwrap(), "[{\"front\": \"a\", \"back\": \"b\"}]");
    assert!(matches!(extract_json_array("no array"), Err(GenerationError::ParseFailed(_))));
  }

  #[test]
  fn quiz_keeps_valid_items_cue_first_and_pads() {
    let raw = r#"[
      {"stem": "Why do loops terminate?", "options": {"A": "Condition fails", "B": "Never", "C": "Random", "D": "Compiler"}, "answer_key": "A", "explanation": "Loops stop when the condition fails."},
      {"stem": "What is a loop?", "options": {"A": "Repetition", "B": "Variable", "C": "Comment", "D": "Import"}, "answer_key": "a", "explanation": "A loop repeats code.", "difficulty": "easy", "topic": "Loops"},
      {"stem": "Missing options", "answer_key": "A", "explanation": "x"},
      {"stem": "Bad key", "options": {"A": "1", "B": "2", "C": "3", "D": "4"}, "answer_key": "E", "explanation": "x"}
    ]"#;
    let qs = validate_quiz(raw, Difficulty::Easy, "Programming/Computer Science Material").unwrap();
    assert_eq!(qs.len(), QUIZ_LEN);
    assert_eq!(qs[0].stem, "What is a loop?");
    assert_eq!(qs[1].stem, "Why do loops terminate?");
    assert_eq!(qs[1].difficulty, Difficulty::Easy);
    assert_eq!(qs[1].topic, "General");
    assert_eq!(qs[2].topic, "Document Type");
  }

  #[test]
  fn quiz_without_usable_items_is_rejected() {
    assert!(matches!(validate_quiz("[{\"stem\": \"x\"}]", Difficulty::Hard, "Educational Document"), Err(GenerationError::ValidationFailed(_))));
    assert!(matches!(validate_quiz("[not json]", Difficulty::Hard, "Educational Document"), Err(GenerationError::ParseFailed(_))));
  }

  #[test]
  fn quiz_overflow_is_truncated() {
    let item = r#"{"stem": "Evaluate X?", "options": {"A": "1", "B": "2", "C": "3", "D": "4"}, "answer_key": "B", "explanation": "e"}"#;
    let raw = format!("[{}]", vec![item; 14].join(","));
    let qs = validate_quiz(&raw, Difficulty::Hard, "Educational Document").unwrap();
    assert_eq!(qs.len(), QUIZ_LEN);
    assert!(qs.iter().all(|q| q.answer_key == AnswerKey::B));
  }

  #[test]
  fn flashcards_are_clamped_and_sized() {
    let raw = r#"[{"front": "Loop", "back": "Repeats a block of code."}, {"front": "", "back": "dropped"}, {"front": "x"}]"#;
    let cards = validate_flashcards(raw).unwrap();
    assert!((MIN_FLASHCARDS..=MAX_FLASHCARDS).contains(&cards.len()));
    assert_eq!(cards[0].front, "Loop");

    let many = format!("[{}]", vec![r#"{"front": "f", "back": "b"}"#; 20].join(","));
    assert_eq!(validate_flashcards(&many).unwrap().len(), MAX_FLASHCARDS);
    assert!(validate_flashcards("[]").is_err());
  }

  #[test]
  fn translation_and_language_summary_need_content() {
    assert_eq!(validate_translation("  Bonjour  ").unwrap(), "Bonjour");
    assert!(validate_translation("   ").is_err());
    assert!(validate_language_summary("\n\n").is_err());
    assert_eq!(validate_language_summary("यह सारांश है").unwrap(), "यह सारांश है");
  }

  #[test]
  fn replies_are_trimmed_and_must_be_non_empty() {
    assert_eq!(validate_reply("\n A loop repeats code. \n").unwrap(), "A loop repeats code.");
    assert!(matches!(validate_reply(" \t "), Err(GenerationError::ValidationFailed(_))));
  }
}
