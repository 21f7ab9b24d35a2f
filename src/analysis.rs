//! Text analysis heuristics over extracted document text.
//!
//! Everything here is pure and total: empty input yields empty output (or the generic
//! document type), nothing panics, nothing is cached between calls.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::domain::{DocumentType, Language};
use crate::language::detect_language;

const MAX_KEY_TERMS: usize = 15;
const MAX_TOPICS: usize = 10;
const TOPIC_MAX_CHARS: usize = 50;

const STOP_WORDS: &[&str] = &[
  "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
  "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do", "does", "did",
  "will", "would", "could", "should", "may", "might", "can", "this", "that", "these", "those",
  "document", "content", "material", "information", "text", "chapter", "section", "page",
];

/// Stop words for search keywords: the base set plus filler nouns/verbs of study material.
const SEARCH_STOP_WORDS: &[&str] = &[
  "summary", "study", "learning", "book", "pdf", "file", "contains", "includes", "covers",
  "discusses", "explains", "describes", "shows", "presents", "provides", "important",
  "key", "main", "basic", "essential", "fundamental", "concept", "concepts", "topic", "topics",
];

const TECHNICAL_VOCABULARY: &[&str] =
  &["programming", "algorithm", "function", "variable", "loop", "condition", "statement"];

const TOPIC_PATTERNS: [&str; 6] = [
  r"(?i)chapter \d+[:\-]?\s*([^\n]+)",
  r"(?i)unit \d+[:\-]?\s*([^\n]+)",
  r"(?i)section \d+[:\-]?\s*([^\n]+)",
  r"(?i)topic[:\-]?\s*([^\n]+)",
  r"(?i)introduction to ([^\n]+)",
  r"(?i)overview of ([^\n]+)",
];

/// Keyword families in priority order; the first family with any hit wins.
const DOCUMENT_FAMILIES: [(DocumentType, &[&str]); 5] = [
  (
    DocumentType::Programming,
    &["programming", "algorithm", "code", "function", "variable", "loop", "java", "python", "c++"],
  ),
  (
    DocumentType::Mathematics,
    &["equation", "formula", "theorem", "proof", "mathematics", "calculus", "algebra"],
  ),
  (
    DocumentType::Physics,
    &["physics", "force", "energy", "momentum", "wave", "particle", "quantum"],
  ),
  (
    DocumentType::Engineering,
    &["engineering", "circuit", "design", "system", "microprocessor", "pin diagram"],
  ),
  (
    DocumentType::Academic,
    &["chapter", "unit", "lesson", "study", "exam", "course"],
  ),
];

fn topic_patterns() -> &'static [Regex] {
  static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
  PATTERNS.get_or_init(|| TOPIC_PATTERNS.iter().filter_map(|p| Regex::new(p).ok()).collect())
}

fn is_stop_word(word: &str) -> bool {
  STOP_WORDS.contains(&word)
}

fn is_search_stop_word(word: &str) -> bool {
  is_stop_word(word) || SEARCH_STOP_WORDS.contains(&word)
}

/// At least one cased letter and no lowercase ones (acronyms like CPU, VCC).
fn is_upper_word(word: &str) -> bool {
  word.chars().any(char::is_alphabetic) && !word.chars().any(char::is_lowercase)
}

fn has_digit(word: &str) -> bool {
  word.chars().any(|c| c.is_ascii_digit())
}

/// Replace everything except ASCII alphanumerics, whitespace and the `keep` chars with spaces.
fn scrub(text: &str, keep: &[char]) -> String {
  text
    .chars()
    .map(|c| if c.is_ascii_alphanumeric() || c.is_whitespace() || keep.contains(&c) { c } else { ' ' })
    .collect()
}

/// Frequency ranking that keeps first-seen order among equal counts.
#[derive(Default)]
struct Tally {
  order: Vec<(String, usize)>,
  index: HashMap<String, usize>,
}

impl Tally {
  fn add(&mut self, item: String) {
    if let Some(&i) = self.index.get(&item) {
      self.order[i].1 += 1;
    } else {
      self.index.insert(item.clone(), self.order.len());
      self.order.push((item, 1));
    }
  }

  fn most_common(mut self, n: usize) -> Vec<String> {
    // sort_by is stable, so ties stay in first-seen order
    self.order.sort_by(|a, b| b.1.cmp(&a.1));
    self.order.into_iter().take(n).map(|(item, _)| item).collect()
  }
}

/// Technical key terms, most frequent first (max 15).
///
/// A token qualifies when it is an acronym, carries a digit, or belongs to a small
/// programming vocabulary. Tokens keep their original spelling.
pub fn extract_key_terms(text: &str) -> Vec<String> {
  if text.is_empty() {
    return Vec::new();
  }
  let cleaned = scrub(text, &['-', '_']);
  let mut tally = Tally::default();
  for word in cleaned.split_whitespace() {
    let lower = word.to_lowercase();
    if lower.chars().count() <= 2 || is_stop_word(&lower) {
      continue;
    }
    if is_upper_word(word) || has_digit(word) || TECHNICAL_VOCABULARY.contains(&lower.as_str()) {
      tally.add(word.to_string());
    }
  }
  tally.most_common(MAX_KEY_TERMS)
}

/// Main topics from structural headers, or heading-like lines when no header matches (max 10).
pub fn extract_main_topics(text: &str) -> Vec<String> {
  if text.is_empty() {
    return Vec::new();
  }
  let mut topics: Vec<String> = Vec::new();
  for re in topic_patterns() {
    for caps in re.captures_iter(text) {
      if let Some(m) = caps.get(1) {
        let topic = m.as_str().trim();
        topics.push(crate::util::take_chars(topic, TOPIC_MAX_CHARS).to_string());
      }
    }
  }

  if topics.is_empty() {
    for line in text.lines() {
      let line = line.trim();
      let len = line.chars().count();
      if len > 10 && len < 100 && (is_upper_word(line) || line.matches(' ').count() < 8) {
        topics.push(line.to_string());
      }
    }
  }

  topics.truncate(MAX_TOPICS);
  topics
}

pub fn detect_document_type(text: &str) -> DocumentType {
  if text.is_empty() {
    return DocumentType::Educational;
  }
  let lower = text.to_lowercase();
  DOCUMENT_FAMILIES
    .iter()
    .find(|(_, words)| words.iter().any(|w| lower.contains(w)))
    .map(|(ty, _)| *ty)
    .unwrap_or(DocumentType::Educational)
}

/// Short keyword list suited for searching external learning resources.
///
/// Priority goes to technical codes (digits, acronyms), then to frequent two-word
/// phrases, and the rest is filled with frequent single words.
pub fn extract_search_keywords(text: &str, top_n: usize) -> Vec<String> {
  if text.is_empty() || top_n == 0 {
    return Vec::new();
  }
  let cleaned = scrub(text, &['-']);
  let words: Vec<&str> = cleaned.split_whitespace().collect();

  let mut phrases = Tally::default();
  for pair in words.windows(2) {
    let (first, second) = (pair[0].to_lowercase(), pair[1].to_lowercase());
    if first.chars().count() > 2
      && second.chars().count() > 2
      && !is_search_stop_word(&first)
      && !is_search_stop_word(&second)
    {
      phrases.add(format!("{} {}", first, second));
    }
  }

  let mut singles = Tally::default();
  let mut priority = Tally::default();
  for word in &words {
    let lower = word.to_lowercase();
    if lower.chars().count() > 3
      && !is_search_stop_word(&lower)
      && lower.chars().all(char::is_alphanumeric)
      && !lower.chars().all(|c| c.is_ascii_digit())
    {
      singles.add(lower.clone());
    }
    if word.chars().count() >= 2 && (has_digit(word) || is_upper_word(word)) {
      priority.add(lower);
    }
  }

  let mut out: Vec<String> = Vec::new();
  for kw in priority.most_common(2) {
    if !out.contains(&kw) { out.push(kw); }
  }
  for kw in phrases.most_common(2) {
    if out.len() < top_n && !out.contains(&kw) { out.push(kw); }
  }
  for kw in singles.most_common(top_n) {
    if out.len() < top_n && !out.contains(&kw) { out.push(kw); }
  }
  out.truncate(top_n);
  out
}

/// Everything the pipeline derives from a document before prompting.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DocumentAnalysis {
  pub key_terms: Vec<String>,
  pub topics: Vec<String>,
  pub document_type: DocumentType,
  pub language: Language,
  pub search_keywords: Vec<String>,
}

impl DocumentAnalysis {
  pub fn of(text: &str) -> Self {
    Self {
      key_terms: extract_key_terms(text),
      topics: extract_main_topics(text),
      document_type: detect_document_type(text),
      language: detect_language(text),
      search_keywords: extract_search_keywords(text, 5),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const CONTROL_SAMPLE: &str = "Control statements decide the flow of a program. \
    An if-else statement chooses between two branches. \
    Loops such as for and while repeat a block of code until a condition fails.";

  #[test]
  fn empty_input_yields_nothing() {
    assert!(extract_key_terms("").is_empty());
    assert!(extract_main_topics("").is_empty());
    assert!(extract_search_keywords("", 5).is_empty());
    assert_eq!(detect_document_type(""), DocumentType::Educational);
  }

  #[test]
  fn key_terms_rank_by_frequency_then_first_seen() {
    let text = "The CPU talks to RAM. The 8085 has a CPU. RAM and ROM. CPU again.";
    assert_eq!(extract_key_terms(text), vec!["CPU", "RAM", "8085", "ROM"]);
  }

  #[test]
  fn key_terms_skip_plain_words_and_short_tokens() {
    let text = "we go to the market; IO is short but loop counts. A loop variable!";
    assert_eq!(extract_key_terms(text), vec!["loop", "variable"]);
  }

  #[test]
  fn key_terms_are_capped() {
    let text: String = (0..40).map(|i| format!("X{} ", i)).collect();
    assert_eq!(extract_key_terms(&text).len(), 15);
  }

  #[test]
  fn structural_topics_are_captured() {
    let text = "Chapter 1: Introduction to Loops\nsome body text\nUnit 2: Arrays and Strings\n";
    let topics = extract_main_topics(text);
    assert_eq!(topics[0], "Introduction to Loops");
    assert!(topics.contains(&"Arrays and Strings".to_string()));
    assert!(topics.contains(&"Loops".to_string()));
  }

  #[test]
  fn topics_are_truncated_to_fifty_chars() {
    let long = format!("Overview of {}", "x".repeat(80));
    let topics = extract_main_topics(&long);
    assert_eq!(topics[0].chars().count(), 50);
  }

  #[test]
  fn heading_like_lines_are_used_when_no_header_matches() {
    let text = "DATA STRUCTURES\nshort\nThis is a very long line of prose that keeps going with many many words in it.\nStacks and Queues";
    let topics = extract_main_topics(text);
    assert_eq!(topics, vec!["DATA STRUCTURES".to_string(), "Stacks and Queues".to_string()]);
  }

  #[test]
  fn control_statement_sample_is_programming() {
    assert_eq!(detect_document_type(CONTROL_SAMPLE), DocumentType::Programming);
    assert_eq!(detect_document_type(CONTROL_SAMPLE).label(), "Programming/Computer Science Material");
  }

  #[test]
  fn document_families_follow_priority() {
    assert_eq!(detect_document_type("The theorem and its proof"), DocumentType::Mathematics);
    assert_eq!(detect_document_type("Kinetic energy and momentum"), DocumentType::Physics);
    assert_eq!(detect_document_type("The 8085 microprocessor pin diagram"), DocumentType::Engineering);
    assert_eq!(detect_document_type("Lesson plan for the exam"), DocumentType::Academic);
    assert_eq!(detect_document_type("Poems about rivers"), DocumentType::Educational);
  }

  #[test]
  fn search_keywords_prefer_technical_codes() {
    let text = "The 8085 microprocessor pin diagram shows VCC and VSS. \
      The 8085 microprocessor pin diagram is used in labs. VCC supplies power.";
    let kws = extract_search_keywords(text, 5);
    assert_eq!(kws[0], "8085");
    assert_eq!(kws[1], "vcc");
    assert!(kws.contains(&"8085 microprocessor".to_string()));
    assert!(kws.len() <= 5);
  }
}
