//! Deterministic, network-free study content built from text-analysis output.
//!
//! These are the artifacts served whenever the model is unavailable or its output is
//! rejected. Every function is total and honours the artifact shape invariants
//! (10 questions, 8..=12 cards).

use crate::analysis::{detect_document_type, extract_key_terms, extract_main_topics};
use crate::domain::{
  AnswerKey, Difficulty, Flashcard, FlashcardSet, Language, Quality, QuizOptions, QuizQuestion,
  QuizQuestionSet, Summary, QUIZ_LEN,
};
use crate::language::{detect_language, what_is_question};
use crate::seeds::{
  pad_flashcards, pad_questions, short_text_flashcards, topic_bonus_flashcards, SHORT_TEXT_SUMMARY,
};
use crate::util::{ellipsize, sentences, take_chars, word_count};

/// Below this many chars (after trimming) the text is not worth analyzing.
pub const MIN_USABLE_CHARS: usize = 50;

const DEFINITION_MARKERS: [&str; 6] =
  ["is defined as", "refers to", "means", "is called", "is known as", "definition"];
const PROCESS_MARKERS: [&str; 6] = ["process", "method", "procedure", "algorithm", "steps", "approach"];
const APPLICATION_MARKERS: [&str; 5] = ["application", "example", "used for", "practice", "implementation"];
const SUMMARY_TARGET_WORDS: usize = 100;
const MAX_KEY_POINTS: usize = 4;

const CONCEPT_STOP_WORDS: [&str; 8] = ["the", "this", "that", "these", "those", "and", "but", "for"];

fn usable(text: &str) -> bool {
  text.trim().chars().count() >= MIN_USABLE_CHARS
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
  needles.iter().any(|n| haystack.contains(n))
}

/// Definition cue with whole-word matching for the short copulas.
fn has_definition_cue(sentence_lower: &str, extra: &[&str]) -> bool {
  let padded = format!(" {} ", sentence_lower);
  padded.contains(" is ") || padded.contains(" are ") || contains_any(sentence_lower, extra)
}

fn first_with<'a>(sents: &'a [String], limit: usize, markers: &[&str]) -> Option<&'a String> {
  sents.iter().take(limit).find(|s| contains_any(&s.to_lowercase(), markers))
}

/// Structured summary: an introduction sentence followed by bullet key points.
pub fn fallback_summary(text: &str, key_terms: &[String], topics: &[String]) -> Summary {
  if !usable(text) {
    return Summary::new(SHORT_TEXT_SUMMARY.to_string(), Language::En, Quality::Fallback);
  }

  let key_terms = if key_terms.is_empty() { extract_key_terms(text) } else { key_terms.to_vec() };
  let topics = if topics.is_empty() { extract_main_topics(text) } else { topics.to_vec() };
  let text = text.trim();
  let sents = sentences(text, 20);
  let doc_type = detect_document_type(text).label().to_lowercase();

  let mut intro = match topics.first().filter(|t| !t.is_empty()) {
    Some(topic) => format!("This {} provides comprehensive coverage of {}", doc_type, topic.to_lowercase()),
    None => format!("This {} covers essential concepts and principles", doc_type),
  };
  if key_terms.is_empty() {
    intro.push_str(" with detailed explanations and practical applications.");
  } else {
    let top: Vec<&str> = key_terms.iter().take(3).map(String::as_str).collect();
    intro.push_str(&format!(", focusing on {} and related technical concepts.", top.join(", ").to_lowercase()));
  }

  let mut points: Vec<String> = Vec::new();
  if let Some(s) = first_with(&sents, 20, &DEFINITION_MARKERS) {
    points.push(format!("Defines key concepts: {}", take_chars(s, 80)));
  }
  if key_terms.len() >= 4 {
    points.push(format!("Covers technical topics including {}", key_terms[..4].join(", ")));
  } else if !key_terms.is_empty() {
    points.push(format!("Explores important concepts: {}", key_terms.join(", ")));
  }
  if let Some(s) = first_with(&sents, 15, &PROCESS_MARKERS) {
    points.push(format!("Explains methodologies: {}", take_chars(s, 70)));
  }
  if let Some(s) = first_with(&sents, 15, &APPLICATION_MARKERS) {
    points.push(format!("Provides practical applications: {}", take_chars(s, 70)));
  }

  if points.len() < MAX_KEY_POINTS {
    let detail = sents.iter().take(10).find(|s| {
      let len = s.chars().count();
      let lower = s.to_lowercase();
      len > 40
        && len < 100
        && key_terms.iter().take(8).any(|t| lower.contains(&t.to_lowercase()))
        && !points.iter().any(|p| p.ends_with(s.as_str()))
    });
    if let Some(s) = detail {
      points.push(format!("Details: {}", s));
    }
  }

  if points.len() < 3 {
    points.push(format!("Presents structured information on {}", doc_type.replace("material", "topics")));
    points.push("Includes detailed explanations and technical specifications".to_string());
    points.push("Provides foundational knowledge for understanding the subject matter".to_string());
  }

  let mut summary = format!("{}\n\nKey Points:", intro);
  for point in points.iter().take(MAX_KEY_POINTS) {
    summary.push_str("\n• ");
    summary.push_str(point);
  }

  if word_count(&summary) < SUMMARY_TARGET_WORDS {
    if topics.len() > 1 {
      let more: Vec<&str> = topics.iter().skip(1).take(2).map(String::as_str).collect();
      summary.push_str(&format!("\n• Additionally covers: {}", more.join(", ")));
    }
    if key_terms.len() > 4 {
      let more: Vec<&str> = key_terms.iter().skip(4).take(3).map(String::as_str).collect();
      summary.push_str(&format!("\n• Advanced topics include: {}", more.join(", ")));
    }
  }

  Summary::new(summary, Language::En, Quality::Fallback)
}

fn question(stem: String, correct: String, wrong: [&str; 3], explanation: String, difficulty: Difficulty, topic: String) -> QuizQuestion {
  let [b, c, d] = wrong;
  QuizQuestion {
    stem,
    options: QuizOptions::new(correct, b, c, d),
    answer_key: AnswerKey::A,
    explanation,
    difficulty,
    topic,
  }
}

fn sentences_with<'a>(sents: &'a [String], term: &str, cue: impl Fn(&str) -> bool) -> Option<&'a String> {
  let term = term.to_lowercase();
  sents.iter().find(|s| {
    let lower = s.to_lowercase();
    lower.contains(&term) && cue(lower.as_str())
  })
}

fn easy_questions(key_terms: &[String], topics: &[String], sents: &[String]) -> Vec<QuizQuestion> {
  let mut out = Vec::new();
  for term in key_terms.iter().take(3) {
    let found = sentences_with(sents, term, |s| has_definition_cue(s, &["means", "refers"]));
    if let Some(s) = found {
      out.push(question(
        format!("What is {}?", term),
        ellipsize(s, 60),
        ["A type of software application", "A mathematical formula", "A historical event"],
        format!("According to the document: {}", ellipsize(s, 100)),
        Difficulty::Easy,
        term.clone(),
      ));
    }
  }
  if let Some(topic) = topics.first() {
    out.push(question(
      "What is the main topic covered in this document?".into(),
      topic.clone(),
      ["Cooking recipes", "Sports statistics", "Weather patterns"],
      format!("The document primarily focuses on {}.", topic),
      Difficulty::Easy,
      "Main Topic".into(),
    ));
  }
  out
}

fn medium_questions(key_terms: &[String], sents: &[String]) -> Vec<QuizQuestion> {
  let mut out = Vec::new();
  for term in key_terms.iter().take(2) {
    let found = sentences_with(sents, term, |s| contains_any(s, &["used", "application", "example", "practice"]));
    if let Some(s) = found {
      out.push(question(
        format!("How is {} typically used or applied?", term),
        ellipsize(s, 60),
        ["Only for theoretical purposes", "Exclusively in research labs", "Not applicable in practice"],
        format!("The document explains: {}", ellipsize(s, 100)),
        Difficulty::Medium,
        format!("{} Application", term),
      ));
    }
  }
  let process = sents
    .iter()
    .find(|s| contains_any(&s.to_lowercase(), &["process", "method", "procedure", "steps", "algorithm"]));
  if let Some(s) = process {
    out.push(question(
      "What process or method is described in the document?".into(),
      ellipsize(s, 60),
      ["Random trial and error", "No specific method mentioned", "Only theoretical approaches"],
      format!("The document describes: {}", ellipsize(s, 100)),
      Difficulty::Medium,
      "Process/Method".into(),
    ));
  }
  out
}

fn hard_questions(key_terms: &[String], topics: &[String]) -> Vec<QuizQuestion> {
  let mut out = Vec::new();
  if let [first, second, ..] = key_terms {
    out.push(question(
      format!("Analyze the relationship between {} and {} based on the document.", first, second),
      "They are complementary concepts that work together".into(),
      ["They are completely unrelated", "One replaces the other entirely", "They are identical concepts"],
      format!("The document discusses both {} and {} as related concepts.", first, second),
      Difficulty::Hard,
      "Concept Relationships".into(),
    ));
  }
  if let Some(topic) = topics.first() {
    out.push(question(
      format!("Evaluate the significance of {} in the broader context described in the document.", topic),
      "It provides foundational understanding for advanced concepts".into(),
      ["It has no practical relevance", "It only applies to historical contexts", "It contradicts established principles"],
      format!("The document presents {} as fundamental to understanding the subject matter.", topic),
      Difficulty::Hard,
      "Concept Evaluation".into(),
    ));
  }
  out.push(question(
    "Based on the document content, what would be the best approach to master this material?".into(),
    "Understand core concepts, practice applications, and analyze relationships".into(),
    ["Memorize all details without understanding", "Focus only on definitions", "Skip complex parts entirely"],
    "Effective mastery requires understanding, application, and analysis as demonstrated in the document.".into(),
    Difficulty::Hard,
    "Learning Strategy".into(),
  ));
  out
}

/// Exactly ten questions at the requested difficulty, correct option always in `A`.
pub fn fallback_quiz(text: &str, difficulty: Difficulty, key_terms: &[String], topics: &[String]) -> QuizQuestionSet {
  let doc_type = detect_document_type(text);
  let questions = if usable(text) {
    let sents = sentences(text, 20);
    match difficulty {
      Difficulty::Easy => easy_questions(key_terms, topics, &sents),
      Difficulty::Medium => medium_questions(key_terms, &sents),
      Difficulty::Hard => hard_questions(key_terms, topics),
    }
  } else {
    Vec::new()
  };

  QuizQuestionSet {
    questions: pad_questions(questions, QUIZ_LEN, difficulty, doc_type.label()),
    difficulty,
    language: Language::En,
    quality: Quality::Fallback,
  }
}

fn concept_word(sentence: &str) -> Option<String> {
  sentence
    .split_whitespace()
    .take(5)
    .find(|w| w.chars().count() > 3 && !CONCEPT_STOP_WORDS.contains(&w.to_lowercase().as_str()))
    .map(|w| w.trim_matches(|c| matches!(c, '.' | ',' | '!' | '?' | ';' | ':')).to_string())
    .filter(|w| !w.is_empty())
}

/// Revision cards phrased in the document's own language (English, Hindi or Marathi).
pub fn fallback_flashcards(text: &str) -> FlashcardSet {
  if !usable(text) {
    return FlashcardSet {
      cards: pad_flashcards(short_text_flashcards()),
      language: Language::En,
      quality: Quality::Fallback,
    };
  }

  let lang = detect_language(text);
  let extra_markers: &[&str] = match lang {
    Language::Hi => &["means", "refers to", "defined as", "known as", "called", "कहते हैं", "अर्थ"],
    Language::Mr => &["means", "refers to", "defined as", "known as", "called", "म्हणजे", "म्हणतात"],
    _ => &["means", "refers to", "defined as", "known as", "called"],
  };

  let candidates: Vec<String> = text
    .replace('\n', " ")
    .split(['.', '।'])
    .map(str::trim)
    .filter(|s| s.chars().count() > 15)
    .map(str::to_string)
    .collect();

  let mut cards: Vec<Flashcard> = candidates
    .iter()
    .take(20)
    .filter(|s| {
      let lower = s.to_lowercase();
      has_definition_cue(&lower, extra_markers) || (lang != Language::En && contains_any(s, &["है", "आहे"]))
    })
    .take(10)
    .filter(|s| s.split_whitespace().count() > 5)
    .filter_map(|s| concept_word(s).map(|w| Flashcard::new(what_is_question(lang, &w), ellipsize(s, 100))))
    .collect();

  cards.extend(topic_bonus_flashcards(&text.to_lowercase()));

  FlashcardSet { cards: pad_flashcards(cards), language: lang, quality: Quality::Fallback }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{MAX_FLASHCARDS, MIN_FLASHCARDS};

  const CONTROL_TEXT: &str = "Control statements are used to control the flow of execution in a program. \
    An if statement is a conditional statement that runs code when a condition holds. \
    The if-else statement refers to a two-way branch used for decisions. \
    A loop is a construct that repeats a block of code. \
    The FOR loop and the WHILE loop are common examples used for iteration in practice. \
    The algorithm steps describe the process of checking the condition before each iteration.";

  #[test]
  fn short_text_gets_canned_summary() {
    let s = fallback_summary("Short note.", &[], &[]);
    assert_eq!(s.text, "This document contains limited readable content for comprehensive analysis.");
    assert_eq!(s.quality(), Quality::Fallback);
  }

  #[test]
  fn summary_has_intro_and_bullets() {
    let terms = extract_key_terms(CONTROL_TEXT);
    let topics = extract_main_topics(CONTROL_TEXT);
    let s = fallback_summary(CONTROL_TEXT, &terms, &topics);
    assert!(s.text.starts_with("This programming/computer science material"));
    assert!(s.text.contains("\n\nKey Points:\n• "));
    let bullets = s.text.matches("\n• ").count();
    assert!((3..=6).contains(&bullets), "bullets: {}", bullets);
  }

  #[test]
  fn summary_without_terms_uses_generic_points() {
    let text = "rivers flow gently across the plains and into the sea while birds sing overhead all day";
    let s = fallback_summary(text, &[], &[]);
    assert!(s.text.contains("covers essential concepts") || s.text.contains("provides comprehensive coverage"));
    assert!(s.text.contains("Includes detailed explanations and technical specifications"));
  }

  #[test]
  fn quiz_is_always_ten_questions_keyed_a() {
    let terms = extract_key_terms(CONTROL_TEXT);
    let topics = extract_main_topics(CONTROL_TEXT);
    for d in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
      for text in [CONTROL_TEXT, "", "tiny"] {
        let quiz = fallback_quiz(text, d, &terms, &topics);
        assert_eq!(quiz.len(), QUIZ_LEN);
        assert!(quiz.questions.iter().all(|q| q.answer_key == AnswerKey::A));
      }
    }
  }

  #[test]
  fn easy_quiz_asks_about_defined_terms() {
    let terms = vec!["loop".to_string()];
    let quiz = fallback_quiz(CONTROL_TEXT, Difficulty::Easy, &terms, &[]);
    assert_eq!(quiz.questions[0].stem, "What is loop?");
    assert_eq!(quiz.questions[0].topic, "loop");
  }

  #[test]
  fn medium_quiz_includes_process_question() {
    let quiz = fallback_quiz(CONTROL_TEXT, Difficulty::Medium, &[], &[]);
    assert_eq!(quiz.questions[0].stem, "What process or method is described in the document?");
    assert_eq!(quiz.questions[1].topic, "Study Strategy");
  }

  #[test]
  fn medium_quiz_asks_how_terms_are_applied() {
    let terms = vec!["loop".to_string()];
    let quiz = fallback_quiz(CONTROL_TEXT, Difficulty::Medium, &terms, &[]);
    let first = &quiz.questions[0];
    assert_eq!(first.stem, "How is loop typically used or applied?");
    assert_eq!(first.topic, "loop Application");
    assert!(first.options.a.starts_with("The FOR loop and the WHILE loop"));
    assert_eq!(first.difficulty, Difficulty::Medium);
    assert_eq!(quiz.questions[1].stem, "What process or method is described in the document?");
  }

  #[test]
  fn easy_quiz_asks_for_the_main_topic() {
    let topics = vec!["Control Flow".to_string(), "Loops".to_string()];
    let quiz = fallback_quiz(CONTROL_TEXT, Difficulty::Easy, &[], &topics);
    let first = &quiz.questions[0];
    assert_eq!(first.stem, "What is the main topic covered in this document?");
    assert_eq!(first.options.a, "Control Flow");
    assert_eq!(first.answer_key, AnswerKey::A);
    assert_eq!(first.topic, "Main Topic");
    assert_eq!(first.explanation, "The document primarily focuses on Control Flow.");
  }

  #[test]
  fn hard_quiz_relates_first_two_terms() {
    let terms = vec!["FOR".to_string(), "WHILE".to_string()];
    let topics = vec!["Control Flow".to_string()];
    let quiz = fallback_quiz(CONTROL_TEXT, Difficulty::Hard, &terms, &topics);
    assert!(quiz.questions[0].stem.contains("between FOR and WHILE"));
    assert!(quiz.questions[1].stem.contains("Control Flow"));
    assert!(quiz.questions[2].stem.contains("best approach"));
  }

  #[test]
  fn flashcards_stay_within_bounds() {
    for text in [CONTROL_TEXT, "", "short", "plain words with nothing to define at all here, really nothing at all"] {
      let deck = fallback_flashcards(text);
      assert!((MIN_FLASHCARDS..=MAX_FLASHCARDS).contains(&deck.len()), "len {}", deck.len());
    }
  }

  #[test]
  fn flashcards_pick_concepts_and_bonus_cards() {
    let deck = fallback_flashcards(CONTROL_TEXT);
    assert_eq!(deck.cards[0].front, "What is Control?");
    assert!(deck.cards.iter().any(|c| c.front == "What is a loop?"));
    assert_eq!(deck.language, Language::En);
  }

  #[test]
  fn hindi_text_gets_hindi_phrasing() {
    let text = "प्रोग्रामिंग एक प्रक्रिया है जिसमें कंप्यूटर को निर्देश दिए जाते हैं। \
      लूप एक संरचना है जो कोड को बार बार चलाती है। भारत में यह विषय पढ़ाया जाता है।";
    let deck = fallback_flashcards(text);
    assert_eq!(deck.language, Language::Hi);
    assert!(deck.cards[0].front.ends_with("क्या है?"), "front: {}", deck.cards[0].front);
  }
}
