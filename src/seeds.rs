//! Built-in content that guarantees every artifact can be completed without a model:
//! generic filler questions, padding flashcards, topic bonus cards and canned outputs
//! for unusable input.

use crate::domain::{AnswerKey, Difficulty, Flashcard, QuizOptions, QuizQuestion, MAX_FLASHCARDS, MIN_FLASHCARDS};

/// Summary returned when the document has too little readable text.
pub const SHORT_TEXT_SUMMARY: &str =
  "This document contains limited readable content for comprehensive analysis.";

fn q(stem: &str, options: [&str; 4], explanation: &str, difficulty: Difficulty, topic: &str) -> QuizQuestion {
  let [a, b, c, d] = options;
  QuizQuestion {
    stem: stem.into(),
    options: QuizOptions::new(a, b, c, d),
    answer_key: AnswerKey::A,
    explanation: explanation.into(),
    difficulty,
    topic: topic.into(),
  }
}

/// Three filler questions per difficulty, used to pad quizzes up to the fixed length.
pub fn generic_questions(difficulty: Difficulty, doc_type: &str) -> Vec<QuizQuestion> {
  use Difficulty::*;
  match difficulty {
    Easy => vec![
      q(
        "What type of material is this document?",
        [doc_type, "Fiction novel", "Recipe collection", "Phone directory"],
        &format!("This is {}.", doc_type.to_lowercase()),
        Easy,
        "Document Type",
      ),
      q(
        "What is the primary purpose of studying this material?",
        ["To gain knowledge and understanding", "For entertainment only", "To waste time", "No specific purpose"],
        "Educational materials are designed to impart knowledge and understanding.",
        Easy,
        "Learning Purpose",
      ),
      q(
        "How should you approach reading this document?",
        ["Carefully and attentively", "Quickly without focus", "Skip most sections", "Read only the title"],
        "Careful and attentive reading leads to better comprehension.",
        Easy,
        "Reading Strategy",
      ),
    ],
    Medium => vec![
      q(
        "How should you approach studying this type of material?",
        ["Active reading and understanding", "Passive memorization", "Skip difficult sections", "Read only once"],
        "Active engagement leads to better understanding and retention.",
        Medium,
        "Study Strategy",
      ),
      q(
        "What is the best way to retain information from this document?",
        ["Take notes and review regularly", "Read once and forget", "Memorize without understanding", "Avoid taking notes"],
        "Note-taking and regular review enhance retention and understanding.",
        Medium,
        "Retention Strategy",
      ),
      q(
        "How can you test your understanding of this material?",
        ["Practice questions and self-assessment", "Avoid any testing", "Only read passively", "Skip review sessions"],
        "Practice questions and self-assessment help identify knowledge gaps.",
        Medium,
        "Self-Assessment",
      ),
    ],
    Hard => vec![
      q(
        "Evaluate the most effective way to apply knowledge from this document.",
        ["Practice, analyze, and synthesize concepts", "Memorize without application", "Use only in exams", "Avoid practical use"],
        "True mastery comes from practical application and synthesis of knowledge.",
        Hard,
        "Knowledge Application",
      ),
      q(
        "Analyze the best approach to master complex concepts in this material.",
        ["Break down into smaller parts and build understanding", "Memorize everything at once", "Ignore difficult concepts", "Rely only on surface-level reading"],
        "Breaking complex concepts into smaller parts facilitates deeper understanding.",
        Hard,
        "Complex Learning",
      ),
      q(
        "Critique the importance of connecting this material to real-world applications.",
        ["Essential for meaningful learning and retention", "Unnecessary for academic success", "Only relevant for practical subjects", "Should be avoided completely"],
        "Connecting academic material to real-world applications enhances understanding and retention.",
        Hard,
        "Application Connection",
      ),
    ],
  }
}

/// Pad (cycling the generic set) or truncate to exactly `len` questions.
pub fn pad_questions(mut questions: Vec<QuizQuestion>, len: usize, difficulty: Difficulty, doc_type: &str) -> Vec<QuizQuestion> {
  let filler = generic_questions(difficulty, doc_type);
  let mut i = 0;
  while questions.len() < len {
    questions.push(filler[i % filler.len()].clone());
    i += 1;
  }
  questions.truncate(len);
  questions
}

/// The padding set appended (repeatedly) to short flashcard decks.
pub fn padding_flashcards() -> [Flashcard; 3] {
  [
    Flashcard::new(
      "What is the main topic of this document?",
      "Educational content covering key concepts and principles.",
    ),
    Flashcard::new(
      "Why is this material important?",
      "It provides fundamental knowledge essential for understanding the subject.",
    ),
    Flashcard::new(
      "How should you study this content?",
      "Focus on understanding concepts, definitions, and their applications.",
    ),
  ]
}

/// Grow a deck with the padding set until it has at least the minimum, then cap it.
pub fn pad_flashcards(mut cards: Vec<Flashcard>) -> Vec<Flashcard> {
  while cards.len() < MIN_FLASHCARDS {
    cards.extend(padding_flashcards());
  }
  cards.truncate(MAX_FLASHCARDS);
  cards
}

/// Cards for unusable input (missing or under 50 chars).
pub fn short_text_flashcards() -> Vec<Flashcard> {
  vec![
    Flashcard::new("What is the main topic?", "Key educational concept from the material."),
    Flashcard::new("Important term", "Definition and explanation."),
    Flashcard::new("Key principle", "Fundamental rule or concept."),
  ]
}

/// Bonus cards triggered by well-known programming topics appearing in the text.
pub fn topic_bonus_flashcards(text_lower: &str) -> Vec<Flashcard> {
  let mut cards = Vec::new();
  if text_lower.contains("control statements") {
    cards.push(Flashcard::new(
      "What are control statements?",
      "Programming constructs that control the flow of execution in code.",
    ));
    cards.push(Flashcard::new(
      "What are the main types of control statements?",
      "Conditional statements, looping statements, and jump statements.",
    ));
  }
  if text_lower.contains("if statement") || text_lower.contains("if-else") {
    cards.push(Flashcard::new(
      "What is an if statement?",
      "A conditional statement that executes code based on whether a condition is true or false.",
    ));
  }
  if text_lower.contains("loop") {
    cards.push(Flashcard::new(
      "What is a loop?",
      "A programming construct that repeats a block of code multiple times.",
    ));
  }
  cards
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn every_difficulty_has_three_fillers_keyed_a() {
    for d in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
      let qs = generic_questions(d, "Educational Document");
      assert_eq!(qs.len(), 3);
      assert!(qs.iter().all(|q| q.answer_key == AnswerKey::A && q.difficulty == d));
    }
  }

  #[test]
  fn padding_reaches_exact_length() {
    let qs = pad_questions(Vec::new(), 10, Difficulty::Hard, "Physics Material");
    assert_eq!(qs.len(), 10);
    assert_eq!(qs[0].stem, qs[3].stem);
  }

  #[test]
  fn easy_filler_names_the_document_type() {
    let qs = generic_questions(Difficulty::Easy, "Physics Material");
    assert_eq!(qs[0].options.a, "Physics Material");
    assert_eq!(qs[0].explanation, "This is physics material.");
  }

  #[test]
  fn flashcard_padding_lands_in_range() {
    assert_eq!(pad_flashcards(Vec::new()).len(), 9);
    let one = pad_flashcards(vec![Flashcard::new("Loop", "Repeats code.")]);
    assert_eq!(one.len(), 10);
    assert_eq!(one[0].front, "Loop");
    let many = pad_flashcards(vec![Flashcard::new("f", "b"); 20]);
    assert_eq!(many.len(), MAX_FLASHCARDS);
  }

  #[test]
  fn bonus_cards_follow_triggers() {
    assert_eq!(topic_bonus_flashcards("control statements and if-else with a loop").len(), 4);
    assert!(topic_bonus_flashcards("nothing relevant").is_empty());
  }
}
