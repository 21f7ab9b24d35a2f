//! Prompt construction for every generation task.
//!
//! Each builder takes the raw document text, cuts it to the task's window, and fills the
//! matching template from `Prompts` with the analysis context.

use crate::analysis::DocumentAnalysis;
use crate::config::Prompts;
use crate::domain::{Difficulty, Language};
use crate::language::task_phrases;
use crate::util::{fill_template, take_chars};

/// Character windows of document text embedded in each prompt.
pub const SUMMARY_WINDOW: usize = 5000;
pub const LANGUAGE_SUMMARY_WINDOW: usize = 3000;
pub const QUIZ_WINDOW: usize = 5000;
pub const FLASHCARD_WINDOW: usize = 3000;
pub const TRANSLATE_WINDOW: usize = 2000;
pub const TUTOR_WINDOW: usize = 2000;

const PROMPT_KEY_TERMS: usize = 10;
const PROMPT_TOPICS: usize = 5;

/// How a difficulty level is described to the model.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DifficultyProfile {
  pub cognitive_level: &'static str,
  pub question_types: &'static str,
  pub focus: &'static str,
  pub distractors: &'static str,
}

pub fn difficulty_profile(difficulty: Difficulty) -> DifficultyProfile {
  match difficulty {
    Difficulty::Easy => DifficultyProfile {
      cognitive_level: "Remember and Understand",
      question_types: "What is...?, Define..., Which of the following...?, True or False:, Identify...",
      focus: "Direct recall, basic definitions, simple identification",
      distractors: "Obviously incorrect options",
    },
    Difficulty::Medium => DifficultyProfile {
      cognitive_level: "Apply and Analyze",
      question_types: "How would...?, What happens when...?, Compare..., Explain why..., What is the result of...?",
      focus: "Application of concepts, cause-effect relationships, comparisons",
      distractors: "Plausible but incorrect options",
    },
    Difficulty::Hard => DifficultyProfile {
      cognitive_level: "Evaluate and Create",
      question_types: "Analyze..., Evaluate..., What would be the best...?, Critique..., Design...",
      focus: "Critical thinking, evaluation, synthesis, complex reasoning",
      distractors: "Very plausible options requiring deep understanding",
    },
  }
}

fn joined(items: &[String], n: usize) -> String {
  items.iter().take(n).cloned().collect::<Vec<_>>().join(", ")
}

/// Extra instruction block for non-English targets; empty for English.
fn language_clause(lang: Language, phrase: &str) -> String {
  if lang == Language::En {
    String::new()
  } else {
    format!(
      "\nLANGUAGE:\n- {}\n- Write ALL text content in {} (keep JSON keys and option labels in English)\n",
      phrase,
      lang.name()
    )
  }
}

pub fn summary_prompt(prompts: &Prompts, text: &str, analysis: &DocumentAnalysis) -> String {
  let key_terms = joined(&analysis.key_terms, PROMPT_KEY_TERMS);
  let topics = joined(&analysis.topics, PROMPT_TOPICS);
  fill_template(
    &prompts.summary_template,
    &[
      ("document_type", analysis.document_type.label()),
      ("key_terms", key_terms.as_str()),
      ("topics", topics.as_str()),
      ("language_clause", ""),
      ("text", take_chars(text, SUMMARY_WINDOW)),
    ],
  )
}

/// Summary written directly in a non-English target language.
pub fn language_summary_prompt(prompts: &Prompts, text: &str, lang: Language) -> String {
  fill_template(
    &prompts.language_summary_template,
    &[
      ("language_phrase", task_phrases(lang).summary),
      ("language_name", lang.name()),
      ("text", take_chars(text, LANGUAGE_SUMMARY_WINDOW)),
    ],
  )
}

pub fn quiz_prompt(prompts: &Prompts, text: &str, difficulty: Difficulty, lang: Language, analysis: &DocumentAnalysis) -> String {
  let profile = difficulty_profile(difficulty);
  let key_terms = joined(&analysis.key_terms, PROMPT_KEY_TERMS);
  let topics = joined(&analysis.topics, PROMPT_TOPICS);
  let upper = difficulty.as_str().to_uppercase();
  let clause = language_clause(lang, task_phrases(lang).quiz);
  fill_template(
    &prompts.quiz_template,
    &[
      ("difficulty_upper", upper.as_str()),
      ("difficulty", difficulty.as_str()),
      ("document_type", analysis.document_type.label()),
      ("key_terms", key_terms.as_str()),
      ("topics", topics.as_str()),
      ("cognitive_level", profile.cognitive_level),
      ("question_types", profile.question_types),
      ("focus", profile.focus),
      ("distractors", profile.distractors),
      ("language_clause", clause.as_str()),
      ("text", take_chars(text, QUIZ_WINDOW)),
    ],
  )
}

pub fn flashcard_prompt(prompts: &Prompts, text: &str, lang: Language) -> String {
  let clause = language_clause(lang, task_phrases(lang).flashcards);
  fill_template(
    &prompts.flashcard_template,
    &[("language_clause", clause.as_str()), ("text", take_chars(text, FLASHCARD_WINDOW))],
  )
}

pub fn translate_prompt(prompts: &Prompts, text: &str, target: Language) -> String {
  fill_template(
    &prompts.translate_template,
    &[("language_name", target.name()), ("text", take_chars(text, TRANSLATE_WINDOW))],
  )
}

pub fn tutor_prompt(prompts: &Prompts, title: &str, content: &str, question: &str) -> String {
  fill_template(
    &prompts.tutor_template,
    &[("title", title), ("content", take_chars(content, TUTOR_WINDOW)), ("question", question)],
  )
}

pub fn assistant_prompt(prompts: &Prompts, question: &str, context: Option<&str>) -> String {
  match context.map(str::trim).filter(|c| !c.is_empty()) {
    Some(ctx) => fill_template(&prompts.assistant_context_template, &[("context", ctx), ("question", question)]),
    None => fill_template(&prompts.assistant_template, &[("question", question)]),
  }
}
