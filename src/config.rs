//! Configuration: AI backend settings (env + optional TOML overrides), generation
//! options, and the prompt templates.
//!
//! TOML schema (all sections optional, every key optional):
//!
//! ```toml
//! [ai]
//! base_url = "https://api.openai.com/v1"
//! model = "gpt-4o-mini"
//! timeout_secs = 30
//! temperature = 0.4
//! max_tokens = 1200
//!
//! [generation]
//! shuffle_quiz_options = false
//!
//! [prompts]
//! summary_template = "..."
//! ```

use std::time::Duration;

use serde::Deserialize;
use tracing::{error, info};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_TEMPERATURE: f32 = 0.4;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AgentConfig {
  #[serde(default)]
  pub ai: AiOverrides,
  #[serde(default)]
  pub generation: GenerationOptions,
  #[serde(default)]
  pub prompts: Prompts,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AiOverrides {
  #[serde(default)] pub base_url: Option<String>,
  #[serde(default)] pub model: Option<String>,
  #[serde(default)] pub timeout_secs: Option<u64>,
  #[serde(default)] pub temperature: Option<f32>,
  /// Completion cap sent with every request; unset leaves it to the server.
  #[serde(default)] pub max_tokens: Option<u32>,
}

#[derive(Clone, Copy, Debug, Deserialize, Default, PartialEq, Eq)]
pub struct GenerationOptions {
  /// Randomize option order (and thus the answer key) of delivered quizzes.
  #[serde(default)]
  pub shuffle_quiz_options: bool,
}

/// Resolved settings for the generation backend.
/// Environment variables win over TOML values, which win over defaults.
#[derive(Clone, Debug, PartialEq)]
pub struct AiSettings {
  pub api_key: Option<String>,
  pub base_url: String,
  pub model: String,
  pub timeout: Duration,
  pub temperature: f32,
  pub max_tokens: Option<u32>,
}

impl Default for AiSettings {
  fn default() -> Self {
    Self {
      api_key: None,
      base_url: DEFAULT_BASE_URL.into(),
      model: DEFAULT_MODEL.into(),
      timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
      temperature: DEFAULT_TEMPERATURE,
      max_tokens: None,
    }
  }
}

impl AiSettings {
  pub fn resolve(overrides: &AiOverrides) -> Self {
    Self::resolve_with(overrides, |k| std::env::var(k).ok())
  }

  /// Resolution against an arbitrary variable source.
  pub fn resolve_with(overrides: &AiOverrides, var: impl Fn(&str) -> Option<String>) -> Self {
    let defaults = Self::default();
    let api_key = var("OPENAI_API_KEY").map(|k| k.trim().to_string()).filter(|k| !k.is_empty());
    let base_url = var("OPENAI_BASE_URL")
      .or_else(|| overrides.base_url.clone())
      .unwrap_or(defaults.base_url);
    let model = var("OPENAI_MODEL").or_else(|| overrides.model.clone()).unwrap_or(defaults.model);
    let timeout = var("AI_TIMEOUT_SECS")
      .and_then(|s| s.parse::<u64>().ok())
      .or(overrides.timeout_secs)
      .filter(|s| *s > 0)
      .map(Duration::from_secs)
      .unwrap_or(defaults.timeout);
    let temperature = overrides.temperature.unwrap_or(defaults.temperature);
    let max_tokens = overrides.max_tokens.filter(|n| *n > 0);
    Self {
      api_key,
      base_url: base_url.trim_end_matches('/').to_string(),
      model,
      timeout,
      temperature,
      max_tokens,
    }
  }
}

/// Prompt templates. `{key}` placeholders are filled by `util::fill_template`.
/// Any subset can be overridden in TOML; the rest keep their defaults.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Prompts {
  pub system: String,
  pub summary_template: String,
  pub language_summary_template: String,
  pub quiz_template: String,
  pub flashcard_template: String,
  pub translate_template: String,
  pub tutor_template: String,
  pub assistant_template: String,
  pub assistant_context_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      system: "You are StudyGenie, an educational content generator. Follow the requested output format exactly.".into(),
      summary_template: r#"Create a comprehensive, well-structured summary of this document following these EXACT formatting requirements:

DOCUMENT ANALYSIS:
- Document Type: {document_type}
- Key Terms: {key_terms}
- Main Topics: {topics}

FORMATTING REQUIREMENTS:
1. Length: 100-150 words total
2. Structure: Introduction paragraph + Key Points in bullet format
3. Start with: "This document covers [specific topic]..."
4. Follow with: "\n\nKey Points:\n• [Point 1]\n• [Point 2]\n• [Point 3]\n• [Point 4]"
5. Use ACTUAL terms and concepts from the document
6. Make each bullet point specific and informative (10-15 words each)
7. Include specific details: numbers, formulas, procedures, examples from text

CONTENT REQUIREMENTS:
- Use ONLY information from the provided document
- Mention specific technical terms, definitions, procedures
- Be precise about what the document teaches
{language_clause}
DOCUMENT CONTENT:
{text}

Generate a summary that clearly shows what specific knowledge this document contains."#.into(),
      language_summary_template: r#"{language_phrase}.
Create a comprehensive summary in {language_name} based on the document content below.

REQUIREMENTS:
- Write entirely in {language_name}
- Maximum 150 words
- Use ONLY information from the document
- Include key concepts and important details

DOCUMENT CONTENT:
{text}

Write the summary in {language_name}:"#.into(),
      quiz_template: r#"Generate EXACTLY 10 {difficulty_upper} level quiz questions from this specific document content.

DOCUMENT ANALYSIS:
- Type: {document_type}
- Key Terms: {key_terms}
- Main Topics: {topics}

{difficulty_upper} LEVEL SPECIFICATIONS:
- Cognitive Level: {cognitive_level}
- Question Types: {question_types}
- Focus: {focus}
- Distractors: {distractors}

CRITICAL REQUIREMENTS:
1. Generate EXACTLY 10 questions - no more, no less
2. Use ACTUAL terms, concepts, and information from the text
3. Each question must test a different aspect of the content
4. Each question has exactly 4 options labelled A, B, C, D
{language_clause}
DOCUMENT CONTENT:
{text}

Return ONLY a valid JSON array with exactly 10 objects:
[
  {
    "stem": "Question based on document content?",
    "options": {"A": "Option 1", "B": "Option 2", "C": "Option 3", "D": "Option 4"},
    "answer_key": "A",
    "explanation": "Explanation with reference to document content",
    "difficulty": "{difficulty}",
    "topic": "Specific topic from document"
  }
]"#.into(),
      flashcard_template: r#"Create precise flashcards for quick revision. Extract key terms and concepts from the document.

STRICT REQUIREMENTS:
- Front: Single term, keyword, or short question (max 10 words)
- Back: Concise definition or answer (1-2 lines max, under 25 words)
- Focus on key terms, definitions, and important concepts
- NO long paragraphs or detailed explanations
{language_clause}
DOCUMENT CONTENT:
{text}

Return ONLY valid JSON:
[
  {"front": "Term or short question", "back": "Brief definition (1-2 lines)"}
]

Generate 8-12 flashcards."#.into(),
      translate_template: r#"Translate the following text to {language_name}. Keep the meaning and educational content intact.
Output ONLY the translation.

Original text:
{text}

Translate to {language_name}:"#.into(),
      tutor_template: r#"You are an AI tutor helping a student understand their study material.

DOCUMENT: {title}
RELEVANT CONTENT: {content}
STUDENT QUESTION: {question}

Instructions:
1. Answer ONLY based on the provided document content
2. If the question is not related to the document, say so politely
3. Provide clear, educational explanations
4. Use examples from the document when possible
5. Keep response under 200 words
6. Be encouraging and supportive

Response:"#.into(),
      assistant_template: r#"You are StudyGenie's AI Assistant, a friendly and knowledgeable study companion.

Student Question: {question}

Provide a helpful response that:
1. Answers the question clearly and concisely
2. Uses an encouraging and supportive tone
3. Includes actionable study tips when relevant
4. Keeps the response under 150 words

Response:"#.into(),
      assistant_context_template: r#"You are StudyGenie's AI Assistant, helping students learn effectively.

Context: {context}
Student Question: {question}

Provide a helpful, educational response that:
1. Directly answers the question
2. Uses simple, clear language
3. Includes practical examples when relevant
4. Keeps the response under 150 words

Response:"#.into(),
    }
  }
}

/// Parse a TOML document into `AgentConfig`.
pub fn parse_agent_config(s: &str) -> Result<AgentConfig, toml::de::Error> {
  toml::from_str::<AgentConfig>(s)
}

/// Attempt to load `AgentConfig` from AGENT_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_agent_config_from_env() -> Option<AgentConfig> {
  let path = std::env::var("AGENT_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_agent_config(&s) {
      Ok(cfg) => {
        info!(target: "studygenie_backend", %path, "Loaded agent config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "studygenie_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "studygenie_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
