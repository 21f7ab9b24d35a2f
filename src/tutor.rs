//! Document tutor and general study assistant.
//!
//! The tutor answers questions about one document: it retrieves the sentences that share
//! the most words with the question and asks the model to answer from them only. Without a
//! model (or on any failure) it replies with the retrieved excerpt or with guidance on
//! what to ask. Replies are plain text.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{error, info, instrument};

use crate::client::GenerationError;
use crate::generator::ContentGenerator;
use crate::prompt::{assistant_prompt, tutor_prompt};
use crate::util::{ellipsize, sentences};
use crate::validate::validate_reply;

const RETRIEVED_SENTENCES: usize = 5;
const MIN_SENTENCE_CHARS: usize = 20;
const MIN_EXCERPT_CHARS: usize = 50;
const EXCERPT_CHARS: usize = 300;
const NO_CONTENT: &str = "No document content available.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
  Model,
  Fallback,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TutorReply {
  pub text: String,
  pub source: ReplySource,
}

impl TutorReply {
  fn fallback(text: String) -> Self {
    Self { text, source: ReplySource::Fallback }
  }
}

/// Up to five sentences ranked by how many distinct words they share with the question.
/// Sentences with no overlap are never returned; ties keep document order.
pub fn retrieve_relevant_content(question: &str, text: &str) -> String {
  let question_words: HashSet<String> = question.to_lowercase().split_whitespace().map(str::to_string).collect();
  let mut scored: Vec<(usize, String)> = sentences(text, MIN_SENTENCE_CHARS)
    .into_iter()
    .filter_map(|s| {
      let words: HashSet<String> = s.to_lowercase().split_whitespace().map(str::to_string).collect();
      let overlap = words.intersection(&question_words).count();
      (overlap > 0).then_some((overlap, s))
    })
    .collect();
  scored.sort_by(|a, b| b.0.cmp(&a.0));
  scored
    .into_iter()
    .take(RETRIEVED_SENTENCES)
    .map(|(_, s)| s)
    .collect::<Vec<_>>()
    .join(" ")
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
  needles.iter().any(|n| haystack.contains(n))
}

fn document_guidance(question: &str, title: &str) -> String {
  let q = question.to_lowercase();
  if contains_any(&q, &["what", "define", "explain"]) {
    format!(
      "About '{title}':\n\nI can help explain concepts from your uploaded document. Try asking more specific questions like:\n\
       • \"What is [specific term] mentioned in the document?\"\n\
       • \"Explain the concept of [topic]\"\n\
       • \"How does [process] work according to the document?\""
    )
  } else if contains_any(&q, &["how", "process", "method"]) {
    format!(
      "Process/Method Questions:\n\nBased on '{title}', I can help explain processes and methods. Try asking:\n\
       • \"How is [specific process] performed?\"\n\
       • \"What are the steps for [procedure]?\"\n\
       • \"Explain the method of [technique]\""
    )
  } else if q.contains("example") {
    format!(
      "Looking for Examples:\n\nFrom '{title}', I can provide examples when available. Try:\n\
       • \"Give me an example of [concept]\"\n\
       • \"Show examples of [topic] from the document\"\n\
       • \"What are some practical applications?\""
    )
  } else {
    format!(
      "AI Tutor for '{title}'\n\nI'm here to help you understand your study material! You can ask me:\n\
       • Questions about specific concepts in the document\n\
       • Explanations of terms and definitions\n\
       • How processes or methods work\n\
       • Examples and applications"
    )
  }
}

const SUBJECTS: [&str; 7] = ["math", "science", "history", "english", "programming", "physics", "chemistry"];

fn is_greeting(q: &str) -> bool {
  q.contains("good morning")
    || q.contains("good afternoon")
    || q
      .split(|c: char| !c.is_alphanumeric())
      .any(|w| matches!(w, "hello" | "hi" | "hey"))
}

fn study_guidance(question: &str) -> String {
  let q = question.to_lowercase();
  if is_greeting(&q) {
    "Hello! I'm your AI study assistant from StudyGenie!\n\nI can help you with:\n\
     • Study techniques and strategies\n• Subject explanations\n• Test preparation tips\n• Learning optimization\n\n\
     What would you like to learn about today?"
      .into()
  } else if contains_any(&q, &["study", "learn", "understand", "explain", "how to"]) {
    "Great question about studying! Here are some proven techniques:\n\n\
     • Active Recall: Test yourself regularly\n• Spaced Repetition: Review at increasing intervals\n\
     • Pomodoro Technique: 25-min focused sessions\n• Feynman Method: Explain concepts simply"
      .into()
  } else if contains_any(&q, &["memory", "remember", "memorize", "retention", "forget"]) {
    "Memory enhancement strategies:\n\n\
     • Chunking: Break info into smaller pieces\n• Visual Associations: Create mental images\n\
     • Mnemonics: Use memory aids\n• Sleep: Review before bedtime"
      .into()
  } else if contains_any(&q, &["test", "exam", "quiz", "preparation", "practice"]) {
    "Effective test preparation strategy:\n\n\
     • Plan Early: Start 2-3 weeks ahead\n• Practice Tests: Simulate exam conditions\n\
     • Focus Weak Areas: Identify knowledge gaps\n• Review Regularly: Don't cram last minute"
      .into()
  } else if contains_any(&q, &["time", "schedule", "organize", "plan", "manage"]) {
    "Time management for effective studying:\n\n\
     • Priority Matrix: Important vs Urgent tasks\n• Time Blocking: Dedicate specific hours\n\
     • Break Schedule: 50-min study, 10-min break\n• Weekly Planning: Set realistic goals"
      .into()
  } else if contains_any(&q, &["motivation", "focus", "concentrate", "productive", "distracted"]) {
    "Boost your study motivation and focus:\n\n\
     • Clear Goals: Set specific, achievable targets\n• Environment: Create a dedicated study space\n\
     • Rewards: Celebrate small wins\n• Accountability: Study with friends or track progress"
      .into()
  } else if let Some(subject) = SUBJECTS.iter().find(|s| q.contains(*s)) {
    format!(
      "Tips for studying {subject}:\n\n\
       • Understand Concepts: Don't just memorize\n• Practice Problems: Apply what you learn\n\
       • Connect Ideas: Link new info to known concepts\n• Teach Others: Explain to solidify understanding"
    )
  } else {
    "I'm here to help with your studies!\n\nTry asking about:\n\
     • Study techniques and strategies\n• Memory and retention tips\n\
     • Test preparation methods\n• Time management for studying"
      .into()
  }
}

#[derive(Clone)]
pub struct Tutor {
  generator: ContentGenerator,
}

impl Tutor {
  pub fn new(generator: ContentGenerator) -> Self {
    Self { generator }
  }

  async fn ask(&self, prompt: &str) -> Result<String, GenerationError> {
    let raw = self.generator.invoke(prompt).await?;
    validate_reply(&raw)
  }

  /// Answer a question about one document, grounded in its retrieved sentences.
  #[instrument(level = "info", skip(self, title, text, question), fields(%title, text_len = text.len(), question_len = question.len()))]
  pub async fn answer(&self, title: &str, text: &str, question: &str) -> TutorReply {
    let question = question.trim();
    if question.is_empty() {
      return TutorReply::fallback(format!("Please ask me a question about '{}'!", title));
    }

    let relevant = retrieve_relevant_content(question, text);
    let content = if text.trim().is_empty() { NO_CONTENT } else { relevant.as_str() };
    info!(target: "tutor", retrieved_len = relevant.len(), "retrieved document context");

    match self.ask(&tutor_prompt(self.generator.prompts(), title, content, question)).await {
      Ok(reply) => TutorReply { text: format!("{}\n\nBased on: {}", reply, title), source: ReplySource::Model },
      Err(e) => {
        if self.generator.is_online() {
          error!(target: "tutor", error = %e, "tutor answer failed; using fallback.");
        }
        if relevant.chars().count() > MIN_EXCERPT_CHARS {
          TutorReply::fallback(format!(
            "From your document '{}':\n\n{}\n\nThis content seems relevant to your question. \
             For more detailed explanations, try rephrasing your question or ask about specific concepts.",
            title,
            ellipsize(&relevant, EXCERPT_CHARS)
          ))
        } else {
          TutorReply::fallback(document_guidance(question, title))
        }
      }
    }
  }

  /// General study help, optionally grounded in caller-provided context.
  #[instrument(level = "info", skip(self, question, context), fields(question_len = question.len(), has_context = context.is_some()))]
  pub async fn assist(&self, question: &str, context: Option<&str>) -> TutorReply {
    let question = question.trim();
    if question.is_empty() {
      return TutorReply::fallback("Please ask me a question about your studies!".into());
    }
    match self.ask(&assistant_prompt(self.generator.prompts(), question, context)).await {
      Ok(reply) => TutorReply { text: reply, source: ReplySource::Model },
      Err(e) => {
        if self.generator.is_online() {
          error!(target: "tutor", error = %e, "assistant reply failed; using fallback.");
        }
        TutorReply::fallback(study_guidance(question))
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;
  use std::time::Duration;

  use super::*;
  use crate::client::testing::ScriptedGenerator;
  use crate::client::TextGenerator;
  use crate::config::{GenerationOptions, Prompts};

  const DOC: &str = "Photosynthesis converts light energy into chemical energy in plants. \
    Chlorophyll absorbs light mostly in the blue and red wavelengths. \
    The Calvin cycle uses that energy to fix carbon dioxide into sugars. \
    Short one.";

  fn offline() -> Tutor {
    Tutor::new(ContentGenerator::offline(Arc::new(Prompts::default())))
  }

  fn scripted(backend: ScriptedGenerator) -> (Tutor, Arc<ScriptedGenerator>) {
    let backend = Arc::new(backend);
    let gen = ContentGenerator::new(
      Some(backend.clone() as Arc<dyn TextGenerator>),
      Arc::new(Prompts::default()),
      Duration::from_millis(200),
      GenerationOptions::default(),
    );
    (Tutor::new(gen), backend)
  }

  #[test]
  fn retrieval_ranks_by_overlap() {
    let got = retrieve_relevant_content("how does chlorophyll absorb light", DOC);
    assert!(got.starts_with("Chlorophyll absorbs light"));
    assert!(!got.contains("Short one"));
    assert_eq!(retrieve_relevant_content("zebra", DOC), "");
    assert_eq!(retrieve_relevant_content("anything", ""), "");
  }

  #[tokio::test]
  async fn model_answer_cites_the_document() {
    let (tutor, backend) = scripted(ScriptedGenerator::replying("Chlorophyll absorbs blue and red light."));
    let reply = tutor.answer("Biology Notes", DOC, "what does chlorophyll absorb?").await;
    assert_eq!(reply.source, ReplySource::Model);
    assert!(reply.text.ends_with("Based on: Biology Notes"));
    let prompts = backend.prompts.lock().unwrap();
    assert!(prompts[0].contains("STUDENT QUESTION: what does chlorophyll absorb?"));
    assert!(prompts[0].contains("Chlorophyll absorbs light"));
  }

  #[tokio::test]
  async fn fallback_uses_excerpt_when_relevant() {
    let reply = offline().answer("Biology Notes", DOC, "what does the calvin cycle fix?").await;
    assert_eq!(reply.source, ReplySource::Fallback);
    assert!(reply.text.starts_with("From your document 'Biology Notes':"));
    assert!(reply.text.contains("Calvin cycle"));
  }

  #[tokio::test]
  async fn fallback_guides_when_nothing_matches() {
    let tutor = offline();
    let reply = tutor.answer("Biology Notes", DOC, "give an example please").await;
    assert!(reply.text.starts_with("Looking for Examples:"));
    let reply = tutor.answer("Biology Notes", "", "define osmosis").await;
    assert!(reply.text.starts_with("About 'Biology Notes':"));
  }

  #[tokio::test]
  async fn empty_question_prompts_for_one() {
    let reply = offline().answer("Biology Notes", DOC, "   ").await;
    assert_eq!(reply.text, "Please ask me a question about 'Biology Notes'!");
  }

  #[tokio::test]
  async fn assistant_falls_back_by_category() {
    let (tutor, _) = scripted(ScriptedGenerator::quota_exceeded());
    assert!(tutor.assist("hi there", None).await.text.starts_with("Hello!"));
    assert!(tutor.assist("I always forget formulas", None).await.text.starts_with("Memory"));
    assert!(tutor.assist("tips for chemistry?", None).await.text.starts_with("Tips for studying chemistry"));
    assert!(tutor.assist("this thing", None).await.text.starts_with("I'm here to help"));
  }

  #[tokio::test]
  async fn assistant_passes_context_to_the_model() {
    let (tutor, backend) = scripted(ScriptedGenerator::replying("Use spaced repetition."));
    let reply = tutor.assist("How should I revise?", Some("Chapter 4: Cells")).await;
    assert_eq!(reply, TutorReply { text: "Use spaced repetition.".into(), source: ReplySource::Model });
    assert!(backend.prompts.lock().unwrap()[0].contains("Context: Chapter 4: Cells"));
  }
}
