//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Resolving loosely-typed request fields (language codes, difficulty)
//!   - Dispatching to the generator, orchestrator, analyzer and tutor
//!   - Request-level logging (sizes, outcomes, quality)

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::analysis::DocumentAnalysis;
use crate::domain::{Difficulty, FlashcardSet, Language, QuizQuestionSet, Summary};
use crate::language::detect_language;
use crate::multilingual::generate_for_languages;
use crate::protocol::{MultilingualOut, TranslateOut};
use crate::state::AppState;
use crate::tutor::TutorReply;

/// Requested language, or the document's own language when none is given.
/// Unknown codes read as English.
pub fn resolve_language(requested: Option<&str>, text: &str) -> Language {
    match requested.map(str::trim).filter(|c| !c.is_empty()) {
        Some(code) => Language::from_code(code).unwrap_or_else(|| {
            warn!(target: "studygenie_backend", %code, "Unknown language code; using English.");
            Language::En
        }),
        None => detect_language(text),
    }
}

pub fn resolve_difficulty(requested: Option<&str>) -> Difficulty {
    match requested {
        Some(raw) => raw.parse().unwrap_or_else(|e: String| {
            warn!(target: "studygenie_backend", error = %e, "Bad difficulty; using default.");
            Difficulty::default()
        }),
        None => Difficulty::default(),
    }
}

#[instrument(level = "info", skip(state, text), fields(text_len = text.len()))]
pub async fn do_summary(state: &AppState, text: &str, language: Option<&str>) -> Summary {
    let lang = resolve_language(language, text);
    let summary = state.generator().await.summary(text, lang).await;
    info!(target: "generation", %lang, quality = ?summary.quality(), "summary served");
    summary
}

#[instrument(level = "info", skip(state, text), fields(text_len = text.len()))]
pub async fn do_quiz(state: &AppState, text: &str, difficulty: Option<&str>, language: Option<&str>) -> QuizQuestionSet {
    let lang = resolve_language(language, text);
    let difficulty = resolve_difficulty(difficulty);
    let quiz = state.generator().await.quiz(text, difficulty, lang).await;
    info!(target: "generation", %lang, %difficulty, questions = quiz.len(), quality = ?quiz.quality(), "quiz served");
    quiz
}

#[instrument(level = "info", skip(state, text), fields(text_len = text.len()))]
pub async fn do_flashcards(state: &AppState, text: &str, language: Option<&str>) -> FlashcardSet {
    let lang = resolve_language(language, text);
    let cards = state.generator().await.flashcards(text, lang).await;
    info!(target: "generation", %lang, cards = cards.len(), quality = ?cards.quality(), "flashcards served");
    cards
}

#[instrument(level = "info", skip(state, text, target_language), fields(text_len = text.len(), %target_language))]
pub async fn do_translate(state: &AppState, text: &str, target_language: &str) -> TranslateOut {
    let target = resolve_language(Some(target_language), text);
    let translation = state.generator().await.translate(text, target).await;
    TranslateOut { translation, target_language: target }
}

#[instrument(level = "info", skip(state, text, languages), fields(text_len = text.len(), languages = languages.len()))]
pub async fn do_multilingual(state: &AppState, text: &str, languages: &[String], difficulty: Option<&str>) -> MultilingualOut {
    let run_id = Uuid::new_v4().to_string();
    let difficulty = resolve_difficulty(difficulty);
    let generator = state.generator().await;
    let results = generate_for_languages(&generator, text, languages, difficulty).await;
    info!(target: "generation", %run_id, languages = results.len(), "multilingual run finished");
    MultilingualOut { run_id, results }
}

#[instrument(level = "info", skip(text), fields(text_len = text.len()))]
pub fn do_analyze(text: &str) -> DocumentAnalysis {
    let analysis = DocumentAnalysis::of(text);
    debug!(target: "generation", key_terms = analysis.key_terms.len(), topics = analysis.topics.len(), document_type = %analysis.document_type, "document analyzed");
    analysis
}

#[instrument(level = "info", skip(state, title, text, question), fields(%title, question_len = question.len()))]
pub async fn do_tutor(state: &AppState, title: &str, text: &str, question: &str) -> TutorReply {
    let reply = state.tutor().await.answer(title, text, question).await;
    info!(target: "tutor", source = ?reply.source, reply_len = reply.text.len(), "tutor reply served");
    reply
}

#[instrument(level = "info", skip(state, question, context), fields(question_len = question.len()))]
pub async fn do_assistant(state: &AppState, question: &str, context: Option<&str>) -> TutorReply {
    let reply = state.tutor().await.assist(question, context).await;
    info!(target: "tutor", source = ?reply.source, reply_len = reply.text.len(), "assistant reply served");
    reply
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_language_follows_the_document() {
        assert_eq!(resolve_language(None, "देश विकास"), Language::Hi);
        assert_eq!(resolve_language(Some(" "), "plain english"), Language::En);
        assert_eq!(resolve_language(Some("FR"), "देश विकास"), Language::Fr);
        assert_eq!(resolve_language(Some("klingon"), "देश विकास"), Language::En);
    }

    #[test]
    fn bad_difficulty_is_medium() {
        assert_eq!(resolve_difficulty(Some("HARD")), Difficulty::Hard);
        assert_eq!(resolve_difficulty(Some("impossible")), Difficulty::Medium);
        assert_eq!(resolve_difficulty(None), Difficulty::Medium);
    }
}
