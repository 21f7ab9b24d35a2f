//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs request sizes and basic result info.

use std::sync::Arc;
use axum::{extract::State, Json, response::IntoResponse};
use tracing::instrument;

use crate::protocol::*;
use crate::state::AppState;
use crate::logic::*;

#[instrument(level = "info", skip(state))]
pub async fn http_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let generator = state.generator().await;
  Json(HealthOut { ok: true, ai_enabled: generator.is_online(), model: generator.model().map(str::to_string) })
}

#[instrument(level = "info", skip(state, body), fields(text_len = body.text.len()))]
pub async fn http_post_summary(
  State(state): State<Arc<AppState>>,
  Json(body): Json<SummaryIn>,
) -> impl IntoResponse {
  Json(do_summary(&state, &body.text, body.language.as_deref()).await)
}

#[instrument(level = "info", skip(state, body), fields(text_len = body.text.len()))]
pub async fn http_post_quiz(
  State(state): State<Arc<AppState>>,
  Json(body): Json<QuizIn>,
) -> impl IntoResponse {
  Json(do_quiz(&state, &body.text, body.difficulty.as_deref(), body.language.as_deref()).await)
}

#[instrument(level = "info", skip(state, body), fields(text_len = body.text.len()))]
pub async fn http_post_flashcards(
  State(state): State<Arc<AppState>>,
  Json(body): Json<FlashcardsIn>,
) -> impl IntoResponse {
  Json(do_flashcards(&state, &body.text, body.language.as_deref()).await)
}

#[instrument(level = "info", skip(state, body), fields(text_len = body.text.len(), target = %body.target_language))]
pub async fn http_post_translate(
  State(state): State<Arc<AppState>>,
  Json(body): Json<TranslateIn>,
) -> impl IntoResponse {
  Json(do_translate(&state, &body.text, &body.target_language).await)
}

#[instrument(level = "info", skip(state, body), fields(text_len = body.text.len(), languages = body.languages.len()))]
pub async fn http_post_multilingual(
  State(state): State<Arc<AppState>>,
  Json(body): Json<MultilingualIn>,
) -> impl IntoResponse {
  Json(do_multilingual(&state, &body.text, &body.languages, body.difficulty.as_deref()).await)
}

#[instrument(level = "info", skip(body), fields(text_len = body.text.len()))]
pub async fn http_post_analyze(Json(body): Json<AnalyzeIn>) -> impl IntoResponse {
  Json(do_analyze(&body.text))
}

#[instrument(level = "info", skip(state, body), fields(title = %body.title, question_len = body.question.len()))]
pub async fn http_post_tutor(
  State(state): State<Arc<AppState>>,
  Json(body): Json<TutorIn>,
) -> impl IntoResponse {
  Json(do_tutor(&state, &body.title, &body.text, &body.question).await)
}

#[instrument(level = "info", skip(state, body), fields(question_len = body.question.len()))]
pub async fn http_post_assistant(
  State(state): State<Arc<AppState>>,
  Json(body): Json<AssistantIn>,
) -> impl IntoResponse {
  Json(do_assistant(&state, &body.question, body.context.as_deref()).await)
}
