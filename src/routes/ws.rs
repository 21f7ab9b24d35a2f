//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{info, error, instrument, debug};
use uuid::Uuid;

use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::logic::*;
use crate::state::AppState;

#[instrument(level = "info", skip(ws, state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "studygenie_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state), fields(conn_id = %Uuid::new_v4()))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "studygenie_backend", "WebSocket connected");
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        // Parse, dispatch, serialize response.
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => handle_client_ws(incoming, &state).await,
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "studygenie_backend", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "studygenie_backend", "WebSocket disconnected");
}

/// One request, one reply. Shared with the HTTP handlers through `logic`.
pub async fn handle_client_ws(msg: ClientWsMessage, state: &AppState) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::Summary { text, language } => {
      debug!(target: "studygenie_backend", text_len = text.len(), "WS summary");
      ServerWsMessage::Summary { summary: do_summary(state, &text, language.as_deref()).await }
    }

    ClientWsMessage::Quiz { text, difficulty, language } => {
      debug!(target: "studygenie_backend", text_len = text.len(), "WS quiz");
      ServerWsMessage::Quiz { quiz: do_quiz(state, &text, difficulty.as_deref(), language.as_deref()).await }
    }

    ClientWsMessage::Flashcards { text, language } => {
      debug!(target: "studygenie_backend", text_len = text.len(), "WS flashcards");
      ServerWsMessage::Flashcards { flashcards: do_flashcards(state, &text, language.as_deref()).await }
    }

    ClientWsMessage::Translate { text, target_language } => {
      let out = do_translate(state, &text, &target_language).await;
      ServerWsMessage::Translate { text, translation: out.translation, target_language: out.target_language }
    }

    ClientWsMessage::Multilingual { text, languages, difficulty } => {
      ServerWsMessage::Multilingual(do_multilingual(state, &text, &languages, difficulty.as_deref()).await)
    }

    ClientWsMessage::Analyze { text } => ServerWsMessage::Analysis { analysis: do_analyze(&text) },

    ClientWsMessage::Tutor { question, title, text } => {
      ServerWsMessage::TutorReply { reply: do_tutor(state, &title, &text, &question).await }
    }

    ClientWsMessage::Assistant { question, context } => {
      ServerWsMessage::TutorReply { reply: do_assistant(state, &question, context.as_deref()).await }
    }
  }
}
