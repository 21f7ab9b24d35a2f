//! StudyGenie · Study Content Backend
//!
//! - Axum HTTP + WebSocket API
//! - Optional OpenAI-compatible integration (via environment variables)
//! - Deterministic fallback generation when the model is unavailable
//!
//! Important env variables:
//!   PORT              : u16 (default 3000)
//!   OPENAI_API_KEY    : enables the AI backend if present
//!   OPENAI_BASE_URL   : default "https://api.openai.com/v1"
//!   OPENAI_MODEL      : default "gpt-4o-mini"
//!   AI_TIMEOUT_SECS   : per-call deadline (default 30)
//!   AGENT_CONFIG_PATH : path to TOML config ([ai], [generation], [prompts])
//!   LOG_LEVEL         : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT        : "pretty" (default) or "json"
//!
//! On Unix, SIGHUP re-reads env + TOML and swaps the generator in place.

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, error};

use studygenie_backend::{build_router, telemetry, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Build shared application state (generator from env + TOML).
  let state = Arc::new(AppState::new());

  #[cfg(unix)]
  spawn_reload_on_sighup(state.clone());

  // Build the HTTP router with routes, CORS and tracing layers.
  let app = build_router(state.clone());

  // Read port from env or default to 3000.
  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "studygenie_backend", %addr, "HTTP server listening");
  axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
  info!(target: "studygenie_backend", "HTTP server stopped");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    error!(target: "studygenie_backend", error = %e, "Failed to listen for Ctrl-C");
    std::future::pending::<()>().await;
  }
  info!(target: "studygenie_backend", "Shutdown requested");
}

#[cfg(unix)]
fn spawn_reload_on_sighup(state: Arc<AppState>) {
  use tokio::signal::unix::{signal, SignalKind};

  tokio::spawn(async move {
    let mut hup = match signal(SignalKind::hangup()) {
      Ok(s) => s,
      Err(e) => {
        error!(target: "studygenie_backend", error = %e, "SIGHUP handler unavailable; reload disabled");
        return;
      }
    };
    while hup.recv().await.is_some() {
      info!(target: "studygenie_backend", "SIGHUP received; reloading configuration");
      state.reload_from_env().await;
    }
  });
}
