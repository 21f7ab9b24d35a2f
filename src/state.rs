//! Application state: the configured content generator, shared by every handler.
//!
//! The generator is built once from env + optional TOML config and held behind an
//! async RwLock so `reconfigure` can swap it without restarting the server. Handlers take
//! a cheap clone (it is a bundle of `Arc`s) and never hold the lock across a model call.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, instrument};

use crate::config::{load_agent_config_from_env, AgentConfig, AiSettings};
use crate::generator::ContentGenerator;
use crate::tutor::Tutor;

#[derive(Clone)]
pub struct AppState {
    generator: Arc<RwLock<ContentGenerator>>,
}

impl AppState {
    /// Build state from env: load TOML config (if any), resolve AI settings, build the generator.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let cfg = load_agent_config_from_env().unwrap_or_default();
        let settings = AiSettings::resolve(&cfg.ai);
        Self::with_generator(ContentGenerator::from_config(&settings, &cfg))
    }

    pub fn with_generator(generator: ContentGenerator) -> Self {
        Self {
            generator: Arc::new(RwLock::new(generator)),
        }
    }

    /// Snapshot of the current generator.
    pub async fn generator(&self) -> ContentGenerator {
        self.generator.read().await.clone()
    }

    pub async fn tutor(&self) -> Tutor {
        Tutor::new(self.generator().await)
    }

    /// Replace the generator. In-flight requests finish with the one they started with.
    #[instrument(level = "info", skip_all, fields(model = %settings.model, has_key = settings.api_key.is_some()))]
    pub async fn reconfigure(&self, settings: &AiSettings, cfg: &AgentConfig) {
        let next = ContentGenerator::from_config(settings, cfg);
        *self.generator.write().await = next;
        info!(target: "studygenie_backend", "Generator reconfigured");
    }

    /// Re-read env + TOML and reconfigure.
    pub async fn reload_from_env(&self) {
        let cfg = load_agent_config_from_env().unwrap_or_default();
        let settings = AiSettings::resolve(&cfg.ai);
        self.reconfigure(&settings, &cfg).await;
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationOptions;

    #[tokio::test]
    async fn reconfigure_swaps_the_generator() {
        let state = AppState::with_generator(ContentGenerator::offline(Arc::new(Default::default())));
        assert!(!state.generator().await.is_online());

        let settings = AiSettings {
            api_key: Some("sk-test".into()),
            model: "gpt-test".into(),
            ..AiSettings::default()
        };
        let cfg = AgentConfig {
            generation: GenerationOptions { shuffle_quiz_options: true },
            ..AgentConfig::default()
        };
        state.reconfigure(&settings, &cfg).await;

        let gen = state.generator().await;
        assert!(gen.is_online());
        assert_eq!(gen.model(), Some("gpt-test"));
        assert!(gen.options().shuffle_quiz_options);
    }
}
