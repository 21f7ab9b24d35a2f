//! StudyGenie backend: summaries, quizzes and flashcards generated from extracted
//! document text by a generative model, with deterministic fallbacks, multilingual
//! variants and a document tutor.

pub mod analysis;
pub mod client;
pub mod config;
pub mod domain;
pub mod fallback;
pub mod generator;
pub mod language;
pub mod logic;
pub mod multilingual;
pub mod openai;
pub mod prompt;
pub mod protocol;
pub mod routes;
pub mod seeds;
pub mod state;
pub mod telemetry;
pub mod tutor;
pub mod util;
pub mod validate;

pub use client::{ClientError, TextGenerator};
pub use generator::{ArtifactKind, ContentGenerator, GenerationError, GenerationRequest};
pub use routes::build_router;
pub use state::AppState;
