//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.
//!
//! Language and difficulty arrive as plain strings and are resolved leniently in `logic`,
//! so a bad value degrades to a default instead of rejecting the request.

use serde::{Deserialize, Serialize};

use crate::analysis::DocumentAnalysis;
use crate::domain::{FlashcardSet, Language, QuizQuestionSet, Summary};
use crate::multilingual::LanguageResults;
use crate::tutor::TutorReply;

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    Summary {
        text: String,
        #[serde(default)]
        language: Option<String>,
    },
    Quiz {
        text: String,
        #[serde(default)]
        difficulty: Option<String>,
        #[serde(default)]
        language: Option<String>,
    },
    Flashcards {
        text: String,
        #[serde(default)]
        language: Option<String>,
    },
    Translate {
        text: String,
        target_language: String,
    },
    Multilingual {
        text: String,
        languages: Vec<String>,
        #[serde(default)]
        difficulty: Option<String>,
    },
    Analyze {
        text: String,
    },
    Tutor {
        question: String,
        title: String,
        text: String,
    },
    Assistant {
        question: String,
        #[serde(default)]
        context: Option<String>,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Summary {
        summary: Summary,
    },
    Quiz {
        quiz: QuizQuestionSet,
    },
    Flashcards {
        flashcards: FlashcardSet,
    },
    Translate {
        text: String,
        translation: String,
        target_language: Language,
    },
    Multilingual(MultilingualOut),
    Analysis {
        analysis: DocumentAnalysis,
    },
    TutorReply {
        reply: TutorReply,
    },
    Error {
        message: String,
    },
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct SummaryIn {
    pub text: String,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct QuizIn {
    pub text: String,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FlashcardsIn {
    pub text: String,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TranslateIn {
    pub text: String,
    pub target_language: String,
}
#[derive(Debug, Serialize)]
pub struct TranslateOut {
    pub translation: String,
    pub target_language: Language,
}

#[derive(Debug, Deserialize)]
pub struct MultilingualIn {
    pub text: String,
    pub languages: Vec<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
}
#[derive(Debug, Serialize)]
pub struct MultilingualOut {
    pub run_id: String,
    pub results: LanguageResults,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeIn {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct TutorIn {
    pub question: String,
    pub title: String,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct AssistantIn {
    pub question: String,
    #[serde(default)]
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthOut {
    pub ok: bool,
    pub ai_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}
