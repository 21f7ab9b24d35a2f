//! Script-range language detection and the language lookup table used in prompts.
//!
//! Detection is a coarse heuristic: Devanagari share of alphabetic characters decides
//! between English and {Hindi, Marathi}, and a pair of marker-word lists decides between
//! the latter two. It is not a general language identifier.

use crate::domain::Language;
use crate::util::is_devanagari;

const DEVANAGARI_RATIO: f32 = 0.3;

const MARATHI_MARKERS: [&str; 10] =
  ["आहे", "होते", "करणे", "असे", "त्या", "त्यांना", "मराठी", "महाराष्ट्र", "मुंबई", "पुणे"];
const HINDI_MARKERS: [&str; 10] =
  ["है", "था", "करना", "ऐसे", "उन", "उनको", "हिंदी", "भारत", "दिल्ली", "मुंबई"];

/// Share of Devanagari chars among alphabetic chars. Non-alphabetic Devanagari-block
/// chars (virama, danda, digits) count on both sides.
fn devanagari_ratio(text: &str) -> f32 {
  let mut deva = 0usize;
  let mut total = 0usize;
  for ch in text.chars() {
    let d = is_devanagari(ch);
    if d || ch.is_alphabetic() {
      total += 1;
      if d { deva += 1; }
    }
  }
  if total == 0 { 0.0 } else { deva as f32 / total as f32 }
}

/// Detect the primary language of extracted text: always one of En, Hi, Mr.
pub fn detect_language(text: &str) -> Language {
  if text.is_empty() {
    return Language::En;
  }
  if devanagari_ratio(text) <= DEVANAGARI_RATIO {
    return Language::En;
  }
  let marathi = MARATHI_MARKERS.iter().filter(|w| text.contains(*w)).count();
  let hindi = HINDI_MARKERS.iter().filter(|w| text.contains(*w)).count();
  if marathi > hindi { Language::Mr } else { Language::Hi }
}

/// Display name for a language code; unknown codes read as English.
pub fn language_name(code: &str) -> &'static str {
  Language::from_code(code).map(|l| l.name()).unwrap_or("English")
}

/// Localized task instructions embedded in prompts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaskPhrases {
  pub summary: &'static str,
  pub quiz: &'static str,
  pub flashcards: &'static str,
}

pub fn task_phrases(lang: Language) -> TaskPhrases {
  match lang {
    Language::Hi => TaskPhrases {
      summary: "हिंदी में एक व्यापक सारांश लिखें",
      quiz: "हिंदी में प्रश्नोत्तरी के प्रश्न बनाएं",
      flashcards: "हिंदी में फ्लैशकार्ड बनाएं",
    },
    Language::Mr => TaskPhrases {
      summary: "मराठीत एक सर्वसमावेशक सारांश लिहा",
      quiz: "मराठीत प्रश्नमंजुषा प्रश्न तयार करा",
      flashcards: "मराठीत फ्लॅशकार्ड तयार करा",
    },
    _ => TaskPhrases {
      summary: "Write a comprehensive summary in English",
      quiz: "Create quiz questions in English",
      flashcards: "Create flashcards in English",
    },
  }
}

/// "What is X?" in the detected language of the document.
pub fn what_is_question(lang: Language, concept: &str) -> String {
  match lang {
    Language::Hi => format!("{} क्या है?", concept),
    Language::Mr => format!("{} काय आहे?", concept),
    _ => format!("What is {}?", concept),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn latin_text_is_english() {
    assert_eq!(detect_language("Loops repeat a block of code."), Language::En);
    assert_eq!(detect_language(""), Language::En);
    assert_eq!(detect_language("1234 !!"), Language::En);
  }

  #[test]
  fn non_alphabetic_devanagari_counts_toward_the_ratio() {
    assert!('क'.is_alphabetic() && 'ि'.is_alphabetic());
    assert!(!'१'.is_alphabetic() && !'।'.is_alphabetic());
    assert_eq!(devanagari_ratio("१२३ abc"), 0.5);
    assert_eq!(devanagari_ratio("कि।"), 1.0);
    assert_eq!(devanagari_ratio("12 ab"), 0.0);
  }

  #[test]
  fn devanagari_without_markers_defaults_to_hindi() {
    assert_eq!(detect_language("देश विकास"), Language::Hi);
  }

  #[test]
  fn marathi_markers_win_when_more_frequent() {
    let text = "ही मराठी भाषा आहे आणि पुणे शहर महाराष्ट्र राज्यात आहे";
    assert_eq!(detect_language(text), Language::Mr);
  }

  #[test]
  fn hindi_markers_win_when_more_frequent() {
    let text = "यह हिंदी भाषा है और दिल्ली भारत की राजधानी है";
    assert_eq!(detect_language(text), Language::Hi);
  }

  #[test]
  fn mostly_english_with_some_devanagari_stays_english() {
    let text = "This chapter explains variables and loops in detail देश";
    assert_eq!(detect_language(text), Language::En);
  }

  #[test]
  fn detection_is_idempotent() {
    let text = "ही मराठी भाषा आहे";
    assert_eq!(detect_language(text), detect_language(text));
  }

  #[test]
  fn language_names_fall_back_to_english() {
    assert_eq!(language_name("mr"), "Marathi");
    assert_eq!(language_name("DE"), "German");
    assert_eq!(language_name("xx"), "English");
  }

  #[test]
  fn question_phrasing_follows_language() {
    assert_eq!(what_is_question(Language::En, "Loop"), "What is Loop?");
    assert_eq!(what_is_question(Language::Hi, "लूप"), "लूप क्या है?");
    assert_eq!(what_is_question(Language::Mr, "लूप"), "लूप काय आहे?");
  }
}
