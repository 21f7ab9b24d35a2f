//! Small utility helpers used across modules.

use std::sync::OnceLock;

use regex::{Captures, Regex};

fn placeholder() -> Option<&'static Regex> {
  static RE: OnceLock<Option<Regex>> = OnceLock::new();
  RE.get_or_init(|| Regex::new(r"\{(\w+)\}").ok()).as_ref()
}

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values in a single pass,
/// so braces inside inserted values are never expanded. Unknown keys are left as-is.
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let Some(re) = placeholder() else {
    return tpl.to_string();
  };
  re.replace_all(tpl, |caps: &Captures| match pairs.iter().find(|(k, _)| *k == &caps[1]) {
    Some((_, v)) => v.to_string(),
    None => caps[0].to_string(),
  })
  .into_owned()
}

/// True if the char belongs to the Devanagari block (Hindi, Marathi).
pub fn is_devanagari(ch: char) -> bool {
  ('\u{0900}'..='\u{097F}').contains(&ch)
}

/// First `max` chars of `s`, cut on a char boundary.
pub fn take_chars(s: &str, max: usize) -> &str {
  match s.char_indices().nth(max) {
    Some((idx, _)) => &s[..idx],
    None => s,
  }
}

/// Like `take_chars`, but appends "..." when something was cut off.
pub fn ellipsize(s: &str, max: usize) -> String {
  let head = take_chars(s, max);
  if head.len() < s.len() { format!("{}...", head) } else { head.to_string() }
}

/// Keep at most `max` whitespace-separated words.
pub fn clamp_words(s: &str, max: usize) -> String {
  let words: Vec<&str> = s.split_whitespace().collect();
  if words.len() <= max {
    words.join(" ")
  } else {
    format!("{}...", words[..max].join(" "))
  }
}

pub fn word_count(s: &str) -> usize {
  s.split_whitespace().count()
}

/// Sentences as the heuristics see them: newlines folded to spaces, split on '.',
/// trimmed, keeping only those longer than `min_len` chars.
pub fn sentences(text: &str, min_len: usize) -> Vec<String> {
  text
    .replace('\n', " ")
    .split('.')
    .map(str::trim)
    .filter(|s| s.chars().count() > min_len)
    .map(str::to_string)
    .collect()
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with huge request/response payloads.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  let head = take_chars(s, max);
  if head.len() == s.len() { s.to_string() } else { format!("{}… ({} bytes total)", head, s.len()) }
}
