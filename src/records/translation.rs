//! Language selection for GTFS-RT translated strings.

use serde::Serialize;

use crate::gtfs_rt::TranslatedString;
use crate::gtfs_rt::translated_string::Translation;

/// Language used for alert text unless configured otherwise.
pub const DEFAULT_LANGUAGE: &str = "he";

/// A single translation, passed through verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslationRecord {
    pub language: Option<String>,
    pub text: String,
}

impl From<&Translation> for TranslationRecord {
    fn from(t: &Translation) -> Self {
        TranslationRecord {
            language: t.language.clone(),
            text: t.text.clone(),
        }
    }
}

/// Reduces a BCP-47 tag to its lowercase primary subtag.
///
/// `iw` is the withdrawn code for Hebrew and still shows up in feeds.
fn primary_subtag(tag: &str) -> String {
    let primary = tag
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    if primary == "iw" {
        "he".to_string()
    } else {
        primary
    }
}

/// True when `tag` names the same language as `preferred`.
pub fn language_matches(tag: &str, preferred: &str) -> bool {
    primary_subtag(tag) == primary_subtag(preferred)
}

/// Picks the text to export from a translated string.
///
/// The first non-empty translation in `preferred` wins, otherwise the first
/// translation is used.
pub fn select_text(ts: Option<&TranslatedString>, preferred: &str) -> Option<String> {
    let translations = &ts?.translation;

    translations
        .iter()
        .find(|t| {
            !t.text.is_empty()
                && t
                    .language
                    .as_deref()
                    .is_some_and(|lang| language_matches(lang, preferred))
        })
        .or_else(|| translations.first())
        .map(|t| t.text.clone())
}

/// All translations of `ts`, in feed order.
pub fn all_translations(ts: Option<&TranslatedString>) -> Vec<TranslationRecord> {
    ts.map(|ts| ts.translation.iter().map(TranslationRecord::from).collect())
        .unwrap_or_default()
}
