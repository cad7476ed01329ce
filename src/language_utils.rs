use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for ISO language code handling
///
/// This module maps application-level language tags (possibly region-qualified,
/// e.g. "en-US") to the primary ISO 639-1 code the speech-recognition engine
/// expects, and validates codes before external invocation.
/// Extract the primary subtag from a possibly region-qualified language tag
///
/// "en-US" -> "en", "pt-BR" -> "pt", "en" -> "en". The subtag is lowercased
/// but not validated; use [`normalize_to_part1`] for validation.
pub fn primary_subtag(tag: &str) -> String {
    tag.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or("")
        .to_lowercase()
}

/// Normalize a language tag to a valid ISO 639-1 (2-letter) code
///
/// Accepts region-qualified tags ("en-US"), bare 2-letter codes ("en") and
/// 3-letter codes ("eng"). Fails if the tag does not resolve to a language
/// with an ISO 639-1 representation.
pub fn normalize_to_part1(tag: &str) -> Result<String> {
    let primary = primary_subtag(tag);

    if primary.len() == 2 {
        if Language::from_639_1(&primary).is_some() {
            return Ok(primary);
        }
    } else if primary.len() == 3 {
        if let Some(lang) = Language::from_639_3(&primary) {
            if let Some(part1) = lang.to_639_1() {
                return Ok(part1.to_string());
            }
        }
    }

    Err(anyhow!("Invalid language tag: {}", tag))
}

/// Check if two language tags refer to the same language
///
/// Compares primary subtags after normalization, so "en-US" matches "en"
/// and "eng" matches "en".
pub fn language_tags_match(tag1: &str, tag2: &str) -> bool {
    match (normalize_to_part1(tag1), normalize_to_part1(tag2)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Get the English name of a language from its tag
pub fn get_language_name(tag: &str) -> Result<String> {
    let part1 = normalize_to_part1(tag)?;
    Language::from_639_1(&part1)
        .map(|lang| lang.to_name().to_string())
        .ok_or_else(|| anyhow!("Unknown language tag: {}", tag))
}
