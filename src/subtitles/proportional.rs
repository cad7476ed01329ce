use log::debug;

use crate::subtitles::document::{Cue, SubtitleDocument};

// @module: Heuristic cue timing from word-count proportions

/// Heuristic cue-timing strategy driven purely by word counts.
///
/// Splits the spoken text into units, then allocates each unit a share of the
/// target duration proportional to its word count. A pure function: the same
/// text and duration always produce the same document, and a unit with more
/// words never receives less time than a shorter one.
pub struct ProportionalTextTimer;

impl ProportionalTextTimer {
    /// Produce a document covering exactly `target_duration` seconds.
    ///
    /// Empty or whitespace-only text yields an empty document, not an error.
    pub fn time_text(text: &str, target_duration: f64) -> SubtitleDocument {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return SubtitleDocument::new();
        }

        let (units, separator) = Self::segment_units(trimmed);
        let word_counts: Vec<usize> = units
            .iter()
            .map(|unit| unit.split_whitespace().count())
            .collect();
        let total_words: usize = word_counts.iter().sum();

        debug!(
            "Proportional timing: {} units, {} words over {:.3}s",
            units.len(),
            total_words,
            target_duration
        );

        // Cue boundaries in ms, strictly increasing. Interior boundaries come
        // from cumulative word fractions; the last is pinned to the target.
        let target_ms = (target_duration * 1000.0).round() as u64;
        let mut boundaries_ms: Vec<u64> = Vec::with_capacity(units.len() + 1);
        boundaries_ms.push(0);

        let mut previous = 0u64;
        let mut words_so_far = 0usize;
        for count in word_counts.iter().take(units.len() - 1) {
            words_so_far += count;
            let fraction = words_so_far as f64 / total_words as f64;
            let boundary =
                ((fraction * target_duration * 1000.0).round() as u64).max(previous + 1);
            boundaries_ms.push(boundary);
            previous = boundary;
        }
        boundaries_ms.push(target_ms.max(previous + 1));

        let cues = units
            .into_iter()
            .enumerate()
            .map(|(i, unit)| {
                Cue::new(
                    i + 1,
                    boundaries_ms[i],
                    boundaries_ms[i + 1],
                    Self::restore_punctuation(unit, separator, i == boundaries_ms.len() - 2),
                )
            })
            .collect();

        SubtitleDocument { cues }
    }

    /// Segment text into caption units.
    ///
    /// Splits on `". "` first; if that yields one unit and the text contains
    /// commas, splits on `", "` instead; otherwise the whole text is one unit.
    fn segment_units(text: &str) -> (Vec<String>, char) {
        let sentences: Vec<String> = text
            .split(". ")
            .map(|unit| unit.trim().to_string())
            .filter(|unit| !unit.is_empty())
            .collect();

        if sentences.len() > 1 {
            return (sentences, '.');
        }

        if text.contains(',') {
            let clauses: Vec<String> = text
                .split(", ")
                .map(|unit| unit.trim().to_string())
                .filter(|unit| !unit.is_empty())
                .collect();

            if clauses.len() > 1 {
                return (clauses, ',');
            }
        }

        (vec![text.to_string()], '.')
    }

    /// Restore the separator's terminal punctuation to non-final units missing
    /// it; unit text is otherwise preserved exactly.
    fn restore_punctuation(unit: String, separator: char, is_final: bool) -> String {
        if is_final {
            return unit;
        }

        match unit.chars().last() {
            Some(last) if ".!?,;:\u{2026}".contains(last) => unit,
            Some(_) => {
                let mut restored = unit;
                restored.push(separator);
                restored
            }
            None => unit,
        }
    }
}
