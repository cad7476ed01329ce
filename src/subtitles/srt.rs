use std::fs;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use anyhow::{Result, Context, anyhow};
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::subtitles::document::{Cue, SubtitleDocument};

// @module: SRT serialization for subtitle documents

// @const: SRT time-range regex, hours unbounded
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2,}):(\d{2}):(\d{2}),(\d{3}) --> (\d{2,}):(\d{2}):(\d{2}),(\d{3})").unwrap()
});

/// Serializes a [`SubtitleDocument`] to the indexed SRT block format and back.
///
/// Each block is an index line, a `HH:MM:SS,mmm --> HH:MM:SS,mmm` time-range
/// line, the cue text on one or more lines, and a blank separator. Round trip
/// reproduces the document up to millisecond rounding.
pub struct SrtSerializer;

impl SrtSerializer {
    /// Render a document as SRT text
    pub fn serialize(document: &SubtitleDocument) -> String {
        let mut output = String::new();
        for cue in &document.cues {
            output.push_str(&cue.to_string());
        }
        output
    }

    /// Write a document to an SRT file, creating parent directories if needed
    pub fn write_to_file<P: AsRef<Path>>(document: &SubtitleDocument, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let mut file = File::create(path)
            .with_context(|| format!("Failed to create subtitle file: {}", path.display()))?;

        for cue in &document.cues {
            write!(file, "{}", cue)?;
        }

        Ok(())
    }

    /// Parse an SRT file into a document
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<SubtitleDocument> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read subtitle file: {}", path.as_ref().display()))?;
        Self::parse(&content)
    }

    /// Parse SRT text into a document.
    ///
    /// Tolerant of unsorted and overlapping input: cues are sorted by start,
    /// clipped against their successor, and renumbered 1..N. Empty content
    /// yields an empty document.
    pub fn parse(content: &str) -> Result<SubtitleDocument> {
        let mut cues = Vec::new();

        // State variables for parsing
        let mut current_index: Option<usize> = None;
        let mut current_start_ms: Option<u64> = None;
        let mut current_end_ms: Option<u64> = None;
        let mut current_text = String::new();
        let mut line_count = 0;

        let mut push_current =
            |index: usize, start_ms: u64, end_ms: u64, text: &str| match Cue::new_validated(
                index,
                start_ms,
                end_ms,
                text.trim().to_string(),
            ) {
                Ok(cue) => cues.push(cue),
                Err(e) => warn!("Skipping invalid cue {}: {}", index, e),
            };

        for line in content.lines() {
            line_count += 1;
            let trimmed = line.trim();

            // A blank line finalizes the cue in progress; state is reset
            // either way so a textless header cannot absorb the next block
            if trimmed.is_empty() {
                if let (Some(index), Some(start_ms), Some(end_ms)) =
                    (current_index, current_start_ms, current_end_ms)
                {
                    if !current_text.is_empty() {
                        push_current(index, start_ms, end_ms, &current_text);
                    } else {
                        warn!("Discarding cue {} with no text at line {}", index, line_count);
                    }
                }

                current_index = None;
                current_start_ms = None;
                current_end_ms = None;
                current_text.clear();
                continue;
            }

            // Try to parse as sequence number (only when starting a new block)
            if current_index.is_none() && current_text.is_empty() {
                if let Ok(num) = trimmed.parse::<usize>() {
                    current_index = Some(num);
                    continue;
                }
            }

            // Try to parse as time-range line
            if current_index.is_some() && current_start_ms.is_none() && current_end_ms.is_none() {
                if let Some(caps) = TIMESTAMP_REGEX.captures(trimmed) {
                    current_start_ms = Some(Self::captured_timestamp_ms(&caps, 1));
                    current_end_ms = Some(Self::captured_timestamp_ms(&caps, 5));
                    continue;
                }
                warn!(
                    "Expected time range at line {}, treating as text: {}",
                    line_count, trimmed
                );
            }

            // With index and times in hand, remaining lines are cue text
            if current_index.is_some() && current_start_ms.is_some() && current_end_ms.is_some() {
                if !current_text.is_empty() {
                    current_text.push('\n');
                }
                current_text.push_str(trimmed);
            } else {
                warn!(
                    "Unexpected text at line {} before index or time range: {}",
                    line_count, trimmed
                );
            }
        }

        // Finalize a trailing cue without a closing blank line
        if let (Some(index), Some(start_ms), Some(end_ms)) =
            (current_index, current_start_ms, current_end_ms)
        {
            if !current_text.is_empty() {
                push_current(index, start_ms, end_ms, &current_text);
            }
        }

        if cues.is_empty() && !content.trim().is_empty() {
            return Err(anyhow!("No valid cues were found in the SRT content"));
        }

        Ok(SubtitleDocument::from_unordered(cues))
    }

    /// Parse an SRT timestamp (HH:MM:SS,mmm) to milliseconds
    pub fn parse_timestamp(timestamp: &str) -> Result<u64> {
        let parts: Vec<&str> = timestamp.split([':', ',', '.']).collect();

        if parts.len() != 4 {
            return Err(anyhow!("Invalid timestamp format: {}", timestamp));
        }

        let hours: u64 = parts[0].parse().context("Failed to parse hours")?;
        let minutes: u64 = parts[1].parse().context("Failed to parse minutes")?;
        let seconds: u64 = parts[2].parse().context("Failed to parse seconds")?;
        let millis: u64 = parts[3].parse().context("Failed to parse milliseconds")?;

        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return Err(anyhow!(
                "Invalid time components in timestamp: {}",
                timestamp
            ));
        }

        Ok(hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis)
    }

    /// Milliseconds from four consecutive capture groups starting at `start_idx`
    fn captured_timestamp_ms(caps: &regex::Captures, start_idx: usize) -> u64 {
        let hours: u64 = caps
            .get(start_idx)
            .map_or(0, |m| m.as_str().parse().unwrap_or(0));
        let minutes: u64 = caps
            .get(start_idx + 1)
            .map_or(0, |m| m.as_str().parse().unwrap_or(0));
        let seconds: u64 = caps
            .get(start_idx + 2)
            .map_or(0, |m| m.as_str().parse().unwrap_or(0));
        let millis: u64 = caps
            .get(start_idx + 3)
            .map_or(0, |m| m.as_str().parse().unwrap_or(0));

        (hours * 3600 + minutes * 60 + seconds) * 1000 + millis
    }
}
