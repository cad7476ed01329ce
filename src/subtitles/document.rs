use std::fmt;
use anyhow::{Result, anyhow};
use log::warn;

// @module: Caption cue model

/// Slack allowed between the last cue's end and the annotated track's end, in ms.
/// Accounts for millisecond rounding of floating-point cue boundaries.
pub const DOCUMENT_END_EPSILON_MS: u64 = 50;

// @struct: Single timed caption entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    // @field: 1-based sequence number
    pub index: usize,

    // @field: Start time in ms from track zero
    pub start_ms: u64,

    // @field: End time in ms from track zero
    pub end_ms: u64,

    // @field: Caption text
    pub text: String,
}

impl Cue {
    /// Creates a new cue without validation - used by tests and internal builders
    pub fn new(index: usize, start_ms: u64, end_ms: u64, text: String) -> Self {
        Cue {
            index,
            start_ms,
            end_ms,
            text,
        }
    }

    // @creates: Validated cue
    // @validates: Time range and non-empty text
    pub fn new_validated(index: usize, start_ms: u64, end_ms: u64, text: String) -> Result<Self> {
        if end_ms <= start_ms {
            return Err(anyhow!(
                "Invalid time range: end time {} <= start time {}",
                end_ms,
                start_ms
            ));
        }

        let trimmed_text = text.trim();
        if trimmed_text.is_empty() {
            return Err(anyhow!("Empty cue text for entry {}", index));
        }

        Ok(Cue {
            index,
            start_ms,
            end_ms,
            text: trimmed_text.to_string(),
        })
    }

    /// Cue duration in milliseconds
    pub fn duration_ms(&self) -> u64 {
        self.end_ms - self.start_ms
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        Self::format_timestamp(self.start_ms)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        Self::format_timestamp(self.end_ms)
    }

    /// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
    pub fn format_timestamp(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Ordered collection of cues annotating one track.
///
/// Insertion order is temporal order: cues are ascending by start with no
/// overlap (`cue[i].end <= cue[i+1].start`, equality allowed), and a non-empty
/// document starts at zero relative to the track it annotates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubtitleDocument {
    /// Cues in temporal order
    pub cues: Vec<Cue>,
}

impl SubtitleDocument {
    pub fn new() -> Self {
        SubtitleDocument { cues: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    /// Build a document from possibly unsorted, possibly overlapping cues.
    ///
    /// Sorts by start time, clips each cue's end to the next cue's start, drops
    /// cues emptied by clipping, and renumbers 1..N so the document invariant
    /// holds regardless of what the source produced.
    pub fn from_unordered(mut cues: Vec<Cue>) -> Self {
        cues.sort_by_key(|cue| cue.start_ms);

        let mut normalized: Vec<Cue> = Vec::with_capacity(cues.len());
        for i in 0..cues.len() {
            let mut cue = cues[i].clone();
            if let Some(next) = cues.get(i + 1) {
                if cue.end_ms > next.start_ms {
                    cue.end_ms = next.start_ms;
                }
            }
            if cue.end_ms <= cue.start_ms {
                warn!("Dropping cue {} emptied by overlap clipping", cue.index);
                continue;
            }
            normalized.push(cue);
        }

        for (i, cue) in normalized.iter_mut().enumerate() {
            cue.index = i + 1;
        }

        SubtitleDocument { cues: normalized }
    }

    /// Check the document invariant against the duration of the track it annotates
    pub fn validate_against_track(&self, track_duration_ms: u64) -> Result<()> {
        let Some(first) = self.cues.first() else {
            return Ok(());
        };

        if first.start_ms != 0 {
            return Err(anyhow!(
                "First cue starts at {}ms, expected 0",
                first.start_ms
            ));
        }

        if let Some(last) = self.cues.last() {
            if last.end_ms > track_duration_ms + DOCUMENT_END_EPSILON_MS {
                return Err(anyhow!(
                    "Last cue ends at {}ms, beyond track duration {}ms",
                    last.end_ms,
                    track_duration_ms
                ));
            }
        }

        for pair in self.cues.windows(2) {
            if pair[0].end_ms > pair[1].start_ms {
                return Err(anyhow!(
                    "Cues {} and {} overlap",
                    pair[0].index,
                    pair[1].index
                ));
            }
        }

        Ok(())
    }
}

impl fmt::Display for SubtitleDocument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Document")?;
        writeln!(f, "Cues: {}", self.cues.len())?;
        Ok(())
    }
}
