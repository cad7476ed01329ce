use std::fmt::Debug;
use std::path::{Path, PathBuf};
use async_trait::async_trait;
use log::{debug, warn};
use serde::Deserialize;
use tokio::process::Command;
use uuid::Uuid;

use crate::errors::TimingError;
use crate::language_utils;
use crate::subtitles::document::{Cue, SubtitleDocument};

// @module: Speech-alignment cue timing via an external recognition engine

/// One recognized speech segment, measured directly from the audio
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptSegment {
    /// Segment start in seconds
    pub start: f64,

    /// Segment end in seconds
    pub end: f64,

    /// Recognized text
    pub text: String,
}

/// Common trait for speech-recognition engines
///
/// This trait defines the boundary to the external recognition collaborator,
/// allowing the process-based whisper engine and test doubles to be used
/// interchangeably by the timing pipeline.
#[async_trait]
pub trait TranscriptionEngine: Send + Sync + Debug {
    /// Transcribe an audio file into timed segments
    ///
    /// # Arguments
    /// * `audio_path` - Audio file to transcribe
    /// * `language` - Optional primary-language code hint (e.g. "en")
    ///
    /// # Returns
    /// * Timed segments, or a timing failure that callers recover from
    async fn transcribe(
        &self,
        audio_path: &Path,
        language: Option<&str>,
    ) -> Result<Vec<TranscriptSegment>, TimingError>;
}

// @struct: Shape of whisper's JSON output we care about
#[derive(Debug, Deserialize)]
struct WhisperOutput {
    #[serde(default)]
    segments: Vec<WhisperSegment>,
}

#[derive(Debug, Deserialize)]
struct WhisperSegment {
    start: f64,
    end: f64,
    text: String,
}

/// Process-based whisper engine
///
/// Invokes the whisper executable with JSON output into a request-scoped
/// directory, then parses the segment list. Every failure mode (missing
/// executable, non-zero exit, timeout, malformed output) surfaces as a
/// [`TimingError`], never as a process-fatal error.
#[derive(Debug, Clone)]
pub struct WhisperEngine {
    /// Whisper executable name or path
    pub executable: String,

    /// Model name passed to the executable
    pub model: String,

    /// Inference timeout in seconds
    pub timeout_secs: u64,
}

impl Default for WhisperEngine {
    fn default() -> Self {
        WhisperEngine {
            executable: "whisper".to_string(),
            model: "base".to_string(),
            timeout_secs: 300,
        }
    }
}

impl WhisperEngine {
    pub fn new(executable: String, model: String, timeout_secs: u64) -> Self {
        WhisperEngine {
            executable,
            model,
            timeout_secs,
        }
    }

    /// Path of the JSON file whisper writes for `audio_path` under `output_dir`
    fn json_output_path(audio_path: &Path, output_dir: &Path) -> PathBuf {
        let stem = audio_path.file_stem().unwrap_or_default();
        output_dir.join(stem).with_extension("json")
    }
}

#[async_trait]
impl TranscriptionEngine for WhisperEngine {
    async fn transcribe(
        &self,
        audio_path: &Path,
        language: Option<&str>,
    ) -> Result<Vec<TranscriptSegment>, TimingError> {
        if !audio_path.exists() {
            return Err(TimingError::AlignmentEngine(format!(
                "Audio file not found: {}",
                audio_path.display()
            )));
        }

        // Request-scoped output directory so concurrent runs cannot collide
        let output_dir = std::env::temp_dir().join(format!("vidweave-whisper-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&output_dir)
            .map_err(|e| TimingError::AlignmentEngine(format!("Failed to create output dir: {}", e)))?;

        let mut args: Vec<String> = vec![
            audio_path.to_string_lossy().to_string(),
            "--model".to_string(),
            self.model.clone(),
            "--output_format".to_string(),
            "json".to_string(),
            "--output_dir".to_string(),
            output_dir.to_string_lossy().to_string(),
        ];
        if let Some(lang) = language {
            args.push("--language".to_string());
            args.push(lang.to_string());
        }

        debug!(
            "Running whisper ({} model) on {:?}",
            self.model, audio_path
        );

        let whisper_future = Command::new(&self.executable).args(&args).output();
        let timeout_duration = std::time::Duration::from_secs(self.timeout_secs);

        let result = tokio::select! {
            result = whisper_future => {
                result.map_err(|e| {
                    let _ = std::fs::remove_dir_all(&output_dir);
                    TimingError::AlignmentEngine(format!("Failed to execute whisper: {}", e))
                })?
            },
            _ = tokio::time::sleep(timeout_duration) => {
                let _ = std::fs::remove_dir_all(&output_dir);
                return Err(TimingError::AlignmentEngine(format!(
                    "whisper timed out after {} seconds", self.timeout_secs
                )));
            }
        };

        let segments = if result.status.success() {
            let json_path = Self::json_output_path(audio_path, &output_dir);
            std::fs::read_to_string(&json_path)
                .map_err(|e| {
                    TimingError::AlignmentEngine(format!("Failed to read whisper output: {}", e))
                })
                .and_then(|content| {
                    serde_json::from_str::<WhisperOutput>(&content).map_err(|e| {
                        TimingError::AlignmentEngine(format!(
                            "Failed to parse whisper output: {}",
                            e
                        ))
                    })
                })
                .map(|output| {
                    output
                        .segments
                        .into_iter()
                        .map(|s| TranscriptSegment {
                            start: s.start,
                            end: s.end,
                            text: s.text,
                        })
                        .collect()
                })
        } else {
            let stderr = String::from_utf8_lossy(&result.stderr);
            Err(TimingError::AlignmentEngine(format!(
                "whisper exited with error: {}",
                stderr.trim()
            )))
        };

        let _ = std::fs::remove_dir_all(&output_dir);
        segments
    }
}

/// Cue-timing strategy driven by recognized speech segment boundaries.
///
/// The adapter layer maps the application language tag to the engine's
/// primary-language code, drops empty segments, and normalizes whatever the
/// engine returned (unsorted or overlapping segments included) into a valid
/// document re-indexed 1..N.
pub struct SpeechAlignmentTimer;

impl SpeechAlignmentTimer {
    /// Time captions against the actual audio via the recognition engine
    pub async fn time_audio(
        engine: &dyn TranscriptionEngine,
        audio_path: &Path,
        language_tag: Option<&str>,
    ) -> Result<SubtitleDocument, TimingError> {
        let language = language_tag.and_then(|tag| {
            match language_utils::normalize_to_part1(tag) {
                Ok(code) => Some(code),
                Err(e) => {
                    warn!("Language tag issue, letting the engine auto-detect: {}", e);
                    None
                }
            }
        });

        let segments = engine.transcribe(audio_path, language.as_deref()).await?;
        Ok(Self::adapt_segments(segments))
    }

    /// Convert raw engine segments into a valid subtitle document
    pub fn adapt_segments(segments: Vec<TranscriptSegment>) -> SubtitleDocument {
        let cues: Vec<Cue> = segments
            .into_iter()
            .filter(|segment| !segment.text.trim().is_empty())
            .enumerate()
            .filter_map(|(i, segment)| {
                let start_ms = (segment.start * 1000.0).round() as u64;
                let end_ms = (segment.end * 1000.0).round() as u64;
                match Cue::new_validated(i + 1, start_ms, end_ms, segment.text.trim().to_string()) {
                    Ok(cue) => Some(cue),
                    Err(e) => {
                        warn!("Skipping invalid recognized segment: {}", e);
                        None
                    }
                }
            })
            .collect();

        SubtitleDocument::from_unordered(cues)
    }
}
