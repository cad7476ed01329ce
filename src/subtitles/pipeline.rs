use std::path::Path;
use log::{debug, info, warn};

use crate::subtitles::alignment::{SpeechAlignmentTimer, TranscriptionEngine};
use crate::subtitles::document::SubtitleDocument;
use crate::subtitles::proportional::ProportionalTextTimer;

// @module: Fallback composition of the two cue-timing strategies

/// Which strategy produced the cue timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingSource {
    /// Boundaries measured from the audio by the recognition engine
    Alignment,
    /// Word-count proportional heuristic
    Heuristic,
}

/// A timed caption document together with the strategy that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct TimedCaptions {
    pub document: SubtitleDocument,
    pub source: TimingSource,
}

// @enum: Pipeline states; the fallback order is this sequence, nothing implicit
enum TimingState {
    TryAlignment,
    TryHeuristic,
    Done(TimedCaptions),
}

/// Composes the alignment and heuristic timers with a defined fallback order.
///
/// `TryAlignment` -> `TryHeuristic` -> `Done`: alignment failure is recovered
/// by the heuristic, which cannot fail for non-empty text, so requesting
/// captions always yields a usable document. Only the timing source is
/// nondeterministic, based on engine availability.
pub struct SubtitleTimingPipeline;

impl SubtitleTimingPipeline {
    /// Produce timed captions for the given spoken text and audio track.
    ///
    /// `reconciled_duration` is the visual duration after reconciliation,
    /// which equals the audio duration; the heuristic covers it exactly.
    pub async fn produce(
        engine: &dyn TranscriptionEngine,
        text: &str,
        audio_path: &Path,
        reconciled_duration: f64,
        language_tag: Option<&str>,
    ) -> TimedCaptions {
        if text.trim().is_empty() {
            debug!("Empty spoken text, producing empty caption document");
            return TimedCaptions {
                document: SubtitleDocument::new(),
                source: TimingSource::Heuristic,
            };
        }

        let mut state = TimingState::TryAlignment;

        loop {
            state = match state {
                TimingState::TryAlignment => {
                    match SpeechAlignmentTimer::time_audio(engine, audio_path, language_tag).await
                    {
                        Ok(document) if !document.is_empty() => {
                            info!("Caption timing from speech alignment ({} cues)", document.len());
                            TimingState::Done(TimedCaptions {
                                document,
                                source: TimingSource::Alignment,
                            })
                        }
                        Ok(_) => {
                            warn!("Speech alignment produced no cues, falling back to heuristic timing");
                            TimingState::TryHeuristic
                        }
                        Err(e) => {
                            warn!("Speech alignment failed ({}), falling back to heuristic timing", e);
                            TimingState::TryHeuristic
                        }
                    }
                }
                TimingState::TryHeuristic => {
                    let document = ProportionalTextTimer::time_text(text, reconciled_duration);
                    info!("Caption timing from word-count heuristic ({} cues)", document.len());
                    TimingState::Done(TimedCaptions {
                        document,
                        source: TimingSource::Heuristic,
                    })
                }
                TimingState::Done(captions) => return captions,
            };
        }
    }
}
