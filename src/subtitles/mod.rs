/*!
 * Caption cue model, timing strategies, and SRT serialization.
 *
 * This module contains the caption subsystem:
 * - `document`: Cue and SubtitleDocument data structures
 * - `srt`: serialization to and from the SRT sidecar format
 * - `proportional`: word-count proportional heuristic timing
 * - `alignment`: speech-recognition based timing and its engine boundary
 * - `pipeline`: fallback composition of the two timing strategies
 */

pub mod document;
pub mod srt;
pub mod proportional;
pub mod alignment;
pub mod pipeline;

// Re-export main types for easier usage
pub use document::{Cue, SubtitleDocument};
pub use srt::SrtSerializer;
pub use proportional::ProportionalTextTimer;
pub use alignment::{SpeechAlignmentTimer, TranscriptSegment, TranscriptionEngine, WhisperEngine};
pub use pipeline::{SubtitleTimingPipeline, TimedCaptions, TimingSource};
