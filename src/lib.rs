/*!
 * # vidweave - Narrated video assembly with synchronized captions
 *
 * A Rust library for assembling narrated videos from independently produced
 * audio and visual tracks, with synchronized caption burn-in.
 *
 * ## Features
 *
 * - Reconcile the visual timeline against the narration duration
 * - Time captions from speech recognition, with a word-count heuristic fallback
 * - Serialize captions to SRT sidecar files and parse them back
 * - Burn captions into the video container, best-effort
 * - Configurable output resolution, frame rate, and caption styling
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `timeline`: Visual timeline model and duration reconciliation
 * - `subtitles`: Caption subsystem:
 *   - `subtitles::document`: Cue and SubtitleDocument data structures
 *   - `subtitles::srt`: SRT serialization
 *   - `subtitles::proportional`: word-count heuristic timing
 *   - `subtitles::alignment`: speech-alignment timing and its engine boundary
 *   - `subtitles::pipeline`: fallback composition of the timing strategies
 * - `media`: Media-track capability interface and its ffmpeg implementation
 * - `caption_burner`: Best-effort caption burn-in with style presets
 * - `file_utils`: File system operations and request-scoped work areas
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language tag utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod caption_burner;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod media;
pub mod subtitles;
pub mod timeline;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, GenerationOutcome, GenerationRequest};
pub use caption_burner::{BurnOutcome, CaptionBurner, SubtitleStyle};
pub use errors::{AppError, CaptionError, MediaError, ReconciliationError, TimingError};
pub use media::{FfmpegEngine, MediaEngine, RenderSettings};
pub use subtitles::{
    Cue, ProportionalTextTimer, SpeechAlignmentTimer, SrtSerializer, SubtitleDocument,
    SubtitleTimingPipeline, TranscriptionEngine,
};
pub use timeline::{DurationReconciler, Segment, SegmentKind, Timeline};
