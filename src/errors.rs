/*!
 * Error types for the vidweave application.
 *
 * This module contains custom error types for different parts of the pipeline,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur while probing or rendering media with the external toolchain
#[derive(Error, Debug)]
pub enum MediaError {
    /// Error when spawning or waiting on the external process
    #[error("Media process failed to execute: {0}")]
    ProcessFailed(String),

    /// Error when the external process reported failure
    #[error("Media process exited with error: {0}")]
    ProcessError(String),

    /// Error when the external process exceeded its timeout
    #[error("Media process timed out after {0} seconds")]
    Timeout(u64),

    /// Error when parsing probe output
    #[error("Failed to parse probe output: {0}")]
    ProbeParseError(String),

    /// Error when a referenced media file is missing
    #[error("Media file not found: {0}")]
    FileNotFound(String),
}

/// Errors that can occur during timeline duration reconciliation
#[derive(Error, Debug)]
pub enum ReconciliationError {
    /// The visual track has zero total duration; the assembly collaborator
    /// must substitute a placeholder background before reconciling
    #[error("Degenerate visual track: timeline has zero duration")]
    DegenerateVisualTrack,
}

/// Errors that can occur while producing cue timing
#[derive(Error, Debug)]
pub enum TimingError {
    /// The speech-alignment engine failed; callers fall back to heuristic timing
    #[error("Alignment engine failure: {0}")]
    AlignmentEngine(String),
}

/// Errors local to the captioning enhancement; these never abort video delivery
#[derive(Error, Debug)]
pub enum CaptionError {
    /// I/O error while writing the subtitle sidecar file
    #[error("Subtitle serialization failed: {0}")]
    Serialization(String),

    /// The external filter invocation failed during burn-in
    #[error("Caption burn-in failed: {0}")]
    BurnIn(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the media toolchain
    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    /// Error from duration reconciliation
    #[error("Reconciliation error: {0}")]
    Reconciliation(#[from] ReconciliationError),

    /// Error from cue timing
    #[error("Timing error: {0}")]
    Timing(#[from] TimingError),

    /// Error from the captioning enhancement
    #[error("Caption error: {0}")]
    Caption(#[from] CaptionError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
