use std::path::PathBuf;
use log::debug;

use crate::errors::ReconciliationError;

// @module: Visual timeline model and duration reconciliation

/// Tolerance for duration comparisons, in seconds
pub const DURATION_EPSILON: f64 = 0.001;

// @enum: Kind of visual source backing a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Still image presented for a fixed window
    Image,
    /// Video clip with an intrinsic duration
    VideoClip,
}

/// One entry of the visual track: a source asset and its presentation window
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Path to the backing asset
    pub source: PathBuf,

    /// Asset kind
    pub kind: SegmentKind,

    /// Presentation window in seconds
    pub duration: f64,
}

impl Segment {
    pub fn new<P: Into<PathBuf>>(source: P, kind: SegmentKind, duration: f64) -> Self {
        Segment {
            source: source.into(),
            kind,
            duration,
        }
    }

    /// Copy of this segment with a shortened presentation window.
    /// Source content is untouched; only the window changes.
    fn with_window(&self, duration: f64) -> Self {
        Segment {
            source: self.source.clone(),
            kind: self.kind,
            duration,
        }
    }
}

/// Ordered sequence of segments making up the visual track
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timeline {
    /// Segments in presentation order
    pub segments: Vec<Segment>,
}

impl Timeline {
    pub fn new() -> Self {
        Timeline {
            segments: Vec::new(),
        }
    }

    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    /// Total duration: sum of segment presentation windows
    pub fn duration(&self) -> f64 {
        self.segments.iter().map(|s| s.duration).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }
}

/// Forces the visual timeline to exactly match the audio track's duration.
///
/// The audio duration is authoritative and is never trimmed or stretched here;
/// only the segment list is rewritten. Looping preserves segment order each
/// cycle, and truncation splits the final included segment's presentation
/// window so the result covers the target exactly.
pub struct DurationReconciler;

impl DurationReconciler {
    /// Rewrite `timeline` so its duration equals `target_duration` exactly.
    ///
    /// A zero-duration timeline is a contract violation by the visual-assembly
    /// collaborator (it must substitute a placeholder background first) and is
    /// reported rather than silently producing an empty timeline.
    pub fn reconcile(
        timeline: &Timeline,
        target_duration: f64,
    ) -> Result<Timeline, ReconciliationError> {
        let visual_duration = timeline.duration();

        if visual_duration <= DURATION_EPSILON {
            return Err(ReconciliationError::DegenerateVisualTrack);
        }

        if (target_duration - visual_duration).abs() <= DURATION_EPSILON {
            debug!(
                "Timeline duration {:.3}s already matches audio, no reconciliation needed",
                visual_duration
            );
            return Ok(timeline.clone());
        }

        if target_duration > visual_duration {
            let cycles = (target_duration / visual_duration).ceil() as usize;
            debug!(
                "Extending timeline from {:.3}s to {:.3}s ({} cycles)",
                visual_duration, target_duration, cycles
            );

            let mut looped = Timeline::new();
            for _ in 0..cycles {
                for segment in &timeline.segments {
                    looped.push(segment.clone());
                }
            }
            Ok(Self::truncate_to(&looped, target_duration))
        } else {
            debug!(
                "Trimming timeline from {:.3}s to {:.3}s",
                visual_duration, target_duration
            );
            Ok(Self::truncate_to(timeline, target_duration))
        }
    }

    /// Keep the prefix of `timeline` covering `target` seconds, splitting the
    /// window of the last included segment so the total equals `target` exactly.
    fn truncate_to(timeline: &Timeline, target: f64) -> Timeline {
        let mut truncated = Timeline::new();
        let mut elapsed = 0.0_f64;

        for segment in &timeline.segments {
            let remaining = target - elapsed;
            if remaining <= DURATION_EPSILON {
                break;
            }

            if segment.duration <= remaining + DURATION_EPSILON {
                elapsed += segment.duration;
                truncated.push(segment.clone());
            } else {
                truncated.push(segment.with_window(remaining));
                elapsed = target;
                break;
            }
        }

        // Floating accumulation can leave the final window fractionally short
        // of the target; pin the last segment so the sum is exact.
        let drift = target - truncated.duration();
        if drift.abs() > f64::EPSILON {
            if let Some(last) = truncated.segments.last_mut() {
                last.duration += drift;
            }
        }

        truncated
    }
}
