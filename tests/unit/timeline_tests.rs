/*!
 * Tests for the visual timeline model and duration reconciliation
 */

use vidweave::errors::ReconciliationError;
use vidweave::timeline::{DurationReconciler, Segment, SegmentKind, Timeline, DURATION_EPSILON};

fn timeline_of(durations: &[f64]) -> Timeline {
    let mut timeline = Timeline::new();
    for (i, duration) in durations.iter().enumerate() {
        timeline.push(Segment::new(
            format!("asset_{}.png", i),
            SegmentKind::Image,
            *duration,
        ));
    }
    timeline
}

/// Test timeline duration accumulation
#[test]
fn test_timeline_duration_withMultipleSegments_shouldSumWindows() {
    let timeline = timeline_of(&[3.0, 2.0, 5.0]);
    assert_eq!(timeline.len(), 3);
    assert!((timeline.duration() - 10.0).abs() < 1e-9);
    assert!(!timeline.is_empty());
}

/// Test reconciliation when durations already match
#[test]
fn test_reconcile_withMatchingDurations_shouldReturnUnchangedTimeline() {
    let timeline = timeline_of(&[3.0, 2.0]);
    let reconciled = DurationReconciler::reconcile(&timeline, 5.0).unwrap();
    assert_eq!(reconciled, timeline);
}

/// Test reconciliation when the difference is within the tolerance
#[test]
fn test_reconcile_withDifferenceWithinEpsilon_shouldReturnUnchangedTimeline() {
    let timeline = timeline_of(&[2.0]);
    let reconciled = DurationReconciler::reconcile(&timeline, 2.0 + DURATION_EPSILON / 2.0).unwrap();
    assert_eq!(reconciled, timeline);
    assert!((reconciled.duration() - 2.0).abs() < 1e-9);
}

/// Test looping when the audio outlasts the visuals
#[test]
fn test_reconcile_withLongerAudio_shouldLoopAndTruncate() {
    let timeline = timeline_of(&[3.0, 2.0]);
    let reconciled = DurationReconciler::reconcile(&timeline, 12.0).unwrap();

    // Two full cycles plus a split third: 3, 2, 3, 2, then 2 of the next 3
    assert_eq!(reconciled.len(), 5);
    assert!((reconciled.duration() - 12.0).abs() < 1e-9);
    assert!((reconciled.segments[4].duration - 2.0).abs() < 1e-9);

    // Loop preserves segment order each cycle
    assert_eq!(reconciled.segments[0].source, reconciled.segments[2].source);
    assert_eq!(reconciled.segments[1].source, reconciled.segments[3].source);
}

/// Test truncation when the visuals outlast the audio
#[test]
fn test_reconcile_withShorterAudio_shouldTruncateAndSplitLastSegment() {
    let timeline = timeline_of(&[5.0, 5.0]);
    let reconciled = DurationReconciler::reconcile(&timeline, 6.0).unwrap();

    assert_eq!(reconciled.len(), 2);
    assert!((reconciled.segments[0].duration - 5.0).abs() < 1e-9);
    assert!((reconciled.segments[1].duration - 1.0).abs() < 1e-9);
    assert!((reconciled.duration() - 6.0).abs() < 1e-9);
}

/// Test that truncation never alters a segment's backing source
#[test]
fn test_reconcile_withTruncation_shouldPreserveSegmentSources() {
    let timeline = timeline_of(&[5.0, 5.0]);
    let reconciled = DurationReconciler::reconcile(&timeline, 6.0).unwrap();

    assert_eq!(reconciled.segments[0].source, timeline.segments[0].source);
    assert_eq!(reconciled.segments[1].source, timeline.segments[1].source);
    assert_eq!(reconciled.segments[1].kind, SegmentKind::Image);
}

/// Test that fractional windows still sum to the target exactly
#[test]
fn test_reconcile_withFractionalDurations_shouldPinDrift() {
    let timeline = timeline_of(&[1.7, 2.9]);
    let target = 10.37;
    let reconciled = DurationReconciler::reconcile(&timeline, target).unwrap();
    assert!((reconciled.duration() - target).abs() < 1e-9);
}

/// Test that an empty timeline is rejected
#[test]
fn test_reconcile_withEmptyTimeline_shouldReturnDegenerateError() {
    let timeline = Timeline::new();
    let result = DurationReconciler::reconcile(&timeline, 10.0);
    assert!(matches!(
        result,
        Err(ReconciliationError::DegenerateVisualTrack)
    ));
}

/// Test that a zero-duration timeline is rejected
#[test]
fn test_reconcile_withZeroDurationSegments_shouldReturnDegenerateError() {
    let timeline = timeline_of(&[0.0, 0.0]);
    let result = DurationReconciler::reconcile(&timeline, 10.0);
    assert!(matches!(
        result,
        Err(ReconciliationError::DegenerateVisualTrack)
    ));
}
