/*!
 * Tests for word-count proportional caption timing
 */

use vidweave::subtitles::proportional::ProportionalTextTimer;

/// Test that empty text yields an empty document
#[test]
fn test_time_text_withEmptyText_shouldProduceEmptyDocument() {
    assert!(ProportionalTextTimer::time_text("", 10.0).is_empty());
    assert!(ProportionalTextTimer::time_text("   \n  ", 10.0).is_empty());
}

/// Test a single unit covering the whole duration
#[test]
fn test_time_text_withSingleUnit_shouldCoverWholeDuration() {
    let document = ProportionalTextTimer::time_text("Hello world", 10.0);

    assert_eq!(document.len(), 1);
    assert_eq!(document.cues[0].start_ms, 0);
    assert_eq!(document.cues[0].end_ms, 10_000);
    assert_eq!(document.cues[0].text, "Hello world");
}

/// Test sentence splitting with equal word counts
#[test]
fn test_time_text_withTwoEqualSentences_shouldSplitDurationEvenly() {
    let document = ProportionalTextTimer::time_text("One two. Three four.", 10.0);

    assert_eq!(document.len(), 2);
    assert_eq!(document.cues[0].start_ms, 0);
    assert_eq!(document.cues[0].end_ms, 5_000);
    assert_eq!(document.cues[0].text, "One two.");
    assert_eq!(document.cues[1].start_ms, 5_000);
    assert_eq!(document.cues[1].end_ms, 10_000);
    assert_eq!(document.cues[1].text, "Three four.");
}

/// Test that time is allocated proportionally to word counts
#[test]
fn test_time_text_withUnevenSentences_shouldAllocateProportionally() {
    let document = ProportionalTextTimer::time_text("One. Two three four five.", 10.0);

    assert_eq!(document.len(), 2);
    // 1 of 5 words in the first sentence
    assert_eq!(document.cues[0].end_ms, 2_000);
    assert!(document.cues[1].duration_ms() > document.cues[0].duration_ms());
}

/// Test exact millisecond boundaries for strongly uneven sentences
#[test]
fn test_time_text_withStronglyUnevenSentences_shouldRoundFractionalBoundaries() {
    let text = "Short. This is a much longer sentence with many words. Brief.";
    let document = ProportionalTextTimer::time_text(text, 30.0);

    // Word counts 1 / 9 / 1 of 11 total: boundaries at 30000/11 and 300000/11
    assert_eq!(document.len(), 3);
    assert_eq!(document.cues[0].start_ms, 0);
    assert_eq!(document.cues[0].end_ms, 2_727);
    assert_eq!(document.cues[1].end_ms, 27_273);
    assert_eq!(document.cues[2].end_ms, 30_000);
    assert_eq!(document.cues[0].text, "Short.");
    assert_eq!(
        document.cues[1].text,
        "This is a much longer sentence with many words."
    );
    assert_eq!(document.cues[2].text, "Brief.");
}

/// Test the comma fallback when no sentence boundary exists
#[test]
fn test_time_text_withOnlyCommas_shouldSplitOnClauses() {
    let document = ProportionalTextTimer::time_text("alpha beta, gamma delta", 8.0);

    assert_eq!(document.len(), 2);
    assert_eq!(document.cues[0].text, "alpha beta,");
    assert_eq!(document.cues[1].text, "gamma delta");
    assert_eq!(document.cues[0].end_ms, 4_000);
    assert_eq!(document.cues[1].end_ms, 8_000);
}

/// Test that existing terminal punctuation is left alone
#[test]
fn test_time_text_withInternalPunctuation_shouldPreserveIt() {
    let document = ProportionalTextTimer::time_text("Hello there! Next part. End.", 9.0);

    assert_eq!(document.len(), 2);
    assert_eq!(document.cues[0].text, "Hello there! Next part.");
    assert_eq!(document.cues[1].text, "End.");
}

/// Test that cues are contiguous and cover the target exactly
#[test]
fn test_time_text_withManySentences_shouldBeContiguousAndExact() {
    let text = "First sentence here. Second one follows. A third with more words in it. Short end.";
    let target = 23.5;
    let document = ProportionalTextTimer::time_text(text, target);

    assert_eq!(document.len(), 4);
    assert_eq!(document.cues[0].start_ms, 0);
    for pair in document.cues.windows(2) {
        assert_eq!(pair[0].end_ms, pair[1].start_ms);
    }
    let last = document.cues.last().unwrap();
    assert_eq!(last.end_ms, (target * 1000.0_f64).round() as u64);
    assert!(document.validate_against_track((target * 1000.0_f64).round() as u64).is_ok());
}

/// Test determinism: identical input always yields identical output
#[test]
fn test_time_text_withSameInput_shouldBeDeterministic() {
    let text = "One two. Three four five. Six.";
    let a = ProportionalTextTimer::time_text(text, 12.25);
    let b = ProportionalTextTimer::time_text(text, 12.25);
    assert_eq!(a, b);
}

/// Test that a tiny duration still yields strictly increasing boundaries
#[test]
fn test_time_text_withTinyDuration_shouldKeepBoundariesIncreasing() {
    let document = ProportionalTextTimer::time_text("A one. B two. C three. D four.", 0.002);

    assert_eq!(document.len(), 4);
    for cue in &document.cues {
        assert!(cue.end_ms > cue.start_ms);
    }
    for pair in document.cues.windows(2) {
        assert_eq!(pair[0].end_ms, pair[1].start_ms);
    }
}
