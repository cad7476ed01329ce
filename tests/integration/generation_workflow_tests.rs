/*!
 * End-to-end generation workflow tests with mock engines
 *
 * These tests run the full controller pipeline against mock media and
 * transcription engines, so no external processes are invoked.
 */

use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use vidweave::app_config::Config;
use vidweave::app_controller::{Controller, GenerationRequest};
use vidweave::caption_burner::SubtitleStyle;
use vidweave::subtitles::alignment::TranscriptSegment;
use vidweave::subtitles::pipeline::TimingSource;
use crate::common;
use crate::common::mock_engines::{MockMediaEngine, MockTranscriptionEngine};

/// Request fixture: one image asset, one audio file, output under the temp dir
fn request_fixture(dir: &PathBuf, enable_subtitles: bool, script: &str) -> Result<GenerationRequest> {
    let assets_dir = dir.join("assets");
    fs::create_dir_all(&assets_dir)?;
    common::create_test_file(&assets_dir, "frame.png", "image data")?;
    let audio_path = common::create_test_file(dir, "narration.mp3", "audio data")?;

    Ok(GenerationRequest {
        script: script.to_string(),
        audio_path,
        assets_dir,
        output_path: dir.join("out").join("video.mp4"),
        enable_subtitles,
        subtitle_style: SubtitleStyle::Professional,
        language: Some("en-US".to_string()),
    })
}

/// Test plain assembly without captions
#[tokio::test]
async fn test_run_withoutSubtitles_shouldDeliverMuxedVideo() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let request = request_fixture(&temp_dir.path().to_path_buf(), false, "Some narration.")?;

    let media = Arc::new(MockMediaEngine::new(10.0));
    let log = media.log();
    let controller = Controller::with_engines(
        Config::default(),
        media,
        Arc::new(MockTranscriptionEngine::failing()),
    );

    let outcome = controller.run(request.clone()).await?;

    assert_eq!(outcome.video_path, request.output_path);
    assert!(outcome.video_path.exists());
    assert!(outcome.subtitle_path.is_none());
    assert!(!outcome.captions_burned);
    assert!(outcome.timing_source.is_none());

    let log = log.lock().unwrap();
    assert_eq!(log.attach_calls, 1);
    assert_eq!(log.burn_calls, 0);
    // One image asset looped to cover 10s of narration at the 5s window
    assert_eq!(log.rendered_segments, vec![2]);
    Ok(())
}

/// Test that a missing audio file aborts the request
#[tokio::test]
async fn test_run_withMissingAudio_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut request = request_fixture(&temp_dir.path().to_path_buf(), false, "text")?;
    request.audio_path = temp_dir.path().join("missing.mp3");

    let controller = Controller::with_engines(
        Config::default(),
        Arc::new(MockMediaEngine::new(10.0)),
        Arc::new(MockTranscriptionEngine::failing()),
    );

    assert!(controller.run(request).await.is_err());
    Ok(())
}

/// Test that an empty assets directory surfaces the degenerate-track error
#[tokio::test]
async fn test_run_withNoAssets_shouldFailReconciliation() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut request = request_fixture(&temp_dir.path().to_path_buf(), false, "text")?;
    let empty_assets = temp_dir.path().join("empty");
    fs::create_dir_all(&empty_assets)?;
    request.assets_dir = empty_assets;

    let controller = Controller::with_engines(
        Config::default(),
        Arc::new(MockMediaEngine::new(10.0)),
        Arc::new(MockTranscriptionEngine::failing()),
    );

    let result = controller.run(request).await;
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Degenerate"));
    Ok(())
}

/// Test captioned delivery via the speech-alignment path
#[tokio::test]
async fn test_run_withWorkingTranscription_shouldBurnAlignedCaptions() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let request = request_fixture(
        &temp_dir.path().to_path_buf(),
        true,
        "Hello there. General greeting.",
    )?;

    let transcription = Arc::new(MockTranscriptionEngine::with_segments(vec![
        TranscriptSegment {
            start: 0.0,
            end: 4.0,
            text: "Hello there.".to_string(),
        },
        TranscriptSegment {
            start: 4.0,
            end: 10.0,
            text: "General greeting.".to_string(),
        },
    ]));
    let media = Arc::new(MockMediaEngine::new(10.0));
    let log = media.log();
    let controller = Controller::with_engines(Config::default(), media, transcription.clone());

    let outcome = controller.run(request.clone()).await?;

    assert!(outcome.captions_burned);
    assert_eq!(outcome.timing_source, Some(TimingSource::Alignment));
    assert!(outcome.video_path.exists());

    // The sidecar sits next to the output video with the same base name
    let sidecar = outcome.subtitle_path.unwrap();
    assert_eq!(sidecar, request.output_path.with_extension("srt"));
    let sidecar_content = fs::read_to_string(&sidecar)?;
    assert!(sidecar_content.contains("Hello there."));
    assert!(sidecar_content.contains("00:00:04,000"));

    // Request language override reached the engine as a primary code
    assert_eq!(transcription.received_languages(), vec![Some("en".to_string())]);
    assert_eq!(log.lock().unwrap().burn_calls, 1);
    Ok(())
}

/// Test captioned delivery falling back to heuristic timing
#[tokio::test]
async fn test_run_withFailingTranscription_shouldBurnHeuristicCaptions() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let request = request_fixture(
        &temp_dir.path().to_path_buf(),
        true,
        "First sentence here. Second sentence there.",
    )?;

    let controller = Controller::with_engines(
        Config::default(),
        Arc::new(MockMediaEngine::new(10.0)),
        Arc::new(MockTranscriptionEngine::failing()),
    );

    let outcome = controller.run(request).await?;

    assert!(outcome.captions_burned);
    assert_eq!(outcome.timing_source, Some(TimingSource::Heuristic));
    assert!(outcome.subtitle_path.unwrap().exists());
    Ok(())
}

/// Test that a failed burn still delivers the uncaptioned video
#[tokio::test]
async fn test_run_withFailingBurn_shouldStillDeliverVideo() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let request = request_fixture(
        &temp_dir.path().to_path_buf(),
        true,
        "One two. Three four.",
    )?;

    let controller = Controller::with_engines(
        Config::default(),
        Arc::new(MockMediaEngine::new(10.0).with_failing_burn()),
        Arc::new(MockTranscriptionEngine::failing()),
    );

    let outcome = controller.run(request.clone()).await?;

    assert!(!outcome.captions_burned);
    assert!(outcome.video_path.exists());
    assert_eq!(fs::read_to_string(&outcome.video_path)?, "muxed video");
    // The sidecar survives even when burn-in fails
    assert!(outcome.subtitle_path.unwrap().exists());
    Ok(())
}

/// Test that an empty script skips the caption stage entirely
#[tokio::test]
async fn test_run_withEmptyScriptAndSubtitlesEnabled_shouldSkipCaptioning() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let request = request_fixture(&temp_dir.path().to_path_buf(), true, "   ")?;

    let media = Arc::new(MockMediaEngine::new(10.0));
    let log = media.log();
    let controller = Controller::with_engines(
        Config::default(),
        media,
        Arc::new(MockTranscriptionEngine::failing()),
    );

    let outcome = controller.run(request).await?;

    assert!(outcome.video_path.exists());
    assert!(outcome.subtitle_path.is_none());
    assert!(!outcome.captions_burned);
    assert_eq!(log.lock().unwrap().burn_calls, 0);
    Ok(())
}

/// Test that discovered clips are probed and joined into the timeline
#[tokio::test]
async fn test_run_withImageAndClipAssets_shouldProbeClips() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let mut request = request_fixture(&dir, false, "text")?;
    common::create_test_file(&request.assets_dir.clone(), "clip.mp4", "video data")?;
    request.output_path = dir.join("with_clip.mp4");

    // Image window 5s + clip 4s = 9s visuals against 9s audio: no looping
    let media = Arc::new(MockMediaEngine::new(9.0));
    let log = media.log();
    let controller = Controller::with_engines(
        Config::default(),
        media,
        Arc::new(MockTranscriptionEngine::failing()),
    );

    controller.run(request).await?;

    let log = log.lock().unwrap();
    // Audio plus the discovered clip were both probed
    assert_eq!(log.probed.len(), 2);
    assert_eq!(log.rendered_segments, vec![2]);
    Ok(())
}
