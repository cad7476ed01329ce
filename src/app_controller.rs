use anyhow::{Result, anyhow};
use log::{info, warn, debug};
use std::path::PathBuf;
use std::sync::Arc;
use indicatif::{ProgressBar, ProgressStyle};

use crate::app_config::Config;
use crate::caption_burner::{BurnOutcome, CaptionBurner, SubtitleStyle};
use crate::errors::ReconciliationError;
use crate::file_utils::{FileManager, RunScope};
use crate::media::{FfmpegEngine, MediaEngine, RenderSettings};
use crate::subtitles::alignment::{TranscriptionEngine, WhisperEngine};
use crate::subtitles::pipeline::{SubtitleTimingPipeline, TimingSource};
use crate::subtitles::srt::SrtSerializer;
use crate::timeline::{DurationReconciler, Segment, SegmentKind, Timeline};

// @module: Per-request video generation orchestration

/// One video generation request
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Spoken script text; also the caption source
    pub script: String,

    /// Narration audio rendered by the TTS collaborator
    pub audio_path: PathBuf,

    /// Directory of visual assets (images and clips)
    pub assets_dir: PathBuf,

    /// Final video path
    pub output_path: PathBuf,

    /// Whether to produce and burn captions
    pub enable_subtitles: bool,

    /// Caption style preset
    pub subtitle_style: SubtitleStyle,

    /// Language tag override; falls back to the configured language
    pub language: Option<String>,
}

/// What a completed request produced
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    /// Delivered video path
    pub video_path: PathBuf,

    /// Persisted subtitle sidecar, when captions were produced and written
    pub subtitle_path: Option<PathBuf>,

    /// Whether captions ended up rendered into the picture
    pub captions_burned: bool,

    /// Which strategy timed the captions, when any were produced
    pub timing_source: Option<TimingSource>,
}

/// Main application controller for narrated video generation
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Media toolchain boundary
    media: Arc<dyn MediaEngine>,

    // @field: Speech-recognition boundary
    transcription: Arc<dyn TranscriptionEngine>,
}

impl Controller {
    // @method: Create a controller with process-backed engines from config
    pub fn with_config(config: Config) -> Result<Self> {
        let media = Arc::new(FfmpegEngine {
            ffmpeg: config.media.ffmpeg.clone(),
            ffprobe: config.media.ffprobe.clone(),
            timeout_secs: config.media.timeout_secs,
        });
        let transcription = Arc::new(WhisperEngine::new(
            config.whisper.executable.clone(),
            config.whisper.model.clone(),
            config.whisper.timeout_secs,
        ));

        Ok(Self {
            config,
            media,
            transcription,
        })
    }

    /// Create a controller with injected engine implementations - used by tests
    pub fn with_engines(
        config: Config,
        media: Arc<dyn MediaEngine>,
        transcription: Arc<dyn TranscriptionEngine>,
    ) -> Self {
        Self {
            config,
            media,
            transcription,
        }
    }

    /// Run one generation request to completion.
    ///
    /// Stages run strictly in sequence: reconciliation, rendering, audio
    /// attachment, then the captioning enhancement. Captioning-local failures
    /// never abort delivery; the caller always receives a playable video when
    /// assembly succeeds.
    pub async fn run(&self, request: GenerationRequest) -> Result<GenerationOutcome> {
        let start_time = std::time::Instant::now();

        if !FileManager::file_exists(&request.audio_path) {
            return Err(anyhow!(
                "Audio file does not exist: {:?}",
                request.audio_path
            ));
        }
        if let Some(parent) = request.output_path.parent() {
            FileManager::ensure_dir(parent)?;
        }

        let progress = ProgressBar::new(5);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{bar:30.cyan/blue} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let scope = RunScope::create()?;
        debug!("Run {} working in {:?}", scope.id, scope.work_dir);

        // Stage 1: audio duration is the authoritative target
        progress.set_message("Probing narration audio");
        let audio_duration = self.media.probe_duration(&request.audio_path).await?;
        if audio_duration <= 0.0 {
            return Err(anyhow!(
                "Narration audio has non-positive duration: {}s",
                audio_duration
            ));
        }
        info!("Narration duration: {:.3}s", audio_duration);
        progress.inc(1);

        // Stage 2: build and reconcile the visual timeline
        progress.set_message("Reconciling visual timeline");
        let timeline = self.build_timeline(&request).await?;
        let reconciled = DurationReconciler::reconcile(&timeline, audio_duration)
            .map_err(|e: ReconciliationError| anyhow!(e))?;
        info!(
            "Timeline reconciled: {} segments covering {:.3}s",
            reconciled.len(),
            reconciled.duration()
        );
        progress.inc(1);

        // Stage 3: render the silent visual track
        progress.set_message("Rendering visual track");
        let settings = RenderSettings {
            width: self.config.width,
            height: self.config.height,
            fps: self.config.fps,
        };
        let silent_video = scope.temp_path("visual.mp4");
        self.media
            .render_timeline(&reconciled, &settings, &scope.work_dir, &silent_video)
            .await?;
        progress.inc(1);

        // Stage 4: attach the narration
        progress.set_message("Attaching narration");
        let captions_requested = request.enable_subtitles && !request.script.trim().is_empty();
        let muxed_video = if captions_requested {
            scope.temp_path("preburn.mp4")
        } else {
            request.output_path.clone()
        };
        self.media
            .attach_audio(&silent_video, &request.audio_path, &muxed_video)
            .await?;
        progress.inc(1);

        // Stage 5: captioning enhancement, best-effort
        progress.set_message("Captioning");
        let outcome = if captions_requested {
            self.caption_and_deliver(&request, &muxed_video, audio_duration)
                .await?
        } else {
            if request.enable_subtitles {
                debug!("Captions requested but script is empty, skipping caption stage");
            }
            GenerationOutcome {
                video_path: request.output_path.clone(),
                subtitle_path: None,
                captions_burned: false,
                timing_source: None,
            }
        };
        progress.inc(1);
        progress.finish_with_message("Done");

        info!(
            "Video generation complete in {:.2}s: {:?}",
            start_time.elapsed().as_secs_f64(),
            outcome.video_path
        );

        Ok(outcome)
    }

    /// Build the visual timeline from discovered assets.
    ///
    /// Images get the configured fixed window; clips keep their probed
    /// duration. The reconciler handles the mismatch with the narration.
    async fn build_timeline(&self, request: &GenerationRequest) -> Result<Timeline> {
        let (images, videos) = FileManager::find_assets(&request.assets_dir)?;
        info!(
            "Found {} images and {} clips in {:?}",
            images.len(),
            videos.len(),
            request.assets_dir
        );

        let mut timeline = Timeline::new();

        for image in images {
            timeline.push(Segment::new(
                image,
                SegmentKind::Image,
                self.config.image_duration_secs,
            ));
        }

        for video in videos {
            match self.media.probe_duration(&video).await {
                Ok(duration) if duration > 0.0 => {
                    timeline.push(Segment::new(video, SegmentKind::VideoClip, duration));
                }
                Ok(duration) => {
                    warn!("Skipping clip with non-positive duration {}s: {:?}", duration, video);
                }
                Err(e) => {
                    warn!("Skipping unprobeable clip {:?}: {}", video, e);
                }
            }
        }

        Ok(timeline)
    }

    /// Produce captions for the muxed video and deliver the final artifact.
    ///
    /// Serialization failure or burn failure degrade to the uncaptioned video;
    /// neither aborts the request.
    async fn caption_and_deliver(
        &self,
        request: &GenerationRequest,
        pre_burn_video: &PathBuf,
        audio_duration: f64,
    ) -> Result<GenerationOutcome> {
        let language_tag = request
            .language
            .clone()
            .unwrap_or_else(|| self.config.language.clone());

        let captions = SubtitleTimingPipeline::produce(
            self.transcription.as_ref(),
            &request.script,
            &request.audio_path,
            audio_duration,
            Some(&language_tag),
        )
        .await;

        if captions.document.is_empty() {
            debug!("No cues produced, promoting video without burn attempt");
            CaptionBurner::promote_without_burn(pre_burn_video, &request.output_path)?;
            return Ok(GenerationOutcome {
                video_path: request.output_path.clone(),
                subtitle_path: None,
                captions_burned: false,
                timing_source: None,
            });
        }

        let track_duration_ms = (audio_duration * 1000.0).round() as u64;
        if let Err(e) = captions.document.validate_against_track(track_duration_ms) {
            warn!("Caption document invariant violated: {}", e);
        }

        // Sidecar named deterministically from the output video's base name
        let subtitle_path = FileManager::subtitle_path_for_video(&request.output_path);
        if let Err(e) = SrtSerializer::write_to_file(&captions.document, &subtitle_path) {
            warn!(
                "Subtitle serialization failed ({}), delivering uncaptioned video",
                e
            );
            CaptionBurner::promote_without_burn(pre_burn_video, &request.output_path)?;
            return Ok(GenerationOutcome {
                video_path: request.output_path.clone(),
                subtitle_path: None,
                captions_burned: false,
                timing_source: Some(captions.source),
            });
        }
        info!("Wrote subtitle sidecar: {:?}", subtitle_path);

        let burn_outcome = CaptionBurner::burn(
            self.media.as_ref(),
            pre_burn_video,
            &subtitle_path,
            request.subtitle_style,
            &request.output_path,
        )
        .await?;

        Ok(GenerationOutcome {
            video_path: request.output_path.clone(),
            subtitle_path: Some(subtitle_path),
            captions_burned: burn_outcome == BurnOutcome::Burned,
            timing_source: Some(captions.source),
        })
    }
}
