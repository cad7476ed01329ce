use std::fmt::Debug;
use std::path::Path;
use async_trait::async_trait;
use log::{debug, error};
use serde_json::{Value, from_str};
use tokio::process::Command;

use crate::errors::MediaError;
use crate::timeline::{SegmentKind, Timeline};

// @module: Media-track capability interface and its ffmpeg implementation

/// Output frame settings for rendering the visual track
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    /// Output width in pixels
    pub width: u32,

    /// Output height in pixels
    pub height: u32,

    /// Output frames per second
    pub fps: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings {
            width: 1920,
            height: 1080,
            fps: 24,
        }
    }
}

/// Capability interface to the external media toolchain.
///
/// One explicit contract per track operation, implemented once per target
/// media library. The pipeline never talks to decoder or muxer processes
/// directly, so tests can substitute an engine that fails on demand.
#[async_trait]
pub trait MediaEngine: Send + Sync + Debug {
    /// Duration of a media file in seconds
    async fn probe_duration(&self, path: &Path) -> Result<f64, MediaError>;

    /// Render a reconciled timeline into a silent video at `output`.
    /// Intermediate artifacts go under `work_dir`, which is request-scoped.
    async fn render_timeline(
        &self,
        timeline: &Timeline,
        settings: &RenderSettings,
        work_dir: &Path,
        output: &Path,
    ) -> Result<(), MediaError>;

    /// Attach an audio stream to a silent video, re-encoding audio only
    async fn attach_audio(
        &self,
        video: &Path,
        audio: &Path,
        output: &Path,
    ) -> Result<(), MediaError>;

    /// Render subtitles into the picture, copying the audio stream unmodified
    async fn burn_subtitles(
        &self,
        video: &Path,
        subtitles: &Path,
        force_style: &str,
        output: &Path,
    ) -> Result<(), MediaError>;
}

/// ffmpeg/ffprobe backed media engine
#[derive(Debug, Clone)]
pub struct FfmpegEngine {
    /// ffmpeg executable name or path
    pub ffmpeg: String,

    /// ffprobe executable name or path
    pub ffprobe: String,

    /// Per-invocation timeout in seconds
    pub timeout_secs: u64,
}

impl Default for FfmpegEngine {
    fn default() -> Self {
        FfmpegEngine {
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
            timeout_secs: 600,
        }
    }
}

impl FfmpegEngine {
    /// Run an external command with the engine's timeout, mapping every
    /// failure mode to a [`MediaError`]
    async fn run_command(&self, program: &str, args: &[String]) -> Result<Vec<u8>, MediaError> {
        debug!("Running {} {}", program, args.join(" "));

        let command_future = Command::new(program).args(args).output();
        let timeout_duration = std::time::Duration::from_secs(self.timeout_secs);

        let output = tokio::select! {
            result = command_future => {
                result.map_err(|e| MediaError::ProcessFailed(format!("{}: {}", program, e)))?
            },
            _ = tokio::time::sleep(timeout_duration) => {
                return Err(MediaError::Timeout(self.timeout_secs));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let filtered = Self::filter_ffmpeg_stderr(&stderr);
            error!("{} failed: {}", program, filtered);
            return Err(MediaError::ProcessError(filtered));
        }

        Ok(output.stdout)
    }

    /// Filter ffmpeg stderr to only show meaningful error lines, stripping the
    /// version banner, build configuration, and stream metadata noise.
    fn filter_ffmpeg_stderr(stderr: &str) -> String {
        let dominated_prefixes = [
            "ffmpeg version",
            "  built with",
            "  configuration:",
            "  lib",
            "Input #",
            "  Metadata:",
            "  Duration:",
            "  Stream #",
            "      Metadata:",
            "Output #",
            "Stream mapping:",
            "Press [q]",
            "frame=",
            "size=",
        ];

        let meaningful: Vec<&str> = stderr
            .lines()
            .filter(|line| {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    return false;
                }
                !dominated_prefixes.iter().any(|p| line.starts_with(p))
            })
            .collect();

        if meaningful.is_empty() {
            "unknown ffmpeg error (stderr was empty after filtering)".to_string()
        } else {
            meaningful.join("\n")
        }
    }

    /// Scale-and-pad filter that letterboxes any source into the output frame
    fn scale_filter(settings: &RenderSettings) -> String {
        format!(
            "scale={w}:{h}:force_original_aspect_ratio=decrease,pad={w}:{h}:(ow-iw)/2:(oh-ih)/2,format=yuv420p",
            w = settings.width,
            h = settings.height
        )
    }
}

#[async_trait]
impl MediaEngine for FfmpegEngine {
    async fn probe_duration(&self, path: &Path) -> Result<f64, MediaError> {
        if !path.exists() {
            return Err(MediaError::FileNotFound(path.display().to_string()));
        }

        let args = vec![
            "-v".to_string(),
            "quiet".to_string(),
            "-print_format".to_string(),
            "json".to_string(),
            "-show_format".to_string(),
            path.to_string_lossy().to_string(),
        ];

        let stdout = self.run_command(&self.ffprobe, &args).await?;
        let text = String::from_utf8_lossy(&stdout);

        let json: Value = from_str(&text)
            .map_err(|e| MediaError::ProbeParseError(format!("invalid ffprobe JSON: {}", e)))?;

        json.get("format")
            .and_then(|f| f.get("duration"))
            .and_then(|d| d.as_str())
            .and_then(|d| d.parse::<f64>().ok())
            .ok_or_else(|| {
                MediaError::ProbeParseError(format!(
                    "no duration in probe output for {}",
                    path.display()
                ))
            })
    }

    async fn render_timeline(
        &self,
        timeline: &Timeline,
        settings: &RenderSettings,
        work_dir: &Path,
        output: &Path,
    ) -> Result<(), MediaError> {
        std::fs::create_dir_all(work_dir)
            .map_err(|e| MediaError::ProcessFailed(format!("work dir: {}", e)))?;

        // Normalize each segment to a uniform intermediate clip, then join
        // them losslessly with the concat demuxer.
        let scale = Self::scale_filter(settings);
        let mut concat_list = String::new();

        for (i, segment) in timeline.segments.iter().enumerate() {
            let part_path = work_dir.join(format!("part_{:04}.mp4", i));
            let duration = format!("{:.3}", segment.duration);

            let args: Vec<String> = match segment.kind {
                SegmentKind::Image => vec![
                    "-y".to_string(),
                    "-loop".to_string(),
                    "1".to_string(),
                    "-t".to_string(),
                    duration,
                    "-i".to_string(),
                    segment.source.to_string_lossy().to_string(),
                    "-vf".to_string(),
                    scale.clone(),
                    "-r".to_string(),
                    settings.fps.to_string(),
                    "-c:v".to_string(),
                    "libx264".to_string(),
                    "-pix_fmt".to_string(),
                    "yuv420p".to_string(),
                    part_path.to_string_lossy().to_string(),
                ],
                SegmentKind::VideoClip => vec![
                    "-y".to_string(),
                    "-i".to_string(),
                    segment.source.to_string_lossy().to_string(),
                    "-t".to_string(),
                    duration,
                    "-an".to_string(),
                    "-vf".to_string(),
                    format!("{},fps={}", scale, settings.fps),
                    "-c:v".to_string(),
                    "libx264".to_string(),
                    "-pix_fmt".to_string(),
                    "yuv420p".to_string(),
                    part_path.to_string_lossy().to_string(),
                ],
            };

            self.run_command(&self.ffmpeg, &args).await?;
            concat_list.push_str(&format!("file '{}'\n", part_path.display()));
        }

        let list_path = work_dir.join("concat.txt");
        std::fs::write(&list_path, concat_list)
            .map_err(|e| MediaError::ProcessFailed(format!("concat list: {}", e)))?;

        let concat_args = vec![
            "-y".to_string(),
            "-f".to_string(),
            "concat".to_string(),
            "-safe".to_string(),
            "0".to_string(),
            "-i".to_string(),
            list_path.to_string_lossy().to_string(),
            "-c".to_string(),
            "copy".to_string(),
            output.to_string_lossy().to_string(),
        ];

        self.run_command(&self.ffmpeg, &concat_args).await?;
        Ok(())
    }

    async fn attach_audio(
        &self,
        video: &Path,
        audio: &Path,
        output: &Path,
    ) -> Result<(), MediaError> {
        let args = vec![
            "-y".to_string(),
            "-i".to_string(),
            video.to_string_lossy().to_string(),
            "-i".to_string(),
            audio.to_string_lossy().to_string(),
            "-c:v".to_string(),
            "copy".to_string(),
            "-c:a".to_string(),
            "aac".to_string(),
            "-map".to_string(),
            "0:v:0".to_string(),
            "-map".to_string(),
            "1:a:0".to_string(),
            output.to_string_lossy().to_string(),
        ];

        self.run_command(&self.ffmpeg, &args).await?;
        Ok(())
    }

    async fn burn_subtitles(
        &self,
        video: &Path,
        subtitles: &Path,
        force_style: &str,
        output: &Path,
    ) -> Result<(), MediaError> {
        // The subtitles filter parses ':' specially, so the path is quoted
        let filter = format!(
            "subtitles='{}':force_style='{}'",
            subtitles.to_string_lossy().replace('\'', r"\'"),
            force_style
        );

        let args = vec![
            "-y".to_string(),
            "-i".to_string(),
            video.to_string_lossy().to_string(),
            "-vf".to_string(),
            filter,
            "-c:a".to_string(),
            "copy".to_string(),
            output.to_string_lossy().to_string(),
        ];

        self.run_command(&self.ffmpeg, &args).await?;
        Ok(())
    }
}
