use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::default::Default;

use crate::caption_burner::SubtitleStyle;
use crate::language_utils;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Output video width in pixels
    #[serde(default = "default_width")]
    pub width: u32,

    /// Output video height in pixels
    #[serde(default = "default_height")]
    pub height: u32,

    /// Output frames per second
    #[serde(default = "default_fps")]
    pub fps: u32,

    /// Presentation window for still images, in seconds
    #[serde(default = "default_image_duration")]
    pub image_duration_secs: f64,

    /// Spoken-content language tag (region-qualified tags accepted)
    #[serde(default = "default_language")]
    pub language: String,

    /// Caption style preset
    #[serde(default)]
    pub subtitle_style: SubtitleStyle,

    /// Speech-recognition engine config
    #[serde(default)]
    pub whisper: WhisperConfig,

    /// Media toolchain config
    #[serde(default)]
    pub media: MediaConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Speech-recognition engine configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WhisperConfig {
    /// Whisper executable name or path
    #[serde(default = "default_whisper_executable")]
    pub executable: String,

    /// Model name (e.g. "tiny", "base", "small")
    #[serde(default = "default_whisper_model")]
    pub model: String,

    /// Inference timeout in seconds
    #[serde(default = "default_whisper_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for WhisperConfig {
    fn default() -> Self {
        Self {
            executable: default_whisper_executable(),
            model: default_whisper_model(),
            timeout_secs: default_whisper_timeout_secs(),
        }
    }
}

/// Media toolchain configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MediaConfig {
    /// ffmpeg executable name or path
    #[serde(default = "default_ffmpeg")]
    pub ffmpeg: String,

    /// ffprobe executable name or path
    #[serde(default = "default_ffprobe")]
    pub ffprobe: String,

    /// Per-invocation timeout in seconds
    #[serde(default = "default_media_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            ffmpeg: default_ffmpeg(),
            ffprobe: default_ffprobe(),
            timeout_secs: default_media_timeout_secs(),
        }
    }
}

/// Log level for the application
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            fps: default_fps(),
            image_duration_secs: default_image_duration(),
            language: default_language(),
            subtitle_style: SubtitleStyle::default(),
            whisper: WhisperConfig::default(),
            media: MediaConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Validate the configuration after loading and overriding
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(anyhow!(
                "Invalid resolution: {}x{}",
                self.width,
                self.height
            ));
        }

        if self.fps == 0 {
            return Err(anyhow!("fps must be positive"));
        }

        if self.image_duration_secs <= 0.0 {
            return Err(anyhow!(
                "image_duration_secs must be positive, got {}",
                self.image_duration_secs
            ));
        }

        language_utils::normalize_to_part1(&self.language)
            .map_err(|e| anyhow!("Invalid language in config: {}", e))?;

        Ok(())
    }
}

fn default_width() -> u32 {
    1920
}

fn default_height() -> u32 {
    1080
}

fn default_fps() -> u32 {
    24
}

fn default_image_duration() -> f64 {
    5.0
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_whisper_executable() -> String {
    "whisper".to_string()
}

fn default_whisper_model() -> String {
    "base".to_string()
}

fn default_whisper_timeout_secs() -> u64 {
    300
}

fn default_ffmpeg() -> String {
    "ffmpeg".to_string()
}

fn default_ffprobe() -> String {
    "ffprobe".to_string()
}

fn default_media_timeout_secs() -> u64 {
    600
}
