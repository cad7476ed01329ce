use std::fs;
use std::path::Path;
use anyhow::{Result, Context};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::media::MediaEngine;

// @module: Best-effort caption burn-in

/// Caption style preset
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleStyle {
    // @style: White on black outline, bold sans
    #[default]
    Professional,
    // @style: Larger sans with navy outline
    Modern,
    // @style: Gold serif with heavy outline
    Cinematic,
}

/// Fixed rendering parameters for one style preset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleSpec {
    /// Font family name
    pub font_family: &'static str,
    /// Font size in points
    pub font_size: u32,
    /// Fill color, ASS &HAABBGGRR
    pub primary_color: &'static str,
    /// Outline color, ASS &HAABBGGRR
    pub outline_color: &'static str,
    /// Outline width in pixels
    pub outline_width: u32,
    /// Shadow depth in pixels
    pub shadow_offset: u32,
    /// Shadow color, ASS &HAABBGGRR
    pub shadow_color: &'static str,
}

impl SubtitleStyle {
    /// Parse a style name, falling back to professional for unknown names
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "professional" => Self::Professional,
            "modern" => Self::Modern,
            "cinematic" => Self::Cinematic,
            other => {
                warn!("Unknown subtitle style '{}', using professional", other);
                Self::Professional
            }
        }
    }

    // @returns: Fixed parameter tuple for this preset
    pub fn spec(&self) -> StyleSpec {
        match self {
            Self::Professional => StyleSpec {
                font_family: "Arial",
                font_size: 56,
                primary_color: "&H00FFFFFF",
                outline_color: "&H00000000",
                outline_width: 3,
                shadow_offset: 2,
                shadow_color: "&H80000000",
            },
            Self::Modern => StyleSpec {
                font_family: "Helvetica",
                font_size: 60,
                primary_color: "&H00FFFFFF",
                outline_color: "&H00800000",
                outline_width: 2,
                shadow_offset: 3,
                shadow_color: "&H99000000",
            },
            Self::Cinematic => StyleSpec {
                font_family: "Georgia",
                font_size: 52,
                primary_color: "&H0000D7FF",
                outline_color: "&H00000000",
                outline_width: 4,
                shadow_offset: 2,
                shadow_color: "&H66000000",
            },
        }
    }

    /// Render this preset as an ASS force_style string for the subtitle filter
    pub fn force_style(&self) -> String {
        let spec = self.spec();
        format!(
            "FontName={},Bold=1,FontSize={},PrimaryColour={},OutlineColour={},BorderStyle=1,Outline={},Shadow={},BackColour={},Alignment=2,MarginV=80",
            spec.font_family,
            spec.font_size,
            spec.primary_color,
            spec.outline_color,
            spec.outline_width,
            spec.shadow_offset,
            spec.shadow_color,
        )
    }
}

impl std::fmt::Display for SubtitleStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Professional => "professional",
            Self::Modern => "modern",
            Self::Cinematic => "cinematic",
        };
        write!(f, "{}", name)
    }
}

/// Result of a burn attempt; the attempt itself is never pipeline-fatal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BurnOutcome {
    /// Captions rendered into the final video
    Burned,
    /// Burn failed; the pre-burn video was promoted to the final output
    Promoted(String),
}

/// Bakes a serialized subtitle file into the video container.
///
/// Captions are a best-effort visual enhancement: if the external filter
/// invocation fails for any reason, the burn attempt is discarded and the
/// pre-burn video becomes the final artifact. The audio stream is copied,
/// never re-encoded.
pub struct CaptionBurner;

impl CaptionBurner {
    /// Attempt to burn `subtitle_file` into `pre_burn_video`, writing the
    /// result to `final_output`.
    ///
    /// On success the pre-burn temporary file is deleted; on failure it is
    /// promoted (renamed) to the final output path. The only error this
    /// returns is a failed promotion, which would leave no deliverable at all.
    pub async fn burn(
        engine: &dyn MediaEngine,
        pre_burn_video: &Path,
        subtitle_file: &Path,
        style: SubtitleStyle,
        final_output: &Path,
    ) -> Result<BurnOutcome> {
        match engine
            .burn_subtitles(pre_burn_video, subtitle_file, &style.force_style(), final_output)
            .await
        {
            Ok(()) => {
                info!("Burned {} captions into {:?}", style, final_output);
                if let Err(e) = fs::remove_file(pre_burn_video) {
                    warn!("Could not remove pre-burn temporary {:?}: {}", pre_burn_video, e);
                }
                Ok(BurnOutcome::Burned)
            }
            Err(e) => {
                warn!("Caption burn-in failed ({}), delivering uncaptioned video", e);
                Self::promote(pre_burn_video, final_output)?;
                Ok(BurnOutcome::Promoted(e.to_string()))
            }
        }
    }

    /// Promote the pre-burn video to the final path without a burn attempt,
    /// for requests that produced no cues or no subtitle file
    pub fn promote_without_burn(pre_burn_video: &Path, final_output: &Path) -> Result<()> {
        Self::promote(pre_burn_video, final_output)
    }

    /// Move the pre-burn video to the final output path
    fn promote(pre_burn_video: &Path, final_output: &Path) -> Result<()> {
        if fs::rename(pre_burn_video, final_output).is_ok() {
            return Ok(());
        }

        // rename fails across filesystems; fall back to copy + remove
        fs::copy(pre_burn_video, final_output).with_context(|| {
            format!(
                "Failed to promote pre-burn video {:?} to {:?}",
                pre_burn_video, final_output
            )
        })?;
        let _ = fs::remove_file(pre_burn_video);
        Ok(())
    }
}
