//! Static watermark overlay for video clips
//!
//! The watermark is held constant for the clip's full duration: scaled once
//! against the clip's frame width with the same integer math as the image
//! path, opacity baked into its alpha channel, then composited onto every
//! frame by ffmpeg. The percentage dimension cap is an image-path concern and
//! does not apply here.

use anyhow::{anyhow, Context, Result};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use crate::image::{Watermark, WatermarkOptions};
use crate::metadata::VideoMetadata;
use crate::video::probe::{validate_and_canonicalize_path, VideoProbe};

pub struct VideoWatermarker {
    ffmpeg_path: String,
    probe: VideoProbe,
}

impl VideoWatermarker {
    pub fn new(ffmpeg_path: String, ffprobe_path: String) -> Result<Self> {
        let probe = VideoProbe::new(ffprobe_path).context("Failed to create VideoProbe")?;

        if !ffmpeg_path.chars().all(|c| {
            c.is_alphanumeric() || c == '/' || c == '-' || c == '_' || c == '.' || c == '\\'
        }) {
            return Err(anyhow!("Invalid ffmpeg_path: contains unsafe characters"));
        }

        Ok(Self { ffmpeg_path, probe })
    }

    /// Probe a clip (delegates to [`VideoProbe`]).
    pub async fn probe_video(&self, video_path: &Path) -> Result<VideoMetadata> {
        self.probe.probe(video_path).await
    }

    /// Overlay `watermark_path` onto every frame of `input_path`, writing the
    /// encoded result to `output_path`. The audio stream is copied untouched.
    #[tracing::instrument(skip(self, options), fields(
        process.executable.path = %self.ffmpeg_path,
        ffmpeg.operation = "overlay"
    ))]
    pub async fn watermark_video(
        &self,
        input_path: &Path,
        watermark_path: &Path,
        output_path: &Path,
        options: &WatermarkOptions,
    ) -> Result<VideoMetadata> {
        options
            .validate()
            .map_err(anyhow::Error::new)
            .context("Invalid watermark options")?;

        let input = validate_and_canonicalize_path(input_path).context("Invalid input path")?;
        let wm_path =
            validate_and_canonicalize_path(watermark_path).context("Invalid watermark path")?;
        let output = validate_and_canonicalize_path(output_path).context("Invalid output path")?;

        let metadata = self.probe.probe(&input).await?;

        // Same floor arithmetic as the image path, driven by the frame width
        let watermark_bytes =
            tokio::fs::read(&wm_path).await.context("Failed to read watermark file")?;
        let watermark = Watermark::from_bytes(&watermark_bytes)
            .map_err(anyhow::Error::new)
            .context("Failed to decode watermark")?;
        let (wm_width, wm_height) =
            watermark.scaled_dimensions(metadata.width, options.size_percent);
        let (x, y) = options
            .anchor
            .resolve(metadata.width, metadata.height, wm_width, wm_height);

        let filter = format!(
            "[1:v]scale={}:{}:flags=lanczos,format=rgba,colorchannelmixer=aa={:.4}[wm];\
             [0:v][wm]overlay={}:{}[out]",
            wm_width, wm_height, options.opacity, x, y
        );

        tracing::debug!(
            frame_width = metadata.width,
            frame_height = metadata.height,
            wm_width = wm_width,
            wm_height = wm_height,
            x = x,
            y = y,
            "Overlaying watermark onto video"
        );

        let cmd_output = Command::new(&self.ffmpeg_path)
            .args(["-y", "-i"])
            .arg(&input)
            .arg("-i")
            .arg(&wm_path)
            .args(["-filter_complex", &filter])
            .args(["-map", "[out]", "-map", "0:a?", "-c:a", "copy"])
            .arg(&output)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .context("Failed to execute ffmpeg")?;

        if !cmd_output.status.success() {
            let stderr = String::from_utf8_lossy(&cmd_output.stderr);
            return Err(anyhow!("FFmpeg failed: {}", stderr));
        }

        Ok(metadata)
    }
}
