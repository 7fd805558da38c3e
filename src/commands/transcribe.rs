use super::Command;
use super::build_image::build_whisper_image;
use crate::context::AppContext;
use crate::context::container_runtime::VolumeMount;
use crate::context::file_system::FileSystemOperations;
use crate::display::{self, Level, format_duration};
use crate::error::ScribError;
use crate::progress::transcription_estimate;
use crate::task_runner::{TRANSCRIBE_TIMEOUT, run_with_progress};
use async_trait::async_trait;
use std::error::Error;
use std::path::{Path, PathBuf};

/// The transcription display runs on a 100-step scale when no estimate is
/// available.
const TRANSCRIBE_TOTAL_STEPS: u64 = 100;

/// Extensions Whisper produces with `--output_format all`.
const OUTPUT_EXTENSIONS: [&str; 5] = ["txt", "srt", "vtt", "json", "tsv"];

/// In-container mount points. The input directory is mounted read-only and
/// separately from the output directory so `--output-dir` can point anywhere.
const AUDIO_MOUNT: &str = "/audio";
const WORKSPACE_MOUNT: &str = "/workspace";

/// Command to transcribe an audio or video file inside the Whisper container.
pub struct TranscribeCommand {
    pub audio_file: PathBuf,
    pub model: String,
    pub language: String,
    pub output_dir: Option<PathBuf>,
}

#[async_trait]
impl Command for TranscribeCommand {
    async fn execute(&self, ctx: &AppContext) -> Result<(), Box<dyn Error>> {
        let runtime = ctx.container_runtime();
        let fs = ctx.file_system();

        match runtime.version().await {
            Ok(version) => display::status(Level::Success, &format!("{version} available")),
            Err(_) => {
                return Err(
                    ScribError::ToolUnavailable(ctx.config().container_tool.clone()).into(),
                );
            }
        }

        if !fs.exists(&self.audio_file).await.unwrap_or(false) {
            return Err(ScribError::InputNotFound(self.audio_file.clone()).into());
        }
        let audio_path = self
            .audio_file
            .canonicalize()
            .map_err(|_| ScribError::InputNotFound(self.audio_file.clone()))?;
        let audio_name = audio_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| ScribError::InputNotFound(audio_path.clone()))?;
        let audio_parent = audio_path
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| ScribError::InputNotFound(audio_path.clone()))?;

        let output_dir = self.output_dir.clone().unwrap_or_else(|| audio_parent.clone());
        fs.create_dir(&output_dir).await.map_err(|e| {
            transcription_failed(format!(
                "could not create output directory {}: {e}",
                output_dir.display()
            ))
        })?;
        let output_dir = output_dir.canonicalize().unwrap_or(output_dir);

        let tag = ctx.config().image_tag.clone();
        if runtime.image_exists(&tag).await.unwrap_or(false) {
            display::status(Level::Info, "Using existing image");
        } else {
            build_whisper_image(ctx).await?;
        }

        let duration = ctx.audio_probe().duration_secs(&audio_path).await;
        if let Some(seconds) = duration {
            display::status(Level::Info, &format!("Audio duration: {seconds:.1} seconds"));
        }

        let estimate = transcription_estimate(duration, &self.model);
        if let Some(seconds) = duration {
            display::status(
                Level::Info,
                &format!(
                    "Estimated time: {} (audio: {}, model: {})",
                    format_duration(estimate.total_seconds() as i64),
                    format_duration(seconds as i64),
                    self.model
                ),
            );
        }

        let volumes = vec![
            VolumeMount::read_only(audio_parent, AUDIO_MOUNT),
            VolumeMount::new(output_dir.clone(), WORKSPACE_MOUNT),
        ];
        let mut args = vec![
            format!("{AUDIO_MOUNT}/{audio_name}"),
            "--model".to_string(),
            self.model.clone(),
            "--output_dir".to_string(),
            WORKSPACE_MOUNT.to_string(),
            "--output_format".to_string(),
            "all".to_string(),
            "--verbose".to_string(),
            "False".to_string(),
        ];
        // Whisper auto-detects the language when the flag is omitted
        if !self.language.is_empty() && self.language != "auto" {
            args.push("--language".to_string());
            args.push(self.language.clone());
        }

        display::status(Level::Info, "Starting transcription...");
        let run_runtime = ctx.container_runtime();
        let image = tag.clone();
        let task = async move {
            run_runtime
                .run_container(&image, &volumes, &args, TRANSCRIBE_TIMEOUT)
                .await
                .map(|_| ())
        };
        let outcome = run_with_progress(
            task,
            estimate,
            TRANSCRIBE_TOTAL_STEPS,
            "Transcribing audio",
            TRANSCRIBE_TIMEOUT,
        )
        .await?;

        if !outcome.succeeded {
            let detail = outcome
                .error_detail
                .unwrap_or_else(|| "unknown error".to_string());
            ctx.notification_client()
                .notify_complete(&audio_name, false, Some(&detail));
            return Err(transcription_failed(detail).into());
        }

        display::status(
            Level::Success,
            &format!(
                "Transcription completed in {}",
                format_duration(outcome.elapsed.as_secs() as i64)
            ),
        );

        let stem = audio_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| audio_name.clone());
        let generated = discover_artifacts(fs.as_ref(), &output_dir, &stem).await;

        if generated.is_empty() {
            display::status(Level::Warning, "No output files found");
            if let Ok(entries) = fs.read_dir(&output_dir).await {
                display::status(Level::Info, "Directory contents:");
                for entry in entries {
                    if let Some(name) = entry.file_name() {
                        println!("  - {}", name.to_string_lossy());
                    }
                }
            }
        } else {
            display::status(
                Level::Info,
                &format!("Files generated in: {}", output_dir.display()),
            );
            for (path, size) in &generated {
                if let Some(name) = path.file_name() {
                    println!(
                        "  • {} ({:.1} KB)",
                        name.to_string_lossy(),
                        *size as f64 / 1024.0
                    );
                }
            }
        }

        ctx.notification_client().notify_complete(
            &audio_name,
            true,
            Some(&format!("{} output files", generated.len())),
        );
        Ok(())
    }
}

/// Looks up the artifacts Whisper writes next to the requested formats.
async fn discover_artifacts(
    fs: &dyn FileSystemOperations,
    output_dir: &Path,
    stem: &str,
) -> Vec<(PathBuf, u64)> {
    let mut found = Vec::new();
    for ext in OUTPUT_EXTENSIONS {
        let candidate = output_dir.join(format!("{stem}.{ext}"));
        if fs.exists(&candidate).await.unwrap_or(false) {
            let size = fs.file_size(&candidate).await.unwrap_or(0);
            found.push((candidate, size));
        }
    }
    found
}

fn transcription_failed(detail: String) -> ScribError {
    ScribError::CommandFailed {
        context: "transcription".to_string(),
        detail,
    }
}
