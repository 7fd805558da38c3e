use super::Command;
use crate::assets;
use crate::context::AppContext;
use crate::display::{self, Level};
use crate::error::ScribError;
use crate::progress::build_estimate;
use crate::task_runner::{BUILD_TIMEOUT, run_with_progress};
use async_trait::async_trait;
use std::error::Error;

/// Step count for the build display when no estimate applies.
const BUILD_TOTAL_STEPS: u64 = 10;

/// Command to build the Whisper container image explicitly.
pub struct BuildImageCommand {
    /// Rebuild even when the image is already present
    pub force: bool,
}

#[async_trait]
impl Command for BuildImageCommand {
    async fn execute(&self, ctx: &AppContext) -> Result<(), Box<dyn Error>> {
        let runtime = ctx.container_runtime();
        if runtime.version().await.is_err() {
            return Err(ScribError::ToolUnavailable(ctx.config().container_tool.clone()).into());
        }

        let tag = &ctx.config().image_tag;
        if !self.force && runtime.image_exists(tag).await.unwrap_or(false) {
            display::status(
                Level::Info,
                &format!("Image '{tag}' already present; use --force to rebuild"),
            );
            return Ok(());
        }

        build_whisper_image(ctx).await?;
        Ok(())
    }
}

/// Builds the Whisper image under a progress reporter and verifies it exists
/// afterwards. Shared between the explicit build command and the lazy build
/// on first transcription.
pub(crate) async fn build_whisper_image(ctx: &AppContext) -> Result<(), ScribError> {
    let tag = ctx.config().image_tag.clone();
    display::status(Level::Info, &format!("Building Whisper image '{tag}'..."));

    let containerfile = assets::whisper_containerfile().map_err(|e| build_failed(e.to_string()))?;

    let build_dir = tempfile::tempdir().map_err(|e| build_failed(e.to_string()))?;
    let containerfile_path = build_dir.path().join("Containerfile");
    ctx.file_system()
        .write_file(&containerfile_path, &containerfile)
        .await
        .map_err(|e| build_failed(e.to_string()))?;

    let runtime = ctx.container_runtime();
    let context_dir = build_dir.path().to_path_buf();
    let task_tag = tag.clone();
    let task = async move {
        runtime
            .build_image(&task_tag, &containerfile_path, &context_dir, BUILD_TIMEOUT)
            .await
            .map(|_| ())
    };

    let outcome = run_with_progress(
        task,
        build_estimate(),
        BUILD_TOTAL_STEPS,
        "Building image",
        BUILD_TIMEOUT,
    )
    .await?;
    drop(build_dir);

    if !outcome.succeeded {
        return Err(build_failed(
            outcome
                .error_detail
                .unwrap_or_else(|| "unknown error".to_string()),
        ));
    }

    match ctx.container_runtime().image_exists(&tag).await {
        Ok(true) => {
            display::status(
                Level::Success,
                &format!(
                    "Image '{tag}' built in {}",
                    display::format_duration(outcome.elapsed.as_secs() as i64)
                ),
            );
            Ok(())
        }
        _ => Err(build_failed(format!("image '{tag}' not present after build"))),
    }
}

fn build_failed(detail: String) -> ScribError {
    ScribError::CommandFailed {
        context: "image build".to_string(),
        detail,
    }
}
