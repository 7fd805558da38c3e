use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::display::truncate_output;
use crate::task_runner::ERROR_DETAIL_LIMIT;

/// Ceiling for quick administrative commands (`--version`, `images -q`).
const QUICK_COMMAND_TIMEOUT: Duration = Duration::from_secs(60);

/// A host directory mapped into the container.
#[derive(Debug, Clone)]
pub struct VolumeMount {
    pub host: PathBuf,
    pub container: String,
    pub read_only: bool,
}

impl VolumeMount {
    pub fn new(host: impl Into<PathBuf>, container: &str) -> Self {
        Self {
            host: host.into(),
            container: container.to_string(),
            read_only: false,
        }
    }

    pub fn read_only(host: impl Into<PathBuf>, container: &str) -> Self {
        Self {
            host: host.into(),
            container: container.to_string(),
            read_only: true,
        }
    }

    /// Renders the `-v` argument. SELinux volume relabeling (`:Z`) is applied
    /// on non-Windows hosts.
    pub fn to_arg(&self) -> String {
        let mut options: Vec<&str> = Vec::new();
        if self.read_only {
            options.push("ro");
        }
        if !cfg!(windows) {
            options.push("Z");
        }

        if options.is_empty() {
            format!("{}:{}", self.host.display(), self.container)
        } else {
            format!(
                "{}:{}:{}",
                self.host.display(),
                self.container,
                options.join(",")
            )
        }
    }
}

/// Interface to the container tool (podman or docker), invoked as an opaque
/// command with captured output and a hard execution timeout. The tool's
/// output stream is never parsed for progress.
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Reports the tool version; an error means the tool is unusable.
    async fn version(&self) -> Result<String, String>;

    /// Checks whether an image with the given tag exists locally.
    async fn image_exists(&self, tag: &str) -> Result<bool, String>;

    /// Builds an image from a Containerfile within a build context directory.
    async fn build_image(
        &self,
        tag: &str,
        containerfile: &Path,
        context_dir: &Path,
        timeout: Duration,
    ) -> Result<String, String>;

    /// Runs a disposable container to completion and returns captured stdout.
    async fn run_container(
        &self,
        image: &str,
        volumes: &[VolumeMount],
        args: &[String],
        timeout: Duration,
    ) -> Result<String, String>;
}

/// Default runtime shelling out to the configured container tool.
pub struct CliContainerRuntime {
    tool: String,
}

impl CliContainerRuntime {
    pub fn new(tool: &str) -> Self {
        Self {
            tool: tool.to_string(),
        }
    }

    async fn capture(&self, args: &[String], timeout: Duration) -> Result<String, String> {
        let mut cmd = Command::new(&self.tool);
        cmd.args(args).stdin(Stdio::null()).kill_on_drop(true);

        let output = match tokio::time::timeout(timeout, cmd.output()).await {
            Err(_) => {
                return Err(format!(
                    "`{}` timed out after {}",
                    self.tool,
                    crate::display::format_duration(timeout.as_secs() as i64)
                ));
            }
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(format!("command not found: {}", self.tool));
            }
            Ok(Err(e)) => return Err(format!("failed to execute `{}`: {e}", self.tool)),
            Ok(Ok(output)) => output,
        };

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = if stderr.trim().is_empty() {
                format!("exited with {}", output.status)
            } else {
                truncate_output(stderr.trim(), ERROR_DETAIL_LIMIT)
            };
            Err(detail)
        }
    }
}

#[async_trait]
impl ContainerRuntime for CliContainerRuntime {
    async fn version(&self) -> Result<String, String> {
        let stdout = self
            .capture(&["--version".to_string()], QUICK_COMMAND_TIMEOUT)
            .await?;
        Ok(stdout.lines().next().unwrap_or_default().trim().to_string())
    }

    async fn image_exists(&self, tag: &str) -> Result<bool, String> {
        let stdout = self
            .capture(
                &["images".to_string(), "-q".to_string(), tag.to_string()],
                QUICK_COMMAND_TIMEOUT,
            )
            .await?;
        Ok(!stdout.trim().is_empty())
    }

    async fn build_image(
        &self,
        tag: &str,
        containerfile: &Path,
        context_dir: &Path,
        timeout: Duration,
    ) -> Result<String, String> {
        let args = vec![
            "build".to_string(),
            "-t".to_string(),
            tag.to_string(),
            "-f".to_string(),
            containerfile.display().to_string(),
            context_dir.display().to_string(),
        ];
        self.capture(&args, timeout).await
    }

    async fn run_container(
        &self,
        image: &str,
        volumes: &[VolumeMount],
        args: &[String],
        timeout: Duration,
    ) -> Result<String, String> {
        let mut cmd_args = vec![
            "run".to_string(),
            "--rm".to_string(),
            "--name".to_string(),
            format!("scrib-{}", chrono::Utc::now().timestamp()),
        ];
        for volume in volumes {
            cmd_args.push("-v".to_string());
            cmd_args.push(volume.to_arg());
        }
        cmd_args.push(image.to_string());
        cmd_args.extend(args.iter().cloned());

        self.capture(&cmd_args, timeout).await
    }
}
