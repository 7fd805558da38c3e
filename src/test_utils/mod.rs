//! Mock collaborators shared across unit tests.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::context::audio_probe::AudioProbe;
use crate::context::container_runtime::{ContainerRuntime, VolumeMount};
use crate::notifications::NotificationClient;

#[derive(Debug, Clone)]
pub struct BuildCall {
    pub tag: String,
    pub containerfile: PathBuf,
    pub context_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct RunCall {
    pub image: String,
    pub volumes: Vec<VolumeMount>,
    pub args: Vec<String>,
}

/// Container runtime mock that records every call and returns configured
/// responses.
pub struct TrackedContainerRuntime {
    pub version_result: Result<String, String>,
    /// Responses consumed front-to-back by `image_exists`; `true` once drained.
    pub image_exists_results: Mutex<Vec<bool>>,
    /// `None` means the build succeeds with empty output.
    pub build_result: Option<Result<String, String>>,
    /// `None` means the run succeeds with empty output.
    pub run_result: Option<Result<String, String>>,
    /// Simulated execution time for `run_container`.
    pub run_delay: Option<Duration>,
    pub build_calls: Mutex<Vec<BuildCall>>,
    pub run_calls: Mutex<Vec<RunCall>>,
}

impl Default for TrackedContainerRuntime {
    fn default() -> Self {
        Self {
            version_result: Ok("podman version 4.9.0".to_string()),
            image_exists_results: Mutex::new(Vec::new()),
            build_result: None,
            run_result: None,
            run_delay: None,
            build_calls: Mutex::new(Vec::new()),
            run_calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ContainerRuntime for TrackedContainerRuntime {
    async fn version(&self) -> Result<String, String> {
        self.version_result.clone()
    }

    async fn image_exists(&self, _tag: &str) -> Result<bool, String> {
        let mut responses = self.image_exists_results.lock().unwrap();
        if responses.is_empty() {
            Ok(true)
        } else {
            Ok(responses.remove(0))
        }
    }

    async fn build_image(
        &self,
        tag: &str,
        containerfile: &Path,
        context_dir: &Path,
        _timeout: Duration,
    ) -> Result<String, String> {
        self.build_calls.lock().unwrap().push(BuildCall {
            tag: tag.to_string(),
            containerfile: containerfile.to_path_buf(),
            context_dir: context_dir.to_path_buf(),
        });
        self.build_result.clone().unwrap_or_else(|| Ok(String::new()))
    }

    async fn run_container(
        &self,
        image: &str,
        volumes: &[VolumeMount],
        args: &[String],
        _timeout: Duration,
    ) -> Result<String, String> {
        if let Some(delay) = self.run_delay {
            tokio::time::sleep(delay).await;
        }
        self.run_calls.lock().unwrap().push(RunCall {
            image: image.to_string(),
            volumes: volumes.to_vec(),
            args: args.to_vec(),
        });
        self.run_result.clone().unwrap_or_else(|| Ok(String::new()))
    }
}

/// Audio probe returning a fixed duration.
pub struct FixedAudioProbe(pub Option<f64>);

#[async_trait]
impl AudioProbe for FixedAudioProbe {
    async fn duration_secs(&self, _path: &Path) -> Option<f64> {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct NotificationRecord {
    pub input_name: String,
    pub success: bool,
    pub message: Option<String>,
}

/// Notification client that records calls instead of showing anything.
#[derive(Default)]
pub struct RecordingNotificationClient {
    pub calls: Mutex<Vec<NotificationRecord>>,
}

impl NotificationClient for RecordingNotificationClient {
    fn notify_complete(&self, input_name: &str, success: bool, message: Option<&str>) {
        self.calls.lock().unwrap().push(NotificationRecord {
            input_name: input_name.to_string(),
            success,
            message: message.map(str::to_string),
        });
    }
}
