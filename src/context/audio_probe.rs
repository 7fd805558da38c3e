use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;

const PROBE_TIMEOUT: Duration = Duration::from_secs(30);

/// Probes the duration of an audio or video file in seconds.
///
/// Duration is only an input to the progress estimator, so any failure maps
/// to `None` rather than an error.
#[async_trait]
pub trait AudioProbe: Send + Sync {
    async fn duration_secs(&self, path: &Path) -> Option<f64>;
}

/// Default probe backed by ffprobe's JSON output.
pub struct FfprobeAudioProbe;

// ffprobe reports numeric fields as JSON strings
#[derive(Debug, Deserialize)]
struct ProbeOutput {
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

#[async_trait]
impl AudioProbe for FfprobeAudioProbe {
    async fn duration_secs(&self, path: &Path) -> Option<f64> {
        let mut cmd = Command::new("ffprobe");
        cmd.args(["-v", "quiet", "-print_format", "json", "-show_format"])
            .arg(path)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = tokio::time::timeout(PROBE_TIMEOUT, cmd.output())
            .await
            .ok()?
            .ok()?;
        if !output.status.success() {
            return None;
        }

        parse_probe_output(&String::from_utf8_lossy(&output.stdout))
    }
}

fn parse_probe_output(json: &str) -> Option<f64> {
    let parsed: ProbeOutput = serde_json::from_str(json).ok()?;
    parsed.format?.duration?.trim().parse::<f64>().ok()
}
