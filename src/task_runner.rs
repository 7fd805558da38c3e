//! Supervises a long-running external operation while a progress display
//! ticks alongside it.
//!
//! One supervising future per operation, plus two short-lived workers: the
//! spawned task itself and the reporter's ticking task. The reporter is
//! stopped on every exit path before this module returns, so the display line
//! is never left behind.

use std::future::Future;
use std::time::{Duration, Instant};

use crate::display::truncate_output;
use crate::error::ScribError;
use crate::progress::{DurationEstimate, ProgressReporter};

/// Hard ceiling on a transcription container run.
pub const TRANSCRIBE_TIMEOUT: Duration = Duration::from_secs(2 * 60 * 60);

/// Hard ceiling on an image build.
pub const BUILD_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// How long the completed bar stays visible before the line is cleared.
const COMPLETION_HOLD: Duration = Duration::from_millis(500);

/// Captured error text is bounded so a flood of stderr stays readable.
pub const ERROR_DETAIL_LIMIT: usize = 500;

/// Outcome of one supervised external task.
#[derive(Debug)]
pub struct TaskOutcome {
    pub succeeded: bool,
    pub error_detail: Option<String>,
    pub elapsed: Duration,
}

/// Runs `task` on its own tokio task while a progress reporter ticks, joining
/// both before returning.
///
/// The wait is bounded by `timeout`; exceeding it counts as failure. On
/// completion the display is forced to 100%, held briefly, and stopped —
/// including on failure paths. Ctrl-C during the wait aborts the worker,
/// cleans up the display and surfaces as [`ScribError::Interrupted`].
pub async fn run_with_progress<F>(
    task: F,
    estimate: DurationEstimate,
    total_steps: u64,
    description: &str,
    timeout: Duration,
) -> Result<TaskOutcome, ScribError>
where
    F: Future<Output = Result<(), String>> + Send + 'static,
{
    let mut reporter =
        ProgressReporter::new(total_steps, description, Some(estimate.total_seconds()));
    reporter.start();

    let started = Instant::now();
    let mut worker = tokio::spawn(task);

    let result = tokio::select! {
        joined = tokio::time::timeout(timeout, &mut worker) => match joined {
            Err(_) => {
                worker.abort();
                Err(format!(
                    "timed out after {}",
                    crate::display::format_duration(timeout.as_secs() as i64)
                ))
            }
            Ok(Ok(Ok(()))) => Ok(()),
            Ok(Ok(Err(detail))) => Err(truncate_output(&detail, ERROR_DETAIL_LIMIT)),
            Ok(Err(join_err)) => Err(format!("worker task failed: {join_err}")),
        },
        _ = tokio::signal::ctrl_c() => {
            worker.abort();
            reporter.stop().await;
            return Err(ScribError::Interrupted);
        }
    };
    let elapsed = started.elapsed();

    // Cosmetic 100% flash so the user sees completion before the line clears.
    reporter.update(total_steps);
    tokio::time::sleep(COMPLETION_HOLD).await;
    reporter.stop().await;

    Ok(match result {
        Ok(()) => TaskOutcome {
            succeeded: true,
            error_detail: None,
            elapsed,
        },
        Err(detail) => TaskOutcome {
            succeeded: false,
            error_detail: Some(detail),
            elapsed,
        },
    })
}
