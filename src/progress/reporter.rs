//! Single-line animated progress display for supervised external tasks.
//!
//! The reporter owns its state exclusively and exposes only `start`, `update`
//! and `stop`. A spawned tokio task re-renders the line at a fixed interval
//! until `stop` flips the running flag and joins it, so no render can happen
//! after `stop` returns. Tokio tasks never block process exit.

use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use is_terminal::IsTerminal;
use tokio::task::JoinHandle;

use crate::display::format_clock;

const TICK_INTERVAL: Duration = Duration::from_millis(200);
const BAR_WIDTH: usize = 20;
const CLEAR_WIDTH: usize = 80;
const SPINNER_FRAMES: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Time-based progress is capped below 100% until the task actually finishes.
const TIME_PROGRESS_CAP: f64 = 0.95;

/// The ETA is hidden until the display has moved past this percentage.
const ETA_VISIBLE_AFTER_PCT: f64 = 5.0;

struct ReporterState {
    total_steps: u64,
    description: String,
    estimated_duration: Option<f64>,
    current_step: AtomicU64,
    running: AtomicBool,
    started: Instant,
    ticks: AtomicU64,
}

pub struct ProgressReporter {
    total_steps: u64,
    description: String,
    estimated_duration: Option<f64>,
    render_enabled: bool,
    state: Option<Arc<ReporterState>>,
    handle: Option<JoinHandle<()>>,
}

impl ProgressReporter {
    /// Creates an idle reporter. Rendering is suppressed when stdout is not a
    /// terminal so piped runs are not flooded with control characters.
    pub fn new(total_steps: u64, description: &str, estimated_duration: Option<f64>) -> Self {
        Self {
            total_steps,
            description: description.to_string(),
            estimated_duration,
            render_enabled: io::stdout().is_terminal(),
            state: None,
            handle: None,
        }
    }

    #[cfg(test)]
    fn new_silent(total_steps: u64, description: &str, estimated_duration: Option<f64>) -> Self {
        let mut reporter = Self::new(total_steps, description, estimated_duration);
        reporter.render_enabled = false;
        reporter
    }

    /// Starts the ticking display task. Does not block the caller.
    ///
    /// Calling `start` on an already started reporter is a no-op.
    pub fn start(&mut self) {
        if self.state.is_some() {
            return;
        }

        let state = Arc::new(ReporterState {
            total_steps: self.total_steps,
            description: self.description.clone(),
            estimated_duration: self.estimated_duration,
            current_step: AtomicU64::new(0),
            running: AtomicBool::new(true),
            started: Instant::now(),
            ticks: AtomicU64::new(0),
        });
        self.state = Some(Arc::clone(&state));

        let render = self.render_enabled;
        self.handle = Some(tokio::spawn(async move {
            let mut spinner_idx = 0usize;
            loop {
                if !state.running.load(Ordering::Acquire) {
                    break;
                }
                state.ticks.fetch_add(1, Ordering::Relaxed);
                if render {
                    let line = render_line(&state, state.started.elapsed(), spinner_idx);
                    print!("\r{line}");
                    let _ = io::stdout().flush();
                }
                spinner_idx = spinner_idx.wrapping_add(1);
                tokio::time::sleep(TICK_INTERVAL).await;
            }
        }));
    }

    /// Records step progress, clamped into `[0, total_steps]`. Steps are
    /// monotonically non-decreasing; they only drive the display when no
    /// duration estimate is available.
    pub fn update(&self, step: u64) {
        if let Some(state) = &self.state {
            state
                .current_step
                .fetch_max(step.min(state.total_steps), Ordering::AcqRel);
        }
    }

    /// Stops the display: flips the running flag, joins the ticking task and
    /// clears the line. No render happens after this returns. Safe to call
    /// before the first tick and safe to call twice.
    pub async fn stop(&mut self) {
        let Some(state) = self.state.take() else {
            return;
        };
        state.running.store(false, Ordering::Release);

        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }

        if self.render_enabled {
            print!("\r{:width$}\r", "", width = CLEAR_WIDTH);
            let _ = io::stdout().flush();
        }
    }
}

/// Displayed completion percentage.
///
/// With a positive duration estimate the percentage tracks elapsed wall time
/// against the estimate, capped at 95 until the task finishes; otherwise it
/// falls back to the step counter.
fn percentage(elapsed_secs: f64, estimate: Option<f64>, current_step: u64, total_steps: u64) -> f64 {
    match estimate {
        Some(est) if est > 0.0 => (elapsed_secs / est).min(TIME_PROGRESS_CAP) * 100.0,
        _ if total_steps == 0 => 0.0,
        _ => (current_step as f64 / total_steps as f64) * 100.0,
    }
}

fn render_line(state: &ReporterState, elapsed: Duration, spinner_idx: usize) -> String {
    let elapsed_secs = elapsed.as_secs_f64();
    let pct = percentage(
        elapsed_secs,
        state.estimated_duration,
        state.current_step.load(Ordering::Acquire),
        state.total_steps,
    );

    let filled = (((pct / 100.0) * BAR_WIDTH as f64) as usize).min(BAR_WIDTH);
    let bar: String = "█".repeat(filled) + &"░".repeat(BAR_WIDTH - filled);
    let spinner = SPINNER_FRAMES[spinner_idx % SPINNER_FRAMES.len()];

    let mut line = format!(
        "{spinner} {}: [{bar}] {pct:5.1}% ({})",
        state.description,
        format_clock(elapsed_secs)
    );

    if let Some(est) = state.estimated_duration {
        if est > 0.0 && pct > ETA_VISIBLE_AFTER_PCT {
            let remaining = (est - elapsed_secs).max(0.0);
            line.push_str(&format!(" ETA: {}", format_clock(remaining)));
        }
    }

    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(estimate: Option<f64>, current: u64, total: u64) -> ReporterState {
        ReporterState {
            total_steps: total,
            description: "Testing".to_string(),
            estimated_duration: estimate,
            current_step: AtomicU64::new(current),
            running: AtomicBool::new(true),
            started: Instant::now(),
            ticks: AtomicU64::new(0),
        }
    }

    #[test]
    fn test_percentage_tracks_elapsed_over_estimate() {
        assert_eq!(percentage(0.0, Some(510.0), 0, 100), 0.0);
        assert!((percentage(255.0, Some(510.0), 0, 100) - 50.0).abs() < 1e-9);
        assert!((percentage(102.0, Some(510.0), 0, 100) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_percentage_is_monotonic_and_capped_at_95() {
        let mut last = -1.0;
        for elapsed in 0..700 {
            let pct = percentage(elapsed as f64, Some(510.0), 0, 100);
            assert!(pct >= last, "percentage regressed at elapsed={elapsed}");
            assert!(pct <= 95.0, "percentage exceeded cap at elapsed={elapsed}");
            last = pct;
        }
        // Well past the estimate the display stays pinned at the cap.
        assert!((percentage(10_000.0, Some(510.0), 0, 100) - 95.0).abs() < 1e-9);
    }

    #[test]
    fn test_percentage_falls_back_to_steps() {
        assert_eq!(percentage(100.0, None, 5, 10), 50.0);
        assert_eq!(percentage(100.0, Some(0.0), 5, 10), 50.0);
        assert_eq!(percentage(100.0, None, 0, 0), 0.0);
    }

    #[test]
    fn test_render_line_shape() {
        let state = state_with(Some(100.0), 0, 100);
        let line = render_line(&state, Duration::from_secs(50), 0);
        assert!(line.contains("Testing"));
        assert!(line.contains("[██████████░░░░░░░░░░]"));
        assert!(line.contains(" 50.0%"));
        assert!(line.contains("(00:50)"));
        assert!(line.contains("ETA: 00:50"));
    }

    #[test]
    fn test_render_line_hides_eta_early_and_without_estimate() {
        let state = state_with(Some(1000.0), 0, 100);
        let line = render_line(&state, Duration::from_secs(10), 0);
        assert!(!line.contains("ETA"), "ETA shown below 5%: {line}");

        let state = state_with(None, 3, 10);
        let line = render_line(&state, Duration::from_secs(10), 0);
        assert!(!line.contains("ETA"));
        assert!(line.contains(" 30.0%"));
    }

    #[test]
    fn test_render_line_eta_clamps_to_zero_past_estimate() {
        let state = state_with(Some(60.0), 0, 100);
        let line = render_line(&state, Duration::from_secs(90), 0);
        assert!(line.contains("ETA: 00:00"));
        assert!(line.contains(" 95.0%"));
    }

    #[test]
    fn test_spinner_cycles_per_tick() {
        let state = state_with(None, 0, 10);
        let a = render_line(&state, Duration::ZERO, 0);
        let b = render_line(&state, Duration::ZERO, 1);
        assert_ne!(a.chars().next(), b.chars().next());
        // Wraps around after the full frame set
        let c = render_line(&state, Duration::ZERO, SPINNER_FRAMES.len());
        assert_eq!(a.chars().next(), c.chars().next());
    }

    #[tokio::test]
    async fn test_stop_immediately_after_start() {
        let mut reporter = ProgressReporter::new_silent(100, "Quick", Some(10.0));
        reporter.start();
        reporter.stop().await;
        assert!(reporter.state.is_none());
        assert!(reporter.handle.is_none());
    }

    #[tokio::test]
    async fn test_stop_is_idempotent() {
        let mut reporter = ProgressReporter::new_silent(100, "Twice", None);
        reporter.start();
        reporter.stop().await;
        reporter.stop().await;
    }

    #[tokio::test]
    async fn test_no_ticks_after_stop_returns() {
        let mut reporter = ProgressReporter::new_silent(100, "Join", Some(60.0));
        reporter.start();
        let state = Arc::clone(reporter.state.as_ref().unwrap());

        tokio::time::sleep(Duration::from_millis(450)).await;
        reporter.stop().await;

        let ticks_at_stop = state.ticks.load(Ordering::Acquire);
        assert!(ticks_at_stop >= 2, "expected at least two ticks");

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(
            state.ticks.load(Ordering::Acquire),
            ticks_at_stop,
            "ticking task survived stop"
        );
    }

    #[tokio::test]
    async fn test_update_clamps_and_never_decreases() {
        let mut reporter = ProgressReporter::new_silent(100, "Steps", None);
        reporter.start();
        let state = Arc::clone(reporter.state.as_ref().unwrap());

        reporter.update(250);
        assert_eq!(state.current_step.load(Ordering::Acquire), 100);
        reporter.update(10);
        assert_eq!(state.current_step.load(Ordering::Acquire), 100);

        reporter.stop().await;
    }

    #[tokio::test]
    async fn test_update_before_start_is_harmless() {
        let reporter = ProgressReporter::new_silent(100, "Idle", None);
        reporter.update(5);
    }
}
