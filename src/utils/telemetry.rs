//! # Console Telemetry
//!
//! Progress reporting for the command-line binary, driven by the kernel's
//! progress callback rather than a background thread.
//!
//! - On a TTY, a single status line is rewritten in place.
//! - Otherwise one `[PROGRESS]` structured line is printed per signal.
//!
//! A runtime limit is enforced here too: once the limit has passed, the
//! next cancellation check is answered with `false`.

use std::io::{self, IsTerminal, Write};
use std::time::{Duration, Instant};

use crate::utils::progress::{Phase, ProgressCallback, ProgressEvent};

/// Console reporter options
#[derive(Debug, Clone, Default)]
pub struct ConsoleConfig {
    /// Suppress all output (the runtime limit still applies)
    pub quiet: bool,
    /// Cancel once this much time has elapsed
    pub max_runtime: Option<Duration>,
}

/// [`ProgressCallback`] that renders progress on stderr
pub struct ConsoleProgress {
    config: ConsoleConfig,
    is_tty: bool,
    start: Instant,
    phase_start: Option<(Phase, Instant)>,
    deadline_hit: bool,
    printed: bool,
}

impl ConsoleProgress {
    pub fn new(config: ConsoleConfig) -> Self {
        Self {
            config,
            is_tty: io::stderr().is_terminal(),
            start: Instant::now(),
            phase_start: None,
            deadline_hit: false,
            printed: false,
        }
    }

    /// Whether the runtime limit triggered a cancellation
    pub fn deadline_hit(&self) -> bool {
        self.deadline_hit
    }

    /// Clear the TTY status line
    pub fn finish(&mut self) {
        if self.is_tty && self.printed {
            eprint!("\r\x1b[K");
            let _ = io::stderr().flush();
            self.printed = false;
        }
    }

    fn phase_elapsed(&mut self, phase: Phase, now: Instant) -> f64 {
        match self.phase_start {
            Some((p, started)) if p == phase => now.duration_since(started).as_secs_f64(),
            _ => {
                self.phase_start = Some((phase, now));
                0.0
            }
        }
    }
}

impl ProgressCallback for ConsoleProgress {
    fn on_progress(&mut self, current: i64, total: i64) -> bool {
        let event = ProgressEvent::decode(current, total);
        let now = Instant::now();
        let elapsed = now.duration_since(self.start);
        let phase_secs = self.phase_elapsed(event.phase, now);

        if !self.config.quiet {
            let eta = estimate_eta(event.fraction(), phase_secs);
            let rss_mb = get_rss_mb();
            if self.is_tty {
                eprint!("{}", tty_line(&event, elapsed.as_secs_f64(), eta, rss_mb));
            } else {
                eprintln!("{}", log_line(&event, elapsed.as_secs_f64(), eta, rss_mb));
            }
            let _ = io::stderr().flush();
            self.printed = true;
        }

        match self.config.max_runtime {
            Some(limit) if elapsed >= limit => {
                self.deadline_hit = true;
                false
            }
            _ => true,
        }
    }
}

impl Drop for ConsoleProgress {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Remaining seconds in the phase, assuming a constant rate
fn estimate_eta(fraction: f64, phase_secs: f64) -> Option<f64> {
    if fraction > 0.0 && phase_secs > 0.0 {
        Some(phase_secs / fraction * (1.0 - fraction))
    } else {
        None
    }
}

/// Get RSS memory usage in MB (Linux only)
fn get_rss_mb() -> Option<u64> {
    #[cfg(target_os = "linux")]
    {
        std::fs::read_to_string("/proc/self/statm")
            .ok()
            .and_then(|s| s.split_whitespace().nth(1)?.parse::<u64>().ok())
            .map(|pages| pages * 4096 / (1024 * 1024))
    }
    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}

/// Format duration in human-readable form
fn format_duration(secs: f64) -> String {
    if secs < 60.0 {
        format!("{:.0}s", secs)
    } else if secs < 3600.0 {
        let mins = (secs / 60.0).floor();
        let remaining_secs = secs % 60.0;
        format!("{:.0}m{:.0}s", mins, remaining_secs)
    } else {
        format!("{:.1}h", secs / 3600.0)
    }
}

/// Single rewritable status line (20-char bar)
fn tty_line(event: &ProgressEvent, elapsed_secs: f64, eta: Option<f64>, rss_mb: Option<u64>) -> String {
    let pct = event.fraction() * 100.0;
    let bar_width = 20;
    let filled = ((pct / 100.0) * bar_width as f64) as usize;
    let bar = "=".repeat(filled.min(bar_width)) + &" ".repeat(bar_width.saturating_sub(filled));
    let unit = match event.phase {
        Phase::DistanceMatrix => "rows",
        Phase::Merging => "merges",
    };
    let mem = rss_mb.map(|mb| format!(" {}MB", mb)).unwrap_or_default();

    format!(
        "\r[{}] {:>5.1}% | {} {}/{} {} | {} | ETA: {}{}    \x1b[K",
        bar,
        pct,
        event.phase.as_str(),
        event.done,
        event.total,
        unit,
        format_duration(elapsed_secs),
        eta.map(format_duration).unwrap_or_else(|| "unknown".to_string()),
        mem
    )
}

/// Structured line for logs and pipes
fn log_line(event: &ProgressEvent, elapsed_secs: f64, eta: Option<f64>, rss_mb: Option<u64>) -> String {
    format!(
        "[PROGRESS] phase=\"{}\" done={}/{} pct={:.1} elapsed={:.0}s eta={} rss_mb={}",
        event.phase.as_str(),
        event.done,
        event.total,
        event.fraction() * 100.0,
        elapsed_secs,
        eta.map(format_duration).unwrap_or_else(|| "unknown".to_string()),
        rss_mb
            .map(|m| m.to_string())
            .unwrap_or_else(|| "?".to_string())
    )
}
